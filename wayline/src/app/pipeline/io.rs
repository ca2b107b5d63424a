use super::PipelineError;
use chrono::NaiveDateTime;
use geo::Point;
use itertools::Itertools;
use std::collections::HashMap;
use std::path::Path;
use wayline_core::model::codebook::{DriverStatus, HalfTour, ModeType, PurposeCategory};
use wayline_core::model::record::{JointTrip, LinkedTrip, PersonAnchors, Tour, UnlinkedTrip};

/// one row of the unlinked trip input file. coordinates and timestamps
/// are optional; rows missing them flow through the pipeline as
/// uncheckable rather than being rejected.
#[derive(Debug, serde::Deserialize)]
pub struct TripRow {
    pub trip_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    pub o_lon: Option<f64>,
    pub o_lat: Option<f64>,
    pub d_lon: Option<f64>,
    pub d_lat: Option<f64>,
    pub o_purpose: PurposeCategory,
    pub d_purpose: PurposeCategory,
    pub depart_time: Option<NaiveDateTime>,
    pub arrive_time: Option<NaiveDateTime>,
    pub mode_type: ModeType,
    pub driver: Option<DriverStatus>,
    pub num_travelers: Option<u32>,
    pub distance_meters: Option<f64>,
    pub duration_minutes: Option<f64>,
}

fn point(lon: Option<f64>, lat: Option<f64>) -> Option<Point<f64>> {
    match (lon, lat) {
        (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
        _ => None,
    }
}

impl From<TripRow> for UnlinkedTrip {
    fn from(row: TripRow) -> UnlinkedTrip {
        UnlinkedTrip {
            trip_id: row.trip_id,
            person_id: row.person_id,
            hh_id: row.hh_id,
            day_id: row.day_id,
            origin: point(row.o_lon, row.o_lat),
            destination: point(row.d_lon, row.d_lat),
            o_purpose: row.o_purpose,
            d_purpose: row.d_purpose,
            depart_time: row.depart_time,
            arrive_time: row.arrive_time,
            mode_type: row.mode_type,
            driver: row.driver.unwrap_or(DriverStatus::Missing),
            num_travelers: row.num_travelers.unwrap_or(1),
            distance_meters: row.distance_meters,
            duration_minutes: row.duration_minutes,
        }
    }
}

/// one row of the person file, carrying the reported anchor locations.
#[derive(Debug, serde::Deserialize)]
pub struct PersonRow {
    pub person_id: u64,
    pub home_lon: Option<f64>,
    pub home_lat: Option<f64>,
    pub work_lon: Option<f64>,
    pub work_lat: Option<f64>,
    pub school_lon: Option<f64>,
    pub school_lat: Option<f64>,
}

pub fn read_trips<P: AsRef<Path>>(path: P) -> Result<Vec<UnlinkedTrip>, PipelineError> {
    let display = path.as_ref().to_string_lossy().to_string();
    let mut reader = csv::Reader::from_path(&path)
        .map_err(|e| PipelineError::FileReadError(display.clone(), e.to_string()))?;
    let mut trips: Vec<UnlinkedTrip> = vec![];
    for row in reader.deserialize::<TripRow>() {
        let row = row.map_err(|e| PipelineError::FileReadError(display.clone(), e.to_string()))?;
        trips.push(row.into());
    }
    Ok(trips)
}

pub fn read_person_anchors<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<u64, PersonAnchors>, PipelineError> {
    let display = path.as_ref().to_string_lossy().to_string();
    let mut reader = csv::Reader::from_path(&path)
        .map_err(|e| PipelineError::FileReadError(display.clone(), e.to_string()))?;
    let mut anchors: HashMap<u64, PersonAnchors> = HashMap::new();
    for row in reader.deserialize::<PersonRow>() {
        let row = row.map_err(|e| PipelineError::FileReadError(display.clone(), e.to_string()))?;
        anchors.insert(
            row.person_id,
            PersonAnchors {
                home: point(row.home_lon, row.home_lat),
                work: point(row.work_lon, row.work_lat),
                school: point(row.school_lon, row.school_lat),
            },
        );
    }
    Ok(anchors)
}

/// flattened output row for a linked trip. geometry becomes lon/lat
/// columns and list fields become `;`-delimited strings so the file
/// round-trips through ordinary csv tooling.
#[derive(Debug, serde::Serialize)]
pub struct LinkedTripRow {
    pub linked_trip_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    pub segment_trip_ids: String,
    pub num_segments: usize,
    pub o_lon: Option<f64>,
    pub o_lat: Option<f64>,
    pub d_lon: Option<f64>,
    pub d_lat: Option<f64>,
    pub o_purpose: PurposeCategory,
    pub d_purpose: PurposeCategory,
    pub depart_time: Option<NaiveDateTime>,
    pub arrive_time: Option<NaiveDateTime>,
    pub mode_type: ModeType,
    pub access_mode: Option<ModeType>,
    pub egress_mode: Option<ModeType>,
    pub driver: DriverStatus,
    pub num_travelers: u32,
    pub distance_meters: f64,
    pub travel_duration_minutes: f64,
    pub total_duration_minutes: f64,
    pub dwell_duration_minutes: f64,
    pub needs_review: bool,
    pub tour_id: Option<u64>,
    pub subtour_id: Option<u64>,
    pub half_tour: Option<HalfTour>,
    pub joint_trip_id: Option<u64>,
}

impl From<&LinkedTrip> for LinkedTripRow {
    fn from(trip: &LinkedTrip) -> LinkedTripRow {
        LinkedTripRow {
            linked_trip_id: trip.linked_trip_id.0,
            person_id: trip.person_id,
            hh_id: trip.hh_id,
            day_id: trip.day_id,
            segment_trip_ids: trip.segment_trip_ids.iter().join(";"),
            num_segments: trip.num_segments(),
            o_lon: trip.origin.map(|p| p.x()),
            o_lat: trip.origin.map(|p| p.y()),
            d_lon: trip.destination.map(|p| p.x()),
            d_lat: trip.destination.map(|p| p.y()),
            o_purpose: trip.o_purpose,
            d_purpose: trip.d_purpose,
            depart_time: trip.depart_time,
            arrive_time: trip.arrive_time,
            mode_type: trip.mode_type,
            access_mode: trip.access_mode,
            egress_mode: trip.egress_mode,
            driver: trip.driver,
            num_travelers: trip.num_travelers,
            distance_meters: trip.distance_meters,
            travel_duration_minutes: trip.travel_duration_minutes,
            total_duration_minutes: trip.total_duration_minutes,
            dwell_duration_minutes: trip.dwell_duration_minutes,
            needs_review: trip.needs_review,
            tour_id: trip.tour_id.map(|id| id.0),
            subtour_id: trip.subtour_id.map(|id| id.0),
            half_tour: trip.half_tour,
            joint_trip_id: trip.joint_trip_id.map(|id| id.0),
        }
    }
}

/// flattened output row for a joint trip.
#[derive(Debug, serde::Serialize)]
pub struct JointTripRow {
    pub joint_trip_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    pub person_ids: String,
    pub linked_trip_ids: String,
    pub num_travelers: usize,
    pub o_lon_mean: Option<f64>,
    pub o_lat_mean: Option<f64>,
    pub d_lon_mean: Option<f64>,
    pub d_lat_mean: Option<f64>,
    pub depart_time_mean: Option<NaiveDateTime>,
    pub arrive_time_mean: Option<NaiveDateTime>,
}

impl From<&JointTrip> for JointTripRow {
    fn from(joint: &JointTrip) -> JointTripRow {
        JointTripRow {
            joint_trip_id: joint.joint_trip_id.0,
            hh_id: joint.hh_id,
            day_id: joint.day_id,
            person_ids: joint.person_ids.iter().join(";"),
            linked_trip_ids: joint.linked_trip_ids.iter().join(";"),
            num_travelers: joint.num_travelers,
            o_lon_mean: joint.origin_mean.map(|p| p.x()),
            o_lat_mean: joint.origin_mean.map(|p| p.y()),
            d_lon_mean: joint.destination_mean.map(|p| p.x()),
            d_lat_mean: joint.destination_mean.map(|p| p.y()),
            depart_time_mean: joint.depart_time_mean,
            arrive_time_mean: joint.arrive_time_mean,
        }
    }
}

fn write_rows<P, R>(path: P, rows: impl Iterator<Item = R>) -> Result<(), PipelineError>
where
    P: AsRef<Path>,
    R: serde::Serialize,
{
    let display = path.as_ref().to_string_lossy().to_string();
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| PipelineError::FileWriteError(display.clone(), e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| PipelineError::FileWriteError(display.clone(), e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::FileWriteError(display, e.to_string()))?;
    Ok(())
}

pub fn write_linked_trips<P: AsRef<Path>>(
    path: P,
    trips: &[LinkedTrip],
) -> Result<(), PipelineError> {
    write_rows(path, trips.iter().map(LinkedTripRow::from))
}

pub fn write_tours<P: AsRef<Path>>(path: P, tours: &[Tour]) -> Result<(), PipelineError> {
    write_rows(path, tours.iter())
}

pub fn write_joint_trips<P: AsRef<Path>>(
    path: P,
    joint_trips: &[JointTrip],
) -> Result<(), PipelineError> {
    write_rows(path, joint_trips.iter().map(JointTripRow::from))
}
