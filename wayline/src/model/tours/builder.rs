use super::{
    anchor_period, classify_endpoints, home_based_spans, subtour_spans, ScoreTable, TourConfig,
    TourError,
};
use geo::Point;
use wayline_core::model::codebook::{HalfTour, LocationType, PurposeCategory, TourCategory};
use wayline_core::model::record::{LinkedTrip, PersonAnchors, Tour, TourId};
use wayline_core::util::geo_utils::same_coordinates;
use wayline_core::util::time_utils::try_minutes_between;

/// builds the home-based tours and work/school sub-tours of one
/// person-day, annotating each journey with its tour membership.
///
/// journeys must be in temporal order. each journey is assigned to
/// exactly one tour: sub-tour legs belong to the sub-tour and are
/// excluded from the parent's mode and destination selection.
///
/// # Arguments
///
/// * `trips` - the person-day's journeys, annotated in place
/// * `anchors` - the person's reported home, work, and school locations
/// * `table` - impedance curves for primary destination selection
/// * `config` - anchor radii, mode hierarchy, and activity defaults
pub fn build_person_day_tours(
    trips: &mut [LinkedTrip],
    anchors: &PersonAnchors,
    table: &ScoreTable,
    config: &TourConfig,
) -> Result<Vec<Tour>, TourError> {
    if trips.is_empty() {
        return Ok(vec![]);
    }
    let person_id = trips[0].person_id;
    let day_id = trips[0].day_id;
    // tour ids pack (person, day, seq, child) arithmetically; out-of-range
    // components would collide across persons
    if day_id > TourId::MAX_DAY_ID {
        return Err(TourError::IdRangeError(format!(
            "day id {} for person {} exceeds {}; renumber travel days within the survey period",
            day_id,
            person_id,
            TourId::MAX_DAY_ID
        )));
    }
    let kinds = classify_endpoints(trips, anchors, config);
    let activity_minutes = activity_durations(trips, config);

    let mut tours: Vec<Tour> = vec![];
    for span in home_based_spans(&kinds) {
        if span.tour_seq > TourId::MAX_TOUR_SEQ {
            return Err(TourError::IdRangeError(format!(
                "person {} day {} has more than {} home-based tours",
                person_id,
                day_id,
                TourId::MAX_TOUR_SEQ
            )));
        }
        let span_kinds = &kinds[span.start..=span.end];
        let parent_id = TourId::home_based(person_id, day_id, span.tour_seq);

        // work outranks school when both appear within the tour
        let anchor = [LocationType::Work, LocationType::School]
            .into_iter()
            .find(|a| span_kinds.iter().any(|(o, d)| o == a || d == a));
        let subtour_runs = match anchor {
            Some(anchor) => match anchor_period(span_kinds, anchor) {
                Some(period) => subtour_spans(span_kinds, anchor, period),
                None => vec![],
            },
            None => vec![],
        };

        let mut in_subtour = vec![false; span_kinds.len()];
        for run in subtour_runs.iter() {
            for flag in in_subtour[run.start..=run.end].iter_mut() {
                *flag = true;
            }
        }
        let parent_indices: Vec<usize> = (span.start..=span.end)
            .filter(|i| !in_subtour[i - span.start])
            .collect();

        tours.push(summarize_unit(
            trips,
            &parent_indices,
            &activity_minutes,
            UnitIdentity {
                tour_id: parent_id,
                tour_seq: span.tour_seq,
                parent_tour_id: None,
                anchor: LocationType::Home,
                category: span.category,
            },
            table,
            config,
        )?);

        for run in subtour_runs.iter() {
            if run.seq > TourId::MAX_SUBTOUR_SEQ {
                return Err(TourError::IdRangeError(format!(
                    "tour {} has more than {} sub-tours",
                    parent_id,
                    TourId::MAX_SUBTOUR_SEQ
                )));
            }
            let indices: Vec<usize> =
                (span.start + run.start..=span.start + run.end).collect();
            tours.push(summarize_unit(
                trips,
                &indices,
                &activity_minutes,
                UnitIdentity {
                    tour_id: TourId::subtour(parent_id, run.seq),
                    tour_seq: span.tour_seq,
                    parent_tour_id: Some(parent_id),
                    // subtour anchor is the work/school base, never home
                    anchor: anchor.unwrap_or(LocationType::Other),
                    category: TourCategory::Complete,
                },
                table,
                config,
            )?);
        }
    }
    Ok(tours)
}

struct UnitIdentity {
    tour_id: TourId,
    tour_seq: u64,
    parent_tour_id: Option<TourId>,
    anchor: LocationType,
    category: TourCategory,
}

/// time spent at each journey's destination: the gap until the next
/// departure, or the configured default when no journey follows.
fn activity_durations(trips: &[LinkedTrip], config: &TourConfig) -> Vec<f64> {
    (0..trips.len())
        .map(|i| match trips.get(i + 1) {
            Some(next) => try_minutes_between(&trips[i].arrive_time, &next.depart_time)
                .filter(|m| *m >= 0.0)
                .unwrap_or(config.default_activity_minutes),
            None => config.default_activity_minutes,
        })
        .collect()
}

/// summarizes one tour unit (a parent tour minus its sub-tour legs, or a
/// single sub-tour) into a tour record, annotating its journeys.
fn summarize_unit(
    trips: &mut [LinkedTrip],
    indices: &[usize],
    activity_minutes: &[f64],
    identity: UnitIdentity,
    table: &ScoreTable,
    config: &TourConfig,
) -> Result<Tour, TourError> {
    let first = *indices.first().ok_or_else(|| {
        TourError::InternalError(String::from("tour unit contains no journeys"))
    })?;
    let last = *indices.last().unwrap_or(&first);

    let primary_set = select_primary(trips, indices, activity_minutes, table);
    let first_primary = *primary_set.first().unwrap_or(&last);
    let last_primary = *primary_set.last().unwrap_or(&last);
    let primary = &trips[first_primary];
    let tour_purpose = primary.d_purpose;
    let primary_dest_trip_id = primary.linked_trip_id;

    let dest_arrive_time = trips[first_primary].arrive_time;
    let dest_depart_time = indices
        .iter()
        .find(|i| **i > last_primary)
        .and_then(|i| trips[*i].depart_time);

    // halves split at the primary destination; journeys between repeated
    // primary stops stay outbound
    let half = |i: usize| -> HalfTour {
        if i > last_primary {
            HalfTour::Inbound
        } else {
            HalfTour::Outbound
        }
    };

    let best_mode = |candidates: &[usize]| {
        candidates
            .iter()
            .filter_map(|i| {
                config
                    .mode_priority(&trips[*i].mode_type)
                    .map(|p| (p, trips[*i].mode_type))
            })
            .max_by_key(|(p, _)| *p)
            .map(|(_, m)| m)
    };
    let outbound: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|i| half(*i) == HalfTour::Outbound)
        .collect();
    let inbound: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|i| half(*i) == HalfTour::Inbound)
        .collect();
    let tour_mode = best_mode(indices);
    let outbound_mode = best_mode(&outbound);
    let inbound_mode = best_mode(&inbound);

    // intermediate stops exclude arrivals at the primary destination and
    // the final arrival back at the anchor
    let outbound_stops = distinct_destinations(
        trips,
        outbound.iter().copied().filter(|i| *i < first_primary),
    );
    let inbound_stops = distinct_destinations(
        trips,
        inbound.iter().copied().filter(|i| *i < last),
    );

    for i in indices.iter() {
        let trip = &mut trips[*i];
        match identity.parent_tour_id {
            Some(parent) => {
                trip.tour_id = Some(parent);
                trip.subtour_id = Some(identity.tour_id);
                trip.half_tour = Some(HalfTour::Subtour);
            }
            None => {
                trip.tour_id = Some(identity.tour_id);
                trip.half_tour = Some(half(*i));
            }
        }
    }

    // a tour anchored on an unresolved mode change cannot be classified
    let valid = tour_purpose != PurposeCategory::ChangeMode && indices.len() > 1;

    Ok(Tour {
        tour_id: identity.tour_id,
        person_id: trips[first].person_id,
        hh_id: trips[first].hh_id,
        day_id: trips[first].day_id,
        tour_seq: identity.tour_seq,
        parent_tour_id: identity.parent_tour_id,
        anchor: identity.anchor,
        primary_dest_trip_id: Some(primary_dest_trip_id),
        tour_purpose: Some(tour_purpose),
        tour_mode,
        outbound_mode,
        inbound_mode,
        depart_time: trips[first].depart_time,
        arrive_time: trips[last].arrive_time,
        dest_arrive_time,
        dest_depart_time,
        trip_count: indices.len(),
        outbound_stops,
        inbound_stops,
        category: identity.category,
        valid,
    })
}

/// picks the unit's primary destination: the non-home stop minimizing
/// the impedance score at `2 * travel time from the anchor + activity
/// duration`, taking the earliest stop on ties. when the winning purpose
/// is work, later work stops at the same coordinates join the primary
/// set so the destination window spans all of them.
///
/// returns sorted unit indices; never empty (a single-journey unit's
/// destination is its only stop).
fn select_primary(
    trips: &[LinkedTrip],
    indices: &[usize],
    activity_minutes: &[f64],
    table: &ScoreTable,
) -> Vec<usize> {
    let mut cumulative_travel = 0.0;
    let mut best: Option<(usize, f64)> = None;
    let mut candidates: Vec<(usize, f64)> = vec![];
    for (pos, i) in indices.iter().enumerate() {
        cumulative_travel += trips[*i].travel_duration_minutes;
        // the final journey returns to the anchor; home stops are the
        // anchor itself, not an activity
        if pos + 1 == indices.len() || trips[*i].d_purpose == PurposeCategory::Home {
            continue;
        }
        let lookup = 2.0 * cumulative_travel + activity_minutes[*i];
        let score = table.score(&trips[*i].d_purpose, lookup);
        candidates.push((*i, score));
        let improves = match best {
            Some((_, best_score)) => score < best_score,
            None => true,
        };
        if improves {
            best = Some((*i, score));
        }
    }
    let primary = match best {
        Some((i, _)) => i,
        None => return indices.last().map(|i| vec![*i]).unwrap_or_default(),
    };
    let mut set = vec![primary];
    if trips[primary].d_purpose.is_work() {
        for (i, _) in candidates.iter() {
            if *i != primary
                && trips[*i].d_purpose.is_work()
                && same_coordinates(&trips[*i].destination, &trips[primary].destination)
            {
                set.push(*i);
            }
        }
        set.sort();
    }
    set
}

fn distinct_destinations(
    trips: &[LinkedTrip],
    indices: impl Iterator<Item = usize>,
) -> usize {
    let mut seen: Vec<Option<Point<f64>>> = vec![];
    // destinations without coordinates are indistinguishable from one
    // another and count as a single stop
    let mut unknown = false;
    for i in indices {
        let dest = trips[i].destination;
        if dest.is_none() {
            unknown = true;
            continue;
        }
        if !seen.iter().any(|s| same_coordinates(s, &dest)) {
            seen.push(dest);
        }
    }
    seen.len() + unknown as usize
}
