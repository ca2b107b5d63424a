use super::{
    buffer_pairs, candidate_pairs, find_joint_groups, invert_covariance, mahalanobis_pairs,
    JointConfig, JointError, SimilarityMethod,
};
use std::collections::HashSet;
use wayline_core::model::record::{JointTrip, JointTripId, LinkedTrip};
use wayline_core::util::geo_utils::mean_point;
use wayline_core::util::time_utils::mean_datetime;

/// detects shared trips within one household-day, annotating each
/// participating journey with its joint trip id.
///
/// journeys from different members are paired when their endpoints and
/// schedules are alike under the configured similarity method, and
/// compatible sets are resolved into disjoint groups. a household with
/// a single reporting member is skipped outright.
pub fn detect_household_day(
    trips: &mut [LinkedTrip],
    config: &JointConfig,
) -> Result<Vec<JointTrip>, JointError> {
    let persons: HashSet<u64> = trips.iter().map(|t| t.person_id).collect();
    if persons.len() < 2 {
        return Ok(vec![]);
    }

    let eligible: Vec<usize> = (0..trips.len())
        .filter(|i| {
            let t = &trips[*i];
            t.origin.is_some()
                && t.destination.is_some()
                && t.depart_time.is_some()
                && t.arrive_time.is_some()
        })
        .collect();
    if eligible.len() < 2 {
        return Ok(vec![]);
    }
    if eligible.len() > config.max_graph_nodes {
        log::warn!(
            "household {} day {} has {} candidate trips, exceeding the {}-node limit; skipping joint trip detection",
            trips[0].hh_id,
            trips[0].day_id,
            eligible.len(),
            config.max_graph_nodes
        );
        return Ok(vec![]);
    }

    // pair positions index into the eligible list, keeping the graph dense
    let dense: Vec<LinkedTrip> = eligible.iter().map(|i| trips[*i].clone()).collect();
    let all_pairs = candidate_pairs(&dense, &(0..dense.len()).collect::<Vec<usize>>());
    let pairs = match config.method {
        SimilarityMethod::Buffer => buffer_pairs(
            all_pairs,
            config.buffer_distance_meters,
            config.buffer_time_minutes,
        ),
        SimilarityMethod::Mahalanobis => {
            let inverse = invert_covariance(&config.covariance_matrix()?)?;
            let threshold = config.chi_squared_threshold()?;
            mahalanobis_pairs(all_pairs, &inverse, threshold)
        }
    };

    let groups = find_joint_groups(
        dense.len(),
        &pairs,
        config.max_exact_cliques,
        config.max_enumerated_cliques,
    );

    let mut joint_trips: Vec<JointTrip> = vec![];
    for group in groups {
        let members: Vec<usize> = group.iter().map(|g| eligible[*g]).collect();
        joint_trips.push(summarize_group(trips, &members));
    }
    joint_trips.sort_by_key(|j| j.joint_trip_id);
    Ok(joint_trips)
}

fn summarize_group(trips: &mut [LinkedTrip], members: &[usize]) -> JointTrip {
    let mut linked_trip_ids: Vec<_> = members.iter().map(|i| trips[*i].linked_trip_id).collect();
    linked_trip_ids.sort();
    // groups are disjoint, so the smallest member id is unique
    let joint_trip_id = JointTripId(linked_trip_ids[0].0);

    let mut person_ids: Vec<u64> = members.iter().map(|i| trips[*i].person_id).collect();
    person_ids.sort();

    let origins: Vec<_> = members.iter().map(|i| trips[*i].origin).collect();
    let destinations: Vec<_> = members.iter().map(|i| trips[*i].destination).collect();
    let departs: Vec<_> = members.iter().map(|i| trips[*i].depart_time).collect();
    let arrives: Vec<_> = members.iter().map(|i| trips[*i].arrive_time).collect();

    for i in members.iter() {
        let trip = &mut trips[*i];
        trip.joint_trip_id = Some(joint_trip_id);
        // reported party sizes smaller than the detected group suggest a
        // diary inconsistency worth surfacing
        if (trip.num_travelers as usize) < members.len() {
            log::debug!(
                "linked trip {} reports {} travelers but joins a {}-person joint trip",
                trip.linked_trip_id,
                trip.num_travelers,
                members.len()
            );
        }
    }

    JointTrip {
        joint_trip_id,
        hh_id: trips[members[0]].hh_id,
        day_id: trips[members[0]].day_id,
        person_ids,
        linked_trip_ids,
        num_travelers: members.len(),
        origin_mean: mean_point(&origins),
        destination_mean: mean_point(&destinations),
        depart_time_mean: mean_datetime(&departs),
        arrive_time_mean: mean_datetime(&arrives),
    }
}
