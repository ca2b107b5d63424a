use super::TripPair;
use std::collections::HashMap;

/// groups compatible trips into disjoint cliques.
///
/// pairwise similarity is not transitive, so compatible pairs form a
/// graph whose maximal cliques are the candidate groups. a trip may sit
/// in several maximal cliques but can only be part of one shared trip,
/// so a disjoint subset of cliques is selected that covers as many
/// trips as possible.
///
/// selection is deterministic: cliques are ranked by size (largest
/// first), then mean pairwise distance (smallest first), then smallest
/// member index. small inputs are solved exactly by branch and bound;
/// past `max_exact_cliques` candidates the ranking is consumed greedily.
/// enumeration itself stops at `max_enumerated_cliques`, bounding the
/// work on dense graphs whose maximal clique count is exponential.
///
/// node indices must be dense in `0..n` with `n <= 64`.
pub fn find_joint_groups(
    n: usize,
    pairs: &[TripPair],
    max_exact_cliques: usize,
    max_enumerated_cliques: usize,
) -> Vec<Vec<usize>> {
    debug_assert!(n <= 64);
    if pairs.is_empty() {
        return vec![];
    }
    let mut adjacency: Vec<u64> = vec![0; n];
    let mut distances: HashMap<(usize, usize), f64> = HashMap::new();
    for pair in pairs.iter() {
        adjacency[pair.i] |= 1 << pair.j;
        adjacency[pair.j] |= 1 << pair.i;
        distances.insert((pair.i.min(pair.j), pair.i.max(pair.j)), pair.distance);
    }

    let enumerated = maximal_cliques(n, &adjacency, max_enumerated_cliques);
    if enumerated.len() >= max_enumerated_cliques {
        log::debug!(
            "clique enumeration stopped at {} maximal cliques; grouping over the cliques found",
            enumerated.len()
        );
    }
    let mut candidates: Vec<Candidate> = enumerated
        .into_iter()
        .filter(|mask| mask.count_ones() >= 2)
        .map(|mask| Candidate::new(mask, &distances))
        .collect();
    candidates.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then(a.mean_distance.total_cmp(&b.mean_distance))
            .then(a.mask.trailing_zeros().cmp(&b.mask.trailing_zeros()))
    });

    let cover = if candidates.len() <= max_exact_cliques {
        exact_cover(&candidates)
    } else {
        greedy_cover(&candidates)
    };
    cover
        .into_iter()
        .map(|mask| (0..n).filter(|i| mask & (1 << i) != 0).collect())
        .collect()
}

struct Candidate {
    mask: u64,
    size: u32,
    mean_distance: f64,
}

impl Candidate {
    fn new(mask: u64, distances: &HashMap<(usize, usize), f64>) -> Candidate {
        let members: Vec<usize> = (0..64).filter(|i| mask & (1 << i) != 0).collect();
        let mut total = 0.0;
        let mut count = 0;
        for (a, i) in members.iter().enumerate() {
            for j in members.iter().skip(a + 1) {
                if let Some(d) = distances.get(&(*i, *j)) {
                    total += d;
                    count += 1;
                }
            }
        }
        Candidate {
            mask,
            size: mask.count_ones(),
            mean_distance: if count > 0 { total / count as f64 } else { 0.0 },
        }
    }
}

/// bron-kerbosch with pivoting over a bitmask adjacency list, stopping
/// once `budget` cliques have been collected.
fn maximal_cliques(n: usize, adjacency: &[u64], budget: usize) -> Vec<u64> {
    let mut cliques: Vec<u64> = vec![];
    let all: u64 = if n == 64 { u64::MAX } else { (1 << n) - 1 };
    expand(0, all, 0, adjacency, &mut cliques, budget);
    cliques
}

fn expand(r: u64, mut p: u64, mut x: u64, adjacency: &[u64], cliques: &mut Vec<u64>, budget: usize) {
    if cliques.len() >= budget {
        return;
    }
    if p == 0 && x == 0 {
        cliques.push(r);
        return;
    }
    // pivot on the candidate with the most neighbors in p
    let pivot = match iter_bits(p | x).max_by_key(|v| (adjacency[*v] & p).count_ones()) {
        Some(v) => v,
        None => return,
    };
    let without_pivot_neighbors = p & !adjacency[pivot];
    for v in iter_bits(without_pivot_neighbors) {
        let bit = 1u64 << v;
        expand(r | bit, p & adjacency[v], x & adjacency[v], adjacency, cliques, budget);
        p &= !bit;
        x |= bit;
    }
}

fn iter_bits(mask: u64) -> impl Iterator<Item = usize> {
    (0..64).filter(move |i| mask & (1 << i) != 0)
}

/// branch and bound over the ranked candidate list, maximizing the
/// number of covered trips. ties prefer the cover with the smaller
/// total mean distance, then the one using earlier-ranked cliques.
fn exact_cover(candidates: &[Candidate]) -> Vec<u64> {
    let mut best: Vec<usize> = vec![];
    let mut best_covered: u32 = 0;
    let mut best_distance = f64::INFINITY;
    let mut chosen: Vec<usize> = vec![];
    search(
        candidates,
        0,
        0,
        0.0,
        &mut chosen,
        &mut best,
        &mut best_covered,
        &mut best_distance,
    );
    best.iter().map(|i| candidates[*i].mask).collect()
}

#[allow(clippy::too_many_arguments)]
fn search(
    candidates: &[Candidate],
    index: usize,
    used: u64,
    distance: f64,
    chosen: &mut Vec<usize>,
    best: &mut Vec<usize>,
    best_covered: &mut u32,
    best_distance: &mut f64,
) {
    let covered = used.count_ones();
    let improves = covered > *best_covered
        || (covered == *best_covered && distance < *best_distance);
    if improves {
        *best_covered = covered;
        *best_distance = distance;
        *best = chosen.clone();
    }
    if index == candidates.len() {
        return;
    }
    // bound: all remaining cliques together cannot beat the best
    let remaining: u64 = candidates[index..]
        .iter()
        .fold(0, |acc, c| acc | c.mask);
    if covered + (remaining & !used).count_ones() < *best_covered {
        return;
    }
    let candidate = &candidates[index];
    if candidate.mask & used == 0 {
        chosen.push(index);
        search(
            candidates,
            index + 1,
            used | candidate.mask,
            distance + candidate.mean_distance,
            chosen,
            best,
            best_covered,
            best_distance,
        );
        chosen.pop();
    }
    search(
        candidates,
        index + 1,
        used,
        distance,
        chosen,
        best,
        best_covered,
        best_distance,
    );
}

fn greedy_cover(candidates: &[Candidate]) -> Vec<u64> {
    let mut used: u64 = 0;
    let mut cover: Vec<u64> = vec![];
    for candidate in candidates.iter() {
        if candidate.mask & used == 0 {
            used |= candidate.mask;
            cover.push(candidate.mask);
        }
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(i: usize, j: usize, distance: f64) -> TripPair {
        TripPair {
            i,
            j,
            deltas: [0.0; 4],
            distance,
        }
    }

    #[test]
    fn test_triangle_is_one_group() {
        let pairs = vec![pair(0, 1, 1.0), pair(0, 2, 1.0), pair(1, 2, 1.0)];
        let groups = find_joint_groups(3, &pairs, 20, 10_000);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_path_keeps_closer_pair() {
        // 0-1 and 1-2 compatible, 0-2 not: node 1 can only join one group
        let pairs = vec![pair(0, 1, 0.5), pair(1, 2, 2.0)];
        let groups = find_joint_groups(3, &pairs, 20, 10_000);
        assert_eq!(groups, vec![vec![0, 1]]);
    }

    #[test]
    fn test_groups_are_disjoint() {
        let pairs = vec![
            pair(0, 1, 1.0),
            pair(1, 2, 1.0),
            pair(2, 3, 1.0),
            pair(3, 4, 1.0),
        ];
        let groups = find_joint_groups(5, &pairs, 20, 10_000);
        let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn test_coverage_beats_clique_size() {
        // one triangle {0,1,2} overlapping two pairs {0,3} and {2,4}:
        // taking both pairs plus nothing else covers 4 trips, while the
        // triangle blocks both and covers 3
        let pairs = vec![
            pair(0, 1, 0.1),
            pair(0, 2, 0.1),
            pair(1, 2, 0.1),
            pair(0, 3, 5.0),
            pair(2, 4, 5.0),
        ];
        let groups = find_joint_groups(5, &pairs, 20, 10_000);
        let covered: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(covered, 4);
        assert!(groups.contains(&vec![0, 3]));
        assert!(groups.contains(&vec![2, 4]));
    }

    #[test]
    fn test_greedy_matches_ranking_order() {
        let pairs = vec![pair(0, 1, 0.5), pair(1, 2, 2.0)];
        // force the greedy path with a zero exact budget
        let groups = find_joint_groups(3, &pairs, 0, 10_000);
        assert_eq!(groups, vec![vec![0, 1]]);
    }

    #[test]
    fn test_budget_of_one_keeps_first_clique() {
        let pairs = vec![pair(0, 1, 1.0), pair(0, 2, 1.0), pair(1, 2, 1.0)];
        let groups = find_joint_groups(3, &pairs, 20, 1);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_enumeration_budget_still_yields_disjoint_groups() {
        // complete bipartite graph: no triangles, so every edge is a
        // maximal clique, nine in total. a budget of three stops the
        // enumeration early but the cover stays valid and disjoint
        let mut pairs = vec![];
        for i in 0..3 {
            for j in 3..6 {
                pairs.push(pair(i, j, 1.0));
            }
        }
        let groups = find_joint_groups(6, &pairs, 20, 3);
        assert!(!groups.is_empty());
        assert!(groups.iter().all(|g| g.len() == 2));
        let mut members: Vec<usize> = groups.iter().flatten().copied().collect();
        let total = members.len();
        members.sort();
        members.dedup();
        assert_eq!(members.len(), total);
    }

    #[test]
    fn test_no_pairs_no_groups() {
        assert!(find_joint_groups(4, &[], 20, 10_000).is_empty());
    }
}
