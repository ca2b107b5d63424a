use wayline_core::model::codebook::{LocationType, TourCategory};

/// a contiguous run of journeys forming one home-based tour. indices are
/// positions in the person-day's journey list, inclusive on both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct TourSpan {
    pub tour_seq: u64,
    pub start: usize,
    pub end: usize,
    pub category: TourCategory,
}

/// segments a person-day into home-based tours. a tour opens at the
/// first journey of the day or the first journey after a return home,
/// and closes at the next arrival home. runs that never touch home at
/// one or both ends are kept and marked partial.
pub fn home_based_spans(kinds: &[(LocationType, LocationType)]) -> Vec<TourSpan> {
    let mut spans: Vec<TourSpan> = vec![];
    let mut open: Option<usize> = None;
    for (i, (_, d_kind)) in kinds.iter().enumerate() {
        let start = match open {
            Some(start) => start,
            None => {
                open = Some(i);
                i
            }
        };
        if *d_kind == LocationType::Home {
            spans.push(span(kinds, spans.len() as u64 + 1, start, i));
            open = None;
        }
    }
    if let Some(start) = open {
        spans.push(span(kinds, spans.len() as u64 + 1, start, kinds.len() - 1));
    }
    spans
}

fn span(
    kinds: &[(LocationType, LocationType)],
    tour_seq: u64,
    start: usize,
    end: usize,
) -> TourSpan {
    let starts_at_home = kinds[start].0 == LocationType::Home;
    let ends_at_home = kinds[end].1 == LocationType::Home;
    TourSpan {
        tour_seq,
        start,
        end,
        category: TourCategory::from_boundaries(starts_at_home, ends_at_home),
    }
}
