use wayline_core::model::codebook::LocationType;

/// a closed out-and-back excursion from a tour's work or school anchor.
/// indices are relative to the parent tour's journey slice, inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct SubtourSpan {
    pub seq: u64,
    pub start: usize,
    pub end: usize,
}

/// the window within a tour during which the person is based at the
/// given anchor: from the first arrival at the anchor through the last
/// departure from it. journeys that merely pass the anchor on the way
/// out or home fall outside the window, so no subtour can be fabricated
/// from them.
pub fn anchor_period(
    kinds: &[(LocationType, LocationType)],
    anchor: LocationType,
) -> Option<(usize, usize)> {
    let first_arrival = kinds.iter().position(|(_, d)| *d == anchor)?;
    let last_departure = kinds.iter().rposition(|(o, _)| *o == anchor)?;
    if first_arrival < last_departure {
        Some((first_arrival, last_departure))
    } else {
        None
    }
}

/// scans the anchor period for closed excursions: a journey departing
/// the anchor opens a subtour, and the next arrival back at the anchor
/// closes it. an excursion that never returns is not a subtour.
pub fn subtour_spans(
    kinds: &[(LocationType, LocationType)],
    anchor: LocationType,
    period: (usize, usize),
) -> Vec<SubtourSpan> {
    let (first_arrival, last_departure) = period;
    let mut spans: Vec<SubtourSpan> = vec![];
    let mut open: Option<usize> = None;
    for i in (first_arrival + 1)..=last_departure {
        let (o_kind, d_kind) = kinds[i];
        if open.is_none() && o_kind == anchor && d_kind != anchor {
            open = Some(i);
        }
        if let Some(start) = open {
            if d_kind == anchor {
                spans.push(SubtourSpan {
                    seq: spans.len() as u64 + 1,
                    start,
                    end: i,
                });
                open = None;
            }
        }
    }
    spans
}
