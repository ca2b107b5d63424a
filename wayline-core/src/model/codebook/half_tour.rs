use serde::{Deserialize, Serialize};

/// position of a linked trip relative to its tour's primary destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfTour {
    /// before the first arrival at the primary destination
    Outbound,
    /// after the final departure from the primary destination
    Inbound,
    /// wholly inside an anchor-based sub-tour
    Subtour,
}
