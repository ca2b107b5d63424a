mod boundaries;
mod builder;
mod location;
mod score_table;
mod subtours;
mod tour_config;
mod tour_error;

pub use boundaries::{home_based_spans, TourSpan};
pub use builder::build_person_day_tours;
pub use location::{classify_endpoints, classify_point};
pub use score_table::{ScoreTable, SCORE_BREAKPOINTS_MINUTES};
pub use subtours::{anchor_period, subtour_spans, SubtourSpan};
pub use tour_config::TourConfig;
pub use tour_error::TourError;
