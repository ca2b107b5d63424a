mod household_day;
mod ids;
mod joint_trip;
mod linked_trip;
mod person_anchors;
mod tour;
mod unlinked_trip;

pub use household_day::{HouseholdDay, PersonDay};
pub use ids::{JointTripId, LinkedTripId, TourId};
pub use joint_trip::JointTrip;
pub use linked_trip::LinkedTrip;
pub use person_anchors::PersonAnchors;
pub use tour::Tour;
pub use unlinked_trip::UnlinkedTrip;
