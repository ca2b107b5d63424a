mod driver_status;
mod half_tour;
mod location_type;
mod mode_type;
mod purpose_category;
mod tour_category;

pub use driver_status::DriverStatus;
pub use half_tour::HalfTour;
pub use location_type::LocationType;
pub use mode_type::ModeType;
pub use purpose_category::PurposeCategory;
pub use tour_category::TourCategory;
