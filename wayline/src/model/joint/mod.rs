mod cliques;
mod detector;
mod joint_config;
mod joint_error;
mod similarity;

pub use cliques::find_joint_groups;
pub use detector::detect_household_day;
pub use joint_config::{JointConfig, SimilarityMethod};
pub use joint_error::JointError;
pub use similarity::{
    buffer_pairs, candidate_pairs, invert_covariance, mahalanobis_pairs, TripPair,
};
