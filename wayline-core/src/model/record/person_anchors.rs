use geo::Point;
use serde::{Deserialize, Serialize};

/// a person's usual locations, produced by the upstream demographic and
/// geocoding stages. any anchor may be absent; classification against a
/// missing anchor degrades to Other for that type only.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PersonAnchors {
    pub home: Option<Point<f64>>,
    pub work: Option<Point<f64>>,
    pub school: Option<Point<f64>>,
}

impl PersonAnchors {
    pub fn new(
        home: Option<Point<f64>>,
        work: Option<Point<f64>>,
        school: Option<Point<f64>>,
    ) -> PersonAnchors {
        PersonAnchors { home, work, school }
    }
}
