use super::TourError;
use std::collections::HashMap;
use wayline_core::model::codebook::PurposeCategory;

/// lookup breakpoints for the purpose score curves, in minutes.
pub const SCORE_BREAKPOINTS_MINUTES: [f64; 9] =
    [0.0, 60.0, 120.0, 180.0, 240.0, 300.0, 360.0, 420.0, 480.0];

/// piecewise-linear impedance curves used to rank candidate primary
/// destinations. lower scores indicate a stronger candidate. mandatory
/// purposes carry low curves so a short work stop outranks a long
/// discretionary one.
#[derive(Clone, Debug)]
pub struct ScoreTable {
    rows: HashMap<PurposeCategory, [f64; 9]>,
    default_row: [f64; 9],
}

impl Default for ScoreTable {
    fn default() -> Self {
        let mut rows: HashMap<PurposeCategory, [f64; 9]> = HashMap::new();
        let work = [40.0, 28.0, 18.0, 12.0, 8.0, 6.0, 4.0, 3.0, 2.0];
        let school = [50.0, 36.0, 25.0, 17.0, 12.0, 9.0, 7.0, 6.0, 5.0];
        let escort = [60.0, 48.0, 38.0, 30.0, 25.0, 21.0, 18.0, 16.0, 15.0];
        let maintenance = [70.0, 58.0, 48.0, 40.0, 34.0, 30.0, 27.0, 25.0, 24.0];
        rows.insert(PurposeCategory::Work, work);
        rows.insert(PurposeCategory::WorkRelated, work);
        rows.insert(PurposeCategory::School, school);
        rows.insert(PurposeCategory::SchoolRelated, school);
        rows.insert(PurposeCategory::Escort, escort);
        rows.insert(PurposeCategory::Shop, maintenance);
        rows.insert(PurposeCategory::Meal, maintenance);
        rows.insert(PurposeCategory::SocialRec, maintenance);
        rows.insert(PurposeCategory::Errand, maintenance);
        ScoreTable {
            rows,
            default_row: [90.0, 82.0, 75.0, 70.0, 66.0, 63.0, 61.0, 60.0, 60.0],
        }
    }
}

impl ScoreTable {
    /// builds a table from per-purpose overrides, validating row lengths.
    pub fn try_from_rows(
        rows: &HashMap<PurposeCategory, Vec<f64>>,
        default_row: &[f64],
    ) -> Result<ScoreTable, TourError> {
        let mut table = ScoreTable::default();
        for (purpose, row) in rows.iter() {
            table.rows.insert(*purpose, fixed_row(row)?);
        }
        if !default_row.is_empty() {
            table.default_row = fixed_row(default_row)?;
        }
        Ok(table)
    }

    /// scores a candidate destination via linear interpolation along the
    /// purpose's curve. lookups are clamped to the breakpoint range.
    pub fn score(&self, purpose: &PurposeCategory, lookup_minutes: f64) -> f64 {
        let row = self.rows.get(purpose).unwrap_or(&self.default_row);
        let last = SCORE_BREAKPOINTS_MINUTES.len() - 1;
        if lookup_minutes <= SCORE_BREAKPOINTS_MINUTES[0] {
            return row[0];
        }
        if lookup_minutes >= SCORE_BREAKPOINTS_MINUTES[last] {
            return row[last];
        }
        let step = SCORE_BREAKPOINTS_MINUTES[1] - SCORE_BREAKPOINTS_MINUTES[0];
        let idx = ((lookup_minutes / step) as usize).min(last - 1);
        let x0 = SCORE_BREAKPOINTS_MINUTES[idx];
        let frac = (lookup_minutes - x0) / step;
        row[idx] + frac * (row[idx + 1] - row[idx])
    }
}

fn fixed_row(row: &[f64]) -> Result<[f64; 9], TourError> {
    let arr: [f64; 9] = row.try_into().map_err(|_| {
        TourError::ConfigurationError(format!(
            "score rows must carry exactly {} values, found {}",
            SCORE_BREAKPOINTS_MINUTES.len(),
            row.len()
        ))
    })?;
    Ok(arr)
}
