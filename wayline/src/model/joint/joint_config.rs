use super::JointError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// how a pair of trips is judged to be the same physical trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// each of the four deltas must fall strictly under its threshold
    Buffer,
    /// squared mahalanobis distance under a chi-squared quantile
    Mahalanobis,
}

/// parameters controlling joint trip detection within a household-day.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JointConfig {
    pub method: SimilarityMethod,
    /// buffer method: endpoint separation limit
    pub buffer_distance_meters: f64,
    /// buffer method: departure and arrival offset limit
    pub buffer_time_minutes: f64,
    /// mahalanobis method: variances for origin and destination
    /// separation (meters squared) and departure and arrival offsets
    /// (minutes squared)
    pub covariance_diagonal: [f64; 4],
    /// full 4x4 covariance override; takes precedence over the diagonal
    pub covariance: Option<Vec<Vec<f64>>>,
    /// mahalanobis method: confidence level for the chi-squared
    /// acceptance region (4 degrees of freedom). higher is stricter:
    /// 0.90 accepts only the bottom 10% of squared distances
    pub confidence_level: f64,
    /// households with more candidate trips than this skip exact clique
    /// enumeration in favor of greedy grouping
    pub max_graph_nodes: usize,
    /// covers over more maximal cliques than this are selected greedily
    pub max_exact_cliques: usize,
    /// clique enumeration stops once this many maximal cliques have
    /// been found; dense compatibility graphs fall back to a greedy
    /// cover over the cliques found so far
    pub max_enumerated_cliques: usize,
}

impl Default for JointConfig {
    fn default() -> Self {
        JointConfig {
            method: SimilarityMethod::Mahalanobis,
            buffer_distance_meters: 100.0,
            buffer_time_minutes: 15.0,
            covariance_diagonal: [7000.0, 7000.0, 20.0, 20.0],
            covariance: None,
            confidence_level: 0.90,
            max_graph_nodes: 64,
            max_exact_cliques: 20,
            max_enumerated_cliques: 10_000,
        }
    }
}

impl JointConfig {
    pub fn validate(&self) -> Result<(), JointError> {
        if self.buffer_distance_meters <= 0.0 || self.buffer_time_minutes <= 0.0 {
            return Err(JointError::ConfigurationError(format!(
                "buffer thresholds must be positive, found {}m / {}min",
                self.buffer_distance_meters, self.buffer_time_minutes
            )));
        }
        if !(0.0 < self.confidence_level && self.confidence_level < 1.0) {
            return Err(JointError::ConfigurationError(format!(
                "confidence_level must fall in (0, 1), found {}",
                self.confidence_level
            )));
        }
        if self.max_graph_nodes > 64 {
            return Err(JointError::ConfigurationError(format!(
                "max_graph_nodes may not exceed 64, found {}",
                self.max_graph_nodes
            )));
        }
        if self.max_enumerated_cliques == 0 {
            return Err(JointError::ConfigurationError(String::from(
                "max_enumerated_cliques must be at least 1",
            )));
        }
        self.covariance_matrix()?;
        self.chi_squared_threshold().map(|_| ())
    }

    /// the squared-distance acceptance threshold: the chi-squared
    /// quantile at `1 - confidence_level` with 4 degrees of freedom, so
    /// raising the confidence shrinks the acceptance region.
    pub fn chi_squared_threshold(&self) -> Result<f64, JointError> {
        let dist = ChiSquared::new(4.0).map_err(|e| {
            JointError::ConfigurationError(format!("chi-squared distribution: {}", e))
        })?;
        Ok(dist.inverse_cdf(1.0 - self.confidence_level))
    }

    pub fn covariance_matrix(&self) -> Result<[[f64; 4]; 4], JointError> {
        match &self.covariance {
            None => {
                let d = self.covariance_diagonal;
                if d.iter().any(|v| *v <= 0.0) {
                    return Err(JointError::ConfigurationError(format!(
                        "covariance diagonal must be positive, found {:?}",
                        d
                    )));
                }
                Ok([
                    [d[0], 0.0, 0.0, 0.0],
                    [0.0, d[1], 0.0, 0.0],
                    [0.0, 0.0, d[2], 0.0],
                    [0.0, 0.0, 0.0, d[3]],
                ])
            }
            Some(rows) => {
                if rows.len() != 4 || rows.iter().any(|r| r.len() != 4) {
                    return Err(JointError::ConfigurationError(String::from(
                        "covariance override must be a 4x4 matrix",
                    )));
                }
                let mut m = [[0.0; 4]; 4];
                for (i, row) in rows.iter().enumerate() {
                    for (j, v) in row.iter().enumerate() {
                        m[i][j] = *v;
                    }
                }
                Ok(m)
            }
        }
    }
}
