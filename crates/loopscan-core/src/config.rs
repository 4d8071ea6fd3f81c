/// Run configuration for a detection pass.
///
/// A [`RunConfiguration`] can be built freely, including with out-of-range
/// values; [`RunConfiguration::validate`] is what the coordinator calls before
/// the first superstep. The vertex program itself applies whatever bounds it
/// is handed.
use serde::{Deserialize, Serialize};

use crate::dataset::VertexId;

/// Smallest `min_cycle_length` a run accepts.
pub const MIN_CYCLE_LENGTH_FLOOR: usize = 2;

/// Default lower bound on reported cycle length.
pub const DEFAULT_MIN_CYCLE_LENGTH: usize = 3;

/// Default exclusive cap on token path length.
pub const DEFAULT_MAX_CYCLE_LENGTH: usize = 5;

/// Default safety bound on the number of supersteps.
pub const DEFAULT_MAX_SUPERSTEPS: u64 = 100;

/// Invalid [`RunConfiguration`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `min_cycle_length` is below [`MIN_CYCLE_LENGTH_FLOOR`].
    #[error("min cycle length must be at least {MIN_CYCLE_LENGTH_FLOOR}, got {0}")]
    MinCycleLengthTooSmall(usize),
    /// `max_cycle_length < min_cycle_length`.
    #[error("max cycle length {max} is smaller than min cycle length {min}")]
    MaxBelowMin {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },
    /// `max_supersteps` is zero.
    #[error("max supersteps must be at least 1")]
    ZeroSupersteps,
    /// `workers` is zero.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

/// Parameters of one detection run. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfiguration {
    /// Vertex every reported cycle passes through.
    pub source: VertexId,
    /// Shortest cycle (in edges) that is reported.
    #[serde(default = "default_min")]
    pub min_cycle_length: usize,
    /// Tokens whose path reaches this many vertices without closing are
    /// dropped.
    #[serde(default = "default_max")]
    pub max_cycle_length: usize,
    /// Hard bound on the number of rounds.
    #[serde(default = "default_supersteps")]
    pub max_supersteps: u64,
    /// Threads used to run the vertex program within a round. `1` runs on
    /// the calling thread.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_min() -> usize {
    DEFAULT_MIN_CYCLE_LENGTH
}

fn default_max() -> usize {
    DEFAULT_MAX_CYCLE_LENGTH
}

fn default_supersteps() -> u64 {
    DEFAULT_MAX_SUPERSTEPS
}

fn default_workers() -> usize {
    1
}

impl RunConfiguration {
    /// Creates a configuration for `source` with the default bounds.
    pub fn new(source: VertexId) -> Self {
        Self {
            source,
            min_cycle_length: DEFAULT_MIN_CYCLE_LENGTH,
            max_cycle_length: DEFAULT_MAX_CYCLE_LENGTH,
            max_supersteps: DEFAULT_MAX_SUPERSTEPS,
            workers: 1,
        }
    }

    /// Sets both cycle-length bounds.
    #[must_use]
    pub fn with_lengths(mut self, min: usize, max: usize) -> Self {
        self.min_cycle_length = min;
        self.max_cycle_length = max;
        self
    }

    /// Sets the superstep bound.
    #[must_use]
    pub fn with_max_supersteps(mut self, max_supersteps: u64) -> Self {
        self.max_supersteps = max_supersteps;
        self
    }

    /// Sets the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Checks every bound.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle_length < MIN_CYCLE_LENGTH_FLOOR {
            return Err(ConfigError::MinCycleLengthTooSmall(self.min_cycle_length));
        }
        if self.max_cycle_length < self.min_cycle_length {
            return Err(ConfigError::MaxBelowMin {
                min: self.min_cycle_length,
                max: self.max_cycle_length,
            });
        }
        if self.max_supersteps == 0 {
            return Err(ConfigError::ZeroSupersteps);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn config(source: &str) -> RunConfiguration {
        RunConfiguration::new(VertexId::try_from(source).expect("valid id"))
    }

    #[test]
    fn defaults_are_valid() {
        let c = config("A");
        assert_eq!(c.min_cycle_length, 3);
        assert_eq!(c.max_cycle_length, 5);
        assert_eq!(c.max_supersteps, 100);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn min_below_two_is_rejected() {
        let c = config("A").with_lengths(1, 5);
        assert_eq!(c.validate(), Err(ConfigError::MinCycleLengthTooSmall(1)));
    }

    #[test]
    fn max_below_min_is_rejected() {
        let c = config("A").with_lengths(4, 3);
        assert_eq!(
            c.validate(),
            Err(ConfigError::MaxBelowMin { min: 4, max: 3 })
        );
    }

    #[test]
    fn max_equal_to_min_is_accepted() {
        assert_eq!(config("A").with_lengths(3, 3).validate(), Ok(()));
    }

    #[test]
    fn zero_supersteps_and_workers_are_rejected() {
        assert_eq!(
            config("A").with_max_supersteps(0).validate(),
            Err(ConfigError::ZeroSupersteps)
        );
        assert_eq!(
            config("A").with_workers(0).validate(),
            Err(ConfigError::ZeroWorkers)
        );
    }

    #[test]
    fn json_fills_defaults_for_missing_fields() {
        let c: RunConfiguration =
            serde_json::from_str(r#"{"source": "A", "max_cycle_length": 7}"#).expect("parses");
        assert_eq!(c.source.as_str(), "A");
        assert_eq!(c.min_cycle_length, DEFAULT_MIN_CYCLE_LENGTH);
        assert_eq!(c.max_cycle_length, 7);
        assert_eq!(c.workers, 1);
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let res: Result<RunConfiguration, _> =
            serde_json::from_str(r#"{"source": "A", "max_length": 7}"#);
        assert!(res.is_err());
    }

    #[test]
    fn error_messages_name_the_values() {
        let msg = ConfigError::MaxBelowMin { min: 4, max: 2 }.to_string();
        assert!(msg.contains('4') && msg.contains('2'), "{msg}");
    }
}
