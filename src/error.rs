//! Error types for sampling, cloning, and source configuration.

use thiserror::Error;

/// Invalid sample request, the crate's range error.
///
/// Both variants describe a `count` that cannot be satisfied by the input
/// sequence; the sequence itself is never the problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleError {
    /// The requested count is below 1 or above the sequence length.
    #[error("count {count} not in range of 1..{len}")]
    CountOutOfRange {
        /// The requested count.
        count: f64,
        /// Length of the sequence sampled from.
        len: usize,
    },

    /// The requested count is in range but has a fractional part (or is NaN).
    #[error("count must be an integer, got {count}")]
    NonIntegerCount {
        /// The requested count.
        count: f64,
    },
}

impl SampleError {
    /// The count that was rejected.
    pub fn count(&self) -> f64 {
        match self {
            Self::CountOutOfRange { count, .. } | Self::NonIntegerCount { count } => *count,
        }
    }
}

/// Failure while deep-cloning a container graph.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CloneError {
    /// A container was reached again while it was still being copied.
    #[error("cycle detected at depth {depth}")]
    Cycle {
        /// Nesting depth (0 = root) at which the back-reference was found.
        depth: usize,
    },
}

/// Invalid random source configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The seed could not be parsed as an unsigned 64-bit integer.
    #[error("invalid seed {value:?}: expected an unsigned 64-bit integer")]
    InvalidSeed {
        /// The raw value that failed to parse.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = SampleError::CountOutOfRange { count: 6.0, len: 5 };
        assert_eq!(err.to_string(), "count 6 not in range of 1..5");
        assert_eq!(err.count(), 6.0);
    }

    #[test]
    fn test_non_integer_message() {
        let err = SampleError::NonIntegerCount { count: 2.5 };
        assert_eq!(err.to_string(), "count must be an integer, got 2.5");
        assert_eq!(err.count(), 2.5);
    }

    #[test]
    fn test_cycle_message() {
        let err = CloneError::Cycle { depth: 3 };
        assert_eq!(err.to_string(), "cycle detected at depth 3");
    }

    #[test]
    fn test_invalid_seed_message() {
        let err = ConfigError::InvalidSeed {
            value: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid seed \"abc\": expected an unsigned 64-bit integer"
        );
    }
}
