//! Error types for training and inference.
//!
//! All fallible operations either return a fully valid result or fail fast
//! with one of three kinds: invalid input, a tripped resource guard, or an
//! internal invariant violation (a defect signal, never expected in correct
//! operation).

/// Input validation error.
///
/// Raised before any training or inference work starts; the offending
/// quantities are carried in the variant fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Training requires at least one sample.
    #[error("training set must contain at least one sample")]
    NoSamples,

    /// Training requires at least one feature.
    #[error("training set must contain at least one feature")]
    NoFeatures,

    /// Label vector length must equal the number of samples.
    #[error("labels length {labels} does not match sample count {samples}")]
    LabelCountMismatch { labels: usize, samples: usize },

    /// Inference input must have the same width as the training data.
    #[error("expected {expected} features per sample, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    /// Scoring an empty evaluation set would divide by zero.
    #[error("cannot score an empty evaluation set")]
    EmptyEvaluationSet,

    /// An ensemble needs at least one member.
    #[error("n_estimators must be > 0")]
    NoEstimators,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The caller handed in data or parameters that fail validation.
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// The configured depth guard tripped while growing a tree.
    ///
    /// Only possible when a `depth_limit` is set; the default configuration
    /// never returns this.
    #[error("depth limit {limit} exceeded while growing a tree")]
    ResourceExceeded { limit: u32 },

    /// Internal consistency failure.
    ///
    /// Indicates a defect in the library, not in the caller's input.
    #[error("internal invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_converts_to_error() {
        let err: Error = InputError::NoSamples.into();
        assert_eq!(err, Error::InvalidInput(InputError::NoSamples));
    }

    #[test]
    fn messages_name_the_offending_quantities() {
        let err = InputError::LabelCountMismatch {
            labels: 3,
            samples: 5,
        };
        assert_eq!(
            err.to_string(),
            "labels length 3 does not match sample count 5"
        );

        let err = Error::ResourceExceeded { limit: 16 };
        assert_eq!(
            err.to_string(),
            "depth limit 16 exceeded while growing a tree"
        );
    }
}
