use thiserror::Error;

/// Rejected threshold configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("{name} threshold must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} threshold {value} is outside the similarity range [-1, 1]")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("strong threshold ({strong}) must be greater than weak threshold ({weak})")]
    NotOrdered { strong: f64, weak: f64 },
}
