use std::fmt::Display;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TranspileError {
    #[error("Invalid segment `{segment}`: {reason}")]
    InvalidSegment { segment: String, reason: String },
}

impl TranspileError {
    pub fn invalid_segment<S: Display, R: ToString>(segment: S, reason: R) -> Self {
        Self::InvalidSegment {
            segment: segment.to_string(),
            reason: reason.to_string(),
        }
    }
}
