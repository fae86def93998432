//! Error taxonomy for fallible engine operations.
//!
//! Recoverable domain conditions (unresolved participant ids, a full
//! roster on seat placement) are not errors: they are logged and surfaced
//! as outcome values by the APIs that hit them.

/// Convenience result type used across the seating crates.
pub type SeatResult<T> = Result<T, SeatError>;

#[derive(thiserror::Error, Debug)]
pub enum SeatError {
    /// A layout format tag that is not one of the nine known tags.
    #[error("unknown layout format `{0}`")]
    UnknownFormat(String),

    /// An object type tag that is not one of the placeable types.
    #[error("unknown object type `{0}`")]
    UnknownObjectType(String),

    /// The preference backend refused a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// The rendering surface could not be captured.
    #[error("capture failed: {0}")]
    Capture(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SeatError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_tag() {
        let err = SeatError::UnknownFormat("mesa_x".into());
        assert_eq!(err.to_string(), "unknown layout format `mesa_x`");

        let err = SeatError::capture("viewport has zero area");
        assert_eq!(err.to_string(), "capture failed: viewport has zero area");
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: SeatError = parse.unwrap_err().into();
        assert!(matches!(err, SeatError::Json(_)));
    }
}
