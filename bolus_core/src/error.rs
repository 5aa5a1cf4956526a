use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DoseError {
    /// A settings value that makes the calculation meaningless (ISF <= 0, TDD <= 0, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Text that does not name a known meal, tag or unit mode.
    #[error("unknown {kind}: {value:?}")]
    UnknownValue { kind: &'static str, value: String },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Shorthand for the fail-fast configuration error.
#[inline]
pub(crate) fn invalid(msg: &'static str) -> Report {
    Report::new(DoseError::InvalidParameter(msg))
}
