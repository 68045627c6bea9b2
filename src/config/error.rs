//! Errors raised by simulation settings.

/// Why a [`SimConfig`](super::SimConfig) or one of its parameter blocks was
/// rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read settings file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("cannot write settings file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The RON text is malformed or a field has the wrong type.
    #[error("malformed settings: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("cannot encode settings as RON: {0}")]
    SerializeError(#[source] ron::Error),

    /// A terrain or erosion parameter is non-finite or outside its range.
    #[error("invalid value for `{field}`: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Passes when `value` is finite and `ok` holds.
pub(crate) fn check(
    field: &'static str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), ConfigError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, expected })
    }
}
