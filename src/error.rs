use thiserror::Error;

/// Validation errors for trade records.
///
/// These fire at construction time, before a record can enter the fold;
/// the engine itself has no fatal paths.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("trade size must be positive, got {0}")]
    NonPositiveSize(String),
    #[error("trade price must be positive, got {0}")]
    NonPositivePrice(String),
    #[error("trade fee must not be negative, got {0}")]
    NegativeFee(String),
    #[error("unknown trade side: {0}")]
    UnknownSide(String),
}
