use thiserror::Error;

/// Error types.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),

    #[error("command payload shorter than its sub-header")]
    TruncatedCommand,
}
