use crate::domain::scan::ScanOutcome;
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
#[error("card scan failed: {0}")]
pub struct ScannerError(String);

impl ScannerError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self(msg)
    }
}

/// External OCR service. Takes a card photograph and returns the text blocks
/// it could read, each with a confidence and a bounding box.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardScanner {
    async fn scan(&self, image: Vec<u8>) -> Result<ScanOutcome, ScannerError>;
}
