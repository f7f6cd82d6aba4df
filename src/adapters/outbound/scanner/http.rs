use crate::domain::scan::ScanOutcome;
use crate::ports::outbound::scanner::{CardScanner, ScannerError};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

pub struct HttpScanner {
    client: reqwest::Client,
    scan_url: String,
}

impl HttpScanner {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::new(30, 0))
            .build()
            .expect("Failed HTTP Client build");

        Self {
            client,
            scan_url: format!("{}/scan?simple=true", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl CardScanner for HttpScanner {
    async fn scan(&self, image: Vec<u8>) -> Result<ScanOutcome, ScannerError> {
        let form = Form::new().part("file", Part::bytes(image).file_name("card"));

        let response = self
            .client
            .post(&self.scan_url)
            .multipart(form)
            .send()
            .await
            .map_err(|why| ScannerError::new(format!("scan request failed: {why}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScannerError::new(format!(
                "scan api returned {status}: {body}"
            )));
        }

        response
            .json::<ScanOutcome>()
            .await
            .map_err(|why| ScannerError::new(format!("invalid scan response: {why}")))
    }
}
