use crate::domain::app::App;
use crate::ports::outbound::card_store::{CardStore, CardStoreError};
use crate::ports::outbound::scanner::{CardScanner, ScannerError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OCR blocks below this confidence are too noisy to search on.
pub const MIN_BLOCK_CONFIDENCE: f64 = 0.60;

/// OCR blocks at or above this length are rules text, not a card name.
pub const MAX_BLOCK_TEXT_LEN: usize = 256;

pub const MAX_NAME_CANDIDATES: usize = 3;

/// One text block read off the photograph, with the bounding box corners in
/// relative page coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanBlock {
    pub text: String,
    pub confidence: f64,
    pub location: [[f64; 2]; 2],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanOutcome {
    pub success: bool,
    pub text: String,
    pub blocks: Vec<ScanBlock>,
}

/// A catalog candidate with its relevance score. The score is a unitless
/// rank used for ordering, never surfaced to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMatch {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<ScoredCandidate> for ScanMatch {
    fn from(candidate: ScoredCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            image_url: candidate.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub items: Vec<ScanMatch>,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Scanner(#[from] ScannerError),
    #[error(transparent)]
    Store(#[from] CardStoreError),
}

/// Picks the block texts worth searching: confident, name-sized, at most
/// the first three.
#[must_use]
pub fn name_candidates(blocks: &[ScanBlock]) -> Vec<String> {
    blocks
        .iter()
        .filter(|block| {
            block.confidence > MIN_BLOCK_CONFIDENCE
                && block.text.chars().count() < MAX_BLOCK_TEXT_LEN
        })
        .take(MAX_NAME_CANDIDATES)
        .map(|block| block.text.clone())
        .collect()
}

impl<CS, SC> App<CS, SC>
where
    CS: CardStore + Send + Sync,
    SC: CardScanner + Send + Sync,
{
    /// Matches a photographed card against the catalog: OCR the image, keep
    /// the usable blocks, rank catalog candidates by name.
    pub async fn scan_card(&self, image: Vec<u8>) -> Result<Vec<ScanMatch>, ScanError> {
        let outcome = self.scanner.scan(image).await?;
        let names = name_candidates(&outcome.blocks);
        log::info!(
            "scan produced {} name candidates from {} blocks",
            names.len(),
            outcome.blocks.len()
        );

        let shortlist = self.match_names(&names).await?;
        Ok(shortlist.into_iter().map(ScanMatch::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::card_store::MockCardStore;
    use crate::ports::outbound::scanner::MockCardScanner;

    fn block(text: &str, confidence: f64) -> ScanBlock {
        ScanBlock {
            text: String::from(text),
            confidence,
            location: [[0.1, 0.1], [0.9, 0.2]],
        }
    }

    #[test]
    fn test_low_confidence_blocks_are_dropped() {
        let blocks = vec![block("Mickey Mouse", 0.95), block("smudge", 0.30)];
        assert_eq!(name_candidates(&blocks), vec![String::from("Mickey Mouse")]);
    }

    #[test]
    fn test_confidence_floor_is_exclusive() {
        let blocks = vec![block("Mickey Mouse", 0.60)];
        assert!(name_candidates(&blocks).is_empty());
    }

    #[test]
    fn test_oversized_blocks_are_dropped() {
        let rules_text = "a".repeat(256);
        let blocks = vec![block(&rules_text, 0.99), block("Mickey Mouse", 0.95)];
        assert_eq!(name_candidates(&blocks), vec![String::from("Mickey Mouse")]);
    }

    #[test]
    fn test_at_most_three_names_are_kept() {
        let blocks = vec![
            block("one", 0.9),
            block("two", 0.9),
            block("three", 0.9),
            block("four", 0.9),
        ];
        assert_eq!(
            name_candidates(&blocks),
            vec![
                String::from("one"),
                String::from("two"),
                String::from("three")
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_card_strips_scores_from_the_shortlist() {
        let mut scanner = MockCardScanner::new();
        scanner.expect_scan().returning(|_| {
            Ok(ScanOutcome {
                success: true,
                text: String::from("Mickey Mouse"),
                blocks: vec![block("Mickey Mouse", 0.95)],
            })
        });
        let mut store = MockCardStore::new();
        store
            .expect_text_search()
            .withf(|term| term == "Mickey Mouse")
            .returning(|_| {
                Ok(vec![ScoredCandidate {
                    id: String::from("A"),
                    name: String::from("Mickey Mouse"),
                    image_url: Some(String::from("https://cards.example/a.png")),
                    score: 95.0,
                }])
            });
        let app = App::new(store, scanner);

        let matches = app.scan_card(vec![0xFF, 0xD8]).await.unwrap();

        assert_eq!(
            matches,
            vec![ScanMatch {
                id: String::from("A"),
                name: String::from("Mickey Mouse"),
                image_url: Some(String::from("https://cards.example/a.png")),
            }]
        );
    }

    #[tokio::test]
    async fn test_unreadable_photo_queries_nothing() {
        let mut scanner = MockCardScanner::new();
        scanner.expect_scan().returning(|_| {
            Ok(ScanOutcome {
                success: true,
                text: String::new(),
                blocks: vec![block("blur", 0.10)],
            })
        });
        let mut store = MockCardStore::new();
        store.expect_text_search().never();
        let app = App::new(store, scanner);

        let matches = app.scan_card(vec![0xFF, 0xD8]).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_scanner_failure_propagates() {
        let mut scanner = MockCardScanner::new();
        scanner
            .expect_scan()
            .returning(|_| Err(ScannerError::new(String::from("api returned 500"))));
        let app = App::new(MockCardStore::new(), scanner);

        let result = app.scan_card(vec![0xFF, 0xD8]).await;
        assert!(matches!(result, Err(ScanError::Scanner(_))));
    }
}
