use crate::domain::card::{Card, CardType};
use crate::domain::list::{CardListRequest, CardListResponse};
use crate::domain::scan::ScoredCandidate;
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
#[error("card store operation failed: {0}")]
pub struct CardStoreError(String);

impl CardStoreError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self(msg)
    }
}

/// Persistent card collection. Writes are idempotent upserts keyed by the
/// external card `id`; `text_search` takes exactly one search term per call
/// and returns only candidates scoring above the store's relevance floor.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CardStore {
    async fn count_by_type(&self, card_type: CardType) -> Result<u64, CardStoreError>;
    async fn bulk_upsert(&self, cards: Vec<Card>) -> Result<(), CardStoreError>;
    async fn text_search(&self, term: &str) -> Result<Vec<ScoredCandidate>, CardStoreError>;
    async fn find_cards(&self, request: &CardListRequest)
        -> Result<CardListResponse, CardStoreError>;
}
