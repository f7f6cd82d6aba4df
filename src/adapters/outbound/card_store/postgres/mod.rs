mod queries;

use crate::adapters::outbound::card_store::postgres::queries::{
    attribute_columns, candidate_from_row, push_filters, summary_from_row, COUNT_BY_TYPE,
    SCHEMA_STATEMENTS, TEXT_SEARCH, UPSERT_CARD,
};
use crate::domain::card::{Card, CardType};
use crate::domain::list::{CardListRequest, CardListResponse, Pagination};
use crate::domain::scan::ScoredCandidate;
use crate::ports::outbound::card_store::{CardStore, CardStoreError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, QueryBuilder};

pub struct Postgres {
    pool: Pool<sqlx::Postgres>,
}

impl Postgres {
    pub async fn connect(uri: &str) -> Result<Self, CardStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(uri)
            .await
            .map_err(|why| CardStoreError::new(format!("failed postgres connection: {why}")))?;

        Ok(Self { pool })
    }

    /// Creates the cards relation and its indexes when missing.
    pub async fn ensure_schema(&self) -> Result<(), CardStoreError> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|why| CardStoreError::new(format!("failed schema statement: {why}")))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CardStore for Postgres {
    async fn count_by_type(&self, card_type: CardType) -> Result<u64, CardStoreError> {
        let count: i64 = sqlx::query_scalar(COUNT_BY_TYPE)
            .bind(card_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|why| CardStoreError::new(format!("failed card count fetch: {why}")))?;

        Ok(count as u64)
    }

    async fn bulk_upsert(&self, cards: Vec<Card>) -> Result<(), CardStoreError> {
        if cards.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|why| CardStoreError::new(format!("failed upsert transaction begin: {why}")))?;

        for card in &cards {
            let (ink_cost, color, rarity) = attribute_columns(card);
            sqlx::query(UPSERT_CARD)
                .bind(card.id.as_str())
                .bind(card.name.as_str())
                .bind(card.card_type().as_str())
                .bind(card.image_url.as_deref())
                .bind(ink_cost)
                .bind(color)
                .bind(rarity)
                .execute(&mut *tx)
                .await
                .map_err(|why| CardStoreError::new(format!("failed card upsert: {why}")))?;
        }

        tx.commit()
            .await
            .map_err(|why| CardStoreError::new(format!("failed upsert transaction commit: {why}")))?;

        Ok(())
    }

    async fn text_search(&self, term: &str) -> Result<Vec<ScoredCandidate>, CardStoreError> {
        let rows = sqlx::query(TEXT_SEARCH)
            .bind(term)
            .fetch_all(&self.pool)
            .await
            .map_err(|why| CardStoreError::new(format!("failed text search fetch: {why}")))?;

        rows.iter()
            .map(candidate_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|why| CardStoreError::new(format!("failed text search row decode: {why}")))
    }

    async fn find_cards(
        &self,
        request: &CardListRequest,
    ) -> Result<CardListResponse, CardStoreError> {
        let mut count_query = QueryBuilder::new("select count(*) from cards where true");
        push_filters(&mut count_query, request);
        let total_items: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|why| CardStoreError::new(format!("failed card count fetch: {why}")))?;
        let total_items = total_items as u64;

        let limit = i64::from(request.items_per_page);
        let offset = i64::from(request.page - 1) * i64::from(request.items_per_page);

        let mut select_query =
            QueryBuilder::new("select id, name, image_url from cards where true");
        push_filters(&mut select_query, request);
        select_query
            .push(" order by name limit ")
            .push_bind(limit)
            .push(" offset ")
            .push_bind(offset);

        let rows = select_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|why| CardStoreError::new(format!("failed card list fetch: {why}")))?;
        let items = rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|why| CardStoreError::new(format!("failed card list row decode: {why}")))?;

        Ok(CardListResponse {
            items,
            pagination: Pagination {
                page: request.page,
                items_per_page: request.items_per_page,
                total_items,
                total_pages: total_items.div_ceil(u64::from(request.items_per_page)),
            },
        })
    }
}
