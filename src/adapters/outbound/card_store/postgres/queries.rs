use crate::domain::card::{Card, CardAttributes, MtgColor};
use crate::domain::list::{CardListRequest, CardSummary};
use crate::domain::scan::ScoredCandidate;
use sqlx::postgres::PgRow;
use sqlx::{QueryBuilder, Row};

pub const SCHEMA_STATEMENTS: &[&str] = &[
    "create extension if not exists pg_trgm;",
    r#"
create table if not exists cards (
    storage_id uuid primary key default gen_random_uuid(),
    id         text not null unique,
    name       text not null,
    card_type  text not null,
    image_url  text,
    ink_cost   smallint,
    color      text,
    rarity     text not null
);
"#,
    "create index if not exists cards_name_trgm_idx on cards using gin (name gin_trgm_ops);",
    "create index if not exists cards_card_type_idx on cards (card_type);",
];

pub const COUNT_BY_TYPE: &str = "select count(*) from cards where card_type = $1";

// The relevance floor mirrors the text index contract: anything at or below
// a score of 90 never leaves the store.
pub const TEXT_SEARCH: &str = r#"
select id, name, image_url, (word_similarity(name, $1) * 100)::float8 as score
from cards
where word_similarity(name, $1) * 100 > 90
order by score desc
"#;

// One row per statement: a single multi-row insert cannot upsert the same
// id twice, and source batches may repeat an id.
pub const UPSERT_CARD: &str = r#"
insert into cards (id, name, card_type, image_url, ink_cost, color, rarity)
values ($1, $2, $3, $4, $5, $6, $7)
on conflict (id) do update set
    name = excluded.name,
    card_type = excluded.card_type,
    image_url = excluded.image_url,
    ink_cost = excluded.ink_cost,
    color = excluded.color,
    rarity = excluded.rarity
"#;

pub(crate) fn attribute_columns(card: &Card) -> (Option<i16>, Option<&'static str>, &'static str) {
    match &card.attributes {
        CardAttributes::Lorcana { ink_cost, rarity } => {
            (Some(i16::from(*ink_cost)), None, rarity.as_str())
        }
        CardAttributes::MagicTheGathering { color, rarity } => {
            (None, color.as_ref().map(MtgColor::as_str), rarity.as_str())
        }
    }
}

pub(crate) fn push_filters<'args>(
    builder: &mut QueryBuilder<'args, sqlx::Postgres>,
    request: &'args CardListRequest,
) {
    if let Some(card_type) = request.card_type {
        builder
            .push(" and card_type = ")
            .push_bind(card_type.as_str());
    }
    if let Some(query) = &request.query {
        builder.push(" and name ilike ").push_bind(format!("%{query}%"));
    }
    if request.ink_cost_from.is_some() || request.ink_cost_to.is_some() {
        let from = i16::from(request.ink_cost_from.unwrap_or(0));
        let to = i16::from(request.ink_cost_to.unwrap_or(10));
        builder
            .push(" and ink_cost between ")
            .push_bind(from)
            .push(" and ")
            .push_bind(to);
    }
    if let Some(color) = request.color {
        builder.push(" and color = ").push_bind(color.as_str());
    }
    if let Some(rarity) = &request.rarity {
        builder.push(" and rarity = ").push_bind(rarity.as_str());
    }
}

pub(crate) fn summary_from_row(row: &PgRow) -> Result<CardSummary, sqlx::Error> {
    Ok(CardSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
    })
}

pub(crate) fn candidate_from_row(row: &PgRow) -> Result<ScoredCandidate, sqlx::Error> {
    Ok(ScoredCandidate {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        image_url: row.try_get("image_url")?,
        score: row.try_get("score")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{CardType, LorcanaRarity, MtgRarity};

    fn lorcana_card() -> Card {
        Card {
            storage_id: None,
            id: String::from("lor-1"),
            name: String::from("Mickey Mouse"),
            image_url: None,
            attributes: CardAttributes::Lorcana {
                ink_cost: 3,
                rarity: LorcanaRarity::Rare,
            },
        }
    }

    #[test]
    fn test_attribute_columns_for_lorcana() {
        let (ink_cost, color, rarity) = attribute_columns(&lorcana_card());
        assert_eq!(ink_cost, Some(3));
        assert_eq!(color, None);
        assert_eq!(rarity, "Rare");
    }

    #[test]
    fn test_attribute_columns_for_mtg() {
        let card = Card {
            storage_id: None,
            id: String::from("mtg-1"),
            name: String::from("Lightning Bolt"),
            image_url: None,
            attributes: CardAttributes::MagicTheGathering {
                color: Some(MtgColor::R),
                rarity: MtgRarity::Common,
            },
        };
        let (ink_cost, color, rarity) = attribute_columns(&card);
        assert_eq!(ink_cost, None);
        assert_eq!(color, Some("R"));
        assert_eq!(rarity, "common");
    }

    #[test]
    fn test_push_filters_appends_each_active_filter() {
        let request = CardListRequest {
            card_type: Some(CardType::Lorcana),
            query: Some(String::from("mouse")),
            ink_cost_from: Some(1),
            ink_cost_to: Some(3),
            rarity: Some(String::from("Rare")),
            ..CardListRequest::default()
        };

        let mut builder = QueryBuilder::new("select count(*) from cards where true");
        push_filters(&mut builder, &request);
        let sql = builder.into_sql();

        assert!(sql.contains("card_type = $1"));
        assert!(sql.contains("name ilike $2"));
        assert!(sql.contains("ink_cost between $3 and $4"));
        assert!(sql.contains("rarity = $5"));
    }

    #[test]
    fn test_push_filters_is_a_noop_without_filters() {
        let mut builder = QueryBuilder::new("select count(*) from cards where true");
        let default_request = CardListRequest::default();
        push_filters(&mut builder, &default_request);
        assert_eq!(builder.into_sql(), "select count(*) from cards where true");
    }
}
