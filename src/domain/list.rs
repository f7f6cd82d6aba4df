use crate::domain::app::App;
use crate::domain::card::{CardType, LorcanaRarity, MtgColor, MtgRarity};
use crate::ports::outbound::card_store::{CardStore, CardStoreError};
use crate::ports::outbound::scanner::CardScanner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_ITEMS_PER_PAGE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardListRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    pub query: Option<String>,
    pub card_type: Option<CardType>,
    pub ink_cost_from: Option<u8>,
    pub ink_cost_to: Option<u8>,
    pub color: Option<MtgColor>,
    pub rarity: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_items_per_page() -> u32 {
    10
}

impl Default for CardListRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            items_per_page: default_items_per_page(),
            query: None,
            card_type: None,
            ink_cost_from: None,
            ink_cost_to: None,
            color: None,
            rarity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardListResponse {
    pub items: Vec<CardSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Store(#[from] CardStoreError),
}

impl CardListRequest {
    /// Rejects malformed pagination and filters that do not apply to the
    /// requested game family.
    pub fn validate(&self) -> Result<(), ListError> {
        let invalid = |msg: &str| Err(ListError::InvalidParameter(String::from(msg)));

        if self.page == 0 {
            return invalid("page must be positive");
        }
        if self.items_per_page == 0 || self.items_per_page > MAX_ITEMS_PER_PAGE {
            return invalid("items_per_page must be between 1 and 50");
        }

        if self.ink_cost_from.map_or(false, |from| from > 10)
            || self.ink_cost_to.map_or(false, |to| to > 10)
        {
            return invalid("ink cost must be between 0 and 10");
        }
        if let (Some(from), Some(to)) = (self.ink_cost_from, self.ink_cost_to) {
            if from > to {
                return invalid("invalid ink cost range");
            }
        }

        match self.card_type {
            Some(CardType::Lorcana) => {
                if self.color.is_some() {
                    return invalid("color filter does not apply to lorcana cards");
                }
                if let Some(rarity) = &self.rarity {
                    if rarity.parse::<LorcanaRarity>().is_err() {
                        return invalid("unknown lorcana rarity");
                    }
                }
            }
            Some(CardType::MagicTheGathering) => {
                if self.ink_cost_from.is_some() || self.ink_cost_to.is_some() {
                    return invalid("ink cost filter does not apply to magic the gathering cards");
                }
                if let Some(rarity) = &self.rarity {
                    if rarity.parse::<MtgRarity>().is_err() {
                        return invalid("unknown magic the gathering rarity");
                    }
                }
            }
            None => {
                if let Some(rarity) = &self.rarity {
                    if rarity.parse::<LorcanaRarity>().is_err()
                        && rarity.parse::<MtgRarity>().is_err()
                    {
                        return invalid("unknown rarity");
                    }
                }
            }
        }

        Ok(())
    }
}

impl<CS, SC> App<CS, SC>
where
    CS: CardStore + Send + Sync,
    SC: CardScanner + Send + Sync,
{
    pub async fn list_cards(
        &self,
        request: &CardListRequest,
    ) -> Result<CardListResponse, ListError> {
        request.validate()?;
        Ok(self.card_store.find_cards(request).await?)
    }
}
