use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Lorcana,
    MagicTheGathering,
}

impl CardType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Lorcana => "lorcana",
            CardType::MagicTheGathering => "magic_the_gathering",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lorcana" => Ok(CardType::Lorcana),
            "magic_the_gathering" => Ok(CardType::MagicTheGathering),
            other => Err(UnknownValue::new("card type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LorcanaRarity {
    Common,
    Enchanted,
    Legendary,
    Promo,
    Rare,
    SuperRare,
    Uncommon,
}

impl LorcanaRarity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LorcanaRarity::Common => "Common",
            LorcanaRarity::Enchanted => "Enchanted",
            LorcanaRarity::Legendary => "Legendary",
            LorcanaRarity::Promo => "Promo",
            LorcanaRarity::Rare => "Rare",
            LorcanaRarity::SuperRare => "Super Rare",
            LorcanaRarity::Uncommon => "Uncommon",
        }
    }
}

impl FromStr for LorcanaRarity {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Common" => Ok(LorcanaRarity::Common),
            "Enchanted" => Ok(LorcanaRarity::Enchanted),
            "Legendary" => Ok(LorcanaRarity::Legendary),
            "Promo" => Ok(LorcanaRarity::Promo),
            "Rare" => Ok(LorcanaRarity::Rare),
            "Super Rare" => Ok(LorcanaRarity::SuperRare),
            "Uncommon" => Ok(LorcanaRarity::Uncommon),
            other => Err(UnknownValue::new("lorcana rarity", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtgRarity {
    Common,
    Mythic,
    Rare,
    Special,
    Uncommon,
}

impl MtgRarity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MtgRarity::Common => "common",
            MtgRarity::Mythic => "mythic",
            MtgRarity::Rare => "rare",
            MtgRarity::Special => "special",
            MtgRarity::Uncommon => "uncommon",
        }
    }
}

impl FromStr for MtgRarity {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "common" => Ok(MtgRarity::Common),
            "mythic" => Ok(MtgRarity::Mythic),
            "rare" => Ok(MtgRarity::Rare),
            "special" => Ok(MtgRarity::Special),
            "uncommon" => Ok(MtgRarity::Uncommon),
            other => Err(UnknownValue::new("magic the gathering rarity", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MtgColor {
    U,
    B,
    G,
    R,
    W,
}

impl MtgColor {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MtgColor::U => "U",
            MtgColor::B => "B",
            MtgColor::G => "G",
            MtgColor::R => "R",
            MtgColor::W => "W",
        }
    }
}

impl FromStr for MtgColor {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "U" => Ok(MtgColor::U),
            "B" => Ok(MtgColor::B),
            "G" => Ok(MtgColor::G),
            "R" => Ok(MtgColor::R),
            "W" => Ok(MtgColor::W),
            other => Err(UnknownValue::new("magic the gathering color", other)),
        }
    }
}

/// Game-specific attributes. Exactly one variant per card, matching its
/// card type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAttributes {
    Lorcana {
        ink_cost: u8,
        rarity: LorcanaRarity,
    },
    MagicTheGathering {
        color: Option<MtgColor>,
        rarity: MtgRarity,
    },
}

/// A canonical catalog card. `id` is the stable external identifier and is
/// unique across both game families; `storage_id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub storage_id: Option<Uuid>,
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub attributes: CardAttributes,
}

impl Card {
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self.attributes {
            CardAttributes::Lorcana { .. } => CardType::Lorcana,
            CardAttributes::MagicTheGathering { .. } => CardType::MagicTheGathering,
        }
    }
}
