use crate::domain::app::App;
use crate::domain::card::{
    Card, CardAttributes, CardType, LorcanaRarity, MtgColor, MtgRarity, UnknownValue,
};
use crate::ports::outbound::card_store::{CardStore, CardStoreError};
use crate::ports::outbound::scanner::CardScanner;
use serde::de::{self, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task;

pub const BATCH_SIZE: usize = 512;

/// Loose per-record shape of the Lorcana source file. Enum membership and
/// the ink cost range are checked during normalization, not here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LorcanaRaw {
    pub name: String,
    pub ink_cost: f64,
    pub rarity: String,
    pub id: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MtgRaw {
    pub name: String,
    pub color: Option<String>,
    pub rarity: String,
    pub id: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("ink cost {0} is outside the 0-10 range")]
    InkCostOutOfRange(f64),
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),
}

impl TryFrom<LorcanaRaw> for Card {
    type Error = NormalizeError;

    fn try_from(raw: LorcanaRaw) -> Result<Self, Self::Error> {
        if raw.ink_cost.fract() != 0.0 || !(0.0..=10.0).contains(&raw.ink_cost) {
            return Err(NormalizeError::InkCostOutOfRange(raw.ink_cost));
        }
        let rarity: LorcanaRarity = raw.rarity.parse()?;

        Ok(Card {
            storage_id: None,
            id: raw.id,
            name: raw.name,
            image_url: raw.image_url,
            attributes: CardAttributes::Lorcana {
                ink_cost: raw.ink_cost as u8,
                rarity,
            },
        })
    }
}

impl TryFrom<MtgRaw> for Card {
    type Error = NormalizeError;

    fn try_from(raw: MtgRaw) -> Result<Self, Self::Error> {
        let color = match &raw.color {
            Some(value) => Some(value.parse::<MtgColor>()?),
            None => None,
        };
        let rarity: MtgRarity = raw.rarity.parse()?;

        Ok(Card {
            storage_id: None,
            id: raw.id,
            name: raw.name,
            image_url: raw.image_url,
            attributes: CardAttributes::MagicTheGathering { color, rarity },
        })
    }
}

/// Why a single record was dropped from an import. Expected and non-fatal;
/// the run keeps going.
#[derive(Debug, Error)]
pub enum RecordRejection {
    #[error("invalid shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("invalid values: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Validates one raw array element against the family's shape, then
/// normalizes it into a canonical card.
pub fn decode_record(record: &Value, card_type: CardType) -> Result<Card, RecordRejection> {
    match card_type {
        CardType::Lorcana => {
            let raw = LorcanaRaw::deserialize(record)?;
            Ok(Card::try_from(raw)?)
        }
        CardType::MagicTheGathering => {
            let raw = MtgRaw::deserialize(record)?;
            Ok(Card::try_from(raw)?)
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: u64,
    pub rejected: u64,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not open card source {path}: {source}")]
    SourceUnreadable { path: PathBuf, source: io::Error },
    #[error("card source is not a valid JSON array: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] CardStoreError),
    #[error("card source decoding stopped unexpectedly: {0}")]
    Decoder(String),
}

/// Sequence visitor that forwards array elements in fixed-size batches over
/// a bounded channel. `blocking_send` stalls the underlying reader until the
/// receiving side has taken the previous batch, so the whole file is never
/// resident at once.
struct BatchForwarder<'a> {
    batches: &'a mpsc::Sender<Vec<Value>>,
}

impl<'a> BatchForwarder<'a> {
    fn forward(&self, batch: Vec<Value>) -> Result<(), &'static str> {
        self.batches
            .blocking_send(batch)
            .map_err(|_| "import aborted")
    }
}

impl<'de> DeserializeSeed<'de> for BatchForwarder<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for BatchForwarder<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array of card records")
    }

    fn visit_seq<A>(self, mut records: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut buffer = Vec::with_capacity(BATCH_SIZE);
        while let Some(record) = records.next_element::<Value>()? {
            buffer.push(record);
            if buffer.len() == BATCH_SIZE {
                let full = std::mem::replace(&mut buffer, Vec::with_capacity(BATCH_SIZE));
                self.forward(full).map_err(de::Error::custom)?;
            }
        }
        if !buffer.is_empty() {
            self.forward(buffer).map_err(de::Error::custom)?;
        }
        Ok(())
    }
}

fn decode_batches<R: io::Read>(
    source: R,
    batches: &mpsc::Sender<Vec<Value>>,
) -> Result<(), serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_reader(io::BufReader::new(source));
    (BatchForwarder { batches }).deserialize(&mut deserializer)?;
    deserializer.end()
}

impl<CS, SC> App<CS, SC>
where
    CS: CardStore + Send + Sync,
    SC: CardScanner + Send + Sync,
{
    /// Imports one family's card source file. Runs at most once per family:
    /// when the store already holds cards of that family the source is never
    /// opened and the outcome is all zeroes.
    pub async fn import_file(
        &self,
        path: &Path,
        card_type: CardType,
    ) -> Result<ImportOutcome, ImportError> {
        if self.already_imported(card_type).await? {
            return Ok(ImportOutcome::default());
        }

        let source = File::open(path).map_err(|source| ImportError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.stream_import(source, card_type).await
    }

    pub async fn import_reader<R>(
        &self,
        source: R,
        card_type: CardType,
    ) -> Result<ImportOutcome, ImportError>
    where
        R: io::Read + Send + 'static,
    {
        if self.already_imported(card_type).await? {
            return Ok(ImportOutcome::default());
        }
        self.stream_import(source, card_type).await
    }

    async fn already_imported(&self, card_type: CardType) -> Result<bool, ImportError> {
        if self.card_store.count_by_type(card_type).await? > 0 {
            log::info!("{card_type} cards already imported, skipping import");
            return Ok(true);
        }
        Ok(false)
    }

    /// Two-stage pipeline: a blocking decode stage streams the JSON array in
    /// 512-record batches, an async persist stage validates, normalizes and
    /// upserts one batch at a time. The channel has capacity one, so decoding
    /// waits for persistence to catch up rather than buffering the file.
    async fn stream_import<R>(
        &self,
        source: R,
        card_type: CardType,
    ) -> Result<ImportOutcome, ImportError>
    where
        R: io::Read + Send + 'static,
    {
        let (batches_tx, mut batches_rx) = mpsc::channel::<Vec<Value>>(1);
        let decoder = task::spawn_blocking(move || decode_batches(source, &batches_tx));

        let mut outcome = ImportOutcome::default();
        while let Some(batch) = batches_rx.recv().await {
            let mut cards = Vec::with_capacity(batch.len());
            for record in &batch {
                match decode_record(record, card_type) {
                    Ok(card) => cards.push(card),
                    Err(why) => {
                        log::warn!("rejected {card_type} card - {why}: {record}");
                        outcome.rejected += 1;
                    }
                }
            }

            if !cards.is_empty() {
                let accepted = cards.len() as u64;
                // Returning here drops the receiver; the decode stage fails
                // its next send and tears the stream down.
                self.card_store.bulk_upsert(cards).await?;
                outcome.imported += accepted;
                log::info!("imported batch of {accepted} {card_type} cards");
            }
        }

        match decoder.await {
            Ok(Ok(())) => {
                log::info!(
                    "{card_type} import completed: {} imported, {} rejected",
                    outcome.imported,
                    outcome.rejected
                );
                Ok(outcome)
            }
            Ok(Err(why)) => Err(ImportError::Corrupt(why)),
            Err(why) => Err(ImportError::Decoder(why.to_string())),
        }
    }
}
