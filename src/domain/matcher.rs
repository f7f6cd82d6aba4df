use crate::domain::app::App;
use crate::domain::scan::ScoredCandidate;
use crate::ports::outbound::card_store::{CardStore, CardStoreError};
use crate::ports::outbound::scanner::CardScanner;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Added to a candidate's relevance score when its name is a literal match
/// for one of the searched strings.
pub const EXACT_MATCH_BONUS: f64 = 100.0;

pub const SHORTLIST_LIMIT: usize = 5;

impl<CS, SC> App<CS, SC>
where
    CS: CardStore + Send + Sync,
    SC: CardScanner + Send + Sync,
{
    /// Turns a handful of OCR-derived name strings into a ranked shortlist of
    /// catalog candidates. The store's text index accepts one search term per
    /// query, so each name is searched on its own and the result sets are
    /// merged afterwards.
    pub async fn match_names(
        &self,
        names: &[String],
    ) -> Result<Vec<ScoredCandidate>, CardStoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut best_by_id: HashMap<String, ScoredCandidate> = HashMap::new();
        for name in names {
            for candidate in self.card_store.text_search(name).await? {
                match best_by_id.entry(candidate.id.clone()) {
                    Entry::Occupied(mut seen) => {
                        if seen.get().score < candidate.score {
                            seen.insert(candidate);
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(candidate);
                    }
                }
            }
        }

        let mut shortlist: Vec<ScoredCandidate> = best_by_id
            .into_values()
            .map(|mut candidate| {
                if names.iter().any(|name| name == &candidate.name) {
                    candidate.score += EXACT_MATCH_BONUS;
                }
                candidate
            })
            .collect();

        shortlist.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        shortlist.truncate(SHORTLIST_LIMIT);

        Ok(shortlist)
    }
}
