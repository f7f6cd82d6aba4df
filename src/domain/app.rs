use crate::ports::outbound::card_store::CardStore;
use crate::ports::outbound::scanner::CardScanner;

pub struct App<CS, SC> {
    pub card_store: CS,
    pub scanner: SC,
}

impl<CS, SC> App<CS, SC>
where
    CS: CardStore + Send + Sync,
    SC: CardScanner + Send + Sync,
{
    pub fn new(card_store: CS, scanner: SC) -> Self {
        Self {
            card_store,
            scanner,
        }
    }
}
