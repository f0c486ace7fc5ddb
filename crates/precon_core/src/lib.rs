//! Precon core: pure deck-record parsing, cleaning and ordering.
mod canonical;
mod harvest;
mod name;
mod pagination;
mod record;

pub use canonical::{parse_deck_href, CanonicalDeck, DECK_COLLECTION, PUBLIC_LISTING};
pub use harvest::HarvestResult;
pub use name::clean_deck_name;
pub use pagination::PaginationState;
pub use record::DeckRecord;
