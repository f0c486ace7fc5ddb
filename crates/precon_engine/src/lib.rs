//! Precon engine: browser session plumbing and the scrape pipeline.
mod extract;
mod loader;
mod locator;
mod paginate;
mod persist;
mod run;
mod session;

pub use extract::extract_decks;
pub use loader::{await_deck_listing, LoadError, LoadSettings};
pub use locator::{selectors, Locator};
pub use paginate::{drive_pagination, PaginateSettings};
pub use persist::{ensure_output_dir, save_page_snapshot, write_deck_csv, PersistError};
pub use run::{run_harvest, HarvestError, HarvestSettings, HarvestSummary};
pub use session::{
    launch, BrowserSession, PageElement, SessionError, SessionSettings, WebDriverElement,
    WebDriverSession,
};
