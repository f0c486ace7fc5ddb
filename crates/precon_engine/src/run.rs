use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::extract::extract_decks;
use crate::loader::{await_deck_listing, LoadError, LoadSettings};
use crate::paginate::{drive_pagination, PaginateSettings};
use crate::persist::{write_deck_csv, PersistError};
use crate::session::{BrowserSession, SessionError};

/// Everything one harvest run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    /// The listing page, a site query encoding the format filter.
    pub listing_url: String,
    /// Root against which anchor hrefs are canonicalized.
    pub site_root: String,
    pub output_dir: PathBuf,
    pub output_filename: String,
    pub load: LoadSettings,
    pub paginate: PaginateSettings,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            listing_url:
                "https://moxfield.com/decks/public?q=eyJmb3JtYXQiOiJjb21tYW5kZXJQcmVjb25zIn0%3D"
                    .to_string(),
            site_root: "https://moxfield.com".to_string(),
            output_dir: PathBuf::from("."),
            output_filename: "EDH_Precon_list.csv".to_string(),
            load: LoadSettings::default(),
            paginate: PaginateSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("could not launch browser session: {0}")]
    Launch(#[source] SessionError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("session failed during extraction: {0}")]
    Extract(#[source] SessionError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    pub decks: usize,
    pub clicks_performed: u32,
    pub output_path: PathBuf,
}

/// Execute one full harvest: launch, load, paginate, extract, persist.
///
/// `launch` is called once, plus once more if the window closes during the
/// initial navigation (the single recovered condition). The session is
/// closed on every exit path; a close failure is treated as "already
/// closed" and swallowed.
pub async fn run_harvest<S, F, Fut>(
    launch: F,
    settings: &HarvestSettings,
) -> Result<HarvestSummary, HarvestError>
where
    S: BrowserSession,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<S, SessionError>>,
{
    let session = connect_and_navigate(&launch, settings).await?;
    let outcome = drive(&session, settings).await;
    close_quietly(&session).await;
    outcome
}

async fn connect_and_navigate<S, F, Fut>(
    launch: &F,
    settings: &HarvestSettings,
) -> Result<S, HarvestError>
where
    S: BrowserSession,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<S, SessionError>>,
{
    let session = launch().await.map_err(HarvestError::Launch)?;
    log::info!("loading {}", settings.listing_url);
    match session.navigate(&settings.listing_url).await {
        Ok(()) => {
            tokio::time::sleep(settings.load.settle_delay).await;
            Ok(session)
        }
        Err(SessionError::WindowClosed) => {
            log::warn!("browser window closed during navigation; relaunching once");
            close_quietly(&session).await;
            let session = launch().await.map_err(HarvestError::Launch)?;
            if let Err(err) = session.navigate(&settings.listing_url).await {
                close_quietly(&session).await;
                return Err(HarvestError::Load(LoadError::Session(err)));
            }
            tokio::time::sleep(settings.load.settle_delay).await;
            Ok(session)
        }
        Err(err) => {
            close_quietly(&session).await;
            Err(HarvestError::Load(LoadError::Session(err)))
        }
    }
}

async fn drive<S: BrowserSession>(
    session: &S,
    settings: &HarvestSettings,
) -> Result<HarvestSummary, HarvestError> {
    await_deck_listing(session, &settings.load).await?;

    let pagination = drive_pagination(session, &settings.paginate).await;
    log::info!(
        "pagination finished after {} click(s)",
        pagination.clicks_performed()
    );

    let harvest = extract_decks(session, &settings.site_root)
        .await
        .map_err(HarvestError::Extract)?;

    let records = harvest.into_sorted();
    let output_path = write_deck_csv(&settings.output_dir, &settings.output_filename, &records)?;
    log::info!("saved {} deck(s) to {}", records.len(), output_path.display());

    Ok(HarvestSummary {
        decks: records.len(),
        clicks_performed: pagination.clicks_performed(),
        output_path,
    })
}

async fn close_quietly<S: BrowserSession>(session: &S) {
    if let Err(err) = session.close().await {
        log::debug!("session close failed (already closed?): {err}");
    }
}
