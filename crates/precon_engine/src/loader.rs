use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::locator::selectors;
use crate::persist::save_page_snapshot;
use crate::session::{BrowserSession, PageElement, SessionError};

/// Timing and diagnostics for the initial listing load.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    /// Fixed delay after navigation, tolerant of a slow first paint.
    pub settle_delay: Duration,
    /// Upper bound on waiting for the first deck anchors to appear.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    /// Where the rendered page markup is saved when the wait times out.
    pub snapshot_dir: PathBuf,
    pub snapshot_filename: String,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(10),
            wait_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
            snapshot_dir: PathBuf::from("."),
            snapshot_filename: "page_source.html".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no deck links appeared within {timeout:?}")]
    Timeout { timeout: Duration },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Wait until at least one deck anchor is present, returning how many were
/// found.
///
/// On timeout this captures diagnostic context before failing: the total
/// anchor count, a sample of hrefs, and the full rendered markup saved to a
/// side file. The timeout itself is non-recoverable.
pub async fn await_deck_listing<S: BrowserSession>(
    session: &S,
    settings: &LoadSettings,
) -> Result<usize, LoadError> {
    let deadline = Instant::now() + settings.wait_timeout;
    loop {
        let anchors = session.find_all(&selectors::deck_anchors()).await?;
        if !anchors.is_empty() {
            log::info!("listing ready: {} deck anchor(s) present", anchors.len());
            return Ok(anchors.len());
        }
        if Instant::now() >= deadline {
            break;
        }
        tokio::time::sleep(settings.poll_interval).await;
    }

    log::error!(
        "no deck anchors within {:?}; the selector may be stale or the page blocked",
        settings.wait_timeout
    );
    capture_diagnostics(session, settings).await;
    Err(LoadError::Timeout {
        timeout: settings.wait_timeout,
    })
}

/// Best effort: the window may already be gone, in which case each step is
/// skipped with a warning.
async fn capture_diagnostics<S: BrowserSession>(session: &S, settings: &LoadSettings) {
    match session.find_all(&selectors::any_anchor()).await {
        Ok(anchors) => {
            log::error!("{} anchor element(s) on the page; sampling up to 5", anchors.len());
            for (index, anchor) in anchors.iter().take(5).enumerate() {
                let href = match anchor.attribute("href").await {
                    Ok(Some(href)) => href,
                    Ok(None) => "no href".to_string(),
                    Err(err) => {
                        log::warn!("could not read href while sampling anchors: {err}");
                        break;
                    }
                };
                log::error!("anchor {}: {}", index + 1, href);
            }
        }
        Err(err) => log::warn!("could not enumerate anchors for diagnostics: {err}"),
    }

    match session.page_source().await {
        Ok(markup) => {
            match save_page_snapshot(&settings.snapshot_dir, &settings.snapshot_filename, &markup) {
                Ok(path) => log::error!("saved page snapshot to {}", path.display()),
                Err(err) => log::warn!("could not save page snapshot: {err}"),
            }
        }
        Err(err) => log::warn!("could not read page source for diagnostics: {err}"),
    }
}
