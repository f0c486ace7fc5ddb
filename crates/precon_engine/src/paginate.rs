use std::time::{Duration, Instant};

use precon_core::PaginationState;

use crate::locator::{selectors, Locator};
use crate::session::{BrowserSession, PageElement, SessionError};

/// Timing and budget for the load-more loop.
#[derive(Debug, Clone)]
pub struct PaginateSettings {
    pub max_clicks: u32,
    /// Pause after each activation so asynchronously loaded entries render.
    pub post_click_pause: Duration,
    /// Upper bound on settle-scroll iterations per pagination step.
    pub scroll_attempts: u32,
    pub scroll_pause: Duration,
    /// Per-strategy deadline when searching for the trigger.
    pub trigger_timeout: Duration,
    pub trigger_poll: Duration,
}

impl Default for PaginateSettings {
    fn default() -> Self {
        Self {
            max_clicks: 3,
            post_click_pause: Duration::from_secs(2),
            scroll_attempts: 4,
            scroll_pause: Duration::from_secs(1),
            trigger_timeout: Duration::from_secs(5),
            trigger_poll: Duration::from_millis(250),
        }
    }
}

/// Outcome of one trigger search. Absence is an expected state meaning
/// "all content already loaded", not an error.
enum TriggerSearch<E> {
    Found(E),
    NotFound,
}

/// Repeatedly scroll, locate and activate the load-more trigger, up to the
/// click budget.
///
/// Never fails the run: a missing trigger, a closed window, or any other
/// session fault ends the loop early and the clicks performed so far stand.
pub async fn drive_pagination<S: BrowserSession>(
    session: &S,
    settings: &PaginateSettings,
) -> PaginationState {
    let mut state = PaginationState::new(settings.max_clicks);

    while !state.budget_exhausted() {
        if let Err(err) = settle_scroll(session, settings).await {
            log::warn!("scrolling failed ({err}); keeping decks loaded so far");
            break;
        }

        let trigger = match find_trigger(session, settings).await {
            Ok(TriggerSearch::Found(trigger)) => trigger,
            Ok(TriggerSearch::NotFound) => {
                log::info!("no load-more trigger found; all content loaded");
                break;
            }
            Err(err) => {
                log::warn!("trigger search failed ({err}); keeping decks loaded so far");
                break;
            }
        };

        if let Err(err) = activate(session, &trigger).await {
            log::warn!("activation failed ({err}); keeping decks loaded so far");
            break;
        }

        state.record_click();
        log::info!(
            "activated load-more trigger ({} of {})",
            state.clicks_performed(),
            state.max_clicks()
        );
        tokio::time::sleep(settings.post_click_pause).await;
    }

    state
}

/// Scroll the viewport to the document bottom until its height stops
/// growing, so a trigger rendered below the fold becomes reachable.
async fn settle_scroll<S: BrowserSession>(
    session: &S,
    settings: &PaginateSettings,
) -> Result<(), SessionError> {
    let mut last_height = 0;
    for _ in 0..settings.scroll_attempts {
        let height = session.scroll_to_bottom().await?;
        tokio::time::sleep(settings.scroll_pause).await;
        if height == last_height {
            break;
        }
        last_height = height;
    }
    Ok(())
}

/// Try the content-based selector first, then the class-based fallback,
/// each within its own deadline.
async fn find_trigger<S: BrowserSession>(
    session: &S,
    settings: &PaginateSettings,
) -> Result<TriggerSearch<S::Elem>, SessionError> {
    let strategies = [
        selectors::load_more_primary(),
        selectors::load_more_fallback(),
    ];

    for (index, locator) in strategies.iter().enumerate() {
        if let Some(trigger) = wait_for_clickable(session, locator, settings).await? {
            if index > 0 {
                log::info!("load-more trigger found via fallback selector");
            }
            if let Ok(Some(class)) = trigger.attribute("class").await {
                log::debug!("load-more trigger class: {class}");
            }
            return Ok(TriggerSearch::Found(trigger));
        }
    }
    Ok(TriggerSearch::NotFound)
}

/// Deadline-poll for the first clickable match of `locator`.
async fn wait_for_clickable<S: BrowserSession>(
    session: &S,
    locator: &Locator,
    settings: &PaginateSettings,
) -> Result<Option<S::Elem>, SessionError> {
    let deadline = Instant::now() + settings.trigger_timeout;
    loop {
        for candidate in session.find_all(locator).await? {
            if candidate.is_clickable().await? {
                return Ok(Some(candidate));
            }
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(settings.trigger_poll).await;
    }
}

/// Standard click, escalating once to a script-driven activation when an
/// overlaying element intercepts it.
async fn activate<S: BrowserSession>(session: &S, trigger: &S::Elem) -> Result<(), SessionError> {
    match trigger.click().await {
        Ok(()) => Ok(()),
        Err(SessionError::ClickIntercepted) => {
            log::debug!("click intercepted; escalating to script activation");
            session.force_click(trigger).await
        }
        Err(err) => Err(err),
    }
}
