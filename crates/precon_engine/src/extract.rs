use precon_core::{clean_deck_name, parse_deck_href, DeckRecord, HarvestResult};

use crate::locator::selectors;
use crate::session::{BrowserSession, PageElement, SessionError};

/// Re-query every deck anchor and normalize each into a record.
///
/// This is a fresh query on purpose: pagination may have replaced the DOM
/// nodes any earlier handles pointed at. Per-anchor oddities (missing href,
/// non-canonical path, missing name element) are skipped or patched over;
/// a session failure here is fatal and discards the partial result.
pub async fn extract_decks<S: BrowserSession>(
    session: &S,
    site_root: &str,
) -> Result<HarvestResult, SessionError> {
    let anchors = session.find_all(&selectors::deck_anchors()).await?;
    log::info!("found {} candidate deck anchor(s)", anchors.len());

    let mut result = HarvestResult::new();
    for anchor in &anchors {
        let Some(href) = anchor.attribute("href").await? else {
            continue;
        };
        let Some(deck) = parse_deck_href(site_root, &href) else {
            continue;
        };

        let name = match read_name(anchor).await? {
            Some(name) if !name.is_empty() => name,
            _ => {
                log::warn!("no deck name for {href}; using id {}", deck.id);
                deck.id.clone()
            }
        };

        let added = result.push(DeckRecord {
            name,
            url: deck.url,
        });
        if !added {
            log::debug!("duplicate anchor for deck {}", deck.id);
        } else if result.len() <= 5 {
            let last = result.len();
            log::info!("deck {last}: {href}");
        }
    }

    Ok(result)
}

/// The name span's `title` attribute carries the untruncated name when the
/// rendered text is clipped, so it wins over visible text.
async fn read_name<E: PageElement>(anchor: &E) -> Result<Option<String>, SessionError> {
    let Some(span) = anchor.find(&selectors::deck_name()).await? else {
        return Ok(None);
    };
    let raw = match span.attribute("title").await? {
        Some(title) if !title.trim().is_empty() => title,
        _ => span.text().await?,
    };
    Ok(Some(clean_deck_name(&raw)))
}
