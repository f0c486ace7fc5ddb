use url::Url;

/// First path segment of every individual deck page.
pub const DECK_COLLECTION: &str = "decks";

/// Reserved second segment used by the public listing page itself.
pub const PUBLIC_LISTING: &str = "public";

/// A deck identified by its canonical URL, stripped of query parameters
/// and listing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDeck {
    pub id: String,
    pub url: String,
}

/// Parse a raw anchor href into a canonical deck URL.
///
/// The href may be relative (as it appears in the DOM) or absolute; it is
/// resolved against `site_root`. Returns `None` for anything that does not
/// point at an individual deck page: fewer than two path segments, a path
/// outside the deck collection, or the public listing marker itself.
pub fn parse_deck_href(site_root: &str, href: &str) -> Option<CanonicalDeck> {
    let base = Url::parse(site_root).ok()?;
    let resolved = base.join(href).ok()?;
    let segments: Vec<&str> = resolved.path_segments()?.filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 || segments[0] != DECK_COLLECTION || segments[1] == PUBLIC_LISTING {
        return None;
    }

    let id = segments[1].to_string();
    let url = format!(
        "{}/{}/{}",
        site_root.trim_end_matches('/'),
        DECK_COLLECTION,
        id
    );
    Some(CanonicalDeck { id, url })
}
