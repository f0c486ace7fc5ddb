/// An element locator in one of the selector dialects the driver understands.
///
/// Absence of a match is an expected state for every locator; the session
/// surface reports it as an empty result, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector.
    Css(String),
    /// An XPath predicate matching elements of `tag` whose text contains
    /// `fragment`.
    XPathTextContains { tag: String, fragment: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath_text_contains(tag: impl Into<String>, fragment: impl Into<String>) -> Self {
        Locator::XPathTextContains {
            tag: tag.into(),
            fragment: fragment.into(),
        }
    }
}

/// The concrete selectors for the deck listing page, shared between the
/// pipeline and its test doubles.
pub mod selectors {
    use super::Locator;

    /// Anchors pointing into the deck collection.
    pub fn deck_anchors() -> Locator {
        Locator::css("a[href^='/decks/']")
    }

    /// Every anchor on the page; used only for timeout diagnostics.
    pub fn any_anchor() -> Locator {
        Locator::css("a")
    }

    /// The span carrying a deck's display name. The class is the obfuscated
    /// one the site currently ships; the `title` attribute on this element
    /// holds the untruncated name.
    pub fn deck_name() -> Locator {
        Locator::css("span.MKZh9kXyTHLRH7IyZaX8")
    }

    /// Content-based match for the load-more control.
    pub fn load_more_primary() -> Locator {
        Locator::xpath_text_contains("button", "View More")
    }

    /// Class-based fallback when the content match fails.
    pub fn load_more_fallback() -> Locator {
        Locator::css("button.btn.btn-secondary")
    }
}
