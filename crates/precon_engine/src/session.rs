use async_trait::async_trait;
use serde_json::json;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use thiserror::Error;

use crate::locator::Locator;

/// Session-level failure classification.
///
/// Only the conditions the pipeline reacts to get their own variant;
/// everything else is carried as the driver's message.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("browser window closed")]
    WindowClosed,
    #[error("click intercepted by an overlaying element")]
    ClickIntercepted,
    #[error("webdriver failure: {0}")]
    Driver(String),
}

/// A handle to one element in the live page.
///
/// Handles are only valid while the DOM node they point at exists; a
/// re-rendered page requires a fresh query.
#[async_trait]
pub trait PageElement: Send + Sync + Sized {
    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError>;
    async fn text(&self) -> Result<String, SessionError>;
    /// Displayed and enabled.
    async fn is_clickable(&self) -> Result<bool, SessionError>;
    async fn click(&self) -> Result<(), SessionError>;
    /// First match within this element, or `None` when absent.
    async fn find(&self, locator: &Locator) -> Result<Option<Self>, SessionError>;
}

/// The browser capability surface the pipeline consumes.
///
/// One implementation drives a real WebDriver session; the test suites
/// substitute an in-memory double.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Elem: PageElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError>;
    /// All current matches, in document order. Absence is an empty list.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Elem>, SessionError>;
    /// Scroll the viewport to the document's current bottom and return the
    /// document height afterwards.
    async fn scroll_to_bottom(&self) -> Result<u64, SessionError>;
    /// Script-driven activation bypassing interactability checks. The one
    /// deliberate escalation from a normal click.
    async fn force_click(&self, element: &Self::Elem) -> Result<(), SessionError>;
    async fn page_source(&self) -> Result<String, SessionError>;
    /// Close the session. Callers treat failure as "already closed".
    async fn close(&self) -> Result<(), SessionError>;
}

/// Options for launching the real browser session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// WebDriver endpoint of an already running chromedriver.
    pub webdriver_url: String,
    pub window_size: (u32, u32),
    pub user_agent: String,
    pub headless: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            window_size: (1920, 1080),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36"
                .to_string(),
            headless: false,
        }
    }
}

/// Launch a Chrome session with the anti-detection option set: realistic
/// viewport, spoofed user agent, automation flags suppressed.
///
/// Fails fatally if the WebDriver endpoint cannot be reached; there is no
/// retry at this stage.
pub async fn launch(settings: &SessionSettings) -> Result<WebDriverSession, SessionError> {
    let mut caps = DesiredCapabilities::chrome();
    let (width, height) = settings.window_size;
    caps.add_arg(&format!("--window-size={width},{height}"))
        .map_err(classify)?;
    caps.add_arg("--disable-blink-features=AutomationControlled")
        .map_err(classify)?;
    caps.add_arg(&format!("user-agent={}", settings.user_agent))
        .map_err(classify)?;
    caps.add_arg("--disable-extensions").map_err(classify)?;
    caps.add_arg("--start-maximized").map_err(classify)?;
    if settings.headless {
        caps.add_arg("--headless=new").map_err(classify)?;
    }
    caps.add_experimental_option("excludeSwitches", json!(["enable-automation"]))
        .map_err(classify)?;
    caps.add_experimental_option("useAutomationExtension", json!(false))
        .map_err(classify)?;

    let driver = WebDriver::new(&settings.webdriver_url, caps)
        .await
        .map_err(classify)?;
    Ok(WebDriverSession { driver })
}

/// `BrowserSession` backed by a thirtyfour WebDriver connection.
pub struct WebDriverSession {
    driver: WebDriver,
}

/// `PageElement` backed by a thirtyfour element handle.
pub struct WebDriverElement {
    element: WebElement,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Elem = WebDriverElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await.map_err(classify)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Elem>, SessionError> {
        let elements = self
            .driver
            .find_all(to_by(locator))
            .await
            .map_err(classify)?;
        Ok(elements
            .into_iter()
            .map(|element| WebDriverElement { element })
            .collect())
    }

    async fn scroll_to_bottom(&self) -> Result<u64, SessionError> {
        let ret = self
            .driver
            .execute(
                "window.scrollTo(0, document.body.scrollHeight); \
                 return document.body.scrollHeight;",
                Vec::new(),
            )
            .await
            .map_err(classify)?;
        Ok(ret.json().as_u64().unwrap_or(0))
    }

    async fn force_click(&self, element: &Self::Elem) -> Result<(), SessionError> {
        let handle = element.element.to_json().map_err(classify)?;
        self.driver
            .execute("arguments[0].click();", vec![handle])
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        self.driver.source().await.map_err(classify)
    }

    async fn close(&self) -> Result<(), SessionError> {
        // WebDriver handles are reference-counted; quitting one clone ends
        // the session for all of them.
        self.driver.clone().quit().await.map_err(classify)
    }
}

#[async_trait]
impl PageElement for WebDriverElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        self.element.attr(name).await.map_err(classify)
    }

    async fn text(&self) -> Result<String, SessionError> {
        self.element.text().await.map_err(classify)
    }

    async fn is_clickable(&self) -> Result<bool, SessionError> {
        let displayed = self.element.is_displayed().await.map_err(classify)?;
        if !displayed {
            return Ok(false);
        }
        self.element.is_enabled().await.map_err(classify)
    }

    async fn click(&self) -> Result<(), SessionError> {
        self.element.click().await.map_err(classify)
    }

    async fn find(&self, locator: &Locator) -> Result<Option<Self>, SessionError> {
        // find_all reports absence as an empty list instead of a
        // no-such-element error.
        let mut matches = self
            .element
            .find_all(to_by(locator))
            .await
            .map_err(classify)?;
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(WebDriverElement {
            element: matches.remove(0),
        }))
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Css(css) => By::Css(css.as_str()),
        Locator::XPathTextContains { tag, fragment } => {
            By::XPath(&format!("//{tag}[contains(text(), '{fragment}')]"))
        }
    }
}

/// The WebDriver error codes relevant to the pipeline arrive embedded in
/// formatted messages, so classification is textual.
fn classify(err: WebDriverError) -> SessionError {
    let text = err.to_string();
    let lowered = text.to_ascii_lowercase();
    if lowered.contains("no such window")
        || lowered.contains("window already closed")
        || lowered.contains("invalid session id")
        || lowered.contains("session not found")
    {
        SessionError::WindowClosed
    } else if lowered.contains("click intercepted") {
        SessionError::ClickIntercepted
    } else {
        SessionError::Driver(text)
    }
}
