#![allow(dead_code)]
//! In-memory stand-in for the browser session, scripted per test.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use precon_engine::{selectors, BrowserSession, Locator, PageElement, SessionError};

#[derive(Debug, Clone, Default)]
pub struct MockAnchor {
    pub href: Option<String>,
    pub name_text: Option<String>,
    pub name_title: Option<String>,
}

impl MockAnchor {
    pub fn new(href: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            ..Self::default()
        }
    }

    pub fn without_href() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.name_text = Some(text.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.name_title = Some(title.to_string());
        self
    }
}

/// Scripted page state. The trigger "exists" while it has activations left
/// and vanishes afterwards, like the real control.
#[derive(Debug, Clone)]
pub struct MockDom {
    pub anchors: Vec<MockAnchor>,
    /// Successful activations remaining before the trigger disappears.
    pub trigger_clicks: usize,
    /// Hide the trigger from the content-based selector.
    pub trigger_via_fallback_only: bool,
    /// Intercept this many normal clicks before letting one through.
    pub intercept_clicks: usize,
    /// Close the window after this many successful activations.
    pub close_window_after_clicks: Option<usize>,
    pub page_source: String,
}

impl Default for MockDom {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            trigger_clicks: 0,
            trigger_via_fallback_only: false,
            intercept_clicks: 0,
            close_window_after_clicks: None,
            page_source: "<html><body></body></html>".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct MockState {
    dom: MockDom,
    activations: usize,
    forced_activations: usize,
    scrolls: usize,
    closed: bool,
    window_gone: bool,
}

#[derive(Clone)]
pub struct MockSession {
    state: Arc<Mutex<MockState>>,
    nav_failures: Arc<AtomicUsize>,
    navigations: Arc<AtomicUsize>,
}

impl MockSession {
    pub fn new(dom: MockDom) -> Self {
        Self::with_nav_failures(dom, Arc::new(AtomicUsize::new(0)))
    }

    fn with_nav_failures(dom: MockDom, nav_failures: Arc<AtomicUsize>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                dom,
                activations: 0,
                forced_activations: 0,
                scrolls: 0,
                closed: false,
                window_gone: false,
            })),
            nav_failures,
            navigations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn activations(&self) -> usize {
        self.state.lock().unwrap().activations
    }

    pub fn forced_activations(&self) -> usize {
        self.state.lock().unwrap().forced_activations
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    pub fn closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    /// Simulate the browser window going away mid-run.
    pub fn close_window(&self) {
        self.state.lock().unwrap().window_gone = true;
    }
}

/// Builds one fresh session per launch; sessions share the scripted DOM and
/// the navigation failure budget.
pub struct MockFactory {
    dom: MockDom,
    nav_failures: Arc<AtomicUsize>,
    launches: AtomicUsize,
    sessions: Mutex<Vec<MockSession>>,
}

impl MockFactory {
    pub fn new(dom: MockDom) -> Self {
        Self {
            dom,
            nav_failures: Arc::new(AtomicUsize::new(0)),
            launches: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Fail this many navigations with a window-closed condition.
    pub fn with_navigate_failures(self, count: usize) -> Self {
        self.nav_failures.store(count, Ordering::SeqCst);
        self
    }

    pub async fn launch(&self) -> Result<MockSession, SessionError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        let session = MockSession::with_nav_failures(self.dom.clone(), self.nav_failures.clone());
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> Vec<MockSession> {
        self.sessions.lock().unwrap().clone()
    }
}

#[derive(Clone)]
pub enum MockElement {
    Anchor {
        state: Arc<Mutex<MockState>>,
        index: usize,
    },
    Name {
        state: Arc<Mutex<MockState>>,
        index: usize,
    },
    Trigger {
        state: Arc<Mutex<MockState>>,
    },
}

fn guard_window(state: &MockState) -> Result<(), SessionError> {
    if state.window_gone {
        Err(SessionError::WindowClosed)
    } else {
        Ok(())
    }
}

#[async_trait]
impl PageElement for MockElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, SessionError> {
        match self {
            MockElement::Anchor { state, index } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                if name == "href" {
                    Ok(state.dom.anchors[*index].href.clone())
                } else {
                    Ok(None)
                }
            }
            MockElement::Name { state, index } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                if name == "title" {
                    Ok(state.dom.anchors[*index].name_title.clone())
                } else {
                    Ok(None)
                }
            }
            MockElement::Trigger { state } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                if name == "class" {
                    Ok(Some("btn btn-secondary".to_string()))
                } else {
                    Ok(None)
                }
            }
        }
    }

    async fn text(&self) -> Result<String, SessionError> {
        match self {
            MockElement::Name { state, index } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                Ok(state.dom.anchors[*index].name_text.clone().unwrap_or_default())
            }
            MockElement::Anchor { state, .. } | MockElement::Trigger { state } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                Ok(String::new())
            }
        }
    }

    async fn is_clickable(&self) -> Result<bool, SessionError> {
        match self {
            MockElement::Trigger { state } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                Ok(state.dom.trigger_clicks > 0)
            }
            MockElement::Anchor { state, .. } | MockElement::Name { state, .. } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                Ok(true)
            }
        }
    }

    async fn click(&self) -> Result<(), SessionError> {
        match self {
            MockElement::Trigger { state } => {
                let mut state = state.lock().unwrap();
                guard_window(&state)?;
                if state.dom.intercept_clicks > 0 {
                    state.dom.intercept_clicks -= 1;
                    return Err(SessionError::ClickIntercepted);
                }
                activate_trigger(&mut *state, false)
            }
            MockElement::Anchor { state, .. } | MockElement::Name { state, .. } => {
                let state = state.lock().unwrap();
                guard_window(&state)?;
                Ok(())
            }
        }
    }

    async fn find(&self, locator: &Locator) -> Result<Option<Self>, SessionError> {
        match self {
            MockElement::Anchor { state, index } => {
                let guard = state.lock().unwrap();
                guard_window(&guard)?;
                let anchor = &guard.dom.anchors[*index];
                let has_name = anchor.name_text.is_some() || anchor.name_title.is_some();
                if *locator == selectors::deck_name() && has_name {
                    Ok(Some(MockElement::Name {
                        state: state.clone(),
                        index: *index,
                    }))
                } else {
                    Ok(None)
                }
            }
            MockElement::Name { state, .. } | MockElement::Trigger { state } => {
                let guard = state.lock().unwrap();
                guard_window(&guard)?;
                Ok(None)
            }
        }
    }
}

fn activate_trigger(state: &mut MockState, forced: bool) -> Result<(), SessionError> {
    if state.dom.trigger_clicks == 0 {
        return Err(SessionError::Driver("stale trigger element".to_string()));
    }
    state.dom.trigger_clicks -= 1;
    state.activations += 1;
    if forced {
        state.forced_activations += 1;
    }
    if state.dom.close_window_after_clicks == Some(state.activations) {
        state.window_gone = true;
    }
    Ok(())
}

#[async_trait]
impl BrowserSession for MockSession {
    type Elem = MockElement;

    async fn navigate(&self, _url: &str) -> Result<(), SessionError> {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        let failures = self.nav_failures.load(Ordering::SeqCst);
        if failures > 0 {
            self.nav_failures.store(failures - 1, Ordering::SeqCst);
            return Err(SessionError::WindowClosed);
        }
        let state = self.state.lock().unwrap();
        guard_window(&state)
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Elem>, SessionError> {
        let state = self.state.lock().unwrap();
        guard_window(&state)?;

        if *locator == selectors::deck_anchors() || *locator == selectors::any_anchor() {
            return Ok((0..state.dom.anchors.len())
                .map(|index| MockElement::Anchor {
                    state: self.state.clone(),
                    index,
                })
                .collect());
        }

        let trigger_present = state.dom.trigger_clicks > 0;
        let primary_visible = trigger_present && !state.dom.trigger_via_fallback_only;
        if (*locator == selectors::load_more_primary() && primary_visible)
            || (*locator == selectors::load_more_fallback() && trigger_present)
        {
            return Ok(vec![MockElement::Trigger {
                state: self.state.clone(),
            }]);
        }

        Ok(Vec::new())
    }

    async fn scroll_to_bottom(&self) -> Result<u64, SessionError> {
        let mut state = self.state.lock().unwrap();
        guard_window(&state)?;
        state.scrolls += 1;
        Ok(1000)
    }

    async fn force_click(&self, element: &Self::Elem) -> Result<(), SessionError> {
        match element {
            MockElement::Trigger { state } => {
                let mut state = state.lock().unwrap();
                guard_window(&state)?;
                activate_trigger(&mut *state, true)
            }
            _ => Ok(()),
        }
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        let state = self.state.lock().unwrap();
        guard_window(&state)?;
        Ok(state.dom.page_source.clone())
    }

    async fn close(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(SessionError::Driver("session already closed".to_string()));
        }
        state.closed = true;
        Ok(())
    }
}

/// Millisecond-scale settings so the deadline polls stay fast under test.
pub fn fast_paginate_settings(max_clicks: u32) -> precon_engine::PaginateSettings {
    use std::time::Duration;
    precon_engine::PaginateSettings {
        max_clicks,
        post_click_pause: Duration::from_millis(1),
        scroll_attempts: 3,
        scroll_pause: Duration::from_millis(1),
        trigger_timeout: Duration::from_millis(20),
        trigger_poll: Duration::from_millis(5),
    }
}

pub fn fast_load_settings(snapshot_dir: std::path::PathBuf) -> precon_engine::LoadSettings {
    use std::time::Duration;
    precon_engine::LoadSettings {
        settle_delay: Duration::from_millis(1),
        wait_timeout: Duration::from_millis(50),
        poll_interval: Duration::from_millis(10),
        snapshot_dir,
        snapshot_filename: "page_source.html".to_string(),
    }
}
