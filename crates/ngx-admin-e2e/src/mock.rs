//! Scriptable in-memory page.
//!
//! `MockDriver` stands in for a browser in unit tests. Elements are keyed by
//! the canonical form of the locator that finds them, and handlers attached
//! to clicks, key presses and navigation mutate the page state the way the
//! real widget would.

use crate::config::{BrowserOptions, Viewport};
use crate::driver::{DriverFactory, Key, PageDriver};
use crate::locator::{BoundingBox, Locator};
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback mutating the mock page
pub type MockHandler = Arc<dyn Fn(&mut MockState) + Send + Sync>;

/// State of one mocked element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MockElement {
    /// Number of matches (0 means absent)
    pub count: usize,
    /// Rendered with non-zero size
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Checkbox/radio state
    pub checked: bool,
    /// `textContent` of the first match
    pub text: Option<String>,
    /// `textContent` of every match
    pub texts: Vec<String>,
    /// Input value
    pub value: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// Computed styles
    pub css: HashMap<String, String>,
    /// Geometry
    pub bounding_box: Option<BoundingBox>,
}

impl MockElement {
    /// A single visible, enabled element
    #[must_use]
    pub fn visible() -> Self {
        Self {
            count: 1,
            visible: true,
            enabled: true,
            bounding_box: Some(BoundingBox::new(0.0, 0.0, 100.0, 20.0)),
            ..Self::default()
        }
    }

    /// A single attached but hidden element
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            count: 1,
            enabled: true,
            ..Self::default()
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the text of every match; the match count follows
    #[must_use]
    pub fn with_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts = texts.into_iter().map(Into::into).collect();
        self.count = self.texts.len();
        self.text = self.texts.first().cloned();
        self
    }

    /// Set input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a computed style
    #[must_use]
    pub fn with_css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(property.into(), value.into());
        self
    }

    /// Set checked state
    #[must_use]
    pub const fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set match count
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set geometry
    #[must_use]
    pub const fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }

    /// Mark disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn present(&self) -> bool {
        self.count > 0
    }
}

/// Everything a mocked page knows
#[derive(Debug, Default)]
pub struct MockState {
    /// Current URL
    pub url: String,
    /// Elements by canonical locator
    pub elements: HashMap<String, MockElement>,
    /// Canned `evaluate` results by script text
    pub scripts: HashMap<String, serde_json::Value>,
    /// Current viewport
    pub viewport: Viewport,
    /// `confirm`/`alert` auto-accept installed
    pub accepting_dialogs: bool,
    /// Accepted dialog messages
    pub dialogs: Vec<String>,
    /// Call history
    pub calls: Vec<String>,
    /// Session closed
    pub closed: bool,
}

impl MockState {
    /// Element found by `locator`, if mocked
    #[must_use]
    pub fn element(&self, locator: &Locator) -> Option<&MockElement> {
        self.elements.get(&locator.to_string())
    }

    /// Mutable element, inserting an absent one if needed
    pub fn element_mut(&mut self, locator: &Locator) -> &mut MockElement {
        self.elements.entry(locator.to_string()).or_default()
    }

    /// Replace an element
    pub fn set_element(&mut self, locator: &Locator, element: MockElement) {
        self.elements.insert(locator.to_string(), element);
    }

    /// Remove an element from the page
    pub fn remove_element(&mut self, locator: &Locator) {
        self.elements.remove(&locator.to_string());
    }

    /// Text of an element, empty when absent
    #[must_use]
    pub fn text_of(&self, locator: &Locator) -> String {
        self.element(locator)
            .and_then(|e| e.text.clone())
            .unwrap_or_default()
    }

    /// Open a native dialog; returns whether it was accepted
    pub fn raise_dialog(&mut self, message: impl Into<String>) -> bool {
        if self.accepting_dialogs {
            self.dialogs.push(message.into());
            true
        } else {
            false
        }
    }

    fn present(&self, locator: &Locator) -> E2eResult<&MockElement> {
        self.element(locator)
            .filter(|e| e.present())
            .ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Trigger {
    Click(String),
    Hover(String),
    Key(Key),
    MouseClick,
    Goto,
    Reload,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`PageDriver`]
pub struct MockDriver {
    state: Mutex<MockState>,
    handlers: Mutex<HashMap<Trigger, Vec<MockHandler>>>,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Empty page at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                url: "about:blank".to_string(),
                ..MockState::default()
            }),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` against the page state
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut lock(&self.state))
    }

    /// Add or replace an element
    pub fn set_element(&self, locator: &Locator, element: MockElement) {
        self.with_state(|s| s.set_element(locator, element));
    }

    /// Mutate an element in place
    pub fn update_element(&self, locator: &Locator, f: impl FnOnce(&mut MockElement)) {
        self.with_state(|s| f(s.element_mut(locator)));
    }

    /// Snapshot of an element
    #[must_use]
    pub fn element(&self, locator: &Locator) -> Option<MockElement> {
        self.with_state(|s| s.element(locator).cloned())
    }

    /// Canned result for `evaluate(script)`
    pub fn set_script_result(&self, script: impl Into<String>, value: serde_json::Value) {
        self.with_state(|s| {
            s.scripts.insert(script.into(), value);
        });
    }

    fn on(&self, trigger: Trigger, handler: MockHandler) {
        lock(&self.handlers).entry(trigger).or_default().push(handler);
    }

    /// Run `handler` after every click on `locator`
    pub fn on_click(&self, locator: &Locator, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::Click(locator.to_string()), Arc::new(handler));
    }

    /// Run `handler` after every hover over `locator`
    pub fn on_hover(&self, locator: &Locator, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::Hover(locator.to_string()), Arc::new(handler));
    }

    /// Run `handler` after every press of `key`
    pub fn on_key(&self, key: Key, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::Key(key), Arc::new(handler));
    }

    /// Run `handler` after every coordinate click
    pub fn on_mouse_click(&self, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::MouseClick, Arc::new(handler));
    }

    /// Run `handler` after every navigation
    pub fn on_goto(&self, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::Goto, Arc::new(handler));
    }

    /// Run `handler` after every reload
    pub fn on_reload(&self, handler: impl Fn(&mut MockState) + Send + Sync + 'static) {
        self.on(Trigger::Reload, Arc::new(handler));
    }

    fn fire(&self, trigger: &Trigger) {
        let handlers = lock(&self.handlers).get(trigger).cloned().unwrap_or_default();
        let mut state = lock(&self.state);
        for handler in handlers {
            handler(&mut state);
        }
    }

    fn record(&self, call: String) {
        lock(&self.state).calls.push(call);
    }

    /// Call history
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.with_state(|s| s.calls.clone())
    }

    /// Whether any recorded call starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.with_state(|s| s.calls.iter().any(|c| c.starts_with(prefix)))
    }

    /// Number of clicks on `locator`
    #[must_use]
    pub fn clicks(&self, locator: &Locator) -> usize {
        let wanted = format!("click {locator}");
        self.with_state(|s| s.calls.iter().filter(|c| **c == wanted).count())
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> String {
        self.with_state(|s| s.url.clone())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.with_state(|s| {
            s.url = url.to_string();
            s.accepting_dialogs = false;
            s.calls.push(format!("goto {url}"));
        });
        self.fire(&Trigger::Goto);
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.url())
    }

    async fn reload(&self) -> E2eResult<()> {
        self.with_state(|s| {
            s.accepting_dialogs = false;
            s.calls.push("reload".to_string());
        });
        self.fire(&Trigger::Reload);
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        Ok(self.with_state(|s| s.element(locator).map_or(0, |e| e.count)))
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        Ok(self.with_state(|s| s.element(locator).is_some_and(|e| e.present() && e.visible)))
    }

    async fn is_enabled(&self, locator: &Locator) -> E2eResult<bool> {
        self.with_state(|s| s.present(locator).map(|e| e.enabled))
    }

    async fn is_checked(&self, locator: &Locator) -> E2eResult<bool> {
        self.with_state(|s| s.present(locator).map(|e| e.checked))
    }

    async fn text_content(&self, locator: &Locator) -> E2eResult<Option<String>> {
        Ok(self.with_state(|s| {
            s.element(locator)
                .filter(|e| e.present())
                .and_then(|e| e.text.clone())
        }))
    }

    async fn all_text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        Ok(self.with_state(|s| match s.element(locator) {
            Some(e) if e.present() && !e.texts.is_empty() => e.texts.clone(),
            Some(e) if e.present() => e.text.iter().cloned().collect(),
            _ => Vec::new(),
        }))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        self.with_state(|s| s.present(locator).map(|e| e.attributes.get(name).cloned()))
    }

    async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        self.with_state(|s| s.present(locator).map(|e| e.value.clone()))
    }

    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String> {
        self.with_state(|s| {
            s.present(locator)
                .map(|e| e.css.get(property).cloned().unwrap_or_default())
        })
    }

    async fn bounding_box(&self, locator: &Locator) -> E2eResult<Option<BoundingBox>> {
        Ok(self.with_state(|s| {
            s.element(locator)
                .filter(|e| e.present() && e.visible)
                .and_then(|e| e.bounding_box)
        }))
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.with_state(|s| s.present(locator).map(|_| ()))?;
        self.record(format!("click {locator}"));
        self.fire(&Trigger::Click(locator.to_string()));
        Ok(())
    }

    async fn hover(&self, locator: &Locator) -> E2eResult<()> {
        self.with_state(|s| s.present(locator).map(|_| ()))?;
        self.record(format!("hover {locator}"));
        self.fire(&Trigger::Hover(locator.to_string()));
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.with_state(|s| {
            s.present(locator)?;
            s.element_mut(locator).value = value.to_string();
            s.calls.push(format!("fill {locator} {value}"));
            Ok(())
        })
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.with_state(|s| {
            s.present(locator)?;
            s.element_mut(locator).value.push_str(text);
            s.calls.push(format!("type {locator} {text}"));
            Ok(())
        })
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
        self.with_state(|s| {
            s.present(locator)?;
            s.element_mut(locator).checked = checked;
            s.calls.push(format!("check {locator} {checked}"));
            Ok(())
        })
    }

    async fn press_key(&self, key: Key) -> E2eResult<()> {
        self.record(format!("press {key}"));
        self.fire(&Trigger::Key(key));
        Ok(())
    }

    async fn mouse_click(&self, x: f64, y: f64) -> E2eResult<()> {
        self.record(format!("mouse_click {x},{y}"));
        self.fire(&Trigger::MouseClick);
        Ok(())
    }

    async fn set_viewport(&self, viewport: Viewport) -> E2eResult<()> {
        self.with_state(|s| {
            s.viewport = viewport;
            s.calls
                .push(format!("viewport {}x{}", viewport.width, viewport.height));
        });
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        Ok(self.with_state(|s| {
            s.calls.push(format!("evaluate {script}"));
            s.scripts.get(script).cloned().unwrap_or(serde_json::Value::Null)
        }))
    }

    async fn accept_dialogs(&self) -> E2eResult<()> {
        self.with_state(|s| s.accepting_dialogs = true);
        Ok(())
    }

    async fn dialog_messages(&self) -> E2eResult<Vec<String>> {
        Ok(self.with_state(|s| s.dialogs.clone()))
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
    }

    async fn close(&self) -> E2eResult<()> {
        self.with_state(|s| s.closed = true);
        Ok(())
    }
}

/// Builds a fresh [`MockDriver`] per session
pub struct MockDriverFactory {
    build: Box<dyn Fn() -> MockDriver + Send + Sync>,
    options: BrowserOptions,
    opened: AtomicUsize,
}

impl std::fmt::Debug for MockDriverFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriverFactory")
            .field("opened", &self.opened.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl MockDriverFactory {
    /// Factory calling `build` for every session
    pub fn new(build: impl Fn() -> MockDriver + Send + Sync + 'static) -> Self {
        Self {
            build: Box::new(build),
            options: BrowserOptions::default(),
            opened: AtomicUsize::new(0),
        }
    }

    /// Sessions opened so far
    #[must_use]
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriverFactory for MockDriverFactory {
    async fn open(&self) -> E2eResult<Arc<dyn PageDriver>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new((self.build)()))
    }

    fn options(&self) -> &BrowserOptions {
        &self.options
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn button() -> Locator {
        Locator::css("button.go")
    }

    #[tokio::test]
    async fn test_missing_element_is_absent() {
        let driver = MockDriver::new();
        assert_eq!(driver.count(&button()).await.unwrap(), 0);
        assert!(!driver.is_visible(&button()).await.unwrap());
        assert!(driver.text_content(&button()).await.unwrap().is_none());
        assert!(driver.click(&button()).await.is_err());
    }

    #[tokio::test]
    async fn test_click_runs_handler_and_records() {
        let driver = MockDriver::new();
        driver.set_element(&button(), MockElement::visible().with_text("Go"));
        driver.on_click(&button(), |s| s.url = "http://app/next".to_string());

        driver.click(&button()).await.unwrap();
        assert_eq!(driver.url(), "http://app/next");
        assert_eq!(driver.clicks(&button()), 1);
        assert!(driver.was_called("click"));
    }

    #[tokio::test]
    async fn test_fill_and_type() {
        let input = Locator::placeholder("Name");
        let driver = MockDriver::new();
        driver.set_element(&input, MockElement::visible().with_value("old"));

        driver.fill(&input, "Ann").await.unwrap();
        driver.type_text(&input, "a").await.unwrap();
        assert_eq!(driver.input_value(&input).await.unwrap(), "Anna");
    }

    #[tokio::test]
    async fn test_dialogs_only_recorded_when_accepting() {
        let driver = MockDriver::new();
        driver.set_element(&button(), MockElement::visible());
        driver.on_click(&button(), |s| {
            s.raise_dialog("Sure?");
        });

        driver.click(&button()).await.unwrap();
        assert!(driver.dialog_messages().await.unwrap().is_empty());

        driver.accept_dialogs().await.unwrap();
        driver.click(&button()).await.unwrap();
        assert_eq!(driver.dialog_messages().await.unwrap(), vec!["Sure?"]);
    }

    #[tokio::test]
    async fn test_all_texts_fall_back_to_text() {
        let cells = Locator::css("td");
        let driver = MockDriver::new();
        driver.set_element(&cells, MockElement::visible().with_text("x"));
        assert_eq!(driver.all_text_contents(&cells).await.unwrap(), vec!["x"]);

        driver.set_element(&cells, MockElement::visible().with_texts(["a", "b"]));
        assert_eq!(driver.count(&cells).await.unwrap(), 2);
        assert_eq!(driver.all_text_contents(&cells).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_script_results() {
        let driver = MockDriver::new();
        driver.set_script_result("1 + 1", serde_json::json!(2));
        assert_eq!(driver.evaluate("1 + 1").await.unwrap(), serde_json::json!(2));
        assert_eq!(driver.evaluate("other").await.unwrap(), serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_goto_handler_renders_route() {
        let driver = MockDriver::new();
        driver.on_goto(|s| {
            if s.url.ends_with("/pages") {
                s.set_element(&button(), MockElement::visible());
            }
        });
        driver.goto("http://app/other").await.unwrap();
        assert_eq!(driver.count(&button()).await.unwrap(), 0);
        driver.goto("http://app/pages").await.unwrap();
        assert!(driver.is_visible(&button()).await.unwrap());
        assert!(driver.was_called("goto http://app/pages"));
    }

    #[tokio::test]
    async fn test_factory_builds_fresh_sessions() {
        let factory = MockDriverFactory::new(MockDriver::new);
        let a = factory.open().await.unwrap();
        a.goto("http://a").await.unwrap();
        let b = factory.open().await.unwrap();
        assert_eq!(b.current_url().await.unwrap(), "about:blank");
        assert_eq!(factory.opened(), 2);
    }
}
