//! Chromium driver over the DevTools protocol (chromiumoxide).
//!
//! Locators are compiled to JS by [`Locator::script`]; every script
//! returns `JSON.stringify(...)` so results come back as one string and are
//! decoded with `serde_json`. Pointer input goes through
//! `Input.dispatchMouseEvent` at the element's centre, text through
//! `Input.insertText`, keys through `Input.dispatchKeyEvent`.

use crate::config::{BrowserOptions, Viewport};
use crate::driver::{DriverFactory, Key, PageDriver};
use crate::locator::{BoundingBox, Locator};
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, InsertTextParams, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Replaces the native dialogs with accepting stubs that record messages
const DIALOG_HOOK: &str = r"(() => {
  window.__e2eDialogs = window.__e2eDialogs || [];
  const record = (m) => { window.__e2eDialogs.push(String(m)); };
  window.confirm = (m) => { record(m); return true; };
  window.alert = (m) => { record(m); };
  window.prompt = (m, d) => { record(m); return d === undefined ? '' : d; };
})();";

fn driver_err(e: impl std::fmt::Display) -> E2eError {
    E2eError::driver(e.to_string())
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// One browser with one page
pub struct CdpDriver {
    browser: Mutex<Browser>,
    page: CdpPage,
    handler: JoinHandle<()>,
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver").finish_non_exhaustive()
    }
}

impl CdpDriver {
    /// Launch Chromium with `options` and open a blank page
    ///
    /// # Errors
    ///
    /// Returns [`E2eError::BrowserLaunch`] if Chromium cannot be started
    pub async fn launch(options: &BrowserOptions) -> E2eResult<Self> {
        let launch_err = |e: String| E2eError::BrowserLaunch { message: e };
        let mut builder = BrowserConfig::builder().window_size(
            options.viewport.width,
            options.viewport.height,
        );
        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &options.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(launch_err)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| launch_err(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| launch_err(e.to_string()))?;
        let driver = Self {
            browser: Mutex::new(browser),
            page,
            handler,
        };
        driver.set_viewport(options.viewport).await?;
        info!(headless = options.headless, "browser launched");
        Ok(driver)
    }

    /// Evaluate `expression` and decode its JSON-stringified value
    async fn eval_json<T: DeserializeOwned>(&self, expression: String) -> E2eResult<T> {
        let result = self.page.evaluate(expression).await.map_err(driver_err)?;
        let raw: String = result.into_value().map_err(driver_err)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Run `body` against the locator's matches (`els`)
    async fn on_matches<T: DeserializeOwned>(&self, locator: &Locator, expr: &str) -> E2eResult<T> {
        let body = format!("return JSON.stringify(({expr}) ?? null);");
        self.eval_json(locator.script(&body)).await
    }

    /// Scroll the first match into view and return its centre
    async fn centre(&self, locator: &Locator) -> E2eResult<(f64, f64)> {
        let scrolled: Option<BoundingBox> = self
            .on_matches(
                locator,
                "els.length ? (els[0].scrollIntoView({block: 'center', inline: 'center'}), \
                 (({x, y, width, height}) => ({x, y, width, height}))(els[0].getBoundingClientRect())) : null",
            )
            .await?;
        scrolled
            .map(|b| b.center())
            .ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }

    async fn mouse(&self, kind: DispatchMouseEventType, x: f64, y: f64) -> E2eResult<()> {
        let mut builder = DispatchMouseEventParams::builder().r#type(kind.clone()).x(x).y(y);
        if !matches!(kind, DispatchMouseEventType::MouseMoved) {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        let params = builder.build().map_err(driver_err)?;
        self.page.execute(params).await.map_err(driver_err)?;
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> E2eResult<()> {
        self.mouse(DispatchMouseEventType::MouseMoved, x, y).await?;
        self.mouse(DispatchMouseEventType::MousePressed, x, y).await?;
        self.mouse(DispatchMouseEventType::MouseReleased, x, y).await
    }

    async fn key_event(&self, kind: DispatchKeyEventType, key: Key) -> E2eResult<()> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind.clone())
            .key(key.key())
            .code(key.code())
            .windows_virtual_key_code(key.key_code());
        if key == Key::Enter && matches!(kind, DispatchKeyEventType::KeyDown) {
            builder = builder.text("\r");
        }
        let params = builder.build().map_err(driver_err)?;
        self.page.execute(params).await.map_err(driver_err)?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!(url, "goto");
        self.page
            .goto(url)
            .await
            .map_err(|e| E2eError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.page.url().await.map_err(driver_err)?.unwrap_or_default())
    }

    async fn reload(&self) -> E2eResult<()> {
        self.page.reload().await.map_err(driver_err)?;
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        self.on_matches(locator, "els.length").await
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        self.on_matches(
            locator,
            "els.length > 0 && (() => { const r = els[0].getBoundingClientRect(); \
             const s = getComputedStyle(els[0]); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; })()",
        )
        .await
    }

    async fn is_enabled(&self, locator: &Locator) -> E2eResult<bool> {
        self.on_matches(
            locator,
            "els.length > 0 && !els[0].disabled && els[0].getAttribute('aria-disabled') !== 'true'",
        )
        .await
    }

    async fn is_checked(&self, locator: &Locator) -> E2eResult<bool> {
        self.on_matches(
            locator,
            "els.length > 0 && (els[0].checked === true || els[0].getAttribute('aria-checked') === 'true')",
        )
        .await
    }

    async fn text_content(&self, locator: &Locator) -> E2eResult<Option<String>> {
        self.on_matches(locator, "els.length ? els[0].textContent : null")
            .await
    }

    async fn all_text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        self.on_matches(locator, "els.map(e => e.textContent || '')")
            .await
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        let expr = format!("els.length ? els[0].getAttribute({}) : null", js_string(name));
        self.on_matches(locator, &expr).await
    }

    async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        let value: Option<String> = self
            .on_matches(locator, "els.length ? String(els[0].value ?? '') : null")
            .await?;
        value.ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }

    async fn css_value(&self, locator: &Locator, property: &str) -> E2eResult<String> {
        let expr = format!(
            "els.length ? getComputedStyle(els[0]).getPropertyValue({}) : null",
            js_string(property)
        );
        let value: Option<String> = self.on_matches(locator, &expr).await?;
        value.ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }

    async fn bounding_box(&self, locator: &Locator) -> E2eResult<Option<BoundingBox>> {
        self.on_matches(
            locator,
            "els.length ? (({x, y, width, height}) => ({x, y, width, height}))(els[0].getBoundingClientRect()) : null",
        )
        .await
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let (x, y) = self.centre(locator).await?;
        self.click_at(x, y).await
    }

    async fn hover(&self, locator: &Locator) -> E2eResult<()> {
        let (x, y) = self.centre(locator).await?;
        self.mouse(DispatchMouseEventType::MouseMoved, x, y).await
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        let expr = format!(
            "els.length ? (els[0].focus(), els[0].value = {}, \
             els[0].dispatchEvent(new Event('input', {{bubbles: true}})), \
             els[0].dispatchEvent(new Event('change', {{bubbles: true}})), true) : false",
            js_string(value)
        );
        let found: bool = self.on_matches(locator, &expr).await?;
        found
            .then_some(())
            .ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        let focused: bool = self
            .on_matches(locator, "els.length ? (els[0].focus(), true) : false")
            .await?;
        if !focused {
            return Err(E2eError::driver(format!("no element matches {locator}")));
        }
        for c in text.chars() {
            self.page
                .execute(InsertTextParams::new(c.to_string()))
                .await
                .map_err(driver_err)?;
        }
        Ok(())
    }

    async fn set_checked(&self, locator: &Locator, checked: bool) -> E2eResult<()> {
        let expr = format!(
            "els.length ? ((els[0].checked !== {checked}) && els[0].click(), true) : false"
        );
        let found: bool = self.on_matches(locator, &expr).await?;
        found
            .then_some(())
            .ok_or_else(|| E2eError::driver(format!("no element matches {locator}")))
    }

    async fn press_key(&self, key: Key) -> E2eResult<()> {
        self.key_event(DispatchKeyEventType::KeyDown, key).await?;
        self.key_event(DispatchKeyEventType::KeyUp, key).await
    }

    async fn mouse_click(&self, x: f64, y: f64) -> E2eResult<()> {
        self.click_at(x, y).await
    }

    async fn set_viewport(&self, viewport: Viewport) -> E2eResult<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            1.0,
            false,
        );
        self.page.execute(params).await.map_err(driver_err)?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> E2eResult<serde_json::Value> {
        self.eval_json(format!("JSON.stringify(({script}) ?? null)"))
            .await
    }

    async fn accept_dialogs(&self) -> E2eResult<()> {
        self.page
            .execute(AddScriptToEvaluateOnNewDocumentParams::new(DIALOG_HOOK))
            .await
            .map_err(driver_err)?;
        self.page.evaluate(DIALOG_HOOK).await.map_err(driver_err)?;
        Ok(())
    }

    async fn dialog_messages(&self) -> E2eResult<Vec<String>> {
        self.eval_json("JSON.stringify(window.__e2eDialogs || [])".to_string())
            .await
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = self.page.execute(params).await.map_err(driver_err)?;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(driver_err)
    }

    async fn close(&self) -> E2eResult<()> {
        if let Err(e) = self.page.clone().close().await {
            warn!(error = %e, "page close failed");
        }
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(driver_err)?;
        let _ = browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// Launches a fresh browser for every session
#[derive(Debug, Clone, Default)]
pub struct CdpDriverFactory {
    options: BrowserOptions,
}

impl CdpDriverFactory {
    #[must_use]
    pub const fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl DriverFactory for CdpDriverFactory {
    async fn open(&self) -> E2eResult<Arc<dyn PageDriver>> {
        Ok(Arc::new(CdpDriver::launch(&self.options).await?))
    }

    fn options(&self) -> &BrowserOptions {
        &self.options
    }
}
