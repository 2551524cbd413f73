//! Modal & Overlays > Window.
//!
//! Windows open full-screen. The overlay header carries three controls in
//! a fixed order (minimize, collapse, close), addressed by position.

use crate::driver::Key;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::E2eResult;
use crate::wait::ElementState;
use tracing::debug;

/// Body text of the template and backdrop windows
pub const TEMPLATE_TEXT: &str =
    "Here is the text provided via config: \"some text to pass into template\"";
/// Body text of the window that ignores ESC
pub const NO_ESC_TEXT: &str = "Disabled close on escape click.";

/// Buttons that open a window variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Form,
    Template,
    Backdrop,
    NoBackdrop,
}

impl WindowKind {
    /// Label of the opening button
    #[must_use]
    pub const fn button_text(self) -> &'static str {
        match self {
            Self::Form => "Open Window Form",
            Self::Template => "Open Window With Template",
            Self::Backdrop => "Open Window With Backdrop",
            Self::NoBackdrop => "Open Window Without Backdrop",
        }
    }

    /// Whether ESC closes this window
    #[must_use]
    pub const fn closes_on_escape(self) -> bool {
        !matches!(self, Self::NoBackdrop)
    }
}

/// Overlay header controls, in DOM order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowControl {
    Minimize,
    Collapse,
    Hide,
}

impl WindowControl {
    const fn position(self) -> u8 {
        match self {
            Self::Minimize => 1,
            Self::Collapse => 2,
            Self::Hide => 3,
        }
    }
}

/// Window showcase
#[derive(Debug, Clone)]
pub struct WindowPage {
    page: Page,
}

impl WindowPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Opening button for `kind`
    #[must_use]
    pub fn open_button(kind: WindowKind) -> Locator {
        Locator::css("button").filter_has_text(kind.button_text())
    }

    /// Card of a full-screen window
    #[must_use]
    pub fn window_card() -> Locator {
        Locator::xpath("//nb-window[@class='full-screen ng-star-inserted']//nb-card")
    }

    /// Card of a window collapsed out of full screen
    #[must_use]
    pub fn collapsed_window_card() -> Locator {
        Locator::css("nb-window.maximized nb-card")
    }

    /// Body of the open window
    #[must_use]
    pub fn window_body() -> Locator {
        Locator::css("nb-window nb-card-body")
    }

    #[must_use]
    pub fn subject_input() -> Locator {
        Locator::css("#subject")
    }

    #[must_use]
    pub fn text_input() -> Locator {
        Locator::xpath("//textarea[@id='text']")
    }

    /// Header control button
    #[must_use]
    pub fn control(control: WindowControl) -> Locator {
        Locator::css(format!(
            "div[class='cdk-overlay-container'] button:nth-child({})",
            control.position()
        ))
    }

    /// Click the opening button for `kind` and wait for the window
    pub async fn open(&self, kind: WindowKind) -> E2eResult<()> {
        debug!(?kind, "open window");
        self.page.click(&Self::open_button(kind)).await?;
        self.wait_for_window_to_appear().await
    }

    pub async fn wait_for_window_to_appear(&self) -> E2eResult<()> {
        self.page
            .wait_for(&Self::window_card(), ElementState::Visible)
            .await
    }

    /// Fill subject and text of the window form
    pub async fn fill_form(&self, subject: &str, text: &str) -> E2eResult<()> {
        self.page.fill(&Self::subject_input(), subject).await?;
        self.page.fill(&Self::text_input(), text).await
    }

    /// Press a header control and wait for the full-screen card to go
    pub async fn apply(&self, control: WindowControl) -> E2eResult<()> {
        self.page.click(&Self::control(control)).await?;
        self.page
            .wait_for(&Self::window_card(), ElementState::Hidden)
            .await
    }

    pub async fn close_with_escape(&self) -> E2eResult<()> {
        self.page.press(Key::Escape).await
    }

    pub async fn body_text(&self) -> E2eResult<String> {
        self.page.text(&Self::window_body()).await
    }
}
