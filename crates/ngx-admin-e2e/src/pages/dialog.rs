//! Modal & Overlays > Dialog.

use crate::driver::Key;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::E2eResult;
use crate::wait::ElementState;
use tracing::debug;

/// Text the template dialog renders from its context
pub const TEMPLATE_TEXT: &str = "this is some additional data passed to dialog";

/// Grace period before asserting a dialog stayed open
pub const NEGATIVE_CHECK_MS: u64 = 500;

/// Backdrop point clicked to dismiss a dialog
pub const BACKDROP_POINT: (f64, f64) = (10.0, 10.0);

/// Buttons that open a dialog variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Template,
    EscClose,
    NoEscClose,
    BackdropClose,
    NoBackdropClose,
    EnterName,
}

impl DialogKind {
    /// Label of the opening button
    #[must_use]
    pub const fn button_text(self) -> &'static str {
        match self {
            Self::Template => "Open Dialog with template",
            Self::EscClose => "Open Dialog with esc close",
            Self::NoEscClose => "Open Dialog without esc close",
            Self::BackdropClose => "Open Dialog with backdrop click",
            Self::NoBackdropClose => "Open without backdrop click",
            Self::EnterName => "Enter Name",
        }
    }
}

/// Dialog showcase
#[derive(Debug, Clone)]
pub struct DialogPage {
    page: Page,
}

impl DialogPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Button labelled `text`
    #[must_use]
    pub fn button(text: &str) -> Locator {
        Locator::css("button").filter_has_text(text)
    }

    /// Opening button for `kind`
    #[must_use]
    pub fn open_button(kind: DialogKind) -> Locator {
        Self::button(kind.button_text())
    }

    /// Card of the open dialog
    #[must_use]
    pub fn dialog_card() -> Locator {
        Locator::css("nb-dialog-container nb-card")
    }

    /// Body of the open dialog
    #[must_use]
    pub fn dialog_body() -> Locator {
        Self::dialog_card().locator("nb-card-body")
    }

    #[must_use]
    pub fn close_button() -> Locator {
        Self::button("Close Dialog")
    }

    #[must_use]
    pub fn name_input() -> Locator {
        Locator::css("input[placeholder='Name'].nb-transition")
    }

    #[must_use]
    pub fn submit_button() -> Locator {
        Self::dialog_card().locator("button").filter_has_text("Submit")
    }

    #[must_use]
    pub fn cancel_button() -> Locator {
        Self::dialog_card().locator("button").filter_has_text("Cancel")
    }

    /// Names submitted through the enter-name dialog
    #[must_use]
    pub fn names_items() -> Locator {
        Locator::css(".result-from-dialog ul li")
    }

    /// Click the opening button for `kind` and wait for the dialog
    pub async fn open(&self, kind: DialogKind) -> E2eResult<()> {
        debug!(?kind, "open dialog");
        self.page.click(&Self::open_button(kind)).await?;
        self.wait_for_dialog_to_appear().await
    }

    pub async fn wait_for_dialog_to_appear(&self) -> E2eResult<()> {
        self.page
            .wait_for(&Self::dialog_card(), ElementState::Visible)
            .await
    }

    pub async fn wait_for_dialog_to_disappear(&self) -> E2eResult<()> {
        self.page
            .wait_for(&Self::dialog_card(), ElementState::Hidden)
            .await
    }

    pub async fn is_dialog_visible(&self) -> E2eResult<bool> {
        self.page.is_visible(&Self::dialog_card()).await
    }

    pub async fn dialog_text(&self) -> E2eResult<String> {
        self.page.text(&Self::dialog_body()).await
    }

    /// Click "Close Dialog"
    pub async fn close_dialog(&self) -> E2eResult<()> {
        self.page.click(&Self::close_button()).await
    }

    pub async fn close_dialog_by_esc_key(&self) -> E2eResult<()> {
        self.page.press(Key::Escape).await
    }

    pub async fn close_dialog_by_clicking_backdrop(&self) -> E2eResult<()> {
        let (x, y) = BACKDROP_POINT;
        self.page.mouse_click(x, y).await
    }

    /// Whether the dialog is still open after a dismissal that should
    /// have been ignored
    pub async fn stays_open(&self) -> E2eResult<bool> {
        self.page.settle(NEGATIVE_CHECK_MS).await;
        self.is_dialog_visible().await
    }

    /// Type `name` into the dialog and submit
    pub async fn enter_name_and_submit(&self, name: &str) -> E2eResult<()> {
        self.page.fill(&Self::name_input(), name).await?;
        self.page.click(&Self::submit_button()).await
    }

    /// Type `name` into the dialog and cancel
    pub async fn enter_name_and_cancel(&self, name: &str) -> E2eResult<()> {
        self.page.fill(&Self::name_input(), name).await?;
        self.page.click(&Self::cancel_button()).await
    }

    /// Open the enter-name dialog, submit `name` and wait for it to close
    pub async fn add_name(&self, name: &str) -> E2eResult<()> {
        self.open(DialogKind::EnterName).await?;
        self.enter_name_and_submit(name).await?;
        self.wait_for_dialog_to_disappear().await
    }

    pub async fn names(&self) -> E2eResult<Vec<String>> {
        self.page.all_texts(&Self::names_items()).await
    }

    pub async fn names_count(&self) -> E2eResult<usize> {
        self.page.count(&Self::names_items()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, DialogPage) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app", Timeouts::fast());
        (mock, DialogPage::new(page))
    }

    /// Dialog opened by `kind`, closable by button and optionally ESC/backdrop
    fn dialog(mock: &MockDriver, kind: DialogKind, esc: bool, backdrop: bool) {
        let button = DialogPage::open_button(kind);
        mock.set_element(&button, MockElement::visible());
        mock.on_click(&button, |s| {
            s.set_element(&DialogPage::dialog_card(), MockElement::visible());
            s.set_element(
                &DialogPage::dialog_body(),
                MockElement::visible().with_text(format!("Template Dialog {TEMPLATE_TEXT}")),
            );
            s.set_element(&DialogPage::close_button(), MockElement::visible());
        });
        mock.on_click(&DialogPage::close_button(), |s| {
            s.remove_element(&DialogPage::dialog_card());
        });
        if esc {
            mock.on_key(Key::Escape, |s| s.remove_element(&DialogPage::dialog_card()));
        }
        if backdrop {
            mock.on_mouse_click(|s| s.remove_element(&DialogPage::dialog_card()));
        }
    }

    mod close_tests {
        use super::*;

        #[tokio::test]
        async fn test_template_dialog_round_trip() {
            let (mock, dialogs) = setup();
            dialog(&mock, DialogKind::Template, false, false);
            dialogs.open(DialogKind::Template).await.unwrap();
            assert!(dialogs.dialog_text().await.unwrap().contains(TEMPLATE_TEXT));
            dialogs.close_dialog().await.unwrap();
            dialogs.wait_for_dialog_to_disappear().await.unwrap();
            assert!(!dialogs.is_dialog_visible().await.unwrap());
        }

        #[tokio::test]
        async fn test_esc_respects_configuration() {
            let (mock, dialogs) = setup();
            dialog(&mock, DialogKind::NoEscClose, false, false);
            dialogs.open(DialogKind::NoEscClose).await.unwrap();
            dialogs.close_dialog_by_esc_key().await.unwrap();
            assert!(dialogs.stays_open().await.unwrap());

            let (mock, dialogs) = setup();
            dialog(&mock, DialogKind::EscClose, true, false);
            dialogs.open(DialogKind::EscClose).await.unwrap();
            dialogs.close_dialog_by_esc_key().await.unwrap();
            dialogs.wait_for_dialog_to_disappear().await.unwrap();
            assert!(mock.was_called("press Escape"));
        }

        #[tokio::test]
        async fn test_backdrop_click_position() {
            let (mock, dialogs) = setup();
            dialog(&mock, DialogKind::BackdropClose, false, true);
            dialogs.open(DialogKind::BackdropClose).await.unwrap();
            dialogs.close_dialog_by_clicking_backdrop().await.unwrap();
            dialogs.wait_for_dialog_to_disappear().await.unwrap();
            assert!(mock.was_called("mouse_click 10,10"));
        }
    }

    mod names_tests {
        use super::*;

        fn name_dialog(mock: &MockDriver) {
            let button = DialogPage::open_button(DialogKind::EnterName);
            mock.set_element(&button, MockElement::visible());
            mock.set_element(&DialogPage::names_items(), MockElement::default());
            mock.on_click(&button, |s| {
                s.set_element(&DialogPage::dialog_card(), MockElement::visible());
                s.set_element(&DialogPage::name_input(), MockElement::visible());
                s.set_element(&DialogPage::submit_button(), MockElement::visible());
                s.set_element(&DialogPage::cancel_button(), MockElement::visible());
            });
            mock.on_click(&DialogPage::submit_button(), |s| {
                let name = s
                    .element(&DialogPage::name_input())
                    .map(|e| e.value.clone())
                    .unwrap_or_default();
                let mut names = s
                    .element(&DialogPage::names_items())
                    .map(|e| e.texts.clone())
                    .unwrap_or_default();
                names.push(name);
                s.set_element(&DialogPage::names_items(), MockElement::visible().with_texts(names));
                s.remove_element(&DialogPage::dialog_card());
            });
            mock.on_click(&DialogPage::cancel_button(), |s| {
                s.remove_element(&DialogPage::dialog_card());
            });
        }

        #[tokio::test]
        async fn test_names_accumulate() {
            let (mock, dialogs) = setup();
            name_dialog(&mock);
            for name in ["Alice", "Bob", "Charlie"] {
                dialogs.add_name(name).await.unwrap();
            }
            assert_eq!(dialogs.names_count().await.unwrap(), 3);
            assert_eq!(dialogs.names().await.unwrap(), ["Alice", "Bob", "Charlie"]);
        }

        #[tokio::test]
        async fn test_cancel_adds_nothing() {
            let (mock, dialogs) = setup();
            name_dialog(&mock);
            let before = dialogs.names_count().await.unwrap();
            dialogs.open(DialogKind::EnterName).await.unwrap();
            dialogs.enter_name_and_cancel("Cancelled Name").await.unwrap();
            dialogs.wait_for_dialog_to_disappear().await.unwrap();
            assert_eq!(dialogs.names_count().await.unwrap(), before);
        }
    }
}
