//! Forms > Form Layouts.

use crate::locator::{AriaRole, Locator};
use crate::page::Page;
use crate::result::E2eResult;
use crate::test_data::FormRecord;
use crate::wait::ElementState;
use tracing::info;

/// Title of the grid form card
pub const GRID_FORM: &str = "Using the Grid";
/// Title of the inline form card
pub const INLINE_FORM: &str = "Inline form";

/// Grid and inline forms
#[derive(Debug, Clone)]
pub struct FormLayoutsPage {
    page: Page,
}

impl FormLayoutsPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// `<form>` inside the card titled `card`
    #[must_use]
    pub fn form(card: &str) -> Locator {
        Locator::css("nb-card").filter_has_text(card).locator("form")
    }

    /// The "Using the Grid" form
    #[must_use]
    pub fn grid_form() -> Locator {
        Self::form(GRID_FORM)
    }

    /// The "Inline form" form
    #[must_use]
    pub fn inline_form() -> Locator {
        Self::form(INLINE_FORM)
    }

    /// Element with `role` and accessible `name` inside the card titled `card`
    #[must_use]
    pub fn form_element(card: &str, role: AriaRole, name: &str) -> Locator {
        Locator::css("nb-card")
            .filter_has_text(card)
            .get_by_role_named(role, name)
    }

    /// Radio option label in the grid form
    #[must_use]
    pub fn grid_option_label(option: &str) -> Locator {
        Self::grid_form().locator("label").filter_has_text(option)
    }

    /// Fill and submit the grid form, picking `record.option` when set
    pub async fn submit_grid_form(&self, record: &FormRecord) -> E2eResult<()> {
        let form = Self::grid_form();
        self.page.wait_for(&form, ElementState::Visible).await?;
        info!(email = %record.email, option = ?record.option, "submit grid form");

        self.page
            .fill(&form.clone().get_by_role_named(AriaRole::Textbox, "Email"), &record.email)
            .await?;
        self.page
            .fill(
                &form.clone().get_by_role_named(AriaRole::Textbox, "Password"),
                &record.password,
            )
            .await?;
        if let Some(option) = &record.option {
            self.page.click(&Self::grid_option_label(option)).await?;
        }
        self.page
            .click(&form.get_by_role_named(AriaRole::Button, "Sign In"))
            .await
    }

    /// Fill and submit the inline form, ticking "Remember me" when asked
    pub async fn submit_inline_form(&self, record: &FormRecord) -> E2eResult<()> {
        let form = Self::inline_form();
        self.page.wait_for(&form, ElementState::Visible).await?;
        info!(email = %record.email, remember_me = record.remember_me, "submit inline form");

        let name = record.name.as_deref().unwrap_or_default();
        self.page
            .fill(&form.clone().get_by_role_named(AriaRole::Textbox, "Jane Doe"), name)
            .await?;
        self.page
            .fill(&form.clone().get_by_role_named(AriaRole::Textbox, "Email"), &record.email)
            .await?;
        if record.remember_me {
            self.page
                .set_checked_forced(
                    &form.clone().get_by_role_named(AriaRole::Checkbox, "Remember me"),
                    true,
                )
                .await?;
        }
        self.page
            .click(&form.get_by_role_named(AriaRole::Button, "Submit"))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, FormLayoutsPage) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app", Timeouts::fast());
        (mock, FormLayoutsPage::new(page))
    }

    fn field(form: &Locator, role: AriaRole, name: &str) -> Locator {
        form.clone().get_by_role_named(role, name)
    }

    #[tokio::test]
    async fn test_grid_form_submit() {
        let (mock, forms) = setup();
        let form = FormLayoutsPage::grid_form();
        mock.set_element(&form, MockElement::visible());
        for (role, name) in [
            (AriaRole::Textbox, "Email"),
            (AriaRole::Textbox, "Password"),
            (AriaRole::Button, "Sign In"),
        ] {
            mock.set_element(&field(&form, role, name), MockElement::visible());
        }
        mock.set_element(&FormLayoutsPage::grid_option_label("Option 2"), MockElement::visible());

        let record = FormRecord::grid("qa@example.com", "secret", "Option 2");
        forms.submit_grid_form(&record).await.unwrap();

        let email = field(&form, AriaRole::Textbox, "Email");
        assert_eq!(mock.element(&email).unwrap().value, "qa@example.com");
        assert_eq!(mock.clicks(&FormLayoutsPage::grid_option_label("Option 2")), 1);
        assert_eq!(mock.clicks(&field(&form, AriaRole::Button, "Sign In")), 1);
    }

    #[tokio::test]
    async fn test_inline_form_checks_hidden_checkbox() {
        let (mock, forms) = setup();
        let form = FormLayoutsPage::inline_form();
        mock.set_element(&form, MockElement::visible());
        for name in ["Jane Doe", "Email"] {
            mock.set_element(&field(&form, AriaRole::Textbox, name), MockElement::visible());
        }
        let remember = field(&form, AriaRole::Checkbox, "Remember me");
        mock.set_element(&remember, MockElement::hidden());
        mock.set_element(&field(&form, AriaRole::Button, "Submit"), MockElement::visible());

        let record = FormRecord::inline("johnsmith@email.com", "John Smith", true);
        forms.submit_inline_form(&record).await.unwrap();

        assert!(mock.element(&remember).unwrap().checked);
        assert_eq!(
            mock.element(&field(&form, AriaRole::Textbox, "Jane Doe")).unwrap().value,
            "John Smith"
        );
    }

    #[tokio::test]
    async fn test_missing_form_times_out() {
        let (_mock, forms) = setup();
        let record = FormRecord::inline("a@b.c", "A", false);
        assert!(forms.submit_inline_form(&record).await.is_err());
    }

    #[test]
    fn test_form_element_locator() {
        assert_eq!(
            FormLayoutsPage::form_element(GRID_FORM, AriaRole::Radio, "Option 1").to_string(),
            "css=nb-card >> has-text=\"Using the Grid\" >> role=radio[name=\"Option 1\"]"
        );
    }
}
