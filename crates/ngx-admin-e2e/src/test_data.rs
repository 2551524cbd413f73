//! Data tables driving the scenarios.

use crate::config::Viewport;
use crate::env::Environment;
use crate::pages::NavigationPage;
use crate::result::E2eResult;
use serde::Serialize;

/// Navigation method of [`NavigationPage`] reaching one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavigationMethod {
    FormLayouts,
    Datepicker,
    SmartTable,
    Tooltip,
    Dialog,
}

impl NavigationMethod {
    /// Run the method on `nav`
    pub async fn invoke(self, nav: &NavigationPage) -> E2eResult<()> {
        match self {
            Self::FormLayouts => nav.form_layouts_page().await,
            Self::Datepicker => nav.datepicker_page().await,
            Self::SmartTable => nav.smart_table_page().await,
            Self::Tooltip => nav.tooltip_page().await,
            Self::Dialog => nav.dialog_page().await,
        }
    }
}

/// A page reachable from the sidebar and the URL it must land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationTarget {
    /// Menu label
    pub name: &'static str,
    /// Navigation method reaching it
    pub method: NavigationMethod,
    /// Route under the base URL
    pub path: &'static str,
}

impl NavigationTarget {
    /// Absolute URL under `base_url`
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Every menu-navigation target with its expected route
pub const NAVIGATION_TARGETS: [NavigationTarget; 5] = [
    NavigationTarget {
        name: "Form Layouts",
        method: NavigationMethod::FormLayouts,
        path: "/pages/forms/layouts",
    },
    NavigationTarget {
        name: "Datepicker",
        method: NavigationMethod::Datepicker,
        path: "/pages/forms/datepicker",
    },
    NavigationTarget {
        name: "Smart Table",
        method: NavigationMethod::SmartTable,
        path: "/pages/tables/smart-table",
    },
    NavigationTarget {
        name: "Tooltip",
        method: NavigationMethod::Tooltip,
        path: "/pages/modal-overlays/tooltip",
    },
    NavigationTarget {
        name: "Dialog",
        method: NavigationMethod::Dialog,
        path: "/pages/modal-overlays/dialog",
    },
];

/// Values typed into a form layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormRecord {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: Option<String>,
    /// Grid form radio option
    pub option: Option<String>,
    pub remember_me: bool,
}

impl FormRecord {
    /// Grid form submission
    #[must_use]
    pub fn grid(email: impl Into<String>, password: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            option: Some(option.into()),
            remember_me: false,
        }
    }

    /// Inline form submission
    #[must_use]
    pub fn inline(email: impl Into<String>, name: impl Into<String>, remember_me: bool) -> Self {
        Self {
            email: email.into(),
            password: String::new(),
            name: Some(name.into()),
            option: None,
            remember_me,
        }
    }
}

/// Grid option picked with the configured credentials
pub const GRID_OPTION: &str = "Option 2";

/// Grid submission with the configured user, then a fixed inline submission
#[must_use]
pub fn test_forms(env: &Environment) -> [FormRecord; 2] {
    [
        FormRecord::grid(&env.test_user.email, &env.test_user.password, GRID_OPTION),
        FormRecord::inline("johnsmith@email.com", "John Smith", true),
    ]
}

/// Names submitted through the enter-name dialog
pub const DIALOG_NAMES: [&str; 3] = ["Alice", "Bob", "Charlie"];

/// Age typed into the smart table editor
pub const EDITED_AGE: &str = "35";
/// Page holding the row edited by id
pub const EDIT_PAGE: &str = "2";
/// Row id whose email is rewritten
pub const EDIT_ROW_ID: &str = "11";

/// Day offsets used by the datepicker scenarios
pub const SINGLE_DATE_OFFSET: i64 = 7;
/// Range start and end offsets
pub const RANGE_OFFSETS: (i64, i64) = (3, 5);

/// Named viewport for responsiveness checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NamedViewport {
    pub name: &'static str,
    pub viewport: Viewport,
}

/// Viewports the solar card is checked at
pub const CHART_VIEWPORTS: [NamedViewport; 3] = [
    NamedViewport {
        name: "Small Mobile",
        viewport: Viewport::new(320, 568),
    },
    NamedViewport {
        name: "Tablet",
        viewport: Viewport::new(768, 1024),
    },
    NamedViewport {
        name: "Desktop",
        viewport: Viewport::new(1200, 800),
    },
];

/// Viewports the traffic card is checked at
pub const TRAFFIC_VIEWPORTS: [NamedViewport; 3] = [
    NamedViewport {
        name: "Mobile",
        viewport: Viewport::new(375, 667),
    },
    NamedViewport {
        name: "Tablet",
        viewport: Viewport::new(768, 1024),
    },
    NamedViewport {
        name: "Desktop",
        viewport: Viewport::new(1200, 800),
    },
];

/// Successive sizes for the chart resize check
pub const RESIZE_VIEWPORTS: [Viewport; 4] = [
    Viewport::new(400, 600),
    Viewport::new(800, 800),
    Viewport::new(1200, 900),
    Viewport::new(600, 700),
];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};
    use crate::page::Page;
    use crate::pages::navigation::group_of;
    use std::sync::Arc;

    #[test]
    fn test_every_target_is_in_the_menu() {
        for target in NAVIGATION_TARGETS {
            assert!(group_of(target.name).is_some(), "{} not in menu", target.name);
        }
    }

    #[test]
    fn test_target_url() {
        let target = NAVIGATION_TARGETS[2];
        assert_eq!(
            target.url("http://localhost:4200/"),
            "http://localhost:4200/pages/tables/smart-table"
        );
    }

    #[test]
    fn test_forms_from_environment() {
        let env = Environment::from_lookup(|k| {
            Some(match k {
                "TEST_USER_EMAIL" => "qa@example.com".to_string(),
                "TEST_USER_PASSWORD" => "pw".to_string(),
                "CI" | "TEST_AGE_FILTERS" => String::new(),
                _ => "x".to_string(),
            })
        })
        .unwrap();
        let [grid, inline] = test_forms(&env);
        assert_eq!(grid.email, "qa@example.com");
        assert_eq!(grid.option.as_deref(), Some("Option 2"));
        assert!(inline.remember_me);
        assert_eq!(inline.name.as_deref(), Some("John Smith"));
        assert!(inline.password.is_empty());
    }

    #[tokio::test]
    async fn test_method_dispatch_clicks_its_item() {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app", Timeouts::fast());
        let nav = NavigationPage::new(page);
        let group = nav.group("Modal & Overlays");
        mock.set_element(
            &group,
            MockElement::visible().with_attribute("aria-expanded", "true"),
        );
        let item = NavigationPage::menu_item("Tooltip");
        mock.set_element(&item, MockElement::visible());

        NavigationMethod::Tooltip.invoke(&nav).await.unwrap();
        assert_eq!(mock.clicks(&item), 1);
    }

    #[test]
    fn test_password_not_serialized() {
        let json = serde_json::to_string(&FormRecord::grid("a@b.c", "secret", "Option 1")).unwrap();
        assert!(!json.contains("secret"));
    }
}
