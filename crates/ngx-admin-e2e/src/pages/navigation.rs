//! Sidebar menu navigation.
//!
//! Menu items live inside collapsible groups. Reaching an item means
//! expanding its group (only when `aria-expanded` is not already `"true"`)
//! and clicking the item text. Group locators are cached per session.

use crate::locator::Locator;
use crate::page::Page;
use crate::result::{E2eError, E2eResult};
use crate::wait::{poll_until, ElementState, WaitOptions};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Sidebar groups and the items they contain.
///
/// Items starting with `/` are routes reached by URL rather than by a menu
/// click; a group whose only item is its own title is a top-level link.
pub const MENU_GROUPS: &[(&str, &[&str])] = &[
    ("Forms", &["Form Layouts", "Datepicker"]),
    (
        "Modal & Overlays",
        &["Dialog", "Window", "Popover", "Toastr", "Tooltip"],
    ),
    ("Extra Components", &["Calendar"]),
    ("Charts", &["Echarts"]),
    ("Tables & Data", &["Smart Table", "Tree Grid"]),
    (
        "Auth",
        &["Login", "Register", "Request Password", "Reset Password"],
    ),
    ("Home", &["/"]),
    ("IoT Dashboard", &["IoT Dashboard"]),
];

/// Group containing `item`, if any
#[must_use]
pub fn group_of(item: &str) -> Option<&'static str> {
    MENU_GROUPS
        .iter()
        .find(|(_, items)| items.contains(&item))
        .map(|(group, _)| *group)
}

/// Sidebar navigation for one session
#[derive(Debug, Clone)]
pub struct NavigationPage {
    page: Page,
    groups: Arc<Mutex<HashMap<String, Locator>>>,
}

impl NavigationPage {
    /// Navigation bound to `page`, with an empty group cache
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            page,
            groups: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Shared page context
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Collapsible group header with `title`, cached after first lookup
    #[must_use]
    pub fn group(&self, title: &str) -> Locator {
        let mut cache = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(title.to_string())
            .or_insert_with(|| Locator::title(title))
            .clone()
    }

    /// Number of group locators created so far
    #[must_use]
    pub fn cached_groups(&self) -> usize {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Menu entry whose text is exactly `item`
    #[must_use]
    pub fn menu_item(item: &str) -> Locator {
        Locator::css("nb-menu").get_by_exact_text(item)
    }

    /// Expand a group unless it is already expanded; returns whether a
    /// click was needed.
    pub async fn expand_group(&self, title: &str) -> E2eResult<bool> {
        let group = self.group(title);
        self.page.wait_for(&group, ElementState::Visible).await?;

        if self.page.attribute(&group, "aria-expanded").await?.as_deref() == Some("true") {
            debug!(group = title, "already expanded");
            return Ok(false);
        }

        self.page.click(&group).await?;
        let options = WaitOptions::new()
            .with_timeout(self.page.timeouts().menu_expansion_ms)
            .with_poll_interval(self.page.timeouts().poll_interval_ms);
        let expanded = poll_until(&format!("{group} to expand"), options, || {
            let (page, group) = (&self.page, &group);
            async move {
                let state = page.driver().attribute(group, "aria-expanded").await?;
                Ok(state.as_deref() == Some("true"))
            }
        })
        .await;

        match expanded {
            Ok(()) => Ok(true),
            Err(E2eError::Timeout { .. }) => Err(E2eError::MenuGroupNotExpanded {
                title: title.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Open the menu entry labelled `item`
    pub async fn navigate_to_menu_item(&self, item: &str) -> E2eResult<()> {
        let group = group_of(item).ok_or_else(|| E2eError::MenuItemNotFound {
            item: item.to_string(),
        })?;
        info!(item, group, "navigate via menu");

        if item.starts_with('/') {
            return self.page.goto(item).await;
        }
        if group == item {
            return self.page.click(&self.group(group)).await;
        }
        self.expand_group(group).await?;
        self.page.click(&Self::menu_item(item)).await
    }

    /// Forms > Form Layouts
    pub async fn form_layouts_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Form Layouts").await
    }

    /// Forms > Datepicker
    pub async fn datepicker_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Datepicker").await
    }

    /// Tables & Data > Smart Table
    pub async fn smart_table_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Smart Table").await
    }

    /// Modal & Overlays > Tooltip
    pub async fn tooltip_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Tooltip").await
    }

    /// Modal & Overlays > Dialog
    pub async fn dialog_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Dialog").await
    }

    /// Modal & Overlays > Window
    pub async fn window_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Window").await
    }

    /// Modal & Overlays > Popover
    pub async fn popover_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Popover").await
    }

    /// Modal & Overlays > Toastr
    pub async fn toastr_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("Toastr").await
    }

    /// IoT Dashboard
    pub async fn iot_dashboard_page(&self) -> E2eResult<()> {
        self.navigate_to_menu_item("IoT Dashboard").await
    }

    /// Load `url` directly
    pub async fn navigate_to(&self, url: &str) -> E2eResult<()> {
        self.page.goto(url).await
    }

    /// Load the application root
    pub async fn navigate_to_home(&self) -> E2eResult<()> {
        self.page.goto("/").await
    }
}
