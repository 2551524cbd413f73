//! One instance of every page object per session.

use crate::clock::Clock;
use crate::page::Page;
use crate::pages::{
    DatepickerPage, DialogPage, FormLayoutsPage, HeaderPage, IoTDashboardPage, NavigationPage,
    SmartTablePage, ToastrPage, TooltipPage, WindowPage,
};
use std::sync::Arc;

/// Page objects wired to one [`Page`]
#[derive(Debug, Clone)]
pub struct PageManager {
    page: Page,
    navigation: NavigationPage,
    form_layouts: FormLayoutsPage,
    datepicker: DatepickerPage,
    smart_table: SmartTablePage,
    iot_dashboard: IoTDashboardPage,
    dialog: DialogPage,
    window: WindowPage,
    header: HeaderPage,
    toastr: ToastrPage,
    tooltip: TooltipPage,
}

impl PageManager {
    /// Build every page object for `page`; the datepicker reads "today"
    /// from `clock`.
    #[must_use]
    pub fn new(page: Page, clock: Arc<dyn Clock>) -> Self {
        Self {
            navigation: NavigationPage::new(page.clone()),
            form_layouts: FormLayoutsPage::new(page.clone()),
            datepicker: DatepickerPage::new(page.clone(), clock),
            smart_table: SmartTablePage::new(page.clone()),
            iot_dashboard: IoTDashboardPage::new(page.clone()),
            dialog: DialogPage::new(page.clone()),
            window: WindowPage::new(page.clone()),
            header: HeaderPage::new(page.clone()),
            toastr: ToastrPage::new(page.clone()),
            tooltip: TooltipPage::new(page.clone()),
            page,
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn navigate_to(&self) -> &NavigationPage {
        &self.navigation
    }

    #[must_use]
    pub const fn on_form_layouts(&self) -> &FormLayoutsPage {
        &self.form_layouts
    }

    #[must_use]
    pub const fn on_datepicker(&self) -> &DatepickerPage {
        &self.datepicker
    }

    #[must_use]
    pub const fn on_smart_table(&self) -> &SmartTablePage {
        &self.smart_table
    }

    #[must_use]
    pub const fn on_iot_dashboard(&self) -> &IoTDashboardPage {
        &self.iot_dashboard
    }

    #[must_use]
    pub const fn on_dialog(&self) -> &DialogPage {
        &self.dialog
    }

    #[must_use]
    pub const fn on_window(&self) -> &WindowPage {
        &self.window
    }

    #[must_use]
    pub const fn on_header(&self) -> &HeaderPage {
        &self.header
    }

    #[must_use]
    pub const fn on_toastr(&self) -> &ToastrPage {
        &self.toastr
    }

    #[must_use]
    pub const fn on_tooltip(&self) -> &TooltipPage {
        &self.tooltip
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};

    #[tokio::test]
    async fn test_page_objects_share_one_session() {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app/", Timeouts::fast());
        let manager = PageManager::new(page, Arc::new(FixedClock::ymd(2026, 10, 16).unwrap()));

        let group = manager.navigate_to().group("Forms");
        mock.set_element(&group, MockElement::visible().with_attribute("aria-expanded", "true"));
        mock.set_element(&NavigationPage::menu_item("Datepicker"), MockElement::visible());
        manager.navigate_to().datepicker_page().await.unwrap();

        manager.page().goto("/pages").await.unwrap();
        assert_eq!(mock.url(), "http://app/pages");
        assert_eq!(manager.navigate_to().cached_groups(), 1);
    }
}
