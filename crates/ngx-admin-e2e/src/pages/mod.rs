//! Page objects, one per application area.
//!
//! Every page object holds a clone of the session's [`Page`](crate::page::Page)
//! context. Locators are built on demand and resolved lazily by the driver
//! on each interaction.

pub mod datepicker;
pub mod dialog;
pub mod form_layouts;
pub mod header;
pub mod iot_dashboard;
pub mod navigation;
pub mod smart_table;
pub mod toastr;
pub mod tooltip;
pub mod window;

pub use datepicker::DatepickerPage;
pub use dialog::{DialogKind, DialogPage};
pub use form_layouts::FormLayoutsPage;
pub use header::{HeaderPage, Theme};
pub use iot_dashboard::{Climate, ClimateMode, IoTDashboardPage};
pub use navigation::NavigationPage;
pub use smart_table::{AgeFilterOutcome, SmartTablePage};
pub use toastr::ToastrPage;
pub use tooltip::TooltipPage;
pub use window::{WindowControl, WindowKind, WindowPage};
