//! Scenario catalog.
//!
//! A scenario is a named async body plus the setup that runs before it.
//! Bodies receive a fresh [`TestContext`] per attempt and report failures
//! through [`E2eResult`]; they never share state with other scenarios.

use crate::fixture::{Setup, TestContext};
use crate::result::E2eResult;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;

mod forms;
mod iot_dashboard;
mod modal_overlays;
mod navigation;
mod tables;
mod theming;

/// Scenario body
pub type ScenarioFn = for<'a> fn(&'a TestContext) -> BoxFuture<'a, E2eResult<()>>;

/// Application area a scenario belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Area {
    Navigation,
    Forms,
    ModalOverlays,
    Tables,
    #[serde(rename = "iot-dashboard")]
    IoTDashboard,
    Theming,
}

impl Area {
    /// Every area, in catalog order
    pub const ALL: [Self; 6] = [
        Self::Navigation,
        Self::Forms,
        Self::ModalOverlays,
        Self::Tables,
        Self::IoTDashboard,
        Self::Theming,
    ];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Forms => "forms",
            Self::ModalOverlays => "modal-overlays",
            Self::Tables => "tables",
            Self::IoTDashboard => "iot-dashboard",
            Self::Theming => "theming",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One registered scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    pub area: Area,
    pub name: &'static str,
    pub setup: Setup,
    /// Reason the scenario is not run, if any
    pub skip: Option<&'static str>,
    pub run: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("area", &self.area)
            .field("name", &self.name)
            .field("setup", &self.setup)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    #[must_use]
    pub const fn new(area: Area, name: &'static str, setup: Setup, run: ScenarioFn) -> Self {
        Self {
            area,
            name,
            setup,
            skip: None,
            run,
        }
    }

    /// Mark skipped
    #[must_use]
    pub const fn skipped(mut self, reason: &'static str) -> Self {
        self.skip = Some(reason);
        self
    }

    /// `area/name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.area, self.name)
    }

    /// Case-insensitive substring match against [`Scenario::id`]
    #[must_use]
    pub fn matches(&self, filter: Option<&str>) -> bool {
        filter.map_or(true, |f| {
            self.id().to_lowercase().contains(&f.to_lowercase())
        })
    }

    /// Run setup and body inside `ctx`
    pub async fn execute(&self, ctx: &TestContext) -> E2eResult<()> {
        self.setup.apply(ctx).await?;
        (self.run)(ctx).await
    }
}

/// Wrap an `async fn(&TestContext) -> E2eResult<()>` as a [`Scenario`]
macro_rules! scenario {
    ($area:expr, $name:expr, $setup:expr, $body:path) => {
        $crate::scenarios::Scenario::new($area, $name, $setup, |ctx| Box::pin($body(ctx)))
    };
}
pub(crate) use scenario;

/// Every scenario, grouped by area
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    let mut all = Vec::new();
    all.extend(navigation::scenarios());
    all.extend(forms::scenarios());
    all.extend(modal_overlays::scenarios());
    all.extend(tables::scenarios());
    all.extend(iot_dashboard::scenarios());
    all.extend(theming::scenarios());
    all
}

/// Catalog entries matching `filter`
#[must_use]
pub fn filtered(filter: Option<&str>) -> Vec<Scenario> {
    catalog().into_iter().filter(|s| s.matches(filter)).collect()
}
