//! Layout header and theme selection.

use crate::expect::expect;
use crate::locator::Locator;
use crate::page::Page;
use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// `localStorage` key holding the selected theme
pub const THEME_STORAGE_KEY: &str = "selectedTheme";

/// Themes offered by the header select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
    Cosmic,
    Corporate,
}

impl Theme {
    /// Every theme, in dropdown order
    pub const ALL: [Self; 4] = [Self::Light, Self::Dark, Self::Cosmic, Self::Corporate];

    /// Dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Cosmic => "Cosmic",
            Self::Corporate => "Corporate",
        }
    }

    /// Value persisted under [`THEME_STORAGE_KEY`]
    #[must_use]
    pub const fn storage_value(self) -> &'static str {
        match self {
            Self::Light => "default",
            Self::Dark => "dark",
            Self::Cosmic => "cosmic",
            Self::Corporate => "corporate",
        }
    }

    /// Computed `background-color` of the header
    #[must_use]
    pub const fn header_color(self) -> &'static str {
        match self {
            Self::Light | Self::Corporate => "rgb(255, 255, 255)",
            Self::Dark => "rgb(34, 43, 69)",
            Self::Cosmic => "rgb(50, 50, 89)",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header bar with the theme select
#[derive(Debug, Clone)]
pub struct HeaderPage {
    page: Page,
}

impl HeaderPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    #[must_use]
    pub fn theme_dropdown() -> Locator {
        Locator::css("ngx-header nb-select")
    }

    #[must_use]
    pub fn header() -> Locator {
        Locator::css("nb-layout-header")
    }

    #[must_use]
    pub fn theme_options() -> Locator {
        Locator::css("nb-option-list nb-option")
    }

    pub async fn open_theme_dropdown(&self) -> E2eResult<()> {
        self.page.click(&Self::theme_dropdown()).await
    }

    /// Pick `theme` from the dropdown
    pub async fn select_theme(&self, theme: Theme) -> E2eResult<()> {
        info!(%theme, "select theme");
        self.open_theme_dropdown().await?;
        self.page
            .click(&Self::theme_options().filter_has_text(theme.label()))
            .await
    }

    pub async fn verify_dropdown_options(&self, expected: &[Theme]) -> E2eResult<()> {
        let labels: Vec<&str> = expected.iter().map(|t| t.label()).collect();
        expect(&self.page, &Self::theme_options())
            .to_have_texts(&labels)
            .await
    }

    pub async fn verify_header_color(&self, theme: Theme) -> E2eResult<()> {
        expect(&self.page, &Self::header())
            .to_have_css("background-color", theme.header_color())
            .await
    }

    pub async fn verify_selected_theme(&self, theme: Theme) -> E2eResult<()> {
        expect(&self.page, &Self::theme_dropdown())
            .to_have_text(theme.label())
            .await
    }

    /// Theme persisted in `localStorage`, if any
    pub async fn stored_theme(&self) -> E2eResult<Option<String>> {
        let script = format!("localStorage.getItem('{THEME_STORAGE_KEY}')");
        match self.page.evaluate(&script).await? {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => Ok(Some(s)),
            other => Err(E2eError::driver(format!(
                "unexpected {THEME_STORAGE_KEY} value {other}"
            ))),
        }
    }
}
