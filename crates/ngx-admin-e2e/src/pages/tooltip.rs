//! Modal & Overlays > Tooltip.

use crate::expect::expect;
use crate::locator::{AriaRole, Locator};
use crate::page::Page;
use crate::result::E2eResult;

/// Card holding the placement buttons
pub const PLACEMENTS_CARD: &str = "Tooltip Placements";
/// Text every placement tooltip shows
pub const TOOLTIP_TEXT: &str = "This is a tooltip";

#[derive(Debug, Clone)]
pub struct TooltipPage {
    page: Page,
}

impl TooltipPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    /// Placement button (`Top`, `Right`, `Bottom`, `Left`)
    #[must_use]
    pub fn placement_button(placement: &str) -> Locator {
        Locator::css("nb-card")
            .filter_has_text(PLACEMENTS_CARD)
            .get_by_role_named(AriaRole::Button, placement)
    }

    #[must_use]
    pub fn tooltip() -> Locator {
        Locator::css("nb-tooltip")
    }

    /// Hover a placement button and verify the tooltip text
    pub async fn hover_and_verify(&self, placement: &str, text: &str) -> E2eResult<()> {
        self.page.hover(&Self::placement_button(placement)).await?;
        expect(&self.page, &Self::tooltip()).to_have_text(text).await
    }
}
