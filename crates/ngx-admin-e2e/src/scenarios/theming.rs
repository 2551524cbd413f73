//! Header theme switcher.

use super::{scenario, Area, Scenario};
use crate::expect::ensure;
use crate::fixture::{Setup, TestContext};
use crate::pages::Theme;
use crate::result::E2eResult;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(
            Area::Theming,
            "should change header color for each theme",
            Setup::Home,
            header_colors
        ),
        scenario!(
            Area::Theming,
            "should list every theme in the dropdown",
            Setup::Home,
            dropdown_options
        ),
        scenario!(
            Area::Theming,
            "should persist selected theme across reload",
            Setup::Home,
            persistence
        ),
    ]
}

async fn header_colors(ctx: &TestContext) -> E2eResult<()> {
    let header = ctx.pages().on_header();
    for theme in Theme::ALL {
        ctx.step(&format!("Apply {theme} theme"), async {
            header.select_theme(theme).await?;
            header.verify_header_color(theme).await
        })
        .await?;
    }
    Ok(())
}

async fn dropdown_options(ctx: &TestContext) -> E2eResult<()> {
    let header = ctx.pages().on_header();
    ctx.step("Open theme dropdown", header.open_theme_dropdown())
        .await?;
    ctx.step(
        "Verify theme options",
        header.verify_dropdown_options(&Theme::ALL),
    )
    .await
}

async fn persistence(ctx: &TestContext) -> E2eResult<()> {
    let header = ctx.pages().on_header();
    let theme = Theme::Dark;
    ctx.step(&format!("Apply {theme} theme"), async {
        header.select_theme(theme).await?;
        header.verify_header_color(theme).await
    })
    .await?;
    ctx.step("Verify stored theme", async {
        let stored = header.stored_theme().await?;
        ensure(stored.as_deref() == Some(theme.storage_value()), || {
            format!("stored theme is {stored:?}, expected {}", theme.storage_value())
        })
    })
    .await?;
    ctx.step("Reload page", ctx.page().reload()).await?;
    ctx.step("Verify theme after reload", async {
        header.verify_header_color(theme).await?;
        header.verify_selected_theme(theme).await
    })
    .await
}
