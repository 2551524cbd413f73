//! Sidebar and direct-URL navigation.

use super::{scenario, Area, Scenario};
use crate::expect::expect_url_contains;
use crate::fixture::{Setup, TestContext};
use crate::result::E2eResult;
use crate::test_data::NAVIGATION_TARGETS;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(Area::Navigation, "should navigate to Form Layouts page", Setup::None, direct::<0>),
        scenario!(Area::Navigation, "should navigate to Datepicker page", Setup::None, direct::<1>),
        scenario!(Area::Navigation, "should navigate to Smart Table page", Setup::None, direct::<2>),
        scenario!(Area::Navigation, "should navigate to Tooltip page", Setup::None, direct::<3>),
        scenario!(Area::Navigation, "should navigate to Dialog page", Setup::None, direct::<4>),
        scenario!(
            Area::Navigation,
            "should reach every target through the menu",
            Setup::Home,
            through_menu
        ),
    ]
}

/// Load the I-th target by URL and check where the browser landed
async fn direct<const I: usize>(ctx: &TestContext) -> E2eResult<()> {
    let target = NAVIGATION_TARGETS[I];
    let url = target.url(&ctx.env().base_url);
    let nav = ctx.pages().navigate_to();
    ctx.step(&format!("Navigate to {} page", target.name), nav.navigate_to(&url))
        .await?;
    ctx.step(
        &format!("Verify {} page loaded", target.name),
        expect_url_contains(ctx.page(), &url),
    )
    .await
}

async fn through_menu(ctx: &TestContext) -> E2eResult<()> {
    let nav = ctx.pages().navigate_to();
    for target in NAVIGATION_TARGETS {
        ctx.step(&format!("Open {} from the menu", target.name), target.method.invoke(nav))
            .await?;
        ctx.step(
            &format!("Verify {} route", target.name),
            expect_url_contains(ctx.page(), target.path),
        )
        .await?;
    }
    Ok(())
}
