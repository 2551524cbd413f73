//! Forms: layouts and datepicker.

use super::{scenario, Area, Scenario};
use crate::expect::expect;
use crate::fixture::{Setup, TestContext};
use crate::locator::AriaRole;
use crate::pages::form_layouts::GRID_FORM;
use crate::pages::FormLayoutsPage;
use crate::result::E2eResult;
use crate::test_data::{test_forms, RANGE_OFFSETS, SINGLE_DATE_OFFSET};

const LAYOUTS: Setup = Setup::HomeThen("Form Layouts");
const DATEPICKER: Setup = Setup::HomeThen("Datepicker");

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(Area::Forms, "Input Fields", LAYOUTS, input_fields),
        scenario!(Area::Forms, "Radio Buttons", LAYOUTS, radio_buttons),
        scenario!(Area::Forms, "should submit grid form with credentials", LAYOUTS, grid_submit),
        scenario!(Area::Forms, "should submit inline form with user details", LAYOUTS, inline_submit),
        scenario!(Area::Forms, "should select date from datepicker", DATEPICKER, single_date),
        scenario!(Area::Forms, "should select date range from datepicker", DATEPICKER, date_range),
    ]
}

async fn input_fields(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    let email = FormLayoutsPage::form_element(GRID_FORM, AriaRole::Textbox, "Email");
    let address = &ctx.env().test_user.email;

    ctx.step("Fill email input", page.fill(&email, address)).await?;
    ctx.step("Clear email input", page.clear(&email)).await?;
    ctx.step("Type email character by character", async {
        page.type_text(&email, address).await?;
        expect(page, &email).to_have_value(address).await
    })
    .await
}

async fn radio_buttons(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    let option = FormLayoutsPage::grid_form().get_by_role_named(AriaRole::Radio, "Option 1");
    ctx.step("Check radio button and verify state", async {
        page.set_checked_forced(&option, true).await?;
        expect(page, &option).to_be_checked().await
    })
    .await
}

async fn grid_submit(ctx: &TestContext) -> E2eResult<()> {
    let [grid, _] = test_forms(ctx.env());
    let forms = ctx.pages().on_form_layouts();
    ctx.step("Submit grid form with credentials", forms.submit_grid_form(&grid))
        .await?;
    ctx.step(
        "Verify form submission",
        expect(ctx.page(), &FormLayoutsPage::grid_form()).to_be_visible(),
    )
    .await
}

async fn inline_submit(ctx: &TestContext) -> E2eResult<()> {
    let [_, inline] = test_forms(ctx.env());
    let forms = ctx.pages().on_form_layouts();
    ctx.step(
        "Submit inline form with name, email and checkbox",
        forms.submit_inline_form(&inline),
    )
    .await?;
    ctx.step(
        "Verify inline form submission",
        expect(ctx.page(), &FormLayoutsPage::inline_form()).to_be_visible(),
    )
    .await
}

async fn single_date(ctx: &TestContext) -> E2eResult<()> {
    let picker = ctx.pages().on_datepicker();
    let name = format!("Select date {SINGLE_DATE_OFFSET} days from today");
    ctx.step(&name, picker.select_common_date_from_today(SINGLE_DATE_OFFSET))
        .await
        .map(drop)
}

async fn date_range(ctx: &TestContext) -> E2eResult<()> {
    let (start, end) = RANGE_OFFSETS;
    let picker = ctx.pages().on_datepicker();
    let name = format!("Select date range from {start} to {end} days ahead");
    ctx.step(&name, picker.select_range_from_today(start, end))
        .await
        .map(drop)
}
