//! Modal & Overlays: dialog, window, toastr, tooltip.

use super::{scenario, Area, Scenario};
use crate::expect::{ensure, expect};
use crate::fixture::{Setup, TestContext};
use crate::pages::dialog::TEMPLATE_TEXT as DIALOG_TEMPLATE_TEXT;
use crate::pages::toastr::{HIDE_ON_CLICK, PREVENT_DUPLICATES};
use crate::pages::tooltip::TOOLTIP_TEXT;
use crate::pages::window::{NO_ESC_TEXT, TEMPLATE_TEXT as WINDOW_TEMPLATE_TEXT};
use crate::pages::{DialogKind, WindowControl, WindowKind, WindowPage};
use crate::result::E2eResult;
use crate::test_data::DIALOG_NAMES;

const DIALOG: Setup = Setup::HomeThen("Dialog");
const WINDOW: Setup = Setup::HomeThen("Window");
const TOASTR: Setup = Setup::HomeThen("Toastr");
const TOOLTIP: Setup = Setup::HomeThen("Tooltip");

const M: Area = Area::ModalOverlays;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(M, "should open and close dialog with component", DIALOG, dialog_template),
        scenario!(M, "should close dialog with ESC key when enabled", DIALOG, dialog_esc_enabled),
        scenario!(M, "should not close dialog with ESC key when disabled", DIALOG, dialog_esc_disabled),
        scenario!(M, "should close dialog by clicking backdrop when enabled", DIALOG, dialog_backdrop_enabled),
        scenario!(M, "should not close dialog by clicking backdrop when disabled", DIALOG, dialog_backdrop_disabled),
        scenario!(M, "should add multiple names through dialog", DIALOG, dialog_names),
        scenario!(M, "should cancel name entry", DIALOG, dialog_cancel),
        scenario!(M, "should open window form and fill it", WINDOW, window_form),
        scenario!(M, "should open window with template", WINDOW, window_template),
        scenario!(M, "should open window with backdrop", WINDOW, window_backdrop),
        scenario!(M, "should open window without backdrop", WINDOW, window_no_backdrop),
        scenario!(M, "should minimize window", WINDOW, window_control::<0>),
        scenario!(M, "should collapse window", WINDOW, window_control::<1>),
        scenario!(M, "should hide window", WINDOW, window_control::<2>),
        scenario!(M, "should close form window with ESC", WINDOW, window_escape::<0>),
        scenario!(M, "should close template window with ESC", WINDOW, window_escape::<1>),
        scenario!(M, "should close backdrop window with ESC", WINDOW, window_escape::<2>),
        scenario!(M, "should keep window without backdrop open on ESC", WINDOW, window_escape::<3>),
        scenario!(M, "Toastr Checkboxes", TOASTR, toastr_checkboxes),
        scenario!(M, "should check every toastr option", TOASTR, toastr_check_all),
        scenario!(M, "Tooltip Placements", TOOLTIP, tooltip_top),
    ]
}

async fn dialog_template(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    ctx.step("Open dialog with component", dialogs.open(DialogKind::Template))
        .await?;
    ctx.step("Verify dialog content", async {
        let text = dialogs.dialog_text().await?;
        ensure(text.contains(DIALOG_TEMPLATE_TEXT), || {
            format!("dialog text {text:?} lacks {DIALOG_TEMPLATE_TEXT:?}")
        })
    })
    .await?;
    ctx.step("Close dialog", async {
        dialogs.close_dialog().await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await
}

async fn dialog_esc_enabled(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    ctx.step("Open dialog with ESC close", dialogs.open(DialogKind::EscClose))
        .await?;
    ctx.step("Close dialog with ESC", async {
        dialogs.close_dialog_by_esc_key().await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await
}

async fn dialog_esc_disabled(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    ctx.step("Open dialog without ESC close", dialogs.open(DialogKind::NoEscClose))
        .await?;
    ctx.step("Press ESC and verify dialog stays open", async {
        dialogs.close_dialog_by_esc_key().await?;
        let open = dialogs.stays_open().await?;
        ensure(open, || "dialog closed on ESC".to_string())
    })
    .await?;
    ctx.step("Close dialog with button", async {
        dialogs.close_dialog().await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await
}

async fn dialog_backdrop_enabled(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    ctx.step("Open dialog with backdrop click", dialogs.open(DialogKind::BackdropClose))
        .await?;
    ctx.step("Click backdrop", async {
        dialogs.close_dialog_by_clicking_backdrop().await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await
}

async fn dialog_backdrop_disabled(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    ctx.step(
        "Open dialog without backdrop click",
        dialogs.open(DialogKind::NoBackdropClose),
    )
    .await?;
    ctx.step("Click backdrop and verify dialog stays open", async {
        dialogs.close_dialog_by_clicking_backdrop().await?;
        let open = dialogs.stays_open().await?;
        ensure(open, || "dialog closed on backdrop click".to_string())
    })
    .await?;
    ctx.step("Close dialog with button", async {
        dialogs.close_dialog().await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await
}

async fn dialog_names(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    for name in DIALOG_NAMES {
        ctx.step(&format!("Add name {name}"), dialogs.add_name(name))
            .await?;
    }
    ctx.step("Verify names list", async {
        let count = dialogs.names_count().await?;
        ensure(count == DIALOG_NAMES.len(), || {
            format!("expected {} names, found {count}", DIALOG_NAMES.len())
        })
    })
    .await
}

async fn dialog_cancel(ctx: &TestContext) -> E2eResult<()> {
    let dialogs = ctx.pages().on_dialog();
    let before = dialogs.names_count().await?;
    ctx.step("Enter name and cancel", async {
        dialogs.open(DialogKind::EnterName).await?;
        dialogs.enter_name_and_cancel("Cancelled Name").await?;
        dialogs.wait_for_dialog_to_disappear().await
    })
    .await?;
    ctx.step("Verify no name added", async {
        let after = dialogs.names_count().await?;
        ensure(after == before, || format!("names went from {before} to {after}"))
    })
    .await
}

async fn window_form(ctx: &TestContext) -> E2eResult<()> {
    let windows = ctx.pages().on_window();
    ctx.step("Open window form", windows.open(WindowKind::Form))
        .await?;
    ctx.step("Fill window form", async {
        windows.fill_form("Test Subject", "Test Text").await?;
        expect(ctx.page(), &WindowPage::subject_input())
            .to_have_value("Test Subject")
            .await
    })
    .await
}

async fn window_template(ctx: &TestContext) -> E2eResult<()> {
    let windows = ctx.pages().on_window();
    ctx.step("Open window with template", windows.open(WindowKind::Template))
        .await?;
    ctx.step(
        "Verify template text",
        expect(ctx.page(), &WindowPage::window_body()).to_contain_text(WINDOW_TEMPLATE_TEXT),
    )
    .await
}

async fn window_backdrop(ctx: &TestContext) -> E2eResult<()> {
    let windows = ctx.pages().on_window();
    ctx.step("Open window with backdrop", windows.open(WindowKind::Backdrop))
        .await?;
    ctx.step(
        "Verify backdrop window text",
        expect(ctx.page(), &WindowPage::window_body()).to_contain_text(WINDOW_TEMPLATE_TEXT),
    )
    .await
}

async fn window_no_backdrop(ctx: &TestContext) -> E2eResult<()> {
    let windows = ctx.pages().on_window();
    ctx.step("Open window without backdrop", windows.open(WindowKind::NoBackdrop))
        .await?;
    ctx.step(
        "Verify window text",
        expect(ctx.page(), &WindowPage::window_body()).to_contain_text(NO_ESC_TEXT),
    )
    .await
}

const CONTROLS: [WindowControl; 3] = [
    WindowControl::Minimize,
    WindowControl::Collapse,
    WindowControl::Hide,
];

async fn window_control<const C: usize>(ctx: &TestContext) -> E2eResult<()> {
    let control = CONTROLS[C];
    let windows = ctx.pages().on_window();
    ctx.step("Open window form", windows.open(WindowKind::Form))
        .await?;
    ctx.step(&format!("Apply {control:?}"), windows.apply(control))
        .await?;
    if control == WindowControl::Collapse {
        ctx.step(
            "Verify collapsed window",
            expect(ctx.page(), &WindowPage::collapsed_window_card()).to_be_visible(),
        )
        .await?;
    }
    Ok(())
}

const ESCAPE_KINDS: [WindowKind; 4] = [
    WindowKind::Form,
    WindowKind::Template,
    WindowKind::Backdrop,
    WindowKind::NoBackdrop,
];

async fn window_escape<const K: usize>(ctx: &TestContext) -> E2eResult<()> {
    let kind = ESCAPE_KINDS[K];
    let windows = ctx.pages().on_window();
    let page = ctx.page();
    ctx.step(&format!("Open {kind:?} window"), windows.open(kind))
        .await?;
    ctx.step("Press ESC", windows.close_with_escape()).await?;
    if kind.closes_on_escape() {
        ctx.step(
            "Verify window closed",
            expect(page, &WindowPage::window_card()).to_be_hidden(),
        )
        .await
    } else {
        ctx.step(
            "Verify window still open",
            expect(page, &WindowPage::window_body()).to_be_visible(),
        )
        .await
    }
}

async fn toastr_checkboxes(ctx: &TestContext) -> E2eResult<()> {
    let toastr = ctx.pages().on_toastr();
    ctx.step("Uncheck hide on click", toastr.set_option(HIDE_ON_CLICK, false))
        .await?;
    ctx.step(
        "Check prevent duplicates",
        toastr.set_option(PREVENT_DUPLICATES, true),
    )
    .await
}

async fn toastr_check_all(ctx: &TestContext) -> E2eResult<()> {
    let toastr = ctx.pages().on_toastr();
    let checked = ctx.step("Check all checkboxes", toastr.check_all()).await?;
    ensure(checked > 0, || "no toastr checkboxes found".to_string())
}

async fn tooltip_top(ctx: &TestContext) -> E2eResult<()> {
    let tooltips = ctx.pages().on_tooltip();
    ctx.step(
        "Hover Top button and verify tooltip",
        tooltips.hover_and_verify("Top", TOOLTIP_TEXT),
    )
    .await
}
