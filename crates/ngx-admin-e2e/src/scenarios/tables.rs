//! Tables & Data > Smart Table.

use super::{scenario, Area, Scenario};
use crate::fixture::{Setup, TestContext};
use crate::result::E2eResult;
use crate::test_data::{EDITED_AGE, EDIT_PAGE, EDIT_ROW_ID};
use tracing::info;

const SMART_TABLE: Setup = Setup::HomeThen("Smart Table");

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(
            Area::Tables,
            "should delete row with confirmation",
            SMART_TABLE,
            delete_row
        ),
        scenario!(Area::Tables, "should edit table data", SMART_TABLE, edit_rows),
        scenario!(Area::Tables, "should filter table by age", SMART_TABLE, age_filtering),
    ]
}

async fn delete_row(ctx: &TestContext) -> E2eResult<()> {
    let table = ctx.pages().on_smart_table();
    let email = &ctx.env().test_emails.delete_target;
    ctx.step("Delete row with confirmation", table.delete_row(email))
        .await?;
    ctx.step("Verify row removed", table.verify_row_deleted(email))
        .await
}

async fn edit_rows(ctx: &TestContext) -> E2eResult<()> {
    let table = ctx.pages().on_smart_table();
    let env = ctx.env();
    ctx.step(
        "Edit age of row",
        table.edit_age(&env.test_emails.edit_target, EDITED_AGE),
    )
    .await?;
    ctx.step(
        &format!("Navigate to page {EDIT_PAGE}"),
        table.navigate_to_page(EDIT_PAGE),
    )
    .await?;
    ctx.step(
        &format!("Edit email of row {EDIT_ROW_ID}"),
        table.edit_email_by_id(EDIT_ROW_ID, &env.test_user.email),
    )
    .await?;
    ctx.step(
        "Verify edited email",
        table.verify_email_by_id(EDIT_ROW_ID, &env.test_user.email),
    )
    .await
}

async fn age_filtering(ctx: &TestContext) -> E2eResult<()> {
    let table = ctx.pages().on_smart_table();
    for age in &ctx.env().age_filters {
        ctx.step(&format!("Filter by age {age}"), table.filter_by_age(age))
            .await?;
        let outcome = ctx
            .step(&format!("Verify age {age} results"), table.verify_age_filter(age))
            .await?;
        info!(age = age.as_str(), ?outcome, "age filter checked");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fixture::tests::context;
    use crate::mock::{MockDriver, MockElement};
    use crate::pages::smart_table::DELETE_CONFIRMATION;
    use crate::pages::SmartTablePage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delete_uses_configured_email() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let trash = SmartTablePage::row_with("mdo@gmail.com").locator(".nb-trash");
        mock.set_element(&trash, MockElement::visible());
        mock.on_click(&trash, |s| {
            s.raise_dialog(DELETE_CONFIRMATION);
            s.remove_element(&SmartTablePage::row_with("mdo@gmail.com").locator(".nb-trash"));
        });

        delete_row(&ctx).await.unwrap();
        let names: Vec<_> = ctx.steps().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Delete row with confirmation", "Verify row removed"]);
    }

    #[tokio::test]
    async fn test_age_filter_stops_at_first_failure() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        mock.set_element(&SmartTablePage::age_filter(), MockElement::visible());

        assert!(age_filtering(&ctx).await.is_err());
        let steps = ctx.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].name, "Verify age 20 results");
        assert!(steps[1].error.is_some());
    }
}
