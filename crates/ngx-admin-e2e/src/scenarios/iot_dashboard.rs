//! IoT dashboard widgets on the home page.

use super::{scenario, Area, Scenario};
use crate::driver::Key;
use crate::expect::{ensure, expect};
use crate::fixture::{Setup, TestContext};
use crate::pages::iot_dashboard::{
    leading_number, CLIMATE_ON_VALUE, CLIMATE_VALUE, DEGREES, ELECTRICITY_TITLE, KITTEN_TITLE,
    OFF_READOUT, PERCENT, SOLAR_DETAILS, SOLAR_TITLE, SOLAR_VALUE, TRAFFIC_TITLE,
    WEATHER_DATE, WEATHER_LOCATION, WIND_SPEED,
};
use crate::pages::{Climate, ClimateMode, IoTDashboardPage};
use crate::result::E2eResult;
use crate::test_data::{CHART_VIEWPORTS, RESIZE_VIEWPORTS, TRAFFIC_VIEWPORTS};

const I: Area = Area::IoTDashboard;
const H: Setup = Setup::Home;

/// Upper bound on a plausible solar production readout, in kWh
const SOLAR_MAX_KWH: f64 = 50.0;
/// Days in the weekly forecast
const FORECAST_DAYS: usize = 7;
/// Electricity year tabs visited by the tab navigation scenario
const ELECTRICITY_TABS_VISITED: usize = 3;
/// Traffic period changes made back to back
const TRAFFIC_CHANGES: usize = 3;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        scenario!(I, "should toggle light twice", H, light_twice),
        scenario!(I, "light should be ON by default", H, light_default),
        scenario!(I, "should toggle roller shades", H, roller_shades),
        scenario!(I, "should display temperature card with default value", H, temperature_default),
        scenario!(I, "should switch between temperature and humidity tabs", H, climate_tabs),
        scenario!(I, "should toggle temperature power", H, climate_power::<0>),
        scenario!(I, "should toggle humidity power", H, climate_power::<1>),
        scenario!(I, "should select every temperature mode", H, climate_modes::<0>),
        scenario!(I, "should select every humidity mode", H, climate_modes::<1>),
        scenario!(I, "should show temperature slider", H, climate_slider),
        scenario!(I, "should survive rapid tab switching", H, rapid_tab_switching),
        scenario!(I, "should keep mode across power toggle", H, mode_survives_power),
        scenario!(I, "should display traffic card header", H, traffic_header),
        scenario!(I, "should list traffic period options", H, traffic_options),
        scenario!(I, "should render traffic chart", H, traffic_chart),
        scenario!(I, "should change traffic period", H, traffic_period),
        scenario!(I, "should survive rapid traffic period changes", H, rapid_traffic_changes),
        scenario!(I, "should keep traffic chart through resizes", H, traffic_resize),
        scenario!(I, "should render traffic chart at every viewport", H, traffic_responsive)
            .skipped("traffic chart layout is unstable on narrow viewports"),
        scenario!(I, "should display solar card header", H, solar_header),
        scenario!(I, "should render solar chart", H, solar_chart),
        scenario!(I, "should show plausible solar value", H, solar_value),
        scenario!(I, "should keep solar card across viewports", H, solar_responsive),
        scenario!(I, "should display electricity card", H, electricity),
        scenario!(I, "should switch electricity year tabs", H, electricity_tab_navigation),
        scenario!(I, "should display weather card", H, weather),
        scenario!(I, "should display UI Kitten card", H, kitten),
    ]
}

async fn light_twice(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let initial = ctx.step("Read light state", iot.is_light_on()).await?;
    let first = ctx.step("Switch light", iot.switch_the_light()).await?;
    let second = ctx.step("Switch light back", iot.switch_the_light()).await?;
    ensure(first != initial && second == initial, || {
        format!("light went {initial} -> {first} -> {second}")
    })
}

async fn light_default(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let on = ctx.step("Read light state", iot.is_light_on()).await?;
    ensure(on, || "light is OFF on load".to_string())
}

async fn roller_shades(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let shades = iot.roller_shades();
    let initial = ctx.step("Read roller shades state", shades.is_on()).await?;
    ctx.step("Switch roller shades", iot.switch_the_roller_shades())
        .await?;
    ctx.step("Restore roller shades", shades.ensure(initial))
        .await
}

async fn temperature_default(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    ctx.step(
        "Verify temperature card",
        expect(page, &IoTDashboardPage::temperature_card()).to_be_visible(),
    )
    .await?;
    ctx.step(
        "Verify temperature readout",
        expect(page, &IoTDashboardPage::climate_value(Climate::Temperature)).to_match(CLIMATE_VALUE),
    )
    .await
}

async fn climate_tabs(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    ctx.step("Switch to humidity", iot.switch_to(Climate::Humidity))
        .await?;
    ctx.step("Switch to temperature", iot.switch_to(Climate::Temperature))
        .await
}

const CLIMATES: [Climate; 2] = [Climate::Temperature, Climate::Humidity];

async fn climate_power<const C: usize>(ctx: &TestContext) -> E2eResult<()> {
    let climate = CLIMATES[C];
    let iot = ctx.pages().on_iot_dashboard();
    let value = IoTDashboardPage::climate_value(climate);
    ctx.step(&format!("Open {} tab", climate.title()), iot.switch_to(climate))
        .await?;
    ctx.step("Turn power off", async {
        iot.toggle_power(climate).await?;
        expect(ctx.page(), &value).to_contain_text(OFF_READOUT).await
    })
    .await?;
    ctx.step("Turn power on", async {
        iot.toggle_power(climate).await?;
        expect(ctx.page(), &value).to_match(CLIMATE_ON_VALUE).await
    })
    .await
}

async fn climate_modes<const C: usize>(ctx: &TestContext) -> E2eResult<()> {
    let climate = CLIMATES[C];
    let iot = ctx.pages().on_iot_dashboard();
    ctx.step(&format!("Open {} tab", climate.title()), iot.switch_to(climate))
        .await?;
    for mode in ClimateMode::ALL {
        ctx.step(
            &format!("Select {} {} mode", climate.title(), mode.value()),
            iot.select_mode(climate, mode),
        )
        .await?;
    }
    Ok(())
}

async fn climate_slider(ctx: &TestContext) -> E2eResult<()> {
    ctx.step(
        "Verify temperature slider",
        expect(ctx.page(), &IoTDashboardPage::climate_slider(Climate::Temperature)).to_be_visible(),
    )
    .await
}

async fn rapid_tab_switching(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    ctx.step("Switch tabs rapidly", async {
        for _ in 0..3 {
            iot.switch_to(Climate::Humidity).await?;
            iot.switch_to(Climate::Temperature).await?;
        }
        Ok(())
    })
    .await?;
    ctx.step(
        "Verify temperature readout",
        expect(ctx.page(), &IoTDashboardPage::climate_value(Climate::Temperature))
            .to_match(CLIMATE_VALUE),
    )
    .await
}

async fn mode_survives_power(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let t = Climate::Temperature;
    ctx.step("Select heat mode", iot.select_mode(t, ClimateMode::Heat))
        .await?;
    ctx.step("Toggle power twice", async {
        iot.toggle_power(t).await?;
        iot.toggle_power(t).await
    })
    .await?;
    ctx.step(
        "Verify heat mode still selected",
        expect(ctx.page(), &IoTDashboardPage::mode_radio(t, ClimateMode::Heat)).to_be_checked(),
    )
    .await
}

async fn traffic_header(ctx: &TestContext) -> E2eResult<()> {
    ctx.step(
        "Verify traffic header",
        expect(ctx.page(), &IoTDashboardPage::traffic_header()).to_contain_text(TRAFFIC_TITLE),
    )
    .await
}

async fn traffic_options(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let options = ctx
        .step(
            "Open traffic period select",
            iot.open_select(&IoTDashboardPage::traffic_type_select()),
        )
        .await?;
    ensure(!options.is_empty(), || "traffic select has no options".to_string())
}

async fn traffic_chart(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let visible = ctx
        .step(
            "Check traffic chart",
            iot.is_chart_visible(&IoTDashboardPage::traffic_chart()),
        )
        .await?;
    ensure(visible, || "traffic chart has no area".to_string())
}

async fn traffic_period(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    ctx.step(
        "Choose second traffic period",
        iot.choose_option(&IoTDashboardPage::traffic_type_select(), 1),
    )
    .await?;
    traffic_chart(ctx).await
}

async fn rapid_traffic_changes(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let select = IoTDashboardPage::traffic_type_select();
    let options = ctx
        .step("Open traffic period select", iot.open_select(&select))
        .await?;
    ctx.step("Close traffic period select", ctx.page().press(Key::Escape))
        .await?;
    let changes = options.len().min(TRAFFIC_CHANGES);
    ensure(changes > 0, || "traffic select has no options".to_string())?;
    ctx.step("Change traffic period rapidly", async {
        for index in (0..changes).rev() {
            iot.choose_option(&select, index as i32).await?;
        }
        Ok(())
    })
    .await?;
    traffic_chart(ctx).await
}

async fn traffic_resize(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    let chart = IoTDashboardPage::traffic_chart();
    for viewport in RESIZE_VIEWPORTS {
        let name = format!("Resize to {}x{}", viewport.width, viewport.height);
        let visible = ctx
            .step(&name, async {
                ctx.page().set_viewport(viewport).await?;
                iot.is_chart_visible(&chart).await
            })
            .await?;
        ensure(visible, || format!("traffic chart vanished at {name}"))?;
    }
    Ok(())
}

async fn traffic_responsive(ctx: &TestContext) -> E2eResult<()> {
    let iot = ctx.pages().on_iot_dashboard();
    for named in TRAFFIC_VIEWPORTS {
        ctx.step(&format!("Check traffic card on {}", named.name), async {
            ctx.page().set_viewport(named.viewport).await?;
            expect(ctx.page(), &IoTDashboardPage::traffic_card())
                .to_be_visible()
                .await?;
            let visible = iot
                .is_chart_visible(&IoTDashboardPage::traffic_chart())
                .await?;
            ensure(visible, || format!("traffic chart hidden on {}", named.name))
        })
        .await?;
    }
    Ok(())
}

async fn solar_header(ctx: &TestContext) -> E2eResult<()> {
    ctx.step(
        "Verify solar header",
        expect(ctx.page(), &IoTDashboardPage::solar_header()).to_contain_text(SOLAR_TITLE),
    )
    .await
}

async fn solar_chart(ctx: &TestContext) -> E2eResult<()> {
    ctx.step(
        "Verify solar chart instance",
        expect(ctx.page(), &IoTDashboardPage::solar_chart())
            .to_have_attribute("_echarts_instance_", None),
    )
    .await
}

async fn solar_value(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    let value = IoTDashboardPage::solar_value();
    ctx.step("Verify solar value format", expect(page, &value).to_match(SOLAR_VALUE))
        .await?;
    ctx.step(
        "Verify solar details",
        expect(page, &IoTDashboardPage::solar_details()).to_match(SOLAR_DETAILS),
    )
    .await?;
    ctx.step("Verify solar value range", async {
        let text = page.text(&value).await?;
        let kwh = leading_number(&text);
        ensure(kwh.is_some_and(|v| v > 0.0 && v < SOLAR_MAX_KWH), || {
            format!("solar value {text:?} outside (0, {SOLAR_MAX_KWH})")
        })
    })
    .await
}

async fn solar_responsive(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    for named in CHART_VIEWPORTS {
        ctx.step(&format!("Check solar card on {}", named.name), async {
            page.set_viewport(named.viewport).await?;
            expect(page, &IoTDashboardPage::solar_card()).to_be_visible().await?;
            expect(page, &IoTDashboardPage::solar_value())
                .to_match(SOLAR_VALUE)
                .await
        })
        .await?;
    }
    Ok(())
}

async fn electricity(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    ctx.step(
        "Verify electricity card",
        expect(page, &IoTDashboardPage::electricity_card()).to_contain_text(ELECTRICITY_TITLE),
    )
    .await?;
    ctx.step(
        "Verify electricity chart",
        expect(page, &IoTDashboardPage::electricity_chart()).to_be_visible(),
    )
    .await?;
    ctx.step(
        "Verify electricity period select",
        expect(page, &IoTDashboardPage::electricity_type_select()).to_be_enabled(),
    )
    .await?;
    ctx.step("Verify electricity tabs and rows", async {
        let tabs = page.count(&IoTDashboardPage::electricity_tabs()).await?;
        let rows = page.count(&IoTDashboardPage::electricity_rows()).await?;
        ensure(tabs > 0 && rows > 0, || {
            format!("electricity table has {tabs} tabs and {rows} rows")
        })
    })
    .await
}

async fn electricity_tab_navigation(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    let tabs = IoTDashboardPage::electricity_tabs();
    let total = ctx.step("Count electricity tabs", page.count(&tabs)).await?;
    let mut visited = 0;
    for index in 0..total.min(ELECTRICITY_TABS_VISITED) {
        let tab = tabs.clone().nth(index as i32);
        if !page.is_visible(&tab).await? {
            continue;
        }
        ctx.step(&format!("Open electricity tab {}", index + 1), async {
            page.click(&tab).await?;
            expect(page, &IoTDashboardPage::electricity_chart())
                .to_be_visible()
                .await?;
            let rows = page.count(&IoTDashboardPage::electricity_rows()).await?;
            ensure(rows > 0, || format!("electricity tab {} has no rows", index + 1))
        })
        .await?;
        visited += 1;
    }
    ensure(visited > 0, || format!("none of {total} electricity tabs is visible"))
}

async fn weather(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    ctx.step(
        "Verify weather card",
        expect(page, &IoTDashboardPage::weather_card()).to_be_visible(),
    )
    .await?;
    ctx.step(
        "Verify weather location",
        expect(page, &IoTDashboardPage::weather_location()).to_contain_text(WEATHER_LOCATION),
    )
    .await?;
    ctx.step("Verify weather date and temperature", async {
        expect(page, &IoTDashboardPage::weather_date())
            .to_match(WEATHER_DATE)
            .await?;
        expect(page, &IoTDashboardPage::current_temperature())
            .to_match(DEGREES)
            .await
    })
    .await?;
    ctx.step("Verify weather parameters", async {
        for (name, pattern) in [
            ("max", DEGREES),
            ("min", DEGREES),
            ("wind", WIND_SPEED),
            ("hum", PERCENT),
        ] {
            expect(page, &IoTDashboardPage::weather_parameter(name))
                .to_match(pattern)
                .await?;
        }
        Ok(())
    })
    .await?;
    ctx.step("Verify weekly forecast", async {
        let days = page.count(&IoTDashboardPage::forecast_days()).await?;
        ensure((1..=FORECAST_DAYS).contains(&days), || {
            format!("forecast shows {days} days")
        })
    })
    .await
}

async fn kitten(ctx: &TestContext) -> E2eResult<()> {
    let page = ctx.page();
    ctx.step(
        "Verify UI Kitten card",
        expect(page, &IoTDashboardPage::kitten_card()).to_be_visible(),
    )
    .await?;
    ctx.step(
        "Verify UI Kitten title",
        expect(page, &IoTDashboardPage::kitten_title()).to_have_text(KITTEN_TITLE),
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fixture::tests::context;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_light_twice_returns_to_initial_state() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let light = ctx.pages().on_iot_dashboard().light();
        mock.set_element(light.icon(), MockElement::visible());
        mock.set_element(light.status(), MockElement::visible().with_text("ON"));
        let status = light.status().clone();
        mock.on_click(light.icon(), move |s| {
            let next = if s.text_of(&status) == "ON" { "OFF" } else { "ON" };
            s.element_mut(&status).text = Some(next.to_string());
        });

        light_twice(&ctx).await.unwrap();
        assert_eq!(mock.clicks(light.icon()), 2);
        assert_eq!(ctx.steps().len(), 3);
    }

    #[tokio::test]
    async fn test_solar_value_out_of_range_fails() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        mock.set_element(
            &IoTDashboardPage::solar_value(),
            MockElement::visible().with_text("96.000 kWh"),
        );
        mock.set_element(
            &IoTDashboardPage::solar_details(),
            MockElement::visible().with_text("out of 8.421 kWh"),
        );

        assert!(solar_value(&ctx).await.is_err());
        assert_eq!(ctx.steps().last().unwrap().name, "Verify solar value range");
    }

    #[tokio::test]
    async fn test_humidity_modes_use_humidity_pane() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let h = Climate::Humidity;
        mock.set_element(&IoTDashboardPage::climate_tab(h), MockElement::visible());
        mock.set_element(&IoTDashboardPage::climate_value(h), MockElement::visible().with_text("87"));
        for mode in ClimateMode::ALL {
            mock.set_element(&IoTDashboardPage::mode_radio(h, mode), MockElement::hidden());
        }

        climate_modes::<1>(&ctx).await.unwrap();
        for mode in ClimateMode::ALL {
            assert!(mock.element(&IoTDashboardPage::mode_radio(h, mode)).unwrap().checked);
            let temperature = IoTDashboardPage::mode_radio(Climate::Temperature, mode);
            assert!(!mock.was_called(&format!("check {temperature}")));
        }
        assert_eq!(ctx.steps().len(), 1 + ClimateMode::ALL.len());
        assert_eq!(ctx.steps()[4].name, "Select Humidity fan mode");
    }

    #[tokio::test]
    async fn test_electricity_tabs_visits_visible_tabs_up_to_limit() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let tabs = IoTDashboardPage::electricity_tabs();
        mock.set_element(&tabs, MockElement::visible().with_count(5));
        for i in 0..5 {
            let tab = if i == 1 { MockElement::hidden() } else { MockElement::visible() };
            mock.set_element(&tabs.clone().nth(i), tab);
        }
        mock.set_element(&IoTDashboardPage::electricity_chart(), MockElement::visible());
        mock.set_element(&IoTDashboardPage::electricity_rows(), MockElement::visible().with_count(12));

        electricity_tab_navigation(&ctx).await.unwrap();
        let clicks: Vec<usize> = (0..5).map(|i| mock.clicks(&tabs.clone().nth(i))).collect();
        assert_eq!(clicks, vec![1, 0, 1, 0, 0]);
        assert_eq!(ctx.steps().len(), 3);
        assert_eq!(ctx.steps()[2].name, "Open electricity tab 3");
    }

    #[tokio::test]
    async fn test_electricity_tabs_without_tabs_fails() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let err = electricity_tab_navigation(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("none of 0 electricity tabs"));
    }

    #[tokio::test]
    async fn test_electricity_tab_without_rows_fails() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let tabs = IoTDashboardPage::electricity_tabs();
        mock.set_element(&tabs, MockElement::visible());
        mock.set_element(&tabs.clone().nth(0), MockElement::visible());
        mock.set_element(&IoTDashboardPage::electricity_chart(), MockElement::visible());

        let err = electricity_tab_navigation(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("electricity tab 1 has no rows"));
    }

    #[tokio::test]
    async fn test_rapid_traffic_changes_pick_options_back_to_back() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let select = IoTDashboardPage::traffic_type_select();
        let options = IoTDashboardPage::select_options();
        mock.set_element(&select, MockElement::visible());
        mock.set_element(
            &options,
            MockElement::visible().with_texts(["week", "month", "year", "decade"]),
        );
        for i in 0..4 {
            mock.set_element(&options.clone().nth(i), MockElement::visible());
        }
        mock.set_element(&IoTDashboardPage::traffic_chart(), MockElement::visible());

        rapid_traffic_changes(&ctx).await.unwrap();
        assert!(mock.was_called("press Escape"));
        assert_eq!(mock.clicks(&select), 1 + TRAFFIC_CHANGES);
        let picks: Vec<usize> = (0..4).map(|i| mock.clicks(&options.clone().nth(i))).collect();
        assert_eq!(picks, vec![1, 1, 1, 0]);
        assert_eq!(ctx.steps().last().unwrap().name, "Check traffic chart");
    }

    #[tokio::test]
    async fn test_weather_card() {
        let mock = Arc::new(MockDriver::new());
        let ctx = context(&mock);
        let text = |t: &str| MockElement::visible().with_text(t);
        mock.set_element(&IoTDashboardPage::weather_card(), MockElement::visible());
        mock.set_element(&IoTDashboardPage::weather_location(), text("New York"));
        mock.set_element(&IoTDashboardPage::weather_date(), text("Mon 29 May"));
        mock.set_element(&IoTDashboardPage::current_temperature(), text("20°"));
        mock.set_element(&IoTDashboardPage::weather_parameter("max"), text("25°"));
        mock.set_element(&IoTDashboardPage::weather_parameter("min"), text("19°"));
        mock.set_element(&IoTDashboardPage::weather_parameter("wind"), text("4 km/h"));
        mock.set_element(&IoTDashboardPage::weather_parameter("hum"), text("87%"));
        let mut days = MockElement::visible();
        days.count = 4;
        mock.set_element(&IoTDashboardPage::forecast_days(), days);

        weather(&ctx).await.unwrap();
    }
}
