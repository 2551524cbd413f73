//! IoT Dashboard widgets.
//!
//! The dashboard is the application home page. Every card is addressed
//! through its Angular component tag, so locators stay valid when the
//! grid layout reflows across themes and viewports.

use crate::expect::expect;
use crate::locator::{AriaRole, Locator};
use crate::page::Page;
use crate::result::E2eResult;
use crate::toggle::StatusToggle;
use crate::wait::{poll_until, ElementState};
use tracing::debug;

/// Climate readout: digits, or `--` while powered off
pub const CLIMATE_VALUE: &str = r"^\d+$|^--$";
/// Climate readout while powered on
pub const CLIMATE_ON_VALUE: &str = r"^\d+$";
/// Solar production, e.g. `6.421 kWh`
pub const SOLAR_VALUE: &str = r"^\d+\.\d{3} kWh$";
/// Solar capacity line, e.g. `out of 8.421 kWh`
pub const SOLAR_DETAILS: &str = r"out of \d+\.\d+ kWh";
/// Weather date, e.g. `Mon 29 May`
pub const WEATHER_DATE: &str = r"\w{3} \d{1,2} \w{3}";
/// Temperature with a degree sign
pub const DEGREES: &str = r"\d+°";
/// Wind speed
pub const WIND_SPEED: &str = r"\d+ km/h";
/// Relative humidity
pub const PERCENT: &str = r"\d+%";

/// Power-off readout
pub const OFF_READOUT: &str = "--";

/// Card headers
pub const TRAFFIC_TITLE: &str = "Traffic Consumption";
pub const SOLAR_TITLE: &str = "Solar Energy Consumption";
pub const ELECTRICITY_TITLE: &str = "Electricity Consumption";
pub const KITTEN_TITLE: &str = "UI Kitten";
/// City shown by the weather card
pub const WEATHER_LOCATION: &str = "New York";

/// First number in `text`, e.g. `6.421` from `6.421 kWh`
#[must_use]
pub fn leading_number(text: &str) -> Option<f64> {
    let digits: String = text
        .trim_start()
        .chars()
        .skip_while(|c| !(c.is_ascii_digit() || *c == '-'))
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    digits.parse().ok()
}

/// Status card XPath for the card titled `title`
fn status_card(title: &str) -> String {
    format!("//ngx-status-card[.//div[@class='title h5' and text()='{title}']]")
}

/// Tabs of the temperature card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Climate {
    /// Temperature tab
    Temperature,
    /// Humidity tab
    Humidity,
}

impl Climate {
    /// Tab title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
        }
    }
}

/// Thermostat modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateMode {
    Cool,
    Warm,
    Heat,
    Fan,
}

impl ClimateMode {
    /// Every mode, in radio order
    pub const ALL: [Self; 4] = [Self::Cool, Self::Warm, Self::Heat, Self::Fan];

    /// Radio `value` attribute
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Heat => "heat",
            Self::Fan => "fan",
        }
    }
}

/// Home page widgets
#[derive(Debug, Clone)]
pub struct IoTDashboardPage {
    page: Page,
}

impl IoTDashboardPage {
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    // Status cards

    /// Light card toggle
    #[must_use]
    pub fn light(&self) -> StatusToggle {
        StatusToggle::new(
            self.page.clone(),
            "Light",
            Locator::css(".nb-lightbulb"),
            Locator::xpath(format!(
                "{}//div[@class='status paragraph-2']",
                status_card("Light")
            )),
        )
    }

    /// Roller shades card toggle
    #[must_use]
    pub fn roller_shades(&self) -> StatusToggle {
        StatusToggle::new(
            self.page.clone(),
            "Roller Shades",
            Locator::css(".nb-roller-shades"),
            Locator::xpath(format!(
                "{}//div[@class='status paragraph-2']",
                status_card("Roller Shades")
            )),
        )
    }

    /// Whether the light reads ON
    pub async fn is_light_on(&self) -> E2eResult<bool> {
        let light = self.light();
        self.page.wait_for(light.icon(), ElementState::Visible).await?;
        light.is_on().await
    }

    /// Flip the light; returns the new state
    pub async fn switch_the_light(&self) -> E2eResult<bool> {
        self.light().switch().await
    }

    /// Flip the roller shades; returns the new state
    pub async fn switch_the_roller_shades(&self) -> E2eResult<bool> {
        self.roller_shades().switch().await
    }

    // Temperature / humidity

    /// Temperature card
    #[must_use]
    pub fn temperature_card() -> Locator {
        Locator::css("ngx-temperature nb-card")
    }

    /// Tab header for `climate`
    #[must_use]
    pub fn climate_tab(climate: Climate) -> Locator {
        Locator::css("ngx-temperature").get_by_role_named(AriaRole::Tab, climate.title())
    }

    fn climate_pane(climate: Climate) -> Locator {
        Locator::css(format!(
            "ngx-temperature nb-tab[tabtitle=\"{}\"]",
            climate.title()
        ))
    }

    /// Dial readout for `climate`
    #[must_use]
    pub fn climate_value(climate: Climate) -> Locator {
        Self::climate_pane(climate).locator("ngx-temperature-dragger .value")
    }

    /// Dial for `climate`
    #[must_use]
    pub fn climate_slider(climate: Climate) -> Locator {
        Self::climate_pane(climate).locator("ngx-temperature-dragger")
    }

    /// Power button for `climate`
    #[must_use]
    pub fn power_button(climate: Climate) -> Locator {
        Self::climate_pane(climate).locator(".power-bg")
    }

    /// Mode radio input for `climate`
    #[must_use]
    pub fn mode_radio(climate: Climate, mode: ClimateMode) -> Locator {
        Self::climate_pane(climate).locator(format!(
            "nb-radio-group input[value=\"{}\"]",
            mode.value()
        ))
    }

    /// Open the `climate` tab and wait for its dial
    pub async fn switch_to(&self, climate: Climate) -> E2eResult<()> {
        self.page.click(&Self::climate_tab(climate)).await?;
        self.page
            .wait_for(&Self::climate_value(climate), ElementState::Visible)
            .await
    }

    /// Current dial readout for `climate`
    pub async fn climate_reading(&self, climate: Climate) -> E2eResult<String> {
        self.page.text(&Self::climate_value(climate)).await
    }

    /// Press the power button and wait for the readout to change
    pub async fn toggle_power(&self, climate: Climate) -> E2eResult<()> {
        let value = Self::climate_value(climate);
        let before = self.page.text(&value).await?;
        debug!(climate = climate.title(), %before, "toggle power");
        self.page.click(&Self::power_button(climate)).await?;
        let (page, value, before) = (&self.page, &value, &before);
        poll_until("climate readout to change", page.action_wait(), || async move {
            Ok(page.text(value).await? != *before)
        })
        .await
    }

    /// Select `mode` and verify its radio is checked
    pub async fn select_mode(&self, climate: Climate, mode: ClimateMode) -> E2eResult<()> {
        let radio = Self::mode_radio(climate, mode);
        self.page.set_checked_forced(&radio, true).await?;
        expect(&self.page, &radio).to_be_checked().await
    }

    // Traffic

    /// Traffic card
    #[must_use]
    pub fn traffic_card() -> Locator {
        Locator::css("ngx-traffic nb-card")
    }

    /// Traffic card header
    #[must_use]
    pub fn traffic_header() -> Locator {
        Locator::css("ngx-traffic nb-card-header")
    }

    /// Traffic period select
    #[must_use]
    pub fn traffic_type_select() -> Locator {
        Locator::css("ngx-traffic nb-select")
    }

    /// Traffic chart
    #[must_use]
    pub fn traffic_chart() -> Locator {
        Locator::css("ngx-traffic-chart")
    }

    /// Options of the open select overlay
    #[must_use]
    pub fn select_options() -> Locator {
        Locator::css("nb-option-list nb-option")
    }

    /// Chart rendered with a non-empty box
    pub async fn is_chart_visible(&self, chart: &Locator) -> E2eResult<bool> {
        self.page.wait_for(chart, ElementState::Visible).await?;
        Ok(self
            .page
            .bounding_box(chart)
            .await?
            .is_some_and(|b| b.has_area()))
    }

    /// Open a select and return its option labels
    pub async fn open_select(&self, select: &Locator) -> E2eResult<Vec<String>> {
        self.page.click(select).await?;
        let options = Self::select_options();
        self.page
            .wait_for(&options.clone().first(), ElementState::Visible)
            .await?;
        self.page.all_texts(&options).await
    }

    /// Open a select and pick the option at `index`
    pub async fn choose_option(&self, select: &Locator, index: i32) -> E2eResult<()> {
        self.open_select(select).await?;
        self.page
            .click(&Self::select_options().nth(index))
            .await
    }

    // Solar

    /// Solar card
    #[must_use]
    pub fn solar_card() -> Locator {
        Locator::css("ngx-solar nb-card")
    }

    /// Solar card header
    #[must_use]
    pub fn solar_header() -> Locator {
        Locator::css("ngx-solar nb-card-header")
    }

    /// Solar chart container
    #[must_use]
    pub fn solar_chart() -> Locator {
        Locator::css("ngx-solar .echart")
    }

    /// Solar production value
    #[must_use]
    pub fn solar_value() -> Locator {
        Locator::css("ngx-solar .info .value")
    }

    /// Solar capacity line
    #[must_use]
    pub fn solar_details() -> Locator {
        Locator::css("ngx-solar .info .details")
    }

    // Electricity

    /// Electricity card
    #[must_use]
    pub fn electricity_card() -> Locator {
        Locator::css("ngx-electricity nb-card")
    }

    /// Electricity chart
    #[must_use]
    pub fn electricity_chart() -> Locator {
        Locator::css("ngx-electricity-chart")
    }

    /// Year tabs of the electricity table
    #[must_use]
    pub fn electricity_tabs() -> Locator {
        Locator::css("ngx-electricity nb-tabset").get_by_role(AriaRole::Tab)
    }

    /// Monthly consumption rows
    #[must_use]
    pub fn electricity_rows() -> Locator {
        Locator::css("ngx-electricity nb-list nb-list-item")
    }

    /// Electricity period select
    #[must_use]
    pub fn electricity_type_select() -> Locator {
        Locator::css("ngx-electricity nb-select")
    }

    // Weather

    /// Weather card
    #[must_use]
    pub fn weather_card() -> Locator {
        Locator::css("ngx-weather nb-card")
    }

    /// Weather location
    #[must_use]
    pub fn weather_location() -> Locator {
        Locator::css("ngx-weather .location")
    }

    /// Weather date
    #[must_use]
    pub fn weather_date() -> Locator {
        Locator::css("ngx-weather .date")
    }

    /// Current temperature
    #[must_use]
    pub fn current_temperature() -> Locator {
        Locator::css("ngx-weather .today .temperature")
    }

    /// Value of the weather parameter labelled `name` (max, min, wind, hum)
    #[must_use]
    pub fn weather_parameter(name: &str) -> Locator {
        Locator::css("ngx-weather .parameter")
            .filter_has_text(name)
            .locator(".parameter-value")
    }

    /// Days of the weekly forecast
    #[must_use]
    pub fn forecast_days() -> Locator {
        Locator::css("ngx-weather .weekly-forecast .day")
    }

    // Kitten

    /// UI Kitten card
    #[must_use]
    pub fn kitten_card() -> Locator {
        Locator::css("ngx-kitten nb-card")
    }

    /// UI Kitten card title
    #[must_use]
    pub fn kitten_title() -> Locator {
        Locator::css("ngx-kitten .details .h4")
    }
}
