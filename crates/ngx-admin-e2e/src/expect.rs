//! Retrying assertions.
//!
//! `expect(&page, &locator).to_have_text("ON")` re-reads the page until the
//! condition holds or the expect timeout runs out, then fails with the last
//! observed value.
//!
//! ## Example
//!
//! ```ignore
//! expect(&page, &status).to_have_text("OFF").await?;
//! expect(&page, &input).with_timeout(10_000).to_have_value("Apr 7, 2026").await?;
//! ```

use crate::locator::Locator;
use crate::page::{normalize_text, Page};
use crate::result::{E2eError, E2eResult};
use regex::Regex;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Start an assertion on `locator`
#[must_use]
pub fn expect<'a>(page: &'a Page, locator: &Locator) -> Expect<'a> {
    Expect {
        page,
        locator: locator.clone(),
        timeout_ms: page.timeouts().expect_ms,
    }
}

/// Assert the current URL contains `fragment`, retrying until the expect timeout
pub async fn expect_url_contains(page: &Page, fragment: &str) -> E2eResult<()> {
    let deadline = Instant::now() + Duration::from_millis(page.timeouts().expect_ms);
    loop {
        let url = page.url().await?;
        if url.contains(fragment) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(E2eError::assertion(format!(
                "expected URL to contain \"{fragment}\", got \"{url}\""
            )));
        }
        tokio::time::sleep(page.timeouts().poll_interval()).await;
    }
}

/// Assert a plain value, for checks that have nothing to retry
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::assertion(message()))
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Text(String),
    NotText(String),
    ContainsText(String),
    Texts(Vec<String>),
    Matches(Regex),
    Value(String),
    NotValue(String),
    Visible,
    Hidden,
    Checked(bool),
    Enabled,
    Css(String, String),
    Attribute(String, Option<String>),
    Count(usize),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "have text \"{t}\""),
            Self::NotText(t) => write!(f, "not have text \"{t}\""),
            Self::ContainsText(t) => write!(f, "contain text \"{t}\""),
            Self::Texts(t) => write!(f, "have texts {t:?}"),
            Self::Matches(re) => write!(f, "match /{re}/"),
            Self::Value(v) => write!(f, "have value \"{v}\""),
            Self::NotValue(v) => write!(f, "not have value \"{v}\""),
            Self::Visible => f.write_str("be visible"),
            Self::Hidden => f.write_str("be hidden"),
            Self::Checked(true) => f.write_str("be checked"),
            Self::Checked(false) => f.write_str("be unchecked"),
            Self::Enabled => f.write_str("be enabled"),
            Self::Css(p, v) => write!(f, "have CSS {p} \"{v}\""),
            Self::Attribute(n, Some(v)) => write!(f, "have attribute {n}=\"{v}\""),
            Self::Attribute(n, None) => write!(f, "have attribute {n}"),
            Self::Count(n) => write!(f, "have count {n}"),
        }
    }
}

/// Pending assertion on one locator
#[derive(Debug, Clone)]
pub struct Expect<'a> {
    page: &'a Page,
    locator: Locator,
    timeout_ms: u64,
}

impl Expect<'_> {
    /// Override the retry window
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn text(&self) -> E2eResult<Option<String>> {
        let raw = self.page.driver().text_content(&self.locator).await?;
        Ok(raw.as_deref().map(normalize_text))
    }

    async fn observe(&self, condition: &Condition) -> E2eResult<(bool, String)> {
        let driver = self.page.driver();
        let loc = &self.locator;
        let shown = |v: Option<String>| v.map_or_else(|| "<no element>".to_string(), |s| format!("\"{s}\""));
        Ok(match condition {
            Condition::Text(want) => {
                let got = self.text().await?;
                (got.as_deref() == Some(want.as_str()), shown(got))
            }
            Condition::NotText(want) => {
                let got = self.text().await?;
                (got.as_deref() != Some(want.as_str()), shown(got))
            }
            Condition::ContainsText(want) => {
                let got = self.text().await?;
                (got.as_deref().is_some_and(|t| t.contains(want.as_str())), shown(got))
            }
            Condition::Matches(re) => {
                let got = self.text().await?;
                (got.as_deref().is_some_and(|t| re.is_match(t)), shown(got))
            }
            Condition::Texts(want) => {
                let got: Vec<String> = driver
                    .all_text_contents(loc)
                    .await?
                    .iter()
                    .map(|t| normalize_text(t))
                    .collect();
                (&got == want, format!("{got:?}"))
            }
            Condition::Value(want) | Condition::NotValue(want) => {
                if driver.count(loc).await? == 0 {
                    (false, "<no element>".to_string())
                } else {
                    let got = driver.input_value(loc).await?;
                    let equal = &got == want;
                    let pass = if matches!(condition, Condition::Value(_)) { equal } else { !equal };
                    (pass, format!("\"{got}\""))
                }
            }
            Condition::Visible => {
                let v = driver.is_visible(loc).await?;
                (v, if v { "visible" } else { "not visible" }.to_string())
            }
            Condition::Hidden => {
                let v = driver.is_visible(loc).await?;
                (!v, if v { "visible" } else { "hidden" }.to_string())
            }
            Condition::Checked(want) => {
                if driver.count(loc).await? == 0 {
                    (false, "<no element>".to_string())
                } else {
                    let got = driver.is_checked(loc).await?;
                    (got == *want, if got { "checked" } else { "unchecked" }.to_string())
                }
            }
            Condition::Enabled => {
                if driver.count(loc).await? == 0 {
                    (false, "<no element>".to_string())
                } else {
                    let got = driver.is_enabled(loc).await?;
                    (got, if got { "enabled" } else { "disabled" }.to_string())
                }
            }
            Condition::Css(property, want) => {
                if driver.count(loc).await? == 0 {
                    (false, "<no element>".to_string())
                } else {
                    let got = driver.css_value(loc, property).await?;
                    (&got == want, format!("\"{got}\""))
                }
            }
            Condition::Attribute(name, want) => {
                if driver.count(loc).await? == 0 {
                    (false, "<no element>".to_string())
                } else {
                    let got = driver.attribute(loc, name).await?;
                    let pass = match (want, &got) {
                        (None, Some(_)) => true,
                        (Some(w), Some(g)) => w == g,
                        _ => false,
                    };
                    (pass, shown(got))
                }
            }
            Condition::Count(want) => {
                let got = driver.count(loc).await?;
                (got == *want, got.to_string())
            }
        })
    }

    async fn assert(&self, condition: Condition) -> E2eResult<()> {
        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        loop {
            let (pass, actual) = match self.observe(&condition).await {
                Ok(observed) => observed,
                Err(e) if e.is_test_failure() => return Err(e),
                Err(e) => (false, format!("<{e}>")),
            };
            if pass {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(E2eError::assertion(format!(
                    "expected {} to {condition}, got {actual} after {}ms",
                    self.locator, self.timeout_ms
                )));
            }
            tokio::time::sleep(self.page.timeouts().poll_interval()).await;
        }
    }

    /// Normalized text equals `text`
    pub async fn to_have_text(&self, text: &str) -> E2eResult<()> {
        self.assert(Condition::Text(text.to_string())).await
    }

    /// Normalized text differs from `text`
    pub async fn not_to_have_text(&self, text: &str) -> E2eResult<()> {
        self.assert(Condition::NotText(text.to_string())).await
    }

    /// Normalized text contains `text`
    pub async fn to_contain_text(&self, text: &str) -> E2eResult<()> {
        self.assert(Condition::ContainsText(text.to_string())).await
    }

    /// Normalized texts of all matches equal `texts`, in order
    pub async fn to_have_texts<S: AsRef<str>>(&self, texts: &[S]) -> E2eResult<()> {
        let want = texts.iter().map(|t| t.as_ref().to_string()).collect();
        self.assert(Condition::Texts(want)).await
    }

    /// Normalized text matches `pattern`
    pub async fn to_match(&self, pattern: &str) -> E2eResult<()> {
        let re = Regex::new(pattern).map_err(|e| E2eError::InvalidConfig {
            key: "pattern".to_string(),
            message: e.to_string(),
        })?;
        self.assert(Condition::Matches(re)).await
    }

    /// Input value equals `value`
    pub async fn to_have_value(&self, value: &str) -> E2eResult<()> {
        self.assert(Condition::Value(value.to_string())).await
    }

    /// Input value differs from `value`
    pub async fn not_to_have_value(&self, value: &str) -> E2eResult<()> {
        self.assert(Condition::NotValue(value.to_string())).await
    }

    /// Rendered
    pub async fn to_be_visible(&self) -> E2eResult<()> {
        self.assert(Condition::Visible).await
    }

    /// Absent or not rendered
    pub async fn to_be_hidden(&self) -> E2eResult<()> {
        self.assert(Condition::Hidden).await
    }

    /// Checked
    pub async fn to_be_checked(&self) -> E2eResult<()> {
        self.assert(Condition::Checked(true)).await
    }

    /// Unchecked
    pub async fn not_to_be_checked(&self) -> E2eResult<()> {
        self.assert(Condition::Checked(false)).await
    }

    /// Enabled
    pub async fn to_be_enabled(&self) -> E2eResult<()> {
        self.assert(Condition::Enabled).await
    }

    /// Computed style equals `value`
    pub async fn to_have_css(&self, property: &str, value: &str) -> E2eResult<()> {
        self.assert(Condition::Css(property.to_string(), value.to_string()))
            .await
    }

    /// Attribute present, and equal to `value` when given
    pub async fn to_have_attribute(&self, name: &str, value: Option<&str>) -> E2eResult<()> {
        self.assert(Condition::Attribute(
            name.to_string(),
            value.map(ToString::to_string),
        ))
        .await
    }

    /// Exactly `count` matches
    pub async fn to_have_count(&self, count: usize) -> E2eResult<()> {
        self.assert(Condition::Count(count)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::mock::{MockDriver, MockElement};
    use std::sync::Arc;

    fn setup() -> (Arc<MockDriver>, Page) {
        let mock = Arc::new(MockDriver::new());
        let page = Page::new(mock.clone(), "http://app", Timeouts::fast());
        (mock, page)
    }

    mod text_tests {
        use super::*;

        #[tokio::test]
        async fn test_to_have_text_passes() {
            let (mock, page) = setup();
            let status = Locator::css(".status");
            mock.set_element(&status, MockElement::visible().with_text(" ON "));
            expect(&page, &status).to_have_text("ON").await.unwrap();
            expect(&page, &status).not_to_have_text("OFF").await.unwrap();
        }

        #[tokio::test]
        async fn test_to_have_text_reports_actual() {
            let (mock, page) = setup();
            let status = Locator::css(".status");
            mock.set_element(&status, MockElement::visible().with_text("ON"));
            let err = expect(&page, &status).to_have_text("OFF").await.unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("have text \"OFF\""));
            assert!(msg.contains("got \"ON\""));
        }

        #[tokio::test]
        async fn test_missing_element_reports_no_element() {
            let (_mock, page) = setup();
            let err = expect(&page, &Locator::css("nope"))
                .to_contain_text("x")
                .await
                .unwrap_err();
            assert!(err.to_string().contains("<no element>"));
        }

        #[tokio::test]
        async fn test_to_match_and_texts() {
            let (mock, page) = setup();
            let value = Locator::css(".value");
            mock.set_element(&value, MockElement::visible().with_text("6.421 kWh"));
            expect(&page, &value).to_match(r"^\d+\.\d{3} kWh$").await.unwrap();

            let options = Locator::css("nb-option");
            mock.set_element(&options, MockElement::visible().with_texts(["Light", "Dark"]));
            expect(&page, &options).to_have_texts(&["Light", "Dark"]).await.unwrap();
            expect(&page, &options).to_have_count(2).await.unwrap();
        }

        #[tokio::test]
        async fn test_invalid_pattern_is_config_error() {
            let (_mock, page) = setup();
            let err = expect(&page, &Locator::css("x")).to_match("(").await.unwrap_err();
            assert!(matches!(err, E2eError::InvalidConfig { .. }));
        }
    }

    mod state_tests {
        use super::*;

        #[tokio::test]
        async fn test_visibility() {
            let (mock, page) = setup();
            let card = Locator::css("nb-card");
            expect(&page, &card).to_be_hidden().await.unwrap();
            mock.set_element(&card, MockElement::visible());
            expect(&page, &card).to_be_visible().await.unwrap();
        }

        #[tokio::test]
        async fn test_value_and_checked() {
            let (mock, page) = setup();
            let input = Locator::placeholder("Form Picker");
            mock.set_element(&input, MockElement::visible().with_value("Apr 7, 2026").with_checked(true));
            expect(&page, &input).to_have_value("Apr 7, 2026").await.unwrap();
            expect(&page, &input).not_to_have_value("").await.unwrap();
            expect(&page, &input).to_be_checked().await.unwrap();
        }

        #[tokio::test]
        async fn test_css_and_attribute() {
            let (mock, page) = setup();
            let header = Locator::css("nb-layout-header");
            mock.set_element(
                &header,
                MockElement::visible()
                    .with_css("background-color", "rgb(34, 43, 69)")
                    .with_attribute("echarts", ""),
            );
            expect(&page, &header).to_have_css("background-color", "rgb(34, 43, 69)").await.unwrap();
            expect(&page, &header).to_have_attribute("echarts", None).await.unwrap();
            assert!(expect(&page, &header).to_have_attribute("missing", None).await.is_err());
        }

        #[tokio::test]
        async fn test_retries_until_state_changes() {
            let (mock, page) = setup();
            let status = Locator::css(".status");
            mock.set_element(&status, MockElement::visible().with_text("OFF"));
            let later = mock.clone();
            let loc = status.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                later.update_element(&loc, |e| e.text = Some("ON".to_string()));
            });
            expect(&page, &status).to_have_text("ON").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_expect_url_contains() {
        let (mock, page) = setup();
        page.goto("/pages/forms/layouts").await.unwrap();
        expect_url_contains(&page, "/pages/forms/layouts").await.unwrap();
        let err = expect_url_contains(&page, "/pages/tables").await.unwrap_err();
        assert!(err.to_string().contains(&mock.url()));
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, || "never".to_string()).is_ok());
        let err = ensure(false, || "count mismatch".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: count mismatch");
    }
}
