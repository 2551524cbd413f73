//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable chain of [`Selector`] steps. It never holds
//! a reference to a DOM node: every interaction compiles the chain to a
//! JavaScript query and resolves it against the live page, so a locator
//! built before a navigation keeps working after it.
//!
//! ```text
//! Locator::css("nb-card").filter_has_text("Using the Grid").locator("form")
//!   => css=nb-card >> has-text="Using the Grid" >> css=form
//! ```
//!
//! The canonical `>>` form is what errors, logs and the mock driver see.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIA roles understood by role selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    /// `button`, `input[type=button|submit]`, `[role=button]`
    Button,
    /// Checkbox inputs
    Checkbox,
    /// Radio inputs
    Radio,
    /// Text inputs and textareas
    Textbox,
    /// Tables
    Table,
    /// Table rows
    Row,
    /// Table cells
    Cell,
    /// Links
    Link,
    /// Tabs
    Tab,
}

impl AriaRole {
    /// Role name as written in ARIA
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Textbox => "textbox",
            Self::Table => "table",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::Link => "link",
            Self::Tab => "tab",
        }
    }

    /// CSS matching elements with this role, implicit or explicit
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Button => {
                "button,input[type=button],input[type=submit],input[type=reset],[role=button]"
            }
            Self::Checkbox => "input[type=checkbox],[role=checkbox]",
            Self::Radio => "input[type=radio],[role=radio]",
            Self::Textbox => {
                "input:not([type]),input[type=text],input[type=email],input[type=password],\
                 input[type=search],input[type=tel],input[type=url],input[type=number],\
                 textarea,[role=textbox]"
            }
            Self::Table => "table,[role=table],[role=grid]",
            Self::Row => "tr,[role=row]",
            Self::Cell => "td,[role=cell],[role=gridcell]",
            Self::Link => "a[href],[role=link]",
            Self::Tab => "[role=tab],.tab-link",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Descendants matching a CSS selector
    Css(String),
    /// Nodes matching an XPath expression, evaluated from each root
    XPath(String),
    /// Smallest descendants whose text equals (exact) or contains the value
    Text {
        /// Text to match
        text: String,
        /// Whole-string, case-sensitive match
        exact: bool,
    },
    /// Descendants whose `title` attribute equals the value
    Title(String),
    /// Inputs whose `placeholder` equals the value
    Placeholder(String),
    /// Descendants with an ARIA role and optional accessible name
    Role {
        /// Role
        role: AriaRole,
        /// Accessible name, matched case-insensitively as a substring
        name: Option<String>,
    },
    /// Keep current matches whose text contains the value
    HasText(String),
    /// Keep current matches containing a match of the inner locator
    Has(Box<Locator>),
    /// Keep the n-th match (negative counts from the end)
    Nth(i32),
}

impl Selector {
    fn js(&self) -> String {
        match self {
            Self::Css(css) => format!(
                "set = set.flatMap(r => Array.from(r.querySelectorAll({})));",
                js_str(css)
            ),
            Self::XPath(xpath) => format!(
                "set = set.flatMap(r => {{ const it = document.evaluate({}, r, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < it.snapshotLength; i++) out.push(it.snapshotItem(i)); \
                 return out; }});",
                js_str(xpath)
            ),
            Self::Text { text, exact } => format!(
                "set = __e2e.byText(set, {}, {exact});",
                js_str(text)
            ),
            Self::Title(title) => format!(
                "set = set.flatMap(r => Array.from(r.querySelectorAll('[title]')).filter(e => e.getAttribute('title') === {}));",
                js_str(title)
            ),
            Self::Placeholder(placeholder) => format!(
                "set = set.flatMap(r => Array.from(r.querySelectorAll('[placeholder]')).filter(e => e.getAttribute('placeholder') === {}));",
                js_str(placeholder)
            ),
            Self::Role { role, name } => format!(
                "set = __e2e.byRole(set, {}, {});",
                js_str(role.css()),
                name.as_deref().map_or_else(|| "null".to_string(), js_str)
            ),
            Self::HasText(text) => format!(
                "set = set.filter(e => __e2e.norm(e.textContent).toLowerCase().includes({}.toLowerCase()));",
                js_str(text)
            ),
            Self::Has(inner) => format!(
                "set = set.filter(e => ({})([e]).length > 0);",
                inner.chain_js()
            ),
            Self::Nth(n) => {
                format!("set = (() => {{ const i = {n} < 0 ? set.length + {n} : {n}; return i >= 0 && i < set.length ? [set[i]] : []; }})();")
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::XPath(xpath) => write!(f, "xpath={xpath}"),
            Self::Text { text, exact: true } => write!(f, "text=\"{text}\""),
            Self::Text { text, exact: false } => write!(f, "text={text}"),
            Self::Title(title) => write!(f, "title=\"{title}\""),
            Self::Placeholder(p) => write!(f, "placeholder=\"{p}\""),
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name=\"{name}\"]"),
            Self::HasText(text) => write!(f, "has-text=\"{text}\""),
            Self::Has(inner) => write!(f, "has=({inner})"),
            Self::Nth(n) => write!(f, "nth={n}"),
        }
    }
}

/// Shared helpers injected ahead of every compiled query.
const PRELUDE: &str = r#"const __e2e = {
  norm: (s) => (s || '').replace(/\s+/g, ' ').trim(),
  byText: (roots, text, exact) => {
    const hit = (e) => {
      const t = __e2e.norm(e.textContent);
      return exact ? t === text : t.toLowerCase().includes(text.toLowerCase());
    };
    return roots.flatMap(r => Array.from(r.querySelectorAll('*'))
      .filter(e => hit(e) && !Array.from(e.children).some(hit)));
  },
  accessibleName: (e) => {
    const label = e.getAttribute('aria-label');
    if (label) return __e2e.norm(label);
    const by = e.getAttribute('aria-labelledby');
    if (by) {
      return __e2e.norm(by.split(/\s+/)
        .map(id => (document.getElementById(id) || {}).textContent || '').join(' '));
    }
    if (e.labels && e.labels.length) {
      return __e2e.norm(Array.from(e.labels).map(l => l.textContent).join(' '));
    }
    if (e.getAttribute('placeholder')) return __e2e.norm(e.getAttribute('placeholder'));
    if (e.tagName === 'INPUT' && e.value && /button|submit|reset/.test(e.type)) return e.value;
    if (e.getAttribute('title')) return __e2e.norm(e.getAttribute('title'));
    return __e2e.norm(e.textContent);
  },
  byRole: (roots, css, name) => {
    const found = roots.flatMap(r => Array.from(r.querySelectorAll(css)));
    if (name === null) return found;
    const wanted = name.toLowerCase();
    return found.filter(e => __e2e.accessibleName(e).toLowerCase().includes(wanted));
  },
  visible: (e) => {
    if (!e || !e.isConnected) return false;
    const style = window.getComputedStyle(e);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = e.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
  },
};"#;

/// Encode a string as a JavaScript string literal.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Lazily-resolved handle to zero or more DOM elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    steps: Vec<Selector>,
}

impl Locator {
    fn from_step(step: Selector) -> Self {
        Self { steps: vec![step] }
    }

    fn push(mut self, step: Selector) -> Self {
        self.steps.push(step);
        self
    }

    /// Elements matching a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::from_step(Selector::Css(selector.into()))
    }

    /// Nodes matching an XPath expression
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::from_step(Selector::XPath(expr.into()))
    }

    /// Smallest elements whose text contains `text`, ignoring case
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_step(Selector::Text {
            text: text.into(),
            exact: false,
        })
    }

    /// Smallest elements whose normalized text is exactly `text`
    #[must_use]
    pub fn exact_text(text: impl Into<String>) -> Self {
        Self::from_step(Selector::Text {
            text: text.into(),
            exact: true,
        })
    }

    /// Elements with the given `title` attribute
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self::from_step(Selector::Title(title.into()))
    }

    /// Inputs with the given placeholder
    #[must_use]
    pub fn placeholder(placeholder: impl Into<String>) -> Self {
        Self::from_step(Selector::Placeholder(placeholder.into()))
    }

    /// Elements with an ARIA role
    #[must_use]
    pub fn role(role: AriaRole) -> Self {
        Self::from_step(Selector::Role { role, name: None })
    }

    /// Elements with an ARIA role whose accessible name contains `name`
    #[must_use]
    pub fn role_named(role: AriaRole, name: impl Into<String>) -> Self {
        Self::from_step(Selector::Role {
            role,
            name: Some(name.into()),
        })
    }

    /// Descendants matching a CSS selector
    #[must_use]
    pub fn locator(self, selector: impl Into<String>) -> Self {
        self.push(Selector::Css(selector.into()))
    }

    /// Descendants containing `text`
    #[must_use]
    pub fn get_by_text(self, text: impl Into<String>) -> Self {
        self.push(Selector::Text {
            text: text.into(),
            exact: false,
        })
    }

    /// Descendants whose text is exactly `text`
    #[must_use]
    pub fn get_by_exact_text(self, text: impl Into<String>) -> Self {
        self.push(Selector::Text {
            text: text.into(),
            exact: true,
        })
    }

    /// Descendant inputs with the given placeholder
    #[must_use]
    pub fn get_by_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.push(Selector::Placeholder(placeholder.into()))
    }

    /// Descendants with an ARIA role
    #[must_use]
    pub fn get_by_role(self, role: AriaRole) -> Self {
        self.push(Selector::Role { role, name: None })
    }

    /// Descendants with an ARIA role and accessible name
    #[must_use]
    pub fn get_by_role_named(self, role: AriaRole, name: impl Into<String>) -> Self {
        self.push(Selector::Role {
            role,
            name: Some(name.into()),
        })
    }

    /// Keep matches whose text contains `text`
    #[must_use]
    pub fn filter_has_text(self, text: impl Into<String>) -> Self {
        self.push(Selector::HasText(text.into()))
    }

    /// Keep matches that contain a match of `inner`
    #[must_use]
    pub fn filter_has(self, inner: Locator) -> Self {
        self.push(Selector::Has(Box::new(inner)))
    }

    /// Keep only the n-th match
    #[must_use]
    pub fn nth(self, index: i32) -> Self {
        self.push(Selector::Nth(index))
    }

    /// Keep only the first match
    #[must_use]
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Keep only the last match
    #[must_use]
    pub fn last(self) -> Self {
        self.nth(-1)
    }

    /// Append every step of `other`
    #[must_use]
    pub fn then(mut self, other: &Locator) -> Self {
        self.steps.extend(other.steps.iter().cloned());
        self
    }

    /// Steps in resolution order
    #[must_use]
    pub fn steps(&self) -> &[Selector] {
        &self.steps
    }

    /// JS function from a root array to the matched elements
    fn chain_js(&self) -> String {
        let body: String = self.steps.iter().map(Selector::js).collect::<Vec<_>>().join(" ");
        format!("((roots) => {{ let set = roots; {body} return set; }})")
    }

    /// JS expression evaluating to the array of matched elements.
    ///
    /// Requires the helpers from [`Locator::script`]; use that to build
    /// something evaluable.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{}([document])", self.chain_js())
    }

    /// Self-contained script binding the matches to `els` and running `body`.
    #[must_use]
    pub fn script(&self, body: &str) -> String {
        format!(
            "(() => {{ {PRELUDE} const els = Array.from(new Set({})); {body} }})()",
            self.to_query()
        )
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Element geometry in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl BoundingBox {
    /// Create a bounding box
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Non-zero area
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn test_chain_display() {
            let loc = Locator::css("nb-card")
                .filter_has_text("Using the Grid")
                .locator("form");
            assert_eq!(
                loc.to_string(),
                "css=nb-card >> has-text=\"Using the Grid\" >> css=form"
            );
        }

        #[test]
        fn test_role_display() {
            assert_eq!(Locator::role(AriaRole::Table).to_string(), "role=table");
            assert_eq!(
                Locator::role_named(AriaRole::Textbox, "Email").to_string(),
                "role=textbox[name=\"Email\"]"
            );
        }

        #[test]
        fn test_text_display() {
            assert_eq!(Locator::exact_text("5").to_string(), "text=\"5\"");
            assert_eq!(Locator::text("Dialog").to_string(), "text=Dialog");
        }

        #[test]
        fn test_has_and_nth_display() {
            let loc = Locator::css("tr")
                .filter_has(Locator::css("td").nth(1).filter_has_text("11"))
                .last();
            assert_eq!(
                loc.to_string(),
                "css=tr >> has=(css=td >> nth=1 >> has-text=\"11\") >> nth=-1"
            );
        }

        #[test]
        fn test_equal_chains_are_equal() {
            let a = Locator::title("Forms");
            let b = Locator::title("Forms");
            assert_eq!(a, b);
            assert_eq!(a.to_string(), b.to_string());
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_query_starts_from_document() {
            let q = Locator::css("nb-select").to_query();
            assert!(q.ends_with("([document])"));
            assert!(q.contains("querySelectorAll(\"nb-select\")"));
        }

        #[test]
        fn test_strings_are_escaped() {
            let q = Locator::text("say \"hi\"\n").to_query();
            assert!(q.contains(r#""say \"hi\"\n""#));
        }

        #[test]
        fn test_script_includes_prelude_and_body() {
            let s = Locator::css("a").script("return els.length;");
            assert!(s.contains("const __e2e"));
            assert!(s.contains("return els.length;"));
        }

        #[test]
        fn test_nested_has_compiles_inner_chain() {
            let q = Locator::css("nb-card")
                .filter_has(Locator::css("button"))
                .to_query();
            assert!(q.contains("([e]).length > 0"));
        }

        #[test]
        fn test_then_appends_steps() {
            let loc = Locator::css("a").then(&Locator::css("b").first());
            assert_eq!(loc.steps().len(), 3);
        }
    }

    mod bounding_box_tests {
        use super::*;

        #[test]
        fn test_center() {
            let b = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
            assert_eq!(b.center(), (60.0, 45.0));
            assert!(b.has_area());
            assert!(!BoundingBox::new(0.0, 0.0, 0.0, 5.0).has_area());
        }
    }
}
