use crate::prop_bag::{PropBag, PropValue, ARIA_PRESSED};
use anyhow::Result;
use tracing::debug;

/// A rendered element that takes a prop bag as its full attribute set
pub trait View {
    fn props(&self) -> &PropBag;

    fn render(&self) -> String;

    /// Dispatches a click to the element's `onClick`
    fn click(&self) -> Result<()> {
        debug!("Click on {}", self.render());
        self.props().click(&[])
    }
}

/// Renders every non-callable prop as ` key="value"`, in bag order
fn render_attributes(props: &PropBag) -> String {
    props
        .iter()
        .filter(|(_, value)| !value.is_callable())
        .map(|(key, value)| format!(" {}=\"{}\"", key, value))
        .collect()
}

/// A two-position switch. Reads `on` when given, otherwise `aria-pressed`.
#[derive(Debug, Clone)]
pub struct Switch {
    props: PropBag,
}

impl Switch {
    pub fn new(props: PropBag) -> Self {
        Self { props }
    }

    pub fn is_on(&self) -> bool {
        self.props
            .get("on")
            .or_else(|| self.props.get(ARIA_PRESSED))
            .and_then(PropValue::as_bool)
            .unwrap_or(false)
    }
}

impl View for Switch {
    fn props(&self) -> &PropBag {
        &self.props
    }

    fn render(&self) -> String {
        let knob = if self.is_on() { "[==O]" } else { "[O==]" };
        format!("<switch{}>{}</switch>", render_attributes(&self.props), knob)
    }
}

/// A plain button with a text caption
#[derive(Debug, Clone)]
pub struct Button {
    props: PropBag,
    caption: String,
}

impl Button {
    pub fn new(props: PropBag, caption: impl Into<String>) -> Self {
        Self {
            props,
            caption: caption.into(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }
}

impl View for Button {
    fn props(&self) -> &PropBag {
        &self.props
    }

    fn render(&self) -> String {
        format!("<button{}>{}</button>", render_attributes(&self.props), self.caption)
    }
}
