use crate::compose::Handler;
use anyhow::Result;
use std::fmt;
use tracing::debug;

pub const ARIA_PRESSED: &str = "aria-pressed";
pub const ARIA_LABEL: &str = "aria-label";
pub const ON_CLICK: &str = "onClick";
pub const ID: &str = "id";

/// A single property value handed to a rendered element
#[derive(Debug, Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Handler(Handler),
}

impl PropValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, PropValue::Handler(_))
    }
}

// Handlers compare by identity
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("null"),
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Str(s) => f.write_str(s),
            PropValue::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<Handler> for PropValue {
    fn from(value: Handler) -> Self {
        PropValue::Handler(value)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

/// An insertion-ordered set of named properties.
///
/// Inserting an existing key replaces its value but keeps its position,
/// the same way an object spread overwrites an earlier key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropBag {
    entries: Vec<(String, PropValue)>,
}

impl PropBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PropBag::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a property, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Spreads another bag over this one, later keys winning
    pub fn extend(&mut self, other: PropBag) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// The click handler, if the bag carries a callable one
    pub fn on_click(&self) -> Option<&Handler> {
        self.get(ON_CLICK).and_then(PropValue::as_handler)
    }

    /// Dispatches a click to the bag's handler. A missing or non-callable
    /// `onClick` is a no-op.
    pub fn click(&self, args: &[PropValue]) -> Result<()> {
        match self.on_click() {
            Some(handler) => handler.call(args),
            None => {
                debug!("Click dispatched to a bag without a callable onClick");
                Ok(())
            }
        }
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for PropBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = PropBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

impl IntoIterator for PropBag {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_insert_keeps_position_on_overwrite() {
        let mut bag = PropBag::new().with("a", 1.0).with("b", true).with("c", "x");

        let previous = bag.insert("b", false);

        assert_eq!(previous, Some(PropValue::Bool(true)));
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(bag.get("b"), Some(&PropValue::Bool(false)));
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut bag = PropBag::new().with("a", 1.0).with("b", 2.0).with("c", 3.0);

        assert_eq!(bag.remove("b"), Some(PropValue::Number(2.0)));
        assert_eq!(bag.remove("missing"), None);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_extend_is_last_write_wins() {
        let mut base = PropBag::new().with(ARIA_PRESSED, false).with(ID, "base");
        base.extend(PropBag::new().with(ID, "override").with(ARIA_LABEL, "label"));

        assert_eq!(base.keys().collect::<Vec<_>>(), vec![ARIA_PRESSED, ID, ARIA_LABEL]);
        assert_eq!(base.get(ID).and_then(PropValue::as_str), Some("override"));
    }

    #[test]
    fn test_click_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bag = PropBag::new().with(ON_CLICK, Handler::from_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        bag.click(&[]).unwrap();
        bag.click(&[]).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_click_without_callable_is_noop() {
        assert!(PropBag::new().click(&[]).is_ok());
        assert!(PropBag::new().with(ON_CLICK, "oops").click(&[]).is_ok());
    }

    #[test]
    fn test_option_converts_to_null() {
        assert_eq!(PropValue::from(None::<&str>), PropValue::Null);
        assert_eq!(PropValue::from(Some("x")), PropValue::Str("x".to_string()));
    }

    #[test]
    fn test_from_iterator() {
        let bag: PropBag = vec![("id", "x"), ("id", "y")].into_iter().collect();
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("id").and_then(PropValue::as_str), Some("y"));
    }
}
