use crate::compose::{call_all_values, Handler};
use crate::prop_bag::{PropBag, PropValue, ARIA_PRESSED, ON_CLICK};
use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use tracing::{debug, warn};

/// Represents the state of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    On,
    #[default]
    Off,
}

impl ToggleState {
    /// Returns the opposite state for toggling
    pub fn toggle(self) -> ToggleState {
        match self {
            ToggleState::On => ToggleState::Off,
            ToggleState::Off => ToggleState::On,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, ToggleState::On)
    }
}

impl From<bool> for ToggleState {
    fn from(on: bool) -> Self {
        if on {
            ToggleState::On
        } else {
            ToggleState::Off
        }
    }
}

impl From<ToggleState> for bool {
    fn from(state: ToggleState) -> Self {
        state.is_on()
    }
}

/// Handle returned by [`ToggleProvider::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct ProviderInner {
    state: ToggleState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

/// Owns a single on/off flag and hands out prop bags wired to flip it.
///
/// Clones share the same state. The flag lives as long as any clone does;
/// click handlers produced by [`ToggleProvider::get_toggler_props`] only
/// hold a weak reference and become no-ops once every provider is dropped.
#[derive(Clone, Default)]
pub struct ToggleProvider {
    inner: Arc<RwLock<ProviderInner>>,
}

impl fmt::Debug for ToggleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleProvider").field("on", &self.on()).finish()
    }
}

impl ToggleProvider {
    /// Creates a provider that starts off
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(on: bool) -> Self {
        let provider = Self::new();
        if let Ok(mut inner) = provider.inner.write() {
            inner.state = ToggleState::from(on);
        }
        provider
    }

    /// Current state of the flag
    pub fn on(&self) -> bool {
        self.state().is_on()
    }

    pub fn state(&self) -> ToggleState {
        match self.inner.read() {
            Ok(inner) => inner.state,
            Err(e) => {
                warn!("Failed to read toggle state: {}", e);
                ToggleState::Off
            }
        }
    }

    /// Flips the flag and notifies observers of the new value
    pub fn toggle(&self) {
        let (new_state, observers) = match self.inner.write() {
            Ok(mut inner) => {
                let previous = inner.state;
                inner.state = previous.toggle();
                debug!("Toggled: {:?} -> {:?}", previous, inner.state);
                let observers: Vec<Observer> =
                    inner.observers.iter().map(|(_, o)| Arc::clone(o)).collect();
                (inner.state, observers)
            }
            Err(e) => {
                warn!("Failed to toggle state: {}", e);
                return;
            }
        };

        // Lock is released so observers may read the provider
        for observer in observers {
            observer(new_state.is_on());
        }
    }

    /// Registers a callback run after every toggle with the new value
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        match self.inner.write() {
            Ok(mut inner) => {
                let id = SubscriptionId(inner.next_id);
                inner.next_id += 1;
                inner.observers.push((id, Arc::new(observer)));
                debug!("Added observer {:?} ({} total)", id, inner.observers.len());
                id
            }
            Err(e) => {
                warn!("Failed to add observer: {}", e);
                SubscriptionId(u64::MAX)
            }
        }
    }

    /// Removes an observer, returning whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self.inner.write() {
            Ok(mut inner) => {
                let before = inner.observers.len();
                inner.observers.retain(|(existing, _)| *existing != id);
                before != inner.observers.len()
            }
            Err(e) => {
                warn!("Failed to remove observer {:?}: {}", id, e);
                false
            }
        }
    }

    /// The prop collection: toggler props with no overrides
    pub fn toggler_props(&self) -> PropBag {
        self.get_toggler_props(PropBag::new())
    }

    /// Builds the props for an element that toggles this provider.
    ///
    /// The result always carries `aria-pressed` (the current state) and an
    /// `onClick` that runs the caller's `onClick`, if it is callable, and then
    /// toggles. Every other override is spread over the defaults.
    pub fn get_toggler_props(&self, mut overrides: PropBag) -> PropBag {
        let override_handler = overrides.remove(ON_CLICK).unwrap_or(PropValue::Null);
        let on_click = call_all_values([override_handler, PropValue::Handler(self.toggle_handler())]);

        let mut props = PropBag::new()
            .with(ARIA_PRESSED, self.on())
            .with(ON_CLICK, on_click);
        debug!("Merging {} override(s) into toggler props", overrides.len());
        props.extend(overrides);
        props
    }

    fn toggle_handler(&self) -> Handler {
        let weak: Weak<RwLock<ProviderInner>> = Arc::downgrade(&self.inner);
        Handler::from_fn(move |_args| match weak.upgrade() {
            Some(inner) => ToggleProvider { inner }.toggle(),
            None => debug!("Toggle handler invoked after provider was dropped"),
        })
    }
}
