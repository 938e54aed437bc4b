pub mod app;
pub mod compose;
pub mod config;
pub mod prop_bag;
pub mod toggle_state;
pub mod view;


pub use app::App;
pub use compose::{Handler, call_all, call_all_values};
pub use config::{Control, ControlKind, Scene, load_scene, load_scene_from_path, parse_scene};
pub use prop_bag::{PropBag, PropValue, ARIA_LABEL, ARIA_PRESSED, ID, ON_CLICK};
pub use toggle_state::{SubscriptionId, ToggleProvider, ToggleState};
pub use view::{Button, Switch, View};
