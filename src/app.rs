use crate::compose::Handler;
use crate::config::{ControlKind, Scene};
use crate::prop_bag::{PropBag, ON_CLICK};
use crate::toggle_state::ToggleProvider;
use crate::view::{Button, Switch, View};
use anyhow::{anyhow, Result};
use tracing::{debug, info};

struct PreparedControl {
    kind: ControlKind,
    overrides: PropBag,
    pass_state: bool,
}

/// Wires every control of a scene to one shared toggle.
///
/// Views are rebuilt from the current state whenever they are requested, so
/// a render after a click always reflects the new state.
pub struct App {
    name: String,
    provider: ToggleProvider,
    controls: Vec<PreparedControl>,
}

impl App {
    pub fn new(scene: &Scene) -> Result<Self> {
        let mut controls = Vec::with_capacity(scene.controls.len());
        for control in &scene.controls {
            let mut overrides = control.prop_bag()?;
            if let Some(message) = &control.log {
                let message = message.clone();
                overrides.insert(ON_CLICK, Handler::from_fn(move |_| info!("{}", message)));
            }
            controls.push(PreparedControl {
                kind: control.kind,
                overrides,
                pass_state: control.pass_state,
            });
        }

        info!("Scene '{}' ready with {} control(s)", scene.name, controls.len());
        Ok(Self {
            name: scene.name.clone(),
            provider: ToggleProvider::with_initial(scene.initial),
            controls,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> &ToggleProvider {
        &self.provider
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Builds the views for the current state
    pub fn views(&self) -> Vec<Box<dyn View>> {
        let on = self.provider.on();
        self.controls
            .iter()
            .map(|control| {
                let mut overrides = control.overrides.clone();
                if control.pass_state {
                    overrides.insert("on", on);
                }
                let props = self.provider.get_toggler_props(overrides);
                let view: Box<dyn View> = match control.kind {
                    ControlKind::Switch => Box::new(Switch::new(props)),
                    ControlKind::Button => Box::new(Button::new(props, if on { "on" } else { "off" })),
                };
                view
            })
            .collect()
    }

    pub fn render(&self) -> Vec<String> {
        self.views().iter().map(|view| view.render()).collect()
    }

    /// Clicks the control at `index`
    pub fn click(&self, index: usize) -> Result<()> {
        debug!("Clicking control {}", index);
        let views = self.views();
        let view = views
            .get(index)
            .ok_or_else(|| anyhow!("No control at index {} ({} available)", index, views.len()))?;
        view.click()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_scene;

    const SCENE: &str = r#"
name: "Test"
controls:
  - type: switch
    pass_state: true
  - type: button
    log: "onButtonClick"
    props:
      aria-label: "custom-button"
      id: "custom-button-id"
"#;

    #[test]
    fn test_render_initial() {
        let app = App::new(&parse_scene(SCENE).unwrap()).unwrap();

        assert_eq!(app.name(), "Test");
        assert_eq!(app.len(), 2);
        assert_eq!(
            app.render(),
            vec![
                "<switch aria-pressed=\"false\" on=\"false\">[O==]</switch>".to_string(),
                "<button aria-pressed=\"false\" aria-label=\"custom-button\" id=\"custom-button-id\">off</button>".to_string(),
            ]
        );
    }

    #[test]
    fn test_every_control_toggles_shared_state() {
        let app = App::new(&parse_scene(SCENE).unwrap()).unwrap();

        app.click(1).unwrap();
        assert!(app.provider().on());
        assert!(app.render()[0].contains("[==O]"));
        assert!(app.render()[1].ends_with(">on</button>"));

        app.click(0).unwrap();
        assert!(!app.provider().on());
    }

    #[test]
    fn test_click_out_of_range() {
        let app = App::new(&parse_scene(SCENE).unwrap()).unwrap();
        assert!(app.click(5).is_err());
        assert!(!app.provider().on());
    }

    #[test]
    fn test_initial_state_from_scene() {
        let scene = parse_scene("name: lit\ninitial: true\ncontrols:\n  - type: button\n").unwrap();
        let app = App::new(&scene).unwrap();
        assert!(app.provider().on());
        assert_eq!(app.render(), vec!["<button aria-pressed=\"true\">on</button>".to_string()]);
    }
}
