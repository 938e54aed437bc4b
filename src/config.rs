use crate::prop_bag::{PropBag, PropValue};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

// Embedded default scene
const EMBEDDED_SCENE: &str = include_str!("../scene.yaml");

/// Environment variable naming a scene file to load instead of the embedded one
pub const SCENE_ENV: &str = "TOGGLE_SCENE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub initial: bool,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Switch,
    Button,
}

/// One interactive element sharing the scene's toggle
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Control {
    #[serde(rename = "type")]
    pub kind: ControlKind,
    /// Extra props spread over the toggler defaults, in file order
    #[serde(default)]
    pub props: Mapping,
    /// Message logged by the control's own click handler, ahead of the toggle
    #[serde(default)]
    pub log: Option<String>,
    /// Also pass the current state as an `on` prop
    #[serde(default)]
    pub pass_state: bool,
}

impl Control {
    /// Converts the control's YAML props into a prop bag
    pub fn prop_bag(&self) -> Result<PropBag> {
        let mut bag = PropBag::new();
        for (key, value) in &self.props {
            let key = key
                .as_str()
                .ok_or_else(|| anyhow!("Prop names must be strings, got {:?}", key))?;
            bag.insert(key, scalar_prop(key, value)?);
        }
        Ok(bag)
    }
}

fn scalar_prop(key: &str, value: &Value) -> Result<PropValue> {
    match value {
        Value::Null => Ok(PropValue::Null),
        Value::Bool(b) => Ok(PropValue::Bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(PropValue::Number)
            .ok_or_else(|| anyhow!("Prop '{}' has an unrepresentable number {}", key, n)),
        Value::String(s) => Ok(PropValue::Str(s.clone())),
        other => bail!("Prop '{}' must be a scalar, got {:?}", key, other),
    }
}

/// Parses and validates a scene from YAML
pub fn parse_scene(yaml: &str) -> Result<Scene> {
    let scene: Scene = serde_yaml::from_str(yaml)?;
    if scene.controls.is_empty() {
        bail!("Scene '{}' has no controls", scene.name);
    }
    for control in &scene.controls {
        control.prop_bag()?;
    }
    Ok(scene)
}

pub fn load_scene_from_path(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file {}", path.display()))?;
    parse_scene(&yaml).with_context(|| format!("Invalid scene file {}", path.display()))
}

/// Loads the scene named by `TOGGLE_SCENE`, falling back to the embedded one
pub fn load_scene() -> Result<Scene> {
    match std::env::var(SCENE_ENV) {
        Ok(path) => {
            tracing::info!("Loading scene from {}", path);
            load_scene_from_path(path)
        }
        Err(_) => {
            tracing::info!("Using embedded scene");
            parse_scene(EMBEDDED_SCENE)
        }
    }
}
