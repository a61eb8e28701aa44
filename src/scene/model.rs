use serde::{Deserialize, Serialize};

use crate::foundation::core::SceneId;
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Boundary storyboard definition (the JSON-facing, human-edited model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryboardDef {
    /// Deterministic seed for effect jitter.
    #[serde(default)]
    pub seed: u64,
    /// Gated scenes in presentation order.
    pub scenes: Vec<SceneDef>,
}

/// One gated scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDef {
    /// Scene name; must be one of the known scene ids.
    pub name: String,
    /// Activation predicate.
    #[serde(default)]
    pub activation: ActivationDef,
    /// Delay between `Pending` and `Active`, in milliseconds.
    #[serde(default)]
    pub pending_delay_ms: u64,
    /// How the scene leaves `Active`.
    pub completion: CompletionDef,
    /// Timed in-scene cues, relative to activation.
    #[serde(default)]
    pub cues: Vec<CueDef>,
}

/// Conjunction of activation conditions; every configured one must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivationDef {
    /// Minimum scroll progress in `[0, 1]`.
    #[serde(default)]
    pub min_progress: Option<f64>,
    /// Use a strict `>` comparison instead of `>=`.
    #[serde(default)]
    pub strict_progress: bool,
    /// Require a non-empty photo collection.
    #[serde(default)]
    pub requires_photos: bool,
    /// Require the scene's anchor to have been scrolled into view.
    #[serde(default)]
    pub requires_anchor: bool,
    /// Require the scratch card to have revealed.
    #[serde(default)]
    pub requires_scratch: bool,
    /// Scenes that must be completed first.
    #[serde(default)]
    pub requires_completed: Vec<String>,
}

/// Completion policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionDef {
    /// Fixed timer after activation.
    AfterMs {
        /// Milliseconds from activation to completion.
        ms: u64,
    },
    /// Completes once the photo collection is non-empty.
    WhenPhotos,
    /// Completes on a gesture-reveal done signal.
    Gesture,
}

/// One timed cue within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueDef {
    /// Milliseconds after the scene activates.
    pub at_ms: u64,
    /// What the cue does.
    pub cue: SceneCue,
}

/// Which built-in palette a cannon run samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CuePalette {
    /// Softer four-color palette for background ambience.
    Ambience,
    /// Five-color celebration palette.
    Celebration,
}

/// Cue payloads.
///
/// Presentation cues (`ShowText`, `ShowCutButton`, `StartTyping`) surface as
/// events for the host to render; effect cues drive the particle emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneCue {
    /// Reveal the scene's headline text.
    ShowText,
    /// Enable the cake-cut button.
    ShowCutButton,
    /// Start the typewriter message.
    StartTyping,
    /// Run paired side confetti cannons for a bounded duration.
    Cannons {
        /// Particles per cannon per tick.
        particles_per_tick: u32,
        /// Angular spread in degrees.
        spread_deg: f64,
        /// Normalized cannon height.
        origin_y: f64,
        /// Total run duration in milliseconds.
        duration_ms: u64,
        /// Palette to sample.
        palette: CuePalette,
    },
    /// Single heart-shaped burst.
    HeartBurst,
}

/// Validate boundary-model invariants before a session is built.
///
/// Checks scene-name resolution and uniqueness, threshold ranges,
/// prerequisite resolution and acyclicity, and per-cue parameter sanity.
pub(crate) fn validate_storyboard(def: &StoryboardDef) -> KeepsakeResult<()> {
    if def.scenes.is_empty() {
        return Err(KeepsakeError::validation(
            "storyboard must declare at least one scene",
        ));
    }

    let mut ids: Vec<SceneId> = Vec::with_capacity(def.scenes.len());
    for scene in &def.scenes {
        let id = SceneId::from_name(&scene.name)?;
        if ids.contains(&id) {
            return Err(KeepsakeError::validation(format!(
                "duplicate scene '{}'",
                scene.name
            )));
        }
        ids.push(id);
    }

    for scene in &def.scenes {
        if let Some(p) = scene.activation.min_progress {
            if !(0.0..=1.0).contains(&p) {
                return Err(KeepsakeError::validation(format!(
                    "scene '{}': min_progress must be in [0, 1]",
                    scene.name
                )));
            }
        }
        for dep in &scene.activation.requires_completed {
            let dep_id = SceneId::from_name(dep)?;
            if !ids.contains(&dep_id) {
                return Err(KeepsakeError::validation(format!(
                    "scene '{}': prerequisite '{dep}' is not in the storyboard",
                    scene.name
                )));
            }
        }
        if scene.completion == CompletionDef::Gesture
            && SceneId::from_name(&scene.name)? != SceneId::Cake
        {
            return Err(KeepsakeError::validation(format!(
                "scene '{}': gesture completion is only valid on the cake scene",
                scene.name
            )));
        }
        for cue in &scene.cues {
            if let SceneCue::Cannons {
                particles_per_tick,
                origin_y,
                duration_ms,
                ..
            } = &cue.cue
            {
                if *particles_per_tick == 0 {
                    return Err(KeepsakeError::validation(format!(
                        "scene '{}': cannon cue needs particles_per_tick > 0",
                        scene.name
                    )));
                }
                if !(0.0..=1.0).contains(origin_y) {
                    return Err(KeepsakeError::validation(format!(
                        "scene '{}': cannon origin_y must be in [0, 1]",
                        scene.name
                    )));
                }
                if *duration_ms == 0 {
                    return Err(KeepsakeError::validation(format!(
                        "scene '{}': cannon cue needs duration_ms > 0",
                        scene.name
                    )));
                }
            }
        }
    }

    check_prereq_cycles(def)?;
    Ok(())
}

fn check_prereq_cycles(def: &StoryboardDef) -> KeepsakeResult<()> {
    // Small boards: DFS with an explicit visiting set.
    fn visit(
        def: &StoryboardDef,
        name: &str,
        visiting: &mut Vec<String>,
        done: &mut Vec<String>,
    ) -> KeepsakeResult<()> {
        if done.iter().any(|d| d == name) {
            return Ok(());
        }
        if visiting.iter().any(|v| v == name) {
            return Err(KeepsakeError::validation(format!(
                "prerequisite cycle through scene '{name}'"
            )));
        }
        visiting.push(name.to_owned());
        if let Some(scene) = def.scenes.iter().find(|s| s.name == name) {
            for dep in &scene.activation.requires_completed {
                visit(def, dep, visiting, done)?;
            }
        }
        visiting.retain(|v| v != name);
        done.push(name.to_owned());
        Ok(())
    }

    let mut done = Vec::new();
    for scene in &def.scenes {
        visit(def, &scene.name, &mut Vec::new(), &mut done)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
