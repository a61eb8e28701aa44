use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::scene::model::{
    ActivationDef, CompletionDef, CueDef, CuePalette, SceneCue, SceneDef, StoryboardDef,
    validate_storyboard,
};

/// Validated storyboard boundary object.
///
/// This is the JSON-facing description of the scene sequence. It is
/// validated before a [`crate::session::controller::Session`] is built.
#[derive(Debug, Clone)]
pub struct Storyboard {
    def: StoryboardDef,
}

impl Storyboard {
    /// Parse a storyboard from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> KeepsakeResult<Self> {
        let def: StoryboardDef = serde_json::from_reader(r)
            .map_err(|e| KeepsakeError::validation(format!("parse storyboard JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a storyboard from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KeepsakeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KeepsakeError::validation(format!("open storyboard JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate boundary-model invariants.
    pub fn validate(&self) -> KeepsakeResult<()> {
        validate_storyboard(&self.def)
    }

    /// Wrap an in-memory definition.
    pub fn from_def(def: StoryboardDef) -> Self {
        Self { def }
    }

    pub(crate) fn def(&self) -> &StoryboardDef {
        &self.def
    }

    /// The default six-scene birthday storyboard.
    ///
    /// The explosion takes over past 60% scroll with a 2 s collect phase
    /// and a 3 s explode phase, the cake appears 1 s after the explosion
    /// finishes and completes on the cut gesture, and the final wish waits
    /// for the cut, the scratch reveal, and its own anchor.
    pub fn birthday() -> Self {
        let scenes = vec![
            SceneDef {
                name: "hero".into(),
                activation: ActivationDef::default(),
                pending_delay_ms: 0,
                completion: CompletionDef::AfterMs { ms: 2000 },
                cues: vec![],
            },
            SceneDef {
                name: "upload".into(),
                activation: ActivationDef {
                    min_progress: Some(0.1),
                    ..ActivationDef::default()
                },
                pending_delay_ms: 500,
                completion: CompletionDef::WhenPhotos,
                cues: vec![],
            },
            SceneDef {
                name: "memories".into(),
                activation: ActivationDef {
                    requires_photos: true,
                    requires_anchor: true,
                    requires_completed: vec!["upload".into()],
                    ..ActivationDef::default()
                },
                pending_delay_ms: 500,
                completion: CompletionDef::AfterMs { ms: 1500 },
                cues: vec![],
            },
            SceneDef {
                name: "explosion".into(),
                activation: ActivationDef {
                    min_progress: Some(0.6),
                    strict_progress: true,
                    requires_photos: true,
                    ..ActivationDef::default()
                },
                // The 2 s pending delay is the photo collect phase.
                pending_delay_ms: 2000,
                completion: CompletionDef::AfterMs { ms: 3000 },
                cues: vec![],
            },
            SceneDef {
                name: "cake".into(),
                activation: ActivationDef {
                    requires_completed: vec!["explosion".into()],
                    ..ActivationDef::default()
                },
                pending_delay_ms: 1000,
                completion: CompletionDef::Gesture,
                cues: vec![
                    CueDef {
                        at_ms: 1000,
                        cue: SceneCue::Cannons {
                            particles_per_tick: 3,
                            spread_deg: 55.0,
                            origin_y: 0.8,
                            duration_ms: 3000,
                            palette: CuePalette::Ambience,
                        },
                    },
                    CueDef {
                        at_ms: 1500,
                        cue: SceneCue::ShowText,
                    },
                    CueDef {
                        at_ms: 2500,
                        cue: SceneCue::ShowCutButton,
                    },
                ],
            },
            SceneDef {
                name: "final_wish".into(),
                activation: ActivationDef {
                    requires_anchor: true,
                    requires_scratch: true,
                    requires_completed: vec!["cake".into()],
                    ..ActivationDef::default()
                },
                pending_delay_ms: 2000,
                completion: CompletionDef::AfterMs { ms: 5000 },
                cues: vec![
                    CueDef {
                        at_ms: 0,
                        cue: SceneCue::Cannons {
                            particles_per_tick: 7,
                            spread_deg: 70.0,
                            origin_y: 0.6,
                            duration_ms: 5000,
                            palette: CuePalette::Celebration,
                        },
                    },
                    CueDef {
                        at_ms: 1000,
                        cue: SceneCue::HeartBurst,
                    },
                    CueDef {
                        at_ms: 1000,
                        cue: SceneCue::StartTyping,
                    },
                ],
            },
        ];

        Self {
            def: StoryboardDef { seed: 0, scenes },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/storyboard.rs"]
mod tests;
