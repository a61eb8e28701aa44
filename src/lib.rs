//! Keepsake is a headless scene-sequencing engine for scroll-driven story
//! pages.
//!
//! A page is modeled as a storyboard of full-screen scenes, each governed by
//! a small gate state machine (`Hidden → Pending → Active → Completed`).
//! The host owns rendering and the event loop; it feeds scroll offsets,
//! anchor visibility, pointer strokes, and its monotonic clock into a
//! [`Session`], then drains [`StoryEvent`]s and narrow collaborator pushes
//! back out. The public API is session-oriented:
//!
//! - Load and validate a [`Storyboard`] (or use [`Storyboard::birthday`])
//! - Create a [`Session`] and attach host collaborators
//! - Push inputs with timestamps, call [`Session::advance`] on timer
//!   wakeups, and drain events
//!
//! All sequencing state is ephemeral per page session. Registry mutations
//! restart the journey under a fresh [`Epoch`]; continuations scheduled in
//! an older epoch are dropped when due, never fired.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod effects;
pub mod foundation;
pub mod gate;
pub mod media;
pub mod reveal;
pub mod scene;
pub mod scroll;
pub mod session;
pub mod timing;

pub use crate::foundation::core::{Epoch, Millis, Point, Progress, SceneId, Vec2};
pub use crate::foundation::error::{KeepsakeError, KeepsakeResult};

pub use crate::effects::burst::{BurstShape, BurstSpec, Rgb};
pub use crate::effects::emitter::{EffectEmitter, NullEmitter, RecordingEmitter};
pub use crate::gate::state::SceneState;
pub use crate::media::registry::{
    HandleAllocator, InMemoryHandles, MediaId, MediaItem, MediaRegistry, MediaSource,
};
pub use crate::reveal::RevealPhase;
pub use crate::scene::storyboard::Storyboard;
pub use crate::scroll::progress::{ScrollRange, ScrollSource};
pub use crate::session::controller::{Session, SessionOpts};
pub use crate::session::events::{
    CakeRenderConfig, CakeRenderer, NullRenderer, RecordingRenderer, StoryEvent,
};
pub use crate::timing::queue::{TimerId, TimerQueue};
