use kurbo::Point;
use tracing::debug;

use crate::animation::ease::Ease;
use crate::effects::burst::{
    BurstSpec, ambience_colors, celebration_colors, heart_burst, scratch_celebration, side_cannons,
};
use crate::effects::emitter::{EffectEmitter, NullEmitter};
use crate::foundation::core::{Epoch, Millis, Progress, SceneId};
use crate::foundation::error::KeepsakeResult;
use crate::foundation::math::seed_from_name;
use crate::gate::state::{CompletionPolicy, GateConfig, GateInputs, SceneGate, SceneState};
use crate::media::registry::{HandleAllocator, InMemoryHandles, MediaId, MediaRegistry, MediaSource};
use crate::scene::model::{CompletionDef, CueDef, CuePalette, SceneCue, SceneDef};
use crate::scene::storyboard::Storyboard;
use crate::scroll::progress::{ScrollRange, ScrollSource};
use crate::session::events::{CakeRenderConfig, CakeRenderer, NullRenderer, StoryEvent};
use crate::timing::queue::TimerQueue;

/// Milliseconds over which the cake glow ramps after activation.
const GLOW_RAMP_MS: u64 = 2000;
/// Glow intensity at cake activation.
const GLOW_BASE: f64 = 0.3;
/// Duration of the cut celebration cannon run.
const CUT_CELEBRATION_MS: u64 = 2000;

/// Options controlling session behavior.
#[derive(Clone, Copy, Debug)]
pub struct SessionOpts {
    /// Scroll range mapping host offsets onto `[0, 1]`. `None` means the
    /// host pre-normalizes and calls [`Session::set_progress`].
    pub scroll_range: Option<ScrollRange>,
    /// Tick interval for bounded effect runs, in milliseconds.
    pub effect_tick_ms: u64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            scroll_range: None,
            effect_tick_ms: 16,
        }
    }
}

/// Work item carried by the epoch-tagged timer queue.
#[derive(Clone, Debug)]
enum Task {
    /// `Pending → Active` after the scene's configured delay.
    ActivateGate(SceneId),
    /// `Active → Completed` for timer-completed scenes.
    CompleteGate(SceneId),
    /// A timed in-scene cue.
    Cue(SceneId, SceneCue),
    /// One tick of a bounded cannon run.
    CannonTick {
        specs: [BurstSpec; 2],
        seed: u64,
    },
}

struct SceneSlot {
    gate: SceneGate,
    cues: Vec<CueDef>,
    seed: u64,
}

/// The top-level controller: owns the photo collection, the scroll source,
/// the timer queue, one gate per scene, and both gesture surfaces.
///
/// The session is single-threaded and event-driven; the host pushes inputs
/// together with its monotonic clock and drains [`StoryEvent`]s back out.
/// Every registry mutation bumps the epoch, forces all gates to `Hidden` and
/// both surfaces to `Untouched`, and strands all pending timers in the old
/// epoch (they are dropped, not fired).
pub struct Session {
    slots: Vec<SceneSlot>,
    registry: MediaRegistry,
    handles: Box<dyn HandleAllocator>,
    scroll: ScrollSource,
    timers: TimerQueue<Task>,
    scratch: crate::reveal::scratch::ScratchSurface,
    cut: crate::reveal::cut::CutSurface,
    emitter: Box<dyn EffectEmitter>,
    cake: Box<dyn CakeRenderer>,
    epoch: Epoch,
    events: Vec<StoryEvent>,
    cake_active_at: Option<Millis>,
    opts: SessionOpts,
}

impl Session {
    /// Build a session over a validated storyboard.
    ///
    /// Collaborators default to no-ops ([`NullEmitter`], [`NullRenderer`],
    /// [`InMemoryHandles`]); attach real ones with the `with_*` builders.
    pub fn new(storyboard: &Storyboard, opts: SessionOpts) -> KeepsakeResult<Self> {
        storyboard.validate()?;
        let def = storyboard.def();

        let mut slots = Vec::with_capacity(def.scenes.len());
        for scene_def in &def.scenes {
            let config = gate_config(scene_def)?;
            slots.push(SceneSlot {
                gate: SceneGate::new(config),
                cues: scene_def.cues.clone(),
                seed: seed_from_name(def.seed, &scene_def.name),
            });
        }

        let scroll = match opts.scroll_range {
            Some(range) => ScrollSource::new(range),
            None => ScrollSource::default(),
        };

        Ok(Self {
            slots,
            registry: MediaRegistry::new(),
            handles: Box::new(InMemoryHandles::new()),
            scroll,
            timers: TimerQueue::new(),
            scratch: crate::reveal::scratch::ScratchSurface::default(),
            cut: crate::reveal::cut::CutSurface::new(),
            emitter: Box::new(NullEmitter),
            cake: Box::new(NullRenderer),
            epoch: Epoch::default(),
            events: Vec::new(),
            cake_active_at: None,
            opts,
        })
    }

    /// Attach a particle emitter.
    pub fn with_emitter(mut self, emitter: impl EffectEmitter + 'static) -> Self {
        self.emitter = Box::new(emitter);
        self
    }

    /// Attach a cake renderer.
    pub fn with_cake_renderer(mut self, renderer: impl CakeRenderer + 'static) -> Self {
        self.cake = Box::new(renderer);
        self
    }

    /// Attach a display-handle allocator.
    pub fn with_handle_allocator(mut self, handles: impl HandleAllocator + 'static) -> Self {
        self.handles = Box::new(handles);
        self
    }

    // ---- media inputs ----

    /// Register photos; appends in input order and restarts the journey.
    pub fn add_photos(
        &mut self,
        sources: Vec<MediaSource>,
        now: Millis,
    ) -> KeepsakeResult<Vec<MediaId>> {
        self.settle(now);
        let ids = self.registry.add(sources, self.handles.as_mut())?;
        for &id in &ids {
            self.events.push(StoryEvent::MediaAdded { id });
        }
        if !ids.is_empty() {
            self.reset_story(now);
        }
        self.settle(now);
        Ok(ids)
    }

    /// Remove one photo by id; a missing id is a no-op and does not restart
    /// the journey.
    pub fn remove_photo(&mut self, id: MediaId, now: Millis) -> bool {
        self.settle(now);
        let removed = self.registry.remove(id, self.handles.as_mut());
        if removed {
            self.events.push(StoryEvent::MediaRemoved { id });
            self.reset_story(now);
        }
        self.settle(now);
        removed
    }

    /// Registered photos in insertion order.
    pub fn photos(&self) -> &[crate::media::registry::MediaItem] {
        self.registry.items()
    }

    // ---- scroll inputs ----

    /// Feed a raw scroll offset; recomputes progress and settles.
    pub fn set_scroll_offset(&mut self, offset: f64, now: Millis) {
        self.scroll.set_offset(offset);
        self.settle(now);
    }

    /// Feed pre-normalized progress directly.
    pub fn set_progress(&mut self, progress: Progress, now: Millis) {
        self.scroll.set_progress(progress);
        self.settle(now);
    }

    /// Report anchor intersection for a scene (sticky once visible).
    pub fn set_anchor_visible(&mut self, scene: SceneId, visible: bool, now: Millis) {
        self.scroll.anchor_visible(scene, visible);
        self.settle(now);
    }

    /// Current normalized progress, the progress indicator's fill fraction.
    pub fn scroll_progress(&self) -> f64 {
        self.scroll.progress().value()
    }

    /// Subscribe to progress changes (push model).
    pub fn subscribe_progress(
        &mut self,
        listener: impl FnMut(Progress) + 'static,
    ) -> crate::scroll::progress::SubscriptionId {
        self.scroll.subscribe(listener)
    }

    // ---- gesture inputs ----

    /// Attach the scratch card's backing display surface.
    pub fn attach_scratch_surface(&mut self, width: u32, height: u32) -> KeepsakeResult<()> {
        self.scratch.attach_surface(width, height)
    }

    /// Scratch pointer pressed.
    pub fn scratch_pointer_down(&mut self, pos: Point, now: Millis) {
        self.settle(now);
        let out = self.scratch.pointer_down(pos);
        self.after_scratch(out, now);
    }

    /// Scratch pointer moved (no-op unless pressed).
    pub fn scratch_pointer_move(&mut self, pos: Point, now: Millis) {
        self.settle(now);
        let out = self.scratch.pointer_move(pos);
        self.after_scratch(out, now);
    }

    /// Scratch pointer released.
    pub fn scratch_pointer_up(&mut self) {
        self.scratch.pointer_up();
    }

    /// Restore the scratch card to fully occluded.
    pub fn reset_scratch(&mut self) {
        self.scratch.reset();
    }

    /// Scratch coverage fraction.
    pub fn scratch_coverage(&self) -> f64 {
        self.scratch.coverage()
    }

    /// Scratch surface phase.
    pub fn scratch_phase(&self) -> crate::reveal::RevealPhase {
        self.scratch.phase()
    }

    /// Cut the cake.
    ///
    /// Enabled only while the cake gate is `Active`; returns whether the cut
    /// fired (it cannot fire twice).
    pub fn cut_cake(&mut self, now: Millis) -> bool {
        // Fold in everything due by `now` first: the cut must observe a cake
        // whose activation timer has already come due.
        self.settle(now);
        if self.gate_state(SceneId::Cake) != Some(SceneState::Active) {
            return false;
        }
        if !self.cut.cut() {
            return false;
        }
        self.events.push(StoryEvent::CakeCut);
        self.push_cake_config(now);

        let specs = side_cannons(7, 70.0, 0.6, &celebration_colors());
        let seed = self.scene_seed(SceneId::Cake);
        // Celebration cannons for a bounded run; errors cannot occur for a
        // non-zero tick interval.
        let _ = self.timers.schedule_repeating(
            now,
            self.opts.effect_tick_ms.max(1),
            now.plus(CUT_CELEBRATION_MS),
            self.epoch,
            Task::CannonTick { specs, seed },
        );

        let completed = self
            .slot_mut(SceneId::Cake)
            .is_some_and(|slot| slot.gate.complete(now));
        if completed {
            self.events.push(StoryEvent::GateChanged {
                scene: SceneId::Cake,
                state: SceneState::Completed,
            });
        }
        self.settle(now);
        true
    }

    /// Whether the cake has been cut.
    pub fn cake_cut(&self) -> bool {
        self.cut.revealed()
    }

    // ---- time ----

    /// Fire everything due at or before `now` and re-evaluate gates.
    pub fn advance(&mut self, now: Millis) {
        self.settle(now);
    }

    /// Earliest scheduled wakeup, for hosts driving a timer loop.
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    // ---- observation ----

    /// Drain buffered events in occurrence order.
    pub fn drain_events(&mut self) -> Vec<StoryEvent> {
        std::mem::take(&mut self.events)
    }

    /// State of a scene's gate, when the scene is in the storyboard.
    pub fn gate_state(&self, scene: SceneId) -> Option<SceneState> {
        self.slots
            .iter()
            .find(|slot| slot.gate.scene() == scene)
            .map(|slot| slot.gate.state())
    }

    /// Current registry epoch.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    // ---- internals ----

    fn slot_mut(&mut self, scene: SceneId) -> Option<&mut SceneSlot> {
        self.slots.iter_mut().find(|slot| slot.gate.scene() == scene)
    }

    fn scene_seed(&self, scene: SceneId) -> u64 {
        self.slots
            .iter()
            .find(|slot| slot.gate.scene() == scene)
            .map_or(0, |slot| slot.seed)
    }

    /// Restart the journey: new epoch, gates hidden, surfaces untouched.
    ///
    /// Superseded entries would be dropped when due anyway; cancelling the
    /// old epoch frees them eagerly.
    fn reset_story(&mut self, now: Millis) {
        self.timers.cancel_epoch(self.epoch);
        self.epoch = self.epoch.next();
        debug!(epoch = self.epoch.0, at = now.0, "registry changed; story reset");
        self.events.push(StoryEvent::StoryReset { epoch: self.epoch });
        for slot in &mut self.slots {
            if slot.gate.state() != SceneState::Hidden {
                slot.gate.reset();
                self.events.push(StoryEvent::GateChanged {
                    scene: slot.gate.scene(),
                    state: SceneState::Hidden,
                });
            }
        }
        self.scratch.reset();
        self.cut.reset();
        self.cake_active_at = None;
        self.cake.apply(&CakeRenderConfig {
            cut: false,
            glow: 0.0,
        });
    }

    /// Run timers and gate evaluation to a fixpoint at `now`.
    ///
    /// Due entries are folded in one at a time, in `(due, seq)` order, and
    /// each task runs at its own due time, so anything it schedules or
    /// unlocks is anchored to when the entry was due. A coarse host advance
    /// replays the same timeline as a fine one.
    fn settle(&mut self, now: Millis) {
        loop {
            if let Some((due, task)) = self.timers.pop_due(now, self.epoch) {
                self.handle_task(task, due);
                self.eval_gates(due);
                continue;
            }
            if !self.eval_gates(now) {
                break;
            }
        }
    }

    fn eval_gates(&mut self, now: Millis) -> bool {
        let progress = self.scroll.progress();
        let photos_present = !self.registry.is_empty();
        let scratch_revealed = self.scratch.revealed();

        let mut changed = false;
        for i in 0..self.slots.len() {
            let config = self.slots[i].gate.config().clone();
            let prereqs_done = config
                .requires_completed
                .iter()
                .all(|&dep| self.gate_state(dep) == Some(SceneState::Completed));
            let inputs = GateInputs {
                progress,
                photos_present,
                anchor_seen: self.scroll.seen(config.scene),
                scratch_revealed,
                prereqs_done,
            };

            let slot = &mut self.slots[i];
            if slot.gate.begin_pending(&inputs, now) {
                changed = true;
                let state = slot.gate.state();
                let scene = slot.gate.scene();
                self.events.push(StoryEvent::GateChanged { scene, state });
                self.timers.schedule(
                    now.plus(config.pending_delay_ms),
                    self.epoch,
                    Task::ActivateGate(scene),
                );
                continue;
            }

            if slot.gate.state() == SceneState::Active
                && config.completion == CompletionPolicy::WhenPhotos
                && photos_present
                && slot.gate.complete(now)
            {
                changed = true;
                let scene = slot.gate.scene();
                self.events.push(StoryEvent::GateChanged {
                    scene,
                    state: SceneState::Completed,
                });
            }
        }
        changed
    }

    fn handle_task(&mut self, task: Task, now: Millis) {
        match task {
            Task::ActivateGate(scene) => self.activate_gate(scene, now),
            Task::CompleteGate(scene) => {
                let completed = self
                    .slot_mut(scene)
                    .is_some_and(|slot| slot.gate.complete(now));
                if completed {
                    self.events.push(StoryEvent::GateChanged {
                        scene,
                        state: SceneState::Completed,
                    });
                }
            }
            Task::Cue(scene, cue) => self.fire_cue(scene, cue, now),
            Task::CannonTick { specs, seed } => {
                for spec in &specs {
                    self.emitter.emit(&spec.jittered(seed ^ now.0));
                }
            }
        }
    }

    fn activate_gate(&mut self, scene: SceneId, now: Millis) {
        let Some(slot) = self.slot_mut(scene) else {
            return;
        };
        if !slot.gate.activate(now) {
            return;
        }
        let completion = slot.gate.config().completion;
        let cues = slot.cues.clone();
        self.events.push(StoryEvent::GateChanged {
            scene,
            state: SceneState::Active,
        });

        for cue in cues {
            self.timers.schedule(
                now.plus(cue.at_ms),
                self.epoch,
                Task::Cue(scene, cue.cue),
            );
        }
        if let CompletionPolicy::AfterMs(ms) = completion {
            self.timers
                .schedule(now.plus(ms), self.epoch, Task::CompleteGate(scene));
        }
        if scene == SceneId::Cake {
            self.cake_active_at = Some(now);
            self.push_cake_config(now);
        }
    }

    fn fire_cue(&mut self, scene: SceneId, cue: SceneCue, now: Millis) {
        self.events.push(StoryEvent::Cue {
            scene,
            cue: cue.clone(),
        });
        match cue {
            SceneCue::Cannons {
                particles_per_tick,
                spread_deg,
                origin_y,
                duration_ms,
                palette,
            } => {
                let colors = match palette {
                    CuePalette::Ambience => ambience_colors(),
                    CuePalette::Celebration => celebration_colors(),
                };
                let specs = side_cannons(particles_per_tick, spread_deg, origin_y, &colors);
                let seed = self.scene_seed(scene);
                let _ = self.timers.schedule_repeating(
                    now,
                    self.opts.effect_tick_ms.max(1),
                    now.plus(duration_ms),
                    self.epoch,
                    Task::CannonTick { specs, seed },
                );
            }
            SceneCue::HeartBurst => self.emitter.emit(&heart_burst()),
            SceneCue::ShowText | SceneCue::ShowCutButton => {
                if scene == SceneId::Cake {
                    self.push_cake_config(now);
                }
            }
            SceneCue::StartTyping => {}
        }
    }

    fn after_scratch(&mut self, out: crate::reveal::scratch::ScratchOutcome, now: Millis) {
        self.events.push(StoryEvent::ScratchProgress {
            coverage: out.coverage,
        });
        if out.just_revealed {
            self.events.push(StoryEvent::ScratchRevealed);
            self.emitter.emit(&scratch_celebration());
        }
        self.settle(now);
    }

    fn push_cake_config(&mut self, now: Millis) {
        let glow = match self.cake_active_at {
            Some(t0) => {
                let t = (now.since(t0) as f64) / (GLOW_RAMP_MS as f64);
                GLOW_BASE + (1.0 - GLOW_BASE) * Ease::OutCubic.apply(t)
            }
            None => 0.0,
        };
        self.cake.apply(&CakeRenderConfig {
            cut: self.cut.revealed(),
            glow,
        });
    }
}

fn gate_config(def: &SceneDef) -> KeepsakeResult<GateConfig> {
    let scene = SceneId::from_name(&def.name)?;
    let mut requires_completed = smallvec::SmallVec::new();
    for dep in &def.activation.requires_completed {
        requires_completed.push(SceneId::from_name(dep)?);
    }
    Ok(GateConfig {
        scene,
        min_progress: def.activation.min_progress.map(Progress::new),
        strict_progress: def.activation.strict_progress,
        requires_photos: def.activation.requires_photos,
        requires_anchor: def.activation.requires_anchor,
        requires_scratch: def.activation.requires_scratch,
        requires_completed,
        pending_delay_ms: def.pending_delay_ms,
        completion: match def.completion {
            CompletionDef::AfterMs { ms } => CompletionPolicy::AfterMs(ms),
            CompletionDef::WhenPhotos => CompletionPolicy::WhenPhotos,
            CompletionDef::Gesture => CompletionPolicy::Gesture,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
