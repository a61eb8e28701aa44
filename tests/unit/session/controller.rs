use super::*;

use crate::effects::emitter::RecordingEmitter;
use crate::reveal::RevealPhase;
use crate::scene::model::{ActivationDef, StoryboardDef};
use crate::session::events::RecordingRenderer;

fn photo() -> MediaSource {
    MediaSource::from_bytes(vec![0xAB; 8])
}

/// Two-scene board: a 10 ms hero and a gesture-completed cake behind it.
fn cake_board() -> Storyboard {
    Storyboard::from_def(StoryboardDef {
        seed: 7,
        scenes: vec![
            SceneDef {
                name: "hero".into(),
                activation: ActivationDef::default(),
                pending_delay_ms: 0,
                completion: CompletionDef::AfterMs { ms: 10 },
                cues: vec![],
            },
            SceneDef {
                name: "cake".into(),
                activation: ActivationDef {
                    requires_completed: vec!["hero".into()],
                    ..ActivationDef::default()
                },
                pending_delay_ms: 0,
                completion: CompletionDef::Gesture,
                cues: vec![],
            },
        ],
    })
}

fn gate_changes(events: &[StoryEvent], scene: SceneId) -> Vec<SceneState> {
    events
        .iter()
        .filter_map(|e| match e {
            StoryEvent::GateChanged { scene: s, state } if *s == scene => Some(*state),
            _ => None,
        })
        .collect()
}

#[test]
fn hero_runs_its_full_lifecycle_without_skipping() {
    let board = Storyboard::birthday();
    let mut session = Session::new(&board, SessionOpts::default()).unwrap();

    session.advance(Millis(0));
    assert_eq!(session.gate_state(SceneId::Hero), Some(SceneState::Active));

    session.advance(Millis(2000));
    assert_eq!(session.gate_state(SceneId::Hero), Some(SceneState::Completed));

    let states = gate_changes(&session.drain_events(), SceneId::Hero);
    assert_eq!(
        states,
        vec![
            SceneState::Pending { since: Millis(0) },
            SceneState::Active,
            SceneState::Completed,
        ]
    );
}

#[test]
fn upload_waits_for_progress_then_photos() {
    let board = Storyboard::birthday();
    let mut session = Session::new(&board, SessionOpts::default()).unwrap();

    session.advance(Millis(0));
    assert_eq!(session.gate_state(SceneId::Upload), Some(SceneState::Hidden));

    session.set_progress(Progress::new(0.2), Millis(100));
    assert_eq!(
        session.gate_state(SceneId::Upload),
        Some(SceneState::Pending { since: Millis(100) })
    );

    // No photos yet: active but not completed after the 500 ms delay.
    session.advance(Millis(600));
    assert_eq!(session.gate_state(SceneId::Upload), Some(SceneState::Active));

    // Adding photos restarts the journey, then upload completes as soon as
    // it re-activates with photos present.
    session.add_photos(vec![photo()], Millis(700)).unwrap();
    assert_eq!(session.gate_state(SceneId::Upload), Some(SceneState::Pending { since: Millis(700) }));
    session.advance(Millis(1200));
    assert_eq!(
        session.gate_state(SceneId::Upload),
        Some(SceneState::Completed)
    );

    let events = session.drain_events();
    let states = gate_changes(&events, SceneId::Upload);
    // Active precedes Completed in the second cycle too.
    let tail = &states[states.len() - 2..];
    assert_eq!(tail, &[SceneState::Active, SceneState::Completed]);
}

#[test]
fn registry_mutation_resets_gates_and_bumps_the_epoch() {
    let board = Storyboard::birthday();
    let mut session = Session::new(&board, SessionOpts::default()).unwrap();

    session.advance(Millis(0));
    assert_eq!(session.epoch(), Epoch(0));

    let ids = session
        .add_photos(vec![photo(), photo(), photo()], Millis(100))
        .unwrap();
    assert_eq!(session.epoch(), Epoch(1));
    assert_eq!(session.photos().len(), 3);

    session.advance(Millis(5000));
    session.drain_events();

    let removed = session.remove_photo(ids[1], Millis(6000));
    assert!(removed);
    assert_eq!(session.epoch(), Epoch(2));
    assert_eq!(session.photos().len(), 2);

    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        StoryEvent::StoryReset { epoch: Epoch(2) }
    )));

    // Removing the same id again is a no-op and must not restart anything.
    assert!(!session.remove_photo(ids[1], Millis(7000)));
    assert_eq!(session.epoch(), Epoch(2));
}

#[test]
fn stale_timers_from_an_old_epoch_never_fire() {
    let board = Storyboard::birthday();
    let mut session = Session::new(&board, SessionOpts::default()).unwrap();

    // Upload pends at t=0 with a 500 ms delay.
    session.set_progress(Progress::new(0.2), Millis(0));
    assert_eq!(
        session.gate_state(SceneId::Upload),
        Some(SceneState::Pending { since: Millis(0) })
    );

    // The reset at t=100 strands the t=500 activation in the old epoch; the
    // re-pended gate's own activation lands at t=600.
    session.add_photos(vec![photo()], Millis(100)).unwrap();
    session.advance(Millis(500));
    assert_eq!(
        session.gate_state(SceneId::Upload),
        Some(SceneState::Pending { since: Millis(100) })
    );

    session.advance(Millis(600));
    assert_eq!(
        session.gate_state(SceneId::Upload),
        Some(SceneState::Completed)
    );
}

#[test]
fn cut_is_rejected_until_the_cake_is_active() {
    let mut session = Session::new(&cake_board(), SessionOpts::default()).unwrap();

    assert!(!session.cut_cake(Millis(0)));
    session.advance(Millis(0));
    assert!(!session.cut_cake(Millis(5)));
    assert!(!session.cake_cut());

    session.advance(Millis(10));
    assert_eq!(session.gate_state(SceneId::Cake), Some(SceneState::Active));

    assert!(session.cut_cake(Millis(20)));
    assert!(session.cake_cut());
    assert_eq!(session.gate_state(SceneId::Cake), Some(SceneState::Completed));

    // The cut is one-shot.
    assert!(!session.cut_cake(Millis(30)));

    let events = session.drain_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, StoryEvent::CakeCut))
            .count(),
        1
    );
}

#[test]
fn coarse_advance_anchors_chained_timers_at_their_due_times() {
    let mut session = Session::new(&cake_board(), SessionOpts::default()).unwrap();
    session.advance(Millis(0));
    session.drain_events();

    // One coarse advance folds in the hero completion (due t=10) and
    // everything it unlocks; the cake pends at 10, not at the settle time.
    session.advance(Millis(5000));
    let states = gate_changes(&session.drain_events(), SceneId::Cake);
    assert_eq!(
        states,
        vec![SceneState::Pending { since: Millis(10) }, SceneState::Active]
    );
}

#[test]
fn cut_observes_timers_due_at_the_cut_time() {
    let mut session = Session::new(&cake_board(), SessionOpts::default()).unwrap();
    session.advance(Millis(0));

    // No advance since t=0: the hero completion (due t=10) and the cake
    // activation it unlocks are due but unsettled when the cut arrives.
    assert!(session.cut_cake(Millis(50)));
    assert_eq!(
        session.gate_state(SceneId::Cake),
        Some(SceneState::Completed)
    );
}

#[test]
fn cut_celebration_cannons_tick_until_their_deadline() {
    let emitter = RecordingEmitter::new();
    let mut session = Session::new(&cake_board(), SessionOpts::default())
        .unwrap()
        .with_emitter(emitter.clone());

    session.advance(Millis(10));
    session.cut_cake(Millis(20));
    // The first tick fires at the cut itself: one burst per cannon.
    assert_eq!(emitter.count(), 2);

    session.advance(Millis(36));
    assert_eq!(emitter.count(), 4);

    // After the bounded run ends, no further ticks arrive.
    session.advance(Millis(5000));
    let settled = emitter.count();
    session.advance(Millis(10000));
    assert_eq!(emitter.count(), settled);
}

#[test]
fn cake_renderer_sees_activation_glow_and_the_cut() {
    let renderer = RecordingRenderer::new();
    let mut session = Session::new(&cake_board(), SessionOpts::default())
        .unwrap()
        .with_cake_renderer(renderer.clone());

    // Nothing is evaluated until the first input; start the clock, then let
    // the hero completion unlock the cake.
    session.advance(Millis(0));
    session.advance(Millis(10));
    let at_activation = *renderer.applied().last().unwrap();
    assert!(!at_activation.cut);
    assert_eq!(at_activation.glow, GLOW_BASE);

    // Cut well past the ramp: glow has eased to full.
    session.cut_cake(Millis(10 + GLOW_RAMP_MS));
    let at_cut = *renderer.applied().last().unwrap();
    assert!(at_cut.cut);
    assert!((at_cut.glow - 1.0).abs() < 1e-9);
}

#[test]
fn scratch_reveal_emits_a_celebration_once() {
    let emitter = RecordingEmitter::new();
    let mut session = Session::new(&cake_board(), SessionOpts::default())
        .unwrap()
        .with_emitter(emitter.clone());

    session.attach_scratch_surface(20, 20).unwrap();
    session.scratch_pointer_down(Point::new(10.0, 10.0), Millis(0));
    session.scratch_pointer_up();

    assert_eq!(session.scratch_phase(), RevealPhase::Revealed);
    assert_eq!(session.scratch_coverage(), 1.0);
    assert_eq!(emitter.count(), 1);

    let events = session.drain_events();
    assert!(events.iter().any(|e| matches!(e, StoryEvent::ScratchRevealed)));

    // Scratching a revealed card emits nothing more.
    session.scratch_pointer_down(Point::new(5.0, 5.0), Millis(10));
    assert_eq!(emitter.count(), 1);
}

#[test]
fn reset_restores_surfaces_too() {
    let mut session = Session::new(&cake_board(), SessionOpts::default()).unwrap();
    session.attach_scratch_surface(20, 20).unwrap();
    session.scratch_pointer_down(Point::new(10.0, 10.0), Millis(0));
    session.advance(Millis(10));
    session.cut_cake(Millis(20));
    assert!(session.cake_cut());

    session.add_photos(vec![photo()], Millis(30)).unwrap();
    assert!(!session.cake_cut());
    assert_eq!(session.scratch_phase(), RevealPhase::Untouched);
    assert_eq!(session.scratch_coverage(), 0.0);
}

#[test]
fn scroll_offsets_map_through_the_configured_range() {
    let opts = SessionOpts {
        scroll_range: Some(ScrollRange::new(0.0, 1000.0).unwrap()),
        ..SessionOpts::default()
    };
    let mut session = Session::new(&Storyboard::birthday(), opts).unwrap();

    session.set_scroll_offset(250.0, Millis(0));
    assert_eq!(session.scroll_progress(), 0.25);

    session.set_scroll_offset(-50.0, Millis(10));
    assert_eq!(session.scroll_progress(), 0.0);
}

#[test]
fn drain_events_empties_the_buffer() {
    let mut session = Session::new(&cake_board(), SessionOpts::default()).unwrap();
    session.advance(Millis(0));
    assert!(!session.drain_events().is_empty());
    assert!(session.drain_events().is_empty());
}
