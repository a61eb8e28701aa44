use super::*;

fn bare_config(scene: SceneId) -> GateConfig {
    GateConfig {
        scene,
        min_progress: None,
        strict_progress: false,
        requires_photos: false,
        requires_anchor: false,
        requires_scratch: false,
        requires_completed: SmallVec::new(),
        pending_delay_ms: 0,
        completion: CompletionPolicy::AfterMs(100),
    }
}

fn all_inputs() -> GateInputs {
    GateInputs {
        progress: Progress::ONE,
        photos_present: true,
        anchor_seen: true,
        scratch_revealed: true,
        prereqs_done: true,
    }
}

#[test]
fn lifecycle_never_skips_states() {
    let mut gate = SceneGate::new(bare_config(SceneId::Hero));
    assert_eq!(gate.state(), SceneState::Hidden);

    // Out-of-order transitions are refused.
    assert!(!gate.activate(Millis(0)));
    assert!(!gate.complete(Millis(0)));
    assert_eq!(gate.state(), SceneState::Hidden);

    assert!(gate.begin_pending(&all_inputs(), Millis(10)));
    assert_eq!(gate.state(), SceneState::Pending { since: Millis(10) });

    assert!(gate.activate(Millis(20)));
    assert_eq!(gate.state(), SceneState::Active);

    assert!(gate.complete(Millis(50)));
    assert_eq!(gate.state(), SceneState::Completed);
}

#[test]
fn transitions_are_one_shot_within_an_epoch() {
    let mut gate = SceneGate::new(bare_config(SceneId::Hero));
    assert!(gate.begin_pending(&all_inputs(), Millis(0)));
    assert!(!gate.begin_pending(&all_inputs(), Millis(5)));
    assert!(gate.activate(Millis(1)));
    assert!(!gate.activate(Millis(2)));
    assert!(gate.complete(Millis(3)));
    assert!(!gate.complete(Millis(4)));
    // A completed gate never re-pends without a reset.
    assert!(!gate.begin_pending(&all_inputs(), Millis(5)));
}

#[test]
fn reset_returns_to_hidden_and_allows_a_fresh_cycle() {
    let mut gate = SceneGate::new(bare_config(SceneId::Cake));
    gate.begin_pending(&all_inputs(), Millis(0));
    gate.activate(Millis(1));
    gate.complete(Millis(2));

    gate.reset();
    assert_eq!(gate.state(), SceneState::Hidden);
    assert!(gate.begin_pending(&all_inputs(), Millis(10)));
}

#[test]
fn progress_threshold_strict_vs_inclusive() {
    let mut config = bare_config(SceneId::Explosion);
    config.min_progress = Some(Progress::new(0.6));
    config.strict_progress = true;
    let gate = SceneGate::new(config.clone());

    let mut at = all_inputs();
    at.progress = Progress::new(0.6);
    assert!(!gate.predicate_met(&at));
    at.progress = Progress::new(0.61);
    assert!(gate.predicate_met(&at));

    config.strict_progress = false;
    let gate = SceneGate::new(config);
    at.progress = Progress::new(0.6);
    assert!(gate.predicate_met(&at));
}

#[test]
fn predicate_requires_every_configured_signal() {
    let mut config = bare_config(SceneId::FinalWish);
    config.requires_photos = true;
    config.requires_anchor = true;
    config.requires_scratch = true;
    config.requires_completed = SmallVec::from_slice(&[SceneId::Cake]);
    let gate = SceneGate::new(config);

    assert!(gate.predicate_met(&all_inputs()));

    for missing in 0..4 {
        let mut inputs = all_inputs();
        match missing {
            0 => inputs.photos_present = false,
            1 => inputs.anchor_seen = false,
            2 => inputs.scratch_revealed = false,
            _ => inputs.prereqs_done = false,
        }
        assert!(!gate.predicate_met(&inputs), "signal {missing} ignored");
    }
}

#[test]
fn prereq_list_only_matters_when_non_empty() {
    let gate = SceneGate::new(bare_config(SceneId::Hero));
    let mut inputs = all_inputs();
    inputs.prereqs_done = false;
    assert!(gate.predicate_met(&inputs));
}
