//! End-to-end runs through the public session API

use orbital_dash::sim::{PowerUpKind, RunPhase, SimEvent};
use orbital_dash::{AssetHandle, AssetManifest, DrawableKind, Session, Tuning};
use proptest::prelude::*;

fn manifest() -> AssetManifest {
    AssetManifest::new()
        .with(DrawableKind::Player, AssetHandle(1))
        .with(DrawableKind::Asteroid, AssetHandle(2))
        .with(DrawableKind::Asteroid, AssetHandle(3))
        .with(DrawableKind::Alien, AssetHandle(4))
        .with(DrawableKind::PowerUp, AssetHandle(5))
}

fn session(seed: u64, tuning: &Tuning) -> Session {
    let mut session = Session::in_memory(seed, tuning);
    session.attach_assets(manifest());
    session.start_run(0.0).expect("manifest is complete");
    session
}

/// Drive at 60 fps, jumping every `jump_every` frames
fn play(session: &mut Session, frames: u32, jump_every: u32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for frame in 0..frames {
        if jump_every > 0 && frame % jump_every == 0 {
            session.jump();
        }
        session.fire();
        events.extend(session.frame(f64::from(frame) * 1000.0 / 60.0));
        if session.phase() == RunPhase::GameOver {
            break;
        }
    }
    events
}

#[test]
fn test_same_seed_same_run() {
    let mut a = session(42, &Tuning::default());
    let mut b = session(42, &Tuning::default());

    let events_a = play(&mut a, 600, 17);
    let events_b = play(&mut b, 600, 17);

    assert_eq!(events_a, events_b);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = session(1, &Tuning::default());
    let mut b = session(2, &Tuning::default());
    play(&mut a, 600, 17);
    play(&mut b, 600, 17);

    let ids = |s: &Session| {
        s.snapshot()
            .entities
            .iter()
            .map(|e| (e.kind, e.pos.x.to_bits(), e.pos.y.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_ne!(ids(&a), ids(&b));
}

#[test]
fn test_falling_player_loses_the_run() {
    let mut session = session(3, &Tuning::default());
    let events = play(&mut session, 60 * 60, 0);

    assert_eq!(session.phase(), RunPhase::GameOver);
    assert!(events.iter().any(|e| matches!(e, SimEvent::GameOver { .. })));

    let summary = session.summary().expect("run is over");
    assert!(summary.hits_taken >= 3);
    assert!(summary.elapsed > 0.0);
    assert_eq!(
        summary.score,
        session.snapshot().score.floor() as u64,
        "summary score is the floored total"
    );
}

#[test]
fn test_infinite_lives_never_ends() {
    let tuning = Tuning {
        enabled: true,
        infinite_lives: true,
        ..Tuning::default()
    };
    let mut session = session(3, &tuning);
    play(&mut session, 60 * 30, 0);

    assert_eq!(session.phase(), RunPhase::Running);
    assert!(session.summary().is_none());
    assert!(session.snapshot().score > 0.0);
}

#[test]
fn test_tuning_restricts_pickups() {
    let tuning = Tuning {
        enabled: true,
        infinite_lives: true,
        allowed_powerup_kinds: Some(vec![PowerUpKind::Slow]),
        power_up_spawn_rate_multiplier: 5.0,
        ..Tuning::default()
    };
    let mut session = session(11, &tuning);
    play(&mut session, 60 * 40, 20);

    let snapshot = session.snapshot();
    for sprite in snapshot
        .entities
        .iter()
        .filter(|e| e.kind == DrawableKind::PowerUp)
    {
        assert_eq!(sprite.icon, Some(PowerUpKind::Slow));
    }
}

#[test]
fn test_paused_session_ignores_time() {
    let mut session = session(9, &Tuning::default());
    play(&mut session, 30, 10);
    session.pause();
    let before = session.snapshot();
    assert_eq!(before.phase, RunPhase::Paused);

    for frame in 0..120 {
        session.jump();
        session.frame(10_000.0 + f64::from(frame) * 16.0);
    }
    assert_eq!(session.snapshot(), before);

    session.resume();
    assert!(session.frame(99_999.0).is_empty());
    assert_eq!(session.snapshot().elapsed, before.elapsed);
}

#[test]
fn test_high_score_round_trip() {
    let mut session = session(5, &Tuning::default());
    play(&mut session, 60 * 60, 0);
    assert!(session.can_save_high_score());

    let rank = session.save_high_score("Nova", "2026-10-19");
    assert_eq!(rank, Some(1));
    assert_eq!(session.high_scores().entries[0].name, "Nova");

    let reopened = Session::new(6, &Tuning::default(), session.store().clone());
    assert_eq!(reopened.last_name(), "Nova");
    assert_eq!(
        reopened.high_scores().top_score(),
        session.summary().map(|s| s.score)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_score_never_decreases(seed in 0u64..500, jump_every in 5u32..40) {
        let mut session = session(seed, &Tuning::default());
        let mut last = 0.0;
        for frame in 0..400u32 {
            if frame % jump_every == 0 {
                session.jump();
            }
            session.frame(f64::from(frame) * 1000.0 / 60.0);
            let score = session.snapshot().score;
            prop_assert!(score >= last);
            last = score;
        }
    }

    #[test]
    fn test_meters_stay_in_unit_range(seed in 0u64..200) {
        let tuning = Tuning {
            enabled: true,
            infinite_lives: true,
            power_up_spawn_rate_multiplier: 5.0,
            ..Tuning::default()
        };
        let mut session = session(seed, &tuning);
        for frame in 0..900u32 {
            if frame % 12 == 0 {
                session.jump();
            }
            session.frame(f64::from(frame) * 1000.0 / 60.0);
            for meter in session.snapshot().power_ups {
                prop_assert!((0.0..=1.0).contains(&meter.ratio));
            }
        }
    }
}
