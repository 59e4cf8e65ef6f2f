// Integration tests (native) for the `valentine-proposal` crate.
// These stay away from wasm/browser APIs and drive the public state types
// with a seeded RNG so they run under plain `cargo test` on the host.

use rand::SeedableRng;
use rand::rngs::StdRng;
use valentine_proposal::proposal::{Footprint, Tuning, Viewport, evade};
use valentine_proposal::{AppConfig, Mood, Phase, ProposalState};

fn desktop() -> Viewport {
    Viewport::new(1280.0, 800.0)
}

#[test]
fn ten_rapid_rejections_count_exactly_ten() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = ProposalState::default();
    for _ in 0..10 {
        state.reject(desktop(), &mut rng);
    }
    assert_eq!(state.rejection_count(), 10);
    assert_eq!(state.phase(), Phase::Escalating(10));
    assert_eq!(state.rejection_phrase(), "Have a heart!");
    assert_eq!(state.acceptance_phrase(), "YES! 💖");
}

#[test]
fn acceptance_scale_grows_then_caps() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut state = ProposalState::default();
    assert_eq!(state.accept_scale(), 1.0);
    for _ in 0..3 {
        state.reject(desktop(), &mut rng);
    }
    assert!((state.accept_scale() - 1.15).abs() < 1e-9);
    for _ in 0..97 {
        state.reject(desktop(), &mut rng);
    }
    assert_eq!(state.accept_scale(), 1.15);
}

#[test]
fn accept_is_terminal_and_fires_once() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = ProposalState::default();
    state.reject(desktop(), &mut rng);
    state.reject(desktop(), &mut rng);

    assert!(state.accept());
    assert!(!state.accept());
    assert_eq!(state.phase(), Phase::Accepted);

    let before = state.position();
    let reaction = state.reject(desktop(), &mut rng);
    assert_eq!(reaction.count, 2);
    assert_eq!(state.position(), before);
    assert!(state.is_accepted());
}

#[test]
fn mood_follows_rejections_and_hover() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut state = ProposalState::default();
    assert_eq!(state.mood(false), Mood::Initial);
    assert_eq!(state.mood(true), Mood::Encouraged);
    state.reject(desktop(), &mut rng);
    assert_eq!(state.mood(true), Mood::Distressed);
    assert_eq!(state.mood(false).asset(), "mascot_pleading.png");
}

#[test]
fn evaded_positions_stay_on_screen_for_any_viewport() {
    let mut rng = StdRng::seed_from_u64(42);
    let footprint = Footprint::default();
    let viewports = [
        Viewport::new(1920.0, 1080.0),
        Viewport::new(375.0, 667.0),
        Viewport::new(200.0, 100.0),
        Viewport::new(160.0, 60.0),
        Viewport::new(100.0, 40.0),
        Viewport::new(0.0, 0.0),
        Viewport::new(-50.0, f64::NAN),
    ];
    for vp in viewports {
        let (max_x, max_y) = footprint.limits(vp);
        for _ in 0..500 {
            let p = evade(vp, footprint, &mut rng);
            assert!(p.x.is_finite() && p.y.is_finite(), "{vp:?} gave {p:?}");
            assert!((0.0..=max_x).contains(&p.x), "{vp:?} gave x={}", p.x);
            assert!((0.0..=max_y).contains(&p.y), "{vp:?} gave y={}", p.y);
        }
    }
}

#[test]
fn same_seed_same_path() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = ProposalState::default();
        (0..5).map(|_| state.reject(desktop(), &mut rng).position).collect::<Vec<_>>()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn custom_tuning_moves_thresholds() {
    let config = AppConfig { nag_after: 0, frantic_after: 1, ..AppConfig::default() };
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = ProposalState::new(Tuning::from(&config));
    assert_eq!(state.nag_message(), None);
    state.reject(desktop(), &mut rng);
    assert_eq!(state.nag_message(), Some(valentine_proposal::NAG_HURT));
    state.reject(desktop(), &mut rng);
    assert_eq!(state.nag_message(), Some(valentine_proposal::NAG_FRANTIC));
    assert_eq!(state.reject_emoji(), valentine_proposal::REJECT_EMOJI_RUNNING);
}
