//! Session invariants under random input

use proptest::prelude::*;

use temperature_control::consts::*;
use temperature_control::sim::{GameEvent, GamePhase, SessionState, TickInput, tick};

fn input_from_bits(bits: u8) -> TickInput {
    TickInput {
        left: bits & 0x01 != 0,
        right: bits & 0x02 != 0,
        up: bits & 0x04 != 0,
        down: bits & 0x08 != 0,
        start: bits & 0x10 != 0,
        pause: bits & 0x20 != 0,
        blast: bits & 0x40 != 0,
        restart: bits & 0x80 != 0,
    }
}

/// Each step holds one key combination for a few ticks
fn steps() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((any::<u8>(), 1u8..30), 1..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_session_invariants(seed in any::<u64>(), steps in steps()) {
        let mut state = SessionState::new(seed, 0);
        let mut game_overs_this_session = 0;
        let mut last_score = 0;

        for (bits, ticks) in steps {
            let held = input_from_bits(bits);
            for i in 0..ticks {
                let input = if i == 0 { held.clone() } else { held.held_only() };
                tick(&mut state, &input, SIM_DT);

                for event in state.drain_events() {
                    match event {
                        GameEvent::SessionStarted => {
                            game_overs_this_session = 0;
                            last_score = 0;
                        }
                        GameEvent::GameOver { .. } => game_overs_this_session += 1,
                        _ => {}
                    }
                }

                prop_assert!(state.lives <= MAX_LIVES);
                prop_assert!(game_overs_this_session <= 1);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.high_score >= state.score);
                last_score = state.score;

                if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
                    prop_assert!(state.lives >= 1);
                    let p = state.player.rect;
                    prop_assert!(p.left() >= 0.0 && p.right() <= SCREEN_WIDTH);
                    prop_assert!(p.top() >= 0.0 && p.bottom() <= SCREEN_HEIGHT);
                }
                if state.phase == GamePhase::GameOver {
                    prop_assert_eq!(state.lives, 0);
                }
            }
        }
    }

    #[test]
    fn test_paused_session_is_frozen(seed in any::<u64>(), ticks in 1usize..200) {
        let mut state = SessionState::new(seed, 0);
        let start = TickInput { start: true, ..Default::default() };
        tick(&mut state, &start, SIM_DT);
        let pause = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &pause, SIM_DT);
        prop_assert_eq!(state.phase, GamePhase::Paused);

        let clock = state.clock;
        let heaters: Vec<_> = state.heaters.iter().map(|h| h.rect).collect();
        let held = TickInput { left: true, up: true, ..Default::default() };
        for _ in 0..ticks {
            tick(&mut state, &held, SIM_DT);
        }
        prop_assert_eq!(state.clock, clock);
        let after: Vec<_> = state.heaters.iter().map(|h| h.rect).collect();
        prop_assert_eq!(heaters, after);
    }
}
