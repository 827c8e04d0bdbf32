//! Keyboard state for the terminal frontend
//!
//! Terminals report key presses, not key state. Direction keys count as held
//! while their last press/repeat is recent, or until a release arrives on
//! terminals that report them. A fresh press gets a longer window to bridge
//! the OS delay before auto-repeat starts. Everything else is a one-shot that
//! is consumed by the next `take_input`.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::sim::TickInput;

/// A repeating key stays held this many frames after its last repeat.
/// About 130 ms at 60 Hz, longer than the gap between OS repeats.
pub const HOLD_WINDOW: u64 = 8;

/// A freshly pressed key stays held this many frames while waiting for the
/// first repeat. About 670 ms at 60 Hz, covering the usual 250-600 ms delay.
pub const FIRST_REPEAT_WINDOW: u64 = 40;

/// When a key was last seen, and whether repeats have started
#[derive(Debug, Clone, Copy)]
struct KeySeen {
    frame: u64,
    repeating: bool,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, KeySeen>,
    frame: u64,
    pending: TickInput,
    quit: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the frame counter used for hold expiry
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle(&mut self, event: KeyEvent) {
        match event.kind {
            KeyEventKind::Press => {
                // Terminals without event types report repeats as presses
                let repeating = self.is_held(event.code);
                self.key_frame.insert(
                    event.code,
                    KeySeen {
                        frame: self.frame,
                        repeating,
                    },
                );
                self.press(event.code, event.modifiers);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(
                    event.code,
                    KeySeen {
                        frame: self.frame,
                        repeating: true,
                    },
                );
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
    }

    fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char(' ') => self.pending.start = true,
            KeyCode::Char('p') | KeyCode::Char('P') => self.pending.pause = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.pending.restart = true,
            KeyCode::Char('b') | KeyCode::Char('B') => self.pending.blast = true,
            KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
                self.pending.blast = true
            }
            _ => {}
        }
    }

    fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame.get(&key).is_some_and(|seen| {
            let window = if seen.repeating {
                HOLD_WINDOW
            } else {
                FIRST_REPEAT_WINDOW
            };
            self.frame.saturating_sub(seen.frame) <= window
        })
    }

    /// Input for the next frame; one-shot keys are cleared
    pub fn take_input(&mut self) -> TickInput {
        let one_shots = std::mem::take(&mut self.pending);
        TickInput {
            left: self.is_held(KeyCode::Left),
            right: self.is_held(KeyCode::Right),
            up: self.is_held(KeyCode::Up),
            down: self.is_held(KeyCode::Down),
            ..one_shots
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
