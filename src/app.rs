//! Fixed-timestep game loop
//!
//! `Game` owns the session and its collaborators. Each frame it runs up to
//! `MAX_SUBSTEPS` simulation ticks, then reacts to the events they emitted:
//! sound cues, and on game over with a new record, saving the high score and
//! submitting it to the ledger.

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::highscores::HighScoreStore;
use crate::ledger::ScoreSink;
use crate::renderer::{self, Backdrop, Canvas, FrameInfo};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, SessionState, TickInput, tick};

/// Game instance holding all state
pub struct Game {
    pub state: SessionState,
    pub backdrop: Backdrop,
    pub settings: Settings,
    audio: AudioManager,
    highscores: HighScoreStore,
    sink: Box<dyn ScoreSink>,
    accumulator: f32,
    input: TickInput,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: f32,
    last_phase: GamePhase,
}

impl Game {
    pub fn new(
        seed: u64,
        settings: Settings,
        mut audio: AudioManager,
        highscores: HighScoreStore,
        sink: Box<dyn ScoreSink>,
    ) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let state = SessionState::new(seed, highscores.best());
        log::info!("Game initialized with seed: {}", seed);
        Self {
            last_phase: state.phase,
            state,
            backdrop: Backdrop::new(seed ^ 0x5eed),
            settings,
            audio,
            highscores,
            sink,
            accumulator: 0.0,
            input: TickInput::default(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0.0,
        }
    }

    /// Replace held keys and add any newly pressed one-shots
    pub fn set_input(&mut self, input: TickInput) {
        self.input = TickInput {
            start: self.input.start || input.start,
            pause: self.input.pause || input.pause,
            blast: self.input.blast || input.blast,
            restart: self.input.restart || input.restart,
            ..input
        };
    }

    /// Run simulation ticks for `dt` seconds of wall time
    pub fn update(&mut self, dt: f32, time: f64) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = self.input.held_only();

            self.handle_events();
        }

        if self.settings.effective_backdrop_motion() {
            self.backdrop.update(dt);
        }

        self.track_fps(time);

        if self.state.phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
            if let GameEvent::GameOver {
                score,
                new_high_score: true,
            } = event
            {
                self.record_high_score(score);
            }
        }
    }

    /// Save a new record and hand it to the ledger
    fn record_high_score(&mut self, score: u32) {
        match self.highscores.record(score) {
            Ok(true) => self.sink.submit(score),
            Ok(false) => log::debug!("Score {} does not beat the saved high score", score),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }

    fn track_fps(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((self.frame_times.len() - 1) as f64 / elapsed) as f32;
            }
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        renderer::render(
            canvas,
            &self.state,
            &self.backdrop,
            &self.settings,
            FrameInfo { fps: self.fps },
        );
    }
}
