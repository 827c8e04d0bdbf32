//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - Fixed timestep only, driven by the `dt` handed to `tick`
//! - Seeded RNG only
//! - Every timer is a deadline on the session clock

pub mod heaters;
pub mod particles;
pub mod powerups;
pub mod state;
pub mod tick;

pub use particles::{Ember, Particle, burst, update_particles};
pub use state::{
    ActiveEffect, Fan, FanEcho, GameEvent, GamePhase, Heater, HeaterKind, Player, PowerUp,
    PowerUpKind, SessionState, Wobble,
};
pub use tick::{TickInput, tick};
