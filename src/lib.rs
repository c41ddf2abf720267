//! Centipede - A grid-snapping arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Simulation (movement, collisions, game state)
//! - `settings`: Data-driven game balance and field dimensions

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 1080.0;
    pub const FIELD_HEIGHT: f32 = 680.0;

    /// Sprite sizes (width, height). The mushroom sprite defines the grid cell.
    pub const MUSHROOM_SIZE: (f32, f32) = (20.0, 20.0);
    pub const SEGMENT_SIZE: (f32, f32) = (20.0, 20.0);
    pub const SPIDER_SIZE: (f32, f32) = (30.0, 15.0);
    pub const BLASTER_SIZE: (f32, f32) = (20.0, 20.0);
    pub const BLAST_SIZE: (f32, f32) = (5.0, 15.0);

    /// Centipede defaults
    pub const CENTIPEDE_LENGTH: usize = 12;
    pub const CENTIPEDE_SPEED: f32 = 2.0;

    /// Spider defaults
    pub const SPIDER_SPEED: f32 = 2.0;
    /// Seconds a dead spider waits before respawning
    pub const SPIDER_RESPAWN_DELAY: f32 = 3.0;
    /// Chance per tick that the spider picks a new direction
    pub const SPIDER_TURN_CHANCE: f64 = 0.02;

    /// Player defaults
    pub const BLASTER_SPEED: f32 = 3.0;
    pub const BLAST_SPEED: f32 = 10.0;
    /// Seconds between shots
    pub const RELOAD_TIME: f32 = 0.25;
    pub const STARTING_LIVES: u8 = 3;

    /// Mushrooms placed at field generation
    pub const MUSHROOM_COUNT: usize = 30;
    /// Hits a fresh mushroom survives
    pub const MUSHROOM_HEALTH: u8 = 2;

    /// Speed added to centipede and spider after each cleared wave
    pub const SPEED_INCREMENT: f32 = 1.0;

    /// Points awarded per kill
    pub const HEAD_POINTS: u64 = 100;
    pub const BODY_POINTS: u64 = 10;
    pub const SPIDER_POINTS: u64 = 500;
}

/// Sign of a value as a unit step (-1, 0 or 1)
#[inline]
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
