//! Simulation module
//!
//! All gameplay logic lives here. This module is pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - One explicit `GameState` owns every entity
//! - No rendering or platform dependencies

pub mod centipede;
pub mod collision;
pub mod delay;
pub mod field;
pub mod player;
pub mod rect;
pub mod spider;
pub mod state;
pub mod tick;

pub use centipede::{Centipede, Facing, Life, Segment, SegmentRole, Step, Surroundings};
pub use collision::{BlastHit, blaster_touches_enemy, resolve_blast, update_blasts};
pub use delay::DelayLine;
pub use field::{Mushroom, MushroomField, MushroomHit};
pub use player::{Blaster, Direction, LaserBlast};
pub use rect::{Bounded, Rect};
pub use spider::Spider;
pub use state::{EntityIds, GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, autopilot, tick};
