//! Game state and core simulation types
//!
//! One explicit struct owns every entity of a run. Update functions take it
//! by reference; nothing in the simulation is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::centipede::{Centipede, Facing};
use super::field::MushroomField;
use super::player::Blaster;
use super::spider::Spider;
use crate::settings::Settings;

/// Unique ids shared by every entity kind (segments, blasts, mushrooms)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract screen: the centipede wanders, waiting for a start request
    Home,
    /// Active gameplay
    Playing,
}

/// Something that happened during a tick, for audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MushroomDamaged { id: u32 },
    MushroomDestroyed { id: u32 },
    SegmentKilled { id: u32, head: bool, pos: Vec2 },
    SpiderKilled,
    LifeLost { lives_left: u8 },
    WaveCleared,
    GameOver { score: u64 },
    GameStarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub rng: Pcg32,
    pub ids: EntityIds,
    pub phase: GamePhase,
    pub centipede: Centipede,
    pub field: MushroomField,
    pub spider: Spider,
    pub player: Blaster,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game state with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    /// Create a game state on the home screen
    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = EntityIds::new();
        let mut centipede = Centipede::new(&settings, &mut ids);
        centipede.set_random_walk(true);
        let spider = Spider::new(&settings, &mut rng);
        let player = Blaster::new(&settings);

        let mut state = Self {
            seed,
            settings,
            rng,
            ids,
            phase: GamePhase::Home,
            centipede,
            field: MushroomField::new(),
            spider,
            player,
            events: Vec::new(),
            time_ticks: 0,
        };
        state.initialize_field();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.settings.field_width, self.settings.field_height)
    }

    /// Record an event for this tick
    pub fn push_event(&mut self, event: GameEvent) {
        log::trace!("{:?}", event);
        self.events.push(event);
    }

    // === Lifecycle ===

    /// Lay out a fresh random mushroom field
    pub fn initialize_field(&mut self) {
        let size = self.field_size();
        let cell = self.settings.cell();
        self.field.generate(
            self.settings.mushroom_count,
            size,
            cell,
            &mut self.rng,
            &mut self.ids,
        );
    }

    /// Rebuild the centipede at the spawn point
    pub fn reset_chain(&mut self, reset_speed: bool) {
        self.centipede.reset(reset_speed, &mut self.ids);
    }

    /// New game for the player; the high score survives
    pub fn reset_player(&mut self) {
        self.player.reset();
    }

    pub fn reset_roamer(&mut self, reset_speed: bool) {
        self.spider.reset(reset_speed, &mut self.rng);
    }

    /// Speed up the centipede and the spider by one increment
    pub fn bump_difficulty(&mut self) {
        let increment = self.settings.speed_increment;
        let speed = self.centipede.speed() + increment;
        self.centipede.set_speed(speed);
        self.spider.speed += increment;
        log::debug!(
            "Difficulty up: centipede speed {}, spider speed {}",
            self.centipede.speed(),
            self.spider.speed
        );
    }

    /// Leave the home screen and start a new game
    pub fn start_game(&mut self) {
        self.initialize_field();
        self.centipede.set_random_walk(false);
        self.reset_chain(true);
        self.reset_player();
        self.reset_roamer(true);
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::GameStarted);
        log::info!("Game started (high score {})", self.player.high_score);
    }

    /// Out of lives: record the high score and return to the home screen
    pub fn end_game(&mut self) {
        self.player.update_high_score();
        self.reset_chain(true);
        self.centipede.set_random_walk(true);
        self.field.clear();
        self.phase = GamePhase::Home;
        let score = self.player.score;
        self.push_event(GameEvent::GameOver { score });
        log::info!(
            "Game over: score {}, high score {}",
            score,
            self.player.high_score
        );
    }

    // === Queries ===

    pub fn score(&self) -> u64 {
        self.player.score
    }

    pub fn lives(&self) -> u8 {
        self.player.lives
    }

    pub fn high_score(&self) -> u64 {
        self.player.high_score
    }

    /// Serializable view of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            tick: self.time_ticks,
            score: self.player.score,
            high_score: self.player.high_score,
            lives: self.player.lives,
            player: self.player.pos,
            segments: self
                .centipede
                .alive_segments()
                .map(|s| SegmentView {
                    id: s.id,
                    head: s.is_head(),
                    pos: s.pos,
                    facing: s.facing,
                    frame: s.frame,
                })
                .collect(),
            mushrooms: self
                .field
                .iter()
                .map(|m| MushroomView {
                    id: m.id,
                    pos: m.pos,
                    health: m.health,
                })
                .collect(),
            blasts: self
                .player
                .blasts
                .iter()
                .map(|b| BlastView { id: b.id, pos: b.pos })
                .collect(),
            spider: self.spider.is_alive().then(|| SpiderView {
                pos: self.spider.pos,
                frame: self.spider.frame,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentView {
    pub id: u32,
    pub head: bool,
    pub pos: Vec2,
    pub facing: Facing,
    pub frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MushroomView {
    pub id: u32,
    pub pos: Vec2,
    pub health: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlastView {
    pub id: u32,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiderView {
    pub pos: Vec2,
    pub frame: u8,
}

/// Point-in-time view of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub score: u64,
    pub high_score: u64,
    pub lives: u8,
    pub player: Vec2,
    pub segments: Vec<SegmentView>,
    pub mushrooms: Vec<MushroomView>,
    pub blasts: Vec<BlastView>,
    pub spider: Option<SpiderView>,
}
