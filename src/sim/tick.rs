//! Fixed timestep simulation tick
//!
//! One call advances every entity by one frame in a fixed order: player,
//! centipede, spider, then blasts. Each step sees the results of the ones
//! before it.

use super::centipede::Surroundings;
use super::collision::{blaster_touches_enemy, update_blasts};
use super::player::Direction;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement request
    pub direction: Direction,
    /// Fire (ignored while reloading)
    pub shoot: bool,
    /// Start a game from the home screen
    pub start: bool,
    /// Demo mode - the autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    let input = if input.autopilot {
        autopilot(state)
    } else {
        input.clone()
    };

    match state.phase {
        GamePhase::Home => tick_home(state, &input),
        GamePhase::Playing => tick_playing(state, &input, dt),
    }
}

/// Attract screen: the centipede wanders over a field until a start request
fn tick_home(state: &mut GameState, input: &TickInput) {
    if state.field.is_empty() {
        state.initialize_field();
    }
    if !state.centipede.random_walk() {
        state.centipede.set_random_walk(true);
    }

    if input.start {
        state.start_game();
        return;
    }

    advance_centipede(state);
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    state.player.update_high_score();

    // === Player ===
    state.player.try_move(input.direction, &state.field);
    state.player.cool_down(dt);
    if input.shoot {
        state.player.shoot(&mut state.ids);
    }
    if blaster_touches_enemy(&state.player, &state.centipede, &state.spider) {
        state.player.lose_life();
        state.reset_chain(false);
        let lives_left = state.player.lives;
        state.push_event(GameEvent::LifeLost { lives_left });
        log::info!("Life lost, {} left", lives_left);
    }

    // === Centipede ===
    advance_centipede(state);

    // === Spider ===
    for id in state.spider.update(dt, &mut state.field, &mut state.rng) {
        state.push_event(GameEvent::MushroomDestroyed { id });
    }
    state.spider.animate();

    // === Blasts ===
    update_blasts(state);

    // === Wave / game over ===
    if state.centipede.is_cleared() {
        state.reset_chain(false);
        state.bump_difficulty();
        state.push_event(GameEvent::WaveCleared);
        log::info!(
            "Wave cleared, centipede speed now {}",
            state.centipede.speed()
        );
    }

    state.player.update_high_score();
    if state.player.is_out_of_lives() {
        state.end_game();
    }
}

fn advance_centipede(state: &mut GameState) {
    let env = Surroundings {
        field: &state.field,
        field_size: state.field_size(),
        player_y: state.player.pos.y,
    };
    state.centipede.advance(&env);
    state.centipede.animate();
}

/// Input for demo play: start right away, then chase the lowest segment and
/// keep firing
pub fn autopilot(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Home => TickInput {
            start: true,
            ..Default::default()
        },
        GamePhase::Playing => {
            let player = &state.player;
            let center = player.pos.x + 0.5 * player.size.x;
            let target = state
                .centipede
                .alive_segments()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|s| s.pos.x + 0.5 * s.size.x);

            let direction = match target {
                Some(x) if x < center - player.speed => Direction::Left,
                Some(x) if x > center + player.speed => Direction::Right,
                _ => Direction::None,
            };

            TickInput {
                direction,
                shoot: true,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::collision::resolve_blast;
    use crate::sim::player::LaserBlast;
    use glam::Vec2;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    /// A started game with no mushrooms and the spider dead
    fn quiet_game(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &start(), SIM_DT);
        state.field.clear();
        state.spider.kill();
        state
    }

    fn shoot_at(state: &mut GameState, pos: Vec2) {
        let blast = LaserBlast {
            id: state.next_entity_id(),
            pos: pos + Vec2::new(5.0, 2.0),
            size: Vec2::new(5.0, 15.0),
            speed: 10.0,
        };
        assert!(resolve_blast(state, &blast).is_some());
    }

    #[test]
    fn test_home_wanders_until_start() {
        let mut state = GameState::new(12345);
        let spawn = state.centipede.segments()[0].pos;

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Home);
        assert!(state.centipede.random_walk());
        assert_ne!(state.centipede.segments()[0].pos, spawn);

        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.centipede.random_walk());
        assert_eq!(state.events, vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_home_regenerates_empty_field() {
        let mut state = GameState::new(8);
        state.field.clear();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.field.len(), 30);
    }

    #[test]
    fn test_shooting_spawns_blast() {
        let mut state = quiet_game(2);
        let input = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.blasts.len(), 1);
        // Moved once in the same tick it was fired
        let blast = &state.player.blasts[0];
        assert_eq!(blast.pos.y, state.player.pos.y - blast.speed);

        // Reloading
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player.blasts.len(), 1);
    }

    #[test]
    fn test_life_loss_soft_reset() {
        let mut state = quiet_game(3);
        state.centipede.set_speed(3.0);
        state.player.add_score(40);
        state.player.try_move(Direction::Left, &state.field);
        let player_pos = state.player.pos;
        state.centipede.segments_mut()[5].pos = player_pos;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives(), 2);
        assert_eq!(state.score(), 40);
        assert_eq!(state.player.pos, state.player.spawn_position());
        assert_eq!(state.centipede.speed(), 3.0);
        assert_eq!(state.centipede.alive_segments().count(), 12);
        assert!(state.events.contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_wave_clear_bumps_speed() {
        let mut state = quiet_game(4);
        for index in 0..state.centipede.segments().len() {
            state.centipede.kill(index);
        }

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.contains(&GameEvent::WaveCleared));
        assert_eq!(state.centipede.speed(), 3.0);
        assert_eq!(state.spider.speed, 3.0);
        assert_eq!(state.centipede.alive_segments().count(), 12);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_score_survives_to_high_score() {
        let mut state = quiet_game(5);
        for (i, segment) in state.centipede.segments_mut().iter_mut().enumerate() {
            segment.pos = Vec2::new(40.0 * i as f32, 100.0);
        }

        // Two bodies, then the head
        shoot_at(&mut state, Vec2::new(80.0, 100.0));
        shoot_at(&mut state, Vec2::new(160.0, 100.0));
        shoot_at(&mut state, Vec2::new(0.0, 100.0));
        assert_eq!(state.score(), 120);

        // Last life lost to a collision
        state.player.lives = 1;
        state.centipede.segments_mut()[5].pos = state.player.pos;
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::Home);
        assert_eq!(state.high_score(), 120);
        assert!(state.events.contains(&GameEvent::GameOver { score: 120 }));
        assert!(state.field.is_empty());

        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lives(), 3);
        assert_eq!(state.high_score(), 120);
    }

    #[test]
    fn test_spider_meal_reported() {
        let mut state = quiet_game(6);
        state.spider.reset(false, &mut state.rng);
        let id = state.next_entity_id();
        let pos = state.spider.pos;
        state.field.add(id, pos, Vec2::splat(20.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.contains(&GameEvent::MushroomDestroyed { id }));
        assert!(state.field.get(id).is_none());
    }

    #[test]
    fn test_autopilot_plays() {
        let mut state = GameState::new(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);

        let size = state.field_size();
        for _ in 0..3000 {
            tick(&mut state, &input, SIM_DT);
            let slack = state.centipede.speed();
            for segment in state.centipede.alive_segments() {
                assert!(segment.pos.x >= -slack && segment.pos.x + segment.size.x <= size.x + slack);
                assert!(segment.pos.y >= 0.0 && segment.pos.y + segment.size.y <= size.y);
            }
            assert!(state.player.pos.y >= 0.5 * size.y);
            assert!(state.high_score() >= state.score());
        }
    }
}
