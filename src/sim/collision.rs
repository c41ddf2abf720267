//! Collision resolution between blasts, the player and the creatures
//!
//! Every blast checks its targets in a fixed order and stops at the first
//! hit: leaving the field, then mushrooms, then centipede segments, then the
//! spider. A kill is visible to every later check in the same tick.

use super::centipede::{Centipede, KilledSegment, SegmentRole};
use super::field::MushroomHit;
use super::player::{Blaster, LaserBlast};
use super::rect::Bounded;
use super::spider::Spider;
use super::state::{GameEvent, GameState};
use crate::consts::{BODY_POINTS, HEAD_POINTS, SPIDER_POINTS};

/// What a blast hit this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlastHit {
    /// Left the field without hitting anything
    OutOfBounds,
    Mushroom { id: u32, hit: MushroomHit },
    /// A segment died and a mushroom grew where it was
    Segment {
        killed: KilledSegment,
        mushroom_id: u32,
    },
    Spider,
}

impl BlastHit {
    /// Points awarded for this hit
    pub fn points(&self) -> u64 {
        match self {
            BlastHit::Segment { killed, .. } => match killed.role {
                SegmentRole::Head => HEAD_POINTS,
                SegmentRole::Body => BODY_POINTS,
            },
            BlastHit::Spider => SPIDER_POINTS,
            BlastHit::OutOfBounds | BlastHit::Mushroom { .. } => 0,
        }
    }
}

/// Resolve a blast that has already moved this tick.
///
/// Applies the outcome (damage, kills, score, events) and returns it, or
/// `None` if the blast flies on.
pub fn resolve_blast(state: &mut GameState, blast: &LaserBlast) -> Option<BlastHit> {
    if blast.is_out_of_bounds(state.settings.field_height) {
        return Some(BlastHit::OutOfBounds);
    }

    let bounds = blast.bounds();

    if let Some(id) = state.field.first_overlapping(&bounds).map(|m| m.id) {
        let hit = state.field.hit(id)?;
        state.push_event(match hit {
            MushroomHit::Damaged => GameEvent::MushroomDamaged { id },
            MushroomHit::Destroyed => GameEvent::MushroomDestroyed { id },
        });
        return Some(BlastHit::Mushroom { id, hit });
    }

    if let Some(killed) = state
        .centipede
        .first_alive_overlapping(&bounds)
        .and_then(|index| state.centipede.kill(index))
    {
        let mushroom_id = state.next_entity_id();
        let size = state.settings.cell();
        state.field.add(mushroom_id, killed.pos, size);
        state.push_event(GameEvent::SegmentKilled {
            id: killed.id,
            head: killed.role == SegmentRole::Head,
            pos: killed.pos,
        });
        let outcome = BlastHit::Segment {
            killed,
            mushroom_id,
        };
        state.player.add_score(outcome.points());
        return Some(outcome);
    }

    if state.spider.is_alive() && state.spider.overlaps(blast) {
        state.spider.kill();
        state.push_event(GameEvent::SpiderKilled);
        let outcome = BlastHit::Spider;
        state.player.add_score(outcome.points());
        return Some(outcome);
    }

    None
}

/// Move every blast in flight and drop the ones that hit something
pub fn update_blasts(state: &mut GameState) -> Vec<BlastHit> {
    let mut hits = Vec::new();
    let mut blasts = std::mem::take(&mut state.player.blasts);
    blasts.retain_mut(|blast| {
        blast.advance();
        match resolve_blast(state, blast) {
            Some(hit) => {
                hits.push(hit);
                false
            }
            None => true,
        }
    });
    state.player.blasts = blasts;
    hits
}

/// Whether the blaster touches a living segment or the living spider
pub fn blaster_touches_enemy(blaster: &Blaster, centipede: &Centipede, spider: &Spider) -> bool {
    let bounds = blaster.bounds();
    centipede.first_alive_overlapping(&bounds).is_some()
        || (spider.is_alive() && spider.overlaps(&bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::centipede::Life;
    use glam::Vec2;

    /// A playing state with an empty field and the spider parked out of the way
    fn quiet_state() -> GameState {
        let mut state = GameState::new(42);
        state.start_game();
        state.field.clear();
        state.spider.kill();
        state.events.clear();
        state
    }

    fn blast_at(state: &mut GameState, x: f32, y: f32) -> LaserBlast {
        LaserBlast {
            id: state.next_entity_id(),
            pos: Vec2::new(x, y),
            size: Vec2::new(5.0, 15.0),
            speed: 10.0,
        }
    }

    #[test]
    fn test_out_of_bounds_scores_nothing() {
        let mut state = quiet_state();
        let blast = blast_at(&mut state, 100.0, -1.0);
        assert_eq!(resolve_blast(&mut state, &blast), Some(BlastHit::OutOfBounds));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_miss_keeps_flying() {
        let mut state = quiet_state();
        let blast = blast_at(&mut state, 100.0, 400.0);
        assert_eq!(resolve_blast(&mut state, &blast), None);
    }

    #[test]
    fn test_mushroom_before_segment() {
        let mut state = quiet_state();
        let head = state.centipede.segments()[0].pos;
        let mushroom_id = state.next_entity_id();
        state.field.add(mushroom_id, head, Vec2::splat(20.0));

        // Overlaps both the mushroom and the head
        let blast = blast_at(&mut state, head.x + 5.0, head.y + 2.0);
        let hit = resolve_blast(&mut state, &blast);
        assert_eq!(
            hit,
            Some(BlastHit::Mushroom {
                id: mushroom_id,
                hit: MushroomHit::Damaged
            })
        );
        assert!(state.centipede.segments()[0].is_alive());
        assert_eq!(state.score(), 0);
        assert_eq!(state.events, vec![GameEvent::MushroomDamaged { id: mushroom_id }]);
    }

    #[test]
    fn test_segment_before_spider() {
        let mut state = quiet_state();
        let head = state.centipede.segments()[0].pos;
        state.spider.reset(false, &mut state.rng);
        state.spider.pos = head;

        let blast = blast_at(&mut state, head.x + 5.0, head.y + 2.0);
        let hit = resolve_blast(&mut state, &blast).expect("hit");
        assert!(matches!(hit, BlastHit::Segment { .. }));
        assert!(state.spider.is_alive());
        assert_eq!(state.score(), HEAD_POINTS);
    }

    #[test]
    fn test_head_kill_scores_and_grows_mushroom() {
        let mut state = quiet_state();
        let head = state.centipede.segments()[0].clone();
        let blast = blast_at(&mut state, head.pos.x + 5.0, head.pos.y + 2.0);

        let Some(BlastHit::Segment {
            killed,
            mushroom_id,
        }) = resolve_blast(&mut state, &blast)
        else {
            panic!("expected a segment hit");
        };
        assert_eq!(killed.id, head.id);
        assert_eq!(state.score(), 100);
        assert_eq!(state.centipede.segments()[0].life, Life::Dead);
        assert!(state.centipede.segments()[1].is_head());

        let mushroom = state.field.get(mushroom_id).expect("mushroom at kill site");
        assert_eq!(mushroom.pos, head.pos);
        assert_eq!(mushroom.health, 2);
    }

    #[test]
    fn test_body_kill_scores_ten() {
        let mut state = quiet_state();
        // Spread the chain out so a body sits alone
        for (i, segment) in state.centipede.segments_mut().iter_mut().enumerate() {
            segment.pos = Vec2::new(40.0 * i as f32, 100.0);
        }
        let blast = blast_at(&mut state, 85.0, 102.0);
        let hit = resolve_blast(&mut state, &blast).expect("hit");
        assert_eq!(hit.points(), BODY_POINTS);
        assert_eq!(state.score(), 10);
        assert!(state.centipede.segments()[3].is_head());
        assert!(state.centipede.segments()[0].is_head());
    }

    #[test]
    fn test_spider_kill() {
        let mut state = quiet_state();
        state.spider.reset(false, &mut state.rng);
        state.spider.pos = Vec2::new(300.0, 500.0);
        let blast = blast_at(&mut state, 310.0, 505.0);

        assert_eq!(resolve_blast(&mut state, &blast), Some(BlastHit::Spider));
        assert!(!state.spider.is_alive());
        assert_eq!(state.score(), 500);
        assert_eq!(state.events, vec![GameEvent::SpiderKilled]);
    }

    #[test]
    fn test_update_blasts_removes_hits() {
        let mut state = quiet_state();
        let mushroom_id = state.next_entity_id();
        state.field.add(mushroom_id, Vec2::new(100.0, 380.0), Vec2::splat(20.0));

        let hit = blast_at(&mut state, 105.0, 405.0);
        let miss = blast_at(&mut state, 600.0, 405.0);
        let miss_id = miss.id;
        state.player.blasts = vec![hit, miss];

        let hits = update_blasts(&mut state);
        assert_eq!(hits.len(), 1);
        assert_eq!(state.player.blasts.len(), 1);
        assert_eq!(state.player.blasts[0].id, miss_id);
        assert_eq!(state.player.blasts[0].pos.y, 395.0);
    }

    #[test]
    fn test_blaster_touches_enemy() {
        let mut state = quiet_state();
        assert!(!blaster_touches_enemy(&state.player, &state.centipede, &state.spider));

        state.centipede.segments_mut()[4].pos = state.player.pos;
        assert!(blaster_touches_enemy(&state.player, &state.centipede, &state.spider));

        state.centipede.kill(4);
        assert!(!blaster_touches_enemy(&state.player, &state.centipede, &state.spider));
    }
}
