//! Snowflake spawning and spawn pacing

use glam::Vec2;
use rand::Rng;

use super::state::{RoundState, Snowflake};
use crate::tuning::{AttrRange, SpawnTuning, Tuning};

/// Roll a new snowflake just above the top edge. Randomness is drawn in a
/// fixed order (size, x, speed, drift, wobble, phase) so a seeded RNG
/// replays identically.
pub fn roll_snowflake<R: Rng>(state: &mut RoundState, tuning: &Tuning, rng: &mut R) -> Snowflake {
    let flakes = &tuning.flakes;
    let size = flakes.size.sample(rng);
    let x = AttrRange::new(size / 2.0, state.playfield_width - size / 2.0).sample(rng);
    let speed = flakes.speed.sample(rng);
    let drift = flakes.drift.sample(rng);
    let wobble = flakes.wobble.sample(rng);
    let phase = flakes.phase.sample(rng);

    Snowflake {
        id: state.next_snowflake_id(),
        pos: Vec2::new(x, -size),
        size,
        speed,
        drift,
        wobble,
        phase,
    }
}

/// Interval after a spawn: shrink, but never below the spawn floor
pub fn interval_after_spawn(current: f32, spawn: &SpawnTuning) -> f32 {
    let floor = spawn.spawn_floor.max(spawn.min_interval);
    (current * spawn.spawn_shrink).clamp(floor.min(spawn.max_interval), spawn.max_interval)
}

/// Interval after a catch: shrink toward the hard minimum
pub fn interval_after_catch(current: f32, spawn: &SpawnTuning) -> f32 {
    (current * spawn.catch_shrink).clamp(spawn.min_interval, spawn.max_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rolled_snowflake_within_ranges() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..200 {
            let flake = roll_snowflake(&mut state, &tuning, &mut rng);
            assert!((12.0..=26.0).contains(&flake.size));
            assert!(flake.pos.x >= flake.size / 2.0);
            assert!(flake.pos.x <= tuning.playfield_width - flake.size / 2.0);
            assert_eq!(flake.pos.y, -flake.size);
            assert!((70.0..=140.0).contains(&flake.speed));
            assert!((18.0..=36.0).contains(&flake.drift));
            assert!((0.9..=2.1).contains(&flake.wobble));
        }
    }

    #[test]
    fn test_same_seed_same_snowflake() {
        let tuning = Tuning::default();
        let mut s1 = RoundState::new(&tuning);
        let mut s2 = RoundState::new(&tuning);
        let a = roll_snowflake(&mut s1, &tuning, &mut Pcg32::seed_from_u64(42));
        let b = roll_snowflake(&mut s2, &tuning, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_interval_shrinks_to_floor() {
        let spawn = SpawnTuning::default();
        let mut interval = spawn.initial_interval;
        for _ in 0..1000 {
            interval = interval_after_spawn(interval, &spawn);
        }
        assert!((interval - spawn.spawn_floor).abs() < 1e-6);

        for _ in 0..1000 {
            interval = interval_after_catch(interval, &spawn);
        }
        assert!((interval - spawn.min_interval).abs() < 1e-6);
    }

    #[test]
    fn test_interval_capped_at_max() {
        let spawn = SpawnTuning::default();
        assert_eq!(interval_after_spawn(50.0, &spawn), spawn.max_interval);
        assert_eq!(interval_after_catch(50.0, &spawn), spawn.max_interval);
    }
}
