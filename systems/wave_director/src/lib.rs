#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave director responsible for emitting enemy spawn commands.
//!
//! The director derives its phase from the world's wave status, paces spawns
//! with a cooldown measured in effective simulation time, and rolls each
//! enemy's tier and lane from a seeded random stream.

use std::time::Duration;

use burrow_defence_core::{Command, EnemyTier, Event, WavePhase, WaveStatus, PACING_MULTIPLIER};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Base spawn interval before the pacing multiplier is applied.
const BASE_SPAWN_INTERVAL_MS: f32 = 600.0;

const BASE_HP: f32 = 6.0;
const HP_PER_DIFFICULTY: f32 = 3.0;
const BASE_SPEED: f32 = 0.65;
const SPEED_PER_DIFFICULTY: f32 = 0.07;

/// Spawn interval applied between consecutive enemies of a wave.
#[must_use]
pub fn default_spawn_interval() -> Duration {
    Duration::from_secs_f32(BASE_SPAWN_INTERVAL_MS / PACING_MULTIPLIER / 1000.0)
}

/// Weights controlling which tier each spawned enemy receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierMix {
    /// Minimum difficulty at which bosses may appear.
    pub boss_difficulty: u32,
    /// Minimum map index at which bosses may appear.
    pub boss_map: u32,
    /// Probability of a boss once unlocked.
    pub boss_chance: f64,
    /// Minimum difficulty at which elites may appear.
    pub elite_difficulty: u32,
    /// Probability of an elite once unlocked.
    pub elite_chance: f64,
    /// Weak share at difficulty one.
    pub weak_share: f64,
    /// Reduction of the weak share per difficulty level.
    pub weak_decay: f64,
    /// Lower bound of the weak share.
    pub weak_floor: f64,
}

impl Default for TierMix {
    fn default() -> Self {
        Self {
            boss_difficulty: 8,
            boss_map: 1,
            boss_chance: 0.04,
            elite_difficulty: 4,
            elite_chance: 0.12,
            weak_share: 0.50,
            weak_decay: 0.05,
            weak_floor: 0.10,
        }
    }
}

impl TierMix {
    /// Probability that a non-elite, non-boss enemy is weak at the difficulty.
    #[must_use]
    pub fn weak_chance(&self, difficulty: u32) -> f64 {
        let steps = f64::from(difficulty.saturating_sub(1));
        (self.weak_share - self.weak_decay * steps)
            .max(self.weak_floor)
            .clamp(0.0, 1.0)
    }
}

/// Configuration parameters required to construct the wave director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
    tier_mix: TierMix,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence, seed and tier mix.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64, tier_mix: TierMix) -> Self {
        Self {
            spawn_interval,
            rng_seed,
            tier_mix,
        }
    }
}

/// Hit points and speed of a freshly spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Starting hit points.
    pub max_hp: u32,
    /// Speed in path cells per second.
    pub speed: f32,
}

/// Deterministic stats for an enemy of the tier at the difficulty.
#[must_use]
pub fn enemy_stats(tier: EnemyTier, difficulty: u32) -> EnemyStats {
    let level = difficulty as f32;
    let hp = ((BASE_HP + HP_PER_DIFFICULTY * level) * tier.hp_multiplier()).round();
    let speed = (BASE_SPEED + SPEED_PER_DIFFICULTY * level) * PACING_MULTIPLIER * tier.speed_multiplier();
    EnemyStats {
        max_hp: (hp as u32).max(1),
        speed,
    }
}

/// Pure system that emits spawn commands while a wave is spawning.
#[derive(Debug)]
pub struct WaveDirector {
    spawn_interval: Duration,
    cooldown: Duration,
    tier_mix: TierMix,
    rng: ChaCha8Rng,
}

impl WaveDirector {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            cooldown: Duration::ZERO,
            tier_mix: config.tier_mix,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events observed since the previous call together with the
    /// current wave status and the effective time slice of this tick.
    ///
    /// At most one enemy is spawned per call.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: &WaveStatus,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        if events
            .iter()
            .any(|event| matches!(event, Event::WaveStarted { .. }))
        {
            self.cooldown = Duration::ZERO;
        }

        if status.phase() != WavePhase::Spawning {
            return;
        }

        self.cooldown = self.cooldown.saturating_sub(dt);
        if !self.cooldown.is_zero() {
            return;
        }

        let tier = self.roll_tier(status.difficulty, status.map_index);
        let stats = enemy_stats(tier, status.difficulty);
        let lane_offset = self.roll_lane(status.path_width);
        out.push(Command::SpawnEnemy {
            tier,
            max_hp: stats.max_hp,
            speed: stats.speed,
            lane_offset,
        });
        self.cooldown = self.spawn_interval;
    }

    fn roll_tier(&mut self, difficulty: u32, map_index: u32) -> EnemyTier {
        let mix = self.tier_mix;
        if difficulty >= mix.boss_difficulty
            && map_index >= mix.boss_map
            && self.rng.gen_bool(mix.boss_chance.clamp(0.0, 1.0))
        {
            return EnemyTier::Boss;
        }
        if difficulty >= mix.elite_difficulty && self.rng.gen_bool(mix.elite_chance.clamp(0.0, 1.0)) {
            return EnemyTier::Elite;
        }
        if self.rng.gen_bool(mix.weak_chance(difficulty)) {
            EnemyTier::Weak
        } else {
            EnemyTier::Standard
        }
    }

    fn roll_lane(&mut self, path_width: u32) -> i32 {
        if path_width <= 1 {
            return 0;
        }
        let spread = (path_width - 1) as i32;
        self.rng.gen_range(-spread..=spread)
    }
}
