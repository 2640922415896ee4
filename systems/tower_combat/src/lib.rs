#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower attacks into world commands.
//!
//! Each ready tower with a target fires exactly once per tick. Attacks are
//! resolved in tower order against a scratch copy of enemy hit points, so a
//! tower never picks an enemy that an earlier tower already finished off.

use burrow_defence_core::{
    geometry::{swipe_area, Cone, Ray},
    AreaEffect, BoardSize, CellPoint, Command, EnemyId, EnemyView, TowerKind, TowerSnapshot,
    TowerView, PACING_MULTIPLIER,
};
use burrow_defence_system_tower_targeting::{Candidate, TowerTargeting};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MIN_COOLDOWN: f32 = 0.06;
const COOLDOWN_JITTER: f32 = 0.14;

const SHOCKWAVE_REACH_BONUS: f32 = 0.2;
const SHOCKWAVE_SPEED: f32 = 10.0;
const SHOCKWAVE_SECONDS: f32 = 0.45;
const BEAM_SECONDS: f32 = 0.18;
const SWIPE_SECONDS: f32 = 0.22;
const CONE_SECONDS: f32 = 0.2;

const SLEEP_SECONDS: f32 = 1.0;
const UPGRADED_SLEEP_SECONDS: f32 = 1.5;

const TELEPORT_CHANCE: f64 = 0.2;
const TELEPORT_DISTANCE: f32 = 4.0;

/// Configuration parameters required to construct the combat system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Tower combat system that queues attack commands for ready towers.
#[derive(Debug)]
pub struct TowerCombat {
    targeting: TowerTargeting,
    picks: Vec<Candidate>,
    hits: Vec<EnemyId>,
    rng: ChaCha8Rng,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            targeting: TowerTargeting::new(),
            picks: Vec::new(),
            hits: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits attack commands for every ready tower that has a target.
    ///
    /// Every shot ends with a `Command::FireTower` carrying the tower's next
    /// cooldown.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        board: BoardSize,
        out: &mut Vec<Command>,
    ) {
        if enemies.is_empty() {
            return;
        }
        self.targeting.prepare(enemies);

        for tower in towers.iter().filter(|tower| tower.is_ready()) {
            let center = tower.region.center();
            let reach = tower.kind.reach(tower.stats.range);
            let Some(target) = self.targeting.select(center, reach) else {
                continue;
            };

            match tower.kind {
                TowerKind::Default => self.fire_projectiles(tower, center, target, out),
                TowerKind::Thunder => self.fire_laser(tower, center, target, board, out),
                TowerKind::Fat => self.fire_shockwave(tower, center, out),
                TowerKind::Kitty => self.fire_swipe(tower, center, target, board, out),
                TowerKind::Catatonic => self.fire_pulse(tower, center, out),
                TowerKind::Galactic => self.fire_cone(tower, center, target, board, out),
            }

            out.push(Command::FireTower {
                tower: tower.id,
                cooldown: self.next_cooldown(tower.stats.fire_rate),
            });
        }
    }

    fn next_cooldown(&mut self, fire_rate: f32) -> f32 {
        let jitter = self.rng.gen_range(-COOLDOWN_JITTER..COOLDOWN_JITTER);
        (fire_rate / PACING_MULTIPLIER + jitter).max(MIN_COOLDOWN)
    }

    fn fire_projectiles(
        &mut self,
        tower: &TowerSnapshot,
        center: CellPoint,
        target: Candidate,
        out: &mut Vec<Command>,
    ) {
        if tower.upgraded {
            let reach = tower.kind.reach(tower.stats.range);
            self.targeting.spread(center, reach, &mut self.picks);
        } else {
            self.picks.clear();
            self.picks.push(target);
        }
        for pick in &self.picks {
            out.push(Command::LaunchProjectile {
                origin: center,
                target: pick.cell,
                damage: tower.stats.damage,
            });
        }
    }

    fn fire_laser(
        &mut self,
        tower: &TowerSnapshot,
        center: CellPoint,
        target: Candidate,
        board: BoardSize,
        out: &mut Vec<Command>,
    ) {
        let ray = Ray::aimed(center, target.cell);
        self.collect_hits(|candidate| ray.covers(candidate.cell));
        self.damage_hits(tower, out);
        out.push(Command::SpawnEffect {
            effect: AreaEffect::Beam {
                cells: ray.trace(board),
                time_left: BEAM_SECONDS,
            },
        });
    }

    fn fire_shockwave(&mut self, tower: &TowerSnapshot, center: CellPoint, out: &mut Vec<Command>) {
        let radius = tower.stats.range + SHOCKWAVE_REACH_BONUS;
        self.collect_hits(|candidate| center.distance_squared_to(candidate.cell) <= radius * radius);
        self.damage_hits(tower, out);
        out.push(Command::SpawnEffect {
            effect: ring(center, tower.stats.range),
        });
    }

    fn fire_swipe(
        &mut self,
        tower: &TowerSnapshot,
        center: CellPoint,
        target: Candidate,
        board: BoardSize,
        out: &mut Vec<Command>,
    ) {
        let area = swipe_area(center, target.cell, board);
        self.collect_hits(|candidate| area.contains(&candidate.cell));
        self.damage_hits(tower, out);
        out.push(Command::SpawnEffect {
            effect: AreaEffect::Highlight {
                cells: area,
                time_left: SWIPE_SECONDS,
            },
        });
    }

    fn fire_pulse(&mut self, tower: &TowerSnapshot, center: CellPoint, out: &mut Vec<Command>) {
        let radius = tower.stats.range;
        let duration = if tower.upgraded {
            UPGRADED_SLEEP_SECONDS
        } else {
            SLEEP_SECONDS
        };
        self.collect_hits(|candidate| center.distance_squared_to(candidate.cell) <= radius * radius);
        for enemy in &self.hits {
            out.push(Command::SleepEnemy {
                enemy: *enemy,
                duration,
            });
        }
        out.push(Command::SpawnEffect {
            effect: ring(center, radius),
        });
    }

    fn fire_cone(
        &mut self,
        tower: &TowerSnapshot,
        center: CellPoint,
        target: Candidate,
        board: BoardSize,
        out: &mut Vec<Command>,
    ) {
        let cone = Cone::aimed(center, target.cell, tower.stats.range);
        self.collect_hits(|candidate| cone.covers(candidate.cell));
        self.damage_hits(tower, out);

        if tower.upgraded {
            for enemy in &self.hits {
                let survived = self
                    .targeting
                    .living()
                    .any(|candidate| candidate.id == *enemy);
                if survived && self.rng.gen_bool(TELEPORT_CHANCE) {
                    out.push(Command::KnockBackEnemy {
                        enemy: *enemy,
                        distance: TELEPORT_DISTANCE,
                    });
                }
            }
        }

        out.push(Command::SpawnEffect {
            effect: AreaEffect::Highlight {
                cells: cone.cells(board),
                time_left: CONE_SECONDS,
            },
        });
    }

    fn collect_hits(&mut self, mut covers: impl FnMut(&Candidate) -> bool) {
        self.hits.clear();
        for candidate in self.targeting.living() {
            if covers(candidate) {
                self.hits.push(candidate.id);
            }
        }
    }

    fn damage_hits(&mut self, tower: &TowerSnapshot, out: &mut Vec<Command>) {
        for enemy in &self.hits {
            self.targeting.strike(*enemy, tower.stats.damage);
            out.push(Command::DamageEnemy {
                enemy: *enemy,
                amount: tower.stats.damage,
                source: tower.kind,
            });
        }
    }
}

fn ring(center: CellPoint, max_radius: f32) -> AreaEffect {
    AreaEffect::Shockwave {
        center,
        radius: 0.0,
        max_radius,
        speed: SHOCKWAVE_SPEED,
        time_left: SHOCKWAVE_SECONDS,
    }
}
