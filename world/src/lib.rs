#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Burrow Defence.
//!
//! The world owns the path, enemies, towers, projectiles, effects and the
//! player's economy. It is only ever mutated through [`apply`], which answers
//! every command with the events describing what changed.

mod economy;
mod effects;
mod enemies;
pub mod maps;
mod path;
mod placement;
mod projectiles;
mod towers;

use std::time::Duration;

use burrow_defence_core::{
    difficulty_level, wave_reward, wave_spawn_count, ActionError, BoardSize, CellCoord,
    CellPoint, CellRect, Command, EnemyId, EnemyTier, Event, MapDefinition, TowerId, TowerKind,
    STARTING_CURRENCY, STARTING_LIVES, WAVES_PER_MAP,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use economy::Economy;
use effects::EffectLog;
use enemies::Enemy;
use path::PathModel;
use placement::Obstacle;
use projectiles::{Projectile, CAPTURE_DISTANCE_SQUARED};
use towers::{pulse_radius, HeldTower, TowerRegistry, TowerState};

pub use maps::standard_maps;

const DEFAULT_SEED: u64 = 0x5eed_ca75_b0a7_d00d;

/// Lower bound of the randomised cooldown a tower receives when it lands on the board.
const INITIAL_COOLDOWN_FLOOR: f32 = 0.05;

/// Session parameters used to construct a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Maps played in order; the catalogue wraps around after the last entry.
    pub maps: Vec<MapDefinition>,
    /// Seed for the world's random stream.
    pub seed: u64,
    /// Currency granted at the start of the session.
    pub starting_currency: u32,
    /// Lives granted at the start and after every map advance.
    pub starting_lives: u32,
    /// Index of the first map played.
    pub starting_map: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            maps: standard_maps(),
            seed: DEFAULT_SEED,
            starting_currency: STARTING_CURRENCY,
            starting_lives: STARTING_LIVES,
            starting_map: 0,
        }
    }
}

/// Represents the authoritative Burrow Defence world state.
#[derive(Debug)]
pub struct World {
    board: BoardSize,
    maps: Vec<MapDefinition>,
    map_index: u32,
    path: PathModel,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    towers: TowerRegistry,
    held: Option<HeldTower>,
    projectiles: Vec<Projectile>,
    effects: EffectLog,
    economy: Economy,
    starting_lives: u32,
    wave: u32,
    wave_active: bool,
    spawn_remaining: u32,
    game_over: bool,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world on the first built-in map with default economy settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world from explicit session parameters.
    ///
    /// An empty map list falls back to the built-in catalogue and an
    /// out-of-range starting map wraps around.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let board = BoardSize::standard();
        let maps = if config.maps.is_empty() {
            standard_maps()
        } else {
            config.maps
        };
        let map_index = config.starting_map % maps.len() as u32;
        let path = PathModel::build(board, &maps[map_index as usize]);
        Self {
            board,
            path,
            maps,
            map_index,
            enemies: Vec::new(),
            next_enemy_id: 0,
            towers: TowerRegistry::new(),
            held: None,
            projectiles: Vec::new(),
            effects: EffectLog::default(),
            economy: Economy::new(config.starting_currency, config.starting_lives),
            starting_lives: config.starting_lives,
            wave: 0,
            wave_active: false,
            spawn_remaining: 0,
            game_over: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    fn current_map(&self) -> &MapDefinition {
        &self.maps[self.map_index as usize]
    }

    fn enemy_cell(&self, enemy: &Enemy) -> CellCoord {
        self.path.lane_cell(enemy.progress, enemy.lane_offset)
    }

    fn living_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|enemy| enemy.id == id && enemy.is_alive())
    }

    fn initial_cooldown(&mut self, kind: TowerKind, upgraded: bool) -> f32 {
        let fire_rate = kind.stats(upgraded).fire_rate;
        if fire_rate <= INITIAL_COOLDOWN_FLOOR {
            return INITIAL_COOLDOWN_FLOOR;
        }
        self.rng.gen_range(INITIAL_COOLDOWN_FLOOR..fire_rate)
    }

    /// Footprints claimed on the board, including the held tower's original slot.
    fn obstacles(&self, exclude: Option<TowerId>) -> Vec<Obstacle> {
        let placed = self
            .towers
            .iter()
            .filter(|tower| Some(tower.id) != exclude)
            .map(|tower| Obstacle {
                region: tower.region,
                pulse_radius: tower.pulse_radius(),
            });
        let held = self
            .held
            .iter()
            .filter(|held| Some(held.tower.id) != exclude)
            .map(|held| Obstacle {
                region: CellRect::square(held.original, held.tower.kind.footprint()),
                pulse_radius: held.tower.pulse_radius(),
            });
        placed.chain(held).collect()
    }

    fn ensure_running(&self) -> Result<(), ActionError> {
        if self.game_over {
            Err(ActionError::GameOver)
        } else {
            Ok(())
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        self.ensure_running()?;
        if self.wave_active {
            return Err(ActionError::WaveInProgress);
        }
        self.wave = self.wave.saturating_add(1);
        let difficulty = difficulty_level(self.wave, self.map_index);
        self.spawn_remaining = wave_spawn_count(difficulty);
        self.wave_active = true;
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            difficulty,
            spawn_count: self.spawn_remaining,
        });
        Ok(())
    }

    fn spawn_enemy(
        &mut self,
        tier: EnemyTier,
        max_hp: u32,
        speed: f32,
        lane_offset: i32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        if !self.wave_active || self.spawn_remaining == 0 {
            return Err(ActionError::NoSpawnsRemaining);
        }
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        self.enemies
            .push(Enemy::spawn(id, tier, max_hp, speed, lane_offset));
        self.spawn_remaining -= 1;
        out_events.push(Event::EnemySpawned { enemy: id, tier });
        Ok(())
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        let seconds = dt.as_secs_f32();
        let max_progress = self.path.max_progress();

        for enemy in &mut self.enemies {
            enemy.advance(seconds, max_progress);
        }

        let economy = &mut self.economy;
        self.enemies.retain(|enemy| {
            if enemy.is_alive() && enemy.progress.floor() >= max_progress {
                let lives_remaining = economy.lose_life();
                out_events.push(Event::EnemyLeaked {
                    enemy: enemy.id,
                    lives_remaining,
                });
                return false;
            }
            true
        });

        for tower in self.towers.iter_mut() {
            tower.cooldown -= seconds;
        }
    }

    fn relocate_tower(
        &mut self,
        tower: TowerId,
        destination: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        let obstacles = self.obstacles(Some(tower));
        let Some(state) = self.towers.get_mut(tower) else {
            return Err(ActionError::UnknownTower);
        };
        let region = placement::validate(
            &self.path,
            obstacles,
            state.kind,
            destination,
            state.upgraded,
        )?;
        let from = state.region.origin();
        state.region = region;
        out_events.push(Event::TowerRelocated {
            tower,
            from,
            to: destination,
        });
        Ok(())
    }

    fn fire_tower(
        &mut self,
        tower: TowerId,
        cooldown: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        let Some(state) = self.towers.get_mut(tower) else {
            return Err(ActionError::UnknownTower);
        };
        state.cooldown = cooldown;
        out_events.push(Event::TowerFired {
            tower,
            kind: state.kind,
        });
        Ok(())
    }

    /// Single damage routine shared by every attack.
    ///
    /// Dead or unknown enemies are skipped, so a kill is credited exactly once
    /// no matter how many attacks land on the same enemy within a tick.
    fn damage_enemy(
        &mut self,
        id: EnemyId,
        amount: u32,
        source: TowerKind,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy) = self.living_enemy_mut(id) else {
            return;
        };
        enemy.health = enemy.health.saturating_sub(amount);
        let remaining = enemy.health;
        let tier = enemy.tier;
        if remaining.is_depleted() {
            let bounty = tier.bounty();
            self.economy.earn(bounty);
            out_events.push(Event::EnemyKilled {
                enemy: id,
                tier,
                bounty,
            });
            return;
        }

        let cell = self
            .enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(|enemy| self.enemy_cell(enemy));
        if let Some(cell) = cell {
            self.effects.mark_hit(cell, source);
        }
        out_events.push(Event::EnemyDamaged {
            enemy: id,
            amount,
            remaining,
        });
    }

    fn sleep_enemy(&mut self, id: EnemyId, duration: f32, out_events: &mut Vec<Event>) {
        if let Some(enemy) = self.living_enemy_mut(id) {
            let sleep_timer = enemy.extend_sleep(duration);
            out_events.push(Event::EnemySlept {
                enemy: id,
                sleep_timer,
            });
        }
    }

    fn knock_back_enemy(&mut self, id: EnemyId, distance: f32, out_events: &mut Vec<Event>) {
        if let Some(enemy) = self.living_enemy_mut(id) {
            let progress = enemy.knock_back(distance);
            out_events.push(Event::EnemyKnockedBack {
                enemy: id,
                progress,
            });
        }
    }

    fn nearest_living_enemy(&self, point: CellPoint) -> Option<EnemyId> {
        let mut best: Option<EnemyId> = None;
        let mut best_distance = CAPTURE_DISTANCE_SQUARED;
        for enemy in self.enemies.iter().filter(|enemy| enemy.is_alive()) {
            let distance = point.distance_squared_to(self.enemy_cell(enemy));
            if distance < best_distance {
                best_distance = distance;
                best = Some(enemy.id);
            }
        }
        best
    }

    fn settle(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();

        for projectile in &mut self.projectiles {
            projectile.advance(seconds);
        }
        let (arrived, in_flight): (Vec<_>, Vec<_>) = std::mem::take(&mut self.projectiles)
            .into_iter()
            .partition(Projectile::has_arrived);
        self.projectiles = in_flight;
        for projectile in arrived {
            let enemy = self.nearest_living_enemy(projectile.position);
            if let Some(enemy) = enemy {
                self.damage_enemy(enemy, projectile.damage, TowerKind::Default, out_events);
            }
            out_events.push(Event::ProjectileResolved {
                target: projectile.target,
                enemy,
            });
        }

        self.effects.decay(seconds);
        self.enemies.retain(Enemy::is_alive);
        self.complete_wave(out_events);
        self.check_game_over(out_events);
    }

    fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave_active || self.spawn_remaining > 0 || !self.enemies.is_empty() {
            return;
        }
        self.wave_active = false;
        let reward = wave_reward(self.wave);
        self.economy.earn(reward);
        out_events.push(Event::WaveCompleted {
            wave: self.wave,
            reward,
        });

        if self.wave % WAVES_PER_MAP == 0 {
            self.advance_map(out_events);
        }
    }

    /// Moves to the next map; currency and unlocks carry over.
    fn advance_map(&mut self, out_events: &mut Vec<Event>) {
        self.map_index = (self.map_index + 1) % self.maps.len() as u32;
        self.path = PathModel::build(self.board, self.current_map());
        self.enemies.clear();
        self.towers.clear();
        self.held = None;
        self.projectiles.clear();
        self.effects.clear();
        self.economy.reset_lives(self.starting_lives);
        self.wave_active = false;
        self.spawn_remaining = 0;
        out_events.push(Event::MapAdvanced {
            map_index: self.map_index,
        });
    }

    fn check_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over || self.economy.lives() > 0 {
            return;
        }
        self.game_over = true;
        self.wave_active = false;
        self.spawn_remaining = 0;
        out_events.push(Event::GameOver { wave: self.wave });
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        origin: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        if !self.economy.is_unlocked(kind) {
            return Err(ActionError::Locked { kind });
        }
        let cost = kind.cost();
        self.economy.check_funds(cost)?;
        let region = placement::validate(&self.path, self.obstacles(None), kind, origin, false)?;
        self.economy.spend(cost)?;

        let id = self.towers.allocate();
        let cooldown = self.initial_cooldown(kind, false);
        self.towers.insert(TowerState {
            id,
            kind,
            region,
            upgraded: false,
            cooldown,
        });
        out_events.push(Event::TowerPlaced {
            tower: id,
            kind,
            region,
            cost,
        });
        Ok(())
    }

    fn sell_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        self.ensure_running()?;
        if self.held.is_some() {
            return Err(ActionError::AlreadyHolding);
        }
        let tower = self
            .towers
            .find_at(cell)
            .and_then(|id| self.towers.remove(id))
            .ok_or(ActionError::NoTower)?;
        let refund = tower.kind.sell_refund();
        self.economy.earn(refund);
        out_events.push(Event::TowerSold {
            tower: tower.id,
            kind: tower.kind,
            refund,
        });
        Ok(())
    }

    fn upgrade_tower(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        let id = self.towers.find_at(cell).ok_or(ActionError::NoTower)?;
        let obstacles = self.obstacles(Some(id));
        let Some(tower) = self.towers.get_mut(id) else {
            return Err(ActionError::NoTower);
        };
        if tower.upgraded {
            return Err(ActionError::AlreadyUpgraded);
        }
        let cost = tower.kind.upgrade_cost();
        self.economy.check_funds(cost)?;
        placement::check_separation(tower.region, pulse_radius(tower.kind, true), obstacles)?;
        self.economy.spend(cost)?;
        tower.upgraded = true;
        out_events.push(Event::TowerUpgraded {
            tower: id,
            kind: tower.kind,
            cost,
        });
        Ok(())
    }

    fn unlock_tower(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        self.ensure_running()?;
        let cost = self.economy.unlock(kind)?;
        out_events.push(Event::TowerUnlocked { kind, cost });
        Ok(())
    }

    fn pick_up_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        self.ensure_running()?;
        if self.held.is_some() {
            return Err(ActionError::AlreadyHolding);
        }
        let tower = self
            .towers
            .find_at(cell)
            .and_then(|id| self.towers.remove(id))
            .ok_or(ActionError::NoTower)?;
        let id = tower.id;
        self.held = Some(HeldTower {
            original: tower.region.origin(),
            tower,
        });
        out_events.push(Event::TowerPickedUp { tower: id });
        Ok(())
    }

    fn drop_held_tower(
        &mut self,
        origin: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        self.ensure_running()?;
        let Some(held) = self.held.as_ref() else {
            return Err(ActionError::NotHolding);
        };
        let (id, kind, upgraded) = (held.tower.id, held.tower.kind, held.tower.upgraded);
        let region = placement::validate(&self.path, self.obstacles(Some(id)), kind, origin, upgraded)?;
        let cooldown = self.initial_cooldown(kind, upgraded);
        let Some(mut held) = self.held.take() else {
            return Err(ActionError::NotHolding);
        };
        held.tower.region = region;
        held.tower.cooldown = cooldown;
        self.towers.insert(held.tower);
        out_events.push(Event::TowerDropped { tower: id, region });
        Ok(())
    }

    fn cancel_hold(&mut self, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        self.ensure_running()?;
        let Some(mut held) = self.held.take() else {
            return Err(ActionError::NotHolding);
        };
        let region = CellRect::square(held.original, held.tower.kind.footprint());
        held.tower.region = region;
        let id = held.tower.id;
        self.towers.insert(held.tower);
        out_events.push(Event::HoldCancelled { tower: id, region });
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Refused commands leave the world untouched and are reported through
/// [`Event::ActionRejected`].
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::StartWave => world.start_wave(out_events),
        Command::SpawnEnemy {
            tier,
            max_hp,
            speed,
            lane_offset,
        } => world.spawn_enemy(tier, max_hp, speed, lane_offset, out_events),
        Command::Tick { dt } => {
            world.advance(dt, out_events);
            Ok(())
        }
        Command::RelocateTower { tower, destination } => {
            world.relocate_tower(tower, destination, out_events)
        }
        Command::FireTower { tower, cooldown } => world.fire_tower(tower, cooldown, out_events),
        Command::DamageEnemy {
            enemy,
            amount,
            source,
        } => {
            world.damage_enemy(enemy, amount, source, out_events);
            Ok(())
        }
        Command::SleepEnemy { enemy, duration } => {
            world.sleep_enemy(enemy, duration, out_events);
            Ok(())
        }
        Command::KnockBackEnemy { enemy, distance } => {
            world.knock_back_enemy(enemy, distance, out_events);
            Ok(())
        }
        Command::LaunchProjectile {
            origin,
            target,
            damage,
        } => {
            world
                .projectiles
                .push(Projectile::launch(origin, target, damage));
            out_events.push(Event::ProjectileLaunched { target });
            Ok(())
        }
        Command::SpawnEffect { effect } => {
            world.effects.push(effect);
            Ok(())
        }
        Command::SettleTick { dt } => {
            world.settle(dt, out_events);
            Ok(())
        }
        Command::PlaceTower { kind, origin } => world.place_tower(kind, origin, out_events),
        Command::SellTower { cell } => world.sell_tower(cell, out_events),
        Command::UpgradeTower { cell } => world.upgrade_tower(cell, out_events),
        Command::UnlockTower { kind } => world.unlock_tower(kind, out_events),
        Command::PickUpTower { cell } => world.pick_up_tower(cell, out_events),
        Command::DropHeldTower { origin } => world.drop_held_tower(origin, out_events),
        Command::CancelHold => world.cancel_hold(out_events),
    };

    if let Err(reason) = outcome {
        out_events.push(Event::ActionRejected { reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use burrow_defence_core::{
        difficulty_level, ActionError, AreaEffect, BoardSize, CellCoord, CellRect, EnemySnapshot, EnemyView,
        HeldTowerSnapshot, PathMaskView, ProjectileSnapshot, TowerKind, TowerSnapshot, TowerView,
        WaveStatus,
    };

    use super::{placement, World};

    /// Dimensions of the board.
    #[must_use]
    pub fn board(world: &World) -> BoardSize {
        world.board
    }

    /// Read-only view of the dilated path mask.
    #[must_use]
    pub fn path_view(world: &World) -> PathMaskView<'_> {
        PathMaskView::new(world.board, world.path.mask())
    }

    /// Centre-line cell sequence of the active path, corners included twice.
    #[must_use]
    pub fn path_route(world: &World) -> &[CellCoord] {
        world.path.cells()
    }

    /// Number of cells in the centre-line sequence.
    #[must_use]
    pub fn path_length(world: &World) -> usize {
        world.path.len()
    }

    /// Captures a read-only view of the living enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .filter(|enemy| enemy.is_alive())
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    tier: enemy.tier,
                    cell: world.enemy_cell(enemy),
                    progress: enemy.progress,
                    health: enemy.health,
                    max_health: enemy.max_health,
                    sleep_timer: enemy.sleep_timer,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the towers standing on the board.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Tower standing on the provided cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerSnapshot> {
        world
            .towers
            .iter()
            .find(|tower| tower.region.contains(cell))
            .map(|tower| tower.snapshot())
    }

    /// Tower currently lifted for relocation, if any.
    #[must_use]
    pub fn held_tower(world: &World) -> Option<HeldTowerSnapshot> {
        world.held.as_ref().map(|held| HeldTowerSnapshot {
            id: held.tower.id,
            kind: held.tower.kind,
            upgraded: held.tower.upgraded,
            original: held.original,
        })
    }

    /// Projectiles in flight, in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world.projectiles.iter().map(|projectile| projectile.snapshot()).collect()
    }

    /// Live cosmetic effects, in creation order.
    #[must_use]
    pub fn effects(world: &World) -> &[AreaEffect] {
        world.effects.as_slice()
    }

    /// Summary of the wave bookkeeping.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        WaveStatus {
            wave: world.wave,
            map_index: world.map_index,
            difficulty: difficulty_level(world.wave, world.map_index),
            wave_active: world.wave_active,
            spawn_remaining: world.spawn_remaining,
            enemies_alive: world.enemies.iter().filter(|enemy| enemy.is_alive()).count() as u32,
            path_width: world.current_map().path_width,
            game_over: world.game_over,
        }
    }

    /// Currency held by the player.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.economy.currency()
    }

    /// Lives left on the current map.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Reports whether the player can pay the provided price.
    #[must_use]
    pub fn can_afford(world: &World, cost: u32) -> bool {
        world.economy.can_afford(cost)
    }

    /// Reports whether the kind may be purchased.
    #[must_use]
    pub fn is_unlocked(world: &World, kind: TowerKind) -> bool {
        world.economy.is_unlocked(kind)
    }

    /// Kinds available for purchase, in shop order.
    #[must_use]
    pub fn unlocked_kinds(world: &World) -> Vec<TowerKind> {
        TowerKind::ALL
            .into_iter()
            .filter(|kind| world.economy.is_unlocked(*kind))
            .collect()
    }

    /// Validates a footprint without placing anything.
    ///
    /// The held tower's original slot counts as occupied.
    pub fn can_place(
        world: &World,
        kind: TowerKind,
        origin: CellCoord,
        upgraded: bool,
    ) -> Result<CellRect, ActionError> {
        placement::validate(&world.path, world.obstacles(None), kind, origin, upgraded)
    }

    /// Number of maps in the rotation.
    #[must_use]
    pub fn map_count(world: &World) -> usize {
        world.maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_defence_core::{AreaEffect, Health};

    fn corridor_world(currency: u32) -> World {
        World::with_config(WorldConfig {
            maps: vec![MapDefinition::new(
                vec![CellCoord::new(0, 5), CellCoord::new(20, 5)],
                1,
            )],
            seed: 7,
            starting_currency: currency,
            starting_lives: 3,
            starting_map: 0,
        })
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn spawn_standard(world: &mut World, max_hp: u32, speed: f32) -> Vec<Event> {
        run(
            world,
            Command::SpawnEnemy {
                tier: EnemyTier::Standard,
                max_hp,
                speed,
                lane_offset: 0,
            },
        )
    }

    fn rejected(events: &[Event]) -> Option<ActionError> {
        events.iter().find_map(|event| match event {
            Event::ActionRejected { reason } => Some(*reason),
            _ => None,
        })
    }

    #[test]
    fn placing_on_path_is_rejected_without_charge() {
        let mut world = corridor_world(90);
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin: CellCoord::new(4, 5),
            },
        );
        assert_eq!(rejected(&events), Some(ActionError::OnPath));
        assert_eq!(query::currency(&world), 90);
        assert!(query::tower_view(&world).is_empty());
    }

    #[test]
    fn placement_charges_and_sell_refunds() {
        let mut world = corridor_world(90);
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin: CellCoord::new(4, 6),
            },
        );
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { cost: 35, .. }]));
        assert_eq!(query::currency(&world), 55);
        let tower = query::tower_at(&world, CellCoord::new(4, 6)).expect("tower placed");
        assert!(tower.cooldown >= 0.05 && tower.cooldown < 0.85);

        let events = run(&mut world, Command::SellTower { cell: CellCoord::new(4, 6) });
        assert!(matches!(events.as_slice(), [Event::TowerSold { refund: 21, .. }]));
        assert_eq!(query::currency(&world), 76);
    }

    #[test]
    fn selling_empty_cell_is_a_no_op() {
        let mut world = corridor_world(90);
        let events = run(&mut world, Command::SellTower { cell: CellCoord::new(9, 9) });
        assert_eq!(rejected(&events), Some(ActionError::NoTower));
        assert_eq!(query::currency(&world), 90);
    }

    #[test]
    fn locked_kinds_require_unlock() {
        let mut world = corridor_world(2_000);
        let place = Command::PlaceTower {
            kind: TowerKind::Fat,
            origin: CellCoord::new(2, 7),
        };
        let events = run(&mut world, place.clone());
        assert_eq!(
            rejected(&events),
            Some(ActionError::Locked {
                kind: TowerKind::Fat
            })
        );
        let _ = run(&mut world, Command::UnlockTower { kind: TowerKind::Fat });
        assert_eq!(query::currency(&world), 1_450);
        let events = run(&mut world, place);
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
    }

    #[test]
    fn upgrade_is_one_time() {
        let mut world = corridor_world(500);
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin: CellCoord::new(4, 7),
            },
        );
        let cell = CellCoord::new(4, 7);
        let events = run(&mut world, Command::UpgradeTower { cell });
        assert!(matches!(events.as_slice(), [Event::TowerUpgraded { cost: 70, .. }]));
        let events = run(&mut world, Command::UpgradeTower { cell });
        assert_eq!(rejected(&events), Some(ActionError::AlreadyUpgraded));
        assert_eq!(query::currency(&world), 500 - 35 - 70);
    }

    #[test]
    fn start_wave_while_active_is_rejected() {
        let mut world = corridor_world(90);
        let events = run(&mut world, Command::StartWave);
        assert!(matches!(
            events.as_slice(),
            [Event::WaveStarted {
                wave: 1,
                difficulty: 1,
                spawn_count: 8
            }]
        ));
        let events = run(&mut world, Command::StartWave);
        assert_eq!(rejected(&events), Some(ActionError::WaveInProgress));
        assert_eq!(query::wave_status(&world).spawn_remaining, 8);
    }

    #[test]
    fn spawning_requires_remaining_budget() {
        let mut world = corridor_world(90);
        let events = spawn_standard(&mut world, 9, 1.0);
        assert_eq!(rejected(&events), Some(ActionError::NoSpawnsRemaining));
        let _ = run(&mut world, Command::StartWave);
        let events = spawn_standard(&mut world, 9, 1.0);
        assert!(matches!(events.as_slice(), [Event::EnemySpawned { .. }]));
        assert_eq!(query::wave_status(&world).spawn_remaining, 7);
    }

    #[test]
    fn repeated_damage_credits_bounty_once() {
        let mut world = corridor_world(0);
        let _ = run(&mut world, Command::StartWave);
        let _ = spawn_standard(&mut world, 1, 1.0);
        let enemy = EnemyId::new(0);
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(
                &mut world,
                Command::DamageEnemy {
                    enemy,
                    amount: 5,
                    source: TowerKind::Thunder,
                },
                &mut events,
            );
        }
        let kills = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count();
        assert_eq!(kills, 1);
        assert_eq!(query::currency(&world), 12);
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn surviving_hit_leaves_marker() {
        let mut world = corridor_world(0);
        let _ = run(&mut world, Command::StartWave);
        let _ = spawn_standard(&mut world, 9, 1.0);
        let events = run(
            &mut world,
            Command::DamageEnemy {
                enemy: EnemyId::new(0),
                amount: 4,
                source: TowerKind::Fat,
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::EnemyDamaged { remaining, .. }] if *remaining == Health::new(5)
        ));
        assert!(matches!(
            query::effects(&world),
            [AreaEffect::HitMarker { time_left, .. }] if (*time_left - 0.22).abs() < 1e-6
        ));
    }

    #[test]
    fn leaked_enemies_cost_lives_and_end_the_game() {
        let mut world = corridor_world(0);
        let _ = run(&mut world, Command::StartWave);
        for _ in 0..3 {
            let _ = spawn_standard(&mut world, 9, 100.0);
        }
        let events = run(&mut world, Command::Tick { dt: Duration::from_secs(1) });
        let leaks = events
            .iter()
            .filter(|event| matches!(event, Event::EnemyLeaked { .. }))
            .count();
        assert_eq!(leaks, 3);
        assert_eq!(query::lives(&world), 0);

        let events = run(&mut world, Command::SettleTick { dt: Duration::from_millis(16) });
        assert!(events.contains(&Event::GameOver { wave: 1 }));
        let events = run(&mut world, Command::StartWave);
        assert_eq!(rejected(&events), Some(ActionError::GameOver));
    }

    #[test]
    fn projectile_resolves_against_nearest_enemy() {
        let mut world = corridor_world(0);
        let _ = run(&mut world, Command::StartWave);
        let _ = spawn_standard(&mut world, 9, 0.0);
        let _ = run(
            &mut world,
            Command::LaunchProjectile {
                origin: CellPoint::new(0.0, 7.0),
                target: CellCoord::new(0, 5),
                damage: 3,
            },
        );
        let mut resolved = None;
        for _ in 0..10 {
            let events = run(&mut world, Command::SettleTick { dt: Duration::from_millis(16) });
            if let Some(enemy) = events.iter().find_map(|event| match event {
                Event::ProjectileResolved { enemy, .. } => Some(*enemy),
                _ => None,
            }) {
                resolved = Some(enemy);
                break;
            }
        }
        assert_eq!(resolved, Some(Some(EnemyId::new(0))));
        assert!(query::projectiles(&world).is_empty());
        let hp = query::enemy_view(&world).iter().next().map(|enemy| enemy.health);
        assert_eq!(hp, Some(Health::new(6)));
    }

    #[test]
    fn wave_completes_and_pays_reward() {
        let mut world = corridor_world(0);
        let _ = run(&mut world, Command::StartWave);
        for _ in 0..8 {
            let _ = spawn_standard(&mut world, 1, 0.0);
        }
        for id in 0..8 {
            let _ = run(
                &mut world,
                Command::DamageEnemy {
                    enemy: EnemyId::new(id),
                    amount: 1,
                    source: TowerKind::Kitty,
                },
            );
        }
        let events = run(&mut world, Command::SettleTick { dt: Duration::from_millis(16) });
        assert!(events.contains(&Event::WaveCompleted { wave: 1, reward: 23 }));
        assert_eq!(query::currency(&world), 8 * 12 + 23);
        assert!(!query::wave_status(&world).wave_active);
    }

    #[test]
    fn pick_up_blocks_selling_and_cancel_restores() {
        let mut world = corridor_world(90);
        let origin = CellCoord::new(6, 8);
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin,
            },
        );
        let _ = run(&mut world, Command::PickUpTower { cell: origin });
        assert!(query::held_tower(&world).is_some());
        assert!(query::tower_view(&world).is_empty());

        let events = run(&mut world, Command::SellTower { cell: origin });
        assert_eq!(rejected(&events), Some(ActionError::AlreadyHolding));
        assert_eq!(
            query::can_place(&world, TowerKind::Default, origin, false),
            Err(ActionError::Occupied)
        );

        let events = run(&mut world, Command::CancelHold);
        assert!(matches!(events.as_slice(), [Event::HoldCancelled { .. }]));
        assert_eq!(
            query::tower_at(&world, origin).map(|tower| tower.region.origin()),
            Some(origin)
        );
    }

    #[test]
    fn held_tower_drops_at_new_origin() {
        let mut world = corridor_world(90);
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin: CellCoord::new(6, 8),
            },
        );
        let _ = run(&mut world, Command::PickUpTower { cell: CellCoord::new(6, 8) });
        let events = run(&mut world, Command::DropHeldTower { origin: CellCoord::new(6, 5) });
        assert_eq!(rejected(&events), Some(ActionError::OnPath));
        let events = run(&mut world, Command::DropHeldTower { origin: CellCoord::new(9, 9) });
        assert!(matches!(events.as_slice(), [Event::TowerDropped { .. }]));
        assert!(query::held_tower(&world).is_none());
        assert!(query::tower_at(&world, CellCoord::new(9, 9)).is_some());
    }

    #[test]
    fn catatonic_upgrade_respects_separation() {
        let mut world = corridor_world(5_000);
        let _ = run(&mut world, Command::UnlockTower { kind: TowerKind::Catatonic });
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Catatonic,
                origin: CellCoord::new(2, 9),
            },
        );
        let events = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Catatonic,
                origin: CellCoord::new(6, 9),
            },
        );
        assert_eq!(rejected(&events), Some(ActionError::PulseTooClose));
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Catatonic,
                origin: CellCoord::new(7, 9),
            },
        );
        let before = query::currency(&world);
        let events = run(&mut world, Command::UpgradeTower { cell: CellCoord::new(7, 9) });
        assert_eq!(rejected(&events), Some(ActionError::PulseTooClose));
        assert_eq!(query::currency(&world), before);
    }

    #[test]
    fn relocation_refuses_occupied_cells() {
        let mut world = corridor_world(500);
        for origin in [CellCoord::new(3, 8), CellCoord::new(4, 8)] {
            let _ = run(
                &mut world,
                Command::PlaceTower {
                    kind: TowerKind::Default,
                    origin,
                },
            );
        }
        let events = run(
            &mut world,
            Command::RelocateTower {
                tower: TowerId::new(0),
                destination: CellCoord::new(4, 8),
            },
        );
        assert_eq!(rejected(&events), Some(ActionError::Occupied));
        let events = run(
            &mut world,
            Command::RelocateTower {
                tower: TowerId::new(0),
                destination: CellCoord::new(3, 9),
            },
        );
        assert!(events.contains(&Event::TowerRelocated {
            tower: TowerId::new(0),
            from: CellCoord::new(3, 8),
            to: CellCoord::new(3, 9),
        }));
    }

    #[test]
    fn tenth_wave_advances_map_and_keeps_currency() {
        let maps = vec![
            MapDefinition::new(vec![CellCoord::new(0, 5), CellCoord::new(20, 5)], 1),
            MapDefinition::new(vec![CellCoord::new(0, 9), CellCoord::new(20, 9)], 2),
        ];
        let mut world = World::with_config(WorldConfig {
            maps,
            seed: 1,
            starting_currency: 90,
            starting_lives: 9,
            starting_map: 0,
        });
        let _ = run(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Default,
                origin: CellCoord::new(1, 1),
            },
        );
        let dt = Duration::from_millis(16);
        let mut advanced = false;
        for _ in 0..10 {
            let _ = run(&mut world, Command::StartWave);
            let remaining = query::wave_status(&world).spawn_remaining;
            for _ in 0..remaining {
                let _ = spawn_standard(&mut world, 1, 0.0);
            }
            for enemy in query::enemy_view(&world).into_vec() {
                let _ = run(
                    &mut world,
                    Command::DamageEnemy {
                        enemy: enemy.id,
                        amount: 1,
                        source: TowerKind::Default,
                    },
                );
            }
            let events = run(&mut world, Command::SettleTick { dt });
            advanced |= events.contains(&Event::MapAdvanced { map_index: 1 });
        }
        assert!(advanced);
        let status = query::wave_status(&world);
        assert_eq!(status.map_index, 1);
        assert_eq!(status.path_width, 2);
        assert_eq!(difficulty_level(status.wave + 1, status.map_index), 1 + 2);
        assert!(query::tower_view(&world).is_empty());
        assert!(query::currency(&world) > 55);
        assert_eq!(query::lives(&world), 9);
        assert!(query::path_view(&world).is_path(CellCoord::new(3, 10)));
    }
}
