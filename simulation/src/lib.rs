#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation clock that sequences the systems and the world once per tick.
//!
//! The clock is the single serialized entry point of a session: ticks and
//! player inputs both arrive as [`Signal`]s and run to completion before the
//! next one is accepted. Readers observe the session through [`Snapshot`]s
//! taken between signals.

mod config;
mod sound;

use std::time::Duration;

use burrow_defence_core::{
    AreaEffect, BoardSize, CellCoord, CellRect, Command, EnemySnapshot, Event, HeldTowerSnapshot,
    PlayerInput, ProjectileSnapshot, SoundCue, TowerKind, TowerSnapshot, WaveStatus,
    FAST_FORWARD_MULTIPLIER, TICK_PERIOD,
};
use burrow_defence_system_builder::Builder;
use burrow_defence_system_jump_planner::{self as jump_planner, JumpPlanner};
use burrow_defence_system_tower_combat::{self as tower_combat, TowerCombat};
use burrow_defence_system_wave_director::{self as wave_director, default_spawn_interval, WaveDirector};
use burrow_defence_world::{apply, query, World};
use tracing::{debug, info};

pub use config::{Config, ConfigError, MapConfig, OpeningTower, WaveConfig};
use sound::SoundQueue;

const WAVE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const JUMP_STREAM: u64 = 0xbf58_476d_1ce4_e5b9;
const COMBAT_STREAM: u64 = 0x94d0_49bb_1331_11eb;

/// Work item accepted by the serialized entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// The timer reports that a tick is due.
    Tick,
    /// The player issued an input.
    Input(PlayerInput),
}

/// Read-only view of a session between signals.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Number of ticks simulated so far.
    pub tick: u64,
    /// Dimensions of the board.
    pub board: BoardSize,
    /// Cells covered by the path mask, in row-major order.
    pub path_cells: Vec<CellCoord>,
    /// Number of cells in the path sequence.
    pub path_length: usize,
    /// Living enemies ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Placed towers ordered by identifier.
    pub towers: Vec<TowerSnapshot>,
    /// Tower currently lifted by the player.
    pub held: Option<HeldTowerSnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Cosmetic effects still on screen.
    pub effects: Vec<AreaEffect>,
    /// Currency held by the player.
    pub currency: u32,
    /// Lives left on the current map.
    pub lives: u32,
    /// Kinds available for purchase.
    pub unlocked: Vec<TowerKind>,
    /// Wave bookkeeping, including the game-over flag.
    pub wave: WaveStatus,
    /// Cell under the player's cursor.
    pub cursor: CellCoord,
    /// Kind bought by the next placement.
    pub selected: TowerKind,
    /// Indicates whether waves start automatically.
    pub auto_wave: bool,
    /// Indicates whether the time slice is scaled up.
    pub fast_forward: bool,
}

/// Tower defence session driven one signal at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    wave_director: WaveDirector,
    jump_planner: JumpPlanner,
    tower_combat: TowerCombat,
    builder: Builder,
    auto_wave: bool,
    fast_forward: bool,
    tick: u64,
    inbox: Vec<Event>,
    events: Vec<Event>,
    commands: Vec<Command>,
    sounds: SoundQueue,
}

impl Simulation {
    /// Creates a session from a validated configuration and buys its opening towers.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut simulation = Self::assemble(config);
        for tower in &config.towers {
            simulation.buy_opening_tower(tower);
        }
        let _ = simulation.sounds.drain();
        Ok(simulation)
    }

    fn assemble(config: &Config) -> Self {
        let world = World::with_config(config.world_config());
        let board = query::board(&world);
        Self {
            world,
            wave_director: WaveDirector::new(wave_director::Config::new(
                default_spawn_interval(),
                config.seed ^ WAVE_STREAM,
                config.waves.into(),
            )),
            jump_planner: JumpPlanner::new(jump_planner::Config::new(config.seed ^ JUMP_STREAM)),
            tower_combat: TowerCombat::new(tower_combat::Config::new(config.seed ^ COMBAT_STREAM)),
            builder: Builder::new(board),
            auto_wave: false,
            fast_forward: false,
            tick: 0,
            inbox: Vec::new(),
            events: Vec::new(),
            commands: Vec::new(),
            sounds: SoundQueue::default(),
        }
    }

    /// Routes a signal to the tick loop or to the input handler.
    ///
    /// Returns whether an input was accepted; ticks always report `true`.
    pub fn dispatch(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Tick => {
                self.tick();
                true
            }
            Signal::Input(input) => self.handle_input(input),
        }
    }

    /// Effective time slice of the next tick.
    #[must_use]
    pub fn effective_dt(&self) -> Duration {
        if self.fast_forward {
            let millis = TICK_PERIOD.as_millis() as f32 * FAST_FORWARD_MULTIPLIER;
            Duration::from_millis(millis.round() as u64)
        } else {
            TICK_PERIOD
        }
    }

    /// Advances the session by one fixed step; a finished game stays frozen.
    pub fn tick(&mut self) {
        if query::wave_status(&self.world).game_over {
            return;
        }
        let dt = self.effective_dt();
        self.tick += 1;
        self.events.clear();

        let status = query::wave_status(&self.world);
        self.wave_director
            .handle(&self.inbox, &status, dt, &mut self.commands);
        self.inbox.clear();
        self.flush_commands();

        self.execute(Command::Tick { dt });

        let enemies = query::enemy_view(&self.world);
        let towers = query::tower_view(&self.world);
        let held_origin = query::held_tower(&self.world)
            .map(|held| CellRect::square(held.original, held.kind.footprint()));
        self.jump_planner.handle(
            &towers,
            &enemies,
            query::path_view(&self.world),
            held_origin,
            &mut self.commands,
        );
        self.flush_commands();

        let towers = query::tower_view(&self.world);
        self.tower_combat.handle(
            &towers,
            &enemies,
            query::board(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        self.execute(Command::SettleTick { dt });
        self.settle_events();
    }

    /// Applies a player input; returns `false` when it was rejected.
    pub fn handle_input(&mut self, input: PlayerInput) -> bool {
        if query::wave_status(&self.world).game_over {
            return false;
        }
        self.events.clear();

        match input {
            PlayerInput::ToggleFastForward => {
                self.fast_forward = !self.fast_forward;
                debug!(fast_forward = self.fast_forward, "toggled fast forward");
                return true;
            }
            PlayerInput::ToggleAutoWave => {
                self.auto_wave = !self.auto_wave;
                debug!(auto_wave = self.auto_wave, "toggled automatic waves");
                if self.auto_wave && !query::wave_status(&self.world).wave_active {
                    self.execute(Command::StartWave);
                    self.settle_events();
                }
                return true;
            }
            PlayerInput::StartWave => self.auto_wave = false,
            _ => {}
        }

        let world = &self.world;
        let handled = self
            .builder
            .handle(input, |kind| query::is_unlocked(world, kind), &mut self.commands);
        self.flush_commands();
        let accepted = !self
            .events
            .iter()
            .any(|event| matches!(event, Event::ActionRejected { .. }));
        self.settle_events();
        handled && accepted
    }

    /// Captures a read-only view of the session.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let board = query::board(&self.world);
        let path = query::path_view(&self.world);
        Snapshot {
            tick: self.tick,
            board,
            path_cells: board.cells().filter(|cell| path.is_path(*cell)).collect(),
            path_length: query::path_length(&self.world),
            enemies: query::enemy_view(&self.world).into_vec(),
            towers: query::tower_view(&self.world).into_vec(),
            held: query::held_tower(&self.world),
            projectiles: query::projectiles(&self.world),
            effects: query::effects(&self.world).to_vec(),
            currency: query::currency(&self.world),
            lives: query::lives(&self.world),
            unlocked: query::unlocked_kinds(&self.world),
            wave: query::wave_status(&self.world),
            cursor: self.builder.cursor(),
            selected: self.builder.selected(),
            auto_wave: self.auto_wave,
            fast_forward: self.fast_forward,
        }
    }

    /// Drains the audio cues queued since the previous call.
    pub fn sound_events(&mut self) -> Vec<SoundCue> {
        self.sounds.drain()
    }

    fn buy_opening_tower(&mut self, tower: &OpeningTower) {
        self.events.clear();
        if !query::is_unlocked(&self.world, tower.kind) {
            self.execute(Command::UnlockTower { kind: tower.kind });
        }
        self.execute(Command::PlaceTower {
            kind: tower.kind,
            origin: tower.origin(),
        });
        if tower.upgraded {
            self.execute(Command::UpgradeTower {
                cell: tower.origin(),
            });
        }
        self.settle_events();
    }

    fn execute(&mut self, command: Command) {
        apply(&mut self.world, command, &mut self.events);
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Reacts to the events gathered since the last call and hands them to
    /// the systems that consume events.
    fn settle_events(&mut self) {
        let mut start_next_wave = false;
        for event in &self.events {
            match event {
                Event::WaveStarted {
                    wave,
                    difficulty,
                    spawn_count,
                } => info!(wave, difficulty, spawn_count, "wave started"),
                Event::WaveCompleted { wave, reward } => {
                    info!(wave, reward, "wave completed");
                    start_next_wave = self.auto_wave;
                }
                Event::MapAdvanced { map_index } => {
                    info!(map_index, "advanced to next map");
                    self.auto_wave = false;
                    start_next_wave = false;
                }
                Event::GameOver { wave } => {
                    info!(wave, "game over");
                    self.auto_wave = false;
                    start_next_wave = false;
                }
                Event::TowerRelocated { tower, from, to } => {
                    debug!(tower = tower.get(), ?from, ?to, "mobile tower jumped");
                }
                Event::ActionRejected { reason } => debug!(%reason, "action rejected"),
                _ => {}
            }
        }

        if start_next_wave {
            self.execute(Command::StartWave);
            if let Some(Event::WaveStarted {
                wave,
                difficulty,
                spawn_count,
            }) = self.events.last()
            {
                info!(wave, difficulty, spawn_count, "wave started automatically");
            }
        }

        self.builder.observe(&self.events);
        self.sounds.record(&self.events);
        self.inbox.append(&mut self.events);
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::assemble(&Config::default())
    }
}
