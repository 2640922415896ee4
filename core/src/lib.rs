#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Burrow Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and the simulation clock
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what actually changed. Illegal requests never abort a
//! tick: the world answers them with [`Event::ActionRejected`] carrying an
//! [`ActionError`] and leaves its state untouched.

pub mod geometry;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cell columns on the board.
pub const BOARD_COLUMNS: u32 = 48;

/// Number of cell rows on the board.
pub const BOARD_ROWS: u32 = 28;

/// Fixed wall-clock period between two simulation ticks.
pub const TICK_PERIOD: Duration = Duration::from_millis(16);

/// Global pacing multiplier applied to enemy speed, spawn cadence and tower cooldowns.
pub const PACING_MULTIPLIER: f32 = 1.3;

/// Factor applied to the effective time slice while fast-forward is enabled.
pub const FAST_FORWARD_MULTIPLIER: f32 = 5.0;

/// Currency granted at the start of a session.
pub const STARTING_CURRENCY: u32 = 90;

/// Lives granted at the start of a session and after every map advance.
pub const STARTING_LIVES: u32 = 9;

/// Number of completed waves after which the world advances to the next map.
pub const WAVES_PER_MAP: u32 = 10;

/// Upper bound on the sleep timer a pulse can stack onto a single enemy, in seconds.
pub const MAX_SLEEP_SECONDS: f32 = 2.5;

/// Computes the difficulty level for a wave on a map.
///
/// Difficulty restarts every [`WAVES_PER_MAP`] waves, while every map index
/// raises the floor by two. Wave zero (no wave started yet) is treated as the
/// first wave.
#[must_use]
pub const fn difficulty_level(wave: u32, map_index: u32) -> u32 {
    let local = wave.saturating_sub(1) % WAVES_PER_MAP + 1;
    local + map_index * 2
}

/// Number of enemies a wave of the provided difficulty spawns.
#[must_use]
pub const fn wave_spawn_count(difficulty: u32) -> u32 {
    6 + difficulty * 2
}

/// Currency credited when a wave completes.
#[must_use]
pub const fn wave_reward(wave: u32) -> u32 {
    20 + wave * 3
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins the next wave when no wave is active and the game is running.
    StartWave,
    /// Introduces a new enemy at the start of the path.
    SpawnEnemy {
        /// Tier assigned to the enemy.
        tier: EnemyTier,
        /// Hit points the enemy starts with.
        max_hp: u32,
        /// Movement speed in path cells per second.
        speed: f32,
        /// Perpendicular displacement from the path centre line.
        lane_offset: i32,
    },
    /// Advances enemy movement and tower cooldowns by the effective time slice.
    Tick {
        /// Effective duration of simulated time covered by the tick.
        dt: Duration,
    },
    /// Moves a tower to a new origin cell as the outcome of a jump.
    RelocateTower {
        /// Identifier of the tower that jumps.
        tower: TowerId,
        /// Origin cell the tower lands on.
        destination: CellCoord,
    },
    /// Commits a tower's shot and restarts its cooldown.
    FireTower {
        /// Identifier of the tower that fired.
        tower: TowerId,
        /// Cooldown, in seconds, before the tower may fire again.
        cooldown: f32,
    },
    /// Applies damage to a single enemy.
    DamageEnemy {
        /// Identifier of the enemy that is hit.
        enemy: EnemyId,
        /// Damage subtracted from the enemy's hit points.
        amount: u32,
        /// Kind of tower whose attack caused the damage.
        source: TowerKind,
    },
    /// Extends an enemy's sleep timer.
    SleepEnemy {
        /// Identifier of the enemy put to sleep.
        enemy: EnemyId,
        /// Seconds added to the sleep timer before clamping.
        duration: f32,
    },
    /// Pushes an enemy backwards along the path.
    KnockBackEnemy {
        /// Identifier of the enemy that is displaced.
        enemy: EnemyId,
        /// Distance in path cells subtracted from the enemy's progress.
        distance: f32,
    },
    /// Launches a projectile towards a frozen target cell.
    LaunchProjectile {
        /// Point the projectile starts from.
        origin: CellPoint,
        /// Cell the projectile flies towards.
        target: CellCoord,
        /// Damage dealt to whichever enemy is captured at impact.
        damage: u32,
    },
    /// Records a cosmetic area effect.
    SpawnEffect {
        /// Effect to record.
        effect: AreaEffect,
    },
    /// Runs the end-of-tick phases: projectiles, effect decay, cleanup and
    /// the wave-completion and game-over checks.
    SettleTick {
        /// Effective duration of simulated time covered by the tick.
        dt: Duration,
    },
    /// Purchases and places a tower of the provided kind.
    PlaceTower {
        /// Kind of tower to construct.
        kind: TowerKind,
        /// Upper-left cell of the tower footprint.
        origin: CellCoord,
    },
    /// Sells the tower covering the provided cell.
    SellTower {
        /// Any cell within the footprint of the tower to sell.
        cell: CellCoord,
    },
    /// Upgrades the tower covering the provided cell.
    UpgradeTower {
        /// Any cell within the footprint of the tower to upgrade.
        cell: CellCoord,
    },
    /// Pays the one-time unlock price for a tower kind.
    UnlockTower {
        /// Kind of tower to unlock.
        kind: TowerKind,
    },
    /// Lifts the tower covering the provided cell so it can be relocated.
    PickUpTower {
        /// Any cell within the footprint of the tower to lift.
        cell: CellCoord,
    },
    /// Places the held tower at the provided origin.
    DropHeldTower {
        /// Upper-left cell of the new footprint.
        origin: CellCoord,
    },
    /// Returns the held tower to the cell it was lifted from.
    CancelHold,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Effective duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces the start of a wave.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
        /// Difficulty level the wave was generated for.
        difficulty: u32,
        /// Number of enemies the wave will spawn.
        spawn_count: u32,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Tier of the enemy.
        tier: EnemyTier,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the leak.
        lives_remaining: u32,
    },
    /// Reports that an enemy survived a hit.
    EnemyDamaged {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Damage applied.
        amount: u32,
        /// Hit points left after the hit.
        remaining: Health,
    },
    /// Reports that an enemy was killed and its bounty credited.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Tier of the enemy that died.
        tier: EnemyTier,
        /// Currency credited for the kill.
        bounty: u32,
    },
    /// Reports that an enemy's sleep timer was extended.
    EnemySlept {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Sleep timer after the extension, in seconds.
        sleep_timer: f32,
    },
    /// Reports that an enemy was pushed backwards along the path.
    EnemyKnockedBack {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Path progress after the push.
        progress: f32,
    },
    /// Confirms that a tower fired.
    TowerFired {
        /// Identifier of the tower.
        tower: TowerId,
        /// Kind of the tower.
        kind: TowerKind,
    },
    /// Confirms that a projectile was launched.
    ProjectileLaunched {
        /// Frozen target cell of the projectile.
        target: CellCoord,
    },
    /// Reports that a projectile reached its target cell.
    ProjectileResolved {
        /// Frozen target cell of the projectile.
        target: CellCoord,
        /// Enemy captured at impact, if any was within the capture radius.
        enemy: Option<EnemyId>,
    },
    /// Confirms that a tower was purchased and placed.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower placed.
        kind: TowerKind,
        /// Cells covered by the tower.
        region: CellRect,
        /// Currency paid.
        cost: u32,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Kind of the sold tower.
        kind: TowerKind,
        /// Currency refunded.
        refund: u32,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Kind of the upgraded tower.
        kind: TowerKind,
        /// Currency paid.
        cost: u32,
    },
    /// Confirms that a tower kind was unlocked.
    TowerUnlocked {
        /// Kind that became available.
        kind: TowerKind,
        /// Currency paid.
        cost: u32,
    },
    /// Confirms that a tower was lifted for relocation.
    TowerPickedUp {
        /// Identifier of the lifted tower.
        tower: TowerId,
    },
    /// Confirms that the held tower was dropped at a new location.
    TowerDropped {
        /// Identifier of the tower.
        tower: TowerId,
        /// Cells covered after the drop.
        region: CellRect,
    },
    /// Confirms that the held tower returned to its original location.
    HoldCancelled {
        /// Identifier of the tower.
        tower: TowerId,
        /// Cells covered after the return.
        region: CellRect,
    },
    /// Confirms that a mobile tower jumped.
    TowerRelocated {
        /// Identifier of the tower.
        tower: TowerId,
        /// Origin cell before the jump.
        from: CellCoord,
        /// Origin cell after the jump.
        to: CellCoord,
    },
    /// Announces that a wave finished and its reward was credited.
    WaveCompleted {
        /// Number of the completed wave.
        wave: u32,
        /// Currency credited.
        reward: u32,
    },
    /// Announces that the world moved on to the next map.
    MapAdvanced {
        /// Catalogue index of the new map.
        map_index: u32,
    },
    /// Announces that the last life was lost.
    GameOver {
        /// Wave during which the game ended.
        wave: u32,
    },
    /// Reports that a command was rejected without changing the world.
    ActionRejected {
        /// Reason the command was refused.
        reason: ActionError,
    },
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionError {
    /// The game has ended and accepts no further mutations.
    #[error("the game is over")]
    GameOver,
    /// A wave is already running.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// The active wave has no enemies left to spawn.
    #[error("no spawns remain in the current wave")]
    NoSpawnsRemaining,
    /// The requested tower kind has not been unlocked.
    #[error("{kind:?} towers are locked")]
    Locked {
        /// Kind that is still locked.
        kind: TowerKind,
    },
    /// The requested tower kind is already available.
    #[error("{kind:?} towers are already unlocked")]
    AlreadyUnlocked {
        /// Kind that was already unlocked.
        kind: TowerKind,
    },
    /// The player cannot pay the requested price.
    #[error("{required} currency required but only {available} available")]
    InsufficientFunds {
        /// Price of the action.
        required: u32,
        /// Currency held by the player.
        available: u32,
    },
    /// The footprint extends beyond the board.
    #[error("the footprint extends beyond the board")]
    OutOfBounds,
    /// The footprint covers a path cell.
    #[error("the footprint covers the path")]
    OnPath,
    /// The footprint overlaps another tower.
    #[error("the footprint overlaps another tower")]
    Occupied,
    /// A pulse tower would overlap another pulse tower's radius.
    #[error("too close to another pulse tower")]
    PulseTooClose,
    /// No tower covers the requested cell.
    #[error("no tower at the requested cell")]
    NoTower,
    /// The tower was already upgraded.
    #[error("the tower is already upgraded")]
    AlreadyUpgraded,
    /// A tower is already being held.
    #[error("a tower is already held")]
    AlreadyHolding,
    /// No tower is being held.
    #[error("no tower is held")]
    NotHolding,
    /// The referenced tower does not exist.
    #[error("unknown tower")]
    UnknownTower,
    /// The referenced enemy does not exist or is already dead.
    #[error("unknown enemy")]
    UnknownEnemy,
}

/// Player commands accepted by the simulation's input entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Moves the cursor by the provided offset, clamped to the board.
    MoveCursor {
        /// Horizontal offset in cells.
        dx: i32,
        /// Vertical offset in cells.
        dy: i32,
    },
    /// Selects a tower kind, paying for its unlock first when required.
    SelectTower {
        /// Kind to select.
        kind: TowerKind,
    },
    /// Places the selected kind at the cursor, or drops the held tower there.
    Place,
    /// Lifts the tower under the cursor.
    PickUp,
    /// Drops the held tower at the cursor.
    MoveHeld,
    /// Returns the held tower to its original cell.
    CancelHold,
    /// Sells the tower under the cursor.
    Sell,
    /// Upgrades the tower under the cursor.
    Upgrade,
    /// Starts the next wave and disables auto-advance.
    StartWave,
    /// Toggles automatic wave advance.
    ToggleAutoWave,
    /// Toggles the fast-forward time scale.
    ToggleFastForward,
}

/// Abstract audio cues emitted for an external audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A wave began.
    WaveStarted,
    /// A wave was cleared.
    WaveCompleted,
    /// An enemy died.
    EnemyDied,
    /// An enemy reached the end of the path.
    LifeLost,
    /// A tower of the provided kind fired.
    TowerFired(TowerKind),
    /// A tower was placed.
    TowerPlaced,
    /// A tower was sold.
    TowerSold,
    /// A tower was upgraded.
    TowerUpgraded,
    /// A tower kind was unlocked.
    TowerUnlocked,
    /// The world moved to a new map.
    MapChanged,
    /// The game ended.
    GameOver,
}

impl SoundCue {
    /// Stable event name used by audio collaborators to look up playback.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WaveStarted => "wave_start",
            Self::WaveCompleted => "wave_complete",
            Self::EnemyDied => "rat_die",
            Self::LifeLost => "life_lost",
            Self::TowerFired(TowerKind::Default) => "tower_default_shoot",
            Self::TowerFired(TowerKind::Thunder) => "tower_thunder_shoot",
            Self::TowerFired(TowerKind::Fat) => "tower_fat_shoot",
            Self::TowerFired(TowerKind::Kitty) => "tower_kitty_shoot",
            Self::TowerFired(TowerKind::Catatonic) => "tower_catatonic_shoot",
            Self::TowerFired(TowerKind::Galactic) => "tower_galactic_shoot",
            Self::TowerPlaced => "place",
            Self::TowerSold => "sell",
            Self::TowerUpgraded => "upgrade",
            Self::TowerUnlocked => "unlock",
            Self::MapChanged => "map_change",
            Self::GameOver => "game_over",
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hit points carried by an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Subtracts damage without dropping below zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the cell displaced by the provided offset when it stays on the board.
    #[must_use]
    pub fn offset(self, dx: i64, dy: i64, board: BoardSize) -> Option<CellCoord> {
        let column = i64::from(self.column) + dx;
        let row = i64::from(self.row) + dy;
        board.cell_at(column, row)
    }

    /// Centre of the cell expressed as a continuous point.
    #[must_use]
    pub fn to_point(self) -> CellPoint {
        CellPoint::new(self.column as f32, self.row as f32)
    }
}

/// Continuous position measured in cell units.
///
/// Integer values coincide with cell coordinates; a tower's footprint centre
/// may fall between cells.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new continuous point.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Vertical component of the point.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Squared Euclidean distance to the provided cell.
    #[must_use]
    pub fn distance_squared_to(&self, cell: CellCoord) -> f32 {
        let dx = cell.column() as f32 - self.column;
        let dy = cell.row() as f32 - self.row;
        dx * dx + dy * dy
    }

    /// Rounds the point to the nearest cell, or `None` when that cell is off the board.
    #[must_use]
    pub fn nearest_cell(&self, board: BoardSize) -> Option<CellCoord> {
        board.cell_at(self.column.round() as i64, self.row.round() as i64)
    }
}

/// Dimensions of the playing board measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    columns: u32,
    rows: u32,
}

impl BoardSize {
    /// Creates a new board size.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Board used by every built-in map.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(BOARD_COLUMNS, BOARD_ROWS)
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Converts signed coordinates into a board cell when they are in bounds.
    #[must_use]
    pub fn cell_at(&self, column: i64, row: i64) -> Option<CellCoord> {
        if column < 0 || row < 0 {
            return None;
        }
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        let cell = CellCoord::new(column, row);
        self.contains(cell).then_some(cell)
    }

    /// Clamps signed coordinates onto the board.
    #[must_use]
    pub fn clamp(&self, column: i64, row: i64) -> CellCoord {
        let max_column = i64::from(self.columns.saturating_sub(1));
        let max_row = i64::from(self.rows.saturating_sub(1));
        CellCoord::new(
            column.clamp(0, max_column) as u32,
            row.clamp(0, max_row) as u32,
        )
    }

    /// Row-major index of an in-bounds cell.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Constructs the square footprint of a tower.
    #[must_use]
    pub const fn square(origin: CellCoord, side: u32) -> Self {
        Self::from_origin_and_size(origin, CellRectSize::new(side, side))
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = cell.column();
        let row = cell.row();
        column >= self.origin.column()
            && row >= self.origin.row()
            && u64::from(column) < u64::from(self.origin.column()) + u64::from(self.size.width())
            && u64::from(row) < u64::from(self.origin.row()) + u64::from(self.size.height())
    }

    /// Reports whether two rectangles share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &CellRect) -> bool {
        let (ax1, ay1) = (u64::from(self.origin.column()), u64::from(self.origin.row()));
        let (bx1, by1) = (u64::from(other.origin.column()), u64::from(other.origin.row()));
        let ax2 = ax1 + u64::from(self.size.width());
        let ay2 = ay1 + u64::from(self.size.height());
        let bx2 = bx1 + u64::from(other.size.width());
        let by2 = by1 + u64::from(other.size.height());
        ax1 < bx2 && bx1 < ax2 && ay1 < by2 && by1 < ay2
    }

    /// Reports whether the rectangle lies entirely on the board.
    #[must_use]
    pub fn fits(&self, board: BoardSize) -> bool {
        let right = u64::from(self.origin.column()) + u64::from(self.size.width());
        let bottom = u64::from(self.origin.row()) + u64::from(self.size.height());
        right <= u64::from(board.columns()) && bottom <= u64::from(board.rows())
    }

    /// Iterates the cells covered by the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let width = self.size.width();
        (0..self.size.height()).flat_map(move |dy| {
            (0..width).map(move |dx| CellCoord::new(origin.column() + dx, origin.row() + dy))
        })
    }

    /// Centre of the rectangle expressed in cell units.
    #[must_use]
    pub fn center(&self) -> CellPoint {
        CellPoint::new(
            self.origin.column() as f32 + (self.size.width() as f32 - 1.0) / 2.0,
            self.origin.row() as f32 + (self.size.height() as f32 - 1.0) / 2.0,
        )
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Authoring description of a map: ordered path anchors and corridor width.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Ordered anchors; consecutive anchors must share a row or a column.
    pub anchors: Vec<CellCoord>,
    /// Corridor width; a width of `w` dilates every path cell by `w - 1` cells.
    pub path_width: u32,
}

impl MapDefinition {
    /// Creates a map definition.
    #[must_use]
    pub fn new(anchors: Vec<CellCoord>, path_width: u32) -> Self {
        Self {
            anchors,
            path_width,
        }
    }

    /// Reports whether every consecutive anchor pair is axis aligned.
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        self.anchors
            .windows(2)
            .all(|pair| pair[0].column() == pair[1].column() || pair[0].row() == pair[1].row())
    }
}

/// Strength classes of enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyTier {
    /// Fragile, quick enemies that never leave the mix.
    Weak,
    /// Baseline enemy.
    Standard,
    /// Sturdy enemy unlocked at higher difficulty.
    Elite,
    /// Rare, very sturdy enemy unlocked on later maps.
    Boss,
}

impl EnemyTier {
    /// Every tier in ascending strength.
    pub const ALL: [EnemyTier; 4] = [Self::Weak, Self::Standard, Self::Elite, Self::Boss];

    /// Currency credited when an enemy of this tier dies.
    #[must_use]
    pub const fn bounty(self) -> u32 {
        match self {
            Self::Weak => 8,
            Self::Standard => 12,
            Self::Elite => 25,
            Self::Boss => 60,
        }
    }

    /// Factor applied to the base hit points.
    #[must_use]
    pub const fn hp_multiplier(self) -> f32 {
        match self {
            Self::Weak => 0.5,
            Self::Standard => 1.0,
            Self::Elite => 2.5,
            Self::Boss => 6.0,
        }
    }

    /// Factor applied to the base speed.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Weak => 1.25,
            Self::Standard => 1.0,
            Self::Elite => 0.9,
            Self::Boss => 0.7,
        }
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Projectile tower; upgraded it fires up to three projectiles.
    Default,
    /// Map-wide laser that pierces along a beam.
    Thunder,
    /// Two-by-two tower emitting a damaging shockwave.
    Fat,
    /// Melee swipe tower; upgraded it jumps to better cells.
    Kitty,
    /// Pulse tower that puts enemies to sleep.
    Catatonic,
    /// Cone burst tower; upgraded hits may teleport enemies backwards.
    Galactic,
}

impl TowerKind {
    /// Every kind in shop order.
    pub const ALL: [TowerKind; 6] = [
        Self::Default,
        Self::Thunder,
        Self::Fat,
        Self::Kitty,
        Self::Catatonic,
        Self::Galactic,
    ];

    /// Resolves the one-based shop slot used by the select-type input.
    #[must_use]
    pub fn from_slot(slot: u8) -> Option<Self> {
        let index = usize::from(slot).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Display name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "Default Cat",
            Self::Thunder => "Thundercat",
            Self::Fat => "Fat Cat",
            Self::Kitty => "Kitty Cat",
            Self::Catatonic => "Catatonic Cat",
            Self::Galactic => "Galactic Cat",
        }
    }

    /// Purchase price.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Default => 35,
            Self::Thunder => 75,
            Self::Fat => 55,
            Self::Kitty => 65,
            Self::Catatonic => 60,
            Self::Galactic => 90,
        }
    }

    /// Reports whether the kind is available without paying an unlock.
    #[must_use]
    pub const fn starts_unlocked(self) -> bool {
        matches!(self, Self::Default)
    }

    /// One-time price to unlock the kind.
    #[must_use]
    pub const fn unlock_cost(self) -> u32 {
        self.cost() * 10
    }

    /// One-time price to upgrade a tower of this kind.
    #[must_use]
    pub const fn upgrade_cost(self) -> u32 {
        self.cost() * 2
    }

    /// Currency returned when a tower of this kind is sold.
    #[must_use]
    pub fn sell_refund(self) -> u32 {
        (self.cost() as f32 * 0.6).round() as u32
    }

    /// Side length of the square footprint.
    #[must_use]
    pub const fn footprint(self) -> u32 {
        match self {
            Self::Fat => 2,
            _ => 1,
        }
    }

    /// Combat statistics for a tower of this kind.
    ///
    /// Upgrades change behaviour per kind rather than scaling damage: the
    /// Thunder fires faster, the Fat and Catatonic reach further, while the
    /// Default, Kitty and Galactic keep their numbers and gain new behaviour.
    #[must_use]
    pub fn stats(self, upgraded: bool) -> TowerStats {
        let base = match self {
            Self::Default => TowerStats::new(3, 3.5, 0.85, 1),
            Self::Thunder => TowerStats::new(6, f32::INFINITY, 2.6, 1),
            Self::Fat => TowerStats::new(4, 2.4, 1.4, 2),
            Self::Kitty => TowerStats::new(3, 5.5, 1.0, 1),
            Self::Catatonic => TowerStats::new(0, 2.5, 2.0, 1),
            Self::Galactic => TowerStats::new(5, 6.0, 1.6, 1),
        };
        if !upgraded {
            return base;
        }
        match self {
            Self::Thunder => TowerStats::new(base.damage, base.range, base.fire_rate * 0.65, base.size),
            Self::Fat | Self::Catatonic => {
                TowerStats::new(base.damage, base.range + 1.0, base.fire_rate, base.size)
            }
            Self::Default | Self::Kitty | Self::Galactic => base,
        }
    }

    /// Reach used by targeting for a tower of this kind.
    #[must_use]
    pub fn reach(self, range: f32) -> Reach {
        match self {
            Self::Thunder => Reach::Unlimited,
            _ => Reach::Within(range),
        }
    }

    /// Reports whether upgraded towers of this kind relocate before attacking.
    #[must_use]
    pub const fn is_mobile(self, upgraded: bool) -> bool {
        upgraded && matches!(self, Self::Kitty)
    }
}

/// Distance limit applied when a tower searches for a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reach {
    /// Enemies must lie within the radius, measured in cells.
    Within(f32),
    /// Every enemy on the board is eligible.
    Unlimited,
}

impl Reach {
    /// Reports whether a cell is eligible from the provided origin.
    #[must_use]
    pub fn admits(&self, origin: CellPoint, cell: CellCoord) -> bool {
        match *self {
            Self::Within(range) => origin.distance_squared_to(cell) <= range * range,
            Self::Unlimited => true,
        }
    }
}

/// Combat statistics of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Damage dealt per hit.
    pub damage: u32,
    /// Targeting and effect radius in cells.
    pub range: f32,
    /// Nominal seconds between shots before pacing.
    pub fire_rate: f32,
    /// Side length of the square footprint.
    pub size: u32,
}

impl TowerStats {
    /// Creates a statistics record.
    #[must_use]
    pub const fn new(damage: u32, range: f32, fire_rate: f32, size: u32) -> Self {
        Self {
            damage,
            range,
            fire_rate,
            size,
        }
    }
}

/// Cosmetic record consumed by presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AreaEffect {
    /// Ring expanding from a centre until it reaches its maximum radius.
    Shockwave {
        /// Centre of the ring.
        center: CellPoint,
        /// Current ring radius.
        radius: f32,
        /// Radius at which the ring disappears.
        max_radius: f32,
        /// Growth in cells per second.
        speed: f32,
        /// Seconds until the ring disappears.
        time_left: f32,
    },
    /// Traced laser cells.
    Beam {
        /// Cells covered by the beam.
        cells: Vec<CellCoord>,
        /// Seconds until the beam disappears.
        time_left: f32,
    },
    /// Cells covered by a swipe or cone.
    Highlight {
        /// Highlighted cells.
        cells: Vec<CellCoord>,
        /// Seconds until the highlight disappears.
        time_left: f32,
    },
    /// Marker drawn where an enemy survived a hit.
    HitMarker {
        /// Cell of the enemy that was hit.
        cell: CellCoord,
        /// Seconds until the marker disappears.
        time_left: f32,
    },
}

impl AreaEffect {
    /// Seconds until the effect disappears.
    #[must_use]
    pub fn time_left(&self) -> f32 {
        match self {
            Self::Shockwave { time_left, .. }
            | Self::Beam { time_left, .. }
            | Self::Highlight { time_left, .. }
            | Self::HitMarker { time_left, .. } => *time_left,
        }
    }

    /// Advances the effect by the provided time slice.
    ///
    /// Returns `false` once the effect has expired.
    pub fn advance(&mut self, dt: f32) -> bool {
        match self {
            Self::Shockwave {
                radius,
                max_radius,
                speed,
                time_left,
                ..
            } => {
                *radius += *speed * dt;
                *time_left -= dt;
                *time_left > 0.0 && *radius <= *max_radius
            }
            Self::Beam { time_left, .. }
            | Self::Highlight { time_left, .. }
            | Self::HitMarker { time_left, .. } => {
                *time_left -= dt;
                *time_left > 0.0
            }
        }
    }
}

/// Lifecycle phase of the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No wave is running.
    Idle,
    /// Enemies remain to be spawned.
    Spawning,
    /// Every enemy was spawned; waiting for the field to clear.
    Draining,
}

/// Read-only summary of the world's wave bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveStatus {
    /// Number of the current or most recent wave.
    pub wave: u32,
    /// Catalogue index of the active map.
    pub map_index: u32,
    /// Difficulty level of the current wave.
    pub difficulty: u32,
    /// Indicates whether a wave is running.
    pub wave_active: bool,
    /// Enemies still to be spawned in the current wave.
    pub spawn_remaining: u32,
    /// Living enemies on the board.
    pub enemies_alive: u32,
    /// Corridor width of the active map.
    pub path_width: u32,
    /// Indicates whether the game has ended.
    pub game_over: bool,
}

impl WaveStatus {
    /// Derives the wave director's phase.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        if !self.wave_active || self.game_over {
            WavePhase::Idle
        } else if self.spawn_remaining > 0 {
            WavePhase::Spawning
        } else {
            WavePhase::Draining
        }
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Tier of the enemy.
    pub tier: EnemyTier,
    /// Cell currently occupied, derived from progress and lane.
    pub cell: CellCoord,
    /// Fractional index along the path cell sequence.
    pub progress: f32,
    /// Current hit points.
    pub health: Health,
    /// Hit points at spawn.
    pub max_health: Health,
    /// Remaining sleep in seconds; the enemy does not move while positive.
    pub sleep_timer: f32,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view ordered by identifier, which is spawn order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Region of cells occupied by the tower.
    pub region: CellRect,
    /// Indicates whether the one-time upgrade was bought.
    pub upgraded: bool,
    /// Seconds until the tower may fire; zero or negative means ready.
    pub cooldown: f32,
    /// Effective combat statistics.
    pub stats: TowerStats,
}

impl TowerSnapshot {
    /// Reports whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Reports whether the tower relocates before attacking.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.kind.is_mobile(self.upgraded)
    }
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view ordered by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the tower lifted for relocation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeldTowerSnapshot {
    /// Identifier of the lifted tower.
    pub id: TowerId,
    /// Kind of the lifted tower.
    pub kind: TowerKind,
    /// Indicates whether the tower was upgraded.
    pub upgraded: bool,
    /// Origin the tower returns to when the hold is cancelled.
    pub original: CellCoord,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Current position.
    pub position: CellPoint,
    /// Frozen target cell.
    pub target: CellCoord,
    /// Damage dealt on impact.
    pub damage: u32,
}

/// Read-only view into the static path mask.
#[derive(Clone, Copy, Debug)]
pub struct PathMaskView<'a> {
    board: BoardSize,
    cells: &'a [bool],
}

impl<'a> PathMaskView<'a> {
    /// Captures a new path view backed by the provided row-major mask.
    #[must_use]
    pub fn new(board: BoardSize, cells: &'a [bool]) -> Self {
        Self { board, cells }
    }

    /// Dimensions of the board.
    #[must_use]
    pub const fn board(&self) -> BoardSize {
        self.board
    }

    /// Reports whether the cell belongs to the path; off-board cells report `false`.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.board
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }
}
