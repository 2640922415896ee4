//! Session configuration parsed from TOML.

use burrow_defence_core::{
    BoardSize, CellCoord, MapDefinition, TowerKind, STARTING_CURRENCY, STARTING_LIVES,
};
use burrow_defence_system_wave_director::TierMix;
use burrow_defence_world::{standard_maps, WorldConfig};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x0b0a_7d00;

/// Errors raised while reading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A `maps` list was provided but left empty.
    #[error("the map list must contain at least one map")]
    NoMaps,
    /// A map needs at least two anchors to form a path.
    #[error("map {map} needs at least two anchors")]
    TooFewAnchors {
        /// Index of the offending map.
        map: usize,
    },
    /// Consecutive anchors must share a row or a column.
    #[error("map {map} joins anchors {index} and {} diagonally", .index + 1)]
    DiagonalSegment {
        /// Index of the offending map.
        map: usize,
        /// Index of the first anchor of the segment.
        index: usize,
    },
    /// Anchors must lie on the board.
    #[error("map {map} places anchor ({column}, {row}) off the board")]
    AnchorOffBoard {
        /// Index of the offending map.
        map: usize,
        /// Column of the anchor.
        column: u32,
        /// Row of the anchor.
        row: u32,
    },
    /// Paths must be at least one cell wide.
    #[error("map {map} has a path width of zero")]
    ZeroPathWidth {
        /// Index of the offending map.
        map: usize,
    },
    /// Tier probabilities must lie within `[0, 1]`.
    #[error("wave setting `{field}` must be a probability, got {value}")]
    InvalidChance {
        /// Name of the offending setting.
        field: &'static str,
        /// Value found in the document.
        value: f64,
    },
}

/// Session configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seed from which every random stream of the session is derived.
    pub seed: u64,
    /// Currency at the start of the session.
    pub starting_currency: u32,
    /// Lives at the start and after every map advance.
    pub starting_lives: u32,
    /// Index of the first map played.
    pub starting_map: u32,
    /// Custom map rotation; the built-in catalogue is used when absent.
    pub maps: Option<Vec<MapConfig>>,
    /// Tier mix tuning.
    pub waves: WaveConfig,
    /// Towers bought before the first tick.
    pub towers: Vec<OpeningTower>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            starting_currency: STARTING_CURRENCY,
            starting_lives: STARTING_LIVES,
            starting_map: 0,
            maps: None,
            waves: WaveConfig::default(),
            towers: Vec::new(),
        }
    }
}

/// Map authored in a configuration document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    /// Ordered `[column, row]` anchors.
    pub anchors: Vec<[u32; 2]>,
    /// Corridor width in cells.
    #[serde(default = "default_path_width")]
    pub path_width: u32,
}

fn default_path_width() -> u32 {
    1
}

impl MapConfig {
    fn to_definition(&self) -> MapDefinition {
        MapDefinition::new(
            self.anchors
                .iter()
                .map(|[column, row]| CellCoord::new(*column, *row))
                .collect(),
            self.path_width,
        )
    }
}

/// Tier mix settings; every field defaults to the built-in tuning.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Minimum difficulty at which bosses may appear.
    pub boss_difficulty: u32,
    /// Minimum map index at which bosses may appear.
    pub boss_map: u32,
    /// Boss probability.
    pub boss_chance: f64,
    /// Minimum difficulty at which elites may appear.
    pub elite_difficulty: u32,
    /// Elite probability.
    pub elite_chance: f64,
    /// Weak share at difficulty one.
    pub weak_share: f64,
    /// Weak share lost per difficulty level.
    pub weak_decay: f64,
    /// Lower bound of the weak share.
    pub weak_floor: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        let mix = TierMix::default();
        Self {
            boss_difficulty: mix.boss_difficulty,
            boss_map: mix.boss_map,
            boss_chance: mix.boss_chance,
            elite_difficulty: mix.elite_difficulty,
            elite_chance: mix.elite_chance,
            weak_share: mix.weak_share,
            weak_decay: mix.weak_decay,
            weak_floor: mix.weak_floor,
        }
    }
}

impl From<WaveConfig> for TierMix {
    fn from(config: WaveConfig) -> Self {
        Self {
            boss_difficulty: config.boss_difficulty,
            boss_map: config.boss_map,
            boss_chance: config.boss_chance,
            elite_difficulty: config.elite_difficulty,
            elite_chance: config.elite_chance,
            weak_share: config.weak_share,
            weak_decay: config.weak_decay,
            weak_floor: config.weak_floor,
        }
    }
}

/// Tower purchased when the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningTower {
    /// Kind to buy; locked kinds are unlocked first.
    pub kind: TowerKind,
    /// Column of the footprint origin.
    pub column: u32,
    /// Row of the footprint origin.
    pub row: u32,
    /// Buys the upgrade right after placement.
    #[serde(default)]
    pub upgraded: bool,
}

impl OpeningTower {
    /// Footprint origin of the tower.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the map list and the tier probabilities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(maps) = &self.maps {
            if maps.is_empty() {
                return Err(ConfigError::NoMaps);
            }
            let board = BoardSize::standard();
            for (map, definition) in maps.iter().enumerate() {
                validate_map(map, definition, board)?;
            }
        }

        let waves = &self.waves;
        for (field, value) in [
            ("boss_chance", waves.boss_chance),
            ("elite_chance", waves.elite_chance),
            ("weak_share", waves.weak_share),
            ("weak_floor", waves.weak_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { field, value });
            }
        }
        Ok(())
    }

    /// World parameters described by the configuration.
    #[must_use]
    pub fn world_config(&self) -> WorldConfig {
        let maps = match &self.maps {
            Some(maps) => maps.iter().map(MapConfig::to_definition).collect(),
            None => standard_maps(),
        };
        WorldConfig {
            maps,
            seed: self.seed,
            starting_currency: self.starting_currency,
            starting_lives: self.starting_lives,
            starting_map: self.starting_map,
        }
    }
}

fn validate_map(map: usize, definition: &MapConfig, board: BoardSize) -> Result<(), ConfigError> {
    if definition.anchors.len() < 2 {
        return Err(ConfigError::TooFewAnchors { map });
    }
    if definition.path_width == 0 {
        return Err(ConfigError::ZeroPathWidth { map });
    }
    for [column, row] in &definition.anchors {
        if !board.contains(CellCoord::new(*column, *row)) {
            return Err(ConfigError::AnchorOffBoard {
                map,
                column: *column,
                row: *row,
            });
        }
    }
    for (index, pair) in definition.anchors.windows(2).enumerate() {
        if pair[0][0] != pair[1][0] && pair[0][1] != pair[1][1] {
            return Err(ConfigError::DiagonalSegment { map, index });
        }
    }
    Ok(())
}
