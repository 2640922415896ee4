#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system that translates player input into world commands.
//!
//! The builder owns the cursor and the selected tower kind. It learns about
//! held towers and completed unlocks from world events, so that the same input
//! can mean "place" or "drop" depending on what the player is carrying.

use burrow_defence_core::{BoardSize, CellCoord, Command, Event, PlayerInput, TowerKind};

/// Builder system that keeps the cursor and shop selection.
#[derive(Clone, Debug)]
pub struct Builder {
    board: BoardSize,
    cursor: CellCoord,
    selected: TowerKind,
    pending_selection: Option<TowerKind>,
    holding: bool,
}

impl Builder {
    /// Creates a builder with the cursor near the left edge of the board.
    #[must_use]
    pub fn new(board: BoardSize) -> Self {
        Self {
            board,
            cursor: board.clamp(3, i64::from(board.rows() / 2)),
            selected: TowerKind::Default,
            pending_selection: None,
            holding: false,
        }
    }

    /// Cell currently under the cursor.
    #[must_use]
    pub const fn cursor(&self) -> CellCoord {
        self.cursor
    }

    /// Kind that the next placement purchases.
    #[must_use]
    pub const fn selected(&self) -> TowerKind {
        self.selected
    }

    /// Updates the builder from events broadcast by the world.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerPickedUp { .. } => self.holding = true,
                Event::TowerDropped { .. } | Event::HoldCancelled { .. } | Event::MapAdvanced { .. } => {
                    self.holding = false;
                }
                Event::TowerUnlocked { kind, .. } => {
                    if self.pending_selection == Some(*kind) {
                        self.selected = *kind;
                    }
                    self.pending_selection = None;
                }
                Event::ActionRejected { .. } => self.pending_selection = None,
                _ => {}
            }
        }
    }

    /// Translates a player input into world commands.
    ///
    /// `is_unlocked` should mirror the world's `query::is_unlocked` helper.
    /// Returns `true` when the input was meant for the builder; flag toggles
    /// belong to the clock and return `false`.
    pub fn handle<F>(&mut self, input: PlayerInput, mut is_unlocked: F, out: &mut Vec<Command>) -> bool
    where
        F: FnMut(TowerKind) -> bool,
    {
        match input {
            PlayerInput::MoveCursor { dx, dy } => {
                self.cursor = self.board.clamp(
                    i64::from(self.cursor.column()) + i64::from(dx),
                    i64::from(self.cursor.row()) + i64::from(dy),
                );
            }
            PlayerInput::SelectTower { kind } => {
                if is_unlocked(kind) {
                    self.selected = kind;
                } else {
                    self.pending_selection = Some(kind);
                    out.push(Command::UnlockTower { kind });
                }
            }
            PlayerInput::Place => {
                if self.holding {
                    out.push(Command::DropHeldTower {
                        origin: self.cursor,
                    });
                } else {
                    out.push(Command::PlaceTower {
                        kind: self.selected,
                        origin: self.cursor,
                    });
                }
            }
            PlayerInput::PickUp => out.push(Command::PickUpTower { cell: self.cursor }),
            PlayerInput::MoveHeld => {
                if self.holding {
                    out.push(Command::DropHeldTower {
                        origin: self.cursor,
                    });
                } else {
                    out.push(Command::PickUpTower { cell: self.cursor });
                }
            }
            PlayerInput::CancelHold => out.push(Command::CancelHold),
            PlayerInput::Sell => out.push(Command::SellTower { cell: self.cursor }),
            PlayerInput::Upgrade => out.push(Command::UpgradeTower { cell: self.cursor }),
            PlayerInput::StartWave => out.push(Command::StartWave),
            PlayerInput::ToggleAutoWave | PlayerInput::ToggleFastForward => return false,
        }
        true
    }
}
