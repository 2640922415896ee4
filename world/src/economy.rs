//! Currency, lives and tower unlocks.

use std::collections::BTreeSet;

use burrow_defence_core::{ActionError, TowerKind};

/// Player purse and progression flags.
#[derive(Clone, Debug)]
pub(crate) struct Economy {
    currency: u32,
    lives: u32,
    unlocked: BTreeSet<TowerKind>,
}

impl Economy {
    pub(crate) fn new(currency: u32, lives: u32) -> Self {
        Self {
            currency,
            lives,
            unlocked: TowerKind::ALL
                .into_iter()
                .filter(|kind| kind.starts_unlocked())
                .collect(),
        }
    }

    pub(crate) fn currency(&self) -> u32 {
        self.currency
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn can_afford(&self, cost: u32) -> bool {
        self.currency >= cost
    }

    /// Rejects the price without spending it when funds are short.
    pub(crate) fn check_funds(&self, cost: u32) -> Result<(), ActionError> {
        if self.can_afford(cost) {
            Ok(())
        } else {
            Err(ActionError::InsufficientFunds {
                required: cost,
                available: self.currency,
            })
        }
    }

    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), ActionError> {
        self.check_funds(cost)?;
        self.currency -= cost;
        Ok(())
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    pub(crate) fn is_unlocked(&self, kind: TowerKind) -> bool {
        self.unlocked.contains(&kind)
    }

    /// Pays the unlock price once.
    pub(crate) fn unlock(&mut self, kind: TowerKind) -> Result<u32, ActionError> {
        if self.is_unlocked(kind) {
            return Err(ActionError::AlreadyUnlocked { kind });
        }
        let cost = kind.unlock_cost();
        self.spend(cost)?;
        let _ = self.unlocked.insert(kind);
        Ok(cost)
    }

    /// Removes one life and returns the lives left.
    pub(crate) fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub(crate) fn reset_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
}
