//! Abstract audio cues collected for an external audio collaborator.

use burrow_defence_core::{Event, SoundCue};

/// Drain-once queue of cues derived from world events.
#[derive(Debug, Default)]
pub(crate) struct SoundQueue {
    pending: Vec<SoundCue>,
}

impl SoundQueue {
    /// Queues the cues announced by a batch of events.
    ///
    /// Leaks within one batch share a single cue.
    pub(crate) fn record(&mut self, events: &[Event]) {
        let mut life_lost = false;
        for event in events {
            let cue = match event {
                Event::WaveStarted { .. } => SoundCue::WaveStarted,
                Event::WaveCompleted { .. } => SoundCue::WaveCompleted,
                Event::EnemyKilled { .. } => SoundCue::EnemyDied,
                Event::EnemyLeaked { .. } => {
                    life_lost = true;
                    continue;
                }
                Event::TowerFired { kind, .. } => SoundCue::TowerFired(*kind),
                Event::TowerPlaced { .. } | Event::TowerDropped { .. } => SoundCue::TowerPlaced,
                Event::TowerSold { .. } => SoundCue::TowerSold,
                Event::TowerUpgraded { .. } => SoundCue::TowerUpgraded,
                Event::TowerUnlocked { .. } => SoundCue::TowerUnlocked,
                Event::MapAdvanced { .. } => SoundCue::MapChanged,
                Event::GameOver { .. } => SoundCue::GameOver,
                _ => continue,
            };
            self.pending.push(cue);
        }
        if life_lost {
            self.pending.push(SoundCue::LifeLost);
        }
    }

    pub(crate) fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.pending)
    }
}
