use log::info;
use std::collections::HashSet;

use crate::types::PlayerIdentity;

/// Session-scoped record of who has advertised and who has been paid.
///
/// Both sets only grow while the session runs; [`reset`](Self::reset) is the
/// only way anything leaves them.
#[derive(Debug, Default, Clone)]
pub struct ReputationTracker {
    advertisers: HashSet<PlayerIdentity>,
    paid_traders: HashSet<PlayerIdentity>,
}

impl ReputationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the player was not already flagged
    pub fn record_advertiser(&mut self, id: PlayerIdentity) -> bool {
        if self.advertisers.contains(&id) {
            return false;
        }
        info!("Flagged {} as an advertiser", id);
        self.advertisers.insert(id)
    }

    /// Returns true when the player was not already recorded
    pub fn record_paid_trade(&mut self, id: PlayerIdentity) -> bool {
        if self.paid_traders.contains(&id) {
            return false;
        }
        info!("Recorded paid trade with {}", id);
        self.paid_traders.insert(id)
    }

    pub fn is_advertiser(&self, id: &PlayerIdentity) -> bool {
        self.advertisers.contains(id)
    }

    pub fn is_paid_trader(&self, id: &PlayerIdentity) -> bool {
        self.paid_traders.contains(id)
    }

    pub fn advertiser_count(&self) -> usize {
        self.advertisers.len()
    }

    pub fn paid_trader_count(&self) -> usize {
        self.paid_traders.len()
    }

    /// Session teardown. Paid traders survive only when asked to.
    pub fn reset(&mut self, retain_paid_traders: bool) {
        self.advertisers.clear();
        if !retain_paid_traders {
            self.paid_traders.clear();
        }
        info!(
            "Reputation reset ({} paid traders retained)",
            self.paid_traders.len()
        );
    }
}
