use log::{debug, info};

use crate::tracker::normalize::normalize;
use crate::tracker::reputation::ReputationTracker;
use crate::types::TradeTrackerConfig;

/// Record the counterparty as paid when the traded item matches the
/// configured payment item. Returns true when a new paid trader was added.
pub fn on_trade_window_confirmed(
    actor_raw_name: &str,
    traded_item_description: &str,
    config: &TradeTrackerConfig,
    reputation: &mut ReputationTracker,
) -> bool {
    let item_traded = config.item_traded.trim().to_lowercase();
    if item_traded.is_empty() {
        debug!("No payment item configured, ignoring trade screen");
        return false;
    }

    if !traded_item_description.to_lowercase().contains(&item_traded) {
        return false;
    }

    let player = normalize(actor_raw_name);
    if player.is_empty() {
        return false;
    }

    info!("Traded {} to {}", item_traded, player);
    reputation.record_paid_trade(player)
}
