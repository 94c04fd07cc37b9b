use std::collections::HashSet;

use crate::tracker::reputation::ReputationTracker;
use crate::types::{PlayerIdentity, TradeDecision, TradeTrackerConfig};

pub const PAID_SUFFIX: &str = " - PAID!";
pub const ADVERTISER_SUFFIX: &str = " - seen advertising.";
pub const ADVERTISER_MARKER: &str = "seen advertising";

/// Decide whether a trade request is hidden and how its line reads.
///
/// Rules in precedence order:
/// 1. whitelisted actors are always shown untouched
/// 2. `only_show_whitelist` hides everyone else
/// 3. otherwise annotate (paid first, then advertiser), then hide non-advertisers
///    under `only_show_advertisers` and paid traders under `hide_paid_advertisers`
///
/// Annotations are never applied twice to the same text.
pub fn evaluate(
    actor: &PlayerIdentity,
    original_text: &str,
    whitelist: &HashSet<PlayerIdentity>,
    reputation: &ReputationTracker,
    config: &TradeTrackerConfig,
) -> TradeDecision {
    if whitelist.contains(actor) {
        return TradeDecision {
            suppress: false,
            display_text: original_text.to_string(),
        };
    }

    if config.only_show_whitelist {
        return TradeDecision {
            suppress: true,
            display_text: original_text.to_string(),
        };
    }

    let is_advertiser = reputation.is_advertiser(actor);
    let is_paid = reputation.is_paid_trader(actor);

    let mut display_text = original_text.to_string();
    if is_paid {
        if !display_text.ends_with(PAID_SUFFIX) {
            display_text.push_str(PAID_SUFFIX);
        }
    } else if is_advertiser && !display_text.contains(ADVERTISER_MARKER) {
        display_text.push_str(ADVERTISER_SUFFIX);
    }

    let suppress = (config.only_show_advertisers && !is_advertiser)
        || (config.hide_paid_advertisers && is_paid);

    TradeDecision { suppress, display_text }
}
