// src/tracker/mod.rs - Stateful trade/advertiser classification engine

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::types::{TrackerEvent, TradeDecision, TradeTrackerConfig};

pub mod ads;
pub mod chat_scan;
pub mod normalize;
pub mod reputation;
pub mod trade_completion;
pub mod trade_policy;
pub mod word_lists;

use normalize::normalize;
use reputation::ReputationTracker;
use word_lists::WordListStore;

/// Owns every piece of session state: the config snapshot, the derived word
/// lists and both reputation registries. All mutation goes through
/// [`handle`](Self::handle), [`apply_config`](Self::apply_config) and
/// [`reset`](Self::reset).
pub struct TradeTracker {
    config: TradeTrackerConfig,
    word_lists: WordListStore,
    reputation: ReputationTracker,
    trade_checks: u64,
    trade_checks_suppressed: u64,
    session_started: DateTime<Utc>,
}

/// Snapshot of what the tracker has seen this session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub advertisers: usize,
    pub paid_traders: usize,
    pub whitelisted_players: usize,
    pub ad_words: usize,
    pub trade_checks: u64,
    pub trade_checks_suppressed: u64,
    pub session_started: DateTime<Utc>,
}

impl TradeTracker {
    pub fn new(config: TradeTrackerConfig) -> Self {
        let word_lists = WordListStore::new();
        word_lists.rebuild(&config);

        Self {
            config,
            word_lists,
            reputation: ReputationTracker::new(),
            trade_checks: 0,
            trade_checks_suppressed: 0,
            session_started: Utc::now(),
        }
    }

    pub fn config(&self) -> &TradeTrackerConfig {
        &self.config
    }

    pub fn word_lists(&self) -> &WordListStore {
        &self.word_lists
    }

    pub fn reputation(&self) -> &ReputationTracker {
        &self.reputation
    }

    /// Take a new config snapshot and rebuild both lists from it
    pub fn apply_config(&mut self, config: TradeTrackerConfig) {
        self.word_lists.rebuild(&config);
        self.config = config;
    }

    /// Route one event. Only trade filter checks produce a decision.
    pub fn handle(&mut self, event: TrackerEvent) -> Option<TradeDecision> {
        match event {
            TrackerEvent::OverheadSpeech { actor, text } => {
                let lists = self.word_lists.snapshot();
                chat_scan::on_overhead_speech(&actor, &text, &lists.ad_words, &mut self.reputation);
                None
            }
            TrackerEvent::PublicChat { actor, text } => {
                let lists = self.word_lists.snapshot();
                chat_scan::on_public_chat(&actor, &text, &lists.ad_words, &mut self.reputation);
                None
            }
            TrackerEvent::TradeFilterCheck { actor, message_id, text } => {
                let decision = self.evaluate_trade(&actor, &text);
                self.trade_checks += 1;
                if decision.suppress {
                    self.trade_checks_suppressed += 1;
                }
                debug!(
                    "Trade request {} from {}: suppress={} text={:?}",
                    message_id, actor, decision.suppress, decision.display_text
                );
                Some(decision)
            }
            TrackerEvent::TradeWindowOpened(screen) => {
                trade_completion::on_trade_window_confirmed(
                    &screen.counterparty,
                    &screen.first_item,
                    &self.config,
                    &mut self.reputation,
                );
                None
            }
        }
    }

    /// Pure trade decision against current state
    pub fn evaluate_trade(&self, actor: &str, original_text: &str) -> TradeDecision {
        let lists = self.word_lists.snapshot();
        trade_policy::evaluate(
            &normalize(actor),
            original_text,
            &lists.whitelist,
            &self.reputation,
            &self.config,
        )
    }

    /// End of session
    pub fn reset(&mut self) {
        self.reputation.reset(self.config.retain_paid_traders);
        self.trade_checks = 0;
        self.trade_checks_suppressed = 0;
        self.session_started = Utc::now();
        info!("Trade tracker session reset");
    }

    pub fn stats(&self) -> SessionStats {
        let lists = self.word_lists.snapshot();
        SessionStats {
            advertisers: self.reputation.advertiser_count(),
            paid_traders: self.reputation.paid_trader_count(),
            whitelisted_players: lists.whitelist.len(),
            ad_words: lists.ad_words.len(),
            trade_checks: self.trade_checks,
            trade_checks_suppressed: self.trade_checks_suppressed,
            session_started: self.session_started,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeScreen;

    fn config() -> TradeTrackerConfig {
        TradeTrackerConfig {
            whitelisted_players: "Friend".to_string(),
            ad_words: "free\ngold".to_string(),
            item_traded: "coins".to_string(),
            ..Default::default()
        }
    }

    fn trade_check(actor: &str) -> TrackerEvent {
        TrackerEvent::TradeFilterCheck {
            actor: actor.to_string(),
            message_id: 1,
            text: "wishes to trade with you.".to_string(),
        }
    }

    #[test]
    fn test_chat_ad_then_trade_request_is_annotated() {
        let mut tracker = TradeTracker::new(config());

        assert!(tracker
            .handle(TrackerEvent::PublicChat {
                actor: "Seller".to_string(),
                text: "Free gold, trade me".to_string(),
            })
            .is_none());

        let decision = tracker.handle(trade_check("SELLER")).unwrap();
        assert!(!decision.suppress);
        assert!(decision.display_text.ends_with(" - seen advertising."));
    }

    #[test]
    fn test_paid_trade_then_hide_paid() {
        let mut tracker = TradeTracker::new(config());
        tracker.handle(TrackerEvent::TradeWindowOpened(TradeScreen {
            counterparty: "Seller".to_string(),
            first_item: "Coins x 5,000".to_string(),
        }));

        tracker.apply_config(TradeTrackerConfig {
            hide_paid_advertisers: true,
            ..config()
        });

        let decision = tracker.handle(trade_check("seller")).unwrap();
        assert!(decision.suppress);
        assert!(decision.display_text.ends_with(" - PAID!"));

        let stats = tracker.stats();
        assert_eq!(stats.paid_traders, 1);
        assert_eq!(stats.trade_checks, 1);
        assert_eq!(stats.trade_checks_suppressed, 1);
    }

    #[test]
    fn test_evaluate_does_not_mutate() {
        let tracker = TradeTracker::new(config());
        let before = tracker.stats();

        tracker.evaluate_trade("Seller", "hi");
        tracker.evaluate_trade("Friend", "hi");

        let after = tracker.stats();
        assert_eq!(before.trade_checks, after.trade_checks);
        assert_eq!(before.advertisers, after.advertisers);
    }

    #[test]
    fn test_apply_config_rebuilds_whitelist() {
        let mut tracker = TradeTracker::new(TradeTrackerConfig {
            only_show_whitelist: true,
            ..config()
        });
        assert!(tracker.handle(trade_check("Stranger")).unwrap().suppress);

        tracker.apply_config(TradeTrackerConfig {
            whitelisted_players: "Stranger".to_string(),
            only_show_whitelist: true,
            ..config()
        });
        assert!(!tracker.handle(trade_check("stranger")).unwrap().suppress);
        assert!(tracker.handle(trade_check("friend")).unwrap().suppress);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut tracker = TradeTracker::new(config());
        tracker.handle(TrackerEvent::OverheadSpeech {
            actor: "Seller".to_string(),
            text: "gold for free".to_string(),
        });
        tracker.handle(trade_check("Seller"));
        assert_eq!(tracker.stats().advertisers, 1);

        tracker.reset();

        let stats = tracker.stats();
        assert_eq!(stats.advertisers, 0);
        assert_eq!(stats.trade_checks, 0);
    }
}
