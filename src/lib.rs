//! # Trade Tracker
//!
//! Filters and annotates trade requests in a game client's chat based on
//! what the client has seen this session: who has been advertising and who
//! has already been paid.
//!
//! ## Features
//!
//! - **Advertiser detection**: public chat and overhead text are matched
//!   against a configured keyword list (every keyword must appear)
//! - **Paid trader tracking**: completed trades of the configured item mark
//!   the counterparty as paid
//! - **Trade request policy**: whitelist, advertiser-only and hide-paid rules
//!   decide whether a trade request is shown and how it is labelled
//! - **Hot-reload configuration**: YAML config file watched for changes
//!
//! ## Quick Start
//!
//! ```rust
//! use tradetracker::prelude::*;
//!
//! let mut tracker = TradeTracker::new(TradeTrackerConfig {
//!     ad_words: "free\ngold".to_string(),
//!     ..Default::default()
//! });
//!
//! tracker.handle(TrackerEvent::PublicChat {
//!     actor: "Seller".to_string(),
//!     text: "Free gold, trade me!".to_string(),
//! });
//!
//! let decision = tracker
//!     .handle(TrackerEvent::TradeFilterCheck {
//!         actor: "Seller".to_string(),
//!         message_id: 1,
//!         text: "wishes to trade with you.".to_string(),
//!     })
//!     .unwrap();
//! assert!(decision.display_text.ends_with(" - seen advertising."));
//! ```

pub mod config;
pub mod host;
pub mod tracker;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::{ConfigChangeEvent, ConfigurationManager};
    pub use crate::host::{
        session::{ReplayReport, SessionScript, SessionStep, SimulatedClient},
        Actor, ActorKind, FilterCheckSlots, HostClient, HostEvent, MessageNode, ScriptCallback,
        TradeTrackerPlugin, Widget,
    };
    pub use crate::tracker::{normalize::normalize, SessionStats, TradeTracker};
    pub use crate::types::{
        PlayerIdentity, TrackerError, TrackerEvent, TradeDecision, TradeScreen, TradeTrackerConfig,
        CONFIG_GROUP,
    };
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
