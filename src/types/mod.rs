// src/types/mod.rs - Core value types shared by the tracker and host adapter

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration namespace this plugin owns
pub const CONFIG_GROUP: &str = "tradetracker";

/// Canonical, lowercase player key. Only built through
/// [`crate::tracker::normalize::normalize`] so that registry inserts and
/// lookups always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerIdentity(String);

impl PlayerIdentity {
    pub(crate) fn from_normalized(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-facing plugin configuration. The host owns and persists it; the
/// tracker only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeTrackerConfig {
    /// One player name per line
    pub whitelisted_players: String,
    /// One keyword per line, all of which must appear for a message to count as an ad
    pub ad_words: String,
    pub only_show_whitelist: bool,
    pub only_show_advertisers: bool,
    pub hide_paid_advertisers: bool,
    /// Item name that marks a trade as a payment
    pub item_traded: String,
    /// Keep paid traders across a shutdown/startup cycle
    pub retain_paid_traders: bool,
}

impl Default for TradeTrackerConfig {
    fn default() -> Self {
        Self {
            whitelisted_players: String::new(),
            ad_words: String::new(),
            only_show_whitelist: false,
            only_show_advertisers: false,
            hide_paid_advertisers: false,
            item_traded: "coins".to_string(),
            retain_paid_traders: false,
        }
    }
}

/// Chat message types the tracker cares about, keyed by the host's type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatMessageType {
    PublicChat,
    TradeRequest,
}

impl ChatMessageType {
    pub const PUBLIC_CHAT_CODE: i32 = 2;
    pub const TRADE_REQUEST_CODE: i32 = 101;

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::PUBLIC_CHAT_CODE => Some(ChatMessageType::PublicChat),
            Self::TRADE_REQUEST_CODE => Some(ChatMessageType::TradeRequest),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ChatMessageType::PublicChat => Self::PUBLIC_CHAT_CODE,
            ChatMessageType::TradeRequest => Self::TRADE_REQUEST_CODE,
        }
    }
}

/// Fields read off the second trade confirmation screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeScreen {
    pub counterparty: String,
    pub first_item: String,
}

/// Events the tracker core understands. Actor names are raw display names;
/// the core normalizes them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    OverheadSpeech { actor: String, text: String },
    PublicChat { actor: String, text: String },
    TradeFilterCheck { actor: String, message_id: u32, text: String },
    TradeWindowOpened(TradeScreen),
}

/// Outcome of a trade request check, handed back to the host for write-back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeDecision {
    pub suppress: bool,
    pub display_text: String,
}

/// Problems reading host-owned structures. None of these ever escape the
/// host adapter; they are logged and the event is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("malformed widget tree: {0}")]
    MalformedWidgetTree(String),

    #[error("no chat message with id {0}")]
    UnknownMessage(u32),

    #[error("unrecognized event: {0}")]
    UnrecognizedEvent(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
