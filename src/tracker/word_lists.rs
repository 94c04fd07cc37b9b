use log::info;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::tracker::normalize::normalize;
use crate::types::{PlayerIdentity, TradeTrackerConfig};

/// One consistent view of both configured lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordLists {
    pub whitelist: HashSet<PlayerIdentity>,
    /// Kept in configured order
    pub ad_words: Vec<String>,
}

impl WordLists {
    pub fn from_config(config: &TradeTrackerConfig) -> Self {
        Self {
            // normalize lowercases after filtering, same as every lookup
            whitelist: split_lines(&config.whitelisted_players)
                .map(normalize)
                .filter(|id| !id.is_empty())
                .collect(),
            ad_words: split_lines(&config.ad_words)
                .map(str::to_lowercase)
                .collect(),
        }
    }
}

/// Newline split, trimmed, empties dropped
fn split_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Holds the whitelist and ad-word list derived from the latest config.
///
/// A rebuild builds a fresh [`WordLists`] and swaps it in under the write
/// lock, so readers holding a snapshot never see a half-built list.
#[derive(Debug, Default)]
pub struct WordListStore {
    current: RwLock<Arc<WordLists>>,
}

impl WordListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&self, config: &TradeTrackerConfig) {
        let lists = Arc::new(WordLists::from_config(config));
        info!(
            "Rebuilt word lists: {} whitelisted players, {} ad words",
            lists.whitelist.len(),
            lists.ad_words.len()
        );

        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = lists;
    }

    /// Current lists; stays valid (and unchanged) across later rebuilds
    pub fn snapshot(&self) -> Arc<WordLists> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn whitelist(&self) -> HashSet<PlayerIdentity> {
        self.snapshot().whitelist.clone()
    }

    pub fn ad_words(&self) -> Vec<String> {
        self.snapshot().ad_words.clone()
    }

    pub fn is_whitelisted(&self, id: &PlayerIdentity) -> bool {
        self.snapshot().whitelist.contains(id)
    }
}
