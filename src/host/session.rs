// src/host/session.rs - Scripted game client for replaying recorded sessions

use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::broadcast::error::TryRecvError;

use crate::config::{ConfigChangeEvent, ConfigurationManager};
use crate::host::{FilterCheckSlots, HostClient, HostEvent, MessageNode, TradeTrackerPlugin, Widget};
use crate::tracker::SessionStats;
use crate::types::{TradeTrackerConfig, CONFIG_GROUP};

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetEntry {
    pub group_id: u32,
    pub child_id: u32,
    pub widget: Widget,
}

/// One scripted step: either a raw host event or a config edit made by the user
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionStep {
    UpdateConfig { update_config: TradeTrackerConfig },
    Host(HostEvent),
}

/// YAML session file: the host's message table and widgets plus the
/// ordered steps to replay against them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionScript {
    pub messages: HashMap<u32, MessageNode>,
    pub widgets: Vec<WidgetEntry>,
    pub steps: Vec<SessionStep>,
}

impl SessionScript {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let script = Self::from_yaml(&content)?;
        debug!(
            "Loaded session {} with {} steps",
            path.as_ref().display(),
            script.steps.len()
        );
        Ok(script)
    }

    pub fn into_parts(self) -> (SimulatedClient, Vec<SessionStep>) {
        let widgets = self
            .widgets
            .into_iter()
            .map(|entry| ((entry.group_id, entry.child_id), entry.widget))
            .collect();

        let client = SimulatedClient {
            messages: self.messages,
            widgets,
            chat_refreshes: 0,
        };
        (client, self.steps)
    }
}

/// Where a replay keeps its config. `update_config` steps are saved there, so
/// unless `TRADETRACKER_CONFIG_DIR` says otherwise it is a scratch directory.
pub fn replay_config_dir() -> PathBuf {
    env::var_os("TRADETRACKER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join(format!("tradetracker-replay-{}", std::process::id())))
}

/// Every chat filter check a replay ran, plus the stats at the end
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub chat_lines: Vec<FilterCheckSlots>,
    pub stats: SessionStats,
}

/// Drive a plugin through a whole session: start-up, every step, config
/// notifications delivered between events, then shut-down
pub async fn replay(script: SessionScript, config_manager: &ConfigurationManager) -> Result<ReplayReport> {
    let mut changes = config_manager.subscribe_to_changes();

    let (client, steps) = script.into_parts();
    let mut plugin = TradeTrackerPlugin::new(client);
    plugin.start_up(&config_manager.get_config().await);

    let mut chat_lines = Vec::new();
    for step in steps {
        match step {
            SessionStep::UpdateConfig { update_config } => {
                if let Err(e) = config_manager.save_config(update_config).await {
                    warn!("Rejected config update: {}", e);
                }
            }
            SessionStep::Host(event) => {
                if let Some(slots) = plugin.dispatch(event) {
                    info!(
                        "Chat line {}: {}",
                        if slots.keep { "shown" } else { "hidden" },
                        slots.display_text
                    );
                    chat_lines.push(slots);
                }
            }
        }

        // Config notifications are delivered between events, like the host's event bus
        loop {
            match changes.try_recv() {
                Ok(ConfigChangeEvent::ConfigChanged { group }) => {
                    let config = config_manager.get_config().await;
                    plugin.on_config_changed(&group, &config);
                }
                Ok(ConfigChangeEvent::ValidationError { file, error }) => {
                    warn!("Config file {} rejected: {}", file, error);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} config notifications", skipped);
                    let config = config_manager.get_config().await;
                    plugin.on_config_changed(CONFIG_GROUP, &config);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    let stats = plugin.stats();
    plugin.shut_down();

    Ok(ReplayReport { chat_lines, stats })
}

/// In-memory [`HostClient`] backed by a session script
#[derive(Debug, Default)]
pub struct SimulatedClient {
    messages: HashMap<u32, MessageNode>,
    widgets: HashMap<(u32, u32), Widget>,
    chat_refreshes: usize,
}

impl SimulatedClient {
    pub fn chat_refreshes(&self) -> usize {
        self.chat_refreshes
    }
}

impl HostClient for SimulatedClient {
    fn message(&self, message_id: u32) -> Option<MessageNode> {
        self.messages.get(&message_id).cloned()
    }

    fn widget(&self, group_id: u32, child_id: u32) -> Option<&Widget> {
        self.widgets.get(&(group_id, child_id))
    }

    fn refresh_chat(&mut self) {
        self.chat_refreshes += 1;
        debug!("Chat refresh requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ActorKind, TRADE_CONFIRM_GROUP_ID};
    use crate::tracker::normalize::normalize;

    const SESSION: &str = r#"
messages:
  1: { name: "Gold Seller", value: "FREE GOLD trade me" }
  2: { name: "Gold Seller", value: "wishes to trade with you." }
widgets:
  - group_id: 334
    child_id: 1
    widget:
      static_children: [{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {},
        { dynamic_children: [{ text: "Coins x 1,000" }] },
        {},
        { text: "Trading with:<br>Gold Seller" }]
steps:
  - type: overhead_text_changed
    actor: { name: "Guard", kind: npc }
    text: "free gold"
  - type: script_callback
    event_name: chatFilterCheck
    message_type: 2
    message_id: 1
  - update_config:
      ad_words: "free\ngold"
      hide_paid_advertisers: true
  - type: widget_loaded
    group_id: 334
"#;

    #[test]
    fn test_parse_session_script() {
        let script = SessionScript::from_yaml(SESSION).unwrap();

        assert_eq!(script.messages.len(), 2);
        assert_eq!(script.widgets.len(), 1);
        assert_eq!(script.steps.len(), 4);
        assert!(matches!(
            &script.steps[0],
            SessionStep::Host(HostEvent::OverheadTextChanged { actor, .. }) if actor.kind == ActorKind::Npc
        ));
        assert!(matches!(
            &script.steps[2],
            SessionStep::UpdateConfig { update_config } if update_config.hide_paid_advertisers
        ));
    }

    #[tokio::test]
    async fn test_replay_demo_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_manager = ConfigurationManager::new(temp_dir.path());
        config_manager.initialize().await.unwrap();

        let script = SessionScript::from_yaml(include_str!("../../demos/session.yaml")).unwrap();
        let report = replay(script, &config_manager).await.unwrap();

        let lines: Vec<(bool, &str)> = report
            .chat_lines
            .iter()
            .map(|slots| (slots.keep, slots.display_text.as_str()))
            .collect();
        assert_eq!(
            lines,
            vec![
                (true, "FREE GOLD trade me at the grand exchange"),
                (true, "wishes to trade with you. - seen advertising."),
                (true, "wishes to trade with you. - PAID!"),
                (false, "wishes to trade with you. - PAID!"),
                (false, "wishes to trade with you."),
                (true, "wishes to trade with you."),
            ]
        );
        assert_eq!(report.stats.advertisers, 1);
        assert_eq!(report.stats.paid_traders, 1);
        assert_eq!(report.stats.trade_checks_suppressed, 2);
    }

    #[tokio::test]
    async fn test_replay_saves_config_only_in_given_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_manager = ConfigurationManager::new(temp_dir.path());
        config_manager.initialize().await.unwrap();

        let report = replay(SessionScript::from_yaml(SESSION).unwrap(), &config_manager)
            .await
            .unwrap();

        assert_eq!(report.chat_lines.len(), 1);
        assert_eq!(report.stats.paid_traders, 1);
        let saved: TradeTrackerConfig =
            serde_yaml::from_str(&fs::read_to_string(config_manager.config_path()).await.unwrap()).unwrap();
        assert!(saved.hide_paid_advertisers);
    }

    #[test]
    fn test_simulated_client_serves_trade_screen() {
        let (client, _) = SessionScript::from_yaml(SESSION).unwrap().into_parts();
        let mut plugin = TradeTrackerPlugin::new(client);
        plugin.start_up(&TradeTrackerConfig::default());

        plugin.on_widget_loaded(TRADE_CONFIRM_GROUP_ID);

        assert!(plugin.tracker().reputation().is_paid_trader(&normalize("gold seller")));
        assert_eq!(plugin.client().chat_refreshes(), 1);
    }
}
