// src/host/mod.rs - Adapter between raw game-client events and the tracker core

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::tracker::{SessionStats, TradeTracker};
use crate::types::{
    ChatMessageType, TrackerError, TrackerEvent, TrackerResult, TradeDecision, TradeScreen,
    TradeTrackerConfig, CONFIG_GROUP,
};

pub mod session;

/// Script callback fired right before a chat line is rendered
pub const CHAT_FILTER_CHECK: &str = "chatFilterCheck";

/// Second trade confirmation screen
pub const TRADE_CONFIRM_GROUP_ID: u32 = 334;
const TRADE_CONFIRM_CHILD_ID: u32 = 1;
const TRADE_PARTNER_NAME_SLOT: usize = 27;
const TRADE_ITEMS_SLOT: usize = 25;

/// One chat line in the host's message table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageNode {
    pub name: String,
    pub value: String,
}

/// Node of the host's UI tree, as far as this plugin reads it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub text: String,
    pub static_children: Vec<Widget>,
    pub dynamic_children: Vec<Widget>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    #[default]
    Player,
    Npc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub kind: ActorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptCallback {
    pub event_name: String,
    pub message_type: i32,
    pub message_id: u32,
}

/// Raw events as the game client delivers them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    OverheadTextChanged { actor: Actor, text: String },
    ScriptCallback(ScriptCallback),
    WidgetLoaded { group_id: u32 },
}

/// Everything the plugin needs from the game client
pub trait HostClient {
    fn message(&self, message_id: u32) -> Option<MessageNode>;

    fn widget(&self, group_id: u32, child_id: u32) -> Option<&Widget>;

    /// Re-run the chat filter over every visible line
    fn refresh_chat(&mut self);
}

/// The host's in/out slots for one chat filter check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCheckSlots {
    pub keep: bool,
    pub display_text: String,
}

impl FilterCheckSlots {
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            keep: true,
            display_text: display_text.into(),
        }
    }

    /// Write a decision back. Slots the decision leaves alone are not touched.
    pub fn apply(&mut self, decision: &TradeDecision) {
        if decision.suppress {
            self.keep = false;
        }
        if decision.display_text != self.display_text {
            self.display_text = decision.display_text.clone();
        }
    }
}

/// Strip `<col=...>`-style markup from widget text
pub fn remove_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Read the counterparty and first item off the trade confirmation widget
pub fn read_trade_screen(root: &Widget) -> TrackerResult<TradeScreen> {
    let name_widget = root.static_children.get(TRADE_PARTNER_NAME_SLOT).ok_or_else(|| {
        TrackerError::MalformedWidgetTree(format!("no trade partner slot {}", TRADE_PARTNER_NAME_SLOT))
    })?;
    let counterparty = name_widget
        .text
        .split("<br>")
        .nth(1)
        .map(remove_tags)
        .ok_or_else(|| {
            TrackerError::MalformedWidgetTree(format!(
                "trade partner text {:?} has no name line",
                name_widget.text
            ))
        })?;

    let first_item = root
        .static_children
        .get(TRADE_ITEMS_SLOT)
        .and_then(|items| items.dynamic_children.first())
        .map(|item| remove_tags(&item.text))
        .ok_or_else(|| TrackerError::MalformedWidgetTree("no traded item".to_string()))?;

    Ok(TradeScreen {
        counterparty,
        first_item,
    })
}

/// Plugin lifecycle and event subscriptions on top of a [`TradeTracker`]
pub struct TradeTrackerPlugin<C: HostClient> {
    client: C,
    tracker: TradeTracker,
}

impl<C: HostClient> TradeTrackerPlugin<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            tracker: TradeTracker::new(TradeTrackerConfig::default()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn tracker(&self) -> &TradeTracker {
        &self.tracker
    }

    pub fn stats(&self) -> SessionStats {
        self.tracker.stats()
    }

    pub fn start_up(&mut self, config: &TradeTrackerConfig) {
        self.tracker.apply_config(config.clone());
        self.client.refresh_chat();
        info!("Trade tracker started");
    }

    pub fn shut_down(&mut self) {
        self.tracker.reset();
        self.client.refresh_chat();
        info!("Trade tracker stopped");
    }

    pub fn on_config_changed(&mut self, group: &str, config: &TradeTrackerConfig) {
        if group != CONFIG_GROUP {
            return;
        }

        self.tracker.apply_config(config.clone());
        // Re-filter visible lines against the new rules
        self.client.refresh_chat();
    }

    pub fn on_overhead_text_changed(&mut self, actor: &Actor, text: &str) {
        if actor.kind != ActorKind::Player {
            return;
        }

        self.tracker.handle(TrackerEvent::OverheadSpeech {
            actor: actor.name.clone(),
            text: text.to_string(),
        });
    }

    pub fn on_script_callback(&mut self, callback: &ScriptCallback, slots: &mut FilterCheckSlots) {
        if callback.event_name != CHAT_FILTER_CHECK {
            return;
        }

        match self.chat_filter_check(callback, slots) {
            Ok(()) => {}
            Err(e @ TrackerError::UnrecognizedEvent(_)) => debug!("Skipping chat line: {}", e),
            Err(e) => warn!("Skipping chat filter check: {}", e),
        }
    }

    fn chat_filter_check(
        &mut self,
        callback: &ScriptCallback,
        slots: &mut FilterCheckSlots,
    ) -> TrackerResult<()> {
        let node = self
            .client
            .message(callback.message_id)
            .ok_or(TrackerError::UnknownMessage(callback.message_id))?;

        let message_type = ChatMessageType::from_code(callback.message_type).ok_or_else(|| {
            TrackerError::UnrecognizedEvent(format!("chat message type {}", callback.message_type))
        })?;

        let event = match message_type {
            ChatMessageType::TradeRequest => TrackerEvent::TradeFilterCheck {
                actor: node.name,
                message_id: callback.message_id,
                text: node.value,
            },
            ChatMessageType::PublicChat => TrackerEvent::PublicChat {
                actor: node.name,
                text: node.value,
            },
        };

        if let Some(decision) = self.tracker.handle(event) {
            slots.apply(&decision);
        }
        Ok(())
    }

    pub fn on_widget_loaded(&mut self, group_id: u32) {
        if group_id != TRADE_CONFIRM_GROUP_ID {
            return;
        }

        let screen = self
            .client
            .widget(TRADE_CONFIRM_GROUP_ID, TRADE_CONFIRM_CHILD_ID)
            .ok_or_else(|| TrackerError::MalformedWidgetTree("trade confirmation widget missing".to_string()))
            .and_then(read_trade_screen);

        match screen {
            Ok(screen) => {
                self.tracker.handle(TrackerEvent::TradeWindowOpened(screen));
            }
            Err(e) => warn!("Ignoring trade screen: {}", e),
        }
    }

    /// Route a raw host event. Chat filter checks hand back the written slots.
    pub fn dispatch(&mut self, event: HostEvent) -> Option<FilterCheckSlots> {
        match event {
            HostEvent::OverheadTextChanged { actor, text } => {
                self.on_overhead_text_changed(&actor, &text);
                None
            }
            HostEvent::ScriptCallback(callback) => {
                let mut slots = FilterCheckSlots::new(
                    self.client
                        .message(callback.message_id)
                        .map(|node| node.value)
                        .unwrap_or_default(),
                );
                self.on_script_callback(&callback, &mut slots);
                Some(slots)
            }
            HostEvent::WidgetLoaded { group_id } => {
                self.on_widget_loaded(group_id);
                None
            }
        }
    }
}
