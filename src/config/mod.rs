// src/config/mod.rs - Plugin configuration storage with hot-reload

use anyhow::Result;
use log::{debug, error, info, warn};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{broadcast, RwLock};
use tokio::time::Duration;

use crate::types::{TradeTrackerConfig, CONFIG_GROUP};

pub const CONFIG_FILE: &str = "tradetracker.yaml";
const CONFIG_FILE_ALT: &str = "tradetracker.yml";

/// Quiet period after the last file event before the file is re-read
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

/// Events broadcasted when configuration changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigChangeEvent {
    /// The snapshot for `group` was replaced
    ConfigChanged { group: String },
    ValidationError { file: String, error: String },
}

/// Owns the on-disk plugin configuration and keeps a cached snapshot in sync
/// with it
#[derive(Clone)]
pub struct ConfigurationManager {
    config_dir: PathBuf,
    config: Arc<RwLock<TradeTrackerConfig>>,

    /// Kept alive for as long as the manager is
    watchers: Arc<RwLock<Vec<RecommendedWatcher>>>,

    change_notifier: broadcast::Sender<ConfigChangeEvent>,
}

/// Reject configurations the tracker cannot act on sensibly
pub fn validate_config(config: &TradeTrackerConfig) -> Result<()> {
    if config.hide_paid_advertisers && config.item_traded.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "item_traded cannot be empty when hide_paid_advertisers is enabled"
        ));
    }

    for (field, value) in [
        ("whitelisted_players", &config.whitelisted_players),
        ("ad_words", &config.ad_words),
    ] {
        if let Some(line) = value.lines().find(|line| line.contains('<') || line.contains('>')) {
            return Err(anyhow::anyhow!(
                "{} entry {:?} cannot contain markup",
                field,
                line.trim()
            ));
        }
    }

    Ok(())
}

impl ConfigurationManager {
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        let (tx, _) = broadcast::channel(100);

        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            config: Arc::new(RwLock::new(TradeTrackerConfig::default())),
            watchers: Arc::new(RwLock::new(Vec::new())),
            change_notifier: tx,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Create the config directory, load or create the config file, and start
    /// watching it
    pub async fn initialize(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).await?;
            info!("Created configuration directory: {}", self.config_dir.display());
        }

        if !self.config_path().exists() {
            self.create_default_config().await?;
        } else if let Err(e) = self.load_config().await {
            // Leave the user's file alone so they can fix it
            warn!("Failed to load trade tracker config, using defaults: {}", e);
        }

        self.setup_file_watcher().await?;

        info!("Configuration manager initialized successfully");
        Ok(())
    }

    async fn load_config(&self) -> Result<()> {
        let config_path = self.config_path();
        if !config_path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let config = Self::read_config(&config_path).await?;
        *self.config.write().await = config;

        debug!("Loaded configuration from {}", config_path.display());
        Ok(())
    }

    async fn read_config(path: &Path) -> Result<TradeTrackerConfig> {
        let content = fs::read_to_string(path).await?;
        let config: TradeTrackerConfig = serde_yaml::from_str(&content)?;
        validate_config(&config)?;
        Ok(config)
    }

    async fn create_default_config(&self) -> Result<()> {
        let config = TradeTrackerConfig::default();
        let config_path = self.config_path();

        fs::write(&config_path, serde_yaml::to_string(&config)?).await?;
        *self.config.write().await = config;

        info!("Created default configuration: {}", config_path.display());
        Ok(())
    }

    async fn setup_file_watcher(&self) -> Result<()> {
        let config_dir = self.config_dir.clone();
        let change_notifier = self.change_notifier.clone();
        let config = self.config.clone();

        let (tx, mut rx) = tokio::sync::mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if let Err(e) = tx.blocking_send(event) {
                    error!("Failed to send file watch event: {}", e);
                }
            }
        })?;

        watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
        self.watchers.write().await.push(watcher);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(mut path) = Self::config_file_event(&event) else {
                    continue;
                };

                // Editors fire several events per save; reload once things go quiet
                loop {
                    match tokio::time::timeout(RELOAD_DEBOUNCE, rx.recv()).await {
                        Ok(Some(event)) => {
                            if let Some(changed) = Self::config_file_event(&event) {
                                path = changed;
                            }
                        }
                        Ok(None) | Err(_) => break,
                    }
                }

                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(CONFIG_FILE)
                    .to_string();

                info!("Trade tracker configuration changed, reloading...");
                match Self::read_config(&path).await {
                    Ok(updated) => {
                        *config.write().await = updated;
                        let _ = change_notifier.send(ConfigChangeEvent::ConfigChanged {
                            group: CONFIG_GROUP.to_string(),
                        });
                    }
                    Err(e) => {
                        error!("Failed to reload trade tracker config: {}", e);
                        let _ = change_notifier.send(ConfigChangeEvent::ValidationError {
                            file: filename,
                            error: e.to_string(),
                        });
                    }
                }
            }
        });

        info!("File watcher setup for hot-reloading");
        Ok(())
    }

    /// Path of the config file an event touched, if it is a write to one
    fn config_file_event(event: &Event) -> Option<PathBuf> {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return None;
        }

        event.paths.iter().find_map(|path| {
            let filename = path.file_name().and_then(|n| n.to_str())?;
            if filename == CONFIG_FILE || filename == CONFIG_FILE_ALT {
                Some(path.clone())
            } else {
                debug!("Ignoring change to non-config file: {}", filename);
                None
            }
        })
    }

    pub async fn get_config(&self) -> TradeTrackerConfig {
        self.config.read().await.clone()
    }

    pub fn subscribe_to_changes(&self) -> broadcast::Receiver<ConfigChangeEvent> {
        self.change_notifier.subscribe()
    }

    /// Validate, persist and publish a new configuration
    pub async fn save_config(&self, config: TradeTrackerConfig) -> Result<()> {
        validate_config(&config)?;

        let config_path = self.config_path();
        fs::write(&config_path, serde_yaml::to_string(&config)?).await?;
        *self.config.write().await = config;

        let _ = self.change_notifier.send(ConfigChangeEvent::ConfigChanged {
            group: CONFIG_GROUP.to_string(),
        });
        info!("Saved configuration to {}", config_path.display());
        Ok(())
    }
}
