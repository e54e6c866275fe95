//! Process configuration (environment) and hot-reloadable bot settings (RON file)

use crate::error::{BotError, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const DEFAULT_MESSAGE: &str =
    "Hi! I'm away at the moment and will get back to you as soon as I can.";
const DEFAULT_ROOM_NAME: &str = "Auto-reply";

#[derive(Clone, Debug)]
pub struct Config {
    /// Identity the bot acts for; every stored record is keyed by it
    pub bot_user_id: String,
    pub database_url: String,
    pub settings_path: PathBuf,
    /// JSON file holding `m.direct` account data for the console transport
    pub direct_rooms_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_user_id = env::var("BOT_USER_ID")
            .map_err(|_| BotError::Settings("BOT_USER_ID must be set".to_string()))?;

        Ok(Self {
            bot_user_id,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/autoreply.db".to_string()),
            settings_path: env::var("AUTOREPLY_CONFIG")
                .unwrap_or_else(|_| "./config/autoreply.ron".to_string())
                .into(),
            direct_rooms_file: env::var("DIRECT_ROOMS_FILE").ok().map(PathBuf::from),
        })
    }
}

/// Appearance of the management room created on first start
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomSettings {
    pub name: String,
    /// `mxc://` URL of the room avatar; may be empty
    #[serde(default)]
    pub icon: String,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROOM_NAME.to_string(),
            icon: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoReplySettings {
    /// Text sent into a direct room on the first message while away
    pub message: String,
    #[serde(default)]
    pub room: RoomSettings,
}

impl Default for AutoReplySettings {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            room: RoomSettings::default(),
        }
    }
}

impl AutoReplySettings {
    pub fn parse(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| BotError::Settings(e.to_string()))
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::Settings(format!("failed to read {:?}: {}", path, e)))?;
        Self::parse(&content)
    }
}

struct Loaded {
    settings: AutoReplySettings,
    modified: Option<SystemTime>,
}

/// Settings that follow edits of the backing file without a restart.
///
/// `current` only reads the cached copy. `refresh_if_changed` re-reads the
/// file when its modification time moved and is meant to be polled off the
/// message path. A broken edit keeps the last good settings in place.
pub struct SettingsHandle {
    path: PathBuf,
    state: RwLock<Loaded>,
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl SettingsHandle {
    /// Load settings from `path`, falling back to defaults if the file does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let settings = AutoReplySettings::read(&path)?;
            log::info!("[settings] Loaded settings from {:?}", path);
            settings
        } else {
            log::warn!("[settings] Settings file not found: {:?}, using defaults", path);
            AutoReplySettings::default()
        };

        Ok(Self {
            state: RwLock::new(Loaded {
                settings,
                modified: modified_at(&path),
            }),
            path,
        })
    }

    /// Fixed settings with no backing file
    #[cfg(test)]
    pub fn fixed(settings: AutoReplySettings) -> Self {
        Self {
            path: PathBuf::new(),
            state: RwLock::new(Loaded {
                settings,
                modified: None,
            }),
        }
    }

    /// Cached settings; never touches the filesystem
    pub fn current(&self) -> AutoReplySettings {
        self.state.read().settings.clone()
    }

    /// Re-read the file if its modification time changed since the last load.
    /// Returns whether new settings were applied.
    pub fn refresh_if_changed(&self) -> bool {
        let modified = modified_at(&self.path);
        if modified.is_none() || self.state.read().modified == modified {
            return false;
        }

        let mut state = self.state.write();
        // Recorded even on failure so a broken file is reported once per edit
        state.modified = modified;
        match AutoReplySettings::read(&self.path) {
            Ok(settings) => {
                log::info!("[settings] Reloaded settings from {:?}", self.path);
                state.settings = settings;
                true
            }
            Err(e) => {
                log::error!("[settings] Keeping previous settings: {}", e);
                false
            }
        }
    }

    /// Force a re-read of the settings file
    pub fn reload(&self) -> Result<AutoReplySettings> {
        let settings = AutoReplySettings::read(&self.path)?;
        let mut state = self.state.write();
        state.settings = settings.clone();
        state.modified = modified_at(&self.path);
        log::info!("[settings] Reloaded settings from {:?}", self.path);
        Ok(settings)
    }
}
