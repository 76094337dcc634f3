//! Player preferences.

use std::sync::Arc;

use tracing::warn;

use crate::kv::KeyValueStore;
use crate::types::DEFAULT_PLAYER_NAME;
use crate::Result;

const PLAYER_NAME_KEY: &str = "prefs.player_name";
const SOUND_ENABLED_KEY: &str = "prefs.sound_enabled";
const HAPTICS_ENABLED_KEY: &str = "prefs.haptics_enabled";

/// Read/write access to the player's settings.
///
/// Reads never fail: a missing, unreadable or malformed value yields the default
/// (`"Player"`, sound on, haptics on).
#[derive(Debug)]
pub struct Preferences<K: KeyValueStore> {
    kv: Arc<K>,
}

impl<K: KeyValueStore> Clone for Preferences<K> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
        }
    }
}

impl<K: KeyValueStore> Preferences<K> {
    pub fn new(kv: Arc<K>) -> Self {
        Self { kv }
    }

    /// Display name recorded with results. Blank names fall back to the default.
    pub fn player_name(&self) -> String {
        self.read(PLAYER_NAME_KEY)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string())
    }

    pub fn set_player_name(&self, name: &str) -> Result<()> {
        self.kv.set(PLAYER_NAME_KEY, name.trim().to_string())
    }

    pub fn sound_enabled(&self) -> bool {
        self.read_flag(SOUND_ENABLED_KEY)
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> Result<()> {
        self.kv.set(SOUND_ENABLED_KEY, enabled.to_string())
    }

    pub fn haptics_enabled(&self) -> bool {
        self.read_flag(HAPTICS_ENABLED_KEY)
    }

    pub fn set_haptics_enabled(&self, enabled: bool) -> Result<()> {
        self.kv.set(HAPTICS_ENABLED_KEY, enabled.to_string())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "preference read failed, using default");
                None
            }
        }
    }

    fn read_flag(&self, key: &str) -> bool {
        self.read(key)
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn prefs() -> Preferences<MemoryStore> {
        Preferences::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_defaults() {
        let p = prefs();
        assert_eq!(p.player_name(), "Player");
        assert!(p.sound_enabled());
        assert!(p.haptics_enabled());
    }

    #[test]
    fn test_setters_persist() {
        let p = prefs();
        p.set_player_name("  Grace ").unwrap();
        p.set_sound_enabled(false).unwrap();
        p.set_haptics_enabled(false).unwrap();

        let shared = p.clone();
        assert_eq!(shared.player_name(), "Grace");
        assert!(!shared.sound_enabled());
        assert!(!shared.haptics_enabled());
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let p = prefs();
        p.set_player_name("   ").unwrap();
        assert_eq!(p.player_name(), "Player");
    }

    #[test]
    fn test_malformed_flag_reads_as_default() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(SOUND_ENABLED_KEY, "maybe".to_string()).unwrap();
        let p = Preferences::new(kv);
        assert!(p.sound_enabled());
    }
}
