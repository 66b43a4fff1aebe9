//! Cosmetic shell settings, persisted alongside game progress.

use crate::storage::KeyValueStore;

/// Storage key for the dark-mode flag.
pub const KEY_DARK_MODE: &str = "hub.dark_mode";
/// Storage key for the sound flag.
pub const KEY_SOUND: &str = "hub.sound";

/// Shell-level toggles shared by every game: color theme and sound.
///
/// These belong to the hub, not to any one controller, and persist
/// through the same store as game progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubSettings {
    /// Render with the dark palette.
    pub dark_mode: bool,
    /// Play audio cues.
    pub sound: bool,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            sound: true,
        }
    }
}

impl HubSettings {
    /// Load settings from the store, falling back to defaults for
    /// missing or unreadable values.
    #[must_use]
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let defaults = Self::default();
        Self {
            dark_mode: read_flag(store, KEY_DARK_MODE).unwrap_or(defaults.dark_mode),
            sound: read_flag(store, KEY_SOUND).unwrap_or(defaults.sound),
        }
    }

    /// Write both flags to the store.
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        store.set(KEY_DARK_MODE, flag_str(self.dark_mode));
        store.set(KEY_SOUND, flag_str(self.sound));
    }

    /// Flip the theme and persist.
    pub fn toggle_dark_mode<S: KeyValueStore>(&mut self, store: &mut S) {
        self.dark_mode = !self.dark_mode;
        store.set(KEY_DARK_MODE, flag_str(self.dark_mode));
    }

    /// Flip the sound flag and persist.
    pub fn toggle_sound<S: KeyValueStore>(&mut self, store: &mut S) {
        self.sound = !self.sound;
        store.set(KEY_SOUND, flag_str(self.sound));
    }
}

fn read_flag<S: KeyValueStore>(store: &S, key: &str) -> Option<bool> {
    match store.get(key)?.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

const fn flag_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_store_empty() {
        let store = MemoryStore::new();
        let settings = HubSettings::load(&store);
        assert!(settings.dark_mode);
        assert!(settings.sound);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let settings = HubSettings {
            dark_mode: false,
            sound: true,
        };
        settings.save(&mut store);
        assert_eq!(HubSettings::load(&store), settings);
    }

    #[test]
    fn test_toggles_persist() {
        let mut store = MemoryStore::new();
        let mut settings = HubSettings::default();
        settings.toggle_sound(&mut store);
        assert!(!settings.sound);
        assert_eq!(store.get(KEY_SOUND).as_deref(), Some("false"));

        settings.toggle_dark_mode(&mut store);
        assert_eq!(store.get(KEY_DARK_MODE).as_deref(), Some("false"));
        assert_eq!(HubSettings::load(&store), settings);
    }

    #[test]
    fn test_garbage_value_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set(KEY_DARK_MODE, "maybe");
        let settings = HubSettings::load(&store);
        assert!(settings.dark_mode);
    }
}
