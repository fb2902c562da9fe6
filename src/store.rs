//! Per-user settings, conversation history, and records, persisted to a
//! single JSON file.
//!
//! The whole profile map is rewritten on every mutation. Durability is
//! best-effort: a failed write is logged and the in-memory state stays
//! authoritative for the rest of the process lifetime.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{error, info};

use crate::types::{ChatTurn, MessageRole, UserProfile};

/// Oldest turns are evicted once a history grows past this bound.
const MAX_HISTORY_TURNS: usize = 20;

pub struct SettingsStore {
    path: PathBuf,
    profiles: Mutex<HashMap<u64, UserProfile>>,
}

impl SettingsStore {
    /// Opens the store, loading any previously persisted profiles.
    ///
    /// A missing file starts the store empty; an unreadable or malformed
    /// file is logged and also starts it empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let profiles = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HashMap<u64, UserProfile>>(&json) {
                Ok(profiles) => {
                    info!(
                        "Loaded {} user profiles from {}",
                        profiles.len(),
                        path.display()
                    );
                    profiles
                }
                Err(e) => {
                    error!(
                        "Settings file {} is malformed, starting empty: {e}",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                error!("Failed to read settings file {}: {e}", path.display());
                HashMap::new()
            }
        };

        Self {
            path,
            profiles: Mutex::new(profiles),
        }
    }

    /// Returns the user's profile, creating and persisting a default one on
    /// first access.
    pub fn get_or_create(&self, user_id: u64) -> UserProfile {
        let mut profiles = self.lock();
        if let Some(profile) = profiles.get(&user_id) {
            return profile.clone();
        }

        let profile = UserProfile::default();
        profiles.insert(user_id, profile.clone());
        self.persist(&profiles);
        profile
    }

    /// Replaces the stored profile and persists.
    pub fn update(&self, user_id: u64, profile: UserProfile) {
        let mut profiles = self.lock();
        profiles.insert(user_id, profile);
        self.persist(&profiles);
    }

    /// Appends a timestamped turn, evicting the oldest turns past the bound.
    pub fn append_history(&self, user_id: u64, role: MessageRole, content: &str) {
        let mut profiles = self.lock();
        let profile = profiles.entry(user_id).or_default();
        profile.history.push(ChatTurn::new(role, content));

        let excess = profile.history.len().saturating_sub(MAX_HISTORY_TURNS);
        if excess > 0 {
            profile.history.drain(..excess);
        }

        self.persist(&profiles);
    }

    /// Empties the user's conversation history.
    pub fn clear_history(&self, user_id: u64) {
        let mut profiles = self.lock();
        profiles.entry(user_id).or_default().history.clear();
        self.persist(&profiles);
    }

    /// Appends a free-form record. Records are unbounded.
    pub fn add_record(&self, user_id: u64, text: &str) {
        let mut profiles = self.lock();
        profiles.entry(user_id).or_default().records.push(text.to_string());
        self.persist(&profiles);
    }

    pub fn list_records(&self, user_id: u64) -> Vec<String> {
        self.get_or_create(user_id).records
    }

    /// Returns the record at `index`, or an empty string when out of range.
    pub fn get_record(&self, user_id: u64, index: usize) -> String {
        self.get_or_create(user_id)
            .records
            .into_iter()
            .nth(index)
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, UserProfile>> {
        // A poisoned lock only means another turn panicked mid-mutation;
        // the map itself is still usable.
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whole-map rewrite. Failures are logged, never surfaced to callers.
    fn persist(&self, profiles: &HashMap<u64, UserProfile>) {
        let json = match serde_json::to_string(profiles) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize user settings: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, json) {
            error!(
                "Failed to write settings file {}: {e}",
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::load(dir.path().join("user_settings.json"))
    }

    #[test]
    fn unseen_user_gets_default_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        let profile = store.get_or_create(1);
        assert_eq!(profile.language, "zh-CN");
        assert!((profile.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(profile.max_tokens, 2000);
        assert_eq!(profile.response_style, "default");
        assert!(profile.history.is_empty());
        assert!(profile.records.is_empty());

        // A second access returns the same value without re-defaulting.
        assert_eq!(store.get_or_create(1), profile);
    }

    #[test]
    fn history_is_bounded_to_twenty_turns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        for i in 0..25 {
            store.append_history(1, MessageRole::User, &format!("message {i}"));
        }

        let history = store.get_or_create(1).history;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].content, "message 5");
        assert_eq!(history[19].content, "message 24");
    }

    #[test]
    fn short_history_keeps_every_turn_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        store.append_history(1, MessageRole::User, "你好");
        store.append_history(1, MessageRole::Assistant, "你好！有什么可以帮你？");

        let history = store.get_or_create(1).history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[test]
    fn profiles_survive_a_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("user_settings.json");

        {
            let store = SettingsStore::load(&path);
            store.append_history(1, MessageRole::User, "你好");
            store.add_record(1, "一只棕色的狐狸");

            let mut profile = store.get_or_create(2);
            profile.language = "en-US".to_string();
            store.update(2, profile);
        }

        let reloaded = SettingsStore::load(&path);
        let first = reloaded.get_or_create(1);
        assert_eq!(first.history.len(), 1);
        assert_eq!(first.history[0].content, "你好");
        assert_eq!(first.records, vec!["一只棕色的狐狸".to_string()]);
        assert_eq!(reloaded.get_or_create(2).language, "en-US");
    }

    #[test]
    fn corrupt_settings_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("user_settings.json");
        fs::write(&path, "{not valid json").expect("write corrupt file");

        let store = SettingsStore::load(&path);
        assert_eq!(store.get_or_create(9), UserProfile::default());
    }

    #[test]
    fn clear_history_leaves_records_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        store.append_history(1, MessageRole::User, "你好");
        store.add_record(1, "记住这个");
        store.clear_history(1);

        let profile = store.get_or_create(1);
        assert!(profile.history.is_empty());
        assert_eq!(profile.records, vec!["记住这个".to_string()]);
    }

    #[test]
    fn records_are_index_addressable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = temp_store(&dir);

        store.add_record(1, "alpha");
        store.add_record(1, "beta");

        assert_eq!(store.list_records(1), vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(store.get_record(1, 1), "beta");
        assert_eq!(store.get_record(1, 5), "");
    }

    #[test]
    fn persistence_failure_keeps_in_memory_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Parent directory does not exist, so every write fails.
        let store = SettingsStore::load(dir.path().join("missing").join("user_settings.json"));

        store.add_record(1, "kept");
        assert_eq!(store.list_records(1), vec!["kept".to_string()]);
    }
}
