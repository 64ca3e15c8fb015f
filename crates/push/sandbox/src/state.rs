//! Registration table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use pubnub_core::{PushEnvironment, PushType};

/// Identifies one device registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrationKey {
    pub sub_key: String,
    pub push_type: PushType,
    /// Lowercase hex token.
    pub token: String,
    /// Only set for apns2 registrations.
    pub environment: Option<PushEnvironment>,
    pub topic: Option<String>,
}

/// Shared sandbox state.
#[derive(Clone, Default)]
pub struct SandboxState {
    registrations: Arc<Mutex<HashMap<RegistrationKey, Vec<String>>>>,
    auth_key: Option<String>,
}

impl SandboxState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject requests whose `auth` parameter does not match `key`.
    pub fn with_auth_key(mut self, key: impl Into<String>) -> Self {
        self.auth_key = Some(key.into());
        self
    }

    pub fn is_authorized(&self, auth: Option<&str>) -> bool {
        match &self.auth_key {
            Some(expected) => auth == Some(expected.as_str()),
            None => true,
        }
    }

    /// Register channels, keeping first-insertion order and skipping duplicates.
    pub fn add(&self, key: &RegistrationKey, channels: &[String]) {
        let mut table = self.table();
        let registered = table.entry(key.clone()).or_default();
        for channel in channels {
            if !registered.contains(channel) {
                registered.push(channel.clone());
            }
        }
    }

    pub fn remove(&self, key: &RegistrationKey, channels: &[String]) {
        let mut table = self.table();
        if let Some(registered) = table.get_mut(key) {
            registered.retain(|channel| !channels.contains(channel));
            if registered.is_empty() {
                table.remove(key);
            }
        }
    }

    pub fn remove_device(&self, key: &RegistrationKey) {
        self.table().remove(key);
    }

    pub fn channels(&self, key: &RegistrationKey) -> Vec<String> {
        self.table().get(key).cloned().unwrap_or_default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<RegistrationKey, Vec<String>>> {
        // Every update is a single in-place edit, so a poisoned table is still usable.
        self.registrations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
