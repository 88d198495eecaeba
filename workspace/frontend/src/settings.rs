use log::Level;
use wasm_bindgen::JsValue;
use web_sys::window;

use client::api_base::{CANDIDATE_HOSTS, CANDIDATE_PORTS, DEFAULT_FALLBACK_BASE, DEFAULT_PROBE_TIMEOUT};
use client::family_code::STATUS_MESSAGE_DURATION;
use client::poller::DEFAULT_POLL_INTERVAL;

const KEY_PREFIX: &str = "mealplan_";

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Fixed API base; skips health-probe discovery when set
    pub api_base_override: Option<String>,

    /// Base used when no candidate answers its health probe
    pub fallback_api_base: String,

    /// Per-candidate health probe timeout in milliseconds
    pub probe_timeout_ms: u32,

    /// Hosts tried during API base discovery
    pub candidate_hosts: Vec<String>,

    /// Ports tried on every candidate host
    pub candidate_ports: Vec<u16>,

    /// Notification poll interval in milliseconds
    pub poll_interval_ms: u32,

    /// How long copy/share status messages stay visible
    pub status_message_ms: u32,

    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,

    pub login_url: String,
    pub family_select_url: String,
    pub messages_url: String,
    pub family_manage_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_override: None,
            fallback_api_base: DEFAULT_FALLBACK_BASE.to_string(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u32,
            candidate_hosts: CANDIDATE_HOSTS.iter().map(|h| h.to_string()).collect(),
            candidate_ports: CANDIDATE_PORTS.to_vec(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u32,
            status_message_ms: STATUS_MESSAGE_DURATION.as_millis() as u32,
            log_level: Level::Info,
            debug_mode: false,
            login_url: "login.html".to_string(),
            family_select_url: "select_family.html".to_string(),
            messages_url: "messages.html".to_string(),
            family_manage_url: "manage_family.html".to_string(),
        }
    }
}

impl AppSettings {
    /// Create settings from environment/window location
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            settings.apply_overrides(|key| storage.get_item(&format!("{KEY_PREFIX}{key}")).ok().flatten());
        }

        settings
    }

    /// Applies every override `lookup` knows about. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("api_base").filter(|v| !v.trim().is_empty()) {
            self.api_base_override = Some(api_base.trim().to_string());
        }

        if let Some(fallback) = lookup("fallback_api_base").filter(|v| !v.trim().is_empty()) {
            self.fallback_api_base = fallback.trim().to_string();
        }

        if let Some(timeout) = lookup("probe_timeout_ms")
            .and_then(|v| v.parse().ok())
            .filter(|ms: &u32| *ms > 0)
        {
            self.probe_timeout_ms = timeout;
        }

        if let Some(hosts) = lookup("candidate_hosts") {
            let hosts: Vec<String> = hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect();
            if !hosts.is_empty() {
                self.candidate_hosts = hosts;
            }
        }

        if let Some(ports) = lookup("candidate_ports") {
            let ports: Vec<u16> = ports
                .split(',')
                .filter_map(|p| p.trim().parse().ok())
                .collect();
            if !ports.is_empty() {
                self.candidate_ports = ports;
            }
        }

        if let Some(interval) = lookup("poll_interval_ms")
            .and_then(|v| v.parse().ok())
            .filter(|ms: &u32| *ms > 0)
        {
            self.poll_interval_ms = interval;
        }

        if let Some(log_level) = lookup("log_level") {
            self.log_level = match log_level.to_lowercase().as_str() {
                "error" => Level::Error,
                "warn" => Level::Warn,
                "info" => Level::Info,
                "debug" => Level::Debug,
                "trace" => Level::Trace,
                _ => self.log_level,
            };
        }

        if let Some(login_url) = lookup("login_url") {
            self.login_url = login_url;
        }
    }

    /// Save settings to localStorage
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        if let Some(window) = window() {
            if let Some(storage) = window.local_storage()? {
                let key = |name: &str| format!("{KEY_PREFIX}{name}");
                match &self.api_base_override {
                    Some(base) => storage.set_item(&key("api_base"), base)?,
                    None => storage.remove_item(&key("api_base"))?,
                }
                storage.set_item(&key("fallback_api_base"), &self.fallback_api_base)?;
                storage.set_item(&key("probe_timeout_ms"), &self.probe_timeout_ms.to_string())?;
                storage.set_item(&key("candidate_hosts"), &self.candidate_hosts.join(","))?;
                let ports: Vec<String> = self.candidate_ports.iter().map(u16::to_string).collect();
                storage.set_item(&key("candidate_ports"), &ports.join(","))?;
                storage.set_item(&key("poll_interval_ms"), &self.poll_interval_ms.to_string())?;
                storage.set_item(&key("log_level"), &format!("{:?}", self.log_level).to_lowercase())?;
                storage.set_item(&key("login_url"), &self.login_url)?;
            }
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.probe_timeout_ms))
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.poll_interval_ms))
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::from_environment());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Update the global settings
pub fn update_settings<F>(f: F)
where
    F: FnOnce(&mut AppSettings),
{
    SETTINGS.with(|s| {
        let mut settings = s.borrow_mut();
        f(&mut settings);
    });
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> AppSettings {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut settings = AppSettings::default();
        settings.apply_overrides(|key| values.get(key).cloned());
        settings
    }

    #[test]
    fn test_defaults_match_discovery_constants() {
        let settings = AppSettings::default();
        assert_eq!(settings.probe_timeout_ms, 2500);
        assert_eq!(settings.poll_interval_ms, 30_000);
        assert_eq!(settings.status_message_ms, 3_000);
        assert_eq!(settings.candidate_ports, vec![8900, 8765, 8000]);
        assert!(settings.api_base_override.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let settings = overrides(&[
            ("api_base", " https://meal.example/api "),
            ("candidate_ports", "9000, nope ,9001"),
            ("log_level", "TRACE"),
            ("poll_interval_ms", "5000"),
        ]);
        assert_eq!(settings.api_base_override.as_deref(), Some("https://meal.example/api"));
        assert_eq!(settings.candidate_ports, vec![9000, 9001]);
        assert_eq!(settings.log_level, Level::Trace);
        assert_eq!(settings.poll_interval_ms, 5000);
    }

    #[test]
    fn test_garbage_overrides_keep_defaults() {
        let settings = overrides(&[
            ("api_base", "   "),
            ("candidate_ports", "x,y"),
            ("probe_timeout_ms", "soon"),
            ("log_level", "loud"),
        ]);
        assert!(settings.api_base_override.is_none());
        assert_eq!(settings.candidate_ports, vec![8900, 8765, 8000]);
        assert_eq!(settings.probe_timeout_ms, 2500);
        assert_eq!(settings.log_level, Level::Info);
    }

    #[test]
    fn test_zero_durations_are_ignored() {
        let settings = overrides(&[("poll_interval_ms", "0"), ("probe_timeout_ms", "0")]);
        assert_eq!(settings.poll_interval_ms, 30_000);
        assert_eq!(settings.probe_timeout_ms, 2500);
        assert_eq!(settings.poll_interval(), DEFAULT_POLL_INTERVAL);
    }
}
