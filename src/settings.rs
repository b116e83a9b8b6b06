//! Player preferences
//!
//! Persisted in LocalStorage, separate from gameplay tuning.

use serde::{Deserialize, Serialize};

/// Presentation and accessibility preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Motion trails behind moving entities
    pub trails: bool,
    /// Full-screen flash when the player is hit
    pub screen_flash: bool,

    // === HUD ===
    /// Show the diagnostics readout
    pub show_debug: bool,

    // === Behaviour ===
    /// Pause when the tab is hidden or the window loses focus
    pub pause_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trails: true,
            screen_flash: true,
            show_debug: true,
            pause_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "antimatter_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring saved settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native: {:?}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_flash() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_flash());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_flash());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"trails":false}"#).unwrap();
        assert!(!settings.trails);
        assert!(settings.screen_flash);
        assert!(settings.pause_on_blur);
    }
}
