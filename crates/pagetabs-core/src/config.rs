use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
    /// Tabs shown in the tab row, one page per tab, in display order
    #[serde(default = "default_tabs")]
    pub tabs: Vec<TabConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            ui: UiConfig::default(),
            images: ImageConfig::default(),
            keymap: KeymapConfig::default(),
            tabs: default_tabs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (holds the log file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Rows between the top of the screen and the tab row
    #[serde(default = "default_tab_bar_top")]
    pub tab_bar_top: u16,
    /// Opacity of the black tint laid over every page (0.0-1.0)
    #[serde(default = "default_tint_opacity")]
    pub tint_opacity: f32,
    /// Give up waiting for tab measurements after this long and measure again (0 = wait forever)
    #[serde(default = "default_measure_timeout")]
    pub measure_timeout_ms: u64,
    /// Page scrolling configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            tab_bar_top: default_tab_bar_top(),
            tint_opacity: default_tint_opacity(),
            measure_timeout_ms: default_measure_timeout(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Easing curve used when the pager animates to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
}

/// Page scroll animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate page changes instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of a page animation in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve for page animations
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL for image downloads (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Largest accepted image body in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            proxy_url: None,
            max_bytes: default_max_bytes(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "l", "<C-n>" (Ctrl+n), "<S-Tab>" (Shift+Tab), "<Right>", "<Esc>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Scroll to the next page
    #[serde(default = "default_key_next_page")]
    pub next_page: String,
    /// Scroll to the previous page
    #[serde(default = "default_key_prev_page")]
    pub prev_page: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            next_page: default_key_next_page(),
            prev_page: default_key_prev_page(),
        }
    }
}

/// One configured tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabConfig {
    /// Unique identity of the tab
    pub key: String,
    /// Label shown in the tab row (defaults to the key)
    #[serde(default)]
    pub title: Option<String>,
    /// Image URI shown on the tab's page
    pub image: String,
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_next_page() -> String { "l".to_string() }
fn default_key_prev_page() -> String { "h".to_string() }

const PEXELS_QUERY: &str = "?auto=compress&cs=tinysrgb&dpr=2&w=500";

fn default_tabs() -> Vec<TabConfig> {
    [
        ("man", "3147528"),
        ("women", "2552130"),
        ("kids", "5080167"),
        ("skullcandy", "5602879"),
        ("help", "2552130"),
    ]
    .into_iter()
    .map(|(key, photo)| TabConfig {
        key: key.to_string(),
        title: None,
        image: format!(
            "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg{PEXELS_QUERY}"
        ),
    })
    .collect()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagetabs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_tab_bar_top() -> u16 {
    3
}

fn default_tint_opacity() -> f32 {
    0.3
}

fn default_measure_timeout() -> u64 {
    2000
}

fn default_animation_duration() -> u64 {
    250
}

fn default_animation_fps() -> u32 {
    60
}

fn default_timeout() -> u64 {
    15
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pagetabs/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pagetabs")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("pagetabs.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.ui.tab_bar_top, 3);
        assert!((config.ui.tint_opacity - 0.3).abs() < f32::EPSILON);
        assert!(config.ui.scroll.smooth_enabled);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
        assert_eq!(config.keymap.quit, "q");
        assert_eq!(config.tabs.len(), 5);
        assert_eq!(config.tabs[0].key, "man");
        assert_eq!(config.tabs[4].key, "help");
    }

    #[test]
    fn test_partial_file_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [ui]
            measure_timeout_ms = 0

            [ui.scroll]
            easing = "ease_out"
            smooth_enabled = false

            [[tabs]]
            key = "one"
            image = "https://example.com/1.jpg"

            [[tabs]]
            key = "two"
            title = "Second"
            image = "https://example.com/2.jpg"
            "#,
        )
        .unwrap();

        assert_eq!(config.ui.measure_timeout_ms, 0);
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.ui.scroll.easing, EasingType::EaseOut);
        assert!(!config.ui.scroll.smooth_enabled);
        assert_eq!(config.ui.scroll.animation_duration_ms, 250);
        assert_eq!(config.tabs.len(), 2);
        assert_eq!(config.tabs[1].title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[ui\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_default_serializes_back() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.tabs, config.tabs);
    }

    #[test]
    fn test_log_path_under_data_dir() {
        let mut config = AppConfig::default();
        config.general.data_dir = PathBuf::from("/tmp/pagetabs-test");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pagetabs-test/pagetabs.log"));
    }
}
