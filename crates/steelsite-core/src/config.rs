#![forbid(unsafe_code)]

//! Page behavior configuration.
//!
//! Every threshold and duration the behavior layer uses lives in
//! [`SiteConfig`]. The web host accepts an optional JS options object, which
//! is JSON-encoded and parsed here; omitted fields keep their defaults.
//!
//! ```
//! use steelsite_core::config::SiteConfig;
//!
//! let config = SiteConfig::from_json(r#"{"headerThreshold": 80, "menu": {"staggerMs": 30}}"#).unwrap();
//! assert_eq!(config.header_threshold, 80.0);
//! assert_eq!(config.menu.stagger_ms, 30);
//! assert_eq!(config.status_hide_ms, 5000);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::SiteError;

/// Tunables for the scroll synchronizer, menu, form and logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Scroll offset (px) beyond which the header is marked `scrolled`.
    pub header_threshold: f64,
    /// Fixed-header compensation added to the scroll offset when probing sections.
    pub header_offset: f64,
    /// How far above its top edge (px) a section already counts as reached.
    pub section_lead: f64,
    /// Debounce window for scroll-driven recomputation.
    pub scroll_debounce_ms: u64,
    /// Fire on the leading edge of a scroll burst (otherwise trailing).
    pub scroll_debounce_leading: bool,
    /// Upper bound for parallax image scale.
    pub parallax_max_scale: f64,
    /// Scale reached by the sticky image at the end of its container.
    pub sticky_min_scale: f64,
    /// Opacity reached by the sticky image at the end of its container.
    pub sticky_min_opacity: f64,
    /// Base opacity of the hero's glass circles.
    pub hero_circle_opacity: f64,
    /// Base opacity of the hero's light rays.
    pub hero_ray_opacity: f64,
    /// Mobile menu animation timing.
    pub menu: MenuConfig,
    /// How long a successful submission acknowledgement stays visible.
    pub status_hide_ms: u64,
    /// Maximum log level forwarded to the browser console.
    pub log_level: String,
}

/// Mobile menu animation timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuConfig {
    /// Delay before the first item starts revealing.
    pub open_delay_ms: u64,
    /// Constant step between consecutive items.
    pub stagger_ms: u64,
    /// Time from the start of closing until the panel is hidden.
    pub close_duration_ms: u64,
    /// Delay between selecting an item and closing, so the anchor jump registers.
    pub select_close_delay_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: 10,
            stagger_ms: 50,
            close_duration_ms: 300,
            select_close_delay_ms: 150,
        }
    }
}

impl MenuConfig {
    #[must_use]
    pub const fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    #[must_use]
    pub const fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    #[must_use]
    pub const fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_duration_ms)
    }

    #[must_use]
    pub const fn select_close_delay(&self) -> Duration {
        Duration::from_millis(self.select_close_delay_ms)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_threshold: 50.0,
            header_offset: 60.0,
            section_lead: 100.0,
            scroll_debounce_ms: 100,
            scroll_debounce_leading: true,
            parallax_max_scale: 1.1,
            sticky_min_scale: 0.7,
            sticky_min_opacity: 0.3,
            hero_circle_opacity: 0.8,
            hero_ray_opacity: 0.6,
            menu: MenuConfig::default(),
            status_hide_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse a JSON options object and validate it.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the derived visual state meaningless.
    pub fn validate(&self) -> Result<(), SiteError> {
        let finite = [
            ("headerThreshold", self.header_threshold),
            ("headerOffset", self.header_offset),
            ("sectionLead", self.section_lead),
            ("parallaxMaxScale", self.parallax_max_scale),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SiteError::Config(format!("{name} must be finite")));
            }
        }
        if self.parallax_max_scale < 1.0 {
            return Err(SiteError::Config(
                "parallaxMaxScale must be at least 1.0".to_string(),
            ));
        }
        let unit = [
            ("stickyMinScale", self.sticky_min_scale),
            ("stickyMinOpacity", self.sticky_min_opacity),
            ("heroCircleOpacity", self.hero_circle_opacity),
            ("heroRayOpacity", self.hero_ray_opacity),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SiteError::Config(format!("{name} must be within 0..=1")));
            }
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(SiteError::Config(format!(
                "unknown log level `{}`",
                self.log_level
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    #[must_use]
    pub const fn status_hide(&self) -> Duration {
        Duration::from_millis(self.status_hide_ms)
    }

    /// Parsed log level; falls back to `INFO` for unvalidated configs.
    #[must_use]
    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
