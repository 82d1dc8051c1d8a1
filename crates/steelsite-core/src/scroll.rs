#![forbid(unsafe_code)]

//! Scroll-derived visual state.
//!
//! [`derive`] is a pure function from the current [`ScrollSnapshot`] and the
//! measured [`PageGeometry`] to a [`VisualState`]. Applying that state to the
//! DOM is the host's job; [`VisualState::changes_since`] tells it which parts
//! actually moved since the previous tick.
//!
//! # Sub-behaviors
//!
//! 1. Header: `scrolled` once the offset exceeds `header_threshold`.
//! 2. Current section: with `probe = scroll_y + header_offset`, the deepest
//!    section whose `top - section_lead <= probe`. It drives both the
//!    navigation indicator and the accent class, so the two can never
//!    disagree.
//! 3. Parallax: `min(max_scale, 1 + progress * intensity / 10)` for
//!    containers intersecting the viewport, where
//!    `progress = 1 - (top + height / 2) / (viewport + height)`.
//! 4. Sticky image: scale and opacity interpolate from 1 down to their
//!    minimums as scroll moves through the container.
//! 5. Hero fade: decorations fade from their base opacity to zero across the
//!    hero's height.
//!
//! # Invariants
//!
//! 1. At most one section is current.
//! 2. Parallax scale never exceeds `parallax_max_scale` and is
//!    non-decreasing in progress.
//! 3. Sticky scale/opacity are non-increasing in progress and hit their
//!    minimums exactly at progress 1.
//! 4. Hero opacities lie in `[0, base]`.

use bitflags::bitflags;

use crate::config::SiteConfig;
use crate::section::SectionId;

/// Scroll position and viewport size for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSnapshot {
    pub scroll_y: f64,
    pub viewport_height: f64,
}

impl ScrollSnapshot {
    #[must_use]
    pub const fn new(scroll_y: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
        }
    }
}

/// Measured parallax container: parsed intensity and viewport-relative rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxFrame {
    /// Parsed `data-parallax-intensity`; `None` when absent or not a number.
    pub intensity: Option<f64>,
    /// Bounding rect top, relative to the viewport.
    pub top: f64,
    pub height: f64,
}

/// Measured sticky container: document offset and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyFrame {
    pub offset_top: f64,
    pub height: f64,
}

/// Static DOM geometry the synchronizer reads each tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageGeometry {
    /// Document offset of each section, by [`SectionId::index`]; `None` if missing.
    pub section_tops: [Option<f64>; SectionId::COUNT],
    /// One entry per parallax image; `None` when it has no container.
    pub parallax: Vec<Option<ParallaxFrame>>,
    pub sticky: Option<StickyFrame>,
    /// Height of the hero section, `0.0` when missing.
    pub hero_height: f64,
    /// Both glass circles and light rays are present.
    pub hero_decorations: bool,
}

impl PageGeometry {
    /// Builder: set a section's top offset.
    #[must_use]
    pub fn with_section(mut self, id: SectionId, top: f64) -> Self {
        self.section_tops[id.index()] = Some(top);
        self
    }

    #[must_use]
    pub fn section_top(&self, id: SectionId) -> Option<f64> {
        self.section_tops[id.index()]
    }
}

/// Transform for the sticky image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyTransform {
    pub scale: f64,
    pub opacity: f64,
}

impl StickyTransform {
    /// CSS `transform` value; keeps the image vertically centered.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translateY(-50%) scale({})", self.scale)
    }
}

/// Opacity of the hero decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroFade {
    pub circles: f64,
    pub rays: f64,
}

bitflags! {
    /// Parts of the visual state that differ between two ticks.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeSet: u8 {
        const HEADER   = 0b0_0001;
        /// Navigation indicator and accent class.
        const SECTION  = 0b0_0010;
        const PARALLAX = 0b0_0100;
        const STICKY   = 0b0_1000;
        const HERO     = 0b1_0000;
    }
}

/// Visual state derived from one scroll tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub header_scrolled: bool,
    pub current_section: Option<SectionId>,
    /// Scale per parallax image; `None` leaves the image untouched.
    pub parallax: Vec<Option<f64>>,
    pub sticky: Option<StickyTransform>,
    pub hero: Option<HeroFade>,
}

impl VisualState {
    /// Accent class for the logo and locale toggles.
    #[must_use]
    pub fn accent_class(&self) -> Option<&'static str> {
        self.current_section
            .and_then(|id| id.section().theme_class)
    }

    /// Which parts differ from `prev`. Everything, when there is no previous tick.
    #[must_use]
    pub fn changes_since(&self, prev: Option<&Self>) -> ChangeSet {
        let Some(prev) = prev else {
            return ChangeSet::all();
        };
        let mut changes = ChangeSet::empty();
        changes.set(ChangeSet::HEADER, self.header_scrolled != prev.header_scrolled);
        changes.set(ChangeSet::SECTION, self.current_section != prev.current_section);
        changes.set(ChangeSet::PARALLAX, self.parallax != prev.parallax);
        changes.set(ChangeSet::STICKY, self.sticky != prev.sticky);
        changes.set(ChangeSet::HERO, self.hero != prev.hero);
        changes
    }
}

/// The deepest section already reached at `scroll_y`.
///
/// Scans in reverse document order and stops at the first match.
#[must_use]
pub fn current_section(
    scroll_y: f64,
    geometry: &PageGeometry,
    config: &SiteConfig,
) -> Option<SectionId> {
    let probe = scroll_y + config.header_offset;
    SectionId::ALL.iter().rev().copied().find(|&id| {
        geometry
            .section_top(id)
            .is_some_and(|top| top - config.section_lead <= probe)
    })
}

/// Scroll progress of a parallax container, `None` when it is off-screen.
#[must_use]
pub fn parallax_progress(frame: &ParallaxFrame, viewport_height: f64) -> Option<f64> {
    let bottom = frame.top + frame.height;
    if frame.top < viewport_height && bottom > 0.0 {
        Some(1.0 - (frame.top + frame.height / 2.0) / (viewport_height + frame.height))
    } else {
        None
    }
}

/// Parallax scale for `progress` and `intensity`, capped at `max_scale`.
#[must_use]
pub fn parallax_scale(progress: f64, intensity: f64, max_scale: f64) -> f64 {
    (1.0 + progress * intensity / 10.0).min(max_scale)
}

/// How far scroll has moved through the sticky container, in `[0, 1]`.
#[must_use]
pub fn sticky_ratio(scroll_y: f64, frame: &StickyFrame) -> f64 {
    let travelled = scroll_y - frame.offset_top;
    if frame.height <= 0.0 {
        return if travelled > 0.0 { 1.0 } else { 0.0 };
    }
    (travelled / frame.height).clamp(0.0, 1.0)
}

/// Interpolate the sticky transform; exact at both ends.
#[must_use]
pub fn sticky_transform(ratio: f64, config: &SiteConfig) -> StickyTransform {
    let t = ratio.clamp(0.0, 1.0);
    StickyTransform {
        scale: (1.0 - t) + t * config.sticky_min_scale,
        opacity: (1.0 - t) + t * config.sticky_min_opacity,
    }
}

/// Hero decoration opacities at `scroll_y`.
#[must_use]
pub fn hero_fade(scroll_y: f64, hero_height: f64, config: &SiteConfig) -> HeroFade {
    let fade = if hero_height > 0.0 {
        (1.0 - scroll_y / hero_height).clamp(0.0, 1.0)
    } else if scroll_y > 0.0 {
        0.0
    } else {
        1.0
    };
    HeroFade {
        circles: config.hero_circle_opacity * fade,
        rays: config.hero_ray_opacity * fade,
    }
}

/// Derive the full visual state for one tick.
#[must_use]
pub fn derive(snapshot: ScrollSnapshot, geometry: &PageGeometry, config: &SiteConfig) -> VisualState {
    let scroll_y = snapshot.scroll_y;

    let parallax = geometry
        .parallax
        .iter()
        .map(|frame| {
            let frame = frame.as_ref()?;
            let intensity = frame.intensity?;
            let progress = parallax_progress(frame, snapshot.viewport_height)?;
            Some(parallax_scale(progress, intensity, config.parallax_max_scale))
        })
        .collect();

    let sticky = geometry
        .sticky
        .as_ref()
        .map(|frame| sticky_transform(sticky_ratio(scroll_y, frame), config));

    let hero = (geometry.hero_decorations && geometry.hero_height > 0.0)
        .then(|| hero_fade(scroll_y, geometry.hero_height, config));

    VisualState {
        header_scrolled: scroll_y > config.header_threshold,
        current_section: current_section(scroll_y, geometry, config),
        parallax,
        sticky,
        hero,
    }
}
