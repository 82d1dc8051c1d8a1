#![forbid(unsafe_code)]

//! Core: scroll-derived visual state, menu and locale state machines, and
//! contact form validation for the STEELweddings landing page.
//!
//! Everything in this crate is host-agnostic and deterministic. Time is
//! supplied by the host as a [`Duration`](std::time::Duration) since page
//! load, and DOM measurements arrive through [`site::PageProbe`]. The
//! `steelsite-web` crate owns the actual DOM.

pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod locale;
pub mod menu;
pub mod scroll;
pub mod section;
pub mod site;
pub mod stagger;
pub mod timer;
pub mod translations;

pub use config::SiteConfig;
pub use error::SiteError;
pub use locale::{Locale, LocaleEngine, LocaleSwitch};
pub use menu::{MenuMachine, MenuState};
pub use scroll::{PageGeometry, ScrollSnapshot, VisualState};
pub use section::SectionId;
pub use site::{Effect, PageProbe, Site, SiteEvent};
