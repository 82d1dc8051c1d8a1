#![forbid(unsafe_code)]

//! WASM frontend for the STEELweddings landing page.
//!
//! This crate is host-specific. It measures the live document, translates
//! DOM events into [`steelsite_core::SiteEvent`]s, applies the returned
//! effects, and arms a single `setTimeout` for the controller's next
//! deadline. All decisions live in `steelsite-core`.
//!
//! JS usage:
//!
//! ```text
//! const site = new SteelSite();
//! site.init({ scrollDebounceMs: 100, logLevel: "debug" });
//! window.switchLanguage = () => site.switchLanguage();
//! ```

pub mod logging;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::SteelSite;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SteelSite;

#[cfg(not(target_arch = "wasm32"))]
impl SteelSite {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
