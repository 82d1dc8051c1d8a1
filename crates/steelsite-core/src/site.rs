#![forbid(unsafe_code)]

//! Host-driven page controller.
//!
//! [`Site`] ties the components together without threads or blocking. The
//! host (JavaScript, via `steelsite-web`) controls the event loop:
//!
//! 1. Translate a DOM event into a [`SiteEvent`] and call [`Site::handle`].
//! 2. Apply the returned [`Effect`]s to the DOM.
//! 3. Arm one platform timer for [`Site::next_deadline`]; when it fires, call
//!    [`Site::advance`] and apply its effects.
//!
//! DOM measurements are pulled lazily through [`PageProbe`], so geometry is
//! only read on ticks the scroll debouncer lets through.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use steelsite_core::scroll::{PageGeometry, ScrollSnapshot};
//! use steelsite_core::site::{Effect, PageProbe, Site, SiteEvent};
//! use steelsite_core::{SectionId, SiteConfig};
//!
//! struct Fixed(f64);
//! impl PageProbe for Fixed {
//!     fn snapshot(&self) -> ScrollSnapshot {
//!         ScrollSnapshot::new(self.0, 900.0)
//!     }
//!     fn geometry(&self) -> PageGeometry {
//!         PageGeometry::default().with_section(SectionId::Home, 0.0)
//!     }
//! }
//!
//! let mut site = Site::new(SiteConfig::default(), 6);
//! let effects = site.handle(SiteEvent::Load, Duration::ZERO, &Fixed(0.0));
//! assert!(effects.iter().any(|e| matches!(e, Effect::Visual { .. })));
//! ```

use std::time::Duration;

use crate::config::SiteConfig;
use crate::debounce::{Debouncer, Edge};
use crate::form::{self, ContactForm};
use crate::locale::{Locale, LocaleEngine, LocaleSwitch};
use crate::menu::{MenuEffect, MenuInput, MenuMachine, MenuState, MenuTimer};
use crate::scroll::{self, ChangeSet, PageGeometry, ScrollSnapshot, VisualState};
use crate::timer::{Generation, TaskToken, TimerQueue};
use crate::translations::Binding;

/// Read access to the live page, implemented by the host.
pub trait PageProbe {
    /// Current scroll offset and viewport height.
    fn snapshot(&self) -> ScrollSnapshot;
    /// Current section offsets and effect containers.
    fn geometry(&self) -> PageGeometry;
}

/// A DOM event, already classified by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    /// The document finished loading.
    Load,
    /// The window scrolled.
    Scroll,
    /// The hamburger toggle was activated.
    MenuToggle,
    /// A click reached the document.
    DocumentClick {
        /// The target lies inside the menu panel or its toggle.
        inside_menu: bool,
    },
    /// Escape was pressed inside the menu panel.
    Escape,
    /// A link or button inside the menu panel was activated.
    MenuItem {
        /// The item is the embedded locale toggle.
        locale_toggle: bool,
    },
    /// A locale toggle outside the menu panel was activated.
    LocaleToggle,
    /// The contact form was submitted.
    Submit {
        form: ContactForm,
        /// The document `lang` attribute at submit time.
        lang: String,
    },
}

impl SiteEvent {
    /// Click on the mobile locale toggle.
    ///
    /// Inside the panel it is a menu item and closes the menu after
    /// switching; anywhere else it only switches.
    #[must_use]
    pub const fn mobile_locale_toggle(in_menu_panel: bool) -> Self {
        if in_menu_panel {
            Self::MenuItem { locale_toggle: true }
        } else {
            Self::LocaleToggle
        }
    }
}

/// Contact form status side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEffect {
    /// Show the status region with this text and class list.
    ShowStatus {
        text: &'static str,
        class: &'static str,
    },
    /// Reset every form control.
    Reset,
    /// Hide the status region.
    HideStatus,
}

/// A DOM mutation the host must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Force the document's charset declarations to UTF-8.
    FixCharset,
    /// Apply the parts of `state` named in `changes`.
    Visual {
        state: VisualState,
        changes: ChangeSet,
    },
    /// Menu panel, item and ARIA updates. Never a `Schedule`.
    Menu(MenuEffect),
    /// Switch the page language.
    Locale(LocaleSwitch),
    /// Contact form status updates.
    Form(FormEffect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteTimer {
    Menu(MenuTimer, TaskToken),
    HideStatus(TaskToken),
}

/// The page's behavior layer.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    scroll: Debouncer,
    menu: MenuMachine,
    locale: LocaleEngine,
    status: Generation,
    timers: TimerQueue<SiteTimer>,
    last_visual: Option<VisualState>,
}

impl Site {
    /// Create a controller for a page whose menu panel has `menu_items` animated items.
    #[must_use]
    pub fn new(config: SiteConfig, menu_items: usize) -> Self {
        let edge = if config.scroll_debounce_leading {
            Edge::Leading
        } else {
            Edge::Trailing
        };
        Self {
            scroll: Debouncer::new(config.scroll_debounce(), edge),
            menu: MenuMachine::new(menu_items, config.menu),
            locale: LocaleEngine::new(),
            status: Generation::new(),
            timers: TimerQueue::new(),
            last_visual: None,
            config,
        }
    }

    /// Read-only view of the current locale.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale.current()
    }

    #[must_use]
    pub const fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    /// Visual state applied on the most recent tick.
    #[must_use]
    pub const fn visual(&self) -> Option<&VisualState> {
        self.last_visual.as_ref()
    }

    /// Retain the document's own primary-locale content. Call before `Load`.
    pub fn capture_primary<F>(&mut self, read: F) -> usize
    where
        F: FnMut(&Binding) -> Option<String>,
    {
        self.locale.capture_primary(read)
    }

    /// When [`advance`](Self::advance) must run next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.timers.next_deadline(), self.scroll.wake_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Handle one DOM event at host time `now`.
    pub fn handle(&mut self, event: SiteEvent, now: Duration, probe: &impl PageProbe) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            SiteEvent::Load => {
                effects.push(Effect::FixCharset);
                effects.extend(self.menu.initial_effects().map(Effect::Menu));
                self.last_visual = None;
                effects.extend(self.recompute(probe));
                tracing::debug!(locale = self.locale().code(), "load pass complete");
            }
            SiteEvent::Scroll => {
                if self.scroll.call(now) {
                    effects.extend(self.recompute(probe));
                }
            }
            SiteEvent::MenuToggle => self.drive_menu(MenuInput::Toggle, now, &mut effects),
            SiteEvent::DocumentClick { inside_menu } => {
                if !inside_menu {
                    self.drive_menu(MenuInput::OutsideClick, now, &mut effects);
                }
            }
            SiteEvent::Escape => self.drive_menu(MenuInput::Escape, now, &mut effects),
            SiteEvent::MenuItem { locale_toggle } => {
                if locale_toggle {
                    self.switch_locale(&mut effects);
                }
                self.drive_menu(MenuInput::ItemSelected, now, &mut effects);
            }
            SiteEvent::LocaleToggle => self.switch_locale(&mut effects),
            SiteEvent::Submit { form, lang } => self.submit(&form, &lang, now, &mut effects),
        }
        effects
    }

    /// Drop every pending continuation and scroll window.
    ///
    /// Called when the page behavior is torn down; afterwards
    /// [`next_deadline`](Self::next_deadline) is `None` until new events arrive.
    pub fn shutdown(&mut self) {
        self.timers.clear();
        self.scroll.reset();
        tracing::debug!(menu = ?self.menu.state(), "pending work dropped");
    }

    /// Run every continuation due at `now`.
    pub fn advance(&mut self, now: Duration, probe: &impl PageProbe) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.scroll.poll(now) {
            effects.extend(self.recompute(probe));
        }
        loop {
            let due = self.timers.pop_due(now);
            if due.is_empty() {
                break;
            }
            for timer in due {
                match timer {
                    SiteTimer::Menu(timer, token) => {
                        self.drive_menu(MenuInput::Timer(timer, token), now, &mut effects);
                    }
                    SiteTimer::HideStatus(token) => {
                        if self.status.is_current(token) {
                            effects.push(Effect::Form(FormEffect::HideStatus));
                        }
                    }
                }
            }
        }
        effects
    }

    fn recompute(&mut self, probe: &impl PageProbe) -> Option<Effect> {
        let state = scroll::derive(probe.snapshot(), &probe.geometry(), &self.config);
        let changes = state.changes_since(self.last_visual.as_ref());
        self.last_visual = Some(state.clone());
        if changes.is_empty() {
            return None;
        }
        tracing::trace!(?changes, section = ?state.current_section, "visual state changed");
        Some(Effect::Visual { state, changes })
    }

    fn drive_menu(&mut self, input: MenuInput, now: Duration, effects: &mut Vec<Effect>) {
        for effect in self.menu.handle(input) {
            match effect {
                MenuEffect::Schedule { delay, timer, token } => {
                    self.timers
                        .schedule(now.saturating_add(delay), SiteTimer::Menu(timer, token));
                }
                other => effects.push(Effect::Menu(other)),
            }
        }
    }

    fn switch_locale(&mut self, effects: &mut Vec<Effect>) {
        let switch = self.locale.toggle();
        let relabel = self.menu.set_locale(switch.locale);
        effects.push(Effect::Locale(switch));
        effects.push(Effect::Menu(relabel));
    }

    fn submit(&mut self, form: &ContactForm, lang: &str, now: Duration, effects: &mut Vec<Effect>) {
        let outcome = form::validate(form);
        let locale = Locale::from_lang_attr(lang);
        let token = self.status.bump();
        effects.push(Effect::Form(FormEffect::ShowStatus {
            text: outcome.message(locale),
            class: outcome.status_class(),
        }));
        if outcome.is_accepted() {
            effects.push(Effect::Form(FormEffect::Reset));
            self.timers.schedule(
                now.saturating_add(self.config.status_hide()),
                SiteTimer::HideStatus(token),
            );
        }
    }
}
