#![forbid(unsafe_code)]

//! Mobile navigation menu state machine.
//!
//! ```text
//!            Toggle                       (reveals scheduled)
//!   Closed ─────────▶ Opening ─────────────────────────────▶ Open
//!     ▲                                                       │
//!     │ PanelHidden                 Toggle / OutsideClick /   │
//!     │                             Escape / DeferredClose    │
//!   Closing ◀─────────────────────────────────────────────────┘
//! ```
//!
//! [`MenuMachine`] is the only writer of [`MenuState`]. Every transition
//! returns the [`MenuEffect`]s the host must apply; timed steps (staggered
//! item reveals and hides, hiding the panel, the delayed close after an item
//! is selected) come back as [`MenuEffect::Schedule`] and are fed back in as
//! [`MenuInput::Timer`].
//!
//! # Invariants
//!
//! 1. [`MenuMachine::aria`] is a pure function of the state, and a
//!    [`MenuEffect::SyncAria`] is emitted on every state change that alters it.
//! 2. Scroll is locked exactly while the state is not `Closed`.
//! 3. Each open or close bumps the generation; a timer carrying an older
//!    token is ignored, so an interrupted sequence never applies stale state.
//! 4. Opening is optimistic: the state is `Open` as soon as the reveals are
//!    scheduled.

use std::time::Duration;

use crate::config::MenuConfig;
use crate::locale::Locale;
use crate::stagger::{StaggerOrder, stagger_offsets};
use crate::timer::{Generation, TaskToken};

/// Lifecycle of the mobile menu panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Timed continuation owned by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuTimer {
    /// Fade/slide item `i` into place.
    RevealItem(usize),
    /// Fade/slide item `i` out.
    HideItem(usize),
    /// All exits have run; hide the panel.
    PanelHidden,
    /// Close after a navigation item was selected.
    DeferredClose,
}

/// Input to the menu state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    /// The hamburger toggle was activated.
    Toggle,
    /// A click landed outside both the panel and the toggle.
    OutsideClick,
    /// Escape was pressed inside the panel.
    Escape,
    /// A navigation item inside the panel was selected.
    ItemSelected,
    /// A previously scheduled timer fired.
    Timer(MenuTimer, TaskToken),
}

/// Accessibility and visibility snapshot derived from the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuAria {
    /// `aria-expanded` on the toggle.
    pub expanded: bool,
    /// `aria-hidden` on the panel.
    pub panel_hidden: bool,
    /// `aria-label` on the toggle.
    pub label: &'static str,
    /// `active` class on the toggle.
    pub toggle_active: bool,
    /// Panel is displayed.
    pub panel_visible: bool,
    /// `menu-open` class on the body.
    pub scroll_locked: bool,
}

/// Side effect requested by a menu transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    /// Display the panel.
    ShowPanel,
    /// Stop displaying the panel.
    HidePanel,
    /// Lock or unlock page scroll.
    LockScroll(bool),
    /// Write the ARIA attributes, label and toggle class.
    SyncAria(MenuAria),
    /// Animate item `i` into place.
    ShowItem(usize),
    /// Animate item `i` out.
    HideItem(usize),
    /// Feed `MenuInput::Timer(timer, token)` back after `delay`.
    Schedule {
        delay: Duration,
        timer: MenuTimer,
        token: TaskToken,
    },
}

/// Localized `aria-label` for the toggle.
#[must_use]
pub const fn toggle_label(expanded: bool, locale: Locale) -> &'static str {
    match (expanded, locale) {
        (false, Locale::German) => "Menü öffnen",
        (true, Locale::German) => "Menü schließen",
        (false, Locale::English) => "Open menu",
        (true, Locale::English) => "Close menu",
    }
}

/// Owner of the mobile menu state.
#[derive(Debug, Clone)]
pub struct MenuMachine {
    state: MenuState,
    generation: Generation,
    item_count: usize,
    timing: MenuConfig,
    locale: Locale,
}

impl MenuMachine {
    #[must_use]
    pub fn new(item_count: usize, timing: MenuConfig) -> Self {
        Self {
            state: MenuState::Closed,
            generation: Generation::new(),
            item_count,
            timing,
            locale: Locale::PRIMARY,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Opening | MenuState::Open)
    }

    /// Relabel the toggle for `locale`.
    pub fn set_locale(&mut self, locale: Locale) -> MenuEffect {
        self.locale = locale;
        MenuEffect::SyncAria(self.aria())
    }

    /// Current accessibility snapshot.
    #[must_use]
    pub const fn aria(&self) -> MenuAria {
        let expanded = self.is_open();
        let visible = !matches!(self.state, MenuState::Closed);
        MenuAria {
            expanded,
            panel_hidden: !expanded,
            label: toggle_label(expanded, self.locale),
            toggle_active: expanded,
            panel_visible: visible,
            scroll_locked: visible,
        }
    }

    /// Effects that bring a freshly loaded page in line with `Closed`.
    #[must_use]
    pub const fn initial_effects(&self) -> [MenuEffect; 1] {
        [MenuEffect::SyncAria(self.aria())]
    }

    /// Apply one input and return the effects to run.
    pub fn handle(&mut self, input: MenuInput) -> Vec<MenuEffect> {
        match input {
            MenuInput::Toggle => {
                if self.is_open() {
                    self.close()
                } else {
                    self.open()
                }
            }
            MenuInput::OutsideClick | MenuInput::Escape => {
                if self.state == MenuState::Open {
                    self.close()
                } else {
                    Vec::new()
                }
            }
            MenuInput::ItemSelected => {
                if self.state == MenuState::Open {
                    vec![MenuEffect::Schedule {
                        delay: self.timing.select_close_delay(),
                        timer: MenuTimer::DeferredClose,
                        token: self.generation.current(),
                    }]
                } else {
                    Vec::new()
                }
            }
            MenuInput::Timer(timer, token) => self.on_timer(timer, token),
        }
    }

    fn open(&mut self) -> Vec<MenuEffect> {
        let token = self.generation.bump();
        self.state = MenuState::Opening;
        tracing::debug!(token = token.get(), "menu opening");

        let mut effects = vec![
            MenuEffect::ShowPanel,
            MenuEffect::SyncAria(self.aria()),
            MenuEffect::LockScroll(true),
        ];
        let base = self.timing.open_delay();
        effects.extend(
            stagger_offsets(self.item_count, self.timing.stagger(), StaggerOrder::Forward)
                .into_iter()
                .enumerate()
                .map(|(i, offset)| MenuEffect::Schedule {
                    delay: base.saturating_add(offset),
                    timer: MenuTimer::RevealItem(i),
                    token,
                }),
        );
        self.state = MenuState::Open;
        effects
    }

    fn close(&mut self) -> Vec<MenuEffect> {
        let token = self.generation.bump();
        self.state = MenuState::Closing;
        tracing::debug!(token = token.get(), "menu closing");

        let mut effects = vec![MenuEffect::SyncAria(self.aria())];
        effects.extend(
            stagger_offsets(self.item_count, self.timing.stagger(), StaggerOrder::Reverse)
                .into_iter()
                .enumerate()
                .map(|(i, delay)| MenuEffect::Schedule {
                    delay,
                    timer: MenuTimer::HideItem(i),
                    token,
                }),
        );
        effects.push(MenuEffect::Schedule {
            delay: self.timing.close_duration(),
            timer: MenuTimer::PanelHidden,
            token,
        });
        effects
    }

    fn on_timer(&mut self, timer: MenuTimer, token: TaskToken) -> Vec<MenuEffect> {
        if !self.generation.is_current(token) {
            tracing::trace!(?timer, token = token.get(), "stale menu timer dropped");
            return Vec::new();
        }
        match (timer, self.state) {
            (MenuTimer::RevealItem(i), MenuState::Open) => vec![MenuEffect::ShowItem(i)],
            (MenuTimer::HideItem(i), MenuState::Closing) => vec![MenuEffect::HideItem(i)],
            (MenuTimer::PanelHidden, MenuState::Closing) => {
                self.state = MenuState::Closed;
                tracing::debug!("menu closed");
                vec![
                    MenuEffect::HidePanel,
                    MenuEffect::LockScroll(false),
                    MenuEffect::SyncAria(self.aria()),
                ]
            }
            (MenuTimer::DeferredClose, MenuState::Open) => self.close(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn machine() -> MenuMachine {
        MenuMachine::new(3, MenuConfig::default())
    }

    /// Fire every scheduled timer in delay order, feeding results back in.
    fn drain(machine: &mut MenuMachine, mut effects: Vec<MenuEffect>) -> Vec<MenuEffect> {
        let mut applied = Vec::new();
        loop {
            let mut timers: Vec<_> = effects
                .iter()
                .filter_map(|e| match *e {
                    MenuEffect::Schedule { delay, timer, token } => Some((delay, timer, token)),
                    _ => None,
                })
                .collect();
            applied.extend(effects.into_iter().filter(|e| !matches!(e, MenuEffect::Schedule { .. })));
            if timers.is_empty() {
                return applied;
            }
            timers.sort_by_key(|(delay, _, _)| *delay);
            effects = timers
                .into_iter()
                .flat_map(|(_, timer, token)| machine.handle(MenuInput::Timer(timer, token)))
                .collect();
        }
    }

    fn schedules(effects: &[MenuEffect]) -> Vec<(Duration, MenuTimer)> {
        effects
            .iter()
            .filter_map(|e| match *e {
                MenuEffect::Schedule { delay, timer, .. } => Some((delay, timer)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_is_optimistic_and_staggered() {
        let mut m = machine();
        let effects = m.handle(MenuInput::Toggle);
        assert_eq!(m.state(), MenuState::Open);
        assert_eq!(effects[0], MenuEffect::ShowPanel);
        assert!(effects.contains(&MenuEffect::LockScroll(true)));
        let ms = Duration::from_millis;
        assert_eq!(
            schedules(&effects),
            vec![
                (ms(10), MenuTimer::RevealItem(0)),
                (ms(60), MenuTimer::RevealItem(1)),
                (ms(110), MenuTimer::RevealItem(2)),
            ]
        );
    }

    #[test]
    fn close_staggers_in_reverse_then_hides_panel() {
        let mut m = machine();
        m.handle(MenuInput::Toggle);
        let effects = m.handle(MenuInput::Toggle);
        assert_eq!(m.state(), MenuState::Closing);
        let ms = Duration::from_millis;
        assert_eq!(
            schedules(&effects),
            vec![
                (ms(100), MenuTimer::HideItem(0)),
                (ms(50), MenuTimer::HideItem(1)),
                (ms(0), MenuTimer::HideItem(2)),
                (ms(300), MenuTimer::PanelHidden),
            ]
        );
        let applied = drain(&mut m, effects);
        assert_eq!(m.state(), MenuState::Closed);
        assert!(applied.contains(&MenuEffect::HidePanel));
        assert!(applied.contains(&MenuEffect::LockScroll(false)));
    }

    #[test]
    fn toggle_round_trip_restores_aria() {
        let mut m = machine();
        let initial = m.aria();
        let opened = m.handle(MenuInput::Toggle);
        drain(&mut m, opened);
        assert_eq!(m.aria().label, "Menü schließen");
        assert!(m.aria().scroll_locked);
        let closed = m.handle(MenuInput::Toggle);
        drain(&mut m, closed);
        assert_eq!(m.aria(), initial);
        assert_eq!(initial.label, "Menü öffnen");
        assert!(!initial.scroll_locked);
    }

    #[test]
    fn outside_click_and_escape_only_close_when_open() {
        let mut m = machine();
        assert!(m.handle(MenuInput::OutsideClick).is_empty());
        assert!(m.handle(MenuInput::Escape).is_empty());
        m.handle(MenuInput::Toggle);
        assert!(!m.handle(MenuInput::Escape).is_empty());
        assert_eq!(m.state(), MenuState::Closing);
        assert!(m.handle(MenuInput::OutsideClick).is_empty());
    }

    #[test]
    fn item_selection_defers_close() {
        let mut m = machine();
        m.handle(MenuInput::Toggle);
        let effects = m.handle(MenuInput::ItemSelected);
        assert_eq!(
            schedules(&effects),
            vec![(Duration::from_millis(150), MenuTimer::DeferredClose)]
        );
        assert_eq!(m.state(), MenuState::Open);
        drain(&mut m, effects);
        assert_eq!(m.state(), MenuState::Closed);
    }

    #[test]
    fn stale_close_timer_cannot_hide_reopened_panel() {
        let mut m = machine();
        m.handle(MenuInput::Toggle);
        let closing = m.handle(MenuInput::Toggle);
        // Reopen before the close sequence finishes.
        m.handle(MenuInput::Toggle);
        assert_eq!(m.state(), MenuState::Open);
        let applied = drain(&mut m, closing);
        assert!(
            !applied
                .iter()
                .any(|e| matches!(e, MenuEffect::HidePanel | MenuEffect::HideItem(_))),
            "stale close sequence leaked: {applied:?}"
        );
        assert_eq!(m.state(), MenuState::Open);
        assert!(m.aria().panel_visible);
    }

    #[test]
    fn toggle_during_deferred_close_wins() {
        let mut m = machine();
        m.handle(MenuInput::Toggle);
        let deferred = m.handle(MenuInput::ItemSelected);
        let closing = m.handle(MenuInput::Toggle);
        drain(&mut m, closing);
        assert_eq!(m.state(), MenuState::Closed);
        assert!(drain(&mut m, deferred).is_empty());
        assert_eq!(m.state(), MenuState::Closed);
    }

    #[test]
    fn relabels_for_locale() {
        let mut m = machine();
        let effect = m.set_locale(Locale::English);
        assert!(matches!(effect, MenuEffect::SyncAria(a) if a.label == "Open menu"));
        m.handle(MenuInput::Toggle);
        assert_eq!(m.aria().label, "Close menu");
    }
}
