//! End-to-end flows through [`Site`] with a scripted page.
//!
//! The fake page mimics the host loop: events go in through `handle`, the
//! single armed timer is honored through `next_deadline`/`advance`, and every
//! effect is folded into a small model of the DOM that the assertions read.

use std::cell::Cell;
use std::time::Duration;

use pretty_assertions::assert_eq;
use steelsite_core::form::ContactForm;
use steelsite_core::locale::RewritePlan;
use steelsite_core::menu::MenuEffect;
use steelsite_core::scroll::{ChangeSet, ParallaxFrame, StickyFrame};
use steelsite_core::site::FormEffect;
use steelsite_core::{
    Effect, Locale, MenuState, PageGeometry, PageProbe, ScrollSnapshot, SectionId, Site,
    SiteConfig, SiteEvent,
};

// ── Fake page ───────────────────────────────────────────────────────────

struct Page {
    scroll_y: Cell<f64>,
}

impl PageProbe for Page {
    fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot::new(self.scroll_y.get(), 900.0)
    }

    fn geometry(&self) -> PageGeometry {
        let y = self.scroll_y.get();
        PageGeometry {
            parallax: vec![Some(ParallaxFrame {
                intensity: Some(1.0),
                top: 1200.0 - y,
                height: 600.0,
            })],
            sticky: Some(StickyFrame {
                offset_top: 1600.0,
                height: 800.0,
            }),
            hero_height: 800.0,
            hero_decorations: true,
            ..PageGeometry::default()
        }
        .with_section(SectionId::Home, 0.0)
        .with_section(SectionId::About, 800.0)
        .with_section(SectionId::Services, 1600.0)
        .with_section(SectionId::Info, 2400.0)
        .with_section(SectionId::Contact, 3200.0)
    }
}

#[derive(Default)]
struct Dom {
    header_scrolled: bool,
    active: Option<SectionId>,
    accent: Option<&'static str>,
    panel_visible: bool,
    scroll_locked: bool,
    shown_items: Vec<usize>,
    toggle_label: &'static str,
    lang: &'static str,
    status: Option<(&'static str, &'static str)>,
    resets: u32,
    reloads: u32,
    charset_fixed: bool,
}

impl Dom {
    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FixCharset => self.charset_fixed = true,
                Effect::Visual { state, changes } => {
                    if changes.contains(ChangeSet::HEADER) {
                        self.header_scrolled = state.header_scrolled;
                    }
                    if changes.contains(ChangeSet::SECTION) {
                        self.active = state.current_section;
                        self.accent = state.accent_class();
                    }
                }
                Effect::Menu(menu) => match menu {
                    MenuEffect::ShowPanel => self.panel_visible = true,
                    MenuEffect::HidePanel => self.panel_visible = false,
                    MenuEffect::LockScroll(locked) => self.scroll_locked = locked,
                    MenuEffect::SyncAria(aria) => self.toggle_label = aria.label,
                    MenuEffect::ShowItem(i) => self.shown_items.push(i),
                    MenuEffect::HideItem(i) => self.shown_items.retain(|&s| s != i),
                    MenuEffect::Schedule { .. } => panic!("schedules stay inside the site"),
                },
                Effect::Locale(switch) => {
                    self.lang = switch.lang;
                    if switch.plan == RewritePlan::Reload {
                        self.reloads += 1;
                    }
                }
                Effect::Form(FormEffect::ShowStatus { text, class }) => {
                    self.status = Some((text, class));
                }
                Effect::Form(FormEffect::Reset) => self.resets += 1,
                Effect::Form(FormEffect::HideStatus) => self.status = None,
            }
        }
    }
}

struct Harness {
    site: Site,
    page: Page,
    dom: Dom,
    now: Duration,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            site: Site::new(SiteConfig::default(), 6),
            page: Page {
                scroll_y: Cell::new(0.0),
            },
            dom: Dom {
                lang: "de",
                ..Dom::default()
            },
            now: Duration::ZERO,
        };
        harness
            .site
            .capture_primary(|binding| Some(format!("original {}", binding.key)));
        harness.send(SiteEvent::Load);
        harness
    }

    fn send(&mut self, event: SiteEvent) {
        let effects = self.site.handle(event, self.now, &self.page);
        self.dom.apply(effects);
    }

    /// Advance the clock by `ms`, firing every deadline on the way.
    fn wait(&mut self, ms: u64) {
        let end = self.now + Duration::from_millis(ms);
        while let Some(deadline) = self.site.next_deadline() {
            if deadline > end {
                break;
            }
            self.now = self.now.max(deadline);
            let effects = self.site.advance(self.now, &self.page);
            self.dom.apply(effects);
        }
        self.now = end;
    }

    fn scroll_to(&mut self, y: f64) {
        self.page.scroll_y.set(y);
        self.send(SiteEvent::Scroll);
    }
}

fn filled_form() -> ContactForm {
    ContactForm {
        name: "Anna".into(),
        email: "anna@example.de".into(),
        phone: String::new(),
        date: "2026-09-12".into(),
        location: "Bochum".into(),
        message: "Hallo!".into(),
    }
}

// ── Load & scroll ───────────────────────────────────────────────────────

#[test]
fn load_initializes_page() {
    let h = Harness::new();
    assert!(h.dom.charset_fixed);
    assert!(!h.dom.header_scrolled);
    assert_eq!(h.dom.active, Some(SectionId::Home));
    assert_eq!(h.dom.accent, None);
    assert_eq!(h.dom.toggle_label, "Menü öffnen");
}

#[test]
fn scrolling_moves_active_section_and_accent() {
    let mut h = Harness::new();
    h.wait(200);
    h.scroll_to(700.0);
    assert!(h.dom.header_scrolled);
    assert_eq!(h.dom.active, Some(SectionId::About));
    assert_eq!(h.dom.accent, Some("about-section"));

    h.wait(200);
    h.scroll_to(3100.0);
    assert_eq!(h.dom.active, Some(SectionId::Contact));
}

#[test]
fn scroll_burst_applies_first_position_only() {
    let mut h = Harness::new();
    h.wait(200);
    h.scroll_to(700.0);
    h.wait(20);
    h.scroll_to(3100.0);
    assert_eq!(h.dom.active, Some(SectionId::About));
    h.wait(200);
    h.scroll_to(3100.0);
    assert_eq!(h.dom.active, Some(SectionId::Contact));
}

// ── Menu ────────────────────────────────────────────────────────────────

#[test]
fn menu_open_close_round_trip() {
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    assert!(h.dom.panel_visible);
    assert!(h.dom.scroll_locked);
    assert_eq!(h.dom.toggle_label, "Menü schließen");
    assert_eq!(h.site.menu_state(), MenuState::Open);

    h.wait(400);
    assert_eq!(h.dom.shown_items, vec![0, 1, 2, 3, 4, 5]);

    h.send(SiteEvent::Escape);
    assert_eq!(h.site.menu_state(), MenuState::Closing);
    assert!(h.dom.panel_visible);
    h.wait(300);
    assert_eq!(h.site.menu_state(), MenuState::Closed);
    assert!(!h.dom.panel_visible);
    assert!(!h.dom.scroll_locked);
    assert!(h.dom.shown_items.is_empty());
    assert_eq!(h.dom.toggle_label, "Menü öffnen");
}

#[test]
fn reopen_during_close_cancels_pending_hide() {
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    h.wait(400);
    h.send(SiteEvent::MenuToggle);
    h.wait(100);
    h.send(SiteEvent::MenuToggle);
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Open);
    assert!(h.dom.panel_visible);
    assert!(h.dom.scroll_locked);
}

#[test]
fn clicks_inside_menu_keep_it_open() {
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    h.send(SiteEvent::DocumentClick { inside_menu: true });
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Open);
    h.send(SiteEvent::DocumentClick { inside_menu: false });
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Closed);
}

#[test]
fn selecting_item_closes_after_delay() {
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    h.wait(50);
    h.send(SiteEvent::MenuItem { locale_toggle: false });
    h.wait(149);
    assert_eq!(h.site.menu_state(), MenuState::Open);
    h.wait(1);
    assert_eq!(h.site.menu_state(), MenuState::Closing);
}

// ── Locale ──────────────────────────────────────────────────────────────

#[test]
fn locale_round_trip_restores_primary_without_reload() {
    let mut h = Harness::new();
    h.send(SiteEvent::LocaleToggle);
    assert_eq!(h.site.locale(), Locale::English);
    assert_eq!(h.dom.lang, "en");
    assert_eq!(h.dom.toggle_label, "Open menu");

    h.send(SiteEvent::LocaleToggle);
    assert_eq!(h.site.locale(), Locale::German);
    assert_eq!(h.dom.lang, "de");
    assert_eq!(h.dom.reloads, 0);
    assert_eq!(h.dom.toggle_label, "Menü öffnen");
}

#[test]
fn uncaptured_primary_reloads_on_return() {
    let mut site = Site::new(SiteConfig::default(), 6);
    let page = Page {
        scroll_y: Cell::new(0.0),
    };
    site.capture_primary(|binding| (binding.key != "about-p1").then(|| binding.key.to_owned()));
    site.handle(SiteEvent::LocaleToggle, Duration::ZERO, &page);
    let back = site.handle(SiteEvent::LocaleToggle, Duration::ZERO, &page);
    assert!(matches!(
        &back[0],
        Effect::Locale(switch) if switch.plan == RewritePlan::Reload
    ));
}

#[test]
fn menu_locale_toggle_switches_once() {
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    h.send(SiteEvent::MenuItem { locale_toggle: true });
    assert_eq!(h.site.locale(), Locale::English);
    assert_eq!(h.dom.toggle_label, "Close menu");
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Closed);
    assert_eq!(h.site.locale(), Locale::English);
}

#[test]
fn mobile_locale_toggle_outside_panel_switches_without_menu() {
    let mut h = Harness::new();
    h.send(SiteEvent::mobile_locale_toggle(false));
    assert_eq!(h.site.locale(), Locale::English);
    assert_eq!(h.dom.lang, "en");
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Closed);
    assert!(!h.dom.panel_visible);

    h.send(SiteEvent::mobile_locale_toggle(false));
    assert_eq!(h.site.locale(), Locale::German);
    assert_eq!(h.dom.reloads, 0);
}

#[test]
fn mobile_locale_toggle_inside_panel_is_a_menu_item() {
    assert_eq!(
        SiteEvent::mobile_locale_toggle(true),
        SiteEvent::MenuItem { locale_toggle: true }
    );
    let mut h = Harness::new();
    h.send(SiteEvent::MenuToggle);
    h.send(SiteEvent::mobile_locale_toggle(true));
    assert_eq!(h.site.locale(), Locale::English);
    h.wait(1000);
    assert_eq!(h.site.menu_state(), MenuState::Closed);
}

// ── Contact form ────────────────────────────────────────────────────────

#[test]
fn accepted_submission_resets_and_auto_hides() {
    let mut h = Harness::new();
    h.send(SiteEvent::Submit {
        form: filled_form(),
        lang: "de".into(),
    });
    assert_eq!(
        h.dom.status,
        Some((
            "Vielen Dank für deine Anfrage! Wir melden uns in Kürze bei dir.",
            "form-status success"
        ))
    );
    assert_eq!(h.dom.resets, 1);
    h.wait(4999);
    assert!(h.dom.status.is_some());
    h.wait(1);
    assert_eq!(h.dom.status, None);
}

#[test]
fn rejected_submission_stays_visible() {
    let mut h = Harness::new();
    let mut form = filled_form();
    form.email = "anna(at)example.de".into();
    h.send(SiteEvent::Submit {
        form,
        lang: "en".into(),
    });
    assert_eq!(
        h.dom.status,
        Some(("Please enter a valid email address.", "form-status error"))
    );
    h.wait(60_000);
    assert!(h.dom.status.is_some());
    assert_eq!(h.dom.resets, 0);
}

#[test]
fn status_language_follows_document_lang() {
    let mut h = Harness::new();
    h.send(SiteEvent::Submit {
        form: ContactForm::default(),
        lang: "en".into(),
    });
    assert_eq!(
        h.dom.status.map(|(text, _)| text),
        Some("Please fill in all required fields.")
    );
}
