#![forbid(unsafe_code)]

//! DOM boundary: element lookup, measurement, effect application.
//!
//! Elements named by the page contract are resolved once at startup. Any of
//! them may be absent; the corresponding effects then do nothing. Failed DOM
//! writes are logged through `tracing::warn!` and never propagated.

use steelsite_core::form::ContactForm;
use steelsite_core::locale::{LocaleSwitch, RewritePlan};
use steelsite_core::menu::{MenuAria, MenuEffect};
use steelsite_core::scroll::{ChangeSet, ParallaxFrame, StickyFrame, VisualState};
use steelsite_core::section::{self, SECTIONS, SectionId};
use steelsite_core::site::FormEffect;
use steelsite_core::translations::{Binding, BindingKind};
use steelsite_core::{Effect, PageGeometry, PageProbe, ScrollSnapshot, SiteError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, Node, Window};

/// Resolved page elements.
pub(crate) struct Dom {
    window: Window,
    document: Document,
    header: Option<Element>,
    logo: Option<Element>,
    pub(crate) menu_toggle: Option<Element>,
    pub(crate) menu: Option<HtmlElement>,
    pub(crate) menu_items: Vec<HtmlElement>,
    pub(crate) language_toggle: Option<Element>,
    mobile_language_toggle: Option<Element>,
    parallax_images: Vec<HtmlElement>,
    sticky_image: Option<HtmlElement>,
    hero: Option<HtmlElement>,
    glass_circles: Vec<HtmlElement>,
    light_rays: Option<HtmlElement>,
    pub(crate) form: Option<HtmlFormElement>,
    form_status: Option<HtmlElement>,
}

impl Dom {
    /// Resolve every contract element from the current document.
    pub(crate) fn locate() -> Result<Self, SiteError> {
        let window = web_sys::window().ok_or(SiteError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(SiteError::MissingElement("document"))?;

        let dom = Self {
            header: select(&document, "header"),
            logo: select(&document, ".logo"),
            menu_toggle: by_id(&document, "mobile-menu-toggle"),
            menu: by_id(&document, "mobile-menu").and_then(into_html),
            menu_items: select_all(&document, "#mobile-menu a, #mobile-menu button"),
            language_toggle: by_id(&document, "language-toggle"),
            mobile_language_toggle: by_id(&document, "mobile-language-toggle"),
            parallax_images: select_all(&document, ".image-parallax"),
            sticky_image: select(&document, ".sticky-image").and_then(into_html),
            hero: select(&document, ".hero").and_then(into_html),
            glass_circles: select_all(&document, ".glass-circle"),
            light_rays: select(&document, ".light-rays").and_then(into_html),
            form: select(&document, ".contact-form").and_then(|el| el.dyn_into().ok()),
            form_status: by_id(&document, "form-status").and_then(into_html),
            window,
            document,
        };
        tracing::debug!(
            menu_items = dom.menu_items.len(),
            parallax = dom.parallax_images.len(),
            form = dom.form.is_some(),
            "page elements resolved"
        );
        Ok(dom)
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    /// Whether `target` lies inside the menu panel or its toggle.
    pub(crate) fn is_inside_menu(&self, target: Option<&Node>) -> bool {
        let Some(target) = target else {
            return false;
        };
        self.menu.as_ref().is_some_and(|menu| menu.contains(Some(target)))
            || self
                .menu_toggle
                .as_ref()
                .is_some_and(|toggle| toggle.contains(Some(target)))
    }

    /// The mobile locale toggle when it sits outside the menu panel.
    pub(crate) fn standalone_mobile_language_toggle(&self) -> Option<&Element> {
        let toggle = self.mobile_language_toggle.as_ref()?;
        let in_panel = self.menu_items.iter().any(|item| item.id() == toggle.id());
        (!in_panel).then_some(toggle)
    }

    /// Whether the contact form is wired: both the form and its status region exist.
    pub(crate) fn has_contact_form(&self) -> bool {
        self.form.is_some() && self.form_status.is_some()
    }

    /// Current document `lang` attribute.
    pub(crate) fn lang(&self) -> String {
        self.document
            .document_element()
            .and_then(|root| root.get_attribute("lang"))
            .unwrap_or_default()
    }

    /// Fresh values of the contact form controls.
    pub(crate) fn read_form(&self) -> ContactForm {
        ContactForm {
            name: self.field_value("name"),
            email: self.field_value("email"),
            phone: self.field_value("phone"),
            date: self.field_value("date"),
            location: self.field_value("location"),
            message: self.field_value("message"),
        }
    }

    fn field_value(&self, id: &str) -> String {
        let Some(el) = by_id(&self.document, id) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<web_sys::HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    /// Current content of a translatable node, for primary locale capture.
    pub(crate) fn read_binding(&self, binding: &Binding) -> Option<String> {
        let el = select(&self.document, binding.selector)?;
        match binding.kind {
            BindingKind::Text => el.text_content(),
            BindingKind::Markup => Some(el.inner_html()),
            BindingKind::Placeholder => el.get_attribute("placeholder"),
        }
    }

    /// Static ARIA attributes of the menu toggle.
    pub(crate) fn wire_menu_aria(&self) {
        let Some(toggle) = &self.menu_toggle else {
            return;
        };
        report(
            "menu aria",
            toggle
                .set_attribute("aria-haspopup", "true")
                .and_then(|()| toggle.set_attribute("aria-controls", "mobile-menu")),
        );
    }

    /// Apply effects in order.
    pub(crate) fn apply(&self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::FixCharset => report("charset", self.fix_charset()),
                Effect::Visual { state, changes } => {
                    report("visual state", self.apply_visual(state, *changes));
                }
                Effect::Menu(menu) => report("menu", self.apply_menu(*menu)),
                Effect::Locale(switch) => self.apply_locale(switch),
                Effect::Form(form) => report("form status", self.apply_form(*form)),
            }
        }
    }

    fn fix_charset(&self) -> Result<(), JsValue> {
        if let Some(meta) = select(&self.document, "meta[charset]") {
            meta.set_attribute("charset", "utf-8")?;
        }
        if let Some(meta) = select(&self.document, "meta[http-equiv=\"Content-Type\"]") {
            meta.set_attribute("content", "text/html; charset=utf-8")?;
        }
        Ok(())
    }

    fn apply_visual(&self, state: &VisualState, changes: ChangeSet) -> Result<(), JsValue> {
        if changes.contains(ChangeSet::HEADER)
            && let Some(header) = &self.header
        {
            header
                .class_list()
                .toggle_with_force("scrolled", state.header_scrolled)?;
        }
        if changes.contains(ChangeSet::SECTION) {
            self.sync_nav(state.current_section)?;
            self.sync_accent(state.accent_class())?;
        }
        if changes.contains(ChangeSet::PARALLAX) {
            for (image, scale) in self.parallax_images.iter().zip(&state.parallax) {
                if let Some(scale) = scale {
                    image
                        .style()
                        .set_property("transform", &format!("scale({scale})"))?;
                }
            }
        }
        if changes.contains(ChangeSet::STICKY)
            && let (Some(image), Some(sticky)) = (&self.sticky_image, state.sticky)
        {
            let style = image.style();
            style.set_property("transform", &sticky.css_transform())?;
            style.set_property("opacity", &sticky.opacity.to_string())?;
        }
        if changes.contains(ChangeSet::HERO)
            && let Some(hero) = state.hero
        {
            for circle in &self.glass_circles {
                circle
                    .style()
                    .set_property("opacity", &hero.circles.to_string())?;
            }
            if let Some(rays) = &self.light_rays {
                rays.style().set_property("opacity", &hero.rays.to_string())?;
            }
        }
        Ok(())
    }

    fn sync_nav(&self, current: Option<SectionId>) -> Result<(), JsValue> {
        for entry in &SECTIONS {
            let Some(nav) = by_id(&self.document, entry.nav_id) else {
                continue;
            };
            let classes = nav.class_list();
            for class in section::active_classes() {
                classes.remove_1(class)?;
            }
            if current == Some(entry.id) {
                classes.add_1(entry.active_class)?;
                nav.set_attribute("aria-current", "page")?;
            } else {
                nav.set_attribute("aria-current", "false")?;
            }
        }
        Ok(())
    }

    fn sync_accent(&self, accent: Option<&'static str>) -> Result<(), JsValue> {
        let (Some(logo), Some(toggle)) = (&self.logo, &self.language_toggle) else {
            return Ok(());
        };
        let targets = [Some(logo), Some(toggle), self.mobile_language_toggle.as_ref()];
        for el in targets.into_iter().flatten() {
            let classes = el.class_list();
            for class in section::theme_classes() {
                classes.remove_1(class)?;
            }
            if let Some(accent) = accent {
                classes.add_1(accent)?;
            }
        }
        Ok(())
    }

    fn apply_menu(&self, effect: MenuEffect) -> Result<(), JsValue> {
        match effect {
            MenuEffect::ShowPanel => set_style(self.menu.as_ref(), "display", "block"),
            MenuEffect::HidePanel => set_style(self.menu.as_ref(), "display", "none"),
            MenuEffect::LockScroll(locked) => match self.document.body() {
                Some(body) => body
                    .class_list()
                    .toggle_with_force("menu-open", locked)
                    .map(drop),
                None => Ok(()),
            },
            MenuEffect::SyncAria(aria) => self.sync_menu_aria(aria),
            MenuEffect::ShowItem(i) => self.style_item(i, "1", "translateY(0)"),
            MenuEffect::HideItem(i) => self.style_item(i, "0", "translateY(-10px)"),
            MenuEffect::Schedule { timer, .. } => {
                tracing::trace!(?timer, "schedule effect reached the dom");
                Ok(())
            }
        }
    }

    fn sync_menu_aria(&self, aria: MenuAria) -> Result<(), JsValue> {
        if let Some(toggle) = &self.menu_toggle {
            toggle.set_attribute("aria-expanded", bool_attr(aria.expanded))?;
            toggle.set_attribute("aria-label", aria.label)?;
            toggle
                .class_list()
                .toggle_with_force("active", aria.toggle_active)?;
        }
        if let Some(menu) = &self.menu {
            menu.set_attribute("aria-hidden", bool_attr(aria.panel_hidden))?;
        }
        Ok(())
    }

    fn style_item(&self, index: usize, opacity: &str, transform: &str) -> Result<(), JsValue> {
        let Some(item) = self.menu_items.get(index) else {
            return Ok(());
        };
        let style = item.style();
        style.set_property("opacity", opacity)?;
        style.set_property("transform", transform)
    }

    fn apply_locale(&self, switch: &LocaleSwitch) {
        if let Some(root) = self.document.document_element() {
            report("lang attribute", root.set_attribute("lang", switch.lang));
        }
        match &switch.plan {
            RewritePlan::InPlace(rewrites) => {
                let mut failed = 0usize;
                for rewrite in rewrites {
                    let Some(el) = select(&self.document, rewrite.selector) else {
                        let err = SiteError::Rewrite {
                            selector: rewrite.selector,
                        };
                        tracing::warn!(%err, "translation target missing");
                        failed += 1;
                        continue;
                    };
                    let result = match rewrite.kind {
                        BindingKind::Text => {
                            el.set_text_content(Some(&rewrite.value));
                            Ok(())
                        }
                        BindingKind::Markup => {
                            el.set_inner_html(&rewrite.value);
                            Ok(())
                        }
                        BindingKind::Placeholder => el.set_attribute("placeholder", &rewrite.value),
                    };
                    if let Err(cause) = result {
                        let err = SiteError::Rewrite {
                            selector: rewrite.selector,
                        };
                        tracing::warn!(%err, ?cause, "translation write failed");
                        failed += 1;
                    }
                }
                tracing::info!(
                    lang = switch.lang,
                    toggle = switch.toggle_label,
                    written = rewrites.len() - failed,
                    failed,
                    "language switched"
                );
            }
            RewritePlan::Reload => {
                tracing::info!(lang = switch.lang, "reloading to restore primary content");
                report("reload", self.window.location().reload());
            }
        }
    }

    fn apply_form(&self, effect: FormEffect) -> Result<(), JsValue> {
        let Some(status) = &self.form_status else {
            return Ok(());
        };
        match effect {
            FormEffect::ShowStatus { text, class } => {
                status.set_text_content(Some(text));
                status.set_class_name(class);
                status.style().set_property("display", "block")
            }
            FormEffect::Reset => {
                if let Some(form) = &self.form {
                    form.reset();
                }
                Ok(())
            }
            FormEffect::HideStatus => status.style().set_property("display", "none"),
        }
    }
}

impl PageProbe for Dom {
    fn snapshot(&self) -> ScrollSnapshot {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        ScrollSnapshot::new(scroll_y, viewport_height)
    }

    fn geometry(&self) -> PageGeometry {
        let mut geometry = PageGeometry {
            parallax: self
                .parallax_images
                .iter()
                .map(parallax_frame)
                .collect(),
            sticky: self.sticky_image.as_ref().and_then(sticky_frame),
            hero_height: self
                .hero
                .as_ref()
                .map_or(0.0, |hero| f64::from(hero.offset_height())),
            hero_decorations: !self.glass_circles.is_empty() && self.light_rays.is_some(),
            ..PageGeometry::default()
        };
        for id in SectionId::ALL {
            if let Some(el) = by_id(&self.document, id.section().element_id).and_then(into_html) {
                geometry = geometry.with_section(id, f64::from(el.offset_top()));
            }
        }
        geometry
    }
}

fn parallax_frame(image: &HtmlElement) -> Option<ParallaxFrame> {
    let container = image.closest("[data-parallax-intensity]").ok().flatten()?;
    let intensity = container
        .get_attribute("data-parallax-intensity")
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    let rect = container.get_bounding_client_rect();
    Some(ParallaxFrame {
        intensity,
        top: rect.top(),
        height: rect.height(),
    })
}

fn sticky_frame(image: &HtmlElement) -> Option<StickyFrame> {
    let container = image
        .closest(".sticky-container")
        .ok()
        .flatten()
        .and_then(into_html)?;
    Some(StickyFrame {
        offset_top: f64::from(container.offset_top()),
        height: f64::from(container.offset_height()),
    })
}

fn by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

fn select(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

fn select_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn into_html(el: Element) -> Option<HtmlElement> {
    el.dyn_into().ok()
}

fn set_style(el: Option<&HtmlElement>, property: &str, value: &str) -> Result<(), JsValue> {
    match el {
        Some(el) => el.style().set_property(property, value),
        None => Ok(()),
    }
}

const fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn report(what: &'static str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        tracing::warn!(what, ?err, "dom update failed");
    }
}
