#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use steelsite_core::{Site, SiteConfig, SiteError, SiteEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, Node};
use web_time::Instant;

use crate::dom::Dom;
use crate::logging;

type Listener = Closure<dyn FnMut(Event)>;

/// Behavior layer of the landing page.
///
/// The host page creates one instance and calls [`init`](Self::init) once
/// the document is parsed. Everything after that is driven by DOM events and
/// a single internal timeout.
#[wasm_bindgen]
pub struct SteelSite {
    runtime: Option<Rc<Runtime>>,
}

#[wasm_bindgen]
impl SteelSite {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Resolve the page, attach listeners and run the load pass.
    ///
    /// `options` is an optional object with `SiteConfig` fields in camelCase.
    /// Invalid options are logged and replaced by defaults. Calling `init`
    /// again tears down the previous wiring first.
    pub fn init(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        let (config, rejected) = match parse_options(options) {
            Ok(config) => (config, None),
            Err(err) => (SiteConfig::default(), Some(err)),
        };
        logging::init(config.max_level());
        if let Some(err) = rejected {
            tracing::warn!(%err, "options rejected; using defaults");
        }
        self.destroy();

        let dom = Dom::locate().map_err(to_js)?;
        let mut site = Site::new(config, dom.menu_items.len());
        site.capture_primary(|binding| dom.read_binding(binding));

        let runtime = Runtime::new(site, dom);
        runtime.wire()?;
        runtime.dispatch(SiteEvent::Load);
        self.runtime = Some(runtime);
        tracing::info!("initialization complete");
        Ok(())
    }

    /// Toggle the page language, exactly as the desktop toggle does.
    #[wasm_bindgen(js_name = switchLanguage)]
    pub fn switch_language(&self) {
        if let Some(runtime) = &self.runtime {
            runtime.dispatch(SiteEvent::LocaleToggle);
        }
    }

    /// Explicit teardown for JS callers. Detaches every listener and cancels
    /// the pending timeout.
    pub fn destroy(&mut self) {
        self.runtime = None;
    }
}

fn parse_options(options: Option<JsValue>) -> Result<SiteConfig, SiteError> {
    let Some(options) = options.filter(|v| !v.is_undefined() && !v.is_null()) else {
        return Ok(SiteConfig::default());
    };
    let json = js_sys::JSON::stringify(&options)
        .map_err(|_| SiteError::Config("options are not JSON-serializable".to_string()))?;
    SiteConfig::from_json(&String::from(json))
}

fn to_js(err: SiteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Wiring shared by every listener: the controller, the DOM and the timer.
struct Runtime {
    site: RefCell<Site>,
    dom: Dom,
    epoch: Instant,
    tick: Closure<dyn FnMut()>,
    /// Armed timeout handle and the deadline it was armed for.
    timeout: Cell<Option<(i32, Duration)>>,
    listeners: RefCell<Vec<(EventTarget, &'static str, Listener)>>,
}

impl Runtime {
    fn new(site: Site, dom: Dom) -> Rc<Self> {
        Rc::new_cyclic(|weak| {
            let weak = weak.clone();
            let tick = Closure::<dyn FnMut()>::new(move || {
                if let Some(runtime) = weak.upgrade() {
                    runtime.timeout.set(None);
                    runtime.on_timeout();
                }
            });
            Self {
                site: RefCell::new(site),
                dom,
                epoch: Instant::now(),
                tick,
                timeout: Cell::new(None),
                listeners: RefCell::default(),
            }
        })
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn dispatch(&self, event: SiteEvent) {
        let now = self.now();
        let effects = self.site.borrow_mut().handle(event, now, &self.dom);
        self.dom.apply(&effects);
        self.rearm(now);
    }

    fn on_timeout(&self) {
        let now = self.now();
        let effects = self.site.borrow_mut().advance(now, &self.dom);
        self.dom.apply(&effects);
        self.rearm(now);
    }

    /// Keep exactly one timeout armed for the controller's next deadline.
    fn rearm(&self, now: Duration) {
        let next = self.site.borrow().next_deadline();
        if let Some((_, armed)) = self.timeout.get()
            && Some(armed) == next
        {
            return;
        }
        self.clear_timeout();
        let Some(deadline) = next else {
            return;
        };
        let delay = deadline.saturating_sub(now).as_micros().div_ceil(1000);
        let millis = i32::try_from(delay).unwrap_or(i32::MAX);
        match self
            .dom
            .window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.tick.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => self.timeout.set(Some((handle, deadline))),
            Err(err) => tracing::warn!(?err, "failed to arm timeout"),
        }
    }

    fn clear_timeout(&self) {
        if let Some((handle, _)) = self.timeout.take() {
            self.dom.window().clear_timeout_with_handle(handle);
        }
    }

    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        kind: &'static str,
        handler: impl Fn(&Self, &Event) + 'static,
    ) -> Result<(), JsValue> {
        let weak = Rc::downgrade(self);
        let listener = Listener::new(move |event: Event| {
            if let Some(runtime) = weak.upgrade() {
                handler(&runtime, &event);
            }
        });
        target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        self.listeners
            .borrow_mut()
            .push((target.clone(), kind, listener));
        Ok(())
    }

    fn wire(self: &Rc<Self>) -> Result<(), JsValue> {
        let dom = &self.dom;
        dom.wire_menu_aria();

        self.listen(dom.window(), "scroll", |rt, _| rt.dispatch(SiteEvent::Scroll))?;

        if let (Some(toggle), Some(_)) = (&dom.menu_toggle, &dom.menu) {
            self.listen(toggle, "click", |rt, event| {
                event.prevent_default();
                event.stop_propagation();
                rt.dispatch(SiteEvent::MenuToggle);
            })?;
        }

        for item in &dom.menu_items {
            if item.id() == "mobile-language-toggle" {
                self.listen(item, "click", |rt, event| {
                    event.prevent_default();
                    rt.dispatch(SiteEvent::mobile_locale_toggle(true));
                })?;
            } else {
                self.listen(item, "click", |rt, _| {
                    rt.dispatch(SiteEvent::MenuItem { locale_toggle: false });
                })?;
            }
        }

        if let Some(toggle) = dom.standalone_mobile_language_toggle() {
            self.listen(toggle, "click", |rt, event| {
                event.prevent_default();
                rt.dispatch(SiteEvent::mobile_locale_toggle(false));
            })?;
        }

        self.listen(dom.document(), "click", |rt, event| {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside_menu = rt.dom.is_inside_menu(target.as_ref());
            rt.dispatch(SiteEvent::DocumentClick { inside_menu });
        })?;

        if let Some(menu) = &dom.menu {
            self.listen(menu, "keydown", |rt, event| {
                let escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|key| key.key() == "Escape");
                if escape {
                    rt.dispatch(SiteEvent::Escape);
                }
            })?;
        }

        if let Some(toggle) = &dom.language_toggle {
            self.listen(toggle, "click", |rt, event| {
                event.prevent_default();
                rt.dispatch(SiteEvent::LocaleToggle);
            })?;
        }

        if dom.has_contact_form()
            && let Some(form) = &dom.form
        {
            self.listen(form, "submit", |rt, event| {
                event.prevent_default();
                let form = rt.dom.read_form();
                let lang = rt.dom.lang();
                rt.dispatch(SiteEvent::Submit { form, lang });
            })?;
        }

        tracing::debug!(listeners = self.listeners.borrow().len(), "listeners attached");
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        for (target, kind, listener) in self.listeners.get_mut().drain(..) {
            if let Err(err) =
                target.remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            {
                tracing::warn!(kind, ?err, "failed to detach listener");
            }
        }
        self.clear_timeout();
        self.site.get_mut().shutdown();
        tracing::debug!("page behavior torn down");
    }
}
