#![forbid(unsafe_code)]

//! Browser console sink for `tracing`.
//!
//! [`ConsoleLayer`] formats each event as one line
//! (`LEVEL target: message key=value ...`) and hands it to a sink. The
//! default sink writes through the `console` method matching the level on
//! wasm and discards output on native targets.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;

type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// A `tracing_subscriber::Layer` that writes one formatted line per event.
pub struct ConsoleLayer {
    sink: Sink,
}

impl ConsoleLayer {
    /// Layer writing to the browser console.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(console_sink)
    }

    /// Layer writing to `sink`.
    pub fn with_sink(sink: impl Fn(Level, &str) + Send + Sync + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        (self.sink)(*metadata.level(), &visitor.into_line(*metadata.level(), metadata.target()));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name(), value));
        }
    }

    fn into_line(self, level: Level, target: &str) -> String {
        let mut line = format!("{level} {target}: {}", self.message.unwrap_or_default());
        for (key, value) in &self.fields {
            let _ = write!(line, " {key}={value}");
        }
        line
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Install [`ConsoleLayer`] as the global subscriber, filtered to `max_level`.
///
/// Returns `false` if a global subscriber was already set (a second `init`
/// on the same page keeps the first one).
pub fn init(max_level: Level) -> bool {
    tracing_subscriber::registry()
        .with(ConsoleLayer::new().with_filter(LevelFilter::from_level(max_level)))
        .try_init()
        .is_ok()
}

#[cfg(target_arch = "wasm32")]
fn console_sink(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    if level == Level::ERROR {
        console::error_1(&line);
    } else if level == Level::WARN {
        console::warn_1(&line);
    } else if level == Level::INFO {
        console::info_1(&line);
    } else {
        console::debug_1(&line);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn console_sink(_level: Level, _line: &str) {}
