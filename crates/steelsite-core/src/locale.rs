#![forbid(unsafe_code)]

//! Two-locale switch engine.
//!
//! [`LocaleEngine`] is the single writer of the page locale. Each
//! [`toggle`](LocaleEngine::toggle) flips between German (the document's
//! native locale) and English and returns a [`LocaleSwitch`]: the new `lang`
//! attribute plus a [`RewritePlan`] the host applies to the DOM.
//!
//! Both directions are in-place rewrites as long as the target table covers
//! every binding. The German table only covers the long paragraph markup
//! after [`LocaleEngine::capture_primary`] has read it from the page; if that
//! capture was incomplete, switching back to German falls back to
//! [`RewritePlan::Reload`], which restores the original markup.

use crate::translations::{BINDINGS, Binding, BindingKind, TranslationTable};

/// One of the two supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// Primary locale; the document's static markup.
    #[default]
    German,
    /// Secondary locale.
    English,
}

impl Locale {
    pub const PRIMARY: Self = Self::German;

    /// Value for the document's `lang` attribute.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::German => "de",
            Self::English => "en",
        }
    }

    /// Short display name, as shown on the toggle controls.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::German => "DE",
            Self::English => "EN",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::German => Self::English,
            Self::English => Self::German,
        }
    }

    /// Interpret a document `lang` attribute. Anything that is not German is English.
    #[must_use]
    pub fn from_lang_attr(lang: &str) -> Self {
        let primary = lang.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("de") {
            Self::German
        } else {
            Self::English
        }
    }
}

/// A single DOM write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub selector: &'static str,
    pub kind: BindingKind,
    pub value: String,
}

/// How the host brings the DOM in line with the new locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewritePlan {
    /// Apply these writes in order; a failed write is logged and skipped.
    InPlace(Vec<Rewrite>),
    /// Reload the page; only valid when returning to the primary locale.
    Reload,
}

/// Outcome of one locale toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSwitch {
    pub locale: Locale,
    /// New value of the document `lang` attribute.
    pub lang: &'static str,
    /// Label for the toggle controls: the short name of the other locale.
    pub toggle_label: &'static str,
    pub plan: RewritePlan,
}

/// Owner of the current locale and both translation tables.
#[derive(Debug, Clone)]
pub struct LocaleEngine {
    current: Locale,
    primary: TranslationTable,
    secondary: TranslationTable,
}

impl Default for LocaleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Locale::PRIMARY,
            primary: TranslationTable::builtin(Locale::German),
            secondary: TranslationTable::builtin(Locale::English),
        }
    }

    #[must_use]
    pub const fn current(&self) -> Locale {
        self.current
    }

    #[must_use]
    pub const fn table(&self, locale: Locale) -> &TranslationTable {
        match locale {
            Locale::German => &self.primary,
            Locale::English => &self.secondary,
        }
    }

    /// Capture the primary locale's document-only content. Call once at load,
    /// while the page still shows the primary locale.
    pub fn capture_primary<F>(&mut self, read: F) -> usize
    where
        F: FnMut(&Binding) -> Option<String>,
    {
        debug_assert_eq!(self.current, Locale::PRIMARY);
        let added = self.primary.capture(BINDINGS, read);
        let missing = self.primary.missing_keys(BINDINGS);
        if missing.is_empty() {
            tracing::debug!(added, "primary locale content captured");
        } else {
            tracing::warn!(
                added,
                missing = missing.len(),
                "primary locale capture incomplete; switching back will reload"
            );
        }
        added
    }

    /// Flip the locale and plan the DOM rewrite.
    pub fn toggle(&mut self) -> LocaleSwitch {
        self.current = self.current.other();
        let locale = self.current;
        let table = self.table(locale);
        let missing = table.missing_keys(BINDINGS);

        let plan = if missing.is_empty() {
            RewritePlan::InPlace(
                BINDINGS
                    .iter()
                    .filter_map(|binding| {
                        table.get(binding.key).map(|value| Rewrite {
                            selector: binding.selector,
                            kind: binding.kind,
                            value: value.to_owned(),
                        })
                    })
                    .collect(),
            )
        } else {
            debug_assert_eq!(locale, Locale::PRIMARY);
            tracing::info!(missing = ?missing, "primary content not retained; planning reload");
            RewritePlan::Reload
        };

        tracing::debug!(locale = locale.code(), "locale switched");
        LocaleSwitch {
            locale,
            lang: locale.code(),
            toggle_label: locale.other().short_name(),
            plan,
        }
    }
}
