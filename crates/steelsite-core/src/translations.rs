#![forbid(unsafe_code)]

//! Translation tables and their DOM bindings.
//!
//! Every translatable node is reached through a [`Binding`]: a content key,
//! a CSS selector and the kind of write (text, trusted markup, or input
//! placeholder). A key may bind to more than one node (desktop and mobile
//! navigation share keys).
//!
//! The English table is fully static. The German table holds the short UI
//! strings statically; the long paragraph markup and the form placeholders
//! are the document's own markup and are captured from the live page at
//! startup via [`TranslationTable::capture`], so both locales live in the same
//! structure.
//!
//! Markup values are trusted static content. Nothing in this module may carry
//! user input.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::locale::Locale;

/// How a binding writes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// `textContent`.
    Text,
    /// `innerHTML` (trusted static markup only).
    Markup,
    /// The `placeholder` attribute of a form control.
    Placeholder,
}

/// Connects a content key to one DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub key: &'static str,
    pub selector: &'static str,
    pub kind: BindingKind,
}

const fn text(key: &'static str, selector: &'static str) -> Binding {
    Binding {
        key,
        selector,
        kind: BindingKind::Text,
    }
}

const fn markup(key: &'static str, selector: &'static str) -> Binding {
    Binding {
        key,
        selector,
        kind: BindingKind::Markup,
    }
}

const fn placeholder(key: &'static str, selector: &'static str) -> Binding {
    Binding {
        key,
        selector,
        kind: BindingKind::Placeholder,
    }
}

/// Every translatable node on the page, in rewrite order.
///
/// Toggle labels come first so they update even if a later rewrite fails.
pub static BINDINGS: &[Binding] = &[
    text("lang-switch", "#language-toggle"),
    text("lang-switch", "#mobile-language-toggle"),
    text("nav-home", ".nav-links li:nth-child(1) a"),
    text("nav-about", ".nav-links li:nth-child(2) a"),
    text("nav-services", ".nav-links li:nth-child(3) a"),
    text("nav-info", ".nav-links li:nth-child(4) a"),
    text("nav-contact", ".nav-links li:nth-child(5) a"),
    text("nav-home", "#mobile-menu ul li:nth-child(1) a"),
    text("nav-about", "#mobile-menu ul li:nth-child(2) a"),
    text("nav-services", "#mobile-menu ul li:nth-child(3) a"),
    text("nav-info", "#mobile-menu ul li:nth-child(4) a"),
    text("nav-contact", "#mobile-menu ul li:nth-child(5) a"),
    text("hero-text", ".hero p"),
    text("cta-button", ".cta-button"),
    text("about-title", ".about-title"),
    text("services-title", ".services-title"),
    text("info-title", ".info-title"),
    text("contact-title", ".contact-title"),
    text("form-name", "label[for=\"name\"]"),
    text("form-email", "label[for=\"email\"]"),
    text("form-phone", "label[for=\"phone\"]"),
    text("form-date", "label[for=\"date\"]"),
    text("form-location", "label[for=\"location\"]"),
    text("form-details", "label[for=\"message\"]"),
    text("submit-btn", ".submit-btn"),
    text("footer-contact", ".footer-section:nth-child(2) h3"),
    text("footer-legal", ".footer-section:nth-child(3) h3"),
    text("copyright", ".copyright p"),
    markup("about-p1", "#about-p1"),
    markup("about-p2", "#about-p2"),
    markup("about-p3", "#about-p3"),
    markup("service1-title", "#service1-title"),
    markup("service1-p1", "#service1-p1"),
    markup("service1-p2", "#service1-p2"),
    markup("service2-title", "#service2-title"),
    markup("service2-p1", "#service2-p1"),
    markup("service2-p2", "#service2-p2"),
    markup("service3-title", "#service3-title"),
    markup("service3-p1", "#service3-p1"),
    markup("service3-p2", "#service3-p2"),
    markup("service3-p3", "#service3-p3"),
    markup("info-p1", "#info-p1"),
    markup("info-p2", "#info-p2"),
    markup("info-p3", "#info-p3"),
    markup("info-p4", "#info-p4"),
    markup("contact-p1", "#contact-p1"),
    markup("contact-p2", "#contact-p2"),
    placeholder("placeholder-name", "#name"),
    placeholder("placeholder-email", "#email"),
    placeholder("placeholder-phone", "#phone"),
    placeholder("placeholder-location", "#location"),
    placeholder("placeholder-message", "#message"),
];

static GERMAN: &[(&str, &str)] = &[
    ("nav-home", "Home"),
    ("nav-about", "Euer Tag"),
    ("nav-services", "Leistungen"),
    ("nav-info", "Infos"),
    ("nav-contact", "Kontakt"),
    ("lang-switch", "EN"),
    ("hero-text", "Heiraten mit Stil. Und STEEL."),
    ("cta-button", "Anfrage senden"),
    ("about-title", "Euer Tag rückt näher. Und jetzt?"),
    ("services-title", "Eure Hochzeitsfeier"),
    ("info-title", "Das solltet ihr noch wissen."),
    ("contact-title", "Passt? Prima."),
    ("form-name", "Name"),
    ("form-email", "E-Mail"),
    ("form-phone", "Telefon/Handy"),
    ("form-date", "Hochzeitsdatum"),
    ("form-location", "Ort"),
    ("form-details", "Details"),
    ("submit-btn", "Anfrage senden"),
    ("footer-contact", "Kontakt"),
    ("footer-legal", "Rechtliches"),
    ("copyright", "© 2025 STEELweddings. Alle Rechte vorbehalten."),
];

static ENGLISH: &[(&str, &str)] = &[
    ("nav-home", "Home"),
    ("nav-about", "Your Day"),
    ("nav-services", "Services"),
    ("nav-info", "Info"),
    ("nav-contact", "Contact"),
    ("lang-switch", "DE"),
    ("hero-text", "Weddings with style. And STEEL."),
    ("cta-button", "Send inquiry"),
    ("about-title", "Your big day is approaching. What now?"),
    ("services-title", "Your Wedding Party"),
    ("info-title", "What you should know."),
    ("contact-title", "Sounds good?"),
    ("form-name", "Name"),
    ("form-email", "Email"),
    ("form-phone", "Phone"),
    ("form-date", "Wedding date"),
    ("form-location", "Location"),
    ("form-details", "Details"),
    ("submit-btn", "Send inquiry"),
    ("footer-contact", "Contact"),
    ("footer-legal", "Legal"),
    ("copyright", "© 2025 STEELweddings. All rights reserved."),
    (
        "about-p1",
        "Your wedding is <strong>exciting</strong> – especially for you. But your loved ones are also getting dressed up and ready to celebrate. That's where I come in. I believe you shouldn't <em>have to worry about the music</em>. I'll make sure your party is a complete success!",
    ),
    (
        "about-p2",
        "The guests at your wedding are both young and old. To appeal to them, music should play that everyone knows (<strong>hits only!</strong>). Sometimes it's something from the 60s for twisting, another time from the 90s for thrashing. Current charts and <strong>electronic beats</strong> are also essential. All wrapped in a mix that doesn't scare anyone but still feels like you're in a club.",
    ),
    (
        "about-p3",
        "Songs that connect you and your guests also play an important role here. <strong>#BachelorParty</strong>",
    ),
    ("service1-title", "Finally, it's starting."),
    (
        "service1-p1",
        "To open the dance floor, you are asked: Whether a <strong>Viennese Waltz</strong> or a <strong>Disco Fox</strong>, sometimes just a cozy swinging: Your song selection starts the party and an unforgettable night. Choose wisely – I'm happy to support you.",
    ),
    (
        "service1-p2",
        "You don't want a <strong>first dance</strong>? No problem. It's your wedding, and we'll design it the way you want it.",
    ),
    ("service2-title", "Let's party."),
    (
        "service2-p1",
        "Once the party is in full swing, there's no stopping. <strong>Live Mashups</strong> transport your guests to a different sound world – far away from the usual radio noise. I'm happy to incorporate music requests at the right place in the mix.",
    ),
    (
        "service2-p2",
        "At the latest when <strong>Beyoncé</strong> invites the next lucky ones to catch the bridal bouquet with her Single Ladies, the dance floor is safe from no hit (and guest)!",
    ),
    ("service3-title", "Great technology."),
    (
        "service3-p1",
        "Have you ever heard of <strong>Fohhn</strong>? Since 1993, the German company has been producing premium sound systems – all made in Germany. Depending on the location, my Fohhn system is sufficient for up to 200 people and more. So when I DJ, not only is the music selection right, but also the sound quality.",
    ),
    (
        "service3-p2",
        "<strong>Lighting</strong> is often undervalued in my opinion. Yet controllable lights create an epic atmosphere during the party and great photos afterward. With ambient spots, I can accurately set the scene at your location and create a cozy basic mood just with light as soon as it gets dark outside.",
    ),
    (
        "service3-p3",
        "For even more <strong>club atmosphere</strong>, I have fog on request to really bring out the light beams in the room.",
    ),
    (
        "info-p1",
        "I originally come from the <strong>club scene</strong> and still regularly DJ in discotheques today. Transitions and mixing are therefore very important to me. Above all, I make sure that consecutive songs fit together. I incorporate music requests at the point where they fit in. I basically don't play genres criss-cross – I'm not a jukebox. If you want to experience me live: On <a href=\"https://instagram.com/steelofficial\" target=\"_blank\">Instagram</a>, I regularly announce when and where I'm performing.",
    ),
    (
        "info-p2",
        "Musically, I'm an <strong>all-rounder</strong> (open format). I'm also very knowledgeable about electronic music (<a href=\"https://linktr.ee/STEELofficial\" target=\"_blank\">and as STEEL, I also release such music myself</a>). I'm definitely not the right person for weddings with a high proportion of German folk or après-ski music. There are other DJs for that.",
    ),
    (
        "info-p3",
        "I'm a <strong>DJ, not an entertainer or animator</strong>. I therefore focus on DJing and only rarely use the microphone when it fits well.",
    ),
    (
        "info-p4",
        "By the way: I'm a member of the <strong><a href=\"https://lovecrew-ruhrpott.de\" target=\"_blank\">Lovecrew Ruhrpott</a></strong>. This is an association of the best wedding service providers in the Ruhr area. If you're just starting your wedding planning, be sure to check it out!",
    ),
    (
        "contact-p1",
        "Are you already getting excited about your wedding celebration? Very cool! Just ask, maybe I still have a date available. To be on the safe side, you should contact me about a year before your wedding. But I'm sometimes available spontaneously too.",
    ),
    (
        "contact-p2",
        "My prices start at <span class=\"highlight\">1500,- €</span> (incl. VAT) for 7 hours and depend on what time I should start. I always play until at least 3 am. Open end on request!",
    ),
    ("placeholder-name", "Who's getting married? :)"),
    ("placeholder-email", "dreamcouple@email.com"),
    ("placeholder-phone", "I call you maybe"),
    ("placeholder-location", "Where will the party take place?"),
    (
        "placeholder-message",
        "e.g. schedule, start time, number of guests, music",
    ),
];

/// Content key → localized string or markup, for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable {
    entries: BTreeMap<&'static str, Cow<'static, str>>,
}

impl TranslationTable {
    /// The compiled-in table for `locale`.
    #[must_use]
    pub fn builtin(locale: Locale) -> Self {
        let source = match locale {
            Locale::German => GERMAN,
            Locale::English => ENGLISH,
        };
        Self {
            entries: source
                .iter()
                .map(|&(key, value)| (key, Cow::Borrowed(value)))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(AsRef::as_ref)
    }

    /// Fill keys this table lacks by reading the bound nodes' current content.
    ///
    /// `read` returns the node's content in the binding's kind (text, markup
    /// or placeholder), or `None` when the node is missing. Keys the table
    /// already has are never overwritten. Returns how many keys were added.
    pub fn capture<F>(&mut self, bindings: &[Binding], mut read: F) -> usize
    where
        F: FnMut(&Binding) -> Option<String>,
    {
        let mut added = 0;
        for binding in bindings {
            if self.entries.contains_key(binding.key) {
                continue;
            }
            if let Some(value) = read(binding) {
                self.entries.insert(binding.key, Cow::Owned(value));
                added += 1;
            }
        }
        added
    }

    /// Keys referenced by `bindings` that this table cannot supply.
    #[must_use]
    pub fn missing_keys(&self, bindings: &[Binding]) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = bindings
            .iter()
            .map(|b| b.key)
            .filter(|key| !self.entries.contains_key(key))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_covers_every_binding() {
        let table = TranslationTable::builtin(Locale::English);
        assert!(table.missing_keys(BINDINGS).is_empty());
    }

    #[test]
    fn german_lacks_only_document_markup() {
        let table = TranslationTable::builtin(Locale::German);
        let missing = table.missing_keys(BINDINGS);
        assert!(!missing.is_empty());
        for key in &missing {
            let binding = BINDINGS.iter().find(|b| b.key == *key).unwrap();
            assert_ne!(binding.kind, BindingKind::Text, "{key} should be static");
        }
    }

    #[test]
    fn toggle_labels_name_the_other_locale() {
        assert_eq!(TranslationTable::builtin(Locale::German).get("lang-switch"), Some("EN"));
        assert_eq!(TranslationTable::builtin(Locale::English).get("lang-switch"), Some("DE"));
    }

    #[test]
    fn capture_fills_only_missing_keys() {
        let mut table = TranslationTable::builtin(Locale::German);
        let before = table.missing_keys(BINDINGS).len();
        let added = table.capture(BINDINGS, |b| Some(format!("captured:{}", b.selector)));
        assert_eq!(added, before);
        assert_eq!(table.get("hero-text"), Some("Heiraten mit Stil. Und STEEL."));
        assert_eq!(table.get("about-p1"), Some("captured:#about-p1"));
        assert!(table.missing_keys(BINDINGS).is_empty());
    }

    #[test]
    fn capture_skips_absent_nodes() {
        let mut table = TranslationTable::builtin(Locale::German);
        let added = table.capture(BINDINGS, |b| (b.key != "info-p4").then(String::new));
        assert!(added > 0);
        assert_eq!(table.missing_keys(BINDINGS), vec!["info-p4"]);
    }

    #[test]
    fn bindings_start_with_toggle_labels() {
        assert!(BINDINGS.iter().take(2).all(|b| b.key == "lang-switch"));
    }
}
