#![forbid(unsafe_code)]

//! Static registry of page sections.
//!
//! Sections are listed in document order (top to bottom). Each section maps
//! 1:1 to a mobile navigation indicator and carries the class that marks the
//! indicator active, plus the accent ("theme") class applied to the logo and
//! locale toggles while the section is current.

/// Identifier of one page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Home,
    About,
    Services,
    Info,
    Contact,
}

impl SectionId {
    /// Number of registered sections.
    pub const COUNT: usize = 5;

    /// All sections in document order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Home,
        Self::About,
        Self::Services,
        Self::Info,
        Self::Contact,
    ];

    /// Position in document order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Registry entry for this section.
    #[must_use]
    pub fn section(self) -> &'static Section {
        &SECTIONS[self.index()]
    }
}

/// One registered section and its DOM bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    /// `id` attribute of the section container.
    pub element_id: &'static str,
    /// `id` attribute of the matching mobile navigation item.
    pub nav_id: &'static str,
    /// Class marking the navigation item active.
    pub active_class: &'static str,
    /// Accent class for logo and locale toggles; the hero section has none.
    pub theme_class: Option<&'static str>,
}

/// Registered sections, in document order.
pub static SECTIONS: [Section; SectionId::COUNT] = [
    Section {
        id: SectionId::Home,
        element_id: "home",
        nav_id: "mobile-nav-home",
        active_class: "active",
        theme_class: None,
    },
    Section {
        id: SectionId::About,
        element_id: "about",
        nav_id: "mobile-nav-about",
        active_class: "about-active",
        theme_class: Some("about-section"),
    },
    Section {
        id: SectionId::Services,
        element_id: "services",
        nav_id: "mobile-nav-services",
        active_class: "services-active",
        theme_class: Some("services-section"),
    },
    Section {
        id: SectionId::Info,
        element_id: "info",
        nav_id: "mobile-nav-info",
        active_class: "info-active",
        theme_class: Some("info-section"),
    },
    Section {
        id: SectionId::Contact,
        element_id: "contact",
        nav_id: "mobile-nav-contact",
        active_class: "contact-active",
        theme_class: Some("contact-section"),
    },
];

/// Every active-indicator class, for clearing an indicator in one pass.
pub fn active_classes() -> impl Iterator<Item = &'static str> {
    SECTIONS.iter().map(|s| s.active_class)
}

/// Every accent class, for clearing the logo and toggles in one pass.
pub fn theme_classes() -> impl Iterator<Item = &'static str> {
    SECTIONS.iter().filter_map(|s| s.theme_class)
}
