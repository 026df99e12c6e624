//! Line badge styling.
//!
//! Maps a departure's transport category (e.g. `T`, `B`, `S`, `IC`) and line
//! number to the colours of its badge and the icon shown for it. Rules are
//! evaluated in order and the first match wins; every table has an explicit
//! fallback.

use std::fmt;

/// Zurich tram line colours (VBZ).
const TRAM_COLORS: &[(&str, &str)] = &[
    ("2", "#dc002e"),
    ("3", "#006d3d"),
    ("4", "#4a2374"),
    ("5", "#7a5131"),
    ("6", "#d27c23"),
    ("7", "#111111"),
    ("8", "#82b727"),
    ("9", "#4a2374"),
    ("10", "#d01479"),
    ("11", "#006d3d"),
    ("12", "#009fe3"),
    ("13", "#f7d300"),
    ("14", "#009fe3"),
    ("15", "#dc002e"),
    ("17", "#a32338"),
    ("20", "#dc002e"),
];

/// The one tram line whose yellow badge needs dark text.
const TRAM_DARK_TEXT_LINE: &str = "13";

/// City bus lines drawn in the operator's blue.
///
/// Category alone cannot tell operators apart, so this is a heuristic.
const BRANDED_BUS_LINES: &[&str] = &[
    "31", "32", "33", "34", "46", "66", "67", "69", "72", "80", "83",
];

const TRAM_CATEGORIES: &[&str] = &["T", "TRAM"];
const BUS_CATEGORIES: &[&str] = &["B", "BUS", "N"];
const SUBURBAN_CATEGORIES: &[&str] = &["S", "SN"];
const LONG_DISTANCE_CATEGORIES: &[&str] = &["IC", "IR", "EC", "ICE", "RE", "RJX", "TGV"];
const SHIP_CATEGORIES: &[&str] = &["BAT", "SHIP"];

const GENERIC_TRAM_BLUE: &str = "#0078bf";
const BRANDED_BUS_BLUE: &str = "#0078bf";
const NEUTRAL_BUS_GRAY: &str = "#64748b";
const SUBURBAN_INDIGO: &str = "#4338ca";
const LONG_DISTANCE_RED: &str = "#dc002e";
const SHIP_CYAN: &str = "#0ea5e9";
const FALLBACK_SLATE: &str = "#334155";

const WHITE: &str = "#ffffff";
const BLACK: &str = "#000000";

/// Category code to icon.
const ICONS: &[(&str, TransportIcon)] = &[
    ("T", TransportIcon::Tram),
    ("TRAM", TransportIcon::Tram),
    ("B", TransportIcon::Bus),
    ("BUS", TransportIcon::Bus),
    ("N", TransportIcon::Bus),
    ("BAT", TransportIcon::Ship),
    ("SHIP", TransportIcon::Ship),
    ("M", TransportIcon::Train),
    ("IC", TransportIcon::Train),
    ("IR", TransportIcon::Train),
    ("RE", TransportIcon::Train),
    ("S", TransportIcon::Train),
    ("SN", TransportIcon::Train),
    ("EC", TransportIcon::Train),
    ("ICE", TransportIcon::Train),
    ("RJ", TransportIcon::Train),
    ("RJX", TransportIcon::Train),
    ("TGV", TransportIcon::Train),
    ("FUN", TransportIcon::Cable),
    ("PB", TransportIcon::Cable),
];

/// Icon category for a mode of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportIcon {
    Train,
    Bus,
    Tram,
    Ship,
    Cable,
    Unknown,
}

impl TransportIcon {
    /// CSS class suffix used by the templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportIcon::Train => "train",
            TransportIcon::Bus => "bus",
            TransportIcon::Tram => "tram",
            TransportIcon::Ship => "ship",
            TransportIcon::Cable => "cable",
            TransportIcon::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge colours and icon for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    /// Badge background, as a CSS hex colour.
    pub background: &'static str,
    /// Badge text colour, as a CSS hex colour.
    pub text: &'static str,
    pub icon: TransportIcon,
}

/// Resolve the badge style for a line.
///
/// # Examples
///
/// ```
/// use departure_board::domain::{style_for, TransportIcon};
///
/// let s5 = style_for("S", "5");
/// assert_eq!(s5.background, "#4338ca");
/// assert_eq!(s5.text, "#ffffff");
/// assert_eq!(s5.icon, TransportIcon::Train);
///
/// let tram13 = style_for("T", "13");
/// assert_eq!(tram13.text, "#000000");
/// ```
pub fn style_for(category: &str, number: &str) -> LineStyle {
    let cat = normalize_category(category);
    let num = normalize_number(number);
    let (background, text) = colors_for(&cat, &num);

    LineStyle {
        background,
        text,
        icon: icon_for(&cat),
    }
}

fn colors_for(cat: &str, num: &str) -> (&'static str, &'static str) {
    if TRAM_CATEGORIES.contains(&cat) {
        let text = if num == TRAM_DARK_TEXT_LINE { BLACK } else { WHITE };
        return match lookup(TRAM_COLORS, num) {
            Some(bg) => (bg, text),
            None => (GENERIC_TRAM_BLUE, WHITE),
        };
    }

    if BUS_CATEGORIES.contains(&cat) {
        if BRANDED_BUS_LINES.contains(&num) {
            return (BRANDED_BUS_BLUE, WHITE);
        }
        return (NEUTRAL_BUS_GRAY, WHITE);
    }

    if SUBURBAN_CATEGORIES.contains(&cat) {
        return (SUBURBAN_INDIGO, WHITE);
    }

    if LONG_DISTANCE_CATEGORIES.contains(&cat) {
        return (LONG_DISTANCE_RED, WHITE);
    }

    if SHIP_CATEGORIES.contains(&cat) {
        return (SHIP_CYAN, WHITE);
    }

    (FALLBACK_SLATE, WHITE)
}

/// Icon for a transport category, [`TransportIcon::Unknown`] when unrecognised.
pub fn icon_for(category: &str) -> TransportIcon {
    let cat = normalize_category(category);
    ICONS
        .iter()
        .find(|(code, _)| *code == cat)
        .map(|(_, icon)| *icon)
        .unwrap_or(TransportIcon::Unknown)
}

/// Text printed inside a line badge.
///
/// # Examples
///
/// ```
/// use departure_board::domain::badge_text;
///
/// assert_eq!(badge_text("S", "5"), "S5");
/// assert_eq!(badge_text("S", "S12"), "S12");
/// assert_eq!(badge_text("IC", "1"), "IC1");
/// assert_eq!(badge_text("IC", "2175"), "IC");
/// assert_eq!(badge_text("T", "11"), "11");
/// ```
pub fn badge_text(category: &str, number: &str) -> String {
    let cat = normalize_category(category);
    let num = number.trim();

    if SUBURBAN_CATEGORIES.contains(&cat.as_str()) {
        if num.starts_with('S') {
            return num.to_string();
        }
        return format!("S{num}");
    }

    if LONG_DISTANCE_CATEGORIES.contains(&cat.as_str()) {
        if num.chars().count() <= 2 {
            return format!("{cat}{num}");
        }
        return cat;
    }

    num.to_string()
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn normalize_category(category: &str) -> String {
    category.trim().to_uppercase()
}

fn normalize_number(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}
