//! Destination label cleanup.

/// Shorten a destination for display on a local board.
///
/// Drops a leading `city_prefix` (optionally followed by a comma, then any
/// whitespace) and a trailing `, Bahnhof`. Falls back to the original text if
/// nothing would be left.
///
/// # Examples
///
/// ```
/// use departure_board::domain::clean_destination;
///
/// assert_eq!(clean_destination("Zürich, Bellevue", Some("Zürich")), "Bellevue");
/// assert_eq!(clean_destination("Uster, Bahnhof", Some("Zürich")), "Uster");
/// assert_eq!(clean_destination("Zürich HB", None), "Zürich HB");
/// ```
pub fn clean_destination<'a>(to: &'a str, city_prefix: Option<&str>) -> &'a str {
    let mut label = to;

    if let Some(prefix) = city_prefix.filter(|p| !p.is_empty())
        && let Some(rest) = label.strip_prefix(prefix)
    {
        let rest = rest.strip_prefix(',').unwrap_or(rest);
        label = rest.trim_start();
    }

    if let Some(head) = strip_suffix_after_comma(label, "Bahnhof") {
        label = head;
    }

    if label.is_empty() { to } else { label }
}

/// `"X, Bahnhof"` → `"X"`, tolerating any whitespace after the comma.
fn strip_suffix_after_comma<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let head = s.strip_suffix(word)?.trim_end();
    head.strip_suffix(',')
}
