//! Text normalization for tree search
//!
//! Search is accent- and case-insensitive:
//! - Unicode NFD decomposition
//! - Combining diacritical marks (U+0300..=U+036F) stripped
//! - Lowercase conversion

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Normalize text for substring matching.
///
/// # Examples
///
/// ```
/// use asset_tree::tree::normalize::normalize_search_text;
///
/// assert_eq!(normalize_search_text("Válvula"), "valvula");
/// assert_eq!(normalize_search_text("TORQUE Sensor"), "torque sensor");
/// ```
pub fn normalize_search_text(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_diacritic(*c)).collect();
    stripped.to_lowercase()
}
