//! Locale-independent base-letter collation
//!
//! Search results are ordered the way a reader expects from a dictionary:
//! case and accents do not affect placement, so "Éka Pada" sits next to
//! "eka pada" and "Apple" comes before "zebra".

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Build the comparison key for a label.
///
/// Compatibility decomposition (NFKD) splits accented letters into a base
/// letter plus combining marks; the marks are dropped and the rest is
/// lowercased. Letters with a built-in stroke or ligature (`ø`, `ł`, `ß`, `æ`)
/// have no decomposition and are folded to their base letters explicitly.
/// Surrounding whitespace is ignored.
///
/// ```
/// use yoga_common::collation::collation_key;
///
/// assert_eq!(collation_key("  Śavāsana "), "savasana");
/// assert_eq!(collation_key("APPLE"), "apple");
/// assert_eq!(collation_key("Łódź"), "lodz");
/// ```
pub fn collation_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for c in label.trim().nfkd().filter(|c| !is_combining_mark(*c)) {
        for lower in c.to_lowercase() {
            match fold_base_letter(lower) {
                Some(base) => key.push_str(base),
                None => key.push(lower),
            }
        }
    }
    key
}

/// Base letters for lowercase letters NFKD leaves intact
fn fold_base_letter(c: char) -> Option<&'static str> {
    let base = match c {
        'ß' | 'ẞ' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "o",
        'ł' | 'ŀ' => "l",
        'đ' | 'ð' => "d",
        'þ' => "th",
        'ħ' => "h",
        'ŧ' => "t",
        'ı' => "i",
        'ĸ' => "k",
        'ŋ' => "n",
        'ƀ' => "b",
        'ɨ' => "i",
        'ʉ' => "u",
        _ => return None,
    };
    Some(base)
}

/// Compare two labels by base letter only.
pub fn compare_base(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_ignored() {
        assert_eq!(compare_base("apple", "APPLE"), Ordering::Equal);
        assert_eq!(compare_base("Apple", "zebra"), Ordering::Less);
        assert_eq!(compare_base("zebra", "Apple"), Ordering::Greater);
    }

    #[test]
    fn test_diacritics_are_ignored() {
        assert_eq!(compare_base("Śavāsana", "savasana"), Ordering::Equal);
        assert_eq!(compare_base("café", "cafe"), Ordering::Equal);
    }

    #[test]
    fn test_mixed_labels_order() {
        let mut labels = vec!["Zebra", "apple", "Mango", "éclair"];
        labels.sort_by(|a, b| compare_base(a, b));
        assert_eq!(labels, vec!["apple", "éclair", "Mango", "Zebra"]);
    }

    #[test]
    fn test_stroked_letters_fold() {
        assert_eq!(collation_key("Øresund"), "oresund");
        assert_eq!(collation_key("Łódź"), "lodz");
        assert_eq!(collation_key("Đakovo"), "dakovo");
        assert_eq!(compare_base("Strasse", "Straße"), Ordering::Equal);
        assert_eq!(compare_base("Encyclopaedia", "Encyclopædia"), Ordering::Equal);
    }

    #[test]
    fn test_stroked_letters_sort_with_base() {
        let mut labels = vec!["Zebra", "Øresund", "Apple", "Straße", "Łódź", "Oak"];
        labels.sort_by(|a, b| compare_base(a, b));
        assert_eq!(labels, vec!["Apple", "Łódź", "Oak", "Øresund", "Straße", "Zebra"]);
    }

    #[test]
    fn test_compatibility_forms_fold() {
        // Full-width letters fold to their ASCII base
        assert_eq!(collation_key("ＡＢＣ"), "abc");
    }

    #[test]
    fn test_empty_label() {
        assert_eq!(collation_key(""), "");
        assert_eq!(collation_key("   "), "");
    }
}
