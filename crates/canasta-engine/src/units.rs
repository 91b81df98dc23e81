//! Internal byte-scanning primitives and the declarative unit-rule table.
//!
//! All functions operate on text pre-normalized by [`normalize_unit_text`]
//! (lowercased, decimal commas converted). Manual byte scanning is used
//! rather than `regex` to stay dependency-light. This module is
//! `pub(crate)` so [`crate::parse`] composes these routines without
//! exposing them as part of the public API.

use canasta_core::Measurement;

/// One matcher in the prioritized unit-rule list: a family tag, the factor
/// that converts the matched magnitude into the family's base unit, and
/// the spellings that select it.
pub(crate) struct UnitRule {
    pub(crate) aliases: &'static [&'static str],
    pub(crate) measurement: Measurement,
    pub(crate) to_base: f64,
}

/// Generic unit rules, in match priority order.
///
/// `"fl oz"` must precede the mass `"oz"` rule; longer spellings of a
/// prefix-sharing alias (e.g. `"grs"` vs `"gr"`) are handled by the
/// word-boundary check in [`matches_word_at`], not by ordering.
pub(crate) const UNIT_RULES: &[UnitRule] = &[
    UnitRule {
        aliases: &["fl oz", "fl. oz", "floz"],
        measurement: Measurement::Volume,
        to_base: 29.573_529_562_5,
    },
    UnitRule {
        aliases: &["kg", "kgs", "kilo", "kilos", "kilogramo", "kilogramos"],
        measurement: Measurement::Mass,
        to_base: 1000.0,
    },
    UnitRule {
        aliases: &["g", "gr", "grs", "gramo", "gramos"],
        measurement: Measurement::Mass,
        to_base: 1.0,
    },
    UnitRule {
        aliases: &["lb", "lbs", "libra", "libras"],
        measurement: Measurement::Mass,
        to_base: 453.592_37,
    },
    UnitRule {
        aliases: &["oz", "onza", "onzas"],
        measurement: Measurement::Mass,
        to_base: 28.349_523_125,
    },
    UnitRule {
        aliases: &["ml", "cc", "mililitro", "mililitros"],
        measurement: Measurement::Volume,
        to_base: 1.0,
    },
    UnitRule {
        aliases: &[
            "l", "lt", "lts", "litro", "litros", "liter", "liters", "litre", "litres",
        ],
        measurement: Measurement::Volume,
        to_base: 1000.0,
    },
    UnitRule {
        aliases: &["gal", "galon", "galones", "gallon", "gallons"],
        measurement: Measurement::Volume,
        to_base: 3785.411_784,
    },
];

/// Words that mark a magnitude as a discrete item count (`"12 unidades"`).
pub(crate) const ITEM_WORDS: &[&str] = &[
    "unidades", "unidad", "uds", "ud", "u", "units", "unit", "piezas", "pieza", "pzas", "pza",
    "pz", "pcs", "pc", "ct", "count", "c/u",
];

/// Words that mark the surrounding text as multipack notation, so a bare
/// number elsewhere in the string is an item count (`"paquete de 6"`).
pub(crate) const PACK_WORDS: &[&str] = &[
    "paquete",
    "paquetes",
    "pack",
    "packs",
    "caja",
    "cajas",
    "bolsa",
    "bolsas",
    "six pack",
    "sixpack",
];

/// Lowercases and trims the raw unit text and converts decimal commas
/// between digits (`"0,5"` → `"0.5"`) so the number scanner only has to
/// understand one separator.
pub(crate) fn normalize_unit_text(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let bytes = lower.as_bytes();
    let mut out = String::with_capacity(lower.len());
    for (i, ch) in lower.char_indices() {
        let decimal_comma = ch == ','
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_digit();
        out.push(if decimal_comma { '.' } else { ch });
    }
    out
}

/// Parses the number starting exactly at byte offset `i`. Accepts integers
/// and decimals with a single dot. Returns the value and the offset one
/// past the number's last byte.
pub(crate) fn number_at(s: &str, i: usize) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    if i >= len {
        return None;
    }
    let starts_number =
        bytes[i].is_ascii_digit() || (bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit());
    if !starts_number {
        return None;
    }
    let mut j = i;
    let mut has_dot = false;
    while j < len && (bytes[j].is_ascii_digit() || (bytes[j] == b'.' && !has_dot)) {
        if bytes[j] == b'.' {
            has_dot = true;
        }
        j += 1;
    }
    s[i..j].parse::<f64>().ok().map(|v| (v, j))
}

/// Calls `on_number` for every number in `s`, left to right, with the value
/// and the offset one past the number. Stops early when the closure
/// returns `Some`.
pub(crate) fn scan_numbers<T>(
    s: &str,
    mut on_number: impl FnMut(f64, usize) -> Option<T>,
) -> Option<T> {
    let mut i = 0usize;
    while i < s.len() {
        if let Some((value, end)) = number_at(s, i) {
            if let Some(result) = on_number(value, end) {
                return Some(result);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    None
}

fn skip_spaces(s: &str, mut i: usize) -> usize {
    let bytes = s.as_bytes();
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    i
}

/// `true` when `word` occurs at byte offset `i` and is not immediately
/// followed by another letter or digit, so `"g"` matches neither inside
/// `"gal"` nor in `"500g2"`, and `"ud"` does not match inside `"uds"`.
pub(crate) fn matches_word_at(s: &str, i: usize, word: &str) -> bool {
    if !s[i..].starts_with(word) {
        return false;
    }
    let end = i + word.len();
    !s[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

/// The first unit rule whose alias appears right after position `pos`
/// (spaces skipped), or `None`.
pub(crate) fn unit_rule_after(s: &str, pos: usize) -> Option<&'static UnitRule> {
    let i = skip_spaces(s, pos);
    UNIT_RULES
        .iter()
        .find(|rule| rule.aliases.iter().any(|alias| matches_word_at(s, i, alias)))
}

/// `true` when an item word appears right after position `pos` (spaces
/// skipped).
pub(crate) fn item_word_after(s: &str, pos: usize) -> bool {
    let i = skip_spaces(s, pos);
    ITEM_WORDS.iter().any(|word| matches_word_at(s, i, word))
}

/// `true` when `word` occurs anywhere in `s` on word boundaries.
pub(crate) fn contains_word(s: &str, word: &str) -> bool {
    let mut from = 0usize;
    while let Some(rel) = s[from..].find(word) {
        let i = from + rel;
        let before_ok = i == 0
            || !s[..i]
                .chars()
                .last()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let end = i + word.len();
        let after_ok = !s[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = i + 1;
    }
    false
}

pub(crate) fn contains_pack_word(s: &str) -> bool {
    PACK_WORDS.iter().any(|word| contains_word(s, word))
}

pub(crate) fn contains_item_word(s: &str) -> bool {
    ITEM_WORDS.iter().any(|word| contains_word(s, word))
}

/// Detects multipack notation where `x` is adjacent to the item count:
/// `"x12"`, `"paquete x6"`, `"12x"`.
///
/// A spaced or infixed `x` between two numbers (`"6 x 500 ml"`,
/// `"6x500ml"`) is size-multiplication shorthand, not a pack count, and is
/// deliberately left to the number+unit rules.
pub(crate) fn pack_count(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'x' {
            continue;
        }

        // "x12": boundary before the x, digits immediately after.
        let before_ok = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        if before_ok {
            if let Some((value, end)) = number_at(s, i + 1) {
                let after_ok = !s[end..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic());
                if after_ok {
                    return Some(value);
                }
            }
        }

        // "12x": digits immediately before the x, boundary after.
        if i > 0 && bytes[i - 1].is_ascii_digit() {
            let after_ok = i + 1 >= bytes.len() || !bytes[i + 1].is_ascii_alphanumeric();
            if after_ok {
                if let Some(start) = number_start_before(s, i) {
                    let boundary_before =
                        start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
                    if boundary_before {
                        if let Some((value, _)) = number_at(s, start) {
                            return Some(value);
                        }
                    }
                }
            }
        }
    }
    None
}

/// Walks backwards from `end` over a number's digits (and at most one dot)
/// and returns the offset where the number starts.
fn number_start_before(s: &str, end: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = end;
    let mut has_dot = false;
    while i > 0 {
        let c = bytes[i - 1];
        if c.is_ascii_digit() {
            i -= 1;
        } else if c == b'.' && !has_dot {
            has_dot = true;
            i -= 1;
        } else {
            break;
        }
    }
    (i < end).then_some(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_unit_text("  500 G "), "500 g");
    }

    #[test]
    fn normalize_converts_decimal_comma() {
        assert_eq!(normalize_unit_text("0,5 L"), "0.5 l");
    }

    #[test]
    fn normalize_keeps_list_commas() {
        assert_eq!(normalize_unit_text("g, kg"), "g, kg");
    }

    #[test]
    fn number_at_integer_and_decimal() {
        assert_eq!(number_at("500 g", 0), Some((500.0, 3)));
        assert_eq!(number_at("8.5oz", 0), Some((8.5, 3)));
        assert_eq!(number_at("abc", 0), None);
    }

    #[test]
    fn matches_word_boundary_rejects_longer_words() {
        assert!(matches_word_at("500 gal", 4, "gal"));
        assert!(!matches_word_at("500 gal", 4, "g"));
        assert!(!matches_word_at("12 uds", 3, "ud"));
    }

    #[test]
    fn matches_word_boundary_rejects_trailing_digit() {
        assert!(!matches_word_at("500g2", 3, "g"));
        assert!(matches_word_at("500g", 3, "g"));
    }

    #[test]
    fn unit_rule_fl_oz_wins_over_oz() {
        let rule = unit_rule_after("12 fl oz", 2).expect("rule");
        assert_eq!(rule.measurement, Measurement::Volume);
    }

    #[test]
    fn pack_count_x_prefix() {
        assert_eq!(pack_count("paquete x12"), Some(12.0));
        assert_eq!(pack_count("x6"), Some(6.0));
    }

    #[test]
    fn pack_count_x_suffix() {
        assert_eq!(pack_count("12x"), Some(12.0));
    }

    #[test]
    fn pack_count_ignores_multiplication_shorthand() {
        assert_eq!(pack_count("6 x 500 ml"), None);
        assert_eq!(pack_count("6x500ml"), None);
    }

    #[test]
    fn pack_count_ignores_x_inside_words() {
        assert_eq!(pack_count("aprox. 500 g"), None);
    }

    #[test]
    fn contains_word_requires_boundaries() {
        assert!(contains_word("1 unidad", "unidad"));
        assert!(!contains_word("unidades", "unidad"));
        assert!(!contains_word("uva", "u"));
    }
}
