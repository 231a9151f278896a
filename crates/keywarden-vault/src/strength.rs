// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength scoring.
//!
//! The point scale is part of the stored format: strength buckets persisted
//! by earlier versions must classify identically, so the rules below are
//! frozen. Pure and total -- any string input, including empty, scores.

use keywarden_core::Strength;

/// Score a candidate password into one of four buckets.
///
/// Points: +1 each at lengths 8/12/16, +1 each for containing a lowercase
/// letter, an uppercase letter, a digit, and a symbol (any non-alphanumeric).
/// Total 0-7 maps to weak (0-3), medium (4-5), strong (6), very-strong (7).
pub fn score(password: &str) -> Strength {
    let mut points = 0u8;

    let length = password.chars().count();
    if length >= 8 {
        points += 1;
    }
    if length >= 12 {
        points += 1;
    }
    if length >= 16 {
        points += 1;
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        points += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        points += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        points += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        points += 1;
    }

    match points {
        0..=3 => Strength::Weak,
        4..=5 => Strength::Medium,
        6 => Strength::Strong,
        _ => Strength::VeryStrong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_weak() {
        assert_eq!(score(""), Strength::Weak);
    }

    #[test]
    fn short_single_class_is_weak() {
        assert_eq!(score("abc"), Strength::Weak);
        assert_eq!(score("1234567"), Strength::Weak);
    }

    #[test]
    fn length_thresholds_award_points_at_8_12_16() {
        // Lowercase only: 1 class point plus length points.
        assert_eq!(score("abcdefg"), Strength::Weak); // 1 point
        assert_eq!(score("abcdefgh"), Strength::Weak); // 2 points
        assert_eq!(score("abcdefghijkl"), Strength::Weak); // 3 points
        assert_eq!(score("abcdefghijklmnop"), Strength::Medium); // 4 points
    }

    #[test]
    fn all_classes_at_short_length_is_medium() {
        // 7 chars, four classes: 0 + 4 = 4 points.
        assert_eq!(score("aB3!cde"), Strength::Medium);
        // 11 chars, four classes: 1 + 4 = 5 points.
        assert_eq!(score("Tr0ub4dor&3"), Strength::Medium);
    }

    #[test]
    fn twelve_chars_all_classes_is_strong() {
        // 12 chars, four classes: 2 + 4 = 6 points.
        assert_eq!(score("Tr0ub4dor&3x"), Strength::Strong);
    }

    #[test]
    fn sixteen_chars_all_classes_is_very_strong() {
        // 16 chars, four classes: 3 + 4 = 7 points.
        assert_eq!(score("Ab3!Ab3!Ab3!Ab3!"), Strength::VeryStrong);
    }

    #[test]
    fn adding_a_new_class_never_decreases_strength() {
        let base = "abcdefghijkl";
        let mut current = base.to_string();
        let mut previous = score(&current);
        for extension in ["A", "9", "!"] {
            current.push_str(extension);
            let next = score(&current);
            assert!(next >= previous, "{current:?} regressed to {next:?}");
            previous = next;
        }
    }

    #[test]
    fn unicode_symbols_count_as_special_characters() {
        // Non-ASCII characters fall into the symbol class.
        assert_eq!(score("pässwörd12AB"), Strength::Strong);
    }

    #[test]
    fn scoring_is_idempotent() {
        let sample = "N0t-Quite-Random";
        assert_eq!(score(sample), score(sample));
    }
}
