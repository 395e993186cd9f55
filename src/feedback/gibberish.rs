//! Gibberish Classifier
//!
//! Heuristic gate for low-quality review text. Reviews flagged here skip
//! generation entirely and get fixed fallback text instead.
//!
//! Checks run in a fixed order and the first hit wins. The thresholds are
//! calibrated values; changing the order or a constant changes verdicts.

use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Normalized text shorter than this is gibberish
const MIN_LENGTH: usize = 3;

/// A run of this many identical characters is gibberish
const MAX_REPEAT_RUN: usize = 5;

/// Vowel share of letters must fall inside [MIN, MAX]
const MIN_VOWEL_RATIO: f64 = 0.10;
const MAX_VOWEL_RATIO: f64 = 0.90;

/// Keyboard patterns only count for text shorter than this
const KEYBOARD_MASH_MAX_LENGTH: usize = 20;

/// Share of `[a-z]` characters below which text is gibberish
const MIN_ALPHA_RATIO: f64 = 0.30;

const VOWELS: &str = "aeiou";
const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";

/// Adjacent-key runs typical of keyboard mashing
static KEYBOARD_MASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)asdf|qwer|zxcv|hjkl|dfgh|cvbn|tyui|fghj").unwrap());

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Which check flagged the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GibberishReason {
    TooShort,
    RepeatedCharacter,
    VowelRatio,
    KeyboardMash,
    LowAlphaDensity,
}

/// True when the review should bypass generation
pub fn is_gibberish(text: &str) -> bool {
    classify(text).is_some()
}

/// Run every check in order, returning the first that fires
pub fn classify(text: &str) -> Option<GibberishReason> {
    let normalized = text.trim().to_lowercase();
    let length = normalized.chars().count();

    if length < MIN_LENGTH {
        return Some(GibberishReason::TooShort);
    }

    if longest_run(&normalized) >= MAX_REPEAT_RUN {
        return Some(GibberishReason::RepeatedCharacter);
    }

    // No Latin letters at all: nothing to measure, the density check decides.
    if let Some(ratio) = vowel_ratio(&normalized) {
        if !(MIN_VOWEL_RATIO..=MAX_VOWEL_RATIO).contains(&ratio) {
            return Some(GibberishReason::VowelRatio);
        }
    }

    if KEYBOARD_MASH_RE.is_match(text) && length < KEYBOARD_MASH_MAX_LENGTH {
        return Some(GibberishReason::KeyboardMash);
    }

    let alpha = normalized.chars().filter(|c| c.is_ascii_lowercase()).count();
    if (alpha as f64) / (length as f64) < MIN_ALPHA_RATIO {
        return Some(GibberishReason::LowAlphaDensity);
    }

    None
}

/// Length of the longest run of one repeated character
fn longest_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;

    for c in text.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }

    longest
}

/// vowels / (vowels + consonants), or `None` when there are neither
fn vowel_ratio(text: &str) -> Option<f64> {
    let (vowels, consonants) = text.chars().fold((0usize, 0usize), |(v, c), ch| {
        if VOWELS.contains(ch) {
            (v + 1, c)
        } else if CONSONANTS.contains(ch) {
            (v, c + 1)
        } else {
            (v, c)
        }
    });

    let letters = vowels + consonants;
    (letters > 0).then(|| vowels as f64 / letters as f64)
}
