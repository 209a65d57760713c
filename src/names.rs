//! Random syllabic names for unnamed characters

use rand::seq::IndexedRandom;
use rand::Rng;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];
const CONSONANTS: &[char] = &[
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'r', 's', 't', 'v', 'w', 'z',
];
const TITLES: &[&str] = &["Sir", "Lady", "Lord", "Dame", "Elder", "Captain"];

/// Chance (percent) that a generated name gets an honorific
pub const TITLE_CHANCE: u32 = 10;

/// Build a name from `min_syllables..=max_syllables` random syllables.
///
/// Each syllable is consonant-vowel (with an occasional doubled vowel) or
/// vowel-consonant. The first letter is capitalized.
pub fn syllabic_name<R: Rng + ?Sized>(rng: &mut R, min_syllables: u32, max_syllables: u32) -> String {
    let max_syllables = max_syllables.max(min_syllables).max(1);
    let count = rng.random_range(min_syllables.max(1)..=max_syllables);

    let mut name = String::new();
    for _ in 0..count {
        let (first, second) = if rng.random_bool(0.5) {
            (CONSONANTS, VOWELS)
        } else {
            (VOWELS, CONSONANTS)
        };
        name.extend(first.choose(rng));
        name.extend(second.choose(rng));
        if first == CONSONANTS && rng.random_range(0..100) < 20 {
            name.extend(VOWELS.choose(rng));
        }
    }

    let mut chars = name.chars();
    let mut name: String = match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if rng.random_range(0..100) < TITLE_CHANCE {
        if let Some(title) = TITLES.choose(rng) {
            name = format!("{} {}", title, name);
        }
    }
    name
}

/// Name used for characters created without one
pub fn character_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    syllabic_name(rng, 2, 3)
}
