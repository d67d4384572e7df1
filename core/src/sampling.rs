//! Character and ordering draws shared by the nickname generator.

use crate::rng::UniformSource;

const NUM_DIGITS: usize = 10;
const NUM_LETTERS: usize = 26;

/// Uniform over `0-9`, `A-Z`, `a-z`.
pub fn sample_ascii<R: UniformSource>(rng: &mut R) -> u8 {
    let mut ch = rng.uniform_inclusive(0, NUM_DIGITS + 2 * NUM_LETTERS - 1);
    if ch < NUM_DIGITS {
        return b'0' + ch as u8;
    }
    ch -= NUM_DIGITS;
    if ch < NUM_LETTERS {
        b'A' + ch as u8
    } else {
        b'a' + (ch - NUM_LETTERS) as u8
    }
}

/// Uniform over `a-z`.
pub fn sample_ascii_lower<R: UniformSource>(rng: &mut R) -> u8 {
    b'a' + rng.uniform_inclusive(0, NUM_LETTERS - 1) as u8
}

/// Fisher-Yates shuffle driven by the caller's source.
pub fn shuffle<T, R: UniformSource>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.uniform_inclusive(0, i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Engine, EngineWidth};
    use std::collections::HashSet;

    #[test]
    fn ascii_covers_digits_and_both_cases() {
        let mut rng = Engine::seeded(EngineWidth::Bits64, 3);
        let seen: HashSet<u8> = (0..20_000).map(|_| sample_ascii(&mut rng)).collect();
        assert_eq!(seen.len(), 62, "every alphanumeric should appear");
        assert!(seen.iter().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn ascii_lower_is_only_lowercase_letters() {
        let mut rng = Engine::seeded(EngineWidth::Bits32, 3);
        let seen: HashSet<u8> = (0..5_000).map(|_| sample_ascii_lower(&mut rng)).collect();
        assert_eq!(seen.len(), 26);
        assert!(seen.iter().all(|b| b.is_ascii_lowercase()));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Engine::seeded(EngineWidth::Bits64, 11);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted, "50 items should not come back in order");
    }

    #[test]
    fn shuffle_moves_first_item_everywhere() {
        let mut rng = Engine::seeded(EngineWidth::Bits32, 5);
        let mut positions = [0u32; 3];
        for _ in 0..3_000 {
            let mut items = ['a', 'b', 'c'];
            shuffle(&mut items, &mut rng);
            let pos = items.iter().position(|&c| c == 'a').unwrap();
            positions[pos] += 1;
        }
        for count in positions {
            assert!((800..=1200).contains(&count), "positions {positions:?}");
        }
    }
}
