//! Randomized nickname generation from a word catalog.
//!
//! A nickname is a shuffled run of pieces. Each piece is either a
//! catalog word with some characters "mangled" and its first letter
//! capitalized, or, when the remaining length is too short for any
//! word, a short run of random characters.

use crate::config::{ExperimentConfig, SampleNicknameOptions};
use crate::error::{ExperimentError, ExperimentResult};
use crate::rng::UniformSource;
use crate::sampling::{sample_ascii, sample_ascii_lower, shuffle};
use crate::word_catalog::WordCatalog;

/// Pick one word with length in `[min_len, max_len]`.
///
/// Every candidate word in the range is equally likely, so a length
/// with more words is picked proportionally more often.
pub fn sample_word<'c, R: UniformSource>(
    rng: &mut R,
    catalog: &'c WordCatalog,
    min_len: usize,
    max_len: usize,
) -> ExperimentResult<&'c str> {
    let lo = min_len.max(1);
    let hi = max_len.min(catalog.max_len());
    let num_candidates: usize = (lo..=hi).map(|len| catalog.bucket(len).len()).sum();
    if num_candidates == 0 {
        log::error!("there are no words to sample with length in [{min_len}, {max_len}]");
        return Err(ExperimentError::SamplingExhausted { min_len, max_len });
    }

    let mut idx = rng.uniform_inclusive(0, num_candidates - 1);
    for len in lo..=hi {
        let bucket = catalog.bucket(len);
        if idx < bucket.len() {
            return Ok(&bucket[idx]);
        }
        idx -= bucket.len();
    }
    unreachable!("index {idx} past {num_candidates} candidates")
}

/// Number of positions `mangle_word` replaces in a word of `len` chars.
pub fn mangling_magnitude(len: usize, mangling_factor: f64) -> usize {
    if !(mangling_factor.is_finite() && mangling_factor > 0.0) {
        return 0;
    }
    ((len as f64 / mangling_factor).round() as usize).min(len)
}

/// Copy `word` and overwrite `round(len / factor)` distinct positions.
///
/// Position 0 only ever receives a lowercase letter; later positions
/// receive a lowercased alphanumeric.
pub fn mangle_word<R: UniformSource>(rng: &mut R, word: &str, mangling_factor: f64) -> String {
    let mut piece = word.as_bytes().to_vec();
    let mut untouched: Vec<usize> = (0..piece.len()).collect();
    for _ in 0..mangling_magnitude(piece.len(), mangling_factor) {
        let pick = rng.uniform_inclusive(0, untouched.len() - 1);
        let idx = untouched.swap_remove(pick);
        piece[idx] = if idx == 0 {
            sample_ascii_lower(rng)
        } else {
            sample_ascii(rng).to_ascii_lowercase()
        };
    }
    piece.into_iter().map(char::from).collect()
}

/// Composes nicknames from one catalog under fixed options.
#[derive(Debug, Clone, Copy)]
pub struct NicknameGenerator<'c> {
    catalog: &'c WordCatalog,
    options: SampleNicknameOptions,
    mangling_factor: f64,
}

impl<'c> NicknameGenerator<'c> {
    /// Fails with `InvalidConfig` when the length bounds are inconsistent.
    pub fn new(
        catalog: &'c WordCatalog,
        options: SampleNicknameOptions,
        mangling_factor: f64,
    ) -> ExperimentResult<Self> {
        options.validate()?;
        Ok(Self {
            catalog,
            options,
            mangling_factor,
        })
    }

    pub fn from_config(catalog: &'c WordCatalog, config: &ExperimentConfig) -> ExperimentResult<Self> {
        config.validate()?;
        Self::new(catalog, config.nickname, config.mangling_factor)
    }

    pub fn options(&self) -> &SampleNicknameOptions {
        &self.options
    }

    /// Generate one nickname. Its length is drawn from
    /// `[min_len, max_len]` and the pieces always fill it exactly.
    pub fn generate<R: UniformSource>(&self, rng: &mut R) -> ExperimentResult<String> {
        let opt = &self.options;
        let mut pieces: Vec<String> = Vec::new();
        let mut budget = rng.uniform_inclusive(opt.min_len, opt.max_len);
        while budget > 0 {
            if budget < opt.min_word_len {
                pieces.push(self.fallback_piece(rng, budget));
                budget = 0;
            } else {
                let word = sample_word(
                    rng,
                    self.catalog,
                    opt.min_word_len,
                    opt.max_word_len.min(budget),
                )?;
                let mut piece = mangle_word(rng, word, self.mangling_factor);
                budget -= piece.len();
                piece[..1].make_ascii_uppercase();
                pieces.push(piece);
            }
        }

        shuffle(&mut pieces, rng);
        Ok(pieces.concat())
    }

    /// A lowercase letter followed by `len - 1` alphanumerics.
    fn fallback_piece<R: UniformSource>(&self, rng: &mut R, len: usize) -> String {
        let mut piece = String::with_capacity(len);
        piece.push(sample_ascii_lower(rng) as char);
        for _ in 1..len {
            piece.push(sample_ascii(rng) as char);
        }
        piece
    }
}
