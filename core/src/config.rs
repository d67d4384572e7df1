use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, ExperimentResult};

/// Bounds on total nickname length and on each word piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleNicknameOptions {
    pub min_len: usize,
    pub max_len: usize,
    pub min_word_len: usize,
    pub max_word_len: usize,
}

impl Default for SampleNicknameOptions {
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 8,
            min_word_len: 3,
            max_word_len: 8,
        }
    }
}

impl SampleNicknameOptions {
    pub fn validate(&self) -> ExperimentResult<()> {
        let reason = if self.min_len == 0 {
            Some("nickname.min_len must be at least 1".to_string())
        } else if self.min_len > self.max_len {
            Some(format!(
                "nickname.min_len ({}) exceeds nickname.max_len ({})",
                self.min_len, self.max_len
            ))
        } else if self.min_word_len == 0 {
            Some("nickname.min_word_len must be at least 1".to_string())
        } else if self.min_word_len > self.max_word_len {
            Some(format!(
                "nickname.min_word_len ({}) exceeds nickname.max_word_len ({})",
                self.min_word_len, self.max_word_len
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ExperimentError::InvalidConfig { reason }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Longest word kept from the word list.
    pub max_nickname_len: usize,
    /// Unique nicknames in the population before measuring starts.
    pub initial_population: usize,
    /// Measurement trials per strategy.
    pub num_tries: u64,
    pub nickname: SampleNicknameOptions,
    /// Roughly one position in every `mangling_factor` gets replaced.
    /// Zero disables mangling.
    pub mangling_factor: f64,
    /// Emit a debug progress line every N nicknames. Zero disables.
    pub progress_interval: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            max_nickname_len: 12,
            initial_population: 10_000_000,
            num_tries: 50_000_000,
            nickname: SampleNicknameOptions::default(),
            mangling_factor: 2.7,
            progress_interval: 1_000_000,
        }
    }
}

impl ExperimentConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &str) -> ExperimentResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with small run sizes for use in tests.
    pub fn default_test() -> Self {
        Self {
            initial_population: 2_000,
            num_tries: 5_000,
            progress_interval: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ExperimentResult<()> {
        self.nickname.validate()?;
        if self.nickname.max_word_len > self.max_nickname_len {
            return Err(ExperimentError::InvalidConfig {
                reason: format!(
                    "nickname.max_word_len ({}) exceeds max_nickname_len ({})",
                    self.nickname.max_word_len, self.max_nickname_len
                ),
            });
        }
        if self.mangling_factor.is_nan() {
            return Err(ExperimentError::InvalidConfig {
                reason: "mangling_factor must be a number".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_experiment_constants() {
        let config = ExperimentConfig::default();
        assert_eq!(config.max_nickname_len, 12);
        assert_eq!(config.initial_population, 10_000_000);
        assert_eq!(config.num_tries, 50_000_000);
        assert_eq!(
            config.nickname,
            SampleNicknameOptions { min_len: 8, max_len: 8, min_word_len: 3, max_word_len: 8 }
        );
        assert!((config.mangling_factor - 2.7).abs() < 1e-12);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ExperimentConfig =
            serde_json::from_str(r#"{ "initial_population": 100, "num_tries": 10 }"#).unwrap();
        assert_eq!(config.initial_population, 100);
        assert_eq!(config.num_tries, 10);
        assert_eq!(config.max_nickname_len, 12);
        assert_eq!(config.nickname, SampleNicknameOptions::default());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut config = ExperimentConfig::default_test();
        config.nickname.min_len = 9;
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::InvalidConfig { .. })
        ));

        let mut config = ExperimentConfig::default_test();
        config.nickname.min_word_len = 0;
        assert!(config.validate().is_err());

        let mut config = ExperimentConfig::default_test();
        config.nickname.max_word_len = 13;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ExperimentConfig::load("/nonexistent/experiment.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read"), "{err}");
    }
}
