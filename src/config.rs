use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{TrainerError, TrainerResult};
use crate::profile::Profile;
use crate::sampler::Difficulty;
use crate::spots::Format;
use crate::tables::{is_covered_depth, STACK_DEPTHS};

pub const DATA_DIR_ENV: &str = "SPINGO_DATA_DIR";

/// `$HOME/.spingo`, or `./.spingo` when HOME is unset.
pub fn spingo_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".spingo")
}

/// User settings, read from `$HOME/.spingo/config.json` when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainerConfig {
    pub format: Format,
    #[serde(deserialize_with = "lenient_profile")]
    pub profile: Profile,
    pub effective_bb: u32,
    #[serde(deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    pub data_dir: Option<PathBuf>,
    pub stats_path: Option<PathBuf>,
}

// Unknown names fall back instead of failing the whole file.
fn lenient_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Profile, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(Profile::normalize(&name))
}

fn lenient_difficulty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Difficulty, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(name.parse().unwrap_or_default())
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            format: Format::ThreeWay,
            profile: Profile::Gto,
            effective_bb: STACK_DEPTHS[0],
            difficulty: Difficulty::Medium,
            data_dir: None,
            stats_path: None,
        }
    }
}

impl TrainerConfig {
    pub fn default_path() -> PathBuf {
        spingo_home().join("config.json")
    }

    pub fn from_json(json: &str) -> TrainerResult<TrainerConfig> {
        let config: TrainerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file; a missing file means defaults.
    pub fn load(path: &Path) -> TrainerResult<TrainerConfig> {
        if !path.is_file() {
            return Ok(TrainerConfig::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config = TrainerConfig::from_json(&json)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> TrainerResult<()> {
        if !is_covered_depth(self.effective_bb) {
            return Err(TrainerError::InvalidValue(format!(
                "effectiveBb must be one of {:?}, got {}",
                STACK_DEPTHS, self.effective_bb
            )));
        }
        Ok(())
    }

    /// Flag, then `SPINGO_DATA_DIR`, then config file, then `~/.spingo/data`.
    pub fn resolve_data_dir(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        self.data_dir
            .clone()
            .unwrap_or_else(|| spingo_home().join("data"))
    }

    pub fn resolve_stats_path(&self) -> PathBuf {
        self.stats_path
            .clone()
            .unwrap_or_else(|| spingo_home().join("stats.json"))
    }
}
