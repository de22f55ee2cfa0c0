// src/config.rs

use crate::constants::{DEFAULT_DEPTH, INFINITY, REFERENCE_PV, TT_THRESHOLD};
use crate::game::board::Board;
use crate::game::pv::{PrincipalVariation, PvError};
use crate::game::search::{SearchAlgorithm, Window};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const PROFILES_DIR: &str = "profiles";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed profile: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown algorithm selector {0} (expected 1-4)")]
    InvalidAlgorithm(u8),
    #[error(
        "search window [{alpha}, {beta}] is empty or outside [-{max}, {max}]",
        max = INFINITY
    )]
    InvalidWindow { alpha: i32, beta: i32 },
    #[error("bad principal variation: {0}")]
    Pv(#[from] PvError),
}

/// Everything one benchmark run needs. Saved and loaded as a JSON profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub algorithm: SearchAlgorithm,
    pub use_tt: bool,
    pub depth: u32,
    pub window: Window,
    pub tt_threshold: u64,
    /// Per-slot entry cap. `None` grows until allocation fails.
    pub tt_capacity: Option<usize>,
    /// Only search the last N positions of the variation.
    pub positions: Option<usize>,
    pub pv: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            algorithm: SearchAlgorithm::Negamax,
            use_tt: false,
            depth: DEFAULT_DEPTH,
            window: Window::default(),
            tt_threshold: TT_THRESHOLD,
            tt_capacity: None,
            positions: None,
            pv: REFERENCE_PV.to_string(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Window { alpha, beta } = self.window;
        if alpha >= beta || alpha < -INFINITY || beta > INFINITY {
            return Err(ConfigError::InvalidWindow { alpha, beta });
        }
        self.pv_positions()?;
        Ok(())
    }

    /// Positions along the variation, starting with the initial one.
    pub fn pv_positions(&self) -> Result<Vec<Board>, ConfigError> {
        let pv: PrincipalVariation = self.pv.parse()?;
        Ok(pv.positions()?)
    }
}

pub fn algorithm_from_selector(selector: u8) -> Result<SearchAlgorithm, ConfigError> {
    SearchAlgorithm::try_from(selector).map_err(ConfigError::InvalidAlgorithm)
}

pub fn save_profile(dir: &Path, name: &str, config: &BenchConfig) -> Result<(), ConfigError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_profile(dir: &Path, name: &str) -> Result<BenchConfig, ConfigError> {
    let path = dir.join(format!("{name}.json"));
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Names of the saved profiles, sorted. A missing directory has none.
pub fn get_profiles(dir: &Path) -> Result<Vec<String>, ConfigError> {
    let mut profiles = Vec::new();
    if !dir.is_dir() {
        return Ok(profiles);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                profiles.push(name.to_string());
            }
        }
    }
    profiles.sort();
    Ok(profiles)
}
