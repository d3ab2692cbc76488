//! Zeto Configuration
//!
//! Shared configuration crate for all Zeto components.
//!
//! Handles loading configuration from:
//! 1. ZT_CONFIG env var (explicit path)
//! 2. ./zeto.toml (current directory)
//! 3. ~/.zeto/zeto.toml (user home)
//!
//! Environment variables take precedence over TOML config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::{env, fs};

/// Global config instance for convenience access
pub static GLOBAL_CONFIG: OnceLock<ZetoConfig> = OnceLock::new();

const CONFIG_FILE_NAME: &str = "zeto.toml";
const CONFIG_DIR_NAME: &str = ".zeto";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_ROOT_WINDOW: usize = 100;
const DEFAULT_AUTHORITY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZetoConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub keys: KeySettings,
}

/// Protocol variant switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Nullifier-based spends with Merkle membership
    #[serde(default = "default_true")]
    pub nullifiers: bool,
    /// Bind transfers to the identity registry
    #[serde(default = "default_true")]
    pub kyc: bool,
    /// Encrypt output values for the receiver
    #[serde(default = "default_true")]
    pub encryption: bool,
    /// Use the statement-checking mock proof system instead of Groth16
    #[serde(default = "default_true")]
    pub mock_prover: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            nullifiers: true,
            kyc: true,
            encryption: true,
            mock_prover: true,
        }
    }
}

/// Ledger parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// How many recent Merkle roots remain acceptable
    #[serde(default = "default_root_window")]
    pub root_window: usize,
    /// Hex-encoded authority account (mint / registry owner)
    #[serde(default = "default_authority")]
    pub authority: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            root_window: DEFAULT_ROOT_WINDOW,
            authority: DEFAULT_AUTHORITY.to_string(),
        }
    }
}

/// Verifying-key locations for the Groth16 oracle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeySettings {
    #[serde(default)]
    pub transfer_vk: Option<PathBuf>,
    #[serde(default)]
    pub transfer_batch_vk: Option<PathBuf>,
    #[serde(default)]
    pub deposit_vk: Option<PathBuf>,
    #[serde(default)]
    pub withdraw_vk: Option<PathBuf>,
    #[serde(default)]
    pub withdraw_batch_vk: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_root_window() -> usize {
    DEFAULT_ROOT_WINDOW
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

// ============================================================================
// Loading
// ============================================================================

impl ZetoConfig {
    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => {
                log::debug!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Initialize the global instance (first call wins).
    pub fn init_global() -> Result<&'static Self> {
        if GLOBAL_CONFIG.get().is_none() {
            let config = Self::load()?;
            let _ = GLOBAL_CONFIG.set(config);
        }
        Ok(GLOBAL_CONFIG.get().expect("config initialized above"))
    }

    /// Decode the authority account from its hex form.
    pub fn authority_bytes(&self) -> Result<[u8; 32]> {
        let decoded = decode_hex(&self.ledger.authority)
            .context("ledger.authority must be 64 hex characters")?;
        Ok(decoded)
    }

    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("ZT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("ZT_CONFIG set but {} does not exist", path.display());
        }

        let cwd = PathBuf::from(CONFIG_FILE_NAME);
        if cwd.exists() {
            return Some(cwd);
        }

        let home = dirs::home_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        home.exists().then_some(home)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ZT_MOCK_PROVER") {
            self.features.mock_prover = value != "false" && value != "0";
        }
        if let Ok(value) = env::var("ZT_ROOT_WINDOW") {
            match value.parse() {
                Ok(window) => self.ledger.root_window = window,
                Err(_) => log::warn!("ignoring invalid ZT_ROOT_WINDOW: {value}"),
            }
        }
    }
}

fn decode_hex(s: &str) -> Option<[u8; 32]> {
    if s.len() != 64 {
        return None;
    }
    let mut out = [0u8; 32];
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let hi = (chunk[0] as char).to_digit(16)?;
        let lo = (chunk[1] as char).to_digit(16)?;
        out[i] = (hi * 16 + lo) as u8;
    }
    Some(out)
}
