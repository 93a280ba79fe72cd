//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical prepaid token denominations, ascending.
pub const DEFAULT_DENOMINATIONS: [u64; 6] = [20_000, 50_000, 100_000, 200_000, 500_000, 1_000_000];

/// Relative distance, in percent, within which an amount snaps to a denomination.
pub const DEFAULT_SNAP_TOLERANCE_PERCENT: u64 = 16;

/// Main configuration for the struk pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrukConfig {
    /// Rule-based extraction configuration.
    pub extraction: ExtractionConfig,

    /// AI parser configuration.
    pub ai: AiConfig,

    /// Print layout configuration.
    pub print: PrintConfig,
}

/// Rule-based extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Valid token face values, ascending.
    pub denominations: Vec<u64>,

    /// Snap tolerance as an integer percent of the denomination.
    pub snap_tolerance_percent: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            denominations: DEFAULT_DENOMINATIONS.to_vec(),
            snap_tolerance_percent: DEFAULT_SNAP_TOLERANCE_PERCENT,
        }
    }
}

/// AI parser configuration (token receipts only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Try the AI parser before the rules.
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,

    /// Model name sent with each request.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Send the receipt image instead of the OCR text when one is available.
    pub use_vision: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "STRUK_AI_KEY".to_string(),
            timeout_secs: 30,
            use_vision: false,
        }
    }
}

/// Print layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Name printed at the top of every receipt.
    pub store_name: String,

    /// Characters per printed line (32 for 58mm paper).
    pub line_width: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            store_name: "STRUK".to_string(),
            line_width: 32,
        }
    }
}

impl StrukConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StrukConfig =
            serde_json::from_str(r#"{"ai": {"enabled": true}}"#).unwrap();

        assert!(config.ai.enabled);
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.extraction.denominations, DEFAULT_DENOMINATIONS.to_vec());
        assert_eq!(config.print.line_width, 32);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StrukConfig::default();
        config.print.store_name = "LOKET MAJU".to_string();
        config.save(&path).unwrap();

        let loaded = StrukConfig::from_file(&path).unwrap();
        assert_eq!(loaded.print.store_name, "LOKET MAJU");
    }
}
