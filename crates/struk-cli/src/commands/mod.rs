//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use struk_core::models::config::StrukConfig;
use struk_core::{Orchestrator, ReceiptMode};

use crate::ai::HttpAiParser;

/// Receipt family selected on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Prepaid electricity token purchase
    Token,
    /// Bill or payment receipt
    Payment,
}

impl From<ModeArg> for ReceiptMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Token => ReceiptMode::Token,
            ModeArg::Payment => ReceiptMode::Payment,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("struk")
        .join("config.json")
}

/// Config file in use: the `--config` path if given, else the default one.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the explicit config file, or the default one when it exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<StrukConfig> {
    if let Some(path) = explicit {
        return Ok(StrukConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        Ok(StrukConfig::from_file(&path)?)
    } else {
        Ok(StrukConfig::default())
    }
}

/// Build the orchestrator, attaching the HTTP AI parser when enabled.
pub fn build_orchestrator(config: &StrukConfig) -> anyhow::Result<Orchestrator> {
    let orchestrator = Orchestrator::from_config(&config.extraction);

    match HttpAiParser::from_config(&config.ai)? {
        Some(parser) => Ok(orchestrator
            .with_ai(Box::new(parser))
            .with_vision(config.ai.use_vision)),
        None => Ok(orchestrator),
    }
}
