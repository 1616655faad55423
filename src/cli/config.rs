use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::{AnalyzerConfig, PageType, PageTypeRule, RuleBasedAnalyzer, RuleError, RuleSet};
use crate::browser::BrowserConfig;
use crate::plan::{Dimension, PlanConfig, PlanRules};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "page-scaffold.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-scaffold",
    version,
    about = "Generate page objects, test plans and fixtures from a live page"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-scaffold.yaml in current dir)
    #[arg(long, global = true, env = "PAGE_SCAFFOLD_CONFIG")]
    pub config: Option<String>,
}

/// Where the page comes from: a live URL, or a capture file saved earlier.
/// With both, the URL names the captured page.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = true)]
pub struct PageSource {
    /// Page URL to open in the browser
    #[arg(long)]
    pub url: Option<String>,

    /// Capture JSON file (`{ "url", "title", "nodes": [...] }`)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Markdown,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a page and print its structural model
    Analyze {
        #[command(flatten)]
        source: PageSource,

        /// Write the model and diagnostics as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a prioritized test plan for a page
    Plan {
        #[command(flatten)]
        source: PageSource,

        /// Output directory for the plan
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        /// Plan format
        #[arg(long, value_enum, default_value_t = PlanFormat::Markdown)]
        format: PlanFormat,
    },

    /// Generate page object, tests and fixtures for a page
    Generate {
        #[command(flatten)]
        source: PageSource,

        /// Output directory for generated files
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,

        /// Only emit a page-load smoke test instead of the full plan
        #[arg(long)]
        no_plan: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// `page-scaffold.yaml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Page-type rules evaluated before the built-in table.
    #[serde(default)]
    pub rules: Vec<PageTypeRule>,
    /// Page type → dimensions, replacing the built-in list for that type.
    #[serde(default)]
    pub dimensions: BTreeMap<PageType, Vec<Dimension>>,
}

impl ScaffoldConfig {
    pub fn analyzer(&self) -> Result<RuleBasedAnalyzer, RuleError> {
        RuleBasedAnalyzer::new(self.analyzer.clone(), &self.rules)
    }

    pub fn plan_rules(&self) -> PlanRules {
        PlanRules::new(self.plan.clone(), self.dimensions.clone())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} does not exist")]
    NotFound { path: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid page-type rule in {path}: {source}")]
    InvalidRule {
        path: String,
        #[source]
        source: RuleError,
    },
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file.
///
/// A missing default file yields defaults. A missing explicit file,
/// malformed YAML or a rule that does not compile is an error.
pub fn load_config(path: Option<&str>) -> Result<ScaffoldConfig, ConfigError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);

    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if path.is_some() {
                return Err(ConfigError::NotFound {
                    path: config_path.to_string(),
                });
            }
            return Ok(ScaffoldConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: config_path.to_string(),
                source: e,
            });
        }
    };

    parse_config(&content, config_path)
}

/// Parse and validate config text; `origin` names it in errors.
pub fn parse_config(content: &str, origin: &str) -> Result<ScaffoldConfig, ConfigError> {
    // An empty document means "all defaults".
    if content.trim().is_empty() {
        return Ok(ScaffoldConfig::default());
    }

    let config: ScaffoldConfig =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            source: e,
        })?;

    RuleSet::new(&config.rules, config.analyzer.min_list_items).map_err(|e| {
        ConfigError::InvalidRule {
            path: origin.to_string(),
            source: e,
        }
    })?;

    Ok(config)
}
