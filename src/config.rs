use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{MatchPolicy, DEFAULT_AMOUNT_FALLOFF};
use crate::models::{RiskCredit, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_amount_falloff")]
    pub amount_falloff: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            amount_falloff: default_amount_falloff(),
        }
    }
}

fn default_min_score() -> u8 { 40 }
fn default_limit() -> u16 { 20 }
fn default_max_limit() -> usize { 100 }
fn default_amount_falloff() -> f64 { DEFAULT_AMOUNT_FALLOFF }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub risk: RiskCreditConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_amount_weight")]
    pub amount: f64,
    #[serde(default = "default_industry_weight")]
    pub industry: f64,
    #[serde(default = "default_stage_weight")]
    pub stage: f64,
    #[serde(default = "default_risk_weight")]
    pub risk: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            amount: default_amount_weight(),
            industry: default_industry_weight(),
            stage: default_stage_weight(),
            risk: default_risk_weight(),
        }
    }
}

fn default_amount_weight() -> f64 { 0.35 }
fn default_industry_weight() -> f64 { 0.30 }
fn default_stage_weight() -> f64 { 0.20 }
fn default_risk_weight() -> f64 { 0.15 }

#[derive(Debug, Clone, Deserialize)]
pub struct RiskCreditConfig {
    #[serde(default = "default_exact_credit")]
    pub exact: u8,
    #[serde(default = "default_adjacent_credit")]
    pub adjacent: u8,
    #[serde(default = "default_opposite_credit")]
    pub opposite: u8,
}

impl Default for RiskCreditConfig {
    fn default() -> Self {
        Self {
            exact: default_exact_credit(),
            adjacent: default_adjacent_credit(),
            opposite: default_opposite_credit(),
        }
    }
}

fn default_exact_credit() -> u8 { 100 }
fn default_adjacent_credit() -> u8 { 50 }
fn default_opposite_credit() -> u8 { 0 }

/// Where the worker pulls its snapshot from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    #[default]
    File,
    Appwrite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    #[serde(default)]
    pub source: FeedKind,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub publish_matches: bool,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            source: FeedKind::default(),
            snapshot_path: default_snapshot_path(),
            appwrite: None,
            collection: CollectionSettings::default(),
            page_size: default_page_size(),
            publish_matches: false,
        }
    }
}

fn default_snapshot_path() -> String { "data/snapshot.json".to_string() }
fn default_page_size() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_profiles_collection")]
    pub user_profiles: String,
    #[serde(default = "default_ideas_collection")]
    pub business_ideas: String,
    #[serde(default = "default_offers_collection")]
    pub investment_offers: String,
    #[serde(default = "default_matches_collection")]
    pub matches: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            user_profiles: default_profiles_collection(),
            business_ideas: default_ideas_collection(),
            investment_offers: default_offers_collection(),
            matches: default_matches_collection(),
        }
    }
}

fn default_profiles_collection() -> String { "user_profiles".to_string() }
fn default_ideas_collection() -> String { "business_ideas".to_string() }
fn default_offers_collection() -> String { "investment_offers".to_string() }
fn default_matches_collection() -> String { "matches".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Run a single refresh and exit
    #[serde(default)]
    pub run_once: bool,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            run_once: false,
        }
    }
}

fn default_interval_secs() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FUNDMATCH__)
    /// 5. Appwrite credentials from APPWRITE_* variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FUNDMATCH__MATCHING__MIN_SCORE -> matching.min_score
            .add_source(
                Environment::with_prefix("FUNDMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FUNDMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Matching policy described by these settings
    pub fn policy(&self) -> MatchPolicy {
        let weights = &self.scoring.weights;
        let risk = &self.scoring.risk;

        MatchPolicy {
            weights: ScoringWeights {
                amount: weights.amount,
                industry: weights.industry,
                stage: weights.stage,
                risk: weights.risk,
            },
            risk_credit: RiskCredit {
                exact: risk.exact,
                adjacent: risk.adjacent,
                opposite: risk.opposite,
            },
            amount_falloff: self.matching.amount_falloff,
            min_score: self.matching.min_score,
            max_limit: self.matching.max_limit,
        }
    }
}

/// Apply Appwrite credentials from conventional environment variables
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("APPWRITE_ENDPOINT", "feed.appwrite.endpoint"),
        ("APPWRITE_API_KEY", "feed.appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "feed.appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "feed.appwrite.database_id"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
