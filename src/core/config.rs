use crate::core::repayment::{CalculatorLimits, Frequency, RepaymentInputs};
use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CaravanModel {
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
}

/// Starting values used when a quote leaves a field out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct QuoteDefaults {
    pub term_years: u32,
    pub annual_rate_percent: f64,
    pub frequency: Frequency,
    pub deposit_percent: f64,
}

impl QuoteDefaults {
    /// A quote for `price` using only the defaults.
    pub fn sample_inputs(&self, price: f64) -> RepaymentInputs {
        RepaymentInputs {
            price,
            deposit: price * self.deposit_percent / 100.0,
            term_years: self.term_years,
            annual_rate_percent: self.annual_rate_percent,
            frequency: self.frequency,
        }
    }
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        QuoteDefaults {
            term_years: 5,
            annual_rate_percent: 7.5,
            frequency: Frequency::Weekly,
            deposit_percent: 20.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub calculator: CalculatorLimits,
    #[serde(default)]
    pub defaults: QuoteDefaults,
    #[serde(default)]
    pub models: Vec<CaravanModel>,
    pub data_path: Option<String>,
}

fn default_currency() -> String {
    "AUD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            calculator: CalculatorLimits::default(),
            defaults: QuoteDefaults::default(),
            models: Vec::new(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("au", "caravan", "caravan-finance")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("au", "caravan", "caravan-finance")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.check()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Looks up a catalogue model by name, ignoring case.
    pub fn find_model(&self, name: &str) -> Option<&CaravanModel> {
        self.models
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }

    fn check(&self) -> Result<()> {
        let limits = &self.calculator;
        if limits.min_term_years > limits.max_term_years {
            bail!(
                "calculator.min_term_years ({}) is above calculator.max_term_years ({})",
                limits.min_term_years,
                limits.max_term_years
            );
        }
        if limits.min_rate_percent > limits.max_rate_percent {
            bail!(
                "calculator.min_rate_percent ({}) is above calculator.max_rate_percent ({})",
                limits.min_rate_percent,
                limits.max_rate_percent
            );
        }
        if !(0.0..=1.0).contains(&limits.max_deposit_ratio) {
            bail!(
                "calculator.max_deposit_ratio must be between 0 and 1, got {}",
                limits.max_deposit_ratio
            );
        }
        if let Some(model) = self.models.iter().find(|m| m.price <= 0.0) {
            bail!("Model '{}' must have a positive price", model.name);
        }
        self.defaults
            .sample_inputs(100_000.0)
            .validate(limits)
            .map_err(|e| anyhow!("Quote defaults fall outside the calculator limits: {e}"))
    }
}
