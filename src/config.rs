use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

use crate::dispatch::emailjs::DEFAULT_ENDPOINT;
use crate::dispatch::DispatchCredentials;

/// Main configuration structure for the quote wizard
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuoteWizardConfig {
    /// Dispatch provider settings
    pub dispatch: DispatchConfig,
    /// Wizard behaviour
    pub wizard: WizardConfig,
    /// Numeric counter animation
    pub counter: CounterConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Provider service id (can be set via env var)
    pub service_id: Option<String>,
    /// Provider template id
    pub template_id: Option<String>,
    /// Provider public key
    pub public_key: Option<String>,
    /// REST endpoint of the provider
    pub endpoint: String,
    /// Request timeout
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Delay between a successful submission and the automatic reset/close
    pub auto_close_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CounterConfig {
    /// Length of a counter animation
    pub duration_ms: u64,
    /// Interval between rendered frames
    pub frame_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level or EnvFilter directive
    pub log_level: String,
    /// Emit JSON lines instead of human readable output
    pub json_logs: bool,
}

impl Default for QuoteWizardConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig {
                service_id: None, // Will be read from env var or quote-wizard.toml
                template_id: None,
                public_key: None,
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout_seconds: 15,
            },
            wizard: WizardConfig {
                auto_close_delay_ms: 3000,
            },
            counter: CounterConfig {
                duration_ms: 2000,
                frame_interval_ms: 16,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl DispatchConfig {
    /// Credentials handed to the submission client. Missing values become
    /// empty strings and are reported as misconfiguration at submit time.
    pub fn credentials(&self) -> DispatchCredentials {
        DispatchCredentials {
            service_id: self.service_id.clone().unwrap_or_default(),
            template_id: self.template_id.clone().unwrap_or_default(),
            public_key: self.public_key.clone().unwrap_or_default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl WizardConfig {
    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }
}

impl CounterConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl QuoteWizardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (quote-wizard.toml, .quote-wizard-rc)
    /// 3. Environment variables (prefixed with QUOTE_WIZARD__)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`QuoteWizardConfig::load`] with files looked up in `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&QuoteWizardConfig::default())?);

        let toml_path = dir.join("quote-wizard.toml");
        if toml_path.exists() {
            builder = builder.add_source(File::from(toml_path));
        }

        let rc_path = dir.join(".quote-wizard-rc");
        if rc_path.exists() {
            builder = builder.add_source(File::from(rc_path).format(FileFormat::Toml));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("QUOTE_WIZARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut quote_config: QuoteWizardConfig = config.try_deserialize()?;

        // Credentials commonly live under the provider's own variable names
        let fallbacks = [
            (&mut quote_config.dispatch.service_id, "EMAILJS_SERVICE_ID"),
            (&mut quote_config.dispatch.template_id, "EMAILJS_TEMPLATE_ID"),
            (&mut quote_config.dispatch.public_key, "EMAILJS_PUBLIC_KEY"),
        ];
        for (slot, var) in fallbacks {
            if slot.is_none() {
                if let Ok(value) = std::env::var(var) {
                    *slot = Some(value);
                }
            }
        }

        Ok(quote_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load an env file at `path`; a missing file is not an error
    pub fn load_env_file_from(path: &Path) -> Result<()> {
        if path.exists() {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            tracing::info!(path = %path.display(), "Loaded environment variables from env file");
        }
        Ok(())
    }
}

/// Error from reading `.env`, kept so it can be reported once logging is up
static ENV_FILE_ERROR: OnceLock<String> = OnceLock::new();

/// Global configuration instance
static CONFIG: LazyLock<Result<QuoteWizardConfig, anyhow::Error>> = LazyLock::new(|| {
    // Load .env file first
    if let Err(e) = QuoteWizardConfig::load_env_file() {
        tracing::warn!(error = %e, "Ignoring unreadable .env file");
        let _ = ENV_FILE_ERROR.set(e.to_string());
    }
    QuoteWizardConfig::load()
});

/// Get the global configuration
pub fn config() -> Result<&'static QuoteWizardConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    if let Some(error) = ENV_FILE_ERROR.get() {
        tracing::warn!(error = %error, "Environment file was not applied");
    }
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
