use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealthTrackSettings {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub registration: RegistrationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub login_path: String,
    pub register_path: String,
    /// Per-request timeout in seconds. If 0, requests may wait forever.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// File holding the session cache
    pub store_path: String,
}

/// Which backend receives signup drafts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationBackendKind {
    #[default]
    Simulated,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    pub backend: RegistrationBackendKind,
    /// Delay applied by the simulated backend
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            login_path: "/api/auth/login".to_string(),
            register_path: "/api/auth/register".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store_path: "healthtrack-session.json".to_string(),
        }
    }
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            backend: RegistrationBackendKind::Simulated,
            simulated_delay_ms: 1500,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HealthTrackSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file(std::path::Path::new(".env"));

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        if settings.logger_builder().try_init().is_err() {
            log::debug!("Logger already initialized");
        }

        Ok(settings)
    }

    /// Logger configured from `logging.level`; `RUST_LOG` still wins when set
    #[must_use]
    pub fn logger_builder(&self) -> env_logger::Builder {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.logging.level.as_str()),
        )
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `HEALTHTRACK_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_toml_file(&default_config_path)?;
            log::info!(
                "Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(config_dir) = std::env::var("HEALTHTRACK_CONFIG_DIR") {
            let config_path = std::path::Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                settings = Self::from_toml_file(&config_path)?;
                log::info!("Overriding settings from {}", config_path.display());
            } else {
                log::info!(
                    "HEALTHTRACK_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a TOML settings file; missing sections fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_api_env_overrides(&mut settings.api);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_registration_env_overrides(&mut settings.registration);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_api_env_overrides(api_settings: &mut ApiSettings) {
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            api_settings.base_url = base_url;
        }
        if let Ok(login_path) = std::env::var("API_LOGIN_PATH") {
            api_settings.login_path = login_path;
        }
        if let Ok(register_path) = std::env::var("API_REGISTER_PATH") {
            api_settings.register_path = register_path;
        }
        Self::apply_numeric_env_override(
            "API_REQUEST_TIMEOUT_SECS",
            &mut api_settings.request_timeout_secs,
        );
    }

    fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(store_path) = std::env::var("SESSION_STORE_PATH") {
            session_settings.store_path = store_path;
        }
    }

    fn apply_registration_env_overrides(registration_settings: &mut RegistrationSettings) {
        if let Ok(backend) = std::env::var("REGISTRATION_BACKEND") {
            match backend.to_lowercase().as_str() {
                "simulated" => registration_settings.backend = RegistrationBackendKind::Simulated,
                "http" => registration_settings.backend = RegistrationBackendKind::Http,
                other => log::warn!("Ignoring unknown REGISTRATION_BACKEND value: {other}"),
            }
        }
        Self::apply_numeric_env_override(
            "REGISTRATION_DELAY_MS",
            &mut registration_settings.simulated_delay_ms,
        );
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Load `KEY=value` lines from a dotenv file
    ///
    /// Blank lines and `#` comments are skipped. Variables already present in the
    /// process environment are left untouched.
    fn load_env_file(path: &std::path::Path) {
        let Ok(contents) = fs::read_to_string(path) else {
            return;
        };
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() || std::env::var_os(key).is_some() {
                continue;
            }
            std::env::set_var(key, value.trim());
        }
    }

    /// Full URL of the login endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL and path do not form a valid URL.
    pub fn login_url(&self) -> Result<Url, url::ParseError> {
        Self::endpoint_url(&self.api.base_url, &self.api.login_path)
    }

    /// Full URL of the registration endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL and path do not form a valid URL.
    pub fn register_url(&self) -> Result<Url, url::ParseError> {
        Self::endpoint_url(&self.api.base_url, &self.api.register_path)
    }

    fn endpoint_url(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    /// Request timeout, `None` when disabled
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.api.request_timeout_secs > 0)
            .then(|| Duration::from_secs(self.api.request_timeout_secs))
    }

    /// Delay applied by the simulated registration backend
    #[must_use]
    pub fn simulated_registration_delay(&self) -> Duration {
        Duration::from_millis(self.registration.simulated_delay_ms)
    }
}
