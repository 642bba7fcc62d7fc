use crate::config::{AppConfig, ConfigError};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates application configuration from `config.toml`,
    /// overridden by `BOT_`-prefixed environment variables (nested keys via
    /// `BOT_ENGINE__EV_THRESHOLD`-style double underscores).
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if the file can't be parsed, or
    /// [`ConfigError::Validation`] if the result fails [`AppConfig::validate`].
    pub fn load() -> Result<AppConfig, ConfigError> {
        Self::load_from("config.toml")
    }

    /// As [`Self::load`], but reading a caller-supplied path. Used by tests
    /// and by profile-specific invocations.
    ///
    /// # Errors
    /// See [`Self::load`].
    pub fn load_from(path: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("BOT_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads a base config plus a profile-specific overlay
    /// (`config.{profile}.toml`), e.g. `"demo"`.
    ///
    /// # Errors
    /// See [`Self::load`].
    pub fn load_with_profile(profile: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file(format!("config.{profile}.toml")))
            .merge(Env::prefixed("BOT_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_validates_minimal_toml() {
        let mut file = tempfile();
        writeln!(
            file,
            r#"
            [engine]
            ev_threshold = 0.03
            kelly_fraction = 0.25
            poll_interval = 2000
            min_book_count = 4
            max_slippage_pct = 0.02
            min_liquidity_contracts = 10
            auto_execute = false

            [credentials]
            exchange_key_id = "key"
            exchange_private_key_pem = "pem"
            sportsbook_api_key = "sbkey"
            "#
        )
        .unwrap();

        let config = ConfigLoader::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.engine.ev_threshold, 0.03);
        assert_eq!(config.credentials.exchange_key_id, "key");
    }

    #[test]
    fn rejects_invalid_values_at_load_time() {
        let mut file = tempfile();
        writeln!(
            file,
            r#"
            [engine]
            ev_threshold = 2.0
            kelly_fraction = 0.25
            poll_interval = 2000
            min_book_count = 4
            max_slippage_pct = 0.02
            min_liquidity_contracts = 10

            [credentials]
            exchange_key_id = "key"
            exchange_private_key_pem = "pem"
            sportsbook_api_key = "sbkey"
            "#
        )
        .unwrap();

        assert!(ConfigLoader::load_from(file.path().to_str().unwrap()).is_err());
    }

    fn tempfile() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::with_suffix(".toml").unwrap()
    }
}
