use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "cadastro.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub postal_lookup_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".into(),
            postal_lookup_base_url: "https://viacep.com.br/ws".into(),
            request_timeout_secs: 10,
        }
    }
}

/// Keys accepted in `cadastro.toml`; anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    postal_lookup_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Command-line values, applied last.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub cep_url: Option<String>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_file(&mut self, raw: &str, origin: &Path) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)
            .with_context(|| format!("invalid config file '{}'", origin.display()))?;
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.postal_lookup_base_url {
            self.postal_lookup_base_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    /// Later names win, so the `APP__*` spelling beats the short one.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        for key in ["CADASTRO_API_URL", "APP__API_BASE_URL"] {
            if let Some(v) = var(key) {
                self.api_base_url = v;
            }
        }
        for key in ["CADASTRO_CEP_URL", "APP__POSTAL_LOOKUP_BASE_URL"] {
            if let Some(v) = var(key) {
                self.postal_lookup_base_url = v;
            }
        }
        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(v) = &cli.api_url {
            self.api_base_url = v.clone();
        }
        if let Some(v) = &cli.cep_url {
            self.postal_lookup_base_url = v.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_url("postal_lookup_base_url", &self.postal_lookup_base_url)?;
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

fn validate_url(name: &str, raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw).with_context(|| format!("{name} is not a valid url: '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{name} must use http or https: '{raw}'");
    }
    Ok(())
}

pub fn load_settings(cli: &CliOverrides) -> anyhow::Result<Settings> {
    load_settings_with(cli, |key| std::env::var(key).ok())
}

fn load_settings_with(
    cli: &CliOverrides,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    // An explicitly named file must exist; the default one is optional.
    let (path, required) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => settings.apply_file(&raw, &path)?,
        Err(err) if required || err.kind() != std::io::ErrorKind::NotFound => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(var)?;
    settings.apply_cli(cli);
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
