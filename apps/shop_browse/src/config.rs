use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use catalog_core::{BrowserOptions, NavigationPolicy};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "shop_browse.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_url: String,
    pub request_timeout: Duration,
    pub navigation_policy: NavigationPolicy,
    pub cancel_superseded: bool,
    pub page_size: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: "http://127.0.0.1:5000/api".into(),
            request_timeout: Duration::from_secs(10),
            navigation_policy: NavigationPolicy::Push,
            cancel_superseded: true,
            page_size: None,
        }
    }
}

impl Settings {
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            navigation_policy: self.navigation_policy,
            cancel_superseded: self.cancel_superseded,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    catalog_url: Option<String>,
    request_timeout_ms: Option<u64>,
    navigation_policy: Option<NavigationPolicy>,
    cancel_superseded: Option<bool>,
    page_size: Option<u32>,
}

/// Defaults, then the TOML file, then environment variables. An explicitly
/// named file must exist; the default one is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if required => {
            return Err(err).with_context(|| format!("failed to read config '{}'", path.display()))
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.catalog_url {
        settings.catalog_url = v;
    }
    if let Some(v) = file.request_timeout_ms {
        settings.request_timeout = Duration::from_millis(v);
    }
    if let Some(v) = file.navigation_policy {
        settings.navigation_policy = v;
    }
    if let Some(v) = file.cancel_superseded {
        settings.cancel_superseded = v;
    }
    if file.page_size.is_some() {
        settings.page_size = file.page_size;
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("CATALOG_URL") {
        settings.catalog_url = v;
    }
    if let Some(v) = lookup("APP__CATALOG_URL") {
        settings.catalog_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_MS") {
        let ms = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_MS is not a number: '{v}'"))?;
        settings.request_timeout = Duration::from_millis(ms);
    }

    if let Some(v) = lookup("APP__NAVIGATION_POLICY") {
        let Some(policy) = NavigationPolicy::parse(&v) else {
            bail!("APP__NAVIGATION_POLICY must be 'push' or 'replace', got '{v}'");
        };
        settings.navigation_policy = policy;
    }

    if let Some(v) = lookup("APP__CANCEL_SUPERSEDED") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.cancel_superseded = parsed;
        }
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.page_size = (parsed > 0).then_some(parsed);
        }
    }

    Ok(())
}
