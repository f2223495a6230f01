#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    Greeting,
    LoadingText,
    Username,
    WorkerURL,
}

impl ConfigKey {
    /// Keys that are only ever set from the command line.
    fn is_cli_only(&self) -> bool {
        return *self == ConfigKey::ConfigFile;
    }

    /// Keys that can only come from defaults or the config file. The worker
    /// endpoint is deliberately not exposed as a flag or environment variable.
    fn is_file_only(&self) -> bool {
        return *self == ConfigKey::WorkerURL;
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigKey::ConfigFile => return "Path to the config file.",
            ConfigKey::Greeting => return "First assistant message shown when a chat starts.",
            ConfigKey::LoadingText => {
                return "Placeholder shown while waiting for the worker to reply.";
            }
            ConfigKey::Username => return "Your user name displayed above your messages.",
            ConfigKey::WorkerURL => {
                return "URL of the worker that proxies chat completion requests.";
            }
        }
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Username {
            let mut user = env::var("USER").unwrap_or_else(|_| return "".to_string());
            if user.is_empty() {
                user = "User".to_string();
            }

            return user;
        }

        if key == ConfigKey::ConfigFile {
            #[cfg(not(target_os = "macos"))]
            let config_dir = dirs::config_dir();
            #[cfg(target_os = "macos")]
            let config_dir = dirs::home_dir().map(|home| return home.join(".config"));

            return config_dir
                .unwrap_or_else(|| return path::PathBuf::from("."))
                .join("relaychat/config.toml")
                .to_string_lossy()
                .to_string();
        }

        let res = match key {
            ConfigKey::Greeting => "👋 Hello! How can I help you today?",
            ConfigKey::LoadingText => "Thinking...",
            ConfigKey::WorkerURL => "https://loreal-chatbot.lejenna737.workers.dev/",

            // Special
            ConfigKey::ConfigFile | ConfigKey::Username => "",
        };

        return res.to_string();
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key == ConfigKey::WorkerURL {
            if let Err(err) = reqwest::Url::parse(val) {
                bail!(format!(
                    "config.toml has an invalid value for key '{key}': {val}\n{err}"
                ));
            }
        }

        return Ok(());
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }
        Config::set(ConfigKey::ConfigFile, &config_file);

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter().filter(|key| return !key.is_cli_only()) {
                if let Some(val) = doc.get(&key.to_string()) {
                    let val_str = match val.as_str() {
                        Some(val_str) => val_str,
                        None => {
                            bail!(format!(
                                "config.toml has an invalid value for key '{key}', expected a string"
                            ));
                        }
                    };

                    if val_str.is_empty() {
                        continue;
                    }

                    Config::validate(key, val_str)?;
                    Config::set(key, val_str);
                }
            }
        }

        for key in ConfigKey::iter().filter(|key| return !key.is_file_only()) {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            config_file = Config::get(ConfigKey::ConfigFile),
            username = Config::get(ConfigKey::Username),
            worker_url = Config::get(ConfigKey::WorkerURL),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default() -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key.is_cli_only() {
                    return None;
                }

                if key == ConfigKey::Username {
                    return Some(format!("# {}\n# username = \"\"", key.description()));
                }

                let val = Config::default(key);
                let line = toml_edit::Value::from(val.as_str()).to_string();
                return Some(format!("# {}\n{key} = {}", key.description(), line.trim()));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
