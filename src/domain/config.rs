//! # Configuration
//!
//! Loads the bot settings once at startup. An optional YAML file (`data/config.yaml`)
//! provides a base layer and environment variables override it. Every missing required
//! value is reported in a single error.

use serde::Deserialize;
use std::path::Path;

use crate::domain::error::ConfigError;
use crate::domain::types::InstanceRef;

pub const DEFAULT_CONFIG_PATH: &str = "data/config.yaml";

const ENV_TOKEN: &str = "DISCORD_BOT_TOKEN";
const ENV_ADMIN_ROLE: &str = "DISCORD_ADMIN_ROLE";
const ENV_GUILD_ID: &str = "DISCORD_GUILD_ID";
const ENV_INSTANCE_NAME: &str = "LIGHTSAIL_INSTANCE_NAME";
const ENV_WEBSITE_URL: &str = "WEBSITE_URL";
const ENV_AWS_REGION: &str = "AWS_REGION";

/// Validated settings, shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord: DiscordConfig,
    pub lightsail: LightsailConfig,
    pub website: WebsiteConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub admin_role: String,
    pub guild_id: u64,
}

// Keeps the token out of logs.
impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("admin_role", &self.admin_role)
            .field("guild_id", &self.guild_id)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LightsailConfig {
    pub instance: InstanceRef,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct WebsiteConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_directory() -> String {
    "data".to_string()
}

fn default_log_filter() -> String {
    "info,serenity=warn,tracing::span=warn,aws_config=warn,aws_smithy_runtime=warn,hyper=warn"
        .to_string()
}

fn default_instance_name() -> String {
    "GreaterFaithChurchSite".to_string()
}

fn default_website_url() -> String {
    "https://greaterfaithchurch.org".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Layout of `data/config.yaml`. Every field is optional here; requirements
/// are checked after the environment has been merged in.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub discord: FileDiscord,
    #[serde(default)]
    pub lightsail: FileLightsail,
    #[serde(default)]
    pub website: FileWebsite,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileDiscord {
    pub token: Option<String>,
    #[serde(default, deserialize_with = "snowflake")]
    pub admin_role: Option<String>,
    #[serde(default, deserialize_with = "snowflake")]
    pub guild_id: Option<String>,
}

/// Discord ids may be written quoted or as bare YAML integers.
fn snowflake<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct FileLightsail {
    pub instance_name: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileWebsite {
    pub url: Option<String>,
}

impl FileConfig {
    /// Reads a YAML config file. A missing file at the default location is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

impl AppConfig {
    /// Loads the file layer then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = FileConfig::load(path)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges `file` with values from `env`, env winning. Empty strings count as unset.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let pick = |key: &str, fallback: Option<String>| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
        };

        let token = pick(ENV_TOKEN, file.discord.token);
        let admin_role = pick(ENV_ADMIN_ROLE, file.discord.admin_role);
        let guild_id = pick(ENV_GUILD_ID, file.discord.guild_id);

        let missing: Vec<&'static str> = [
            (ENV_TOKEN, token.is_none()),
            (ENV_ADMIN_ROLE, admin_role.is_none()),
            (ENV_GUILD_ID, guild_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(token), Some(admin_role), Some(guild_id)) = (token, admin_role, guild_id) else {
            return Err(ConfigError::Missing(missing));
        };

        let guild_id = match guild_id.trim().parse::<u64>() {
            Ok(id) if id > 0 => id,
            _ => return Err(ConfigError::InvalidGuildId(guild_id)),
        };

        let instance_name = pick(ENV_INSTANCE_NAME, file.lightsail.instance_name)
            .unwrap_or_else(default_instance_name);
        let region = pick(ENV_AWS_REGION, file.lightsail.region).unwrap_or_else(default_region);
        let url = pick(ENV_WEBSITE_URL, file.website.url).unwrap_or_else(default_website_url);

        Ok(Self {
            discord: DiscordConfig {
                token,
                admin_role: admin_role.trim().to_string(),
                guild_id,
            },
            lightsail: LightsailConfig {
                instance: InstanceRef::new(instance_name),
                region,
            },
            website: WebsiteConfig { url },
            logging: file.logging,
        })
    }
}
