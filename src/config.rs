use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// May be left out when `DATABASE_URL` is set.
    #[serde(default)]
    pub database_url: String,
    pub http_port: u16,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_tile_root")]
    pub tile_root: PathBuf,
    #[serde(default = "default_motd")]
    pub motd: String,
}

fn default_pool_size() -> u32 {
    10
}

fn default_tile_root() -> PathBuf {
    PathBuf::from("tiles")
}

fn default_motd() -> String {
    "Јуче је данас било сутра.".to_owned()
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    let mut config = parse(&data)?;

    // also picks up a .env file in the working directory
    if let Ok(url) = dotenvy::var("DATABASE_URL") {
        config.database_url = url;
    }
    if config.database_url.is_empty() {
        bail!("database_url is not configured and DATABASE_URL is not set");
    }

    Ok(config)
}

fn parse(data: &str) -> Result<Config> {
    let config: Config = toml::from_str(data).context("Failed to parse config")?;
    if config.pool_size == 0 {
        bail!("pool_size must be at least 1");
    }
    Ok(config)
}
