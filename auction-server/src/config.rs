use {
    anyhow::{
        anyhow,
        Result,
    },
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
    },
    std::{
        fs,
        time::Duration,
    },
};

mod server;

// `Options` is a structup definition to provide clean command-line args for the marketplace server.
#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
#[allow(clippy::large_enum_variant)]
pub enum Options {
    /// Run the auction marketplace service.
    Run(RunOptions),
    /// Run db migrations and exit.
    Migrate(MigrateOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    /// Server Options
    #[command(flatten)]
    pub server: server::Options,

    #[command(flatten)]
    pub config: ConfigOptions,

    #[command(flatten)]
    pub delete_pg_rows: DeletePgRowsOptions,
}

#[derive(Args, Clone, Debug)]
pub struct MigrateOptions {
    /// database url for persistent storage.
    #[arg(long = "database-url")]
    #[arg(env = "DATABASE_URL")]
    pub database_url: String,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Config Options")]
#[group(id = "Config")]
pub struct ConfigOptions {
    /// Path to a configuration file containing the auction lifecycle settings.
    #[arg(long = "config")]
    #[arg(env = "MARKETPLACE_CONFIG")]
    #[arg(default_value = "config.yaml")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Delete Options")]
#[group(id = "DeletePgRows")]
pub struct DeletePgRowsOptions {
    /// Whether to periodically delete concluded auctions and their bids.
    #[arg(long = "delete-enabled")]
    #[arg(env = "DELETE_ENABLED")]
    #[arg(default_value = "false")]
    pub delete_enabled: bool,

    /// How often to run the deletion, in seconds.
    #[arg(long = "delete-interval-secs")]
    #[arg(env = "DELETE_INTERVAL_SECONDS")]
    #[arg(default_value = "3600")]
    pub delete_interval_secs: u64,

    /// Auctions concluded longer ago than this many seconds are deleted.
    #[arg(long = "delete-threshold-secs")]
    #[arg(env = "DELETE_THRESHOLD_SECONDS")]
    #[arg(default_value = "2592000")]
    pub delete_threshold_secs: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        // Open and read the YAML file
        let yaml_content = fs::read_to_string(path)?;
        Self::parse(&yaml_content)
    }

    fn parse(yaml_content: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(yaml_content)?;
        config.lifecycle.validate()?;
        Ok(config)
    }
}

/// Timing of the auction lifecycle. This is the only place the closing interval of an auction
/// comes from.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LifecycleConfig {
    /// Time between the creation of an auction and its deadline.
    #[serde(with = "humantime_serde", default = "LifecycleConfig::default_auction_interval")]
    pub auction_interval: Duration,

    /// Period of the sweeper closing overdue auctions.
    #[serde(with = "humantime_serde", default = "LifecycleConfig::default_sweep_interval")]
    pub sweep_interval: Duration,
}

impl LifecycleConfig {
    pub fn default_auction_interval() -> Duration {
        Duration::from_secs(5 * 60)
    }

    pub fn default_sweep_interval() -> Duration {
        Duration::from_secs(60)
    }

    fn validate(&self) -> Result<()> {
        if self.auction_interval.is_zero() {
            return Err(anyhow!("lifecycle.auction_interval must be greater than zero"));
        }
        if self.sweep_interval.is_zero() {
            return Err(anyhow!("lifecycle.sweep_interval must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            auction_interval: Self::default_auction_interval(),
            sweep_interval:   Self::default_sweep_interval(),
        }
    }
}
