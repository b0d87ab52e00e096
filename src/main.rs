use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use steam_mcp::config::{
    CliConfig, Config, EnvConfig, DEFAULT_REFRESH_HOURS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use steam_mcp::mcp::{self, McpRegistry, ToolContext};
use steam_mcp::search::SearchCache;
use steam_mcp::steam::SteamClient;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Prefix applied to every tool name (overrides TOOL_PREFIX).
    #[clap(long)]
    pub tool_prefix: Option<String>,

    /// Hours before the cached app list is considered stale.
    #[clap(long, default_value_t = DEFAULT_REFRESH_HOURS)]
    pub refresh_hours: u64,

    /// Timeout in seconds for Steam Web API requests.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // stdout carries the MCP protocol, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();

    let cli_config = CliConfig {
        tool_prefix: cli_args.tool_prefix,
        refresh_hours: cli_args.refresh_hours,
        request_timeout_secs: cli_args.request_timeout_secs,
    };
    let config = Arc::new(Config::resolve(&cli_config, EnvConfig::from_env()));

    if config.api_key.is_none() {
        info!("STEAM_API_KEY not set; tools that need it will report the missing key");
    }

    let steam = Arc::new(SteamClient::new(config.request_timeout)?);
    let search_cache = Arc::new(SearchCache::new(
        steam.clone(),
        config.api_key.clone(),
        config.refresh_interval,
    ));

    let mut registry = McpRegistry::new(config.tool_prefix.clone());
    mcp::tools::register_all_tools(&mut registry);
    info!("Registered {} tools", registry.tool_count());

    let context = ToolContext {
        steam,
        search_cache,
        config,
    };

    mcp::run_stdio(Arc::new(registry), context).await
}
