use serde::Deserialize;
use std::env;
use tripcraft_gateway::GatewayConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TRIPCRAFT__GATEWAY__ENDPOINT_URL=http://localhost:5678/webhook`
            .add_source(config::Environment::with_prefix("TRIPCRAFT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
