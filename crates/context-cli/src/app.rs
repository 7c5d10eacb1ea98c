use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use context_agent::{create_providers, ContextAgentManager, DispatchMode, ProviderServices};
use context_core::Config;
use context_llm::OpenAIGateway;
use ets_client::EtsHotelClient;

/// Config from an explicit file, or the default locations, with environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => {
            let mut config = Config::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => Config::load()?,
    };
    Ok(config)
}

/// Gateway, hotel client and an empty manager, wired from the config.
pub struct App {
    pub config: Config,
    pub services: ProviderServices,
    pub manager: ContextAgentManager,
}

impl App {
    pub fn new(config: Config, mode: Option<DispatchMode>) -> anyhow::Result<Self> {
        let gateway = Arc::new(
            OpenAIGateway::from_config(&config).context("OpenAI gateway is not configured")?,
        );
        let hotel_client =
            Arc::new(EtsHotelClient::from_config(&config).context("Invalid ETS_BASE_URL")?);

        let services = ProviderServices::from_config(gateway.clone(), hotel_client, &config);
        let mut manager = ContextAgentManager::from_config(gateway, &config);
        if let Some(mode) = mode {
            manager = manager.with_dispatch_mode(mode);
        }

        Ok(Self {
            config,
            services,
            manager,
        })
    }

    /// Registers `names`, or the configured providers, or `fallback` when neither is given.
    pub fn register(&self, names: &[String], fallback: &[&str]) -> anyhow::Result<()> {
        let names: Vec<String> = if !names.is_empty() {
            names.to_vec()
        } else if !self.config.providers.is_empty() {
            self.config.providers.clone()
        } else {
            fallback.iter().map(|s| s.to_string()).collect()
        };

        self.register_names(&names)
    }

    /// Registers exactly `names`, ignoring the configured provider list.
    ///
    /// Used by commands that read a specific fragment back from the manager.
    pub fn register_required(&self, names: &[&str]) -> anyhow::Result<()> {
        self.register_names(names)
    }

    fn register_names<S: AsRef<str>>(&self, names: &[S]) -> anyhow::Result<()> {
        for provider in create_providers(names, &self.services)? {
            self.manager.register_shared(provider);
        }
        log::info!("Registered providers: {:?}", self.manager.context_types());
        Ok(())
    }
}
