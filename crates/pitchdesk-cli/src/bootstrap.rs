//! Wiring of the store, adapters and services from configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use pitchdesk_application::{ComposerService, Dispatcher, Presenter, RadarService};
use pitchdesk_core::channel::ChannelRepository;
use pitchdesk_core::config::AppConfig;
use pitchdesk_core::generation::GenerationGateway;
use pitchdesk_core::profile::ProfileRepository;
use pitchdesk_core::template::TemplateRepository;
use pitchdesk_infrastructure::{ConfigService, LocalStore, PitchdeskPaths};
use pitchdesk_interaction::{FallbackSearch, GroundedChannelSearch, OpenAiChatClient};

pub struct Bootstrap {
    pub config: AppConfig,
    pub store: Arc<LocalStore>,
}

impl Bootstrap {
    pub fn load(config_path: Option<PathBuf>, in_memory: bool) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let config = service.load().context("Failed to load configuration")?;

        let store = if in_memory {
            LocalStore::in_memory()
        } else {
            let path = match &config.storage.data_file {
                Some(path) => path.clone(),
                None => PitchdeskPaths::default_store_file()
                    .context("Failed to resolve the data directory")?,
            };
            LocalStore::open(path.clone())
                .with_context(|| format!("Failed to open data store {}", path.display()))?
        };

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn profiles(&self) -> Arc<dyn ProfileRepository> {
        self.store.clone()
    }

    pub fn channels(&self) -> Arc<dyn ChannelRepository> {
        self.store.clone()
    }

    fn templates(&self) -> Arc<dyn TemplateRepository> {
        self.store.clone()
    }

    /// Composer over the configured chat model. Fails without an LLM key.
    pub fn composer(&self) -> Result<Arc<ComposerService>> {
        let client = OpenAiChatClient::from_config(&self.config.llm)
            .context("Text generation is not configured")?;
        tracing::debug!(model = client.model(), "generation client ready");

        let gateway = GenerationGateway::new(Arc::new(client))
            .with_timeout(self.config.llm.timeout())
            .with_params(self.config.llm.params());
        Ok(Arc::new(ComposerService::new(
            gateway,
            self.profiles(),
            self.templates(),
        )))
    }

    pub fn radar(&self) -> Result<Arc<RadarService>> {
        let mut search = FallbackSearch::new();
        if let Some(backend) = GroundedChannelSearch::from_config(&self.config.search)
            .context("Failed to set up channel search")?
        {
            search = search.with_backend(Arc::new(backend));
        }
        if search.is_empty() {
            tracing::warn!("no search backend configured, radar searches will be empty");
        }

        let radar = RadarService::new(Arc::new(search), self.channels(), self.profiles())
            .with_search_config(&self.config.search);
        Ok(Arc::new(radar))
    }

    pub fn dispatcher(&self, presenter: Arc<dyn Presenter>) -> Result<Dispatcher> {
        Ok(Dispatcher::new(
            self.composer()?,
            self.radar()?,
            self.profiles(),
            presenter,
            self.config.radar.page_size,
        ))
    }
}
