//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ExtractionRouter;
use crate::llm::{ChatModel, EmbeddingModel, OpenAiClient, ProviderError};
use crate::pdf::{PdfReportRenderer, PdfTextExtractor, RenderError, ReportRenderer, TextExtractor};
use crate::rag::ChunkingError;
use crate::tokens::{TiktokenCounter, TokenCounter, TokenizerError};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize tokenizer: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Failed to initialize LLM client: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to initialize report output: {0}")]
    Output(#[from] RenderError),

    #[error(transparent)]
    Chunking(#[from] ChunkingError),
}

/// The pipeline's collaborators, built once and shared by every request
#[derive(Clone)]
pub struct Services {
    pub extractor: Arc<dyn TextExtractor>,
    pub counter: Arc<dyn TokenCounter>,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn EmbeddingModel>,
    pub renderer: Arc<dyn ReportRenderer>,
}

impl Services {
    /// Production services: pdf-extract, tiktoken, OpenAI, lopdf
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let client = Arc::new(OpenAiClient::from_config(&config.llm)?);
        let counter = TiktokenCounter::for_model(&config.llm.model_name)?;
        let renderer = PdfReportRenderer::create(&config.output.dir)?;

        tracing::info!(
            model = %config.llm.model_name,
            embedding_model = %config.llm.embedding_model,
            output_dir = %renderer.output_dir().display(),
            "Services initialized"
        );

        Ok(Self {
            extractor: Arc::new(PdfTextExtractor::new()),
            counter: Arc::new(counter),
            chat: client.clone(),
            embedder: client,
            renderer: Arc::new(renderer),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    extractor: Arc<dyn TextExtractor>,
    counter: Arc<dyn TokenCounter>,
    router: ExtractionRouter,
    renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    /// Create a new application state from explicit services
    pub fn new(config: Config, services: Services) -> Result<Self, StateError> {
        let router = ExtractionRouter::new(
            services.chat,
            services.embedder,
            config.llm.max_tokens,
            &config.rag,
        )?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                extractor: services.extractor,
                counter: services.counter,
                router,
                renderer: services.renderer,
            }),
        })
    }

    /// Create the production application state
    pub fn from_config(config: Config) -> Result<Self, StateError> {
        let services = Services::from_config(&config)?;
        Self::new(config, services)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn extractor(&self) -> &dyn TextExtractor {
        self.inner.extractor.as_ref()
    }

    /// Shared handle for use on blocking threads
    pub fn counter(&self) -> Arc<dyn TokenCounter> {
        self.inner.counter.clone()
    }

    pub fn router(&self) -> &ExtractionRouter {
        &self.inner.router
    }

    pub fn renderer(&self) -> &dyn ReportRenderer {
        self.inner.renderer.as_ref()
    }
}
