//! Shared fakes for driving the router without a real PDF parser or LLM.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::Request;
use axum::Router;
use tempfile::TempDir;

use extractor_server::llm::{ChatModel, EmbeddingModel, ProviderError};
use extractor_server::pdf::text::ExtractionError;
use extractor_server::pdf::{PdfReportRenderer, TextExtractor};
use extractor_server::tokens::TokenCounter;
use extractor_server::{create_router, AppState, Config, Services};

/// Minimal bytes that sniff as application/pdf
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

pub struct FakeExtractor {
    pub calls: AtomicUsize,
    pub text: String,
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, _data: Bytes) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

pub struct FixedCounter(pub usize);

impl TokenCounter for FixedCounter {
    fn count(&self, _text: &str) -> usize {
        self.0
    }
}

#[derive(Default)]
pub struct FakeChat {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ProviderError::Status {
                status: 401,
                body: "invalid api key sk-secret".into(),
            });
        }
        Ok("GPA: 3.9\nIntended major: Computer Science\nSAT: 1520".to_string())
    }
}

#[derive(Default)]
pub struct FakeEmbedder {
    pub batches: AtomicUsize,
    pub inputs: AtomicUsize,
}

#[async_trait]
impl EmbeddingModel for FakeEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inputs.fetch_add(inputs.len(), Ordering::SeqCst);
        Ok(inputs
            .iter()
            .map(|text| vec![text.len() as f32, 1.0])
            .collect())
    }
}

/// A router wired to fakes, plus handles for asserting on them
pub struct Harness {
    pub app: Router,
    pub extractor: Arc<FakeExtractor>,
    pub chat: Arc<FakeChat>,
    pub embedder: Arc<FakeEmbedder>,
    pub output_dir: TempDir,
}

pub struct HarnessBuilder {
    config: Config,
    text: String,
    tokens: usize,
    chat_fails: bool,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.llm.api_key = "test-key".to_string();
        Self {
            config,
            text: "Jane Doe. GPA 3.9. Intended major: Computer Science. SAT 1520.".to_string(),
            tokens: 500,
            chat_fails: false,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn tokens(mut self, tokens: usize) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.upload.max_file_size = size;
        self
    }

    pub fn failing_chat(mut self) -> Self {
        self.chat_fails = true;
        self
    }

    pub fn build(mut self) -> Harness {
        let output_dir = tempfile::tempdir().unwrap();
        self.config.output.dir = output_dir.path().to_path_buf();

        let extractor = Arc::new(FakeExtractor {
            calls: AtomicUsize::new(0),
            text: self.text,
        });
        let chat = Arc::new(FakeChat {
            fail: self.chat_fails,
            ..Default::default()
        });
        let embedder = Arc::new(FakeEmbedder::default());

        let services = Services {
            extractor: extractor.clone(),
            counter: Arc::new(FixedCounter(self.tokens)),
            chat: chat.clone(),
            embedder: embedder.clone(),
            renderer: Arc::new(PdfReportRenderer::create(output_dir.path()).unwrap()),
        };
        let state = AppState::new(self.config, services).unwrap();

        Harness {
            app: create_router(state),
            extractor,
            chat,
            embedder,
            output_dir,
        }
    }
}

/// Build a multipart POST with a single `application/pdf` file part
pub fn multipart_request(uri: &str, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    multipart_request_typed(uri, field, file_name, "application/pdf", data)
}

/// Build a multipart POST with a single file part of the given type
pub fn multipart_request_typed(
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let boundary = "X-BOUNDARY";
    let mut body = format!(
        "--{boundary}\r\n\
Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
Content-Type: {content_type}\r\n\
\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .expect("Failed to build request")
}
