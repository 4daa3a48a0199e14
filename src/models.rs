use std::marker::PhantomData;
use std::time::Duration;

// https://huggingface.co/docs/api-inference/index
const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co";

/// Embedding vector as returned by the provider. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

impl Embedding {
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

pub struct ClientConfig {
    pub(crate) url: String,
    pub(crate) token: Option<String>,
    pub(crate) wait_for_model: bool,
    pub(crate) timeout: Duration,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder<Unset, Unset> {
        ClientConfigBuilder::new()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct Unset;
pub struct Set;

pub struct ClientConfigBuilder<M, E> {
    model_id: Option<String>,
    endpoint: Option<String>,
    token: Option<String>,
    wait_for_model: bool,
    timeout: Duration,
    _model_phantom: PhantomData<M>,
    _endpoint_phantom: PhantomData<E>,
}

impl ClientConfigBuilder<Unset, Unset> {
    pub fn new() -> Self {
        Self {
            model_id: None,
            endpoint: None,
            token: None,
            wait_for_model: true,
            timeout: Duration::from_secs(30),
            _model_phantom: PhantomData,
            _endpoint_phantom: PhantomData,
        }
    }
}

impl<E> ClientConfigBuilder<Unset, E> {
    pub fn model_id(self, model_id: impl Into<String>) -> ClientConfigBuilder<Set, E> {
        ClientConfigBuilder {
            model_id: Some(model_id.into()),
            endpoint: self.endpoint,
            token: self.token,
            wait_for_model: self.wait_for_model,
            timeout: self.timeout,
            _model_phantom: PhantomData,
            _endpoint_phantom: self._endpoint_phantom,
        }
    }
}

impl<M> ClientConfigBuilder<M, Unset> {
    /// Base URL of the provider; `None` selects the hosted HuggingFace
    /// inference endpoint.
    pub fn endpoint(self, endpoint: impl Into<Option<String>>) -> ClientConfigBuilder<M, Set> {
        let endpoint = endpoint
            .into()
            .unwrap_or_else(|| HF_INFERENCE_BASE.to_string());
        ClientConfigBuilder {
            model_id: self.model_id,
            endpoint: Some(endpoint),
            token: self.token,
            wait_for_model: self.wait_for_model,
            timeout: self.timeout,
            _model_phantom: self._model_phantom,
            _endpoint_phantom: PhantomData,
        }
    }
}

impl ClientConfigBuilder<Set, Set> {
    pub fn token(mut self, token: impl Into<Option<String>>) -> Self {
        self.token = token.into();
        self
    }

    /// Ask the provider to load the model instead of answering 503 while it
    /// is cold.
    pub fn wait_for_model(mut self, wait_for_model: bool) -> Self {
        self.wait_for_model = wait_for_model;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ClientConfig {
        let model_id = self.model_id.expect("Model ID not set");
        let endpoint = self.endpoint.expect("Endpoint not set");

        ClientConfig {
            url: format!("{}/models/{}", endpoint.trim_end_matches('/'), model_id),
            token: self.token,
            wait_for_model: self.wait_for_model,
            timeout: self.timeout,
        }
    }
}
