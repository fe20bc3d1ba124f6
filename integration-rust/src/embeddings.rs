use crate::{IntegrationError, IntegrationResult};
use async_trait::async_trait;
use venice_sdk::{EmbeddingRequest, Venice, DEFAULT_EMBEDDING_MODEL};

/// Text embeddings as seen by an application framework.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// One vector per text, in input order.
    async fn embed_documents(&self, texts: &[String]) -> IntegrationResult<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> IntegrationResult<Vec<f32>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeniceEmbeddingsOptions {
    pub model: String,
    pub dimensions: Option<u32>,
}

impl Default for VeniceEmbeddingsOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VeniceEmbeddings {
    client: Venice,
    options: VeniceEmbeddingsOptions,
}

impl VeniceEmbeddings {
    #[must_use]
    pub fn new(client: Venice, options: VeniceEmbeddingsOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl Embeddings for VeniceEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> IntegrationResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: self.options.model.clone(),
            dimensions: self.options.dimensions,
            ..EmbeddingRequest::new(texts.to_vec())
        };
        let response = self.client.embeddings().create(&request).await?;

        let vectors = response.vectors()?;
        if vectors.len() != texts.len() {
            return Err(IntegrationError::Invariant(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> IntegrationResult<Vec<f32>> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| IntegrationError::Invariant("No embedding returned".to_string()))
    }
}
