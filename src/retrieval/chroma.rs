use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{AssistantError, Result};
use crate::model::OllamaClient;
use crate::retrieval::{Passage, SimilaritySearch};

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

/// Column-oriented result of a Chroma query: one row per query embedding.
#[derive(Debug, Default, Deserialize)]
struct QueryResult {
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<Map<String, Value>>>>,
}

/// Where a collection lives on a Chroma server.
#[derive(Debug, Clone)]
pub struct ChromaCollection {
    pub server_url: String,
    pub tenant: String,
    pub database: String,
    pub name: String,
}

impl ChromaCollection {
    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.server_url.trim_end_matches('/'),
            self.tenant,
            self.database
        )
    }
}

/// Similarity search against a Chroma collection through the v2 HTTP API
/// (Chroma 1.x servers). Query vectors come from an Ollama embedding model,
/// which must match the one used at ingest time.
pub struct ChromaRetriever {
    query_url: String,
    client: Client,
    embedder: Arc<OllamaClient>,
    embed_model: String,
}

impl ChromaRetriever {
    /// Resolves the collection on the server so later queries can address it by id.
    pub async fn connect(
        collection: &ChromaCollection,
        embedder: Arc<OllamaClient>,
        embed_model: impl Into<String>,
    ) -> Result<Self> {
        let collections_url = collection.collections_url();
        let client = Client::new();

        info!("Opening Chroma collection {} at {}", collection.name, collections_url);
        let response = client
            .get(format!("{}/{}", collections_url, collection.name))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Provider(format!(
                "collection {} unavailable ({}): {}",
                collection.name, status, error_text
            )));
        }

        let info: CollectionInfo = response.json().await?;

        Ok(Self {
            query_url: format!("{}/{}/query", collections_url, info.id),
            client,
            embedder,
            embed_model: embed_model.into(),
        })
    }
}

fn passages_from(result: QueryResult) -> Vec<Passage> {
    let documents = result.documents.into_iter().next().unwrap_or_default();
    let mut metadatas = result.metadatas.into_iter().next().unwrap_or_default().into_iter();

    documents
        .into_iter()
        .map(|text| Passage {
            text: text.unwrap_or_default(),
            metadata: metadatas.next().flatten().unwrap_or_default(),
        })
        .collect()
}

#[async_trait]
impl SimilaritySearch for ChromaRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        let embedding = self.embedder.embed(&self.embed_model, query).await?;

        let payload = json!({
            "query_embeddings": [embedding],
            "n_results": k,
            "include": ["documents", "metadatas"]
        });

        let response = self.client.post(&self.query_url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Provider(format!(
                "Chroma query failed ({}): {}",
                status, error_text
            )));
        }

        let result: QueryResult = response.json().await?;
        let passages = passages_from(result);
        debug!("Chroma returned {} passages", passages.len());
        Ok(passages)
    }
}
