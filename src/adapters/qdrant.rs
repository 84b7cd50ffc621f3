//! Qdrant REST adapter for the vector-index port.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::VectorDbConfig;
use crate::domain::{Chunk, ChunkMetadata, CollectionInfo, SearchResult};
use crate::error::{ClauseError, Result};
use crate::ports::VectorIndex;

pub struct QdrantIndex {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

/// Retrievable payload stored alongside each vector.
#[derive(Debug, Serialize, Deserialize)]
struct PointPayload {
    chunk_id: String,
    text: String,
    metadata: ChunkMetadata,
}

impl QdrantIndex {
    pub fn new(config: &VectorDbConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection_name.clone(),
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            builder = builder.header("api-key", key);
        }
        builder
    }

    async fn collection_exists(&self) -> Result<bool> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/collections/{}", self.collection),
            )
            .send()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClauseError::IndexStore(format!(
                "collection lookup failed ({status})"
            ))),
        }
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, dimension: usize) -> Result<()> {
        if self.collection_exists().await? {
            tracing::debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        let body = json!({
            "vectors": {
                "size": dimension,
                "distance": "Cosine",
            }
        });

        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{}", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        if response.status().is_success() {
            tracing::info!("Created collection '{}'", self.collection);
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ClauseError::IndexStore(format!(
                "collection create failed ({status}): {body}"
            )))
        }
    }

    async fn upsert(&self, chunks: &[Chunk], vectors: &[Vec<f32>], offset: usize) -> Result<()> {
        if chunks.len() != vectors.len() {
            return Err(ClauseError::Validation(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }
        if chunks.is_empty() {
            return Ok(());
        }

        #[derive(Serialize)]
        struct Point<'a> {
            id: usize,
            vector: &'a [f32],
            payload: PointPayload,
        }

        let points: Vec<Point<'_>> = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(j, (chunk, vector))| Point {
                id: offset + j,
                vector,
                payload: PointPayload {
                    chunk_id: chunk.id.clone(),
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                },
            })
            .collect();

        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{}/points", self.collection),
            )
            .query(&[("wait", "true")])
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ClauseError::IndexStore(format!(
                "upsert failed ({status}): {body}"
            )))
        }
    }

    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        #[derive(Deserialize)]
        struct Response {
            result: Vec<ScoredPoint>,
        }

        #[derive(Deserialize)]
        struct ScoredPoint {
            score: f32,
            payload: Option<PointPayload>,
        }

        let body = json!({
            "vector": query_vector,
            "limit": top_k,
            "with_payload": true,
        });

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{}/points/search", self.collection),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClauseError::IndexStore(format!(
                "search failed ({status}): {body}"
            )));
        }

        let body: Response = response
            .json()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        body.result
            .into_iter()
            .map(|point| {
                let payload = point.payload.ok_or_else(|| {
                    ClauseError::IndexStore("search hit without payload".to_string())
                })?;
                Ok(SearchResult {
                    chunk_id: payload.chunk_id,
                    text: payload.text,
                    metadata: payload.metadata,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn collection_info(&self) -> Result<Option<CollectionInfo>> {
        #[derive(Deserialize)]
        struct Response {
            result: Info,
        }

        #[derive(Deserialize)]
        struct Info {
            status: String,
            #[serde(default)]
            points_count: Option<u64>,
            #[serde(default)]
            indexed_vectors_count: Option<u64>,
        }

        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/collections/{}", self.collection),
            )
            .send()
            .await
            .map_err(|e| ClauseError::IndexStore(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: Response = response
                    .json()
                    .await
                    .map_err(|e| ClauseError::IndexStore(e.to_string()))?;
                Ok(Some(CollectionInfo {
                    name: self.collection.clone(),
                    vector_count: body.result.indexed_vectors_count.unwrap_or(0),
                    point_count: body.result.points_count.unwrap_or(0),
                    status: body.result.status,
                }))
            }
            status => Err(ClauseError::IndexStore(format!(
                "collection info failed ({status})"
            ))),
        }
    }
}
