//! Read-only access to the `blogPosts` collection

use reqwest::{Client, StatusCode};
use std::future::Future;
use std::path::Path;
use thiserror::Error;

use super::firestore::{Document, ListDocumentsResponse};
use super::post::BlogPost;
use crate::config::FirebaseConfig;
use crate::helpers::encode_path_segment;

/// Name of the collection holding blog posts
pub const COLLECTION: &str = "blogPosts";

/// Page size used when listing the collection
const PAGE_SIZE: usize = 300;

/// Errors reaching or decoding the document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("document store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed document '{id}': {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document store is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Read-only post source
pub trait PostStore: Send + Sync + 'static {
    /// Fetch one post by slug; `Ok(None)` when no document has that id
    fn get_post(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<BlogPost>, StoreError>> + Send;

    /// Fetch every post in the collection, in store order
    fn list_posts(&self) -> impl Future<Output = Result<Vec<BlogPost>, StoreError>> + Send;
}

/// Firestore REST client
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
}

impl FirestoreStore {
    /// Create a client from the Firebase configuration
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        if config.project_id.is_empty() {
            return Err(StoreError::NotConfigured("missing project id"));
        }

        Ok(Self {
            client: Client::new(),
            endpoint: config.firestore_endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.endpoint, self.project_id, COLLECTION
        )
    }

    fn document_url(&self, slug: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(),
            encode_path_segment(slug)
        )
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.query(&[("key", self.api_key.as_str())])
        }
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn decode(doc: Document) -> Result<BlogPost, StoreError> {
    let id = doc.id().to_string();
    doc.into_post()
        .map_err(|source| StoreError::Decode { id, source })
}

/// Decode one listing page, skipping documents that do not fit the model
fn decode_page(documents: Vec<Document>) -> Vec<BlogPost> {
    documents
        .into_iter()
        .filter_map(|doc| match decode(doc) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Skipping post: {}", e);
                None
            }
        })
        .collect()
}

impl PostStore for FirestoreStore {
    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        if slug.is_empty() {
            return Ok(None);
        }

        let url = self.document_url(slug);
        tracing::debug!("Fetching post {}", slug);
        let response = self.with_key(self.client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let doc: Document = error_for_status(response).await?.json().await?;
        decode(doc).map(Some)
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
        let url = self.collection_url();
        let mut posts = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .with_key(self.client.get(&url))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = error_for_status(request.send().await?).await?;
            let page: ListDocumentsResponse = response.json().await?;

            posts.extend(decode_page(page.documents));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Listed {} posts", posts.len());
        Ok(posts)
    }
}

/// Posts held in memory, loaded from a JSON file or built in code
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: Vec<BlogPost>,
}

impl MemoryStore {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    /// Load posts from a JSON file holding either an array of posts or an
    /// object keyed by slug (the shape of a collection export)
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let posts = match value {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(slug, doc)| {
                    let mut post: BlogPost = serde_json::from_value(doc)?;
                    post.slug = slug;
                    Ok(post)
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?,
            other => serde_json::from_value(other)?,
        };

        tracing::info!(
            "Loaded {} posts from {:?}",
            posts.len(),
            path.as_ref()
        );
        Ok(Self { posts })
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }
}

impl PostStore for MemoryStore {
    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
        Ok(self.posts.clone())
    }
}

/// The store the server runs against
#[derive(Debug, Clone)]
pub enum SiteStore {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl PostStore for SiteStore {
    async fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        match self {
            SiteStore::Firestore(store) => store.get_post(slug).await,
            SiteStore::Memory(store) => store.get_post(slug).await,
        }
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
        match self {
            SiteStore::Firestore(store) => store.list_posts().await,
            SiteStore::Memory(store) => store.list_posts().await,
        }
    }
}
