use parley_llm::ModelInfo;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{ChatError, Result};
use crate::gateway::CompletionGateway;

/// What a model picker shows while a catalog query runs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum QueryState {
    Loading,
    Error(String),
    Success(Vec<ModelInfo>),
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn models(&self) -> Option<&[ModelInfo]> {
        match self {
            Self::Success(models) => Some(models),
            _ => None,
        }
    }
}

/// Lists the models the completion provider serves
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    gateway: CompletionGateway,
}

impl ModelCatalog {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    /// One catalog request. No request is made without a credential.
    pub async fn fetch(&self) -> Result<Vec<ModelInfo>> {
        let client = self.gateway.client()?;
        let models = client.list_models().await.map_err(ChatError::Completion)?;
        tracing::info!(count = models.len(), "Fetched model catalog");
        Ok(models)
    }

    /// Start a background query whose result is cached until `refetch`
    pub fn query(&self) -> ModelQuery {
        ModelQuery::start(self.clone())
    }
}

/// A running or finished catalog fetch.
///
/// Dropping the query aborts an in-flight request.
pub struct ModelQuery {
    catalog: ModelCatalog,
    state: Arc<watch::Sender<QueryState>>,
    task: JoinHandle<()>,
}

impl ModelQuery {
    fn start(catalog: ModelCatalog) -> Self {
        let (state, _) = watch::channel(QueryState::Loading);
        let state = Arc::new(state);
        let task = Self::spawn_fetch(&catalog, &state);
        Self {
            catalog,
            state,
            task,
        }
    }

    fn spawn_fetch(catalog: &ModelCatalog, state: &Arc<watch::Sender<QueryState>>) -> JoinHandle<()> {
        let catalog = catalog.clone();
        let state = Arc::clone(state);
        tokio::spawn(async move {
            let next = match catalog.fetch().await {
                Ok(models) => QueryState::Success(models),
                Err(e) => {
                    tracing::error!("Failed to fetch models: {}", e);
                    QueryState::Error(e.to_string())
                }
            };
            state.send_replace(next);
        })
    }

    /// Current state without waiting
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Wait until the query leaves `Loading`
    pub async fn wait(&self) -> QueryState {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Drop the cached result and fetch again
    pub fn refetch(&mut self) {
        self.task.abort();
        self.state.send_replace(QueryState::Loading);
        self.task = Self::spawn_fetch(&self.catalog, &self.state);
    }
}

impl Drop for ModelQuery {
    fn drop(&mut self) {
        self.task.abort();
    }
}
