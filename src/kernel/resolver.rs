use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::memory::KnowledgeStore;
use crate::services::llm::Generator;
use crate::services::search::SearchProvider;

/// Queries starting with these are system commands and are never answered here.
pub const RESERVED_PREFIXES: [&str; 4] = ["open", "set reminder", "what time", "what date"];

const SEARCH_LIMIT: usize = 3;
const HISTORY_LIMIT: usize = 50;

pub fn is_reserved(query: &str) -> bool {
    let lowered = query.trim().to_lowercase();
    RESERVED_PREFIXES.iter().any(|p| lowered.starts_with(p))
}

/// Cascading answer lookup: knowledge cache, then web search, then generation.
///
/// Every answer produced by search or generation is written back to the
/// knowledge store. Collaborator failures never escape; they only move the
/// cascade to its next stage.
pub struct ResponseResolver {
    knowledge: Mutex<KnowledgeStore>,
    search: Arc<dyn SearchProvider>,
    generator: Arc<dyn Generator>,
    inflight: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
    history: StdMutex<VecDeque<String>>,
}

fn guard<T>(m: &StdMutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl ResponseResolver {
    pub fn new(
        knowledge: KnowledgeStore,
        search: Arc<dyn SearchProvider>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            knowledge: Mutex::new(knowledge),
            search,
            generator,
            inflight: StdMutex::new(HashMap::new()),
            history: StdMutex::new(VecDeque::with_capacity(HISTORY_LIMIT)),
        }
    }

    pub async fn resolve(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() || is_reserved(query) {
            return None;
        }
        self.remember(query);

        if let Some(answer) = self.cached(query).await {
            debug!(query, "Knowledge cache hit");
            return Some(answer);
        }

        // One resolution per key at a time; latecomers wait, then re-check the cache.
        let key_lock = {
            let mut inflight = guard(&self.inflight);
            Arc::clone(inflight.entry(query.to_string()).or_default())
        };
        let _held = key_lock.lock().await;

        if let Some(answer) = self.cached(query).await {
            debug!(query, "Resolved by concurrent lookup");
            return Some(answer);
        }

        let answer = match self.lookup(query).await {
            Some(answer) => Some(answer),
            None => self.generate(query).await,
        };

        if let Some(answer) = &answer {
            self.write_back(query, answer).await;
        }
        guard(&self.inflight).remove(query);
        answer
    }

    async fn cached(&self, query: &str) -> Option<String> {
        self.knowledge.lock().await.get(query).map(str::to_string)
    }

    async fn lookup(&self, query: &str) -> Option<String> {
        match self.search.search(query, SEARCH_LIMIT).await {
            Ok(results) => {
                let answer = results
                    .into_iter()
                    .take(SEARCH_LIMIT)
                    .map(|r| r.snippet.trim().to_string())
                    .find(|s| !s.is_empty());
                if answer.is_none() {
                    debug!(query, "Search returned nothing usable");
                }
                answer
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed, falling back to generation");
                None
            }
        }
    }

    async fn generate(&self, query: &str) -> Option<String> {
        match self.generator.generate(query).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                debug!(query, "Generator returned empty text");
                None
            }
            Err(e) => {
                warn!(query, error = %e, "Generation failed");
                None
            }
        }
    }

    async fn write_back(&self, query: &str, answer: &str) {
        let mut knowledge = self.knowledge.lock().await;
        knowledge.insert(query, answer);
        if let Err(e) = knowledge.save() {
            warn!(error = %e, "Failed to persist knowledge store");
        }
        info!(query, "Cached new answer");
    }

    fn remember(&self, query: &str) {
        let mut history = guard(&self.history);
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(query.to_string());
    }

    /// Queries seen since the last clear, oldest first.
    pub fn history(&self) -> Vec<String> {
        guard(&self.history).iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        guard(&self.history).clear();
    }

    pub async fn is_cached(&self, query: &str) -> bool {
        self.knowledge.lock().await.contains(query.trim())
    }
}
