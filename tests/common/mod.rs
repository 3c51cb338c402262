#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use jarvis::error::{ActionError, LookupError};
use jarvis::services::launcher::Launcher;
use jarvis::services::llm::Generator;
use jarvis::services::search::{SearchProvider, SearchSnippet};

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Search collaborator returning canned snippets (or failing) and counting calls.
pub struct FakeSearch {
    pub calls: AtomicUsize,
    snippets: Option<Vec<&'static str>>,
    delay: Duration,
}

impl FakeSearch {
    pub fn answering(snippets: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), snippets: Some(snippets), delay: Duration::ZERO })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), snippets: None, delay: Duration::ZERO })
    }

    pub fn slow(snippets: Vec<&'static str>, delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), snippets: Some(snippets), delay })
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchSnippet>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.snippets {
            Some(snippets) => Ok(snippets
                .iter()
                .take(limit)
                .map(|s| SearchSnippet { title: "result".to_string(), snippet: s.to_string() })
                .collect()),
            None => Err(LookupError::Status(503)),
        }
    }
}

/// Generator collaborator with a fixed answer (or failure), counting calls.
pub struct FakeGenerator {
    pub calls: AtomicUsize,
    answer: Option<&'static str>,
}

impl FakeGenerator {
    pub fn answering(answer: &'static str) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), answer: Some(answer) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), answer: None })
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.map(str::to_string).ok_or(LookupError::Empty)
    }
}

/// Records what was opened; any target containing "missing" fails to launch.
#[derive(Default)]
pub struct FakeLauncher {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn open(&self, target: &str) -> Result<(), ActionError> {
        if target.contains("missing") {
            return Err(ActionError::Launch {
                target: target.to_string(),
                reason: "not found".to_string(),
            });
        }
        self.opened.lock().unwrap().push(target.to_string());
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<(), ActionError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
