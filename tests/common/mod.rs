//! Shared test doubles.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tariff_mcp::embedding::Embedder;
use tariff_mcp::lookup::HtsLookup;
use tariff_mcp::mcp::McpServer;
use tariff_mcp::tariff::TariffClient;
use tariff_mcp::vector_store::{HtsMatch, SearchParams, VectorStore};
use tariff_mcp::{Result, TariffError};
use url::Url;

/// Counts calls and returns a constant vector.
#[derive(Default)]
pub struct CountingEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.1, 0.2, 0.3])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

/// Returns canned payloads in order, capped by the requested limit.
pub struct CannedStore {
    pub payloads: Vec<String>,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CannedStore {
    pub fn new(payloads: &[&str]) -> Self {
        Self {
            payloads: payloads.iter().map(|p| p.to_string()).collect(),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            payloads: Vec::new(),
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl VectorStore for CannedStore {
    async fn search(&self, _query_embedding: &[f32], params: &SearchParams) -> Result<Vec<HtsMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TariffError::VectorStore("cluster unavailable".to_string()));
        }
        Ok(self
            .payloads
            .iter()
            .take(params.limit as usize)
            .map(|p| HtsMatch {
                content: p.clone(),
                score: None,
            })
            .collect())
    }
}

pub struct Harness {
    pub embedder: Arc<CountingEmbedder>,
    pub store: Arc<CannedStore>,
    pub server: McpServer,
}

/// Build a server whose tariff client posts to `tariff_url`.
pub fn harness(store: CannedStore, tariff_url: &str) -> Harness {
    let embedder = Arc::new(CountingEmbedder::default());
    let store = Arc::new(store);
    let lookup = HtsLookup::new(embedder.clone(), store.clone(), SearchParams::default());
    let client = TariffClient::new(Url::parse(tariff_url).unwrap()).unwrap();
    let server = tariff_mcp::app::App::new(lookup, client).mcp_server();

    Harness {
        embedder,
        store,
        server,
    }
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
