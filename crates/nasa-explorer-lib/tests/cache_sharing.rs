//! Cache behaviour observed through the public service API with a
//! counting upstream defined here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nasa_explorer_lib::{
    EpicVariant, MediaType, NasaConfig, NasaService, ResponseCache, Result, Upstream,
    UpstreamRequest,
};
use serde_json::{json, Value};

#[derive(Default)]
struct CountingUpstream {
    calls: AtomicUsize,
}

#[async_trait]
impl Upstream for CountingUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "fingerprint": request.fingerprint() }))
    }
}

fn service(upstream: Arc<CountingUpstream>) -> NasaService {
    let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
    NasaService::new(upstream, cache, &NasaConfig::default())
}

#[tokio::test]
async fn clones_share_one_cache() {
    let upstream = Arc::new(CountingUpstream::default());
    let a = service(upstream.clone());
    let b = a.clone();

    let first = a.image_search("nebula", MediaType::Image, 1).await.unwrap();
    let second = b.image_search("nebula", MediaType::Image, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    assert_eq!(b.cache_stats().keys, 1);
}

#[tokio::test]
async fn parameters_partition_the_cache() {
    let upstream = Arc::new(CountingUpstream::default());
    let svc = service(upstream.clone());

    svc.image_search("nebula", MediaType::Image, 1).await.unwrap();
    svc.image_search("nebula", MediaType::Image, 2).await.unwrap();
    svc.image_search("nebula", MediaType::Video, 1).await.unwrap();
    svc.epic_images(None, EpicVariant::Natural).await.unwrap();
    svc.epic_images(None, EpicVariant::Enhanced).await.unwrap();

    assert_eq!(upstream.calls.load(Ordering::SeqCst), 5);
    assert_eq!(svc.cache_stats().keys, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_see_consistent_bodies() {
    let upstream = Arc::new(CountingUpstream::default());
    let svc = service(upstream.clone());
    svc.neo_browse(0, 20).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move { svc.neo_browse(0, 20).await }));
    }
    for handle in handles {
        let body = handle.await.unwrap().unwrap();
        assert!(body["fingerprint"].as_str().unwrap().starts_with("/neo/rest/v1/neo/browse?"));
    }

    assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    assert_eq!(svc.cache_stats().hits, 16);
}
