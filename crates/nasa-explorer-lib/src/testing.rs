//! Test doubles for the upstream client and the cache clock.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for dependent crates.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::Clock;
use crate::error::Result;
use crate::upstream::{Upstream, UpstreamRequest};

type Responder = Box<dyn Fn(&UpstreamRequest) -> Result<Value> + Send + Sync>;

/// An [`Upstream`] that answers from a closure and records every request.
pub struct ScriptedUpstream {
    responder: Responder,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedUpstream {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&UpstreamRequest) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in arrival order.
    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Number of recorded requests to exactly `path`.
    pub fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|c| c.path() == path).count()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        (self.responder)(request)
    }
}

/// A [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().map(|n| *n).unwrap_or_else(|p| *p.into_inner())
    }
}
