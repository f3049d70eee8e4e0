//! Deterministic test doubles for the pipeline ports.
//!
//! None of these touch the network. Each double counts its calls so tests can
//! assert that a stage was (or was not) reached.

use crate::domain::model::{ExtractedVehicle, PriceEstimate};
use crate::domain::ports::{PriceResolver, Prompt, TextGenerator, VehicleExtractor};
use crate::utils::error::{ExtractionError, GenerationError, UnknownVehicleError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generator returning a fixed reply or error.
#[derive(Clone)]
pub struct StubGenerator {
    reply: Result<String, GenerationError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<Prompt>>>,
}

impl StubGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_result(Ok(reply.into()))
    }

    pub fn failing(error: GenerationError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    /// 模擬慢回應，用於逾時測試
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

/// Extractor returning a fixed vehicle or error, bypassing any model.
pub struct StubExtractor {
    result: Result<ExtractedVehicle, ExtractionError>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn returning(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_vehicle(ExtractedVehicle {
            make: make.into(),
            model: model.into(),
        })
    }

    /// 不經驗證直接回傳，可用來模擬不合規的輸出
    pub fn with_vehicle(vehicle: ExtractedVehicle) -> Self {
        Self {
            result: Ok(vehicle),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ExtractionError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VehicleExtractor for StubExtractor {
    async fn extract(
        &self,
        _title: &str,
        _description: &str,
    ) -> Result<ExtractedVehicle, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Wraps another resolver and counts calls.
pub struct CountingResolver<R: PriceResolver> {
    inner: R,
    calls: AtomicUsize,
}

impl<R: PriceResolver> CountingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<R: PriceResolver> PriceResolver for CountingResolver<R> {
    fn resolve(&self, make: &str, model: &str) -> Result<PriceEstimate, UnknownVehicleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(make, model)
    }
}
