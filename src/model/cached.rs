//! Thread-safe, lazily-computed, destroyable model cache.
//!
//! Wraps a [`ModelFactory`] so the model is built at most once per
//! generation, no matter how many threads ask for it concurrently:
//! callers arriving while a build is in flight block until that build's
//! outcome and receive the same model (or the same failure). A failed
//! build never poisons the cache - the handle resets and the next
//! `create()` retries from scratch.
//!
//! Around the base factory each build composes, in order: the "before"
//! lifecycle notification, the fallback factory, the ordered model
//! transforms, dev-mode authorization of the produced model's resource
//! URIs, the "after" notification, and build-duration recording.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::transform::{self, ModelTransform};
use super::{BundleModel, ModelError, ModelFactory};
use crate::auth::ResourceAuthorizer;
use crate::debug;
use crate::lifecycle::CallbackRegistry;

// ============================================================================
// cell state
// ============================================================================

enum CellState {
    /// No model cached; the next `create()` starts a build.
    Empty,
    /// A build is in flight; `attempt` identifies it for its waiters.
    Building { attempt: u64 },
    /// A model is published.
    Ready(Arc<BundleModel>),
}

struct Cell {
    state: CellState,
    /// Failure of the most recently settled attempt, so its waiters
    /// receive that exact error instead of retrying themselves.
    failure: Option<(u64, ModelError)>,
    next_attempt: u64,
}

// ============================================================================
// CachedModelFactory
// ============================================================================

pub struct CachedModelFactory {
    factory: Box<dyn ModelFactory>,
    fallback: Option<Box<dyn ModelFactory>>,
    transforms: Vec<ModelTransform>,
    callbacks: Arc<CallbackRegistry>,
    authorizer: Arc<ResourceAuthorizer>,
    dev: bool,
    cell: Mutex<Cell>,
    settled: Condvar,
    last_duration: Mutex<Option<Duration>>,
}

impl CachedModelFactory {
    pub fn new(
        factory: Box<dyn ModelFactory>,
        callbacks: Arc<CallbackRegistry>,
        authorizer: Arc<ResourceAuthorizer>,
        dev: bool,
    ) -> Self {
        Self {
            factory,
            fallback: None,
            transforms: Vec::new(),
            callbacks,
            authorizer,
            dev,
            cell: Mutex::new(Cell {
                state: CellState::Empty,
                failure: None,
                next_attempt: 0,
            }),
            settled: Condvar::new(),
            last_duration: Mutex::new(None),
        }
    }

    /// Secondary factory tried when the primary build fails.
    pub fn with_fallback(mut self, fallback: Box<dyn ModelFactory>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Append a model transform, applied in registration order.
    pub fn with_transform(mut self, transform: ModelTransform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Duration of the most recent completed build, for diagnostics.
    pub fn last_build_duration(&self) -> Option<Duration> {
        *self.last_duration.lock()
    }

    // ========================================================================
    // create / destroy
    // ========================================================================

    /// Get the cached model, building it if necessary. Idempotent while
    /// cached; concurrent callers during a build all receive that build's
    /// outcome.
    pub fn create(&self) -> Result<Arc<BundleModel>, ModelError> {
        let mut cell = self.cell.lock();
        loop {
            match &cell.state {
                CellState::Ready(model) => return Ok(Arc::clone(model)),

                CellState::Building { attempt } => {
                    let waiting_on = *attempt;
                    self.settled.wait(&mut cell);
                    if let Some((attempt, error)) = &cell.failure
                        && *attempt == waiting_on
                    {
                        return Err(error.clone());
                    }
                    // Ready, destroyed, or a newer attempt - re-examine.
                }

                CellState::Empty => {
                    let attempt = cell.next_attempt;
                    cell.next_attempt += 1;
                    cell.state = CellState::Building { attempt };
                    drop(cell);

                    // Build without holding the lock; only this thread may
                    // move the cell out of Building.
                    let result = self.build();

                    cell = self.cell.lock();
                    return match result {
                        Ok(model) => {
                            cell.state = CellState::Ready(Arc::clone(&model));
                            cell.failure = None;
                            self.settled.notify_all();
                            Ok(model)
                        }
                        Err(error) => {
                            cell.state = CellState::Empty;
                            cell.failure = Some((attempt, error.clone()));
                            self.settled.notify_all();
                            Err(error)
                        }
                    };
                }
            }
        }
    }

    /// Invalidate the cache and clear the authorization set. Idempotent;
    /// callable from any state. Serialized with an in-flight build: waits
    /// for it to settle, then discards its result.
    pub fn destroy(&self) {
        let mut cell = self.cell.lock();
        while matches!(cell.state, CellState::Building { .. }) {
            self.settled.wait(&mut cell);
        }
        cell.state = CellState::Empty;
        cell.failure = None;
        // The wipe must not land after a subsequent build has authorized
        // and published; clearing under the cell lock makes the reset and
        // the wipe one step with respect to `create()`.
        self.authorizer.clear();
        drop(cell);

        self.factory.destroy();
        if let Some(fallback) = &self.fallback {
            fallback.destroy();
        }
    }

    // ========================================================================
    // build sequence
    // ========================================================================

    fn build(&self) -> Result<Arc<BundleModel>, ModelError> {
        self.callbacks.on_before_model_created();
        let started = Instant::now();

        let result = self.build_model();

        // Authorization must be visible before any waiter can observe the
        // published model.
        if self.dev
            && let Ok(model) = &result
        {
            for resource in model.all_resources() {
                self.authorizer.add(resource.uri());
            }
        }

        self.callbacks.on_after_model_created();

        let elapsed = started.elapsed();
        *self.last_duration.lock() = Some(elapsed);
        debug!("model"; "model build settled in {:.2?}", elapsed);

        result
    }

    fn build_model(&self) -> Result<Arc<BundleModel>, ModelError> {
        let model = match self.factory.create() {
            Ok(model) => model,
            Err(primary) => match &self.fallback {
                Some(fallback) => match fallback.create() {
                    Ok(model) => model,
                    Err(secondary) => {
                        debug!("model"; "fallback factory also failed: {}", secondary);
                        return Err(primary);
                    }
                },
                None => return Err(primary),
            },
        };
        transform::apply(&self.transforms, model).map(Arc::new)
    }
}

// ============================================================================
// tests
// ============================================================================
