//! Data-fetching state machine.
//!
//! A `FetchHandle` runs an async producer, tracks its outcome as a
//! `FetchState`, and re-runs it when its dependency key changes or when the
//! consumer asks for a refetch. Each run ("cycle") takes a generation number
//! when it starts; a cycle only writes its outcome if no newer cycle has
//! started since. In-flight producers are never cancelled, their results are
//! just dropped.
//!
//! ```ignore
//! let mut handle = FetchHandle::spawn(move || api.list_products(&filter), page);
//! match handle.settled().await {
//!     FetchState::Success(list) => render(list),
//!     FetchState::Error(message) => show(message),
//!     FetchState::Loading => unreachable!(),
//! }
//! handle.set_dependencies(page + 1);
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::FetchFailure;
use crate::http::TransportError;

pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your network connection.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Observable state of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Turn a failure into the message shown to the user.
pub fn classify<E: FetchFailure + ?Sized>(err: &E) -> String {
    match err.transport() {
        Some(TransportError::Response {
            status, status_text, ..
        }) => format!("Server error: {status} - {status_text}"),
        Some(TransportError::NoResponse { .. }) => NO_RESPONSE_MESSAGE.to_string(),
        Some(TransportError::RequestConstruction { message }) => {
            format!("Error: {}", message.as_deref().unwrap_or("Unknown error occurred"))
        }
        None => err.to_string(),
    }
}

type Producer<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

fn producer<T, F, Fut, E>(fetch_fn: F) -> Producer<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: FetchFailure + Send + 'static,
    T: Send + 'static,
{
    Arc::new(move || {
        let fut = fetch_fn();
        async move {
            fut.await.map_err(|err| {
                error!(error = %err, "fetch failed");
                classify(&err)
            })
        }
        .boxed()
    })
}

struct Shared<T> {
    state: watch::Sender<FetchState<T>>,
    generation: AtomicU64,
}

impl<T> Shared<T> {
    /// Start a cycle: bump the generation and reset to `Loading` atomically.
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading;
        });
        generation
    }

    /// Apply a cycle's outcome if it is still the current cycle.
    fn settle(&self, generation: u64, next: FetchState<T>) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Make every in-flight cycle stale without touching the state.
    fn invalidate(&self) {
        self.state.send_if_modified(|_| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            false
        });
    }
}

/// Handle to a running fetch. Dropping it discards any pending results.
pub struct FetchHandle<T, D = ()> {
    producer: Producer<T>,
    dependencies: D,
    shared: Arc<Shared<T>>,
}

impl<T, D> FetchHandle<T, D>
where
    T: Clone + Send + Sync + 'static,
    D: PartialEq,
{
    /// Create the handle and start the first cycle. Must be called from
    /// within a tokio runtime.
    pub fn spawn<F, Fut, E>(fetch_fn: F, dependencies: D) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: FetchFailure + Send + 'static,
    {
        let (state, _) = watch::channel(FetchState::Loading);
        let handle = Self {
            producer: producer(fetch_fn),
            dependencies,
            shared: Arc::new(Shared {
                state,
                generation: AtomicU64::new(0),
            }),
        };
        handle.start();
        handle
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.shared.state.subscribe()
    }

    pub fn dependencies(&self) -> &D {
        &self.dependencies
    }

    /// Wait until the current state is no longer `Loading`.
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.subscribe();
        let result = rx.wait_for(|state| !state.is_loading()).await.map(|state| state.clone());
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Replace the dependency key; starts a new cycle if it changed.
    pub fn set_dependencies(&mut self, dependencies: D) -> bool {
        if self.dependencies == dependencies {
            return false;
        }
        self.dependencies = dependencies;
        self.start();
        true
    }

    /// Swap in a fresh producer alongside a dependency key, as a re-render
    /// would. The producer is always replaced; a cycle starts only if the key
    /// changed.
    pub fn update<F, Fut, E>(&mut self, fetch_fn: F, dependencies: D) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: FetchFailure + Send + 'static,
    {
        self.producer = producer(fetch_fn);
        self.set_dependencies(dependencies)
    }

    /// Run one more cycle and wait for it to finish.
    pub async fn refetch(&self) {
        if let Err(err) = self.start().await {
            error!(error = %err, "refetch task failed");
        }
    }

    fn start(&self) -> JoinHandle<()> {
        let generation = self.shared.begin();
        debug!(generation, "fetch cycle started");
        // Invoke the producer now so invocations happen in call order.
        let fut = (self.producer)();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            // Run the producer in its own task so a panic surfaces as a JoinError.
            let next = match tokio::spawn(fut).await {
                Ok(Ok(data)) => FetchState::Success(data),
                Ok(Err(message)) => FetchState::Error(message),
                Err(err) => {
                    error!(error = %err, "fetch task aborted");
                    FetchState::Error(UNKNOWN_ERROR_MESSAGE.to_string())
                }
            };
            if !shared.settle(generation, next) {
                debug!(generation, "discarding stale fetch result");
            }
        })
    }
}

impl<T, D> Drop for FetchHandle<T, D> {
    fn drop(&mut self) {
        self.shared.invalidate();
    }
}
