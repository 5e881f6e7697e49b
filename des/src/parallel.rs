//! Parallel execution of independent EventLoop replications
//!
//! Each replication builds its own [`EventLoop`] from a scenario id, runs it
//! to the requested horizon and returns the stats of every agent. Results come
//! back in scenario id order regardless of which thread finished first.
//!
//! # Determinism
//!
//! Results are reproducible when the builder derives every seed from the
//! scenario id and replications share no mutable state.
//!
//! # Failure isolation
//!
//! A panic inside one replication is caught and reported as
//! [`ParallelError::Panicked`]; the other replications still complete.

use crate::EventLoop;
use rayon::prelude::*;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParallelError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error("scenario {scenario} panicked: {message}")]
    Panicked { scenario: usize, message: String },
}

pub type ScenarioResult<S> = Result<Vec<S>, ParallelError>;

type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Runs `num_scenarios` event loops concurrently
///
/// ```rust
/// use des::parallel::ParallelRunner;
/// # use des::{Agent, EventLoop};
/// # struct Counter;
/// # impl Agent<u8, u8> for Counter {
/// #     fn stats(&self) -> u8 { 1 }
/// # }
///
/// let results = ParallelRunner::new(4, |_scenario_id| {
///     let agents: Vec<Box<dyn Agent<u8, u8>>> = vec![Box::new(Counter)];
///     EventLoop::new(vec![(0, 1)], agents)
/// })
/// .num_threads(2)
/// .run(10)
/// .unwrap();
///
/// assert_eq!(results.len(), 4);
/// ```
pub struct ParallelRunner<T, S, F>
where
    F: Fn(usize) -> EventLoop<T, S> + Send + Sync,
    S: Send,
{
    num_scenarios: usize,
    builder: F,
    num_threads: Option<usize>,
    progress_callback: Option<ProgressFn>,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T, S, F> ParallelRunner<T, S, F>
where
    F: Fn(usize) -> EventLoop<T, S> + Send + Sync,
    S: Send,
{
    pub fn new(num_scenarios: usize, builder: F) -> Self {
        ParallelRunner {
            num_scenarios,
            builder,
            num_threads: None,
            progress_callback: None,
            _marker: PhantomData,
        }
    }

    /// Use a dedicated pool of `n` threads instead of rayon's global pool
    pub fn num_threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Called with `(completed, total)` each time a replication finishes
    pub fn progress<P>(mut self, callback: P) -> Self
    where
        P: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Run every replication to `run_until` and collect the results in order
    pub fn run(self, run_until: usize) -> Result<Vec<ScenarioResult<S>>, ParallelError> {
        let completed = AtomicUsize::new(0);

        let execute = || {
            (0..self.num_scenarios)
                .into_par_iter()
                .map(|scenario| {
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        let mut event_loop = (self.builder)(scenario);
                        event_loop.run(run_until);
                        event_loop.stats()
                    }));

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(callback) = &self.progress_callback {
                        callback(done, self.num_scenarios);
                    }

                    result.map_err(|panic| ParallelError::Panicked {
                        scenario,
                        message: panic_message(panic.as_ref()),
                    })
                })
                .collect()
        };

        match self.num_threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::ThreadPool(e.to_string()))?;
                Ok(pool.install(execute))
            }
            None => Ok(execute()),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run replications on the global pool
pub fn run_parallel<T, S, F>(
    num_scenarios: usize,
    builder: F,
    run_until: usize,
) -> Result<Vec<ScenarioResult<S>>, ParallelError>
where
    F: Fn(usize) -> EventLoop<T, S> + Send + Sync,
    S: Send,
{
    ParallelRunner::new(num_scenarios, builder).run(run_until)
}

/// Progress callback that logs every `interval` completed replications
pub fn tracing_progress_reporter(interval: usize) -> impl Fn(usize, usize) + Send + Sync {
    let interval = interval.max(1);
    move |completed, total| {
        if completed % interval == 0 || completed == total {
            tracing::info!(completed, total, "replications finished");
        }
    }
}
