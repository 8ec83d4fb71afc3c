use crate::error::{Result, XmlpackError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Fixed-size worker pool. Tasks receive owned or shared-immutable input and
/// hand back a value; results always come back in input order.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `None` sizes the pool to the available parallelism.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or(0))
            .thread_name(|i| format!("xmlpack-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `f` over every input in parallel. Output `i` belongs to input `i`
    /// regardless of completion order. The first failure stops the phase and
    /// comes back as `WorkerFailure`.
    pub fn map_ordered<T, R, F>(&self, phase: &'static str, inputs: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Send + Sync,
    {
        self.pool.install(|| {
            inputs
                .into_par_iter()
                .enumerate()
                .map(|(index, input)| {
                    f(input).map_err(|e| XmlpackError::WorkerFailure {
                        phase,
                        index,
                        source: Box::new(e),
                    })
                })
                .collect()
        })
    }

    /// Runs two independent tasks on the pool and waits for both.
    pub fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        self.pool.install(|| rayon::join(a, b))
    }
}
