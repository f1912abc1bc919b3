use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The chunk length must be valid.
    #[error("chunk length must be > 0")]
    InvalidChunkLength,
}

/// Controls how independent lines of an image are scheduled.
///
/// The result of an operation never depends on the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool and process lines in parallel.
    #[default]
    ParallelLines,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Map a thread count onto a strategy: `0` uses the global pool, `1` runs serially.
    pub fn from_threads(threads: usize) -> Self {
        match threads {
            0 => ExecutionStrategy::ParallelLines,
            1 => ExecutionStrategy::Serial,
            n => ExecutionStrategy::Fixed(n),
        }
    }
}

/// Apply `op` to every disjoint chunk of `chunk_len` elements of `dst`.
///
/// `op` receives the chunk index and the mutable chunk.
///
/// # Arguments
///
/// * `dst` - The destination slice.
/// * `chunk_len` - Number of elements per chunk; the last chunk may be shorter.
/// * `strategy` - The execution strategy.
/// * `op` - The operation to perform on each chunk.
pub fn for_each_chunk<T, F>(
    dst: &mut [T],
    chunk_len: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if chunk_len == 0 {
        return Err(ParallelError::InvalidChunkLength);
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| op(i, chunk));
        }
        ExecutionStrategy::ParallelLines => {
            dst.par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| op(i, chunk));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_mut(chunk_len)
                    .enumerate()
                    .for_each(|(i, chunk)| op(i, chunk));
            });
        }
    }
    Ok(())
}
