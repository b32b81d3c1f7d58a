//! Selection between sequential and data-parallel execution.
//!
//! Every kernel receives an [`ExecutionPolicy`] and asks it whether a given
//! amount of work should be split across the rayon thread pool. Both paths are
//! always compiled; results never depend on which one runs because every
//! output element is a pure function of its own inputs.

use rayon::prelude::*;
use std::env;
use std::str::FromStr;

/// Work units (8-byte words or records) below which adaptive execution stays sequential.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1_000_000;

/// Environment variable selecting the execution mode.
pub const EXECUTION_ENV: &str = "Z2R_EXECUTION";

/// Environment variable overriding [`DEFAULT_PARALLEL_THRESHOLD`].
pub const THRESHOLD_ENV: &str = "Z2R_PARALLEL_THRESHOLD";

/// Smallest byte chunk handed to one worker by [`ExecutionPolicy::zip_chunks_mut`].
/// It is a multiple of the kernel word size so that word boundaries survive partitioning.
const MIN_CHUNK_BYTES: usize = 8 * 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// Always run on the calling thread.
    Sequential,
    /// Always fan out over the rayon pool.
    Parallel,
    /// Fan out once the amount of work reaches `threshold`.
    Adaptive { threshold: usize },
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        ExecutionPolicy::Adaptive {
            threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ExecutionPolicy::Sequential),
            "parallel" => Ok(ExecutionPolicy::Parallel),
            "adaptive" => Ok(ExecutionPolicy::default()),
            other => Err(format!("unknown execution mode '{other}'")),
        }
    }
}

impl ExecutionPolicy {
    #[must_use]
    pub fn adaptive(threshold: usize) -> Self {
        ExecutionPolicy::Adaptive { threshold }
    }

    /// Reads [`EXECUTION_ENV`] and [`THRESHOLD_ENV`].
    ///
    /// Missing variables fall back to the default policy; malformed ones are
    /// reported with `warn!` and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(env::var(EXECUTION_ENV).ok().as_deref(), env::var(THRESHOLD_ENV).ok().as_deref())
    }

    fn from_values(mode: Option<&str>, threshold: Option<&str>) -> Self {
        let mut policy = match mode.map(str::parse::<ExecutionPolicy>) {
            None => ExecutionPolicy::default(),
            Some(Ok(policy)) => policy,
            Some(Err(message)) => {
                tracing::warn!(variable = EXECUTION_ENV, %message, "ignoring execution mode");
                ExecutionPolicy::default()
            }
        };
        if let (ExecutionPolicy::Adaptive { threshold: current }, Some(raw)) = (&mut policy, threshold) {
            match raw.trim().parse::<usize>() {
                Ok(parsed) => *current = parsed,
                Err(error) => {
                    tracing::warn!(variable = THRESHOLD_ENV, value = raw, %error, "ignoring parallel threshold");
                }
            }
        }
        policy
    }

    /// Whether `work` units should be processed in parallel.
    #[must_use]
    pub fn is_parallel(&self, work: usize) -> bool {
        let parallel = match *self {
            ExecutionPolicy::Sequential => false,
            ExecutionPolicy::Parallel => true,
            ExecutionPolicy::Adaptive { threshold } => work >= threshold,
        };
        tracing::trace!(work, parallel, "execution path");
        parallel
    }

    /// Collects `map(index)` for every index in `0..count`, in index order.
    ///
    /// `work` is the total cost estimate handed to [`is_parallel`](Self::is_parallel).
    pub fn map_indices<T, F>(&self, count: usize, work: usize, map: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if self.is_parallel(work) {
            (0..count).into_par_iter().map(map).collect()
        } else {
            (0..count).map(map).collect()
        }
    }

    /// Applies `apply(output, left, right)` to aligned chunks of three equally long buffers.
    ///
    /// The sequential path passes the whole buffers in one call. The parallel path
    /// splits them at offsets that are multiples of [`MIN_CHUNK_BYTES`].
    pub fn zip_chunks_mut<F>(&self, output: &mut [u8], left: &[u8], right: &[u8], apply: F)
    where
        F: Fn(&mut [u8], &[u8], &[u8]) + Sync + Send,
    {
        debug_assert_eq!(output.len(), left.len());
        debug_assert_eq!(output.len(), right.len());
        if output.len() > MIN_CHUNK_BYTES && self.is_parallel(output.len() / 8) {
            output
                .par_chunks_mut(MIN_CHUNK_BYTES)
                .zip(left.par_chunks(MIN_CHUNK_BYTES))
                .zip(right.par_chunks(MIN_CHUNK_BYTES))
                .for_each(|((out, left), right)| apply(out, left, right));
        } else {
            apply(output, left, right);
        }
    }

    /// Applies `apply(record_index, record)` to every `itemsize`-byte record of `buffer`.
    pub fn for_each_record_mut<F>(&self, buffer: &mut [u8], itemsize: usize, work: usize, apply: F)
    where
        F: Fn(usize, &mut [u8]) + Sync + Send,
    {
        if itemsize == 0 {
            return;
        }
        if self.is_parallel(work) {
            buffer
                .par_chunks_mut(itemsize)
                .enumerate()
                .for_each(|(index, record)| apply(index, record));
        } else {
            buffer
                .chunks_mut(itemsize)
                .enumerate()
                .for_each(|(index, record)| apply(index, record));
        }
    }
}
