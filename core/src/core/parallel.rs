//! Fan-out/fan-in over a dedicated rayon pool.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Builds the worker pool. `None` lets rayon pick the thread count.
pub(crate) fn build_pool(workers: Option<usize>) -> Result<ThreadPool, ThreadPoolBuildError> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("elembench-worker-{i}"));
    if let Some(workers) = workers {
        builder = builder.num_threads(workers);
    }
    builder.build()
}

/// Runs `op` once per item on `pool` and returns when every task has finished.
///
/// No ordering between items. After the first error no new items are started,
/// and that error is returned once in-flight tasks complete.
pub(crate) fn par_exec<T, E, F>(pool: &ThreadPool, items: &[T], op: F) -> Result<(), E>
where
    T: Sync,
    E: Send,
    F: Fn(&T) -> Result<(), E> + Sync + Send,
{
    pool.install(|| items.par_iter().try_for_each(op))
}
