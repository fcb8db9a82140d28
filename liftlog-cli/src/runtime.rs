use anyhow::{Result, bail};
use log::debug;
use tokio::runtime::Runtime;

/// Worker count when none is configured: one per CPU, at least two.
pub fn default_worker_threads() -> usize {
    std::cmp::max(num_cpus::get(), 2)
}

pub fn build(worker_threads: Option<usize>) -> Result<Runtime> {
    let threads = match worker_threads {
        Some(0) => bail!("worker thread count must be at least 1"),
        Some(n) => n,
        None => default_worker_threads(),
    };
    debug!("Initializing runtime with {} worker threads", threads);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads)
        .enable_all()
        .build()?;
    Ok(runtime)
}
