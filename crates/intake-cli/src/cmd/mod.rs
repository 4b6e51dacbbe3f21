pub mod ask;
pub mod browse;
pub mod chat;
pub mod config;
pub mod form;
pub mod thread;

use anyhow::Context;
use intake_core::attachment::AttachmentDescriptor;
use intake_core::scheduler::schedule;
use std::path::PathBuf;
use std::time::Duration;

/// Read descriptors for files named on the command line.
pub fn load_attachments(paths: &[PathBuf]) -> anyhow::Result<Vec<AttachmentDescriptor>> {
    paths
        .iter()
        .map(|p| {
            AttachmentDescriptor::from_path(p)
                .with_context(|| format!("cannot attach {}", p.display()))
        })
        .collect()
}

pub fn reply_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")
}

/// Run `f` after `delay` and block until it finishes. A panicking `f`
/// comes back as an error for the caller to resolve its placeholder with.
pub fn run_deferred<T, F>(
    runtime: &tokio::runtime::Runtime,
    delay: Duration,
    f: F,
) -> intake_core::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    runtime.block_on(async move { schedule(delay, f).wait().await })
}
