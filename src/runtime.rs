// SPDX-License-Identifier: MPL-2.0

//! Runtime behind the `trash-transit` binary: `main` blocks on the startup
//! flow and spawns the ranking refresh alongside the feed load.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("trash-transit-async")
        .build()
        .expect("failed to create async runtime")
});

pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}

/// Run `future` next to whatever `block_on` is driving
pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(future)
}
