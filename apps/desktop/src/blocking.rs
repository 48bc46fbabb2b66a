use tokio::runtime::{Handle, RuntimeFlavor};

/// Runs a blocking call from synchronous trait code. On a multi-threaded
/// runtime the worker hands its queued tasks to another thread first; a
/// current-thread runtime cannot do that, so the call runs in place.
pub fn run_blocking<T>(call: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(call)
        }
        _ => call(),
    }
}
