use anyhow::Result;

/// Everything runs on one thread: ticks and user commands never overlap.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
