use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cancels `cancellation` on Ctrl-C, so the session can pause the timer before exiting.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Couldn't listen for Ctrl-C {e:?}");
                return;
            }
            debug!("Received Ctrl-C");
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => (),
    };
}
