//! Cancellable fetch tasks
//!
//! One navigation is one spawned task. The task races the fetch against a
//! cancellation token and delivers the outcome over a bounded channel; the
//! view drains the channel from its event loop. Cancelling (or dropping) the
//! handle makes a superseded navigation disappear without a trace instead of
//! racing a fresh one for the active document.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::HttpClient;
use crate::error::NetResult;
use crate::response::Response;

/// Handle to an in-flight fetch task
pub struct FetchHandle {
    receiver: mpsc::Receiver<NetResult<Response>>,
    cancel: CancellationToken,
}

impl FetchHandle {
    /// Take the outcome if the task has finished, without blocking
    pub fn try_recv(&mut self) -> Option<NetResult<Response>> {
        self.receiver.try_recv().ok()
    }

    /// Cancel the task; a cancelled task never delivers an outcome
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for FetchHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a fetch for `url`, returning the handle to poll
pub fn spawn_fetch(client: HttpClient, url: Url) -> FetchHandle {
    let (tx, receiver) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        let result = tokio::select! {
            // Check cancellation first so a superseded fetch that is already
            // complete still delivers nothing.
            biased;
            _ = token.cancelled() => {
                log::debug!("Fetch cancelled: {}", url);
                return;
            }
            result = client.fetch(&url) => result,
        };
        let _ = tx.send(result).await;
    });

    FetchHandle { receiver, cancel }
}
