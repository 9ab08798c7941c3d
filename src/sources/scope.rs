use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Lifetime of a view that started async loads
///
/// Results of a fetch run through [`ViewScope::run`] are dropped once the
/// scope is torn down, even if the fetch itself already finished.
#[derive(Debug, Clone)]
pub struct ViewScope {
    live: Arc<watch::Sender<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (live, _) = watch::channel(true);
        Self {
            live: Arc::new(live),
        }
    }

    pub fn is_live(&self) -> bool {
        *self.live.borrow()
    }

    /// Mark the view as gone; pending and future runs yield `None`
    pub fn teardown(&self) {
        self.live.send_replace(false);
        debug!("View scope torn down");
    }

    /// Drive `fetch` unless the scope is torn down first
    pub async fn run<F: Future>(&self, fetch: F) -> Option<F::Output> {
        let mut watcher = self.live.subscribe();
        if !self.is_live() {
            return None;
        }

        tokio::select! {
            output = fetch => self.is_live().then_some(output),
            _ = watcher.wait_for(|live| !*live) => {
                debug!("Discarding fetch started by a torn-down view");
                None
            }
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}
