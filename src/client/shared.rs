use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::client::core::GenAiClient;
use crate::config::ClientConfig;
use crate::Result;

/// Lazily initialized, memoized client slot.
///
/// The first successful [`get_or_init`](Self::get_or_init) wins and every
/// later call returns the same `Arc`. A failed initialization stores nothing,
/// so the next call tries again. Concurrent first callers block until the
/// single initializer finishes.
#[derive(Debug, Default)]
pub struct ClientCell {
    cell: OnceCell<Arc<GenAiClient>>,
}

impl ClientCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_init<F>(&self, make: F) -> Result<Arc<GenAiClient>>
    where
        F: FnOnce() -> Result<GenAiClient>,
    {
        self.cell.get_or_try_init(|| make().map(Arc::new)).cloned()
    }

    /// The client, if one has been initialized.
    pub fn get(&self) -> Option<Arc<GenAiClient>> {
        self.cell.get().cloned()
    }
}

static SHARED: ClientCell = ClientCell::new();

/// Process-wide client configured from the environment.
///
/// Reserved for top-level wiring; library code should accept an injected
/// `Arc<GenAiClient>` instead.
pub fn shared() -> Result<Arc<GenAiClient>> {
    SHARED.get_or_init(|| {
        let config = ClientConfig::from_env()?;
        GenAiClient::from_config(&config)
    })
}
