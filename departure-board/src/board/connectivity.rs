//! Browser-reported network availability.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Network availability as last reported by the browser.
///
/// Starts online. Background refresh is skipped while offline.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}
