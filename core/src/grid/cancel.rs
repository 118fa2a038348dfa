use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};

/// A cooperative stop flag polled by grid scans. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_cancellation(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// The process wide token used by scanners built with [`GridScanner::new`].
    ///
    /// [`GridScanner::new`]: super::GridScanner::new
    pub fn global() -> &'static CancellationToken {
        static GLOBAL: OnceLock<CancellationToken> = OnceLock::new();
        GLOBAL.get_or_init(CancellationToken::new)
    }
}

/// Ask the scan running on the process wide token to stop.
pub fn request_cancellation() {
    CancellationToken::global().request_cancellation();
}

pub fn is_cancelled() -> bool {
    CancellationToken::global().is_cancelled()
}
