// SPDX-License-Identifier: MIT

//!
//! Cooperative cancellation of grid generation
//!

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared flag that a running generation checks between months.  Clones
/// share the same flag, so the requester keeps one clone and hands the other
/// to the background task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let handed_out = token.clone();
        assert!(!handed_out.is_cancelled());
        token.cancel();
        assert!(handed_out.is_cancelled());

        // A fresh token is independent
        assert!(!CancellationToken::new().is_cancelled());
    }
}
