//! Cooperative interrupt token.
//!
//! The binary's signal handler calls [`Interrupt::trigger`]; the mutation
//! protocol marks its write-and-commit pair as a critical section so that a
//! signal arriving there is deferred instead of tearing the pair apart.
//!
//! Both sides move one shared state with compare-and-swap, so the handler
//! and the section can never both believe they own the process.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{PagOffError, Result};

const IDLE: u8 = 0;
const CRITICAL: u8 = 1;
/// A signal arrived while a critical section was running.
const DEFERRED: u8 = 2;
const INTERRUPTED: u8 = 3;

/// Shared interrupt flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    state: Arc<AtomicU8>,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interrupt.
    ///
    /// Returns `true` when no critical section is running and the process
    /// may stop right away; no section can start afterwards.
    pub fn trigger(&self) -> bool {
        let mut current = self.state.load(Ordering::SeqCst);
        loop {
            let next = match current {
                IDLE => INTERRUPTED,
                CRITICAL => DEFERRED,
                _ => return current == INTERRUPTED,
            };
            match self
                .state
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next == INTERRUPTED,
                Err(actual) => current = actual,
            }
        }
    }

    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self.state.load(Ordering::SeqCst), DEFERRED | INTERRUPTED)
    }

    /// # Errors
    ///
    /// Returns `Interrupted` once [`trigger`](Self::trigger) has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_interrupted() {
            Err(PagOffError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Run `f` with interrupts deferred.
    ///
    /// # Errors
    ///
    /// Returns `Interrupted` without running `f` if an interrupt was
    /// already recorded, otherwise whatever `f` returns.
    pub fn critical<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if self
            .state
            .compare_exchange(IDLE, CRITICAL, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PagOffError::Interrupted);
        }
        let result = f();
        if self
            .state
            .compare_exchange(CRITICAL, IDLE, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Deferred signal: from here on the next one exits at once.
            self.state.store(INTERRUPTED, Ordering::SeqCst);
        }
        result
    }
}
