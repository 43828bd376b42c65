//! Bounded pool of working states.
use {
    crate::config::MAX_POOLED_STATE_SIZE,
    core::ops::{Deref, DerefMut},
    crossbeam::queue::ArrayQueue,
    tracing::trace,
};

/// A working state that can be reused across calls.
pub(crate) trait Pooled {
    /// Forget everything left over from the previous call.
    fn reset(&mut self);

    /// Bytes retained by the state's buffers.
    fn footprint(&self) -> usize;
}

pub(crate) struct Pool<S> {
    /// `None` when pooling is disabled.
    idle: Option<ArrayQueue<S>>,
}

impl<S: Pooled> Pool<S> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            idle: (capacity > 0).then(|| ArrayQueue::new(capacity)),
        }
    }

    /// Hand out a reset state, reusing an idle one when available.
    pub(crate) fn acquire(&self, init: impl FnOnce() -> S) -> PoolGuard<'_, S> {
        let state = match self.idle.as_ref().and_then(ArrayQueue::pop) {
            Some(mut state) => {
                state.reset();
                state
            }
            None => init(),
        };
        PoolGuard {
            pool: self,
            state: Some(state),
        }
    }

    fn release(&self, state: S) {
        let footprint = state.footprint();
        if footprint > MAX_POOLED_STATE_SIZE {
            trace!(footprint, "dropping oversized working state");
            return;
        }
        if let Some(idle) = &self.idle {
            // A full pool drops the state.
            let _ = idle.push(state);
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.idle.as_ref().map_or(0, ArrayQueue::len)
    }
}

/// Sole ownership of a pooled state for the duration of one call.
///
/// The state goes back to its pool when the guard is dropped.
pub(crate) struct PoolGuard<'a, S: Pooled> {
    pool: &'a Pool<S>,
    /// Taken only by `drop`.
    state: Option<S>,
}

impl<S: Pooled> Deref for PoolGuard<'_, S> {
    type Target = S;

    #[inline]
    fn deref(&self) -> &S {
        self.state.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<S: Pooled> DerefMut for PoolGuard<'_, S> {
    #[inline]
    fn deref_mut(&mut self) -> &mut S {
        self.state.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<S: Pooled> Drop for PoolGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            self.pool.release(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scratch(Vec<u8>);

    impl Pooled for Scratch {
        fn reset(&mut self) {
            self.0.clear();
        }

        fn footprint(&self) -> usize {
            self.0.capacity()
        }
    }

    #[test]
    fn reuses_and_resets() {
        let pool = Pool::new(2);
        {
            let mut state = pool.acquire(|| Scratch(Vec::with_capacity(8)));
            state.0.extend_from_slice(b"abc");
        }
        assert_eq!(pool.idle(), 1);
        let state = pool.acquire(|| Scratch(Vec::new()));
        assert!(state.0.is_empty());
        assert!(state.0.capacity() >= 8);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn oversized_states_are_dropped() {
        let pool = Pool::new(2);
        drop(pool.acquire(|| Scratch(Vec::with_capacity(MAX_POOLED_STATE_SIZE + 1))));
        assert_eq!(pool.idle(), 0);
        drop(pool.acquire(|| Scratch(Vec::with_capacity(MAX_POOLED_STATE_SIZE / 2))));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn unwinding_returns_the_state() {
        let pool = Pool::new(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut state = pool.acquire(|| Scratch(Vec::new()));
            state.0.push(1);
            panic!("leaf transform panicked");
        }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
        assert!(pool.acquire(|| Scratch(Vec::new())).0.is_empty());
    }

    #[test]
    fn bounded_and_disableable() {
        let pool = Pool::new(1);
        let a = pool.acquire(|| Scratch(Vec::new()));
        let b = pool.acquire(|| Scratch(Vec::new()));
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);

        let pool = Pool::new(0);
        drop(pool.acquire(|| Scratch(Vec::new())));
        assert_eq!(pool.idle(), 0);
    }
}
