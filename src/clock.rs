//! An injectable "now" source (`SPEC_FULL.md` §4.11), so the peer timeout
//! and the log rate-limiter can be driven by virtual time in tests instead
//! of sleeping for real.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock tests can advance by hand. Cloning shares the same counter, so a
/// test can hold one handle to advance time and hand another to the code
/// under test.
#[derive(Clone)]
pub struct FakeClock {
    inner: Rc<RefCell<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        FakeClock { inner: Rc::new(RefCell::new(Instant::now())) }
    }

    pub fn advance(&self, by: Duration) {
        let mut instant = self.inner.borrow_mut();
        *instant += by;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.inner.borrow()
    }
}
