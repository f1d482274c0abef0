use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// A shared log of calls made to scripted exchanges.
///
/// Besides the order of calls, the journal tracks how many calls were in
/// flight at the same time.
#[derive(Clone, Debug, Default)]
pub struct CallJournal(Arc<Mutex<Inner>>);

impl CallJournal {
    /// Returns all recorded calls in the order they started.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Returns the largest number of calls that were in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.lock().max_in_flight
    }

    pub(crate) fn enter(&self, call: String) -> InFlightGuard {
        let mut inner = self.lock();
        inner.calls.push(call);
        inner.in_flight += 1;
        inner.max_in_flight = inner.max_in_flight.max(inner.in_flight);
        InFlightGuard(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test shouldn't hide the journal from other threads.
        self.0.lock().unwrap_or_else(|err| err.into_inner())
    }
}

pub(crate) struct InFlightGuard(CallJournal);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.lock().in_flight -= 1;
    }
}
