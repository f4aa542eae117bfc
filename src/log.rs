//! Append-only diagnostic stream (§4/§6/§9: "log only the structural events").
//!
//! The original ships a `FILE*`-based debug stream with a large, partly
//! historical `UNUR_DEBUG_*` flag set. Per the open question in §9 we log
//! only structural events (setup complete, interval split, reinit) and skip
//! byte-level traces. Two sinks are maintained side by side: the `log` crate
//! facade (for callers who already have a subscriber installed) and a small
//! in-process ring buffer that tests and library users can inspect without
//! wiring up logging, mirroring the original's in-memory stream before it is
//! flushed.
use std::cell::RefCell;
use std::collections::VecDeque;

const MAX_RECORDS: usize = 256;

/// A single structural event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub event: Event,
    pub detail: String,
}

/// The structural event kinds this crate records. Intentionally small;
/// see the module doc for why byte-level traces are not included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SetupStart,
    SetupComplete,
    SetupFailed,
    IntervalSplit,
    Reinit,
}

thread_local! {
    static RECORDS: RefCell<VecDeque<Record>> = RefCell::new(VecDeque::with_capacity(MAX_RECORDS));
}

/// Append a structural event to the diagnostic stream, and forward it to
/// the `log` facade at `debug` level.
pub fn record(event: Event, detail: impl Into<String>) {
    let detail = detail.into();
    #[cfg(feature = "logging")]
    log::debug!("{:?}: {}", event, detail);
    RECORDS.with(|buf| {
        let mut buf = buf.borrow_mut();
        if buf.len() == MAX_RECORDS {
            buf.pop_front();
        }
        buf.push_back(Record {
            event,
            detail,
        });
    });
}

/// Snapshot of the most recent structural events on this thread, oldest
/// first.
pub fn recent() -> Vec<Record> {
    RECORDS.with(|buf| buf.borrow().iter().cloned().collect())
}

/// Clear the in-process diagnostic buffer (tests use this to isolate runs).
pub fn clear() {
    RECORDS.with(|buf| buf.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_fifo_bounded() {
        clear();
        for i in 0..(MAX_RECORDS + 10) {
            record(Event::IntervalSplit, format!("split {}", i));
        }
        let recs = recent();
        assert_eq!(recs.len(), MAX_RECORDS);
        assert_eq!(recs.last().unwrap().detail, format!("split {}", MAX_RECORDS + 9));
    }
}
