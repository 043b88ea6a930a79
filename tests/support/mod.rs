#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tasktide::clock::Clock;
use tasktide::persist::{MemorySlot, StateSlot};
use tasktide::store::TaskStore;

/// Deterministic clock shared between a test and the store it drives.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Memory slot handle that stays inspectable after the store takes ownership.
#[derive(Clone, Default)]
pub struct SharedSlot(Arc<MemorySlot>);

impl SharedSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<String> {
        self.0.document()
    }
}

impl StateSlot for SharedSlot {
    fn load(&self) -> tasktide::Result<Option<String>> {
        self.0.load()
    }

    fn save(&self, json: &str) -> tasktide::Result<()> {
        self.0.save(json)
    }
}

/// Slot whose saves always fail, for exercising the fire-and-forget path.
pub struct FailingSlot;

impl StateSlot for FailingSlot {
    fn load(&self) -> tasktide::Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, _json: &str) -> tasktide::Result<()> {
        Err(std::io::Error::other("disk full").into())
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

/// Store over an in-memory slot with a manual clock starting at `base_time`.
pub fn manual_store() -> (TaskStore, ManualClock) {
    let clock = ManualClock::at(base_time());
    let store = TaskStore::with_clock(MemorySlot::new(), clock.clone());
    (store, clock)
}

/// As `manual_store`, but the slot stays inspectable from the test.
pub fn manual_store_with_slot() -> (TaskStore, ManualClock, SharedSlot) {
    let clock = ManualClock::at(base_time());
    let slot = SharedSlot::new();
    let store = TaskStore::with_clock(slot.clone(), clock.clone());
    (store, clock, slot)
}
