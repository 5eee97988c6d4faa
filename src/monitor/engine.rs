//! Polling change-detection loop shared by every monitor variant
//!
//! A [`Monitor`] pairs an [`ElementShape`] with an [`Addressing`] mode.
//! Each cycle resolves the effective address, reads every element, compares
//! it with the snapshot, and emits one event per element that differs.
//!
//! The snapshot starts zero-filled, so the first cycle reports any location
//! that is not all zeros. Swapping the address keeps the snapshot, so the
//! first cycle at a new address is compared with what the old one held.
//!
//! `start`, `stop` and `set_new_address` take `&self` and are safe to call
//! from any thread, but concurrent calls on one monitor are not ordered
//! with respect to each other; callers that need ordering serialize them.

use super::cancel::CancellationToken;
use super::event::{SubscriberRegistry, SubscriptionId};
use super::shape::{Array, ElementShape, Region, Value};
use crate::core::types::{Address, MemoryResult, MemoryType, Offset};
use crate::memory::{MemoryIO, PlatformBackend, RawMemory};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Interval used when the caller does not choose one
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(10);

/// How the stored address leads to the monitored location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// The stored address is the location
    Direct,
    /// The stored address holds a pointer; the location is that pointer
    /// plus `offset`, re-read every cycle
    Pointer { offset: Offset },
}

/// Polling monitor over one location in a target process
pub struct Monitor<S: ElementShape, B: RawMemory = PlatformBackend> {
    io: Arc<MemoryIO<B>>,
    shape: S,
    addressing: Addressing,
    address: AtomicUsize,
    interval: Duration,
    running: AtomicBool,
    generation: AtomicU64,
    snapshot: Mutex<Vec<u8>>,
    subscribers: SubscriberRegistry<S::Event>,
}

/// Raw byte region monitor
pub type RegionMonitor<B = PlatformBackend> = Monitor<Region, B>;
/// Single typed value monitor
pub type ValueMonitor<T, B = PlatformBackend> = Monitor<Value<T>, B>;
/// Typed array monitor
pub type ArrayMonitor<T, B = PlatformBackend> = Monitor<Array<T>, B>;

impl<S: ElementShape, B: RawMemory> Monitor<S, B> {
    /// Builds a stopped monitor with a zero-filled snapshot
    pub fn with_shape(
        io: Arc<MemoryIO<B>>,
        shape: S,
        addressing: Addressing,
        address: Address,
        interval: Duration,
    ) -> Self {
        let snapshot = vec![0u8; shape.byte_len()];
        Monitor {
            io,
            shape,
            addressing,
            address: AtomicUsize::new(address.as_usize()),
            interval,
            running: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            snapshot: Mutex::new(snapshot),
            subscribers: SubscriberRegistry::new(),
        }
    }

    // ---- control ----

    /// Polls on the calling thread until stopped.
    ///
    /// Returns immediately if the monitor is already running. Also returns,
    /// after moving to Stopped, once the stored address is null. A panicking
    /// subscriber unwinds out of here and leaves the monitor Stopped.
    pub fn start(&self) {
        let Some(run) = self.begin() else {
            return;
        };

        while self.is_current(run.generation) && !self.address().is_null() {
            self.poll();
            std::thread::sleep(self.interval);
        }
    }

    /// Polls as an async task until stopped or `cancel` fires.
    ///
    /// Cancellation is observed once per cycle, right before and during the
    /// interval delay, and ends the loop like [`stop`](Self::stop) would.
    /// Dropping the future (timeout, abort, runtime shutdown) also leaves
    /// the monitor Stopped.
    pub async fn start_async(&self, cancel: CancellationToken) {
        let Some(run) = self.begin() else {
            return;
        };

        while self.is_current(run.generation) && !self.address().is_null() {
            self.poll();

            if cancel.is_cancelled() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }
    }

    /// Requests the loop to end after its current cycle. Idempotent.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!(address = %self.address(), "Monitor stop requested");
        }
    }

    /// Replaces the stored address (the pointer cell for pointer modes).
    /// The snapshot is left as is.
    pub fn set_new_address(&self, address: Address) {
        let previous = Address::new(self.address.swap(address.as_usize(), Ordering::SeqCst));
        debug!(%previous, current = %address, "Monitor address changed");
    }

    /// Stops the loop and detaches every subscriber. Safe to repeat.
    pub fn dispose(&self) {
        self.stop();
        self.subscribers.clear();
    }

    // ---- subscriptions ----

    /// Registers a callback run on the polling thread for every change
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&S::Event) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Streams every change into an unbounded channel
    pub fn subscribe_channel(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<S::Event>) {
        self.subscribers.subscribe_channel()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ---- inspection ----

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The stored address (pointer cell address for pointer modes)
    pub fn address(&self) -> Address {
        Address::new(self.address.load(Ordering::SeqCst))
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn polling_interval(&self) -> Duration {
        self.interval
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    pub fn io(&self) -> &Arc<MemoryIO<B>> {
        &self.io
    }

    /// Copy of the last observed bytes
    pub fn snapshot(&self) -> Vec<u8> {
        self.snapshot.lock().clone()
    }

    // ---- cycle ----

    /// Runs one read/compare/emit cycle regardless of the running state
    pub fn poll(&self) {
        let Some(base) = self.effective_address() else {
            return;
        };

        let size = self.shape.element_size();
        let reads: Vec<Vec<u8>> = (0..self.shape.element_count())
            .map(|index| self.io.read_bytes(base.element(index, size), size))
            .collect();

        let mut events = Vec::new();
        {
            // held for compare and copy only, never across target I/O
            let mut snapshot = self.snapshot.lock();
            for (index, current) in reads.iter().enumerate() {
                let previous = &mut snapshot[index * size..(index + 1) * size];
                if previous != current.as_slice() {
                    previous.copy_from_slice(current);
                    trace!(%base, index, bytes = %hex::encode(current), "Memory changed");
                    events.push(self.shape.change(base, index, current));
                }
            }
        }

        for event in &events {
            self.subscribers.notify(event);
        }
    }

    /// Where this cycle reads, or `None` when the location is unresolved
    fn effective_address(&self) -> Option<Address> {
        let stored = self.address();
        if stored.is_null() {
            return None;
        }

        let effective = match self.addressing {
            Addressing::Direct => stored,
            Addressing::Pointer { offset } => {
                let pointer = self.io.read_pointer(stored);
                if pointer.is_null() {
                    return None;
                }
                pointer.offset(offset)
            }
        };

        (!effective.is_null()).then_some(effective)
    }

    fn begin(&self) -> Option<RunGuard<'_, S, B>> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            address = %self.address(),
            addressing = ?self.addressing,
            interval_ms = self.interval.as_millis() as u64,
            "Monitor started"
        );
        Some(RunGuard {
            monitor: self,
            generation,
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_running() && self.generation.load(Ordering::SeqCst) == generation
    }

    fn finish(&self, generation: u64) {
        // a newer start() owns the running flag now
        if self.generation.load(Ordering::SeqCst) == generation {
            self.running.store(false, Ordering::SeqCst);
        }
        debug!(address = %self.address(), "Monitor stopped");
    }
}

/// Ends one run of the loop however it exits: normal return, panic, or a
/// dropped future
struct RunGuard<'a, S: ElementShape, B: RawMemory> {
    monitor: &'a Monitor<S, B>,
    generation: u64,
}

impl<S: ElementShape, B: RawMemory> Drop for RunGuard<'_, S, B> {
    fn drop(&mut self) {
        self.monitor.finish(self.generation);
    }
}

impl<S: ElementShape, B: RawMemory> Drop for Monitor<S, B> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: ElementShape + std::fmt::Debug, B: RawMemory> std::fmt::Debug for Monitor<S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("shape", &self.shape)
            .field("addressing", &self.addressing)
            .field("address", &self.address())
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<B: RawMemory> Monitor<Region, B> {
    /// Watches `size` bytes at `address`
    pub fn region(
        io: Arc<MemoryIO<B>>,
        address: Address,
        size: usize,
        interval: Duration,
    ) -> MemoryResult<Self> {
        let shape = Region::new(size)?;
        Ok(Self::with_shape(io, shape, Addressing::Direct, address, interval))
    }

    /// Watches `size` bytes at `*pointer + offset`
    pub fn region_from_pointer(
        io: Arc<MemoryIO<B>>,
        pointer: Address,
        size: usize,
        offset: Offset,
        interval: Duration,
    ) -> MemoryResult<Self> {
        let shape = Region::new(size)?;
        Ok(Self::with_shape(io, shape, Addressing::Pointer { offset }, pointer, interval))
    }
}

impl<T: MemoryType, B: RawMemory> Monitor<Value<T>, B> {
    /// Watches one `T` at `address`
    pub fn value(io: Arc<MemoryIO<B>>, address: Address, interval: Duration) -> MemoryResult<Self> {
        let shape = Value::new()?;
        Ok(Self::with_shape(io, shape, Addressing::Direct, address, interval))
    }

    /// Watches one `T` at `*pointer + offset`
    pub fn value_from_pointer(
        io: Arc<MemoryIO<B>>,
        pointer: Address,
        offset: Offset,
        interval: Duration,
    ) -> MemoryResult<Self> {
        let shape = Value::new()?;
        Ok(Self::with_shape(io, shape, Addressing::Pointer { offset }, pointer, interval))
    }
}

impl<T: MemoryType, B: RawMemory> Monitor<Array<T>, B> {
    /// Watches `length` consecutive `T` at `address`
    pub fn array(
        io: Arc<MemoryIO<B>>,
        address: Address,
        length: usize,
        interval: Duration,
    ) -> MemoryResult<Self> {
        let shape = Array::new(length)?;
        Ok(Self::with_shape(io, shape, Addressing::Direct, address, interval))
    }

    /// Watches `length` consecutive `T` at `*pointer + offset`
    pub fn array_from_pointer(
        io: Arc<MemoryIO<B>>,
        pointer: Address,
        length: usize,
        offset: Offset,
        interval: Duration,
    ) -> MemoryResult<Self> {
        let shape = Array::new(length)?;
        Ok(Self::with_shape(io, shape, Addressing::Pointer { offset }, pointer, interval))
    }
}
