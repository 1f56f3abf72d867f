//! FPU input sources.
//!
//! A source is the FPU end of one client connection: a bounded FIFO of pending
//! operations, the client it writes results back to, and the bookkeeping the
//! write-back stage needs to keep that client's results in order and collision-free.

use std::collections::VecDeque;

use super::op::Operation;
use crate::common::{ClientId, CycleNo, UnitId};
use crate::sim::trace::{StorageId, StorageTraceSet};

/// The client a source writes back to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientBinding {
    /// Handle used to reach the client through a [`ClientPort`](super::client::ClientPort).
    pub id: ClientId,
    /// Client name, captured at registration for diagnostics.
    pub name: String,
}

/// Cycle and unit of the most recent write-back to a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteMarker {
    /// Cycle of the write-back.
    pub cycle: CycleNo,
    /// Unit that performed it.
    pub unit: UnitId,
}

/// One input channel of the FPU.
#[derive(Debug)]
pub struct Source {
    inputs: VecDeque<Operation>,
    capacity: usize,
    storage: StorageId,
    client: Option<ClientBinding>,
    outputs: StorageTraceSet,
    last_write: Option<WriteMarker>,
    /// Sequence number the next admitted operation receives.
    next_issue: u64,
    /// Sequence number of the oldest admitted operation not yet fully written back.
    next_retire: u64,
}

impl Source {
    /// Creates an unconnected source.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of queued operations.
    /// * `storage` - Kernel storage id of the input queue.
    pub fn new(capacity: usize, storage: StorageId) -> Self {
        Self {
            inputs: VecDeque::with_capacity(capacity),
            capacity,
            storage,
            client: None,
            outputs: StorageTraceSet::new(),
            last_write: None,
            next_issue: 0,
            next_retire: 0,
        }
    }

    /// Connects the source to a client.
    ///
    /// # Arguments
    ///
    /// * `client` - The client results are written back to.
    /// * `outputs` - Storage traces a write-back to that client can produce.
    pub(crate) fn bind(&mut self, client: ClientBinding, outputs: StorageTraceSet) {
        debug_assert!(self.client.is_none(), "source already has a client");
        self.client = Some(client);
        self.outputs = outputs;
    }

    /// The connected client, if any.
    pub fn client(&self) -> Option<&ClientBinding> {
        self.client.as_ref()
    }

    /// Whether a client is connected.
    pub fn is_bound(&self) -> bool {
        self.client.is_some()
    }

    /// Name of the connected client, or `"not connected"`.
    pub fn client_name(&self) -> &str {
        self.client.as_ref().map_or("not connected", |c| c.name.as_str())
    }

    /// Storage traces a write-back to the client can produce.
    pub fn outputs(&self) -> &StorageTraceSet {
        &self.outputs
    }

    /// Kernel storage id of the input queue.
    pub fn storage(&self) -> StorageId {
        self.storage
    }

    /// Queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Queued operations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.inputs.iter()
    }

    /// Oldest queued operation.
    pub fn front(&self) -> Option<&Operation> {
        self.inputs.front()
    }

    /// Appends an operation.
    ///
    /// # Returns
    ///
    /// `false` if the queue is full; the operation is not queued.
    pub(crate) fn push(&mut self, op: Operation) -> bool {
        if self.inputs.len() >= self.capacity {
            return false;
        }
        self.inputs.push_back(op);
        true
    }

    /// Removes the oldest operation and assigns it the next sequence number.
    pub(crate) fn admit(&mut self) -> Option<(Operation, u64)> {
        let op = self.inputs.pop_front()?;
        let seq = self.next_issue;
        self.next_issue += 1;
        Some((op, seq))
    }

    /// Sequence number of the operation that must be written back next.
    pub fn next_retire(&self) -> u64 {
        self.next_retire
    }

    /// Number of admitted operations not yet fully written back.
    pub fn in_flight(&self) -> u64 {
        self.next_issue - self.next_retire
    }

    /// Records that the oldest in-flight operation has been fully written back.
    pub(crate) fn retire(&mut self) {
        debug_assert!(self.next_retire < self.next_issue, "retiring an unissued operation");
        self.next_retire += 1;
    }

    /// Most recent write-back marker.
    pub fn last_write(&self) -> Option<WriteMarker> {
        self.last_write
    }

    /// Unit that already wrote back to this source during `now`, if any.
    pub fn writer_at(&self, now: CycleNo) -> Option<UnitId> {
        self.last_write
            .filter(|m| m.cycle == now)
            .map(|m| m.unit)
    }

    /// Records a write-back by `unit` during `now`.
    pub(crate) fn mark_write(&mut self, now: CycleNo, unit: UnitId) {
        self.last_write = Some(WriteMarker { cycle: now, unit });
    }
}
