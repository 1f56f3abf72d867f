//! Client interface.
//!
//! Clients (processor pipelines) are owned by the caller. The FPU keeps only a
//! [`ClientId`] per source and reaches the client objects through a
//! [`ClientPort`] lent to it for the duration of a cycle.

use crate::common::{ClientId, RegAddr};

/// Callbacks a client implements to receive results.
pub trait FpuClient {
    /// Whether the client can accept a write to `addr` this cycle.
    fn check_output_availability(&self, addr: RegAddr) -> bool;

    /// Writes one native word of a result.
    ///
    /// # Returns
    ///
    /// `false` if the write could not be accepted; the FPU retries next cycle.
    fn write_result(&mut self, addr: RegAddr, value: u64) -> bool;

    /// Name used in logs and diagnostics.
    fn name(&self) -> String;
}

/// Lookup from client handles to client objects.
pub trait ClientPort {
    /// Shared access to a client.
    fn client(&self, id: ClientId) -> Option<&dyn FpuClient>;

    /// Exclusive access to a client.
    fn client_mut(&mut self, id: ClientId) -> Option<&mut dyn FpuClient>;
}

/// Clients stored by position: `ClientId(i)` is element `i`.
impl<C: FpuClient> ClientPort for [C] {
    fn client(&self, id: ClientId) -> Option<&dyn FpuClient> {
        self.get(id.0).map(|c| c as &dyn FpuClient)
    }

    fn client_mut(&mut self, id: ClientId) -> Option<&mut dyn FpuClient> {
        self.get_mut(id.0).map(|c| c as &mut dyn FpuClient)
    }
}

impl<C: FpuClient> ClientPort for Vec<C> {
    fn client(&self, id: ClientId) -> Option<&dyn FpuClient> {
        self.as_slice().client(id)
    }

    fn client_mut(&mut self, id: ClientId) -> Option<&mut dyn FpuClient> {
        self.as_mut_slice().client_mut(id)
    }
}
