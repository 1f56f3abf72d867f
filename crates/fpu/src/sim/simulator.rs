//! Simulator: owns the kernel clock and the FPU side-by-side.
//!
//! Clients stay with the caller and are lent to every tick, so the FPU never holds
//! a reference into them between cycles.

use tracing::debug;

use super::clock::Clock;
use super::kernel::{Kernel, ProcessResult};
use super::trace::StorageTraceSet;
use crate::common::{ClientId, FpuError, RegAddr, SourceId};
use crate::config::FpuConfig;
use crate::fpu::Fpu;
use crate::fpu::client::{ClientPort, FpuClient};
use crate::fpu::op::FpuOp;

/// Component name the simulator gives its FPU.
pub const FPU_NAME: &str = "fpu";

/// Top-level simulator: clock + FPU.
#[derive(Debug)]
pub struct Simulator {
    /// Kernel clock.
    pub clock: Clock,
    /// The shared FPU.
    pub fpu: Fpu,
}

impl Simulator {
    /// Creates a simulator at cycle 0 with an FPU of `num_inputs` sources.
    ///
    /// # Errors
    ///
    /// Returns the configuration error reported by [`Fpu::new`].
    pub fn new(config: &FpuConfig, num_inputs: usize) -> Result<Self, FpuError> {
        let mut clock = Clock::new();
        let fpu = Fpu::new(FPU_NAME, config, num_inputs, &mut clock)?;
        Ok(Self { clock, fpu })
    }

    /// Connects a client; see [`Fpu::register_client`].
    pub fn register_client(
        &mut self,
        id: ClientId,
        client: &dyn FpuClient,
        outputs: StorageTraceSet,
    ) -> SourceId {
        self.fpu.register_client(&mut self.clock, id, client, outputs)
    }

    /// Queues an operation; see [`Fpu::queue_operation`].
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::NoCapableUnit`] when no unit implements `op`.
    pub fn queue_operation(
        &mut self,
        source: SourceId,
        op: FpuOp,
        size: usize,
        a: f64,
        b: f64,
        dest: RegAddr,
    ) -> Result<bool, FpuError> {
        self.fpu.queue_operation(source, op, size, a, b, dest)
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 {
        self.clock.cycle()
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// The FPU runs only when it is sensitive (work queued or in flight).
    ///
    /// # Returns
    ///
    /// The FPU's result, or `None` if it was not invoked.
    pub fn tick<P: ClientPort + ?Sized>(&mut self, clients: &mut P) -> Option<ProcessResult> {
        let result = self
            .fpu
            .is_sensitive()
            .then(|| self.fpu.tick(&mut self.clock, clients));
        self.clock.advance();
        result
    }

    /// Runs `cycles` cycles and returns how many of them the FPU reported as failed.
    pub fn run<P: ClientPort + ?Sized>(&mut self, clients: &mut P, cycles: u64) -> u64 {
        let mut failed = 0;
        for _ in 0..cycles {
            if self.tick(clients) == Some(ProcessResult::Failed) {
                failed += 1;
            }
        }
        failed
    }

    /// Runs until nothing is queued or in flight, for at most `max_cycles`.
    ///
    /// # Returns
    ///
    /// The number of cycles run, or `None` if the FPU was still busy at the limit.
    pub fn run_until_idle<P: ClientPort + ?Sized>(
        &mut self,
        clients: &mut P,
        max_cycles: u64,
    ) -> Option<u64> {
        for n in 0..max_cycles {
            if !self.fpu.is_sensitive() {
                debug!(target: "fpu", cycle = self.cycle(), "idle after {n} cycles");
                return Some(n);
            }
            let _ = self.tick(clients);
        }
        (!self.fpu.is_sensitive()).then_some(max_cycles)
    }
}
