//! Shared Floating-Point Unit.
//!
//! The FPU executes floating-point operations on behalf of several clients and
//! writes the results back into the client's registers asynchronously. It is made
//! of:
//! - [`source`]: one bounded input queue per client,
//! - [`unit`]: fixed-latency execution pipes,
//! - [`mapping`]: the static routing from operation kind to unit,
//! - [`engine`]: the per-cycle plan/apply scheduler,
//! - [`codec`]: value/word conversion for write-back,
//! - [`inspect`]: read-only diagnostics.

/// Value/bit conversion at the native integer width.
pub mod codec;

/// Client callback interface and client lookup.
pub mod client;

/// Per-cycle scheduling: the decision phase and the commit phase.
pub mod engine;

/// Diagnostic dump of queues and pipes.
pub mod inspect;

/// Operation-kind to unit routing table.
pub mod mapping;

/// Operation kinds and queued operations.
pub mod op;

/// Input sources.
pub mod source;

/// Execution units and in-flight slots.
pub mod unit;

use tracing::debug;

use self::client::{ClientPort, FpuClient};
use self::codec::FloatCodec;
use self::mapping::UnitMapping;
use self::op::{FpuOp, Operation};
use self::source::{ClientBinding, Source};
use self::unit::Unit;
use crate::common::{ClientId, CycleNo, FpuError, RegAddr, SourceId, UnitId};
use crate::config::FpuConfig;
use crate::sim::kernel::{Kernel, ProcessResult};
use crate::sim::trace::{StorageId, StorageTraceSet, output_permutation};
use crate::stats::FpuStats;

/// The shared floating-point unit.
#[derive(Debug)]
pub struct Fpu {
    name: String,
    process: String,
    codec: FloatCodec,
    sources: Vec<Source>,
    units: Vec<Unit>,
    mapping: UnitMapping,
    /// Source the next admission pass starts from.
    last_source: usize,
    /// Last cycle a plan was committed for.
    committed: Option<CycleNo>,
    active: bool,
    active_storage: StorageId,
    traces: StorageTraceSet,
    stats: FpuStats,
}

impl Fpu {
    /// Builds an FPU with `num_inputs` unconnected sources.
    ///
    /// Registers the active flag and every input queue as kernel storage and
    /// declares the initial storage traces of the pipeline process.
    ///
    /// # Arguments
    ///
    /// * `name` - Component name; storages and the process are named after it.
    /// * `config` - Unit and queue configuration.
    /// * `num_inputs` - Number of sources (clients that may connect).
    /// * `kernel` - Kernel to register storage with.
    ///
    /// # Errors
    ///
    /// Any error [`FpuConfig::validate`] reports.
    pub fn new(
        name: &str,
        config: &FpuConfig,
        num_inputs: usize,
        kernel: &mut dyn Kernel,
    ) -> Result<Self, FpuError> {
        config.validate()?;

        let unit_ops: Vec<Vec<FpuOp>> = config
            .units
            .iter()
            .enumerate()
            .map(|(i, u)| u.operations(i))
            .collect();
        let mapping = UnitMapping::from_units(&unit_ops);
        let units = config
            .units
            .iter()
            .zip(unit_ops)
            .map(|(u, ops)| Unit::new(u.latency, u.pipelined, ops))
            .collect();

        let active_storage = kernel.allocate_storage(&format!("{name}.active"));
        let sources = (0..num_inputs)
            .map(|i| {
                let storage = kernel.allocate_storage(&format!("{name}.source{i}.inputs"));
                Source::new(config.input_queue_size, storage)
            })
            .collect();

        let process = format!("{name}.pipeline");
        let traces = pipeline_traces(&[], active_storage);
        kernel.declare_storage_traces(&process, traces.clone());

        Ok(Self {
            name: name.to_owned(),
            process,
            codec: FloatCodec::new(config.integer_bytes, config.big_endian),
            sources,
            units,
            mapping,
            last_source: 0,
            committed: None,
            active: false,
            active_storage,
            traces,
            stats: FpuStats::default(),
        })
    }

    /// Connects a client to the first free source.
    ///
    /// Recomputes the storage traces of the pipeline process for the enlarged
    /// set of sources and declares them to the kernel.
    ///
    /// # Arguments
    ///
    /// * `kernel` - Kernel that receives the new trace declaration.
    /// * `id` - Handle the client will be looked up by during write-back.
    /// * `client` - The client; only its name is captured.
    /// * `outputs` - Storage traces a write-back to this client produces.
    ///
    /// # Panics
    ///
    /// Panics if every source already has a client.
    pub fn register_client(
        &mut self,
        kernel: &mut dyn Kernel,
        id: ClientId,
        client: &dyn FpuClient,
        outputs: StorageTraceSet,
    ) -> SourceId {
        let name = client.name();
        let Some(index) = self.sources.iter().position(|s| !s.is_bound()) else {
            panic!("{}: no free source for client {name}", self.name);
        };
        debug!(target: "fpu", fpu = %self.name, client = %name, source = index, "registered client");
        self.sources[index].bind(ClientBinding { id, name }, outputs);

        let outputs: Vec<StorageTraceSet> = self
            .sources
            .iter()
            .filter(|s| s.is_bound())
            .map(|s| s.outputs().clone())
            .collect();
        self.traces = pipeline_traces(&outputs, self.active_storage);
        kernel.declare_storage_traces(&self.process, self.traces.clone());
        SourceId(index)
    }

    /// Queues an operation on a source.
    ///
    /// # Arguments
    ///
    /// * `source` - Source returned by [`register_client`](Self::register_client).
    /// * `op` - Operation kind.
    /// * `size` - Destination width in bytes.
    /// * `a`, `b` - Operands (`SQRT` uses only `b`).
    /// * `dest` - First destination register.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the source's queue is full; the caller retries later.
    ///
    /// # Errors
    ///
    /// [`FpuError::NoCapableUnit`] when no unit implements `op`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is out of range or has no client, if `size` is not a
    /// positive multiple of the native integer width that the codec can encode, or
    /// if the registers of a multi-word result run past the end of the file.
    pub fn queue_operation(
        &mut self,
        source: SourceId,
        op: FpuOp,
        size: usize,
        a: f64,
        b: f64,
        dest: RegAddr,
    ) -> Result<bool, FpuError> {
        assert!(source.0 < self.sources.len(), "{source} does not exist");
        assert!(self.sources[source.0].is_bound(), "{source} has no registered client");
        let Some(width) = self.codec.width_for(size) else {
            panic!(
                "operand size {size} is not a supported multiple of the {}-byte native integer",
                self.codec.integer_bytes()
            );
        };
        let span = self.codec.words(width) - 1;
        assert!(
            dest.checked_offset(span as u32).is_some(),
            "destination {dest} cannot hold {} words",
            span + 1
        );
        if !self.mapping.supports(op) {
            return Err(FpuError::NoCapableUnit(op));
        }

        let operation = Operation {
            op,
            width,
            a,
            b,
            dest,
        };
        let src = &mut self.sources[source.0];
        debug!(target: "fpu", client = %src.client_name(), "queuing {operation}");
        if !src.push(operation) {
            self.stats.queue_rejections += 1;
            return Ok(false);
        }
        self.stats.ops_queued += 1;
        Ok(true)
    }

    /// Runs one cycle: [`plan`](Self::plan) followed by [`apply`](Self::apply).
    pub fn tick<P: ClientPort + ?Sized>(
        &mut self,
        kernel: &mut dyn Kernel,
        clients: &mut P,
    ) -> ProcessResult {
        let plan = self.plan(kernel.cycle(), &*clients);
        self.apply(&plan, kernel, clients)
    }

    /// Whether the kernel must invoke the FPU this cycle: results are in flight
    /// or an input queue holds work.
    pub fn is_sensitive(&self) -> bool {
        self.active || self.sources.iter().any(|s| !s.is_empty())
    }

    /// Whether any unit holds an in-flight result.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Storage traces currently declared for the pipeline process.
    pub fn storage_traces(&self) -> &StorageTraceSet {
        &self.traces
    }

    /// Storage trace a client process produces by queuing on `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is out of range.
    pub fn source_trace(&self, source: SourceId) -> StorageTraceSet {
        StorageTraceSet::single(self.sources[source.0].storage())
    }

    /// Component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the pipeline process traces are declared for.
    pub fn process_name(&self) -> &str {
        &self.process
    }

    /// Kernel storage of the active flag.
    pub fn active_storage(&self) -> StorageId {
        self.active_storage
    }

    /// Number of sources.
    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of units.
    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    /// A source by index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn source(&self, id: SourceId) -> &Source {
        &self.sources[id.0]
    }

    /// A unit by index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    /// Routing table.
    pub fn mapping(&self) -> &UnitMapping {
        &self.mapping
    }

    /// Codec used for write-back.
    pub fn codec(&self) -> &FloatCodec {
        &self.codec
    }

    /// Source the next admission pass starts from.
    pub fn last_source(&self) -> SourceId {
        SourceId(self.last_source)
    }

    /// Collected statistics.
    pub fn stats(&self) -> &FpuStats {
        &self.stats
    }
}

/// Storage traces of the pipeline process for the given per-source outputs.
///
/// Any subset of sources can receive a write-back in a cycle, in any order, and
/// the active flag may or may not be written after them.
fn pipeline_traces(outputs: &[StorageTraceSet], active: StorageId) -> StorageTraceSet {
    &output_permutation(outputs).opt() * &StorageTraceSet::single(active).opt()
}
