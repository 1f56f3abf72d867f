//! Diagnostic dump of the FPU's queues and pipelines.

use std::fmt;

use super::Fpu;
use super::codec::FloatCodec;
use super::op::{FpuOp, Operation};
use super::source::Source;
use super::unit::Unit;

const HELP: &str = "\
The Floating-Point Unit executes floating-point operations asynchronously and
can be shared among multiple processors. Results are written back asynchronously
to the original processor's register file.

Supported operations:
- inspect <component>
  Reads and displays the FPU's queues and pipelines.
";

impl Fpu {
    /// Help text describing the component.
    pub const fn info() -> &'static str {
        HELP
    }

    /// Writes every source queue followed by every unit pipeline.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn read(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        for source in &self.sources {
            write_source(out, source)?;
        }
        writeln!(out)?;

        for (i, unit) in self.units.iter().enumerate() {
            self.write_unit(out, i, unit)?;
        }
        Ok(())
    }

    fn write_unit(&self, out: &mut dyn fmt::Write, index: usize, unit: &Unit) -> fmt::Result {
        writeln!(out, "Unit:       #{index}")?;
        writeln!(out, "Pipelined:  {}", unit.is_pipelined())?;
        writeln!(out, "Latency:    {} cycles", unit.latency())?;
        write!(out, "Operations:")?;
        for op in unit.ops() {
            write!(out, " {op}")?;
        }
        writeln!(out)?;
        writeln!(out)?;

        if unit.is_empty() {
            writeln!(out, "(Empty)")?;
        } else {
            writeln!(out, " t | Sz |        Result       |  Reg  | Destination")?;
            writeln!(out, "---+----+---------------------+-------+--------------------")?;
            for slot in unit.slots() {
                let value = FloatCodec::narrow(slot.value, slot.width);
                let client = self
                    .sources
                    .get(slot.source.0)
                    .and_then(Source::client)
                    .map_or("<invalid source>", |c| c.name.as_str());
                writeln!(
                    out,
                    "{:>2} | {:>2} | {:>20.12} | {:<5} | {client}",
                    slot.age,
                    slot.width.bytes() * 8,
                    value,
                    slot.dest.to_string(),
                )?;
            }
            writeln!(out)?;
        }
        writeln!(out)
    }
}

fn write_source(out: &mut dyn fmt::Write, source: &Source) -> fmt::Result {
    writeln!(out, "Source: {}", source.client_name())?;
    if source.is_empty() {
        writeln!(out, "(Empty)")?;
    } else {
        writeln!(out, " Op  | Sz |           A          |            B         | Dest ")?;
        writeln!(out, "-----+----+----------------------+----------------------+------")?;
        for op in source.iter() {
            write_operation(out, op)?;
        }
    }
    writeln!(out)
}

// SQRT takes its operand from B; A is left blank.
fn write_operation(out: &mut dyn fmt::Write, op: &Operation) -> fmt::Result {
    write!(out, "{:<4} | {:<2} | ", op.op.name(), op.size() * 8)?;
    if op.op == FpuOp::Sqrt {
        write!(out, "{:>20}", "")?;
    } else {
        write!(out, "{:>20.12}", op.a)?;
    }
    writeln!(out, " | {:>20.12} | {}", op.b, op.dest)
}
