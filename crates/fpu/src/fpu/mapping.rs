//! Operation-kind to unit mapping.
//!
//! Built once from the unit configuration. For every operation kind the table
//! lists the capable units in index order; a source is always routed to the same
//! unit for a given kind, picked by its index modulo the number of capable units.

use super::op::{FpuOp, NUM_OPS};
use crate::common::{SourceId, UnitId};

/// Static routing table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitMapping {
    table: [Vec<UnitId>; NUM_OPS],
}

impl UnitMapping {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from each unit's operation list, in unit order.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpusim_core::common::{SourceId, UnitId};
    /// use fpusim_core::fpu::mapping::UnitMapping;
    /// use fpusim_core::fpu::op::FpuOp;
    ///
    /// let mapping = UnitMapping::from_units(&[
    ///     vec![FpuOp::Add, FpuOp::Mul],
    ///     vec![FpuOp::Add],
    /// ]);
    /// assert_eq!(mapping.route(FpuOp::Add, SourceId(0)), Some(UnitId(0)));
    /// assert_eq!(mapping.route(FpuOp::Add, SourceId(3)), Some(UnitId(1)));
    /// assert_eq!(mapping.route(FpuOp::Mul, SourceId(3)), Some(UnitId(0)));
    /// assert_eq!(mapping.route(FpuOp::Sqrt, SourceId(0)), None);
    /// ```
    pub fn from_units(units: &[Vec<FpuOp>]) -> Self {
        let mut mapping = Self::new();
        for (i, ops) in units.iter().enumerate() {
            for &op in ops {
                mapping.add(op, UnitId(i));
            }
        }
        mapping
    }

    /// Appends `unit` to the capable units of `op`.
    pub fn add(&mut self, op: FpuOp, unit: UnitId) {
        let units = &mut self.table[op.index()];
        if !units.contains(&unit) {
            units.push(unit);
        }
    }

    /// Units capable of `op`, in index order.
    pub fn units(&self, op: FpuOp) -> &[UnitId] {
        &self.table[op.index()]
    }

    /// Whether any unit implements `op`.
    pub fn supports(&self, op: FpuOp) -> bool {
        !self.table[op.index()].is_empty()
    }

    /// Unit that executes `op` on behalf of `source`.
    pub fn route(&self, op: FpuOp, source: SourceId) -> Option<UnitId> {
        let units = self.units(op);
        if units.is_empty() {
            return None;
        }
        Some(units[source.0 % units.len()])
    }
}
