//! Boundary stubs for units outside the model.
//!
//! The fetch, execute, and load-store units, the memory unit, the debug
//! blocks, and the top-level pins are external collaborators. Unless a
//! component is attached in their place, each is represented by a stub that
//! drives its outputs with values assigned through the harness API. A stub
//! has no registers; assigned values persist until reassigned.

use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::sim::kernel::TickContext;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::traits::Component;
use std::collections::BTreeMap;

pub struct BoundaryStub {
    unit: Unit,
    name: String,
    values: BTreeMap<SignalId, u64>,
}

impl BoundaryStub {
    /// Creates a stub driving `outputs` low.
    pub fn new(unit: Unit, outputs: impl IntoIterator<Item = SignalId>) -> Self {
        Self {
            unit,
            name: format!("{}-stub", unit),
            values: outputs.into_iter().map(|id| (id, 0)).collect(),
        }
    }

    /// Returns `true` if this stub drives `id`.
    pub fn owns(&self, id: SignalId) -> bool {
        self.values.contains_key(&id)
    }

    /// Assigns the value driven on `id` from now on. Returns `false` if the stub does not own `id`.
    pub fn set(&mut self, id: SignalId, value: u64) -> bool {
        match self.values.get_mut(&id) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }
}

impl Component for BoundaryStub {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit(&self) -> Unit {
        self.unit
    }

    fn drives(&self) -> Vec<SignalId> {
        self.values.keys().copied().collect()
    }

    fn evaluate(&self, signals: &mut SignalTable, _ctx: &TickContext) -> Result<(), SimError> {
        for (&id, &v) in &self.values {
            signals.drive(id, v);
        }
        Ok(())
    }

    fn as_stub_mut(&mut self) -> Option<&mut BoundaryStub> {
        Some(self)
    }
}
