//! Complexity analysis of UI state snapshots.
//!
//! Each snapshot is reduced to a three-component [`ComplexityVector`], one
//! component per [`Facet`]. The formulas are power-law blends of hierarchy
//! depth, element count, and distinct element type count:
//!
//! | facet        | formula                           |
//! |--------------|-----------------------------------|
//! | planning     | depth^0.5 * types^0.3             |
//! | execution    | elements^0.4 * depth^0.2          |
//! | verification | types^0.6 * depth^0.1             |
//!
//! The analyzer never fails. Depth is coerced to at least 1 and a zero
//! base raised to a positive exponent yields exactly 0.

use crate::core::specialization::{Facet, FACET_COUNT};
use crate::core::state::StateSnapshot;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Per-facet complexity of a task. All components are finite and >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexityVector([f64; FACET_COUNT]);

impl ComplexityVector {
    /// Wrap raw components, replacing anything non-finite or negative with 0.
    pub fn new(components: [f64; FACET_COUNT]) -> Self {
        Self(components.map(|c| if c.is_finite() && c > 0.0 { c } else { 0.0 }))
    }

    pub fn get(&self, facet: Facet) -> f64 {
        self.0[facet.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / FACET_COUNT as f64
    }
}

impl Index<Facet> for ComplexityVector {
    type Output = f64;

    fn index(&self, facet: Facet) -> &f64 {
        &self.0[facet.index()]
    }
}

/// `base^exp` with `0^positive` pinned to 0.
fn pow0(base: f64, exp: f64) -> f64 {
    if base <= 0.0 {
        0.0
    } else {
        base.powf(exp)
    }
}

/// Compute the complexity vector of a state snapshot.
pub fn compute_complexity_vector(state: &StateSnapshot) -> ComplexityVector {
    let depth = f64::from(state.effective_depth());
    let elements = state.element_count() as f64;
    let types = state.distinct_type_count() as f64;

    let planning = pow0(depth, 0.5) * pow0(types, 0.3);
    let execution = pow0(elements, 0.4) * pow0(depth, 0.2);
    let verification = pow0(types, 0.6) * pow0(depth, 0.1);

    ComplexityVector::new([planning, execution, verification])
}
