//! Lane reductions.
//!
//! A reduction folds the participating lanes with an associative operator, starting
//! from the operator's identity, so a masked reduction with no set lane yields the
//! identity. Integral reductions are bit-exact; floating `ADD`/`MUL` reductions may
//! differ from a sequential fold within the bounds of
//! [`reduction_tolerance`](crate::simd::tolerance::reduction_tolerance).

use tracing::trace;

use crate::{
    error::{capability_error, Result},
    simd::{AssociativeOp, Element, Mask, Vector},
};

impl AssociativeOp {
    /// The identity element of this operator for `E`.
    ///
    /// # Errors
    ///
    /// `CapabilityError` when `E` does not support the operator.
    pub fn identity<E: Element>(self) -> Result<E> {
        E::identity(self)
    }
}

impl<E: Element> Vector<E> {
    fn participating<'a>(&'a self, mask: Option<&'a Mask<E>>) -> impl Iterator<Item = E> + 'a {
        self.lanes
            .iter()
            .enumerate()
            .filter(move |&(i, _)| mask.map_or(true, |mask| mask.bits[i]))
            .map(|(_, &a)| a)
    }

    fn fold_lanes(&self, op: AssociativeOp, mask: Option<&Mask<E>>) -> Result<E> {
        Self::require(op.supports(E::KIND), op.name())?;
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }
        let binary = op.as_binary();
        self.participating(mask)
            .try_fold(op.identity::<E>()?, |acc, a| E::binary(binary, acc, a))
    }

    /// Folds all lanes with `op`.
    pub fn reduce_lanes(&self, op: AssociativeOp) -> Result<E> {
        self.fold_lanes(op, None)
    }

    /// Folds the lanes set in `mask`; returns the identity when none is set.
    pub fn reduce_lanes_masked(&self, op: AssociativeOp, mask: &Mask<E>) -> Result<E> {
        self.fold_lanes(op, Some(mask))
    }

    fn fold_to_long(&self, op: AssociativeOp, mask: Option<&Mask<E>>) -> Result<i64> {
        if !E::KIND.is_integral() {
            return Err(capability_error(E::KIND, "reduce lanes to long"));
        }
        Ok(self.fold_lanes(op, mask)?.to_i64())
    }

    /// Integral reduction at lane width, sign-extended to `i64`.
    ///
    /// `ADD` and `MUL` wrap at the lane width exactly as [`reduce_lanes`](Self::reduce_lanes)
    /// does; widening across many vectors is the caller's fold.
    pub fn reduce_lanes_to_long(&self, op: AssociativeOp) -> Result<i64> {
        self.fold_to_long(op, None)
    }

    pub fn reduce_lanes_to_long_masked(&self, op: AssociativeOp, mask: &Mask<E>) -> Result<i64> {
        self.fold_to_long(op, Some(mask))
    }

    fn fold_to_double(&self, op: AssociativeOp, mask: Option<&Mask<E>>) -> Result<f64> {
        if !E::KIND.is_floating() {
            return Err(capability_error(E::KIND, "reduce lanes to double"));
        }
        Self::require(op.supports(E::KIND), op.name())?;
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }

        trace!(kind = %E::KIND, %op, lanes = self.length(), "widening reduction");
        match op {
            AssociativeOp::Add => Ok(self.participating(mask).map(|a| a.to_f64()).sum()),
            AssociativeOp::Mul => Ok(self.participating(mask).map(|a| a.to_f64()).product()),
            _ => Ok(self.fold_lanes(op, mask)?.to_f64()),
        }
    }

    /// Floating reduction computed in `f64`.
    pub fn reduce_lanes_to_double(&self, op: AssociativeOp) -> Result<f64> {
        self.fold_to_double(op, None)
    }

    pub fn reduce_lanes_to_double_masked(&self, op: AssociativeOp, mask: &Mask<E>) -> Result<f64> {
        self.fold_to_double(op, Some(mask))
    }
}
