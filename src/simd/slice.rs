//! Slice kernels built on the portable vector engine.
//!
//! The kernels strip-mine a slice with the preferred species: full strides up to
//! [`Species::loop_bound`], then a single tail stride under an
//! [`index_in_range`](Mask::index_in_range) mask, so every element is processed exactly
//! once and no lane reads past the end of the slice.
//!
//! ```rust
//! use lanely::{simd::BinaryOp, SimdLanewise};
//!
//! let a: Vec<i32> = (0..1000).collect();
//! let b: Vec<i32> = (0..1000).map(|i| 2 * i).collect();
//!
//! let sum = a.as_slice().simd_lanewise(BinaryOp::Add, b.as_slice()).unwrap();
//! assert_eq!(sum[999], 2997);
//! assert_eq!(a.as_slice().simd_sum_to_long().unwrap(), 499_500);
//! ```
//!
//! # Choosing a kernel
//!
//! - **Scalar**: tiny slices, or as the reference result in tests
//! - **SIMD**: anything above [`SIMD_THRESHOLD`] elements
//! - **Parallel SIMD**: above [`PARALLEL_SIMD_THRESHOLD`] elements, split into
//!   [`PARALLEL_CHUNK_SIZE`]-element chunks rounded down to whole strides

use rayon::prelude::*;
use tracing::trace;

use crate::{
    error::{capability_error, index_error, Result},
    simd::{AssociativeOp, BinaryOp, Element, Mask, SimdLanewise, Species, Vector},
    PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD, SIMD_THRESHOLD,
};

// ================================================================================================
// HELPERS
// ================================================================================================

fn check_lengths<E>(a: &[E], b: &[E]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(index_error(
            b.len() as i64,
            a.len(),
            "slices must have the same length",
        ))
    }
}

fn check_supported<E: Element>(supported: bool, operation: &str) -> Result<()> {
    if supported {
        Ok(())
    } else {
        Err(capability_error(E::KIND, operation))
    }
}

/// Chunk length for parallel kernels: a whole number of strides, at least one.
#[inline(always)]
fn parallel_chunk_size<E: Element>(species: Species<E>) -> usize {
    let step = species.lanes();
    ((PARALLEL_CHUNK_SIZE / step) * step).max(step)
}

/// Tail mask covering `[bound, len)`.
#[inline(always)]
fn tail_mask<E: Element>(species: Species<E>, bound: usize, len: usize) -> Mask<E> {
    Mask::index_in_range(species, bound as i64, len as i64)
}

// ================================================================================================
// LANEWISE KERNELS
// ================================================================================================

fn lanewise_strides<E: Element>(
    species: Species<E>,
    op: BinaryOp,
    a: &[E],
    b: &[E],
    out: &mut [E],
) -> Result<()> {
    let step = species.lanes();
    let complete_lanes = species.loop_bound(a.len());

    for i in (0..complete_lanes).step_by(step) {
        let va = Vector::from_array(species, a, i)?;
        let vb = Vector::from_array(species, b, i)?;
        va.binary(op, &vb)?.into_array(out, i)?;
    }

    if complete_lanes < a.len() {
        let mask = tail_mask(species, complete_lanes, a.len());
        let va = Vector::from_array_masked(species, a, complete_lanes, &mask)?;
        let vb = Vector::from_array_masked(species, b, complete_lanes, &mask)?;
        va.binary_masked(op, &vb, &mask)?
            .into_array_masked(out, complete_lanes, &mask)?;
    }

    Ok(())
}

// ================================================================================================
// REDUCTION KERNELS
// ================================================================================================

/// Folds `a` into one accumulator vector, then reduces its lanes.
fn reduce_strides<E: Element>(species: Species<E>, op: AssociativeOp, a: &[E]) -> Result<E> {
    let step = species.lanes();
    let complete_lanes = species.loop_bound(a.len());
    let binary = op.as_binary();

    let mut acc = Vector::broadcast(species, op.identity::<E>()?);
    for i in (0..complete_lanes).step_by(step) {
        acc = acc.binary(binary, &Vector::from_array(species, a, i)?)?;
    }

    if complete_lanes < a.len() {
        let mask = tail_mask(species, complete_lanes, a.len());
        let tail = Vector::from_array_masked(species, a, complete_lanes, &mask)?;
        acc = acc.binary_masked(binary, &tail, &mask)?;
    }

    acc.reduce_lanes(op)
}

/// Adds every lane of `v`, sign-extended, to a wrapping `i64` running sum.
fn widening_sum<E: Element>(sum: i64, v: &Vector<E>) -> i64 {
    v.as_slice()
        .iter()
        .fold(sum, |acc, lane| acc.wrapping_add(lane.to_i64()))
}

impl<E: Element> SimdLanewise<E> for [E] {
    fn scalar_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>> {
        check_supported::<E>(op.supports(E::KIND), op.name())?;
        check_lengths(self, rhs)?;

        self.iter()
            .zip(rhs.iter())
            .map(|(&a, &b)| E::binary(op, a, b))
            .collect()
    }

    fn simd_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>> {
        check_supported::<E>(op.supports(E::KIND), op.name())?;
        check_lengths(self, rhs)?;

        if self.len() < SIMD_THRESHOLD {
            trace!(kind = %E::KIND, %op, len = self.len(), "scalar lanewise path");
            return self.scalar_lanewise(op, rhs);
        }

        let species = Species::<E>::preferred()?;
        trace!(kind = %E::KIND, %op, len = self.len(), lanes = species.lanes(), "simd lanewise path");

        let mut out = vec![E::default(); self.len()];
        lanewise_strides(species, op, self, rhs, &mut out)?;
        Ok(out)
    }

    fn par_simd_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>> {
        // For small slices, fall back to the single-threaded kernel
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.simd_lanewise(op, rhs);
        }
        check_supported::<E>(op.supports(E::KIND), op.name())?;
        check_lengths(self, rhs)?;

        let species = Species::<E>::preferred()?;
        let chunk_size = parallel_chunk_size(species);
        trace!(kind = %E::KIND, %op, len = self.len(), chunk_size, "parallel lanewise path");

        let mut out = vec![E::default(); self.len()];
        out.par_chunks_mut(chunk_size)
            .zip(self.par_chunks(chunk_size))
            .zip(rhs.par_chunks(chunk_size))
            .try_for_each(|((out_chunk, a_chunk), b_chunk)| {
                lanewise_strides(species, op, a_chunk, b_chunk, out_chunk)
            })?;
        Ok(out)
    }

    fn scalar_reduce(&self, op: AssociativeOp) -> Result<E> {
        check_supported::<E>(op.supports(E::KIND), op.name())?;
        let binary = op.as_binary();
        self.iter()
            .try_fold(op.identity::<E>()?, |acc, &a| E::binary(binary, acc, a))
    }

    fn simd_reduce(&self, op: AssociativeOp) -> Result<E> {
        check_supported::<E>(op.supports(E::KIND), op.name())?;

        if self.len() < SIMD_THRESHOLD {
            trace!(kind = %E::KIND, %op, len = self.len(), "scalar reduce path");
            return self.scalar_reduce(op);
        }

        let species = Species::<E>::preferred()?;
        trace!(kind = %E::KIND, %op, len = self.len(), lanes = species.lanes(), "simd reduce path");
        reduce_strides(species, op, self)
    }

    fn par_simd_reduce(&self, op: AssociativeOp) -> Result<E> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.simd_reduce(op);
        }
        check_supported::<E>(op.supports(E::KIND), op.name())?;

        let species = Species::<E>::preferred()?;
        let chunk_size = parallel_chunk_size(species);
        let identity = op.identity::<E>()?;
        let binary = op.as_binary();
        trace!(kind = %E::KIND, %op, len = self.len(), chunk_size, "parallel reduce path");

        self.par_chunks(chunk_size)
            .map(|chunk| reduce_strides(species, op, chunk))
            .try_reduce(|| identity, |x, y| E::binary(binary, x, y))
    }

    fn simd_sum_to_long(&self) -> Result<i64> {
        check_supported::<E>(E::KIND.is_integral(), "sum to long")?;

        let species = Species::<E>::preferred()?;
        let step = species.lanes();
        let complete_lanes = species.loop_bound(self.len());

        let mut sum = 0i64;
        for i in (0..complete_lanes).step_by(step) {
            let stride = Vector::from_array(species, self, i)?;
            sum = widening_sum(sum, &stride);
        }

        if complete_lanes < self.len() {
            let mask = tail_mask(species, complete_lanes, self.len());
            let tail = Vector::from_array_masked(species, self, complete_lanes, &mask)?;
            sum = widening_sum(sum, &tail);
        }

        Ok(sum)
    }
}
