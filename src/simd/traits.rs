use crate::{
    error::Result,
    simd::{AssociativeOp, BinaryOp, Element},
};

/// Lane-wise kernels over whole slices.
///
/// Every kernel exists in three flavours, chosen by the caller:
///
/// - `scalar_*`: one element at a time, the reference result
/// - `simd_*`: strides of the preferred species plus one masked tail stride
/// - `par_simd_*`: the SIMD kernel run over disjoint chunks on the rayon pool
///
/// All three produce the same lanes for exact operators. The `simd_*` kernels fall back
/// to the scalar path below [`SIMD_THRESHOLD`](crate::SIMD_THRESHOLD) elements and the
/// `par_simd_*` kernels to the single-threaded path below
/// [`PARALLEL_SIMD_THRESHOLD`](crate::PARALLEL_SIMD_THRESHOLD).
pub trait SimdLanewise<E: Element> {
    fn scalar_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>>;
    fn simd_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>>;
    fn par_simd_lanewise(&self, op: BinaryOp, rhs: &Self) -> Result<Vec<E>>;

    fn scalar_reduce(&self, op: AssociativeOp) -> Result<E>;
    fn simd_reduce(&self, op: AssociativeOp) -> Result<E>;
    fn par_simd_reduce(&self, op: AssociativeOp) -> Result<E>;

    /// Sum of all elements widened to `i64` (wrapping), integral kinds only.
    fn simd_sum_to_long(&self) -> Result<i64>;
}
