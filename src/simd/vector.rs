//! Portable vector values and the elementwise operation engine.
//!
//! [`Vector`] holds exactly `species.lanes()` elements of one [`Element`] type and is
//! immutable: every operation returns a new value. Operations validate that all operands
//! share the receiver's species before computing anything.
//!
//! # Operation shapes
//!
//! Every operator category is available in the same invocation shapes:
//!
//! - **vector-vector**: [`Vector::binary`], [`Vector::ternary`] with `Operand::Vector`
//! - **vector-broadcast**: [`Vector::binary_scalar`], [`Vector::shift_lanes`],
//!   [`Vector::ternary`] with `Operand::Scalar`; the scalar is read once for the group
//! - **masked**: every `*_masked` variant merges, so lane `i` of the result is
//!   `op(a[i], ..)` where the mask is set and `a[i]` unchanged where it is clear
//!
//! All categories run through the same private merge loop, so the masking rule holds
//! uniformly.
//!
//! # Examples
//!
//! ```rust
//! use lanely::simd::{BinaryOp, Mask, Species, Vector};
//!
//! let species = Species::<i32>::of(4).unwrap();
//! let a = Vector::from_values(species, &[1, 2, 3, 4]).unwrap();
//! let b = Vector::from_values(species, &[10, 20, 30, 40]).unwrap();
//!
//! assert_eq!(a.add(&b).unwrap().to_array(), vec![11, 22, 33, 44]);
//!
//! let mask = Mask::from_values(species, &[true, false, true, false]).unwrap();
//! let merged = a.binary_masked(BinaryOp::Add, &b, &mask).unwrap();
//! assert_eq!(merged.to_array(), vec![11, 2, 33, 4]);
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{capability_error, index_error, species_mismatch, Result},
    simd::{
        BinaryOp, Comparison, Element, Mask, Species, TernaryOp, TestOp, UnaryOp,
    },
    utils::{check_from_index_size, check_index, check_offset_index, low_bits},
};

/// An immutable group of lanes of element type `E`.
#[derive(Clone)]
pub struct Vector<E: Element> {
    pub(crate) species: Species<E>,
    pub(crate) lanes: Box<[E]>,
}

/// A ternary-operation operand: either a same-species vector or a broadcast scalar.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, E: Element> {
    Vector(&'a Vector<E>),
    Scalar(E),
}

impl<E: Element> Operand<'_, E> {
    #[inline(always)]
    fn lane(&self, index: usize) -> E {
        match self {
            Operand::Vector(v) => v.lanes[index],
            Operand::Scalar(e) => *e,
        }
    }
}

impl<'a, E: Element> From<&'a Vector<E>> for Operand<'a, E> {
    fn from(vector: &'a Vector<E>) -> Self {
        Operand::Vector(vector)
    }
}

// ================================================================================================
// CONSTRUCTION
// ================================================================================================

impl<E: Element> Vector<E> {
    pub(crate) fn from_lanes(species: Species<E>, lanes: Box<[E]>) -> Self {
        debug_assert_eq!(lanes.len(), species.lanes());
        Self { species, lanes }
    }

    /// A vector with every lane set to zero (all-zero bit pattern).
    pub fn zero(species: Species<E>) -> Self {
        Self::broadcast(species, E::default())
    }

    /// A vector with every lane set to `value`.
    pub fn broadcast(species: Species<E>, value: E) -> Self {
        Self::from_lanes(species, vec![value; species.lanes()].into_boxed_slice())
    }

    /// Broadcasts an `i64`, converted with wrapping (integral) or rounding (floating).
    pub fn broadcast_i64(species: Species<E>, value: i64) -> Self {
        Self::broadcast(species, E::from_i64(value))
    }

    /// Builds lane `i` from `f(i)`.
    pub fn from_fn<F: FnMut(usize) -> E>(species: Species<E>, f: F) -> Self {
        Self::from_lanes(species, (0..species.lanes()).map(f).collect())
    }

    /// A vector whose lanes are exactly `values`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` unless `values.len() == species.lanes()`.
    pub fn from_values(species: Species<E>, values: &[E]) -> Result<Self> {
        if values.len() != species.lanes() {
            return Err(index_error(
                values.len() as i64,
                species.lanes(),
                "value count must equal the lane count",
            ));
        }
        Ok(Self::from_lanes(species, values.into()))
    }

    /// Loads `array[offset..offset + lanes]`.
    pub fn from_array(species: Species<E>, array: &[E], offset: usize) -> Result<Self> {
        check_from_index_size(offset, species.lanes(), array.len())?;
        Ok(Self::from_lanes(
            species,
            array[offset..offset + species.lanes()].into(),
        ))
    }

    /// Loads the lanes selected by `mask` from `array[offset + i]`; other lanes are zero.
    ///
    /// Only set lanes must lie inside the array, so a masked load can read the tail of
    /// an array whose length is not a multiple of the lane count.
    pub fn from_array_masked(
        species: Species<E>,
        array: &[E],
        offset: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        mask.check_species(species)?;
        let mut lanes = vec![E::default(); species.lanes()].into_boxed_slice();
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask.bits[i] {
                let index = check_offset_index(offset, i as i64, array.len())?;
                *lane = array[index];
            }
        }
        Ok(Self::from_lanes(species, lanes))
    }

    // ============================================================================================
    // EXTRACTION
    // ============================================================================================

    #[inline(always)]
    pub fn species(&self) -> Species<E> {
        self.species
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.lanes.len()
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[E] {
        &self.lanes
    }

    pub fn to_array(&self) -> Vec<E> {
        self.lanes.to_vec()
    }

    pub fn to_int_array(&self) -> Vec<i32> {
        self.lanes.iter().map(|&e| e.to_i32()).collect()
    }

    pub fn to_long_array(&self) -> Vec<i64> {
        self.lanes.iter().map(|&e| e.to_i64()).collect()
    }

    pub fn to_double_array(&self) -> Vec<f64> {
        self.lanes.iter().map(|&e| e.to_f64()).collect()
    }

    /// Stores all lanes into `array[offset..offset + lanes]`.
    pub fn into_array(&self, array: &mut [E], offset: usize) -> Result<()> {
        check_from_index_size(offset, self.length(), array.len())?;
        array[offset..offset + self.length()].copy_from_slice(&self.lanes);
        Ok(())
    }

    /// Stores the lanes selected by `mask`; other array elements are left untouched.
    ///
    /// Every set lane is bounds-checked before the first write.
    pub fn into_array_masked(&self, array: &mut [E], offset: usize, mask: &Mask<E>) -> Result<()> {
        self.check_mask(mask)?;
        let targets = (0..self.length())
            .filter(|&i| mask.bits[i])
            .map(|i| Ok((check_offset_index(offset, i as i64, array.len())?, self.lanes[i])))
            .collect::<Result<Vec<(usize, E)>>>()?;
        for (index, value) in targets {
            array[index] = value;
        }
        Ok(())
    }

    /// Reads lane `index`.
    pub fn lane(&self, index: usize) -> Result<E> {
        self.lanes
            .get(index)
            .copied()
            .ok_or_else(|| index_error(index as i64, self.length(), "lane index"))
    }

    /// A copy of this vector with lane `index` replaced by `value`.
    pub fn with_lane(&self, index: usize, value: E) -> Result<Self> {
        check_index(index as i64, self.length())?;
        let mut lanes = self.lanes.clone();
        lanes[index] = value;
        Ok(Self::from_lanes(self.species, lanes))
    }

    // ============================================================================================
    // VALIDATION
    // ============================================================================================

    pub(crate) fn check(&self, other: &Vector<E>) -> Result<()> {
        if self.species == other.species {
            Ok(())
        } else {
            Err(species_mismatch(self.species, other.species))
        }
    }

    pub(crate) fn check_mask(&self, mask: &Mask<E>) -> Result<()> {
        mask.check_species(self.species)
    }

    pub(crate) fn require(supported: bool, operation: &str) -> Result<()> {
        if supported {
            Ok(())
        } else {
            Err(capability_error(E::KIND, operation))
        }
    }

    /// The merge loop shared by every lane-wise category.
    ///
    /// Lane `i` is `f(i, self[i])` where `mask` is absent or set, and `self[i]` otherwise.
    /// `f` is never invoked for clear lanes.
    fn merge_lanes<F>(&self, mask: Option<&Mask<E>>, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, E) -> Result<E>,
    {
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }

        let lanes = self
            .lanes
            .iter()
            .enumerate()
            .map(|(i, &a)| match mask {
                Some(mask) if !mask.bits[i] => Ok(a),
                _ => f(i, a),
            })
            .collect::<Result<Box<[E]>>>()?;

        Ok(Self::from_lanes(self.species, lanes))
    }

    // ============================================================================================
    // ELEMENTWISE ENGINE
    // ============================================================================================

    fn lanewise1(&self, op: UnaryOp, mask: Option<&Mask<E>>) -> Result<Self> {
        Self::require(op.supports(E::KIND), op.name())?;
        self.merge_lanes(mask, |_, a| E::unary(op, a))
    }

    fn lanewise2(&self, op: BinaryOp, rhs: Operand<'_, E>, mask: Option<&Mask<E>>) -> Result<Self> {
        Self::require(op.supports(E::KIND), op.name())?;
        if let Operand::Vector(v) = rhs {
            self.check(v)?;
        }
        self.merge_lanes(mask, |i, a| E::binary(op, a, rhs.lane(i)))
    }

    fn lanewise3(
        &self,
        op: TernaryOp,
        b: Operand<'_, E>,
        c: Operand<'_, E>,
        mask: Option<&Mask<E>>,
    ) -> Result<Self> {
        Self::require(op.supports(E::KIND), op.name())?;
        for operand in [b, c] {
            if let Operand::Vector(v) = operand {
                self.check(v)?;
            }
        }
        self.merge_lanes(mask, |i, a| E::ternary(op, a, b.lane(i), c.lane(i)))
    }

    pub fn unary(&self, op: UnaryOp) -> Result<Self> {
        self.lanewise1(op, None)
    }

    pub fn unary_masked(&self, op: UnaryOp, mask: &Mask<E>) -> Result<Self> {
        self.lanewise1(op, Some(mask))
    }

    pub fn binary(&self, op: BinaryOp, other: &Vector<E>) -> Result<Self> {
        self.lanewise2(op, Operand::Vector(other), None)
    }

    pub fn binary_masked(&self, op: BinaryOp, other: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.lanewise2(op, Operand::Vector(other), Some(mask))
    }

    /// Applies `op` with `value` broadcast to every lane.
    pub fn binary_scalar(&self, op: BinaryOp, value: E) -> Result<Self> {
        self.lanewise2(op, Operand::Scalar(value), None)
    }

    pub fn binary_scalar_masked(&self, op: BinaryOp, value: E, mask: &Mask<E>) -> Result<Self> {
        self.lanewise2(op, Operand::Scalar(value), Some(mask))
    }

    /// Shifts or rotates every lane by `amount`, reduced modulo the lane width.
    pub fn shift_lanes(&self, op: BinaryOp, amount: i64) -> Result<Self> {
        Self::require(op.is_shift(), op.name())?;
        self.binary_scalar(op, E::from_i64(amount))
    }

    pub fn shift_lanes_masked(&self, op: BinaryOp, amount: i64, mask: &Mask<E>) -> Result<Self> {
        Self::require(op.is_shift(), op.name())?;
        self.binary_scalar_masked(op, E::from_i64(amount), mask)
    }

    pub fn ternary(&self, op: TernaryOp, b: Operand<'_, E>, c: Operand<'_, E>) -> Result<Self> {
        self.lanewise3(op, b, c, None)
    }

    pub fn ternary_masked(
        &self,
        op: TernaryOp,
        b: Operand<'_, E>,
        c: Operand<'_, E>,
        mask: &Mask<E>,
    ) -> Result<Self> {
        self.lanewise3(op, b, c, Some(mask))
    }

    /// Lane `i` becomes `self[i] + i * scale`.
    pub fn add_index(&self, scale: i64) -> Result<Self> {
        self.merge_lanes(None, |i, a| {
            E::binary(BinaryOp::Add, a, E::from_i64((i as i64).wrapping_mul(scale)))
        })
    }

    /// Takes `other[i]` where `mask` is set and `self[i]` elsewhere.
    pub fn blend(&self, other: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.check(other)?;
        self.merge_lanes(Some(mask), |i, _| Ok(other.lanes[i]))
    }

    pub fn add(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Add, other)
    }

    pub fn sub(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Sub, other)
    }

    pub fn mul(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Mul, other)
    }

    /// Integer lanes fail with `ArithmeticError` on a zero divisor.
    pub fn div(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Div, other)
    }

    pub fn min(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Min, other)
    }

    pub fn max(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Max, other)
    }

    pub fn and(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::And, other)
    }

    pub fn or(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Or, other)
    }

    pub fn xor(&self, other: &Vector<E>) -> Result<Self> {
        self.binary(BinaryOp::Xor, other)
    }

    pub fn neg(&self) -> Result<Self> {
        self.unary(UnaryOp::Neg)
    }

    pub fn abs(&self) -> Result<Self> {
        self.unary(UnaryOp::Abs)
    }

    pub fn not(&self) -> Result<Self> {
        self.unary(UnaryOp::Not)
    }

    /// `self * b + c` with a single rounding in the evaluation format.
    pub fn fma(&self, b: &Vector<E>, c: &Vector<E>) -> Result<Self> {
        self.ternary(TernaryOp::Fma, Operand::Vector(b), Operand::Vector(c))
    }

    // ============================================================================================
    // COMPARISONS AND TESTS
    // ============================================================================================

    fn compare_with(&self, op: Comparison, rhs: Operand<'_, E>) -> Result<Mask<E>> {
        Self::require(op.supports(E::KIND), op.name())?;
        if let Operand::Vector(v) = rhs {
            self.check(v)?;
        }
        let bits = self
            .lanes
            .iter()
            .enumerate()
            .map(|(i, &a)| E::compare(op, a, rhs.lane(i)))
            .collect::<Result<Box<[bool]>>>()?;
        Ok(Mask::from_bits(self.species, bits))
    }

    pub fn compare(&self, op: Comparison, other: &Vector<E>) -> Result<Mask<E>> {
        self.compare_with(op, Operand::Vector(other))
    }

    pub fn compare_scalar(&self, op: Comparison, value: E) -> Result<Mask<E>> {
        self.compare_with(op, Operand::Scalar(value))
    }

    /// The comparison restricted to `mask`: clear lanes are always false.
    pub fn compare_masked(&self, op: Comparison, other: &Vector<E>, mask: &Mask<E>) -> Result<Mask<E>> {
        self.compare(op, other)?.and(mask)
    }

    pub fn eq(&self, other: &Vector<E>) -> Result<Mask<E>> {
        self.compare(Comparison::Eq, other)
    }

    pub fn lt(&self, other: &Vector<E>) -> Result<Mask<E>> {
        self.compare(Comparison::Lt, other)
    }

    pub fn test(&self, op: TestOp) -> Result<Mask<E>> {
        Self::require(op.supports(E::KIND), op.name())?;
        let bits = self
            .lanes
            .iter()
            .map(|&a| E::test(op, a))
            .collect::<Result<Box<[bool]>>>()?;
        Ok(Mask::from_bits(self.species, bits))
    }

    pub fn test_masked(&self, op: TestOp, mask: &Mask<E>) -> Result<Mask<E>> {
        self.test(op)?.and(mask)
    }

    // ============================================================================================
    // CONVERSIONS
    // ============================================================================================

    /// Reinterprets every lane's bits as `F`, which must have the same lane width.
    ///
    /// # Errors
    ///
    /// `CapabilityError` when the lane widths differ.
    pub fn reinterpret_lanes<F: Element>(&self) -> Result<Vector<F>> {
        if F::KIND.bit_size() != E::KIND.bit_size() {
            return Err(capability_error(
                E::KIND,
                format!("reinterpret lanes as {}", F::KIND),
            ));
        }
        let species = self.species.with_lanes::<F>()?;
        Ok(Vector::from_lanes(
            species,
            self.lanes.iter().map(|&a| F::from_bits(a.to_bits())).collect(),
        ))
    }

    /// Reinterprets the whole vector's bits as lanes of `F` (same total bit size,
    /// little-endian lane order).
    pub fn reinterpret_shape<F: Element>(&self) -> Result<Vector<F>> {
        let species = self.species.with_lanes::<F>()?;

        let (src_bytes, dst_bytes) = (E::KIND.byte_size(), F::KIND.byte_size());
        let bytes: Vec<u8> = self
            .lanes
            .iter()
            .flat_map(|&a| a.to_bits().to_le_bytes().into_iter().take(src_bytes))
            .collect();

        let lanes = bytes
            .chunks_exact(dst_bytes)
            .map(|chunk| {
                let bits = chunk
                    .iter()
                    .rev()
                    .fold(0u64, |acc, &byte| (acc << 8) | byte as u64);
                F::from_bits(bits & low_bits(F::KIND.bit_size() as u32))
            })
            .collect();

        Ok(Vector::from_lanes(species, lanes))
    }

    /// Converts every lane's value to `F`, keeping the lane count.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` when no species of `F` has this lane count.
    pub fn cast<F: Element>(&self) -> Result<Vector<F>> {
        let species = Species::<F>::of(self.length())?;
        let lanes = self
            .lanes
            .iter()
            .map(|&a| match (E::KIND.is_floating(), F::KIND.is_floating()) {
                (true, true) => F::from_f64(a.to_f64()),
                // narrow integral targets saturate to `i32` first, then wrap
                (true, false) if F::KIND.bit_size() <= 32 => F::from_i64(i64::from(a.to_i32())),
                _ => F::from_i64(a.to_i64()),
            })
            .collect();
        Ok(Vector::from_lanes(species, lanes))
    }
}

// ================================================================================================
// DEBUG SURFACE
// ================================================================================================

impl<E: Element> fmt::Display for Vector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, lane) in self.lanes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lane)?;
        }
        write!(f, "]")
    }
}

impl<E: Element> fmt::Debug for Vector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("species", &self.species)
            .field("lanes", &self.lanes)
            .finish()
    }
}

/// Lane-bit equality: `NaN` lanes with equal payloads compare equal, `-0.0 != +0.0`.
impl<E: Element> PartialEq for Vector<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species
            && self
                .lanes
                .iter()
                .zip(other.lanes.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl<E: Element> Eq for Vector<E> {}

/// Hashes `(species, lane bit patterns)`.
impl<E: Element> Hash for Vector<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.lanes
            .iter()
            .map(|a| a.to_bits())
            .collect::<Vec<u64>>()
            .hash(state);
    }
}
