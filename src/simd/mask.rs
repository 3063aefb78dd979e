//! Lane masks: one boolean per lane, typed by species.
//!
//! Masks select which lanes participate in masked operations, loads and stores. They
//! are produced by comparisons and tests on vectors, by [`Mask::index_in_range`] for
//! loop tails, or directly from booleans and bit fields.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{index_error, species_mismatch, Result},
    simd::{Element, Species, Vector},
    utils::{check_from_index_size, check_index, low_bits},
};

#[derive(Clone)]
pub struct Mask<E: Element> {
    pub(crate) species: Species<E>,
    pub(crate) bits: Box<[bool]>,
}

impl<E: Element> Mask<E> {
    pub(crate) fn from_bits(species: Species<E>, bits: Box<[bool]>) -> Self {
        debug_assert_eq!(bits.len(), species.lanes());
        Self { species, bits }
    }

    /// Every lane set to `bit`.
    pub fn all(species: Species<E>, bit: bool) -> Self {
        Self::from_bits(species, vec![bit; species.lanes()].into_boxed_slice())
    }

    pub fn from_values(species: Species<E>, values: &[bool]) -> Result<Self> {
        if values.len() != species.lanes() {
            return Err(index_error(
                values.len() as i64,
                species.lanes(),
                "mask value count must equal the lane count",
            ));
        }
        Ok(Self::from_bits(species, values.into()))
    }

    pub fn from_array(species: Species<E>, array: &[bool], offset: usize) -> Result<Self> {
        check_from_index_size(offset, species.lanes(), array.len())?;
        Ok(Self::from_bits(
            species,
            array[offset..offset + species.lanes()].into(),
        ))
    }

    /// Lane `i` is set iff bit `i` of `bits` is set; bits past the lane count are ignored.
    pub fn from_long(species: Species<E>, bits: u64) -> Self {
        Self::from_bits(
            species,
            (0..species.lanes()).map(|i| (bits >> i) & 1 == 1).collect(),
        )
    }

    /// Lane `i` is set iff `0 <= offset + i < limit`.
    ///
    /// This is the tail mask of a strip-mined loop: with `offset` the start of the
    /// current stride and `limit` the array length, it covers exactly the in-bounds lanes.
    pub fn index_in_range(species: Species<E>, offset: i64, limit: i64) -> Self {
        Self::from_bits(
            species,
            (0..species.lanes() as i64)
                .map(|i| {
                    let index = offset.saturating_add(i);
                    index >= 0 && index < limit
                })
                .collect(),
        )
    }

    #[inline(always)]
    pub fn species(&self) -> Species<E> {
        self.species
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.bits.len()
    }

    pub(crate) fn check_species(&self, species: Species<E>) -> Result<()> {
        if self.species == species {
            Ok(())
        } else {
            Err(species_mismatch(species, self.species))
        }
    }

    /// Bit `i` of the result is lane `i`.
    pub fn to_long(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &bit)| acc | ((bit as u64) << i))
    }

    pub fn to_array(&self) -> Vec<bool> {
        self.bits.to_vec()
    }

    pub fn into_array(&self, array: &mut [bool], offset: usize) -> Result<()> {
        check_from_index_size(offset, self.length(), array.len())?;
        array[offset..offset + self.length()].copy_from_slice(&self.bits);
        Ok(())
    }

    pub fn lane_is_set(&self, index: usize) -> Result<bool> {
        Ok(self.bits[check_index(index as i64, self.length())?])
    }

    fn zip_with<F: Fn(bool, bool) -> bool>(&self, other: &Mask<E>, f: F) -> Result<Self> {
        other.check_species(self.species)?;
        Ok(Self::from_bits(
            self.species,
            self.bits
                .iter()
                .zip(other.bits.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    pub fn and(&self, other: &Mask<E>) -> Result<Self> {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &Mask<E>) -> Result<Self> {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &Mask<E>) -> Result<Self> {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// `self & !other`
    pub fn and_not(&self, other: &Mask<E>) -> Result<Self> {
        self.zip_with(other, |a, b| a & !b)
    }

    /// Lane-wise equality of two masks.
    pub fn eq(&self, other: &Mask<E>) -> Result<Self> {
        self.zip_with(other, |a, b| a == b)
    }

    pub fn not(&self) -> Self {
        Self::from_bits(self.species, self.bits.iter().map(|&a| !a).collect())
    }

    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }

    /// Index of the first set lane, or the lane count when no lane is set.
    pub fn first_true(&self) -> usize {
        self.bits
            .iter()
            .position(|&bit| bit)
            .unwrap_or(self.length())
    }

    /// Index of the last set lane, or `-1` when no lane is set.
    pub fn last_true(&self) -> isize {
        self.bits
            .iter()
            .rposition(|&bit| bit)
            .map_or(-1, |index| index as isize)
    }

    pub fn any_true(&self) -> bool {
        self.bits.iter().any(|&bit| bit)
    }

    pub fn all_true(&self) -> bool {
        self.bits.iter().all(|&bit| bit)
    }

    /// A mask with the first `true_count()` lanes set.
    pub fn compress(&self) -> Self {
        Self::index_in_range(self.species, 0, self.true_count() as i64)
    }

    /// The same lane pattern over a species of `F` with the same lane count.
    pub fn cast<F: Element>(&self) -> Result<Mask<F>> {
        let species = Species::<F>::of(self.length())?;
        Ok(Mask::from_bits(species, self.bits.clone()))
    }

    /// Set lanes become the all-ones bit pattern, clear lanes zero.
    pub fn to_vector(&self) -> Vector<E> {
        let ones = E::from_bits(low_bits(E::KIND.bit_size() as u32));
        Vector::from_lanes(
            self.species,
            self.bits
                .iter()
                .map(|&bit| if bit { ones } else { E::default() })
                .collect(),
        )
    }
}

impl<E: Element> fmt::Display for Mask<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask[")?;
        for &bit in self.bits.iter() {
            f.write_str(if bit { "T" } else { "." })?;
        }
        write!(f, "]")
    }
}

impl<E: Element> fmt::Debug for Mask<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.species, self)
    }
}

impl<E: Element> PartialEq for Mask<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.bits == other.bits
    }
}

impl<E: Element> Eq for Mask<E> {}

impl<E: Element> Hash for Mask<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.bits.hash(state);
    }
}
