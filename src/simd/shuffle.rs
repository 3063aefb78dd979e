//! Lane permutations.
//!
//! A [`Shuffle`] stores one source index per lane, floor-mod reduced into
//! `[0, 2 * lanes)` when it is built. For single-vector rearranges the effective source
//! is that index mod `lanes`; two-vector rearranges read the second vector for indices
//! `>= lanes`.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::{index_error, species_mismatch, Result},
    simd::{Element, Species, Vector},
    utils::{check_from_index_size, check_index, floor_mod},
};

#[derive(Clone)]
pub struct Shuffle<E: Element> {
    pub(crate) species: Species<E>,
    pub(crate) indices: Box<[i32]>,
}

impl<E: Element> Shuffle<E> {
    fn reduced<I>(species: Species<E>, indices: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let span = 2 * species.lanes() as i64;
        Self {
            species,
            indices: indices
                .into_iter()
                .map(|index| floor_mod(index, span) as i32)
                .collect(),
        }
    }

    pub fn from_values(species: Species<E>, indices: &[i32]) -> Result<Self> {
        if indices.len() != species.lanes() {
            return Err(index_error(
                indices.len() as i64,
                species.lanes(),
                "shuffle index count must equal the lane count",
            ));
        }
        Ok(Self::reduced(species, indices.iter().map(|&i| i as i64)))
    }

    pub fn from_array(species: Species<E>, indices: &[i32], offset: usize) -> Result<Self> {
        check_from_index_size(offset, species.lanes(), indices.len())?;
        Self::from_values(species, &indices[offset..offset + species.lanes()])
    }

    /// Lane `i` reads source `start + i * step`.
    pub fn iota(species: Species<E>, start: i32, step: i32) -> Self {
        Self::reduced(
            species,
            (0..species.lanes() as i64).map(|i| start as i64 + i * step as i64),
        )
    }

    pub fn from_fn<F: FnMut(usize) -> i32>(species: Species<E>, mut f: F) -> Self {
        Self::reduced(species, (0..species.lanes()).map(|i| f(i) as i64))
    }

    #[inline(always)]
    pub fn species(&self) -> Species<E> {
        self.species
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.indices.len()
    }

    /// Single-source index of lane `lane`, in `[0, lanes)`.
    #[inline(always)]
    pub(crate) fn source(&self, lane: usize) -> usize {
        self.indices[lane] as usize % self.length()
    }

    /// Two-source index of lane `lane`, in `[0, 2 * lanes)`.
    #[inline(always)]
    pub(crate) fn source_two(&self, lane: usize) -> usize {
        self.indices[lane] as usize
    }

    pub(crate) fn check_species(&self, species: Species<E>) -> Result<()> {
        if self.species == species {
            Ok(())
        } else {
            Err(species_mismatch(species, self.species))
        }
    }

    /// The stored index of lane `lane`, in `[0, 2 * lanes)`.
    pub fn lane_source(&self, lane: usize) -> Result<i32> {
        Ok(self.indices[check_index(lane as i64, self.length())?])
    }

    /// Single-source indices, each in `[0, lanes)`.
    pub fn to_array(&self) -> Vec<i32> {
        (0..self.length()).map(|i| self.source(i) as i32).collect()
    }

    /// A shuffle whose indices all address the first source.
    pub fn wrap_indexes(&self) -> Self {
        Self {
            species: self.species,
            indices: self.to_array().into_boxed_slice(),
        }
    }

    /// Fails with `IndexOutOfBounds` if any index addresses the second source.
    pub fn check_indexes(&self) -> Result<Self> {
        match self
            .indices
            .iter()
            .find(|&&index| index as usize >= self.length())
        {
            Some(&index) => Err(index_error(
                index as i64,
                self.length(),
                "shuffle index addresses the second source",
            )),
            None => Ok(self.clone()),
        }
    }

    /// Composition: lane `i` of the result is `self[other[i]]`.
    pub fn rearrange(&self, other: &Shuffle<E>) -> Result<Self> {
        other.check_species(self.species)?;
        Ok(Self {
            species: self.species,
            indices: (0..self.length())
                .map(|i| self.indices[other.source(i)])
                .collect(),
        })
    }

    /// A vector of the single-source indices.
    pub fn to_vector(&self) -> Vector<E> {
        Vector::from_lanes(
            self.species,
            (0..self.length())
                .map(|i| E::from_i64(self.source(i) as i64))
                .collect(),
        )
    }

    /// True when no two lanes read the same single-source index.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.length()];
        (0..self.length()).all(|i| !std::mem::replace(&mut seen[self.source(i)], true))
    }

    /// The inverse permutation, if this shuffle is one.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_permutation() {
            return None;
        }
        let mut indices = vec![0i32; self.length()];
        for i in 0..self.length() {
            indices[self.source(i)] = i as i32;
        }
        Some(Self {
            species: self.species,
            indices: indices.into_boxed_slice(),
        })
    }
}

impl<E: Element> Vector<E> {
    /// Lane values, converted to `i32` and floor-mod reduced, as shuffle indices.
    ///
    /// Floating lanes saturate at the `i32` range and NaN becomes zero.
    pub fn to_shuffle(&self) -> Shuffle<E> {
        Shuffle::reduced(self.species, self.lanes.iter().map(|&e| i64::from(e.to_i32())))
    }
}

impl<E: Element> fmt::Display for Shuffle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shuffle[")?;
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}

impl<E: Element> fmt::Debug for Shuffle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.species, self)
    }
}

impl<E: Element> PartialEq for Shuffle<E> {
    fn eq(&self, other: &Self) -> bool {
        self.species == other.species && self.indices == other.indices
    }
}

impl<E: Element> Eq for Shuffle<E> {}

impl<E: Element> Hash for Shuffle<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.species.hash(state);
        self.indices.hash(state);
    }
}
