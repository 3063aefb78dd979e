//! Cross-lane operations: rearrange, compress/expand, slice/unslice, select-from,
//! gather and scatter.
//!
//! Every permutation index coming from a vector lane or a shuffle is floor-mod reduced,
//! so negative indices wrap instead of truncating toward zero. Gathers and scatters
//! address caller arrays and are bounds-checked instead: every participating lane is
//! validated before any element is read or written.

use crate::{
    error::{index_error, Result},
    simd::{Element, Mask, Shuffle, Species, Vector},
    utils::{check_from_index_size, check_offset_index, floor_mod},
};

impl<E: Element> Vector<E> {
    fn permuted<F: FnMut(usize) -> E>(&self, f: F) -> Self {
        Vector::from_lanes(self.species, (0..self.length()).map(f).collect())
    }

    fn check_shuffle(&self, shuffle: &Shuffle<E>) -> Result<()> {
        shuffle.check_species(self.species)
    }

    fn check_origin(&self, origin: usize) -> Result<()> {
        if origin <= self.length() {
            Ok(())
        } else {
            Err(index_error(
                origin as i64,
                self.length() + 1,
                "slice origin out of range",
            ))
        }
    }

    /// Zeroes the lanes that are clear in `mask`.
    fn zero_unset(&self, mask: &Mask<E>) -> Result<Self> {
        self.check_mask(mask)?;
        Ok(self.permuted(|i| if mask.bits[i] { self.lanes[i] } else { E::default() }))
    }

    // ============================================================================================
    // REARRANGE
    // ============================================================================================

    /// Lane `i` of the result is `self[shuffle[i] mod lanes]`.
    pub fn rearrange(&self, shuffle: &Shuffle<E>) -> Result<Self> {
        self.check_shuffle(shuffle)?;
        Ok(self.permuted(|i| self.lanes[shuffle.source(i)]))
    }

    /// Like [`rearrange`](Self::rearrange), with lanes clear in `mask` set to zero.
    pub fn rearrange_masked(&self, shuffle: &Shuffle<E>, mask: &Mask<E>) -> Result<Self> {
        self.rearrange(shuffle)?.zero_unset(mask)
    }

    /// Reads `self` for shuffle indices below the lane count and `other` for the rest.
    pub fn rearrange_two(&self, shuffle: &Shuffle<E>, other: &Vector<E>) -> Result<Self> {
        self.check_shuffle(shuffle)?;
        self.check(other)?;
        let n = self.length();
        Ok(self.permuted(|i| match shuffle.source_two(i) {
            index if index < n => self.lanes[index],
            index => other.lanes[index - n],
        }))
    }

    // ============================================================================================
    // COMPRESS / EXPAND
    // ============================================================================================

    /// Packs the lanes set in `mask` into the leading lanes, in order; the rest are zero.
    pub fn compress(&self, mask: &Mask<E>) -> Result<Self> {
        self.check_mask(mask)?;
        let mut lanes = vec![E::default(); self.length()].into_boxed_slice();
        let selected = self
            .lanes
            .iter()
            .zip(mask.bits.iter())
            .filter_map(|(&a, &bit)| bit.then_some(a));
        for (slot, a) in lanes.iter_mut().zip(selected) {
            *slot = a;
        }
        Ok(Vector::from_lanes(self.species, lanes))
    }

    /// Distributes the leading lanes, in order, to the lanes set in `mask`; the rest
    /// are zero. Inverse of [`compress`](Self::compress) on the set lanes.
    pub fn expand(&self, mask: &Mask<E>) -> Result<Self> {
        self.check_mask(mask)?;
        let mut next = 0;
        Ok(self.permuted(|i| {
            if mask.bits[i] {
                next += 1;
                self.lanes[next - 1]
            } else {
                E::default()
            }
        }))
    }

    // ============================================================================================
    // SLICE / UNSLICE
    // ============================================================================================

    /// The `lanes`-long window starting at lane `origin` of the concatenation
    /// `self ++ other`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` unless `origin <= lanes`.
    pub fn slice(&self, origin: usize, other: &Vector<E>) -> Result<Self> {
        self.check(other)?;
        self.check_origin(origin)?;
        let n = self.length();
        Ok(self.permuted(|i| {
            if i + origin < n {
                self.lanes[i + origin]
            } else {
                other.lanes[i + origin - n]
            }
        }))
    }

    /// [`slice`](Self::slice) against a zero vector.
    pub fn slice_zero_filled(&self, origin: usize) -> Result<Self> {
        self.slice(origin, &Vector::zero(self.species))
    }

    /// [`slice`](Self::slice) with lanes clear in `mask` set to zero.
    pub fn slice_masked(&self, origin: usize, other: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.slice(origin, other)?.zero_unset(mask)
    }

    /// Inverse of [`slice`](Self::slice): inserts `self` at lane `origin` of the
    /// conceptual pair `background ++ background` and returns part `part` of it.
    ///
    /// Part 0 replaces lanes `origin..lanes` with `self[0..lanes - origin]`; part 1
    /// replaces lanes `0..origin` with `self[lanes - origin..lanes]`. Other lanes keep
    /// the background.
    pub fn unslice(&self, origin: usize, background: &Vector<E>, part: usize) -> Result<Self> {
        self.unslice_with(origin, background, part, None)
    }

    /// [`unslice`](Self::unslice) inserting only the lanes of `self` set in `mask`.
    pub fn unslice_masked(
        &self,
        origin: usize,
        background: &Vector<E>,
        part: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        self.unslice_with(origin, background, part, Some(mask))
    }

    /// [`unslice`](Self::unslice) part 0 over a zero background.
    pub fn unslice_zero_filled(&self, origin: usize) -> Result<Self> {
        self.unslice(origin, &Vector::zero(self.species), 0)
    }

    fn unslice_with(
        &self,
        origin: usize,
        background: &Vector<E>,
        part: usize,
        mask: Option<&Mask<E>>,
    ) -> Result<Self> {
        self.check(background)?;
        self.check_origin(origin)?;
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }
        if part > 1 {
            return Err(index_error(
                part as i64,
                2,
                format!("bad part number {} for slice operation", part),
            ));
        }

        let n = self.length();
        Ok(self.permuted(|i| {
            let source = match part {
                0 if i >= origin => Some(i - origin),
                1 if i < origin => Some(i + n - origin),
                _ => None,
            };
            match source {
                Some(j) if mask.map_or(true, |mask| mask.bits[j]) => self.lanes[j],
                _ => background.lanes[i],
            }
        }))
    }

    // ============================================================================================
    // SELECT-FROM
    // ============================================================================================

    fn lane_index(&self, lane: usize, span: usize) -> usize {
        floor_mod(i64::from(self.lanes[lane].to_i32()), span as i64) as usize
    }

    /// Uses the lanes of `self` as indices into `data`: lane `i` is
    /// `data[self[i] mod lanes]`.
    pub fn select_from(&self, data: &Vector<E>) -> Result<Self> {
        self.check(data)?;
        let n = self.length();
        Ok(self.permuted(|i| data.lanes[self.lane_index(i, n)]))
    }

    /// [`select_from`](Self::select_from) with lanes clear in `mask` set to zero.
    pub fn select_from_masked(&self, data: &Vector<E>, mask: &Mask<E>) -> Result<Self> {
        self.select_from(data)?.zero_unset(mask)
    }

    /// Indices are reduced modulo `2 * lanes`; those below `lanes` read `first`, the
    /// rest read `second`.
    pub fn select_from_two(&self, first: &Vector<E>, second: &Vector<E>) -> Result<Self> {
        self.check(first)?;
        self.check(second)?;
        let n = self.length();
        Ok(self.permuted(|i| match self.lane_index(i, 2 * n) {
            index if index < n => first.lanes[index],
            index => second.lanes[index - n],
        }))
    }

    // ============================================================================================
    // GATHER / SCATTER
    // ============================================================================================

    fn gather_index(
        array_len: usize,
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
        lane: usize,
    ) -> Result<usize> {
        let entry = check_offset_index(map_offset, lane as i64, index_map.len())?;
        check_offset_index(offset, i64::from(index_map[entry]), array_len)
    }

    /// Lane `i` is `array[offset + index_map[map_offset + i]]`.
    pub fn from_array_indexed(
        species: Species<E>,
        array: &[E],
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<Self> {
        check_from_index_size(map_offset, species.lanes(), index_map.len())?;
        let lanes = (0..species.lanes())
            .map(|i| Ok(array[Self::gather_index(array.len(), offset, index_map, map_offset, i)?]))
            .collect::<Result<Box<[E]>>>()?;
        Ok(Vector::from_lanes(species, lanes))
    }

    /// Gathers only the lanes set in `mask`; clear lanes are zero and their indices
    /// are never dereferenced.
    pub fn from_array_indexed_masked(
        species: Species<E>,
        array: &[E],
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
        mask: &Mask<E>,
    ) -> Result<Self> {
        mask.check_species(species)?;
        let lanes = (0..species.lanes())
            .map(|i| {
                if mask.bits[i] {
                    Ok(array[Self::gather_index(array.len(), offset, index_map, map_offset, i)?])
                } else {
                    Ok(E::default())
                }
            })
            .collect::<Result<Box<[E]>>>()?;
        Ok(Vector::from_lanes(species, lanes))
    }

    /// Writes lane `i` to `array[offset + index_map[map_offset + i]]`.
    ///
    /// When two lanes address the same element the higher lane wins. Nothing is written
    /// if any index is out of bounds.
    pub fn into_array_indexed(
        &self,
        array: &mut [E],
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
    ) -> Result<()> {
        self.scatter(array, offset, index_map, map_offset, None)
    }

    /// Scatters only the lanes set in `mask`.
    pub fn into_array_indexed_masked(
        &self,
        array: &mut [E],
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
        mask: &Mask<E>,
    ) -> Result<()> {
        self.scatter(array, offset, index_map, map_offset, Some(mask))
    }

    fn scatter(
        &self,
        array: &mut [E],
        offset: usize,
        index_map: &[i32],
        map_offset: usize,
        mask: Option<&Mask<E>>,
    ) -> Result<()> {
        if let Some(mask) = mask {
            self.check_mask(mask)?;
        }

        let targets = (0..self.length())
            .filter(|&i| mask.map_or(true, |mask| mask.bits[i]))
            .map(|i| {
                Self::gather_index(array.len(), offset, index_map, map_offset, i)
                    .map(|index| (index, self.lanes[i]))
            })
            .collect::<Result<Vec<(usize, E)>>>()?;

        for (index, value) in targets {
            array[index] = value;
        }
        Ok(())
    }
}
