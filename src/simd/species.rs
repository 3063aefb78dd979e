//! Species and shapes: the type-checking unit of every vector operation.
//!
//! A [`Species`] pairs an element type with a lane count. It is a validated `Copy`
//! value: constructing one either succeeds or fails with a
//! [`ConfigurationError`](crate::VectorError::ConfigurationError), and nothing
//! afterwards can invalidate it.
//!
//! A [`Shape`] is a hardware width class. `Shape::Max` resolves to the widest vector
//! width detected on the build machine (see `build.rs`), overridable with the
//! `LANELY_MAX_VECTOR_BITS` environment variable at build time.
//!
//! ```rust
//! use lanely::simd::{Shape, Species};
//!
//! let species = Species::<i32>::of(4).unwrap();
//! assert_eq!(species.shape(), Shape::S128);
//! assert_eq!(species.with_lanes::<i8>().unwrap().lanes(), 16);
//! assert_eq!(species.loop_bound(10usize), 8);
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use num::{Integer, NumCast, PrimInt};
use tracing::debug;

use crate::{
    error::{configuration_error, Result},
    simd::{Element, ElementKind, Mask, Shuffle, Vector},
    utils::floor_mod,
};

/// Maximum vector width, in bits, that any species may span.
pub const MAX_VECTOR_BITS: usize = 512;

/// Preferred vector width selected by the build script.
pub const PREFERRED_VECTOR_BITS: usize = if cfg!(avx512) {
    512
} else if cfg!(avx2) {
    256
} else {
    128
};

/// Hardware vector width classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    S64,
    S128,
    S256,
    S512,
    /// The widest width available on the target.
    Max,
}

impl Shape {
    pub const NAMED: [Shape; 4] = [Shape::S64, Shape::S128, Shape::S256, Shape::S512];

    pub const fn bit_size(self) -> usize {
        match self {
            Shape::S64 => 64,
            Shape::S128 => 128,
            Shape::S256 => 256,
            Shape::S512 => 512,
            Shape::Max => PREFERRED_VECTOR_BITS,
        }
    }

    /// The named shape of exactly `bits` bits.
    pub fn for_bit_size(bits: usize) -> Option<Shape> {
        Shape::NAMED.into_iter().find(|shape| shape.bit_size() == bits)
    }

    /// The named shape with the preferred width.
    pub fn preferred() -> Shape {
        Shape::for_bit_size(PREFERRED_VECTOR_BITS).unwrap_or(Shape::S128)
    }

    /// Derives the species of element type `E` that fills this shape.
    pub fn with_lanes<E: Element>(self) -> Result<Species<E>> {
        let lanes = self.bit_size() / E::KIND.bit_size();
        Species::<E>::validate(lanes)?;
        Ok(Species {
            lanes,
            shape: self,
            _element: PhantomData,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::S64 => "S_64_BIT",
            Shape::S128 => "S_128_BIT",
            Shape::S256 => "S_256_BIT",
            Shape::S512 => "S_512_BIT",
            Shape::Max => "S_Max_BIT",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An element type paired with a lane count.
///
/// Two species are equal iff their element kinds and lane counts are equal; the shape
/// tag (`Max` versus the equivalent named shape) does not take part in equality.
pub struct Species<E: Element> {
    lanes: usize,
    shape: Shape,
    _element: PhantomData<fn() -> E>,
}

impl<E: Element> Species<E> {
    /// The species of `lanes` lanes of `E`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` unless `lanes` is a power of two and the vector
    /// spans 64, 128, 256 or 512 bits.
    pub fn of(lanes: usize) -> Result<Self> {
        Self::validate(lanes)?;
        let shape = Shape::for_bit_size(lanes * E::KIND.bit_size())
            .ok_or_else(|| configuration_error(E::KIND, lanes, "no shape for species"))?;
        Ok(Species {
            lanes,
            shape,
            _element: PhantomData,
        })
    }

    /// The species filling `shape`.
    pub fn from_shape(shape: Shape) -> Result<Self> {
        shape.with_lanes::<E>()
    }

    /// The species filling the preferred shape.
    pub fn preferred() -> Result<Self> {
        Shape::preferred().with_lanes::<E>()
    }

    fn validate(lanes: usize) -> Result<()> {
        let bits = lanes.checked_mul(E::KIND.bit_size()).unwrap_or(usize::MAX);

        let problem = if lanes == 0 || !lanes.is_power_of_two() {
            Some(format!("lane count {} is not a positive power of two", lanes))
        } else if bits > MAX_VECTOR_BITS {
            Some(format!("{} bits exceeds {} bits", bits, MAX_VECTOR_BITS))
        } else if Shape::for_bit_size(bits).is_none() {
            Some(format!("{} bits is not a supported vector width", bits))
        } else {
            None
        };

        match problem {
            Some(message) => {
                debug!(kind = %E::KIND, lanes, %message, "rejected species");
                Err(configuration_error(E::KIND, lanes, message))
            }
            None => Ok(()),
        }
    }

    #[inline(always)]
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.lanes
    }

    pub fn element_kind(&self) -> ElementKind {
        E::KIND
    }

    pub fn element_size(&self) -> usize {
        E::KIND.bit_size()
    }

    pub fn vector_bit_size(&self) -> usize {
        self.lanes * E::KIND.bit_size()
    }

    pub fn vector_byte_size(&self) -> usize {
        self.vector_bit_size() / 8
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The species of element type `F` with the same shape.
    pub fn with_lanes<F: Element>(&self) -> Result<Species<F>> {
        self.shape.with_lanes::<F>()
    }

    /// The species of the same element type with another shape.
    pub fn with_shape(&self, shape: Shape) -> Result<Species<E>> {
        shape.with_lanes::<E>()
    }

    /// Largest multiple of the lane count that does not exceed `length`.
    ///
    /// Works for any primitive integer; negative lengths round toward negative infinity.
    pub fn loop_bound<T: PrimInt + Integer>(&self, length: T) -> T {
        match <T as NumCast>::from(self.lanes) {
            Some(lanes) => length - floor_mod(length, lanes),
            // the lane count does not fit T: no full stride fits either
            None => T::zero(),
        }
    }

    pub fn zero(&self) -> Vector<E> {
        Vector::zero(*self)
    }

    pub fn broadcast(&self, value: E) -> Vector<E> {
        Vector::broadcast(*self, value)
    }

    pub fn from_array(&self, array: &[E], offset: usize) -> Result<Vector<E>> {
        Vector::from_array(*self, array, offset)
    }

    pub fn mask_all(&self, bit: bool) -> Mask<E> {
        Mask::all(*self, bit)
    }

    pub fn index_in_range(&self, offset: i64, limit: i64) -> Mask<E> {
        Mask::index_in_range(*self, offset, limit)
    }

    pub fn iota_shuffle(&self, start: i32, step: i32) -> Shuffle<E> {
        Shuffle::iota(*self, start, step)
    }
}

impl<E: Element> Clone for Species<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element> Copy for Species<E> {}

impl<E: Element> PartialEq for Species<E> {
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<E: Element> Eq for Species<E> {}

impl<E: Element> Hash for Species<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        E::KIND.hash(state);
        self.lanes.hash(state);
    }
}

impl<E: Element> fmt::Debug for Species<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<E: Element> fmt::Display for Species<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Species[{}, {}, {}]", E::KIND, self.lanes, self.shape)
    }
}
