//! # lanely
//!
//! Portable explicit-SIMD lane computations.
//!
//! A [`Vector`](simd::Vector) is a fixed-length group of lanes of one element type,
//! described by a [`Species`](simd::Species). Every lane-wise operator, comparison,
//! permutation and reduction produces the same bits on every target: the lane count is
//! part of the type's runtime species, never of the machine it runs on. The build script
//! only picks the *preferred* width used by `Shape::Max` and the slice kernels.
//!
//! ```rust
//! use lanely::simd::{AssociativeOp, Mask, Species, Vector};
//!
//! let species = Species::<i32>::of(4)?;
//! let a = Vector::from_values(species, &[1, 2, 3, 4])?;
//! let mask = Mask::from_values(species, &[true, false, true, false])?;
//!
//! assert_eq!(a.reduce_lanes(AssociativeOp::Add)?, 10);
//! assert_eq!(a.reduce_lanes_masked(AssociativeOp::Add, &mask)?, 4);
//! # Ok::<(), lanely::VectorError>(())
//! ```
//!
//! Element types: `i8`, `i16`, `i32`, `i64`, [`half::f16`], `f32`, `f64`.

pub mod error;
pub mod simd;
pub mod utils;

pub use error::{Result, VectorError};
pub use simd::SimdLanewise;

/// Slices shorter than this use the scalar kernel.
pub const SIMD_THRESHOLD: usize = 64;

/// Slices longer than this are split across the rayon pool.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Elements per parallel work item, rounded down to whole strides.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
