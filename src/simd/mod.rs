mod cross_lane;
mod element;
mod mask;
mod operators;
mod reduction;
mod shuffle;
mod slice;
mod species;
pub mod tolerance;
pub mod traits;
mod vector;

pub use element::{Element, ElementKind};
pub use mask::Mask;
pub use operators::{AssociativeOp, BinaryOp, Comparison, TernaryOp, TestOp, UnaryOp};
pub use shuffle::Shuffle;
pub use species::{Shape, Species, MAX_VECTOR_BITS, PREFERRED_VECTOR_BITS};
pub use tolerance::Tolerance;
pub use traits::SimdLanewise;
pub use vector::{Operand, Vector};
