//! Scalar, SIMD and parallel slice kernels must agree.

use lanely::{
    simd::{AssociativeOp, BinaryOp},
    SimdLanewise, VectorError, PARALLEL_SIMD_THRESHOLD, SIMD_THRESHOLD,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Lengths around every kernel boundary, including ragged tails.
fn lengths() -> Vec<usize> {
    vec![
        0,
        1,
        7,
        SIMD_THRESHOLD - 1,
        SIMD_THRESHOLD,
        SIMD_THRESHOLD + 3,
        1000,
        4099,
        PARALLEL_SIMD_THRESHOLD + 1,
        PARALLEL_SIMD_THRESHOLD + 12_345,
    ]
}

#[test]
fn test_i32_lanewise_kernels_agree() {
    let mut rng = StdRng::seed_from_u64(42);

    for len in lengths() {
        let a: Vec<i32> = (0..len).map(|_| rng.random()).collect();
        let b: Vec<i32> = (0..len).map(|_| rng.random()).collect();

        for op in [BinaryOp::Add, BinaryOp::Mul, BinaryOp::Xor, BinaryOp::Max, BinaryOp::SUAdd] {
            let scalar = a.as_slice().scalar_lanewise(op, &b).unwrap();
            let simd = a.as_slice().simd_lanewise(op, &b).unwrap();
            let par = a.as_slice().par_simd_lanewise(op, &b).unwrap();

            assert_eq!(scalar.len(), len);
            assert_eq!(simd, scalar, "{op} simd, len {len}");
            assert_eq!(par, scalar, "{op} parallel, len {len}");
        }
    }
}

#[test]
fn test_f32_lanewise_kernels_agree() {
    let mut rng = StdRng::seed_from_u64(43);

    for len in lengths() {
        let a: Vec<f32> = (0..len).map(|_| rng.random_range(-1000.0..1000.0)).collect();
        let b: Vec<f32> = (0..len).map(|_| rng.random_range(-1000.0..1000.0)).collect();

        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            let scalar = a.as_slice().scalar_lanewise(op, &b).unwrap();
            let simd = a.as_slice().simd_lanewise(op, &b).unwrap();
            let par = a.as_slice().par_simd_lanewise(op, &b).unwrap();

            for i in 0..len {
                assert_eq!(simd[i].to_bits(), scalar[i].to_bits(), "{op} simd at {i}");
                assert_eq!(par[i].to_bits(), scalar[i].to_bits(), "{op} parallel at {i}");
            }
        }
    }
}

#[test]
fn test_large_array_addition() {
    let len = PARALLEL_SIMD_THRESHOLD * 2 + 17;
    let a: Vec<f64> = (0..len).map(|i| i as f64).collect();
    let b: Vec<f64> = (0..len).map(|i| -(i as f64) + 1.0).collect();

    let result = a.as_slice().par_simd_lanewise(BinaryOp::Add, &b).unwrap();
    assert!(result.iter().all(|&x| x == 1.0));
}

#[test]
fn test_integral_reductions_agree() {
    let mut rng = StdRng::seed_from_u64(44);

    for len in lengths() {
        let a: Vec<i16> = (0..len).map(|_| rng.random()).collect();

        for op in [
            AssociativeOp::Add,
            AssociativeOp::Min,
            AssociativeOp::Max,
            AssociativeOp::Xor,
            AssociativeOp::UMax,
        ] {
            let scalar = a.as_slice().scalar_reduce(op).unwrap();
            assert_eq!(a.as_slice().simd_reduce(op).unwrap(), scalar, "{op}, len {len}");
            assert_eq!(a.as_slice().par_simd_reduce(op).unwrap(), scalar, "{op}, len {len}");
        }
    }
}

#[test]
fn test_reduction_of_empty_slice_is_identity() {
    let empty: [f32; 0] = [];
    assert_eq!(empty.simd_reduce(AssociativeOp::Add).unwrap(), 0.0);
    assert_eq!(empty.par_simd_reduce(AssociativeOp::Min).unwrap(), f32::INFINITY);
    assert_eq!(empty.as_slice().simd_lanewise(BinaryOp::Add, &[]).unwrap(), vec![]);
}

#[test]
fn test_floating_sum_close_to_scalar() {
    let mut rng = StdRng::seed_from_u64(45);
    let a: Vec<f64> = (0..PARALLEL_SIMD_THRESHOLD + 999)
        .map(|_| rng.random_range(0.0..1.0))
        .collect();

    let scalar = a.as_slice().scalar_reduce(AssociativeOp::Add).unwrap();
    let simd = a.as_slice().simd_reduce(AssociativeOp::Add).unwrap();
    let par = a.as_slice().par_simd_reduce(AssociativeOp::Add).unwrap();

    assert!((simd - scalar).abs() <= 1e-9 * scalar, "{simd} vs {scalar}");
    assert!((par - scalar).abs() <= 1e-9 * scalar, "{par} vs {scalar}");
}

#[test]
fn test_sum_to_long_widens() {
    let a = vec![i8::MAX; 1001];
    assert_eq!(a.as_slice().simd_sum_to_long().unwrap(), 127 * 1001);

    let b: Vec<i64> = (0..10_000).collect();
    assert_eq!(b.as_slice().simd_sum_to_long().unwrap(), 49_995_000);

    let floats = vec![1.0f32; 16];
    assert!(matches!(
        floats.as_slice().simd_sum_to_long(),
        Err(VectorError::CapabilityError { .. })
    ));
}

#[test]
fn test_length_mismatch() {
    let a = vec![1i32; 100];
    let b = vec![1i32; 99];

    for result in [
        a.as_slice().scalar_lanewise(BinaryOp::Add, &b),
        a.as_slice().simd_lanewise(BinaryOp::Add, &b),
        a.as_slice().par_simd_lanewise(BinaryOp::Add, &b),
    ] {
        assert!(matches!(result, Err(VectorError::IndexOutOfBounds { .. })));
    }
}

#[test]
fn test_unsupported_operator() {
    let a = vec![1.0f32; 100];
    assert!(matches!(
        a.as_slice().simd_lanewise(BinaryOp::And, &a),
        Err(VectorError::CapabilityError { .. })
    ));
    assert!(matches!(
        a.as_slice().par_simd_reduce(AssociativeOp::Or),
        Err(VectorError::CapabilityError { .. })
    ));
}

#[test]
fn test_integer_division_by_zero_is_reported() {
    let a = vec![10i32; 200];
    let mut b = vec![2i32; 200];
    b[150] = 0;

    assert!(matches!(
        a.as_slice().simd_lanewise(BinaryOp::Div, &b),
        Err(VectorError::ArithmeticError { .. })
    ));

    // zero divisor in the masked-off part of the tail stride is never touched
    let a = vec![10i32; 199];
    let b = vec![5i32; 199];
    assert!(a
        .as_slice()
        .simd_lanewise(BinaryOp::Div, &b)
        .unwrap()
        .iter()
        .all(|&x| x == 2));
}
