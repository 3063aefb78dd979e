//! Precision of reduced-precision floating lanes against the `f64` reference.
//!
//! `f16` lanes compute transcendental functions in `f32` and round once; the result must
//! stay within one ULP of the `f64` function rounded to `f16`.

use half::f16;
use lanely::simd::{
    tolerance::{
        binary_tolerance, reference_binary, reference_unary, ternary_tolerance, ulp_distance,
        unary_tolerance,
    },
    BinaryOp, Element, ElementKind, Operand, Species, TernaryOp, Tolerance, UnaryOp, Vector,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Input range on which `op` is finite and well conditioned.
fn domain(op: UnaryOp) -> (f64, f64) {
    match op {
        UnaryOp::Asin | UnaryOp::Acos | UnaryOp::Atan | UnaryOp::Tanh => (-1.0, 1.0),
        UnaryOp::Log | UnaryOp::Log10 => (0.01, 1000.0),
        UnaryOp::Log1p => (-0.9, 1000.0),
        UnaryOp::Sqrt => (0.0, 60000.0),
        UnaryOp::Cbrt => (-60000.0, 60000.0),
        UnaryOp::Exp | UnaryOp::Expm1 | UnaryOp::Sinh | UnaryOp::Cosh => (-8.0, 8.0),
        _ => (-6.0, 6.0),
    }
}

fn check_unary_precision<E: Element>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let species = Species::<E>::of(8).unwrap();

    for op in UnaryOp::ALL.into_iter().filter(|op| op.supports(E::KIND)) {
        let (low, high) = domain(op);
        let tolerance = unary_tolerance(op, E::KIND);
        let mut worst = 0u64;

        for _ in 0..200 {
            let v = Vector::from_fn(species, |_| E::from_f64(rng.random_range(low..high)));
            let result = v.unary(op).unwrap();

            for (&x, &actual) in v.as_slice().iter().zip(result.as_slice()) {
                let expected = reference_unary(op, x).unwrap();
                let distance = ulp_distance(actual, expected).unwrap_or(u64::MAX);
                worst = worst.max(distance);
                assert!(
                    tolerance.accepts(actual, expected),
                    "{op}({x}) on {}: got {actual}, reference {expected} ({distance} ulp)",
                    E::KIND
                );
            }
        }
        println!("{} {op}: worst error {worst} ulp", E::KIND);
    }
}

#[test]
fn test_f16_unary_precision() {
    check_unary_precision::<f16>(0x16);
}

#[test]
fn test_f32_unary_precision() {
    check_unary_precision::<f32>(0x32);
}

#[test]
fn test_f64_unary_precision() {
    check_unary_precision::<f64>(0x64);
}

#[test]
fn test_f16_binary_precision() {
    let mut rng = StdRng::seed_from_u64(7);
    let species = Species::<f16>::of(8).unwrap();

    let cases = [
        (BinaryOp::Atan2, (-10.0, 10.0), (-10.0, 10.0)),
        (BinaryOp::Pow, (0.1, 4.0), (-3.0, 3.0)),
        (BinaryOp::Hypot, (-100.0, 100.0), (-100.0, 100.0)),
    ];

    for (op, (x_low, x_high), (y_low, y_high)) in cases {
        let tolerance = binary_tolerance(op, ElementKind::F16);
        assert_eq!(tolerance, Tolerance::Ulps(1));

        for _ in 0..200 {
            let x = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(x_low..x_high)));
            let y = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(y_low..y_high)));
            let result = x.binary(op, &y).unwrap();

            for i in 0..species.lanes() {
                let (a, b) = (x.lane(i).unwrap(), y.lane(i).unwrap());
                let expected = reference_binary(op, a, b).unwrap();
                assert!(
                    tolerance.accepts(result.lane(i).unwrap(), expected),
                    "{op}({a}, {b}): got {}, reference {expected}",
                    result.lane(i).unwrap()
                );
            }
        }
    }
}

#[test]
fn test_f16_fma_precision() {
    let mut rng = StdRng::seed_from_u64(99);
    let species = Species::<f16>::of(16).unwrap();
    let tolerance = ternary_tolerance(TernaryOp::Fma, ElementKind::F16);

    for _ in 0..200 {
        let a = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(-50.0..50.0)));
        let b = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(-50.0..50.0)));
        let c = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(-50.0..50.0)));
        let result = a
            .ternary(TernaryOp::Fma, Operand::Vector(&b), Operand::Vector(&c))
            .unwrap();

        for i in 0..species.lanes() {
            let (x, y, z) = (a.lane(i).unwrap(), b.lane(i).unwrap(), c.lane(i).unwrap());
            let expected = f16::from_f64(x.to_f64().mul_add(y.to_f64(), z.to_f64()));
            assert!(
                tolerance.accepts(result.lane(i).unwrap(), expected),
                "fma({x}, {y}, {z})"
            );
        }
    }
}

#[test]
fn test_exact_operators_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(21);
    let species = Species::<f16>::of(8).unwrap();

    for _ in 0..100 {
        let a = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(-100.0..100.0)));
        let b = Vector::from_fn(species, |_| f16::from_f64(rng.random_range(-100.0..100.0)));

        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            assert_eq!(binary_tolerance(op, ElementKind::F16), Tolerance::Exact);
            let result = a.binary(op, &b).unwrap();
            for i in 0..species.lanes() {
                let (x, y) = (a.lane(i).unwrap().to_f64(), b.lane(i).unwrap().to_f64());
                let exact = match op {
                    BinaryOp::Add => x + y,
                    BinaryOp::Sub => x - y,
                    BinaryOp::Mul => x * y,
                    _ => x / y,
                };
                // one rounding from the exact f64 value
                assert!(Tolerance::Exact.accepts(result.lane(i).unwrap(), f16::from_f64(exact)));
            }
        }
    }
}
