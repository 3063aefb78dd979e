//! Lane reductions, identities and widening reductions.

use half::f16;
use lanely::{
    simd::{
        tolerance::reduction_tolerance, AssociativeOp, Element, Mask, Shuffle, Species, Vector,
    },
    VectorError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn test_reduce_add_and_masked_add() {
    let species = Species::<i32>::of(4).unwrap();
    let a = Vector::from_values(species, &[1, 2, 3, 4]).unwrap();
    let mask = Mask::from_values(species, &[true, false, true, false]).unwrap();

    assert_eq!(a.reduce_lanes(AssociativeOp::Add).unwrap(), 10);
    assert_eq!(a.reduce_lanes_masked(AssociativeOp::Add, &mask).unwrap(), 4);
}

#[test]
fn test_integral_reductions() {
    let species = Species::<i16>::of(8).unwrap();
    let a = Vector::from_values(species, &[3, -7, 12, 0, 5, -1, 8, 2]).unwrap();

    assert_eq!(a.reduce_lanes(AssociativeOp::Mul).unwrap(), 0);
    assert_eq!(a.reduce_lanes(AssociativeOp::Min).unwrap(), -7);
    assert_eq!(a.reduce_lanes(AssociativeOp::Max).unwrap(), 12);
    assert_eq!(a.reduce_lanes(AssociativeOp::And).unwrap(), 0);
    assert_eq!(a.reduce_lanes(AssociativeOp::Or).unwrap(), -1);
    assert_eq!(a.reduce_lanes(AssociativeOp::UMin).unwrap(), 0);
    // -1 is the largest unsigned value
    assert_eq!(a.reduce_lanes(AssociativeOp::UMax).unwrap(), -1);
    assert_eq!(a.reduce_lanes(AssociativeOp::FirstNonzero).unwrap(), 3);

    let xor = [3i16, -7, 12, 0, 5, -1, 8, 2].iter().fold(0, |acc, x| acc ^ x);
    assert_eq!(a.reduce_lanes(AssociativeOp::Xor).unwrap(), xor);
}

#[test]
fn test_masked_reduction_with_no_set_lane_is_identity() {
    let species = Species::<i64>::of(4).unwrap();
    let a = Vector::from_values(species, &[5, 6, 7, 8]).unwrap();
    let none = Mask::all(species, false);

    for op in AssociativeOp::ALL {
        assert_eq!(
            a.reduce_lanes_masked(op, &none).unwrap(),
            op.identity::<i64>().unwrap(),
            "{op}"
        );
    }
}

#[test]
fn test_identity_table() {
    assert_eq!(AssociativeOp::Add.identity::<i32>().unwrap(), 0);
    assert_eq!(AssociativeOp::Mul.identity::<i8>().unwrap(), 1);
    assert_eq!(AssociativeOp::Min.identity::<i16>().unwrap(), i16::MAX);
    assert_eq!(AssociativeOp::Max.identity::<i64>().unwrap(), i64::MIN);
    assert_eq!(AssociativeOp::And.identity::<i32>().unwrap(), -1);
    assert_eq!(AssociativeOp::UMin.identity::<i8>().unwrap(), -1);
    assert_eq!(AssociativeOp::UMax.identity::<i8>().unwrap(), 0);

    assert_eq!(AssociativeOp::Min.identity::<f32>().unwrap(), f32::INFINITY);
    assert_eq!(AssociativeOp::Max.identity::<f64>().unwrap(), f64::NEG_INFINITY);
    assert_eq!(AssociativeOp::Mul.identity::<f16>().unwrap(), f16::ONE);
    assert!(matches!(
        AssociativeOp::And.identity::<f32>(),
        Err(VectorError::CapabilityError { .. })
    ));
}

#[test]
fn test_unsupported_reductions() {
    let floats = Vector::broadcast(Species::<f32>::of(4).unwrap(), 1.0);
    assert!(floats.reduce_lanes(AssociativeOp::Xor).is_err());
    assert!(floats.reduce_lanes_to_long(AssociativeOp::Add).is_err());

    let ints = Vector::broadcast(Species::<i32>::of(4).unwrap(), 1);
    assert!(ints.reduce_lanes_to_double(AssociativeOp::Add).is_err());
}

#[test]
fn test_saturating_add_reduction_at_the_boundary() {
    let species = Species::<i8>::of(8).unwrap();
    let a = Vector::from_values(species, &[-1, 100, 100, 0, 0, 0, 0, 0]).unwrap();
    // -1 is 255 unsigned: everything after it saturates
    assert_eq!(a.reduce_lanes(AssociativeOp::SUAdd).unwrap(), -1);

    // the clamp makes the fold order irrelevant
    let reversed = a.rearrange(&Shuffle::iota(species, 7, -1)).unwrap();
    assert_eq!(reversed.to_array(), vec![0, 0, 0, 0, 0, 100, 100, -1]);
    assert_eq!(reversed.reduce_lanes(AssociativeOp::SUAdd).unwrap(), -1);

    let b = Vector::from_values(species, &[100, 100, 50, 1, 0, 0, 0, 0]).unwrap();
    assert_eq!(b.reduce_lanes(AssociativeOp::SUAdd).unwrap(), 251u8 as i8);
}

#[test]
fn test_reduce_to_long_folds_at_lane_width() {
    let species = Species::<i8>::of(8).unwrap();
    let a = Vector::broadcast(species, 100i8);

    // 800 wraps to 32 in a byte before it is sign-extended
    assert_eq!(a.reduce_lanes_to_long(AssociativeOp::Add).unwrap(), 32);
    assert_eq!(
        a.reduce_lanes_to_long(AssociativeOp::Add).unwrap(),
        a.reduce_lanes(AssociativeOp::Add).unwrap() as i64
    );

    let b = Vector::broadcast(species, -2i8);
    assert_eq!(b.reduce_lanes_to_long(AssociativeOp::Mul).unwrap(), 0);
    assert_eq!(b.reduce_lanes_to_long(AssociativeOp::Max).unwrap(), -2);

    let mask = Mask::index_in_range(species, 0, 3);
    assert_eq!(
        a.reduce_lanes_to_long_masked(AssociativeOp::Add, &mask).unwrap(),
        44
    );

    let mask = Mask::index_in_range(species, 0, 1);
    assert_eq!(
        a.reduce_lanes_to_long_masked(AssociativeOp::Add, &mask).unwrap(),
        100
    );
}

#[test]
fn test_reduce_to_long_sign_extends() {
    let species = Species::<i16>::of(4).unwrap();
    let v = Vector::from_values(species, &[i16::MAX, 1, 0, 0]).unwrap();
    assert_eq!(v.reduce_lanes_to_long(AssociativeOp::Add).unwrap(), i16::MIN as i64);

    let longs = Vector::from_values(Species::<i64>::of(2).unwrap(), &[i64::MAX, 1]).unwrap();
    assert_eq!(longs.reduce_lanes_to_long(AssociativeOp::Add).unwrap(), i64::MIN);
}

#[test]
fn test_reduce_to_double() {
    let species = Species::<f16>::of(8).unwrap();
    let a = Vector::broadcast(species, f16::from_f32(60000.0));

    // 480000 does not fit in f16, but does in the f64 accumulator
    assert_eq!(a.reduce_lanes_to_double(AssociativeOp::Add).unwrap(), 480_000.0);
    assert!(a.reduce_lanes(AssociativeOp::Add).unwrap().is_infinite());

    let mask = Mask::index_in_range(species, 0, 2);
    assert_eq!(
        a.reduce_lanes_to_double_masked(AssociativeOp::Mul, &mask).unwrap(),
        3_600_000_000.0
    );
    assert_eq!(
        a.reduce_lanes_to_double(AssociativeOp::Min).unwrap(),
        60000.0
    );
}

fn check_floating_reduction<E: Element>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let species = Species::<E>::of(8).unwrap();

    for _ in 0..100 {
        let v = Vector::from_fn(species, |_| E::from_f64(rng.random_range(0.5..2.0)));

        for op in [AssociativeOp::Add, AssociativeOp::Mul] {
            let reduced = v.reduce_lanes(op).unwrap();
            let reference = v
                .as_slice()
                .iter()
                .map(|x| x.to_f64())
                .fold(if op == AssociativeOp::Add { 0.0 } else { 1.0 }, |acc, x| {
                    if op == AssociativeOp::Add {
                        acc + x
                    } else {
                        acc * x
                    }
                });
            let tolerance = reduction_tolerance(op, E::KIND);
            assert!(
                tolerance.accepts(reduced, E::from_f64(reference)),
                "{op} over {v}: {reduced} vs {reference}"
            );
        }
    }
}

#[test]
fn test_floating_reductions_within_tolerance() {
    check_floating_reduction::<f16>(1);
    check_floating_reduction::<f32>(2);
    check_floating_reduction::<f64>(3);
}
