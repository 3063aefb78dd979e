//! Mask construction, logic, queries and conversions.

use lanely::{
    simd::{Mask, Species, Vector},
    VectorError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn test_mask_logic() {
    let species = Species::<i32>::of(4).unwrap();
    let a = Mask::from_values(species, &[true, true, false, false]).unwrap();
    let b = Mask::from_values(species, &[true, false, true, false]).unwrap();

    assert_eq!(a.and(&b).unwrap().to_array(), vec![true, false, false, false]);
    assert_eq!(a.or(&b).unwrap().to_array(), vec![true, true, true, false]);
    assert_eq!(a.xor(&b).unwrap().to_array(), vec![false, true, true, false]);
    assert_eq!(a.and_not(&b).unwrap().to_array(), vec![false, true, false, false]);
    assert_eq!(a.eq(&b).unwrap().to_array(), vec![true, false, false, true]);
    assert_eq!(a.not().to_array(), vec![false, false, true, true]);
}

#[test]
fn test_mask_species_mismatch() {
    let a = Mask::all(Species::<i32>::of(4).unwrap(), true);
    let b = Mask::all(Species::<i32>::of(8).unwrap(), true);
    assert!(matches!(a.and(&b), Err(VectorError::SpeciesMismatch { .. })));
}

#[test]
fn test_queries() {
    let species = Species::<i16>::of(8).unwrap();
    let mask = Mask::from_values(
        species,
        &[false, true, false, true, true, false, false, false],
    )
    .unwrap();

    assert_eq!(mask.true_count(), 3);
    assert_eq!(mask.first_true(), 1);
    assert_eq!(mask.last_true(), 4);
    assert!(mask.any_true());
    assert!(!mask.all_true());
    assert!(mask.lane_is_set(3).unwrap());
    assert!(!mask.lane_is_set(0).unwrap());
    assert!(mask.lane_is_set(8).is_err());
}

#[test]
fn test_queries_on_empty_and_full_masks() {
    let species = Species::<f32>::of(4).unwrap();

    let none = Mask::all(species, false);
    assert_eq!(none.true_count(), 0);
    assert_eq!(none.first_true(), 4);
    assert_eq!(none.last_true(), -1);
    assert!(!none.any_true());
    assert!(!none.all_true());

    let all = Mask::all(species, true);
    assert_eq!(all.first_true(), 0);
    assert_eq!(all.last_true(), 3);
    assert!(all.all_true());
}

#[test]
fn test_long_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);

    let species = Species::<i8>::of(64).unwrap();
    for _ in 0..100 {
        let bits: u64 = rng.random();
        assert_eq!(Mask::from_long(species, bits).to_long(), bits);
    }

    // bits past the lane count are dropped
    let species = Species::<i32>::of(4).unwrap();
    let mask = Mask::from_long(species, 0b1111_0101);
    assert_eq!(mask.to_array(), vec![true, false, true, false]);
    assert_eq!(mask.to_long(), 0b0101);
}

#[test]
fn test_array_round_trip() {
    let species = Species::<i64>::of(2).unwrap();
    let data = [false, true, true, false];

    let mask = Mask::from_array(species, &data, 1).unwrap();
    assert_eq!(mask.to_array(), vec![true, true]);
    assert!(Mask::from_array(species, &data, 3).is_err());

    let mut out = [false; 4];
    mask.into_array(&mut out, 2).unwrap();
    assert_eq!(out, [false, false, true, true]);
    assert!(mask.into_array(&mut out, 3).is_err());

    assert!(Mask::from_values(species, &[true]).is_err());
}

#[test]
fn test_index_in_range() {
    let species = Species::<i32>::of(8).unwrap();

    assert_eq!(
        Mask::index_in_range(species, 0, 5).to_array(),
        vec![true, true, true, true, true, false, false, false]
    );
    assert_eq!(
        Mask::index_in_range(species, -3, 8).to_array(),
        vec![false, false, false, true, true, true, true, true]
    );
    assert!(!Mask::index_in_range(species, 10, 8).any_true());
    assert!(Mask::index_in_range(species, 0, i64::MAX).all_true());
    assert!(!Mask::index_in_range(species, i64::MAX, i64::MAX).any_true());
}

#[test]
fn test_compress() {
    let species = Species::<i32>::of(4).unwrap();
    let mask = Mask::from_values(species, &[false, true, false, true]).unwrap();
    assert_eq!(mask.compress().to_array(), vec![true, true, false, false]);
}

#[test]
fn test_cast_keeps_lane_pattern() {
    let species = Species::<i32>::of(4).unwrap();
    let mask = Mask::from_values(species, &[true, false, false, true]).unwrap();

    let wide = mask.cast::<f64>().unwrap();
    assert_eq!(wide.species().lanes(), 4);
    assert_eq!(wide.to_array(), mask.to_array());

    // 4 x i8 is only 32 bits
    assert!(matches!(
        mask.cast::<i8>(),
        Err(VectorError::ConfigurationError { .. })
    ));
}

#[test]
fn test_to_vector() {
    let species = Species::<i16>::of(4).unwrap();
    let mask = Mask::from_values(species, &[true, false, true, false]).unwrap();
    assert_eq!(mask.to_vector().to_array(), vec![-1, 0, -1, 0]);

    let floats = Species::<f32>::of(4).unwrap();
    let mask = Mask::from_values(floats, &[false, true, false, false]).unwrap();
    let vector = mask.to_vector();
    assert_eq!(vector.lane(1).unwrap().to_bits(), u32::MAX);
    assert_eq!(vector.lane(0).unwrap().to_bits(), 0);
}

#[test]
fn test_comparison_masks_drive_blend() {
    let species = Species::<i32>::of(4).unwrap();
    let a = Vector::from_values(species, &[5, -3, 0, 9]).unwrap();

    let negative = a.compare_scalar(lanely::simd::Comparison::Lt, 0).unwrap();
    let clamped = a.blend(&Vector::zero(species), &negative).unwrap();
    assert_eq!(clamped.to_array(), vec![5, 0, 0, 9]);
}

#[test]
fn test_display() {
    let species = Species::<i32>::of(4).unwrap();
    let mask = Mask::from_values(species, &[true, false, true, false]).unwrap();
    assert_eq!(mask.to_string(), "Mask[T.T.]");
}
