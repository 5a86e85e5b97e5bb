use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..64 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = Rng64::new(1);
    let mut b = Rng64::new(2);
    assert_ne!(a.next_u64(), b.next_u64());
}

#[test]
fn unit_interval_is_half_open() {
    let mut rng = Rng64::new(7);
    for _ in 0..10_000 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn range_u32_stays_in_bounds_and_hits_both_ends() {
    let mut rng = Rng64::new(9);
    let mut seen_lo = false;
    let mut seen_hi = false;
    for _ in 0..10_000 {
        let v = rng.range_u32(70, 90).unwrap();
        assert!((70..90).contains(&v));
        seen_lo |= v == 70;
        seen_hi |= v == 89;
    }
    assert!(seen_lo && seen_hi);
}

#[test]
fn range_u32_rejects_empty_range() {
    let mut rng = Rng64::new(0);
    assert!(matches!(
        rng.range_u32(5, 5),
        Err(SkylineError::Config(_))
    ));
    assert!(rng.range_u32(6, 5).is_err());
}

#[test]
fn range_f64_respects_bounds() {
    let mut rng = Rng64::new(3);
    for _ in 0..1000 {
        let v = rng.range_f64(0.0, 20.0);
        assert!((0.0..20.0).contains(&v));
    }
}
