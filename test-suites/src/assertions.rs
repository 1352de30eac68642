use soroban_fixed_point_math::FixedPoint;

pub const E6: i128 = 1_000_000;

pub fn assert_approx_eq_abs(a: i128, b: i128, delta: i128) {
    assert!(
        a >= b - delta && a <= b + delta,
        "assertion failed: `(left != right)` \
         (left: `{:?}`, right: `{:?}`, epsilon: `{:?}`)",
        a,
        b,
        delta
    );
}

/// Assert `a` is within `delta_e6` of `b`, relative to `b` and expressed in 6 decimals
pub fn assert_approx_eq_rel(a: i128, b: i128, delta_e6: i128) {
    let delta = b.abs().fixed_mul_floor(delta_e6, E6).unwrap();
    assert!(
        a >= b - delta && a <= b + delta,
        "assertion failed: `(left != right)` \
         (left: `{:?}`, right: `{:?}`, relative epsilon: `{:?}`)",
        a,
        b,
        delta_e6
    );
}
