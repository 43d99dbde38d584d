use crate::driver::efmt;

#[test]
fn efmt_layout() {
    // the hosts read Fortran-style fields: signed two-digit exponents,
    // right-aligned
    assert_eq!(efmt(0.0, 20, 12), "  0.000000000000E+00");
    assert_eq!(efmt(-76.4, 20, 12), " -7.640000000000E+01");
    assert_eq!(efmt(6.02214076e23, 20, 12), "  6.022140760000E+23");
    assert_eq!(efmt(2.5e-8, 20, 12), "  2.500000000000E-08");
    // wider exponents keep all their digits
    assert_eq!(efmt(-1.5e-123, 20, 12), "-1.500000000000E-123");
    // width 0 disables padding
    assert_eq!(efmt(0.25, 0, 18), "2.500000000000000000E-01");
}

#[test]
fn efmt_round_trip() {
    for &x in &[0.0, 1.0, -76.369839620286, 3.5e-13, -2.75e8] {
        let s = efmt(x, 20, 12);
        assert_eq!(s.len(), 20);
        let back: f64 = s.trim().parse().unwrap();
        let tol = 5e-13 * x.abs().max(1e-300);
        assert!((back - x).abs() <= tol, "{x} -> {s:?} -> {back}");
    }
}
