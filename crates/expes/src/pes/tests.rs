use approx::assert_abs_diff_eq;
use test_case::test_case;

use crate::{ANG2BOHR, DEFAULT_STEP, Dmat};

use super::*;

/// uncoupled quadratic wells with one spring constant per coordinate, so
/// the analytic derivatives are trivial
struct Springs {
    natoms: usize,
    k: Vec<f64>,
}

impl Pes for Springs {
    fn natoms(&self) -> usize {
        self.natoms
    }

    fn energy(&self, coords: &Dmat) -> Result<f64, PesError> {
        self.check_coords(coords)?;
        let mut e = 0.0;
        for i in 0..self.natoms {
            for j in 0..3 {
                let x = coords[(i, j)];
                e += 0.5 * self.k[3 * i + j] * x * x;
            }
        }
        Ok(e)
    }
}

/// two atoms joined by a spring along z, giving off-diagonal force
/// constants
struct Bond {
    k: f64,
}

impl Pes for Bond {
    fn natoms(&self) -> usize {
        2
    }

    fn energy(&self, coords: &Dmat) -> Result<f64, PesError> {
        self.check_coords(coords)?;
        let d = coords[(1, 2)] - coords[(0, 2)];
        Ok(0.5 * self.k * d * d)
    }
}

fn water_springs() -> (Springs, Dmat) {
    let pes = Springs {
        natoms: 3,
        k: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
    };
    let coords = Dmat::from_row_slice(
        3,
        3,
        &[0.1, -0.2, 0.3, 0.4, -0.5, 0.6, -0.7, 0.8, 0.9],
    );
    (pes, coords)
}

#[test_case(0.02)]
#[test_case(0.01)]
#[test_case(0.005)]
fn gradient_matches_analytic(step: f64) {
    let (pes, coords) = water_springs();
    let got = pes.gradient(&coords, step).unwrap();
    for i in 0..3 {
        for j in 0..3 {
            let want = pes.k[3 * i + j] * coords[(i, j)] / ANG2BOHR;
            assert_abs_diff_eq!(got[(i, j)], want, epsilon = 1e-9);
        }
    }
}

#[test]
fn gradient_error_quadratic_in_step() {
    // for E = x⁴ the central-difference error is exactly 4·x·h², so
    // halving the step must quarter the error
    struct Quartic;
    impl Pes for Quartic {
        fn natoms(&self) -> usize {
            1
        }

        fn energy(&self, coords: &Dmat) -> Result<f64, PesError> {
            self.check_coords(coords)?;
            Ok(coords[(0, 0)].powi(4))
        }
    }
    let coords = Dmat::from_row_slice(1, 3, &[0.7, 0.0, 0.0]);
    let analytic = 4.0 * 0.7f64.powi(3) / ANG2BOHR;
    let err = |step: f64| {
        (Quartic.gradient(&coords, step).unwrap()[(0, 0)] - analytic).abs()
    };
    let ratio = err(0.02) / err(0.01);
    assert!((ratio - 4.0).abs() < 0.05, "ratio = {ratio}");
}

#[test]
fn force_constants_match_analytic() {
    let (pes, coords) = water_springs();
    let got = pes.force_constants(&coords, DEFAULT_STEP).unwrap();
    let n3 = 9;
    assert_eq!(got.len(), n3 * (n3 + 1) / 2);
    let ab2 = ANG2BOHR * ANG2BOHR;
    let mut idx = 0;
    for i in 0..n3 {
        for j in 0..=i {
            let want = if i == j { pes.k[i] / ab2 } else { 0.0 };
            assert_abs_diff_eq!(got[idx], want, epsilon = 1e-8);
            idx += 1;
        }
    }
}

#[test]
fn force_constants_off_diagonal() {
    let pes = Bond { k: 0.5 };
    let coords =
        Dmat::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.96]);
    let got = pes.force_constants(&coords, DEFAULT_STEP).unwrap();
    let ab2 = ANG2BOHR * ANG2BOHR;
    // flattened coordinates 2 and 5 are the two z components
    let idx = |i: usize, j: usize| i * (i + 1) / 2 + j;
    assert_abs_diff_eq!(got[idx(2, 2)], 0.5 / ab2, epsilon = 1e-8);
    assert_abs_diff_eq!(got[idx(5, 5)], 0.5 / ab2, epsilon = 1e-8);
    assert_abs_diff_eq!(got[idx(5, 2)], -0.5 / ab2, epsilon = 1e-8);
    assert_abs_diff_eq!(got[idx(3, 3)], 0.0, epsilon = 1e-8);
}

#[test]
fn bad_shape() {
    let (pes, _) = water_springs();
    let coords = Dmat::zeros(2, 3);
    assert_eq!(
        pes.energy(&coords),
        Err(PesError::BadShape {
            got: (2, 3),
            want: (3, 3),
        })
    );
    assert!(pes.gradient(&coords, DEFAULT_STEP).is_err());
    assert!(pes.force_constants(&coords, DEFAULT_STEP).is_err());
}

#[test]
fn caller_coords_untouched() {
    let (pes, coords) = water_springs();
    let before = coords.clone();
    pes.gradient(&coords, DEFAULT_STEP).unwrap();
    pes.force_constants(&coords, 0.02).unwrap();
    assert_eq!(coords, before);
}

#[test]
fn flatten_round_trip() {
    let coords = Dmat::from_row_slice(2, 3, &[1., 2., 3., 4., 5., 6.]);
    let x = flatten(&coords);
    assert_eq!(x.as_slice(), &[1., 2., 3., 4., 5., 6.]);
    assert_eq!(unflatten(&x), coords);
}
