use std::{error::Error, fmt::Display};

use log::trace;

use crate::{ANG2BOHR, Dmat, Dvec};

#[cfg(test)]
mod tests;

#[derive(Debug, PartialEq, Eq)]
pub enum PesError {
    /// the coordinate array does not match the declared atom count × 3
    BadShape {
        got: (usize, usize),
        want: (usize, usize),
    },
}

impl Display for PesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for PesError {}

/// A trait for potential energy surfaces evaluated on behalf of a
/// [crate::driver::Driver].
///
/// Only [Pes::natoms] and [Pes::energy] are required. [Pes::gradient] and
/// [Pes::force_constants] fall back to central finite differences built
/// from energy evaluations alone; implementations with analytic
/// derivatives should override them.
pub trait Pes {
    /// the number of atoms the surface is defined over
    fn natoms(&self) -> usize;

    /// the energy in hartree at `coords`, a [Pes::natoms] × 3 matrix in
    /// ångström. implementations must reject shape mismatches, normally
    /// via [Pes::check_coords]
    fn energy(&self, coords: &Dmat) -> Result<f64, PesError>;

    /// return [PesError::BadShape] unless `coords` is [Pes::natoms] × 3
    fn check_coords(&self, coords: &Dmat) -> Result<(), PesError> {
        let want = (self.natoms(), 3);
        let got = coords.shape();
        if got != want {
            return Err(PesError::BadShape { got, want });
        }
        Ok(())
    }

    /// the gradient in hartree/bohr at `coords` by central differences
    /// with a displacement of `step` ångström along each coordinate in
    /// turn. costs 6N energy evaluations for N atoms.
    ///
    /// the caller's matrix is never touched: displacements are applied to
    /// a local copy and reverted by subtraction, so an energy failure
    /// cannot leave a geometry displaced
    fn gradient(&self, coords: &Dmat, step: f64) -> Result<Dmat, PesError> {
        let mut coords = coords.clone();
        let n = coords.nrows();
        trace!("central-difference gradient over {n} atoms, step {step}");
        let mut grad = Dmat::zeros(n, 3);
        for i in 0..n {
            for j in 0..3 {
                coords[(i, j)] += step;
                let plus = self.energy(&coords)?;
                coords[(i, j)] -= 2.0 * step;
                let minus = self.energy(&coords)?;
                coords[(i, j)] += step;
                grad[(i, j)] = (plus - minus) / (2.0 * step * ANG2BOHR);
            }
        }
        Ok(grad)
    }

    /// the lower triangle (diagonal included) of the hessian in
    /// hartree/bohr², as the central difference of [Pes::gradient]
    /// components over the 3N flattened coordinates, in row-major order.
    /// O(N²) gradient evaluations, each O(N) energies, so analytic
    /// implementations should override this
    fn force_constants(
        &self,
        coords: &Dmat,
        step: f64,
    ) -> Result<Dvec, PesError> {
        let n3 = 3 * coords.nrows();
        trace!("central-difference force constants over {n3} coordinates");
        let mut x = flatten(coords);
        let mut fcs = Vec::with_capacity(n3 * (n3 + 1) / 2);
        for i in 0..n3 {
            for j in 0..=i {
                x[i] += step;
                let plus = self.gradient(&unflatten(&x), step)?[(j / 3, j % 3)];
                x[i] -= 2.0 * step;
                let minus =
                    self.gradient(&unflatten(&x), step)?[(j / 3, j % 3)];
                x[i] += step;
                fcs.push((plus - minus) / (2.0 * step * ANG2BOHR));
            }
        }
        Ok(Dvec::from(fcs))
    }
}

/// flatten an N × 3 coordinate matrix into a 3N vector in atom-major
/// x/y/z order
pub fn flatten(coords: &Dmat) -> Dvec {
    Dvec::from_iterator(coords.len(), coords.transpose().iter().copied())
}

/// inverse of [flatten]
pub fn unflatten(x: &Dvec) -> Dmat {
    Dmat::from_row_slice(x.len() / 3, 3, x.as_slice())
}
