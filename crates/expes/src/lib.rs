//! Adapters between external quantum-chemistry hosts (Gaussian's
//! `External` layer and ORCA's external-tool interface) and an arbitrary
//! potential energy surface.
//!
//! A host invokes a short-lived process with file-path arguments, the
//! matching [driver::Driver] parses the host's intermediate files into a
//! geometry and job parameters, a [pes::Pes] implementation evaluates the
//! energy (plus derivatives, analytic or by the built-in finite
//! differences), and the driver writes the result back in the host's
//! expected layout before the process exits.

pub mod driver;
pub mod pes;

#[cfg(test)]
mod tests;

/// bohr per ångström. Gaussian supplies coordinates in bohr and expects
/// gradients in hartree/bohr, while the PES side works in ångström
pub const ANG2BOHR: f64 = 1.8897259886;

/// default finite-difference displacement in ångström
pub const DEFAULT_STEP: f64 = 0.01;

pub type Dvec = nalgebra::DVector<f64>;
pub type Dmat = nalgebra::DMatrix<f64>;
