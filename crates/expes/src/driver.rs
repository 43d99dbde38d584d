use std::{
    error::Error, fmt::Display, fs::read_to_string, path::Path, str::FromStr,
};

use serde::{Deserialize, Serialize};

use mol::{Atom, geom_string};

use crate::{Dmat, Dvec};

pub mod gaussian;
pub mod orca;

/// The quantities a [Driver] reports back to its host: the energy in
/// hartree, the gradient as an natoms × 3 matrix in hartree/bohr, and the
/// flattened lower triangle of the hessian in hartree/bohr². the optional
/// fields are `None` when the host did not request them
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverResult {
    pub energy: f64,
    pub gradient: Option<Dmat>,
    pub force_constants: Option<Dvec>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DriverError {
    FileNotFound(String),
    ReadFileError(String, std::io::ErrorKind),
    WriteFileError(String, std::io::ErrorKind),
    /// the file ended before the number of lines its header declared
    MissingLines(String),
    /// a field that should be numeric failed to parse, with the
    /// offending token
    ParseError(String, String),
    /// an element symbol or atomic number outside the periodic table
    UnknownSymbol(String, String),
}

impl DriverError {
    /// Returns `true` if the driver error is [`ParseError`].
    ///
    /// [`ParseError`]: DriverError::ParseError
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(..))
    }

    /// Returns `true` if the driver error is [`MissingLines`].
    ///
    /// [`MissingLines`]: DriverError::MissingLines
    #[must_use]
    pub fn is_missing_lines(&self) -> bool {
        matches!(self, Self::MissingLines(..))
    }
}

impl Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for DriverError {}

/// A trait for adapters between a host program's external-calculation
/// protocol and a [crate::pes::Pes] provider.
///
/// An implementation is constructed from the file paths the host passed
/// on the command line, reads its input file(s) exactly once during
/// construction, and is then queried read-only until [Driver::write]
/// serializes a [DriverResult] into the host's output format
pub trait Driver {
    /// the atom count declared by the host
    fn natoms(&self) -> usize;

    /// total molecular charge
    fn charge(&self) -> isize;

    /// spin multiplicity
    fn multiplicity(&self) -> usize;

    /// the parsed geometry in ångström, in host order
    fn atoms(&self) -> &[Atom];

    /// whether the host asked for a gradient
    fn do_gradient(&self) -> bool;

    /// whether the host asked for force constants
    fn do_force_constants(&self) -> bool;

    /// serialize `res` into the host's expected output file.
    ///
    /// # Panics
    ///
    /// if the host requested a gradient or force constants and the
    /// corresponding field of `res` is `None`. supplying them is part of
    /// the caller's contract, not a runtime condition
    fn write(&self, res: &DriverResult) -> Result<(), DriverError>;

    /// the geometry as an natoms × 3 matrix in ångström, the shape
    /// [crate::pes::Pes] operates on
    fn coords(&self) -> Dmat {
        let atoms = self.atoms();
        let mut ret = Dmat::zeros(atoms.len(), 3);
        for (i, a) in atoms.iter().enumerate() {
            ret[(i, 0)] = a.x;
            ret[(i, 1)] = a.y;
            ret[(i, 2)] = a.z;
        }
        ret
    }

    /// element symbols in host order
    fn symbols(&self) -> Vec<&'static str> {
        self.atoms().iter().map(Atom::label).collect()
    }

    /// atomic numbers in host order
    fn atomic_numbers(&self) -> Vec<usize> {
        self.atoms().iter().map(|a| a.atomic_number).collect()
    }

    /// the geometry as an atom-list string for constructing a third-party
    /// engine's molecule object
    fn atom_list(&self) -> String {
        geom_string(self.atoms())
    }
}

/// read `path`, mapping the failure modes onto [DriverError]
pub(crate) fn read_file(path: &str) -> Result<String, DriverError> {
    if !Path::new(path).exists() {
        return Err(DriverError::FileNotFound(path.to_owned()));
    }
    match read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) => Err(DriverError::ReadFileError(path.to_owned(), e.kind())),
    }
}

/// parse `tok` from `file` as a `T`, reporting the failure as
/// [DriverError::ParseError]. a string containing `file` is allocated in
/// the Err case
#[inline]
pub(crate) fn parse_field<T: FromStr>(
    file: &str,
    tok: &str,
) -> Result<T, DriverError> {
    tok.parse().map_err(|_| {
        DriverError::ParseError(file.to_owned(), tok.to_owned())
    })
}

/// format `x` in the Fortran-style scientific notation the hosts read
/// back: `prec` mantissa digits and a signed two-digit exponent,
/// right-aligned in `width` columns. Rust's own `{:E}` writes `E2` where
/// the hosts expect `E+02`
pub(crate) fn efmt(x: f64, width: usize, prec: usize) -> String {
    let s = format!("{x:.prec$E}");
    let (mant, exp) = s.split_once('E').unwrap();
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{:>width$}", format!("{mant}E{sign}{digits:0>2}"))
}
