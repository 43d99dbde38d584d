use std::{fmt::Display, io, str::FromStr};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

/// element symbols indexed by atomic number. index 0 is the dummy-atom
/// placeholder
pub const NUMBER_TO_SYMBOL: [&str; 119] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb",
    "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta",
    "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At",
    "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt",
    "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// look up the atomic number for `s`, accepting case variants like AL or
/// al via [titlecase]. the dummy placeholder at index 0 is not an element
pub fn symbol_to_number(s: &str) -> Option<usize> {
    if s.is_empty() {
        return None;
    }
    let t = titlecase(s);
    NUMBER_TO_SYMBOL
        .iter()
        .position(|&x| x == s || x == t)
        .filter(|&n| n != 0)
}

fn titlecase(s: &str) -> String {
    let cs: Vec<_> = s.chars().collect();
    let mut ret = String::from(cs[0]).to_uppercase();
    for c in cs.iter().skip(1) {
        ret.push_str(&c.to_lowercase().to_string());
    }
    ret
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Atom {
    pub atomic_number: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        let eps = 1e-8;
        let close = |a: f64, b: f64| (a - b).abs() < eps;
        self.atomic_number == other.atomic_number
            && close(self.x, other.x)
            && close(self.y, other.y)
            && close(self.z, other.z)
    }
}

impl AbsDiffEq for Atom {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-8
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() < epsilon;
        self.atomic_number == other.atomic_number
            && close(self.x, other.x)
            && close(self.y, other.y)
            && close(self.z, other.z)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:2} {:15.10} {:15.10} {:15.10}",
            self.label(),
            self.x,
            self.y,
            self.z
        )
    }
}

impl FromStr for Atom {
    type Err = io::Error;

    /// parse an Atom from a line like
    ///  C 1.0 1.0 1.0
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = s.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(io::Error::other("wrong number of fields in Atom"));
        }
        let Some(atomic_number) = symbol_to_number(fields[0]) else {
            return Err(io::Error::other(format!(
                "unrecognized atomic symbol {}",
                fields[0]
            )));
        };
        let coord = fields[1..].iter().map(|s| s.parse());
        if coord.clone().any(|s| s.is_err()) {
            return Err(io::Error::other(
                "failed to parse coordinate field as f64",
            ));
        }
        let coord: Vec<_> = coord.flatten().collect();
        Ok(Self::new(atomic_number, coord[0], coord[1], coord[2]))
    }
}

impl Atom {
    pub fn new(atomic_number: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            atomic_number,
            x,
            y,
            z,
        }
    }

    /// like [Atom::new] but from an element symbol.
    ///
    /// # Panics
    ///
    /// if `atomic_symbol` is not in [NUMBER_TO_SYMBOL]. parsers handling
    /// host-supplied symbols should go through [symbol_to_number] and
    /// report the failure instead
    pub fn new_from_label(atomic_symbol: &str, x: f64, y: f64, z: f64) -> Self {
        let sym = symbol_to_number(atomic_symbol).unwrap_or_else(|| {
            panic!("failed to locate atomic symbol {atomic_symbol}")
        });
        Self::new(sym, x, y, z)
    }

    #[inline]
    pub const fn label(&self) -> &'static str {
        debug_assert!(self.atomic_number != 0 && self.atomic_number < 119);
        NUMBER_TO_SYMBOL[self.atomic_number]
    }

    pub fn coord(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }
}

/// format `atoms` as one `symbol x y z` line per atom, the form expected
/// when building a third-party engine's molecule object
pub fn geom_string(atoms: &[Atom]) -> String {
    use std::fmt::Write;
    let mut ret = String::with_capacity(50 * atoms.len());
    for g in atoms {
        writeln!(ret, "{} {:.12} {:.12} {:.12}", g.label(), g.x, g.y, g.z)
            .unwrap();
    }
    ret
}

/// format `atoms` as a standard XYZ block: atom count, `comment`, then one
/// symbol + coordinates line per atom
pub fn xyz_string(atoms: &[Atom], comment: &str) -> String {
    use std::fmt::Write;
    let mut ret = format!("{}\n{}\n", atoms.len(), comment);
    for g in atoms {
        writeln!(ret, "{g}").unwrap();
    }
    ret
}
