use std::{fmt::Write, fs, path::Path};

use log::trace;
use serde::{Deserialize, Serialize};

use mol::{Atom, xyz_string};

use super::{Driver, DriverError, DriverResult, efmt, parse_field, read_file};


/// Adapter for ORCA's external-tool interface.
///
/// ORCA invokes the external program as `program InputFile`. `InputFile`
/// names an XYZ geometry file on its first line, then gives the charge,
/// multiplicity, and core count as bare integers, then a
/// gradient-requested flag (truthy iff non-empty), then optionally a
/// point-charge file. everything after a `#` on any line is a comment.
///
/// results go to a `.engrad` file next to the geometry file, derived by
/// swapping the geometry file's extension
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Orca {
    input_file: String,
    xyz_file: String,
    engrad_file: String,
    pointcharges_file: Option<String>,

    charge: isize,
    multiplicity: usize,
    ncores: usize,
    do_gradient: bool,

    natoms: usize,
    comment: String,
    atoms: Vec<Atom>,
}

impl Orca {
    /// construct an [Orca] from the single positional argument supplied
    /// by the host.
    ///
    /// # Panics
    ///
    /// if the argument count is not one
    pub fn from_args() -> Result<Self, DriverError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let [input] = &args[..] else {
            panic!("usage: program input-file");
        };
        Self::new(input)
    }

    pub fn new(input_file: &str) -> Result<Self, DriverError> {
        let contents = read_file(input_file)?;
        // strip comments but keep every line so the field positions stay
        // fixed
        let lines: Vec<&str> = contents
            .lines()
            .map(|line| line.split('#').next().unwrap().trim())
            .collect();
        if lines.len() < 5 {
            return Err(DriverError::MissingLines(input_file.to_owned()));
        }
        let xyz_file = lines[0].to_owned();
        let charge: isize = parse_field(input_file, lines[1])?;
        let multiplicity: usize = parse_field(input_file, lines[2])?;
        let ncores: usize = parse_field(input_file, lines[3])?;
        let do_gradient = !lines[4].is_empty();
        let pointcharges_file = lines
            .get(5)
            .filter(|l| !l.is_empty())
            .map(|l| (*l).to_owned());

        let engrad_file = Path::new(&xyz_file)
            .with_extension("engrad")
            .to_string_lossy()
            .into_owned();

        let (natoms, comment, atoms) = read_xyz(&xyz_file)?;

        trace!(
            "read {natoms} atoms from {xyz_file}, \
             gradient requested: {do_gradient}"
        );

        Ok(Self {
            input_file: input_file.to_owned(),
            xyz_file,
            engrad_file,
            pointcharges_file,
            charge,
            multiplicity,
            ncores,
            do_gradient,
            natoms,
            comment,
            atoms,
        })
    }

    /// the core count the host was asked to run with, for sizing the
    /// backing engine
    pub fn ncores(&self) -> usize {
        self.ncores
    }

    pub fn xyz_file(&self) -> &str {
        &self.xyz_file
    }

    /// the derived result path: the geometry file with its extension
    /// swapped for `.engrad`
    pub fn engrad_file(&self) -> &str {
        &self.engrad_file
    }

    pub fn pointcharges_file(&self) -> Option<&str> {
        self.pointcharges_file.as_deref()
    }

    /// the geometry re-rendered as a standard XYZ block, suitable for
    /// handing straight to a third-party engine
    pub fn xyz(&self) -> String {
        xyz_string(&self.atoms, &self.comment)
    }
}

/// parse a standard XYZ file: atom count, free-text comment, then one
/// `symbol x y z` line per atom in ångström
fn read_xyz(path: &str) -> Result<(usize, String, Vec<Atom>), DriverError> {
    let contents = read_file(path)?;
    let missing = || DriverError::MissingLines(path.to_owned());
    let mut lines = contents.lines();

    let natoms: usize =
        parse_field(path, lines.next().ok_or_else(missing)?.trim())?;
    let comment = lines.next().ok_or_else(missing)?.to_owned();

    let mut atoms = Vec::with_capacity(natoms);
    for _ in 0..natoms {
        let line = lines.next().ok_or_else(missing)?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[sym, x, y, z] = &fields[..] else {
            return Err(DriverError::ParseError(
                path.to_owned(),
                line.to_owned(),
            ));
        };
        let Some(number) = mol::symbol_to_number(sym) else {
            return Err(DriverError::UnknownSymbol(
                path.to_owned(),
                sym.to_owned(),
            ));
        };
        atoms.push(Atom::new(
            number,
            parse_field(path, x)?,
            parse_field(path, y)?,
            parse_field(path, z)?,
        ));
    }

    Ok((natoms, comment, atoms))
}

impl Driver for Orca {
    fn natoms(&self) -> usize {
        self.natoms
    }

    fn charge(&self) -> isize {
        self.charge
    }

    fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    fn do_gradient(&self) -> bool {
        self.do_gradient
    }

    /// the ORCA external interface only ever requests energies and
    /// gradients
    fn do_force_constants(&self) -> bool {
        false
    }

    /// write the `.engrad` file ORCA reads back: the atom count, the
    /// energy, then one gradient component per line in atom-major x/y/z
    /// order. only the two header lines are written when no gradient was
    /// requested
    fn write(&self, res: &DriverResult) -> Result<(), DriverError> {
        let mut buf = String::new();
        writeln!(buf, "{}", self.natoms).unwrap();
        writeln!(buf, "{:.12}", res.energy).unwrap();

        if self.do_gradient {
            let grad = res
                .gradient
                .as_ref()
                .expect("host requested a gradient but none was supplied");
            for i in 0..self.natoms {
                for j in 0..3 {
                    writeln!(buf, "{}", efmt(grad[(i, j)], 0, 18)).unwrap();
                }
            }
        }

        trace!("writing {} bytes to {}", buf.len(), self.engrad_file);

        fs::write(&self.engrad_file, buf).map_err(|e| {
            DriverError::WriteFileError(self.engrad_file.clone(), e.kind())
        })
    }
}
