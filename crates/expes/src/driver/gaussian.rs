use std::fs;

use log::trace;
use serde::{Deserialize, Serialize};

use mol::Atom;

use crate::ANG2BOHR;

use super::{Driver, DriverError, DriverResult, efmt, parse_field, read_file};


/// Adapter for Gaussian's `External` interface.
///
/// Gaussian invokes the external program as
///
/// ```text
/// program layer InputFile OutputFile MsgFile FChkFile MatElFile
/// ```
///
/// and waits for `OutputFile` to be produced. only `InputFile` is read and
/// only `OutputFile` is written; the remaining paths are carried to honor
/// the invocation contract.
///
/// `InputFile` holds a header line of `natoms derivs charge multiplicity`
/// followed by one `atomic_number x y z` line per atom with coordinates in
/// bohr, which are converted to ångström on input
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gaussian {
    layer: String,
    input_file: String,
    output_file: String,
    msg_file: String,
    fchk_file: String,
    matel_file: String,

    natoms: usize,
    derivs: usize,
    charge: isize,
    multiplicity: usize,
    atoms: Vec<Atom>,
}

impl Gaussian {
    /// construct a [Gaussian] from the six positional arguments supplied
    /// by the host.
    ///
    /// # Panics
    ///
    /// if the argument count is not six
    pub fn from_args() -> Result<Self, DriverError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let [layer, input, output, msg, fchk, matel] = &args[..] else {
            panic!(
                "usage: program layer input-file output-file \
                 msg-file fchk-file matel-file"
            );
        };
        Self::new(layer, input, output, msg, fchk, matel)
    }

    pub fn new(
        layer: &str,
        input_file: &str,
        output_file: &str,
        msg_file: &str,
        fchk_file: &str,
        matel_file: &str,
    ) -> Result<Self, DriverError> {
        let contents = read_file(input_file)?;
        let missing = || DriverError::MissingLines(input_file.to_owned());
        let mut lines = contents.lines();

        let header = lines.next().ok_or_else(missing)?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        let &[natoms, derivs, charge, multiplicity] = &fields[..] else {
            return Err(DriverError::ParseError(
                input_file.to_owned(),
                header.to_owned(),
            ));
        };
        let natoms: usize = parse_field(input_file, natoms)?;
        let derivs: usize = parse_field(input_file, derivs)?;
        let charge: isize = parse_field(input_file, charge)?;
        let multiplicity: usize = parse_field(input_file, multiplicity)?;

        let mut atoms = Vec::with_capacity(natoms);
        for _ in 0..natoms {
            let line = lines.next().ok_or_else(missing)?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            // Gaussian appends further columns (MM charges) in some
            // routes, so only the first four are taken
            if fields.len() < 4 {
                return Err(DriverError::ParseError(
                    input_file.to_owned(),
                    line.to_owned(),
                ));
            }
            let number: usize = parse_field(input_file, fields[0])?;
            if number == 0 || number > 118 {
                return Err(DriverError::UnknownSymbol(
                    input_file.to_owned(),
                    fields[0].to_owned(),
                ));
            }
            let x: f64 = parse_field(input_file, fields[1])?;
            let y: f64 = parse_field(input_file, fields[2])?;
            let z: f64 = parse_field(input_file, fields[3])?;
            atoms.push(Atom::new(
                number,
                x / ANG2BOHR,
                y / ANG2BOHR,
                z / ANG2BOHR,
            ));
        }

        trace!("read {natoms} atoms with derivs={derivs} from {input_file}");

        Ok(Self {
            layer: layer.to_owned(),
            input_file: input_file.to_owned(),
            output_file: output_file.to_owned(),
            msg_file: msg_file.to_owned(),
            fchk_file: fchk_file.to_owned(),
            matel_file: matel_file.to_owned(),
            natoms,
            derivs,
            charge,
            multiplicity,
            atoms,
        })
    }

    /// requested derivative order: 0 = energy only, 1 = energy and
    /// gradient, 2 = energy, gradient, and force constants
    pub fn derivs(&self) -> usize {
        self.derivs
    }

    pub fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl Driver for Gaussian {
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
        matches!(self.derivs, 1 | 2)
    }

    fn do_force_constants(&self) -> bool {
        self.derivs == 2
    }

    /// write the fixed-width output file Gaussian reads back: every value
    /// occupies a 20-column `%20.12E` field, three fields per line after
    /// the header. the dipole moment, polarizability, and dipole
    /// derivatives are not computed and their blocks are written as zeros
    fn write(&self, res: &DriverResult) -> Result<(), DriverError> {
        let mut buf = String::new();

        // energy and dipole moment
        buf.push_str(&efmt(res.energy, 20, 12));
        for _ in 0..3 {
            buf.push_str(&efmt(0.0, 20, 12));
        }
        buf.push('\n');

        if self.do_gradient() {
            let grad = res
                .gradient
                .as_ref()
                .expect("host requested a gradient but none was supplied");
            for i in 0..self.natoms {
                for j in 0..3 {
                    buf.push_str(&efmt(grad[(i, j)], 20, 12));
                }
                buf.push('\n');
            }
        }

        if self.do_force_constants() {
            let fcs = res.force_constants.as_ref().expect(
                "host requested force constants but none were supplied",
            );
            // polarizability, then dipole derivatives
            let zeros = efmt(0.0, 20, 12).repeat(3);
            for _ in 0..2 + 3 * self.natoms {
                buf.push_str(&zeros);
                buf.push('\n');
            }
            for row in fcs.as_slice().chunks(3) {
                for c in row {
                    buf.push_str(&efmt(*c, 20, 12));
                }
                buf.push('\n');
            }
        }

        trace!("writing {} bytes to {}", buf.len(), self.output_file);

        fs::write(&self.output_file, buf).map_err(|e| {
            DriverError::WriteFileError(self.output_file.clone(), e.kind())
        })
    }
}
