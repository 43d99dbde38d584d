use std::error::Error;

use expes::{
    DEFAULT_STEP, Dmat,
    driver::{Driver, DriverResult, gaussian::Gaussian, orca::Orca},
    pes::{Pes, PesError},
};

/// an uncoupled harmonic well on every coordinate, for exercising the
/// drivers without a quantum-chemistry engine behind them
struct Harmonic {
    natoms: usize,
    k: f64,
}

impl Pes for Harmonic {
    fn natoms(&self) -> usize {
        self.natoms
    }

    fn energy(&self, coords: &Dmat) -> Result<f64, PesError> {
        self.check_coords(coords)?;
        Ok(0.5 * self.k * coords.iter().map(|x| x * x).sum::<f64>())
    }
}

fn run(d: &impl Driver) -> Result<(), Box<dyn Error>> {
    let pes = Harmonic {
        natoms: d.natoms(),
        k: 0.25,
    };
    let coords = d.coords();
    let res = DriverResult {
        energy: pes.energy(&coords)?,
        gradient: if d.do_gradient() {
            Some(pes.gradient(&coords, DEFAULT_STEP)?)
        } else {
            None
        },
        force_constants: if d.do_force_constants() {
            Some(pes.force_constants(&coords, DEFAULT_STEP)?)
        } else {
            None
        },
    };
    d.write(&res)?;
    Ok(())
}

fn main() {
    env_logger::init();
    // Gaussian passes six paths, ORCA one
    let argc = std::env::args().count();
    let res: Result<(), Box<dyn Error>> = match argc {
        7 => Gaussian::from_args()
            .map_err(Into::into)
            .and_then(|d| run(&d)),
        2 => Orca::from_args().map_err(Into::into).and_then(|d| run(&d)),
        n => panic!("expected 1 or 6 arguments, got {}", n.saturating_sub(1)),
    };
    // print failures instead of crashing so the host sees the banner and
    // resumes cleanly
    if let Err(e) = res {
        println!("{e}");
    }
    println!("Back to {}!", if argc == 7 { "Gaussian" } else { "ORCA" });
}
