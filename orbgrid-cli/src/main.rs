use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;
use orbgrid::{
    analysis::{atomic_spin_densities, evaluate_points},
    config::System,
    density::DensitySource,
    field::{FieldRequest, ScalarField, ScalarKind},
    grid::{BoxBuilder, GridScanner, ScanStatus},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: GridCommand,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    Orbital,
    Density,
    Spin,
    Mep,
}

impl From<Kind> for ScalarKind {
    fn from(value: Kind) -> Self {
        match value {
            Kind::Orbital => ScalarKind::OrbitalValue,
            Kind::Density => ScalarKind::ElectronDensity,
            Kind::Spin => ScalarKind::SpinDensity,
            Kind::Mep => ScalarKind::ElectrostaticPotential,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Source {
    /// Build density matrices from the orbital coefficients
    Coefficients,
    /// Use the density matrices stored in the input
    Matrices,
}

impl From<Source> for DensitySource {
    fn from(value: Source) -> Self {
        match value {
            Source::Coefficients => DensitySource::Coefficients,
            Source::Matrices => DensitySource::Matrices,
        }
    }
}

#[derive(Subcommand, Debug)]
enum GridCommand {
    /// Evaluate a scalar field on a grid around the molecule
    Grid {
        /// A path to the system (molecule, basis and orbitals) to evaluate
        #[arg(long, short)]
        system: PathBuf,
        #[arg(long, short, value_enum)]
        kind: Kind,
        /// Orbital index into alpha then beta orbitals, for `--kind orbital`
        #[arg(long, short)]
        orbital: Option<usize>,
        /// Edge length of a grid cell in Angstrom
        #[arg(long, default_value_t = orbgrid::grid::DEFAULT_CUBE_SIZE)]
        cube_size: f64,
        #[arg(long, value_enum, default_value_t = Source::Coefficients)]
        density_source: Source,
        /// Write the grid to this file in the legacy binary format
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the bounding box and grid resolution for a system
    #[command(name = "bbox")]
    BoundingBox {
        #[arg(long, short)]
        system: PathBuf,
        #[arg(long, default_value_t = orbgrid::grid::DEFAULT_CUBE_SIZE)]
        cube_size: f64,
    },
    /// Print the spin density at every nucleus
    AtomSpin {
        #[arg(long, short)]
        system: PathBuf,
    },
    /// Evaluate a scalar field at the points listed in a JSON file of `[x, y, z]` triples
    Points {
        #[arg(long, short)]
        system: PathBuf,
        #[arg(long, short, value_enum)]
        kind: Kind,
        #[arg(long, short)]
        orbital: Option<usize>,
        #[arg(long, short)]
        points: PathBuf,
    },
}

fn load_system(path: &Path) -> anyhow::Result<System> {
    let file = File::open(path).with_context(|| format!("can't open {}", path.display()))?;
    System::from_reader(BufReader::new(file)).with_context(|| format!("can't load {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();

    match args.command {
        GridCommand::Grid {
            system,
            kind,
            orbital,
            cube_size,
            density_source,
            output,
        } => {
            let System {
                molecule,
                wavefunction,
            } = load_system(&system)?;

            let request = FieldRequest {
                kind: kind.into(),
                orbital,
                density_source: density_source.into(),
            };
            let Some(field) = ScalarField::select(&molecule, wavefunction.as_ref(), &request)? else {
                bail!("{} has no orbitals to compute {kind:?} from", system.display());
            };

            let builder = BoxBuilder::new().with_cube_size(cube_size);
            let Some(bounds) = builder.build(&molecule) else {
                bail!("{} has no atoms", system.display());
            };
            let grid = builder.grid(bounds)?;

            let mut scanner = GridScanner::new().on_progress(|done, total| {
                log::debug!("{done} of {total} points");
            });

            let start = Instant::now();
            let summary = match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| format!("can't create {}", path.display()))?;
                    scanner.scan_to_writer(&grid, &field, BufWriter::new(file))?.1
                }
                None => scanner.scan_volume(&grid, &field)?.summary,
            };

            let [nx, ny, nz] = grid.resolution();
            println!(
                "{:?} on a {nx}x{ny}x{nz} grid in {:0.2?}",
                summary.kind,
                start.elapsed()
            );
            if summary.status == ScanStatus::Cancelled {
                println!(
                    "cancelled after {} of {} points",
                    summary.evaluated_points, summary.total_points
                );
            }
            match summary.range() {
                Some((min, max)) => println!("range: {min:.6e} .. {max:.6e}"),
                None => println!("no points evaluated"),
            }
        }

        GridCommand::BoundingBox { system, cube_size } => {
            let System { molecule, .. } = load_system(&system)?;

            let builder = BoxBuilder::new().with_cube_size(cube_size);
            let Some(bounds) = builder.build(&molecule) else {
                bail!("{} has no atoms", system.display());
            };
            let [nx, ny, nz] = builder.resolution(&bounds)?;

            println!("min: {:.4} {:.4} {:.4}", bounds.min.x, bounds.min.y, bounds.min.z);
            println!("max: {:.4} {:.4} {:.4}", bounds.max.x, bounds.max.y, bounds.max.z);
            println!("resolution: {nx} {ny} {nz}");
        }

        GridCommand::AtomSpin { system } => {
            let System {
                molecule,
                wavefunction,
            } = load_system(&system)?;

            let Some(spins) = atomic_spin_densities(&molecule, wavefunction.as_ref())? else {
                bail!("{} has no orbitals", system.display());
            };
            for (index, (atom, spin)) in molecule.atoms().iter().zip(spins).enumerate() {
                println!("{index:>4} {:>3} {spin:>14.6e}", atom.ordinal());
            }
        }

        GridCommand::Points {
            system,
            kind,
            orbital,
            points,
        } => {
            let System {
                molecule,
                wavefunction,
            } = load_system(&system)?;
            let file = File::open(&points).with_context(|| format!("can't open {}", points.display()))?;
            let points: Vec<[f64; 3]> = serde_json::from_reader(BufReader::new(file))?;
            let points: Vec<_> = points.into_iter().map(Vector3::from).collect();

            let request = FieldRequest {
                kind: kind.into(),
                orbital,
                density_source: DensitySource::default(),
            };
            let Some(field) = ScalarField::select(&molecule, wavefunction.as_ref(), &request)? else {
                bail!("{} has no orbitals to compute {kind:?} from", system.display());
            };

            let values = evaluate_points(&field, &points);
            println!("{}", serde_json::to_string(&values.values)?);
            if let Some((min, max)) = values.range() {
                log::info!("range: {min:.6e} .. {max:.6e}");
            }
        }
    }

    Ok(())
}
