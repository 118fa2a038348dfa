use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use orbgrid::{
    basis::{evaluate_molecule, BasisFamily},
    field::{FieldRequest, ScalarField, ScalarKind},
    grid::{BoxBuilder, CancellationToken, GridScanner},
    testing::TestInstance,
};

const KINDS: [ScalarKind; 3] = [
    ScalarKind::OrbitalValue,
    ScalarKind::ElectronDensity,
    ScalarKind::ElectrostaticPotential,
];

fn request(kind: ScalarKind) -> FieldRequest {
    FieldRequest {
        orbital: Some(0),
        ..FieldRequest::new(kind)
    }
}

fn bench_basis(c: &mut Criterion, instances: &[TestInstance]) {
    for instance in instances {
        let molecule = &instance.molecule;
        let mut chi = vec![0.0; molecule.n_basis(BasisFamily::Gaussian)];
        let point = Vector3::new(0.3, -0.2, 0.4);

        c.bench_function(&format!("Basis functions {}", instance.name), |b| {
            b.iter(|| evaluate_molecule(BasisFamily::Gaussian, molecule, black_box(&point), &mut chi))
        });
    }
}

fn bench_scan(c: &mut Criterion, instances: &[TestInstance]) {
    let builder = BoxBuilder::new().with_cube_size(0.4);

    for instance in instances {
        let Some(bounds) = builder.build(&instance.molecule) else {
            continue;
        };
        let Ok(grid) = builder.grid(bounds) else {
            continue;
        };

        for kind in KINDS {
            let Ok(Some(field)) = ScalarField::select(&instance.molecule, Some(&instance.wavefunction), &request(kind))
            else {
                continue;
            };

            c.bench_function(&format!("Scan {kind:?} {}", instance.name), |b| {
                b.iter(|| {
                    GridScanner::with_cancellation(CancellationToken::new())
                        .scan_volume(&grid, &field)
                        .map(|result| result.summary)
                })
            });
        }
    }
}

fn bench_grid(c: &mut Criterion) {
    let instances = [TestInstance::hydrogen(), TestInstance::all_shells()];

    bench_basis(c, &instances);
    bench_scan(c, &instances);
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
