//! Basis functions and their evaluation.
//!
//! Two families of primitive functions are supported: contracted gaussians grouped in
//! [`Shell`]s, and Slater type orbitals ([`Slater`]) which are read in two dialects. The
//! [`evaluate`] submodule turns either into the "chi" values of every basis function at a
//! point, in the global order that orbital coefficients and density matrices use.

pub mod evaluate;
mod functions;
mod set;
mod slater;

pub use evaluate::{evaluate_atom, evaluate_molecule, BasisFamily};
pub use functions::{Gaussian, Shell, ShellType};
pub use set::BasisSet;
pub use slater::{Slater, SlaterShell};
