use serde::{Deserialize, Serialize};

/// Angular shell of a Slater primitive in the PRDDO dialect. Input files tag it with a
/// single letter in either case.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char")]
pub enum SlaterShell {
    S,
    P,
    D,
}

impl SlaterShell {
    pub const fn function_count(self) -> usize {
        match self {
            Self::S => 1,
            Self::P => 3,
            Self::D => 5,
        }
    }
}

impl TryFrom<char> for SlaterShell {
    type Error = char;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag.to_ascii_uppercase() {
            'S' => Ok(Self::S),
            'P' => Ok(Self::P),
            'D' => Ok(Self::D),
            other => Err(other),
        }
    }
}

/// A Slater type primitive, `x^a y^b z^c r^d exp(-exponent * r)`.
///
/// The same record serves two dialects. PRDDO style readers fill `shell`, `n` and the
/// per-component `norm` entries and one primitive expands to a whole angular shell. Molden
/// style readers fill the explicit powers `a, b, c, d` and `norm[0]`, and every primitive
/// is a single basis function.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slater {
    #[serde(default = "default_shell")]
    pub shell: SlaterShell,
    /// Principal quantum number
    #[serde(default)]
    pub n: i32,
    #[serde(default)]
    pub a: u32,
    #[serde(default)]
    pub b: u32,
    #[serde(default)]
    pub c: u32,
    #[serde(default)]
    pub d: u32,
    pub exponent: f64,
    #[serde(default = "default_norm")]
    pub norm: [f64; 5],
}

fn default_shell() -> SlaterShell {
    SlaterShell::S
}

fn default_norm() -> [f64; 5] {
    [1.0; 5]
}

impl Slater {
    /// A PRDDO style primitive covering a whole S, P or D shell.
    pub fn shell(shell: SlaterShell, n: i32, exponent: f64, norm: [f64; 5]) -> Self {
        Self {
            shell,
            n,
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            exponent,
            norm,
        }
    }

    /// A Molden style primitive with explicit cartesian and radial powers.
    pub fn cartesian(powers: [u32; 4], exponent: f64, norm: f64) -> Self {
        let [a, b, c, d] = powers;
        Self {
            shell: SlaterShell::S,
            n: 0,
            a,
            b,
            c,
            d,
            exponent,
            norm: [norm, 1.0, 1.0, 1.0, 1.0],
        }
    }
}
