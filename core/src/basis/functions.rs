use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A primitive gaussian `exp(-exponent * r^2)` and its contraction coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub exponent: f64,
    pub coefficient: f64,
    /// Contraction coefficient of the P part of an SP shell. Ignored by every other shell type.
    #[serde(default)]
    pub coefficient_p: f64,
}

impl Gaussian {
    pub fn new(exponent: f64, coefficient: f64) -> Self {
        Self {
            exponent,
            coefficient,
            coefficient_p: 0.0,
        }
    }

    pub fn with_p_coefficient(exponent: f64, coefficient: f64, coefficient_p: f64) -> Self {
        Self {
            exponent,
            coefficient,
            coefficient_p,
        }
    }

    /// Normalization constant of a primitive with total angular momentum `l` whose
    /// polynomial part has no repeated factor (`1`, `x`, `xy`, `xyz`).
    pub fn primitive_norm(exponent: f64, l: i32) -> f64 {
        (std::f64::consts::FRAC_2_PI * exponent)
            .powi(3)
            .sqrt()
            .sqrt()
            * (4.0 * exponent).powi(l).sqrt()
    }
}

/// The angular part of a shell. The variant fixes how many basis functions the shell
/// contributes and in which order they are emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellType {
    S,
    /// S and P functions sharing exponents: `s, x, y, z`
    SP,
    /// `x, y, z`
    P,
    /// Spherical d: `z², xz, yz, x²-y², xy`
    D5,
    /// Cartesian d: `xx, yy, zz, xy, xz, yz`
    D6,
    /// Spherical f
    F7,
    /// Cartesian f: `xxx, yyy, zzz, xxy, xxz, xyy, yyz, xzz, yzz, xyz`
    F10,
}

impl ShellType {
    pub const fn function_count(self) -> usize {
        match self {
            Self::S => 1,
            Self::SP => 4,
            Self::P => 3,
            Self::D5 => 5,
            Self::D6 => 6,
            Self::F7 => 7,
            Self::F10 => 10,
        }
    }

    pub fn from_function_count(count: usize) -> Option<Self> {
        Some(match count {
            1 => Self::S,
            4 => Self::SP,
            3 => Self::P,
            5 => Self::D5,
            6 => Self::D6,
            7 => Self::F7,
            10 => Self::F10,
            _ => return None,
        })
    }

    /// `(prefactor, power)` of the overlap between two primitives of this angular type:
    /// `pi^1.5 * prefactor * (a + b)^power`.
    const fn overlap_parameters(self) -> (f64, f64) {
        match self {
            Self::S | Self::SP => (1.0, -1.5),
            Self::P => (0.5, -2.5),
            Self::D5 | Self::D6 => (0.25, -3.5),
            Self::F7 | Self::F10 => (0.125, -4.5),
        }
    }
}

/// A group of basis functions on one atom sharing exponents and angular type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    #[serde(rename = "type")]
    pub shell_type: ShellType,
    pub primitives: SmallVec<[Gaussian; 6]>,
}

impl Shell {
    pub fn new(shell_type: ShellType, primitives: impl IntoIterator<Item = Gaussian>) -> Self {
        Self {
            shell_type,
            primitives: primitives.into_iter().collect(),
        }
    }

    pub fn function_count(&self) -> usize {
        self.shell_type.function_count()
    }

    /// Rescale the contraction coefficients so the contracted function has unit norm. For
    /// SP shells the S and P coefficients are normalized independently.
    pub fn normalize(&mut self) {
        let (prefactor, power) = self.shell_type.overlap_parameters();
        let norm = self.contraction_norm(|g| g.coefficient, prefactor, power);
        for primitive in &mut self.primitives {
            primitive.coefficient *= norm;
        }

        if self.shell_type == ShellType::SP {
            let (prefactor, power) = ShellType::P.overlap_parameters();
            let norm = self.contraction_norm(|g| g.coefficient_p, prefactor, power);
            for primitive in &mut self.primitives {
                primitive.coefficient_p *= norm;
            }
        }
    }

    fn contraction_norm(&self, coefficient: impl Fn(&Gaussian) -> f64, prefactor: f64, power: f64) -> f64 {
        let mut sum = 0.0;
        for a in &self.primitives {
            for b in &self.primitives {
                sum += coefficient(a) * coefficient(b) * (a.exponent + b.exponent).powf(power);
            }
        }
        sum *= std::f64::consts::PI.powf(1.5) * prefactor;
        sum.sqrt().recip()
    }
}
