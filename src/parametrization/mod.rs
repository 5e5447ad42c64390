//! Numeric encodings of planar group elements and the conversions between them.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use approx;
use ndarray::{array, Array2};
use serde::{Deserialize, Serialize};

use crate::group::group_error::GroupError;


// ================
// Enum definitions
// ================

/// An enumerated type for the encodings in which planar group elements can be expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parametrization {
    /// Variant for an integer rotation power in $`[0, N)`$. Only discrete groups support this.
    Int,

    /// Variant for a real rotation angle.
    Radians,

    /// Variant for a $`2 \times 2`$ orthonormal rotation matrix.
    Mat,
}

impl fmt::Display for Parametrization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Radians => write!(f, "radians"),
            Self::Mat => write!(f, "MAT"),
        }
    }
}

impl FromStr for Parametrization {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "radians" => Ok(Self::Radians),
            "MAT" => Ok(Self::Mat),
            _ => Err(GroupError::InvalidParametrization(format!(
                "parametrization `{s}` not recognised"
            ))),
        }
    }
}

/// An enumerated type for element values in one of the [`Parametrization`]s.
///
/// The `Flip*` variants carry a reflection bit in $`\{0, 1\}`$ followed by the rotation, and are
/// used by the groups containing reflections.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementValue {
    Int(i64),
    Radians(f64),
    Mat(Array2<f64>),
    FlipInt(u8, i64),
    FlipRadians(u8, f64),
    FlipMat(u8, Array2<f64>),
}

impl ElementValue {
    /// Returns the parametrization in which this value is expressed.
    pub fn parametrization(&self) -> Parametrization {
        match self {
            Self::Int(_) | Self::FlipInt(_, _) => Parametrization::Int,
            Self::Radians(_) | Self::FlipRadians(_, _) => Parametrization::Radians,
            Self::Mat(_) | Self::FlipMat(_, _) => Parametrization::Mat,
        }
    }

    /// Returns the reflection bit of this value, or `None` if it does not carry one.
    pub fn flip(&self) -> Option<u8> {
        match self {
            Self::FlipInt(s, _) | Self::FlipRadians(s, _) | Self::FlipMat(s, _) => Some(*s),
            Self::Int(_) | Self::Radians(_) | Self::Mat(_) => None,
        }
    }

    pub fn as_int(&self) -> Result<i64, GroupError> {
        match self {
            Self::Int(k) => Ok(*k),
            _ => Err(self.shape_error("an integer")),
        }
    }

    pub fn as_radians(&self) -> Result<f64, GroupError> {
        match self {
            Self::Radians(theta) => Ok(*theta),
            _ => Err(self.shape_error("an angle")),
        }
    }

    pub fn as_mat(&self) -> Result<&Array2<f64>, GroupError> {
        match self {
            Self::Mat(mat) => Ok(mat),
            _ => Err(self.shape_error("a matrix")),
        }
    }

    pub fn as_flip_int(&self) -> Result<(u8, i64), GroupError> {
        match self {
            Self::FlipInt(s, k) => Ok((*s, *k)),
            _ => Err(self.shape_error("a reflection bit and an integer")),
        }
    }

    pub fn as_flip_radians(&self) -> Result<(u8, f64), GroupError> {
        match self {
            Self::FlipRadians(s, theta) => Ok((*s, *theta)),
            _ => Err(self.shape_error("a reflection bit and an angle")),
        }
    }

    pub fn as_flip_mat(&self) -> Result<(u8, &Array2<f64>), GroupError> {
        match self {
            Self::FlipMat(s, mat) => Ok((*s, mat)),
            _ => Err(self.shape_error("a reflection bit and a matrix")),
        }
    }

    fn shape_error(&self, expected: &str) -> GroupError {
        GroupError::NotAMember(format!("`{self:?}` is not {expected}"))
    }
}

// =================
// Trait definitions
// =================

/// Trait for converting element values between the encodings a group supports.
///
/// Every conversion funnels through the canonical encoding of the group: a value is first brought
/// into [`Self::canonical_parametrization`] by [`Self::to_canonical`], then re-expressed by
/// [`Self::from_canonical`].
pub trait ParametrizationCodec {
    // ----------------
    // Required methods
    // ----------------

    /// The encodings supported by the group.
    fn parametrizations(&self) -> &'static [Parametrization];

    /// The encoding in which element values are stored.
    fn canonical_parametrization(&self) -> Parametrization;

    /// Converts a value in any supported encoding into the canonical encoding.
    ///
    /// # Errors
    ///
    /// Errors if the value does not describe a group element.
    fn to_canonical(&self, value: &ElementValue) -> Result<ElementValue, GroupError>;

    /// Re-expresses a canonical value in the encoding `to`.
    fn from_canonical(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError>;

    // ----------------
    // Provided methods
    // ----------------

    /// Fails with [`GroupError::InvalidParametrization`] if `param` is not supported.
    fn check_parametrization(&self, param: Parametrization) -> Result<(), GroupError> {
        if self.parametrizations().contains(&param) {
            Ok(())
        } else {
            Err(GroupError::InvalidParametrization(format!(
                "parametrization `{param}` is not supported (supported: {})",
                self.parametrizations()
                    .iter()
                    .map(|p| format!("`{p}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }

    /// Converts `value` into the encoding `to`. The source encoding is read off the value.
    fn change_param(
        &self,
        value: &ElementValue,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        self.check_parametrization(value.parametrization())?;
        self.check_parametrization(to)?;
        let canonical = self.to_canonical(value)?;
        self.from_canonical(&canonical, to)
    }

    /// Converts `value`, declared to be in the encoding `from`, into the encoding `to`.
    fn convert(
        &self,
        value: &ElementValue,
        from: Parametrization,
        to: Parametrization,
    ) -> Result<ElementValue, GroupError> {
        self.check_parametrization(from)?;
        if value.parametrization() != from {
            return Err(GroupError::NotAMember(format!(
                "`{value:?}` is not expressed in the `{from}` parametrization"
            )));
        }
        self.change_param(value, to)
    }
}

// =========
// Functions
// =========

/// Brings an angle into $`[0, 2\pi)`$.
pub fn normalize_angle(theta: f64) -> f64 {
    let reduced = theta.rem_euclid(TAU);
    // `rem_euclid` rounds tiny negative angles up to exactly 2π.
    if reduced >= TAU {
        0.0
    } else {
        reduced
    }
}

/// Checks whether `x` and `y` agree modulo `period` within the absolute tolerance `thresh`.
pub fn cycle_isclose(x: f64, y: f64, period: f64, thresh: f64) -> bool {
    let d = (x - y).rem_euclid(period);
    d <= thresh || (period - d) <= thresh
}

/// The rotation matrix $`\begin{pmatrix} \cos k\theta & -\sin k\theta \\ \sin k\theta & \cos k\theta \end{pmatrix}`$.
pub fn psi(theta: f64, k: i64) -> Array2<f64> {
    let x = k as f64 * theta;
    let (sin, cos) = x.sin_cos();
    array![[cos, -sin], [sin, cos]]
}

/// The reflection $`\mathrm{diag}(1, -1)`$ if `s` is set, and the identity otherwise.
pub fn chi(s: u8) -> Array2<f64> {
    if s == 0 {
        Array2::eye(2)
    } else {
        array![[1.0, 0.0], [0.0, -1.0]]
    }
}

/// The product [`psi`]`(theta, k)` $`\cdot`$ [`chi`]`(s)`.
pub fn psichi(theta: f64, s: u8, k: i64) -> Array2<f64> {
    let sign = if s == 0 { 1.0 } else { -1.0 };
    let x = k as f64 * theta;
    let (sin, cos) = x.sin_cos();
    array![[cos, -sign * sin], [sin, sign * cos]]
}

/// Encodes an angle as a rotation matrix.
pub fn encode_rotation_matrix(theta: f64) -> Array2<f64> {
    psi(theta, 1)
}

/// Decodes a rotation matrix into an angle in $`[0, 2\pi)`$.
///
/// # Errors
///
/// Errors if `mat` is not $`2 \times 2`$, not orthonormal within `thresh`, or has a determinant
/// other than $`+1`$.
pub fn decode_rotation_matrix(mat: &Array2<f64>, thresh: f64) -> Result<f64, GroupError> {
    if mat.shape() != [2, 2] {
        return Err(GroupError::NotAMember(format!(
            "a rotation matrix must be 2×2, but has shape {:?}",
            mat.shape()
        )));
    }
    let det = mat[[0, 0]] * mat[[1, 1]] - mat[[0, 1]] * mat[[1, 0]];
    if !approx::abs_diff_eq!(det, 1.0, epsilon = thresh) {
        return Err(GroupError::NotAMember(format!(
            "a rotation matrix must have unit determinant, but has determinant {det:+.7}"
        )));
    }
    let gram = mat.dot(&mat.t());
    if !approx::abs_diff_eq!(gram, Array2::<f64>::eye(2), epsilon = thresh) {
        return Err(GroupError::NotAMember(
            "a rotation matrix must be orthonormal".to_string(),
        ));
    }
    let cos = (mat[[0, 0]] + mat[[1, 1]]) / 2.0;
    let sin = (mat[[1, 0]] - mat[[0, 1]]) / 2.0;
    Ok(normalize_angle(sin.atan2(cos)))
}
