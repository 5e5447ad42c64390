use std::error::Error;
use std::fmt;

/// An enumerated type for the failures of group-algebraic operations.
///
/// All of these are caller-input errors: nothing in this crate retries, and no partial results are
/// returned alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// Variant for an encoding which the group does not support.
    InvalidParametrization(String),

    /// Variant for a value which does not describe an element of the group.
    NotAMember(String),

    /// Variant for a subgroup identifier which does not identify any subgroup.
    InvalidSubgroupId(String),

    /// Variant for an irrep identifier which does not identify any irrep.
    InvalidIrrepId(String),

    /// Variant for an induction from a subgroup of infinite index.
    UnsupportedInduction(String),

    /// Variant for an unknown grid type.
    UnrecognizedGridType(String),

    /// Variant for invalid numeric arguments such as a group order of zero.
    InvalidArgument(String),

    /// Variant for elements or representations belonging to different group instances.
    GroupMismatch(String),

    /// Variant for operations which are not available for a group family.
    Unsupported(String),
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParametrization(msg) => write!(f, "Invalid parametrization: {msg}"),
            Self::NotAMember(msg) => write!(f, "Not a group member: {msg}"),
            Self::InvalidSubgroupId(msg) => write!(f, "Invalid subgroup id: {msg}"),
            Self::InvalidIrrepId(msg) => write!(f, "Invalid irrep id: {msg}"),
            Self::UnsupportedInduction(msg) => write!(f, "Unsupported induction: {msg}"),
            Self::UnrecognizedGridType(msg) => write!(f, "Grid type `{msg}` not recognised"),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Self::GroupMismatch(msg) => write!(f, "Group mismatch: {msg}"),
            Self::Unsupported(msg) => write!(f, "Unsupported operation: {msg}"),
        }
    }
}

impl Error for GroupError {}
