//! Start-request validation errors.

use core::fmt;

/// Which pendulum arm a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Arm {
    /// The only arm of a simple pendulum.
    Single,
    /// The arm attached to the pivot.
    Upper,
    /// The arm hanging from the upper bob.
    Lower,
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "pendulum"),
            Self::Upper => write!(f, "upper arm"),
            Self::Lower => write!(f, "lower arm"),
        }
    }
}

/// A start request was refused because a parameter is out of range.
///
/// Validation errors are not fatal. The system stays stopped at the state its
/// last `reset` produced, and the caller decides how to show the message.
///
/// # Example
///
/// ```rust
/// use mechanics::{Simulation, SimplePendulum, SimplePendulumParams, ValidationError};
///
/// let mut pendulum = SimplePendulum::new(SimplePendulumParams::new(-1.0, 1.0, 30.0));
/// match pendulum.start() {
///     Err(ValidationError::NonPositiveLength { value, .. }) => assert_eq!(value, -1.0),
///     other => panic!("unexpected: {other:?}"),
/// }
/// assert!(!pendulum.is_running());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// An arm length is zero, negative or not a number.
    #[error("{arm} length must be positive, got {value} m")]
    NonPositiveLength {
        /// The offending arm.
        arm: Arm,
        /// The rejected length.
        value: f64,
    },

    /// A mass is zero, negative or not a number.
    #[error("{arm} mass must be positive, got {value} kg")]
    NonPositiveMass {
        /// The offending arm.
        arm: Arm,
        /// The rejected mass.
        value: f64,
    },

    /// An angle lies outside the permitted inclusive range.
    #[error("angle must be between {min}° and {max}°, got {value}°")]
    AngleOutOfRange {
        /// The rejected angle in degrees.
        value: f64,
        /// Lowest accepted angle in degrees.
        min: f64,
        /// Highest accepted angle in degrees.
        max: f64,
    },

    /// The launch speed is zero, negative or not a number.
    #[error("launch speed must be positive, got {value} m/s")]
    NonPositiveSpeed {
        /// The rejected speed.
        value: f64,
    },

    /// A parameter with no range restriction is NaN or infinite.
    #[error("{parameter} must be a finite number, got {value}")]
    NonFinite {
        /// Name of the parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Result type for start requests.
pub type Result<T> = core::result::Result<T, ValidationError>;

/// True for strictly positive values. NaN is not positive.
#[inline]
pub(crate) fn is_positive(value: f64) -> bool {
    value > 0.0
}

pub(crate) fn check_length(arm: Arm, value: f64) -> Result<()> {
    if !is_positive(value) {
        return Err(ValidationError::NonPositiveLength { arm, value });
    }
    let parameter = match arm {
        Arm::Single => "pendulum length",
        Arm::Upper => "upper arm length",
        Arm::Lower => "lower arm length",
    };
    check_finite(parameter, value)
}

pub(crate) fn check_mass(arm: Arm, value: f64) -> Result<()> {
    if !is_positive(value) {
        return Err(ValidationError::NonPositiveMass { arm, value });
    }
    let parameter = match arm {
        Arm::Single => "pendulum mass",
        Arm::Upper => "upper arm mass",
        Arm::Lower => "lower arm mass",
    };
    check_finite(parameter, value)
}

pub(crate) fn check_finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { parameter, value })
    }
}

/// Inclusive on both ends. NaN is rejected.
pub(crate) fn check_angle(value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::AngleOutOfRange { value, min, max })
    }
}
