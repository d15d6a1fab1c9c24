//! Simulation-specific error types.
//!
//! The tick itself never fails: illegal requests (firing while dead, boarding
//! an occupied vehicle) are silently ignored and out-of-bounds positions are
//! clamped.  Errors exist only at the crate's
//! edges, where outside code hands the simulation configuration or asks it to
//! place new agents.
//!
//! ## Usage
//!
//! ```rust
//! use skirmish::config::CombatConfig;
//! use skirmish::error::SimResult;
//!
//! fn load(text: &str) -> SimResult<CombatConfig> {
//!     let config = CombatConfig::from_toml_str(text)?;
//!     Ok(config)
//! }
//! # assert!(load("map_size = 300.0").is_ok());
//! ```

use std::fmt;

/// Top-level error enum for the combat simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration document could not be parsed.
    ConfigParse {
        /// Where the document came from (file path or `"<inline>"`).
        path: String,
        /// Parser message.
        message: String,
    },

    /// Tunable value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the configuration key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A spawn request was refused because the placement is not simulable.
    SpawnRejected {
        /// What was being spawned (`"enemy"`, `"vehicle"`, `"pickup"`).
        kind: &'static str,
        /// Why the placement was refused.
        reason: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigParse { path, message } => {
                write!(f, "failed to parse combat config '{}': {}", path, message)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::SpawnRejected { kind, reason } => {
                write!(f, "{} spawn rejected: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in `[0, 1]`.
///
/// Used for per-tick decay factors and smoothing fractions, where anything
/// above 1 would amplify motion instead of damping it.
pub fn require_unit_interval(name: &'static str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}
