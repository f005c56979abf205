//! Error type shared by every generation stage.

/// Errors reported by island generation, configuration and persistence.
///
/// Parameter problems surface when a generator is constructed, never
/// halfway through filling a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum IslandError {
    /// A parameter violates its invariant
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// A requested size is too large to allocate or evaluate
    ResourceLimitExceeded {
        resource: &'static str,
        requested: usize,
        limit: usize,
    },
    /// Failed to read or write an island dump
    Persistence(String),
    /// Failed to read or parse a configuration file
    Config(String),
    /// Failed to save an image
    Export(String),
}

impl IslandError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        IslandError::InvalidParameter { name, value, reason }
    }
}

impl std::fmt::Display for IslandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IslandError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter `{}` = {}: {}", name, value, reason)
            }
            IslandError::ResourceLimitExceeded { resource, requested, limit } => {
                write!(
                    f,
                    "Requested {} {} exceeds the maximum of {}",
                    requested, resource, limit
                )
            }
            IslandError::Persistence(msg) => write!(f, "Island dump failed: {}", msg),
            IslandError::Config(msg) => write!(f, "Configuration failed: {}", msg),
            IslandError::Export(msg) => write!(f, "Failed to save image: {}", msg),
        }
    }
}

impl std::error::Error for IslandError {}

/// Check that a real parameter is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<(), IslandError> {
    if !value.is_finite() {
        return Err(IslandError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(IslandError::invalid(name, value, "must be positive"));
    }
    Ok(())
}

/// Check that a real parameter is finite and not negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), IslandError> {
    if !value.is_finite() {
        return Err(IslandError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(IslandError::invalid(name, value, "must not be negative"));
    }
    Ok(())
}

/// Check that a real parameter is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<(), IslandError> {
    if !value.is_finite() {
        return Err(IslandError::invalid(name, value, "must be finite"));
    }
    Ok(())
}
