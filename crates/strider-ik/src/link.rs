use serde::{Deserialize, Serialize};
use strider_core::ChainError;

/// A rigid segment between two joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    length: f64,
    name: Option<String>,
}

impl Link {
    /// Create a link.
    ///
    /// # Errors
    ///
    /// [`ChainError::NonPositiveLinkLength`] unless `length` is finite and > 0.
    pub fn new(length: f64) -> Result<Self, ChainError> {
        if !length.is_finite() || length <= 0.0 {
            return Err(ChainError::NonPositiveLinkLength(length));
        }
        Ok(Self { length, name: None })
    }

    pub fn named(name: impl Into<String>, length: f64) -> Result<Self, ChainError> {
        let mut link = Self::new(length)?;
        link.name = Some(name.into());
        Ok(link)
    }

    pub const fn length(&self) -> f64 {
        self.length
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
