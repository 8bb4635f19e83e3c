//! Patient identifier type.
//!
//! Identifiers are assigned by whoever registers the patient. The store
//! never generates them and does not enforce uniqueness.

/// A patient identifier.
///
/// # Examples
///
/// ```
/// use health_types::PatientId;
///
/// let id: PatientId = 42;
/// assert_eq!(id.to_string(), "42");
/// ```
pub type PatientId = i32;
