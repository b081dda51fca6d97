/// Result of an operation that degrades instead of failing.
///
/// Mutations against the backend never surface an error to the UI: on failure
/// they produce a documented fallback value. `Outcome` keeps that fallback
/// policy while letting callers that care see that it happened.
use crate::errors::StorefrontError;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The backend accepted the operation; the value is authoritative.
    Applied(T),
    /// The backend failed; `fallback` is a best-effort stand-in.
    Degraded {
        fallback: T,
        cause: StorefrontError,
    },
}

impl<T> Outcome<T> {
    pub fn degraded(fallback: T, cause: StorefrontError) -> Self {
        Outcome::Degraded { fallback, cause }
    }

    /// The value, whether authoritative or fallback.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Applied(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    /// The value, whether authoritative or fallback.
    pub fn into_value(self) -> T {
        match self {
            Outcome::Applied(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&StorefrontError> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }

    /// Discard the fallback and recover the original error.
    pub fn into_result(self) -> Result<T, StorefrontError> {
        match self {
            Outcome::Applied(value) => Ok(value),
            Outcome::Degraded { cause, .. } => Err(cause),
        }
    }
}
