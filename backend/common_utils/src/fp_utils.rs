//! Functional programming utilities

/// Random identifier used as a default request or order reference.
#[inline]
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}
