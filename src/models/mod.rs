pub mod contracts;
pub mod expenses;
pub mod payments;
pub mod projects;
pub mod users;

/// Patch semantics for optional text fields: an absent field leaves the
/// stored value unchanged, an empty or whitespace-only string clears it.
pub fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
