/// Resolves one field of a write request: the override when present,
/// otherwise the value from the deployed snapshot.
///
/// Each field is resolved on its own; callers never derive one field's
/// source from another field's presence.
pub fn merge<T>(override_value: Option<T>, fallback: T) -> T {
    override_value.unwrap_or(fallback)
}

/// [`merge`] for snapshot fields the remote service may leave unset.
pub fn merge_opt<T>(override_value: Option<T>, fallback: Option<T>) -> Option<T> {
    merge(override_value.map(Some), fallback)
}
