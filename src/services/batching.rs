/// Splits `ids` into consecutive groups of at most `max_size` items
///
/// Concatenating the groups yields `ids` unchanged. An exact multiple of
/// `max_size` produces no trailing empty group and an empty input produces no
/// groups at all.
pub fn chunk<T>(ids: &[T], max_size: usize) -> impl Iterator<Item = &[T]> {
    assert!(max_size > 0, "chunk size must be positive");
    ids.chunks(max_size)
}
