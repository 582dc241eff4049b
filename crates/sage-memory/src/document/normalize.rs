/// Collapse every whitespace run into a single space and trim the ends.
///
/// Applied to every source document before chunking so that chunk content
/// and storage are whitespace-canonical.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
