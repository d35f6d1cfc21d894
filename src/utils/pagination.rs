/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Splits `tokens` into pages of at most `page_size` tokens, each page
/// joined by a single space. Order is preserved; the last page may be short.
///
/// An empty input yields no pages. A `page_size` of zero is treated as one.
pub fn paginate<S: AsRef<str>>(tokens: &[S], page_size: usize) -> Vec<String> {
    let page_size = page_size.max(1);
    tokens
        .chunks(page_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
