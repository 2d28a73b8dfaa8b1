//! Splitting of rendered ordering lists.

/// Splits a comma-separated list, keeping parenthesized parts together.
///
/// Parts are accumulated until the counts of `(` and `)` in the current
/// element balance. Whitespace is preserved.
///
/// ```
/// use sqlshim::sql::split_order_string;
///
/// assert_eq!(
///     split_order_string("f(a,b), g(c), h"),
///     vec!["f(a,b)", " g(c)", " h"]
/// );
/// ```
pub fn split_order_string(text: &str) -> Vec<String> {
    let mut parts: Vec<&str> = text.split(',').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    let mut res: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    for part in parts {
        let element = match current.take() {
            Some(mut acc) => {
                acc.push(',');
                acc.push_str(part);
                acc
            }
            None => part.to_string(),
        };

        if element.matches('(').count() == element.matches(')').count() {
            res.push(element);
        } else {
            current = Some(element);
        }
    }
    res.extend(current);
    res
}
