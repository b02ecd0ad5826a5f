//! Utility functions and helpers

/// Insert `separator` between every group of three digits, counting from the right.
///
/// Only the integral digits should be passed in; a leading `-` is kept in place.
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut result = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    let len = digits.chars().count();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }
    format!("{}{}", sign, result)
}

/// Drop a single leading `@` from a handle, as typed in search boxes.
pub fn strip_mention(handle: &str) -> &str {
    handle.strip_prefix('@').unwrap_or(handle)
}
