//! Extractors whose rejections are API errors.

pub mod enhanced_json;
pub mod enhanced_path;
pub mod enhanced_query;
pub mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// Shortens an error message to its first lines and characters.
pub(crate) fn sanitize_error_message(message: &str, lines: usize, chars: usize) -> String {
    message
        .lines()
        .take(lines)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_limits_lines_and_length() {
        assert_eq!(sanitize_error_message("a\nb\nc", 2, 100), "a b");
        assert_eq!(sanitize_error_message("abcdef", 3, 4), "abcd");
    }
}
