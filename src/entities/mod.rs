pub mod artist;
pub mod show;
pub mod venue;

/// Genres live in a TEXT column as a JSON array.
pub fn encode_genres(genres: &[String]) -> String {
    serde_json::to_string(genres).unwrap_or_else(|_| "[]".to_string())
}

/// Unreadable values decode to an empty list rather than failing the page.
pub fn decode_genres(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed genres column {raw:?}: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genres_column_encoding() {
        let genres = vec!["Jazz".to_string(), "Rock n Roll".to_string()];
        let encoded = encode_genres(&genres);
        assert_eq!(encoded, r#"["Jazz","Rock n Roll"]"#);
        assert_eq!(decode_genres(&encoded), genres);
    }

    #[test]
    fn test_malformed_genres_decode_to_empty() {
        assert!(decode_genres("{Jazz,Blues}").is_empty());
        assert!(decode_genres("").is_empty());
    }
}
