//! Text normalization shared by extraction and classification

/// Trim, lower-case and collapse internal whitespace to single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comma-separated place tokens, normalized, empties dropped.
///
/// Order is preserved; the rightmost token is the presumed top-level unit.
pub fn place_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_text)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Canonical text form of a place string: `"chester, cheshire, england"`
pub fn normalize_place(raw: &str) -> String {
    place_tokens(raw).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Apprentice\tBLACKSMITH \n"), "apprentice blacksmith");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_place_tokens_drop_empties() {
        assert_eq!(
            place_tokens(" Chester ,, Cheshire,England , "),
            vec!["chester", "cheshire", "england"]
        );
        assert!(place_tokens(",,").is_empty());
    }

    #[test]
    fn test_normalize_place_is_stable() {
        let once = normalize_place("Chester,  CHESHIRE ,England");
        assert_eq!(once, "chester, cheshire, england");
        assert_eq!(normalize_place(&once), once);
    }
}
