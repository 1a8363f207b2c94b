//! Token normalization shared by the lexical index and its queries.

/// Strip a token down to its lowercase alphanumeric characters.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Tokenize text into normalized tokens, ready for indexing or matching.
///
/// Splits on whitespace; punctuation-only fragments disappear. The same
/// function runs at index and query time so both sides agree on terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("The pond, in Winter!"),
            vec!["the", "pond", "in", "winter"]
        );
    }

    #[test]
    fn punctuation_only_fragments_vanish() {
        assert_eq!(tokenize("-- ... ( )"), Vec::<String>::new());
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(tokenize("chapter 12"), vec!["chapter", "12"]);
    }
}
