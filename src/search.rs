//! Keyword and tag matching used by the store's linear-scan search.

use crate::error::{Result, SnippetError};
use crate::models::Snippet;
use std::fmt;

/// Which field of a snippet a keyword matched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Code,
    Language,
    Description,
    Tag,
}

impl MatchField {
    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Title => "title",
            MatchField::Code => "code",
            MatchField::Language => "language",
            MatchField::Description => "description",
            MatchField::Tag => "tag",
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A search hit together with the field that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub snippet: Snippet,
    pub field: MatchField,
}

/// Lowercases a query, rejecting blank input.
pub fn normalize_query(keyword: &str, what: &str) -> Result<String> {
    if keyword.trim().is_empty() {
        return Err(SnippetError::validation(format!(
            "Please provide a valid {} for searching.",
            what
        )));
    }
    Ok(keyword.to_lowercase())
}

/// Case-insensitive substring match over title, code, language, description and tags.
/// `query` must already be lowercase.
pub fn match_keyword(snippet: &Snippet, query: &str) -> Option<MatchField> {
    let contains = |text: &str| text.to_lowercase().contains(query);

    if contains(snippet.title()) {
        Some(MatchField::Title)
    } else if contains(snippet.code()) {
        Some(MatchField::Code)
    } else if contains(snippet.language()) {
        Some(MatchField::Language)
    } else if contains(snippet.description()) {
        Some(MatchField::Description)
    } else if snippet.tags_ref().iter().any(|tag| tag.contains(query)) {
        Some(MatchField::Tag)
    } else {
        None
    }
}

/// First line of the code containing `query`, for result context.
pub fn matching_line(snippet: &Snippet, query: &str) -> Option<(usize, String)> {
    snippet
        .code()
        .lines()
        .enumerate()
        .find(|(_, line)| line.to_lowercase().contains(query))
        .map(|(i, line)| (i + 1, line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet() -> Snippet {
        Snippet::with_details(
            1,
            "Binary search",
            "Java",
            "int lo = 0;\nint hi = n - 1;",
            ["algorithms"],
            Some("Classic divide and conquer"),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(normalize_query("", "value").is_err());
        assert!(normalize_query("   ", "value").is_err());
        assert_eq!(normalize_query("JaVa", "value").unwrap(), "java");
    }

    #[test]
    fn test_match_order_and_fields() {
        let s = snippet();
        assert_eq!(match_keyword(&s, "binary"), Some(MatchField::Title));
        assert_eq!(match_keyword(&s, "hi ="), Some(MatchField::Code));
        assert_eq!(match_keyword(&s, "java"), Some(MatchField::Language));
        assert_eq!(match_keyword(&s, "conquer"), Some(MatchField::Description));
        assert_eq!(match_keyword(&s, "algo"), Some(MatchField::Tag));
        assert_eq!(match_keyword(&s, "python"), None);
    }

    #[test]
    fn test_matching_line_reports_one_based_line() {
        let s = snippet();
        let expected = (2, "int hi = n - 1;".to_string());
        assert_eq!(matching_line(&s, "hi"), Some(expected));
        assert_eq!(matching_line(&s, "zzz"), None);
    }
}
