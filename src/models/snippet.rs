use crate::error::{Result, SnippetError};
use std::collections::BTreeSet;
use std::fmt;

/// Store-assigned snippet identifier. Unsigned, so a negative id cannot exist.
pub type SnippetId = u32;

/// A single stored code fragment.
///
/// Title, language and code are never blank: every constructor and setter
/// validates them. Tags are kept trimmed and lowercased; the description is
/// an empty string when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    id: SnippetId,
    title: String,
    language: String,
    code: String,
    tags: BTreeSet<String>,
    description: String,
}

fn require_text(value: &str, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(SnippetError::validation(format!(
            "{} cannot be null or empty",
            field
        )));
    }
    Ok(value.to_string())
}

/// Trims and lowercases a tag, returning `None` for blank input.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}

fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .collect()
}

impl Snippet {
    pub fn new(id: SnippetId, title: &str, language: &str, code: &str) -> Result<Self> {
        Ok(Self {
            id,
            title: require_text(title, "Title")?,
            language: require_text(language, "Language")?,
            code: require_text(code, "Code")?,
            tags: BTreeSet::new(),
            description: String::new(),
        })
    }

    /// Builds a snippet with tags and an optional description in one step.
    pub fn with_details<I, S>(
        id: SnippetId,
        title: &str,
        language: &str,
        code: &str,
        tags: I,
        description: Option<&str>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut snippet = Self::new(id, title, language, code)?;
        snippet.set_tags(tags);
        snippet.set_description(description);
        Ok(snippet)
    }

    pub fn with_tags<I, S>(
        id: SnippetId,
        title: &str,
        language: &str,
        code: &str,
        tags: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_details(id, title, language, code, tags, None)
    }

    pub fn with_description(
        id: SnippetId,
        title: &str,
        language: &str,
        code: &str,
        description: &str,
    ) -> Result<Self> {
        Self::with_details(
            id,
            title,
            language,
            code,
            std::iter::empty::<&str>(),
            Some(description),
        )
    }

    pub fn id(&self) -> SnippetId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns a copy of the tag set; mutating it does not touch the snippet.
    pub fn tags(&self) -> BTreeSet<String> {
        self.tags.clone()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub(crate) fn tags_ref(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Code length in characters.
    pub fn code_len(&self) -> usize {
        self.code.chars().count()
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = require_text(title, "Title")?;
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.language = require_text(language, "Language")?;
        Ok(())
    }

    pub fn set_code(&mut self, code: &str) -> Result<()> {
        self.code = require_text(code, "Code")?;
        Ok(())
    }

    /// Replaces all tags. An empty iterator clears them.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
    }

    /// Adds a tag; blank tags are ignored.
    pub fn add_tag(&mut self, tag: &str) {
        if let Some(tag) = normalize_tag(tag) {
            self.tags.insert(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match normalize_tag(tag) {
            Some(tag) => self.tags.remove(&tag),
            None => false,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|tag| self.tags.contains(&tag))
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.unwrap_or_default().to_string();
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Snippet ID: {}", self.id)?;
        writeln!(f, "Title: {}", self.title)?;
        write!(f, "Language: {}", self.language)?;
        if self.has_description() {
            write!(f, "\nDescription: {}", self.description)?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            write!(f, "\nTags: {}", tags.join(", "))?;
        }
        write!(f, "\nCode:\n{}", self.code)
    }
}
