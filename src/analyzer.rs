//! Read-only statistics over a component tree.

use crate::error::{Result, SnippetError};
use crate::models::{Snippet, SnippetComponent};
use std::collections::BTreeMap;
use std::fmt;

pub fn language_distribution(component: &SnippetComponent) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    component.visit(&mut |snippet| {
        *distribution
            .entry(snippet.language().to_string())
            .or_insert(0) += 1;
    });
    distribution
}

/// Number of snippets carrying each tag.
pub fn tag_distribution(component: &SnippetComponent) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    component.visit(&mut |snippet| {
        for tag in snippet.tags_ref() {
            *distribution.entry(tag.clone()).or_insert(0) += 1;
        }
    });
    distribution
}

pub fn average_code_length(component: &SnippetComponent) -> f64 {
    let mut total = 0usize;
    let mut count = 0usize;
    component.visit(&mut |snippet| {
        total += snippet.code_len();
        count += 1;
    });
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Snippet with the most code; the first one wins a tie.
pub fn longest(component: &SnippetComponent) -> Option<Snippet> {
    extreme(component, |candidate, best| candidate > best)
}

/// Snippet with the least code; the first one wins a tie.
pub fn shortest(component: &SnippetComponent) -> Option<Snippet> {
    extreme(component, |candidate, best| candidate < best)
}

fn extreme(
    component: &SnippetComponent,
    replaces: impl Fn(usize, usize) -> bool,
) -> Option<Snippet> {
    let mut best: Option<(&Snippet, usize)> = None;
    component.visit(&mut |snippet| {
        let len = snippet.code_len();
        match best {
            Some((_, best_len)) if !replaces(len, best_len) => {}
            _ => best = Some((snippet, len)),
        }
    });
    best.map(|(snippet, _)| snippet.clone())
}

pub fn by_language(component: &SnippetComponent, language: &str) -> Result<Vec<Snippet>> {
    if language.trim().is_empty() {
        return Err(SnippetError::validation("Language cannot be null or empty"));
    }
    let wanted = language.trim().to_lowercase();
    let matches = |s: &Snippet| s.language().to_lowercase() == wanted;
    Ok(filter(component, matches))
}

/// Snippets whose code is strictly longer than `min_length` characters.
pub fn with_code_longer_than(
    component: &SnippetComponent,
    min_length: i64,
) -> Result<Vec<Snippet>> {
    if min_length < 0 {
        return Err(SnippetError::validation(
            "Minimum length cannot be negative",
        ));
    }
    Ok(filter(component, |s| s.code_len() as i64 > min_length))
}

pub fn with_description(component: &SnippetComponent) -> Vec<Snippet> {
    filter(component, Snippet::has_description)
}

pub fn without_description(component: &SnippetComponent) -> Vec<Snippet> {
    filter(component, |s| !s.has_description())
}

fn filter(component: &SnippetComponent, keep: impl Fn(&Snippet) -> bool) -> Vec<Snippet> {
    let mut out = Vec::new();
    component.visit(&mut |snippet| {
        if keep(snippet) {
            out.push(snippet.clone());
        }
    });
    out
}

/// Everything the analyzer knows about one component, computed in one go.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentAnalysis {
    pub component_name: String,
    pub total_snippets: usize,
    pub is_empty: bool,
    pub average_code_length: f64,
    pub language_distribution: BTreeMap<String, usize>,
    pub tag_distribution: BTreeMap<String, usize>,
    pub longest_title: Option<String>,
    pub shortest_title: Option<String>,
    pub with_description: usize,
    pub without_description: usize,
}

impl ComponentAnalysis {
    /// Share of snippets with a description, in percent.
    pub fn description_coverage(&self) -> f64 {
        if self.total_snippets == 0 {
            0.0
        } else {
            self.with_description as f64 * 100.0 / self.total_snippets as f64
        }
    }
}

pub fn analyze(component: &SnippetComponent) -> ComponentAnalysis {
    let described = with_description(component).len();
    ComponentAnalysis {
        component_name: component.name().to_string(),
        total_snippets: component.count(),
        is_empty: component.is_empty(),
        average_code_length: average_code_length(component),
        language_distribution: language_distribution(component),
        tag_distribution: tag_distribution(component),
        longest_title: longest(component).map(|s| s.title().to_string()),
        shortest_title: shortest(component).map(|s| s.title().to_string()),
        with_description: described,
        without_description: component.count() - described,
    }
}

impl fmt::Display for ComponentAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Component: {}", self.component_name)?;
        writeln!(f, "Total Snippets: {}", self.total_snippets)?;
        writeln!(
            f,
            "Average Code Length: {:.1} characters",
            self.average_code_length
        )?;
        writeln!(f)?;
        writeln!(f, "Language Distribution:")?;
        for (language, count) in &self.language_distribution {
            writeln!(f, "  {}: {} snippets", language, count)?;
        }
        if !self.tag_distribution.is_empty() {
            writeln!(f)?;
            writeln!(f, "Tag Distribution:")?;
            for (tag, count) in &self.tag_distribution {
                writeln!(f, "  {}: {} snippets", tag, count)?;
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "Longest Snippet: {}",
            self.longest_title.as_deref().unwrap_or("None")
        )?;
        writeln!(
            f,
            "Shortest Snippet: {}",
            self.shortest_title.as_deref().unwrap_or("None")
        )?;
        write!(
            f,
            "With Description: {} ({:.1}%)",
            self.with_description,
            self.description_coverage()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnippetId;

    fn leaf(id: SnippetId, title: &str, language: &str, code: &str) -> Snippet {
        Snippet::new(id, title, language, code).unwrap()
    }

    fn root(snippets: Vec<Snippet>) -> SnippetComponent {
        let mut root = SnippetComponent::collection("Main Collection").unwrap();
        for snippet in snippets {
            root.add_snippet(snippet).unwrap();
        }
        root
    }

    #[test]
    fn test_extremes_and_average() {
        let c = root(vec![
            leaf(1, "short", "Rust", &"x".repeat(5)),
            leaf(2, "long", "Rust", &"y".repeat(500)),
        ]);
        assert_eq!(longest(&c).unwrap().title(), "long");
        assert_eq!(shortest(&c).unwrap().title(), "short");
        assert_eq!(average_code_length(&c), 252.5);
    }

    #[test]
    fn test_ties_resolve_to_first_in_flatten_order() {
        let mut inner = SnippetComponent::collection("Inner").unwrap();
        inner.add_snippet(leaf(1, "first", "Go", "abc")).unwrap();
        let mut c = SnippetComponent::collection("Root").unwrap();
        c.add_child(inner).unwrap();
        c.add_snippet(leaf(2, "second", "Go", "xyz")).unwrap();

        assert_eq!(longest(&c).unwrap().title(), "first");
        assert_eq!(shortest(&c).unwrap().title(), "first");
    }

    #[test]
    fn test_empty_component() {
        let c = root(vec![]);
        assert_eq!(average_code_length(&c), 0.0);
        assert!(longest(&c).is_none());
        assert!(shortest(&c).is_none());
        assert!(language_distribution(&c).is_empty());
    }

    #[test]
    fn test_distributions_sum_to_memberships() {
        let mut a = leaf(1, "a", "Java", "a");
        a.set_tags(["web", "oop"]);
        let mut b = leaf(2, "b", "Java", "b");
        b.set_tags(["web"]);
        let c = root(vec![a, b, leaf(3, "c", "Python", "c")]);

        let languages = language_distribution(&c);
        assert_eq!(languages["Java"], 2);
        assert_eq!(languages.values().sum::<usize>(), c.count());

        let tags = tag_distribution(&c);
        assert_eq!(tags["web"], 2);
        assert_eq!(tags["oop"], 1);
        let memberships: usize = c.all_snippets().iter().map(Snippet::tag_count).sum();
        assert_eq!(tags.values().sum::<usize>(), memberships);
    }

    #[test]
    fn test_filters() {
        let described = Snippet::with_description(2, "b", "PYTHON", "print(1)", "prints").unwrap();
        let c = root(vec![leaf(1, "a", "python", "x"), described]);

        assert_eq!(by_language(&c, "Python").unwrap().len(), 2);
        assert!(by_language(&c, " ").is_err());

        assert!(with_code_longer_than(&c, -1).is_err());
        let long = with_code_longer_than(&c, 1).unwrap();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].id(), 2);

        assert_eq!(with_description(&c).len(), 1);
        assert_eq!(without_description(&c)[0].id(), 1);
    }

    #[test]
    fn test_analysis_summary() {
        let c = root(vec![
            Snippet::with_description(1, "a", "Rust", "abcd", "d").unwrap(),
            leaf(2, "b", "Rust", "ab"),
        ]);
        let analysis = analyze(&c);
        assert_eq!(analysis.total_snippets, 2);
        assert_eq!(analysis.longest_title.as_deref(), Some("a"));
        assert_eq!(analysis.description_coverage(), 50.0);

        let text = analysis.to_string();
        assert!(text.contains("Average Code Length: 3.0 characters"));
        assert!(text.contains("  Rust: 2 snippets"));
        assert!(text.contains("Shortest Snippet: b"));
    }
}
