use crate::error::{Result, SnippetError};
use crate::models::snippet::{Snippet, SnippetId};
use std::fmt;

/// A named, ordered group of components. Collections may nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetCollection {
    name: String,
    children: Vec<SnippetComponent>,
}

impl SnippetCollection {
    pub fn new(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(SnippetError::validation(
                "Collection name cannot be null or empty",
            ));
        }
        Ok(Self {
            name: name.to_string(),
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[SnippetComponent] {
        &self.children
    }

    pub fn push(&mut self, child: SnippetComponent) {
        self.children.push(child);
    }

    /// Removes the first direct child equal to `child`. Returns whether one was removed.
    pub fn remove(&mut self, child: &SnippetComponent) -> bool {
        match self.children.iter().position(|c| c == child) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Either one snippet or a collection of components, behind one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetComponent {
    Leaf(Snippet),
    Collection(SnippetCollection),
}

impl From<Snippet> for SnippetComponent {
    fn from(snippet: Snippet) -> Self {
        SnippetComponent::Leaf(snippet)
    }
}

impl From<SnippetCollection> for SnippetComponent {
    fn from(collection: SnippetCollection) -> Self {
        SnippetComponent::Collection(collection)
    }
}

impl SnippetComponent {
    /// Creates an empty collection component.
    pub fn collection(name: &str) -> Result<Self> {
        SnippetCollection::new(name).map(SnippetComponent::Collection)
    }

    pub fn name(&self) -> &str {
        match self {
            SnippetComponent::Leaf(snippet) => snippet.title(),
            SnippetComponent::Collection(collection) => collection.name(),
        }
    }

    /// Depth-first flatten into a freshly allocated list.
    pub fn all_snippets(&self) -> Vec<Snippet> {
        let mut out = Vec::with_capacity(self.count());
        self.visit(&mut |snippet| out.push(snippet.clone()));
        out
    }

    /// Calls `f` on every reachable snippet in flatten order without copying.
    pub fn visit<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Snippet),
    {
        match self {
            SnippetComponent::Leaf(snippet) => f(snippet),
            SnippetComponent::Collection(collection) => {
                for child in &collection.children {
                    child.visit(f);
                }
            }
        }
    }

    pub fn add_child(&mut self, child: SnippetComponent) -> Result<()> {
        match self {
            SnippetComponent::Leaf(_) => Err(SnippetError::unsupported(
                "Individual snippets cannot contain other snippets",
            )),
            SnippetComponent::Collection(collection) => {
                collection.push(child);
                Ok(())
            }
        }
    }

    pub fn add_snippet(&mut self, snippet: Snippet) -> Result<()> {
        self.add_child(SnippetComponent::Leaf(snippet))
    }

    /// Removing a component that is not a direct child is a no-op.
    pub fn remove_child(&mut self, child: &SnippetComponent) -> Result<()> {
        match self {
            SnippetComponent::Leaf(_) => Err(SnippetError::unsupported(
                "Individual snippets cannot contain other snippets",
            )),
            SnippetComponent::Collection(collection) => {
                collection.remove(child);
                Ok(())
            }
        }
    }

    pub fn remove_snippet(&mut self, snippet: &Snippet) -> Result<()> {
        self.remove_child(&SnippetComponent::Leaf(snippet.clone()))
    }

    pub fn count(&self) -> usize {
        match self {
            SnippetComponent::Leaf(_) => 1,
            SnippetComponent::Collection(collection) => collection
                .children
                .iter()
                .map(SnippetComponent::count)
                .sum(),
        }
    }

    /// True for a collection without children. A leaf is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            SnippetComponent::Leaf(_) => false,
            SnippetComponent::Collection(collection) => collection.children.is_empty(),
        }
    }

    pub fn display(&self) -> String {
        self.to_string()
    }

    pub(crate) fn find_snippet(&self, id: SnippetId) -> Option<&Snippet> {
        match self {
            SnippetComponent::Leaf(snippet) => (snippet.id() == id).then_some(snippet),
            SnippetComponent::Collection(collection) => collection
                .children
                .iter()
                .find_map(|child| child.find_snippet(id)),
        }
    }

    pub(crate) fn find_snippet_mut(&mut self, id: SnippetId) -> Option<&mut Snippet> {
        match self {
            SnippetComponent::Leaf(snippet) => (snippet.id() == id).then_some(snippet),
            SnippetComponent::Collection(collection) => collection
                .children
                .iter_mut()
                .find_map(|child| child.find_snippet_mut(id)),
        }
    }

    /// Detaches the leaf holding `id`, wherever it is nested.
    pub(crate) fn take_snippet(&mut self, id: SnippetId) -> Option<Snippet> {
        let SnippetComponent::Collection(collection) = self else {
            return None;
        };

        let direct = collection
            .children
            .iter()
            .position(|child| matches!(child, SnippetComponent::Leaf(s) if s.id() == id));
        if let Some(index) = direct {
            if let SnippetComponent::Leaf(snippet) = collection.children.remove(index) {
                return Some(snippet);
            }
        }

        collection
            .children
            .iter_mut()
            .find_map(|child| child.take_snippet(id))
    }

    pub(crate) fn max_id(&self) -> Option<SnippetId> {
        let mut max = None;
        self.visit(&mut |snippet| {
            max = Some(max.map_or(snippet.id(), |m: SnippetId| m.max(snippet.id())));
        });
        max
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            SnippetComponent::Leaf(snippet) => {
                for line in snippet.to_string().lines() {
                    writeln!(f, "{}{}", indent, line)?;
                }
                Ok(())
            }
            SnippetComponent::Collection(collection) => {
                writeln!(
                    f,
                    "{}=== Collection: {} ({} snippets) ===",
                    indent,
                    collection.name,
                    self.count()
                )?;
                for child in &collection.children {
                    child.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SnippetComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
