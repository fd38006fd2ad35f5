use crate::models::SnippetComponent;
use colored::Colorize;

/// Prints a component as a tree: collections first-level, snippets as leaves.
pub fn display_tree(root: &SnippetComponent) {
    for line in render_tree(root, true) {
        println!("{}  {}", "┃".bright_magenta(), line);
    }
}

/// Builds the tree lines. `color` toggles terminal styling.
pub fn render_tree(root: &SnippetComponent, color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    match root {
        SnippetComponent::Leaf(_) => push_node(root, &[], true, color, &mut lines, false),
        SnippetComponent::Collection(collection) => {
            let header = format!("{} ({} snippets)", collection.name(), root.count());
            lines.push(if color {
                header.bold().to_string()
            } else {
                header
            });
            if root.is_empty() {
                lines.push(String::from("No snippets available."));
            }
            print_children(collection.children(), &[], color, &mut lines);
        }
    }
    lines
}

fn print_children(
    children: &[SnippetComponent],
    guides: &[bool],
    color: bool,
    lines: &mut Vec<String>,
) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        push_node(child, guides, is_last, color, lines, true);
    }
}

fn push_node(
    node: &SnippetComponent,
    guides: &[bool],
    is_last: bool,
    color: bool,
    lines: &mut Vec<String>,
    connector: bool,
) {
    let mut prefix = String::new();
    // true draws a line for a level that still has siblings below
    for guide in guides {
        prefix.push_str(if *guide { "┃  " } else { "   " });
    }
    if connector {
        prefix.push_str(if is_last { "└── " } else { "├── " });
    }

    match node {
        SnippetComponent::Leaf(snippet) => {
            let label = format!("[{}]", snippet.language());
            let id = format!("#{}", snippet.id());
            let line = if color {
                format!(
                    "{}{} {} {}",
                    prefix,
                    snippet.title().bright_white(),
                    label.bright_black(),
                    id.bright_black().italic()
                )
            } else {
                format!("{}{} {} {}", prefix, snippet.title(), label, id)
            };
            lines.push(line);
        }
        SnippetComponent::Collection(collection) => {
            let name = format!("{}/", collection.name());
            lines.push(if color {
                format!("{}{}", prefix, name.bright_blue().bold())
            } else {
                format!("{}{}", prefix, name)
            });

            let mut next_guides = guides.to_vec();
            next_guides.push(!is_last);
            print_children(collection.children(), &next_guides, color, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snippet;

    #[test]
    fn test_render_nested_tree() {
        let mut web = SnippetComponent::collection("Web").unwrap();
        web.add_snippet(Snippet::new(2, "Page", "HTML", "<p></p>").unwrap())
            .unwrap();

        let mut root = SnippetComponent::collection("Main Collection").unwrap();
        root.add_snippet(Snippet::new(1, "Hello", "Rust", "fn main() {}").unwrap())
            .unwrap();
        root.add_child(web).unwrap();

        let lines = render_tree(&root, false);
        assert_eq!(
            lines,
            vec![
                "Main Collection (2 snippets)",
                "├── Hello [Rust] #1",
                "└── Web/",
                "   └── Page [HTML] #2",
            ]
        );
    }

    #[test]
    fn test_render_empty_collection() {
        let root = SnippetComponent::collection("Main Collection").unwrap();
        let lines = render_tree(&root, false);
        assert_eq!(lines[1], "No snippets available.");
    }
}
