use crate::analyzer;
use crate::cli::ExportTarget;
use crate::error::Result;
use crate::models::{Exporter, Snippet, SnippetId, import_records};
use crate::search;
use crate::store::{self, SnippetStore};
use colored::Colorize;
use std::path::Path;

fn margin() -> colored::ColoredString {
    "┃".bright_magenta()
}

fn rule() {
    println!("{}", "─".repeat(60).bright_magenta());
}

pub fn add(
    store: &mut SnippetStore,
    title: &str,
    language: &str,
    code: &str,
    tags: &[String],
    description: Option<&str>,
) -> Result<()> {
    let snippet = store.add_with_details(title, language, code, tags, description)?;
    println!(
        "{}  {} {} (ID {})",
        margin(),
        "Added".bright_green().bold(),
        snippet.title().bright_white(),
        snippet.id().to_string().bright_yellow()
    );
    Ok(())
}

pub fn show(store: &SnippetStore, id: SnippetId) -> Result<()> {
    let snippet = store.get(id).ok_or_else(|| store::not_found(id))?;
    display_snippet(&snippet);
    Ok(())
}

/// Full view of one snippet with its code.
pub fn display_snippet(snippet: &Snippet) {
    println!(
        "{}  {} {}",
        margin(),
        "SNIPPET".bright_green().bold(),
        snippet.title().bold()
    );
    rule();
    println!(
        "{}  {}: {}",
        margin(),
        "Language".bright_yellow(),
        snippet.language()
    );
    if snippet.has_description() {
        println!(
            "{}  {}: {}",
            margin(),
            "Description".bright_cyan(),
            snippet.description()
        );
    }
    if snippet.tag_count() > 0 {
        let tags: Vec<String> = snippet
            .tags()
            .into_iter()
            .map(|t| format!("#{}", t))
            .collect();
        println!("{}  {}: {}", margin(), "Tags".bright_blue(), tags.join(" "));
    }
    println!("{}  {}: {}", margin(), "ID".bright_black(), snippet.id());
    rule();

    for line in snippet.code().lines() {
        println!("{}  {}", margin(), line);
    }
}

pub fn search(store: &SnippetStore, keyword: &str) -> Result<()> {
    let hits = store.search_detailed(keyword)?;
    let query = keyword.to_lowercase();

    println!(
        "{}  {} '{}'",
        margin(),
        "SEARCH RESULTS FOR".bold(),
        keyword.bright_white()
    );

    if hits.is_empty() {
        println!("{}  No snippets found containing: {}", margin(), keyword);
        return Ok(());
    }

    println!(
        "{}  Found {} snippets matching '{}':",
        margin(),
        hits.len(),
        keyword
    );
    rule();

    for (idx, hit) in hits.iter().enumerate() {
        println!(
            "{}  {}. {} (match in: {})",
            margin(),
            (idx + 1).to_string().bright_yellow(),
            hit.snippet.title().bright_white().bold(),
            hit.field.label().bright_green()
        );
        println!(
            "{}     {}: {}",
            margin(),
            "Language".bright_blue(),
            hit.snippet.language()
        );
        if let Some((line_no, line)) = search::matching_line(&hit.snippet, &query) {
            println!(
                "{}     {}: {}",
                margin(),
                format!("Line {}", line_no).bright_cyan(),
                line
            );
        }
        println!(
            "{}     {}: {}",
            margin(),
            "ID".bright_black(),
            hit.snippet.id()
        );

        if idx < hits.len() - 1 {
            println!("{}  {}", margin(), "─".repeat(40).bright_black());
        }
    }

    Ok(())
}

pub fn search_by_tag(store: &SnippetStore, tag: &str) -> Result<()> {
    let found = store.search_by_tag(tag)?;
    if found.is_empty() {
        println!("{}  No snippets found with tag: {}", margin(), tag);
        return Ok(());
    }

    println!(
        "{}  {} snippets tagged {}:",
        margin(),
        found.len(),
        format!("#{}", tag.trim().to_lowercase()).bright_blue()
    );
    print_snippet_list(&found);
    Ok(())
}

pub fn edit(
    store: &mut SnippetStore,
    id: SnippetId,
    title: Option<&str>,
    language: Option<&str>,
    code: Option<&str>,
) -> Result<()> {
    let current = store.get(id).ok_or_else(|| store::not_found(id))?;

    store.edit(
        id,
        title.unwrap_or(current.title()),
        language.unwrap_or(current.language()),
        code.unwrap_or(current.code()),
    )?;
    println!(
        "{}  {} snippet {}",
        margin(),
        "Updated".bright_green().bold(),
        id.to_string().bright_yellow()
    );
    Ok(())
}

pub fn delete(store: &mut SnippetStore, id: SnippetId) -> Result<()> {
    let removed = store.delete(id)?;
    println!(
        "{}  {} {} (ID {})",
        margin(),
        "Deleted".bright_red().bold(),
        removed.title().bright_white(),
        id
    );
    Ok(())
}

pub fn list_tags(store: &SnippetStore) {
    let tags = store.all_tags();
    if tags.is_empty() {
        println!("{}  No tags found in your snippets.", margin());
        return;
    }

    let counts = analyzer::tag_distribution(store.root());
    println!("{}  {}", margin(), "All tags in your collection:".bold());
    for tag in tags {
        let count = counts.get(&tag).copied().unwrap_or(0);
        println!(
            "{}  {} {}",
            margin(),
            format!("#{}", tag).bright_blue(),
            format!("({})", count).bright_black()
        );
    }
}

pub fn add_tag(store: &mut SnippetStore, id: SnippetId, tag: &str) -> Result<()> {
    store.add_tag(id, tag)?;
    println!(
        "{}  Tagged snippet {} with #{}",
        margin(),
        id,
        tag.trim().to_lowercase()
    );
    Ok(())
}

pub fn remove_tag(store: &mut SnippetStore, id: SnippetId, tag: &str) -> Result<()> {
    if store.remove_tag(id, tag)? {
        println!(
            "{}  Removed #{} from snippet {}",
            margin(),
            tag.trim().to_lowercase(),
            id
        );
    } else {
        println!(
            "{}  Snippet {} has no tag #{}",
            margin(),
            id,
            tag.trim().to_lowercase()
        );
    }
    Ok(())
}

pub fn set_tags(store: &mut SnippetStore, id: SnippetId, tags: &[String]) -> Result<()> {
    store.set_tags(id, tags)?;
    println!("{}  Replaced tags of snippet {}", margin(), id);
    Ok(())
}

pub fn describe(store: &mut SnippetStore, id: SnippetId, text: Option<&str>) -> Result<()> {
    store.set_description(id, text)?;
    match text {
        Some(_) => println!("{}  Updated description of snippet {}", margin(), id),
        None => println!("{}  Cleared description of snippet {}", margin(), id),
    }
    Ok(())
}

pub fn analyze(
    store: &SnippetStore,
    language: Option<&str>,
    longer_than: Option<i64>,
) -> Result<()> {
    let root = store.root();
    println!("{}  {}", margin(), "SNIPPET ANALYSIS".bright_green().bold());
    rule();
    for line in analyzer::analyze(root).to_string().lines() {
        println!("{}  {}", margin(), line);
    }

    if let Some(language) = language {
        let matches = analyzer::by_language(root, language)?;
        rule();
        if matches.is_empty() {
            println!("{}  No snippets found for language: {}", margin(), language);
        } else {
            println!(
                "{}  Found {} snippets in {}:",
                margin(),
                matches.len(),
                language
            );
            print_snippet_list(&matches);
        }
    }

    if let Some(min) = longer_than {
        let matches = analyzer::with_code_longer_than(root, min)?;
        rule();
        println!(
            "{}  {} snippets with more than {} characters:",
            margin(),
            matches.len(),
            min
        );
        print_snippet_list(&matches);
    }

    Ok(())
}

pub fn export(store: &SnippetStore, exporter: &Exporter, target: &ExportTarget) -> Result<()> {
    let root = store.root();
    let written = match target {
        ExportTarget::Text { file } => vec![exporter.export_to_text(&store.all_snippets(), file)?],
        ExportTarget::Component { file } => vec![exporter.export_component_to_text(root, file)?],
        ExportTarget::ByLanguage { base } => exporter.export_by_language(root, base)?,
        ExportTarget::Summary { file } => vec![exporter.export_summary_report(root, file)?],
        ExportTarget::Records { file, format } => {
            vec![exporter.export_records(root, file, *format)?]
        }
    };

    for path in written {
        println!(
            "{}  {} {}",
            margin(),
            "Wrote".bright_green(),
            path.display().to_string().bright_white()
        );
    }
    Ok(())
}

pub fn import(store: &mut SnippetStore, file: &Path) -> Result<()> {
    let records = import_records(file)?;
    let added = store.import(&records)?;
    println!(
        "{}  Imported {} snippets from {}",
        margin(),
        added.len(),
        file.display()
    );
    Ok(())
}

fn print_snippet_list(snippets: &[Snippet]) {
    for snippet in snippets {
        println!(
            "{}  - {} {} {}",
            margin(),
            snippet.title().bright_white(),
            format!("[{}]", snippet.language()).bright_black(),
            format!("(ID {})", snippet.id()).bright_black().italic()
        );
    }
}
