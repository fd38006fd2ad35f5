use crate::analyzer;
use crate::error::{Result, SnippetError};
use crate::models::storage::{JsonCodec, RecordCodec, SnippetRecord, StorageFormat, YamlCodec};
use crate::models::{Snippet, SnippetComponent};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Turns a language name into a file-name fragment, e.g. `C++` -> `cplusplus`, `C#` -> `csharp`.
pub fn language_slug(language: &str) -> String {
    let spelled = language
        .trim()
        .to_lowercase()
        .replace('+', "plus")
        .replace('#', "sharp");
    NON_ALNUM.replace_all(&spelled, "_").into_owned()
}

/// Writes text and record exports. Relative file names resolve against `export_dir`.
#[derive(Debug, Clone)]
pub struct Exporter {
    export_dir: PathBuf,
}

impl Exporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Each snippet's full dump, separated by blank lines.
    pub fn export_to_text(&self, snippets: &[Snippet], filename: &str) -> Result<PathBuf> {
        let path = self.resolve(filename, "Filename")?;
        let content = render_snippets(snippets);
        write_file(&path, &content)?;
        tracing::info!("Exported {} snippets to {}", snippets.len(), path.display());
        Ok(path)
    }

    pub fn export_component_to_text(
        &self,
        component: &SnippetComponent,
        filename: &str,
    ) -> Result<PathBuf> {
        let path = self.resolve(filename, "Filename")?;
        let mut content = format!(
            "=== EXPORTED FROM: {} ===\nTotal Snippets: {}\n\n",
            component.name(),
            component.count()
        );
        content.push_str(&render_snippets(&component.all_snippets()));
        write_file(&path, &content)?;
        tracing::info!(
            "Exported component '{}' to {}",
            component.name(),
            path.display()
        );
        Ok(path)
    }

    /// One `<base>_<language>.txt` file per language (case-insensitive), ordered by language.
    /// Languages whose slugs collide get a numeric suffix, e.g. `<base>_objective_c_2.txt`.
    pub fn export_by_language(
        &self,
        component: &SnippetComponent,
        base_filename: &str,
    ) -> Result<Vec<PathBuf>> {
        if base_filename.trim().is_empty() {
            return Err(SnippetError::validation(
                "Base filename cannot be null or empty",
            ));
        }

        let mut by_language: BTreeMap<String, Vec<Snippet>> = BTreeMap::new();
        for snippet in component.all_snippets() {
            by_language
                .entry(snippet.language().trim().to_lowercase())
                .or_default()
                .push(snippet);
        }

        let mut used = BTreeSet::new();
        let mut written = Vec::with_capacity(by_language.len());
        for (language, snippets) in &by_language {
            let base_slug = language_slug(language);
            let mut slug = base_slug.clone();
            let mut n = 2;
            while !used.insert(slug.clone()) {
                slug = format!("{}_{}", base_slug, n);
                n += 1;
            }
            let filename = format!("{}_{}.txt", base_filename.trim(), slug);
            written.push(self.export_to_text(snippets, &filename)?);
        }

        tracing::info!(
            "Exported {} language files from component '{}'",
            written.len(),
            component.name()
        );
        Ok(written)
    }

    pub fn export_summary_report(
        &self,
        component: &SnippetComponent,
        filename: &str,
    ) -> Result<PathBuf> {
        let path = self.resolve(filename, "Filename")?;
        let analysis = analyzer::analyze(component);
        let content = format!(
            "=== SNIPPET SUMMARY REPORT ===\n{}\n===============================\n",
            analysis
        );
        write_file(&path, &content)?;
        tracing::info!(
            "Exported summary report for component '{}' to {}",
            component.name(),
            path.display()
        );
        Ok(path)
    }

    /// Machine-readable snapshot of the flattened records.
    pub fn export_records(
        &self,
        component: &SnippetComponent,
        filename: &str,
        format: StorageFormat,
    ) -> Result<PathBuf> {
        let path = self.resolve(filename, "Filename")?;
        let records: Vec<SnippetRecord> = component
            .all_snippets()
            .iter()
            .map(SnippetRecord::from)
            .collect();
        let bytes = format.codec().encode(&records)?;
        write_file(&path, &bytes)?;
        tracing::info!("Exported {} records to {}", records.len(), path.display());
        Ok(path)
    }

    fn resolve(&self, filename: &str, what: &str) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(SnippetError::validation(format!(
                "{} cannot be null or empty",
                what
            )));
        }
        let path = Path::new(filename.trim());
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.export_dir.join(path))
        }
    }
}

/// Reads records written by [`Exporter::export_records`] or a data file.
/// The format follows the extension; unknown extensions try JSON, then YAML.
pub fn import_records(path: &Path) -> Result<Vec<SnippetRecord>> {
    let content = fs::read(path).map_err(|e| {
        SnippetError::persistence_with(format!("Failed to open import file {}", path.display()), e)
    })?;

    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(StorageFormat::from_extension);

    match format {
        Some(format) => format.codec().decode(&content),
        None => JsonCodec
            .decode(&content)
            .or_else(|_| YamlCodec.decode(&content))
            .map_err(|_| SnippetError::persistence("Import file is neither JSON nor YAML")),
    }
}

fn render_snippets(snippets: &[Snippet]) -> String {
    let mut content = String::new();
    for snippet in snippets {
        content.push_str(&snippet.to_string());
        content.push_str("\n\n");
    }
    content
}

fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SnippetError::persistence_with(
                format!("Failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }
    fs::write(path, content).map_err(|e| {
        SnippetError::persistence_with(format!("Failed to write {}", path.display()), e)
    })
}
