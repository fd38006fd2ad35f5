//! CLI Module for snipvault
//! Each subcommand maps onto one store or analyzer operation. Output is
//! printed here; the store itself never writes to the terminal.

pub mod commands;
pub mod tree;

use crate::config::Config;
use crate::error::{Result, SnippetError};
use crate::models::{Exporter, SnippetId, StorageFormat};
use crate::store::SnippetStore;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "snipvault",
    version,
    about = "Personal code snippet repository"
)]
pub struct Cli {
    /// Directory holding the snippets file, log and exports
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Explicit config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Code given inline or read from a file.
#[derive(Debug, Clone, clap::Args)]
pub struct CodeSource {
    /// Code text
    #[arg(long, conflicts_with = "file")]
    pub code: Option<String>,

    /// Read the code from this file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl CodeSource {
    pub fn read(&self) -> Result<Option<String>> {
        match (&self.code, &self.file) {
            (Some(code), _) => Ok(Some(code.clone())),
            (None, Some(path)) => fs::read_to_string(path).map(Some).map_err(|e| {
                SnippetError::persistence_with(format!("Failed to read {}", path.display()), e)
            }),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Store(SnippetCommand),
    /// Copy the data file into the backups directory
    Backup,
}

/// Commands that run against the opened snippet store.
#[derive(Debug, Subcommand)]
pub enum SnippetCommand {
    /// Add a new snippet
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        language: String,
        #[command(flatten)]
        source: CodeSource,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show all snippets as a tree
    #[command(alias = "ls")]
    List,
    /// Display one snippet
    #[command(aliases = ["view", "cat"])]
    Show { id: SnippetId },
    /// Search title, code, language, description and tags
    #[command(alias = "find")]
    Search { keyword: String },
    /// List snippets carrying a tag
    Tag { tag: String },
    /// Change title, language or code; omitted values stay as they are
    Edit {
        id: SnippetId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[command(flatten)]
        source: CodeSource,
    },
    /// Delete a snippet
    #[command(alias = "rm")]
    Delete { id: SnippetId },
    /// List all tags or change the tags of a snippet
    Tags {
        #[command(subcommand)]
        action: Option<TagAction>,
    },
    /// Set a snippet's description; no text clears it
    Describe { id: SnippetId, text: Option<String> },
    /// Statistics over the whole collection
    Analyze {
        /// Also list snippets in this language
        #[arg(long)]
        language: Option<String>,
        /// Also list snippets with more than N characters of code
        #[arg(long, allow_negative_numbers = true)]
        longer_than: Option<i64>,
    },
    /// Write snippets to files
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
    /// Add snippets from a JSON or YAML export under new ids
    Import { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Tag a snippet
    Add { id: SnippetId, tag: String },
    /// Drop one tag from a snippet
    Remove { id: SnippetId, tag: String },
    /// Replace all tags (comma-separated, empty clears)
    Set {
        id: SnippetId,
        #[arg(value_delimiter = ',')]
        tags: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ExportTarget {
    /// Plain dump of every snippet
    Text { file: String },
    /// Dump with a collection header
    Component { file: String },
    /// One file per language: <base>_<language>.txt
    ByLanguage { base: String },
    /// Analysis report
    Summary { file: String },
    /// Records in JSON or YAML
    Records {
        file: String,
        #[arg(long, default_value_t = StorageFormat::Json)]
        format: StorageFormat,
    },
}

/// Runs one parsed command. Only the store commands open the store.
pub fn execute(cli: &Cli, config: &Config) -> Result<()> {
    let storage = config.storage()?;
    match &cli.command {
        Command::Backup => {
            let path = storage.backup()?;
            println!(
                "{}  Backup written to {}",
                "┃".bright_magenta(),
                path.display().to_string().bright_white()
            );
            Ok(())
        }
        Command::Store(command) => {
            let mut store = SnippetStore::open_named(storage, &config.root_name)?;
            run(command, &mut store, &config.exporter())
        }
    }
}

fn run(command: &SnippetCommand, store: &mut SnippetStore, exporter: &Exporter) -> Result<()> {
    match command {
        SnippetCommand::Add {
            title,
            language,
            source,
            tags,
            description,
        } => {
            let code = source.read()?.unwrap_or_default();
            commands::add(store, title, language, &code, tags, description.as_deref())
        }
        SnippetCommand::List => {
            tree::display_tree(store.root());
            Ok(())
        }
        SnippetCommand::Show { id } => commands::show(store, *id),
        SnippetCommand::Search { keyword } => commands::search(store, keyword),
        SnippetCommand::Tag { tag } => commands::search_by_tag(store, tag),
        SnippetCommand::Edit {
            id,
            title,
            language,
            source,
        } => {
            let code = source.read()?;
            commands::edit(
                store,
                *id,
                title.as_deref(),
                language.as_deref(),
                code.as_deref(),
            )
        }
        SnippetCommand::Delete { id } => commands::delete(store, *id),
        SnippetCommand::Tags { action } => match action {
            None => {
                commands::list_tags(store);
                Ok(())
            }
            Some(TagAction::Add { id, tag }) => commands::add_tag(store, *id, tag),
            Some(TagAction::Remove { id, tag }) => commands::remove_tag(store, *id, tag),
            Some(TagAction::Set { id, tags }) => commands::set_tags(store, *id, tags),
        },
        SnippetCommand::Describe { id, text } => commands::describe(store, *id, text.as_deref()),
        SnippetCommand::Analyze {
            language,
            longer_than,
        } => commands::analyze(store, language.as_deref(), *longer_than),
        SnippetCommand::Export { target } => commands::export(store, exporter, target),
        SnippetCommand::Import { file } => commands::import(store, file),
    }
}

/// Prints an error with its category, e.g. `[Not Found] No snippet found with ID: 3`.
pub fn print_error(err: &SnippetError) {
    eprintln!("{}  {}", "┃".bright_magenta(), err.formatted().bright_red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(["snipvault"].iter().chain(args)).unwrap()
    }

    #[test]
    fn test_store_commands_parse_flat() {
        let cli = parse(&["tags", "add", "3", "web"]);
        assert!(matches!(
            cli.command,
            Command::Store(SnippetCommand::Tags {
                action: Some(TagAction::Add { id: 3, .. })
            })
        ));
        assert!(matches!(parse(&["backup"]).command, Command::Backup));
        assert!(matches!(parse(&["ls"]).command, Command::Store(SnippetCommand::List)));
    }

    #[test]
    fn test_backup_does_not_need_a_readable_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(dir.path());
        fs::write(config.data_path(), "{ not json").unwrap();

        let err = execute(&parse(&["list"]), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);

        execute(&parse(&["backup"]), &config).unwrap();
        let copies: Vec<_> = fs::read_dir(dir.path().join("backups"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(copies.len(), 1);
        assert_eq!(fs::read(copies[0].path()).unwrap(), b"{ not json");
    }

    #[test]
    fn test_show_and_edit_report_missing_id() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(dir.path());

        let err = execute(&parse(&["show", "9"]), &config).unwrap_err();
        assert_eq!(err.formatted(), "[Not Found] No snippet found with ID: 9");
        let edit = parse(&["edit", "9", "--title", "x"]);
        let err = execute(&edit, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "No snippet found with ID: 9");
    }

    #[test]
    fn test_backup_without_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_data_dir(dir.path());
        let err = execute(&parse(&["backup"]), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }
}
