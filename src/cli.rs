//! Command-line front end for authoring a language project.
//!
//! Usage:
//!   langtool init <name> <main> [<code>...]   # Create a project
//!   langtool show                             # Project summary
//!   langtool list                             # Every key in every language
//!   langtool get <key> [--upper|--lower|--capitalized]
//!   langtool use <code>                       # Select the current language
//!   langtool add <key> [<code>=<text>...]
//!   langtool edit <key> <code>=<text>...
//!   langtool delete <key>
//!   langtool add-language <code>
//!   langtool remove-language <code>
//!   langtool sync                             # Fill missing keys
//!   langtool check                            # Validate translations

use crate::config::Config;
use crate::i18n::{
    CatalogEditor, LanguageCatalog, LanguageCode, LanguageProject, TranslationValidator,
};
use crate::preferences::FilePreferences;
use crate::storage::{FsStore, TableStore};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Case transform applied by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    AsIs,
    Upper,
    Lower,
    Capitalized,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init {
        name: String,
        main: String,
        languages: Vec<String>,
    },
    Show,
    List,
    Get {
        key: String,
        case: Case,
    },
    Use {
        code: String,
    },
    Add {
        key: String,
        translations: Vec<(String, String)>,
    },
    Edit {
        key: String,
        translations: Vec<(String, String)>,
    },
    Delete {
        key: String,
    },
    AddLanguage {
        code: String,
    },
    RemoveLanguage {
        code: String,
    },
    Sync,
    Check,
}

/// Usage text printed on bad input.
pub const USAGE: &str = "Usage: langtool <init|show|list|get|use|add|edit|delete|add-language|remove-language|sync|check> [args]";

impl Command {
    /// Parse arguments (without the program name).
    pub fn parse(args: &[String]) -> Result<Command> {
        let Some((name, rest)) = args.split_first() else {
            bail!("No command given\n{}", USAGE);
        };

        let command = match name.as_str() {
            "init" => {
                let [name, main, languages @ ..] = rest else {
                    bail!("Usage: langtool init <name> <main> [<code>...]");
                };
                Command::Init {
                    name: name.clone(),
                    main: main.clone(),
                    languages: languages.to_vec(),
                }
            }
            "show" => Command::Show,
            "list" => Command::List,
            "get" => {
                let mut key = None;
                let mut case = Case::AsIs;
                for arg in rest {
                    match arg.as_str() {
                        "--upper" => case = Case::Upper,
                        "--lower" => case = Case::Lower,
                        "--capitalized" => case = Case::Capitalized,
                        flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
                        _ if key.is_none() => key = Some(arg.clone()),
                        _ => bail!("Usage: langtool get <key> [--upper|--lower|--capitalized]"),
                    }
                }
                Command::Get {
                    key: key.unwrap_or_default(),
                    case,
                }
            }
            "use" => Command::Use {
                code: single_arg(rest, "langtool use <code>")?,
            },
            "add" => {
                let (key, translations) =
                    key_and_translations(rest, "langtool add <key> [<code>=<text>...]")?;
                Command::Add { key, translations }
            }
            "edit" => {
                let (key, translations) =
                    key_and_translations(rest, "langtool edit <key> <code>=<text>...")?;
                if translations.is_empty() {
                    bail!("Usage: langtool edit <key> <code>=<text>...");
                }
                Command::Edit { key, translations }
            }
            "delete" => Command::Delete {
                key: single_arg(rest, "langtool delete <key>")?,
            },
            "add-language" => Command::AddLanguage {
                code: single_arg(rest, "langtool add-language <code>")?,
            },
            "remove-language" => Command::RemoveLanguage {
                code: single_arg(rest, "langtool remove-language <code>")?,
            },
            "sync" => Command::Sync,
            "check" => Command::Check,
            other => bail!("Unknown command: {}\n{}", other, USAGE),
        };

        Ok(command)
    }
}

fn single_arg(rest: &[String], usage: &str) -> Result<String> {
    match rest {
        [value] => Ok(value.clone()),
        _ => bail!("Usage: {}", usage),
    }
}

fn key_and_translations(rest: &[String], usage: &str) -> Result<(String, Vec<(String, String)>)> {
    let Some((key, pairs)) = rest.split_first() else {
        bail!("Usage: {}", usage);
    };

    let translations = pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(code, text)| (code.to_string(), text.to_string()))
                .with_context(|| format!("Expected <code>=<text>, got '{}'", pair))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((key.clone(), translations))
}

/// Execute a command against the configured project directory.
pub fn run(command: Command, config: &Config) -> Result<()> {
    let store = FsStore::new(&config.project_dir);

    match command {
        Command::Init {
            name,
            main,
            languages,
        } => {
            if store.read_project().is_ok() {
                bail!(
                    "A project already exists in {}",
                    config.project_dir.display()
                );
            }
            let mut project = LanguageProject::new(name, LanguageCode::new(&main)?);
            for code in languages {
                project = project.with_language(LanguageCode::new(&code)?)?;
            }
            store
                .write_project(&project.to_json())
                .context("Failed to write project descriptor")?;
            info!("Created project '{}'", project.project_name);
            println!(
                "Created project '{}' in {}",
                project.project_name,
                config.project_dir.display()
            );
        }
        Command::Show => {
            let catalog = open_runtime(&store, config)?;
            let project = catalog.project();
            println!("Project: {}", project.project_name);
            println!("Main language: {}", catalog.main_language().label());
            println!("Current language: {}", catalog.current_language().label());
            for code in catalog.languages() {
                let count = catalog.table(code.as_str()).map_or(0, |t| t.len());
                println!("  {:<12} {} entries", code.label(), count);
            }
        }
        Command::List => {
            let editor = CatalogEditor::load(&store)?;
            for row in editor.rows() {
                let values: Vec<String> = row
                    .values
                    .iter()
                    .map(|(code, value)| format!("{}={:?}", code, value))
                    .collect();
                println!("{}\t{}", row.key, values.join("\t"));
            }
        }
        Command::Get { key, case } => {
            let catalog = open_runtime(&store, config)?;
            let text = match case {
                Case::AsIs => catalog.lang_string(&key),
                Case::Upper => catalog.lang_upper(&key),
                Case::Lower => catalog.lang_lower(&key),
                Case::Capitalized => catalog.lang_capitalized(&key),
            };
            println!("{}", text);
        }
        Command::Use { code } => {
            let mut catalog = open_runtime(&store, config)?;
            catalog.set_language(&code)?;
            println!("Current language: {}", catalog.current_language().label());
        }
        Command::Add { key, translations } => {
            let mut editor = CatalogEditor::load(&store)?;
            editor.add_key_with(&key, translations)?;
            save(&mut editor, &store)?;
        }
        Command::Edit { key, translations } => {
            let mut editor = CatalogEditor::load(&store)?;
            editor.edit_key(&key, translations)?;
            save(&mut editor, &store)?;
        }
        Command::Delete { key } => {
            let mut editor = CatalogEditor::load(&store)?;
            editor.delete_key(&key)?;
            save(&mut editor, &store)?;
        }
        Command::AddLanguage { code } => {
            let mut editor = CatalogEditor::load(&store)?;
            editor.add_language(&code)?;
            save(&mut editor, &store)?;
        }
        Command::RemoveLanguage { code } => {
            let mut editor = CatalogEditor::load(&store)?;
            editor.remove_language(&code)?;
            save(&mut editor, &store)?;
        }
        Command::Sync => {
            // Loading already aligns every language with the main one
            let mut editor = CatalogEditor::load(&store)?;
            save(&mut editor, &store)?;
        }
        Command::Check => {
            let catalog = LanguageCatalog::load(&store)?;
            let report = TranslationValidator::validate_catalog(&catalog);
            for error in &report.errors {
                println!("error: {}", error);
            }
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
            if report.has_errors() {
                bail!("{} translation errors found", report.errors.len());
            }
            println!("OK ({} warnings)", report.warnings.len());
        }
    }

    Ok(())
}

fn open_runtime(store: &FsStore, config: &Config) -> Result<LanguageCatalog> {
    let catalog = LanguageCatalog::load(store)
        .with_context(|| format!("Failed to open project in {}", store.root().display()))?;
    Ok(catalog.with_preferences(FilePreferences::open(&config.prefs_file)))
}

fn save(editor: &mut CatalogEditor, store: &FsStore) -> Result<()> {
    let report = editor.persist(store)?;
    for code in &report.skipped {
        println!("Skipped '{}': no entries", code);
    }
    println!("Saved {} languages", report.written.len());
    Ok(())
}
