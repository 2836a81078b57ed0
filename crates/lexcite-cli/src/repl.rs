//! Interactive question loop.

use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Coordinator;
use lexcite_domain::CompletionProvider;
use lexcite_worker::IngestOutcome;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::fmt::Display;
use std::path::PathBuf;

/// Run the interactive loop until `exit` or end of input.
pub async fn run_repl<C>(
    coordinator: &mut Coordinator<C>,
    outcome: &IngestOutcome,
    formatter: &Formatter,
    history_size: usize,
    show_log: bool,
) -> Result<()>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    println!("{}", formatter.info("Ask a question, 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(history_size)
        .map_err(|e| CliError::Editor(e.to_string()))?
        .build();
    let mut editor =
        DefaultEditor::with_config(editor_config).map_err(|e| CliError::Editor(e.to_string()))?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("lexcite> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    ReplCommand::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ReplCommand::Help => print_help(formatter),
                    ReplCommand::Documents => print_documents(outcome, formatter),
                    ReplCommand::Ask(question) => {
                        commands::execute_ask(coordinator, question, formatter, show_log).await?;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Exit,
    Help,
    Documents,
    Ask(&'a str),
}

/// Anything that is not a command word is a question.
fn parse_repl_command(line: &str) -> ReplCommand<'_> {
    match line.to_lowercase().as_str() {
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "help" | "?" => ReplCommand::Help,
        "docs" => ReplCommand::Documents,
        _ => ReplCommand::Ask(line),
    }
}

fn print_documents(outcome: &IngestOutcome, formatter: &Formatter) {
    println!("{}", formatter.info(&format!("{} document(s) loaded:", outcome.documents.len())));
    for doc in &outcome.documents {
        println!("  {} ({} chars)", doc.name, doc.text.chars().count());
    }
    println!();
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>                     - Ask about the loaded documents");
    println!("  docs                           - List loaded documents");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit");
    println!();
    println!("  Answers cite sources as [Source: <document>, chars <start>-<end>];");
    println!("  each citation is checked against the extraction index.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repl_command() {
        assert_eq!(parse_repl_command("exit"), ReplCommand::Exit);
        assert_eq!(parse_repl_command("QUIT"), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?"), ReplCommand::Help);
        assert_eq!(parse_repl_command("docs"), ReplCommand::Documents);
        assert_eq!(
            parse_repl_command("Who signed the lease?"),
            ReplCommand::Ask("Who signed the lease?")
        );
    }
}
