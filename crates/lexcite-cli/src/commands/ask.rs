//! Question commands: single, batch and the per-answer log excerpt.

use crate::error::Result;
use crate::output::Formatter;
use crate::session::Coordinator;
use lexcite_domain::CompletionProvider;
use lexcite_llm::{format_log_entries, read_log_range};
use lexcite_worker::QueryOutcome;
use std::fmt::Display;

/// Ask one question and print the answer; returns whether it was answered.
pub async fn execute_ask<C>(
    coordinator: &mut Coordinator<C>,
    question: &str,
    formatter: &Formatter,
    show_log: bool,
) -> Result<bool>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    match coordinator.ask(question).await? {
        Ok(outcome) => {
            println!("{}", formatter.answer(&outcome));
            if show_log {
                print_log_excerpt(&outcome, formatter);
            }
            Ok(true)
        }
        Err(message) => {
            eprintln!("{}", formatter.error(&message));
            Ok(false)
        }
    }
}

/// Ask each question in turn; returns how many failed.
pub async fn execute_batch<C>(
    coordinator: &mut Coordinator<C>,
    questions: &[String],
    formatter: &Formatter,
    show_log: bool,
) -> Result<usize>
where
    C: CompletionProvider + Send + Sync + 'static,
    C::Error: Display,
{
    let mut failed = 0;
    for (i, question) in questions.iter().enumerate() {
        println!("{}", formatter.info(&format!("[{}/{}] {}", i + 1, questions.len(), question)));
        if !execute_ask(coordinator, question, formatter, show_log).await? {
            failed += 1;
        }
        println!("{}", "-".repeat(60));
    }
    Ok(failed)
}

fn print_log_excerpt(outcome: &QueryOutcome, formatter: &Formatter) {
    let Some(range) = &outcome.log_range else {
        return;
    };
    let Some(path) = &range.path else {
        return;
    };

    match read_log_range(path, range.start, Some(range.end)) {
        Ok(entries) => println!("\n{}", format_log_entries(&entries)),
        Err(e) => eprintln!("{}", formatter.warning(&format!("Could not read log: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexcite_llm::MockProvider;
    use lexcite_worker::{SessionContext, WorkerConfig};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_batch_counts_failures() {
        let mut provider = MockProvider::new("answer");
        provider.add_error("second", "rate limited");

        let mut coordinator = Coordinator::new(&WorkerConfig {
            poll_interval_ms: 5,
            ..WorkerConfig::default()
        });
        coordinator.open_session(SessionContext::new(Arc::new(provider.clone()), "ctx"));

        let questions = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let failed = execute_batch(&mut coordinator, &questions, &Formatter::new(false), false)
            .await
            .unwrap();

        assert_eq!(failed, 1);
        assert_eq!(provider.call_count(), 3);
    }
}
