use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;

use insight_core::model::{Test, TestId};
use services::sessions::AnswerStore;
use services::{
    Destination, HandoffStatus, Navigator, SessionCommand, SessionController, SessionEvent,
    SessionOutcome, SessionRunner,
};
use ui::vm::{SessionScreenVm, map_session_screen, time_fmt::format_countdown};

use crate::context::AppContext;

const HELP: &str = "commands: next | prev | goto N | answer TEXT | submit | status | quit";

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Session(SessionCommand),
    Status,
    Help,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_ascii_lowercase().as_str() {
        "next" | "n" => SessionCommand::Next,
        "prev" | "previous" | "p" => SessionCommand::Previous,
        "goto" | "g" => {
            let number: usize = rest
                .parse()
                .map_err(|_| format!("goto needs a question number, got {rest:?}"))?;
            // Question 0 does not exist; let the controller ignore it.
            SessionCommand::GoTo(number.checked_sub(1).unwrap_or(usize::MAX))
        }
        "answer" | "a" => SessionCommand::Answer(rest.to_owned()),
        "submit" => SessionCommand::Submit,
        "quit" | "q" | "exit" => SessionCommand::Leave,
        "status" | "s" | "" => return Ok(Input::Status),
        "help" | "h" | "?" => return Ok(Input::Help),
        other => return Err(format!("unknown command {other:?}; {HELP}")),
    };
    Ok(Input::Session(command))
}

struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        match destination {
            Destination::Results => println!("Redirecting to results page... (insight results)"),
            Destination::TestsCatalog => println!("Test not found. (insight tests)"),
        }
    }
}

/// Local mirror of the running session, fed by runner events.
struct TerminalView {
    test: Test,
    answers: AnswerStore,
    current: usize,
    remaining: u64,
}

impl TerminalView {
    fn print_question(&self) {
        let total = self.answers.len();
        if let Some(slot) = self.answers.get(self.current) {
            println!();
            println!("Question {} of {}: {}", self.current + 1, total, slot.question);
            if slot.is_answered() {
                println!("  your answer: {}", slot.user_answer);
            }
        }
    }

    fn print_status(&self) {
        println!(
            "{} | {} left | {}/{} answered",
            self.test.title(),
            format_countdown(self.remaining),
            self.answers.answered_count(),
            self.answers.len()
        );
        self.print_question();
    }
}

/// Forward stdin lines from a detached thread.
///
/// A blocking read on the thread never holds up shutdown once the session
/// is over.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run `test_id` interactively, reading commands from `lines`.
///
/// Returns once the session has ended, whether or not `lines` is still open.
pub async fn execute(
    ctx: &AppContext,
    test_id: &str,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handoff = ctx.catalog.start_test(&ctx.user, &TestId::new(test_id)).await?;

    let mut controller = SessionController::new(ctx.user.clone(), ctx.clock);
    // A load failure is reported by the runner as a redirect to the catalog.
    let _ = controller.load(Some(handoff));
    let view_test: Option<Test> = controller.active().map(|active| active.test().clone());

    if let SessionScreenVm::Active(screen) = map_session_screen(&controller, &ctx.settings) {
        println!(
            "{} | {} | {} | {}",
            screen.header.title, screen.header.subject, screen.header.marks_label, screen.header.instructor
        );
        println!("Time left: {}", screen.countdown);
        println!("{HELP}");
    }

    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let runner = SessionRunner::new(
        Arc::clone(&ctx.storage.responses),
        Arc::new(TerminalNavigator),
        ctx.settings.clone(),
    )
    .with_events(event_tx);
    let task = tokio::spawn(async move { runner.run(controller, command_rx).await });

    let mut view = view_test.map(|test| TerminalView {
        answers: AnswerStore::from_questions(test.questions()),
        remaining: test.duration_seconds(),
        current: 0,
        test,
    });
    if let Some(view) = &view {
        view.print_question();
    }

    let mut input_open = true;
    let mut pending_answer: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    let _ = command_tx.send(SessionCommand::Leave).await;
                    continue;
                };
                match parse_input(&line) {
                    Ok(Input::Session(command)) => {
                        if let SessionCommand::Answer(text) = &command {
                            pending_answer = Some(text.clone());
                        }
                        let _ = command_tx.send(command).await;
                    }
                    Ok(Input::Status) => {
                        if let Some(view) = &view {
                            view.print_status();
                        }
                    }
                    Ok(Input::Help) => println!("{HELP}"),
                    Err(message) => println!("{message}"),
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let Some(view) = view.as_mut() else { continue };
                match event {
                    SessionEvent::Ticked { remaining_secs } => view.remaining = remaining_secs,
                    SessionEvent::LowTime { remaining_secs } => {
                        println!("Less than five minutes left ({})", format_countdown(remaining_secs));
                    }
                    SessionEvent::Moved { index } => {
                        view.current = index;
                        view.print_question();
                    }
                    SessionEvent::AnswerSaved { index } => {
                        if let Some(text) = pending_answer.take() {
                            view.answers.set_answer(index, text);
                        }
                        println!("Saved answer for question {}.", index + 1);
                    }
                    SessionEvent::Submitted { handoff, .. } => {
                        println!("Test Submitted!");
                        println!("Your responses have been recorded successfully");
                        if handoff == HandoffStatus::Failed {
                            tracing::warn!("the response could not be delivered");
                        }
                    }
                    SessionEvent::Redirected(_) => {}
                }
            }
        }
    }

    match task.await? {
        SessionOutcome::Submitted { submission, trigger, .. } => {
            tracing::info!(?trigger, answered = submission.answered_count(), "session finished");
        }
        SessionOutcome::Abandoned => println!("Left the test without submitting."),
        SessionOutcome::NotFound => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_and_answers() {
        assert_eq!(parse_input("next"), Ok(Input::Session(SessionCommand::Next)));
        assert_eq!(parse_input(" prev "), Ok(Input::Session(SessionCommand::Previous)));
        assert_eq!(parse_input("goto 3"), Ok(Input::Session(SessionCommand::GoTo(2))));
        assert_eq!(
            parse_input("answer  the mitochondria "),
            Ok(Input::Session(SessionCommand::Answer("the mitochondria".into())))
        );
        assert_eq!(parse_input("submit"), Ok(Input::Session(SessionCommand::Submit)));
        assert_eq!(parse_input("quit"), Ok(Input::Session(SessionCommand::Leave)));
    }

    #[test]
    fn status_help_and_errors() {
        assert_eq!(parse_input(""), Ok(Input::Status));
        assert_eq!(parse_input("help"), Ok(Input::Help));
        assert!(parse_input("goto x").is_err());
        assert!(parse_input("dance").is_err());
    }

    #[test]
    fn goto_zero_is_out_of_range() {
        assert_eq!(
            parse_input("goto 0"),
            Ok(Input::Session(SessionCommand::GoTo(usize::MAX)))
        );
    }

    const ZERO_MINUTE_TEST: &str = r#"{"tests": [{
        "id": "z1",
        "title": "Pop Quiz",
        "subject": "History",
        "marks": 10,
        "duration": 0,
        "difficulty": "easy",
        "scheduled_at": "2020-01-01T00:00:00Z",
        "teacher_email": "t@uni.edu",
        "pairs": 1,
        "questions_and_answers": [{"question": "Year of Magna Carta?", "answer": "1215"}]
    }]}"#;

    #[tokio::test]
    async fn returns_after_timeout_while_input_stays_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tests.json"), ZERO_MINUTE_TEST).unwrap();
        let ctx = AppContext::from_options(
            dir.path().to_path_buf(),
            Some("ana@uni.edu".into()),
            None,
            None,
            0,
        )
        .unwrap();

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let finished = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            execute(&ctx, "z1", input_rx),
        )
        .await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert!(!input_tx.is_closed());
        let written = std::fs::read_to_string(dir.path().join("submissions.jsonl")).unwrap();
        assert_eq!(written.lines().count(), 1);
    }
}
