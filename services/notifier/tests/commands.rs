mod support;

use notifier_lib::adapters::ConsoleGateway;
use notifier_lib::app::commands::{execute, Command, Flow};
use notifier_lib::config::Timings;
use notifier_lib::error::AppError;
use support::{harness, question, RecordingGateway, ScriptedSource};
use trivia_core::domain::{QuestionId, QuestionPrompt};
use trivia_core::ports::{NotificationGateway, PortError};

fn scripted() -> ScriptedSource {
    ScriptedSource::new(vec![question("Q1", "A", &["B", "C", "D"])])
}

#[tokio::test]
async fn numbered_answers_are_refused_when_the_notification_answers() {
    let h = harness(scripted(), RecordingGateway::granting());
    h.coordinator.fetch_and_notify().await;

    let outcome = execute(Command::Answer(1), &h.coordinator, None).await;
    assert!(matches!(outcome, Err(AppError::AnswersFromNotification)));
    assert!(h.gateway.results().is_empty());
}

#[tokio::test]
async fn numbered_answer_reaches_the_console_gateway() {
    let h = harness(scripted(), RecordingGateway::granting());
    let console = ConsoleGateway::new(Timings::default());

    // Nothing shown yet.
    let outcome = execute(Command::Answer(1), &h.coordinator, Some(&console)).await;
    assert!(matches!(outcome, Err(AppError::Port(PortError::NotFound(_)))));

    let prompt = QuestionPrompt {
        id: QuestionId::new(),
        question: "Q1".to_string(),
        answers: vec!["B".into(), "A".into()],
    };
    console.present(&prompt).await.unwrap();
    let outcome = execute(Command::Answer(2), &h.coordinator, Some(&console)).await;
    assert!(matches!(outcome, Ok(Flow::Continue)));
}

#[tokio::test]
async fn interval_and_quit_work_in_every_mode() {
    let h = harness(scripted(), RecordingGateway::granting());

    let outcome = execute(Command::Interval(5.0), &h.coordinator, None).await;
    assert!(matches!(outcome, Ok(Flow::Continue)));
    assert_eq!(h.coordinator.interval().await.minutes(), 5.0);

    let outcome = execute(Command::Interval(1e18), &h.coordinator, None).await;
    assert!(matches!(outcome, Err(AppError::InvalidInterval(_))));

    let outcome = execute(Command::Quit, &h.coordinator, None).await;
    assert!(matches!(outcome, Ok(Flow::Quit)));
}
