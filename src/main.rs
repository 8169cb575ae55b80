//! Nour - terminal study chat
//!
//! Reads questions from stdin, sends them to Gemini through the session
//! controller, and prints the rendered replies with numbered suggestions.

use nour_chat::terminal::{self, Command};
use nour_chat::{
    Config, GeminiTransport, LoggingTransport, RejectedReason, SessionController, Transport,
    TurnOutcome,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    let instruction = config.instruction()?;
    let transport = LoggingTransport::new(GeminiTransport::from_config(&config)?);
    tracing::info!(
        model = %config.model,
        timeout_secs = config.timeout.as_secs(),
        custom_instruction = config.instruction_file.is_some(),
        "Configuration loaded"
    );

    let controller = Arc::new(SessionController::new(transport, instruction));

    // Ctrl-C tears the session down, cancelling any pending request
    let signal_controller = Arc::clone(&controller);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_controller.shutdown();
        }
    });

    let mut shown = print_new_turns(&controller, 0);
    print_suggestions(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = controller.closed() => break,
        };
        let Some(line) = line else { break };

        let result = match terminal::parse_command(&line) {
            Command::Quit => break,
            Command::Suggestion(index) => controller.submit_suggestion(index).await,
            Command::Message(text) => controller.submit(&text).await,
        };

        match result {
            Ok(TurnOutcome::Cancelled) => break,
            Ok(_) => {
                shown = print_new_turns(&controller, shown);
                print_suggestions(&controller);
            }
            Err(RejectedReason::EmptyInput) => {}
            Err(reason) => eprintln!("{reason}"),
        }
    }

    controller.shutdown();
    Ok(())
}

fn init_logging() {
    let json = std::env::var("NOUR_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nour_chat=info".into()),
        )
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// Print turns after the first `shown`; returns the new count.
fn print_new_turns<T: Transport>(controller: &SessionController<T>, shown: usize) -> usize {
    let history = controller.history();
    for turn in history.iter().skip(shown) {
        println!("{}", terminal::render_turn(turn));
    }
    history.len()
}

fn print_suggestions<T: Transport>(controller: &SessionController<T>) {
    let suggestions = controller.suggestions();
    if !suggestions.is_empty() {
        print!("{}", terminal::render_suggestions(&suggestions));
    }
}
