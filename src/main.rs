use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use dialogflow::{parse, ExecStatus, IntentClassifier, Interpreter, MockClassifier, RemoteClassifier, SessionDriver};

#[derive(Parser)]
#[command(name = "dialogflow")]
#[command(about = "Runs a customer-service dialog script interactively")]
#[command(version)]
struct Cli {
    /// Path to the DSL script to run
    #[arg(long = "script")]
    script: String,

    /// Use the local keyword-based classifier instead of a remote model
    #[arg(long = "mock")]
    mock: bool,

    /// API key for the remote classifier (falls back to OPENAI_API_KEY)
    #[arg(long = "api-key")]
    api_key: Option<String>,

    /// Base URL for the remote classifier (falls back to OPENAI_BASE_URL)
    #[arg(long = "base-url")]
    base_url: Option<String>,

    /// Model name for the remote classifier
    #[arg(long = "model", default_value = "gpt-3.5-turbo")]
    model: String,

    /// Session id to drive in this run
    #[arg(long = "user-id", default_value = "default")]
    user_id: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.script) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: cannot read script file: {}: {}", cli.script, e);
            std::process::exit(1);
        }
    };

    let script = match parse(&source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let classifier = build_classifier(&cli);
    let interpreter = Interpreter::new(script)
        .with_classifier(classifier)
        .with_candidate_intents(default_candidate_intents());
    let driver = SessionDriver::new(interpreter);

    println!("{}", "=".repeat(60));
    println!("dialogflow — scripted customer-service agent");
    println!("{}", "=".repeat(60));
    println!("Type 'quit' or 'exit' to leave.\n");

    let opening = driver.start_conversation(&cli.user_id).await;
    print_result(&opening);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you: ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("goodbye!");
            break;
        }
        if line.is_empty() {
            continue;
        }

        let result = driver.process_input(&cli.user_id, Some(line)).await;
        let stop = result.status == ExecStatus::Error;
        print_result(&result);
        if stop {
            break;
        }
    }
}

/// Builds the remote classifier when credentials are available, degrading
/// to the keyword-based mock with a warning otherwise — mirroring the
/// original system's graceful fallback when the LLM client can't be built.
fn build_classifier(cli: &Cli) -> Arc<dyn IntentClassifier> {
    if cli.mock {
        return Arc::new(MockClassifier::new());
    }

    let api_key = cli.api_key.clone().or_else(|| std::env::var("OPENAI_API_KEY").ok());
    let base_url = cli.base_url.clone().or_else(|| std::env::var("OPENAI_BASE_URL").ok());

    match api_key {
        Some(key) if !key.is_empty() => Arc::new(RemoteClassifier::new(key, cli.model.clone(), base_url)),
        _ => {
            eprintln!("warning: no API key configured, falling back to the mock classifier");
            Arc::new(MockClassifier::new())
        }
    }
}

/// Seeds the classifier with the labels a typical customer-service script
/// branches on, so a remote model has something concrete to choose among
/// instead of guessing at an open-ended label space.
fn default_candidate_intents() -> Vec<String> {
    [
        "return_to_menu",
        "view_order_details",
        "view_logistics",
        "retry_query",
        "retry_request",
        "product_quality_issue",
        "mismatched_description",
        "no_longer_needed",
        "other_reason",
        "check_progress",
        "check_complaint",
        "submit_complaint",
        "submit_suggestion",
        "logistics_query",
        "refund_request",
        "order_query",
        "product_inquiry",
        "complaint_or_suggestion",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn print_result(result: &dialogflow::InterpretResult) {
    for line in result.message.split('\n') {
        if !line.trim().is_empty() {
            println!("agent: {}", line);
        }
    }
    if let ExecStatus::Error = result.status {
        if let Some(err) = &result.error {
            eprintln!("error: {}", err);
        }
    }
    if debug_intent_enabled() {
        eprintln!("[DEBUG] status={:?} next_step={:?} variable={:?}", result.status, result.next_step, result.variable);
    }
}

fn debug_intent_enabled() -> bool {
    std::env::var("DEBUG_INTENT")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true"))
        .unwrap_or(false)
}
