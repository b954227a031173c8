//! A console chatbot with a local class-schedule manager.

#[macro_use]
extern crate tracing;

mod commands;

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;

use classmate_core::{ChatClientBuilder, RetryNotice};
use classmate_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use classmate_schedule::ScheduleStore;
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::signal;

const KEY_FILE: &str = "key.env";
const FAREWELL: &str = "Ending the conversation. Goodbye!";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let key_path = Path::new(KEY_FILE);
    if !key_path.is_file() {
        eprintln!("Error: {KEY_FILE} not found");
        eprintln!(
            "Please create {KEY_FILE} with: API_KEY=your_api_key_here"
        );
        return ExitCode::FAILURE;
    }
    if let Err(err) = dotenvy::from_path(key_path) {
        eprintln!("Error: failed to load {KEY_FILE}: {err}");
        return ExitCode::FAILURE;
    }
    let Ok(api_key) = std::env::var("API_KEY") else {
        eprintln!("Error: API_KEY not found in {KEY_FILE}");
        eprintln!(
            "Please check the {KEY_FILE} format: API_KEY=your_actual_api_key"
        );
        return ExitCode::FAILURE;
    };

    let config = GeminiConfigBuilder::with_api_key(api_key).build();
    let provider = GeminiProvider::new(config);
    let mut client = ChatClientBuilder::with_model_provider(provider)
        .on_retry(|notice: &RetryNotice| {
            println!(
                "Temporarily out of quota. Retrying in {:.1}s... \
                 (attempt {}/{})",
                notice.delay.as_secs_f64(),
                notice.attempt,
                notice.max_retries
            );
        })
        .build();

    let store = ScheduleStore::default();

    println!("Chat with Gemini (type 'quit' to exit)");
    println!(
        "Schedule commands: !generate [offset], !analyze, !week [offset]"
    );

    let mut stdin = io::BufReader::new(io::stdin());

    loop {
        print!("{} ", "You:".bright_green());
        std::io::stdout().flush().ok();

        let line = select! {
            line = read_line(&mut stdin) => {
                let Some(line) = line else {
                    break;
                };
                line
            }
            _ = signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        if commands::handle(&store, line) {
            continue;
        }

        let reply = select! {
            reply = client.send(line) => reply,
            _ = signal::ctrl_c() => {
                println!();
                break;
            }
        };
        println!("{} {}", "AI:".bright_cyan(), reply);
    }

    println!("{FAREWELL}");
    ExitCode::SUCCESS
}

async fn read_line(
    stdin: &mut io::BufReader<io::Stdin>,
) -> Option<String> {
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
