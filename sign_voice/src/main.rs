//! Speak text through the configured synthesizer and report the outcome.
//!
//! ```text
//! sign_say [--lang CODE] [--program NAME] WORDS...
//! ```

use std::time::Duration;

use sign_voice::{open_speaker, SpeechOutcome, SpeechWorker, DEFAULT_ARGS, DEFAULT_PROGRAM};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut language = "en".to_string();
    let mut program  = DEFAULT_PROGRAM.to_string();
    let mut words    = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" | "--program" if i + 1 < args.len() => {
                if args[i] == "--lang" { language = args[i + 1].clone(); }
                else                   { program  = args[i + 1].clone(); }
                i += 1;
            }
            w => words.push(w.to_string()),
        }
        i += 1;
    }

    let text = words.join(" ");
    let template: Vec<String> = DEFAULT_ARGS.iter().map(|s| s.to_string()).collect();
    let worker = SpeechWorker::spawn(open_speaker(&program, &template));

    if let Err(e) = worker.speak(&text, &language) {
        println!("  ⚠  {}", e);
        std::process::exit(1);
    }

    match worker.next_outcome(Duration::from_secs(120)) {
        Some(SpeechOutcome::Spoken { text }) => println!("  ✓  Spoke \"{}\"", text),
        Some(SpeechOutcome::Failed { error, .. }) => {
            println!("  ⚠  {}", error);
            std::process::exit(1);
        }
        None => {
            println!("  ⚠  speech timed out");
            std::process::exit(1);
        }
    }
    worker.quit();
}
