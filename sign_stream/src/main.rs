//! Replay a frame trace through a recognition session.
//!
//! ```text
//! sign_replay [TRACE] [--first SECS] [--steady SECS] [--table]
//! ```
//!
//! Reads the trace from `TRACE`, or stdin when omitted.

use std::io::{self, Read};
use std::time::Duration;

use sign_stream::{parse_trace, replay, HoldTiming, PatternTable, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let table = PatternTable::standard();

    if args.iter().any(|a| a == "--table") {
        print_table(&table);
        return;
    }

    let mut timing = HoldTiming::default();
    let mut path: Option<&str> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--first"  => { timing.first  = seconds_arg(&args, i); i += 1; }
            "--steady" => { timing.steady = seconds_arg(&args, i); i += 1; }
            other      => path = Some(other),
        }
        i += 1;
    }

    let text = match read_source(path) {
        Ok(t)  => t,
        Err(e) => {
            tracing::error!("cannot read trace: {}", e);
            std::process::exit(1);
        }
    };
    let events = match parse_trace(&text) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             Finger-Pattern Trace Replay              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {} events   first hold {:.2}s   steady gate {:.2}s",
        events.len(), timing.first.as_secs_f32(), timing.steady.as_secs_f32());
    println!();

    let mut session = Session::new(table, timing);
    let commits = replay(&mut session, &events);

    for c in &commits {
        println!("  {:>8.2}s  {}", c.at.as_secs_f32(), c.symbol);
    }
    if commits.is_empty() {
        println!("  (no commits)");
    }
    println!();
    println!("  Sentence : \"{}\"", session.transcript().sentence());
    match session.transcript().speakable_text() {
        Some(text) => println!("  Speakable: \"{}\"", text),
        None       => println!("  Speakable: (nothing to speak)"),
    }
    println!();
}

fn seconds_arg(args: &[String], i: usize) -> Duration {
    let secs = args.get(i + 1)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s >= 0.0);
    match secs {
        Some(s) => Duration::from_secs_f64(s),
        None => {
            tracing::error!("{} needs a non-negative number of seconds", args[i]);
            std::process::exit(2);
        }
    }
}

fn read_source(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_table(table: &PatternTable) {
    println!();
    println!("  ┌─ Pattern table ({} entries) ─", table.len());
    for (key, symbol) in table.sorted_entries() {
        println!("  │  {:<12} {}", key, symbol);
    }
    println!("  └─");
    println!();
}
