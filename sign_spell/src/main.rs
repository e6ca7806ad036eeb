//! sign_spell — interactive entry point.

use std::io::{self, Write};

use sign_spell::app::run;
use sign_spell::config::AppConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Sign Spell — Finger Pattern Speller                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = if let Some(pos) = args.iter().position(|a| a == "--config") {
        let Some(path) = args.get(pos + 1) else {
            eprintln!("Error: --config needs a path");
            std::process::exit(2);
        };
        match AppConfig::load(path) {
            Ok(cfg) => {
                println!("  Config: {}\n", path);
                cfg
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    } else if args.iter().any(|a| a == "--quick") {
        println!("  Quick-start: standard patterns, 2.5 s / 1.5 s holds, English\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let defaults = AppConfig::default();

    let first_hold_secs  = read_secs("  First-symbol hold in seconds (default 2.5): ", defaults.first_hold_secs);
    let steady_hold_secs = read_secs("  Gap between later symbols (default 1.5): ",    defaults.steady_hold_secs);

    let language = {
        let l = read_line("  Speech language code (default en): ");
        let l = l.trim();
        if l.is_empty() { defaults.language.clone() } else { l.to_string() }
    };

    AppConfig { first_hold_secs, steady_hold_secs, language, ..defaults }
}

fn read_secs(prompt: &str, default: f64) -> f64 {
    loop {
        let line = read_line(prompt);
        let line = line.trim();
        if line.is_empty() { return default; }
        match line.parse::<f64>() {
            Ok(s) if s.is_finite() && s > 0.0 && s <= 30.0 => return s,
            _ => println!("    ⚠  0–30 seconds only."),
        }
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
