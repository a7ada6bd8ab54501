//! Text-mode REPL host for the admissions assistant.
//!
//! Stands in for the website page that embeds the chat widget: it feeds raw
//! user text into the controller, prints presented replies, offers the
//! contact-support affordance when a reply suggests it, and sends the
//! session-end signal on exit.
//!
//! Usage:
//!   cargo run -p app
//!
//!   # One-shot mode (for piping):
//!   echo "what courses do you have" | cargo run -p app
//!
//! Environment:
//!   CHAT_HISTORY_PATH  where the session log is persisted
//!   REPLY_DELAY_MS     presentation delay before each reply (default 1000)

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use assistant_core::{Controller, FileSessionStore, SubmitOutcome, UiEvent};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let history_path = std::env::var("CHAT_HISTORY_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("admissions-chat-history.json"));
    let delay_ms: u64 = std::env::var("REPLY_DELAY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);
    let delay = Duration::from_millis(delay_ms);

    let store = Arc::new(FileSessionStore::new(&history_path));
    let mut controller = Controller::new(store.clone(), delay);
    let mut events = controller.events();
    let mut handoff_offered = false;

    let is_interactive = atty::is(atty::Stream::Stdin);

    if is_interactive {
        eprintln!("=== Admissions Assistant ===");
        eprintln!("History: {}", history_path.display());
        eprintln!("Type /contact to reach support, /reset to start over, /quit to exit\n");
        for message in controller.messages() {
            let who = if message.is_from_user { "you" } else { "assistant" };
            println!("{}: {}", who, message.text);
        }
        println!();
    }

    let stdin = io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input == "/quit" || input == "/exit" {
            break;
        }

        if input == "/reset" {
            controller.end_session();
            controller = Controller::new(store.clone(), delay);
            events = controller.events();
            handoff_offered = false;
            eprintln!("Conversation reset.");
            continue;
        }

        if input == "/contact" {
            // The affordance is only live after a reply that suggested it.
            if !handoff_offered {
                eprintln!("(nothing to hand off yet; ask me something first)");
                continue;
            }
            controller.request_human_handoff();
            if let Ok(UiEvent::NavigateToSupport) = events.recv_timeout(Duration::from_secs(1)) {
                println!("Routing you to our support team. Goodbye!");
            }
            return Ok(());
        }

        match controller.submit(input) {
            SubmitOutcome::Accepted => {}
            SubmitOutcome::Busy => {
                eprintln!("(still replying, one moment)");
                continue;
            }
            SubmitOutcome::Ignored => continue,
        }

        if is_interactive {
            eprint!("typing...");
        }

        // Replies land after the presentation delay.
        let event = events.recv_timeout(delay + Duration::from_secs(5));

        if is_interactive {
            eprint!("\r         \r");
        }

        match event {
            Ok(UiEvent::ReplyPresented {
                message,
                suggests_handoff,
            }) => {
                println!("assistant: {}", message.text);
                handoff_offered = suggests_handoff;
                if suggests_handoff && is_interactive {
                    println!("[type /contact to reach our support team]");
                }
            }
            Ok(UiEvent::NavigateToSupport) => break,
            Err(e) => {
                eprintln!("no reply: {}", e);
            }
        }

        if is_interactive {
            println!();
        }
    }

    // Page unload: clear the persisted session.
    controller.end_session();

    if is_interactive {
        eprintln!("Goodbye!");
    }
    Ok(())
}
