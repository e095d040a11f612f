//! revisit-client - interactive demo client
//!
//! Boots the identification flow against a running revisit-server, then
//! accepts `save <name>`, `forget`, `how`, `protect`, `back`, and `quit`
//! commands on stdin. The console view only observes the session; all state
//! lives in the session context.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use revisit_client::cache::{default_cache_path, DisplayCache};
use revisit_client::gateway::HttpGateway;
use revisit_client::provider::FileIdentityProvider;
use revisit_client::session::{Screen, ScreenView, Session, SessionConfig, View};
use revisit_common::signals::{display_digest, EnvironmentProfile};

/// Command-line arguments for revisit-client
#[derive(Parser, Debug)]
#[command(name = "revisit-client")]
#[command(about = "Visitor re-identification demo client")]
#[command(version)]
struct Args {
    /// Base URL of the revisit-server backend
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:8000",
        env = "REVISIT_BACKEND_URL"
    )]
    backend_url: String,

    /// Path to the provisioned identity token
    #[arg(short, long, default_value = "identity.token", env = "REVISIT_IDENTITY_FILE")]
    identity_file: PathBuf,

    /// Override the display cache location
    #[arg(long, env = "REVISIT_CACHE_FILE")]
    cache_file: Option<PathBuf>,

    /// Simulate an incognito-like session: no local persistence
    #[arg(long)]
    incognito: bool,
}

/// Renders session state to the terminal. Observes only; never mutates.
struct ConsoleView;

impl View for ConsoleView {
    fn screen_changed(&self, view: &ScreenView<'_>) {
        println!();
        match view.screen {
            Screen::Initial => {
                println!("== Who are you? ==");
                println!("No record matched this browser. Type: save <name>");
            }
            Screen::ThankYou => {
                let name = view.display_name.unwrap_or("friend");
                println!("== Thank you, {} ==", name);
                println!("Now open a private window and run this client again.");
            }
            Screen::Recognized => {
                let name = view.display_name.unwrap_or("stranger");
                let matched = view
                    .match_kind
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("== Welcome back, {} (match: {}) ==", name, matched);
                println!("Private mode did not stop identification.");

                if let Some(e) = view.enrichment {
                    let field = |v: &Option<String>| {
                        v.clone().unwrap_or_else(|| "Unknown".to_string())
                    };
                    println!("  IP:       {}", field(&e.ip));
                    println!("  Location: {} / {}", field(&e.city), field(&e.country));
                    println!("  ISP:      {}", field(&e.isp));
                    println!("  Platform: {}", field(&e.platform));
                }

                if let Some(identity) = view.identity {
                    let prefix: String = identity.strong.chars().take(24).collect();
                    println!("  Strong FP: {}...", prefix);
                    println!("  Soft FP:   {}", display_digest(&identity.soft));
                }
            }
            Screen::HowItWorks => {
                println!("== How it works ==");
                println!("A provider-issued strong fingerprint is tried first; a soft");
                println!("signal composed from coarse environment attributes is the");
                println!("fallback. Neither needs cookies. Type: back");
            }
            Screen::Protect => {
                println!("== Protect yourself ==");
                println!("- VPN hides IP and location");
                println!("- Content blockers stop many fingerprinting scripts");
                println!("- Privacy-focused browsers randomize environment attributes");
                println!("Type: back");
            }
        }
    }

    fn status(&self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("[!] {}", message);
        } else {
            println!("[*] {}", message);
        }
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

/// Build the environment profile from what a headless client can observe.
/// Unavailable fields stay empty; composition never fails.
fn environment_profile() -> EnvironmentProfile {
    EnvironmentProfile {
        user_agent: format!("revisit-client/{}", env!("CARGO_PKG_VERSION")),
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        language: std::env::var("LANG").unwrap_or_default(),
        time_zone: std::env::var("TZ").unwrap_or_default(),
        screen: None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting revisit-client v{}", env!("CARGO_PKG_VERSION"));

    let cache = if args.incognito {
        DisplayCache::ephemeral()
    } else {
        let path = args
            .cache_file
            .clone()
            .or_else(default_cache_path)
            .unwrap_or_else(|| PathBuf::from("display_cache.toml"));
        DisplayCache::load(path)
    };

    let gateway = Arc::new(HttpGateway::new(&args.backend_url)?);
    let provider = FileIdentityProvider::new(args.identity_file.clone());
    let view = Arc::new(ConsoleView);

    let config = SessionConfig {
        incognito: args.incognito,
        ..Default::default()
    };

    let mut session = Session::new(gateway, cache, view, config);

    // Boot fully resolves identification before the first screen renders.
    // Provider failures block the flow entirely.
    if let Err(e) = session.boot(&provider, &environment_profile()).await {
        anyhow::bail!("identification flow aborted: {}", e);
    }

    // Command loop. One action in flight at a time, by construction.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest),
            None => (line, ""),
        };

        match command {
            "save" => {
                // Validation failures and declined saves already surfaced a
                // status line; the loop just continues.
                let _ = session.save(rest).await;
            }
            "forget" => {
                let _ = session.forget().await;
            }
            "how" => session.show_how_it_works(),
            "protect" => session.show_protect(),
            "back" => session.back(),
            "quit" | "exit" => break,
            "" => {}
            other => {
                println!("Unknown command: {}. Try: save <name> | forget | how | protect | back | quit", other);
            }
        }
        print_prompt();
    }

    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}
