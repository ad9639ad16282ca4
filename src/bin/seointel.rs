use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use seointel::render;
use seointel::{AppPhase, GeminiClient, Session};
use seointel::gemini::{DEFAULT_API_BASE, DEFAULT_AUDIT_MODEL, DEFAULT_DISCOVERY_MODEL};

#[derive(Parser, Debug)]
#[command(
    name = "seointel",
    about = "Four-step competitor SEO audit driven by the Gemini API"
)]
struct SeointelCli {
    /// Gemini API key used for both analysis calls
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: String,

    /// Model used for competitor discovery
    #[arg(long, env = "SEOINTEL_DISCOVERY_MODEL", default_value = DEFAULT_DISCOVERY_MODEL)]
    discovery_model: String,

    /// Model used for the deep audit
    #[arg(long, env = "SEOINTEL_AUDIT_MODEL", default_value = DEFAULT_AUDIT_MODEL)]
    audit_model: String,

    /// Generative Language API base URL
    #[arg(long, env = "SEOINTEL_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SEOINTEL_TIMEOUT_SECS", default_value_t = 90)]
    timeout_secs: u64,

    /// Brand URL to audit, skipping the interactive prompt
    #[arg(long)]
    brand_url: Option<String>,
}

fn main() -> Result<()> {
    let cli = SeointelCli::parse();
    let client = GeminiClient::new(
        &cli.api_key,
        cli.api_base.clone(),
        cli.discovery_model.clone(),
        cli.audit_model.clone(),
        Duration::from_secs(cli.timeout_secs),
    )?;
    let mut session = Session::new(client);

    println!("SEOINTEL — automate competitor intelligence");
    println!("Enter your brand URL to map your organic competitive landscape.\n");

    if let Some(brand_url) = &cli.brand_url {
        run_discovery(&mut session, brand_url);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        show_banner(&mut session);
        prompt(session.state().phase())?;
        let line = match lines.next() {
            Some(line) => line.context("failed to read stdin")?,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" {
            break;
        }
        if input == "reset" {
            session.reset();
            continue;
        }
        match session.state().phase() {
            AppPhase::Input => run_discovery(&mut session, input),
            AppPhase::CompetitorSelection => run_selection_command(&mut session, input),
            // Loading never yields the prompt; any other Dashboard input is ignored.
            AppPhase::AnalysisLoading | AppPhase::Dashboard => {}
        }
    }
    Ok(())
}

fn prompt(phase: AppPhase) -> Result<()> {
    match phase {
        AppPhase::Input => print!("brand url> "),
        AppPhase::CompetitorSelection => print!("add <url> | rm <url> | start | reset | quit> "),
        // Calls block, so the loading phase never reaches the prompt.
        AppPhase::AnalysisLoading | AppPhase::Dashboard => print!("reset | quit> "),
    }
    io::stdout().flush().context("failed to flush stdout")
}

fn show_banner<P: seointel::AnalysisProvider>(session: &mut Session<P>) {
    if let Some(error) = session.state().error() {
        eprintln!("[error] {error}");
        session.dismiss_error();
    }
}

fn run_discovery<P: seointel::AnalysisProvider>(session: &mut Session<P>, brand_url: &str) {
    println!("Scanning for organic competitors...");
    if let Err(err) = session.submit_brand(brand_url) {
        eprintln!("[error] {err}");
        return;
    }
    if session.state().phase() == AppPhase::CompetitorSelection {
        println!(
            "\nConfirm competitors for {} — add up to {} more or refine the list:",
            session.state().brand_url(),
            session.state().open_slots()
        );
        print!("{}", render::competitor_list(session.state().competitors()));
    }
}

fn run_selection_command<P: seointel::AnalysisProvider>(session: &mut Session<P>, input: &str) {
    if let Some(url) = input.strip_prefix("add ") {
        session.add_competitor(url.trim());
        print!("{}", render::competitor_list(session.state().competitors()));
    } else if let Some(url) = input.strip_prefix("rm ") {
        session.remove_competitor(url.trim());
        print!("{}", render::competitor_list(session.state().competitors()));
    } else if input == "start" {
        println!("Deep crawling sites... simulating Market Alignment and Authority metrics.");
        if let Err(err) = session.start_analysis() {
            eprintln!("[error] {err}");
            return;
        }
        if let Some(results) = session.state().results() {
            println!();
            print!("{}", render::dashboard(results, session.state().brand_url()));
        }
    } else {
        eprintln!("[error] unknown command: {input}");
    }
}
