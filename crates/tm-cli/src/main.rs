//! TabMagic CLI
//!
//! CLI tool for checking rule files, previewing rules against URLs and
//! running an offline sweep over a saved browser state.

mod state;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use tm_rules::parse_rules_with_report;
use tm_runtime::memory::{MemoryPlatform, MemoryStore, PlatformCall};
use tm_runtime::{preview_url, EventRouter};

use state::{read_config, read_state, read_text, write_state, StateDocument};

#[derive(Parser)]
#[command(name = "tm-cli")]
#[command(about = "TabMagic rule checker and offline reconciler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rule file and report dropped lines
    Check {
        /// Rule file (one `pattern;name;icon` rule per line)
        #[arg(short, long)]
        rules: PathBuf,

        /// Also list every accepted rule
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show what a rule file would do to the given URLs
    Preview {
        /// Rule file
        #[arg(short, long)]
        rules: PathBuf,

        /// URLs to test
        #[arg(short, long, required = true)]
        url: Vec<String>,
    },

    /// Reconcile every tab of a saved state document
    Sweep {
        /// State document (`{"storage": {...}, "tabs": [...]}`)
        #[arg(short, long)]
        state: PathBuf,

        /// Runtime config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the updated state here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { rules, verbose } => cmd_check(&rules, verbose),
        Commands::Preview { rules, url } => cmd_preview(&rules, &url),
        Commands::Sweep {
            state,
            config,
            output,
        } => cmd_sweep(&state, config.as_deref(), output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_check(rules_path: &Path, verbose: bool) -> Result<(), String> {
    let text = read_text(rules_path)?;
    let report = parse_rules_with_report(&text);

    println!("Rules file '{}'", rules_path.display());
    println!("  Lines:     {}", text.lines().count());
    println!("  Rules:     {}", report.rules.len());
    println!("  Comments:  {}", report.comment_lines);
    println!("  Blank:     {}", report.blank_lines);
    println!("  Dropped:   {}", report.rejected.len());

    if verbose {
        println!();
        for (i, rule) in report.rules.iter().enumerate() {
            println!(
                "  [{}] {}  name={:?} icon={:?}",
                i,
                rule.pattern_source(),
                rule.name_template(),
                rule.icon_template()
            );
        }
    }

    if report.rejected.is_empty() {
        return Ok(());
    }

    println!();
    for rejected in &report.rejected {
        println!("  line {}: {} -- {}", rejected.line_number, rejected.reason, rejected.text);
    }
    Err(format!("{} rule line(s) dropped", report.rejected.len()))
}

fn cmd_preview(rules_path: &Path, urls: &[String]) -> Result<(), String> {
    let text = read_text(rules_path)?;
    let rules = parse_rules_with_report(&text).rules;

    for url in urls {
        let entry = preview_url(&rules, url);
        match entry.rule_index {
            Some(index) => println!("{}\n  rule [{}]: {}", url, index, entry),
            None => println!("{}\n  {}", url, entry),
        }
    }

    Ok(())
}

fn cmd_sweep(state_path: &Path, config_path: Option<&Path>, output: Option<&Path>) -> Result<(), String> {
    let document = read_state(state_path)?;
    let config = read_config(config_path)?;

    let store = MemoryStore::from_entries(document.storage);
    let platform = MemoryPlatform::with_tabs(document.tabs.clone());
    let router = EventRouter::new(store, platform, config);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    let report = runtime
        .block_on(router.sweep())
        .map_err(|e| format!("Sweep failed: {}", e))?;

    for call in router.platform().calls() {
        match call {
            PlatformCall::SetTitle { tab_id, title } => println!("  tab {}: title -> {:?}", tab_id, title),
            PlatformCall::SetIcon { tab_id, icon_url } => println!("  tab {}: icon  -> {:?}", tab_id, icon_url),
            _ => {}
        }
    }
    for (tab_id, error) in &report.failures {
        println!("  tab {}: failed: {}", tab_id, error);
    }
    println!(
        "Swept {} tab(s): {} changed, {} failed",
        report.tabs,
        report.changed,
        report.failures.len()
    );

    if let Some(output) = output {
        let tabs = document
            .tabs
            .iter()
            .filter_map(|tab| router.platform().tab(tab.id))
            .collect();
        let updated = StateDocument {
            storage: router.store().snapshot(),
            tabs,
        };
        write_state(output, &updated)?;
        println!("Wrote '{}'", output.display());
    }

    Ok(())
}
