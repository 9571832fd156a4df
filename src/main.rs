//! CLI entry point for view-keys
//!
//! Provides command-line tools for looking up key codes, checking keys
//! files for overlapping shortcuts, and simulating key events.

use clap::{Parser, Subcommand};
use colored::*;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use view_keys::config::KeysFile;
use view_keys::core::{keycode, parser::parse_combo, KeyCode, KeyEvent};
use view_keys::engine::{handler, EventTarget, Handler, KeyBindingEngine};

#[derive(Parser)]
#[command(name = "view-keys")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print debug logs (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key code for each key name
    Code {
        /// Key names (e.g. "s", "enter", "f5")
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print the key name for each key code
    Name {
        #[arg(required = true)]
        codes: Vec<KeyCode>,
    },

    /// List all shortcuts in a keys file
    List {
        /// Path to keys file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check a keys file for overlapping shortcuts
    Check {
        /// Path to keys file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Fire a combo at a view bound from a keys file
    Simulate {
        /// Path to keys file
        #[arg(short, long)]
        file: PathBuf,

        /// Combo to press (e.g. "ctrl+s")
        combo: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Code { names } => print_codes(&names),
        Commands::Name { codes } => print_names(&codes),
        Commands::List { file } => list_keys(&file)?,
        Commands::Check { file } => check_overlaps(&file)?,
        Commands::Simulate { file, combo } => simulate(&file, &combo)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("view_keys=debug")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expand tilde and load a keys file
fn load_keys_file(file_path: &Path) -> anyhow::Result<(PathBuf, KeysFile)> {
    let expanded_path = shellexpand::tilde(
        file_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    let path = PathBuf::from(expanded_path.as_ref());

    let file = KeysFile::load(&path)?;
    Ok((path, file))
}

fn print_codes(names: &[String]) {
    for name in names {
        match keycode::code_of(name) {
            Some(code) => println!("{} → {}", name.cyan().bold(), code),
            None => println!("{} → {}", name.cyan().bold(), "unknown key".red()),
        }
    }
}

fn print_names(codes: &[KeyCode]) {
    for code in codes {
        let name = keycode::name_of(*code);
        if name.is_empty() {
            println!("{} → {}", code, "no name".red());
        } else {
            println!("{} → {}", code, name.cyan().bold());
        }
    }
}

/// List every shortcut in the keys file
fn list_keys(file_path: &Path) -> anyhow::Result<()> {
    let (path, file) = load_keys_file(file_path)?;

    println!("{}", format!("Shortcuts from: {}\n", path.display()).bold());
    println!(
        "  {} {}   {} {}\n",
        "trigger:".dimmed(),
        file.trigger,
        "scoped:".dimmed(),
        file.scoped
    );

    let mut total = 0;
    for entry in &file.keys {
        for combo in &entry.combos {
            let code = keycode::code_of(&combo.key).unwrap_or_default();
            println!(
                "{} {} → {}",
                format!("{}", combo).cyan().bold(),
                format!("({})", code).dimmed(),
                entry.method.green()
            );
            total += 1;
        }
    }

    println!("\n{} Total: {} shortcuts", "✓".green(), total);

    Ok(())
}

/// Check the keys file for shortcuts that fire together
fn check_overlaps(file_path: &Path) -> anyhow::Result<()> {
    let (path, file) = load_keys_file(file_path)?;

    println!("{} Parsing keys file: {}", "→".cyan(), path.display());
    println!("{} Found {} entries\n", "✓".green(), file.keys.len());

    let overlaps = file.overlaps();

    if overlaps.is_empty() {
        println!("{} {}", "✓".green().bold(), "No overlapping shortcuts!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} overlap{}:\n",
        "✗".red().bold(),
        overlaps.len(),
        if overlaps.len() == 1 { "" } else { "s" }
    );

    for (i, overlap) in overlaps.iter().enumerate() {
        println!(
            "{} {}",
            format!("Overlap {}", i + 1).yellow().bold(),
            format!("{}", overlap.combo).cyan()
        );

        for (idx, method) in overlap.handlers.iter().enumerate() {
            println!("  {} {}", format!("{}.", idx + 1).dimmed(), method.magenta());
        }
        println!();
    }

    println!("{}", "⚠ Every handler above runs on the same key press!".yellow());
    std::process::exit(1);
}

/// Bind the keys file to a throwaway view and press `combo` on it
fn simulate(file_path: &Path, combo: &str) -> anyhow::Result<()> {
    let (_, file) = load_keys_file(file_path)?;

    let combo = parse_combo(combo)?;
    let event = KeyEvent::from_combo(&combo)
        .ok_or_else(|| anyhow::anyhow!("Unknown key '{}'", combo.key))?;

    let fired = Rc::new(Cell::new(0usize));
    let methods: HashMap<String, Handler> = file
        .keys
        .iter()
        .map(|entry| {
            let fired = Rc::clone(&fired);
            let method = entry.method.clone();
            let h = handler(move |_event, key| {
                fired.set(fired.get() + 1);
                println!("  {} {} ({})", "→".green(), method.green().bold(), key);
            });
            (entry.method.clone(), h)
        })
        .collect();

    let element = Rc::new(EventTarget::new());
    let target = if file.scoped {
        Rc::clone(&element)
    } else {
        EventTarget::document()
    };

    let engine = KeyBindingEngine::with_config(element, file.engine_config())
        .with_lookup(move |name| methods.get(name).cloned())
        .with_keys(file.binding_spec());
    engine.delegate(None)?;

    println!(
        "{} Pressing {} (code {}) on {} via {}",
        "→".cyan(),
        format!("{}", combo).cyan().bold(),
        event.key_code,
        if file.scoped { "view element" } else { "document" },
        file.trigger
    );

    target.emit(file.trigger, &event);
    engine.undelegate();

    match fired.get() {
        0 => println!("{}", "No shortcut fired".yellow()),
        n => println!("\n{} {} handler{} fired", "✓".green(), n, if n == 1 { "" } else { "s" }),
    }

    Ok(())
}
