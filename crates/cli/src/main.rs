use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use api_shared::{ConditionRes, DraftRes};
use clap::{Args, Parser, Subcommand};
use mdm_core::{registry, EngineError, InputMode, NoteEngine};
use preferences::Preferences;

#[derive(Parser)]
#[command(name = "mdm")]
#[command(about = "Draft podiatric assessment and plan notes")]
struct Cli {
    /// Preferences file (YAML or JSON)
    #[arg(long, global = true, env = "MDM_PREFS")]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TextInput {
    /// Note text
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,
    /// Read the note from a file, or `-` for stdin
    #[arg(long)]
    input: Option<PathBuf>,
}

impl TextInput {
    fn read(self) -> std::io::Result<String> {
        match (self.text, self.input) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) if path.as_os_str() == "-" => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            (None, Some(path)) => std::fs::read_to_string(path),
            (None, None) => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a note from free text
    Draft {
        #[command(flatten)]
        input: TextInput,
        /// Print the draft, its condition and facts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draft a note from a short command, for example `.pf left chronic +escalate`
    Command {
        /// Command alias followed by modifiers
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
        /// Print the draft, its condition and facts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the facts extracted from free text as JSON
    Facts {
        #[command(flatten)]
        input: TextInput,
    },
    /// List supported conditions
    Conditions,
    /// List command aliases starting with a prefix
    Suggest {
        /// Alias prefix, including the leading `.`
        prefix: String,
    },
    /// Print the effective preferences as YAML
    Prefs,
}

fn print_draft(
    engine: &NoteEngine,
    input: &str,
    mode: InputMode,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match engine.draft(input, mode) {
        Ok(draft) if json => {
            println!("{}", serde_json::to_string_pretty(&DraftRes::from_draft(draft))?);
        }
        Ok(draft) => {
            eprintln!(
                "{} ({})",
                draft.condition.name, draft.condition.billing_code
            );
            println!("{}", draft.document);
        }
        Err(EngineError::UnknownCommand { token, suggestions }) => {
            eprintln!("Unknown command: {token}");
            for s in suggestions {
                eprintln!("  {}  {} ({})", s.alias, s.name, s.billing_code);
            }
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Preferences::load_or_default(cli.prefs.as_deref());
    let engine = NoteEngine::new(Arc::new(config));

    match cli.command {
        Commands::Draft { input, json } => {
            let text = input.read()?;
            print_draft(&engine, &text, InputMode::FreeText, json)?;
        }
        Commands::Command { line, json } => {
            print_draft(&engine, &line.join(" "), InputMode::Command, json)?;
        }
        Commands::Facts { input } => {
            let text = input.read()?;
            let facts = mdm_core::extract(&text);
            println!("{}", serde_json::to_string_pretty(&facts)?);
        }
        Commands::Conditions => {
            for condition in registry::registry() {
                let row = ConditionRes::from(condition);
                println!(
                    "{:<7} {:<28} {:<8} {}",
                    row.alias, row.name, row.billing_code, row.id
                );
            }
        }
        Commands::Suggest { prefix } => {
            let matches = registry::suggest(&prefix);
            if matches.is_empty() {
                println!("No matching commands.");
            }
            for condition in matches {
                println!("{}  {}", condition.alias, condition.name);
            }
        }
        Commands::Prefs => {
            print!("{}", Preferences::render(engine.config())?);
        }
    }

    Ok(())
}
