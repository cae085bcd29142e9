use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hack_asm::{Assembler, AssemblerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble Hack .asm sources into .hack text")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the input file
    Assemble {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output path (default: <input stem>.hack next to the input)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Assembler settings as JSON
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the user symbol table as JSON
    Symbols {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<AssemblerConfig> {
    let Some(path) = path else {
        return Ok(AssemblerConfig::default());
    };
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing config {}", path.display()))
}

fn load_assembler(input: &Path, cfg: AssemblerConfig) -> Result<Assembler> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let parser = hack_asm::Parser::new(&text)?;
    Ok(Assembler::with_config(parser, cfg))
}

fn assemble(input: &Path, out: Option<PathBuf>, cfg: AssemblerConfig) -> Result<()> {
    anyhow::ensure!(
        input.extension().and_then(|ext| ext.to_str()) == Some("asm"),
        "The file name must end with `.asm`"
    );
    let out = out.unwrap_or_else(|| input.with_extension("hack"));

    let words = load_assembler(input, cfg)?.assemble()?;

    println!("Writing to {}", out.display());
    let body: String = words.iter().map(|w| format!("{w}\n")).collect();
    std::fs::write(&out, body).with_context(|| format!("writing {}", out.display()))?;
    println!("Done");
    Ok(())
}

fn symbols(input: &Path, cfg: AssemblerConfig) -> Result<()> {
    let mut asm = load_assembler(input, cfg)?;
    asm.assemble_words()?;
    let table: Vec<_> = asm.symbols().iter().collect();
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble { input, out, config } => {
            let cfg = load_config(config.as_deref())?;
            assemble(&input, out, cfg)
        }
        Command::Symbols { input, config } => {
            let cfg = load_config(config.as_deref())?;
            symbols(&input, cfg)
        }
    }
}
