pub mod assembler;
pub mod coder;
pub mod config;
pub mod error;
pub mod parser;
pub mod symbol;

pub use assembler::Assembler;
pub use config::AssemblerConfig;
pub use error::{AsmError, Field, Result};
pub use parser::{classify, normalize, Command, Parser, SourceLine};
pub use symbol::SymbolTable;

/// Assembles `source` with the default configuration.
pub fn assemble(source: &str) -> Result<Vec<String>> {
    assemble_with(source, AssemblerConfig::default())
}

pub fn assemble_with(source: &str, cfg: AssemblerConfig) -> Result<Vec<String>> {
    Assembler::with_config(Parser::new(source)?, cfg).assemble()
}
