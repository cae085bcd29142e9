use tracing::{debug, trace, warn};

use crate::coder::{encode_compute, translate_comp, translate_dest, translate_jmp};
use crate::config::{AssemblerConfig, ADDRESS_MASK};
use crate::error::{AsmError, Result};
use crate::parser::{classify, Command, Parser, SourceLine};
use crate::symbol::SymbolTable;

/// Two-pass translator. Owns the symbol table for the whole job.
#[derive(Debug, Clone)]
pub struct Assembler {
    parser: Parser,
    table: SymbolTable,
    cfg: AssemblerConfig,
}

impl Assembler {
    pub fn new(parser: Parser) -> Self {
        Self::with_config(parser, AssemblerConfig::default())
    }

    pub fn with_config(parser: Parser, cfg: AssemblerConfig) -> Self {
        Self {
            parser,
            table: SymbolTable::with_variable_base(cfg.variable_base),
            cfg,
        }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.cfg
    }

    /// Symbols bound by the most recent run.
    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }

    /// Translates the program into 16-character binary strings.
    pub fn assemble(&mut self) -> Result<Vec<String>> {
        Ok(self
            .assemble_words()?
            .into_iter()
            .map(|word| format!("{word:016b}"))
            .collect())
    }

    pub fn assemble_words(&mut self) -> Result<Vec<u16>> {
        let Self { parser, table, cfg } = self;
        table.clear();
        parser.reset();

        bind_labels(parser, table)?;
        parser.reset();

        let words = emit(parser, table, cfg);
        parser.reset();
        words
    }
}

/// Pass 1: bind every label to the code-stream index of the next word.
fn bind_labels(parser: &mut Parser, table: &mut SymbolTable) -> Result<()> {
    let mut pc: usize = 0;
    while let Some(line) = parser.current_line() {
        let command = classify(&line.text)?;
        if let Command::Label { symbol } = &command {
            // Reserved names fall through to `define`, which rejects them.
            if SymbolTable::is_reserved(symbol) || table.lookup(symbol).is_none() {
                let addr = label_address(symbol, pc)?;
                trace!(label = %symbol, addr, "bind label");
                table.define(symbol, addr)?;
            } else {
                warn!(
                    label = %symbol,
                    line = line.line_number(),
                    "label re-declared, keeping first binding"
                );
            }
        }
        pc += usize::from(command.width());
        parser.advance();
    }
    debug!(labels = table.count(), words = pc, "label pass done");
    Ok(())
}

/// A label must point inside the 15-bit operand space.
fn label_address(symbol: &str, pc: usize) -> Result<u16> {
    u16::try_from(pc)
        .ok()
        .filter(|&addr| addr <= ADDRESS_MASK)
        .ok_or_else(|| AsmError::SymbolSpaceExhausted {
            name: symbol.to_string(),
        })
}

/// Pass 2: encode address and compute commands in source order.
fn emit(parser: &mut Parser, table: &mut SymbolTable, cfg: &AssemblerConfig) -> Result<Vec<u16>> {
    let mut words = Vec::with_capacity(parser.len());
    while let Some(line) = parser.current_line() {
        match classify(&line.text)? {
            Command::Compute { dest, comp, jump } => {
                let word = encode_compute(
                    translate_dest(&dest)?,
                    translate_comp(&comp)?,
                    translate_jmp(&jump)?,
                );
                trace!(line = line.line_number(), bits = %format!("{word:016b}"), "compute");
                words.push(word);
            }
            Command::Address { symbol } => {
                if let Some(word) = resolve_address(line, &symbol, table, cfg)? {
                    trace!(line = line.line_number(), bits = %format!("{word:016b}"), "address");
                    words.push(word);
                }
            }
            Command::Label { .. } => {}
        }
        parser.advance();
    }
    debug!(words = words.len(), variables = table.count(), "emit pass done");
    Ok(words)
}

fn resolve_address(
    line: &SourceLine,
    symbol: &str,
    table: &mut SymbolTable,
    cfg: &AssemblerConfig,
) -> Result<Option<u16>> {
    if symbol.bytes().all(|b| b.is_ascii_digit()) {
        let out_of_range = || AsmError::AddressOutOfRange {
            line: line.line_number(),
            command: line.text.clone(),
        };
        // Digit strings too long for u16 are out of range as well.
        let value: u16 = symbol.parse().map_err(|_| out_of_range())?;
        if value > cfg.max_address || value > ADDRESS_MASK {
            return Err(out_of_range());
        }
        return Ok(Some(value));
    }

    if let Some(addr) = table.lookup(symbol) {
        return Ok(Some(addr));
    }

    let addr = table.allocate_variable(symbol)?;
    trace!(variable = %symbol, addr, "allocate variable");
    if cfg.skip_first_variable_use {
        return Ok(None);
    }
    Ok(Some(addr))
}
