use std::fmt;

/// Instruction sub-field a mnemonic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Dest,
    Comp,
    Jmp,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Dest => "dest",
            Field::Comp => "comp",
            Field::Jmp => "jmp",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("The input must contain some code")]
    EmptyInput,
    #[error("Invalid Command: {line}")]
    InvalidCommand { line: String },
    #[error("Invalid mnemonic for `{field}`: {mnemonic}")]
    InvalidMnemonic { field: Field, mnemonic: String },
    /// `line` is 1-based.
    #[error("Address out of range at line : {line}\tCommand: {command}")]
    AddressOutOfRange { line: usize, command: String },
    #[error("Cannot set a reserved symbol. {name}")]
    ReservedSymbol { name: String },
    #[error("No free address left for variable `{name}`")]
    SymbolSpaceExhausted { name: String },
}

pub type Result<T> = std::result::Result<T, AsmError>;
