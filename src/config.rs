use serde::{Deserialize, Serialize};

/// Highest literal accepted by an address command (the keyboard register).
pub const MAX_ADDRESS: u16 = 24576;
/// Operands live in the low 15 bits; bit 15 marks a compute word.
pub const ADDRESS_MASK: u16 = 0x7FFF;
/// First RAM word handed out to user variables.
pub const VARIABLE_BASE: u16 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    pub max_address: u16,
    pub variable_base: u16,
    /// Reproduce the legacy behaviour where the first reference to a new
    /// variable allocates it but emits no word.
    pub skip_first_variable_use: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_address: MAX_ADDRESS,
            variable_base: VARIABLE_BASE,
            skip_first_variable_use: false,
        }
    }
}
