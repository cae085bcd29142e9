use indexmap::IndexMap;
use serde::Serialize;

use crate::config::{ADDRESS_MASK, VARIABLE_BASE};
use crate::error::{AsmError, Result};

/// Built-in names, stored upper-case and matched case-insensitively.
pub const RESERVED: &[(&str, u16)] = &[
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

fn reserved(name: &str) -> Option<u16> {
    RESERVED
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, addr)| addr)
}

/// One user binding, as reported by [`SymbolTable::iter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub address: u16,
}

/// Labels and variables of a single translation job.
///
/// Reserved names are never stored here; they shadow user names on lookup
/// and can be neither defined nor removed.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    user: IndexMap<String, u16>,
    base: u16,
    next_variable: u16,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_variable_base(VARIABLE_BASE)
    }

    pub fn with_variable_base(base: u16) -> Self {
        Self {
            user: IndexMap::new(),
            base,
            next_variable: base,
        }
    }

    pub fn is_reserved(name: &str) -> bool {
        reserved(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<u16> {
        reserved(name).or_else(|| self.user.get(name).copied())
    }

    pub fn define(&mut self, name: &str, address: u16) -> Result<()> {
        if Self::is_reserved(name) {
            return Err(AsmError::ReservedSymbol {
                name: name.to_string(),
            });
        }
        self.user.insert(name.to_string(), address);
        Ok(())
    }

    /// Binds `name` to the next free variable slot and returns it. A name
    /// that is already bound keeps its address and consumes no slot. Slots
    /// end at the top of the 15-bit operand space.
    pub fn allocate_variable(&mut self, name: &str) -> Result<u16> {
        if Self::is_reserved(name) {
            return Err(AsmError::ReservedSymbol {
                name: name.to_string(),
            });
        }
        if let Some(&addr) = self.user.get(name) {
            return Ok(addr);
        }
        let addr = self.next_variable;
        if addr > ADDRESS_MASK {
            return Err(AsmError::SymbolSpaceExhausted {
                name: name.to_string(),
            });
        }
        self.next_variable = addr + 1;
        self.user.insert(name.to_string(), addr);
        Ok(addr)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        if Self::is_reserved(name) {
            return false;
        }
        self.user.shift_remove(name).is_some()
    }

    pub fn count(&self) -> usize {
        self.user.len()
    }

    pub fn clear(&mut self) {
        self.user.clear();
        self.next_variable = self.base;
    }

    /// User bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.user.iter().map(|(name, &address)| Symbol {
            name: name.clone(),
            address,
        })
    }
}
