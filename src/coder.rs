use std::fmt;

use bitflags::bitflags;

use crate::error::{AsmError, Field, Result};

/// A fixed-width instruction bit field.
///
/// `Display` renders the zero-padded binary digits, e.g. `011` for the
/// `MD` destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    pub bits: u8,
    pub width: u8,
}

impl Code {
    pub const fn new(bits: u8, width: u8) -> Self {
        Self { bits, width }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.bits, width = self.width as usize)
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dest: u8 {
const M = 1 << 0; // d3
const D = 1 << 1; // d2
const A = 1 << 2; // d1
}
}

impl Dest {
    /// Parses a register subset written in any order. Each register may
    /// appear at most once; the empty token is the "discard" destination.
    pub fn parse(token: &str) -> Option<Dest> {
        let mut dest = Dest::empty();
        for c in token.chars() {
            let reg = match c.to_ascii_uppercase() {
                'A' => Dest::A,
                'D' => Dest::D,
                'M' => Dest::M,
                _ => return None,
            };
            if dest.contains(reg) {
                return None;
            }
            dest |= reg;
        }
        Some(dest)
    }

    pub fn code(self) -> Code {
        Code::new(self.bits(), 3)
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Jump: u8 {
const GT = 1 << 0; // j3
const EQ = 1 << 1; // j2
const LT = 1 << 2; // j1
}
}

impl Jump {
    pub fn code(self) -> Code {
        Code::new(self.bits(), 3)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DestDesc {
    pub mnemonic: &'static str,
    pub dest: Dest,
}

#[derive(Debug, Clone, Copy)]
pub struct CompDesc {
    pub mnemonic: &'static str,
    /// `a c1 c2 c3 c4 c5 c6`
    pub bits: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct JumpDesc {
    pub mnemonic: &'static str,
    pub jump: Jump,
}

/// Canonical spelling of every destination subset.
pub const DEST_TABLE: &[DestDesc] = &[
    DestDesc { mnemonic: "", dest: Dest::empty() },
    DestDesc { mnemonic: "M", dest: Dest::M },
    DestDesc { mnemonic: "D", dest: Dest::D },
    DestDesc { mnemonic: "MD", dest: Dest::M.union(Dest::D) },
    DestDesc { mnemonic: "A", dest: Dest::A },
    DestDesc { mnemonic: "AM", dest: Dest::A.union(Dest::M) },
    DestDesc { mnemonic: "AD", dest: Dest::A.union(Dest::D) },
    DestDesc { mnemonic: "AMD", dest: Dest::all() },
];

pub const COMP_TABLE: &[CompDesc] = &[
    CompDesc { mnemonic: "0", bits: 0b0101010 },
    CompDesc { mnemonic: "1", bits: 0b0111111 },
    CompDesc { mnemonic: "-1", bits: 0b0111010 },
    CompDesc { mnemonic: "D", bits: 0b0001100 },
    CompDesc { mnemonic: "A", bits: 0b0110000 },
    CompDesc { mnemonic: "M", bits: 0b1110000 },
    CompDesc { mnemonic: "!D", bits: 0b0001101 },
    CompDesc { mnemonic: "!A", bits: 0b0110001 },
    CompDesc { mnemonic: "!M", bits: 0b1110001 },
    CompDesc { mnemonic: "-D", bits: 0b0001111 },
    CompDesc { mnemonic: "-A", bits: 0b0110011 },
    CompDesc { mnemonic: "-M", bits: 0b1110011 },
    CompDesc { mnemonic: "D+1", bits: 0b0011111 },
    CompDesc { mnemonic: "A+1", bits: 0b0110111 },
    CompDesc { mnemonic: "M+1", bits: 0b1110111 },
    CompDesc { mnemonic: "D-1", bits: 0b0001110 },
    CompDesc { mnemonic: "A-1", bits: 0b0110010 },
    CompDesc { mnemonic: "M-1", bits: 0b1110010 },
    CompDesc { mnemonic: "D+A", bits: 0b0000010 },
    CompDesc { mnemonic: "A+D", bits: 0b0000010 },
    CompDesc { mnemonic: "D+M", bits: 0b1000010 },
    CompDesc { mnemonic: "M+D", bits: 0b1000010 },
    CompDesc { mnemonic: "D-A", bits: 0b0010011 },
    CompDesc { mnemonic: "D-M", bits: 0b1010011 },
    CompDesc { mnemonic: "A-D", bits: 0b0000111 },
    CompDesc { mnemonic: "M-D", bits: 0b1000111 },
    CompDesc { mnemonic: "D&A", bits: 0b0000000 },
    CompDesc { mnemonic: "A&D", bits: 0b0000000 },
    CompDesc { mnemonic: "D&M", bits: 0b1000000 },
    CompDesc { mnemonic: "M&D", bits: 0b1000000 },
    CompDesc { mnemonic: "D|A", bits: 0b0010101 },
    CompDesc { mnemonic: "A|D", bits: 0b0010101 },
    CompDesc { mnemonic: "D|M", bits: 0b1010101 },
    CompDesc { mnemonic: "M|D", bits: 0b1010101 },
];

pub const JUMP_TABLE: &[JumpDesc] = &[
    JumpDesc { mnemonic: "", jump: Jump::empty() },
    JumpDesc { mnemonic: "JGT", jump: Jump::GT },
    JumpDesc { mnemonic: "JEQ", jump: Jump::EQ },
    JumpDesc { mnemonic: "JGE", jump: Jump::EQ.union(Jump::GT) },
    JumpDesc { mnemonic: "JLT", jump: Jump::LT },
    JumpDesc { mnemonic: "JNE", jump: Jump::LT.union(Jump::GT) },
    JumpDesc { mnemonic: "JLE", jump: Jump::LT.union(Jump::EQ) },
    JumpDesc { mnemonic: "JMP", jump: Jump::all() },
];

fn invalid(field: Field, mnemonic: &str) -> AsmError {
    AsmError::InvalidMnemonic {
        field,
        mnemonic: mnemonic.to_string(),
    }
}

pub fn translate_dest(mnemonic: &str) -> Result<Code> {
    Dest::parse(mnemonic)
        .map(Dest::code)
        .ok_or_else(|| invalid(Field::Dest, mnemonic))
}

pub fn translate_comp(mnemonic: &str) -> Result<Code> {
    let key = mnemonic.to_ascii_uppercase();
    COMP_TABLE
        .iter()
        .find(|desc| desc.mnemonic == key)
        .map(|desc| Code::new(desc.bits, 7))
        .ok_or_else(|| invalid(Field::Comp, mnemonic))
}

pub fn translate_jmp(mnemonic: &str) -> Result<Code> {
    let key = mnemonic.to_ascii_uppercase();
    JUMP_TABLE
        .iter()
        .find(|desc| desc.mnemonic == key)
        .map(|desc| desc.jump.code())
        .ok_or_else(|| invalid(Field::Jmp, mnemonic))
}

/// Packs a compute instruction: `111 a c1..c6 d1 d2 d3 j1 j2 j3`.
pub fn encode_compute(dest: Code, comp: Code, jump: Code) -> u16 {
    (0b111 << 13) | ((comp.bits as u16) << 6) | ((dest.bits as u16) << 3) | jump.bits as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_widths_and_distinct_codes() {
        let dests: HashSet<String> = DEST_TABLE.iter().map(|d| d.dest.code().to_string()).collect();
        assert_eq!(dests.len(), 8);
        assert!(dests.iter().all(|c| c.len() == 3));

        let comps: HashSet<String> =
            COMP_TABLE.iter().map(|d| Code::new(d.bits, 7).to_string()).collect();
        assert_eq!(comps.len(), 28);
        assert!(comps.iter().all(|c| c.len() == 7));

        let jumps: HashSet<String> = JUMP_TABLE.iter().map(|d| d.jump.code().to_string()).collect();
        assert_eq!(jumps.len(), 8);
        assert!(jumps.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn canonical_dest_spellings_parse_to_their_entry() {
        for desc in DEST_TABLE {
            assert_eq!(Dest::parse(desc.mnemonic), Some(desc.dest), "{}", desc.mnemonic);
        }
    }

    #[test]
    fn compute_word_layout() {
        let word = encode_compute(Dest::M.code(), Code::new(0b0001100, 7), Jump::empty().code());
        assert_eq!(format!("{word:016b}"), "1110001100001000");
    }
}
