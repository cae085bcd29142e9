use std::collections::HashSet;
use std::sync::LazyLock;

use crate::coder::{COMP_TABLE, DEST_TABLE, JUMP_TABLE};
use crate::error::{AsmError, Result};

/// A normalized instruction line: comment-free and without whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Zero-based position among the normalized lines.
    pub index: usize,
    pub text: String,
}

impl SourceLine {
    /// 1-based number used in diagnostics.
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}

/// A classified line. Only the fields of the matching shape exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `@value` or `@symbol`
    Address { symbol: String },
    /// `(LABEL)`
    Label { symbol: String },
    /// `dest=comp;jump`; `dest` and `jump` may be empty, `comp` never is.
    Compute {
        dest: String,
        comp: String,
        jump: String,
    },
}

impl Command {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Command::Address { symbol } | Command::Label { symbol } => Some(symbol),
            Command::Compute { .. } => None,
        }
    }

    /// Words occupied in the code stream.
    pub fn width(&self) -> u16 {
        match self {
            Command::Label { .. } => 0,
            Command::Address { .. } | Command::Compute { .. } => 1,
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Strips comments and whitespace and drops blank lines.
pub fn normalize(raw: &str) -> Result<Vec<SourceLine>> {
    let lines: Vec<SourceLine> = raw
        .lines()
        .map(strip_comment)
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, text)| SourceLine { index, text })
        .collect();

    if lines.is_empty() {
        return Err(AsmError::EmptyInput);
    }
    Ok(lines)
}

fn permutations(s: &str) -> Vec<String> {
    if s.len() <= 1 {
        return vec![s.to_string()];
    }
    let mut out = Vec::new();
    for (i, c) in s.char_indices() {
        let rest = format!("{}{}", &s[..i], &s[i + c.len_utf8()..]);
        for tail in permutations(&rest) {
            out.push(format!("{c}{tail}"));
        }
    }
    out
}

fn compute_forms() -> HashSet<String> {
    let dests: Vec<String> = DEST_TABLE
        .iter()
        .filter(|desc| !desc.mnemonic.is_empty())
        .flat_map(|desc| permutations(desc.mnemonic))
        .collect();
    let jumps: Vec<&str> = JUMP_TABLE
        .iter()
        .map(|desc| desc.mnemonic)
        .filter(|mnemonic| !mnemonic.is_empty())
        .collect();

    let mut forms = HashSet::new();
    for comp in COMP_TABLE.iter().map(|desc| desc.mnemonic) {
        for dest in &dests {
            forms.insert(format!("{dest}={comp}"));
            for jump in &jumps {
                forms.insert(format!("{dest}={comp};{jump}"));
            }
        }
        for jump in &jumps {
            forms.insert(format!("{comp};{jump}"));
        }
    }
    forms
}

/// Every syntactically valid compute line, upper-case.
static COMPUTE_FORMS: LazyLock<HashSet<String>> = LazyLock::new(compute_forms);

pub fn is_compute_form(line: &str) -> bool {
    COMPUTE_FORMS.contains(&line.to_ascii_uppercase())
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '_' | '.' | '$' | ':') => {
            chars.all(is_ident_char)
        }
        _ => false,
    }
}

fn is_address_operand(s: &str) -> bool {
    let numeric = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    numeric || is_identifier(s)
}

fn is_label_name(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_alphabetic()) && s.chars().all(is_ident_char)
}

fn split_compute(line: &str) -> Command {
    let (dest, rest) = line.split_once('=').unwrap_or(("", line));
    let (comp, jump) = rest.split_once(';').unwrap_or((rest, ""));
    Command::Compute {
        dest: dest.to_string(),
        comp: comp.to_string(),
        jump: jump.to_string(),
    }
}

/// Classifies one normalized line. Pure: the same input always yields the
/// same command.
pub fn classify(line: &str) -> Result<Command> {
    if let Some(symbol) = line.strip_prefix('@') {
        if is_address_operand(symbol) {
            return Ok(Command::Address {
                symbol: symbol.to_string(),
            });
        }
    } else if let Some(symbol) = line.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        if is_label_name(symbol) {
            return Ok(Command::Label {
                symbol: symbol.to_string(),
            });
        }
    } else if is_compute_form(line) {
        return Ok(split_compute(line));
    }

    Err(AsmError::InvalidCommand {
        line: line.to_string(),
    })
}

/// Normalized source with a position cursor.
#[derive(Debug, Clone)]
pub struct Parser {
    lines: Vec<SourceLine>,
    counter: usize,
}

impl Parser {
    pub fn new(raw: &str) -> Result<Self> {
        Ok(Self {
            lines: normalize(raw)?,
            counter: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn has_more_commands(&self) -> bool {
        self.counter < self.lines.len()
    }

    pub fn advance(&mut self) {
        if self.has_more_commands() {
            self.counter += 1;
        }
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    pub fn current_line(&self) -> Option<&SourceLine> {
        self.lines.get(self.counter)
    }

    pub fn current_command(&self) -> Option<Result<Command>> {
        self.current_line().map(|line| classify(&line.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(raw: &str) -> Vec<String> {
        normalize(raw).unwrap().into_iter().map(|l| l.text).collect()
    }

    #[test]
    fn normalize_strips_comments_and_spaces() {
        assert_eq!(texts("@value"), ["@value"]);
        assert_eq!(texts(" M = A + D "), ["M=A+D"]);
        assert_eq!(texts("D=A+D;jmp"), ["D=A+D;jmp"]);
        assert_eq!(
            texts("//comment\n\n@23\nA=D\n\n(END)\nM = A + D\n// Another comment \n"),
            ["@23", "A=D", "(END)", "M=A+D"]
        );
        assert_eq!(texts("\t@1 // trailing\r\n\r\nD=M\t"), ["@1", "D=M"]);
    }

    #[test]
    fn normalize_indexes_surviving_lines() {
        let lines = normalize("// head\n\n@1\n\n\nD=A\n").unwrap();
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 1);
        assert_eq!(lines[1].line_number(), 2);
    }

    #[test]
    fn comments_only_is_empty_input() {
        let err = normalize("// this is a comment\n\n\n // Another comment //\n // ").unwrap_err();
        assert_eq!(err, AsmError::EmptyInput);
        assert_eq!(err.to_string(), "The input must contain some code");
    }

    #[test]
    fn dest_orderings_are_all_present() {
        assert!(is_compute_form("DM=A"));
        assert!(is_compute_form("dam=m+1;jmp"));
        assert!(!is_compute_form("MM=A;JLE"));
        assert!(!is_compute_form("D"));
    }

    #[test]
    fn cursor_walks_and_resets() {
        let mut parser = Parser::new("@1\n(L)\nD=A").unwrap();
        assert_eq!(parser.len(), 3);
        parser.advance();
        parser.advance();
        assert_eq!(parser.counter(), 2);
        parser.advance();
        assert!(!parser.has_more_commands());
        assert!(parser.current_line().is_none());
        parser.advance();
        assert_eq!(parser.counter(), 3);
        parser.reset();
        assert_eq!(parser.current_command(), Some(Ok(Command::Address { symbol: "1".into() })));
    }
}
