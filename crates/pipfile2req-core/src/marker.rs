//! PEP 508 environment markers as an expression tree.
//!
//! Markers arrive from manifests as free text in several places (an explicit
//! `markers` attribute plus per-variable keys such as `sys_platform`). Each
//! fragment is parsed into a [`MarkerTree`], the fragments are conjoined with
//! [`merge`], and the result is rendered in canonical form:
//!
//! ```text
//! os_name=='nt'  +  python_version~='3.7'
//!     => os_name == "nt" and python_version ~= "3.7"
//! ```
//!
//! Conjunction flattens nested `and` nodes and keeps `or` nodes as single
//! operands, so a disjunction is always parenthesized when it ends up inside
//! an `and`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marker variables accepted on the left or right of a comparison.
const MARKER_VARIABLES: &[&str] = &[
    "implementation_name",
    "implementation_version",
    "os_name",
    "platform_machine",
    "platform_release",
    "platform_system",
    "platform_version",
    "python_full_version",
    "platform_python_implementation",
    "python_version",
    "sys_platform",
    "extra",
];

/// Pre-PEP 508 dotted names and their canonical spelling.
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("os.name", "os_name"),
    ("sys.platform", "sys_platform"),
    ("platform.version", "platform_version"),
    ("platform.machine", "platform_machine"),
    ("platform.python_implementation", "platform_python_implementation"),
    ("python_implementation", "platform_python_implementation"),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct MarkerParseError {
    pub message: String,
    pub position: usize,
}

impl MarkerParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOperator {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Compatible,
    ArbitraryEqual,
    In,
    NotIn,
}

impl MarkerOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterEqual => ">=",
            Self::Compatible => "~=",
            Self::ArbitraryEqual => "===",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

impl fmt::Display for MarkerOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a marker comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    Variable(String),
    Literal(String),
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => f.write_str(name),
            Self::Literal(value) if value.contains('"') => write!(f, "'{value}'"),
            Self::Literal(value) => write!(f, "\"{value}\""),
        }
    }
}

/// A single comparison such as `python_version >= "3.8"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerExpression {
    pub lhs: MarkerValue,
    pub operator: MarkerOperator,
    pub rhs: MarkerValue,
}

impl fmt::Display for MarkerExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operator, self.rhs)
    }
}

/// Boolean combination of marker expressions.
///
/// Build `And`/`Or` nodes through [`MarkerTree::and`] and [`MarkerTree::or`]
/// so that nested nodes of the same kind are flattened and single-operand
/// nodes collapse to their operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerTree {
    Expression(MarkerExpression),
    And(Vec<MarkerTree>),
    Or(Vec<MarkerTree>),
}

impl MarkerTree {
    /// Conjunction of `operands`. Returns `None` for an empty input.
    pub fn and(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut flat = Vec::new();
        for operand in operands {
            match operand {
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::collapse(flat, Self::And)
    }

    /// Disjunction of `operands`. Returns `None` for an empty input.
    pub fn or(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut flat = Vec::new();
        for operand in operands {
            match operand {
                Self::Or(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::collapse(flat, Self::Or)
    }

    fn collapse(mut operands: Vec<Self>, node: fn(Vec<Self>) -> Self) -> Option<Self> {
        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(node(operands)),
        }
    }

    /// True if the top level of this tree is an `or`.
    pub fn is_disjunction(&self) -> bool {
        matches!(self, Self::Or(_))
    }
}

impl fmt::Display for MarkerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(expr) => write!(f, "{expr}"),
            Self::And(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    if operand.is_disjunction() {
                        write!(f, "({operand})")?;
                    } else {
                        write!(f, "{operand}")?;
                    }
                }
                Ok(())
            }
            Self::Or(operands) => {
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{operand}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for MarkerTree {
    type Err = MarkerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: s.len(),
            depth: 0,
        };
        let tree = parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(MarkerParseError::new(
                "unexpected trailing input",
                token.start,
            ));
        }
        Ok(tree)
    }
}

/// Parses every fragment and conjoins them into one tree.
///
/// Returns `Ok(None)` when there are no fragments.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::marker::merge;
///
/// let merged = merge(["os_name=='nt' or os_name=='posix'", "python_version<'3'"])
///     .unwrap()
///     .unwrap();
/// assert_eq!(
///     merged.to_string(),
///     r#"(os_name == "nt" or os_name == "posix") and python_version < "3""#
/// );
/// ```
pub fn merge<'a>(
    fragments: impl IntoIterator<Item = &'a str>,
) -> Result<Option<MarkerTree>, MarkerParseError> {
    let trees = fragments
        .into_iter()
        .map(MarkerTree::from_str)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MarkerTree::and(trees))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    LeftParen,
    RightParen,
    And,
    Or,
    Operator(MarkerOperator),
    Variable(String),
    Literal(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    start: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, MarkerParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            b'(' => {
                i += 1;
                TokenKind::LeftParen
            }
            b')' => {
                i += 1;
                TokenKind::RightParen
            }
            b'\'' | b'"' => {
                let close = input[i + 1..]
                    .find(c as char)
                    .ok_or_else(|| MarkerParseError::new("unterminated string", start))?;
                let literal = &input[i + 1..i + 1 + close];
                i += close + 2;
                TokenKind::Literal(literal.to_string())
            }
            b'=' | b'!' | b'<' | b'>' | b'~' => {
                let rest = &input[i..];
                let (operator, len) = [
                    ("===", MarkerOperator::ArbitraryEqual),
                    ("==", MarkerOperator::Equal),
                    ("!=", MarkerOperator::NotEqual),
                    ("<=", MarkerOperator::LessEqual),
                    (">=", MarkerOperator::GreaterEqual),
                    ("~=", MarkerOperator::Compatible),
                    ("<", MarkerOperator::LessThan),
                    (">", MarkerOperator::GreaterThan),
                ]
                .into_iter()
                .find_map(|(text, op)| rest.starts_with(text).then_some((op, text.len())))
                .ok_or_else(|| MarkerParseError::new("invalid comparison operator", start))?;
                i += len;
                TokenKind::Operator(operator)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
                let word = &input[start..i];
                match word {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "in" => TokenKind::Operator(MarkerOperator::In),
                    "not" => {
                        let after = input[i..].trim_start();
                        let skipped = input.len() - i - after.len();
                        let followed_by_in = skipped > 0
                            && after.starts_with("in")
                            && !after[2..]
                                .starts_with(|ch: char| ch.is_ascii_alphanumeric() || ch == '_');
                        if !followed_by_in {
                            return Err(MarkerParseError::new("expected 'in' after 'not'", i));
                        }
                        i += skipped + 2;
                        TokenKind::Operator(MarkerOperator::NotIn)
                    }
                    _ => TokenKind::Variable(canonical_variable(word, start)?),
                }
            }
            _ => {
                return Err(MarkerParseError::new(
                    format!("unexpected character '{}'", input[i..].chars().next().unwrap_or('?')),
                    start,
                ));
            }
        };

        tokens.push(Token { kind, start });
    }

    Ok(tokens)
}

fn canonical_variable(word: &str, position: usize) -> Result<String, MarkerParseError> {
    if MARKER_VARIABLES.contains(&word) {
        return Ok(word.to_string());
    }
    LEGACY_VARIABLES
        .iter()
        .find_map(|(legacy, canonical)| (*legacy == word).then(|| (*canonical).to_string()))
        .ok_or_else(|| MarkerParseError::new(format!("unknown marker variable '{word}'"), position))
}

/// Deepest parenthesis nesting accepted before parsing gives up.
const MAX_NESTING: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == *kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.start)
    }

    fn parse_or(&mut self) -> Result<MarkerTree, MarkerParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&TokenKind::Or) {
            operands.push(self.parse_and()?);
        }
        MarkerTree::or(operands).ok_or_else(|| MarkerParseError::new("expected a marker", self.end))
    }

    fn parse_and(&mut self) -> Result<MarkerTree, MarkerParseError> {
        let mut operands = vec![self.parse_atom()?];
        while self.eat(&TokenKind::And) {
            operands.push(self.parse_atom()?);
        }
        MarkerTree::and(operands).ok_or_else(|| MarkerParseError::new("expected a marker", self.end))
    }

    fn parse_atom(&mut self) -> Result<MarkerTree, MarkerParseError> {
        let start = self.position();
        if self.eat(&TokenKind::LeftParen) {
            if self.depth == MAX_NESTING {
                return Err(MarkerParseError::new("parentheses nested too deeply", start));
            }
            self.depth += 1;
            let inner = self.parse_or()?;
            self.depth -= 1;
            if !self.eat(&TokenKind::RightParen) {
                return Err(MarkerParseError::new("expected ')'", self.position()));
            }
            return Ok(inner);
        }

        let lhs = self.parse_value()?;
        let position = self.position();
        let operator = match self.next() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => op,
            _ => return Err(MarkerParseError::new("expected a comparison operator", position)),
        };
        let rhs = self.parse_value()?;

        Ok(MarkerTree::Expression(MarkerExpression { lhs, operator, rhs }))
    }

    fn parse_value(&mut self) -> Result<MarkerValue, MarkerParseError> {
        let position = self.position();
        match self.next() {
            Some(Token {
                kind: TokenKind::Variable(name),
                ..
            }) => Ok(MarkerValue::Variable(name)),
            Some(Token {
                kind: TokenKind::Literal(value),
                ..
            }) => Ok(MarkerValue::Literal(value)),
            _ => Err(MarkerParseError::new(
                "expected a marker variable or quoted string",
                position,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> MarkerTree {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_expression_is_normalized() {
        assert_eq!(parse("os_name=='nt'").to_string(), r#"os_name == "nt""#);
        assert_eq!(
            parse("python_version  >=  \"3.8\"").to_string(),
            r#"python_version >= "3.8""#
        );
    }

    #[test]
    fn test_all_operators_round_trip() {
        for op in ["==", "!=", "<", "<=", ">", ">=", "~=", "===", "in", "not in"] {
            let tree = parse(&format!("python_version {op} '3.8'"));
            assert_eq!(tree.to_string(), format!(r#"python_version {op} "3.8""#));
        }
    }

    #[test]
    fn test_literal_on_left_side() {
        assert_eq!(
            parse("'linux' in sys_platform").to_string(),
            r#""linux" in sys_platform"#
        );
    }

    #[test]
    fn test_legacy_variables_are_canonicalized() {
        assert_eq!(parse("os.name == 'nt'").to_string(), r#"os_name == "nt""#);
        assert_eq!(
            parse("python_implementation == 'CPython'").to_string(),
            r#"platform_python_implementation == "CPython""#
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let tree = parse("os_name == 'nt' or os_name == 'posix' and python_version < '3'");
        let MarkerTree::Or(operands) = &tree else {
            panic!("expected a disjunction, got {tree:?}");
        };
        assert_eq!(operands.len(), 2);
        assert!(matches!(operands[1], MarkerTree::And(_)));
        assert_eq!(
            tree.to_string(),
            r#"os_name == "nt" or os_name == "posix" and python_version < "3""#
        );
    }

    #[test]
    fn test_grouped_disjunction_keeps_parentheses() {
        let tree = parse("(os_name == 'nt' or os_name == 'posix') and python_version < '3'");
        assert_eq!(
            tree.to_string(),
            r#"(os_name == "nt" or os_name == "posix") and python_version < "3""#
        );
    }

    #[test]
    fn test_redundant_parentheses_are_dropped() {
        assert_eq!(parse("((os_name == 'nt'))").to_string(), r#"os_name == "nt""#);
    }

    #[test]
    fn test_merge_plain_clauses() {
        let merged = merge(["os_name=='nt'", "python_version~='3.7'"])
            .unwrap()
            .unwrap();
        assert_eq!(
            merged.to_string(),
            r#"os_name == "nt" and python_version ~= "3.7""#
        );
    }

    #[test]
    fn test_merge_wraps_running_disjunction() {
        let merged = merge(["os_name == 'nt' or os_name == 'posix'", "sys_platform == 'win32'"])
            .unwrap()
            .unwrap();
        assert_eq!(
            merged.to_string(),
            r#"(os_name == "nt" or os_name == "posix") and sys_platform == "win32""#
        );
    }

    #[test]
    fn test_merge_wraps_next_disjunction() {
        let merged = merge(["sys_platform == 'win32'", "os_name == 'nt' or os_name == 'posix'"])
            .unwrap()
            .unwrap();
        assert_eq!(
            merged.to_string(),
            r#"sys_platform == "win32" and (os_name == "nt" or os_name == "posix")"#
        );
    }

    #[test]
    fn test_merge_wraps_both_disjunctions() {
        let merged = merge(["os_name == 'nt' or os_name == 'posix'", "python_version < '3' or python_version >= '3.6'"])
            .unwrap()
            .unwrap();
        assert_eq!(
            merged.to_string(),
            r#"(os_name == "nt" or os_name == "posix") and (python_version < "3" or python_version >= "3.6")"#
        );
    }

    #[test]
    fn test_merge_flattens_conjunctions() {
        let merged = merge(["os_name == 'nt' and python_version < '3'", "sys_platform == 'win32'"])
            .unwrap()
            .unwrap();
        let MarkerTree::And(operands) = &merged else {
            panic!("expected a conjunction");
        };
        assert_eq!(operands.len(), 3);
    }

    #[test]
    fn test_merge_nothing() {
        assert_eq!(merge(Vec::<&str>::new()).unwrap(), None);
    }

    #[test]
    fn test_literal_with_double_quote_uses_single_quotes() {
        let tree = parse(r#"platform_version == 'a"b'"#);
        assert_eq!(tree.to_string(), r#"platform_version == 'a"b'"#);
    }

    #[test]
    fn test_parse_errors() {
        let err = "os_name ==".parse::<MarkerTree>().unwrap_err();
        assert_eq!(err.position, 10);

        let err = "os_name == 'nt".parse::<MarkerTree>().unwrap_err();
        assert_eq!(err.message, "unterminated string");

        let err = "bogus == '1'".parse::<MarkerTree>().unwrap_err();
        assert!(err.message.contains("unknown marker variable"));

        assert!("(os_name == 'nt'".parse::<MarkerTree>().is_err());
        assert!("os_name == 'nt' and".parse::<MarkerTree>().is_err());
        assert!("os_name = 'nt'".parse::<MarkerTree>().is_err());
        assert!("os_name not 'nt'".parse::<MarkerTree>().is_err());
        assert!("".parse::<MarkerTree>().is_err());
        assert!("os_name == 'nt' )".parse::<MarkerTree>().is_err());
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let deep = format!("{}os_name == 'nt'{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = deep.parse::<MarkerTree>().unwrap_err();
        assert_eq!(err.position, MAX_NESTING);

        let shallow = format!("{}os_name == 'nt'{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(shallow.parse::<MarkerTree>().unwrap().to_string(), r#"os_name == "nt""#);
    }
}
