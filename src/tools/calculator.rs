use futures::future::{self, FutureExt};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::{Tool, ToolDescriptor, ToolFuture};

pub const SUPPORTED_OPERATIONS: &str =
    "+, -, *, /, **, sqrt, sin, cos, tan, log, ln, abs, floor, ceil";

const SYSTEM_PROMPT: &str = "You are a helpful calculator assistant. When users ask mathematical questions:

1. If it's a straightforward calculation, provide the answer
2. Show the formula or steps if it helps understanding
3. If the calculation is complex, break it down into steps
4. Handle both simple arithmetic and advanced math (trigonometry, logarithms, etc.)

Examples of what you can calculate:
- Basic arithmetic: 2 + 2, 10 * 5, etc.
- Powers and roots: 2^10, sqrt(16), 3^(1/3)
- Trigonometry: sin(π/2), cos(0), tan(π/4)
- Logarithms: log(100), ln(e)

Always show the result clearly and in a user-friendly format.";

/// Nesting limit for parentheses, signs and function arguments
const MAX_DEPTH: usize = 256;

/// Words that carry no meaning for the evaluator
const FILLER_WORDS: &[&str] = &["what", "is", "calculate", "compute", "evaluate", "of"];

#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    Empty,
    DivisionByZero,
    Domain(&'static str),
    NonFinite,
    UnknownIdentifier(String),
    UnexpectedChar(char),
    UnexpectedToken(String),
    UnexpectedEnd,
    InvalidNumber(String),
    TooDeep,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Empty => write!(f, "No expression given"),
            CalcError::DivisionByZero => write!(f, "Division by zero"),
            CalcError::Domain(func) => write!(f, "Math domain error in {}", func),
            CalcError::NonFinite => write!(f, "Result is not a finite number"),
            CalcError::UnknownIdentifier(name) => write!(f, "Unknown name '{}'", name),
            CalcError::UnexpectedChar(c) => write!(f, "Unexpected character '{}'", c),
            CalcError::UnexpectedToken(tok) => write!(f, "Unexpected '{}'", tok),
            CalcError::UnexpectedEnd => write!(f, "Unexpected end of expression"),
            CalcError::InvalidNumber(text) => write!(f, "Invalid number '{}'", text),
            CalcError::TooDeep => write!(f, "Expression is nested too deeply"),
        }
    }
}

impl std::error::Error for CalcError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn phrase_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        // Longer phrases first so "square root of" wins over "square root"
        [
            (r"\bto the power of\b", " ^ "),
            (r"\bsquare root of\b", " sqrt "),
            (r"\bsquare root\b", " sqrt "),
            (r"\bmultiplied by\b", " * "),
            (r"\bdivided by\b", " / "),
            (r"\bsquared\b", " ^ 2 "),
            (r"\bcubed\b", " ^ 3 "),
            (r"\bpower\b", " ^ "),
            (r"\bplus\b", " + "),
            (r"\bminus\b", " - "),
            (r"\btimes\b", " * "),
            (r"\bmultiply\b", " * "),
            (r"\bdivide\b", " / "),
            (r"\bmod\b", " % "),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
        .collect()
    })
}

/// Rewrite spoken arithmetic into operator form
pub fn normalize(input: &str) -> String {
    let mut expression = input
        .trim()
        .to_lowercase()
        .replace('π', "pi")
        .replace('×', "*")
        .replace('÷', "/");
    for (re, replacement) in phrase_rules() {
        expression = re.replace_all(&expression, *replacement).into_owned();
    }
    expression
        .trim_end_matches(|c: char| c == '?' || c == '=' || c.is_whitespace())
        .to_string()
}

fn tokenize(expression: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation only when digits follow the 'e'
                if i < chars.len() && chars[i] == 'e' {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if !FILLER_WORDS.contains(&word.as_str()) {
                    tokens.push(Token::Ident(word));
                }
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            other => return Err(CalcError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    // Floored modulo: the result takes the divisor's sign
                    value -= divisor * (value / divisor).floor();
                }
                // Implicit multiplication: "2pi", "3(4 + 1)". Two bare numbers stay an error.
                Some(Token::Ident(_)) | Some(Token::LParen) => {
                    value *= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    /// Every nested construct passes through here, so the depth check lives here
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            // Right-associative, and the exponent may carry its own sign
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(CalcError::UnexpectedToken(other.to_string())),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "pi" => Ok(std::f64::consts::PI),
                "e" => Ok(std::f64::consts::E),
                _ => {
                    let func = function(&name)?;
                    let argument = self.unary()?;
                    func(argument)
                }
            },
            Some(other) => Err(CalcError::UnexpectedToken(other.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

type MathFn = fn(f64) -> Result<f64, CalcError>;

fn function(name: &str) -> Result<MathFn, CalcError> {
    let func: MathFn = match name {
        "sin" => |x| Ok(x.sin()),
        "cos" => |x| Ok(x.cos()),
        "tan" => |x| Ok(x.tan()),
        "abs" => |x| Ok(x.abs()),
        "floor" => |x| Ok(x.floor()),
        "ceil" => |x| Ok(x.ceil()),
        "sqrt" => |x| {
            if x < 0.0 {
                Err(CalcError::Domain("sqrt"))
            } else {
                Ok(x.sqrt())
            }
        },
        "log" => |x| {
            if x <= 0.0 {
                Err(CalcError::Domain("log"))
            } else {
                Ok(x.log10())
            }
        },
        "ln" => |x| {
            if x <= 0.0 {
                Err(CalcError::Domain("ln"))
            } else {
                Ok(x.ln())
            }
        },
        other => return Err(CalcError::UnknownIdentifier(other.to_string())),
    };
    Ok(func)
}

/// Evaluate an arithmetic expression, natural-language phrasing allowed
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(&normalize(input))?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::UnexpectedToken(extra.to_string()));
    }
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    Ok(value)
}

/// Integral values print without a decimal point; others round to 10 places
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        if value == 0.0 {
            return "0".to_string();
        }
        if value.abs() < 1e15 {
            return format!("{}", value as i64);
        }
        return format!("{}", value);
    }

    let rounded = format!("{:.10}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub struct CalculatorTool {
    descriptor: ToolDescriptor,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "Calculator".to_string(),
                description: "Performs mathematical calculations, algebra, trigonometry, and other math operations.".to_string(),
                version: "1.0".to_string(),
                kind: "CalculatorTool",
                system_prompt: SYSTEM_PROMPT.to_string(),
            },
        }
    }

    pub fn calculate(&self, input: &str) -> String {
        match evaluate(input) {
            Ok(value) => format_number(value),
            Err(e) => format!(
                "Error: Could not calculate. {}\n\nSupported operations: {}",
                e, SUPPORTED_OPERATIONS
            ),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CalculatorTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    fn execute<'a>(&'a self, input: &'a str) -> ToolFuture<'a> {
        future::ready(self.calculate(input)).boxed()
    }
}
