//! CLDR plural rules compiled to a small relation AST.
//!
//! A rule is a disjunction (`or`) of conjunctions (`and`) of relations such
//! as `n % 10 = 2..4,7`. Operands are derived from the canonical decimal
//! string of the value being classified.

use super::*;
use num_bigint::BigUint;
use num_traits::Zero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Few,
        Self::Many,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PluralCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::PluralRule(format!("unknown plural category \"{value}\"")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PluralRuleType {
    #[default]
    Cardinal,
    Ordinal,
}

impl PluralRuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cardinal => "cardinal",
            Self::Ordinal => "ordinal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PluralCategorySet(u8);

impl PluralCategorySet {
    pub fn contains(self, category: PluralCategory) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn insert(&mut self, category: PluralCategory) {
        self.0 |= category.bit();
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = PluralCategory> {
        PluralCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

/// The numeric facets plural rules test.
///
/// `w` is reported as the fraction digit count, identical to `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralOperands {
    integer: BigUint,
    fraction_digits: usize,
    fraction: BigUint,
    fraction_trimmed: BigUint,
    finite: bool,
}

impl PluralOperands {
    pub fn i(&self) -> &BigUint {
        &self.integer
    }

    pub fn v(&self) -> usize {
        self.fraction_digits
    }

    pub fn w(&self) -> usize {
        self.fraction_digits
    }

    pub fn f(&self) -> &BigUint {
        &self.fraction
    }

    pub fn t(&self) -> &BigUint {
        &self.fraction_trimmed
    }

    pub fn is_integer(&self) -> bool {
        self.fraction.is_zero()
    }

    fn non_finite() -> Self {
        Self {
            integer: BigUint::zero(),
            fraction_digits: 0,
            fraction: BigUint::zero(),
            fraction_trimmed: BigUint::zero(),
            finite: false,
        }
    }

    fn value(&self, operand: Operand) -> (BigUint, bool) {
        match operand {
            Operand::N => (self.integer.clone(), self.is_integer()),
            Operand::I => (self.integer.clone(), true),
            Operand::V | Operand::W => (BigUint::from(self.fraction_digits), true),
            Operand::F => (self.fraction.clone(), true),
            Operand::T => (self.fraction_trimmed.clone(), true),
            Operand::E | Operand::C => (BigUint::zero(), true),
        }
    }
}

impl std::str::FromStr for PluralOperands {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::PluralRule(format!("invalid plural operand \"{text}\""));
        let digits = text.trim().trim_start_matches(['-', '+']);
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let integer = if integer.is_empty() { "0" } else { integer };
        if !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let parse = |digits: &str| {
            if digits.is_empty() {
                Some(BigUint::zero())
            } else {
                BigUint::parse_bytes(digits.as_bytes(), 10)
            }
        };
        Ok(Self {
            integer: parse(integer).ok_or_else(invalid)?,
            fraction_digits: fraction.len(),
            fraction: parse(fraction).ok_or_else(invalid)?,
            fraction_trimmed: parse(fraction.trim_end_matches('0')).ok_or_else(invalid)?,
            finite: true,
        })
    }
}

impl From<u64> for PluralOperands {
    fn from(value: u64) -> Self {
        Self {
            integer: BigUint::from(value),
            fraction_digits: 0,
            fraction: BigUint::zero(),
            fraction_trimmed: BigUint::zero(),
            finite: true,
        }
    }
}

impl From<i64> for PluralOperands {
    fn from(value: i64) -> Self {
        Self::from(value.unsigned_abs())
    }
}

impl From<f64> for PluralOperands {
    fn from(value: f64) -> Self {
        if !value.is_finite() {
            return Self::non_finite();
        }
        format!("{}", value.abs())
            .parse()
            .unwrap_or_else(|_| Self::non_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    N,
    I,
    V,
    W,
    F,
    T,
    E,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeItem {
    Value(u64),
    Range(u64, u64),
}

impl RangeItem {
    fn contains(self, value: &BigUint) -> bool {
        match self {
            Self::Value(v) => *value == BigUint::from(v),
            Self::Range(low, high) => *value >= BigUint::from(low) && *value <= BigUint::from(high),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Relation {
    operand: Operand,
    modulus: Option<u64>,
    negated: bool,
    items: Vec<RangeItem>,
}

impl Relation {
    fn matches(&self, operands: &PluralOperands) -> bool {
        let (mut value, integral) = operands.value(self.operand);
        if let Some(modulus) = self.modulus {
            value %= BigUint::from(modulus);
        }
        let hit = integral && self.items.iter().any(|item| item.contains(&value));
        hit != self.negated
    }
}

/// Disjunction of conjunctions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Condition {
    alternatives: Vec<Vec<Relation>>,
}

impl Condition {
    fn matches(&self, operands: &PluralOperands) -> bool {
        self.alternatives
            .iter()
            .any(|all| all.iter().all(|relation| relation.matches(operands)))
    }
}

/// Compiled rules for one locale and rule type. `other` is never stored; it
/// is what [`PluralRules::select`] returns when nothing else matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralRules {
    rules: Vec<(PluralCategory, Condition)>,
    categories: PluralCategorySet,
}

impl PluralRules {
    pub fn compile<C, R>(rules: &[(C, R)]) -> Result<Self>
    where
        C: AsRef<str>,
        R: AsRef<str>,
    {
        let mut compiled = Self::default();
        for (category, text) in rules {
            let category = category.as_ref().parse::<PluralCategory>()?;
            if category == PluralCategory::Other {
                continue;
            }
            if compiled.categories.contains(category) {
                return Err(Error::PluralRule(format!(
                    "duplicate rule for category \"{category}\""
                )));
            }
            let condition = RuleParser::new(text.as_ref())?.parse()?;
            compiled.categories.insert(category);
            compiled.rules.push((category, condition));
        }
        Ok(compiled)
    }

    /// Declared categories, always including `other`.
    pub fn categories(&self) -> PluralCategorySet {
        let mut categories = self.categories;
        categories.insert(PluralCategory::Other);
        categories
    }

    pub fn select(&self, value: impl Into<PluralOperands>) -> PluralCategory {
        self.select_operands(&value.into())
    }

    pub fn select_operands(&self, operands: &PluralOperands) -> PluralCategory {
        if !operands.finite {
            return PluralCategory::Other;
        }
        self.rules
            .iter()
            .find(|(_, condition)| condition.matches(operands))
            .map(|(category, _)| *category)
            .unwrap_or(PluralCategory::Other)
    }

    pub fn select_range(
        &self,
        start: impl Into<PluralOperands>,
        end: impl Into<PluralOperands>,
    ) -> PluralCategory {
        let start = self.select(start);
        let end = self.select(end);
        if start == end {
            start
        } else {
            PluralCategory::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Number(u64),
    Percent,
    Equals,
    NotEquals,
    Comma,
    DotDot,
}

struct RuleParser {
    source: String,
    tokens: Vec<Token>,
    pos: usize,
}

impl RuleParser {
    fn new(text: &str) -> Result<Self> {
        let source = text.split('@').next().unwrap_or_default().trim().to_string();
        let tokens = tokenize(&source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    fn parse(mut self) -> Result<Condition> {
        if self.tokens.is_empty() {
            return Err(self.error("empty rule"));
        }
        let mut alternatives = vec![self.parse_and()?];
        while self.eat_word("or") {
            alternatives.push(self.parse_and()?);
        }
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(Condition { alternatives })
    }

    fn parse_and(&mut self) -> Result<Vec<Relation>> {
        let mut relations = vec![self.parse_relation()?];
        while self.eat_word("and") {
            relations.push(self.parse_relation()?);
        }
        Ok(relations)
    }

    fn parse_relation(&mut self) -> Result<Relation> {
        let operand = match self.next() {
            Some(Token::Word(word)) => match word.as_str() {
                "n" => Operand::N,
                "i" => Operand::I,
                "v" => Operand::V,
                "w" => Operand::W,
                "f" => Operand::F,
                "t" => Operand::T,
                "e" => Operand::E,
                "c" => Operand::C,
                _ => return Err(self.error("unknown operand")),
            },
            _ => return Err(self.error("expected operand")),
        };

        let modulus = if self.peek() == Some(&Token::Percent) {
            self.pos += 1;
            match self.next() {
                Some(Token::Number(0)) => return Err(self.error("modulus must be non-zero")),
                Some(Token::Number(value)) => Some(value),
                _ => return Err(self.error("expected modulus")),
            }
        } else {
            None
        };

        let negated = match self.next() {
            Some(Token::Equals) => false,
            Some(Token::NotEquals) => true,
            _ => return Err(self.error("expected '=' or '!='")),
        };

        let mut items = vec![self.parse_range_item()?];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            items.push(self.parse_range_item()?);
        }

        Ok(Relation {
            operand,
            modulus,
            negated,
            items,
        })
    }

    fn parse_range_item(&mut self) -> Result<RangeItem> {
        let Some(Token::Number(low)) = self.next() else {
            return Err(self.error("expected number"));
        };
        if self.peek() != Some(&Token::DotDot) {
            return Ok(RangeItem::Value(low));
        }
        self.pos += 1;
        match self.next() {
            Some(Token::Number(high)) if high >= low => Ok(RangeItem::Range(low, high)),
            Some(Token::Number(_)) => Err(self.error("range upper bound below lower bound")),
            _ => Err(self.error("expected range upper bound")),
        }
    }

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

    fn eat_word(&mut self, expected: &str) -> bool {
        if matches!(self.peek(), Some(Token::Word(word)) if word == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, msg: &str) -> Error {
        Error::PluralRule(format!("{msg} at token {} in \"{}\"", self.pos, self.source))
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            b'=' => {
                tokens.push(Token::Equals);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b'!' if bytes.get(i + 1) == Some(&b'=') => {
                tokens.push(Token::NotEquals);
                i += 2;
            }
            b'.' if bytes.get(i + 1) == Some(&b'.') => {
                tokens.push(Token::DotDot);
                i += 2;
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let value = source[start..i].parse::<u64>().map_err(|_| {
                    Error::PluralRule(format!("number out of range in \"{source}\""))
                })?;
                tokens.push(Token::Number(value));
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                tokens.push(Token::Word(source[start..i].to_ascii_lowercase()));
            }
            _ => {
                return Err(Error::PluralRule(format!(
                    "unexpected character '{}' in \"{source}\"",
                    b as char
                )));
            }
        }
    }
    Ok(tokens)
}
