//! Symbolic algebra operations: `factor`, `expand`, `gcd` and `lcm`.
//!
//! Works over integers and univariate polynomials with integer
//! coefficients. Raw results use `*` and `^`; [`tidy`] turns them into the
//! display form.

use super::error::{CalcError, Result};
use super::evaluation::split_top_level;

/// Largest magnitude accepted for integer factorization.
const MAX_FACTOR_INPUT: i128 = 1_000_000_000_000_000;

/// Largest exponent accepted in polynomial input.
const MAX_EXPONENT: u32 = 64;

/// Largest polynomial degree built while parsing.
const MAX_DEGREE: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlgebraOp {
    Factor,
    Expand,
    Gcd,
    Lcm,
}

impl AlgebraOp {
    pub const ALL: [AlgebraOp; 4] = [Self::Factor, Self::Expand, Self::Gcd, Self::Lcm];

    /// Prefix that routes an expression to this operation.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Factor => "factor(",
            Self::Expand => "expand(",
            Self::Gcd => "gcd(",
            Self::Lcm => "lcm(",
        }
    }
}

/// Detect an algebra operation by prefix and extract its argument: the text
/// between the first `(` and the last `)`.
pub fn detect(expression: &str) -> Option<(AlgebraOp, &str)> {
    let operation = AlgebraOp::ALL
        .into_iter()
        .find(|op| expression.starts_with(op.prefix()))?;

    let open = operation.prefix().len();
    let argument = match expression.rfind(')') {
        Some(close) if close >= open => &expression[open..close],
        _ => &expression[open..],
    };

    Some((operation, argument))
}

/// Run an operation on its argument text, producing the raw result.
pub fn apply(operation: AlgebraOp, argument: &str) -> Result<String> {
    match operation {
        AlgebraOp::Gcd => integers(argument).map(|values| gcd_all(&values).to_string()),
        AlgebraOp::Lcm => lcm_all(&integers(argument)?).map(|value| value.to_string()),
        AlgebraOp::Expand => {
            let parsed = parse_polynomial(argument)?;
            Ok(parsed.poly.format(&parsed.variable))
        }
        AlgebraOp::Factor => {
            let parsed = parse_polynomial(argument)?;
            if parsed.poly.degree() == 0 {
                factor_integer(parsed.poly.coeffs[0])
            } else {
                factor_polynomial(&parsed.poly, &parsed.variable)
            }
        }
    }
}

/// Display clean-up for algebra output.
pub fn tidy(raw: &str) -> String {
    raw.replace("**", "^")
        .replace('*', "×")
        .replace(' ', "")
        .replace("+-", "-")
}

fn integers(argument: &str) -> Result<Vec<i128>> {
    split_top_level(argument)
        .into_iter()
        .map(|part| {
            part.parse::<i128>()
                .map_err(|_| CalcError::algebra(format!("'{}' is not an integer", part)))
        })
        .collect()
}

fn gcd(a: i128, b: i128) -> i128 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

fn gcd_all(values: &[i128]) -> i128 {
    values.iter().fold(0, |acc, &value| gcd(acc, value))
}

fn lcm_all(values: &[i128]) -> Result<i128> {
    values.iter().try_fold(1i128, |acc, &value| {
        if acc == 0 || value == 0 {
            return Ok(0);
        }
        (acc / gcd(acc, value))
            .checked_mul(value.abs())
            .ok_or_else(|| CalcError::algebra("lcm overflow"))
    })
}

/// Prime factorization as `p^k*q*...`.
fn factor_integer(n: i128) -> Result<String> {
    if n.abs() > MAX_FACTOR_INPUT {
        return Err(CalcError::algebra(format!("{} is too large to factor", n)));
    }
    if n == 0 || n.abs() == 1 {
        return Ok(n.to_string());
    }

    let mut parts = Vec::new();
    if n < 0 {
        parts.push("-1".to_string());
    }

    let mut remaining = n.abs();
    let mut divisor = 2i128;
    while divisor * divisor <= remaining {
        let mut count = 0;
        while remaining % divisor == 0 {
            remaining /= divisor;
            count += 1;
        }
        if count > 0 {
            parts.push(power_text(&divisor.to_string(), count));
        }
        divisor += if divisor == 2 { 1 } else { 2 };
    }
    if remaining > 1 {
        parts.push(remaining.to_string());
    }

    Ok(parts.join("*"))
}

fn power_text(base: &str, exponent: u32) -> String {
    if exponent == 1 {
        base.to_string()
    } else {
        format!("{}^{}", base, exponent)
    }
}

/// Polynomial with integer coefficients, lowest power first.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Poly {
    coeffs: Vec<i128>,
}

impl Poly {
    fn constant(value: i128) -> Self {
        Self {
            coeffs: vec![value],
        }
    }

    fn variable() -> Self {
        Self { coeffs: vec![0, 1] }
    }

    fn trimmed(mut coeffs: Vec<i128>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0);
        }
        Self { coeffs }
    }

    fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0)
    }

    fn leading(&self) -> i128 {
        self.coeffs[self.degree()]
    }

    fn add(&self, other: &Self) -> Result<Self> {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| {
                let a = self.coeffs.get(i).copied().unwrap_or(0);
                let b = other.coeffs.get(i).copied().unwrap_or(0);
                a.checked_add(b).ok_or_else(overflow)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::trimmed(coeffs))
    }

    fn neg(&self) -> Result<Self> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| c.checked_neg().ok_or_else(overflow))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::trimmed(coeffs))
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        check_degree(self.degree() + other.degree())?;
        let mut coeffs = vec![0i128; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                let term = a.checked_mul(b).ok_or_else(overflow)?;
                coeffs[i + j] = coeffs[i + j].checked_add(term).ok_or_else(overflow)?;
            }
        }
        Ok(Self::trimmed(coeffs))
    }

    fn pow(&self, exponent: u32) -> Result<Self> {
        check_degree(self.degree().saturating_mul(exponent as usize))?;
        let mut result = Self::constant(1);
        for _ in 0..exponent {
            result = result.mul(self)?;
        }
        Ok(result)
    }

    /// Exact division by `q*x - p`, if it divides evenly.
    fn divide_linear(&self, q: i128, p: i128) -> Option<Self> {
        let n = self.degree();
        let mut quotient = vec![0i128; n];
        let mut next = 0i128;
        for k in (1..=n).rev() {
            let numerator = self.coeffs[k].checked_add(p.checked_mul(next)?)?;
            if numerator % q != 0 {
                return None;
            }
            next = numerator / q;
            quotient[k - 1] = next;
        }
        if p.checked_mul(quotient[0])?.checked_neg()? != self.coeffs[0] {
            return None;
        }
        Some(Self::trimmed(quotient))
    }

    /// Whether `p/q` is a root, evaluated as `sum a_i p^i q^(n-i)`.
    fn has_root(&self, p: i128, q: i128) -> bool {
        let n = self.degree() as u32;
        let mut sum = 0i128;
        for (i, &a) in self.coeffs.iter().enumerate() {
            let term = p
                .checked_pow(i as u32)
                .and_then(|pp| q.checked_pow(n - i as u32).and_then(|qq| pp.checked_mul(qq)))
                .and_then(|t| t.checked_mul(a));
            match term.and_then(|t| sum.checked_add(t)) {
                Some(total) => sum = total,
                None => return false,
            }
        }
        sum == 0
    }

    fn term_count(&self) -> usize {
        self.coeffs.iter().filter(|&&c| c != 0).count()
    }

    /// Render with descending powers, e.g. `x^2+2*x+1`.
    fn format(&self, variable: &str) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut out = String::new();
        for (power, &coeff) in self.coeffs.iter().enumerate().rev() {
            if coeff == 0 {
                continue;
            }
            if coeff < 0 {
                out.push('-');
            } else if !out.is_empty() {
                out.push('+');
            }

            let magnitude = coeff.unsigned_abs();
            match power {
                0 => out.push_str(&magnitude.to_string()),
                _ => {
                    if magnitude != 1 {
                        out.push_str(&format!("{}*", magnitude));
                    }
                    out.push_str(&power_text(variable, power as u32));
                }
            }
        }
        out
    }
}

fn overflow() -> CalcError {
    CalcError::algebra("coefficient overflow")
}

fn check_degree(degree: usize) -> Result<()> {
    if degree > MAX_DEGREE {
        return Err(CalcError::algebra(format!(
            "degree {} exceeds the limit of {}",
            degree, MAX_DEGREE
        )));
    }
    Ok(())
}

fn positive_divisors(n: i128) -> Vec<i128> {
    let n = n.abs();
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1i128;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Find a rational root `p/q` (q > 0) of a polynomial with non-zero constant
/// term.
fn find_rational_root(poly: &Poly) -> Option<(i128, i128)> {
    if poly.coeffs[0].abs() > MAX_FACTOR_INPUT || poly.leading().abs() > MAX_FACTOR_INPUT {
        return None;
    }

    let numerators = positive_divisors(poly.coeffs[0]);
    let denominators = positive_divisors(poly.leading());
    for &q in &denominators {
        for &p in &numerators {
            if gcd(p, q) != 1 {
                continue;
            }
            for candidate in [-p, p] {
                if poly.has_root(candidate, q) {
                    return Some((candidate, q));
                }
            }
        }
    }
    None
}

fn factor_polynomial(poly: &Poly, variable: &str) -> Result<String> {
    if poly.is_zero() {
        return Ok("0".to_string());
    }

    let mut content = gcd_all(&poly.coeffs);
    if poly.leading() < 0 {
        content = -content;
    }
    let mut remaining = Poly::trimmed(poly.coeffs.iter().map(|c| c / content).collect());

    let mut zero_roots = 0u32;
    while remaining.degree() > 0 && remaining.coeffs[0] == 0 {
        remaining = Poly::trimmed(remaining.coeffs[1..].to_vec());
        zero_roots += 1;
    }

    // (p, q, multiplicity) for each linear factor q*x - p
    let mut linear: Vec<(i128, i128, u32)> = Vec::new();
    while remaining.degree() > 0 {
        let Some((p, q)) = find_rational_root(&remaining) else {
            break;
        };
        let Some(quotient) = remaining.divide_linear(q, p) else {
            break;
        };
        remaining = quotient;
        match linear.iter_mut().find(|(lp, lq, _)| *lp == p && *lq == q) {
            Some(entry) => entry.2 += 1,
            None => linear.push((p, q, 1)),
        }
    }
    // ascending by root p/q
    linear.sort_by(|a, b| (a.0 * b.1).cmp(&(b.0 * a.1)));

    let mut factors: Vec<(String, usize, u32)> = Vec::new();
    if zero_roots > 0 {
        factors.push((variable.to_string(), 1, zero_roots));
    }
    for (p, q, multiplicity) in linear {
        let factor = Poly::trimmed(vec![-p, q]);
        factors.push((factor.format(variable), factor.term_count(), multiplicity));
    }
    if remaining.degree() > 0 {
        factors.push((remaining.format(variable), remaining.term_count(), 1));
    }

    let wrap = factors.len() > 1 || content.abs() != 1;
    let mut rendered: Vec<String> = factors
        .into_iter()
        .map(|(text, terms, multiplicity)| {
            let base = if terms > 1 && (wrap || multiplicity > 1) {
                format!("({})", text)
            } else {
                text
            };
            power_text(&base, multiplicity)
        })
        .collect();

    match content {
        1 => {}
        -1 => {
            if let Some(first) = rendered.first_mut() {
                first.insert(0, '-');
            }
        }
        other => rendered.insert(0, other.to_string()),
    }

    Ok(rendered.join("*"))
}

struct ParsedPoly {
    poly: Poly,
    variable: String,
}

fn parse_polynomial(input: &str) -> Result<ParsedPoly> {
    let tokens = tokenize(input)?;
    let mut parser = PolyParser {
        tokens,
        position: 0,
        variable: None,
    };

    let poly = parser.expression()?;
    if parser.position != parser.tokens.len() {
        return Err(CalcError::algebra(format!(
            "unexpected input in '{}'",
            input.trim()
        )));
    }

    Ok(ParsedPoly {
        poly,
        variable: parser.variable.unwrap_or_else(|| "x".to_string()),
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Number(i128),
    Ident(String),
    Plus,
    Minus,
    Star,
    Caret,
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse::<i128>()
                    .map_err(|_| CalcError::algebra(format!("'{}' is too large", digits)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(&l) = chars.peek() {
                    if !l.is_alphabetic() {
                        break;
                    }
                    name.push(l);
                    chars.next();
                }
                tokens.push(Token::Ident(name));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' | '×' => Token::Star,
                    '^' => Token::Caret,
                    '(' => Token::Open,
                    ')' => Token::Close,
                    other => {
                        return Err(CalcError::algebra(format!(
                            "unsupported character '{}'",
                            other
                        )));
                    }
                };
                tokens.push(token);
                chars.next();
            }
        }
    }

    if tokens.is_empty() {
        return Err(CalcError::algebra("empty argument"));
    }
    Ok(tokens)
}

struct PolyParser {
    tokens: Vec<Token>,
    position: usize,
    variable: Option<String>,
}

impl PolyParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn expression(&mut self) -> Result<Poly> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    value = value.add(&self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    value = value.add(&self.term()?.neg()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Poly> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    value = value.mul(&self.unary()?)?;
                }
                Some(Token::Number(_) | Token::Ident(_) | Token::Open) => {
                    value = value.mul(&self.power()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Poly> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                self.unary()?.neg()
            }
            Some(Token::Plus) => {
                self.bump();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Poly> {
        let base = self.primary()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.bump();

        let exponent = self.unary()?;
        if exponent.degree() != 0 {
            return Err(CalcError::algebra("exponent must be a constant"));
        }
        let exponent = u32::try_from(exponent.coeffs[0])
            .ok()
            .filter(|&e| e <= MAX_EXPONENT)
            .ok_or_else(|| CalcError::algebra("exponent must be a small non-negative integer"))?;
        base.pow(exponent)
    }

    fn primary(&mut self) -> Result<Poly> {
        match self.bump() {
            Some(Token::Number(value)) => Ok(Poly::constant(value)),
            Some(Token::Ident(name)) => match &self.variable {
                Some(existing) if *existing != name => Err(CalcError::algebra(format!(
                    "only one variable is supported (found '{}' and '{}')",
                    existing, name
                ))),
                _ => {
                    self.variable = Some(name);
                    Ok(Poly::variable())
                }
            },
            Some(Token::Open) => {
                let inner = self.expression()?;
                match self.bump() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(CalcError::algebra("missing ')'")),
                }
            }
            other => Err(CalcError::algebra(format!("unexpected token {:?}", other))),
        }
    }
}
