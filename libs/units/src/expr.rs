//! The `a*b^2/c*d^3` syntax shared by dimension string forms and compound
//! unit names.

use crate::error::{Error, Result};

/// A parsed product/quotient of named terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub numerator: Vec<Term>,
    pub denominator: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub symbol: String,
    pub power: u32,
}

impl Expr {
    pub fn is_one(&self) -> bool {
        self.numerator.is_empty() && self.denominator.is_empty()
    }
}

/// Characters with meaning in the expression syntax; never valid inside a name.
pub(crate) const RESERVED: [char; 3] = ['*', '/', '^'];

/// Whether `name` can be bound in a registry and rendered back unambiguously.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "1"
        && !name.contains(RESERVED)
        && !name.chars().any(char::is_whitespace)
}

pub fn parse(input: &str) -> Result<Expr> {
    let text = input.trim();
    if text.is_empty() {
        return Err(Error::expression(input, "empty expression"));
    }

    let mut sides = text.split('/');
    let numerator = sides.next().unwrap_or_default();
    let denominator = sides.next();
    if sides.next().is_some() {
        return Err(Error::expression(input, "more than one '/'"));
    }

    let numerator = parse_side(input, numerator)?;
    let denominator = match denominator {
        Some(side) => parse_side(input, side)?,
        None => vec![],
    };
    Ok(Expr {
        numerator,
        denominator,
    })
}

fn parse_side(input: &str, side: &str) -> Result<Vec<Term>> {
    let side = side.trim();
    if side.is_empty() {
        return Err(Error::expression(input, "missing terms around '/'"));
    }
    if side == "1" {
        return Ok(vec![]);
    }
    side.split('*').map(|term| parse_term(input, term)).collect()
}

fn parse_term(input: &str, term: &str) -> Result<Term> {
    let term = term.trim();
    let (symbol, power) = match term.split_once('^') {
        Some((symbol, power)) => {
            let power: u32 = power
                .trim()
                .parse()
                .map_err(|_| Error::expression(input, "power must be a positive integer"))?;
            if power == 0 {
                return Err(Error::expression(input, "power must be a positive integer"));
            }
            (symbol.trim(), power)
        }
        None => (term, 1),
    };
    if !is_valid_name(symbol) {
        return Err(Error::expression(input, "empty or malformed term"));
    }
    Ok(Term {
        symbol: symbol.to_string(),
        power,
    })
}
