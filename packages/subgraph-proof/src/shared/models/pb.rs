//! Pseudo-Boolean text forms shared by the model and the proof
//!
//! ```text
//! 1 x1 1 x2 1 x3 >= 1 ;          PbConstraint
//! -1 x1 -1 x2 -1 x3 >= -1 ;      PbConstraint with negative coefficients
//! p 12 14 + 15 + 0               PolishSum
//! p 20 2 * 21 + 22 + 3 d 0       PolishSum with multiply / divide
//! ```

use super::line::LineNumber;
use std::fmt::{self, Write};

/// A variable token, optionally negated: `x<name>` or `~x<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    name: &'a str,
    negated: bool,
}

impl<'a> Literal<'a> {
    pub fn pos(name: &'a str) -> Self {
        Self {
            name,
            negated: false,
        }
    }

    pub fn neg(name: &'a str) -> Self {
        Self {
            name,
            negated: true,
        }
    }

    pub fn with_polarity(name: &'a str, positive: bool) -> Self {
        Self {
            name,
            negated: !positive,
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("~")?;
        }
        write!(f, "x{}", self.name)
    }
}

/// `c1 l1 c2 l2 ... >= degree ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbConstraint<'a> {
    terms: Vec<(i64, Literal<'a>)>,
    degree: i64,
}

impl<'a> PbConstraint<'a> {
    pub fn new(degree: i64) -> Self {
        Self {
            terms: Vec::new(),
            degree,
        }
    }

    /// Clause: every literal with coefficient 1, degree 1
    pub fn clause(literals: impl IntoIterator<Item = Literal<'a>>) -> Self {
        let mut c = Self::new(1);
        for lit in literals {
            c.push(1, lit);
        }
        c
    }

    /// Sum of `names` at least one
    pub fn at_least_one(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::clause(names.into_iter().map(Literal::pos))
    }

    /// Sum of `names` at most one, written as `-1 x ... >= -1`
    pub fn at_most_one(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut c = Self::new(-1);
        for name in names {
            c.push(-1, Literal::pos(name));
        }
        c
    }

    pub fn push(&mut self, coeff: i64, lit: Literal<'a>) -> &mut Self {
        self.terms.push((coeff, lit));
        self
    }

    pub fn term(mut self, coeff: i64, lit: Literal<'a>) -> Self {
        self.terms.push((coeff, lit));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for PbConstraint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (coeff, lit) in &self.terms {
            write!(f, "{} {} ", coeff, lit)?;
        }
        write!(f, ">= {} ;", self.degree)
    }
}

/// Reverse-Polish linear combination of earlier lines, rendered `p ... 0`.
///
/// The first addend is pushed bare, every later one is followed by `+`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolishSum {
    text: String,
    addends: usize,
}

impl PolishSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_with(line: LineNumber) -> Self {
        let mut sum = Self::new();
        sum.add(line);
        sum
    }

    pub fn add(&mut self, line: LineNumber) -> &mut Self {
        if self.addends == 0 {
            let _ = write!(self.text, " {}", line);
        } else {
            let _ = write!(self.text, " {} +", line);
        }
        self.addends += 1;
        self
    }

    pub fn add_all(&mut self, lines: impl IntoIterator<Item = LineNumber>) -> &mut Self {
        for line in lines {
            self.add(line);
        }
        self
    }

    /// Multiply the running total
    pub fn multiply(&mut self, factor: u64) -> &mut Self {
        let _ = write!(self.text, " {} *", factor);
        self
    }

    /// Divide the running total, rounding up
    pub fn divide(&mut self, divisor: u64) -> &mut Self {
        let _ = write!(self.text, " {} d", divisor);
        self
    }

    pub fn addends(&self) -> usize {
        self.addends
    }

    pub fn is_empty(&self) -> bool {
        self.addends == 0
    }
}

impl fmt::Display for PolishSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{} 0", self.text)
    }
}
