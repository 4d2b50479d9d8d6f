//! Numeric intervals with the bound grammar used by `range` and `array_within`.
//!
//! | grammar      | meaning       | descriptor |
//! |--------------|---------------|------------|
//! | `(a)`        | `[a, a]`      | `a - a`    |
//! | `(a, b)`     | `[a, b]`      | `a - b`    |
//! | `(a, "+")`   | `[a, +inf)`   | `a+`       |
//! | `(a, "-")`   | `(-inf, a]`   | `a-`       |
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use ordered_float::OrderedFloat;

use crate::error::ContractViolation;
use crate::render;
use crate::value::Value;

/// Second argument of the bound grammar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    /// `(a)`: the singleton `a`.
    Exact,
    /// `(a, b)`: closed interval up to `b`.
    To(f64),
    /// `(a, "+")`
    AtLeast,
    /// `(a, "-")`
    AtMost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Closed,
    AtLeast,
    AtMost,
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NumberRange {
    lower: OrderedFloat<f64>,
    upper: OrderedFloat<f64>,
    shape: Shape,
}

impl From<f64> for Bound {
    fn from(upper: f64) -> Self { Bound::To(upper) }
}

impl FromStr for Bound {
    type Err = ContractViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Bound::AtLeast),
            "-" => Ok(Bound::AtMost),
            _ => s.trim().parse::<f64>()
                .ok()
                .filter(|n| !n.is_nan())
                .map(Bound::To)
                .ok_or_else(|| ContractViolation::BoundNotANumber(s.to_owned())),
        }
    }
}

impl Shape {
    fn lower_bounded(self) -> bool { !matches!(self, Shape::AtMost) }
    fn upper_bounded(self) -> bool { !matches!(self, Shape::AtLeast) }
}

impl NumberRange {
    pub fn new(lower: f64, bound: Bound) -> Result<Self, ContractViolation> {
        if lower.is_nan() {
            return Err(ContractViolation::BoundNotANumber(render::number(lower)));
        }
        let (lower, upper, shape) = match bound {
            Bound::Exact => (lower, lower, Shape::Exact),
            Bound::To(upper) if upper.is_nan() => {
                return Err(ContractViolation::BoundNotANumber(render::number(upper)));
            }
            Bound::To(upper) => (lower, upper, Shape::Closed),
            Bound::AtLeast => (lower, f64::INFINITY, Shape::AtLeast),
            Bound::AtMost => (f64::NEG_INFINITY, lower, Shape::AtMost),
        };
        if upper < lower {
            return Err(ContractViolation::ImpossibleRange { lower, upper });
        }
        Ok(Self { lower: OrderedFloat(lower), upper: OrderedFloat(upper), shape })
    }

    pub fn exact(value: f64) -> Result<Self, ContractViolation> { Self::new(value, Bound::Exact) }

    pub fn lower(&self) -> f64 { self.lower.0 }
    pub fn upper(&self) -> f64 { self.upper.0 }
    pub fn shape(&self) -> Shape { self.shape }

    /// Human form matching the grammar: `a+`, `b-` or `a - b`.
    pub fn descriptor(&self) -> String {
        match self.shape {
            Shape::AtLeast => format!("{}+", render::number(self.lower.0)),
            Shape::AtMost => format!("{}-", render::number(self.upper.0)),
            Shape::Closed | Shape::Exact => {
                format!("{} - {}", render::number(self.lower.0), render::number(self.upper.0))
            }
        }
    }

    /// Truncates the present bounds toward zero, in place.
    pub fn truncate(&mut self) -> &mut Self {
        if self.shape.lower_bounded() { self.lower = OrderedFloat(self.lower.0.trunc()); }
        if self.shape.upper_bounded() { self.upper = OrderedFloat(self.upper.0.trunc()); }
        self
    }

    pub fn contains(&self, value: &Value) -> bool {
        value.as_number().is_some_and(|n| self.contains_number(n))
    }

    pub fn contains_number(&self, n: f64) -> bool {
        if n.is_nan() { return false; }
        if self.shape == Shape::Exact { return n == self.lower.0; }
        if self.shape.lower_bounded() && n < self.lower.0 { return false; }
        !(self.shape.upper_bounded() && n > self.upper.0)
    }

    /// Both bounds present and integral.
    pub fn is_finite(&self) -> bool {
        matches!(self.shape, Shape::Closed | Shape::Exact)
            && self.lower.0.is_finite() && self.lower.0.fract() == 0.0
            && self.upper.0.is_finite() && self.upper.0.fract() == 0.0
    }

    /// Number of integers in the range, or infinity when it is not finite.
    pub fn size(&self) -> f64 {
        if self.is_finite() { self.upper.0 - self.lower.0 + 1.0 } else { f64::INFINITY }
    }

    /// Ascending integers from lower to upper.
    ///
    /// Only meaningful when [`is_finite`](Self::is_finite) holds; otherwise the
    /// sequence is empty.
    pub fn iter(&self) -> RangeInclusive<i64> {
        if !self.is_finite() {
            return 1..=0;
        }
        (self.lower.0 as i64)..=(self.upper.0 as i64)
    }
}

impl IntoIterator for &NumberRange {
    type Item = i64;
    type IntoIter = RangeInclusive<i64>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

// ------------------------------- Tests ------------------------------------ //
