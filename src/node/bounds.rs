use super::Node;
use crate::error::ErrorRecord;
use crate::range::{Bound, NumberRange};
use crate::value::Value;

impl<'a> Node<'a> {
    /// Requires every buffered value to be [the same](Value::same) as one of
    /// `allowed`. Stops at the first non-member, which is recorded with the full
    /// allowed list.
    pub fn one_of<I>(&mut self, allowed: I) -> &mut Self
    where
        I: IntoIterator<Item = Value>,
    {
        if self.fatal { return self; }
        let allowed: Vec<Value> = allowed.into_iter().collect();

        let miss = self.buffer.iter()
            .position(|v| !allowed.iter().any(|a| a.same(v)));
        if let Some(i) = miss {
            let target = self.iterator_label(i);
            let got = self.buffer[i].clone();
            self.fail(ErrorRecord::ValueMismatch { target, got, allowed });
        }
        self
    }

    pub fn equals(&mut self, expected: impl Into<Value>) -> &mut Self {
        self.one_of([expected.into()])
    }

    /// Requires every buffered value to read as a number inside the range given
    /// in the bound grammar. Values that do not read as numbers are out of range.
    ///
    /// # Panics
    ///
    /// If the bound is impossible or not a number.
    pub fn range(&mut self, lower: f64, upper: impl Into<Bound>) -> &mut Self {
        if self.fatal { return self; }
        let range = NumberRange::new(lower, upper.into()).unwrap_or_else(|e| panic!("{e}"));
        self.within(&range)
    }

    pub fn within(&mut self, range: &NumberRange) -> &mut Self {
        if self.fatal { return self; }

        if let Some(i) = self.buffer.iter().position(|v| !range.contains(v)) {
            let target = self.iterator_label(i);
            let got = self.buffer[i].clone();
            self.fail(ErrorRecord::ValueBound { target, got, bound: range.descriptor() });
        }
        self
    }
}
