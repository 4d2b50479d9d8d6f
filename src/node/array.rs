use super::{Kind, Node};
use crate::error::{ContractViolation, ErrorRecord};
use crate::range::{Bound, NumberRange};
use crate::value::Value;

impl<'a> Node<'a> {
    /// Requires the wrapped value to be an array, then flattens: from here on
    /// every constraint applies to each element, labelled `label[i]`.
    ///
    /// # Panics
    ///
    /// If the node is already flattened. Nested arrays go through
    /// [`each`](Self::each) or [`match_array`](Self::match_array).
    pub fn array(&mut self) -> &mut Self {
        self.flatten(None)
    }

    /// [`array`](Self::array) with a length bound in the range grammar; bounds are
    /// truncated to integers first.
    ///
    /// # Panics
    ///
    /// If the node is already flattened, or if the bound is impossible and the
    /// node is not yet fatal.
    pub fn array_within(&mut self, lower: f64, upper: impl Into<Bound>) -> &mut Self {
        self.flatten(Some((lower, upper.into())))
    }

    fn flatten(&mut self, bound: Option<(f64, Bound)>) -> &mut Self {
        if self.array_mode {
            panic!("{}", ContractViolation::NestedArray);
        }
        if self.fatal { return self; }

        let bound = bound.map(|(lower, upper)| {
            let mut bound = NumberRange::new(lower, upper).unwrap_or_else(|e| panic!("{e}"));
            *bound.truncate()
        });
        self.check_array();
        if self.fatal { return self; }

        let Some(items) = self.buffer.first().and_then(|&v| v.elements()) else {
            return self;
        };
        if let Some(bound) = bound {
            if !bound.contains_number(items.len() as f64) {
                let target = self.label.clone();
                self.fail(ErrorRecord::ArrayBound { target, bound: bound.descriptor() });
            }
        }

        // the node now speaks for a different population of values
        self.buffer = items.iter().collect();
        self.array_mode = true;
        self.type_checked = false;
        self.null_checked = false;
        self.matches.reset();
        self.consumed.clear();
        self
    }

    /// Scalar-mode check that every buffered value is an array. No-op once flattened.
    pub(super) fn check_array(&mut self) {
        if self.array_mode { return; }
        self.type_of(Kind::Object);
        if self.fatal { return; }

        if let Some(i) = self.buffer.iter().position(|v| !v.is_array()) {
            let target = self.iterator_label(i);
            self.fail(ErrorRecord::TypeNotArray { target });
        }
    }

    /// Runs `visit` on a child for every element of every buffered sequence,
    /// labelled `label[i]`. Stops at the first child that ends fatal.
    pub fn each<F>(&mut self, mut visit: F) -> &mut Self
    where
        F: FnMut(&mut Node<'a>),
    {
        self.type_of(Kind::Object).not_null();
        if self.fatal { return self; }

        for i in 0..self.buffer.len() {
            let label = self.iterator_label(i);
            let item: &'a Value = self.buffer[i];
            let Some(elements) = item.elements() else {
                self.fail(ErrorRecord::TypeNotArray { target: label });
                return self;
            };

            for (index, element) in elements.iter().enumerate() {
                let mut child = Node::scalar(element, format!("{label}[{index}]"));
                visit(&mut child);
                if self.fold("", child) { return self; }
            }
        }
        self
    }
}
