use super::{Kind, Mode, Node};
use crate::value::Value;
use crate::error::ErrorRecord;

impl<'a> Node<'a> {
    /// Requires `name` to be present (in required mode) without inspecting it further.
    pub fn property(&mut self, name: &str) -> &mut Self {
        self.property_with(name, |_| {})
    }

    /// Consumes `name`: for every buffered value that has it, runs `visit` on a
    /// child node wrapping the property value, labelled `name`. Child records are
    /// folded back as `label.name`. A value without `name` is an error in
    /// required mode and skipped in optional mode.
    pub fn property_with<F>(&mut self, name: &str, mut visit: F) -> &mut Self
    where
        F: FnMut(&mut Node<'a>),
    {
        if self.fatal { return self; }
        self.consumed.insert(name.to_owned());

        for i in 0..self.buffer.len() {
            let label = self.iterator_label(i);
            let item: &'a Value = self.buffer[i];

            match item.property(name) {
                Some(value) => {
                    let mut child = Node::scalar(value, name);
                    visit(&mut child);
                    if self.fold(&label, child) { break; }
                }
                None if self.mode == Mode::Required => {
                    self.fail(ErrorRecord::PropertyMissing { target: label, property: name.to_owned() });
                    break;
                }
                None => {}
            }
        }
        self
    }

    /// Shorthand for `property_with(name, |v| { v.type_of(expected); })`.
    pub fn property_type(&mut self, name: &str, expected: Kind) -> &mut Self {
        self.property_with(name, |v| { v.type_of(expected); })
    }

    pub fn property_type_any(&mut self, name: &str, expected: &[Kind]) -> &mut Self {
        self.property_with(name, |v| { v.type_any(expected); })
    }

    /// Requires every buffered value to be a non-null object with no own property
    /// left unconsumed by `property`/`property_type` on this node.
    pub fn no_extra(&mut self) -> &mut Self {
        self.type_of(Kind::Object).not_null();
        if self.fatal { return self; }

        for i in 0..self.buffer.len() {
            let extra: Vec<String> = self.buffer[i].own_keys()
                .into_iter()
                .filter(|key| !self.consumed.contains(key))
                .collect();
            if extra.is_empty() { continue; }

            let target = self.iterator_label(i);
            self.fail(ErrorRecord::PropertyExtra { target, properties: extra });
            break;
        }
        self
    }
}
