//! Tag-keyed field handler dispatch.
//!
//! A [`FieldMap`] maps field tags to an ordered list of handlers. Walking a
//! record with [`FieldMap::apply`] visits every field once, in record order,
//! and invokes each handler registered for that field's tag in registration
//! order. Several independent rules can therefore share one tag (tag 008
//! feeds both `dc:date` and `dc:language`) without knowing about each other.
//!
//! Handlers write into a caller-chosen accumulator `T`, which keeps the map
//! itself free of shared mutable state.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::field_map::FieldMap;
//! use marcx_oai::Record;
//!
//! let record = Record::from_line_format("008 00 *a2001 *ldan")?;
//!
//! let mut map: FieldMap<Vec<String>> = FieldMap::new();
//! map.put("008", |field, out| out.extend(field.get_subfield('a').map(String::from)));
//! map.put("008", |field, out| out.extend(field.get_subfield('l').map(String::from)));
//!
//! let mut values = Vec::new();
//! map.apply(&record, &mut values);
//! assert_eq!(values, vec!["2001", "dan"]);
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::record::{Field, Record};

/// A handler invoked once per occurrence of a field with a registered tag.
pub type FieldHandler<T> = Box<dyn Fn(&Field, &mut T) + Send + Sync>;

/// Mapping from field tag to the ordered handlers registered for it.
pub struct FieldMap<T> {
    handlers: IndexMap<String, Vec<FieldHandler<T>>>,
}

impl<T> FieldMap<T> {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        FieldMap {
            handlers: IndexMap::new(),
        }
    }

    /// Register a handler for `tag`, after any handlers already registered for it
    pub fn put<F>(&mut self, tag: &str, handler: F)
    where
        F: Fn(&Field, &mut T) + Send + Sync + 'static,
    {
        self.handlers
            .entry(tag.to_string())
            .or_default()
            .push(Box::new(handler));
    }

    /// Visit every field of `record` in order and run the handlers registered for its tag
    pub fn apply(&self, record: &Record, acc: &mut T) {
        for field in record.fields() {
            if let Some(handlers) = self.handlers.get(&field.tag) {
                for handler in handlers {
                    handler(field, acc);
                }
            }
        }
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: Vec<(&str, usize)> = self
            .handlers
            .iter()
            .map(|(tag, handlers)| (tag.as_str(), handlers.len()))
            .collect();
        f.debug_struct("FieldMap").field("handlers", &counts).finish()
    }
}
