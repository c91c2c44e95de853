use crate::{Error, Result};

/// A value that counts as supplied in a request body.
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Present for i64 {
    fn is_present(&self) -> bool {
        true
    }
}

/// `Missing <field> in request` unless the value is supplied.
pub fn required<T: Present>(field: &str, value: Option<T>) -> Result<T> {
    value.filter(T::is_present).ok_or_else(|| Error::missing_field(field))
}

/// Drops values a partial update should treat as not sent.
pub fn supplied<T: Present>(value: Option<T>) -> Option<T> {
    value.filter(T::is_present)
}
