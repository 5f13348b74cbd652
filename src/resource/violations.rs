//! Collects the names of invalid fields while validating a resource.

use crate::resource::check::{self, FieldType};

use serde::Serialize;

/// Ordered list of invalid field paths.
///
/// Nested fields are joined with `.` and array elements use `[index]`, so a
/// bad city inside the third address reads `addresses[2].city`.
///
/// ```rust
/// use dynamodb_resource::resource::{check::FieldType, violations::Violations};
///
/// let mut violations = Violations::default();
/// violations
///     .check("name", &Some("  "), FieldType::String)
///     .check_optional("email", &None::<String>, FieldType::Email)
///     .nested("address", vec!["city".to_string()]);
/// assert_eq!(violations.into_vec(), vec!["name", "address.city"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations {
    fields: Vec<String>,
}

impl Violations {
    /// Flags `field` unconditionally.
    pub fn push(&mut self, field: impl Into<String>) -> &mut Self {
        self.fields.push(field.into());
        self
    }

    /// Flags `field` unless `valid` holds.
    pub fn ensure(&mut self, field: &str, valid: bool) -> &mut Self {
        if !valid {
            self.push(field);
        }
        self
    }

    /// Flags `field` when `value` is empty for `kind`.
    pub fn check<T: Serialize + ?Sized>(
        &mut self,
        field: &str,
        value: &T,
        kind: FieldType,
    ) -> &mut Self {
        self.ensure(field, !check::is_blank(value, Some(kind)))
    }

    /// Like [`check`](Self::check) but a `None` value is accepted.
    pub fn check_optional<T: Serialize>(
        &mut self,
        field: &str,
        value: &Option<T>,
        kind: FieldType,
    ) -> &mut Self {
        match value {
            Some(value) => self.check(field, value, kind),
            None => self,
        }
    }

    /// Flags `field[index]` for every element of `values` that is empty for `kind`.
    pub fn check_each<T: Serialize>(
        &mut self,
        field: &str,
        values: &[T],
        kind: FieldType,
    ) -> &mut Self {
        for (index, value) in values.iter().enumerate() {
            if check::is_blank(value, Some(kind)) {
                self.push(format!("{field}[{index}]"));
            }
        }
        self
    }

    /// Prefixes the violations of a nested resource with `field.`.
    pub fn nested(&mut self, field: &str, violations: impl IntoIterator<Item = String>) -> &mut Self {
        self.fields
            .extend(violations.into_iter().map(|sub| format!("{field}.{sub}")));
        self
    }

    /// Prefixes the violations of each nested resource in a list with `field[index].`.
    pub fn each<I>(&mut self, field: &str, violations: I) -> &mut Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        for (index, element) in violations.into_iter().enumerate() {
            self.nested(&format!("{field}[{index}]"), element);
        }
        self
    }

    /// Appends already qualified field paths.
    pub fn extend(&mut self, fields: impl IntoIterator<Item = String>) -> &mut Self {
        self.fields.extend(fields);
        self
    }

    /// Whether no field was flagged.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The flagged field paths, in the order they were found.
    pub fn into_vec(self) -> Vec<String> {
        self.fields
    }
}

impl From<Violations> for Vec<String> {
    fn from(violations: Violations) -> Self {
        violations.into_vec()
    }
}
