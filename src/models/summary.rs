//! Rendered summary models handed to the Discord layer

/// One name/value entry of a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    pub name: String,
    pub value: String,
}

/// Titled, ordered list of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub fields: Vec<NamedField>,
}
