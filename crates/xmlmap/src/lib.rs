pub mod parser;
pub mod value;

pub use parser::parse;
pub use value::{Map, PathError, Value, ATTRIBUTE_PREFIX, TEXT_KEY};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlMapError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("document has no root element")]
    NoRootElement,

    #[error("unexpected content after the document element")]
    TrailingContent,

    #[error("unclosed element '{0}'")]
    UnclosedElement(String),
}
