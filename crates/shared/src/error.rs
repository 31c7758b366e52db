use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown customer field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' cannot be used as a filter")]
    NotFilterable(String),
    #[error("invalid filter '{0}': expected campo=valor")]
    MalformedFilter(String),
}
