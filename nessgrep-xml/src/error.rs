#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("xml syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("malformed attribute on <{element}>: {message}")]
    Attribute { element: String, message: String },
    #[error("invalid character data: {0}")]
    Text(String),
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRootElement,
    #[error("document has more than one root element (second is <{0}>)")]
    MultipleRoots(String),
    #[error("text outside of the root element")]
    TextOutsideRoot,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
