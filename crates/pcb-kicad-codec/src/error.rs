use pcb_sexpr::{LexError, ParseError};

/// Failures binding a primitive tree to schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected a list at byte {offset}")]
    NotAList { offset: usize },

    #[error("list at byte {offset} does not start with a symbol")]
    MissingHead { offset: usize },

    #[error("expected `({expected} ...)`, found `({found} ...)` at byte {offset}")]
    UnexpectedTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("no schema registered for `{tag}` (byte {offset})")]
    UnknownTag { tag: String, offset: usize },

    #[error("`{tag}` field `{field}` expects {expected}, found `{found}` at byte {offset}")]
    TypeMismatch {
        tag: &'static str,
        field: &'static str,
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("`{tag}` at byte {offset} is missing required positional `{field}`")]
    MissingRequiredPositional {
        tag: &'static str,
        field: &'static str,
        offset: usize,
    },

    #[error("expected exactly one top-level form, found {found}")]
    ExpectedSingleForm { found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("`{tag}` is missing required field `{field}`")]
    MissingRequiredField {
        tag: &'static str,
        field: &'static str,
    },

    #[error("`{tag}` field `{field}` holds a value of the wrong kind")]
    InvalidValue {
        tag: &'static str,
        field: &'static str,
    },
}

/// Misuse of the typed node API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("`{tag}` has no field `{field}`")]
    UnknownField { tag: &'static str, field: String },

    #[error("`{tag}` field `{field}` expects {expected}")]
    KindMismatch {
        tag: &'static str,
        field: &'static str,
        expected: &'static str,
    },
}

/// Any failure of the text-to-node pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl From<pcb_sexpr::Error> for Error {
    fn from(err: pcb_sexpr::Error) -> Self {
        match err {
            pcb_sexpr::Error::Lex(e) => Error::Lex(e),
            pcb_sexpr::Error::Parse(e) => Error::Parse(e),
        }
    }
}
