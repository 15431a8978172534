use thiserror::Error;

/// Errors raised while building a [`Registry`](crate::Registry).
///
/// These describe a broken declaration, not bad user input, so they are
/// reported before any token is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("option declares no keys")]
    NoKeys,

    #[error("invalid option key '{key}': keys may only contain ASCII letters and digits")]
    InvalidKey { key: String },

    #[error("duplicated option key: {key}")]
    DuplicateKey { key: String },

    #[error("option '{key}' takes a value but has no meta value")]
    MissingMetaValue { key: String },

    #[error("positional argument has an empty meta value")]
    EmptyMetaValue,

    #[error("invalid option prefix '{0}'")]
    InvalidPrefix(char),

    #[error("invalid value delimiter '{0}'")]
    InvalidDelimiter(char),

    #[error("at least one value delimiter is required")]
    NoDelimiters,
}

/// The reason a token sequence was rejected.
///
/// Only the first violation is reported; parsing stops there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty argument")]
    EmptyToken,

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("argument {0} cannot be given more than once")]
    ArgumentRepeated(String),

    #[error("missing option name after prefix")]
    BarePrefix,

    #[error("malformed option: {0}")]
    MalformedOption(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} cannot be used multiple times")]
    OptionRepeated(String),

    #[error("option {0} requires a value")]
    MissingValue(String),

    #[error("option {0} does not take a value")]
    UnexpectedValue(String),

    #[error("missing required argument: {0}")]
    MissingArgument(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
