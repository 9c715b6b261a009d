use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("alias '{alias}' is already bound to '{existing}', cannot rebind it to '{attempted}'")]
    DuplicateAlias {
        alias: String,
        existing: String,
        attempted: String,
    },

    #[error("incompatible dimensions: '{from}' vs '{to}'")]
    IncompatibleDimensions { from: String, to: String },

    #[error("exponent must be a positive integer, got {0}")]
    InvalidExponent(i64),

    #[error("dimension power out of range: {0}")]
    PowerOverflow(String),

    #[error("cannot convert '{from}' to '{to}': target matches no component of the compound unit")]
    AmbiguousComponentConversion { from: String, to: String },

    #[error("invalid expression '{input}': {message}")]
    InvalidExpression {
        input: String,
        message: &'static str,
    },

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("invalid scale: {0}")]
    InvalidScale(String),

    #[error("division by zero")]
    DivisionByZero,
}

impl Error {
    pub(crate) fn expression(input: &str, message: &'static str) -> Self {
        Error::InvalidExpression {
            input: input.to_string(),
            message,
        }
    }
}
