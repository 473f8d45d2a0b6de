use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Strict deserialization found no variant for the token.
    #[error("`{type_name}` has no variant matching {token:?}")]
    NoMatch { type_name: String, token: String },

    #[error("`{type_name}` is read from a string or number token, found {found}")]
    NotScalar { type_name: String, found: &'static str },

    #[error("`{type_name}` declares variant `{name}` more than once")]
    DuplicateVariant { type_name: String, name: String },

    #[error("`{type_name}` declares field `{name}` more than once")]
    DuplicateField { type_name: String, name: String },

    #[error("field `{field}` of `{type_name}` holds {found} values for {expected} variants")]
    FieldArity {
        type_name: String,
        field: String,
        found: usize,
        expected: usize,
    },

    #[error("catalog `{type_name}`: {message}")]
    Catalog { type_name: String, message: String },

    #[error("at JSON path {path} → {message}")]
    Path { path: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
