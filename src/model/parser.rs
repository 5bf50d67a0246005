use super::*;
use std::num::ParseIntError;
use thiserror::Error;

/// Why a single positional record could not become an entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field `{field}` (expected at column {index})")]
    MissingField { field: &'static str, index: usize },

    #[error("field `{field}` = {value:?} is not a 64-bit integer: {cause}")]
    InvalidInteger {
        field: &'static str,
        value: String,
        #[source]
        cause: ParseIntError,
    },
}

fn field<'a, S: AsRef<str>>(
    fields: &'a [S],
    index: usize,
    name: &'static str,
) -> Result<&'a str, ParseError> {
    fields
        .get(index)
        .map(|f| f.as_ref())
        .ok_or(ParseError::MissingField { field: name, index })
}

fn int_field<S: AsRef<str>>(
    fields: &[S],
    index: usize,
    name: &'static str,
) -> Result<i64, ParseError> {
    let raw = field(fields, index, name)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|cause| ParseError::InvalidInteger {
            field: name,
            value: raw.to_string(),
            cause,
        })
}

impl Actor {
    /// `[id, username]`
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, ParseError> {
        Ok(Self {
            id: int_field(fields, 0, "id")?,
            username: field(fields, 1, "username")?.to_string(),
            events: Vec::new(),
        })
    }
}

impl Commit {
    /// `[sha, message, event_id]`
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, ParseError> {
        Ok(Self {
            sha: field(fields, 0, "sha")?.to_string(),
            message: field(fields, 1, "message")?.to_string(),
            event_id: int_field(fields, 2, "event_id")?,
        })
    }
}

impl Event {
    /// `[id, type, actor_id, repo_id]`
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, ParseError> {
        Ok(Self {
            id: int_field(fields, 0, "id")?,
            event_type: field(fields, 1, "type")?.to_string(),
            actor_id: int_field(fields, 2, "actor_id")?,
            repo_id: int_field(fields, 3, "repo_id")?,
            commits: Vec::new(),
        })
    }
}

impl Repo {
    /// `[id, name]`
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, ParseError> {
        Ok(Self {
            id: int_field(fields, 0, "id")?,
            name: field(fields, 1, "name")?.to_string(),
            events: Vec::new(),
        })
    }
}
