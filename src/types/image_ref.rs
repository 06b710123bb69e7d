// ABOUTME: Container image reference as (repository, tag).
// ABOUTME: Tags are run-scoped unique tokens, typically a build number.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image repository cannot be empty")]
    EmptyRepository,

    #[error("image tag cannot be empty")]
    EmptyTag,

    #[error("invalid character in image repository: '{0}'")]
    InvalidRepositoryChar(char),

    #[error("invalid character in image tag: '{0}'")]
    InvalidTagChar(char),

    #[error("image tag exceeds maximum length of 128 characters")]
    TagTooLong,
}

/// A built artifact, addressed by repository name and tag.
///
/// Each pipeline run produces exactly one `ImageRef`; the tag is derived from
/// a monotonically increasing build identifier, so every build is uniquely
/// addressable. The reference is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: String,
}

impl ImageRef {
    pub fn new(repository: &str, tag: &str) -> Result<Self, ParseImageRefError> {
        let repository = repository.trim();
        let tag = tag.trim();

        if repository.is_empty() {
            return Err(ParseImageRefError::EmptyRepository);
        }
        if tag.is_empty() {
            return Err(ParseImageRefError::EmptyTag);
        }
        if tag.len() > 128 {
            return Err(ParseImageRefError::TagTooLong);
        }

        for c in repository.chars() {
            let ok = c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | '.' | '-' | '_');
            if !ok {
                return Err(ParseImageRefError::InvalidRepositoryChar(c));
            }
        }

        for c in tag.chars() {
            let ok = c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
            if !ok {
                return Err(ParseImageRefError::InvalidTagChar(c));
            }
        }

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Parse a `repository:tag` string. The tag defaults to `latest`.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        match input.rsplit_once(':') {
            Some((repository, tag)) => Self::new(repository, tag),
            None => Self::new(input, "latest"),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}
