use std::error::Error as StdError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("source map syntax error: {0}")]
    MalformedJson(Box<dyn StdError + Send + Sync>),
    #[error("unsupported source map version: {}", display_version(.0))]
    UnsupportedVersion(Option<u32>),
    #[error("source map is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("malformed VLQ value in segment \"{0}\"")]
    MalformedVlq(String),
    #[error("segment \"{segment}\" has {fields} fields, expected 1, 4 or 5")]
    InvalidSegmentArity { segment: String, fields: usize },
    #[error("a mapping references unknown source #{0}")]
    SourceIndexOutOfRange(i64),
    #[error("a mapping references unknown name #{0}")]
    NameIndexOutOfRange(i64),
    #[error("segment \"{0}\" resolves to a position outside the 32-bit range")]
    InvalidPosition(String),
    #[error(
        "source map has {} sources but {} sourcesContent entries",
        sources,
        sources_content
    )]
    SourcesContentMismatch { sources: u32, sources_content: u32 },
    #[error("unknown source \"{0}\"")]
    UnknownSource(String),
    #[error("content of source \"{0}\" is not embedded in the source map")]
    ContentNotEmbedded(String),
}

fn display_version(version: &Option<u32>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "<missing>".to_owned(),
    }
}

impl From<simd_json::Error> for Error {
    fn from(value: simd_json::Error) -> Self {
        Self::MalformedJson(Box::new(value))
    }
}
