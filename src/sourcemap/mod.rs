mod query;
mod raw;

pub use query::*;

use crate::mappings::Mappings;
use crate::sourcemap::raw::RawSourceMap;
use crate::{Error, Result};
use simd_json_derive::Deserialize;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

/// `SourceMap` is a parsed source map (revision 3) together with its decoded
/// mapping table.
///
/// # Parsing
///
/// - [`SourceMap::parse`] from a JSON string
/// - [`SourceMap::from_slice`] from JSON bytes
/// - [`SourceMap::from_vec`] from an owned JSON buffer, avoiding a copy
///
/// Parsing is all or nothing: on error no model is built.
///
/// Each entry of `sources` is resolved against `sourceRoot` while parsing,
/// and every query works on the resolved identifiers.
///
/// # Querying
///
/// The model is immutable after parsing. All queries take `&self`, and a
/// `SourceMap` can be shared across threads:
/// - [`find_mapping`](SourceMap::find_mapping) / [`finder`](SourceMap::finder)
/// - [`original_position_for`](SourceMap::original_position_for)
/// - [`generated_positions_for`](SourceMap::generated_positions_for)
/// - [`source_content_for`](SourceMap::source_content_for)
/// - [`each_mapping`](SourceMap::each_mapping)
#[derive(Clone)]
pub struct SourceMap {
    pub(crate) file: Option<String>,
    pub(crate) source_root: Option<String>,
    pub(crate) sources: Vec<Option<String>>,
    pub(crate) sources_content: Vec<Option<String>>,
    pub(crate) names: Vec<String>,
    pub(crate) mappings: Mappings,
    pub(crate) reverse_index: OnceLock<ReverseIndex>,
}

impl Debug for SourceMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SourceMap\n")?;
        f.write_str("  sources:\n")?;
        for (idx, source) in self.sources.iter().enumerate() {
            let source = source.as_deref().unwrap_or("");
            let embedded = if matches!(self.sources_content.get(idx), Some(Some(_))) {
                " (embedded)"
            } else {
                ""
            };
            writeln!(f, "    {idx}: {source}{embedded}")?;
        }
        f.write_str("  names:\n")?;
        for (idx, name) in self.names.iter().enumerate() {
            writeln!(f, "    {idx}: {name}")?;
        }
        f.write_str("  mappings:\n")?;
        if let Some((first, rest)) = self.mappings.split_first() {
            let mut last_mapping = first;
            write!(f, "    {:?}", last_mapping)?;
            for mapping in rest {
                if mapping.generated().line != last_mapping.generated().line {
                    f.write_str("\n    ")?;
                } else {
                    f.write_str(", ")?;
                }
                write!(f, "{:?}", mapping)?;
                last_mapping = mapping;
            }
        }
        Ok(())
    }
}

impl SourceMap {
    /// Parses a source map from a JSON string.
    ///
    /// # Errors
    ///
    /// - [Error::MalformedJson] if `json` is not valid JSON of the expected shape
    /// - [Error::UnsupportedVersion] unless `version` is `3`
    /// - [Error::MissingField] if `sources` or `mappings` is absent
    /// - [Error::SourcesContentMismatch] if `sourcesContent` and `sources` differ in length
    /// - any error of [Mappings::decode]
    ///
    /// # Example
    /// ```
    /// # use srcsrv::SourceMap;
    /// let sm = SourceMap::parse(r#"{
    ///     "version": 3,
    ///     "sources": ["a.js"],
    ///     "sourcesContent": ["console.log(1)"],
    ///     "names": [],
    ///     "mappings": "AAAA"
    /// }"#).unwrap();
    /// assert_eq!(sm.source_content_for("a.js", false).unwrap(), Some("console.log(1)"));
    /// ```
    pub fn parse(json: &str) -> Result<Self> {
        Self::from_vec(json.as_bytes().to_vec())
    }

    /// Parses a source map from JSON bytes.
    #[inline]
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        Self::from_vec(json.to_vec())
    }

    /// Parses a source map from an owned JSON buffer.
    ///
    /// The buffer is used as scratch space by the JSON parser. A leading
    /// `)]}'` line, as served to defeat cross-site script inclusion, is
    /// skipped.
    pub fn from_vec(mut json: Vec<u8>) -> Result<Self> {
        strip_xssi_prefix(&mut json);
        let raw = RawSourceMap::from_slice(&mut json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSourceMap<'_>) -> Result<Self> {
        if raw.version != Some(3) {
            return Err(Error::UnsupportedVersion(raw.version));
        }

        let sources = raw.sources.ok_or(Error::MissingField("sources"))?;
        let mappings = raw.mappings.ok_or(Error::MissingField("mappings"))?;
        let names = raw.names.unwrap_or_default();

        let source_root = raw.source_root.filter(|sr| !sr.is_empty());
        let sources = sources
            .into_iter()
            .map(|s| s.map(|source| resolve_source(source_root, source)))
            .collect::<Vec<_>>();

        let sources_content = match raw.sources_content {
            Some(sources_content) => {
                if sources_content.len() != sources.len() {
                    return Err(Error::SourcesContentMismatch {
                        sources: sources.len() as u32,
                        sources_content: sources_content.len() as u32,
                    });
                }
                sources_content
                    .into_iter()
                    .map(|s| s.map(str::to_owned))
                    .collect()
            }
            None => vec![None; sources.len()],
        };

        let mappings = Mappings::decode(mappings, sources.len() as u32, names.len() as u32)?;

        Ok(Self {
            file: raw.file.map(str::to_owned),
            source_root: source_root.map(str::to_owned),
            sources,
            sources_content,
            names: names.into_iter().map(str::to_owned).collect(),
            mappings,
            reverse_index: OnceLock::new(),
        })
    }
}

impl FromStr for SourceMap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl SourceMap {
    /// Always `3`, the only supported revision.
    #[inline]
    pub fn version(&self) -> u32 {
        3
    }

    #[inline]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    #[inline]
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// The `sources` entries, resolved against `sourceRoot`.
    #[inline]
    pub fn sources(&self) -> &[Option<String>] {
        &self.sources
    }

    #[inline]
    pub fn sources_content(&self) -> &[Option<String>] {
        &self.sources_content
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The decoded mapping table, sorted by generated position.
    #[inline]
    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }
}

/// Joins `source` onto `source_root` unless it is already an absolute reference.
///
/// This is plain string manipulation; nothing is looked up.
const XSSI_PREFIX: &[u8] = b")]}'";

/// Drops the first line of `json` if it starts with `)]}'`.
fn strip_xssi_prefix(json: &mut Vec<u8>) {
    if json.starts_with(XSSI_PREFIX) {
        let end = memchr::memchr(b'\n', json).map_or(json.len(), |idx| idx + 1);
        json.drain(..end);
    }
}

pub(crate) fn resolve_source(source_root: Option<&str>, source: &str) -> String {
    match source_root {
        Some(root) if !is_absolute_reference(source) => {
            let root = root.strip_suffix('/').unwrap_or(root);
            format!("{}/{}", root, source)
        }
        _ => source.to_owned(),
    }
}

/// A path starting with `/`, or anything starting with a URL scheme
/// (`https:`, `webpack:`, `file:`, ...).
fn is_absolute_reference(source: &str) -> bool {
    if source.starts_with('/') {
        return true;
    }
    let Some((scheme, _)) = source.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::{is_absolute_reference, resolve_source, SourceMap};
    use crate::{Error, Mapping};

    #[test]
    fn test_parse_fields() {
        let sm = SourceMap::parse(
            r#"{
                "version": 3,
                "file": "out.js",
                "sources": ["a.ts", null],
                "names": ["foo"],
                "mappings": "AAAA,EAAEA;ACCA"
            }"#,
        )
        .unwrap();
        assert_eq!(sm.version(), 3);
        assert_eq!(sm.file(), Some("out.js"));
        assert_eq!(sm.source_root(), None);
        assert_eq!(sm.sources(), [Some("a.ts".to_owned()), None]);
        assert_eq!(sm.sources_content(), [None::<String>, None]);
        assert_eq!(sm.names(), ["foo"]);
        assert_eq!(
            sm.mappings().as_slice(),
            [
                Mapping::new(0, 0).with_source(0, 0, 0),
                Mapping::new(0, 2).with_source(0, 0, 2).with_name(0),
                Mapping::new(1, 0).with_source(1, 1, 2),
            ]
        );
    }

    #[test]
    fn test_parse_xssi_prefix() {
        for json in [
            ")]}'\n{\"version\":3,\"sources\":[\"a.js\"],\"mappings\":\"AAAA\"}",
            ")]}'garbage\r\n{\"version\":3,\"sources\":[\"a.js\"],\"mappings\":\"AAAA\"}",
        ] {
            let sm = SourceMap::parse(json).unwrap();
            assert_eq!(sm.sources(), [Some("a.js".to_owned())]);
            assert_eq!(sm.mappings().len(), 1);
        }

        // only at the very start, and the rest of the line goes with it
        assert!(matches!(
            SourceMap::parse(" )]}'\n{\"version\":3,\"sources\":[],\"mappings\":\"\"}"),
            Err(Error::MalformedJson(..))
        ));
        assert!(matches!(
            SourceMap::parse(")]}'{\"version\":3,\"sources\":[],\"mappings\":\"\"}"),
            Err(Error::MalformedJson(..))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SourceMap::parse(""),
            Err(Error::MalformedJson(..))
        ));
        assert!(matches!(
            SourceMap::parse("{"),
            Err(Error::MalformedJson(..))
        ));
        assert!(matches!(
            SourceMap::parse("{}"),
            Err(Error::UnsupportedVersion(None))
        ));
        assert!(matches!(
            SourceMap::parse(r#"{"version":2,"sources":[],"mappings":""}"#),
            Err(Error::UnsupportedVersion(Some(2)))
        ));
        assert!(matches!(
            SourceMap::parse(r#"{"version":3,"mappings":""}"#),
            Err(Error::MissingField("sources"))
        ));
        assert!(matches!(
            SourceMap::parse(r#"{"version":3,"sources":[]}"#),
            Err(Error::MissingField("mappings"))
        ));
        assert!(matches!(
            SourceMap::parse(
                r#"{"version":3,"sources":["a.js"],"sourcesContent":[],"mappings":""}"#
            ),
            Err(Error::SourcesContentMismatch {
                sources: 1,
                sources_content: 0
            })
        ));
        assert!(matches!(
            SourceMap::parse(r#"{"version":3,"sources":[],"mappings":"AAAA"}"#),
            Err(Error::SourceIndexOutOfRange(0))
        ));
    }

    #[test]
    fn test_source_root() {
        let sm = SourceMap::parse(
            r#"{
                "version": 3,
                "sourceRoot": "https://example.com/src/",
                "sources": ["a.js", "/abs/b.js", "webpack:///c.js", "../d.js"],
                "mappings": ""
            }"#,
        )
        .unwrap();
        assert_eq!(sm.source_root(), Some("https://example.com/src/"));
        assert_eq!(
            sm.sources(),
            [
                Some("https://example.com/src/a.js".to_owned()),
                Some("/abs/b.js".to_owned()),
                Some("webpack:///c.js".to_owned()),
                Some("https://example.com/src/../d.js".to_owned()),
            ]
        );

        let sm = SourceMap::parse(
            r#"{"version":3,"sourceRoot":"","sources":["a.js"],"mappings":""}"#,
        )
        .unwrap();
        assert_eq!(sm.source_root(), None);
        assert_eq!(sm.sources(), [Some("a.js".to_owned())]);
    }

    #[test]
    fn test_resolve_source() {
        assert_eq!(resolve_source(None, "a.js"), "a.js");
        assert_eq!(resolve_source(Some("src"), "a.js"), "src/a.js");
        assert_eq!(resolve_source(Some("src/"), "lib/a.js"), "src/lib/a.js");
        assert_eq!(
            resolve_source(Some("webpack:///"), "src/a.js"),
            "webpack:///src/a.js"
        );
        assert_eq!(resolve_source(Some("src"), "http://x/a.js"), "http://x/a.js");

        assert!(is_absolute_reference("/a.js"));
        assert!(is_absolute_reference("webpack://app/a.js"));
        assert!(is_absolute_reference("git+ssh:a"));
        assert!(!is_absolute_reference("a.js"));
        assert!(!is_absolute_reference("./a:b.js"));
        assert!(!is_absolute_reference("1http:a"));
        assert!(!is_absolute_reference(":a"));
    }

    #[test]
    fn test_debug() {
        let sm = SourceMap::parse(
            r#"{
                "version": 3,
                "sources": ["a.ts", "b.ts"],
                "sourcesContent": ["let a;", null],
                "names": ["a"],
                "mappings": "AAAA,EAAEA;ACCA,C"
            }"#,
        )
        .unwrap();
        insta::assert_snapshot!(format!("{sm:?}"), @r###"
        SourceMap
          sources:
            0: a.ts (embedded)
            1: b.ts
          names:
            0: a
          mappings:
            0:0 -> 0:0:0, 0:2 -> 0:0:2 (0)
            1:0 -> 1:1:2, 1:1
        "###);
    }
}
