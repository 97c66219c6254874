use crate::finder::MappingFinder;
use crate::mapping::{Mapping, Position};
use crate::sourcemap::SourceMap;
use crate::{Error, Result};
use std::collections::HashMap;
use std::iter::FusedIterator;

/// Where a generated position came from.
///
/// Every field is absent when the matched mapping only covers generated code
/// (a single-field segment). `source` may also be absent on its own when the
/// referenced `sources` entry is `null`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OriginalPosition<'a> {
    pub source: Option<&'a str>,
    pub position: Option<Position>,
    pub name: Option<&'a str>,
}

/// A mapping with its indices replaced by the strings they reference.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ResolvedMapping<'a> {
    pub generated: Position,
    pub original: OriginalPosition<'a>,
}

impl SourceMap {
    /// Finds the mapping for a given generated position.
    ///
    /// If an exact match is not found, this method returns the closest preceding mapping.
    /// If there are no preceding mappings, it returns `None`.
    ///
    /// # Example
    /// ```
    /// # use srcsrv::{SourceMap, Position};
    /// let sm = SourceMap::parse(r#"{"version":3,"sources":["a.js"],"mappings":";;UAAU"}"#).unwrap();
    /// assert_eq!(sm.find_mapping((2, 15)).unwrap().generated(), Position::new(2, 10));
    /// assert!(sm.find_mapping((0, 0)).is_none());
    /// ```
    pub fn find_mapping<P>(&self, pos: P) -> Option<Mapping>
    where
        P: Into<Position>,
    {
        self.mappings.find_mapping(pos)
    }

    /// Creates a stateful [MappingFinder] for many nearby lookups.
    pub fn finder(&self) -> MappingFinder<'_> {
        self.mappings.finder()
    }

    /// Translates a generated position into an original one.
    ///
    /// Uses the closest mapping at or before `(line, column)`. Returns `None`
    /// if there is no such mapping.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition<'_>> {
        self.find_mapping((line, column))
            .map(|mapping| self.resolve(&mapping).original)
    }

    /// Returns every generated position mapped to exactly
    /// `(source, line, column)`, ordered by generated position.
    ///
    /// `source` is compared with the resolved `sources` entries. The reverse
    /// index is built on first use and reused afterwards.
    pub fn generated_positions_for(&self, source: &str, line: u32, column: u32) -> &[Position] {
        self.reverse_index
            .get_or_init(|| ReverseIndex::build(self))
            .get(source, Position::new(line, column))
    }

    /// Returns the embedded content of `source`.
    ///
    /// `source` must equal one of the resolved `sources` entries. If several
    /// entries match, the first one with content wins.
    ///
    /// # Errors
    ///
    /// - [Error::UnknownSource] if no entry matches
    /// - [Error::ContentNotEmbedded] if the content is absent and
    ///   `null_if_missing` is `false`; with `true`, `Ok(None)` is returned
    pub fn source_content_for(&self, source: &str, null_if_missing: bool) -> Result<Option<&str>> {
        let mut known = false;
        for (id, candidate) in self.sources.iter().enumerate() {
            if candidate.as_deref() != Some(source) {
                continue;
            }
            known = true;
            if let Some(content) = self.sources_content.get(id).and_then(Option::as_deref) {
                return Ok(Some(content));
            }
        }

        if !known {
            Err(Error::UnknownSource(source.to_owned()))
        } else if null_if_missing {
            Ok(None)
        } else {
            Err(Error::ContentNotEmbedded(source.to_owned()))
        }
    }

    /// Iterates over the non-null sources paired with their embedded content,
    /// in document order.
    pub fn sources_with_content(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.sources
            .iter()
            .zip(&self.sources_content)
            .filter_map(|(source, content)| Some((source.as_deref()?, content.as_deref())))
    }

    /// Returns a fresh iterator over every mapping, resolved.
    ///
    /// Each call starts from the first mapping again; iterating has no
    /// effect on the source map.
    pub fn each_mapping(&self) -> EachMapping<'_> {
        EachMapping {
            map: self,
            cursor: 0,
        }
    }

    fn resolve(&self, mapping: &Mapping) -> ResolvedMapping<'_> {
        let source_info = mapping.source_info();
        ResolvedMapping {
            generated: mapping.generated(),
            original: OriginalPosition {
                source: source_info
                    .and_then(|info| self.sources.get(info.id as usize))
                    .and_then(Option::as_deref),
                position: source_info.map(|info| info.position),
                name: mapping
                    .name_info()
                    .and_then(|id| self.names.get(id as usize))
                    .map(String::as_str),
            },
        }
    }
}

/// Iterator returned by [SourceMap::each_mapping].
#[derive(Debug, Clone)]
pub struct EachMapping<'a> {
    map: &'a SourceMap,
    cursor: usize,
}

impl<'a> Iterator for EachMapping<'a> {
    type Item = ResolvedMapping<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mapping = self.map.mappings.get(self.cursor)?;
        self.cursor += 1;
        Some(self.map.resolve(mapping))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.mappings.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EachMapping<'_> {}

impl FusedIterator for EachMapping<'_> {}

/// Original position -> generated positions, grouped by resolved source.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReverseIndex {
    groups: HashMap<String, HashMap<Position, Vec<Position>>>,
}

impl ReverseIndex {
    fn build(map: &SourceMap) -> Self {
        let mut groups = HashMap::<String, HashMap<Position, Vec<Position>>>::new();

        // duplicate identifiers share one group
        let mut slots = Vec::with_capacity(map.sources.len());
        for source in &map.sources {
            slots.push(source.as_deref().map(|source| {
                if !groups.contains_key(source) {
                    groups.insert(source.to_owned(), HashMap::new());
                }
                source
            }));
        }

        // the table is sorted, so each list comes out sorted too
        for mapping in map.mappings.iter() {
            let Some(info) = mapping.source_info() else {
                continue;
            };
            let Some(Some(source)) = slots.get(info.id as usize) else {
                continue;
            };
            if let Some(group) = groups.get_mut(*source) {
                group
                    .entry(info.position)
                    .or_default()
                    .push(mapping.generated());
            }
        }

        Self { groups }
    }

    fn get(&self, source: &str, original: Position) -> &[Position] {
        self.groups
            .get(source)
            .and_then(|group| group.get(&original))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
