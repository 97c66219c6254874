use crate::finder::{MappingFinder, MappingFinderImpl};
use crate::mapping::{Mapping, Position};
use crate::splitter::Splitter;
use crate::vlq::SegmentDecoder;
use crate::{Error, Result};
use std::ops::Deref;

/// `Mappings` is the decoded mapping table: every [Mapping] of a source map,
/// ordered by generated position.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Mappings(Vec<Mapping>);

impl Deref for Mappings {
    type Target = [Mapping];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Mappings {
    /// Decodes a `mappings` string.
    ///
    /// `sources` and `names` are the lengths of the corresponding arrays and
    /// bound the indices a segment may reference. Decoding is all or nothing.
    ///
    /// The returned table is sorted by generated position. Encoders are not
    /// trusted to emit segments in order, so out-of-order segments are sorted
    /// (stably, so equal positions keep their decode order).
    pub fn decode(mappings: &str, sources: u32, names: u32) -> Result<Self> {
        let mut state = DecodeState::default();
        let mut decoder = SegmentDecoder::new();

        // the ratio of mappings.len to the number of segments is generally
        // between 5 and 7
        let mut table = Vec::with_capacity(mappings.len() / 6);

        for line in Splitter::new(mappings, b';') {
            if !line.is_empty() {
                for segment in Splitter::new(line, b',') {
                    let fields = decoder.decode(segment)?;
                    table.push(state.apply(segment, fields, sources, names)?);
                }
            }

            state.next_line();
        }

        if table
            .windows(2)
            .any(|w| w[0].generated() > w[1].generated())
        {
            table.sort_by_key(Mapping::generated);
        }

        Ok(Self(table))
    }

    /// see [find_mapping](crate::SourceMap::find_mapping).
    pub fn find_mapping<P>(&self, pos: P) -> Option<Mapping>
    where
        P: Into<Position>,
    {
        MappingFinderImpl::new(self).find(pos.into())
    }

    /// see [finder](crate::SourceMap::finder).
    pub fn finder(&self) -> MappingFinder<'_> {
        MappingFinder::new(self)
    }

    /// Returns the decoded table as a slice.
    pub fn as_slice(&self) -> &[Mapping] {
        &self.0
    }
}

/// Running accumulators of the delta encoding.
///
/// Only the generated column is reset at a new generated line; the other
/// fields carry over for the whole document.
#[derive(Debug, Default, Copy, Clone)]
struct DecodeState {
    generated_line: u32,
    generated_col: i64,
    source_id: i64,
    source_line: i64,
    source_col: i64,
    name_id: i64,
}

impl DecodeState {
    fn next_line(&mut self) {
        self.generated_line += 1;
        self.generated_col = 0;
    }

    fn apply(&mut self, segment: &str, fields: &[i32], sources: u32, names: u32) -> Result<Mapping> {
        self.generated_col += fields[0] as i64;
        let generated_col = to_position(self.generated_col, segment)?;
        let mut mapping = Mapping::new(self.generated_line, generated_col);

        if let [_, source_id, source_line, source_col, rest @ ..] = fields {
            self.source_id += *source_id as i64;
            if !(0..sources as i64).contains(&self.source_id) {
                return Err(Error::SourceIndexOutOfRange(self.source_id));
            }

            self.source_line += *source_line as i64;
            self.source_col += *source_col as i64;
            mapping = mapping.with_source(
                self.source_id as u32,
                to_position(self.source_line, segment)?,
                to_position(self.source_col, segment)?,
            );

            if let [name_id] = rest {
                self.name_id += *name_id as i64;
                if !(0..names as i64).contains(&self.name_id) {
                    return Err(Error::NameIndexOutOfRange(self.name_id));
                }
                mapping = mapping.with_name(self.name_id as u32);
            }
        }

        Ok(mapping)
    }
}

#[inline]
fn to_position(value: i64, segment: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::InvalidPosition(segment.to_owned()))
}
