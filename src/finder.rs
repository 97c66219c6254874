use crate::mapping::{Mapping, Position};
use crate::mappings::Mappings;
use std::cell::Cell;

// queries this close to the previous one (same line) are answered by a scan
const LINEAR_SEARCH_DISTANCE: u32 = 32;

type FinderState = (
    // the queried position of the last finding
    Position,
    // result index in mappings of the last finding
    usize,
);

/// `MappingFinder` is a helper for finding many mappings within one
/// [SourceMap](crate::SourceMap).
///
/// It remembers the last hit, which makes it efficient when traversing the
/// generated file in small increments (e.g., mapping every token of a
/// minified line from start to finish).
///
/// Results are identical to [find_mapping](crate::SourceMap::find_mapping).
#[derive(Debug)]
pub struct MappingFinder<'a> {
    state: Cell<Option<FinderState>>,
    finder: MappingFinderImpl<'a>,
}

impl<'a> MappingFinder<'a> {
    pub(crate) fn new(mappings: &'a Mappings) -> Self {
        Self {
            state: Cell::new(None),
            finder: MappingFinderImpl::new(mappings),
        }
    }

    /// Finds the mapping for a given generated position.
    ///
    /// If an exact match is not found, this method returns the closest preceding mapping.
    /// If there are no preceding mappings, it returns `None`.
    pub fn find_mapping<P>(&self, pos: P) -> Option<Mapping>
    where
        P: Into<Position>,
    {
        let pos = pos.into();
        let found = match self.state.get() {
            Some(last) => self.finder.find_index_from(pos, last),
            None => self.finder.find_index(pos),
        };
        self.state.set(found.map(|idx| (pos, idx)));
        found.map(|idx| self.finder.mappings[idx])
    }
}

#[derive(Debug)]
pub(crate) struct MappingFinderImpl<'a> {
    mappings: &'a [Mapping],
}

impl<'a> MappingFinderImpl<'a> {
    pub(crate) fn new(mappings: &'a Mappings) -> Self {
        Self {
            mappings: mappings.as_slice(),
        }
    }

    #[inline]
    pub(crate) fn find(&self, pos: Position) -> Option<Mapping> {
        self.find_index(pos).map(|idx| self.mappings[idx])
    }

    /// Index of the last mapping whose generated position is <= `pos`.
    pub(crate) fn find_index(&self, pos: Position) -> Option<usize> {
        Self::last_not_after(self.mappings, pos)
    }

    fn find_index_from(&self, pos: Position, (last_pos, last_idx): FinderState) -> Option<usize> {
        let nearby = pos.line == last_pos.line
            && pos.column.abs_diff(last_pos.column) <= LINEAR_SEARCH_DISTANCE;

        if pos >= last_pos {
            // mappings[last_idx] <= last_pos <= pos
            let tail = &self.mappings[last_idx + 1..];
            let advanced = if nearby {
                tail.iter().take_while(|m| m.generated() <= pos).count()
            } else {
                tail.partition_point(|m| m.generated() <= pos)
            };
            Some(last_idx + advanced)
        } else {
            // mappings[last_idx + 1] > last_pos > pos
            let head = &self.mappings[..=last_idx];
            if nearby {
                head.iter().rposition(|m| m.generated() <= pos)
            } else {
                Self::last_not_after(head, pos)
            }
        }
    }

    fn last_not_after(mappings: &[Mapping], pos: Position) -> Option<usize> {
        mappings
            .partition_point(|m| m.generated() <= pos)
            .checked_sub(1)
    }
}
