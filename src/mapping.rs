use std::fmt::{Debug, Display, Formatter};

/// `Position` represents a zero-based line and zero-based column in a file.
///
/// # Note
///
/// Both the line and the column are 0-based here. Browsers and most stack
/// trace formats print 1-based lines, so callers translating a stack frame
/// usually subtract one from the line first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<(u32, u32)> for Position {
    fn from((line, column): (u32, u32)) -> Self {
        Self::new(line, column)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A position inside the original source with index `id` of `sources`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SourceInfo {
    pub id: u32,
    pub position: Position,
}

impl SourceInfo {
    pub const fn new(id: u32, position: Position) -> Self {
        Self { id, position }
    }
}

/// One decoded segment of the `mappings` field.
///
/// The name is only ever present together with the source information.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Mapping {
    generated: Position,
    source: Option<SourceInfo>,
    name: Option<u32>,
}

impl Debug for Mapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.generated)?;
        if let Some(source_info) = self.source {
            write!(f, " -> {}:{}", source_info.id, source_info.position)?;
            if let Some(name_id) = self.name {
                write!(f, " ({})", name_id)?;
            }
        }
        Ok(())
    }
}

impl Mapping {
    #[inline(always)]
    pub const fn new(generated_line: u32, generated_col: u32) -> Self {
        Self {
            generated: Position::new(generated_line, generated_col),
            source: None,
            name: None,
        }
    }

    #[inline(always)]
    pub const fn with_source(self, source_id: u32, source_line: u32, source_col: u32) -> Self {
        Self {
            source: Some(SourceInfo::new(
                source_id,
                Position::new(source_line, source_col),
            )),
            ..self
        }
    }

    #[inline(always)]
    pub const fn with_name(self, name_id: u32) -> Self {
        Self {
            name: Some(name_id),
            ..self
        }
    }
}

impl Mapping {
    /// Returns the generated position of the mapping.
    #[inline]
    pub fn generated(&self) -> Position {
        self.generated
    }

    /// Returns the source information if available.
    #[inline]
    pub fn source_info(&self) -> Option<SourceInfo> {
        self.source
    }

    #[inline]
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Returns the index into `names` if available.
    #[inline]
    pub fn name_info(&self) -> Option<u32> {
        self.source.and(self.name)
    }

    #[inline]
    pub fn has_name(&self) -> bool {
        self.name_info().is_some()
    }
}
