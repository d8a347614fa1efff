//! Path template parsing
//!
//! Templates are `/`-delimited. A segment starting with `:` names a parameter;
//! every other segment is literal. Empty segments are discarded, so leading,
//! trailing and duplicate slashes carry no meaning.

/// Prefix marking a parameter segment
pub const PARAM_PREFIX: char = ':';

/// A single segment of a path template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(PARAM_PREFIX) {
            Some(name) => Self::Param(name),
            None => Self::Literal(raw),
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Self::Param(_))
    }
}

/// Split a concrete path into its non-empty segments
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// A parsed path template borrowing from its source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> PathTemplate<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let segments = split_segments(raw).into_iter().map(Segment::parse).collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of parameter segments
    pub fn param_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_param()).count()
    }

    /// True when the template has no parameter segments
    pub fn is_literal(&self) -> bool {
        self.param_count() == 0
    }
}
