//! Hash compiler: the fragment as a single segment.

use crate::escape::{decode, FRAGMENT};
use crate::segment::Placement;
use crate::trace::{Observer, TraceStep, Zone};
use crate::{Params, ReverseError, Segment, TemplateError};
use percent_encoding::utf8_percent_encode;

/// Compiled hash zone of a template.
///
/// A template without `#` compiles to the empty literal, so it only matches
/// URLs that carry no fragment (or an empty one).
#[derive(Debug, Clone)]
pub struct HashMatcher {
    segment: Segment,
}

impl HashMatcher {
    /// Compile the hash zone of a shielded template (without the leading `#`).
    pub(crate) fn compile(raw: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            segment: Segment::parse(raw, Placement::Hash)?,
        })
    }

    /// The compiled segment.
    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Match the candidate fragment (`None` when the URL has no `#`).
    pub(crate) fn capture<O: Observer>(
        &self,
        fragment: Option<&str>,
        params: &mut Params,
        observer: &mut O,
    ) -> bool {
        let value = decode(fragment.unwrap_or(""));
        let outcome = self.segment.match_value(&value);
        if let Some(name) = outcome.binding {
            params.insert(name, Some(value.to_string()));
        }
        observer.record(|| TraceStep::Segment {
            zone: Zone::Hash,
            position: String::new(),
            segment: self.segment.to_string(),
            observed: value.to_string(),
            matched: outcome.satisfied,
        });
        if !outcome.satisfied {
            tracing::trace!(segment = %self.segment, "hash rejected");
        }
        outcome.satisfied
    }

    /// Render `#value` into `out`. Nothing is written for an empty value.
    pub(crate) fn render(&self, params: &Params, out: &mut String) -> Result<(), ReverseError> {
        match self.segment.render(params)? {
            Some(value) if !value.is_empty() => {
                out.push('#');
                out.extend(utf8_percent_encode(value, FRAGMENT));
            }
            _ => {}
        }
        Ok(())
    }
}
