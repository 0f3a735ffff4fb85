//! Path compiler: ordered segments with exact arity.

use crate::escape::{decode, PATH_SEGMENT};
use crate::segment::Placement;
use crate::trace::{Observer, TraceStep, Zone};
use crate::{Params, ReverseError, Segment, TemplateError};
use percent_encoding::utf8_percent_encode;

/// Compiled path zone of a template.
///
/// # INV: arity
///
/// A candidate path matches only if it has exactly as many segments as the
/// template. There are no prefix matches and no variable-length segments.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    segments: Vec<Segment>,
}

impl PathMatcher {
    /// Compile the path zone of a shielded template (`/a/:b<...>/c`).
    pub(crate) fn compile(raw: &str) -> Result<Self, TemplateError> {
        let segments = split_path(raw)
            .map(|atom| Segment::parse(atom, Placement::Path))
            .collect::<Result<_, _>>()?;
        Ok(Self { segments })
    }

    /// The compiled segments, in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments a candidate path must have.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.segments.len()
    }

    /// Match a candidate path (as produced by the URL parser, still encoded).
    pub(crate) fn capture<O: Observer>(
        &self,
        path: &str,
        params: &mut Params,
        observer: &mut O,
    ) -> bool {
        let candidate: Vec<_> = split_path(path).map(decode).collect();

        if candidate.len() != self.segments.len() {
            tracing::trace!(
                expected = self.segments.len(),
                actual = candidate.len(),
                "path arity mismatch"
            );
            observer.record(|| TraceStep::ArityMismatch {
                expected: self.segments.len(),
                actual: candidate.len(),
            });
            return false;
        }

        let mut matched = true;
        for (index, (segment, value)) in self.segments.iter().zip(&candidate).enumerate() {
            let outcome = segment.match_value(value);
            if let Some(name) = outcome.binding {
                params.insert(name, Some(value.to_string()));
            }
            observer.record(|| TraceStep::Segment {
                zone: Zone::Path,
                position: index.to_string(),
                segment: segment.to_string(),
                observed: value.to_string(),
                matched: outcome.satisfied,
            });

            if !outcome.satisfied {
                tracing::trace!(index, %segment, "path segment rejected");
                matched = false;
                if !observer.exhaustive() {
                    break;
                }
            }
        }
        matched
    }

    /// Render `/seg/seg/...` into `out`.
    ///
    /// Captured values that URL parsing would rewrite are refused: `.` and
    /// `..` anywhere, and the empty string at either end of a multi-segment
    /// path (a trailing `/` is trimmed and a leading `//` starts an authority).
    pub(crate) fn render(&self, params: &Params, out: &mut String) -> Result<(), ReverseError> {
        out.push('/');
        let last = self.segments.len().saturating_sub(1);
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                out.push('/');
            }
            let Some(value) = segment.render(params)? else {
                continue;
            };
            if let Some(name) = segment.name() {
                let at_edge = last > 0 && (index == 0 || index == last);
                if (value.is_empty() && at_edge) || value == "." || value == ".." {
                    return Err(ReverseError::UnrepresentablePathValue {
                        name: name.to_string(),
                        value: value.to_string(),
                    });
                }
            }
            out.extend(utf8_percent_encode(value, PATH_SEGMENT));
        }
        Ok(())
    }
}

/// Trim one leading and one trailing `/`, then split on `/`.
///
/// `/` and the empty string both yield a single empty segment, so `/`
/// only matches the root.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    path.split('/')
}
