//! Query compiler: keyed entries, optional keys, superset semantics.
//!
//! | Template piece | Meaning |
//! |----------------|---------|
//! | `key=:name` | required key, value captured as `name` |
//! | `key?=:name<re>` | optional key, constrained capture |
//! | `key=literal` | required key with a fixed value |
//! | `key` | required key, any value, binds nothing |
//! | `key?` | optional key, any value, binds nothing |
//!
//! Keys in the candidate that the template does not mention are ignored.
//!
//! On reverse, an optional key that binds nothing (`key?` or `key?=literal`)
//! is written only when the dictionary has a value under the key itself.

use crate::escape::decode;
use crate::segment::Placement;
use crate::trace::{Observer, TraceStep, Zone};
use crate::{Params, ReverseError, Segment, TemplateError};
use std::borrow::Cow;
use url::form_urlencoded;

/// One `key[?][=value]` piece of the template query.
#[derive(Debug, Clone)]
pub struct QueryEntry {
    key: String,
    optional: bool,
    value: Option<Segment>,
}

impl QueryEntry {
    /// The query key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// May the key be missing from the candidate?
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The value segment, or `None` for a presence-only key.
    #[must_use]
    pub fn value(&self) -> Option<&Segment> {
        self.value.as_ref()
    }
}

/// Compiled query zone of a template.
///
/// Entries keep template order, which is also the order reversal emits.
#[derive(Debug, Clone, Default)]
pub struct QueryMatcher {
    entries: Vec<QueryEntry>,
}

impl QueryMatcher {
    /// Compile the query zone of a shielded template (without the leading `?`).
    pub(crate) fn compile(raw: &str) -> Result<Self, TemplateError> {
        let mut entries: Vec<QueryEntry> = Vec::new();

        for piece in raw.split('&').filter(|piece| !piece.is_empty()) {
            // Form encoding: a literal `+` in the template means a space.
            let piece = piece.replace('+', "%20");
            let (raw_key, raw_value) = match piece.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (piece.as_str(), None),
            };
            let (raw_key, optional_key) = match raw_key.strip_suffix('?') {
                Some(key) => (key, true),
                None => (raw_key, false),
            };

            let key = decode(raw_key).into_owned();
            if key.is_empty() {
                return Err(TemplateError::InvalidSegment {
                    segment: decode(&piece).into_owned(),
                    reason: "query key is empty",
                });
            }
            if entries.iter().any(|entry| entry.key == key) {
                return Err(TemplateError::InvalidSegment {
                    segment: key,
                    reason: "query key appears more than once",
                });
            }

            let value = raw_value
                .map(|atom| Segment::parse(atom, Placement::Query { optional_key }))
                .transpose()?;
            let optional = optional_key || value.as_ref().is_some_and(Segment::is_optional);

            entries.push(QueryEntry {
                key,
                optional,
                value,
            });
        }

        Ok(Self { entries })
    }

    /// The compiled entries, in template order.
    #[must_use]
    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    /// Returns `true` if the template has no query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match the candidate's decoded query pairs.
    pub(crate) fn capture<O: Observer>(
        &self,
        candidate: &CandidateQuery<'_>,
        params: &mut Params,
        observer: &mut O,
    ) -> bool {
        let mut matched = true;

        for entry in &self.entries {
            let satisfied = match (candidate.get(&entry.key), &entry.value) {
                (None, value) if entry.optional => {
                    if let Some(name) = value.as_ref().and_then(Segment::name) {
                        params.insert(name, None);
                    }
                    observer.record(|| TraceStep::OptionalAbsent {
                        key: entry.key.clone(),
                    });
                    true
                }
                (None, _) => {
                    observer.record(|| TraceStep::MissingKey {
                        key: entry.key.clone(),
                    });
                    false
                }
                (Some(_), None) => {
                    observer.record(|| TraceStep::KeyPresent {
                        key: entry.key.clone(),
                    });
                    true
                }
                (Some(observed), Some(segment)) => {
                    let outcome = segment.match_value(observed);
                    if let Some(name) = outcome.binding {
                        params.insert(name, Some(observed.to_string()));
                    }
                    observer.record(|| TraceStep::Segment {
                        zone: Zone::Query,
                        position: entry.key.clone(),
                        segment: segment.to_string(),
                        observed: observed.to_string(),
                        matched: outcome.satisfied,
                    });
                    outcome.satisfied
                }
            };

            if !satisfied {
                tracing::trace!(key = %entry.key, "query entry rejected");
                matched = false;
                if !observer.exhaustive() {
                    break;
                }
            }
        }
        matched
    }

    /// Render `?k=v&...` into `out`, omitting absent optional entries.
    ///
    /// Writes nothing when every entry is omitted.
    pub(crate) fn render(&self, params: &Params, out: &mut String) -> Result<(), ReverseError> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut written = 0;

        for entry in &self.entries {
            let binds = entry.value.as_ref().and_then(Segment::name).is_some();
            if entry.optional && !binds && params.get(&entry.key).is_none() {
                continue;
            }
            let value = match &entry.value {
                None => "",
                Some(segment) => match segment.render(params)? {
                    Some(value) => value,
                    None => continue,
                },
            };
            serializer.append_pair(&entry.key, value);
            written += 1;
        }

        if written > 0 {
            out.push('?');
            out.push_str(&serializer.finish());
        }
        Ok(())
    }
}

/// Decoded query pairs of a candidate URL.
///
/// When a key repeats, the first value wins.
#[derive(Debug, Default)]
pub(crate) struct CandidateQuery<'u> {
    pairs: Vec<(Cow<'u, str>, Cow<'u, str>)>,
}

impl<'u> CandidateQuery<'u> {
    pub(crate) fn from_url(url: &'u url::Url) -> Self {
        Self {
            pairs: url.query_pairs().collect(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| &**v)
    }
}
