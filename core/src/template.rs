//! Template compiler: compile once, match and reverse many.

use crate::escape::{decode, shield_constraints};
use crate::query::CandidateQuery;
use crate::trace::{Observer, Silent, TraceStep};
use crate::{
    HashMatcher, MatchTrace, Params, PathMatcher, QueryEntry, QueryMatcher, ReverseError,
    Segment, TemplateError, MAX_TEMPLATE_LENGTH,
};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A `?` that sits between a path capture and its `<...>` constraint would
/// otherwise start the query, leaving the constraint behind as a query key.
fn reject_path_optional_marker(path: &str, query: &str) -> Result<(), TemplateError> {
    let Some(last) = path.rsplit('/').next().filter(|atom| atom.starts_with(':')) else {
        return Ok(());
    };
    if !query.starts_with('<') {
        return Ok(());
    }
    let constraint = query.find('>').map_or(query, |end| &query[..=end]);
    Err(TemplateError::InvalidSegment {
        segment: format!("{}?{}", decode(last), decode(constraint)),
        reason: "optional marker is only allowed on query values",
    })
}

/// Base used to resolve origin-relative candidates such as `/user/1?x=2`.
const RELATIVE_BASE: &str = "http://localhost/";

/// A compiled URL route template.
///
/// A template has three zones, each compiled once:
///
/// | Zone | Syntax | Compiled to |
/// |------|--------|-------------|
/// | path | `/users/:id<\d+>` | [`PathMatcher`] |
/// | query | `?tab=:tab&page?=:page` | [`QueryMatcher`] |
/// | hash | `#:anchor` | [`HashMatcher`] |
///
/// The same compiled form serves matching ([`matches`](Self::matches)) and
/// reversal ([`reverse`](Self::reverse)).
///
/// # INV: flat parameters
///
/// Captures from all three zones land in one [`Params`]. They are merged in
/// zone order (path, query, hash), so a later zone overwrites an earlier
/// capture of the same name.
///
/// # Example
///
/// ```
/// use teki::{Params, Template};
///
/// let template = Template::compile("/user/:id<\\d+>?tab?=:tab").unwrap();
///
/// let params = template.matches("http://example.com/user/42").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("tab"), None);
///
/// let url = template.reverse(&Params::new().with("id", "7").with("tab", "posts")).unwrap();
/// assert_eq!(url, "/user/7?tab=posts");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    path: PathMatcher,
    query: QueryMatcher,
    hash: HashMatcher,
}

impl Template {
    /// Compile a template.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::PatternTooLong`] if the template exceeds [`MAX_TEMPLATE_LENGTH`]
    /// - [`TemplateError::InvalidTemplate`] if it does not start with `/`
    /// - any segment-level error from the path, query or hash zone
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        if template.len() > MAX_TEMPLATE_LENGTH {
            return Err(TemplateError::PatternTooLong {
                len: template.len(),
                max: MAX_TEMPLATE_LENGTH,
            });
        }
        if !template.starts_with('/') {
            return Err(TemplateError::InvalidTemplate {
                template: template.to_string(),
                reason: "must start with '/'",
            });
        }

        let shielded = shield_constraints(template);
        let shielded: &str = &shielded;
        let (rest, hash) = shielded.split_once('#').unwrap_or((shielded, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        reject_path_optional_marker(path, query)?;

        let compiled = Self {
            source: template.to_string(),
            path: PathMatcher::compile(path)?,
            query: QueryMatcher::compile(query)?,
            hash: HashMatcher::compile(hash)?,
        };

        tracing::debug!(
            template,
            segments = compiled.path.arity(),
            keys = compiled.query.entries().len(),
            "compiled template"
        );
        Ok(compiled)
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled path zone.
    #[must_use]
    pub fn path(&self) -> &PathMatcher {
        &self.path
    }

    /// The compiled query zone.
    #[must_use]
    pub fn query(&self) -> &QueryMatcher {
        &self.query
    }

    /// The compiled hash zone.
    #[must_use]
    pub fn hash(&self) -> &HashMatcher {
        &self.hash
    }

    /// Capture names in template order (path, query, hash).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.path
            .segments()
            .iter()
            .chain(self.query.entries().iter().filter_map(QueryEntry::value))
            .chain(std::iter::once(self.hash.segment()))
            .filter_map(Segment::name)
    }

    /// Match a candidate URL.
    ///
    /// The candidate may be absolute (`https://host/a?b#c`) or
    /// origin-relative (`/a?b#c`). Returns `None` when the URL cannot be
    /// parsed or does not match.
    #[must_use]
    pub fn matches(&self, url: &str) -> Option<Params> {
        let url = parse_candidate(url).ok()?;
        self.matches_parsed(&url)
    }

    /// Match with a full trace of every decision.
    ///
    /// Evaluation does not short-circuit, so the trace lists every reason a
    /// URL was rejected.
    ///
    /// # INV: `trace.result == self.matches(url)`
    #[must_use]
    pub fn match_with_trace(&self, url: &str) -> MatchTrace {
        let mut steps: Vec<TraceStep> = Vec::new();
        let result = match parse_candidate(url) {
            Ok(url) => self.evaluate(&url, &mut steps),
            Err(err) => {
                steps.push(TraceStep::InvalidUrl {
                    reason: err.to_string(),
                });
                None
            }
        };
        MatchTrace { result, steps }
    }

    /// Build a URL from a parameter dictionary.
    ///
    /// The result is origin-relative: path, then query, then hash. Values are
    /// percent-encoded for their zone. Constraints are not checked.
    ///
    /// # Errors
    ///
    /// - [`ReverseError::MissingParameter`] if a required capture has no value
    /// - [`ReverseError::UnrepresentablePathValue`] if a path value is `.`, `..`,
    ///   or empty at either end of a multi-segment path
    ///
    /// Entries for unknown names are ignored.
    pub fn reverse(&self, params: &Params) -> Result<String, ReverseError> {
        self.render(params).inspect_err(|err| {
            tracing::debug!(template = %self.source, %err, "reverse failed");
        })
    }

    pub(crate) fn matches_parsed(&self, url: &Url) -> Option<Params> {
        self.evaluate(url, &mut Silent)
    }

    fn evaluate<O: Observer>(&self, url: &Url, observer: &mut O) -> Option<Params> {
        let mut params = Params::new();

        let mut matched = self.path.capture(url.path(), &mut params, observer);
        if matched || observer.exhaustive() {
            let query = CandidateQuery::from_url(url);
            matched &= self.query.capture(&query, &mut params, observer);
        }
        if matched || observer.exhaustive() {
            matched &= self.hash.capture(url.fragment(), &mut params, observer);
        }

        matched.then_some(params)
    }

    fn render(&self, params: &Params) -> Result<String, ReverseError> {
        let mut out = String::with_capacity(self.source.len());
        self.path.render(params, &mut out)?;
        self.query.render(params, &mut out)?;
        self.hash.render(params, &mut out)?;
        Ok(out)
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse a candidate, resolving origin-relative input against [`RELATIVE_BASE`].
pub(crate) fn parse_candidate(candidate: &str) -> Result<Url, url::ParseError> {
    match Url::parse(candidate) {
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)?.join(candidate),
        parsed => parsed,
    }
}
