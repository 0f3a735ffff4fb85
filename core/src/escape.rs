//! Constraint shielding and URL component encoding.
//!
//! Template compilation runs in three passes:
//!
//! 1. [`shield_constraints`] percent-encodes the body of every `:name<...>`
//!    constraint, so characters such as `/`, `?`, `#`, `&` and `=` inside a
//!    regex are not mistaken for template structure.
//! 2. The shielded template is split on its structural delimiters.
//! 3. Each piece is restored with [`decode`] just before it is compiled.
//!
//! The encode sets used when rendering URLs also live here.

use percent_encoding::{
    percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC,
};
use std::borrow::Cow;

/// Everything outside the RFC 3986 unreserved set.
const SHIELD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escaped when a value is written into a single path segment.
pub(crate) const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escaped when a value is written into the fragment.
pub(crate) const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Pass 1: percent-encode the body of every `:name<...>` constraint.
///
/// A constraint is recognised as `:` followed by at least one ASCII word
/// character, an optional `?` marker, then `<`, a non-empty body and the
/// first following `>`. Text
/// that does not have this shape is copied through untouched, so an
/// unclosed `<` survives to be reported by the segment compiler.
///
/// # Example
///
/// ```
/// use teki::shield_constraints;
///
/// assert_eq!(shield_constraints("/a/:id<\\d+>"), "/a/:id<%5Cd%2B>");
/// assert_eq!(shield_constraints("/p/:path<a/b>"), "/p/:path<a%2Fb>");
/// assert_eq!(shield_constraints("/plain/:name"), "/plain/:name");
/// ```
#[must_use]
pub fn shield_constraints(template: &str) -> Cow<'_, str> {
    if !template.contains('<') {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(colon) = rest.find(':') {
        let (head, tail) = rest.split_at(colon + 1);
        out.push_str(head);

        let name_len = tail
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let marker = usize::from(tail[name_len..].starts_with('?'));
        let body = tail[name_len + marker..]
            .strip_prefix('<')
            .and_then(|after| after.find('>').map(|end| (after, end)));

        match body {
            Some((after, end)) if name_len > 0 && end > 0 => {
                out.push_str(&tail[..name_len + marker]);
                out.push('<');
                out.extend(utf8_percent_encode(&after[..end], SHIELD));
                out.push('>');
                rest = &after[end + 1..];
            }
            _ => rest = tail,
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

/// Pass 3: percent-decode one template piece or one candidate component.
///
/// Invalid escapes are kept verbatim and invalid UTF-8 is replaced, so this
/// never fails.
#[must_use]
pub fn decode(piece: &str) -> Cow<'_, str> {
    percent_decode_str(piece).decode_utf8_lossy()
}
