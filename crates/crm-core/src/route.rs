//! Path <-> navigation state mapping
//!
//! Two one-directional pure functions: [`state_to_path`] feeds the mirror,
//! [`parse_path`] feeds resolution. Neither is ever driven by the other's
//! output.

use crate::models::{EntityKind, NavigationState, Section};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when an id is written as a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A parsed application path (base prefix already stripped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Section(Section),
    Detail { kind: EntityKind, id: String },
    Unknown,
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Route::Dashboard | Route::Unknown => "/".to_string(),
            Route::Section(section) => section_path(*section),
            Route::Detail { kind, id } => detail_path(*kind, id),
        }
    }
}

/// Path of a section's list (or `/` for the dashboard)
pub fn section_path(section: Section) -> String {
    match section.slug() {
        Some(slug) => format!("/{slug}"),
        None => "/".to_string(),
    }
}

pub fn detail_path(kind: EntityKind, id: &str) -> String {
    format!("/{}/{}", kind.plural(), utf8_percent_encode(id, SEGMENT))
}

/// Route a navigation state is displayed at
pub fn route_of(state: &NavigationState) -> Route {
    match &state.selected {
        Some(selected) => Route::Detail {
            kind: selected.kind,
            id: selected.record.id.clone(),
        },
        None => match state.active_section {
            Section::Dashboard => Route::Dashboard,
            section => Route::Section(section),
        },
    }
}

/// Path a navigation state is mirrored to
pub fn state_to_path(state: &NavigationState) -> String {
    route_of(state).to_path()
}

/// Parse an application path into a route.
///
/// Query strings, fragments and trailing slashes are ignored.
pub fn parse_path(path: &str) -> Route {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => Route::Dashboard,
        [slug] => Section::from_slug(slug)
            .map(Route::Section)
            .unwrap_or(Route::Unknown),
        [plural, id] => match EntityKind::from_plural(plural) {
            Some(kind) => Route::Detail {
                kind,
                id: decode_segment(id),
            },
            None => Route::Unknown,
        },
        _ => Route::Unknown,
    }
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Strip the application base prefix from a host path.
///
/// The prefix only matches on a segment boundary, so `/crm` strips
/// `/crm/leads` but not `/crmx/leads`.
pub fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with(['/', '?', '#']) => rest,
        _ => path,
    }
}

/// Prefix an application path with the base for the host history
pub fn join_base(base: &str, path: &str) -> String {
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}{path}")
    }
}

/// Compare two application paths ignoring trailing slashes and queries
pub fn same_route(a: &str, b: &str) -> bool {
    parse_path(a) == parse_path(b)
}
