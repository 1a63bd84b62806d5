//! Route table: navigable locations to view descriptors.
//!
//! Pure lookup with no network I/O. A location resolves to exactly one
//! [`View`] plus its typed navigation parameters; redirects are followed
//! up to [`MAX_REDIRECTS`] hops.

use std::fmt;

use climadesk_api::RoomNumber;
use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 8;

const ROOM_PARAM: &str = "roomNumber";

/// Views a location can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum View {
    /// Per-room AC control panel. Requires a room.
    AcPanel,
    FrontDesk,
    Welcome,
    /// Live status of every room.
    Monitor,
    UsageReport,
    Overview,
}

impl View {
    pub const ALL: [View; 6] = [
        Self::Overview,
        Self::AcPanel,
        Self::FrontDesk,
        Self::Welcome,
        Self::Monitor,
        Self::UsageReport,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AcPanel => "AC panel",
            Self::FrontDesk => "Front desk",
            Self::Welcome => "Welcome",
            Self::Monitor => "Monitor",
            Self::UsageReport => "Usage report",
            Self::Overview => "Overview",
        }
    }

    pub fn requires_room(self) -> bool {
        matches!(self, Self::AcPanel)
    }
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("a route with the shape of '{path}' is already registered")]
    Duplicate { path: String },

    #[error("no route matches '{path}'")]
    NotFound { path: String },

    #[error("redirect chain starting at '{path}' exceeds {MAX_REDIRECTS} hops")]
    RedirectLoop { path: String },

    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("view '{view}' needs a room number")]
    MissingRoom { view: View },

    #[error("no route renders view '{view}'")]
    NoRoute { view: View },
}

// ── Patterns ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    /// `:roomNumber`
    Room,
}

/// Parsed route path such as `/aircon/:roomNumber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: reason.to_owned(),
        };
        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        for raw in split_path(pattern) {
            match raw.strip_prefix(':') {
                Some(ROOM_PARAM) => {
                    if segments.contains(&Segment::Room) {
                        return Err(invalid("room parameter appears twice"));
                    }
                    segments.push(Segment::Room);
                }
                Some(other) => return Err(invalid(&format!("unknown parameter ':{other}'"))),
                None => segments.push(Segment::Static(raw.to_owned())),
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Two patterns with the same shape match exactly the same locations.
    fn same_shape(&self, other: &Self) -> bool {
        self.segments == other.segments
    }

    fn static_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    fn matches(&self, parts: &[&str]) -> Option<NavParams> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = NavParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(s) if s == part => {}
                Segment::Static(_) => return None,
                Segment::Room => params.room = Some(RoomNumber::new(*part).ok()?),
            }
        }
        Some(params)
    }

    fn render(&self, params: &NavParams) -> Option<String> {
        if self.segments.is_empty() {
            return Some("/".to_owned());
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Static(s) => out.push_str(s),
                Segment::Room => out.push_str(params.room.as_ref()?.as_str()),
            }
        }
        Some(out)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => write!(f, "/{s}")?,
                Segment::Room => write!(f, "/:{ROOM_PARAM}")?,
            }
        }
        Ok(())
    }
}

/// Split a location into its non-empty path segments, dropping any query
/// string or fragment. Trailing and doubled slashes are ignored.
fn split_path(location: &str) -> impl Iterator<Item = &str> {
    let path = location
        .split_once(['?', '#'])
        .map_or(location, |(path, _)| path);
    path.split('/').filter(|s| !s.is_empty())
}

// ── Routes ───────────────────────────────────────────────────────────

/// Where a route leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    View(View),
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: Pattern,
    pub target: Target,
}

/// Typed navigation parameters extracted from a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomNumber>,
}

impl NavParams {
    pub fn room(room: RoomNumber) -> Self {
        Self { room: Some(room) }
    }
}

/// Outcome of resolving a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub view: View,
    pub params: NavParams,
    /// Canonical path of the matched route after redirects.
    pub path: String,
    /// The requested location, when at least one redirect was followed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's navigable locations.
    pub fn standard() -> Self {
        let fixed = |path: &str| Pattern {
            segments: split_path(path)
                .map(|s| Segment::Static(s.to_owned()))
                .collect(),
        };
        let view = |path: &str, view: View| Route {
            pattern: fixed(path),
            target: Target::View(view),
        };

        Self {
            routes: vec![
                Route {
                    pattern: fixed("/"),
                    target: Target::Redirect("/overview".to_owned()),
                },
                Route {
                    pattern: Pattern {
                        segments: vec![Segment::Static("aircon".to_owned()), Segment::Room],
                    },
                    target: Target::View(View::AcPanel),
                },
                view("/frontdesk", View::FrontDesk),
                view("/welcome", View::Welcome),
                view("/monitor", View::Monitor),
                view("/report-usage", View::UsageReport),
                view("/overview", View::Overview),
            ],
        }
    }

    /// Register a route. Fails if a route with the same shape exists.
    pub fn register(&mut self, path: &str, target: Target) -> Result<(), RouteError> {
        let pattern = Pattern::parse(path)?;
        if self.routes.iter().any(|r| r.pattern.same_shape(&pattern)) {
            return Err(RouteError::Duplicate {
                path: path.to_owned(),
            });
        }
        if let Target::View(view) = target {
            if view.requires_room() != pattern.segments.contains(&Segment::Room) {
                return Err(RouteError::InvalidPattern {
                    pattern: path.to_owned(),
                    reason: format!("view '{view}' and pattern disagree on the room parameter"),
                });
            }
        }
        self.routes.push(Route { pattern, target });
        Ok(())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `location` to a view, following redirects.
    pub fn resolve(&self, location: &str) -> Result<Resolution, RouteError> {
        let mut current = location.to_owned();
        for hop in 0..=MAX_REDIRECTS {
            let (route, params) = self.best_match(&current).ok_or_else(|| RouteError::NotFound {
                path: current.clone(),
            })?;
            match &route.target {
                Target::View(view) => {
                    let path = route.pattern.render(&params).unwrap_or_default();
                    return Ok(Resolution {
                        view: *view,
                        params,
                        path,
                        redirected_from: (hop > 0).then(|| location.to_owned()),
                    });
                }
                Target::Redirect(to) => current.clone_from(to),
            }
        }
        Err(RouteError::RedirectLoop {
            path: location.to_owned(),
        })
    }

    /// Canonical path rendering `view` with `params`.
    pub fn href(&self, view: View, params: &NavParams) -> Result<String, RouteError> {
        if view.requires_room() && params.room.is_none() {
            return Err(RouteError::MissingRoom { view });
        }
        self.routes
            .iter()
            .filter(|r| r.target == Target::View(view))
            .max_by_key(|r| (r.pattern.static_count(), r.pattern.segments.len()))
            .and_then(|r| r.pattern.render(params))
            .ok_or(RouteError::NoRoute { view })
    }

    // More static segments wins, then the longer pattern. Shapes are unique,
    // so among equally specific matches the first registered is kept.
    fn best_match(&self, location: &str) -> Option<(&Route, NavParams)> {
        let parts: Vec<&str> = split_path(location).collect();
        let mut best: Option<(&Route, NavParams)> = None;
        for route in &self.routes {
            let Some(params) = route.pattern.matches(&parts) else {
                continue;
            };
            let better = best.as_ref().is_none_or(|(b, _)| {
                (route.pattern.static_count(), route.pattern.segments.len())
                    > (b.pattern.static_count(), b.pattern.segments.len())
            });
            if better {
                best = Some((route, params));
            }
        }
        best
    }
}
