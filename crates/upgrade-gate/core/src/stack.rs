//! Navigation stack adapters
//!
//! Each navigation stack in the admin application has its own location
//! syntax. An adapter only strips that syntax (mount prefix, fragment marker,
//! query string) down to a first segment and hands it to
//! [`RouteIdentifier::from_segment`], which owns every route name and alias.
//! Adapters carry no policy and no route names.

use std::fmt::Debug;

use upgrade_gate_types::RouteIdentifier;

/// A navigation stack whose locations can be normalized.
pub trait NavigationStack: Send + Sync + Debug {
    /// Short name used in logs and APIs
    fn name(&self) -> &'static str;

    /// Resolve a native location to exactly one route identifier.
    fn normalize(&self, location: &str) -> RouteIdentifier;
}

/// Legacy server-routed shell.
///
/// Every navigation is a request for a path under the admin mount, e.g.
/// `/ghost/settings-x/general` or, for old bookmarks, `/ghost/#/tags`.
#[derive(Debug, Clone)]
pub struct LegacyShellStack {
    mount: String,
}

impl LegacyShellStack {
    pub const NAME: &'static str = "legacy";

    pub fn new(mount: impl Into<String>) -> Self {
        let mount = mount.into();
        Self {
            mount: format!("/{}", mount.trim_matches('/')),
        }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }
}

impl Default for LegacyShellStack {
    fn default() -> Self {
        Self::new("/ghost")
    }
}

impl NavigationStack for LegacyShellStack {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn normalize(&self, location: &str) -> RouteIdentifier {
        let (path, fragment) = match location.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (location, None),
        };

        let Some(rest) = strip_query(path).strip_prefix(self.mount.as_str()) else {
            return RouteIdentifier::Unmapped;
        };
        if !rest.is_empty() && !rest.starts_with('/') {
            return RouteIdentifier::Unmapped;
        }

        // `/ghost/#/tags`: the route lives in the fragment
        let route_path = match fragment {
            Some(fragment) if rest.trim_matches('/').is_empty() => strip_query(fragment),
            _ => rest,
        };

        match first_segment(route_path) {
            Some(segment) => RouteIdentifier::from_segment(&segment),
            None => RouteIdentifier::Unmapped,
        }
    }
}

/// Component-routed shell.
///
/// Locations are in-app router paths: `#/network/inbox`, `/analytics/web`,
/// `tags/new`.
#[derive(Debug, Clone, Default)]
pub struct ComponentShellStack;

impl ComponentShellStack {
    pub const NAME: &'static str = "component";
}

impl NavigationStack for ComponentShellStack {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn normalize(&self, location: &str) -> RouteIdentifier {
        let location = location.trim();
        let path = location.strip_prefix('#').unwrap_or(location);
        match first_segment(strip_query(path)) {
            Some(segment) => RouteIdentifier::from_segment(&segment),
            None => RouteIdentifier::Unmapped,
        }
    }
}

fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(path, _)| path)
}

/// First segment after resolving `.` and `..`, lowercased.
///
/// `Some("")` is the root; `None` means the path climbs above the root and
/// cannot be resolved.
fn first_segment(path: &str) -> Option<String> {
    let mut resolved: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop()?;
            }
            other => resolved.push(other),
        }
    }
    Some(
        resolved
            .first()
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default(),
    )
}
