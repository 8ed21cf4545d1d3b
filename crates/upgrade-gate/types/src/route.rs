//! Route identifiers
//!
//! A [`RouteIdentifier`] names one logical destination in the admin
//! application independently of the navigation stack that reached it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Normalized, stack-agnostic destination key.
///
/// Every concrete location of every navigation stack resolves to exactly one
/// identifier; locations nobody recognizes resolve to [`RouteIdentifier::Unmapped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteIdentifier {
    Dashboard,
    Analytics,
    Posts,
    Pages,
    Tags,
    Members,
    Network,
    Explore,
    Site,
    Settings,
    Signout,
    /// Upgrade and billing management
    Pro,
    /// Location that no stack recognizes
    Unmapped,
}

impl RouteIdentifier {
    /// Every identifier a real location can resolve to.
    pub const KNOWN: [RouteIdentifier; 12] = [
        RouteIdentifier::Dashboard,
        RouteIdentifier::Analytics,
        RouteIdentifier::Posts,
        RouteIdentifier::Pages,
        RouteIdentifier::Tags,
        RouteIdentifier::Members,
        RouteIdentifier::Network,
        RouteIdentifier::Explore,
        RouteIdentifier::Site,
        RouteIdentifier::Settings,
        RouteIdentifier::Signout,
        RouteIdentifier::Pro,
    ];

    /// Resolve a first path segment.
    ///
    /// This is the one segment table shared by every navigation stack,
    /// aliases included. Stack adapters only strip their own syntax (mount,
    /// fragment marker, query) before calling it. An empty segment is the
    /// application root.
    pub fn from_segment(segment: &str) -> Self {
        match segment.to_ascii_lowercase().as_str() {
            "" | "dashboard" => Self::Dashboard,
            "analytics" | "stats" => Self::Analytics,
            "posts" | "editor" => Self::Posts,
            "pages" => Self::Pages,
            "tags" => Self::Tags,
            "members" => Self::Members,
            "network" | "activitypub" => Self::Network,
            "explore" => Self::Explore,
            "site" => Self::Site,
            "settings" | "settings-x" => Self::Settings,
            "signout" => Self::Signout,
            "pro" => Self::Pro,
            _ => Self::Unmapped,
        }
    }

    /// Canonical name, also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Analytics => "analytics",
            Self::Posts => "posts",
            Self::Pages => "pages",
            Self::Tags => "tags",
            Self::Members => "members",
            Self::Network => "network",
            Self::Explore => "explore",
            Self::Site => "site",
            Self::Settings => "settings",
            Self::Signout => "signout",
            Self::Pro => "pro",
            Self::Unmapped => "unmapped",
        }
    }

    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

impl fmt::Display for RouteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a canonical route name fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route identifier: {0}")]
pub struct ParseRouteError(pub String);

impl FromStr for RouteIdentifier {
    type Err = ParseRouteError;

    /// Parses canonical names only; unlike [`RouteIdentifier::from_segment`]
    /// this never maps an unknown name to `Unmapped`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .chain([Self::Unmapped])
            .find(|route| route.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRouteError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_table_covers_known_routes() {
        for route in RouteIdentifier::KNOWN {
            assert_eq!(RouteIdentifier::from_segment(route.as_str()), route);
        }
    }

    #[test]
    fn unknown_segment_is_unmapped() {
        assert_eq!(
            RouteIdentifier::from_segment("billing-secret"),
            RouteIdentifier::Unmapped
        );
        assert!(!RouteIdentifier::Unmapped.is_mapped());
    }

    #[test]
    fn aliases_share_the_segment_table() {
        assert_eq!(
            RouteIdentifier::from_segment("settings-x"),
            RouteIdentifier::Settings
        );
        assert_eq!(
            RouteIdentifier::from_segment("activitypub"),
            RouteIdentifier::Network
        );
        assert_eq!(
            RouteIdentifier::from_segment("Stats"),
            RouteIdentifier::Analytics
        );
    }

    #[test]
    fn root_segment_is_dashboard() {
        assert_eq!(RouteIdentifier::from_segment(""), RouteIdentifier::Dashboard);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!("Tags".parse::<RouteIdentifier>(), Ok(RouteIdentifier::Tags));
        assert_eq!(
            "unmapped".parse::<RouteIdentifier>(),
            Ok(RouteIdentifier::Unmapped)
        );
        assert!("nope".parse::<RouteIdentifier>().is_err());
        assert!("settings-x".parse::<RouteIdentifier>().is_err());
        assert!("".parse::<RouteIdentifier>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&RouteIdentifier::Signout).unwrap();
        assert_eq!(json, "\"signout\"");
    }
}
