//! Routes exempt from the forced-upgrade gate

use upgrade_gate_types::RouteIdentifier;

const EXEMPT_ROUTES: [RouteIdentifier; 3] = [
    RouteIdentifier::Settings,
    RouteIdentifier::Signout,
    // the upgrade page itself, otherwise a locked-out user has no way out
    RouteIdentifier::Pro,
];

/// The single allowlist shared by every navigation stack.
///
/// Defined over [`RouteIdentifier`]s, never raw paths, so stacks with
/// different path syntax cannot disagree about what is exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteAllowlist;

impl RouteAllowlist {
    pub fn is_exempt(route: RouteIdentifier) -> bool {
        EXEMPT_ROUTES.contains(&route)
    }

    pub fn entries() -> &'static [RouteIdentifier] {
        &EXEMPT_ROUTES
    }
}
