//! Navigation shell
//!
//! A [`Shell`] models one navigation stack's transition lifecycle: history,
//! route loaders, and the point where a transition commits. The interceptor
//! runs before the loader and before history moves, so a blocked location
//! never loads data and never becomes the current address. Every entry path
//! (sidebar, direct URL, back/forward, redirect, reload) goes through the
//! same check.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use upgrade_gate_types::{GateDecision, RouteIdentifier, SubscriptionState};

use crate::billing::BillingSurface;
use crate::interceptor::{Interception, NavigationInterceptor, NavigationRequest, NavigationTrigger};
use crate::stack::NavigationStack;

/// Rendered result of loading a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteView {
    pub route: RouteIdentifier,
    pub location: String,
    pub body: String,
}

/// Loads a route's data and renders it.
///
/// Only called after the gate allowed the transition.
pub trait RouteLoader: Send + Sync {
    fn load(&self, route: RouteIdentifier, location: &str) -> RouteView;
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The transition committed and the address moved
    Committed {
        view: RouteView,
        decision: GateDecision,
    },
    /// The billing surface replaced the route; the address did not move
    Blocked {
        surface: BillingSurface,
        decision: GateDecision,
        address: Option<String>,
    },
    /// A newer navigation started before this one resolved
    Superseded,
    /// Back or forward with nothing to go to
    NoEntry,
}

impl NavigationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// A transition that has started but not resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    ticket: u64,
    request: NavigationRequest,
    target: Target,
}

impl PendingTransition {
    pub fn request(&self) -> &NavigationRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Push,
    Replace,
    Move(usize),
}

#[derive(Debug, Default)]
struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl History {
    fn current(&self) -> Option<&String> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    fn push(&mut self, location: String) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(location);
        self.cursor = Some(self.entries.len() - 1);
    }

    fn replace(&mut self, location: String) {
        match self.cursor {
            Some(i) => self.entries[i] = location,
            None => self.push(location),
        }
    }
}

/// One navigation stack with its gate interceptor.
pub struct Shell<S> {
    interceptor: NavigationInterceptor<S>,
    loaders: HashMap<RouteIdentifier, Arc<dyn RouteLoader>>,
    history: History,
    generation: u64,
    last_blocked: Option<NavigationRequest>,
}

impl<S: NavigationStack> Shell<S> {
    pub fn new(interceptor: NavigationInterceptor<S>) -> Self {
        Self {
            interceptor,
            loaders: HashMap::new(),
            history: History::default(),
            generation: 0,
            last_blocked: None,
        }
    }

    pub fn with_loader(mut self, route: RouteIdentifier, loader: Arc<dyn RouteLoader>) -> Self {
        self.loaders.insert(route, loader);
        self
    }

    pub fn interceptor(&self) -> &NavigationInterceptor<S> {
        &self.interceptor
    }

    /// Location the address bar shows.
    pub fn address(&self) -> Option<&str> {
        self.history.current().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history.entries
    }

    /// Most recent navigation the gate refused.
    pub fn last_blocked(&self) -> Option<&NavigationRequest> {
        self.last_blocked.as_ref()
    }

    /// Subscription changes, for a view that wants to re-check itself.
    pub fn subscription_changes(&self) -> watch::Receiver<SubscriptionState> {
        self.interceptor.gate().store().subscribe()
    }

    pub fn navigate(&mut self, request: NavigationRequest) -> NavigationOutcome {
        let pending = self.begin(request);
        self.resolve(pending)
    }

    pub fn redirect(&mut self, location: impl Into<String>) -> NavigationOutcome {
        self.navigate(NavigationRequest::redirect(location))
    }

    pub fn back(&mut self) -> NavigationOutcome {
        match self.history.cursor {
            Some(i) if i > 0 => self.move_to(i - 1),
            _ => NavigationOutcome::NoEntry,
        }
    }

    pub fn forward(&mut self) -> NavigationOutcome {
        match self.history.cursor {
            Some(i) if i + 1 < self.history.entries.len() => self.move_to(i + 1),
            _ => NavigationOutcome::NoEntry,
        }
    }

    /// Re-enter the current location through the gate.
    pub fn reload(&mut self) -> NavigationOutcome {
        let Some(location) = self.history.current().cloned() else {
            return NavigationOutcome::NoEntry;
        };
        self.navigate(NavigationRequest::new(location, NavigationTrigger::Reload))
    }

    /// Try the last blocked navigation again, e.g. after the user paid.
    pub fn retry_blocked(&mut self) -> NavigationOutcome {
        match self.last_blocked.clone() {
            Some(request) => self.navigate(request),
            None => NavigationOutcome::NoEntry,
        }
    }

    /// Start a transition; any transition started earlier is superseded.
    pub fn begin(&mut self, request: NavigationRequest) -> PendingTransition {
        let target = match request.trigger {
            NavigationTrigger::Reload => Target::Replace,
            _ => Target::Push,
        };
        self.begin_with(request, target)
    }

    /// Run the gate and, if allowed, load and commit.
    pub fn resolve(&mut self, pending: PendingTransition) -> NavigationOutcome {
        if pending.ticket != self.generation {
            debug!(
                stack = self.interceptor.stack().name(),
                location = %pending.request.location,
                "Discarding superseded navigation"
            );
            return NavigationOutcome::Superseded;
        }
        // Retire the ticket; a transition resolves at most once.
        self.generation += 1;

        match self.interceptor.intercept(&pending.request) {
            Interception::Lockout { decision, surface } => {
                self.last_blocked = Some(pending.request);
                NavigationOutcome::Blocked {
                    surface,
                    decision,
                    address: self.address().map(str::to_string),
                }
            }
            Interception::Proceed { decision } => {
                let view = self.load(decision.route, &pending.request.location);
                let location = pending.request.location;
                if self
                    .last_blocked
                    .as_ref()
                    .is_some_and(|blocked| blocked.location == location)
                {
                    self.last_blocked = None;
                }
                match pending.target {
                    Target::Push => self.history.push(location),
                    Target::Replace => self.history.replace(location),
                    Target::Move(index) => self.history.cursor = Some(index),
                }
                NavigationOutcome::Committed { view, decision }
            }
        }
    }

    fn begin_with(&mut self, request: NavigationRequest, target: Target) -> PendingTransition {
        self.generation += 1;
        PendingTransition {
            ticket: self.generation,
            request,
            target,
        }
    }

    fn move_to(&mut self, index: usize) -> NavigationOutcome {
        let location = self.history.entries[index].clone();
        let request = NavigationRequest::new(location, NavigationTrigger::History);
        let pending = self.begin_with(request, Target::Move(index));
        self.resolve(pending)
    }

    fn load(&self, route: RouteIdentifier, location: &str) -> RouteView {
        match self.loaders.get(&route) {
            Some(loader) => loader.load(route, location),
            None => RouteView {
                route,
                location: location.to_string(),
                body: String::new(),
            },
        }
    }
}
