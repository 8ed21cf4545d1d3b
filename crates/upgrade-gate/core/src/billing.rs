//! Billing surface host
//!
//! Embeds the remote billing content and relays its messages. The host is
//! rendering-surface logic only: it never decides whether a route is
//! allowed, it only describes what to show once the gate has blocked one.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};
use upgrade_gate_types::{
    BillingRequest, DecisionReason, ForceUpgradeInfo, GateDecision, InboundMessage, OutboundReply,
    OwnerUser, RouteIdentifier, SubscriptionState,
};

use crate::config::LiveConfig;
use crate::error::{GateError, Result};
use crate::store::SubscriptionStateStore;

/// Title of the embedded billing frame.
pub const BILLING_FRAME_TITLE: &str = "Billing";

/// Source of the identity token handed to the billing surface.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// Token provider backed by a fixed value.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticTokenProvider(..)")
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Token provider used when none is configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTokenProvider;

#[async_trait]
impl TokenProvider for UnavailableTokenProvider {
    async fn token(&self) -> Result<String> {
        Err(GateError::TokenUnavailable("no token provider configured".into()))
    }
}

/// Locally known context the billing surface may ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    /// Whether the signed-in user owns the site
    #[serde(default)]
    pub is_owner: bool,

    /// Owner contact, shown to non-owners
    #[serde(default)]
    pub owner_user: Option<OwnerUser>,
}

/// The view substituted for a blocked route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSurface {
    pub src: String,
    pub title: String,
    pub blocked_route: RouteIdentifier,
    pub reason: DecisionReason,
}

/// What handling an inbound message did.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOutcome {
    /// The subscription state was replaced
    StateUpdated(SubscriptionState),
    /// A reply must be posted back to the surface
    Reply(OutboundReply),
    /// The surface moved to another of its pages
    RouteChanged(String),
    /// Not a message the host understands
    Ignored,
}

impl MessageOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Hosts the remote billing surface.
pub struct BillingSurfaceHost {
    store: SubscriptionStateStore,
    config: LiveConfig,
    tokens: Arc<dyn TokenProvider>,
    context: HostContext,
    sub_route: watch::Sender<Option<String>>,
}

impl BillingSurfaceHost {
    pub fn new(
        store: SubscriptionStateStore,
        config: LiveConfig,
        tokens: Arc<dyn TokenProvider>,
        context: HostContext,
    ) -> Self {
        let (sub_route, _rx) = watch::channel(None);
        Self {
            store,
            config,
            tokens,
            context,
            sub_route,
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    /// Billing page the surface last reported, if any.
    pub fn sub_route(&self) -> Option<String> {
        self.sub_route.borrow().clone()
    }

    /// Handle one message posted by the billing surface.
    pub async fn handle_message(&self, message: &Value) -> MessageOutcome {
        match InboundMessage::parse(message) {
            Some(InboundMessage::Subscription(payload)) => {
                MessageOutcome::StateUpdated(self.store.apply(payload))
            }
            Some(InboundMessage::Request(BillingRequest::ForceUpgradeInfo)) => {
                MessageOutcome::Reply(OutboundReply::force_upgrade_info(&ForceUpgradeInfo {
                    force_upgrade: self.config.force_upgrade(),
                    is_owner: self.context.is_owner,
                    owner_user: self.context.owner_user.clone(),
                }))
            }
            Some(InboundMessage::Request(BillingRequest::Token)) => {
                let token = match self.tokens.token().await {
                    Ok(token) => Some(token),
                    Err(e) => {
                        warn!(error = %e, "Could not fetch token for billing surface");
                        None
                    }
                };
                MessageOutcome::Reply(OutboundReply::token(token))
            }
            Some(InboundMessage::Route(route)) => {
                let route = route.trim_start_matches(['#', '/']).to_string();
                debug!(route = %route, "Billing surface changed page");
                self.sub_route.send_replace(Some(route.clone()));
                MessageOutcome::RouteChanged(route)
            }
            None => {
                debug!("Ignoring unrecognized billing surface message");
                MessageOutcome::Ignored
            }
        }
    }

    /// Describe the surface to show in place of a blocked route.
    pub fn surface(&self, decision: &GateDecision) -> BillingSurface {
        let base = self.config.billing_url();
        let base = base.trim_end_matches('/');
        let src = match self.sub_route() {
            Some(route) if !route.is_empty() => format!("{}/#/{}", base, route),
            _ => format!("{}/", base),
        };
        BillingSurface {
            src,
            title: BILLING_FRAME_TITLE.to_string(),
            blocked_route: decision.route,
            reason: decision.reason,
        }
    }

    /// Embedding document for the server-routed shell.
    pub fn render_html(&self, surface: &BillingSurface) -> String {
        format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "<head><title>{title}</title></head>\n",
                "<body>\n",
                "<main class=\"gh-billing\" data-blocked-route=\"{route}\">\n",
                "<iframe title=\"{title}\" src=\"{src}\" ",
                "sandbox=\"allow-scripts allow-same-origin allow-forms allow-popups\" ",
                "style=\"width:100%;height:100%;border:0\"></iframe>\n",
                "</main>\n",
                "</body>\n",
                "</html>\n"
            ),
            title = escape_attr(&surface.title),
            route = surface.blocked_route,
            src = escape_attr(&surface.src),
        )
    }
}

impl fmt::Debug for BillingSurfaceHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillingSurfaceHost")
            .field("context", &self.context)
            .field("sub_route", &*self.sub_route.borrow())
            .finish()
    }
}

fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
