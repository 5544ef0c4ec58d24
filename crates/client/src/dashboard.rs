//! Landing dashboard: statistics and the summary cards derived from them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use deliveryhub_auth::Session;
use deliveryhub_core::de::null_as_default;

use crate::api::DashboardApi;
use crate::error::ApiError;

/// Currency revenue figures are reported in.
pub const CURRENCY: &str = "MAD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    pub this_month: Option<u64>,
    pub last_month: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub confirmed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub confirmation_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivered: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevenueStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
    pub this_month: Option<f64>,
    pub last_month: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    pub new_this_month: Option<u64>,
    pub new_last_month: Option<u64>,
}

/// Tenant statistics served by `GET /dashboard/stats`.
///
/// Every field is optional on the wire and `null` reads as zero. Chart series,
/// recent orders and provider breakdowns are passed through untouched in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub orders: OrderStats,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: RevenueStats,
    #[serde(deserialize_with = "null_as_default")]
    pub customers: CustomerStats,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Month-over-month change in percent.
///
/// Zero when there is nothing to compare against (no previous value, or a
/// previous value of zero). A missing current value also reports no change.
pub fn percentage_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            (current - previous) / previous * 100.0
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFormat {
    Plain,
    Currency,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: f64,
    pub change: f64,
    pub subtitle: String,
    pub format: CardFormat,
}

/// The six headline cards of the landing page, in display order.
pub fn summary_cards(stats: &DashboardStats) -> Vec<SummaryCard> {
    let orders = &stats.orders;
    let revenue = &stats.revenue;
    let customers = &stats.customers;

    vec![
        SummaryCard {
            title: "Total Orders",
            value: orders.total as f64,
            change: percentage_change(
                orders.this_month.map(|v| v as f64),
                orders.last_month.map(|v| v as f64),
            ),
            subtitle: format!("{} this month", orders.this_month.unwrap_or(0)),
            format: CardFormat::Plain,
        },
        SummaryCard {
            title: "Confirmed Orders",
            value: orders.confirmed as f64,
            change: orders.confirmation_rate,
            subtitle: format!("{}% confirmation rate", orders.confirmation_rate),
            format: CardFormat::Percentage,
        },
        SummaryCard {
            title: "Total Revenue",
            value: revenue.total,
            change: percentage_change(revenue.this_month, revenue.last_month),
            subtitle: format!("{} {CURRENCY} this month", revenue.this_month.unwrap_or(0.0)),
            format: CardFormat::Currency,
        },
        SummaryCard {
            title: "Customers",
            value: customers.total as f64,
            change: percentage_change(
                customers.new_this_month.map(|v| v as f64),
                customers.new_last_month.map(|v| v as f64),
            ),
            subtitle: format!("{} new this month", customers.new_this_month.unwrap_or(0)),
            format: CardFormat::Plain,
        },
        SummaryCard {
            title: "Delivered Orders",
            value: orders.delivered as f64,
            change: orders.delivery_rate,
            subtitle: format!("{}% delivery rate", orders.delivery_rate),
            format: CardFormat::Percentage,
        },
        SummaryCard {
            title: "Pending Orders",
            value: orders.pending as f64,
            change: 0.0,
            subtitle: "Awaiting confirmation".to_string(),
            format: CardFormat::Plain,
        },
    ]
}

/// Everything the landing page header and cards show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub greeting: String,
    pub tenant_name: String,
    pub subscription_plan: Option<String>,
    pub cards: Vec<SummaryCard>,
}

impl DashboardOverview {
    pub fn build(session: &Session, stats: &DashboardStats) -> Self {
        let first_name = session.user().map(|u| u.first_name.as_str()).unwrap_or_default();
        let tenant = session.tenant();

        Self {
            greeting: format!("Welcome back, {first_name}!"),
            tenant_name: tenant.map(|t| t.name.clone()).unwrap_or_default(),
            subscription_plan: tenant.and_then(|t| t.subscription_plan.clone()),
            cards: summary_cards(stats),
        }
    }
}

/// Fetches dashboard statistics for the session's tenant.
#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn DashboardApi>,
    retries: u32,
}

impl DashboardService {
    pub fn new(api: Arc<dyn DashboardApi>, retries: u32) -> Self {
        Self { api, retries }
    }

    /// Load statistics for the session's tenant.
    ///
    /// Returns `Ok(None)` without calling the backend when the session has no
    /// tenant. A failed fetch is retried up to `retries` times.
    pub async fn load(&self, session: &Session) -> Result<Option<DashboardStats>, ApiError> {
        let Some(tenant) = session.tenant() else {
            tracing::debug!("no tenant in session; dashboard query disabled");
            return Ok(None);
        };

        let mut attempt = 0;
        loop {
            match self.api.dashboard_stats(&tenant.id).await {
                Ok(stats) => return Ok(Some(stats)),
                Err(err) if attempt < self.retries && err != ApiError::NoToken => {
                    attempt += 1;
                    tracing::warn!(
                        tenant_id = %tenant.id,
                        kind = err.kind(),
                        attempt,
                        "dashboard stats fetch failed; retrying"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        tenant_id = %tenant.id,
                        kind = err.kind(),
                        "dashboard stats fetch failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Load statistics and build the landing page overview.
    pub async fn overview(&self, session: &Session) -> Result<Option<DashboardOverview>, ApiError> {
        Ok(self
            .load(session)
            .await?
            .map(|stats| DashboardOverview::build(session, &stats)))
    }
}
