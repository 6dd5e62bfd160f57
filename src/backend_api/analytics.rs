use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{ApiError, BackendClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparklinePoint {
    pub date: String,
    pub value: f64,
}

/// A single dashboard KPI: current value, trend versus the previous period,
/// and a small history series for the sparkline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiMetric {
    /// Number or preformatted string, backend's choice.
    pub value: serde_json::Value,
    pub trend: f64,
    pub sparkline: Vec<SparklinePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub active_users_dau: KpiMetric,
    pub active_users_mau: KpiMetric,
    pub new_users_today: KpiMetric,
    pub retention_d7: KpiMetric,
    pub horoscopes_today: KpiMetric,
    pub tarot_spreads_today: KpiMetric,
    pub most_active_zodiac: String,
    pub revenue_today: KpiMetric,
    pub revenue_month: KpiMetric,
    pub conversion_rate: KpiMetric,
    pub arpu: KpiMetric,
    pub error_rate: Option<KpiMetric>,
    pub avg_response_time: Option<KpiMetric>,
    pub api_costs_today: Option<KpiMetric>,
    pub api_costs_month: Option<KpiMetric>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelStage {
    pub name: String,
    pub name_ru: String,
    pub value: i64,
    pub conversion_from_prev: Option<f64>,
    pub dropoff_count: Option<i64>,
    pub dropoff_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelData {
    pub stages: Vec<FunnelStage>,
    pub period_days: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let range = match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        };
        write!(f, "{}", range)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveUsersMetrics {
    pub dau: i64,
    pub wau: i64,
    pub mau: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostByOperation {
    pub operation: String,
    pub cost: f64,
    pub tokens: i64,
    pub requests: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostByDay {
    pub date: String,
    pub cost: f64,
    pub tokens: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiCostsData {
    pub total_cost: f64,
    pub total_tokens: i64,
    pub total_requests: i64,
    pub by_operation: Vec<CostByOperation>,
    pub by_day: Vec<CostByDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitEconomicsData {
    pub total_cost: f64,
    pub active_users: i64,
    pub paying_users: i64,
    pub active_paying_users: i64,
    pub cost_per_active_user: f64,
    pub cost_per_paying_user: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorStatsData {
    pub error_count: i64,
    pub error_rate: f64,
    pub avg_response_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringData {
    pub range: String,
    pub active_users: ActiveUsersMetrics,
    pub api_costs: ApiCostsData,
    pub unit_economics: UnitEconomicsData,
    pub error_stats: ErrorStatsData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtmSourceStats {
    pub source: String,
    pub users: i64,
    pub premium_users: i64,
    pub conversion_rate: f64,
    /// Minor currency units.
    pub total_revenue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtmAnalyticsResponse {
    pub sources: Vec<UtmSourceStats>,
    pub total_users: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct FunnelQuery {
    days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct MonitoringQuery {
    range: TimeRange,
}

pub async fn dashboard_metrics(client: &BackendClient) -> Result<DashboardMetrics, ApiError> {
    client.get("/dashboard", "dashboard metrics").await
}

pub async fn funnel(client: &BackendClient, days: i64) -> Result<FunnelData, ApiError> {
    client
        .get_with_query("/funnel", &FunnelQuery { days }, "conversion funnel")
        .await
}

pub async fn monitoring(
    client: &BackendClient,
    range: TimeRange,
) -> Result<MonitoringData, ApiError> {
    client
        .get_with_query("/monitoring", &MonitoringQuery { range }, "monitoring dashboard")
        .await
}

pub async fn utm_analytics(client: &BackendClient) -> Result<UtmAnalyticsResponse, ApiError> {
    client.get("/utm-analytics", "utm analytics").await
}
