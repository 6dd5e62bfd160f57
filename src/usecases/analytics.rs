use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::backend_api::analytics::{
    DashboardMetrics, FunnelData, MonitoringData, TimeRange, UtmAnalyticsResponse,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{CacheKey, KeySelector, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsGateway: Send + Sync {
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ApiError>;

    async fn funnel(&self, days: i64) -> Result<FunnelData, ApiError>;

    async fn monitoring(&self, range: TimeRange) -> Result<MonitoringData, ApiError>;

    async fn utm_analytics(&self) -> Result<UtmAnalyticsResponse, ApiError>;
}

#[async_trait]
impl AnalyticsGateway for BackendClient {
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        backend_api::analytics::dashboard_metrics(self).await
    }

    async fn funnel(&self, days: i64) -> Result<FunnelData, ApiError> {
        backend_api::analytics::funnel(self, days).await
    }

    async fn monitoring(&self, range: TimeRange) -> Result<MonitoringData, ApiError> {
        backend_api::analytics::monitoring(self, range).await
    }

    async fn utm_analytics(&self) -> Result<UtmAnalyticsResponse, ApiError> {
        backend_api::analytics::utm_analytics(self).await
    }
}

/// Read-only analytics views. Everything here is computed by the backend;
/// the console caches and formats.
pub struct AnalyticsUseCase<G>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> AnalyticsUseCase<G>
where
    G: AnalyticsGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        info!("analytics: loading dashboard metrics");
        let key = CacheKey::bare(resources::DASHBOARD);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.dashboard_metrics().await }
            })
            .await
    }

    pub async fn funnel(&self, days: i64) -> Result<FunnelData, ApiError> {
        info!(days, "analytics: loading conversion funnel");
        let key = CacheKey::entity(resources::FUNNEL, days);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.funnel(days).await }
            })
            .await
    }

    pub async fn monitoring(&self, range: TimeRange) -> Result<MonitoringData, ApiError> {
        info!(range = %range, "analytics: loading monitoring dashboard");
        let key = CacheKey::entity(resources::MONITORING, range);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.monitoring(range).await }
            })
            .await
    }

    pub async fn utm_analytics(&self) -> Result<UtmAnalyticsResponse, ApiError> {
        info!("analytics: loading utm sources");
        let key = CacheKey::bare(resources::UTM_ANALYTICS);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.utm_analytics().await }
            })
            .await
    }

    /// Drops the dashboard and monitoring keys and re-warms them so
    /// interactive reads keep hitting fresh entries. Called periodically by
    /// the refresh worker. Only the default monitoring range is pre-warmed;
    /// other ranges refetch on demand.
    pub async fn refresh_dashboards(&self) -> Result<(), ApiError> {
        self.cache
            .evict(&KeySelector::Resource(resources::DASHBOARD));
        self.cache
            .evict(&KeySelector::Resource(resources::MONITORING));
        self.dashboard_metrics().await?;
        self.monitoring(TimeRange::default()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend_api::analytics::KpiMetric;
    use std::time::Duration;

    fn kpi(value: i64) -> KpiMetric {
        KpiMetric {
            value: serde_json::json!(value),
            trend: 0.0,
            sparkline: vec![],
        }
    }

    fn dashboard() -> DashboardMetrics {
        DashboardMetrics {
            active_users_dau: kpi(120),
            active_users_mau: kpi(1900),
            new_users_today: kpi(14),
            retention_d7: kpi(38),
            horoscopes_today: kpi(96),
            tarot_spreads_today: kpi(41),
            most_active_zodiac: "scorpio".to_string(),
            revenue_today: kpi(12900),
            revenue_month: kpi(389000),
            conversion_rate: kpi(4),
            arpu: kpi(205),
            error_rate: None,
            avg_response_time: None,
            api_costs_today: None,
            api_costs_month: None,
        }
    }

    fn monitoring_data(range: TimeRange) -> MonitoringData {
        MonitoringData {
            range: range.to_string(),
            active_users: crate::backend_api::analytics::ActiveUsersMetrics {
                dau: 100,
                wau: 400,
                mau: 1500,
            },
            api_costs: crate::backend_api::analytics::ApiCostsData {
                total_cost: 12.5,
                total_tokens: 1_000_000,
                total_requests: 4000,
                by_operation: vec![],
                by_day: vec![],
            },
            unit_economics: crate::backend_api::analytics::UnitEconomicsData {
                total_cost: 12.5,
                active_users: 100,
                paying_users: 20,
                active_paying_users: 18,
                cost_per_active_user: 0.125,
                cost_per_paying_user: 0.625,
            },
            error_stats: crate::backend_api::analytics::ErrorStatsData {
                error_count: 3,
                error_rate: 0.1,
                avg_response_time_ms: 220.0,
            },
        }
    }

    #[tokio::test]
    async fn test_refresh_rewarms_the_dashboard_keys() {
        let mut gateway = MockAnalyticsGateway::new();
        gateway
            .expect_dashboard_metrics()
            .times(2)
            .returning(|| Ok(dashboard()));
        gateway
            .expect_monitoring()
            .times(1)
            .returning(|range| Ok(monitoring_data(range)));

        let usecase = AnalyticsUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        usecase.dashboard_metrics().await.unwrap();
        usecase.refresh_dashboards().await.unwrap();
        // The refresh re-warmed the entries; these reads are cache hits.
        usecase.dashboard_metrics().await.unwrap();
        usecase.monitoring(TimeRange::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_monitoring_ranges_are_cached_independently() {
        let mut gateway = MockAnalyticsGateway::new();
        gateway
            .expect_monitoring()
            .times(2)
            .returning(|range| Ok(monitoring_data(range)));

        let usecase = AnalyticsUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        let week = usecase.monitoring(TimeRange::Week).await.unwrap();
        assert_eq!(week.range, "7d");
        usecase.monitoring(TimeRange::Week).await.unwrap();
        let day = usecase.monitoring(TimeRange::Day).await.unwrap();
        assert_eq!(day.range, "24h");
    }

    #[tokio::test]
    async fn test_funnel_periods_use_separate_keys() {
        let mut gateway = MockAnalyticsGateway::new();
        gateway.expect_funnel().times(2).returning(|days| {
            Ok(FunnelData {
                stages: vec![],
                period_days: days,
            })
        });

        let usecase = AnalyticsUseCase::new(
            Arc::new(gateway),
            Arc::new(QueryCache::new(Duration::from_secs(60))),
        );

        assert_eq!(usecase.funnel(7).await.unwrap().period_days, 7);
        assert_eq!(usecase.funnel(30).await.unwrap().period_days, 30);
        assert_eq!(usecase.funnel(7).await.unwrap().period_days, 7);
    }
}
