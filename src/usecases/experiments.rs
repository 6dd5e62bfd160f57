use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::backend_api::experiments::{
    CreateExperimentRequest, ExperimentListItem, ExperimentListResponse, ExperimentResults,
};
use crate::backend_api::{self, ApiError, BackendClient};
use crate::cache::invalidation::resources;
use crate::cache::{AdminMutation, CacheKey, QueryCache};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperimentsGateway: Send + Sync {
    async fn list_experiments(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ExperimentListResponse, ApiError>;

    async fn create_experiment(
        &self,
        request: &CreateExperimentRequest,
    ) -> Result<ExperimentListItem, ApiError>;

    async fn start_experiment(&self, experiment_id: i64) -> Result<(), ApiError>;

    async fn stop_experiment(&self, experiment_id: i64) -> Result<(), ApiError>;

    async fn experiment_results(
        &self,
        experiment_id: i64,
    ) -> Result<ExperimentResults, ApiError>;
}

#[async_trait]
impl ExperimentsGateway for BackendClient {
    async fn list_experiments(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ExperimentListResponse, ApiError> {
        backend_api::experiments::list_experiments(self, page, page_size).await
    }

    async fn create_experiment(
        &self,
        request: &CreateExperimentRequest,
    ) -> Result<ExperimentListItem, ApiError> {
        backend_api::experiments::create_experiment(self, request).await
    }

    async fn start_experiment(&self, experiment_id: i64) -> Result<(), ApiError> {
        backend_api::experiments::start_experiment(self, experiment_id).await
    }

    async fn stop_experiment(&self, experiment_id: i64) -> Result<(), ApiError> {
        backend_api::experiments::stop_experiment(self, experiment_id).await
    }

    async fn experiment_results(
        &self,
        experiment_id: i64,
    ) -> Result<ExperimentResults, ApiError> {
        backend_api::experiments::experiment_results(self, experiment_id).await
    }
}

pub struct ExperimentsUseCase<G>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    gateway: Arc<G>,
    cache: Arc<QueryCache>,
}

impl<G> ExperimentsUseCase<G>
where
    G: ExperimentsGateway + Send + Sync + 'static,
{
    pub fn new(gateway: Arc<G>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list_experiments(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<ExperimentListResponse, ApiError> {
        info!(page, page_size, "experiments: listing");
        let key = CacheKey::list(
            resources::EXPERIMENTS,
            &serde_json::json!({ "page": page, "page_size": page_size }),
        );
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.list_experiments(page, page_size).await }
            })
            .await
    }

    pub async fn create_experiment(
        &self,
        request: &CreateExperimentRequest,
    ) -> Result<ExperimentListItem, ApiError> {
        info!(name = %request.name, metric = %request.metric, "experiments: creating");
        let created = self.gateway.create_experiment(request).await.map_err(|err| {
            error!(name = %request.name, error = %err, "experiments: create failed");
            err
        })?;
        self.cache.invalidate(&AdminMutation::CreateExperiment);
        Ok(created)
    }

    pub async fn start_experiment(&self, experiment_id: i64) -> Result<(), ApiError> {
        info!(experiment_id, "experiments: requesting start");
        self.gateway.start_experiment(experiment_id).await.map_err(|err| {
            error!(experiment_id, error = %err, "experiments: start failed");
            err
        })?;
        self.cache
            .invalidate(&AdminMutation::StartExperiment { experiment_id });
        Ok(())
    }

    pub async fn stop_experiment(&self, experiment_id: i64) -> Result<(), ApiError> {
        info!(experiment_id, "experiments: requesting stop");
        self.gateway.stop_experiment(experiment_id).await.map_err(|err| {
            error!(experiment_id, error = %err, "experiments: stop failed");
            err
        })?;
        self.cache
            .invalidate(&AdminMutation::StopExperiment { experiment_id });
        Ok(())
    }

    pub async fn experiment_results(
        &self,
        experiment_id: i64,
    ) -> Result<ExperimentResults, ApiError> {
        info!(experiment_id, "experiments: loading results");
        let key = CacheKey::entity(resources::EXPERIMENT_RESULTS, experiment_id);
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(key, move || {
                let gateway = Arc::clone(&gateway);
                async move { gateway.experiment_results(experiment_id).await }
            })
            .await
    }
}
