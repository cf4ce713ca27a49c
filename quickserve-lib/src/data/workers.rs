use std::sync::Arc;

use crate::{
    api::AdminApi,
    cache::{QueryCache, QueryKey, QueryOptions},
    data::QueryError,
    models::Worker,
};

pub const WORKERS_KEY: &str = "workers";

/// Read-only access to service providers.
#[derive(Debug, Clone)]
pub struct Workers {
    api: Arc<dyn AdminApi>,
    cache: QueryCache,
    defaults: QueryOptions,
}

impl Workers {
    pub fn new(api: Arc<dyn AdminApi>, cache: QueryCache, defaults: QueryOptions) -> Self {
        Self {
            api,
            cache,
            defaults,
        }
    }

    pub fn key() -> QueryKey {
        WORKERS_KEY.into()
    }

    pub async fn get_all(&self) -> Result<Vec<Worker>, QueryError> {
        self.cache
            .fetch(&Self::key(), self.defaults, || self.api.list_workers())
            .await
            .map_err(|err| QueryError::from_api(&err, "Failed to load workers"))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::api::MemoryApi;

    #[tokio::test]
    async fn test_get_all_decodes_services() {
        let api = MemoryApi::default().with_workers(vec![Worker {
            id: 9.into(),
            name: "Sam".into(),
            service_type: json!(r#"["Plumbing"]"#),
            expertise_of_service: json!(r#"{"Plumbing": 5}"#),
        }]);
        let workers = Workers::new(Arc::new(api), QueryCache::new(), QueryOptions::default());

        let fetched = workers.get_all().await.unwrap();

        assert_eq!(fetched.first().unwrap().services().display(), "Plumbing(5)");
    }
}
