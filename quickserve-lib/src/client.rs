use std::sync::Arc;

use crate::{
    Result,
    api::{AdminApi, HttpApi},
    cache::{QueryCache, QueryOptions},
    config::CoreConfig,
    data::{Customers, Workers},
    notify::Notifications,
};

/// Central access point for all quickServe data.
///
/// Every service handed out by a [`Client`] shares the same [`QueryCache`] and
/// [`Notifications`], so a write through one of them is seen by all readers.
#[derive(Debug, Clone)]
pub struct Client {
    cache: QueryCache,
    notifications: Notifications,
    customers: Customers,
    workers: Workers,
}

impl Client {
    /// Connect to the API described by `cfg`.
    pub fn new(cfg: &CoreConfig) -> Result<Self> {
        let api = HttpApi::new(&cfg.api_url, cfg.request_timeout())?;

        Ok(Self::with_api(Arc::new(api), cfg.query))
    }

    pub fn with_api(api: Arc<dyn AdminApi>, defaults: QueryOptions) -> Self {
        let cache = QueryCache::new();
        let notifications = Notifications::new();

        Self {
            customers: Customers::new(api.clone(), cache.clone(), notifications.clone(), defaults),
            workers: Workers::new(api, cache.clone(), defaults),
            cache,
            notifications,
        }
    }

    pub fn customers(&self) -> &Customers {
        &self.customers
    }

    pub fn workers(&self) -> &Workers {
        &self.workers
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    #[cfg(test)]
    /// Return a [`Client`] backed by an in-memory API holding `customers`.
    pub(crate) fn mock(customers: Vec<crate::models::Customer>) -> (Self, crate::api::MemoryApi) {
        let api = crate::api::MemoryApi::new(customers);
        (Self::with_api(Arc::new(api.clone()), QueryOptions::default()), api)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        models::{Customer, Role},
        workflow::{CustomerTable, EditOutcome, Field, ModeratorDirectory},
    };

    fn users() -> Vec<Customer> {
        vec![
            Customer::new(1, "Ada", "ada@example.com", "").with_role(Role::Moderator),
            Customer::new(2, "Grace", "grace@example.com", "").with_role(Role::Customer),
        ]
    }

    #[tokio::test]
    async fn test_edit_from_table_updates_moderator_view() {
        let (client, api) = Client::mock(users());
        let mut table = CustomerTable::default();
        let mut directory = ModeratorDirectory::new(client.customers().get_all().await.unwrap());
        directory.set_search("lovelace".into());
        assert_eq!(directory.view().summary.total, 0);

        let ada = client.customers().get_all().await.unwrap().first().cloned().unwrap();
        table.edit(ada);
        table.edit.set_field(Field::Name, "Ada Lovelace".into());
        let request = table.edit.submit().unwrap();
        let result = client.customers().update(&request.id, &request.patch).await;

        assert_eq!(table.edit.resolve(request.ticket, &result), EditOutcome::Saved);
        assert!(!table.edit.is_open());

        directory.set_users(client.customers().get_all().await.unwrap());
        assert_eq!(directory.view().summary.total, 1);
        assert_eq!(api.customer_fetches(), 2);
        assert_eq!(client.notifications().drain().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_modal_open() {
        let (client, api) = Client::mock(users());
        let mut table = CustomerTable::default();
        api.reject_next(422, serde_json::json!({ "errors": { "email": ["invalid"] } }));

        table.edit(users().first().cloned().unwrap());
        table.edit.set_field(Field::Email, "not-an-email".into());
        let request = table.edit.submit().unwrap();
        let result = client.customers().update(&request.id, &request.patch).await;

        let outcome = table.edit.resolve(request.ticket, &result);

        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(table.edit.is_open());
        assert_eq!(table.edit.error(Field::Email), Some("invalid"));
        assert_eq!(api.customers().first().unwrap().email, "ada@example.com");
    }
}
