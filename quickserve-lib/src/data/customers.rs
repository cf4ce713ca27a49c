use std::sync::Arc;

use tracing::info;

use crate::{
    api::AdminApi,
    cache::{QueryCache, QueryKey, QueryOptions},
    data::QueryError,
    models::{Customer, CustomerPatch, RecordId},
    notify::Notifications,
};

/// Cache key shared by every reader of the customer collection.
pub const CUSTOMERS_KEY: &str = "customers";

/// List, update and delete customers.
///
/// Updates and deletes invalidate [`CUSTOMERS_KEY`], so every other holder of the same
/// [`QueryCache`] refetches on its next read.
#[derive(Debug, Clone)]
pub struct Customers {
    api: Arc<dyn AdminApi>,
    cache: QueryCache,
    notifications: Notifications,
    defaults: QueryOptions,
}

impl Customers {
    pub fn new(
        api: Arc<dyn AdminApi>,
        cache: QueryCache,
        notifications: Notifications,
        defaults: QueryOptions,
    ) -> Self {
        Self {
            api,
            cache,
            notifications,
            defaults,
        }
    }

    pub fn key() -> QueryKey {
        CUSTOMERS_KEY.into()
    }

    /// Options used by [`Customers::get_all`]. Start from these to override single fields.
    pub fn default_options(&self) -> QueryOptions {
        self.defaults
    }

    pub async fn get_all(&self) -> Result<Vec<Customer>, QueryError> {
        self.get_all_with(self.defaults).await
    }

    pub async fn get_all_with(&self, options: QueryOptions) -> Result<Vec<Customer>, QueryError> {
        self.cache
            .fetch(&Self::key(), options, || self.api.list_customers())
            .await
            .map_err(|err| QueryError::from_api(&err, "Failed to load customers"))
    }

    pub async fn update(&self, id: &RecordId, patch: &CustomerPatch) -> Result<(), QueryError> {
        match self.api.update_customer(id, patch).await {
            Ok(()) => {
                info!(%id, "Updated customer");
                self.cache.invalidate(&Self::key());
                self.notifications.success("Customer updated successfully");
                Ok(())
            }
            Err(err) => {
                let err = QueryError::from_api(&err, "Failed to update customer");
                self.notifications.error(err.message.clone());
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), QueryError> {
        match self.api.delete_customer(id).await {
            Ok(()) => {
                info!(%id, "Deleted customer");
                self.cache.invalidate(&Self::key());
                self.notifications.success("Customer deleted successfully");
                Ok(())
            }
            Err(err) => {
                let err = QueryError::from_api(&err, "Failed to delete customer");
                self.notifications.error(err.message.clone());
                Err(err)
            }
        }
    }
}
