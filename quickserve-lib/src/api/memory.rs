use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Value, json};

use crate::{
    api::{AdminApi, ApiError},
    models::{Customer, CustomerPatch, RecordId, Worker},
};

/// In-process [`AdminApi`] holding its records in memory.
///
/// Behaves like the real server for the happy path and for unknown ids. Writes can be made to
/// fail on demand with [`MemoryApi::reject_next`].
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    customers: Vec<Customer>,
    workers: Vec<Worker>,
    rejections: VecDeque<(u16, Value)>,
    customer_fetches: usize,
}

impl MemoryApi {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                customers,
                ..Default::default()
            })),
        }
    }

    pub fn with_workers(self, workers: Vec<Worker>) -> Self {
        self.state.write().workers = workers;
        self
    }

    /// Current server-side customers.
    pub fn customers(&self) -> Vec<Customer> {
        self.state.read().customers.clone()
    }

    /// Make the next write fail with `status` and the given JSON error body.
    pub fn reject_next(&self, status: u16, body: Value) {
        self.state.write().rejections.push_back((status, body));
    }

    /// How many times the customer collection has been requested.
    pub fn customer_fetches(&self) -> usize {
        self.state.read().customer_fetches
    }

    fn take_rejection(state: &mut State) -> Result<(), ApiError> {
        match state.rejections.pop_front() {
            Some((status, body)) => Err(ApiError::from_status(status, &body.to_string())),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, &json!({ "message": "Customer not found" }).to_string())
    }
}

#[async_trait]
impl AdminApi for MemoryApi {
    async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let mut state = self.state.write();
        state.customer_fetches = state.customer_fetches.saturating_add(1);

        Ok(state.customers.clone())
    }

    async fn update_customer(&self, id: &RecordId, patch: &CustomerPatch) -> Result<(), ApiError> {
        let mut state = self.state.write();
        Self::take_rejection(&mut state)?;

        let customer = state
            .customers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(Self::not_found)?;
        customer.apply(patch);

        Ok(())
    }

    async fn delete_customer(&self, id: &RecordId) -> Result<(), ApiError> {
        let mut state = self.state.write();
        Self::take_rejection(&mut state)?;

        let before = state.customers.len();
        state.customers.retain(|c| &c.id != id);

        if state.customers.len() == before {
            return Err(Self::not_found());
        }

        Ok(())
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, ApiError> {
        Ok(self.state.read().workers.clone())
    }
}
