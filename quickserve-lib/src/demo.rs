//! Sample data for running the front ends without a server.

use std::sync::Arc;

use serde_json::json;

use crate::{
    Client,
    api::MemoryApi,
    cache::QueryOptions,
    models::{Customer, Role, Worker},
};

pub fn customers() -> Vec<Customer> {
    vec![
        Customer::new(1, "Amara Okafor", "amara@example.com", "+1 555 0101"),
        Customer::new(2, "Jonas Berg", "jonas@example.com", "+1 555 0102"),
        Customer::new(3, "Mei Tanaka", "mei@example.com", "+1 555 0103")
            .with_role(Role::Moderator),
        Customer::new(4, "Luis Ortega", "luis@example.com", "+1 555 0104")
            .with_role(Role::Moderator)
            .with_active(Some(false)),
        Customer::new(5, "Priya Nair", "priya@example.com", "+1 555 0105")
            .with_role(Role::Customer),
    ]
}

pub fn workers() -> Vec<Worker> {
    vec![
        Worker {
            id: 100.into(),
            name: "Sam Carter".into(),
            service_type: json!(r#"["Plumbing","Heating"]"#),
            expertise_of_service: json!(r#"{"Plumbing": 5}"#),
        },
        Worker {
            id: 101.into(),
            name: "Noor Haddad".into(),
            service_type: json!(["Cleaning"]),
            expertise_of_service: json!({ "Cleaning": 4 }),
        },
        Worker {
            id: 102.into(),
            name: "Theo Martin".into(),
            service_type: json!("Gardening"),
            expertise_of_service: json!("not rated"),
        },
    ]
}

/// A [`Client`] backed by an in-memory API seeded with the sample records.
pub fn client(defaults: QueryOptions) -> Client {
    let api = MemoryApi::new(customers()).with_workers(workers());
    Client::with_api(Arc::new(api), defaults)
}
