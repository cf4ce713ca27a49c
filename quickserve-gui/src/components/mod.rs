pub mod customers;
pub mod moderators;
