pub mod assessments;
pub mod customers;
pub mod funds;
pub mod health;
pub mod orders;
pub mod products;
