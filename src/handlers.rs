pub mod aari;
pub mod customer;
pub mod health;
pub mod shop;
pub mod user;
