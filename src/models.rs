pub mod aari;
pub mod customer;
pub mod shop;
pub mod user;
