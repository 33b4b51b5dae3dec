pub mod aari_repo;
pub use aari_repo::{AariRepository, AariStore};
pub mod customer_repo;
pub use customer_repo::{CustomerRepository, CustomerStore};
pub mod shop_repo;
pub use shop_repo::{ShopRepository, ShopStore};
pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};

pub mod memory;
