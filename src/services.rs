pub mod aari_service;
pub use aari_service::AariService;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod shop_service;
pub use shop_service::ShopService;
pub mod user_service;
pub use user_service::UserService;
