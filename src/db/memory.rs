// src/db/memory.rs
//
// Repositórios em memória com os mesmos contratos dos repositórios Postgres.
// Usados pelos testes; cada operação segura o lock durante todo o
// ler-alterar-gravar, como o SQL de um único comando.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::{AariStore, CustomerStore, ShopStore, UserStore, customer_repo::conflict_error},
    models::{
        aari::{
            AariOrder, AariStatus, ClientPriceSelector, CompletedAariSummary, NewAariOrder,
            PendingAariSummary,
        },
        customer::{Customer, CustomerKey, NewCustomer},
        shop::Shop,
        user::User,
    },
};

fn page_of<T>(items: Vec<T>, page: Pagination) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

#[derive(Default)]
pub struct MemoryAariStore {
    orders: Mutex<Vec<AariOrder>>,
}

impl MemoryAariStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documento completo, para asserts.
    pub async fn get(&self, order_id: &str) -> Option<AariOrder> {
        self.orders
            .lock()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl AariStore for MemoryAariStore {
    async fn insert(&self, order: &NewAariOrder, designs: &[String]) -> Result<AariOrder, AppError> {
        let mut orders = self.orders.lock().await;
        if orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(AppError::Conflict("Order ID already exists".into()));
        }

        let now = Utc::now();
        let stored = AariOrder {
            id: orders.iter().map(|o| o.id).max().unwrap_or(0) + 1,
            order_id: order.order_id.clone(),
            customer_id: order.customer_id.clone(),
            name: order.name.clone(),
            phone_number: order.phone_number.clone(),
            address: order.address.clone(),
            staff_name: order.staff_name.clone(),
            additional_information: order.additional_information.clone(),
            submission_date: order.submission_date,
            delivery_date: order.delivery_date,
            work_type: order.work_type,
            designs: designs.to_vec(),
            quoted_price: order.quoted_price,
            worker_price: None,
            client_price: None,
            status: AariStatus::Pending,
            completed_date: None,
            created_at: now,
            updated_at: now,
        };
        orders.push(stored.clone());
        Ok(stored)
    }

    async fn list_pending(&self, page: Pagination) -> Result<Vec<PendingAariSummary>, AppError> {
        let orders = self.orders.lock().await;
        let mut pending: Vec<&AariOrder> = orders
            .iter()
            .filter(|o| o.status == AariStatus::Pending)
            .collect();
        pending.sort_by(|a, b| {
            a.delivery_date
                .cmp(&b.delivery_date)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(page_of(pending.into_iter().map(PendingAariSummary::from).collect(), page))
    }

    async fn list_completed(&self, page: Pagination) -> Result<Vec<CompletedAariSummary>, AppError> {
        let orders = self.orders.lock().await;
        let mut completed: Vec<&AariOrder> = orders
            .iter()
            .filter(|o| o.status == AariStatus::Completed)
            .collect();
        completed.sort_by(|a, b| {
            b.completed_date
                .cmp(&a.completed_date)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(page_of(completed.into_iter().map(CompletedAariSummary::from).collect(), page))
    }

    async fn find_designs(&self, order_id: &str) -> Result<Option<Vec<String>>, AppError> {
        Ok(self.get(order_id).await.map(|o| o.designs))
    }

    async fn delete(&self, order_id: &str) -> Result<bool, AppError> {
        let mut orders = self.orders.lock().await;
        let before = orders.len();
        orders.retain(|o| o.order_id != order_id);
        Ok(orders.len() < before)
    }

    async fn mark_completed(
        &self,
        order_id: &str,
        worker_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError> {
        let mut orders = self.orders.lock().await;
        let Some(order) = orders.iter_mut().find(|o| o.order_id == order_id) else {
            return Ok(None);
        };

        let now = Utc::now();
        order.status = AariStatus::Completed;
        order.completed_date.get_or_insert(now);
        order.worker_price = Some(worker_price);
        order.updated_at = now;
        Ok(Some(order.clone()))
    }

    async fn set_client_price(
        &self,
        selector: &ClientPriceSelector,
        client_price: Decimal,
    ) -> Result<Option<AariOrder>, AppError> {
        let mut orders = self.orders.lock().await;
        let target = match selector {
            ClientPriceSelector::OrderId(order_id) => {
                orders.iter_mut().find(|o| &o.order_id == order_id)
            }
            ClientPriceSelector::PhoneNumber(phone) => orders
                .iter_mut()
                .filter(|o| &o.phone_number == phone)
                .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))),
        };

        Ok(target.map(|order| {
            order.client_price = Some(client_price);
            order.updated_at = Utc::now();
            order.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryCustomerStore {
    customers: Mutex<Vec<Customer>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Customer> {
        self.customers.lock().await.clone()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn find_conflict(
        &self,
        customer_id: &str,
        phone_number: &str,
    ) -> Result<Option<CustomerKey>, AppError> {
        let customers = self.customers.lock().await;
        if customers.iter().any(|c| c.customer_id == customer_id) {
            return Ok(Some(CustomerKey::CustomerId));
        }
        if customers.iter().any(|c| c.phone_number == phone_number) {
            return Ok(Some(CustomerKey::PhoneNumber));
        }
        Ok(None)
    }

    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, AppError> {
        let mut customers = self.customers.lock().await;
        if customers.iter().any(|c| c.customer_id == customer.customer_id) {
            return Err(conflict_error(CustomerKey::CustomerId));
        }
        if customers.iter().any(|c| c.phone_number == customer.phone_number) {
            return Err(conflict_error(CustomerKey::PhoneNumber));
        }

        let now = Utc::now();
        let stored = Customer {
            id: customers.len() as i64 + 1,
            customer_id: customer.customer_id.clone(),
            name: customer.name.clone(),
            phone_number: customer.phone_number.clone(),
            alternate_number: customer.alternate_number.clone(),
            address: customer.address.clone(),
            town: customer.town.clone(),
            district: customer.district.clone(),
            state: customer.state.clone(),
            date_of_birth: customer.date_of_birth.clone(),
            marital_status: customer.marital_status.clone(),
            created_at: now,
            updated_at: now,
        };
        customers.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Default)]
pub struct MemoryShopStore {
    shop: Mutex<Option<Shop>>,
    reads: Mutex<usize>,
}

impl MemoryShopStore {
    pub fn with_shop(shop: Shop) -> Self {
        Self {
            shop: Mutex::new(Some(shop)),
            reads: Mutex::new(0),
        }
    }

    /// Quantas vezes o repositório foi consultado de fato.
    pub async fn reads(&self) -> usize {
        *self.reads.lock().await
    }
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    async fn find_shop(&self) -> Result<Option<Shop>, AppError> {
        *self.reads.lock().await += 1;
        Ok(self.shop.lock().await.clone())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Vec<User>,
}

impl MemoryUserStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone_variants: &[String],
    ) -> Result<Option<User>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .iter()
            .find(|u| u.email.to_lowercase() == email && phone_variants.contains(&u.phone_number))
            .cloned())
    }
}
