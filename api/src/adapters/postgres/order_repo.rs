//! PostgreSQL adapter for OrderRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::domain::entities::{Order, OrderId};
use crate::domain::ports::OrderRepository;
use crate::entity::{orders, tickets};
use crate::error::DomainError;

const SCHEMA: &str = include_str!("schema.sql");

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    db: DatabaseConnection,
}

impl PostgresOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the tables when they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        self.db
            .execute_unprepared(SCHEMA)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn persist(&self, order: &Order) -> Result<OrderId, DomainError> {
        let (Some(email), Some(visit_date), Some(total_price), Some(order_number)) = (
            order.email(),
            order.visit_date(),
            order.total_price(),
            order.order_number(),
        ) else {
            return Err(DomainError::Validation(
                "Only priced and numbered orders can be stored".to_string(),
            ));
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let saved = orders::ActiveModel {
            id: NotSet,
            email: Set(email.to_string()),
            visit_date: Set(visit_date),
            total_price: Set(total_price),
            order_number: Set(order_number.to_string()),
            created_at: Set(order.created_at().fixed_offset()),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        let ticket_models: Vec<tickets::ActiveModel> = order
            .tickets()
            .iter()
            .map(|ticket| {
                let tariff = ticket.tariff(visit_date);
                tickets::ActiveModel {
                    id: Set(ticket.id.0),
                    order_id: Set(saved.id),
                    first_name: Set(ticket.first_name.clone()),
                    last_name: Set(ticket.last_name.clone()),
                    country: Set(ticket.country.clone()),
                    birth_date: Set(ticket.birth_date),
                    reduced: Set(ticket.reduced),
                    tariff: Set(tariff.to_string()),
                    price: Set(tariff.price()),
                }
            })
            .collect();

        if !ticket_models.is_empty() {
            tickets::Entity::insert_many(ticket_models)
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(OrderId(saved.id))
    }

    async fn count_tickets_for_date(&self, date: NaiveDate) -> Result<u64, DomainError> {
        tickets::Entity::find()
            .inner_join(orders::Entity)
            .filter(orders::Column::VisitDate.eq(date))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn order_number_exists(&self, order_number: &str) -> Result<bool, DomainError> {
        let count = orders::Entity::find()
            .filter(orders::Column::OrderNumber.eq(order_number))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}
