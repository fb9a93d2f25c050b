//! Domain entities
//!
//! Pure domain models for the ticket-ordering flow.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod contact;
pub mod order;
pub mod session;
pub mod tariff;
pub mod ticket;

pub use contact::ContactMessage;
pub use order::{Order, OrderId, OrderKey, OrderStage};
pub use session::{Flash, SessionData, SessionId};
pub use tariff::{format_price, Tariff};
pub use ticket::{NewTicket, Ticket, TicketId};
