//! Data models for Bookstall

pub mod book;
pub mod order;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use order::{Order, OrderItem, PaymentStatus, TransactionType};
pub use user::{Role, User};
