//! Payment repository adapters.
//!
//! - **InMemoryPaymentRepository** - Process-local map; payments are never
//!   persisted to disk

mod in_memory_payment_repository;

pub use in_memory_payment_repository::InMemoryPaymentRepository;
