//! # JSON Storage Module
//!
//! File-based storage implementation keeping each of the four
//! collections in one named JSON document under the data directory:
//!
//! ```text
//! data/
//! ├── budget_config.json
//! ├── members.json
//! ├── expenses.json
//! └── attrition.json
//! ```
//!
//! Every document is wrapped in an envelope carrying a
//! `data_format_version` tag and rewritten atomically (temp file, then
//! rename) on each mutation.

pub mod attrition_repository;
pub mod config_repository;
pub mod connection;
pub mod expense_repository;
pub mod member_repository;

pub use attrition_repository::AttritionRepository;
pub use config_repository::ConfigRepository;
pub use connection::JsonConnection;
pub use expense_repository::ExpenseRepository;
pub use member_repository::MemberRepository;
