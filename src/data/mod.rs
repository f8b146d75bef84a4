//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  records.{parquet,json,csv}     yearly.{json,csv}
//!            │                          │
//!            └──────────┬───────────────┘
//!                       ▼
//!                ┌──────────┐
//!                │  loader   │  both reads run together → EmigrantDataset
//!                └──────────┘
//!                       │
//!                       ▼
//!              ┌─────────────────┐
//!              │ EmigrantDataset │  Vec<EmigrantRecord>, year → aggregate
//!              └─────────────────┘
//!                       │
//!                       ▼
//!                ┌──────────┐
//!                │  filter   │  inclusive year range → filtered rows
//!                └──────────┘
//! ```
//!
//! `fields` holds the column aliases every chart reads through.

pub mod fields;
pub mod filter;
pub mod loader;
pub mod model;
