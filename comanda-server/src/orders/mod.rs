//! Order lifecycle module
//!
//! Single authority for every state-changing operation on orders and their
//! line items:
//!
//! - **manager**: the lifecycle engine — create, item replacement, status
//!   updates, cancellation, the last-item cascade
//! - **resolver**: "latest order per table" resolution for the walk-up flow
//! - **history**: append-only status ledger (append + list, nothing else)
//! - **projection**: named read views assembled from one storage snapshot
//! - **money**: decimal arithmetic over menu prices
//!
//! # Mutation Flow
//!
//! ```text
//! handler → OrderManager
//!             ├─ 1. Per-order lock (at most one in-flight mutation)
//!             ├─ 2. Begin write transaction
//!             ├─ 3. Validate (terminal state, quantities, menu refs)
//!             ├─ 4. Mutate order + items, append history if status changed
//!             ├─ 5. Commit (all-or-nothing)
//!             └─ 6. Project detail view
//! ```

pub mod error;
pub mod history;
pub mod manager;
pub mod money;
pub mod projection;
pub mod resolver;

pub use error::OrderError;
pub use manager::OrderManager;
pub use resolver::TableOrderResolver;
