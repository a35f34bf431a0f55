//! Project bookkeeping. The basic idea is:
//!  - [registry::ProjectRegistry] keeps accumulated minutes for every project and knows which one
//!    is active.
//!  - The whole mapping is written through a [store::KeyValueStore] after every change.
//!  - Nothing is ever deleted, totals only grow.

pub mod entities;
pub mod registry;
pub mod store;
