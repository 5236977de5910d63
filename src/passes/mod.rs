//! Pass lists, the pass catalog and the mutation operators over them.

pub mod catalog;
pub mod list;
pub mod mutate;

pub use catalog::{deny_reason, PassCatalog, DENYLIST};
pub use list::{PassList, PassName};
pub use mutate::{append_random, mutate_add, mutate_prune};
