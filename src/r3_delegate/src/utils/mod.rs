//! Utility
//!
//! **This module is exempt from the API stability guarantee** unless specified
//! otherwise. It's exposed mostly for [`Init`], which is re-exported by the
//! [prelude](crate::prelude).
mod init;
pub mod mem;
pub use init::*;
