#![deny(unsafe_op_in_unsafe_fn)]
#![doc = include_str!("./lib.md")]
#![cfg_attr(not(test), no_std)] // Link `std` only when building a test (`cfg(test)`)

#[cfg(doc)]
#[doc = include_str!("../CHANGELOG.md")]
pub mod _changelog_ {}

pub mod utils;

pub mod bind;
mod delegate;
pub mod erased;
mod error;
pub mod signature;
mod target;
mod trampoline;

pub use self::{
    delegate::Delegate,
    erased::{Context, RawDelegate},
    error::BadDelegateCall,
    target::TargetKind,
};

/// The prelude module.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::bind::{
        bind_fn, bind_method, bind_method_mut, bind_mut, bind_ptr, bind_ref, bind_stateless,
        bind_value,
    };
    #[doc(no_inline)]
    pub use crate::utils::Init;
}
