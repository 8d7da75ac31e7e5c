/// Trait for types having a constant default value. This is essentially a
/// constant version of `Default`.
///
/// It allows an unbound [`Delegate`] to be embedded in a structure with a
/// `const` initializer. (`Delegate` is `!Sync`, so such a structure can't be
/// placed in a `static` as is.)
///
/// ```
/// use core::cell::Cell;
/// use r3_delegate::{prelude::*, Delegate};
///
/// struct Hooks {
///     on_tick: Cell<Delegate<'static, (u32,)>>,
/// }
///
/// impl Init for Hooks {
///     const INIT: Self = Self { on_tick: Cell::new(Delegate::INIT) };
/// }
///
/// let hooks = Hooks::INIT;
/// assert!(!hooks.on_tick.get().is_bound());
/// ```
///
/// ```compile_fail
/// use r3_delegate::{prelude::*, Delegate};
///
/// static ON_TICK: Delegate<'static, (u32,)> = Delegate::INIT;
/// ```
///
/// [`Delegate`]: crate::Delegate
pub trait Init {
    /// The default value.
    const INIT: Self;
}
