//! Provides [`Delegate`], a non-owning, type-erased callable reference.
use core::{fmt, marker::PhantomData, mem};

use crate::{
    bind::{Function, Method, MethodMut, Pointer, Ref, RefMut, Stateless, Target, Value},
    erased::{Context, RawDelegate, Trampoline},
    error::BadDelegateCall,
    signature::{Callable, CallableMut, FnPtr, MethodFn, MethodFnMut, ReturnMode, Widen},
    target::{Descriptor, TargetKind},
    trampoline,
    utils::Init,
};

/// A non-owning reference to a callable target with the argument list `Args`
/// (a tuple) and the return type `R`.
///
/// A `Delegate` is either *empty* or *bound*. It's created empty by
/// [`Delegate::new`] (or [`Default`], [`Init::INIT`]) and becomes bound when
/// constructed or assigned from a [binder][1]'s [`Target`]. It's a plain value
/// consisting of a [trampoline and a context pointer][2]: it doesn't allocate,
/// copying it doesn't copy the target, and dropping it is a no-op.
///
/// `'a` is the lifetime of the objects referenced by the delegate, i.e., the
/// receivers and callables bound by reference. The borrow checker ensures
/// that they outlive the delegate. [`Delegate::detach`] lifts this restriction
/// and makes it the caller's responsibility.
///
/// Invoking an empty delegate fails with [`BadDelegateCall`].
///
/// ```
/// use r3_delegate::{bind::{bind_fn, bind_method}, BadDelegateCall, Delegate};
///
/// struct Adder {
///     x: i32,
/// }
///
/// impl Adder {
///     fn add(&self, y: i32) -> i32 {
///         self.x + y
///     }
/// }
///
/// fn square(x: i32) -> i32 {
///     x * x
/// }
///
/// let a = Adder { x: 42 };
///
/// let mut d: Delegate<(i32,), i64> = Delegate::new();
/// assert_eq!(d.call(2), Err(BadDelegateCall));
///
/// d.set(bind_fn(square));
/// assert_eq!(d.call(2), Ok(4));
///
/// d.set(bind_method(Adder::add, &a));
/// assert_eq!(d.call(2), Ok(44));
///
/// d.reset();
/// assert!(!d.is_bound());
/// ```
///
/// # Identity
///
/// Each binder has a corresponding query method (`has_fn`, `has_method`,
/// etc.) that checks whether the delegate is currently bound by that binder to
/// the given target. A target bound by one binder is never reported as bound
/// by another; in particular, a function bound by [`bind_fn`][3] is not
/// matched by [`Delegate::has_ptr`] with a pointer to the same function.
///
/// # Thread safety
///
/// A `Delegate` is neither `Send` nor `Sync` because the thread safety of the
/// erased target is unknown.
///
/// [1]: crate::bind
/// [2]: RawDelegate
/// [3]: crate::bind::bind_fn
pub struct Delegate<'a, Args, R = ()> {
    raw: RawDelegate<Args, R>,
    /// `Some(_)` iff `raw.is_bound()`
    target: Option<Descriptor>,
    _borrow: PhantomData<&'a ()>,
}

impl<Args, R> Copy for Delegate<'_, Args, R> {}

impl<Args, R> Clone for Delegate<'_, Args, R> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<Args, R> Init for Delegate<'_, Args, R> {
    const INIT: Self = Self::new();
}

impl<Args, R> Default for Delegate<'_, Args, R> {
    #[inline]
    fn default() -> Self {
        Self::INIT
    }
}

impl<Args, R> fmt::Debug for Delegate<'_, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("kind", &self.target_kind())
            .field("context", &self.raw.context())
            .finish()
    }
}

impl<'a, Args, R> Delegate<'a, Args, R> {
    /// Construct an empty `Delegate`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            raw: RawDelegate::empty(),
            target: None,
            _borrow: PhantomData,
        }
    }

    /// Construct a bound `Delegate`.
    ///
    /// # Safety
    ///
    /// `trampoline(context, _)` must be safe to call for `'a`.
    #[inline]
    unsafe fn from_parts(
        trampoline: Trampoline<Args, R>,
        context: Context,
        target: Descriptor,
    ) -> Self {
        log::trace!("binding a {:?} target (context = {context:?})", target.kind);
        Self {
            // Safety: Upheld by the caller
            raw: unsafe { RawDelegate::from_raw_parts(trampoline, context) },
            target: Some(target),
            _borrow: PhantomData,
        }
    }

    /// Get a flag indicating whether `self` is bound to a target.
    #[inline]
    pub fn is_bound(&self) -> bool {
        self.raw.is_bound()
    }

    /// Get a flag indicating whether `self` is bound to a target. An alias of
    /// [`Self::is_bound`].
    #[inline]
    pub fn has_target(&self) -> bool {
        self.is_bound()
    }

    /// Get the kind of the bound target. Returns `None` if `self` is empty.
    #[inline]
    pub fn target_kind(&self) -> Option<TargetKind> {
        self.target.map(|d| d.kind)
    }

    /// Get the type-erased storage.
    #[inline]
    pub fn raw(&self) -> RawDelegate<Args, R> {
        self.raw
    }

    /// Make `self` empty. Does nothing if `self` is already empty.
    #[inline]
    pub fn reset(&mut self) {
        if self.is_bound() {
            log::trace!("unbinding a {:?} target", self.target_kind());
        }
        *self = Self::new();
    }

    /// Bind `self` to a new target, replacing the current one.
    #[inline]
    pub fn set(&mut self, target: impl Into<Self>) {
        *self = target.into();
    }

    /// Take the current value out of `self`, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Call the bound target with `args`.
    ///
    /// Returns `Err(BadDelegateCall)` if `self` is empty. Panics raised by the
    /// target are not caught.
    #[inline]
    pub fn invoke(&self, args: Args) -> Result<R, BadDelegateCall> {
        // Safety: `'a` guarantees the validity of the target, and the unsafe
        // binders' contracts cover the rest
        unsafe { self.raw.call(args) }.ok_or_else(|| {
            log::debug!("attempted to invoke a delegate with no target bound");
            BadDelegateCall
        })
    }

    /// Erase the lifetime of the targets referenced by `self`.
    ///
    /// # Safety
    ///
    /// The targets referenced by `self` must outlive every invocation through
    /// the returned delegate or its copies. This is not checked; invoking a
    /// delegate whose target is gone is undefined behavior.
    #[inline]
    pub unsafe fn detach(self) -> Delegate<'static, Args, R> {
        Delegate {
            raw: self.raw,
            target: self.target,
            _borrow: PhantomData,
        }
    }

    #[inline]
    fn is_target(&self, target: Descriptor) -> bool {
        self.target == Some(target)
    }

    /// Get a flag indicating whether `self` is bound to `func` by
    /// [`bind_fn`](crate::bind::bind_fn).
    #[inline]
    pub fn has_fn<F: 'static>(&self, func: F) -> bool {
        let _ = func;
        self.is_target(Descriptor::of::<F>(TargetKind::Function))
    }

    /// Get a flag indicating whether `self` is bound to `func` with the
    /// receiver `receiver` by [`bind_method`](crate::bind::bind_method) or
    /// [`bind_method_mut`](crate::bind::bind_method_mut).
    ///
    /// `receiver` is a raw pointer so that this method can be used while the
    /// receiver is mutably borrowed by `self`. Zero-sized receivers of the same
    /// type are indistinguishable if they share an address.
    #[inline]
    pub fn has_method<F: 'static, T>(&self, func: F, receiver: *const T) -> bool {
        let _ = func;
        (self.is_target(Descriptor::of_method::<F, T>(TargetKind::Method))
            || self.is_target(Descriptor::of_method::<F, T>(TargetKind::MethodMut)))
            && self.raw.context().addr_eq(receiver)
    }

    /// Get a flag indicating whether `self` is bound to `F` by
    /// [`bind_stateless`](crate::bind::bind_stateless).
    #[inline]
    pub fn has_stateless<F: 'static>(&self) -> bool {
        self.is_target(Descriptor::of::<F>(TargetKind::Stateless))
    }

    /// Get a flag indicating whether `self` is bound to a value of the same
    /// type as `value` by [`bind_value`](crate::bind::bind_value).
    #[inline]
    pub fn has_value<F: 'static>(&self, value: &F) -> bool {
        let _ = value;
        self.is_target(Descriptor::of::<F>(TargetKind::Value))
    }

    /// Get a flag indicating whether `self` is bound to the callable at
    /// `callable` by [`bind_ref`](crate::bind::bind_ref) or
    /// [`bind_mut`](crate::bind::bind_mut).
    ///
    /// Both the address and the type of `callable` must match. Zero-sized
    /// callables of the same type are indistinguishable if they share an
    /// address.
    #[inline]
    pub fn has_ref<F>(&self, callable: *const F) -> bool {
        (self.is_target(Descriptor::of::<F>(TargetKind::Ref))
            || self.is_target(Descriptor::of::<F>(TargetKind::RefMut)))
            && self.raw.context().addr_eq(callable)
    }

    /// Get a flag indicating whether `self` is bound to `ptr` by
    /// [`bind_ptr`](crate::bind::bind_ptr).
    #[inline]
    pub fn has_ptr<P: FnPtr>(&self, ptr: P) -> bool {
        self.is_target(Descriptor::of::<P>(TargetKind::Pointer))
            && self.raw.context() == ptr.to_context()
    }
}

macro_rules! impl_call {
    ( @start $($x:tt)* ) => {
        impl_call! { @iter [] [$($x)*] }
    };

    // inductive case
    ( @iter
        [$(($A:ident, $a:ident))*]
        [$next_head:tt $($next_tail:tt)*]
    ) => {
        impl_call! { @iter [$(($A, $a))* $next_head] [$($next_tail)*] }

        impl<'a, R, $( $A, )*> Delegate<'a, ( $( $A, )* ), R> {
            /// Call the bound target. Equivalent to [`Self::invoke`] with the
            /// arguments packed in a tuple.
            #[inline]
            pub fn call(&self, $( $a: $A ),*) -> Result<R, BadDelegateCall> {
                self.invoke(( $( $a, )* ))
            }
        }
    }; // end of macro arm

    // base case
    ( @iter [$($_discard:tt)*] [] ) => {}
}

seq_macro::seq!(I in 0..13 { impl_call! { @start #( (A~I, a~I) )* } });

// Conversion from binding tokens
// ----------------------------------------------------------------------------

impl<'a, F, UArgs, M, Args, R> From<Target<Function<F, UArgs>, M>> for Delegate<'a, Args, R>
where
    F: Callable<UArgs> + Copy + 'static,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(_: Target<Function<F, UArgs>, M>) -> Self {
        // Safety: `bind_fn` received a value of `F`
        unsafe {
            Self::from_parts(
                trampoline::zst::<F, UArgs, Args, R, M>,
                Context::NULL,
                Descriptor::of::<F>(TargetKind::Function),
            )
        }
    }
}

impl<'a, F, T, UArgs, M, Args, R> From<Target<Method<'a, F, T, UArgs>, M>>
    for Delegate<'a, Args, R>
where
    F: MethodFn<T, UArgs> + Copy + 'static,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(target: Target<Method<'a, F, T, UArgs>, M>) -> Self {
        // Safety: `bind_method` received a value of `F`, and the receiver is
        // borrowed for `'a`
        unsafe {
            Self::from_parts(
                trampoline::method::<F, T, UArgs, Args, R, M>,
                Context::from_ref(target.kind.receiver),
                Descriptor::of_method::<F, T>(TargetKind::Method),
            )
        }
    }
}

impl<'a, F, T, UArgs, M, Args, R> From<Target<MethodMut<'a, F, T, UArgs>, M>>
    for Delegate<'a, Args, R>
where
    F: MethodFnMut<T, UArgs> + Copy + 'static,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(target: Target<MethodMut<'a, F, T, UArgs>, M>) -> Self {
        // Safety: `bind_method_mut` received a value of `F`, the receiver is
        // borrowed for `'a`, and its caller promised exclusive access
        unsafe {
            Self::from_parts(
                trampoline::method_mut::<F, T, UArgs, Args, R, M>,
                Context::from_mut(target.kind.receiver),
                Descriptor::of_method::<F, T>(TargetKind::MethodMut),
            )
        }
    }
}

impl<'a, F, UArgs, M, Args, R> From<Target<Stateless<F, UArgs>, M>> for Delegate<'a, Args, R>
where
    F: Callable<UArgs> + Default + 'static,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(_: Target<Stateless<F, UArgs>, M>) -> Self {
        // Safety: The trampoline doesn't touch the context
        unsafe {
            Self::from_parts(
                trampoline::stateless::<F, UArgs, Args, R, M>,
                Context::NULL,
                Descriptor::of::<F>(TargetKind::Stateless),
            )
        }
    }
}

impl<'a, F, UArgs, M, Args, R> From<Target<Value<F, UArgs>, M>> for Delegate<'a, Args, R>
where
    F: Callable<UArgs> + Copy + 'static,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(_: Target<Value<F, UArgs>, M>) -> Self {
        // Safety: `bind_value` received a value of `F`
        unsafe {
            Self::from_parts(
                trampoline::zst::<F, UArgs, Args, R, M>,
                Context::NULL,
                Descriptor::of::<F>(TargetKind::Value),
            )
        }
    }
}

impl<'a, F, UArgs, M, Args, R> From<Target<Ref<'a, F, UArgs>, M>> for Delegate<'a, Args, R>
where
    F: Callable<UArgs>,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(target: Target<Ref<'a, F, UArgs>, M>) -> Self {
        // Safety: The callable is borrowed for `'a`
        unsafe {
            Self::from_parts(
                trampoline::by_ref::<F, UArgs, Args, R, M>,
                Context::from_ref(target.kind.callable),
                Descriptor::of::<F>(TargetKind::Ref),
            )
        }
    }
}

impl<'a, F, UArgs, M, Args, R> From<Target<RefMut<'a, F, UArgs>, M>> for Delegate<'a, Args, R>
where
    F: CallableMut<UArgs>,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    #[inline]
    fn from(target: Target<RefMut<'a, F, UArgs>, M>) -> Self {
        // Safety: The callable is borrowed for `'a`, and `bind_mut`'s caller
        // promised exclusive access
        unsafe {
            Self::from_parts(
                trampoline::by_mut::<F, UArgs, Args, R, M>,
                Context::from_mut(target.kind.callable),
                Descriptor::of::<F>(TargetKind::RefMut),
            )
        }
    }
}

impl<'a, P, M, Args, R> From<Target<Pointer<P>, M>> for Delegate<'a, Args, R>
where
    P: FnPtr,
    Args: Widen<P::Args>,
    M: ReturnMode<P::Output, R>,
{
    #[inline]
    fn from(target: Target<Pointer<P>, M>) -> Self {
        // Safety: The context holds a `P`
        unsafe {
            Self::from_parts(
                trampoline::pointer::<P, Args, R, M>,
                target.kind.ptr.to_context(),
                Descriptor::of::<P>(TargetKind::Pointer),
            )
        }
    }
}

#[cfg(test)]
mod tests;
mod tests_impls;
