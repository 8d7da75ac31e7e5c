//! Provides [`RawDelegate`], the type-erased storage of a bound target.
use core::{fmt, ptr};

use crate::utils::Init;

/// The context parameter type for [`RawDelegate`]. It's ABI-compatible with
/// `*const ()`.
///
/// It's something that would usually be just `void *` in C code. Depending on
/// the binding, it holds:
///
///  - nothing (a null pointer) for targets whose identity is fully encoded in
///    the [trampoline][1] (zero-sized functions and stateless callables),
///
///  - the address of the receiver for methods,
///
///  - the address of the callable for callables bound by reference, or
///
///  - the function pointer itself for function pointers.
///
/// A `Context` is meaningful only to the trampoline it was stored with and
/// must never be dereferenced by anything else.
///
/// [1]: Trampoline
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Context(*const ());

impl Context {
    /// The null context.
    pub const NULL: Self = Self(ptr::null());

    /// Construct a `Context` pointing to `x`.
    #[inline]
    pub const fn from_ref<T>(x: &T) -> Self {
        Self(x as *const T as *const ())
    }

    /// Construct a `Context` pointing to `x` that can later be turned back into
    /// a mutable reference.
    #[inline]
    pub fn from_mut<T>(x: &mut T) -> Self {
        Self(x as *mut T as *const ())
    }

    /// Construct a `Context` from a raw pointer.
    #[inline]
    pub const fn from_ptr(p: *const ()) -> Self {
        Self(p)
    }

    /// Get the stored address.
    #[inline]
    pub const fn as_ptr(self) -> *const () {
        self.0
    }

    /// Get a flag indicating whether `self` is [`Self::NULL`].
    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Get a flag indicating whether `self` points to the same address as `p`.
    /// Pointer metadata is ignored.
    #[inline]
    pub fn addr_eq<T: ?Sized>(self, p: *const T) -> bool {
        ptr::addr_eq(self.0, p)
    }

    /// Reinterpret `self` as a shared reference.
    ///
    /// # Safety
    ///
    /// `self` must have been created from a `&T` or `&mut T` that is still
    /// valid for `'a`.
    #[inline]
    pub unsafe fn as_ref<'a, T>(self) -> &'a T {
        unsafe { &*self.0.cast::<T>() }
    }

    /// Reinterpret `self` as a mutable reference.
    ///
    /// # Safety
    ///
    /// `self` must have been created by [`Self::from_mut`] from a `&mut T` that
    /// is still valid for `'a`, and no other reference to the pointee may be
    /// used during `'a`.
    #[inline]
    pub unsafe fn as_mut<'a, T>(self) -> &'a mut T {
        unsafe { &mut *self.0.cast::<T>().cast_mut() }
    }
}

impl Default for Context {
    #[inline]
    fn default() -> Self {
        Self::INIT
    }
}

impl Init for Context {
    const INIT: Self = Self::NULL;
}

impl fmt::Debug for Context {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Context").field(&self.0).finish()
    }
}

/// The function pointer type of a trampoline, which recovers the real target
/// from a [`Context`], converts the arguments and the result, and calls the
/// target.
///
/// A trampoline is instantiated for every combination of binding kind, target,
/// and delegate signature. `Args` is the argument list as a tuple.
pub type Trampoline<Args, R> = unsafe fn(Context, Args) -> R;

/// A type-erased reference to a callable, comprised of a [trampoline][1] and a
/// [context parameter][2]. No allocation or dynamic dispatch is involved.
///
/// This is the untyped, unchecked core of [`Delegate`][3]; it doesn't remember
/// what kind of target it was created from, and calling it is `unsafe` because
/// the lifetime of the target isn't tracked.
///
/// [1]: Trampoline
/// [2]: Context
/// [3]: crate::Delegate
pub struct RawDelegate<Args, R> {
    /// The trampoline. `None` iff `self` is empty.
    trampoline: Option<Trampoline<Args, R>>,
    context: Context,
}

impl<Args, R> Copy for RawDelegate<Args, R> {}

impl<Args, R> Clone for RawDelegate<Args, R> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<Args, R> Init for RawDelegate<Args, R> {
    const INIT: Self = Self::empty();
}

impl<Args, R> Default for RawDelegate<Args, R> {
    #[inline]
    fn default() -> Self {
        Self::INIT
    }
}

impl<Args, R> fmt::Debug for RawDelegate<Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDelegate")
            .field("trampoline", &self.trampoline.map(|t| t as *const ()))
            .field("context", &self.context)
            .finish()
    }
}

impl<Args, R> RawDelegate<Args, R> {
    /// Construct an empty `Self`.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            trampoline: None,
            context: Context::NULL,
        }
    }

    /// Construct a `Self` from a trampoline and an associated context
    /// parameter.
    ///
    /// # Safety
    ///
    /// Code that has access to the constructed `Self` will be able to execute
    /// `trampoline(context, _)` through [`Self::call`], whose caller only
    /// promises that the target is still alive. A corollary is that, if
    /// `trampoline` has additional safety requirements, they are lost by this
    /// function.
    #[inline]
    pub const unsafe fn from_raw_parts(trampoline: Trampoline<Args, R>, context: Context) -> Self {
        Self {
            trampoline: Some(trampoline),
            context,
        }
    }

    /// Get a flag indicating whether `self` holds a trampoline.
    #[inline]
    pub const fn is_bound(&self) -> bool {
        self.trampoline.is_some()
    }

    /// Get the trampoline.
    #[inline]
    pub const fn trampoline(&self) -> Option<Trampoline<Args, R>> {
        self.trampoline
    }

    /// Get the context parameter.
    #[inline]
    pub const fn context(&self) -> Context {
        self.context
    }

    /// Decompose `self` into raw components.
    #[inline]
    pub const fn as_raw_parts(&self) -> (Option<Trampoline<Args, R>>, Context) {
        (self.trampoline, self.context)
    }

    /// Call the trampoline. Returns `None` if `self` is empty.
    ///
    /// # Safety
    ///
    /// The target that `self` was created from must still be valid, and the
    /// safety requirements attached to the binding must be upheld.
    #[inline]
    pub unsafe fn call(&self, args: Args) -> Option<R> {
        let trampoline = self.trampoline?;
        // Safety: `self.context` is provided as the first parameter, and the
        // caller guarantees the validity of the target
        Some(unsafe { trampoline(self.context, args) })
    }
}
