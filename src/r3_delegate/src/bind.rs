//! Binders, the entry points that describe what a [`Delegate`] should be bound
//! to.
//!
//! Each binder returns a [`Target`], an opaque token consumable only by
//! [`Delegate`]'s `From` implementations (and thus by [`Delegate::set`]).
//! Which trampoline is used is decided here, entirely at compile time.
//!
//! | Binder              | Target                              | Context     | Identity query              |
//! | ------------------- | ----------------------------------- | ----------- | --------------------------- |
//! | [`bind_fn`]         | zero-sized function                 | unused      | [`Delegate::has_fn`]        |
//! | [`bind_method`]     | method with `&T` receiver           | `&T`        | [`Delegate::has_method`]    |
//! | [`bind_method_mut`] | method with `&mut T` receiver       | `&mut T`    | [`Delegate::has_method`]    |
//! | [`bind_stateless`]  | default-constructible callable type | unused      | [`Delegate::has_stateless`] |
//! | [`bind_value`]      | zero-sized callable value           | unused      | [`Delegate::has_value`]     |
//! | [`bind_ref`]        | `Fn` callable by reference          | `&F`        | [`Delegate::has_ref`]       |
//! | [`bind_mut`]        | `FnMut` callable by reference       | `&mut F`    | [`Delegate::has_ref`]       |
//! | [`bind_ptr`]        | function pointer                    | the pointer | [`Delegate::has_ptr`]       |
//!
//! By default, the target's return value is converted to the delegate's
//! return type by [`Into`]. [`Target::discard`] makes the target bindable to a
//! delegate returning `()` regardless of what it returns.
//!
//! ```
//! use r3_delegate::{bind::bind_fn, Delegate};
//!
//! fn square(x: i32) -> i32 {
//!     x * x
//! }
//!
//! // Same signature
//! let d: Delegate<(i32,), i32> = bind_fn(square).into();
//! assert_eq!(d.call(3), Ok(9));
//!
//! // Widened argument and return types
//! let d: Delegate<(i16,), i64> = bind_fn(square).into();
//! assert_eq!(d.call(3), Ok(9));
//!
//! // The returned value is dropped
//! let d: Delegate<(i32,)> = bind_fn(square).discard().into();
//! assert_eq!(d.call(3), Ok(()));
//! ```
//!
//! [`Delegate`]: crate::Delegate
//! [`Delegate::set`]: crate::Delegate::set
//! [`Delegate::has_fn`]: crate::Delegate::has_fn
//! [`Delegate::has_method`]: crate::Delegate::has_method
//! [`Delegate::has_stateless`]: crate::Delegate::has_stateless
//! [`Delegate::has_value`]: crate::Delegate::has_value
//! [`Delegate::has_ref`]: crate::Delegate::has_ref
//! [`Delegate::has_ptr`]: crate::Delegate::has_ptr
use core::{fmt, marker::PhantomData, mem::size_of};

use crate::signature::{
    Callable, CallableMut, Covariant, Discard, FnPtr, MethodFn, MethodFnMut,
};

/// A binding token produced by a binder function. `K` describes the target
/// and `M` the [`ReturnMode`](crate::signature::ReturnMode).
#[must_use = "a target does nothing unless converted into a `Delegate`"]
pub struct Target<K, M = Covariant> {
    pub(crate) kind: K,
    _mode: PhantomData<fn() -> M>,
}

impl<K> Target<K, Covariant> {
    #[inline]
    const fn new(kind: K) -> Self {
        Self {
            kind,
            _mode: PhantomData,
        }
    }

    /// Drop the target's return value instead of converting it, making the
    /// target bindable to delegates returning `()`.
    #[inline]
    pub fn discard(self) -> Target<K, Discard> {
        Target {
            kind: self.kind,
            _mode: PhantomData,
        }
    }
}

impl<K: fmt::Debug, M> fmt::Debug for Target<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Target").field(&self.kind).finish()
    }
}

// `UArgs` is only used to select the target's signature, so the tokens use
// `PhantomData<fn(UArgs)>` to avoid inheriting its auto traits.

/// The target description produced by [`bind_fn`].
pub struct Function<F, UArgs> {
    _phantom: PhantomData<(F, fn(UArgs))>,
}

/// The target description produced by [`bind_method`].
pub struct Method<'a, F, T, UArgs> {
    pub(crate) receiver: &'a T,
    _phantom: PhantomData<(F, fn(UArgs))>,
}

/// The target description produced by [`bind_method_mut`].
pub struct MethodMut<'a, F, T, UArgs> {
    pub(crate) receiver: &'a mut T,
    _phantom: PhantomData<(F, fn(UArgs))>,
}

/// The target description produced by [`bind_stateless`].
pub struct Stateless<F, UArgs> {
    _phantom: PhantomData<(fn() -> F, fn(UArgs))>,
}

/// The target description produced by [`bind_value`].
pub struct Value<F, UArgs> {
    _phantom: PhantomData<(F, fn(UArgs))>,
}

/// The target description produced by [`bind_ref`].
pub struct Ref<'a, F, UArgs> {
    pub(crate) callable: &'a F,
    _phantom: PhantomData<fn(UArgs)>,
}

/// The target description produced by [`bind_mut`].
pub struct RefMut<'a, F, UArgs> {
    pub(crate) callable: &'a mut F,
    _phantom: PhantomData<fn(UArgs)>,
}

/// The target description produced by [`bind_ptr`].
pub struct Pointer<P> {
    pub(crate) ptr: P,
}

macro_rules! impl_debug {
    ($( $name:ident $(<$lt:lifetime>)? ( $($field:ident),* ) ),* $(,)?) => {$(
        impl<$($lt,)? F, UArgs> fmt::Debug for $name<$($lt,)? F, UArgs> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("type", &core::any::type_name::<F>())
                    $( .field(stringify!($field), &(self.$field as *const _)) )*
                    .finish()
            }
        }
    )*};
}

impl_debug! {
    Function(),
    Stateless(),
    Value(),
    Ref<'a>(callable),
}

impl<F, UArgs> fmt::Debug for RefMut<'_, F, UArgs> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefMut")
            .field("type", &core::any::type_name::<F>())
            .field("callable", &(&*self.callable as *const F))
            .finish()
    }
}

impl<F, T, UArgs> fmt::Debug for Method<'_, F, T, UArgs> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("type", &core::any::type_name::<F>())
            .field("receiver", &(self.receiver as *const T))
            .finish()
    }
}

impl<F, T, UArgs> fmt::Debug for MethodMut<'_, F, T, UArgs> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMut")
            .field("type", &core::any::type_name::<F>())
            .field("receiver", &(&*self.receiver as *const T))
            .finish()
    }
}

impl<P: FnPtr> fmt::Debug for Pointer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pointer")
            .field("ptr", &self.ptr.to_context().as_ptr())
            .finish()
    }
}

/// Assert that `F` is zero-sized. This is what makes it possible to call `F`
/// without storing it.
#[inline]
const fn assert_zst<F>() {
    const { assert!(size_of::<F>() == 0, "the target must be zero-sized") };
}

/// Bind a zero-sized function, i.e., a function item (`square`,
/// `Vec::<u8>::len`) or a closure that captures nothing.
///
/// The function's identity is fully encoded in the trampoline, and nothing is
/// stored in the delegate's context. Passing a function pointer (which is not
/// zero-sized) is a compile-time error; use [`bind_ptr`] for that.
///
/// ```
/// use r3_delegate::{bind::bind_fn, Delegate};
///
/// let d: Delegate<(u8, u8), u32> = bind_fn(|a: u8, b: u8| a as u16 * b as u16).into();
/// assert_eq!(d.call(200, 200), Ok(40000));
/// ```
///
/// ```compile_fail
/// use r3_delegate::{bind::bind_fn, Delegate};
///
/// fn square(x: i32) -> i32 { x * x }
///
/// let d: Delegate<(i32,), i32> = bind_fn(square as fn(i32) -> i32).into();
/// ```
#[inline]
pub fn bind_fn<F, UArgs>(func: F) -> Target<Function<F, UArgs>>
where
    F: Callable<UArgs> + Copy + 'static,
{
    assert_zst::<F>();
    let _ = func;
    Target::new(Function {
        _phantom: PhantomData,
    })
}

/// Bind a zero-sized function taking `&T` as the first parameter, such as an
/// inherent method with a `&self` receiver, to a receiver.
///
/// A method taking `&self` may be bound through both `&T` and `&mut T` (the
/// latter is reborrowed). The receiver is borrowed for as long as the
/// resulting delegate is in use, and it's consulted on every call.
///
/// ```
/// use r3_delegate::{bind::bind_method, Delegate};
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
/// let a = Adder { x: 42 };
/// let d: Delegate<(i32,), i32> = bind_method(Adder::add, &a).into();
/// assert_eq!(d.call(2), Ok(44));
/// ```
///
/// A method taking `&mut self` must be bound with [`bind_method_mut`]:
///
/// ```compile_fail
/// use r3_delegate::{bind::bind_method, Delegate};
///
/// struct Adder {
///     x: i32,
/// }
///
/// impl Adder {
///     fn set(&mut self, y: i32) -> i32 {
///         self.x = y;
///         y
///     }
/// }
///
/// let mut a = Adder { x: 42 };
/// let d: Delegate<(i32,), i32> = bind_method(Adder::set, &mut a).into();
/// ```
#[inline]
pub fn bind_method<'a, F, T, UArgs>(
    func: F,
    receiver: &'a T,
) -> Target<Method<'a, F, T, UArgs>>
where
    F: MethodFn<T, UArgs> + Copy + 'static,
{
    assert_zst::<F>();
    let _ = func;
    Target::new(Method {
        receiver,
        _phantom: PhantomData,
    })
}

/// Bind a zero-sized function taking `&mut T` as the first parameter, such as
/// an inherent method with a `&mut self` receiver, to a receiver.
///
/// # Safety
///
/// The resulting delegate (and its copies) create a `&mut T` on every call.
/// The caller must ensure that no two calls overlap (e.g., by the method
/// re-entering the delegate) and that the receiver is not otherwise accessed
/// while a call is in progress.
///
/// ```
/// use r3_delegate::{bind::bind_method_mut, Delegate};
///
/// struct Counter {
///     count: u32,
/// }
///
/// impl Counter {
///     fn bump(&mut self, by: u32) {
///         self.count += by;
///     }
/// }
///
/// let mut c = Counter { count: 0 };
/// let d: Delegate<(u32,)> = unsafe { bind_method_mut(Counter::bump, &mut c) }.into();
/// d.call(2).unwrap();
/// d.call(3).unwrap();
/// assert_eq!(c.count, 5);
/// ```
#[inline]
pub unsafe fn bind_method_mut<'a, F, T, UArgs>(
    func: F,
    receiver: &'a mut T,
) -> Target<MethodMut<'a, F, T, UArgs>>
where
    F: MethodFnMut<T, UArgs> + Copy + 'static,
{
    assert_zst::<F>();
    let _ = func;
    Target::new(MethodMut {
        receiver,
        _phantom: PhantomData,
    })
}

/// Bind a callable type that is constructed by [`Default::default`] on every
/// call and dropped afterwards.
///
/// ```
/// use r3_delegate::{bind::bind_stateless, signature::Callable, Delegate};
///
/// #[derive(Default)]
/// struct Fnv1a;
///
/// impl Callable<(&'static str,)> for Fnv1a {
///     type Output = u32;
///
///     fn invoke(&self, (s,): (&'static str,)) -> u32 {
///         s.bytes().fold(0x811c9dc5, |h, b| (h ^ b as u32).wrapping_mul(0x01000193))
///     }
/// }
///
/// let d: Delegate<(&'static str,), u64> = bind_stateless::<Fnv1a, _>().into();
/// assert_eq!(d.call(""), Ok(0x811c9dc5));
/// assert!(d.has_stateless::<Fnv1a>());
/// ```
#[inline]
pub fn bind_stateless<F, UArgs>() -> Target<Stateless<F, UArgs>>
where
    F: Callable<UArgs> + Default + 'static,
{
    Target::new(Stateless {
        _phantom: PhantomData,
    })
}

/// Bind a zero-sized callable value. Unlike [`bind_fn`], the resulting
/// delegate is identified by [`Delegate::has_value`], which matches any value
/// of the same type.
///
/// ```
/// use r3_delegate::{bind::bind_value, Delegate};
///
/// let negate = |x: i32| -x;
/// let d: Delegate<(i32,), i32> = bind_value(negate).into();
/// assert_eq!(d.call(5), Ok(-5));
/// assert!(d.has_value(&negate));
/// assert!(!d.has_fn(negate));
/// ```
///
/// [`Delegate::has_value`]: crate::Delegate::has_value
#[inline]
pub fn bind_value<F, UArgs>(value: F) -> Target<Value<F, UArgs>>
where
    F: Callable<UArgs> + Copy + 'static,
{
    assert_zst::<F>();
    let _ = value;
    Target::new(Value {
        _phantom: PhantomData,
    })
}

/// Bind a callable by reference. The callable is not copied; the delegate
/// observes any change made to it through interior mutability.
///
/// ```
/// use core::cell::Cell;
/// use r3_delegate::{bind::bind_ref, Delegate};
///
/// let x = Cell::new(42);
/// let add_x = |y: i32| x.get() + y;
///
/// let d: Delegate<(i32,), i32> = bind_ref(&add_x).into();
/// assert_eq!(d.call(2), Ok(44));
/// x.set(0);
/// assert_eq!(d.call(2), Ok(2));
/// assert!(d.has_ref(&add_x));
/// ```
///
/// The callable must outlive the delegate:
///
/// ```compile_fail
/// use r3_delegate::{bind::bind_ref, Delegate};
///
/// let d: Delegate<(i32,), i32>;
/// {
///     let x = 42;
///     let add_x = move |y: i32| x + y;
///     d = bind_ref(&add_x).into();
/// }
/// d.call(2).unwrap();
/// ```
#[inline]
pub fn bind_ref<'a, F, UArgs>(callable: &'a F) -> Target<Ref<'a, F, UArgs>>
where
    F: Callable<UArgs>,
{
    Target::new(Ref {
        callable,
        _phantom: PhantomData,
    })
}

/// Bind an `FnMut` callable by mutable reference.
///
/// # Safety
///
/// The resulting delegate (and its copies) create a `&mut F` on every call.
/// The caller must ensure that no two calls overlap (e.g., by the callable
/// re-entering the delegate).
///
/// ```
/// use r3_delegate::{bind::bind_mut, Delegate};
///
/// let mut log = Vec::new();
/// let mut push = |x: u8| log.push(x);
///
/// let d: Delegate<(u8,)> = unsafe { bind_mut(&mut push) }.into();
/// d.call(1).unwrap();
/// d.call(2).unwrap();
/// assert_eq!(log, [1, 2]);
/// ```
#[inline]
pub unsafe fn bind_mut<'a, F, UArgs>(callable: &'a mut F) -> Target<RefMut<'a, F, UArgs>>
where
    F: CallableMut<UArgs>,
{
    Target::new(RefMut {
        callable,
        _phantom: PhantomData,
    })
}

/// Bind a function pointer. The pointer is stored in the delegate's context.
///
/// Both `fn` and `extern "C" fn` pointers are accepted. See [`FnPtr`] for
/// the supported types.
///
/// ```
/// use r3_delegate::{bind::bind_ptr, Delegate};
///
/// fn square(x: i32) -> i32 {
///     x * x
/// }
///
/// let p = square as fn(i32) -> i32;
/// let d: Delegate<(i32,), i64> = bind_ptr(p).into();
/// assert_eq!(d.call(-4), Ok(16));
/// assert!(d.has_ptr(p));
/// ```
#[inline]
pub fn bind_ptr<P: FnPtr>(ptr: P) -> Target<Pointer<P>> {
    Target::new(Pointer { ptr })
}
