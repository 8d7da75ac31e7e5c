//! Trampolines, one instantiated per combination of binding kind, target,
//! and delegate signature.
//!
//! Every trampoline (1) recovers the target from a compile-time type or from
//! the [`Context`], (2) widens the arguments, (3) calls the target, and (4)
//! adapts the result by the [`ReturnMode`] `M`. Nothing else happens; panics
//! unwind through the trampoline untouched.
use crate::{
    erased::Context,
    signature::{Callable, CallableMut, FnPtr, MethodFn, MethodFnMut, ReturnMode, Widen},
    utils::mem::conjure,
};

/// For [`TargetKind::Function`] and [`TargetKind::Value`]. The context is
/// unused.
///
/// # Safety
///
/// A value of `F` must have been observed when the trampoline was selected.
///
/// [`TargetKind::Function`]: crate::TargetKind::Function
/// [`TargetKind::Value`]: crate::TargetKind::Value
pub(crate) unsafe fn zst<F, UArgs, Args, R, M>(_: Context, args: Args) -> R
where
    F: Callable<UArgs> + Copy,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    // Safety: Upheld by the caller
    let func: F = unsafe { conjure() };
    M::adapt(func.invoke(args.widen()))
}

/// For [`TargetKind::Stateless`]. The context is unused.
///
/// [`TargetKind::Stateless`]: crate::TargetKind::Stateless
pub(crate) unsafe fn stateless<F, UArgs, Args, R, M>(_: Context, args: Args) -> R
where
    F: Callable<UArgs> + Default,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    M::adapt(F::default().invoke(args.widen()))
}

/// For [`TargetKind::Method`]. The context points to a `T`.
///
/// # Safety
///
/// See [`zst`] and [`Context::as_ref`].
///
/// [`TargetKind::Method`]: crate::TargetKind::Method
pub(crate) unsafe fn method<F, T, UArgs, Args, R, M>(cx: Context, args: Args) -> R
where
    F: MethodFn<T, UArgs> + Copy,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    // Safety: Upheld by the caller
    let (func, receiver): (F, &T) = unsafe { (conjure(), cx.as_ref()) };
    M::adapt(func.invoke_method(receiver, args.widen()))
}

/// For [`TargetKind::MethodMut`]. The context points to a `T`.
///
/// # Safety
///
/// See [`zst`] and [`Context::as_mut`].
///
/// [`TargetKind::MethodMut`]: crate::TargetKind::MethodMut
pub(crate) unsafe fn method_mut<F, T, UArgs, Args, R, M>(cx: Context, args: Args) -> R
where
    F: MethodFnMut<T, UArgs> + Copy,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    // Safety: Upheld by the caller
    let (func, receiver): (F, &mut T) = unsafe { (conjure(), cx.as_mut()) };
    M::adapt(func.invoke_method_mut(receiver, args.widen()))
}

/// For [`TargetKind::Ref`]. The context points to an `F`.
///
/// # Safety
///
/// See [`Context::as_ref`].
///
/// [`TargetKind::Ref`]: crate::TargetKind::Ref
pub(crate) unsafe fn by_ref<F, UArgs, Args, R, M>(cx: Context, args: Args) -> R
where
    F: Callable<UArgs>,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    // Safety: Upheld by the caller
    let func: &F = unsafe { cx.as_ref() };
    M::adapt(func.invoke(args.widen()))
}

/// For [`TargetKind::RefMut`]. The context points to an `F`.
///
/// # Safety
///
/// See [`Context::as_mut`].
///
/// [`TargetKind::RefMut`]: crate::TargetKind::RefMut
pub(crate) unsafe fn by_mut<F, UArgs, Args, R, M>(cx: Context, args: Args) -> R
where
    F: CallableMut<UArgs>,
    Args: Widen<UArgs>,
    M: ReturnMode<F::Output, R>,
{
    // Safety: Upheld by the caller
    let func: &mut F = unsafe { cx.as_mut() };
    M::adapt(func.invoke_mut(args.widen()))
}

/// For [`TargetKind::Pointer`]. The context holds the function pointer.
///
/// # Safety
///
/// See [`FnPtr::from_context`].
///
/// [`TargetKind::Pointer`]: crate::TargetKind::Pointer
pub(crate) unsafe fn pointer<P, Args, R, M>(cx: Context, args: Args) -> R
where
    P: FnPtr,
    Args: Widen<P::Args>,
    M: ReturnMode<P::Output, R>,
{
    // Safety: Upheld by the caller
    let func: P = unsafe { P::from_context(cx) };
    M::adapt(func.invoke_ptr(args.widen()))
}
