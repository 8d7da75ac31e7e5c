//! Traits describing the shapes of bindable targets and the conversions
//! applied at the call boundary.
//!
//! A target with the argument list `UArgs` and the return type `UR` can be
//! bound to a [`Delegate`]`<'_, Args, R>` if `Args: `[`Widen`]`<UArgs>` (each
//! argument is [`Into`]-convertible to the target's) and the binding's
//! [`ReturnMode`] can turn `UR` into `R`.
//!
//! All traits in this module are implemented for argument lists of up to
//! twelve elements.
//!
//! [`Delegate`]: crate::Delegate
use crate::{erased::Context, utils::mem::transmute};

/// A callable that can be invoked through a shared reference with the argument
/// list `Args`.
///
/// Implemented for every `F: Fn(A0, A1, ...) -> R`.
pub trait Callable<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

/// A callable that can be invoked through a mutable reference with the
/// argument list `Args`.
///
/// Implemented for every `F: FnMut(A0, A1, ...) -> R`.
pub trait CallableMut<Args> {
    type Output;

    fn invoke_mut(&mut self, args: Args) -> Self::Output;
}

/// A method-like function taking `&T` as its first parameter, e.g.,
/// `Counter::get` for `fn get(&self, ...)`.
///
/// Implemented for every `F: Fn(&T, A0, A1, ...) -> R`.
pub trait MethodFn<T: ?Sized, Args> {
    type Output;

    fn invoke_method(&self, receiver: &T, args: Args) -> Self::Output;
}

/// A method-like function taking `&mut T` as its first parameter, e.g.,
/// `Counter::set` for `fn set(&mut self, ...)`.
///
/// Implemented for every `F: Fn(&mut T, A0, A1, ...) -> R`.
pub trait MethodFnMut<T: ?Sized, Args> {
    type Output;

    fn invoke_method_mut(&self, receiver: &mut T, args: Args) -> Self::Output;
}

/// An argument list that can be converted element-wise into `UArgs`.
///
/// `(A0, A1, ...): Widen<(U0, U1, ...)>` if `An: Into<Un>` for every `n`.
pub trait Widen<UArgs> {
    fn widen(self) -> UArgs;
}

/// Determines how a target's return value `UR` is turned into a delegate's
/// return type `R`.
pub trait ReturnMode<UR, R> {
    fn adapt(value: UR) -> R;
}

/// The default [`ReturnMode`]. `UR` is converted by [`Into`].
#[derive(Debug)]
pub enum Covariant {}

/// The [`ReturnMode`] that drops the returned value. Only applicable to
/// delegates returning `()`.
///
/// Selected by [`Target::discard`](crate::bind::Target::discard).
#[derive(Debug)]
pub enum Discard {}

impl<UR: Into<R>, R> ReturnMode<UR, R> for Covariant {
    #[inline]
    fn adapt(value: UR) -> R {
        value.into()
    }
}

impl<UR> ReturnMode<UR, ()> for Discard {
    #[inline]
    fn adapt(_: UR) {}
}

mod private {
    pub trait Sealed {}
}

/// A function pointer type that can be stored in a [`Context`] as is.
///
/// Implemented for `fn(A0, A1, ...) -> R` and `extern "C" fn(A0, A1, ...) ->
/// R`. Function pointer types with elided reference lifetimes in their
/// parameters (e.g., `fn(&mut i32)`) are higher-ranked and not covered;
/// name the lifetime (`fn(&'a mut i32)`) to bind one.
///
/// This trait is sealed.
pub trait FnPtr: Copy + private::Sealed {
    /// The parameter list as a tuple.
    type Args;
    type Output;

    /// Convert `self` to a [`Context`] holding the function's address.
    fn to_context(self) -> Context;

    /// Recover the function pointer from a [`Context`].
    ///
    /// # Safety
    ///
    /// `cx` must have been created by [`Self::to_context`] of the same type.
    unsafe fn from_context(cx: Context) -> Self;

    /// Call the function.
    fn invoke_ptr(self, args: Self::Args) -> Self::Output;
}

macro_rules! impl_signature {
    ( @start $($x:tt)* ) => {
        impl_signature! { @iter [] [$($x)*] }
    };

    // inductive case
    ( @iter
        [$(($A:ident, $U:ident, $a:ident))*]
        [$next_head:tt $($next_tail:tt)*]
    ) => {
        impl_signature! { @iter [$(($A, $U, $a))* $next_head] [$($next_tail)*] }

        impl<F, R, $( $A, )*> Callable<( $( $A, )* )> for F
        where
            F: Fn($( $A ),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke(&self, ( $( $a, )* ): ( $( $A, )* )) -> R {
                self($( $a ),*)
            }
        }

        impl<F, R, $( $A, )*> CallableMut<( $( $A, )* )> for F
        where
            F: FnMut($( $A ),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke_mut(&mut self, ( $( $a, )* ): ( $( $A, )* )) -> R {
                self($( $a ),*)
            }
        }

        impl<F, T: ?Sized, R, $( $A, )*> MethodFn<T, ( $( $A, )* )> for F
        where
            F: Fn(&T, $( $A ),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke_method(&self, receiver: &T, ( $( $a, )* ): ( $( $A, )* )) -> R {
                self(receiver, $( $a ),*)
            }
        }

        impl<F, T: ?Sized, R, $( $A, )*> MethodFnMut<T, ( $( $A, )* )> for F
        where
            F: Fn(&mut T, $( $A ),*) -> R,
        {
            type Output = R;

            #[inline]
            fn invoke_method_mut(&self, receiver: &mut T, ( $( $a, )* ): ( $( $A, )* )) -> R {
                self(receiver, $( $a ),*)
            }
        }

        impl<$( $A, $U, )*> Widen<( $( $U, )* )> for ( $( $A, )* )
        where
            $( $A: Into<$U>, )*
        {
            #[inline]
            fn widen(self) -> ( $( $U, )* ) {
                let ( $( $a, )* ) = self;
                ( $( $a.into(), )* )
            }
        }

        impl<R, $( $A, )*> private::Sealed for fn($( $A ),*) -> R {}

        impl<R, $( $A, )*> FnPtr for fn($( $A ),*) -> R {
            type Args = ( $( $A, )* );
            type Output = R;

            #[inline]
            fn to_context(self) -> Context {
                Context::from_ptr(self as *const ())
            }

            #[inline]
            unsafe fn from_context(cx: Context) -> Self {
                // Safety: Function pointers and `*const ()` have the same
                //         size. The caller guarantees that `cx` holds a valid
                //         function pointer of this type.
                unsafe { transmute(cx.as_ptr()) }
            }

            #[inline]
            fn invoke_ptr(self, ( $( $a, )* ): Self::Args) -> R {
                self($( $a ),*)
            }
        }

        impl<R, $( $A, )*> private::Sealed for extern "C" fn($( $A ),*) -> R {}

        impl<R, $( $A, )*> FnPtr for extern "C" fn($( $A ),*) -> R {
            type Args = ( $( $A, )* );
            type Output = R;

            #[inline]
            fn to_context(self) -> Context {
                Context::from_ptr(self as *const ())
            }

            #[inline]
            unsafe fn from_context(cx: Context) -> Self {
                // Safety: See above
                unsafe { transmute(cx.as_ptr()) }
            }

            #[inline]
            fn invoke_ptr(self, ( $( $a, )* ): Self::Args) -> R {
                self($( $a ),*)
            }
        }
    }; // end of macro arm

    // base case
    ( @iter [$($_discard:tt)*] [] ) => {}
}

seq_macro::seq!(I in 0..13 { impl_signature! { @start #( (A~I, U~I, a~I) )* } });
