//! The test code for the trait implementations and the lack thereof.
//!
//! For negative tests, we use doc tests, which are a simple way to assert the
//! lack of certain trait implementations. There's a caveat: the doc tests must
//! be visible with `cfg(not(test))`.
#[cfg(test)]
#[allow(unused_imports)]
use super::*;

macro_rules! assert_compile_fail {
    ($($tt:tt)*) => {
        const _: () = {
            /// ```rust,compile_fail
            #[doc = stringify!($($tt)*)]
            /// ```
            #[allow(dead_code)]
            fn assert_compile_fail() {}
        };
    };
}

macro_rules! assert_impls {
    () => {};
    (
        (<$ty:ty>: !$($bounds:tt)*),
        $($rest:tt)*
    ) => {
        assert_compile_fail! {
            use r3_delegate::{prelude::*, signature::*, Delegate};

            fn assert_impl<T, A0, A1, R>(x: $ty) -> impl $($bounds)* {
                x
            }
        }

        // Catch invalid syntax; we don't want the compile-fail test to pass
        // because of that
        #[cfg(test)]
        const _: () = {
            #[allow(dead_code)]
            fn assert_valid_syntax<T, A0, A1, R, Output>(_: $ty)
            where
                Output: $($bounds)*,
            {
            }
        };

        assert_impls! { $($rest)* }
    };
    (
        (<$ty:ty>: $($bounds:tt)*),
        $($rest:tt)*
    ) => {
        #[cfg(test)]
        const _: () = {
            #[allow(dead_code)]
            fn assert_impl<T, A0, A1, R>(x: $ty) -> impl $($bounds)* {
                x
            }
        };

        assert_impls! { $($rest)* }
    };
}

assert_impls! {
    (<Delegate<'static, (A0,), R>>: Copy),
    (<Delegate<'static, (A0,), R>>: Clone),
    (<Delegate<'static, (A0,), R>>: Default),
    (<Delegate<'static, (A0,), R>>: Init),
    (<Delegate<'static, (A0,), R>>: core::fmt::Debug),
    // The thread safety of the target is unknown
    (<Delegate<'static, (A0,), R>>: !Send),
    (<Delegate<'static, (A0,), R>>: !Sync),

    (<fn(A0) -> R>: Callable<(A0,)>),
    (<fn(A0) -> R>: CallableMut<(A0,)>),
    (<fn(A0) -> R>: !Callable<()>),
    (<fn(A0) -> R>: !Callable<(A0, A1)>),
    (<fn(A0) -> R>: FnPtr),
    (<extern "C" fn(A0, A1) -> R>: FnPtr),

    (<fn(&T, A0) -> R>: MethodFn<T, (A0,)>),
    (<fn(&T, A0) -> R>: !MethodFnMut<T, (A0,)>),
    (<fn(&mut T, A0) -> R>: !MethodFn<T, (A0,)>),
    (<fn(&mut T, A0) -> R>: MethodFnMut<T, (A0,)>),
    (<fn(&A1, A0) -> R>: !MethodFn<T, (A0,)>),

    (<(A0, A1)>: Widen<(A0, A1)>),
    (<(A0, A1)>: !Widen<(A1, A0)>),
    (<(A0,)>: !Widen<(A0, A1)>),
}
