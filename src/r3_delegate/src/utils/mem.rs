use core::mem::{size_of, ManuallyDrop};

union Xmute<T, U> {
    t: ManuallyDrop<T>,
    u: ManuallyDrop<U>,
}

/// Similar to `core::mem::transmute` except that `T` and `U` are not required
/// to be the same size, which also makes it usable on types whose sizes depend
/// on generic parameters.
///
/// # Safety
///
/// See `core::mem::transmute`. In addition, `size_of::<T>()` must be equal to
/// or greater than `size_of::<U>()`.
#[inline]
pub const unsafe fn transmute<T, U>(x: T) -> U {
    unsafe {
        ManuallyDrop::into_inner(
            Xmute {
                t: ManuallyDrop::new(x),
            }
            .u,
        )
    }
}

/// Produce a value of the zero-sized type `T` out of thin air.
///
/// Fails to compile (after monomorphization) if `T` is not zero-sized.
///
/// # Safety
///
/// A value of `T` must have existed at some point, and `T` must not rely on
/// being uniquely owned. This is typically established by requiring
/// `T: Copy` and receiving a value of `T` when the erased function pointer is
/// created.
#[inline]
pub const unsafe fn conjure<T>() -> T {
    const { assert!(size_of::<T>() == 0, "the type must be zero-sized") };
    // Safety: `T` is zero-sized, and the caller vouches for its inhabitedness
    unsafe { transmute(()) }
}
