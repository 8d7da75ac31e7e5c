//! Target descriptors
use core::any::TypeId;

/// The kind of a target bound to a [`Delegate`](crate::Delegate).
///
/// Identity queries never match across kinds, even if the targets would
/// behave identically when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// A zero-sized function bound by [`bind_fn`](crate::bind::bind_fn).
    Function,
    /// A method with a shared receiver bound by
    /// [`bind_method`](crate::bind::bind_method).
    Method,
    /// A method with a mutable receiver bound by
    /// [`bind_method_mut`](crate::bind::bind_method_mut).
    MethodMut,
    /// A default-constructible callable type bound by
    /// [`bind_stateless`](crate::bind::bind_stateless).
    Stateless,
    /// A zero-sized callable value bound by
    /// [`bind_value`](crate::bind::bind_value).
    Value,
    /// A callable bound by shared reference by
    /// [`bind_ref`](crate::bind::bind_ref).
    Ref,
    /// A callable bound by mutable reference by
    /// [`bind_mut`](crate::bind::bind_mut).
    RefMut,
    /// A function pointer bound by [`bind_ptr`](crate::bind::bind_ptr).
    Pointer,
}

impl TargetKind {
    /// Get a flag indicating whether the target's identity includes the
    /// address stored in the delegate's [`Context`](crate::erased::Context).
    ///
    /// Every kind's identity includes the target's type.
    #[inline]
    pub const fn is_addressed(self) -> bool {
        matches!(
            self,
            Self::Method | Self::MethodMut | Self::Ref | Self::RefMut | Self::Pointer
        )
    }
}

/// Describes what a delegate is bound to, except for the address, which is
/// held by the erased storage.
///
/// The address alone can't identify a target. Distinct zero-sized values may
/// share an address, and so may functions with identical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Descriptor {
    pub(crate) kind: TargetKind,
    /// The type of the target with its lifetimes erased. `(F, *const T)` for
    /// methods.
    pub(crate) ty: TypeId,
}

impl Descriptor {
    /// Construct a `Descriptor` for a target of type `F`, which may contain
    /// non-`'static` lifetimes.
    #[inline]
    pub(crate) fn of<F>(kind: TargetKind) -> Self {
        Self {
            kind,
            ty: typeid::of::<F>(),
        }
    }

    /// Construct a `Descriptor` for the method `F` with a receiver of type
    /// `T`.
    #[inline]
    pub(crate) fn of_method<F, T>(kind: TargetKind) -> Self {
        Self::of::<(F, *const T)>(kind)
    }
}
