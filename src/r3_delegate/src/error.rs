use core::fmt;

/// The error type returned when an unbound [`Delegate`] is invoked.
///
/// This is the only error originating from this crate. Failures inside a bound
/// target (e.g., panics) propagate through the delegate unchanged.
///
/// ```
/// use r3_delegate::{BadDelegateCall, Delegate};
///
/// let d: Delegate<(i32,), i32> = Delegate::new();
/// assert_eq!(d.call(1), Err(BadDelegateCall));
/// assert_eq!(BadDelegateCall.to_string(), "invoked a delegate with no target bound");
/// ```
///
/// [`Delegate`]: crate::Delegate
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BadDelegateCall;

impl BadDelegateCall {
    /// Get the short name of the error.
    #[inline]
    pub fn as_str(self) -> &'static str {
        "BadDelegateCall"
    }
}

impl fmt::Debug for BadDelegateCall {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BadDelegateCall {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invoked a delegate with no target bound")
    }
}

impl core::error::Error for BadDelegateCall {}
