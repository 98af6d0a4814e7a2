/// Classification for retry policy.
///
/// Used by the retry cascade to decide whether to pause before the next
/// variant, and by the dispatcher to decide between propagation and
/// synthetic fallback.
///
/// # Behavior Summary
///
/// | Class | Next cascade variant? | Pause first? | Dispatcher |
/// |-------|-----------------------|--------------|------------|
/// | `Never` | No | - | Propagates the error |
/// | `WithBackoff` | Yes | Yes | Falls back to synthetic data |
/// | `NextVariant` | Yes | No | Falls back to synthetic data |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The request itself is invalid. Retrying or synthesizing would hide a
    /// programming error.
    Never,

    /// Transient provider condition (429, 5xx, timeout, connection failure).
    /// The cascade waits `cascade_pause` before trying the next variant so a
    /// provider that is already rate limiting is not hammered.
    WithBackoff,

    /// The provider answered, but not with usable data. Another variant
    /// (different URL or headers) might succeed.
    NextVariant,
}
