//! Debounce: run once after a burst of calls has settled.

use std::time::Duration;

/// The single deferred invocation a [`Debounce`] may hold.
#[derive(Debug, Clone, PartialEq)]
struct Pending<T> {
    deadline: Duration,
    /// `None` in leading mode, where the payload was already delivered.
    payload: Option<T>,
}

/// Debounced delivery of a payload.
///
/// In the default *trailing* mode every [`call`](Self::call) replaces the
/// payload and pushes the deadline to `now + cooldown`; [`poll`](Self::poll)
/// hands the latest payload out once that deadline has passed.
///
/// In *leading* mode ([`Debounce::leading`]) the first call of a burst is
/// delivered immediately by `call`, and further calls only extend the quiet
/// period; nothing is delivered at the trailing edge.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pagekit_core::Debounce;
///
/// let ms = Duration::from_millis;
/// let mut resize = Debounce::new(ms(50));
/// for t in [0, 10, 20, 30] {
///     resize.call(ms(t), t);
/// }
/// assert_eq!(resize.poll(ms(79)), None);
/// assert_eq!(resize.poll(ms(80)), Some(30));
/// assert_eq!(resize.poll(ms(200)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    cooldown: Duration,
    leading: bool,
    pending: Option<Pending<T>>,
}

impl<T> Debounce<T> {
    /// Creates a trailing-edge debounce.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            leading: false,
            pending: None,
        }
    }

    /// Creates a leading-edge debounce.
    pub fn leading(cooldown: Duration) -> Self {
        Self {
            cooldown,
            leading: true,
            pending: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Records a call at `now`.
    ///
    /// Returns the payload only in leading mode when no burst is in progress;
    /// trailing mode always returns `None` and defers delivery to
    /// [`poll`](Self::poll).
    pub fn call(&mut self, now: Duration, payload: T) -> Option<T> {
        let deadline = now + self.cooldown;
        if self.leading {
            let burst_in_progress = self
                .pending
                .as_ref()
                .is_some_and(|pending| now < pending.deadline);
            self.pending = Some(Pending {
                deadline,
                payload: None,
            });
            return if burst_in_progress { None } else { Some(payload) };
        }

        self.pending = Some(Pending {
            deadline,
            payload: Some(payload),
        });
        None
    }

    /// Delivers the deferred payload if its deadline is at or before `now`.
    ///
    /// Once the deadline has passed the pending slot is cleared, so each burst
    /// yields at most one payload.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {
                self.pending.take().and_then(|pending| pending.payload)
            }
            _ => None,
        }
    }

    /// The instant at which [`poll`](Self::poll) would fire, if anything is
    /// pending.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// `true` while a deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending deadline and returns its undelivered payload, if any.
    ///
    /// Call this when the owner of the debounced action is torn down.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().and_then(|pending| pending.payload)
    }
}
