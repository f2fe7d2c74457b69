//! Fire-once viewport subscriptions and the throttled scroll stream.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ids::IdSequence;
use crate::timing::Throttle;

/// Identifies an element owned by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Handle returned by [`ViewportObserver::observe`] and
/// [`ViewportObserver::subscribe_scroll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

/// Current vertical scroll offset and viewport height, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
        }
    }

    /// Document offset of the bottom edge of the viewport.
    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_top + self.viewport_height
    }
}

/// Vertical extent of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub top: f64,
    pub height: f64,
}

impl ElementBounds {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The environment's intersection primitive.
pub trait IntersectionProbe {
    /// Whether `element`'s top edge has risen at least `inset` pixels above
    /// the bottom of the viewport.  Elements already scrolled past the top
    /// count as entered.
    ///
    /// Returns `None` if the element is no longer attached to the document.
    fn is_intersecting(&self, element: ElementId, inset: f64) -> Option<bool>;
}

/// Geometric [`IntersectionProbe`]: element bounds plus the current scroll
/// position.  This is what a host without a native intersection primitive
/// falls back to on every scroll.
#[derive(Debug, Clone, Default)]
pub struct LayoutProbe {
    position: ScrollPosition,
    elements: HashMap<ElementId, ElementBounds>,
}

impl LayoutProbe {
    pub fn new(position: ScrollPosition) -> Self {
        Self {
            position,
            elements: HashMap::new(),
        }
    }

    /// Builder-style variant of [`place`](Self::place).
    pub fn with_element(mut self, element: ElementId, bounds: ElementBounds) -> Self {
        self.place(element, bounds);
        self
    }

    /// Records (or moves) an element.
    pub fn place(&mut self, element: ElementId, bounds: ElementBounds) {
        self.elements.insert(element, bounds);
    }

    /// Marks an element as detached.
    pub fn detach(&mut self, element: ElementId) -> bool {
        self.elements.remove(&element).is_some()
    }

    pub fn set_position(&mut self, position: ScrollPosition) {
        self.position = position;
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }
}

impl IntersectionProbe for LayoutProbe {
    fn is_intersecting(&self, element: ElementId, inset: f64) -> Option<bool> {
        let bounds = self.elements.get(&element)?;
        Some(bounds.top < self.position.viewport_bottom() - inset)
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

type EnterCallback = Box<dyn FnMut(ElementId) + Send>;
type ScrollCallback = Box<dyn FnMut(ScrollPosition) + Send>;

struct EnterSubscription {
    element: ElementId,
    inset: f64,
    callback: EnterCallback,
}

/// Single observer for every viewport-driven feature of a page.
///
/// Entered-view subscriptions are fire-once: the subscription is removed
/// *before* its callback runs, so no sequence of intersection changes can
/// invoke it twice.  Subscriptions whose element has been detached are dropped
/// without invoking anything.
pub struct ViewportObserver {
    ids: IdSequence,
    entries: BTreeMap<SubscriptionId, EnterSubscription>,
    scroll_listeners: BTreeMap<SubscriptionId, ScrollCallback>,
    throttle: Throttle,
    last_position: Option<ScrollPosition>,
}

impl ViewportObserver {
    /// One scroll event per ~60 Hz frame.
    pub const DEFAULT_SCROLL_COOLDOWN: Duration = Duration::from_millis(16);

    pub fn new(scroll_cooldown: Duration) -> Self {
        Self {
            ids: IdSequence::new(),
            entries: BTreeMap::new(),
            scroll_listeners: BTreeMap::new(),
            throttle: Throttle::new(scroll_cooldown),
            last_position: None,
        }
    }

    /// Registers a fire-once callback for the first time `element`'s top
    /// rises `inset` pixels above the viewport bottom.
    pub fn observe<F>(&mut self, element: ElementId, inset: f64, callback: F) -> SubscriptionId
    where
        F: FnMut(ElementId) + Send + 'static,
    {
        let id = SubscriptionId(self.ids.next());
        self.entries.insert(
            id,
            EnterSubscription {
                element,
                inset,
                callback: Box::new(callback),
            },
        );
        id
    }

    /// Removes a subscription.  Unknown or already-fired ids are ignored.
    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Removes every subscription for `element`, e.g. when the element is
    /// removed from the document.  Returns how many were removed.
    pub fn forget_element(&mut self, element: ElementId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, sub| sub.element != element);
        before - self.entries.len()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.entries.values().any(|sub| sub.element == element)
    }

    /// Number of subscriptions that have not fired yet.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Push path: the environment reports `element`'s intersection state.
    ///
    /// Fires (and removes) every subscription for `element` when
    /// `is_intersecting` is `true`.  Reports for unobserved elements are
    /// ignored.  Returns the number of callbacks invoked.
    pub fn notify_intersection(&mut self, element: ElementId, is_intersecting: bool) -> usize {
        if !is_intersecting {
            return 0;
        }
        let ids: Vec<SubscriptionId> = self
            .entries
            .iter()
            .filter(|(_, sub)| sub.element == element)
            .map(|(id, _)| *id)
            .collect();
        self.fire(ids)
    }

    /// Pull path: asks `probe` about every pending subscription.
    ///
    /// Intersecting elements fire; detached elements are unsubscribed
    /// silently.  Returns the number of callbacks invoked.
    pub fn refresh<P>(&mut self, probe: &P) -> usize
    where
        P: IntersectionProbe + ?Sized,
    {
        let mut entered = Vec::new();
        let mut stale = Vec::new();
        for (id, sub) in &self.entries {
            match probe.is_intersecting(sub.element, sub.inset) {
                Some(true) => entered.push(*id),
                Some(false) => {}
                None => stale.push(*id),
            }
        }

        for id in stale {
            if let Some(sub) = self.entries.remove(&id) {
                debug!(element = sub.element.0, "dropping subscription for detached element");
            }
        }
        self.fire(entered)
    }

    fn fire(&mut self, ids: Vec<SubscriptionId>) -> usize {
        let mut fired = 0;
        for id in ids {
            if let Some(mut sub) = self.entries.remove(&id) {
                (sub.callback)(sub.element);
                fired += 1;
            }
        }
        fired
    }

    // ── Scroll stream ─────────────────────────────────────────────────────────

    /// Registers a listener for the throttled scroll stream.
    pub fn subscribe_scroll<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(ScrollPosition) + Send + 'static,
    {
        let id = SubscriptionId(self.ids.next());
        self.scroll_listeners.insert(id, Box::new(callback));
        id
    }

    pub fn unsubscribe_scroll(&mut self, id: SubscriptionId) -> bool {
        self.scroll_listeners.remove(&id).is_some()
    }

    /// Feeds a raw scroll event.
    ///
    /// Returns `true` if the event passed the throttle, in which case it was
    /// recorded as the last position and delivered to every scroll listener.
    pub fn on_scroll(&mut self, now: Duration, position: ScrollPosition) -> bool {
        if self.throttle.call(now, ()).is_none() {
            return false;
        }
        self.last_position = Some(position);
        for listener in self.scroll_listeners.values_mut() {
            listener(position);
        }
        true
    }

    /// The last scroll position that passed the throttle.
    pub fn last_position(&self) -> Option<ScrollPosition> {
        self.last_position
    }
}

impl Default for ViewportObserver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCROLL_COOLDOWN)
    }
}

impl std::fmt::Debug for ViewportObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportObserver")
            .field("pending", &self.entries.len())
            .field("scroll_listeners", &self.scroll_listeners.len())
            .field("throttle", &self.throttle)
            .field("last_position", &self.last_position)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
