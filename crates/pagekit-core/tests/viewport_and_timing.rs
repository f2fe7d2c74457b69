//! Scenario tests for the temporal filters, the viewport observer and the
//! notice queue, driven entirely by explicit timestamps.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagekit_core::{
    Debounce, ElementBounds, ElementId, LayoutProbe, NoticeKind, NoticePhase, NoticeTiming,
    NotificationQueue, ScrollEffects, ScrollPosition, Throttle, ViewportObserver,
};
use proptest::prelude::*;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn counter() -> (Arc<AtomicUsize>, impl FnMut(ElementId) + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    (count, move |_| {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

// ── Debounce / throttle ───────────────────────────────────────────────────────

#[test]
fn test_debounced_burst_fires_once_after_quiet_period() {
    // Arrange
    let mut debounce = Debounce::new(ms(50));
    let mut fired = Vec::new();

    // Act – calls at 0/10/20/30, polled every millisecond up to 200
    for t in 0..=200 {
        if [0, 10, 20, 30].contains(&t) {
            debounce.call(ms(t), t);
        }
        if let Some(payload) = debounce.poll(ms(t)) {
            fired.push((t, payload));
        }
    }

    // Assert
    assert_eq!(fired, vec![(80, 30)]);
}

#[test]
fn test_leading_debounce_fires_on_first_call_only() {
    let mut debounce = Debounce::leading(ms(50));

    assert_eq!(debounce.call(ms(0), "a"), Some("a"));
    assert_eq!(debounce.call(ms(30), "b"), None);
    assert_eq!(debounce.call(ms(70), "c"), None, "quiet period extended to 120");
    assert_eq!(debounce.poll(ms(200)), None, "nothing at the trailing edge");
    assert_eq!(debounce.call(ms(300), "d"), Some("d"));
}

#[test]
fn test_throttled_scroll_events_pass_at_window_starts() {
    let mut throttle = Throttle::new(ms(16));

    let fired: Vec<u64> = [0, 5, 10, 20]
        .into_iter()
        .filter_map(|t| throttle.call(ms(t), t))
        .collect();

    assert_eq!(fired, vec![0, 20]);
}

proptest! {
    /// A debounced burst yields exactly the last payload, exactly once.
    #[test]
    fn prop_debounce_delivers_last_payload_once(
        gaps in prop::collection::vec(0u64..50, 1..20),
        cooldown in 50u64..200,
    ) {
        let mut debounce = Debounce::new(ms(cooldown));
        let mut now = 0;
        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            debounce.call(ms(now), i);
            prop_assert_eq!(debounce.poll(ms(now)), None);
        }

        let last = gaps.len() - 1;
        prop_assert_eq!(debounce.poll(ms(now + cooldown - 1)), None);
        prop_assert_eq!(debounce.poll(ms(now + cooldown)), Some(last));
        prop_assert_eq!(debounce.poll(ms(now + 10 * cooldown)), None);
    }

    /// No two passing throttle calls are closer than the cooldown.
    #[test]
    fn prop_throttle_spacing_is_at_least_cooldown(
        gaps in prop::collection::vec(0u64..40, 1..50),
        cooldown in 1u64..40,
    ) {
        let mut throttle = Throttle::new(ms(cooldown));
        let mut now = 0;
        let mut passed = Vec::new();
        for gap in gaps {
            now += gap;
            if throttle.call(ms(now), ()).is_some() {
                passed.push(now);
            }
        }
        prop_assert!(!passed.is_empty());
        for pair in passed.windows(2) {
            prop_assert!(pair[1] - pair[0] >= cooldown);
        }
    }

    /// However intersection reports and refreshes interleave, every
    /// subscription fires at most once.
    #[test]
    fn prop_entered_view_fires_at_most_once(
        steps in prop::collection::vec((0u64..3, any::<bool>(), 0.0f64..2_000.0), 1..40),
    ) {
        let mut observer = ViewportObserver::default();
        let counts: Vec<Arc<AtomicUsize>> = (0..3)
            .map(|element| {
                let (count, callback) = counter();
                observer.observe(ElementId(element), 0.0, callback);
                count
            })
            .collect();
        let mut probe = LayoutProbe::new(ScrollPosition::new(0.0, 800.0))
            .with_element(ElementId(0), ElementBounds { top: 200.0, height: 100.0 })
            .with_element(ElementId(1), ElementBounds { top: 1_200.0, height: 100.0 })
            .with_element(ElementId(2), ElementBounds { top: 2_400.0, height: 100.0 });

        for (element, pushed, scroll_top) in steps {
            if pushed {
                observer.notify_intersection(ElementId(element), true);
            } else {
                probe.set_position(ScrollPosition::new(scroll_top, 800.0));
                observer.refresh(&probe);
            }
        }

        for count in &counts {
            prop_assert!(count.load(Ordering::SeqCst) <= 1);
        }
    }
}

// ── Viewport observer ─────────────────────────────────────────────────────────

#[test]
fn test_lazy_image_loads_once_when_scrolled_into_view() {
    // Arrange – an image 1500px down a 800px viewport
    let mut observer = ViewportObserver::default();
    let (count, callback) = counter();
    let image = ElementId(7);
    observer.observe(image, 0.0, callback);
    let mut probe = LayoutProbe::new(ScrollPosition::new(0.0, 800.0))
        .with_element(image, ElementBounds { top: 1_500.0, height: 300.0 });

    // Act
    let at_top = observer.refresh(&probe);
    probe.set_position(ScrollPosition::new(900.0, 800.0));
    let scrolled = observer.refresh(&probe);
    probe.set_position(ScrollPosition::new(1_000.0, 800.0));
    let again = observer.refresh(&probe);

    // Assert
    assert_eq!((at_top, scrolled, again), (0, 1, 0));
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!observer.is_observing(image));
}

#[test]
fn test_animation_inset_delays_reveal() {
    // Arrange – element top at 750: inside a plain 800px viewport, but less
    // than 100px above its bottom edge
    let mut observer = ViewportObserver::default();
    let (count, callback) = counter();
    let card = ElementId(3);
    observer.observe(card, 100.0, callback);
    let probe = LayoutProbe::new(ScrollPosition::new(0.0, 800.0))
        .with_element(card, ElementBounds { top: 750.0, height: 200.0 });

    // Act
    let fired = observer.refresh(&probe);

    // Assert
    assert_eq!(fired, 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(observer.is_observing(card));
}

#[test]
fn test_detached_element_is_dropped_without_firing() {
    let mut observer = ViewportObserver::default();
    let (count, callback) = counter();
    observer.observe(ElementId(9), 0.0, callback);

    // The probe has never seen element 9.
    let fired = observer.refresh(&LayoutProbe::new(ScrollPosition::new(0.0, 800.0)));

    assert_eq!(fired, 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(observer.pending(), 0);
}

#[test]
fn test_scroll_listeners_receive_throttled_positions() {
    // Arrange
    let mut observer = ViewportObserver::new(ms(16));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    observer.subscribe_scroll(move |position| {
        sink.lock().unwrap().push(position.scroll_top);
    });
    let effects = ScrollEffects::default();

    // Act
    for (t, top) in [(0, 0.0), (5, 50.0), (10, 90.0), (20, 140.0)] {
        observer.on_scroll(ms(t), ScrollPosition::new(top, 800.0));
    }

    // Assert
    assert_eq!(*seen.lock().unwrap(), vec![0.0, 140.0]);
    let last = observer.last_position().expect("a position passed");
    let snapshot = effects.snapshot(last, None);
    assert!(snapshot.header_scrolled);
    assert_eq!(snapshot.parallax_offset, 70.0);
    assert_eq!(snapshot.reading_progress, None);
}

// ── Notices ───────────────────────────────────────────────────────────────────

#[test]
fn test_notice_lifecycle_with_default_timing() {
    // Arrange – 100ms show delay, 3000ms display, 300ms fade
    let mut queue = NotificationQueue::new(NoticeTiming::default());
    let id = queue.push(ms(0), "Changes saved", NoticeKind::Success);

    // Act / Assert
    assert_eq!(queue.get(id).unwrap().phase, NoticePhase::Entering);

    queue.tick(ms(100));
    assert_eq!(queue.get(id).unwrap().phase, NoticePhase::Visible);

    queue.tick(ms(3_099));
    assert_eq!(queue.get(id).unwrap().phase, NoticePhase::Visible);

    queue.tick(ms(3_100));
    assert_eq!(queue.get(id).unwrap().phase, NoticePhase::Leaving);

    assert_eq!(queue.tick(ms(3_400)), vec![id]);
    assert!(queue.is_empty());
}

#[test]
fn test_closing_a_notice_starts_fade_immediately() {
    let mut queue = NotificationQueue::new(NoticeTiming::default());
    let id = queue.push(ms(0), "Saved", NoticeKind::Info);
    queue.tick(ms(100));

    assert!(queue.close(ms(500), id));
    assert!(!queue.close(ms(510), id), "already leaving");
    assert_eq!(queue.next_deadline(), Some(ms(800)));
    assert_eq!(queue.tick(ms(800)), vec![id]);
}

#[test]
fn test_late_tick_does_not_stretch_notice_lifetime() {
    let mut queue = NotificationQueue::new(NoticeTiming::default());
    let id = queue.push(ms(0), "Saved", NoticeKind::Success);

    // One tick long after the whole lifecycle has elapsed.
    assert_eq!(queue.tick(ms(10_000)), vec![id]);
    assert!(queue.is_empty());
}
