//! Transient user-facing notices with timed auto-dismiss.
//!
//! # Notice lifecycle
//!
//! ```text
//! push ──► Entering ──(show_delay)──► Visible ──(display)──► Leaving ──(fade)──► removed
//!                                        │                      ▲
//!                                        └──────── close ───────┘
//! ```
//!
//! `Entering` and `Leaving` exist so the rendering layer can run its slide-in
//! and fade-out transitions.  Every notice keeps its own deadlines; pushing a
//! new notice never delays or hurries an existing one, and identical messages
//! are not merged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::IdSequence;

/// Identifies one notice within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(pub u64);

/// Visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    #[default]
    Success,
    Info,
    Warning,
    Error,
}

/// Where a notice is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePhase {
    Entering,
    Visible,
    Leaving,
}

/// Durations of the three timed phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTiming {
    pub show_delay: Duration,
    pub display: Duration,
    pub fade: Duration,
}

impl Default for NoticeTiming {
    fn default() -> Self {
        Self {
            show_delay: Duration::from_millis(100),
            display: Duration::from_millis(3_000),
            fade: Duration::from_millis(300),
        }
    }
}

/// One queued notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub kind: NoticeKind,
    pub phase: NoticePhase,
    phase_ends_at: Duration,
}

impl Notice {
    /// When the current phase ends.
    pub fn phase_ends_at(&self) -> Duration {
        self.phase_ends_at
    }
}

/// Ordered stack of live notices, oldest first.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    timing: NoticeTiming,
    ids: IdSequence,
    notices: Vec<Notice>,
}

impl NotificationQueue {
    pub fn new(timing: NoticeTiming) -> Self {
        Self {
            timing,
            ids: IdSequence::new(),
            notices: Vec::new(),
        }
    }

    pub fn timing(&self) -> NoticeTiming {
        self.timing
    }

    /// Enqueues a notice at `now`.
    pub fn push(&mut self, now: Duration, message: impl Into<String>, kind: NoticeKind) -> NoticeId {
        let id = NoticeId(self.ids.next());
        self.notices.push(Notice {
            id,
            message: message.into(),
            kind,
            phase: NoticePhase::Entering,
            phase_ends_at: now + self.timing.show_delay,
        });
        id
    }

    /// Starts the fade-out of `id` early.
    ///
    /// Returns `false` for unknown ids and for notices already leaving.
    pub fn close(&mut self, now: Duration, id: NoticeId) -> bool {
        let fade = self.timing.fade;
        match self.notices.iter_mut().find(|notice| notice.id == id) {
            Some(notice) if notice.phase != NoticePhase::Leaving => {
                notice.phase = NoticePhase::Leaving;
                notice.phase_ends_at = now + fade;
                true
            }
            _ => false,
        }
    }

    /// Advances every notice whose phase has ended by `now` and removes the
    /// ones that finished fading.  Returns the removed ids.
    ///
    /// Phase deadlines are chained from the previous deadline rather than from
    /// `now`, so a late tick does not stretch a notice's lifetime.
    pub fn tick(&mut self, now: Duration) -> Vec<NoticeId> {
        let timing = self.timing;
        let mut removed = Vec::new();

        self.notices.retain_mut(|notice| {
            while notice.phase_ends_at <= now {
                match notice.phase {
                    NoticePhase::Entering => {
                        notice.phase = NoticePhase::Visible;
                        notice.phase_ends_at += timing.display;
                    }
                    NoticePhase::Visible => {
                        notice.phase = NoticePhase::Leaving;
                        notice.phase_ends_at += timing.fade;
                    }
                    NoticePhase::Leaving => {
                        removed.push(notice.id);
                        return false;
                    }
                }
            }
            true
        });

        removed
    }

    /// All live notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Notices currently fully shown.
    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.phase == NoticePhase::Visible)
    }

    pub fn get(&self, id: NoticeId) -> Option<&Notice> {
        self.notices.iter().find(|notice| notice.id == id)
    }

    /// Earliest pending phase change, if any notice is live.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.notices.iter().map(Notice::phase_ends_at).min()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
