//! Hover-Preview Controller.
//!
//! Drives one project card's video showcase: a long-hover dwell timer that
//! authorizes autoplay, playback and mute state reported by the media
//! element, and debounced watch-progress reporting to the parent card.
//!
//! The controller is a plain state object. It never sleeps and owns no
//! real timers: every operation takes the current [`Instant`], and
//! [`HoverPreview::next_deadline`] tells the host event loop when to call
//! [`HoverPreview::tick`]. Outputs are returned as [`Signal`]s in the order
//! they happen.
//!
//! ```text
//! idle ──enter──▶ hovered ──dwell ≥ long_hover──▶ hovered + long-hovered
//!   ▲                │                                   │
//!   └─────leave──────┴───────────────leave───────────────┘
//! ```
//!
//! Playing and muted are independent flags toggled by media events and the
//! mute button.

use crate::config::PreviewConfig;
use crate::debounce::Debouncer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Per-card state. Created on mount and discarded on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoverState {
    pub hovered: bool,
    pub long_hovered: bool,
    pub playing: bool,
    pub muted: bool,
    /// Last progress value surfaced to the parent, in seconds.
    pub watch_progress: f64,
}

impl Default for HoverState {
    fn default() -> Self {
        Self {
            hovered: false,
            long_hovered: false,
            playing: false,
            muted: true,
            watch_progress: 0.0,
        }
    }
}

impl HoverState {
    /// Label shown over a video thumbnail while it is not playing.
    pub fn badge_label(&self) -> &'static str {
        if self.hovered && !self.playing {
            "Keep hovering to play"
        } else {
            "Video"
        }
    }

    /// The badge is hidden while the video plays.
    pub fn show_badge(&self) -> bool {
        !self.playing
    }

    /// The mute toggle only appears once the video is playing.
    pub fn show_mute_toggle(&self) -> bool {
        self.playing
    }

    pub fn mute_toggle_title(&self) -> &'static str {
        if self.muted { "Unmute" } else { "Mute" }
    }
}

/// Input events from the card and its media element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HoverEvent {
    MouseEnter,
    MouseLeave,
    Playing,
    Pause,
    MuteToggle,
    TimeUpdate { seconds: f64 },
}

/// Outputs for the host: commands for the media element and values for the
/// parent card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    /// The dwell completed: playback may begin.
    LongHover,
    /// The hover that authorized playback ended.
    LongHoverEnded,
    /// Mute state changed; the media element should follow.
    Muted { muted: bool },
    /// The click that produced this event must not navigate.
    PreventNavigation,
    /// Debounced watch progress for the parent, in seconds.
    Progress { seconds: f64 },
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::LongHover => write!(f, "long hover: play"),
            Signal::LongHoverEnded => write!(f, "long hover ended"),
            Signal::Muted { muted: true } => write!(f, "muted"),
            Signal::Muted { muted: false } => write!(f, "unmuted"),
            Signal::PreventNavigation => write!(f, "prevent navigation"),
            Signal::Progress { seconds } => write!(f, "progress {seconds:.1}s"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HoverPreview {
    state: HoverState,
    long_hover: Duration,
    /// When the pending long-hover timer fires, if one is armed.
    long_hover_at: Option<Instant>,
    progress: Debouncer<f64>,
}

impl HoverPreview {
    pub fn new(long_hover: Duration, progress_debounce: Duration) -> Self {
        Self {
            state: HoverState::default(),
            long_hover,
            long_hover_at: None,
            progress: Debouncer::new(progress_debounce),
        }
    }

    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(config.long_hover(), config.progress_debounce())
    }

    pub fn state(&self) -> &HoverState {
        &self.state
    }

    /// Apply one event at `now`. Timers that came due at or before `now`
    /// fire first.
    pub fn handle(&mut self, now: Instant, event: HoverEvent) -> Vec<Signal> {
        let mut signals = self.tick(now);

        match event {
            HoverEvent::MouseEnter => {
                if !self.state.hovered {
                    self.state.hovered = true;
                    self.long_hover_at = Some(now + self.long_hover);
                }
            }
            HoverEvent::MouseLeave => {
                self.long_hover_at = None;
                self.state.hovered = false;
                if self.state.long_hovered {
                    self.state.long_hovered = false;
                    signals.push(Signal::LongHoverEnded);
                }
            }
            HoverEvent::Playing => self.state.playing = true,
            HoverEvent::Pause => self.state.playing = false,
            HoverEvent::MuteToggle => {
                self.state.muted = !self.state.muted;
                signals.push(Signal::Muted {
                    muted: self.state.muted,
                });
                signals.push(Signal::PreventNavigation);
            }
            HoverEvent::TimeUpdate { seconds } => {
                if let Some(seconds) = self.progress.call(now, seconds) {
                    signals.push(self.surface_progress(seconds));
                }
            }
        }

        signals
    }

    /// Fire every timer due at or before `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some(at) = self.long_hover_at
            && at <= now
        {
            self.long_hover_at = None;
            if self.state.hovered && !self.state.long_hovered {
                self.state.long_hovered = true;
                signals.push(Signal::LongHover);
            }
        }

        if let Some(seconds) = self.progress.poll(now) {
            signals.push(self.surface_progress(seconds));
        }

        signals
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.long_hover_at, self.progress.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Clear every timer and pending value and reset to the mount state.
    pub fn teardown(&mut self) {
        self.long_hover_at = None;
        self.progress.cancel();
        self.state = HoverState::default();
    }

    fn surface_progress(&mut self, seconds: f64) -> Signal {
        self.state.watch_progress = seconds;
        Signal::Progress { seconds }
    }
}

/// An event at an offset from the start of a scripted session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: HoverEvent,
}

/// A signal together with the offset at which it was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimedSignal {
    pub at_ms: u64,
    #[serde(flatten)]
    pub signal: Signal,
}

/// Run a scripted event sequence through a fresh controller, firing timers
/// at their exact deadlines, and return everything it emitted along with
/// the final state.
///
/// Events are applied in `at_ms` order; events sharing an offset keep their
/// script order. After the last event, outstanding timers are run to
/// completion.
pub fn replay(preview: &mut HoverPreview, events: &[TimedEvent]) -> Vec<TimedSignal> {
    let t0 = Instant::now();
    let mut out = Vec::new();

    let mut ordered: Vec<&TimedEvent> = events.iter().collect();
    ordered.sort_by_key(|timed| timed.at_ms);

    for timed in ordered {
        let now = t0 + Duration::from_millis(timed.at_ms);
        drain_timers(preview, t0, Some(now), &mut out);
        for signal in preview.handle(now, timed.event) {
            out.push(TimedSignal {
                at_ms: timed.at_ms,
                signal,
            });
        }
    }
    drain_timers(preview, t0, None, &mut out);
    out
}

/// Tick at every deadline up to `until` (or until none remain).
fn drain_timers(
    preview: &mut HoverPreview,
    t0: Instant,
    until: Option<Instant>,
    out: &mut Vec<TimedSignal>,
) {
    while let Some(deadline) = preview.next_deadline() {
        if until.is_some_and(|until| deadline > until) {
            break;
        }
        let at_ms = (deadline - t0).as_millis() as u64;
        for signal in preview.tick(deadline) {
            out.push(TimedSignal { at_ms, signal });
        }
    }
}
