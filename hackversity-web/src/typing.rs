//! Typewriter animation for page labels.
//!
//! [`TypingMachine`] holds the type / pause / delete / advance cycle and never
//! touches the DOM or a timer. [`TypingEffect`] drives a machine from
//! browser timeouts as an abortable task.

use futures::future::{AbortHandle, abortable};
use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use gloo_timers::future::TimeoutFuture;
use std::future::Future;
use std::time::Duration;
use web_sys::Element;

/// Gap between deleting one text and typing the next.
pub const ADVANCE_GAP: Duration = Duration::from_millis(500);

/// Timing of a typing animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingOptions {
    pub type_speed: Duration,
    pub delete_speed: Duration,
    pub pause_delay: Duration,
    /// Cycle through the texts forever. When off, the animation stops once the
    /// last text is fully revealed.
    pub loop_texts: bool,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            type_speed: Duration::from_millis(100),
            delete_speed: Duration::from_millis(50),
            pause_delay: Duration::from_millis(2000),
            loop_texts: true,
        }
    }
}

impl TypingOptions {
    /// Replaces zero durations with the defaults.
    #[must_use]
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let or_default = |value: Duration, fallback: Duration| {
            if value.is_zero() { fallback } else { value }
        };
        Self {
            type_speed: or_default(self.type_speed, defaults.type_speed),
            delete_speed: or_default(self.delete_speed, defaults.delete_speed),
            pause_delay: or_default(self.pause_delay, defaults.pause_delay),
            loop_texts: self.loop_texts,
        }
    }

    /// Applies `data-*` overrides read through `attr`. Unparseable values keep
    /// the base timing; only a literal `false` disables looping.
    #[must_use]
    pub fn with_attributes<F>(self, attr: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |name: &str, fallback: Duration| {
            attr(name)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map_or(fallback, Duration::from_millis)
        };
        Self {
            type_speed: millis("data-type-speed", self.type_speed),
            delete_speed: millis("data-delete-speed", self.delete_speed),
            pause_delay: millis("data-pause-delay", self.pause_delay),
            loop_texts: attr("data-loop").is_none_or(|value| value.trim() != "false"),
        }
        .normalized()
    }
}

/// Which part of the cycle a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    Pausing,
    Deleting,
    Advancing,
}

/// One animation step: what to display now and how long to wait before the
/// next step. `text` is `None` when the label stays unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingFrame {
    pub phase: TypingPhase,
    pub text: Option<String>,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct TypingMachine {
    texts: Vec<String>,
    options: TypingOptions,
    text_index: usize,
    char_index: usize,
    deleting: bool,
    paused: bool,
    finished: bool,
}

impl TypingMachine {
    pub fn new(texts: Vec<String>, options: TypingOptions) -> Self {
        Self {
            texts,
            options: options.normalized(),
            text_index: 0,
            char_index: 0,
            deleting: false,
            paused: false,
            finished: false,
        }
    }

    /// Advances the animation by one step. Returns `None` once there is
    /// nothing left to show: no texts, or a non-looping run has finished.
    pub fn step(&mut self) -> Option<TypingFrame> {
        if self.texts.is_empty() || self.finished {
            return None;
        }

        if self.paused {
            self.paused = false;
            self.deleting = true;
        }

        let length = self.texts[self.text_index].chars().count();

        if !self.deleting && self.char_index < length {
            self.char_index += 1;
            Some(TypingFrame {
                phase: TypingPhase::Typing,
                text: Some(self.visible_text()),
                delay: self.options.type_speed,
            })
        } else if self.deleting && self.char_index > 0 {
            self.char_index -= 1;
            Some(TypingFrame {
                phase: TypingPhase::Deleting,
                text: Some(self.visible_text()),
                delay: self.options.delete_speed,
            })
        } else if !self.deleting {
            if !self.options.loop_texts && self.text_index + 1 == self.texts.len() {
                self.finished = true;
                return None;
            }
            self.paused = true;
            Some(TypingFrame {
                phase: TypingPhase::Pausing,
                text: None,
                delay: self.options.pause_delay,
            })
        } else {
            self.deleting = false;
            self.char_index = 0;
            self.text_index = (self.text_index + 1) % self.texts.len();
            Some(TypingFrame {
                phase: TypingPhase::Advancing,
                text: None,
                delay: ADVANCE_GAP,
            })
        }
    }

    fn visible_text(&self) -> String {
        self.texts[self.text_index]
            .chars()
            .take(self.char_index)
            .collect()
    }
}

#[cfg(test)]
impl TypingMachine {
    const fn text_index(&self) -> usize {
        self.text_index
    }

    const fn char_index(&self) -> usize {
        self.char_index
    }

    const fn is_deleting(&self) -> bool {
        self.deleting
    }

    const fn is_paused(&self) -> bool {
        self.paused
    }
}

/// A running animation. Stopping it, or dropping it, cancels the pending
/// timer and ends the task.
#[derive(Debug)]
pub struct TypingEffect {
    handle: AbortHandle,
}

impl TypingEffect {
    /// Animates `element`'s text content with browser timers.
    pub fn start<S>(element: Element, machine: TypingMachine, spawner: &S) -> Result<Self, SpawnError>
    where
        S: LocalSpawn + ?Sized,
    {
        Self::spawn_with(
            machine,
            move |text| element.set_text_content(Some(text)),
            |delay| TimeoutFuture::new(u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)),
            spawner,
        )
    }

    /// Runs `machine` with a custom renderer and sleeper.
    pub fn spawn_with<S, R, D, F>(
        machine: TypingMachine,
        render: R,
        sleep: D,
        spawner: &S,
    ) -> Result<Self, SpawnError>
    where
        S: LocalSpawn + ?Sized,
        R: FnMut(&str) + 'static,
        D: FnMut(Duration) -> F + 'static,
        F: Future<Output = ()> + 'static,
    {
        let (task, handle) = abortable(run_frames(machine, render, sleep));
        spawner.spawn_local(async move {
            if task.await.is_err() {
                log::debug!("typing effect stopped");
            }
        })?;
        Ok(Self { handle })
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    #[cfg(test)]
    fn is_stopped(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Drop for TypingEffect {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_frames<R, D, F>(mut machine: TypingMachine, mut render: R, mut sleep: D)
where
    R: FnMut(&str),
    D: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    while let Some(frame) = machine.step() {
        if let Some(text) = frame.text.as_deref() {
            render(text);
        }
        sleep(frame.delay).await;
    }
}
