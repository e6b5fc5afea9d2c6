// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam between the explorer and whatever shows its pixels.
//!
//! A `Display` reports its size and input once per frame and is handed
//! the canvas to present.  `drive` turns that input into pans, zooms
//! and resizes.  How the display reaches a screen (or doesn't) is its
//! own business; `HeadlessDisplay` is fed scripted input over a channel
//! and just keeps the last frame it was shown.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::canvas::Canvas;
use crate::coordinator::Coordinator;
use crate::planes::Region;

/// Input gathered for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InputState {
    /// Pointer position in screen pixels.
    pub pointer: (f64, f64),
    /// Pointer movement since the previous frame.
    pub pointer_delta: (f64, f64),
    /// Scroll wheel movement this frame.
    pub scroll: (f64, f64),
    /// Whether the primary button is down.
    pub primary_held: bool,
    /// Set when the display changed size since the previous frame.
    pub resized: Option<Region<usize>>,
}

/// Anything that can show a canvas and report user input.
pub trait Display {
    /// Current drawable size in pixels.
    fn size(&self) -> Region<usize>;
    /// Input since the previous call.
    fn poll_input(&mut self) -> InputState;
    /// Whether the user asked to quit.
    fn should_close(&self) -> bool;
    /// Shows the canvas.  It may be mid-update; a torn frame is fine.
    fn present(&mut self, canvas: &Canvas);
}

/// Maps a vertical scroll amount to a zoom factor: scrolling up
/// magnifies, scrolling down shrinks, and a scroll of a full display
/// height means a factor of six either way.
pub fn scroll_to_zoom(scroll: f64, height: usize) -> Option<f64> {
    if scroll == 0.0 || height == 0 {
        return None;
    }
    let mut amount = 5.0 * (scroll / height as f64);
    amount += if amount < 0.0 { -1.0 } else { 1.0 };
    if amount < 0.0 {
        amount = 1.0 / -amount;
    }
    Some(amount)
}

/// Inverse of `scroll_to_zoom`: the vertical scroll that produces a
/// zoom factor of `amount` on a display `height` pixels tall.
pub fn zoom_to_scroll(amount: f64, height: usize) -> f64 {
    let h = height as f64;
    if amount >= 1.0 {
        (amount - 1.0) * h / 5.0
    } else {
        -(1.0 / amount - 1.0) * h / 5.0
    }
}

/// Applies one frame of input to the coordinator, in the order resize,
/// drag, scroll.  Failures are logged and the frame goes on.
pub fn apply_input(coordinator: &mut Coordinator, input: &InputState) {
    if let Some(size) = input.resized {
        if let Err(err) = coordinator.resize(size.width, size.height) {
            warn!("keeping the old canvas: {}", err);
        }
    }
    if input.primary_held {
        coordinator.pan(input.pointer_delta);
    }
    if let Some(amount) = scroll_to_zoom(input.scroll.1, coordinator.size().height) {
        if let Err(err) = coordinator.zoom(input.pointer, amount) {
            warn!("ignoring scroll: {}", err);
        }
    }
}

/// Runs the frame loop until the display asks to close.  Returns the
/// number of frames presented.
pub fn drive<D: Display + ?Sized>(coordinator: &mut Coordinator, display: &mut D) -> u64 {
    let mut frames = 0;
    while !display.should_close() {
        let input = display.poll_input();
        apply_input(coordinator, &input);
        display.present(&coordinator.canvas());
        frames += 1;
    }
    debug!("display closed after {} frames", frames);
    frames
}

/// Scripted input for a `HeadlessDisplay`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to this screen position.
    PointerMoved(f64, f64),
    /// The primary button went down.
    PrimaryPressed,
    /// The primary button went up.
    PrimaryReleased,
    /// The wheel scrolled.
    Scroll(f64, f64),
    /// The display changed size.
    Resized(usize, usize),
    /// The user asked to quit.
    Close,
}

/// A display with no screen.  Each frame consumes at most one scripted
/// event; once the sending side is dropped and the script is used up,
/// the display closes.
#[derive(Debug)]
pub struct HeadlessDisplay {
    size: Region<usize>,
    events: Receiver<InputEvent>,
    pointer: (f64, f64),
    held: bool,
    closed: bool,
    frames: u64,
    last_frame: Vec<u32>,
}

impl HeadlessDisplay {
    /// A display of the given size and the sender that scripts it.
    pub fn new(width: usize, height: usize) -> (HeadlessDisplay, Sender<InputEvent>) {
        let (tx, rx) = channel::unbounded();
        let display = HeadlessDisplay {
            size: Region::new(width, height),
            events: rx,
            pointer: (0.0, 0.0),
            held: false,
            closed: false,
            frames: 0,
            last_frame: Vec::new(),
        };
        (display, tx)
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The words of the most recently presented canvas.
    pub fn last_frame(&self) -> &[u32] {
        &self.last_frame
    }
}

impl Display for HeadlessDisplay {
    fn size(&self) -> Region<usize> {
        self.size
    }

    fn poll_input(&mut self) -> InputState {
        let mut input = InputState {
            pointer: self.pointer,
            primary_held: self.held,
            ..InputState::default()
        };
        match self.events.try_recv() {
            Ok(InputEvent::PointerMoved(x, y)) => {
                input.pointer_delta = (x - self.pointer.0, y - self.pointer.1);
                self.pointer = (x, y);
                input.pointer = self.pointer;
            }
            Ok(InputEvent::PrimaryPressed) => {
                self.held = true;
                input.primary_held = true;
            }
            Ok(InputEvent::PrimaryReleased) => {
                self.held = false;
                input.primary_held = false;
            }
            Ok(InputEvent::Scroll(x, y)) => input.scroll = (x, y),
            Ok(InputEvent::Resized(w, h)) => {
                self.size = Region::new(w, h);
                input.resized = Some(self.size);
            }
            Ok(InputEvent::Close) | Err(TryRecvError::Disconnected) => self.closed = true,
            Err(TryRecvError::Empty) => (),
        }
        input
    }

    fn should_close(&self) -> bool {
        self.closed
    }

    fn present(&mut self, canvas: &Canvas) {
        self.last_frame = canvas.snapshot();
        self.frames += 1;
    }
}
