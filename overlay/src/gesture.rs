//! Input model: tools, contact events, and the gesture state machine.
//!
//! The host reports every pointer or touch change as a [`ContactEvent`]
//! carrying the full set of contacts still active afterwards.
//! [`GestureRecognizer`] turns that stream into overlay transform updates
//! (pan, pinch-zoom, rotate) and stroke boundaries for the drawing layer.
//!
//! With one contact the active [`Tool`] decides between panning the overlay
//! and drawing. Two contacts always pinch and rotate the overlay; the pinch
//! tracks its two contacts by id, whatever order the host lists them in.
//! Three or more are ignored until one lifts. Lifting every contact returns to
//! idle from any state.

use std::str::FromStr;

use log::debug;

use crate::config::OverlayConfig;
use crate::consts::MIN_PINCH_DISTANCE_PX;
use crate::error::OverlayError;
use crate::geometry::{Point, angle_degrees, distance, wrap_degrees};
use crate::transform::TransformState;

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

/// Which tool a single contact drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag the overlay image (default).
    #[default]
    Move,
    /// Paint strokes on the drawing layer.
    Brush,
    /// Erase strokes from the drawing layer.
    Eraser,
}

impl FromStr for Tool {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(Self::Move),
            "brush" => Ok(Self::Brush),
            "eraser" => Ok(Self::Eraser),
            _ => Err(OverlayError::InvalidInput(format!("unknown tool {s:?}"))),
        }
    }
}

impl Tool {
    /// Whether a single contact draws rather than pans.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }
}

/// One active pointer or touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Host-assigned identifier, stable for the life of the contact.
    pub id: i32,
    /// Position in overlay space, in CSS pixels.
    pub pos: Point,
    /// The contact landed on an interactive control (slider, button) layered
    /// above the overlay and must not start a gesture.
    pub on_control: bool,
}

impl Contact {
    #[must_use]
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, pos: Point::new(x, y), on_control: false }
    }
}

/// What changed in the contact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A contact was added.
    Start,
    /// One or more contacts moved.
    Move,
    /// A contact was lifted or cancelled.
    End,
}

impl FromStr for Phase {
    type Err = OverlayError;

    /// Accepts the pointer/touch event suffixes the host sees: `start`/`down`,
    /// `move`, `end`/`up`/`cancel`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" | "down" => Ok(Self::Start),
            "move" => Ok(Self::Move),
            "end" | "up" | "cancel" => Ok(Self::End),
            _ => Err(OverlayError::InvalidInput(format!("unknown contact phase {s:?}"))),
        }
    }
}

/// Numbers per contact in [`ContactEvent::from_flat`]: id, x, y, on-control flag.
pub const CONTACT_STRIDE: usize = 4;

/// A contact change, carrying every contact still active after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    pub phase: Phase,
    pub contacts: Vec<Contact>,
}

impl ContactEvent {
    #[must_use]
    pub fn new(phase: Phase, contacts: Vec<Contact>) -> Self {
        Self { phase, contacts }
    }

    #[must_use]
    pub fn start(contacts: Vec<Contact>) -> Self {
        Self::new(Phase::Start, contacts)
    }

    #[must_use]
    pub fn moved(contacts: Vec<Contact>) -> Self {
        Self::new(Phase::Move, contacts)
    }

    #[must_use]
    pub fn end(contacts: Vec<Contact>) -> Self {
        Self::new(Phase::End, contacts)
    }

    /// Decode contacts packed as `[id, x, y, on_control, ...]`, where a
    /// non-zero `on_control` marks a contact that landed on a control.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidInput`] when the length is not a
    /// multiple of [`CONTACT_STRIDE`] or an id is not an integer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_flat(phase: Phase, flat: &[f64]) -> Result<Self, OverlayError> {
        if flat.len() % CONTACT_STRIDE != 0 {
            return Err(OverlayError::InvalidInput(format!(
                "contact array length {} is not a multiple of {CONTACT_STRIDE}",
                flat.len()
            )));
        }
        let contacts = flat
            .chunks_exact(CONTACT_STRIDE)
            .map(|c| {
                let id = c[0];
                if id.fract() != 0.0 || id < f64::from(i32::MIN) || id > f64::from(i32::MAX) {
                    return Err(OverlayError::InvalidInput(format!("contact id {id} is not an integer")));
                }
                Ok(Contact { id: id as i32, pos: Point::new(c[1], c[2]), on_control: c[3] != 0.0 })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(phase, contacts))
    }

    fn find(&self, id: i32) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }
}

/// The active gesture, carrying the context captured when it began.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// One contact dragging the overlay.
    Panning {
        /// Contact being tracked.
        id: i32,
        /// Contact position minus overlay translation at gesture start.
        anchor: Point,
    },
    /// One contact drawing a stroke.
    Stroking {
        id: i32,
    },
    /// Two contacts zooming and rotating the overlay.
    PinchRotating {
        /// The two contacts being tracked, in the order first seen.
        ids: [i32; 2],
        /// Finger separation at gesture start; `None` until a usable
        /// (non-degenerate) separation has been seen.
        initial_distance: Option<f64>,
        /// Overlay scale when `initial_distance` was captured.
        initial_scale: f64,
        /// Finger angle, in degrees, at the last applied rotation step.
        initial_angle: f64,
    },
}

/// Side effects of one contact event, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    /// The overlay transform was updated in place.
    Transformed,
    /// A stroke began at this point.
    StrokeStarted(Point),
    /// The active stroke extends to this point.
    StrokeMoved(Point),
    /// The active stroke finished.
    StrokeEnded,
}

/// State machine from contact events to overlay and stroke updates.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    state: GestureState,
    rotate_threshold_deg: f64,
    rotate_damping: f64,
    min_scale: f64,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            state: GestureState::Idle,
            rotate_threshold_deg: config.rotate_threshold_deg,
            rotate_damping: config.rotate_damping,
            min_scale: config.min_scale,
        }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Feed one contact event.
    ///
    /// `overlay` is `None` while no overlay image is loaded; pan and pinch are
    /// then ignored, but strokes still work.
    pub fn handle(
        &mut self,
        event: &ContactEvent,
        tool: Tool,
        mut overlay: Option<&mut TransformState>,
    ) -> Vec<GestureEffect> {
        let mut effects = Vec::new();
        match event.phase {
            Phase::Start => self.on_start(event, tool, overlay.as_deref(), &mut effects),
            Phase::Move => self.on_move(event, overlay.as_deref_mut(), &mut effects),
            Phase::End => self.on_end(event, tool, overlay.as_deref(), &mut effects),
        }
        effects
    }

    fn on_start(
        &mut self,
        event: &ContactEvent,
        tool: Tool,
        overlay: Option<&TransformState>,
        effects: &mut Vec<GestureEffect>,
    ) {
        match event.contacts.as_slice() {
            [only] => {
                self.finish_stroke(effects);
                if only.on_control {
                    self.transition(GestureState::Idle);
                } else {
                    self.begin_single(*only, tool, overlay, effects);
                }
            }
            [a, b] => {
                self.finish_stroke(effects);
                self.begin_pinch(a, b, overlay);
            }
            _ => {}
        }
    }

    fn on_move(
        &mut self,
        event: &ContactEvent,
        overlay: Option<&mut TransformState>,
        effects: &mut Vec<GestureEffect>,
    ) {
        match self.state {
            GestureState::Idle => {}
            GestureState::Panning { id, anchor } => {
                if let (Some(contact), Some(t)) = (event.find(id), overlay) {
                    t.translation = contact.pos - anchor;
                    effects.push(GestureEffect::Transformed);
                }
            }
            GestureState::Stroking { id } => {
                if let Some(contact) = event.find(id) {
                    effects.push(GestureEffect::StrokeMoved(contact.pos));
                }
            }
            GestureState::PinchRotating { ids: [first, second], .. } => {
                if let (Some(a), Some(b), Some(t)) = (event.find(first), event.find(second), overlay) {
                    if self.pinch_to(a.pos, b.pos, t) {
                        effects.push(GestureEffect::Transformed);
                    }
                }
            }
        }
    }

    fn on_end(
        &mut self,
        event: &ContactEvent,
        tool: Tool,
        overlay: Option<&TransformState>,
        effects: &mut Vec<GestureEffect>,
    ) {
        match event.contacts.as_slice() {
            [] => {
                self.finish_stroke(effects);
                self.transition(GestureState::Idle);
            }
            [remaining] => match self.state {
                GestureState::PinchRotating { .. } => {
                    if tool.is_drawing() {
                        self.transition(GestureState::Idle);
                    } else {
                        self.begin_single(*remaining, tool, overlay, effects);
                    }
                }
                GestureState::Panning { id, .. } | GestureState::Stroking { id } if id != remaining.id => {
                    self.finish_stroke(effects);
                    self.transition(GestureState::Idle);
                }
                _ => {}
            },
            [a, b] => match self.state {
                GestureState::PinchRotating { ids: [first, second], .. }
                    if event.find(first).is_some() && event.find(second).is_some() => {}
                // Down from three contacts: pinch the remaining pair from where it is now.
                _ => {
                    self.finish_stroke(effects);
                    self.begin_pinch(a, b, overlay);
                }
            },
            _ => {}
        }
    }

    fn begin_single(
        &mut self,
        contact: Contact,
        tool: Tool,
        overlay: Option<&TransformState>,
        effects: &mut Vec<GestureEffect>,
    ) {
        if tool.is_drawing() {
            self.transition(GestureState::Stroking { id: contact.id });
            effects.push(GestureEffect::StrokeStarted(contact.pos));
        } else if let Some(t) = overlay {
            self.transition(GestureState::Panning { id: contact.id, anchor: contact.pos - t.translation });
        } else {
            self.transition(GestureState::Idle);
        }
    }

    fn begin_pinch(&mut self, a: &Contact, b: &Contact, overlay: Option<&TransformState>) {
        let Some(t) = overlay else {
            self.transition(GestureState::Idle);
            return;
        };
        let d = distance(a.pos, b.pos);
        self.transition(GestureState::PinchRotating {
            ids: [a.id, b.id],
            initial_distance: (d > MIN_PINCH_DISTANCE_PX).then_some(d),
            initial_scale: t.scale,
            initial_angle: angle_degrees(a.pos, b.pos),
        });
    }

    /// Apply one pinch step. Returns whether the transform changed.
    fn pinch_to(&mut self, a: Point, b: Point, t: &mut TransformState) -> bool {
        let GestureState::PinchRotating { initial_distance, initial_scale, initial_angle, .. } = &mut self.state else {
            return false;
        };
        let current_distance = distance(a, b);
        let current_angle = angle_degrees(a, b);

        let Some(base) = *initial_distance else {
            // Fingers started on top of each other; take the first usable
            // separation as the baseline instead of dividing by zero.
            if current_distance > MIN_PINCH_DISTANCE_PX {
                *initial_distance = Some(current_distance);
                *initial_scale = t.scale;
                *initial_angle = current_angle;
            }
            return false;
        };

        let before = *t;
        t.scale = (*initial_scale * (current_distance / base)).max(self.min_scale);

        let delta = wrap_degrees(current_angle - *initial_angle);
        if delta.abs() > self.rotate_threshold_deg {
            t.rotation.z += delta * self.rotate_damping;
            *initial_angle = current_angle;
        }
        *t != before
    }

    fn finish_stroke(&mut self, effects: &mut Vec<GestureEffect>) {
        if matches!(self.state, GestureState::Stroking { .. }) {
            effects.push(GestureEffect::StrokeEnded);
            self.transition(GestureState::Idle);
        }
    }

    fn transition(&mut self, next: GestureState) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            debug!("gesture: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
