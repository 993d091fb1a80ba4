// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening layout validation.
//!
//! A wall's free span is split left to right into wall stubs and openings:
//!
//! | kind | composition |
//! |------|-------------|
//! | none | wall |
//! | door | stub, door, stub |
//! | one window | stub, window, stub |
//! | two windows | stub, window, stub, window, stub |
//! | door + window | stub, door, stub, window (or window before door) |
//!
//! [`OpeningEditor`] holds an in-progress composition. Editing it never touches
//! the design; [`OpeningEditor::commit`] produces an [`OpeningLayout`] and
//! [`OpeningEditor::cancel`] drops everything.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::{Error, Result};

const EPSILON: f64 = 1e-9;

/// What is cut into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpeningKind {
    #[default]
    None,
    Door,
    Window,
    DoorWindow,
}

/// Which end of a door+window wall the door is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoorSide {
    #[default]
    Left,
    Right,
}

/// Kind of a sub-segment in a wall composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Wall,
    Door,
    Window,
}

/// One piece of a wall composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubSegment {
    pub kind: SegmentKind,
    pub width: f64,
    /// Only set for windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl SubSegment {
    pub fn wall(width: f64) -> Self {
        Self {
            kind: SegmentKind::Wall,
            width,
            height: None,
        }
    }

    pub fn door(width: f64) -> Self {
        Self {
            kind: SegmentKind::Door,
            width,
            height: None,
        }
    }

    pub fn window(window: WindowSpec) -> Self {
        Self {
            kind: SegmentKind::Window,
            width: window.width,
            height: Some(window.height),
        }
    }
}

/// Ordered wall composition. Five pieces cover every opening kind.
pub type Segments = SmallVec<[SubSegment; 5]>;

/// Window size, cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub width: f64,
    pub height: f64,
}

/// Raw user input for an opening composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningRequest {
    pub kind: OpeningKind,
    /// Wall stub widths, left to right
    pub stubs: SmallVec<[f64; 3]>,
    pub door_width: Option<f64>,
    pub window: Option<WindowSpec>,
    /// 1 or 2; only the window-only kind may use 2
    pub window_count: u8,
    pub door_side: DoorSide,
}

impl Default for OpeningRequest {
    fn default() -> Self {
        Self {
            kind: OpeningKind::None,
            stubs: SmallVec::new(),
            door_width: None,
            window: None,
            window_count: 1,
            door_side: DoorSide::Left,
        }
    }
}

impl OpeningRequest {
    /// A plain wall.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn door(stub1: f64, door_width: f64, stub2: f64) -> Self {
        Self {
            kind: OpeningKind::Door,
            stubs: smallvec![stub1, stub2],
            door_width: Some(door_width),
            ..Self::default()
        }
    }

    pub fn window(stub1: f64, window: WindowSpec, stub2: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            stubs: smallvec![stub1, stub2],
            window: Some(window),
            ..Self::default()
        }
    }

    /// Two identical windows separated by a middle stub.
    pub fn double_window(stub1: f64, window: WindowSpec, stub2: f64, stub3: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            stubs: smallvec![stub1, stub2, stub3],
            window: Some(window),
            window_count: 2,
            ..Self::default()
        }
    }

    pub fn door_window(
        stub1: f64,
        door_width: f64,
        stub2: f64,
        window: WindowSpec,
        door_side: DoorSide,
    ) -> Self {
        Self {
            kind: OpeningKind::DoorWindow,
            stubs: smallvec![stub1, stub2],
            door_width: Some(door_width),
            window: Some(window),
            door_side,
            ..Self::default()
        }
    }

    /// Number of wall stubs the kind needs.
    pub fn expected_stubs(&self) -> usize {
        match self.kind {
            OpeningKind::None => 0,
            OpeningKind::Door | OpeningKind::DoorWindow => 2,
            OpeningKind::Window => usize::from(self.window_count.clamp(1, 2)) + 1,
        }
    }

    /// Sum of every width in the request. A plain wall has no widths of its own.
    pub fn total(&self) -> f64 {
        let stubs: f64 = self.stubs.iter().sum();
        let door = match self.kind {
            OpeningKind::Door | OpeningKind::DoorWindow => self.door_width.unwrap_or(0.0),
            _ => 0.0,
        };
        let windows = match (self.kind, self.window) {
            (OpeningKind::Window, Some(w)) => w.width * f64::from(self.window_count),
            (OpeningKind::DoorWindow, Some(w)) => w.width,
            _ => 0.0,
        };
        stubs + door + windows
    }

    /// Checks the per-element rules and builds the composition.
    fn compose(&self, wall_height: f64) -> Result<Segments> {
        let expected = self.expected_stubs();
        if self.stubs.len() != expected {
            return Err(Error::InvalidOpening(format!(
                "{:?} needs {} wall stubs, got {}",
                self.kind,
                expected,
                self.stubs.len()
            )));
        }
        if let Some(bad) = self.stubs.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(Error::InvalidOpening(format!(
                "wall stub width must be non-negative, got {bad}"
            )));
        }

        let door = || -> Result<SubSegment> {
            match self.door_width {
                Some(w) if w.is_finite() && w > 0.0 => Ok(SubSegment::door(w)),
                Some(w) => Err(Error::InvalidOpening(format!(
                    "door width must be positive, got {w}"
                ))),
                None => Err(Error::InvalidOpening("door width is missing".to_string())),
            }
        };
        let window = || -> Result<SubSegment> {
            let spec = self
                .window
                .ok_or_else(|| Error::InvalidOpening("window size is missing".to_string()))?;
            if !spec.width.is_finite() || spec.width <= 0.0 {
                return Err(Error::InvalidOpening(format!(
                    "window width must be positive, got {}",
                    spec.width
                )));
            }
            if !spec.height.is_finite() || spec.height <= 0.0 || spec.height > wall_height {
                return Err(Error::InvalidOpening(format!(
                    "window height must be in (0, {wall_height}], got {}",
                    spec.height
                )));
            }
            Ok(SubSegment::window(spec))
        };

        let s = &self.stubs;
        let segments = match self.kind {
            OpeningKind::None => Segments::new(),
            OpeningKind::Door => smallvec![SubSegment::wall(s[0]), door()?, SubSegment::wall(s[1])],
            OpeningKind::Window => match self.window_count {
                1 => smallvec![SubSegment::wall(s[0]), window()?, SubSegment::wall(s[1])],
                2 => {
                    let w = window()?;
                    smallvec![
                        SubSegment::wall(s[0]),
                        w,
                        SubSegment::wall(s[1]),
                        w,
                        SubSegment::wall(s[2]),
                    ]
                }
                n => {
                    return Err(Error::InvalidOpening(format!(
                        "a wall holds one or two windows, got {n}"
                    )))
                }
            },
            OpeningKind::DoorWindow => {
                if self.window_count != 1 {
                    return Err(Error::InvalidOpening(
                        "door and window walls hold a single window".to_string(),
                    ));
                }
                let (first, second) = match self.door_side {
                    DoorSide::Left => (door()?, window()?),
                    DoorSide::Right => (window()?, door()?),
                };
                smallvec![SubSegment::wall(s[0]), first, SubSegment::wall(s[1]), second]
            }
        };
        Ok(segments)
    }
}

/// A validated, committed wall composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningLayout {
    pub kind: OpeningKind,
    /// Free span the layout was committed against
    pub free_span: f64,
    pub segments: Segments,
}

impl OpeningLayout {
    /// A wall without openings covering the whole free span.
    pub fn plain(free_span: f64) -> Self {
        Self {
            kind: OpeningKind::None,
            free_span,
            segments: smallvec![SubSegment::wall(free_span)],
        }
    }

    /// Sum of all sub-segment widths.
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.width).sum()
    }

    /// Door and window segments only.
    pub fn openings(&self) -> impl Iterator<Item = &SubSegment> {
        self.segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Wall)
    }

    /// Re-checks the layout against the free span of the wall it is committed to.
    pub fn check_against(&self, free_span: f64, tolerance: f64) -> Result<()> {
        if (self.free_span - free_span).abs() > EPSILON {
            return Err(Error::InvalidOpening(format!(
                "layout was built for a free span of {} cm, wall has {} cm",
                self.free_span, free_span
            )));
        }
        if let Some(bad) = self
            .segments
            .iter()
            .find(|s| !s.width.is_finite() || s.width < 0.0)
        {
            return Err(Error::InvalidOpening(format!(
                "segment width must be non-negative, got {}",
                bad.width
            )));
        }
        let total = self.total();
        if total > free_span + EPSILON {
            return Err(Error::InsufficientSpan {
                available: free_span,
                required: total,
            });
        }
        if (free_span - total).abs() > tolerance {
            return Err(Error::InvalidOpening(format!(
                "segments cover {total} cm of a {free_span} cm span"
            )));
        }
        Ok(())
    }
}

/// Observable state of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// The composition cannot be committed yet
    Collecting,
    /// The composition fits the free span
    Valid,
}

/// An opening editing session for one wall.
#[derive(Debug, Clone)]
pub struct OpeningEditor {
    free_span: f64,
    wall_height: f64,
    request: OpeningRequest,
    total: f64,
}

impl OpeningEditor {
    /// Starts a session with zero-width stubs for the given kind.
    pub fn new(free_span: f64, wall_height: f64, kind: OpeningKind) -> Self {
        let mut editor = Self::from_request(free_span, wall_height, OpeningRequest::default());
        editor.set_kind(kind);
        editor
    }

    /// Starts a session from a prepared request.
    pub fn from_request(free_span: f64, wall_height: f64, request: OpeningRequest) -> Self {
        let mut editor = Self {
            free_span,
            wall_height,
            request,
            total: 0.0,
        };
        editor.recompute();
        editor
    }

    fn recompute(&mut self) {
        self.total = match self.request.kind {
            OpeningKind::None => self.free_span,
            _ => self.request.total(),
        };
    }

    pub fn request(&self) -> &OpeningRequest {
        &self.request
    }

    pub fn free_span(&self) -> f64 {
        self.free_span
    }

    /// Current composition total.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Free span not yet assigned. Negative while the composition is too wide.
    pub fn remaining(&self) -> f64 {
        self.free_span - self.total
    }

    /// Switches the opening kind, resizing the stub list.
    pub fn set_kind(&mut self, kind: OpeningKind) {
        self.request.kind = kind;
        if kind != OpeningKind::Window {
            self.request.window_count = 1;
        }
        let expected = self.request.expected_stubs();
        self.request.stubs.resize(expected, 0.0);
        self.recompute();
    }

    pub fn set_stub(&mut self, index: usize, width: f64) -> Result<()> {
        let stub = self.request.stubs.get_mut(index).ok_or_else(|| {
            Error::InvalidOpening(format!("no wall stub at position {index}"))
        })?;
        *stub = width;
        self.recompute();
        Ok(())
    }

    pub fn set_door_width(&mut self, width: f64) {
        self.request.door_width = Some(width);
        self.recompute();
    }

    pub fn set_window(&mut self, window: WindowSpec) {
        self.request.window = Some(window);
        self.recompute();
    }

    /// Sets the number of windows; two are only allowed without a door.
    pub fn set_window_count(&mut self, count: u8) -> Result<()> {
        let allowed = match self.request.kind {
            OpeningKind::Window => (1..=2).contains(&count),
            _ => count == 1,
        };
        if !allowed {
            return Err(Error::InvalidOpening(format!(
                "{:?} walls cannot hold {count} windows",
                self.request.kind
            )));
        }
        self.request.window_count = count;
        let expected = self.request.expected_stubs();
        self.request.stubs.resize(expected, 0.0);
        self.recompute();
        Ok(())
    }

    pub fn set_door_side(&mut self, side: DoorSide) {
        self.request.door_side = side;
    }

    /// Validates the composition against the free span.
    pub fn validate(&self) -> Result<Segments> {
        if !self.free_span.is_finite() || self.free_span <= 0.0 {
            return Err(Error::InsufficientSpan {
                available: self.free_span,
                required: self.total.max(0.0),
            });
        }
        let segments = self.request.compose(self.wall_height)?;
        if self.total > self.free_span + EPSILON {
            return Err(Error::InsufficientSpan {
                available: self.free_span,
                required: self.total,
            });
        }
        Ok(segments)
    }

    pub fn state(&self) -> EditorState {
        match self.validate() {
            Ok(_) => EditorState::Valid,
            Err(_) => EditorState::Collecting,
        }
    }

    /// Validates once more and closes the session.
    ///
    /// Unassigned span is added to the last wall stub, so the committed
    /// segments always add up to the free span.
    pub fn commit(self) -> Result<OpeningLayout> {
        let mut segments = self.validate()?;
        if self.request.kind == OpeningKind::None {
            return Ok(OpeningLayout::plain(self.free_span));
        }

        let slack = self.free_span - self.total;
        if let Some(last_stub) = segments
            .iter_mut()
            .rev()
            .find(|s| s.kind == SegmentKind::Wall)
        {
            last_stub.width += slack;
        }

        Ok(OpeningLayout {
            kind: self.request.kind,
            free_span: self.free_span,
            segments,
        })
    }

    /// Closes the session without producing anything.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WALL_HEIGHT: f64 = 240.0;

    fn window(width: f64, height: f64) -> WindowSpec {
        WindowSpec { width, height }
    }

    #[test]
    fn oversized_door_is_rejected() {
        let editor = OpeningEditor::from_request(
            160.0,
            WALL_HEIGHT,
            OpeningRequest::door(60.0, 45.0, 80.0),
        );
        assert_eq!(editor.total(), 185.0);
        assert_eq!(editor.state(), EditorState::Collecting);
        assert_eq!(
            editor.commit().unwrap_err(),
            Error::InsufficientSpan {
                available: 160.0,
                required: 185.0
            }
        );
    }

    #[test]
    fn door_commit_absorbs_slack_in_last_stub() {
        let editor =
            OpeningEditor::from_request(160.0, WALL_HEIGHT, OpeningRequest::door(40.0, 80.0, 20.0));
        assert_eq!(editor.state(), EditorState::Valid);
        assert_eq!(editor.remaining(), 20.0);

        let layout = editor.commit().unwrap();
        assert_eq!(layout.kind, OpeningKind::Door);
        let widths: Vec<f64> = layout.segments.iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![40.0, 80.0, 40.0]);
        assert_relative_eq!(layout.total(), 160.0);
    }

    #[test]
    fn editing_recomputes_total() {
        let mut editor = OpeningEditor::new(200.0, WALL_HEIGHT, OpeningKind::Door);
        assert_eq!(editor.request().stubs.len(), 2);
        assert_eq!(editor.state(), EditorState::Collecting);

        editor.set_door_width(90.0);
        assert_eq!(editor.total(), 90.0);
        editor.set_stub(0, 50.0).unwrap();
        editor.set_stub(1, 70.0).unwrap();
        assert_eq!(editor.total(), 210.0);
        assert_eq!(editor.state(), EditorState::Collecting);

        editor.set_stub(1, 60.0).unwrap();
        assert_eq!(editor.state(), EditorState::Valid);
        assert!(editor.set_stub(2, 10.0).is_err());
    }

    #[test]
    fn door_needs_positive_width() {
        let editor =
            OpeningEditor::from_request(160.0, WALL_HEIGHT, OpeningRequest::door(10.0, 0.0, 10.0));
        assert!(matches!(editor.validate(), Err(Error::InvalidOpening(_))));
    }

    #[test]
    fn negative_stub_is_rejected() {
        let editor =
            OpeningEditor::from_request(160.0, WALL_HEIGHT, OpeningRequest::door(-5.0, 80.0, 10.0));
        assert!(matches!(editor.validate(), Err(Error::InvalidOpening(_))));
    }

    #[test]
    fn window_taller_than_wall_is_rejected() {
        let editor = OpeningEditor::from_request(
            160.0,
            WALL_HEIGHT,
            OpeningRequest::window(20.0, window(100.0, 250.0), 20.0),
        );
        assert!(matches!(editor.validate(), Err(Error::InvalidOpening(_))));
    }

    #[test]
    fn two_windows_use_three_stubs() {
        let layout = OpeningEditor::from_request(
            300.0,
            WALL_HEIGHT,
            OpeningRequest::double_window(30.0, window(100.0, 120.0), 40.0, 30.0),
        )
        .commit()
        .unwrap();

        let kinds: Vec<SegmentKind> = layout.segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Wall,
                SegmentKind::Window,
                SegmentKind::Wall,
                SegmentKind::Window,
                SegmentKind::Wall
            ]
        );
        assert_eq!(layout.openings().count(), 2);
        assert_relative_eq!(layout.total(), 300.0);
    }

    #[test]
    fn window_count_limits() {
        let mut editor = OpeningEditor::new(300.0, WALL_HEIGHT, OpeningKind::Window);
        editor.set_window_count(2).unwrap();
        assert_eq!(editor.request().stubs.len(), 3);
        assert!(editor.set_window_count(3).is_err());

        let mut mixed = OpeningEditor::new(300.0, WALL_HEIGHT, OpeningKind::DoorWindow);
        assert!(mixed.set_window_count(2).is_err());
    }

    #[test]
    fn door_side_only_changes_order() {
        let left = OpeningRequest::door_window(20.0, 80.0, 30.0, window(60.0, 100.0), DoorSide::Left);
        let right = OpeningRequest {
            door_side: DoorSide::Right,
            ..left.clone()
        };

        let l = OpeningEditor::from_request(200.0, WALL_HEIGHT, left).commit().unwrap();
        let r = OpeningEditor::from_request(200.0, WALL_HEIGHT, right).commit().unwrap();

        assert_eq!(l.segments[1].kind, SegmentKind::Door);
        assert_eq!(l.segments[3].kind, SegmentKind::Window);
        assert_eq!(r.segments[1].kind, SegmentKind::Window);
        assert_eq!(r.segments[3].kind, SegmentKind::Door);
        assert_relative_eq!(l.total(), r.total());
        // Slack lands in the middle stub, the last wall piece.
        assert_relative_eq!(l.segments[2].width, 40.0);
    }

    #[test]
    fn plain_wall_covers_span() {
        let editor = OpeningEditor::new(160.0, WALL_HEIGHT, OpeningKind::None);
        assert_eq!(editor.total(), 160.0);
        let layout = editor.commit().unwrap();
        assert_eq!(layout, OpeningLayout::plain(160.0));
    }

    #[test]
    fn no_usable_span_rejects_even_plain_walls() {
        let editor = OpeningEditor::new(-10.0, WALL_HEIGHT, OpeningKind::None);
        assert!(matches!(
            editor.commit(),
            Err(Error::InsufficientSpan { .. })
        ));
    }

    #[test]
    fn check_against_detects_mismatch() {
        let layout = OpeningLayout::plain(160.0);
        assert!(layout.check_against(160.0, 1.0).is_ok());
        assert!(layout.check_against(150.0, 1.0).is_err());

        let mut short = layout.clone();
        short.segments[0].width = 100.0;
        assert!(matches!(
            short.check_against(160.0, 1.0),
            Err(Error::InvalidOpening(_))
        ));
    }
}
