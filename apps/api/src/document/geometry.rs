//! Node placement as percentages of the parent's bounds, and the drag/resize
//! gesture that produces it.
//!
//! During a gesture the editor only applies a visual translate/scale; the
//! pixel deltas are converted to percentages once, when the gesture commits.

use serde::{Deserialize, Serialize};

use crate::document::DocumentError;

const MIN_SIZE_PCT: f32 = 1.0;
const MAX_PCT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Placement of a node, every field a percentage of the parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameData")]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Deserialize)]
struct FrameData {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl TryFrom<FrameData> for Frame {
    type Error = DocumentError;

    fn try_from(data: FrameData) -> Result<Self, Self::Error> {
        Frame::new(
            Position {
                x: data.x,
                y: data.y,
            },
            Size {
                width: data.width,
                height: data.height,
            },
        )
    }
}

impl Frame {
    pub fn new(position: Position, size: Size) -> Result<Self, DocumentError> {
        let frame = Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        };
        frame.check()?;
        Ok(frame)
    }

    /// Fields are public, so a frame built in code is re-checked wherever a
    /// subtree enters a document.
    pub fn check(&self) -> Result<(), DocumentError> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(DocumentError::InvalidGeometry(format!(
                "frame values must be finite and non-negative, got {values:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(DocumentError::InvalidGeometry(
                "frame size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Absolute-positioning declarations for the renderer.
    pub fn to_declarations(&self) -> String {
        format!(
            "position: absolute; left: {}%; top: {}%; width: {}%; height: {}%",
            fmt_pct(self.x),
            fmt_pct(self.y),
            fmt_pct(self.width),
            fmt_pct(self.height)
        )
    }
}

/// Parses `"43%"`, `"43"` or `" 4.5 % "` into a percentage.
pub fn parse_percent(raw: &str) -> Option<f32> {
    let value = raw.trim().trim_end_matches('%').trim().parse::<f32>().ok()?;
    value.is_finite().then_some(value)
}

/// Two decimals at most, trailing zeros dropped.
fn fmt_pct(value: f32) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    Move,
    Resize,
}

/// Pixel size of the container a node is being dragged inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerBounds {
    pub width_px: f32,
    pub height_px: f32,
}

/// An in-progress drag or resize of one node.
#[derive(Debug, Clone)]
pub struct DragGesture {
    origin: Frame,
    container: ContainerBounds,
    mode: GestureMode,
    dx_px: f32,
    dy_px: f32,
}

impl DragGesture {
    pub fn begin(
        origin: Frame,
        container: ContainerBounds,
        mode: GestureMode,
    ) -> Result<Self, DocumentError> {
        if !(container.width_px > 0.0 && container.height_px > 0.0) {
            return Err(DocumentError::InvalidGeometry(
                "container bounds must be positive".to_string(),
            ));
        }
        Ok(Self {
            origin,
            container,
            mode,
            dx_px: 0.0,
            dy_px: 0.0,
        })
    }

    /// Records the cumulative pointer delta for the current frame and returns
    /// the visual-only CSS transform to apply. The frame itself is untouched.
    pub fn update(&mut self, dx_px: f32, dy_px: f32) -> String {
        self.dx_px = dx_px;
        self.dy_px = dy_px;
        match self.mode {
            GestureMode::Move => format!("translate({dx_px}px, {dy_px}px)"),
            GestureMode::Resize => {
                let origin_w = self.origin.width / MAX_PCT * self.container.width_px;
                let origin_h = self.origin.height / MAX_PCT * self.container.height_px;
                let sx = ((origin_w + dx_px) / origin_w).max(0.0);
                let sy = ((origin_h + dy_px) / origin_h).max(0.0);
                format!("scale({sx}, {sy})")
            }
        }
    }

    /// Converts the accumulated pixel delta to percentages of the container.
    /// Positions are clamped to the container, sizes to `[1, 100]`.
    pub fn commit(self) -> (Position, Size) {
        let dx_pct = self.dx_px / self.container.width_px * MAX_PCT;
        let dy_pct = self.dy_px / self.container.height_px * MAX_PCT;
        let o = self.origin;

        match self.mode {
            GestureMode::Move => (
                Position {
                    x: round2((o.x + dx_pct).clamp(0.0, MAX_PCT - o.width.min(MAX_PCT))),
                    y: round2((o.y + dy_pct).clamp(0.0, MAX_PCT - o.height.min(MAX_PCT))),
                },
                o.size(),
            ),
            GestureMode::Resize => (
                o.position(),
                Size {
                    width: round2((o.width + dx_pct).clamp(MIN_SIZE_PCT, MAX_PCT)),
                    height: round2((o.height + dy_pct).clamp(MIN_SIZE_PCT, MAX_PCT)),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f32, y: f32, w: f32, h: f32) -> Frame {
        Frame::new(Position { x, y }, Size { width: w, height: h }).unwrap()
    }

    const BOUNDS: ContainerBounds = ContainerBounds {
        width_px: 1000.0,
        height_px: 500.0,
    };

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("43%"), Some(43.0));
        assert_eq!(parse_percent(" 4.5 % "), Some(4.5));
        assert_eq!(parse_percent("12"), Some(12.0));
        assert_eq!(parse_percent("auto"), None);
    }

    #[test]
    fn test_frame_rejects_negative_and_nan() {
        assert!(Frame::new(Position { x: -1.0, y: 0.0 }, Size { width: 10.0, height: 10.0 }).is_err());
        assert!(Frame::new(Position { x: 0.0, y: f32::NAN }, Size { width: 10.0, height: 10.0 }).is_err());
        assert!(Frame::new(Position { x: 0.0, y: 0.0 }, Size { width: 0.0, height: 10.0 }).is_err());
    }

    #[test]
    fn test_deserialized_frame_is_checked() {
        let ok: Frame = serde_json::from_str(r#"{"x":4,"y":20,"width":43,"height":15}"#).unwrap();
        assert_eq!(ok, frame(4.0, 20.0, 43.0, 15.0));

        let bad = serde_json::from_str::<Frame>(r#"{"x":-50,"y":0,"width":0,"height":-3}"#);
        assert!(bad.unwrap_err().to_string().contains("non-negative"));
    }

    #[test]
    fn test_declarations_are_compact() {
        assert_eq!(
            frame(4.0, 20.5, 43.25, 15.0).to_declarations(),
            "position: absolute; left: 4%; top: 20.5%; width: 43.25%; height: 15%"
        );
    }

    #[test]
    fn test_updates_do_not_move_until_commit() {
        let mut gesture = DragGesture::begin(frame(10.0, 10.0, 20.0, 20.0), BOUNDS, GestureMode::Move).unwrap();
        assert_eq!(gesture.update(5.0, 5.0), "translate(5px, 5px)");
        gesture.update(100.0, 50.0);

        let (position, size) = gesture.commit();
        // only the final cumulative delta counts: 100px of 1000px, 50px of 500px
        assert_eq!(position, Position { x: 20.0, y: 20.0 });
        assert_eq!(size, Size { width: 20.0, height: 20.0 });
    }

    #[test]
    fn test_move_is_clamped_to_container() {
        let mut gesture = DragGesture::begin(frame(70.0, 0.0, 20.0, 20.0), BOUNDS, GestureMode::Move).unwrap();
        gesture.update(500.0, -100.0);
        let (position, _) = gesture.commit();
        assert_eq!(position, Position { x: 80.0, y: 0.0 });
    }

    #[test]
    fn test_resize_converts_pixels_to_percent() {
        let mut gesture = DragGesture::begin(frame(0.0, 0.0, 40.0, 40.0), BOUNDS, GestureMode::Resize).unwrap();
        assert_eq!(gesture.update(0.0, 0.0), "scale(1, 1)");
        gesture.update(-100.0, 25.0);
        let (position, size) = gesture.commit();
        assert_eq!(position, Position { x: 0.0, y: 0.0 });
        assert_eq!(size, Size { width: 30.0, height: 45.0 });
    }

    #[test]
    fn test_resize_never_collapses() {
        let mut gesture = DragGesture::begin(frame(0.0, 0.0, 10.0, 10.0), BOUNDS, GestureMode::Resize).unwrap();
        gesture.update(-5000.0, -5000.0);
        let (_, size) = gesture.commit();
        assert_eq!(size, Size { width: 1.0, height: 1.0 });
    }

    #[test]
    fn test_zero_sized_container_is_rejected() {
        let bounds = ContainerBounds { width_px: 0.0, height_px: 100.0 };
        assert!(DragGesture::begin(frame(0.0, 0.0, 10.0, 10.0), bounds, GestureMode::Move).is_err());
    }
}
