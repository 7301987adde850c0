use crate::core::config::EngineConfig;
use crate::core::geometry::{BBox, Point};
use crate::core::model::MarkerPosition;

/// Parameters for mapping percent positions into a view's drawing box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayCalibration {
    pub padding: f32,
    /// Fraction of the way each point moves toward the box center.
    pub centering_correction: f32,
}

impl OverlayCalibration {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            padding: config.overlay_padding,
            centering_correction: config.centering_correction,
        }
    }
}

/// `pixel = origin + pad + pct/100 * (size - 2*pad)`, then pulled toward the
/// box center by `centering_correction`. Padding is capped at half the box so
/// the result stays inside for every position in `[0, 100]`.
pub fn project(position: MarkerPosition, frame: &BBox, calibration: OverlayCalibration) -> Point {
    let pad_x = calibration.padding.clamp(0.0, frame.width() * 0.5);
    let pad_y = calibration.padding.clamp(0.0, frame.height() * 0.5);
    let px = frame.x0 + pad_x + position.x / 100.0 * (frame.width() - 2.0 * pad_x);
    let py = frame.y0 + pad_y + position.y / 100.0 * (frame.height() - 2.0 * pad_y);

    let (cx, cy) = frame.center();
    let k = calibration.centering_correction;
    Point::new(px - k * (px - cx), py - k * (py - cy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CALIBRATION: OverlayCalibration = OverlayCalibration {
        padding: 10.0,
        centering_correction: 0.15,
    };

    #[test]
    fn pins_the_centering_correction() {
        let frame = BBox::from_origin(100.0, 200.0, 220.0, 120.0);
        // Top-left corner: pixel (110, 210), center (210, 260).
        let corner = project(MarkerPosition { x: 0.0, y: 0.0 }, &frame, CALIBRATION);
        assert!((corner.x - 125.0).abs() < 1e-3);
        assert!((corner.y - 217.5).abs() < 1e-3);

        let center = project(MarkerPosition { x: 50.0, y: 50.0 }, &frame, CALIBRATION);
        assert_eq!(center, Point::new(210.0, 260.0));
    }

    #[test]
    fn zero_correction_is_plain_linear_mapping() {
        let frame = BBox::from_origin(0.0, 0.0, 120.0, 120.0);
        let calibration = OverlayCalibration {
            padding: 10.0,
            centering_correction: 0.0,
        };
        let point = project(MarkerPosition { x: 100.0, y: 25.0 }, &frame, calibration);
        assert_eq!(point, Point::new(110.0, 35.0));
    }

    #[test]
    fn every_position_lands_inside_the_frame() {
        let frames = [
            BBox::from_origin(36.0, 120.0, 250.0, 180.0),
            BBox::from_origin(0.0, 0.0, 15.0, 8.0),
            BBox::from_origin(300.0, 500.0, 1.0, 400.0),
        ];
        for frame in frames {
            for xi in 0..=20 {
                for yi in 0..=20 {
                    let position = MarkerPosition {
                        x: xi as f32 * 5.0,
                        y: yi as f32 * 5.0,
                    };
                    let point = project(position, &frame, CALIBRATION);
                    assert!(frame.contains(point), "{position:?} -> {point:?} outside {frame:?}");
                }
            }
        }
    }
}
