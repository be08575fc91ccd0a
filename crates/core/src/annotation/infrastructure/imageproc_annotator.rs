use ab_glyph::{FontArc, PxScale};
use image::{ImageBuffer, Rgb};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::annotation::domain::frame_annotator::{AnnotatedFace, FrameAnnotator};
use crate::shared::frame::Frame;

const LABEL_FONT_SIZE: f32 = 20.0;

/// Gap between the label's bottom edge and the top of the box.
const LABEL_OFFSET: i32 = 10;

/// Draws two-pixel verdict rectangles with their MATCH / NO MATCH labels.
pub struct ImageprocAnnotator {
    font: FontArc,
    scale: PxScale,
}

impl ImageprocAnnotator {
    pub fn new(font: FontArc) -> Self {
        Self {
            font,
            scale: PxScale::from(LABEL_FONT_SIZE),
        }
    }
}

impl FrameAnnotator for ImageprocAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        faces: &[AnnotatedFace],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if faces.is_empty() {
            return Ok(());
        }
        if frame.channels() != 3 {
            return Err(format!("Cannot annotate {}-channel frame", frame.channels()).into());
        }

        let (fw, fh) = (frame.width(), frame.height());
        let mut canvas = ImageBuffer::<Rgb<u8>, &mut [u8]>::from_raw(fw, fh, frame.data_mut())
            .ok_or("Frame buffer does not match its dimensions")?;

        for face in faces {
            let region = &face.region;
            if region.is_empty() {
                continue;
            }
            let color = Rgb(face.verdict.color());
            let (w, h) = (region.width as u32, region.height as u32);

            draw_hollow_rect_mut(&mut canvas, Rect::at(region.x, region.y).of_size(w, h), color);
            if w > 2 && h > 2 {
                let inner = Rect::at(region.x + 1, region.y + 1).of_size(w - 2, h - 2);
                draw_hollow_rect_mut(&mut canvas, inner, color);
            }

            let label = face.verdict.label();
            let (text_w, text_h) = text_size(self.scale, &self.font, label);
            let (x, y) = label_origin(region.x, region.y, text_w, text_h, fw, fh);
            draw_text_mut(&mut canvas, color, x, y, self.scale, &self.font, label);
        }
        Ok(())
    }
}

/// Top-left corner for a label sitting above the box, clamped into the frame.
fn label_origin(
    box_x: i32,
    box_y: i32,
    text_w: u32,
    text_h: u32,
    frame_w: u32,
    frame_h: u32,
) -> (i32, i32) {
    let max_x = (frame_w as i32 - text_w as i32).max(0);
    let max_y = (frame_h as i32 - text_h as i32).max(0);
    let x = box_x.clamp(0, max_x);
    let y = (box_y - LABEL_OFFSET - text_h as i32).clamp(0, max_y);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::infrastructure::font_resolver::embedded_font;
    use crate::matching::domain::face_verdict::FaceVerdict;
    use crate::shared::region::Region;
    use rstest::rstest;

    fn annotator() -> ImageprocAnnotator {
        ImageprocAnnotator::new(embedded_font().unwrap())
    }

    fn black_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![0u8; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn face(x: i32, y: i32, w: i32, h: i32, verdict: FaceVerdict) -> AnnotatedFace {
        AnnotatedFace {
            region: Region {
                x,
                y,
                width: w,
                height: h,
                confidence: 0.9,
            },
            verdict,
        }
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let arr = frame.as_ndarray();
        [arr[[y, x, 0]], arr[[y, x, 1]], arr[[y, x, 2]]]
    }

    #[rstest]
    #[case::matched(FaceVerdict::Match, [0, 255, 0])]
    #[case::unmatched(FaceVerdict::NoMatch, [255, 0, 0])]
    fn test_draws_two_pixel_rect_in_verdict_color(
        #[case] verdict: FaceVerdict,
        #[case] expected: [u8; 3],
    ) {
        let mut frame = black_frame(100, 100);
        annotator()
            .annotate(&mut frame, &[face(20, 40, 30, 30, verdict)])
            .unwrap();

        assert_eq!(pixel(&frame, 20, 40), expected);
        assert_eq!(pixel(&frame, 21, 41), expected);
        assert_eq!(pixel(&frame, 49, 69), expected);
        // Interior untouched
        assert_eq!(pixel(&frame, 35, 55), [0, 0, 0]);
        assert_eq!(pixel(&frame, 22, 42), [0, 0, 0]);
    }

    #[test]
    fn test_no_faces_leaves_frame_untouched() {
        let mut frame = black_frame(10, 10);
        annotator()
            .annotate(&mut frame, &[])
            .unwrap();
        assert!(frame.data().iter().all(|v| *v == 0));
    }

    #[test]
    fn test_rejects_non_rgb_frame() {
        let mut frame = Frame::new(vec![0u8; 16], 4, 4, 1, 0);
        let result = annotator()
            .annotate(&mut frame, &[face(0, 0, 2, 2, FaceVerdict::Match)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_box_partially_outside_frame_is_clipped() {
        let mut frame = black_frame(50, 50);
        annotator()
            .annotate(&mut frame, &[face(40, 40, 30, 30, FaceVerdict::NoMatch)])
            .unwrap();
        assert_eq!(pixel(&frame, 40, 45), [255, 0, 0]);
    }

    #[rstest]
    #[case::matched(FaceVerdict::Match, 1)]
    #[case::unmatched(FaceVerdict::NoMatch, 0)]
    fn test_label_drawn_above_box_in_verdict_color(
        #[case] verdict: FaceVerdict,
        #[case] channel: usize,
    ) {
        let mut frame = black_frame(200, 120);
        annotator()
            .annotate(&mut frame, &[face(40, 60, 80, 50, verdict)])
            .unwrap();

        // Everything above the box top (y = 60) is label.
        let arr = frame.as_ndarray();
        let label_pixels = (0..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| arr[[y, x, channel]] > 0)
            .count();
        assert!(label_pixels > 0);
        let off_channel = (0..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| arr[[y, x, 2]] > 0)
            .count();
        assert_eq!(off_channel, 0);
    }

    #[test]
    fn test_label_origin_sits_above_box() {
        assert_eq!(label_origin(40, 100, 60, 20, 640, 480), (40, 70));
    }

    #[rstest]
    #[case::top_edge(10, 5, (10, 0))]
    #[case::right_edge(620, 100, (580, 70))]
    #[case::left_of_frame(-15, 100, (0, 70))]
    fn test_label_origin_clamped(
        #[case] box_x: i32,
        #[case] box_y: i32,
        #[case] expected: (i32, i32),
    ) {
        assert_eq!(label_origin(box_x, box_y, 60, 20, 640, 480), expected);
    }
}
