use crate::math::TOLERANCE;

use super::miter::{WallCorners, MIN_WALL_LENGTH};

/// An opening's extent along a wall, as fractions of the wall length in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningSpan {
    pub start: f64,
    pub end: f64,
}

impl OpeningSpan {
    /// Creates a span, ordering and clamping the bounds to `[0, 1]`.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b).clamp(0.0, 1.0),
            end: a.max(b).clamp(0.0, 1.0),
        }
    }

    /// Converts an opening centred at normalised `position` with `width` millimetres
    /// on a wall of `wall_length` millimetres. Returns `None` for a degenerate wall.
    #[must_use]
    pub fn from_opening(position: f64, width: f64, wall_length: f64) -> Option<Self> {
        if wall_length < MIN_WALL_LENGTH {
            return None;
        }
        let half = width * 0.5 / wall_length;
        Some(Self::new(position - half, position + half))
    }
}

/// Sorts spans by start and merges overlapping or touching ones.
#[must_use]
pub fn merge_spans(spans: &[OpeningSpan]) -> Vec<OpeningSpan> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<OpeningSpan> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Splits a wall face into the solid pieces left between its openings.
///
/// Pieces are ordered from the wall's start to its end. A wall without
/// openings yields its whole face; a fully covered wall yields nothing.
#[must_use]
pub fn split_for_openings(corners: &WallCorners, spans: &[OpeningSpan]) -> Vec<WallCorners> {
    let mut pieces = Vec::new();
    let mut cursor = 0.0;
    for span in merge_spans(spans) {
        if span.start > cursor + TOLERANCE {
            pieces.push(corners.section(cursor, span.start));
        }
        cursor = f64::max(cursor, span.end);
    }
    if cursor < 1.0 - TOLERANCE {
        pieces.push(corners.section(cursor, 1.0));
    }
    pieces
}

/// Returns one face per merged opening span: the cut-outs the renderer fills with doors or windows.
#[must_use]
pub fn opening_faces(corners: &WallCorners, spans: &[OpeningSpan]) -> Vec<WallCorners> {
    merge_spans(spans)
        .into_iter()
        .filter(|s| s.end - s.start > TOLERANCE)
        .map(|s| corners.section(s.start, s.end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    /// Unmitered face of a 4000 mm wall along +X, 200 mm thick.
    fn face() -> WallCorners {
        WallCorners {
            start_left: Point2::new(0.0, 100.0),
            start_right: Point2::new(0.0, -100.0),
            end_left: Point2::new(4000.0, 100.0),
            end_right: Point2::new(4000.0, -100.0),
        }
    }

    fn span(position: f64, width: f64) -> OpeningSpan {
        OpeningSpan::from_opening(position, width, 4000.0).unwrap_or(OpeningSpan::new(0.0, 0.0))
    }

    #[test]
    fn no_openings_keeps_whole_face() {
        let pieces = split_for_openings(&face(), &[]);
        assert_eq!(pieces, vec![face()]);
    }

    #[test]
    fn two_separate_openings_give_three_pieces() {
        let pieces = split_for_openings(&face(), &[span(0.75, 800.0), span(0.25, 800.0)]);
        assert_eq!(pieces.len(), 3);
        assert_abs_diff_eq!(pieces[0].end_left.x, 600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pieces[1].start_left.x, 1400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pieces[1].end_right.x, 2600.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pieces[2].start_right.x, 3400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pieces[2].end_left.x, 4000.0, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_openings_merge() {
        let spans = [span(0.4, 800.0), span(0.5, 800.0)];
        let merged = merge_spans(&spans);
        assert_eq!(merged.len(), 1);
        assert_abs_diff_eq!(merged[0].start, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(merged[0].end, 0.6, epsilon = 1e-12);
        assert_eq!(split_for_openings(&face(), &spans).len(), 2);
    }

    #[test]
    fn touching_openings_merge() {
        let merged = merge_spans(&[OpeningSpan::new(0.2, 0.4), OpeningSpan::new(0.4, 0.6)]);
        assert_eq!(merged, vec![OpeningSpan::new(0.2, 0.6)]);
    }

    #[test]
    fn full_width_opening_leaves_nothing() {
        assert!(split_for_openings(&face(), &[span(0.5, 4000.0)]).is_empty());
        assert!(split_for_openings(&face(), &[span(0.5, 6000.0)]).is_empty());
    }

    #[test]
    fn opening_at_wall_start_leaves_one_piece() {
        let pieces = split_for_openings(&face(), &[span(0.1, 800.0)]);
        assert_eq!(pieces.len(), 1);
        assert_abs_diff_eq!(pieces[0].start_left.x, 800.0, epsilon = 1e-9);
    }

    #[test]
    fn opening_faces_match_spans() {
        let cutouts = opening_faces(&face(), &[span(0.25, 800.0), span(0.75, 800.0)]);
        assert_eq!(cutouts.len(), 2);
        assert_abs_diff_eq!(cutouts[0].area(), 800.0 * 200.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_wall_has_no_span() {
        assert!(OpeningSpan::from_opening(0.5, 900.0, 0.0).is_none());
    }
}
