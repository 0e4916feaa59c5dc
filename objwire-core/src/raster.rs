/// Bresenham line rasterization into a [`PixelBuffer`]
use std::iter::FusedIterator;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Placeholder color written by [`draw_line`]
pub const SENTINEL: [u32; 3] = [1, 2, 3];

/// Cells of the Bresenham approximation of a segment, both endpoints included.
///
/// Every call to `next` yields the current cell and then steps towards the
/// endpoint, so the Chebyshev distance to the endpoint shrinks by one per item
/// and the iterator always terminates after `max(dx, dy) + 1` cells.
/// The error term is kept in `i128`, so any pair of `i64` endpoints is valid.
#[derive(Debug, Clone)]
pub struct LinePixels {
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i128,
    dy: i128,
    sx: i64,
    sy: i64,
    err: i128,
    done: bool,
}

impl LinePixels {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let dx = (i128::from(x0) - i128::from(x1)).abs();
        let dy = (i128::from(y0) - i128::from(y1)).abs();
        Self {
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: x1.cmp(&x0) as i64,
            sy: y1.cmp(&y0) as i64,
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for LinePixels {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = (self.x, self.y);
        if current == (self.x1, self.y1) {
            self.done = true;
            return Some(current);
        }

        let err2 = 2 * self.err;
        if err2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if err2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }

    /// Exact whenever the remaining cell count fits in `usize`
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let span = |from: i64, to: i64| (i128::from(to) - i128::from(from)).unsigned_abs();
        let remaining = span(self.x, self.x1).max(span(self.y, self.y1)) + 1;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for LinePixels {}

/// Draw a line in the sentinel color, returning the number of cells written.
///
/// Both endpoints must lie inside the buffer; otherwise nothing is written.
pub fn draw_line(buffer: &mut PixelBuffer, x0: i64, y0: i64, x1: i64, y1: i64) -> Result<usize> {
    draw_line_with(buffer, (x0, y0), (x1, y1), &SENTINEL)
}

/// Draw a line in `color`. The buffer is a convex rectangle, so checking the
/// endpoints covers every cell in between.
pub fn draw_line_with(
    buffer: &mut PixelBuffer,
    p0: (i64, i64),
    p1: (i64, i64),
    color: &[u32],
) -> Result<usize> {
    for (x, y) in [p0, p1] {
        if !buffer.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
    }
    check_channels(buffer, color)?;

    let mut written = 0;
    for (x, y) in LinePixels::new(p0.0, p0.1, p1.0, p1.1) {
        buffer.set(x as usize, y as usize, color)?;
        written += 1;
    }
    Ok(written)
}

/// Draw the part of a line that falls inside the buffer.
///
/// The segment is first clipped to the buffer rectangle (Liang-Barsky), so the
/// work done is bounded by the buffer size however far away the endpoints are.
/// Endpoints inside the buffer are kept exactly; a boundary crossing is rounded
/// to the nearest cell, so the cells drawn can differ by one from those of the
/// unclipped line.
pub fn draw_line_clipped(
    buffer: &mut PixelBuffer,
    p0: (i64, i64),
    p1: (i64, i64),
    color: &[u32],
) -> Result<usize> {
    check_channels(buffer, color)?;

    let Some((p0, p1)) = clip_segment(p0, p1, buffer.width(), buffer.height()) else {
        return Ok(0);
    };

    let mut written = 0;
    for (x, y) in LinePixels::new(p0.0, p0.1, p1.0, p1.1) {
        if buffer.contains(x, y) {
            buffer.set(x as usize, y as usize, color)?;
            written += 1;
        }
    }
    Ok(written)
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    X(f64),
    Y(f64),
}

/// Clip a segment to `[0, width) x [0, height)`, `None` when it misses
fn clip_segment(
    p0: (i64, i64),
    p1: (i64, i64),
    width: usize,
    height: usize,
) -> Option<((i64, i64), (i64, i64))> {
    if width == 0 || height == 0 {
        return None;
    }
    let max_x = (width - 1) as f64;
    let max_y = (height - 1) as f64;
    let (x0, y0) = (p0.0 as f64, p0.1 as f64);
    let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);

    let mut enter: (f64, Option<Edge>) = (0.0, None);
    let mut leave: (f64, Option<Edge>) = (1.0, None);
    for (p, q, edge) in [
        (-dx, x0, Edge::X(0.0)),
        (dx, max_x - x0, Edge::X(max_x)),
        (-dy, y0, Edge::Y(0.0)),
        (dy, max_y - y0, Edge::Y(max_y)),
    ] {
        if p == 0.0 {
            // Parallel to this edge and outside it
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > enter.0 {
                enter = (t, Some(edge));
            }
        } else if t < leave.0 {
            leave = (t, Some(edge));
        }
    }
    if enter.0 > leave.0 {
        return None;
    }

    // The coordinate on the crossed edge is exact; only the other one is interpolated.
    let point = |(t, edge): (f64, Option<Edge>), endpoint: (i64, i64)| match edge {
        None => endpoint,
        Some(Edge::X(x)) => (x as i64, (y0 + t * dy).round().clamp(0.0, max_y) as i64),
        Some(Edge::Y(y)) => ((x0 + t * dx).round().clamp(0.0, max_x) as i64, y as i64),
    };
    Some((point(enter, p0), point(leave, p1)))
}

fn check_channels(buffer: &PixelBuffer, color: &[u32]) -> Result<()> {
    if color.len() != buffer.channels() {
        return Err(Error::ChannelMismatch {
            expected: buffer.channels(),
            actual: color.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(buffer: &PixelBuffer) -> Vec<(usize, usize)> {
        let mut cells: Vec<_> = buffer.lit_pixels().collect();
        cells.sort();
        cells
    }

    #[test]
    fn test_horizontal_line() {
        let mut buffer = PixelBuffer::new(8, 4, 3).unwrap();
        let written = draw_line(&mut buffer, 0, 0, 5, 0).unwrap();

        assert_eq!(written, 6);
        assert_eq!(lit(&buffer), (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());
        for x in 0..=5 {
            assert_eq!(buffer.get(x, 0).unwrap(), &SENTINEL);
        }
    }

    #[test]
    fn test_single_point() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        assert_eq!(draw_line(&mut buffer, 2, 2, 2, 2).unwrap(), 1);
        assert_eq!(lit(&buffer), vec![(2, 2)]);
        assert_eq!(LinePixels::new(2, 2, 2, 2).count(), 1);
    }

    #[test]
    fn test_steep_line_is_bounded() {
        let pixels: Vec<_> = LinePixels::new(0, 0, 3, 4).collect();
        assert_eq!(pixels.len(), 5);
        assert_eq!(pixels.first(), Some(&(0, 0)));
        assert_eq!(pixels.last(), Some(&(3, 4)));
        for pair in pixels.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            assert_eq!(b.1 - a.1, 1);
        }
    }

    #[test]
    fn test_all_octants_terminate() {
        let ends = [
            (7, 2),
            (2, 7),
            (-2, 7),
            (-7, 2),
            (-7, -2),
            (-2, -7),
            (2, -7),
            (7, -2),
            (0, -5),
            (-5, 0),
        ];
        for (x1, y1) in ends {
            let line = LinePixels::new(0, 0, x1, y1);
            let expected = x1.abs().max(y1.abs()) as usize + 1;
            assert_eq!(line.size_hint(), (expected, Some(expected)));

            let pixels: Vec<_> = line.collect();
            assert_eq!(pixels.len(), expected, "to ({}, {})", x1, y1);
            assert_eq!(pixels[0], (0, 0));
            assert_eq!(*pixels.last().unwrap(), (x1, y1));
        }
    }

    #[test]
    fn test_reverse_direction_covers_same_span() {
        let forward: Vec<_> = LinePixels::new(1, 1, 6, 3).collect();
        let backward: Vec<_> = LinePixels::new(6, 3, 1, 1).collect();
        assert_eq!(forward.len(), backward.len());
        assert_eq!(forward.first(), backward.last());
        assert_eq!(forward.last(), backward.first());
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut line = LinePixels::new(0, 0, 1, 0);
        assert_eq!(line.next(), Some((0, 0)));
        assert_eq!(line.next(), Some((1, 0)));
        assert_eq!(line.next(), None);
        assert_eq!(line.next(), None);
        assert_eq!(line.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_out_of_bounds_endpoint_writes_nothing() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        let err = draw_line(&mut buffer, 0, 0, 4, 0).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { x: 4, y: 0, .. }));
        assert!(matches!(draw_line(&mut buffer, -1, 0, 2, 2), Err(Error::OutOfBounds { .. })));
        assert_eq!(buffer.lit_pixels().count(), 0);
    }

    #[test]
    fn test_clipped_line() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        let written = draw_line_clipped(&mut buffer, (-2, 1), (6, 1), &[9, 9, 9]).unwrap();
        assert_eq!(written, 4);
        assert_eq!(lit(&buffer), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_clipped_line_with_extreme_endpoints() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        let written = draw_line_clipped(&mut buffer, (i64::MIN, 0), (0, 0), &SENTINEL).unwrap();
        assert_eq!(written, 1);
        assert_eq!(lit(&buffer), vec![(0, 0)]);

        buffer.clear();
        let far = -(1i64 << 62) - 5;
        let written = draw_line_clipped(&mut buffer, (far, 1), (3, 1), &SENTINEL).unwrap();
        assert_eq!(written, 4);
        assert_eq!(lit(&buffer), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);

        buffer.clear();
        let written =
            draw_line_clipped(&mut buffer, (i64::MIN, i64::MIN), (i64::MAX, i64::MAX), &SENTINEL)
                .unwrap();
        assert!(written >= 4);
        assert!(buffer.lit_pixels().all(|(x, y)| x < 4 && y < 4));
    }

    #[test]
    fn test_clipped_line_missing_buffer() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        assert_eq!(draw_line_clipped(&mut buffer, (-5, -1), (10, -1), &SENTINEL).unwrap(), 0);
        assert_eq!(draw_line_clipped(&mut buffer, (5, 0), (9, 9), &SENTINEL).unwrap(), 0);
        assert_eq!(buffer.lit_pixels().count(), 0);
    }

    #[test]
    fn test_extreme_span_does_not_overflow() {
        let mut line = LinePixels::new(i64::MIN, 0, i64::MAX, 0);
        assert_eq!(line.size_hint(), (usize::MAX, None));
        assert_eq!(line.next(), Some((i64::MIN, 0)));
        assert_eq!(line.next(), Some((i64::MIN + 1, 0)));

        let mut steep = LinePixels::new(0, i64::MAX, 0, i64::MIN);
        assert_eq!(steep.next(), Some((0, i64::MAX)));
        assert_eq!(steep.next(), Some((0, i64::MAX - 1)));
    }

    #[test]
    fn test_color_must_match_channels() {
        let mut buffer = PixelBuffer::new(4, 4, 1).unwrap();
        assert!(matches!(
            draw_line(&mut buffer, 0, 0, 1, 1),
            Err(Error::ChannelMismatch { expected: 1, actual: 3 })
        ));
        assert_eq!(draw_line_with(&mut buffer, (0, 0), (3, 3), &[255]).unwrap(), 4);
    }

    #[test]
    fn test_later_lines_overwrite() {
        let mut buffer = PixelBuffer::new(4, 4, 3).unwrap();
        draw_line(&mut buffer, 0, 0, 3, 0).unwrap();
        draw_line_with(&mut buffer, (1, 0), (1, 3), &[5, 5, 5]).unwrap();
        assert_eq!(buffer.get(1, 0).unwrap(), &[5, 5, 5]);
        assert_eq!(buffer.get(0, 0).unwrap(), &SENTINEL);
    }
}
