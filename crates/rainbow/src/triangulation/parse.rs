//! Text input: one point line, then one triangulation per line.
//!
//! ```text
//! V (0, 0) (1, 0) (1, 1) (0, 1)
//! 0 1  1 2  2 3  3 0  0 2
//! 0 1  1 2  2 3  3 0  1 3
//! ```
//!
//! The `V` line lists x/y coordinates; every later non-empty line lists
//! point-index pairs, one pair per edge. Any run of characters other than
//! digits, `.` and `-` separates numbers. Lines starting with `#` are comments.

use std::fmt;

use super::geometry::{Point, Segment};
use super::Triangulation;

/// Parse failure with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    fn at(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl std::error::Error for ParseError {}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .filter(|t| !t.is_empty() && *t != "-" && *t != ".")
}

/// Parse the point set and its triangulations.
pub fn parse_triangulations(text: &str) -> Result<(Vec<Point>, Vec<Triangulation>), ParseError> {
    let mut points: Option<Vec<Point>> = None;
    let mut triangulations = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix('V') {
            if points.is_some() {
                return Err(ParseError::at(lineno, "second point line"));
            }
            let coords = tokens(rest)
                .map(|t| {
                    t.parse::<f64>()
                        .map_err(|_| ParseError::at(lineno, format!("bad coordinate {t:?}")))
                })
                .collect::<Result<Vec<f64>, _>>()?;
            if coords.len() % 2 != 0 {
                return Err(ParseError::at(lineno, "odd number of coordinates"));
            }
            points = Some(
                coords
                    .chunks_exact(2)
                    .map(|c| Point::new(c[0], c[1]))
                    .collect(),
            );
            continue;
        }

        let Some(pts) = points.as_ref() else {
            return Err(ParseError::at(lineno, "edges before the point line"));
        };
        let idxs = tokens(line)
            .map(|t| {
                t.parse::<usize>()
                    .map_err(|_| ParseError::at(lineno, format!("bad point index {t:?}")))
            })
            .collect::<Result<Vec<usize>, _>>()?;
        if idxs.len() % 2 != 0 {
            return Err(ParseError::at(lineno, "odd number of point indices"));
        }
        let mut edges = Vec::with_capacity(idxs.len() / 2);
        for pair in idxs.chunks_exact(2) {
            let (i, j) = (pair[0], pair[1]);
            if i >= pts.len() || j >= pts.len() {
                return Err(ParseError::at(
                    lineno,
                    format!("edge {i}-{j} references a missing point"),
                ));
            }
            if i == j {
                return Err(ParseError::at(lineno, format!("degenerate edge {i}-{j}")));
            }
            edges.push(Segment::new(i, j));
        }
        triangulations.push(Triangulation::from_edges(edges));
    }
    match points {
        Some(points) => Ok((points, triangulations)),
        None => Err(ParseError::at(text.lines().count().max(1), "missing point line")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
# unit square, both diagonals
V (0, 0) (1, 0) (1, 1) (0, 1)
0 1  1 2  2 3  3 0  0 2

0,1 1,2 2,3 3,0 1,3
";

    #[test]
    fn parses_points_and_edge_sets() {
        let (points, tris) = parse_triangulations(SQUARE).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[2], Point::new(1.0, 1.0));
        assert_eq!(tris.len(), 2);
        assert!(tris[0].contains(Segment::new(2, 0)));
        assert!(tris[1].contains(Segment::new(1, 3)));
        assert_eq!(tris[1].len(), 5);
    }

    #[test]
    fn negative_and_fractional_coordinates() {
        let (points, _) = parse_triangulations("V -1.5 2 0.25 -3").unwrap();
        assert_eq!(points, vec![Point::new(-1.5, 2.0), Point::new(0.25, -3.0)]);
    }

    #[test]
    fn malformed_input_reports_the_line() {
        let err = parse_triangulations("V 0 0 1\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_triangulations("0 1 1 2\nV 0 0 1 1\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_triangulations("V 0 0 1 0 0 1\n0 1 1 2 2\n").unwrap_err();
        assert_eq!((err.line, err.reason.as_str()), (2, "odd number of point indices"));

        let err = parse_triangulations("V 0 0 1 0 0 1\n\n0 1 1 7\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.to_string().starts_with("line 3:"));

        let err = parse_triangulations("V 0 0 1 0\n0 0\n").unwrap_err();
        assert!(err.reason.contains("degenerate"));

        assert!(parse_triangulations("V 1..2 0\n").is_err());
        assert!(parse_triangulations("# nothing\n").is_err());
        assert!(parse_triangulations("V 0 0\nV 1 1\n").is_err());
    }
}
