//! Plain-text interchange format for triangulations.
//!
//! The triple `{points, triangles, halfedges}` fully determines a mesh, so
//! that is what the format stores:
//!
//! ```text
//! dualmesh 1
//! <n>
//! <x> <y>          n point lines
//! <m>
//! <a> <b> <c>      m triangle lines (vertex indices)
//! <ha> <hb> <hc>   m half-edge lines (-1 for a boundary side)
//! ```
//!
//! Coordinates are written with Rust's shortest round-trip float formatting,
//! so save/load reproduces them bit-exactly. The convex hull is not stored;
//! [`load`] reconstructs it by chaining the boundary half-edges. Degenerate
//! (triangle-free) triangulations therefore reload with an empty hull.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use nalgebra::Point2;

use crate::delaunay::{next_edge, Triangulation, EMPTY};
use crate::error::{MeshError, Result};

const MAGIC: &str = "dualmesh 1";

/// Write a triangulation and its points to `path`.
pub fn save<P: AsRef<Path>>(
    triangulation: &Triangulation,
    points: &[Point2<f64>],
    path: P,
) -> Result<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);

    writeln!(w, "{}", MAGIC)?;
    writeln!(w, "{}", points.len())?;
    for p in points {
        writeln!(w, "{} {}", p.x, p.y)?;
    }

    let m = triangulation.len();
    writeln!(w, "{}", m)?;
    for t in 0..m {
        writeln!(
            w,
            "{} {} {}",
            triangulation.triangles[3 * t],
            triangulation.triangles[3 * t + 1],
            triangulation.triangles[3 * t + 2]
        )?;
    }
    for t in 0..m {
        let h = |e: usize| -> i64 {
            match triangulation.halfedges[e] {
                EMPTY => -1,
                v => v as i64,
            }
        };
        writeln!(w, "{} {} {}", h(3 * t), h(3 * t + 1), h(3 * t + 2))?;
    }

    w.flush()?;
    debug!("saved {} points, {} triangles to {:?}", points.len(), m, path.as_ref());
    Ok(())
}

/// Read a triangulation and its points from `path`.
///
/// The hull is rebuilt from the boundary half-edge cycle, starting at the
/// hull point with the smallest index.
///
/// # Errors
///
/// [`MeshError::Io`] on read failure, [`MeshError::Parse`] on a malformed
/// file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Triangulation, Vec<Point2<f64>>)> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut lines = LineReader::new(reader);

    let magic = lines.next_line()?;
    if magic.trim() != MAGIC {
        return Err(lines.error(format!("expected header {:?}", MAGIC)));
    }

    let n: usize = lines.parse_single("point count")?;
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let [x, y] = lines.parse_fields::<f64, 2>("point coordinates")?;
        points.push(Point2::new(x, y));
    }

    let m: usize = lines.parse_single("triangle count")?;
    let mut triangles = Vec::with_capacity(3 * m);
    for _ in 0..m {
        let [a, b, c] = lines.parse_fields::<usize, 3>("triangle vertices")?;
        for v in [a, b, c] {
            if v >= n {
                return Err(lines.error(format!("vertex index {} out of {} points", v, n)));
            }
            triangles.push(v);
        }
    }

    let mut halfedges = Vec::with_capacity(3 * m);
    for _ in 0..m {
        let fields = lines.parse_fields::<i64, 3>("half-edge indices")?;
        for h in fields {
            let e = match h {
                -1 => EMPTY,
                v if v >= 0 && (v as usize) < 3 * m => v as usize,
                v => {
                    return Err(lines.error(format!("half-edge index {} out of {} sides", v, 3 * m)))
                }
            };
            halfedges.push(e);
        }
    }

    let hull = rebuild_hull(&triangles, &halfedges, n);
    debug!(
        "loaded {} points, {} triangles from {:?}",
        n,
        m,
        path.as_ref()
    );

    Ok((
        Triangulation {
            triangles,
            halfedges,
            hull,
        },
        points,
    ))
}

/// Chain the boundary half-edges back into the counter-clockwise hull cycle.
fn rebuild_hull(triangles: &[usize], halfedges: &[usize], n: usize) -> Vec<usize> {
    // Outgoing boundary edge per hull point.
    let mut out = vec![EMPTY; n];
    let mut first = EMPTY;
    for (e, &h) in halfedges.iter().enumerate() {
        if h == EMPTY {
            let start = triangles[e];
            out[start] = e;
            if first == EMPTY || start < first {
                first = start;
            }
        }
    }
    if first == EMPTY {
        return Vec::new();
    }

    let mut hull = Vec::new();
    let mut p = first;
    loop {
        hull.push(p);
        p = triangles[next_edge(out[p])];
        if p == first {
            break;
        }
    }
    hull
}

struct LineReader<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn error(&self, message: String) -> MeshError {
        MeshError::Parse {
            line: self.line,
            message,
        }
    }

    fn next_line(&mut self) -> Result<String> {
        let mut buf = String::new();
        self.line += 1;
        if self.reader.read_line(&mut buf)? == 0 {
            return Err(self.error("unexpected end of file".into()));
        }
        Ok(buf)
    }

    fn parse_single<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let line = self.next_line()?;
        line.trim()
            .parse()
            .map_err(|_| self.error(format!("invalid {}: {:?}", what, line.trim())))
    }

    fn parse_fields<T: std::str::FromStr + Copy + Default, const K: usize>(
        &mut self,
        what: &str,
    ) -> Result<[T; K]> {
        let line = self.next_line()?;
        let mut fields = [T::default(); K];
        let mut parts = line.split_whitespace();
        for slot in fields.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| self.error(format!("too few fields for {}", what)))?;
            *slot = part
                .parse()
                .map_err(|_| self.error(format!("invalid {}: {:?}", what, part)))?;
        }
        if parts.next().is_some() {
            return Err(self.error(format!("too many fields for {}", what)));
        }
        Ok(fields)
    }
}
