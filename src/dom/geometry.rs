// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounding boxes computed from SVG geometry attributes.
//!
//! Text is never measured (that needs font metrics we do not have); a group's box is the union
//! of its measurable children. Elements that yield no box are treated by callers as
//! non-intersecting.

use super::{Document, Element, ElementId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut iter = points.into_iter().filter(|(x, y)| x.is_finite() && y.is_finite());
        let (x0, y0) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BBox::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    /// Inclusive overlap test: touching edges count, so a connector ending exactly on a node
    /// border still links it.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    fn is_degenerate(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    fn transformed(&self, t: &Affine) -> BBox {
        let corners = [
            t.apply(self.x, self.y),
            t.apply(self.right(), self.y),
            t.apply(self.x, self.bottom()),
            t.apply(self.right(), self.bottom()),
        ];
        BBox::from_points(corners).unwrap_or(*self)
    }
}

/// 2D affine transform `[a b c d e f]` as used by SVG `matrix(...)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine([f64; 6]);

impl Affine {
    const IDENTITY: Affine = Affine([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// `self * other`: apply `other` first, then `self`.
    fn then_inner(&self, other: &Affine) -> Affine {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Affine([
            a1 * a2 + c1 * b2,
            b1 * a2 + d1 * b2,
            a1 * c2 + c1 * d2,
            b1 * c2 + d1 * d2,
            a1 * e2 + c1 * f2 + e1,
            b1 * e2 + d1 * f2 + f1,
        ])
    }
}

fn parse_numbers(input: &str) -> Vec<f64> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() || b == b'-' || b == b'+' || b == b'.' {
            let start = i;
            let mut seen_dot = b == b'.';
            let mut seen_exp = false;
            i += 1;
            while i < bytes.len() {
                let c = bytes[i];
                if c.is_ascii_digit() {
                    i += 1;
                } else if c == b'.' && !seen_dot && !seen_exp {
                    seen_dot = true;
                    i += 1;
                } else if (c == b'e' || c == b'E') && !seen_exp {
                    seen_exp = true;
                    i += 1;
                    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
                        i += 1;
                    }
                } else {
                    break;
                }
            }
            if let Ok(value) = input[start..i].parse::<f64>() {
                out.push(value);
            }
        } else {
            i += 1;
        }
    }
    out
}

fn parse_transform(value: &str) -> Affine {
    let mut result = Affine::IDENTITY;
    let mut rest = value;
    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim_matches(|c: char| c.is_whitespace() || c == ',');
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let args = parse_numbers(&rest[open + 1..open + close]);
        let step = match (name, args.as_slice()) {
            ("translate", [tx]) => Affine([1.0, 0.0, 0.0, 1.0, *tx, 0.0]),
            ("translate", [tx, ty, ..]) => Affine([1.0, 0.0, 0.0, 1.0, *tx, *ty]),
            ("scale", [s]) => Affine([*s, 0.0, 0.0, *s, 0.0, 0.0]),
            ("scale", [sx, sy, ..]) => Affine([*sx, 0.0, 0.0, *sy, 0.0, 0.0]),
            ("matrix", [a, b, c, d, e, f]) => Affine([*a, *b, *c, *d, *e, *f]),
            ("rotate", [deg, rest @ ..]) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                let rotation = Affine([cos, sin, -sin, cos, 0.0, 0.0]);
                match rest {
                    [cx, cy, ..] => Affine([1.0, 0.0, 0.0, 1.0, *cx, *cy])
                        .then_inner(&rotation)
                        .then_inner(&Affine([1.0, 0.0, 0.0, 1.0, -cx, -cy])),
                    _ => rotation,
                }
            }
            _ => Affine::IDENTITY,
        };
        result = result.then_inner(&step);
        rest = &rest[open + close + 1..];
    }
    result
}

fn element_transform(element: &Element) -> Affine {
    element.attr("transform").map(parse_transform).unwrap_or(Affine::IDENTITY)
}

fn num_attr(element: &Element, name: &str) -> Option<f64> {
    let raw = element.attr(name)?.trim();
    let raw = raw.strip_suffix("px").unwrap_or(raw);
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn path_points(d: &str) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let (mut cx, mut cy) = (0.0_f64, 0.0_f64);
    let (mut sx, mut sy) = (0.0_f64, 0.0_f64);

    let mut segments = Vec::new();
    let mut current: Option<(char, usize)> = None;
    for (index, ch) in d.char_indices() {
        if ch.is_ascii_alphabetic() && ch != 'e' && ch != 'E' {
            if let Some((cmd, start)) = current.take() {
                segments.push((cmd, &d[start..index]));
            }
            current = Some((ch, index + ch.len_utf8()));
        }
    }
    if let Some((cmd, start)) = current {
        segments.push((cmd, &d[start..]));
    }

    for (cmd, args) in segments {
        let nums = parse_numbers(args);
        let relative = cmd.is_ascii_lowercase();
        let stride = match cmd.to_ascii_uppercase() {
            'M' | 'L' | 'T' => 2,
            'H' | 'V' => 1,
            'C' => 6,
            'S' | 'Q' => 4,
            'A' => 7,
            _ => 0,
        };

        if stride == 0 {
            cx = sx;
            cy = sy;
            continue;
        }

        for (chunk_index, chunk) in nums.chunks_exact(stride).enumerate() {
            let (bx, by) = if relative { (cx, cy) } else { (0.0, 0.0) };
            match cmd.to_ascii_uppercase() {
                'H' => {
                    cx = bx + chunk[0];
                    points.push((cx, cy));
                }
                'V' => {
                    cy = by + chunk[0];
                    points.push((cx, cy));
                }
                'A' => {
                    cx = bx + chunk[5];
                    cy = by + chunk[6];
                    points.push((cx, cy));
                }
                _ => {
                    for pair in chunk.chunks_exact(2) {
                        points.push((bx + pair[0], by + pair[1]));
                    }
                    cx = bx + chunk[stride - 2];
                    cy = by + chunk[stride - 1];
                    if cmd.to_ascii_uppercase() == 'M' && chunk_index == 0 {
                        sx = cx;
                        sy = cy;
                    }
                }
            }
        }
    }
    points
}

fn shape_bbox(element: &Element) -> Option<BBox> {
    match element.tag() {
        "rect" | "image" | "foreignObject" | "use" => {
            let width = num_attr(element, "width")?;
            let height = num_attr(element, "height")?;
            Some(BBox::new(
                num_attr(element, "x").unwrap_or(0.0),
                num_attr(element, "y").unwrap_or(0.0),
                width,
                height,
            ))
        }
        "circle" => {
            let r = num_attr(element, "r")?;
            let cx = num_attr(element, "cx").unwrap_or(0.0);
            let cy = num_attr(element, "cy").unwrap_or(0.0);
            Some(BBox::new(cx - r, cy - r, 2.0 * r, 2.0 * r))
        }
        "ellipse" => {
            let rx = num_attr(element, "rx")?;
            let ry = num_attr(element, "ry")?;
            let cx = num_attr(element, "cx").unwrap_or(0.0);
            let cy = num_attr(element, "cy").unwrap_or(0.0);
            Some(BBox::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
        }
        "line" => BBox::from_points([
            (num_attr(element, "x1").unwrap_or(0.0), num_attr(element, "y1").unwrap_or(0.0)),
            (num_attr(element, "x2").unwrap_or(0.0), num_attr(element, "y2").unwrap_or(0.0)),
        ]),
        "polygon" | "polyline" => {
            let nums = parse_numbers(element.attr("points")?);
            BBox::from_points(nums.chunks_exact(2).map(|pair| (pair[0], pair[1])))
        }
        "path" => BBox::from_points(path_points(element.attr("d")?)),
        _ => None,
    }
}

/// Containers whose content is never painted where it is declared.
fn is_non_rendered(tag: &str) -> bool {
    matches!(
        tag,
        "defs" | "marker" | "clipPath" | "mask" | "pattern" | "symbol" | "style" | "title" | "desc"
    )
}

/// Box of `id` in its parent's coordinate system (own transform applied).
fn box_in_parent(doc: &Document, id: ElementId) -> Option<BBox> {
    let element = doc.get(id)?;
    if is_non_rendered(element.tag()) {
        return None;
    }
    // foreignObject content is laid out by the HTML engine; the object's own box is all we know.
    let local = match shape_bbox(element) {
        Some(bbox) => Some(bbox),
        None if element.tag() == "foreignObject" => None,
        None => element
            .children()
            .iter()
            .filter_map(|child| box_in_parent(doc, *child))
            .reduce(|acc, bbox| acc.union(&bbox)),
    }?;
    Some(local.transformed(&element_transform(element)))
}

pub(super) fn element_bbox(doc: &Document, id: ElementId) -> Option<BBox> {
    let mut bbox = box_in_parent(doc, id)?;
    for ancestor in doc.ancestors(id) {
        let element = doc.get(ancestor)?;
        bbox = bbox.transformed(&element_transform(element));
    }
    (!bbox.is_degenerate()).then_some(bbox)
}

#[cfg(test)]
mod tests {
    use super::{parse_numbers, path_points, BBox};
    use crate::dom::Document;

    #[test]
    fn numbers_parse_compact_path_syntax() {
        assert_eq!(parse_numbers("M10-5.5.5e1,2"), vec![10.0, -5.5, 5.0, 2.0]);
    }

    #[test]
    fn relative_path_commands_track_the_current_point() {
        let points = path_points("M10,10 l5,0 v5 h-5 z");
        assert_eq!(points, vec![(10.0, 10.0), (15.0, 10.0), (15.0, 15.0), (10.0, 15.0)]);
    }

    #[test]
    fn translated_groups_accumulate() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g transform="translate(100, 50)">
    <g id="n" transform="translate(10,10)"><rect x="-5" y="-5" width="10" height="10"/><text>x</text></g>
  </g>
</svg>"#,
        )
        .expect("parse");
        let node = doc.select("#n").expect("select")[0];
        assert_eq!(doc.bbox(node), Some(BBox::new(105.0, 55.0, 10.0, 10.0)));
    }

    #[test]
    fn unmeasurable_elements_have_no_box() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="empty"/><text id="t">hi</text><circle id="dot" r="0"/></svg>"#,
        )
        .expect("parse");
        for id in ["#empty", "#t", "#dot"] {
            let el = doc.select(id).expect("select")[0];
            assert_eq!(doc.bbox(el), None, "{id}");
        }
    }

    #[test]
    fn touching_boxes_intersect() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(10.0, 0.0, 5.0, 5.0);
        let c = BBox::new(10.5, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
