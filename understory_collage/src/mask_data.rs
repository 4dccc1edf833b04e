// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persisted mask records and their translation to typed descriptors.
//!
//! A persisted mask is an open-ended `{type, payload}` bag so keys this
//! crate does not know about survive a load/save cycle. The typed
//! [`MaskDescriptor`] is parsed from the bag on demand.

use kurbo::{Cap, Join, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use understory_mask::{
    MaskDescriptor, MaskShape, MaskStroke, PolygonUnits, ShapeMask, TriangleOrientation,
};

/// Kind tag of a persisted mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    /// Geometric shape, resolvable into clip geometry.
    Shape,
    /// Application-defined mask.
    Custom,
    /// Soft gradient mask.
    Gradient,
}

/// A mask as stored on a photo layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskData {
    /// Mask kind.
    #[serde(rename = "type")]
    pub kind: MaskType,
    /// Kind-specific keys.
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl MaskData {
    /// Encodes a typed shape mask as a persisted record.
    #[must_use]
    pub fn from_shape(mask: &ShapeMask) -> Self {
        let mut payload = Map::new();
        match &mask.shape {
            MaskShape::Rect => {
                payload.insert("kind".into(), "rect".into());
            }
            MaskShape::Triangle { orientation, inset } => {
                payload.insert("kind".into(), "triangle".into());
                payload.insert("orientation".into(), orientation_name(*orientation).into());
                payload.insert("inset".into(), (*inset).into());
            }
            MaskShape::Polygon { points, units } => {
                payload.insert("kind".into(), "polygon".into());
                let points = points
                    .iter()
                    .map(|p| {
                        let mut point = Map::new();
                        point.insert("x".into(), p.x.into());
                        point.insert("y".into(), p.y.into());
                        Value::Object(point)
                    })
                    .collect();
                payload.insert("points".into(), Value::Array(points));
                if let Some(units) = units {
                    let name = match units {
                        PolygonUnits::Normalized => "normalized",
                        PolygonUnits::Absolute => "absolute",
                    };
                    payload.insert("units".into(), name.into());
                }
            }
        }
        if let Some(stroke) = &mask.stroke {
            payload.insert("strokeWidth".into(), stroke.width.into());
            if let Some(color) = &stroke.color {
                payload.insert("strokeColor".into(), color.clone().into());
            }
            if let Some(join) = stroke.join {
                payload.insert("strokeJoin".into(), join_name(join).into());
            }
            if let Some(cap) = stroke.cap {
                payload.insert("strokeCap".into(), cap_name(cap).into());
            }
        }
        Self {
            kind: MaskType::Shape,
            payload,
        }
    }

    /// Parses the record into a typed descriptor.
    ///
    /// Optional keys with the wrong type are ignored one at a time. Returns
    /// `None` only when polygon points are malformed (for example a
    /// non-numeric coordinate); callers treat that like "no mask".
    #[must_use]
    pub fn descriptor(&self) -> Option<MaskDescriptor> {
        match self.kind {
            MaskType::Custom => Some(MaskDescriptor::Custom),
            MaskType::Gradient => Some(MaskDescriptor::Gradient),
            MaskType::Shape => parse_shape(&self.payload).map(MaskDescriptor::Shape),
        }
    }
}

impl From<ShapeMask> for MaskData {
    fn from(mask: ShapeMask) -> Self {
        Self::from_shape(&mask)
    }
}

#[derive(Debug, Deserialize)]
struct PayloadPoint {
    x: f64,
    y: f64,
}

fn string_field<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

fn number_field(payload: &Map<String, Value>, key: &str) -> Option<f64> {
    payload
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}

// Each optional key is read on its own; a badly typed value reads as absent.
fn parse_shape(payload: &Map<String, Value>) -> Option<ShapeMask> {
    // Older records name the kind `shape`.
    let kind = string_field(payload, "kind").or_else(|| string_field(payload, "shape"));
    let mut mask = match kind {
        Some("rect") => ShapeMask::rect(),
        Some("triangle") => ShapeMask::triangle(
            parse_orientation(string_field(payload, "orientation")),
            number_field(payload, "inset").unwrap_or(0.0),
        ),
        _ => {
            let points = match payload.get("points") {
                None | Some(Value::Null) => Vec::new(),
                Some(value) => match Vec::<PayloadPoint>::deserialize(value) {
                    Ok(points) => points,
                    Err(err) => {
                        tracing::debug!(%err, "unparseable polygon mask points");
                        return None;
                    }
                },
            };
            let units = match string_field(payload, "units") {
                Some("normalized") => Some(PolygonUnits::Normalized),
                Some("absolute") => Some(PolygonUnits::Absolute),
                _ => None,
            };
            ShapeMask::polygon(points.into_iter().map(|p| Point::new(p.x, p.y)), units)
        }
    };

    if let Some(width) = number_field(payload, "strokeWidth").filter(|w| *w > 0.0) {
        mask = mask.with_stroke(MaskStroke {
            width,
            color: string_field(payload, "strokeColor").map(String::from),
            join: Some(parse_join(string_field(payload, "strokeJoin"))),
            cap: Some(parse_cap(string_field(payload, "strokeCap"))),
        });
    }
    Some(mask)
}

fn parse_orientation(name: Option<&str>) -> TriangleOrientation {
    match name {
        Some("down") => TriangleOrientation::Down,
        Some("left") => TriangleOrientation::Left,
        Some("right") => TriangleOrientation::Right,
        _ => TriangleOrientation::Up,
    }
}

fn orientation_name(orientation: TriangleOrientation) -> &'static str {
    match orientation {
        TriangleOrientation::Up => "up",
        TriangleOrientation::Down => "down",
        TriangleOrientation::Left => "left",
        TriangleOrientation::Right => "right",
    }
}

fn parse_join(name: Option<&str>) -> Join {
    match name {
        Some("round") => Join::Round,
        Some("bevel") => Join::Bevel,
        _ => Join::Miter,
    }
}

fn join_name(join: Join) -> &'static str {
    match join {
        Join::Round => "round",
        Join::Bevel => "bevel",
        Join::Miter => "miter",
    }
}

fn parse_cap(name: Option<&str>) -> Cap {
    match name {
        Some("round") => Cap::Round,
        Some("square") => Cap::Square,
        _ => Cap::Butt,
    }
}

fn cap_name(cap: Cap) -> &'static str {
    match cap {
        Cap::Round => "round",
        Cap::Square => "square",
        Cap::Butt => "butt",
    }
}
