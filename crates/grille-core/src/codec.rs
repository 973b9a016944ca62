//! JSON structure file: encode a scene to real-world coordinates and back.
//!
//! ```json
//! {
//!     "nodes": [ { "id": 1, "type": "simple", "coordinates": { "x": 0.0, "y": 0.0 } } ],
//!     "lines": [ { "id": 1, "start_node": { "x": 0.0, "y": 0.0 },
//!                  "end_node": { "x": 1.0, "y": 0.0 }, "length": 1.0 } ]
//! }
//! ```
//!
//! Ids in the file are 1-based positions in creation order. Coordinates and
//! lengths are rounded to two decimals. Forces are not part of the format.
//!
//! Conversion uses origin and scale only; stored canvas positions are
//! already zoom-independent, so the file does not depend on the zoom level
//! at save time.

use crate::error::CodecError;
use crate::grid::GridModel;
use crate::model::{NodeType, Scene};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: u32,
    pub start_node: Coordinates,
    pub end_node: Coordinates,
    pub length: f64,
}

/// The on-disk document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub nodes: Vec<NodeRecord>,
    pub lines: Vec<LineRecord>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<Point> for Coordinates {
    fn from(p: Point) -> Self {
        Self {
            x: round2(p.x),
            y: round2(p.y),
        }
    }
}

impl From<Coordinates> for Point {
    fn from(c: Coordinates) -> Self {
        Point::new(c.x, c.y)
    }
}

impl SceneFile {
    /// Capture `scene` in real-world coordinates.
    pub fn encode(scene: &Scene, grid: &GridModel) -> Self {
        let nodes = scene
            .nodes()
            .into_iter()
            .zip(1..)
            .map(|(node, id)| NodeRecord {
                id,
                node_type: node.node_type,
                coordinates: grid.to_real(node.position).into(),
            })
            .collect();

        let lines = scene
            .lines()
            .into_iter()
            .filter_map(|line| scene.line_endpoints(line.id))
            .zip(1..)
            .map(|((start, end), id)| {
                let start = grid.to_real(start);
                let end = grid.to_real(end);
                LineRecord {
                    id,
                    start_node: start.into(),
                    end_node: end.into(),
                    length: round2(start.distance(end)),
                }
            })
            .collect();

        Self { nodes, lines }
    }

    /// Rebuild a scene. Each line endpoint must land on a node.
    ///
    /// Nothing is committed anywhere: on error the caller's state is
    /// untouched.
    pub fn decode(&self, grid: &GridModel) -> Result<Scene, CodecError> {
        self.decode_into(grid, Scene::new())
    }

    /// Like [`decode`](Self::decode), but builds on `scene`, which should be
    /// empty. Use [`Scene::successor`] to keep ids clear of those already
    /// handed out by a live scene.
    pub fn decode_into(&self, grid: &GridModel, mut scene: Scene) -> Result<Scene, CodecError> {
        for record in &self.nodes {
            let position = grid.to_screen(record.coordinates.into());
            scene.add_node(position, record.node_type);
        }

        for record in &self.lines {
            let start = scene.node_at(grid.to_screen(record.start_node.into()));
            let end = scene.node_at(grid.to_screen(record.end_node.into()));
            let (Some(a), Some(b)) = (start, end) else {
                return Err(CodecError::UnresolvedLine { line: record.id });
            };
            scene
                .add_line(a, b)
                .ok_or(CodecError::UnresolvedLine { line: record.id })?;
        }
        Ok(scene)
    }

    /// Pretty JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String, CodecError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| CodecError::io(path, e))
    }

    /// Like [`write`](Self::write), creating missing parent directories.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CodecError::io(parent, e))?;
        }
        self.write(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_uses_real_world_coordinates() {
        let grid = GridModel::new();
        let mut scene = Scene::new();
        let a = scene.add_node(grid.to_screen(Point::new(0.0, 0.0)), NodeType::Fixed);
        let b = scene.add_node(grid.to_screen(Point::new(3.0, 4.0)), NodeType::Hinge);
        scene.add_line(a, b).unwrap();

        let file = SceneFile::encode(&scene, &grid);
        assert_eq!(file.nodes[1].id, 2);
        assert_eq!(file.nodes[1].coordinates, Coordinates { x: 3.0, y: 4.0 });
        assert_eq!(file.lines[0].length, 5.0);
        assert_eq!(file.lines[0].end_node, Coordinates { x: 3.0, y: 4.0 });
    }

    #[test]
    fn encode_rounds_to_two_decimals() {
        let grid = GridModel::new();
        let mut scene = Scene::new();
        scene.add_node(Point::new(100.0 + 123.456, 700.0 - 78.9), NodeType::Simple);
        let file = SceneFile::encode(&scene, &grid);
        assert_eq!(file.nodes[0].coordinates, Coordinates { x: 1.23, y: 0.79 });
    }

    #[test]
    fn json_field_names_match_format() {
        let file = SceneFile {
            nodes: vec![NodeRecord {
                id: 1,
                node_type: NodeType::Elastic,
                coordinates: Coordinates { x: 1.5, y: -2.0 },
            }],
            lines: vec![],
        };
        let json = file.to_json().unwrap();
        assert!(json.contains("\"type\": \"elastic\""));
        assert!(json.contains("\n    \"nodes\""));
        assert_eq!(SceneFile::from_json(&json).unwrap(), file);
    }

    #[test]
    fn decode_rejects_dangling_line() {
        let grid = GridModel::new();
        let file = SceneFile {
            nodes: vec![NodeRecord {
                id: 1,
                node_type: NodeType::Simple,
                coordinates: Coordinates { x: 0.0, y: 0.0 },
            }],
            lines: vec![LineRecord {
                id: 7,
                start_node: Coordinates { x: 0.0, y: 0.0 },
                end_node: Coordinates { x: 9.0, y: 9.0 },
                length: 12.73,
            }],
        };
        assert!(matches!(
            file.decode(&grid),
            Err(CodecError::UnresolvedLine { line: 7 })
        ));
    }

    #[test]
    fn unknown_node_type_is_a_json_error() {
        let text = r#"{"nodes":[{"id":1,"type":"beam","coordinates":{"x":0,"y":0}}],"lines":[]}"#;
        assert!(matches!(
            SceneFile::from_json(text),
            Err(CodecError::Json(_))
        ));
    }
}
