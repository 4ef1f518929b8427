/// Polyhedron presets and scene geometry
use std::collections::BTreeSet;

use nalgebra::Point3;

/// Flat fill color of a face, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const LIGHT_BLUE: Color = Color::new(0xad, 0xd8, 0xe6);
    pub const LIGHT_GREEN: Color = Color::new(0x90, 0xee, 0x90);
    pub const ORANGE: Color = Color::new(0xff, 0xa5, 0x00);
}

/// Cycled over preset faces so adjacent faces read differently when filled.
const FACE_PALETTE: [Color; 6] = [
    Color::new(0xad, 0xd8, 0xe6),
    Color::new(0x90, 0xee, 0x90),
    Color::new(0xff, 0xa5, 0x00),
    Color::new(0xdd, 0xa0, 0xdd),
    Color::new(0xf0, 0xe6, 0x8c),
    Color::new(0x87, 0xce, 0xfa),
];

/// An ordered boundary loop of vertex indices with its fill color.
///
/// Winding only matters for fan triangulation; visibility is resolved by the
/// depth buffer, not by face orientation.
#[derive(Debug, Clone)]
pub struct Face {
    pub indices: Vec<usize>,
    pub color: Color,
}

impl Face {
    pub fn new(indices: Vec<usize>, color: Color) -> Self {
        Self { indices, color }
    }
}

/// A polygon given as literal 3D points, the form the rasterizer and the
/// mesh exporter consume.
#[derive(Debug, Clone)]
pub struct ScenePolygon {
    pub points: Vec<Point3<f32>>,
    pub color: Color,
}

/// An indexed polyhedron: vertices plus edges and faces referencing them.
///
/// Presets are trusted constants; indices are not validated at runtime.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub edges: Vec<(usize, usize)>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Resolve face indices into literal polygon loops.
    pub fn polygons(&self) -> Vec<ScenePolygon> {
        self.faces
            .iter()
            .map(|face| ScenePolygon {
                points: face.indices.iter().map(|&i| self.vertices[i]).collect(),
                color: face.color,
            })
            .collect()
    }
}

/// The selectable polyhedra. Resolved to a `Mesh` once at selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    Hexahedron,
    Dodecahedron,
}

impl Solid {
    pub fn name(self) -> &'static str {
        match self {
            Solid::Hexahedron => "Hexahedron",
            Solid::Dodecahedron => "Dodecahedron",
        }
    }

    pub fn mesh(self) -> Mesh {
        let mesh = match self {
            Solid::Hexahedron => hexahedron(),
            Solid::Dodecahedron => dodecahedron(),
        };
        log::info!(
            "loaded {}: {} vertices, {} edges, {} faces",
            self.name(),
            mesh.vertices.len(),
            mesh.edges.len(),
            mesh.faces.len()
        );
        mesh
    }
}

/// Scale a point onto the unit sphere. A zero-length input maps to the
/// origin rather than failing.
pub fn normalize(p: Point3<f32>) -> Point3<f32> {
    let len = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
    if len == 0.0 {
        Point3::origin()
    } else {
        Point3::new(p.x / len, p.y / len, p.z / len)
    }
}

/// Extract the unique undirected edge set from face boundary loops.
///
/// Every consecutive index pair is normalized to sorted order and
/// deduplicated, so an edge shared by two faces appears exactly once.
pub fn derive_edges(faces: &[Face]) -> Vec<(usize, usize)> {
    let mut edges = BTreeSet::new();
    for face in faces {
        let n = face.indices.len();
        for i in 0..n {
            let a = face.indices[i];
            let b = face.indices[(i + 1) % n];
            edges.insert(if a < b { (a, b) } else { (b, a) });
        }
    }
    edges.into_iter().collect()
}

fn palette_faces(loops: &[&[usize]]) -> Vec<Face> {
    loops
        .iter()
        .enumerate()
        .map(|(i, indices)| Face::new(indices.to_vec(), FACE_PALETTE[i % FACE_PALETTE.len()]))
        .collect()
}

/// Cube with literal vertices, edges and quad faces.
fn hexahedron() -> Mesh {
    let vertices = vec![
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, 1.0),
    ];

    let edges = vec![
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    let faces = palette_faces(&[
        &[0, 1, 2, 3],
        &[4, 5, 6, 7],
        &[0, 1, 5, 4],
        &[2, 3, 7, 6],
        &[0, 3, 7, 4],
        &[1, 2, 6, 5],
    ]);

    Mesh {
        vertices,
        edges,
        faces,
    }
}

/// Regular dodecahedron built from the golden ratio: the eight cube corners
/// plus twelve points with coordinates (0, ±1/φ, ±φ) permuted over the axes,
/// all normalized onto the unit sphere. Edges are derived from the pentagon
/// faces rather than listed.
fn dodecahedron() -> Mesh {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;

    let mut vertices = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                vertices.push(normalize(Point3::new(x, y, z)));
            }
        }
    }
    let extra = [
        (0.0, inv, phi),
        (0.0, inv, -phi),
        (0.0, -inv, phi),
        (0.0, -inv, -phi),
        (inv, phi, 0.0),
        (inv, -phi, 0.0),
        (-inv, phi, 0.0),
        (-inv, -phi, 0.0),
        (phi, 0.0, inv),
        (phi, 0.0, -inv),
        (-phi, 0.0, inv),
        (-phi, 0.0, -inv),
    ];
    for (x, y, z) in extra {
        vertices.push(normalize(Point3::new(x, y, z)));
    }

    let faces = palette_faces(&[
        &[0, 1, 9, 8, 4],
        &[1, 0, 3, 11, 9],
        &[0, 4, 6, 2, 3],
        &[4, 8, 10, 5, 6],
        &[8, 9, 13, 12, 10],
        &[9, 11, 19, 13, 8],
        &[11, 3, 2, 14, 19],
        &[2, 6, 5, 7, 14],
        &[5, 10, 12, 15, 7],
        &[12, 13, 19, 17, 15],
        &[14, 7, 15, 17, 18],
        &[19, 14, 18, 16, 17],
    ]);

    let edges = derive_edges(&faces);

    Mesh {
        vertices,
        edges,
        faces,
    }
}

/// The composite demo scene: a translated cube, a square pyramid and one
/// arbitrary quad, as literal colored polygons.
pub fn demo_scene() -> Vec<ScenePolygon> {
    let cube_v = [
        Point3::new(-4.0, -1.0, -1.0),
        Point3::new(-2.0, -1.0, -1.0),
        Point3::new(-2.0, 1.0, -1.0),
        Point3::new(-4.0, 1.0, -1.0),
        Point3::new(-4.0, -1.0, 1.0),
        Point3::new(-2.0, -1.0, 1.0),
        Point3::new(-2.0, 1.0, 1.0),
        Point3::new(-4.0, 1.0, 1.0),
    ];
    let cube_faces: [&[usize]; 6] = [
        &[0, 1, 2, 3],
        &[4, 5, 6, 7],
        &[0, 1, 5, 4],
        &[2, 3, 7, 6],
        &[0, 3, 7, 4],
        &[1, 2, 6, 5],
    ];
    let mut polygons: Vec<ScenePolygon> = cube_faces
        .iter()
        .map(|face| ScenePolygon {
            points: face.iter().map(|&i| cube_v[i]).collect(),
            color: Color::LIGHT_BLUE,
        })
        .collect();

    let p = [
        Point3::new(0.0, 2.0, 0.0),
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ];
    let pyramid_faces: [&[usize]; 5] = [
        &[0, 1, 2],
        &[0, 2, 3],
        &[0, 3, 4],
        &[0, 4, 1],
        &[1, 2, 3, 4],
    ];
    polygons.extend(pyramid_faces.iter().map(|face| ScenePolygon {
        points: face.iter().map(|&i| p[i]).collect(),
        color: Color::LIGHT_GREEN,
    }));

    polygons.push(ScenePolygon {
        points: vec![
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(4.0, 1.5, 0.0),
            Point3::new(5.0, 0.0, 1.0),
            Point3::new(4.0, -1.0, 0.0),
        ],
        color: Color::ORANGE,
    });

    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hexahedron_literals() {
        let mesh = Solid::Hexahedron.mesh();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.edges.len(), 12);
        assert_eq!(mesh.faces.len(), 6);
        assert_eq!(mesh.vertices[0], Point3::new(-1.0, -1.0, -1.0));
        assert!(mesh.faces.iter().all(|f| f.indices.len() == 4));
    }

    #[test]
    fn test_dodecahedron_counts() {
        let mesh = Solid::Dodecahedron.mesh();
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.faces.len(), 12);
        assert!(mesh.faces.iter().all(|f| f.indices.len() == 5));
        // Derived edge set: 30 unique undirected edges, Euler V - E + F = 2
        assert_eq!(mesh.edges.len(), 30);
        assert_eq!(
            mesh.vertices.len() as i32 - mesh.edges.len() as i32 + mesh.faces.len() as i32,
            2
        );
    }

    #[test]
    fn test_dodecahedron_vertices_on_unit_sphere() {
        let mesh = Solid::Dodecahedron.mesh();
        for v in &mesh.vertices {
            let norm = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_derived_edges_are_unique_and_sorted() {
        let mesh = Solid::Dodecahedron.mesh();
        for &(a, b) in &mesh.edges {
            assert!(a < b);
            assert!(a < mesh.vertices.len() && b < mesh.vertices.len());
        }
        let mut deduped = mesh.edges.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), mesh.edges.len());
    }

    #[test]
    fn test_normalize_zero_maps_to_origin() {
        assert_eq!(normalize(Point3::new(0.0, 0.0, 0.0)), Point3::origin());
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(Point3::new(3.0, -4.0, 12.0));
        let norm = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mesh_polygons_resolve_indices() {
        let mesh = Solid::Hexahedron.mesh();
        let polygons = mesh.polygons();
        assert_eq!(polygons.len(), 6);
        assert_eq!(polygons[0].points[0], mesh.vertices[0]);
        assert_eq!(polygons[0].points.len(), 4);
    }

    #[test]
    fn test_demo_scene_composition() {
        let scene = demo_scene();
        // 6 cube faces, 5 pyramid faces, 1 arbitrary quad
        assert_eq!(scene.len(), 12);
        assert!(scene.iter().all(|p| p.points.len() >= 3));
        let quad = scene.last().unwrap();
        assert_eq!(quad.color, Color::ORANGE);
        assert_eq!(quad.points.len(), 4);
    }
}
