/// Text mesh-interchange (Wavefront OBJ subset) export and import
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{digit1, multispace0, multispace1},
    combinator::map_res,
    multi::{many0, many1},
    number::complete::float,
    sequence::preceded,
    IResult,
};
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::geometry::ScenePolygon;

/// The one failure surface of the whole system: interchange I/O. Rendering
/// itself never errors.
#[derive(Debug, Error)]
pub enum MeshIoError {
    #[error("failed to write mesh file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse mesh file: {0}")]
    Parse(String),
}

/// Exact-value vertex identity for dedup. Coincident but numerically
/// distinct vertices intentionally stay separate; preset duplicates always
/// alias the same literal.
type VertexKey = [OrderedFloat<f32>; 3];

fn vertex_key(p: &Point3<f32>) -> VertexKey {
    [OrderedFloat(p.x), OrderedFloat(p.y), OrderedFloat(p.z)]
}

/// Serialize polygons to the interchange text format.
///
/// One `v x y z` line per unique vertex in first-seen order, a blank
/// separator line, then one `f i1 i2 ...` line per polygon with 1-based
/// indices in the original winding. No normals, texture coordinates or
/// materials.
pub fn export_obj(polygons: &[ScenePolygon]) -> String {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut index_of: HashMap<VertexKey, usize> = HashMap::new();
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        let mut face = Vec::with_capacity(polygon.points.len());
        for point in &polygon.points {
            let index = *index_of.entry(vertex_key(point)).or_insert_with(|| {
                vertices.push(*point);
                vertices.len() - 1
            });
            face.push(index);
        }
        faces.push(face);
    }

    let mut out = String::new();
    for v in &vertices {
        out.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }
    out.push('\n');
    for face in &faces {
        out.push('f');
        for index in face {
            out.push_str(&format!(" {}", index + 1));
        }
        out.push('\n');
    }
    out
}

/// Export to a file. The only condition in the system reported to a human.
pub fn export_obj_to_path<P: AsRef<Path>>(
    polygons: &[ScenePolygon],
    path: P,
) -> Result<(), MeshIoError> {
    let text = export_obj(polygons);
    fs::write(path.as_ref(), text)?;
    log::info!(
        "exported {} faces to {}",
        polygons.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Parse the interchange format back into vertices and 0-based face index
/// lists.
pub fn parse_obj(input: &str) -> Result<(Vec<Point3<f32>>, Vec<Vec<usize>>), MeshIoError> {
    match parse_obj_impl(input) {
        Ok((rest, mesh)) if rest.trim().is_empty() => Ok(mesh),
        Ok((rest, _)) => Err(MeshIoError::Parse(format!(
            "unexpected trailing input: {:?}",
            rest.chars().take(32).collect::<String>()
        ))),
        Err(e) => Err(MeshIoError::Parse(format!("{:?}", e))),
    }
}

fn parse_obj_impl(input: &str) -> IResult<&str, (Vec<Point3<f32>>, Vec<Vec<usize>>)> {
    let (input, vertices) = many0(parse_vertex_line)(input)?;
    let (input, faces) = many0(parse_face_line)(input)?;
    Ok((input, (vertices, faces)))
}

fn parse_vertex_line(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("v"))(input)?;
    let (input, _) = multispace1(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_face_line(input: &str) -> IResult<&str, Vec<usize>> {
    let (input, _) = preceded(multispace0, tag("f"))(input)?;
    let (input, indices) = many1(preceded(multispace1, parse_index))(input)?;
    // 1-based on disk
    Ok((input, indices.into_iter().map(|i| i - 1).collect()))
}

fn parse_index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| {
        s.parse::<usize>()
            .ok()
            .filter(|&i| i > 0)
            .ok_or("face indices are 1-based")
    })(input)
}
