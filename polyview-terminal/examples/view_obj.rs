/// Example: Load and view a mesh interchange (.obj) file
///
/// Usage: cargo run --example view_obj -- path/to/file.obj

use std::env;
use std::fs;
use std::io;

use polyview_core::geometry::{Color, ScenePolygon};
use polyview_core::mesh_io;
use polyview_terminal::App;

const PALETTE: [Color; 3] = [Color::LIGHT_BLUE, Color::LIGHT_GREEN, Color::ORANGE];

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file>", args[0]);
        eprintln!("\nNo mesh file provided, using the hexahedron preset...");
        let mut app = App::new()?;
        return app.run();
    }

    let path = &args[1];
    println!("Loading mesh file: {}", path);

    let text = fs::read_to_string(path)?;
    let (vertices, faces) = mesh_io::parse_obj(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let mut polygons = Vec::with_capacity(faces.len());
    for (i, face) in faces.iter().enumerate() {
        if face.len() < 3 || face.iter().any(|&idx| idx >= vertices.len()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("face {} references missing vertices", i + 1),
            ));
        }
        polygons.push(ScenePolygon {
            points: face.iter().map(|&idx| vertices[idx]).collect(),
            color: PALETTE[i % PALETTE.len()],
        });
    }

    println!("Loaded {} vertices, {} faces", vertices.len(), polygons.len());

    let mut app = App::with_polygons(polygons)?;
    app.run()?;

    Ok(())
}
