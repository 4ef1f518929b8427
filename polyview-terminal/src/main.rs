/// Polyview Terminal - Interactive polyhedron viewer
///
/// Controls:
///   - WASD / Arrow Keys: Rotate the solid
///   - E/R: Roll rotation
///   - +/-: Zoom
///   - P: Toggle orthographic / perspective projection
///   - M: Toggle wireframe / solid rendering
///   - 1/2/3: Hexahedron / Dodecahedron / demo scene
///   - O: Export the current mesh to export.obj
///   - Q/ESC: Quit

use std::io;
use polyview_terminal::App;

fn main() -> io::Result<()> {
    env_logger::init();

    let mut app = App::new()?;
    app.run()?;

    Ok(())
}
