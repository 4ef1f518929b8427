/// Interactive terminal viewer for polyhedral solids
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use polyview_core::geometry::demo_scene;
use polyview_core::transform::{rotate_xy, rotate_xyz};
use polyview_core::{mesh_io, raster};
use polyview_core::{Camera, FrameBuffer, Mesh, ProjectionMode, RotationState, ScenePolygon, Solid};

pub mod renderer;

pub use renderer::TermCanvas;

const EDGE_CHAR: char = '*';
const VERTEX_CHAR: char = 'o';
const OVERLAY_CHAR: char = '.';
const EXPORT_PATH: &str = "export.obj";

/// Which pipeline draws the frame: projected edges or z-buffer filled faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Solid,
}

impl RenderMode {
    fn name(self) -> &'static str {
        match self {
            RenderMode::Wireframe => "Wireframe",
            RenderMode::Solid => "Solid",
        }
    }
}

/// What is on screen: a preset solid, the composite demo scene, or polygons
/// imported from an interchange file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Preset(Solid),
    DemoScene,
    Imported,
}

impl Selection {
    fn name(self) -> &'static str {
        match self {
            Selection::Preset(solid) => solid.name(),
            Selection::DemoScene => "Demo scene",
            Selection::Imported => "Imported mesh",
        }
    }
}

/// Main application struct for the terminal viewer.
///
/// Owns the accumulated rotation, the projection context and the per-frame
/// buffers; every redraw recomputes the whole frame from those.
pub struct App {
    selection: Selection,
    mesh: Option<Mesh>,
    polygons: Vec<ScenePolygon>,
    rotation: RotationState,
    camera: Camera,
    mode: RenderMode,
    canvas: TermCanvas,
    frame: FrameBuffer,
    running: bool,
    status: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl App {
    pub fn new() -> io::Result<Self> {
        let mut app = Self::empty()?;
        app.select(Selection::Preset(Solid::Hexahedron));
        Ok(app)
    }

    /// Start on externally supplied polygons (e.g. a parsed interchange
    /// file) in solid mode.
    pub fn with_polygons(polygons: Vec<ScenePolygon>) -> io::Result<Self> {
        let mut app = Self::empty()?;
        app.selection = Selection::Imported;
        app.polygons = polygons;
        Ok(app)
    }

    fn empty() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = Camera::new(width as u32, height as u32);
        camera.scale = height as f32 / 3.0;

        Ok(Self {
            selection: Selection::DemoScene,
            mesh: None,
            polygons: Vec::new(),
            rotation: RotationState::new(0.3, 0.3, 0.0),
            camera,
            mode: RenderMode::Solid,
            canvas: TermCanvas::new(width as usize, height as usize),
            frame: FrameBuffer::new(width as usize, height as usize),
            running: true,
            status: String::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Resolve a selection into mesh data once, not per frame.
    pub fn select(&mut self, selection: Selection) {
        match selection {
            Selection::Preset(solid) => {
                let mesh = solid.mesh();
                self.polygons = mesh.polygons();
                self.mesh = Some(mesh);
            }
            Selection::DemoScene => {
                self.mesh = None;
                self.polygons = demo_scene();
            }
            // Polygon data was supplied at construction
            Selection::Imported => {}
        }
        self.selection = selection;
        self.status.clear();
    }

    /// Accumulate rotation deltas (radians) into the persistent state.
    pub fn rotate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation.rotate(dx, dy, dz);
    }

    pub fn toggle_projection(&mut self) {
        self.camera.mode = match self.camera.mode {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        };
    }

    pub fn toggle_render_mode(&mut self) {
        self.mode = match self.mode {
            RenderMode::Wireframe => RenderMode::Solid,
            RenderMode::Solid => RenderMode::Wireframe,
        };
    }

    pub fn adjust_zoom(&mut self, delta: f32) {
        self.camera.zoom = (self.camera.zoom + delta).clamp(0.5, 2.0);
    }

    /// Write the current polygons to the interchange format. I/O failure is
    /// the one error shown to the user.
    pub fn export(&mut self) {
        match mesh_io::export_obj_to_path(&self.polygons, EXPORT_PATH) {
            Ok(()) => {
                self.status = format!("Saved {}", EXPORT_PATH);
            }
            Err(e) => {
                log::error!("export failed: {e}");
                self.status = format!("Export failed: {e}");
            }
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') | KeyCode::Up => {
                    self.rotate_by(0.1, 0.0, 0.0);
                }
                KeyCode::Char('s') | KeyCode::Down => {
                    self.rotate_by(-0.1, 0.0, 0.0);
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.rotate_by(0.0, -0.1, 0.0);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.rotate_by(0.0, 0.1, 0.0);
                }
                KeyCode::Char('e') => {
                    self.rotate_by(0.0, 0.0, 0.1);
                }
                KeyCode::Char('r') => {
                    self.rotate_by(0.0, 0.0, -0.1);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.adjust_zoom(0.1);
                }
                KeyCode::Char('-') => {
                    self.adjust_zoom(-0.1);
                }
                KeyCode::Char('p') => {
                    self.toggle_projection();
                }
                KeyCode::Char('m') => {
                    self.toggle_render_mode();
                }
                KeyCode::Char('1') => {
                    self.select(Selection::Preset(Solid::Hexahedron));
                }
                KeyCode::Char('2') => {
                    self.select(Selection::Preset(Solid::Dodecahedron));
                }
                KeyCode::Char('3') => {
                    self.select(Selection::DemoScene);
                }
                KeyCode::Char('o') => {
                    self.export();
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        self.canvas.clear();

        match self.mode {
            RenderMode::Wireframe => self.render_wireframe(),
            RenderMode::Solid => self.render_solid(),
        }

        let mut stdout = stdout();
        self.canvas.present(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "Polyview | {} | {} | {} | FPS: {:.1} | 1/2/3 select  arrows rotate  +/- zoom  p proj  m mode  o export  q quit  {}",
                self.selection.name(),
                self.camera.mode.name(),
                self.mode.name(),
                self.fps,
                self.status,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    /// Edge-and-vertex view: every vertex through the X→Y→Z pipeline, each
    /// edge drawn once.
    fn render_wireframe(&mut self) {
        if let Some(mesh) = &self.mesh {
            let projected: Vec<(f32, f32)> = mesh
                .vertices
                .iter()
                .map(|v| self.camera.project(&rotate_xyz(v, &self.rotation)))
                .collect();

            for &(a, b) in &mesh.edges {
                let (x0, y0) = projected[a];
                let (x1, y1) = projected[b];
                self.canvas.draw_line(
                    x0 as i32,
                    y0 as i32,
                    x1 as i32,
                    y1 as i32,
                    EDGE_CHAR,
                    TermColor::Blue,
                );
            }
            for &(x, y) in &projected {
                self.canvas.plot(x as i32, y as i32, VERTEX_CHAR, TermColor::Red);
            }
        } else {
            // Literal-point polygons have no shared edge list; outline each
            // boundary loop in its own color
            for polygon in &self.polygons {
                let projected: Vec<(f32, f32)> = polygon
                    .points
                    .iter()
                    .map(|p| self.camera.project(&rotate_xyz(p, &self.rotation)))
                    .collect();
                for i in 0..projected.len() {
                    let (x0, y0) = projected[i];
                    let (x1, y1) = projected[(i + 1) % projected.len()];
                    self.canvas.draw_line(
                        x0 as i32,
                        y0 as i32,
                        x1 as i32,
                        y1 as i32,
                        EDGE_CHAR,
                        TermColor::Rgb {
                            r: polygon.color.r,
                            g: polygon.color.g,
                            b: polygon.color.b,
                        },
                    );
                }
            }
        }
    }

    /// Z-buffer view: axes and ground grid first, filled faces on top.
    fn render_solid(&mut self) {
        self.draw_grid();
        self.draw_axes();

        self.frame.clear();
        raster::render(&self.polygons, &self.rotation, &self.camera, &mut self.frame);
        self.canvas.blit(&self.frame);
    }

    fn project_overlay(&self, p: Point3<f32>) -> (i32, i32) {
        let (rotated, _) = rotate_xy(&p, &self.rotation);
        let (x, y) = self.camera.project(&rotated);
        (x as i32, y as i32)
    }

    fn draw_axes(&mut self) {
        let (ox, oy) = self.project_overlay(Point3::origin());
        let axes = [
            (Point3::new(5.0, 0.0, 0.0), TermColor::Red, 'X'),
            (Point3::new(0.0, 5.0, 0.0), TermColor::Green, 'Y'),
            (Point3::new(0.0, 0.0, 5.0), TermColor::Blue, 'Z'),
        ];
        for (end, color, label) in axes {
            let (x, y) = self.project_overlay(end);
            self.canvas.draw_line(ox, oy, x, y, OVERLAY_CHAR, color);
            self.canvas.plot(x, y, label, color);
        }
    }

    fn draw_grid(&mut self) {
        let size = 5;
        for i in -size..=size {
            let (x0, y0) = self.project_overlay(Point3::new(-size as f32, 0.0, i as f32));
            let (x1, y1) = self.project_overlay(Point3::new(size as f32, 0.0, i as f32));
            self.canvas
                .draw_line(x0, y0, x1, y1, OVERLAY_CHAR, TermColor::DarkGrey);

            let (x0, y0) = self.project_overlay(Point3::new(i as f32, 0.0, -size as f32));
            let (x1, y1) = self.project_overlay(Point3::new(i as f32, 0.0, size as f32));
            self.canvas
                .draw_line(x0, y0, x1, y1, OVERLAY_CHAR, TermColor::DarkGrey);
        }
    }
}
