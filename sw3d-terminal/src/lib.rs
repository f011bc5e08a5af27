/// Terminal front-end for the SW3D pipeline
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use sw3d_core::{transform, Camera, FrameStats, Mesh, Pipeline};

pub mod renderer;

pub use renderer::TermCanvas;

const MOVE_STEP: f32 = 0.25;
const TURN_STEP: f32 = 0.05;

/// Interactive frame loop: samples input, updates the camera, runs the
/// pipeline into the ASCII canvas, and presents the result.
pub struct TerminalApp {
    mesh: Mesh,
    camera: Camera,
    pipeline: Pipeline,
    canvas: TermCanvas,
    spin: bool,
    theta: f32,
    stats: FrameStats,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, fov_deg: f32, spin: bool) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            camera: Camera::new(Point3::new(0.0, 0.0, -5.0)),
            pipeline: Pipeline::with_options(width as u32, height as u32, fov_deg, 0.1, 1000.0),
            canvas: TermCanvas::new(width as usize, height as usize),
            spin,
            theta: 0.0,
            stats: FrameStats::default(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        log::info!("entering raw mode, press Q to quit");
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        log::info!("terminal restored");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Input is sampled once, before the pipeline runs; the
            // camera is read-only for the rest of the frame.
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.update(target_frame_time.as_secs_f32());
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
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
                KeyCode::Char('w') => self.camera.advance(MOVE_STEP),
                KeyCode::Char('s') => self.camera.advance(-MOVE_STEP),
                KeyCode::Char('a') => self.camera.strafe(-MOVE_STEP),
                KeyCode::Char('d') => self.camera.strafe(MOVE_STEP),
                KeyCode::Char(' ') => self.camera.rise(MOVE_STEP),
                KeyCode::Char('c') => self.camera.rise(-MOVE_STEP),
                KeyCode::Left => self.camera.turn(-TURN_STEP, 0.0),
                KeyCode::Right => self.camera.turn(TURN_STEP, 0.0),
                KeyCode::Up => self.camera.turn(0.0, -TURN_STEP),
                KeyCode::Down => self.camera.turn(0.0, TURN_STEP),
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if self.spin {
            self.theta += 0.8 * dt;
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let world = transform::rotation_y(self.theta);

        self.canvas.clear();
        self.stats = self
            .pipeline
            .render(&self.mesh, &world, &self.camera, &mut self.canvas);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.canvas.draw(&mut stdout)?;

        // Status overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "SW3D | FPS: {:.1} | tris: {}/{} | WASD=Move Arrows=Look Space/C=Up/Down Q=Quit",
                self.fps, self.stats.drawn, self.stats.mesh_triangles
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
