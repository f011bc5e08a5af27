/// SW3D terminal demo
///
/// Renders an OBJ mesh (or a built-in cube) with the software pipeline.
/// Controls:
///   - WASD: move, Space/C: up/down
///   - Arrow keys: look around
///   - Q/ESC: quit
use std::io;
use std::path::PathBuf;

use clap::Parser;
use sw3d_core::Mesh;
use sw3d_terminal::TerminalApp;

#[derive(Parser)]
#[command(about = "Software 3D renderer for the terminal")]
struct Args {
    /// OBJ file to render (`v`/`f` records); defaults to a unit cube
    mesh: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Spin the model slowly around the Y axis
    #[arg(long)]
    spin: bool,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mesh = match &args.mesh {
        Some(path) => match sw3d_core::load_obj(path) {
            Ok(mesh) => mesh,
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        },
        None => Mesh::cube(1.0),
    };
    log::info!("mesh ready: {} triangles", mesh.triangles.len());

    let mut app = TerminalApp::new(mesh, args.fov, args.spin)?;
    app.run()
}
