//! Interactive viewer.
//!
//! Opens an SDL2 window and renders one of a handful of scenes. W/S (or
//! Up/Down) move the camera closer or further, A/D (or Left/Right) orbit it
//! around the target, Escape or Space quits. Set `RUST_LOG` to see
//! per-frame logging.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use soft_render::prelude::*;
use soft_render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

const ORBIT_STEP: f32 = 0.1;
const DOLLY_STEP: f32 = 0.1;
const MIN_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    /// Textured OBJ model
    Model,
    /// Bresenham back-fill, steep lines and NDC axes
    Lines,
    /// Per-vertex color interpolation
    Colors,
    /// Two triangles sharing an edge
    Square,
    /// Two intersecting triangles
    Depth,
}

/// Software rasterizer viewer
#[derive(Parser, Debug)]
#[command(name = "soft-render")]
#[command(about = "Render a textured mesh on the CPU", long_about = None)]
#[command(version)]
struct Args {
    /// OBJ mesh to load
    #[arg(long, default_value = "data/african_head.obj")]
    model: PathBuf,

    /// Diffuse texture (RLE TGA, or anything the image crate reads)
    #[arg(long, default_value = "data/african_head_diffuse.tga")]
    texture: PathBuf,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Initial camera distance from the target
    #[arg(long, default_value_t = 3.0)]
    distance: f32,

    #[arg(long, value_enum, default_value_t = Scene::Model)]
    scene: Scene,

    /// Shade untextured triangles by light intensity instead of vertex color
    #[arg(long)]
    grayscale: bool,

    /// Draw without consulting the depth buffer
    #[arg(long)]
    no_depth_test: bool,
}

/// Camera orbiting a fixed target in the XZ plane.
struct OrbitCamera {
    target: Vec3f,
    distance: f32,
    azimuth: f32,
}

impl OrbitCamera {
    fn eye(&self) -> Vec3f {
        let (s, c) = self.azimuth.sin_cos();
        self.target + Vec3f::new(s, 0.0, c) * self.distance
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::MoveCloser => {
                self.distance = (self.distance - DOLLY_STEP).max(MIN_DISTANCE)
            }
            Message::MoveFurther => self.distance += DOLLY_STEP,
            Message::MoveLeft => self.azimuth -= ORBIT_STEP,
            Message::MoveRight => self.azimuth += ORBIT_STEP,
            Message::Quit => {}
        }
    }
}

fn vertex(x: f32, y: f32, z: f32, color: u32) -> Vertex {
    Vertex::new(Vec3f::new(x, y, z)).with_color(color)
}

fn draw_lines<D: Display>(renderer: &mut Renderer<'_, D>) {
    // back-fill: the white pass must fully cover the red one
    renderer.line(Vec2i::new(0, 0), Vec2i::new(600, 600), colors::RED);
    renderer.line(Vec2i::new(600, 600), Vec2i::new(0, 0), colors::WHITE);

    renderer.line(Vec2i::new(50, 75), Vec2i::new(30, 275), colors::YELLOW);
    renderer.line(Vec2i::new(30, 275), Vec2i::new(230, 255), colors::CYAN);

    renderer.line_ndc(Vec2f::ZERO, Vec2f::new(0.0, 1.0), colors::GREEN);
    renderer.line_ndc(Vec2f::ZERO, Vec2f::new(1.0, 0.0), colors::RED);

    renderer.line_3d(Vec3f::ZERO, Vec3f::Z, colors::BLUE);
}

fn draw_scene<'t, D: Display>(
    renderer: &mut Renderer<'t, D>,
    scene: Scene,
    model: Option<&'t Model>,
) -> usize {
    match scene {
        Scene::Model => model.map_or(0, |m| m.draw(renderer)),
        Scene::Lines => {
            draw_lines(renderer);
            0
        }
        Scene::Colors => renderer.triangle([
            vertex(0.5, -0.75, 0.0, colors::RED),
            vertex(0.0, -0.25, 0.0, colors::GREEN),
            vertex(-0.5, -0.75, 0.0, colors::BLUE),
        ]),
        Scene::Square => {
            let t = [
                vertex(-0.5, 0.0, 0.0, colors::GRAY),
                vertex(-0.75, -0.5, 0.0, colors::GRAY),
                vertex(-0.5, -0.75, 0.0, colors::GRAY),
                vertex(-0.25, -0.25, 0.0, colors::GRAY),
            ];
            renderer.triangle([t[0], t[1], t[2]]) + renderer.triangle([t[2], t[3], t[0]])
        }
        Scene::Depth => {
            renderer.triangle([
                vertex(0.75, 0.75, 0.5, colors::RED),
                vertex(0.25, 0.5, 1.0, colors::GREEN),
                vertex(0.75, 0.25, 0.5, colors::BLUE),
            ]) + renderer.triangle([
                vertex(0.25, 0.75, 0.5, colors::RED),
                vertex(0.25, 0.25, 0.5, colors::BLUE),
                vertex(0.75, 0.5, 1.0, colors::GREEN),
            ])
        }
    }
}

fn run(args: Args) -> RenderResult<()> {
    let model = match args.scene {
        Scene::Model => Some(Model::load("model", &args.model, &args.texture)?),
        _ => None,
    };

    let window = Window::new("soft-render", args.width, args.height)?;
    let mut renderer = Renderer::new(window)?;
    renderer.set_depth_test(!args.no_depth_test);
    if args.grayscale {
        renderer.set_color_mode(ColorMode::Intensity);
    }

    let mut camera = OrbitCamera {
        target: Vec3f::ZERO,
        distance: args.distance.max(MIN_DISTANCE),
        azimuth: 0.0,
    };
    renderer.look_at(camera.eye(), camera.target, Vec3f::Y);

    let mut limiter = FrameLimiter::new(renderer.display());
    info!(scene = ?args.scene, "Entering render loop");

    'running: loop {
        let mut moved = false;
        while let Some(message) = renderer.poll_event() {
            if message == Message::Quit {
                break 'running;
            }
            camera.apply(message);
            moved = true;
        }
        if moved {
            renderer.look_at(camera.eye(), camera.target, Vec3f::Y);
        }

        renderer.clear(colors::BACKGROUND);
        draw_scene(&mut renderer, args.scene, model.as_ref());
        renderer.update()?;

        limiter.wait_and_get_delta(renderer.display());
    }

    drop(renderer.release());
    Ok(())
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
