use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cubelab_assets::{ImageData, ShaderKind, ShaderLibrary, ShaderOrigin};
use cubelab_common::{CubelabConfig, PipelinePreset, TextureKey};
use cubelab_input::{InputState, Key, PointerTracker};
use cubelab_render::{
    CursorPosition, DebugTextRenderer, FlyCamera, LightingDesc, RenderPipelineDesc, Renderer,
    SceneParams,
};
use cubelab_tools::CameraInspector;
use glam::Vec2;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubelab-cli", about = "Headless tools for the cube sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file; built-in defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the frame plan of a pipeline preset
    Describe {
        /// Preset to describe: textured, quad, lit or field
        #[arg(short, long, default_value = "textured")]
        pipeline: PipelinePreset,
        /// Framebuffer aspect ratio used for the projection
        #[arg(long, default_value = "1.3333334")]
        aspect: f32,
    },
    /// Drive the camera and scene without a window
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Keys held for the whole run, comma separated (w,a,s,d,space,ctrl)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Pointer motion per frame as DX,DY
        #[arg(short, long, allow_hyphen_values = true)]
        mouse: Option<String>,
    },
    /// Load shaders and textures and report what was found
    CheckAssets {
        /// Asset root directory (overrides the configuration)
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Fail if anything falls back to a built-in substitute
        #[arg(long)]
        strict: bool,
    },
}

fn parse_key(name: &str) -> anyhow::Result<Key> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "w" => Key::W,
        "a" => Key::A,
        "s" => Key::S,
        "d" => Key::D,
        "space" => Key::Space,
        "ctrl" | "lctrl" | "leftcontrol" => Key::LeftControl,
        other => bail!("unknown movement key '{other}'"),
    };
    Ok(key)
}

fn parse_motion(text: &str) -> anyhow::Result<Vec2> {
    let Some((dx, dy)) = text.split_once(',') else {
        bail!("expected DX,DY, got '{text}'");
    };
    let dx: f32 = dx.trim().parse().with_context(|| format!("bad DX in '{text}'"))?;
    let dy: f32 = dy.trim().parse().with_context(|| format!("bad DY in '{text}'"))?;
    Ok(Vec2::new(dx, dy))
}

/// Result of a headless run.
struct Simulation {
    camera: FlyCamera,
    scene: SceneParams,
}

fn simulate(
    config: &CubelabConfig,
    frames: u32,
    dt: f32,
    keys: &[Key],
    motion: Vec2,
) -> Simulation {
    let mut camera = FlyCamera::from_config(&config.camera);
    let mut scene = SceneParams::from_config(&config.scene);
    let mut input = InputState::default();
    for key in keys {
        input.key_event(*key, true, false);
    }

    let mut last = CursorPosition::centered(config.window.width, config.window.height);
    let mut pointer = PointerTracker::new(Vec2::new(last.x, last.y));

    for frame in 0..frames {
        for direction in input.held_movements() {
            camera.keyboard_movement(direction, dt);
        }
        if motion != Vec2::ZERO {
            let p = pointer.accumulate(motion.x, motion.y);
            camera.mouse_movement(&mut last, p.x, p.y);
        }
        scene.advance(dt);
        tracing::trace!(frame, position = ?camera.position, "simulated frame");
    }

    Simulation { camera, scene }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CubelabConfig> {
    match path {
        Some(path) => Ok(CubelabConfig::load(path)?),
        None => Ok(CubelabConfig::default()),
    }
}

fn check_assets(config: &CubelabConfig, strict: bool) -> anyhow::Result<()> {
    let mut fallbacks = 0usize;

    let shader_dir = config.assets.shader_dir();
    println!("Shaders ({}):", shader_dir.display());
    let library = ShaderLibrary::load(&shader_dir);
    for kind in ShaderKind::ALL {
        match library.origin(kind) {
            ShaderOrigin::File(path) => {
                println!("  {:<14} ok ({})", kind.file_name(), path.display())
            }
            ShaderOrigin::Embedded => {
                fallbacks += 1;
                println!("  {:<14} embedded fallback", kind.file_name());
            }
        }
    }

    println!("Textures:");
    for key in TextureKey::ALL {
        let path = config.assets.texture_path(key);
        match ImageData::open(&path) {
            Ok(image) => println!(
                "  {:<10} ok {}x{} alpha={} mips={} ({})",
                key.name(),
                image.width,
                image.height,
                image.has_alpha,
                image.mip_level_count(),
                path.display()
            ),
            Err(e) => {
                fallbacks += 1;
                println!("  {:<10} fallback: {e}", key.name());
            }
        }
    }

    if strict && fallbacks > 0 {
        bail!("{fallbacks} asset(s) fell back to built-in substitutes");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("cubelab-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cubelab_common::crate_info());
            println!("input: {}", cubelab_input::crate_info());
            println!("assets: {}", cubelab_assets::crate_info());
            println!("render: {}", cubelab_render::crate_info());
            println!("tools: {}", cubelab_tools::crate_info());
            let presets: Vec<&str> = PipelinePreset::ALL.iter().map(|p| p.name()).collect();
            println!("presets: {}", presets.join(", "));
        }
        Commands::Describe { pipeline, aspect } => {
            let camera = FlyCamera::from_config(&config.camera);
            let scene = SceneParams::from_config(&config.scene);
            let plan = RenderPipelineDesc::preset(pipeline).plan(
                &camera,
                &scene,
                &LightingDesc::default(),
                aspect,
            );
            print!("{}", DebugTextRenderer::new().render(&plan));
        }
        Commands::Simulate {
            frames,
            dt,
            keys,
            mouse,
        } => {
            let keys = keys
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| parse_key(k))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let motion = mouse
                .as_deref()
                .map(parse_motion)
                .transpose()?
                .unwrap_or(Vec2::ZERO);

            println!("Simulating {frames} frames at dt={dt:.4}s");
            let result = simulate(&config, frames, dt, &keys, motion);
            println!("{}", CameraInspector::summary(&result.camera));
            println!(
                "Scene: rotation={:.2} deg, spin={}",
                result.scene.rotation_deg, result.scene.spin
            );
        }
        Commands::CheckAssets { assets, strict } => {
            if let Some(root) = assets {
                config.assets.root = root;
            }
            check_assets(&config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_names() {
        assert_eq!(parse_key("W").unwrap(), Key::W);
        assert_eq!(parse_key(" space ").unwrap(), Key::Space);
        assert_eq!(parse_key("ctrl").unwrap(), Key::LeftControl);
        assert!(parse_key("q").is_err());
    }

    #[test]
    fn parses_motion_pairs() {
        assert_eq!(parse_motion("5,-2.5").unwrap(), Vec2::new(5.0, -2.5));
        assert!(parse_motion("5").is_err());
        assert!(parse_motion("x,1").is_err());
    }

    #[test]
    fn simulate_moves_forward_for_one_second() {
        let config = CubelabConfig::default();
        let result = simulate(&config, 10, 0.1, &[Key::W], Vec2::ZERO);
        let z = result.camera.position.z;
        assert!((z - 0.5).abs() < 1e-4, "z = {z}");
    }

    #[test]
    fn simulate_mouse_pitch_stays_clamped() {
        let config = CubelabConfig::default();
        let result = simulate(&config, 500, 0.016, &[], Vec2::new(0.0, -50.0));
        assert!(result.camera.pitch <= 89.0);
        assert!(result.camera.pitch > 88.0);
    }

    #[test]
    fn simulate_spins_scene() {
        let config = CubelabConfig::default();
        let result = simulate(&config, 60, 1.0 / 60.0, &[], Vec2::ZERO);
        assert!((result.scene.rotation_deg - 30.0).abs() < 1e-2);
    }

    #[test]
    fn check_assets_reports_fallbacks_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CubelabConfig::default();
        config.assets.root = dir.path().to_path_buf();
        assert!(check_assets(&config, false).is_ok());
        assert!(check_assets(&config, true).is_err());
    }
}
