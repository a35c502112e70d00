/// Terminal demo binary.
///
/// Usage:
///   swgl-terminal [--scene cube|prism|primitives] [--config renderer.json] [--fps 30]
///
/// Drag with the left mouse button to rotate, `r` resets the rotation and
/// `q`/Esc quits. Set `RUST_LOG` for diagnostics on stderr.
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use crossterm::terminal;
use swgl_core::{RendererConfig, Scene};
use swgl_terminal::scenes::{PrimitivesScene, SpinningCube, WireframePrism};
use swgl_terminal::{frame_size, TerminalApp};

#[derive(Debug, PartialEq)]
struct Args {
    scene: String,
    config: Option<PathBuf>,
    fps: u32,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            scene: "cube".to_string(),
            config: None,
            fps: 30,
        }
    }
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" if i + 1 < args.len() => {
                parsed.scene = args[i + 1].clone();
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--fps" if i + 1 < args.len() => {
                parsed.fps = args[i + 1].parse().unwrap_or(parsed.fps);
                i += 2;
            }
            _ => i += 1,
        }
    }
    parsed
}

fn load_config(args: &Args) -> anyhow::Result<RendererConfig> {
    let Some(path) = &args.config else {
        return Ok(RendererConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    RendererConfig::from_json_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn run<S: Scene>(config: &RendererConfig, scene: S, fps: u32) -> anyhow::Result<()> {
    TerminalApp::new(config, scene, fps)?.run()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args);
    let mut config = load_config(&args)?;

    let (columns, rows) = terminal::size().context("querying terminal size")?;
    (config.width, config.height) = frame_size(columns, rows);
    tracing::debug!(?args, width = config.width, height = config.height, "starting");

    match args.scene.as_str() {
        "cube" => run(&config, SpinningCube::new(), args.fps),
        "prism" => run(&config, WireframePrism::new(), args.fps),
        "primitives" => run(&config, PrimitivesScene::new(), args.fps),
        other => bail!("unknown scene '{other}', expected cube, prism or primitives"),
    }
}
