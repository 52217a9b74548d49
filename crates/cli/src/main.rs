use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;
use visibility_engine::synthetic::{axis_aligned_slab, holed_slab};
use visibility_engine::{are_visible, Scene, VisibilityConfig, VisibilityResult};

/// Exact visibility checks between two convex polygonal sources.
#[derive(Parser)]
#[command(name = "vischeck")]
#[command(about = "Exact Plücker-space visibility queries against a small demo scene")]
struct Cmd {
    /// Optional run ticket; logged with tracing for correlation across invocations.
    #[arg(long)]
    vk: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run a built-in demo scene and report the visibility outcome.
    Demo {
        /// Scene to run: "empty", "slab" (opaque occluder), or "hole" (occluder with a gap).
        #[arg(long, default_value = "slab")]
        scene: String,
    },
    /// Check visibility between a point source and a point target against an
    /// empty scene (no occluders) loaded from JSON vertex arrays.
    Points {
        /// Source point as "x,y,z".
        #[arg(long)]
        a: String,
        /// Target point as "x,y,z".
        #[arg(long)]
        b: String,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Demo { scene } => demo(scene, cmd.vk),
        Action::Points { a, b } => points(a, b, cmd.vk),
    }
}

fn demo(scene_name: String, vk: Option<String>) -> Result<()> {
    tracing::info!(scene = scene_name.as_str(), vk = ?vk, "running demo scene");

    let source_a = vec![
        nalgebra::vector![-0.5, -0.5, 0.0],
        nalgebra::vector![0.5, -0.5, 0.0],
        nalgebra::vector![0.5, 0.5, 0.0],
        nalgebra::vector![-0.5, 0.5, 0.0],
    ];
    let source_b = vec![
        nalgebra::vector![-0.5, -0.5, 4.0],
        nalgebra::vector![0.5, -0.5, 4.0],
        nalgebra::vector![0.5, 0.5, 4.0],
        nalgebra::vector![-0.5, 0.5, 4.0],
    ];

    let mut scene = Scene::new();
    match scene_name.as_str() {
        "empty" => {}
        "slab" => {
            scene.add_occluder(axis_aligned_slab(2.0, 2.0));
        }
        "hole" => {
            scene.add_occluder(holed_slab(2.0, 0.3, 2.0));
        }
        other => anyhow::bail!("unknown demo scene {other:?}, expected empty|slab|hole"),
    }
    scene.prepare().context("preparing demo scene")?;

    let result = are_visible(&scene, &source_a, &source_b, VisibilityConfig::default());
    print_result(result);
    Ok(())
}

fn points(a: String, b: String, vk: Option<String>) -> Result<()> {
    let a = parse_point(&a).context("parsing --a")?;
    let b = parse_point(&b).context("parsing --b")?;
    tracing::info!(?a, ?b, vk = ?vk, "point-to-point visibility check");

    let mut scene = Scene::new();
    scene.prepare().context("preparing empty scene")?;

    let result = are_visible(&scene, &[a], &[b], VisibilityConfig::default());
    print_result(result);
    Ok(())
}

fn parse_point(s: &str) -> Result<nalgebra::Vector3<f64>> {
    let parts: Vec<&str> = s.split(',').collect();
    anyhow::ensure!(parts.len() == 3, "expected \"x,y,z\", got {s:?}");
    let x: f64 = parts[0].trim().parse()?;
    let y: f64 = parts[1].trim().parse()?;
    let z: f64 = parts[2].trim().parse()?;
    Ok(nalgebra::vector![x, y, z])
}

fn print_result(result: VisibilityResult) {
    let label = match result {
        VisibilityResult::Visible => "visible",
        VisibilityResult::Hidden => "hidden",
        VisibilityResult::Unknown => "unknown",
        VisibilityResult::Failure => "failure",
    };
    let obj = json!({ "result": label });
    println!("{}", serde_json::to_string_pretty(&obj).expect("json"));
}
