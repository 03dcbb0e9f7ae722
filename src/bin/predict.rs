use std::path::PathBuf;

use clap::Parser;
use solar_conics::export::{polyline, summary};
use solar_conics::scenario::Scenario;

/// Predict a patched-conic trajectory for a scenario and print its sections.
#[derive(Parser, Debug)]
#[command(author, version, about = "Patched-conic trajectory predictor")]
struct Cli {
    /// Body catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Scenario file (YAML or TOML)
    #[arg(long, default_value = "configs/scenarios/flyby.yaml")]
    scenario: PathBuf,

    /// Override the scenario's maximum number of sections
    #[arg(long)]
    max_patches: Option<usize>,

    /// Write sampled section polylines as CSV (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary of the sections
    #[arg(long)]
    json: Option<PathBuf>,

    /// Points sampled per section for the CSV export
    #[arg(long, default_value_t = 64)]
    resolution: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let scenario = Scenario::load(&cli.bodies, &cli.scenario)?;
    let mut config = scenario.trajectory_config();
    if let Some(max_patches) = cli.max_patches {
        config.max_patches = max_patches;
    }
    let prediction = scenario.predict_with(&config)?;
    let system = &scenario.system;

    println!("=== Trajectory: {} ===", scenario.config.name);
    println!(
        "{:>3}  {:<12} {:<10} {:>14} {:>12} {:>14} {:>14}",
        "#", "body", "kind", "a", "e", "global start", "duration"
    );
    for (index, (section, start)) in prediction
        .trajectory
        .sections()
        .zip(prediction.section_epochs())
        .enumerate()
    {
        let orbit = section.orbit();
        let duration = if section.is_full() {
            "full orbit".to_string()
        } else {
            format!("{:.3}", section.duration())
        };
        println!(
            "{:>3}  {:<12} {:<10} {:>14.3} {:>12.6} {:>14.3} {:>14}",
            index,
            system.body(section.body()).name(),
            if orbit.is_elliptic() { "elliptic" } else { "hyperbolic" },
            orbit.semi_major_axis(),
            orbit.eccentricity(),
            start,
            duration
        );
    }
    println!(
        "Sections: {}, total duration: {:.3}",
        prediction.trajectory.len(),
        prediction.trajectory.total_duration()
    );

    if let Some(path) = &cli.csv {
        let mut writer = polyline::writer_for_path(path)?;
        let rows =
            polyline::write_trajectory(writer.as_mut(), system, &prediction.trajectory, cli.resolution)?;
        log::info!("wrote {} samples to {}", rows, path.display());
    }

    if let Some(path) = &cli.json {
        let sidecar = summary::summarize(system, &scenario.config.name, &prediction);
        summary::write_summary(path, &sidecar)?;
        log::info!("wrote summary to {}", path.display());
    }

    Ok(())
}
