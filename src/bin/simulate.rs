use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use solar_conics::ephemeris::BodyId;
use solar_conics::scenario::Scenario;
use solar_conics::state::StateVector;
use solar_conics::time::{SimClock, TimeScaleLadder};
use solar_conics::trajectory::{MovingTarget, PredictionCache, TrajectoryError, Traversal};

/// Cap on back-to-back replans while catching up with a single tick.
const MAX_REPLANS_PER_TICK: usize = 256;

/// Advance a craft along its predicted trajectory in fixed ticks.
#[derive(Parser, Debug)]
#[command(author, version, about = "Step a craft through its patched-conic trajectory")]
struct Cli {
    /// Body catalog (YAML list, TOML file, or directory of TOML files)
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Scenario file (YAML or TOML)
    #[arg(long, default_value = "configs/scenarios/flyby.yaml")]
    scenario: PathBuf,

    /// Real seconds per tick
    #[arg(long, default_value_t = 1.0)]
    tick: f64,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: usize,

    /// Steps up the time-scale ladder (1x, 10x, 100x, ...)
    #[arg(long, default_value_t = 0)]
    warp: usize,
}

struct Craft {
    body: BodyId,
    state: StateVector,
    time: f64,
    handoffs: Vec<(f64, BodyId)>,
}

impl Craft {
    fn hand_off(&mut self, time: f64, body: BodyId) {
        self.body = body;
        self.handoffs.push((time, body));
    }
}

impl MovingTarget for Craft {
    fn reparent(&mut self, body: BodyId) {
        self.hand_off(self.time, body);
    }

    fn set_state(&mut self, state: StateVector) {
        self.state = state;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let scenario = Scenario::load(&cli.bodies, &cli.scenario)?;
    let system = &scenario.system;
    let config = scenario.trajectory_config();
    let request = scenario.request()?;

    let mut ladder = TimeScaleLadder::default();
    for _ in 0..cli.warp {
        ladder.raise();
    }
    let rate = ladder.current();

    let mut cache = PredictionCache::new();
    let prediction = cache.get_or_plan(system, &request, &config).clone();
    let mut pending = prediction.next;
    let mut traversal = Traversal::new(prediction.trajectory, prediction.epoch);
    let mut clock = SimClock::new(request.time);
    let mut craft = Craft {
        body: request.body,
        state: request.state,
        time: request.time,
        handoffs: Vec::new(),
    };

    println!(
        "=== Simulating {} ({} ticks of {}s at {}x) ===",
        scenario.config.name, cli.ticks, cli.tick, rate
    );
    for _ in 0..cli.ticks {
        let now = clock.step(cli.tick, rate);
        craft.time = now;
        let mut replans = 0;
        loop {
            match traversal.advance(now, &mut craft) {
                Ok(_) => break,
                Err(TrajectoryError::PastEnd { end, .. }) => {
                    let Some(next) = pending else {
                        bail!("trajectory ends at t = {end:.3} with nowhere to continue");
                    };
                    if replans == MAX_REPLANS_PER_TICK {
                        bail!("tick to t = {now:.3} outran {MAX_REPLANS_PER_TICK} replans");
                    }
                    replans += 1;
                    log::info!("prediction ran out at t = {:.3}; replanning", end);
                    craft.hand_off(next.time, next.body);
                    let prediction = cache.get_or_plan(system, &next, &config).clone();
                    pending = prediction.next;
                    traversal = Traversal::new(prediction.trajectory, prediction.epoch);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    for (time, body) in &craft.handoffs {
        println!("t = {:>12.3}  entered `{}`", time, system.body(*body).name());
    }
    println!(
        "Final: t = {:.3}, body = `{}`, {}",
        clock.now(),
        system.body(craft.body).name(),
        craft.state
    );
    println!("Predictions built: {}", cache.rebuilds());
    Ok(())
}
