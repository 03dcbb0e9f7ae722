use solar_ephemeris::BodySystem;

use crate::builder::{Prediction, TrajectoryRequest, plan_trajectory};
use crate::config::TrajectoryConfig;

/// Remembers the last prediction and the inputs it was built from.
///
/// A rebuild happens only when the request or the solver limits differ from the
/// previous call. The body system is assumed unchanged between calls; call
/// [`PredictionCache::invalidate`] after editing it.
#[derive(Debug, Clone, Default)]
pub struct PredictionCache {
    entry: Option<(TrajectoryRequest, TrajectoryConfig, Prediction)>,
    rebuilds: usize,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_plan(
        &mut self,
        system: &BodySystem,
        request: &TrajectoryRequest,
        config: &TrajectoryConfig,
    ) -> &Prediction {
        if !self.is_current(request, config) {
            self.entry = None;
        }
        if self.entry.is_none() {
            self.rebuilds += 1;
            log::debug!("rebuilding prediction from {:?} at t = {}", request.body, request.time);
        }
        let (_, _, prediction) = self.entry.get_or_insert_with(|| {
            (
                *request,
                config.clone(),
                plan_trajectory(system, request, config),
            )
        });
        prediction
    }

    /// Whether the cached prediction was built from exactly these inputs.
    pub fn is_current(&self, request: &TrajectoryRequest, config: &TrajectoryConfig) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(cached_request, cached_config, _)| {
                cached_request == request && cached_config == config
            })
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of predictions built so far.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
