//! Run orchestration.
//!
//! The master aggregator opens the run, `workers` threads each track an
//! interleaved share of the events into their own aggregator, and the master
//! merges the partial results in worker order before closing the run.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{AnalysisContext, RunAggregator, RunResult};
use crate::event::Event;
use crate::sensor::SensorArray;
use crate::transport::TransportEngine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Number of events in the run.
    pub events: u64,
    /// Number of worker threads. `0` and `1` run on the calling thread.
    pub workers: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            events: 1000,
            workers: 1,
        }
    }
}

pub struct RunManager {
    ctx: Arc<AnalysisContext>,
    sensors: SensorArray,
    settings: RunSettings,
}

impl RunManager {
    pub fn new(ctx: Arc<AnalysisContext>, sensors: SensorArray, settings: RunSettings) -> Self {
        Self {
            ctx,
            sensors,
            settings,
        }
    }

    pub fn context(&self) -> &Arc<AnalysisContext> {
        &self.ctx
    }

    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Runs one full run and returns the merged result.
    ///
    /// The result is also persisted by the master aggregator.
    pub fn run<E: TransportEngine>(&self, engine: &E) -> Result<RunResult> {
        let RunSettings { events, workers } = self.settings;
        let start = Instant::now();
        info!(events, workers, "starting run");

        let mut master = RunAggregator::master(self.ctx.clone());
        master.begin_run()?;

        if workers <= 1 {
            for id in 0..events {
                let event = self.track(engine, id)?;
                master.end_of_event(&event)?;
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("worker-{i}"))
                .build()
                .map_err(|e| anyhow!("failed to start worker pool: {e}"))?;

            let partials = pool.install(|| {
                (0..workers)
                    .into_par_iter()
                    .map(|w| {
                        self.run_worker(engine, w)
                            .with_context(|| format!("worker {w} aborted"))
                    })
                    .collect::<Result<Vec<_>>>()
            })?;

            for partial in partials {
                master.merge_worker(partial)?;
            }
        }

        let result = master.end_run()?;
        info!(
            events = result.table().len(),
            elapsed_s = start.elapsed().as_secs_f64(),
            "run finished"
        );
        Ok(result)
    }

    /// Tracks events `w, w + workers, ...` into a worker-local result.
    fn run_worker<E: TransportEngine>(&self, engine: &E, w: usize) -> Result<RunResult> {
        let RunSettings { events, workers } = self.settings;
        let mut aggregator = RunAggregator::worker(self.ctx.clone(), w);
        aggregator.begin_run()?;

        let mut tracked = 0u64;
        for id in (w as u64..events).step_by(workers) {
            let event = self.track(engine, id)?;
            aggregator.end_of_event(&event)?;
            tracked += 1;
        }
        debug!(worker = w, tracked, "worker done");

        Ok(aggregator.end_run()?)
    }

    fn track<E: TransportEngine>(&self, engine: &E, id: u64) -> Result<Event> {
        let mut event = Event::new(id, self.ctx.setup().num_collections());
        engine
            .transport(&mut event, &self.sensors)
            .with_context(|| format!("transport failed for event {id}"))?;
        Ok(event)
    }
}
