use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::event::Event;
use crate::io::{ArtifactRecord, OutputBackend, open_backend};
use crate::uid::RunId;

use super::context::AnalysisContext;
use super::event::EventAggregator;
use super::result::RunResult;
use super::summary::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized,
    Open,
    Closed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Uninitialized => write!(f, "uninitialized"),
            RunState::Open => write!(f, "open"),
            RunState::Closed => write!(f, "closed"),
        }
    }
}

/// Execution context of an aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunContext {
    /// Coordinating context: merges partials and writes the artifact.
    Master,
    /// Event-processing worker with its index.
    Worker(usize),
}

impl RunContext {
    pub fn is_master(&self) -> bool {
        matches!(self, RunContext::Master)
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunContext::Master => write!(f, "master"),
            RunContext::Worker(i) => write!(f, "worker {i}"),
        }
    }
}

/// Run-scoped owner of one context's histograms and table.
///
/// `Uninitialized -> Open -> Closed`, and back to `Open` for the next run.
/// Only the master opens, writes and closes the output artifact.
pub struct RunAggregator {
    ctx: Arc<AnalysisContext>,
    context: RunContext,
    state: RunState,
    events: EventAggregator,
    result: Option<RunResult>,
    backend: Option<Box<dyn OutputBackend>>,
    run_id: Option<RunId>,
    workers_merged: usize,
}

impl RunAggregator {
    pub fn master(ctx: Arc<AnalysisContext>) -> Self {
        Self::new(ctx, RunContext::Master)
    }

    pub fn worker(ctx: Arc<AnalysisContext>, index: usize) -> Self {
        Self::new(ctx, RunContext::Worker(index))
    }

    fn new(ctx: Arc<AnalysisContext>, context: RunContext) -> Self {
        Self {
            events: EventAggregator::new(ctx.clone(), context),
            ctx,
            context,
            state: RunState::Uninitialized,
            result: None,
            backend: None,
            run_id: None,
            workers_merged: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn context(&self) -> RunContext {
        self.context
    }

    /// Current run's result while the run is open.
    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Books fresh histograms and table; the master also opens the artifact.
    pub fn begin_run(&mut self) -> Result<()> {
        if self.state == RunState::Open {
            return Err(AnalysisError::InvalidState {
                expected: RunState::Closed,
                actual: self.state,
            });
        }

        let booking = self.ctx.booking();
        self.result = Some(booking.book());
        self.workers_merged = 0;

        if self.context.is_master() {
            let output = &self.ctx.config().output;
            let path = output.path();
            let mut backend = open_backend(output);
            backend.open(&path)?;
            info!(
                histograms = booking.histograms().len(),
                columns = booking.columns().len(),
                "opened output file {}",
                path.display()
            );
            self.backend = Some(backend);
            self.run_id = Some(RunId::new());
        }

        self.state = RunState::Open;
        debug!(context = %self.context, "run started");
        Ok(())
    }

    pub fn end_of_event(&mut self, event: &Event) -> Result<()> {
        let result = open_result(self.state, &mut self.result)?;
        self.events.end_of_event(event, result)
    }

    /// Folds a worker's partial result into the master's.
    pub fn merge_worker(&mut self, partial: RunResult) -> Result<()> {
        if !self.context.is_master() {
            return Err(AnalysisError::InvalidConfig(format!(
                "{} cannot merge partial results",
                self.context
            )));
        }
        open_result(self.state, &mut self.result)?.merge(partial)?;
        self.workers_merged += 1;
        Ok(())
    }

    /// Closes the run and hands back its result.
    ///
    /// The master logs the summary and persists the result. Workers return
    /// their partial result for merging.
    pub fn end_run(&mut self) -> Result<RunResult> {
        open_result(self.state, &mut self.result)?;
        self.state = RunState::Closed;
        let Some(result) = self.result.take() else {
            return Err(AnalysisError::InvalidState {
                expected: RunState::Open,
                actual: RunState::Uninitialized,
            });
        };

        let summary = RunSummary::new(self.ctx.booking(), &result, self.context);
        if !self.context.is_master() {
            debug!("\n{summary}");
            return Ok(result);
        }
        info!("\n{summary}");

        if let Some(mut backend) = self.backend.take() {
            let record = ArtifactRecord {
                run_id: self.run_id.clone().unwrap_or_default(),
                workers: self.workers_merged,
                result,
            };
            backend.write(&record)?;
            backend.close()?;
            info!(
                events = record.result.table().len(),
                "wrote run {} to {}",
                record.run_id.as_str(),
                backend
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
            return Ok(record.result);
        }
        Ok(result)
    }
}

/// The run's result, if the run is open.
fn open_result(state: RunState, result: &mut Option<RunResult>) -> Result<&mut RunResult> {
    match (state, result.as_mut()) {
        (RunState::Open, Some(result)) => Ok(result),
        (actual, _) => Err(AnalysisError::InvalidState {
            expected: RunState::Open,
            actual,
        }),
    }
}
