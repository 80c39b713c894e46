// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Background render pipeline.
//!
//! Every editor change schedules a render of the full JSON source. The
//! worker runs the whole chain (JSON parse, Mermaid translation, Mermaid
//! parse, layout, text and SVG render) off the UI thread. Schedules coalesce:
//! a single pending slot holds the newest source, so a burst of keystrokes
//! renders at most twice. Each schedule gets a sequence number and an
//! artifact is kept only while it is still the newest; stale completions are
//! dropped on the floor instead of flashing outdated diagrams.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::format::mermaid::{document_to_mermaid, parse_flowchart};
use crate::layout::layout_flowchart;
use crate::model::document::Document;

use super::svg::render_flowchart_svg;
use super::{render_flowchart_text, LabelIndex};

/// Everything one successful render produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    /// Mermaid source translated from the document.
    pub mermaid: String,
    /// Unicode text diagram.
    pub text: String,
    /// Per-node label cells within `text`, for click handling.
    pub labels: LabelIndex,
    /// Standalone SVG document.
    pub svg: String,
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(RenderedDiagram),
    /// The editor text is not valid JSON for a document.
    InvalidJson,
    /// The document parsed but the render chain rejected it.
    Failed { message: String },
}

/// A completed render tagged with the schedule it answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArtifact {
    pub seq: u64,
    pub outcome: RenderOutcome,
}

#[derive(Debug)]
struct RenderJob {
    seq: u64,
    source: String,
}

#[derive(Debug, Default)]
struct PipelineState {
    pending: Option<RenderJob>,
    latest_seq: u64,
    completed: Option<RenderArtifact>,
    shutdown: bool,
}

#[derive(Debug)]
struct PipelineInner {
    state: Mutex<PipelineState>,
    cv: Condvar,
}

/// Owning handle for the render worker thread.
///
/// Dropping the handle shuts the worker down and joins it.
#[derive(Debug)]
pub struct RenderPipeline {
    inner: Arc<PipelineInner>,
    worker: Option<JoinHandle<()>>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        let inner = Arc::new(PipelineInner {
            state: Mutex::new(PipelineState::default()),
            cv: Condvar::new(),
        });

        let worker = std::thread::Builder::new()
            .name("proteus-render".to_owned())
            .spawn({
                let inner = inner.clone();
                move || run_worker(inner)
            })
            .expect("spawn render worker thread");

        Self { inner, worker: Some(worker) }
    }

    /// Queues `source` for rendering and returns its sequence number.
    ///
    /// An unstarted earlier schedule is replaced, not queued behind.
    pub fn schedule(&self, source: String) -> u64 {
        let mut state = self.inner.state.lock().expect("render pipeline lock poisoned");
        state.latest_seq += 1;
        let seq = state.latest_seq;
        state.pending = Some(RenderJob { seq, source });
        self.inner.cv.notify_one();
        trace!(seq, "render scheduled");
        seq
    }

    /// Takes the completed artifact if one is waiting.
    ///
    /// The worker only stores an artifact while it is still the newest
    /// schedule, so whatever comes out here is current.
    pub fn take_completed(&self) -> Option<RenderArtifact> {
        let mut state = self.inner.state.lock().expect("render pipeline lock poisoned");
        state.completed.take()
    }

    /// Blocks until the newest schedule completes or `timeout` elapses.
    ///
    /// Consumes the completed slot, same as `take_completed`.
    pub fn wait_for_latest(&self, timeout: Duration) -> Option<RenderArtifact> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock().expect("render pipeline lock poisoned");
        loop {
            let current = state
                .completed
                .as_ref()
                .is_some_and(|artifact| artifact.seq == state.latest_seq);
            if current {
                return state.completed.take();
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            let (next, result) = self
                .inner
                .cv
                .wait_timeout(state, remaining)
                .expect("render pipeline cv poisoned");
            state = next;
            if result.timed_out() {
                let current = state
                    .completed
                    .as_ref()
                    .is_some_and(|artifact| artifact.seq == state.latest_seq);
                if current {
                    return state.completed.take();
                }
                return None;
            }
        }
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.lock().expect("render pipeline lock poisoned");
            state.shutdown = true;
        }
        self.inner.cv.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(inner: Arc<PipelineInner>) {
    loop {
        let job = {
            let mut state = inner.state.lock().expect("render pipeline lock poisoned");
            loop {
                if state.shutdown {
                    return;
                }
                if let Some(job) = state.pending.take() {
                    break job;
                }
                state = inner.cv.wait(state).expect("render pipeline cv poisoned");
            }
        };

        let outcome = render_source(&job.source);

        let mut state = inner.state.lock().expect("render pipeline lock poisoned");
        if state.shutdown {
            return;
        }
        if job.seq == state.latest_seq {
            let kind = match &outcome {
                RenderOutcome::Rendered(_) => "rendered",
                RenderOutcome::InvalidJson => "invalid-json",
                RenderOutcome::Failed { .. } => "failed",
            };
            debug!(seq = job.seq, outcome = kind, "render completed");
            state.completed = Some(RenderArtifact { seq: job.seq, outcome });
            inner.cv.notify_all();
        } else {
            trace!(seq = job.seq, latest = state.latest_seq, "stale render dropped");
        }
    }
}

/// Runs the full render chain for one editor snapshot.
fn render_source(source: &str) -> RenderOutcome {
    let document = match Document::from_json(source) {
        Ok(document) => document,
        Err(_) => return RenderOutcome::InvalidJson,
    };

    let mermaid = document_to_mermaid(&document);
    let ast = match parse_flowchart(&mermaid) {
        Ok(ast) => ast,
        Err(err) => return RenderOutcome::Failed { message: err.to_string() },
    };

    let layout = layout_flowchart(&ast);
    let diagram = match render_flowchart_text(&ast, &layout) {
        Ok(diagram) => diagram,
        Err(err) => return RenderOutcome::Failed { message: err.to_string() },
    };
    let svg = match render_flowchart_svg(&ast, &layout) {
        Ok(svg) => svg,
        Err(err) => return RenderOutcome::Failed { message: err.to_string() },
    };

    RenderOutcome::Rendered(RenderedDiagram {
        mermaid,
        text: diagram.text,
        labels: diagram.labels,
        svg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn renders_the_sample_document() {
        let pipeline = RenderPipeline::new();
        let seq = pipeline.schedule(Document::sample().to_pretty_json());
        let artifact = pipeline.wait_for_latest(WAIT).expect("artifact");
        assert_eq!(artifact.seq, seq);
        let RenderOutcome::Rendered(diagram) = artifact.outcome else {
            panic!("expected a rendered diagram");
        };
        assert!(diagram.mermaid.starts_with("graph TD\n"));
        assert!(diagram.text.contains("User clicks"));
        assert!(diagram.svg.contains("<svg"));
        assert_eq!(diagram.labels.len(), 4);
    }

    #[test]
    fn invalid_json_is_reported_as_such() {
        let pipeline = RenderPipeline::new();
        pipeline.schedule("{ not json".to_owned());
        let artifact = pipeline.wait_for_latest(WAIT).expect("artifact");
        assert_eq!(artifact.outcome, RenderOutcome::InvalidJson);
    }

    #[test]
    fn newer_schedules_supersede_older_ones() {
        let pipeline = RenderPipeline::new();
        for _ in 0..32 {
            pipeline.schedule("{ not json".to_owned());
        }
        let last = pipeline.schedule(Document::sample().to_pretty_json());
        let artifact = pipeline.wait_for_latest(WAIT).expect("artifact");
        assert_eq!(artifact.seq, last);
        assert!(matches!(artifact.outcome, RenderOutcome::Rendered(_)));
    }

    #[test]
    fn take_completed_drains_the_slot() {
        let pipeline = RenderPipeline::new();
        pipeline.schedule(Document::sample().to_pretty_json());
        let artifact = pipeline.wait_for_latest(WAIT);
        assert!(artifact.is_some());
        assert!(pipeline.take_completed().is_none());
    }

    #[test]
    fn empty_document_renders_to_an_empty_diagram() {
        let pipeline = RenderPipeline::new();
        pipeline.schedule("{\"nodes\": [], \"edges\": []}".to_owned());
        let artifact = pipeline.wait_for_latest(WAIT).expect("artifact");
        let RenderOutcome::Rendered(diagram) = artifact.outcome else {
            panic!("expected a rendered diagram");
        };
        assert!(diagram.text.is_empty());
        assert!(diagram.labels.is_empty());
    }
}
