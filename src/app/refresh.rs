//! Re-layout gating and the debounced "recenter view" action.
//!
//! [`RefreshController`] owns the current [`RenderGraph`].  Every incoming
//! tree is fingerprinted; only a structural change triggers a layout, and
//! each change (re)arms a single recenter timer.  The timer is a tokio task
//! that sleeps for the settle delay and then posts a [`RecenterRequest`] on
//! the controller's channel.  Arming a new timer aborts the previous one, and
//! requests from superseded generations are rejected by
//! [`RefreshController::accept_recenter`], so one settled burst of changes
//! yields exactly one recenter.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{
    engine,
    error::LayoutError,
    fingerprint::Fingerprint,
    geometry::{Bounds, LayoutConfig},
    graph::RenderGraph,
    tree::TreeNode,
};

/// Where the controller is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    /// Nothing received yet.
    #[default]
    Idle,
    /// A layout pass is running.  Only observable from inside `submit`.
    LayoutPending,
    /// The current graph is complete and no recenter is pending.
    Rendered,
    /// The current graph is complete and a recenter timer is armed.
    RecenterScheduled,
    /// The last input had no root; nothing to draw.
    Empty,
}

/// Posted by the recenter timer once the settle delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecenterRequest {
    pub generation: u64,
    pub bounds: Bounds,
}

/// What a call to [`RefreshController::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Same fingerprint as the last processed input; nothing recomputed.
    Unchanged,
    /// A new graph replaced the old one.
    Relaid { nodes: usize, edges: usize },
    /// The input was empty; the graph was cleared.
    Emptied,
}

pub struct RefreshController {
    config: LayoutConfig,
    settle_delay: Duration,
    phase: RefreshPhase,
    fingerprint: Option<Fingerprint>,
    graph: Arc<RenderGraph>,
    /// Bumped on every structural change; recenter requests carry it.
    generation: u64,
    /// The single armed recenter timer, if any.
    pending_recenter: Option<JoinHandle<()>>,
    recenter_tx: mpsc::UnboundedSender<RecenterRequest>,
}

impl RefreshController {
    /// Create a controller and the receiving end of its recenter channel.
    pub fn new(
        config: LayoutConfig,
        settle_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<RecenterRequest>) {
        let (recenter_tx, recenter_rx) = mpsc::unbounded_channel();
        let controller = Self {
            config,
            settle_delay,
            phase: RefreshPhase::Idle,
            fingerprint: None,
            graph: Arc::new(RenderGraph::default()),
            generation: 0,
            pending_recenter: None,
            recenter_tx,
        };
        (controller, recenter_rx)
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    /// The current graph.  Always complete; replaced, never mutated.
    pub fn graph(&self) -> Arc<RenderGraph> {
        Arc::clone(&self.graph)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Feed a new input tree.  Must be called from within a tokio runtime.
    ///
    /// On a layout error the previous graph stays current and the input's
    /// fingerprint is not remembered, so a corrected tree is laid out.
    pub fn submit(&mut self, root: Option<&TreeNode>) -> Result<RefreshOutcome, LayoutError> {
        let Some(root) = root else {
            return Ok(self.enter_empty());
        };

        let fingerprint = Fingerprint::of(root);
        if self.fingerprint == Some(fingerprint) {
            tracing::trace!("refresh: unchanged tree {}", fingerprint.short());
            return Ok(RefreshOutcome::Unchanged);
        }

        let previous = self.phase;
        self.phase = RefreshPhase::LayoutPending;
        let t0 = Instant::now();
        let graph = match engine::compute_graph(root, &self.config) {
            Ok(graph) => graph,
            Err(err) => {
                self.phase = previous;
                return Err(err);
            }
        };
        tracing::debug!(
            "layout: {:.2?} nodes={} edges={} fingerprint={}",
            t0.elapsed(),
            graph.nodes.len(),
            graph.edges.len(),
            fingerprint.short()
        );

        let outcome = RefreshOutcome::Relaid {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
        };
        self.graph = Arc::new(graph);
        self.fingerprint = Some(fingerprint);
        self.generation = self.generation.wrapping_add(1);
        self.phase = RefreshPhase::Rendered;
        self.schedule_recenter();
        Ok(outcome)
    }

    /// Consume a delivered recenter request.  Returns the bounds to fit when
    /// the request belongs to the current generation, `None` if stale.
    pub fn accept_recenter(&mut self, request: RecenterRequest) -> Option<Bounds> {
        if request.generation != self.generation || self.phase != RefreshPhase::RecenterScheduled {
            tracing::trace!(
                "recenter: dropping stale request gen={} (current {})",
                request.generation,
                self.generation
            );
            return None;
        }
        self.pending_recenter = None;
        self.phase = RefreshPhase::Rendered;
        Some(request.bounds)
    }

    fn enter_empty(&mut self) -> RefreshOutcome {
        if self.phase == RefreshPhase::Empty {
            return RefreshOutcome::Unchanged;
        }
        self.cancel_recenter();
        self.graph = Arc::new(RenderGraph::default());
        self.fingerprint = None;
        self.generation = self.generation.wrapping_add(1);
        self.phase = RefreshPhase::Empty;
        RefreshOutcome::Emptied
    }

    /// Arm the recenter timer for the current generation, replacing any
    /// pending one.
    fn schedule_recenter(&mut self) {
        self.cancel_recenter();
        let Some(bounds) = self.graph.bounds() else {
            return;
        };

        let request = RecenterRequest {
            generation: self.generation,
            bounds,
        };
        let deadline = tokio::time::Instant::now() + self.settle_delay;
        let tx = self.recenter_tx.clone();
        self.pending_recenter = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(request);
        }));
        self.phase = RefreshPhase::RecenterScheduled;
        tracing::debug!(
            "recenter: scheduled gen={} in {:?}",
            self.generation,
            self.settle_delay
        );
    }

    fn cancel_recenter(&mut self) {
        if let Some(handle) = self.pending_recenter.take() {
            handle.abort();
            tracing::debug!("recenter: cancelled pending timer");
        }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.cancel_recenter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    const SETTLE: Duration = Duration::from_millis(100);

    fn tree_with(children: usize) -> TreeNode {
        TreeNode::new("root").with_id("r").with_children(
            (0..children)
                .map(|i| TreeNode::new(format!("w{i}")).with_id(format!("c{i}")))
                .collect(),
        )
    }

    fn controller() -> (RefreshController, mpsc::UnboundedReceiver<RecenterRequest>) {
        RefreshController::new(LayoutConfig::default(), SETTLE)
    }

    #[tokio::test(start_paused = true)]
    async fn first_tree_lays_out_and_recenters_once() {
        let (mut ctl, mut rx) = controller();
        assert_eq!(ctl.phase(), RefreshPhase::Idle);

        let outcome = ctl.submit(Some(&tree_with(2))).unwrap();
        assert_eq!(outcome, RefreshOutcome::Relaid { nodes: 3, edges: 2 });
        assert_eq!(ctl.phase(), RefreshPhase::RecenterScheduled);

        let request = rx.recv().await.unwrap();
        let bounds = ctl.accept_recenter(request).unwrap();
        assert_eq!(Some(bounds), ctl.graph().bounds());
        assert_eq!(ctl.phase(), RefreshPhase::Rendered);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_changes_fires_one_recenter_for_the_last_tree() {
        let (mut ctl, mut rx) = controller();

        for children in 1..=5 {
            ctl.submit(Some(&tree_with(children))).unwrap();
            tokio::time::advance(Duration::from_millis(20)).await;
        }
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        let request = rx.recv().await.unwrap();
        let final_bounds = ctl.graph().bounds().unwrap();
        assert_eq!(ctl.accept_recenter(request), Some(final_bounds));
        // Five leaves: 5·150 + 4·50 wide, centred on zero.
        assert_eq!(final_bounds.min_x, -475.0);
        assert_eq!(final_bounds.max_x, 475.0);

        tokio::time::advance(SETTLE * 10).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn identical_tree_is_not_relaid() {
        let (mut ctl, mut rx) = controller();
        let tree = tree_with(3);

        ctl.submit(Some(&tree)).unwrap();
        let graph = ctl.graph();
        let request = rx.recv().await.unwrap();
        assert!(ctl.accept_recenter(request).is_some());

        assert_eq!(ctl.submit(Some(&tree.clone())).unwrap(), RefreshOutcome::Unchanged);
        assert!(Arc::ptr_eq(&graph, &ctl.graph()));
        assert_eq!(ctl.phase(), RefreshPhase::Rendered);

        tokio::time::advance(SETTLE * 2).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_request_is_rejected() {
        let (mut ctl, _rx) = controller();
        ctl.submit(Some(&tree_with(1))).unwrap();
        let stale = RecenterRequest {
            generation: ctl.generation(),
            bounds: ctl.graph().bounds().unwrap(),
        };
        ctl.submit(Some(&tree_with(2))).unwrap();
        assert_eq!(ctl.accept_recenter(stale), None);
        assert_eq!(ctl.phase(), RefreshPhase::RecenterScheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_clears_and_cancels() {
        let (mut ctl, mut rx) = controller();
        ctl.submit(Some(&tree_with(2))).unwrap();

        assert_eq!(ctl.submit(None).unwrap(), RefreshOutcome::Emptied);
        assert_eq!(ctl.phase(), RefreshPhase::Empty);
        assert!(ctl.graph().is_empty());
        assert_eq!(ctl.graph().edges.len(), 0);
        assert_eq!(ctl.submit(None).unwrap(), RefreshOutcome::Unchanged);

        tokio::time::advance(SETTLE * 2).await;
        tokio::task::yield_now().await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        // The same tree comes back after an empty spell: laid out again.
        let outcome = ctl.submit(Some(&tree_with(2))).unwrap();
        assert_eq!(outcome, RefreshOutcome::Relaid { nodes: 3, edges: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn layout_error_keeps_previous_graph() {
        let config = LayoutConfig {
            max_depth: 2,
            ..LayoutConfig::default()
        };
        let (mut ctl, _rx) = RefreshController::new(config, SETTLE);
        ctl.submit(Some(&tree_with(2))).unwrap();
        let before = ctl.graph();

        let mut deep = TreeNode::new("bottom");
        for _ in 0..4 {
            deep = TreeNode::new("up").with_children(vec![deep]);
        }
        assert!(ctl.submit(Some(&deep)).is_err());
        assert!(Arc::ptr_eq(&before, &ctl.graph()));
        assert_eq!(ctl.phase(), RefreshPhase::RecenterScheduled);
    }
}
