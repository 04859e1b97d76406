pub mod config;
pub mod error;
pub mod partitioner;
pub mod policy;
pub mod stitcher;
pub mod transport;

use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use futures::future::join_all;
use log::{debug, error, info, warn};
use shared::{
    dtos::fragment_response::FragmentResponse,
    models::{
        fractal::is_valid_escape_code,
        fragments::{partition_result::PartitionResult, work_unit::WorkUnit},
        render_grid::RenderGrid,
        viewport::Viewport,
    },
    networking::NodeAddress,
};
use uuid::Uuid;

use self::{
    config::DispatcherConfig,
    error::{DispatchError, PartitionFailure, RenderError},
    partitioner::partition,
    policy::{AssignmentStrategy, RetryPolicy, RoundRobin},
    stitcher::stitch,
    transport::{FragmentTransport, HttpTransport},
};

/// Splits a viewport across compute nodes and reassembles their answers.
///
/// A render either returns the complete grid or fails as a whole.
pub struct Dispatcher<T> {
    transport: Arc<T>,
    strategy: Box<dyn AssignmentStrategy>,
    config: DispatcherConfig,
}

impl Dispatcher<HttpTransport> {
    pub fn http(config: DispatcherConfig) -> Result<Self, RenderError> {
        let transport =
            HttpTransport::new(config.timeout).map_err(|e| RenderError::Transport(e.to_string()))?;
        Ok(Self::new(transport, config))
    }
}

impl<T> Dispatcher<T>
where
    T: FragmentTransport + 'static,
{
    pub fn new(transport: T, config: DispatcherConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            strategy: Box::new(RoundRobin),
            config,
        }
    }

    pub fn with_strategy(mut self, strategy: impl AssignmentStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Partitions the viewport and assigns every partition to a node.
    pub fn work_units(
        &self,
        viewport: &Viewport,
        nodes: &[NodeAddress],
    ) -> Result<Vec<WorkUnit>, RenderError> {
        if nodes.is_empty() {
            return Err(RenderError::NoNodes);
        }
        let count = match self.config.partitions {
            Some(count) => count,
            None => NonZeroUsize::new(nodes.len()).ok_or(RenderError::NoNodes)?,
        };

        let partitions = partition(viewport, count);
        if partitions.is_empty() {
            return Err(RenderError::EmptyViewport);
        }

        partitions
            .into_iter()
            .map(|partition| {
                let node = self
                    .strategy
                    .assign(partition.index, nodes)
                    .ok_or(RenderError::NoNodes)?;
                Ok(partition.assign(viewport, node))
            })
            .collect()
    }

    /// Renders `viewport` on `nodes`. Every partition request is in flight at once; the
    /// render waits for all of them and fails if any one failed.
    pub async fn render(
        &self,
        viewport: &Viewport,
        nodes: &[NodeAddress],
    ) -> Result<RenderGrid, RenderError> {
        let render_id = Uuid::new_v4();
        let units = self.work_units(viewport, nodes)?;
        info!(
            "[{}] Rendering {}x{} (max_iter {}) as {} partitions over {} nodes",
            render_id,
            viewport.resolution.nx,
            viewport.resolution.ny,
            viewport.max_iteration,
            units.len(),
            nodes.len()
        );

        let handles: Vec<_> = units
            .iter()
            .cloned()
            .map(|unit| {
                let transport = Arc::clone(&self.transport);
                let timeout = self.config.timeout;
                let retry = self.config.retry;
                tokio::spawn(async move {
                    dispatch_unit(transport.as_ref(), &unit, timeout, retry).await
                })
            })
            .collect();

        let outcomes = join_all(handles).await;

        let mut slots: Vec<Option<PartitionResult>> = (0..units.len()).map(|_| None).collect();
        let mut failures = Vec::new();
        for (unit, outcome) in units.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|e| Err(DispatchError::Aborted(e.to_string())));
            match outcome {
                Ok(result) => {
                    debug!(
                        "[{}] Partition {} received from {}",
                        render_id, unit.index, unit.node
                    );
                    let index = result.unit_index;
                    slots[index] = Some(result);
                }
                Err(cause) => {
                    error!(
                        "[{}] Partition {} on {} failed: {}",
                        render_id, unit.index, unit.node, cause
                    );
                    failures.push(PartitionFailure {
                        index: unit.index,
                        node: unit.node.clone(),
                        cause,
                    });
                }
            }
        }

        if !failures.is_empty() {
            error!(
                "[{}] Render abandoned, {} of {} partitions failed",
                render_id,
                failures.len(),
                units.len()
            );
            return Err(RenderError::Partial {
                total: units.len(),
                failures,
            });
        }

        let results = slots.into_iter().flatten().collect();
        let grid = stitch(viewport.resolution, &units, results)?;
        info!(
            "[{}] Render complete, {}x{} grid",
            render_id,
            grid.width(),
            grid.height()
        );
        Ok(grid)
    }
}

/// Sends one unit, retrying per `retry`, and checks the answer against what was asked.
async fn dispatch_unit<T>(
    transport: &T,
    unit: &WorkUnit,
    timeout: Duration,
    retry: RetryPolicy,
) -> Result<PartitionResult, DispatchError>
where
    T: FragmentTransport + ?Sized,
{
    let mut retries = 0;
    loop {
        let outcome = match tokio::time::timeout(timeout, transport.fetch(unit)).await {
            Ok(fetched) => fetched.and_then(|response| into_partition_result(unit, response)),
            Err(_) => Err(DispatchError::Timeout { after: timeout }),
        };

        match outcome {
            Ok(result) => return Ok(result),
            Err(e) if retries < retry.max_retries => {
                retries += 1;
                let delay = retry.delay_for(retries);
                warn!(
                    "Partition {} on {} failed ({}), retry {}/{} in {:?}",
                    unit.index, unit.node, e, retries, retry.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn into_partition_result(
    unit: &WorkUnit,
    response: FragmentResponse,
) -> Result<PartitionResult, DispatchError> {
    if !unit.real().matches_echo(&response.c_real) {
        return Err(DispatchError::EchoMismatch {
            axis: "real",
            sent: unit.real(),
            echoed: response.c_real,
        });
    }
    if !unit.imaginary().matches_echo(&response.c_imag) {
        return Err(DispatchError::EchoMismatch {
            axis: "imaginary",
            sent: unit.imaginary(),
            echoed: response.c_imag,
        });
    }

    if response.data.len() != unit.col_count as usize {
        return Err(DispatchError::Shape(format!(
            "{} columns, expected {}",
            response.data.len(),
            unit.col_count
        )));
    }
    for (column, codes) in response.data.iter().enumerate() {
        if codes.len() != unit.row_count as usize {
            return Err(DispatchError::Shape(format!(
                "column {} has {} rows, expected {}",
                column,
                codes.len(),
                unit.row_count
            )));
        }
        if let Some(&code) = codes.iter().find(|&&code| !is_valid_escape_code(code)) {
            return Err(DispatchError::InvalidCode(code));
        }
    }

    Ok(PartitionResult::new(unit.index, response.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::models::{fractal::mandelbrot::Mandelbrot, range::AxisRange};
    use std::{
        collections::{HashMap, HashSet},
        sync::Mutex,
    };

    /// In-process node that computes like a real one and can be told to misbehave.
    #[derive(Default)]
    struct FakeTransport {
        fail: HashSet<usize>,
        hang: HashSet<usize>,
        truncate: HashSet<usize>,
        delay_ms: HashMap<usize, u64>,
        /// Every partition fails this many times before it succeeds.
        flaky_attempts: u32,
        attempts: Mutex<HashMap<usize, u32>>,
        calls: Mutex<Vec<(usize, String)>>,
    }

    #[async_trait]
    impl FragmentTransport for FakeTransport {
        async fn fetch(&self, unit: &WorkUnit) -> Result<FragmentResponse, DispatchError> {
            self.calls
                .lock()
                .unwrap()
                .push((unit.index, unit.node.to_string()));
            let attempt = {
                let mut attempts = self.attempts.lock().unwrap();
                let attempt = attempts.entry(unit.index).or_insert(0);
                *attempt += 1;
                *attempt
            };

            if let Some(&ms) = self.delay_ms.get(&unit.index) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            if self.hang.contains(&unit.index) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.fail.contains(&unit.index) || attempt <= self.flaky_attempts {
                return Err(DispatchError::Status {
                    status: 500,
                    body: "forced failure".to_string(),
                });
            }

            let c_real = unit.real();
            let c_imag = unit.imaginary();
            let mut data = Mandelbrot::new(unit.max_iteration).compute(
                &c_real.samples(unit.col_count as usize),
                &c_imag.samples(unit.row_count as usize),
            );
            if self.truncate.contains(&unit.index) {
                data.pop();
            }
            Ok(FragmentResponse {
                c_real,
                c_imag,
                data,
            })
        }
    }

    fn nodes(names: &[&str]) -> Vec<NodeAddress> {
        names.iter().map(|name| name.parse().unwrap()).collect()
    }

    fn classic_view() -> Viewport {
        Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, 300, 200, 100).unwrap()
    }

    fn reference_column(viewport: &Viewport, x: usize) -> Vec<u16> {
        let re = viewport.real().sample(x, viewport.columns());
        let im = viewport.imaginary().samples(viewport.rows());
        Mandelbrot::new(viewport.max_iteration).compute(&[re], &im).remove(0)
    }

    #[tokio::test]
    async fn render_produces_full_grid_matching_direct_computation() {
        let viewport = classic_view();
        let dispatcher = Dispatcher::new(FakeTransport::default(), DispatcherConfig::default());

        let grid = dispatcher
            .render(&viewport, &nodes(&["a:1", "b:1", "c:1"]))
            .await
            .unwrap();

        assert_eq!((grid.width(), grid.height()), (300, 200));
        // first column of every partition is sampled at exactly the viewport's own sample
        for x in [0, 100, 200, 299] {
            assert_eq!(grid.column(x).unwrap(), &reference_column(&viewport, x)[..]);
        }
    }

    #[tokio::test]
    async fn out_of_order_arrival_does_not_change_the_grid() {
        let viewport = Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, 40, 30, 50).unwrap();
        let node_list = nodes(&["a:1", "b:1", "c:1", "d:1"]);

        let in_order = Dispatcher::new(FakeTransport::default(), DispatcherConfig::default())
            .render(&viewport, &node_list)
            .await
            .unwrap();

        let reversed = FakeTransport {
            delay_ms: HashMap::from([(0, 80), (1, 60), (2, 40), (3, 0)]),
            ..Default::default()
        };
        let shuffled = Dispatcher::new(reversed, DispatcherConfig::default())
            .render(&viewport, &node_list)
            .await
            .unwrap();

        assert_eq!(in_order, shuffled);
    }

    #[tokio::test]
    async fn one_failed_partition_fails_the_render() {
        let transport = FakeTransport {
            fail: HashSet::from([1]),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(transport, DispatcherConfig::default());

        let err = dispatcher
            .render(&classic_view(), &nodes(&["a:1", "b:1", "c:1"]))
            .await
            .unwrap_err();

        match err {
            RenderError::Partial { total, failures } => {
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert_eq!(failures[0].node.as_str(), "b:1");
                assert!(matches!(
                    failures[0].cause,
                    DispatchError::Status { status: 500, .. }
                ));
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
        // siblings were still sent
        assert_eq!(dispatcher.transport.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unresponsive_node_times_out() {
        let transport = FakeTransport {
            hang: HashSet::from([0]),
            ..Default::default()
        };
        let config = DispatcherConfig {
            timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let err = Dispatcher::new(transport, config)
            .render(&classic_view(), &nodes(&["a:1", "b:1"]))
            .await
            .unwrap_err();

        let RenderError::Partial { failures, .. } = err else {
            panic!("expected partial failure");
        };
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].cause, DispatchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn malformed_response_shape_fails_the_partition() {
        let transport = FakeTransport {
            truncate: HashSet::from([0]),
            ..Default::default()
        };
        let err = Dispatcher::new(transport, DispatcherConfig::default())
            .render(&classic_view(), &nodes(&["a:1", "b:1"]))
            .await
            .unwrap_err();

        let RenderError::Partial { failures, .. } = err else {
            panic!("expected partial failure");
        };
        assert!(matches!(failures[0].cause, DispatchError::Shape(_)));
    }

    #[tokio::test]
    async fn retry_policy_recovers_transient_failures() {
        let viewport = Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, 20, 10, 20).unwrap();
        let node_list = nodes(&["a:1", "b:1"]);

        let without_retry = Dispatcher::new(
            FakeTransport {
                flaky_attempts: 1,
                ..Default::default()
            },
            DispatcherConfig::default(),
        );
        assert!(without_retry.render(&viewport, &node_list).await.is_err());

        let with_retry = Dispatcher::new(
            FakeTransport {
                flaky_attempts: 1,
                ..Default::default()
            },
            DispatcherConfig {
                retry: RetryPolicy::new(2, Duration::from_millis(1)),
                ..Default::default()
            },
        );
        let grid = with_retry.render(&viewport, &node_list).await.unwrap();
        assert_eq!(grid.width(), 20);
        assert_eq!(with_retry.transport.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn partitions_are_assigned_round_robin() {
        let config = DispatcherConfig {
            partitions: NonZeroUsize::new(5),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(FakeTransport::default(), config);
        let viewport = Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, 50, 10, 20).unwrap();

        let assigned: Vec<String> = dispatcher
            .work_units(&viewport, &nodes(&["A", "B"]))
            .unwrap()
            .iter()
            .map(|unit| unit.node.to_string())
            .collect();
        assert_eq!(assigned, ["A", "B", "A", "B", "A"]);

        dispatcher.render(&viewport, &nodes(&["A", "B"])).await.unwrap();
        let mut calls = dispatcher.transport.calls.lock().unwrap().clone();
        calls.sort();
        let expected: Vec<(usize, String)> = ["A", "B", "A", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, node)| (i, node.to_string()))
            .collect();
        assert_eq!(calls, expected);
    }

    #[tokio::test]
    async fn custom_strategy_replaces_round_robin() {
        struct AlwaysLast;
        impl AssignmentStrategy for AlwaysLast {
            fn assign(&self, _index: usize, nodes: &[NodeAddress]) -> Option<NodeAddress> {
                nodes.last().cloned()
            }
        }

        let dispatcher = Dispatcher::new(FakeTransport::default(), DispatcherConfig::default())
            .with_strategy(AlwaysLast);
        let units = dispatcher
            .work_units(&classic_view(), &nodes(&["A", "B", "C"]))
            .unwrap();
        assert!(units.iter().all(|unit| unit.node.as_str() == "C"));
    }

    #[tokio::test]
    async fn empty_node_list_is_rejected() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), DispatcherConfig::default());
        assert!(matches!(
            dispatcher.render(&classic_view(), &[]).await,
            Err(RenderError::NoNodes)
        ));
    }

    #[test]
    fn echoed_ranges_must_match_the_request() {
        let viewport = classic_view();
        let unit = partition(&viewport, NonZeroUsize::new(1).unwrap())
            .remove(0)
            .assign(&viewport, "a:1".parse().unwrap());
        let response = FragmentResponse {
            c_real: AxisRange::new(-2.0, 0.0),
            c_imag: unit.imaginary(),
            data: Vec::new(),
        };
        assert!(matches!(
            into_partition_result(&unit, response),
            Err(DispatchError::EchoMismatch { axis: "real", .. })
        ));
    }

    #[test]
    fn echo_drift_in_the_last_digit_is_accepted() {
        let viewport = classic_view();
        let unit = partition(&viewport, NonZeroUsize::new(10).unwrap())
            .remove(0)
            .assign(&viewport, "a:1".parse().unwrap());
        let sent = unit.real();
        let nudge = |x: f64| f64::from_bits(x.to_bits() + 1);
        let response = FragmentResponse {
            c_real: AxisRange::new(sent.min, nudge(sent.max)),
            c_imag: unit.imaginary(),
            data: vec![vec![1; unit.row_count as usize]; unit.col_count as usize],
        };

        let result = into_partition_result(&unit, response).unwrap();
        assert_eq!(result.unit_index, 0);
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        let viewport = Viewport::from_bounds(-2.0, -1.0, 1.0, 1.0, 1, 2, 10).unwrap();
        let unit = partition(&viewport, NonZeroUsize::new(1).unwrap())
            .remove(0)
            .assign(&viewport, "a:1".parse().unwrap());
        let response = FragmentResponse {
            c_real: unit.real(),
            c_imag: unit.imaginary(),
            data: vec![vec![3, 257]],
        };
        assert!(matches!(
            into_partition_result(&unit, response),
            Err(DispatchError::InvalidCode(257))
        ));
    }
}
