//! Inference task
//!
//! Hosts a [`HandoverInference`] implementation behind a tokio channel so
//! several RRC entities can share one inference core. Requests are handled
//! strictly in arrival order; `EvaluateHandover` answers on a oneshot.

use lteho_common::{CellId, Rnti, SimTime, UeId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::service::HandoverInference;

/// Default request channel capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Task message envelope wrapping typed messages with a shutdown signal.
#[derive(Debug)]
pub enum TaskMessage<T> {
    /// Regular message payload
    Message(T),
    /// Shutdown signal - task should terminate gracefully
    Shutdown,
}

impl<T> TaskMessage<T> {
    pub fn message(msg: T) -> Self {
        TaskMessage::Message(msg)
    }

    pub fn shutdown() -> Self {
        TaskMessage::Shutdown
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, TaskMessage::Shutdown)
    }

    /// Returns the message payload if present, or None for shutdown.
    pub fn into_message(self) -> Option<T> {
        match self {
            TaskMessage::Message(msg) => Some(msg),
            TaskMessage::Shutdown => None,
        }
    }
}

/// Async actor processing messages from its receive channel.
#[async_trait::async_trait]
pub trait Task: Send + 'static {
    type Message: Send;

    /// Processes messages until `TaskMessage::Shutdown` or until every
    /// sender is dropped.
    async fn run(&mut self, rx: mpsc::Receiver<TaskMessage<Self::Message>>);
}

/// Requests of the inference contract
#[derive(Debug)]
pub enum InferenceRequest {
    UpdateServingCellId {
        time: SimTime,
        ue_id: UeId,
        cell_id: CellId,
        rnti: Rnti,
    },
    UpdateNeighbourMeasurements {
        time: SimTime,
        rnti: Rnti,
        cell_id: CellId,
        rsrp: u8,
        rsrq: u8,
    },
    EvaluateHandover {
        time: SimTime,
        rnti: Rnti,
        rsrp: u8,
        rsrq: u8,
        reply: oneshot::Sender<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Inference task is not running")]
    Closed,
    #[error("Inference task dropped the request without replying")]
    NoReply,
}

pub struct InferenceTask<S> {
    service: S,
    handled: u64,
}

impl<S: HandoverInference + Send + 'static> InferenceTask<S> {
    pub fn new(service: S) -> Self {
        Self { service, handled: 0 }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// Number of requests processed so far
    pub fn handled(&self) -> u64 {
        self.handled
    }

    fn handle(&mut self, request: InferenceRequest) {
        self.handled += 1;
        match request {
            InferenceRequest::UpdateServingCellId {
                time,
                ue_id,
                cell_id,
                rnti,
            } => self.service.update_serving_cell_id(time, ue_id, cell_id, rnti),
            InferenceRequest::UpdateNeighbourMeasurements {
                time,
                rnti,
                cell_id,
                rsrp,
                rsrq,
            } => self
                .service
                .update_neighbour_measurements(time, rnti, cell_id, rsrp, rsrq),
            InferenceRequest::EvaluateHandover {
                time,
                rnti,
                rsrp,
                rsrq,
                reply,
            } => {
                let target = self.service.evaluate_handover(time, rnti, rsrp, rsrq);
                if reply.send(target).is_err() {
                    debug!("{}: evaluation caller went away", rnti);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: HandoverInference + Send + 'static> Task for InferenceTask<S> {
    type Message = InferenceRequest;

    async fn run(&mut self, mut rx: mpsc::Receiver<TaskMessage<Self::Message>>) {
        info!("Inference task started");
        loop {
            match rx.recv().await {
                Some(TaskMessage::Message(request)) => self.handle(request),
                Some(TaskMessage::Shutdown) | None => break,
            }
        }
        info!("Inference task stopped after {} request(s)", self.handled);
    }
}

/// Cloneable sender side of an [`InferenceTask`]
#[derive(Debug, Clone)]
pub struct InferenceHandle {
    tx: mpsc::Sender<TaskMessage<InferenceRequest>>,
}

impl InferenceHandle {
    pub fn new(tx: mpsc::Sender<TaskMessage<InferenceRequest>>) -> Self {
        Self { tx }
    }

    async fn send(&self, request: InferenceRequest) -> Result<(), TaskError> {
        self.tx
            .send(TaskMessage::Message(request))
            .await
            .map_err(|_| TaskError::Closed)
    }

    pub async fn update_serving_cell_id(
        &self,
        time: SimTime,
        ue_id: UeId,
        cell_id: CellId,
        rnti: Rnti,
    ) -> Result<(), TaskError> {
        self.send(InferenceRequest::UpdateServingCellId {
            time,
            ue_id,
            cell_id,
            rnti,
        })
        .await
    }

    pub async fn update_neighbour_measurements(
        &self,
        time: SimTime,
        rnti: Rnti,
        cell_id: CellId,
        rsrp: u8,
        rsrq: u8,
    ) -> Result<(), TaskError> {
        self.send(InferenceRequest::UpdateNeighbourMeasurements {
            time,
            rnti,
            cell_id,
            rsrp,
            rsrq,
        })
        .await
    }

    /// Target cell id, 0 to abstain
    pub async fn evaluate_handover(
        &self,
        time: SimTime,
        rnti: Rnti,
        rsrp: u8,
        rsrq: u8,
    ) -> Result<u16, TaskError> {
        let (reply, rx) = oneshot::channel();
        self.send(InferenceRequest::EvaluateHandover {
            time,
            rnti,
            rsrp,
            rsrq,
            reply,
        })
        .await?;
        rx.await.map_err(|_| TaskError::NoReply)
    }

    pub async fn shutdown(&self) -> Result<(), TaskError> {
        self.tx
            .send(TaskMessage::Shutdown)
            .await
            .map_err(|_| TaskError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawns `service` on the current runtime. The join handle yields the
/// service back once the task stops.
pub fn spawn_inference_task<S>(service: S, capacity: usize) -> (InferenceHandle, JoinHandle<S>)
where
    S: HandoverInference + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let mut task = InferenceTask::new(service);
    let join = tokio::spawn(async move {
        task.run(rx).await;
        task.into_service()
    });
    (InferenceHandle::new(tx), join)
}
