//! telemetry channel between execution contexts and the host
//!
//! every context gets a [`TelemetrySender`] stamped with the generation it
//! was created for. the host drains the shared queue and keeps only
//! envelopes from the current generation, so output from a context that has
//! already been torn down is dropped

use crate::constants::TELEMETRY_SOURCE;
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryKind {
    Log,
    Error,
    Warn,
    Info,
}

/// message posted by the instrumentation block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: TelemetryKind,
    pub message: String,
}

impl TelemetryMessage {
    pub fn new(kind: TelemetryKind, message: impl Into<String>) -> Self {
        Self {
            source: TELEMETRY_SOURCE.to_string(),
            kind,
            message: message.into(),
        }
    }

    pub fn is_ours(&self) -> bool {
        self.source == TELEMETRY_SOURCE
    }
}

/// a telemetry message accepted by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: TelemetryKind,
    pub message: String,
    /// milliseconds since the unix epoch, stamped on arrival
    pub timestamp: i64,
}

#[derive(Debug)]
struct Envelope {
    generation: u64,
    message: TelemetryMessage,
    received_at: i64,
}

/// handle given to one execution context for reporting back to the host
#[derive(Debug, Clone)]
pub struct TelemetrySender {
    generation: u64,
    tx: Sender<Envelope>,
}

impl TelemetrySender {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// queue a message; messages from other sources are ignored.
    /// returns false once the host side is gone
    pub fn send(&self, message: TelemetryMessage) -> bool {
        if !message.is_ours() {
            return true;
        }
        self.tx
            .send(Envelope {
                generation: self.generation,
                message,
                received_at: chrono::Utc::now().timestamp_millis(),
            })
            .is_ok()
    }

    /// forward a raw `postMessage` payload; anything that is not a telemetry
    /// message is ignored
    pub fn post_json(&self, payload: &str) -> bool {
        match serde_json::from_str::<TelemetryMessage>(payload) {
            Ok(message) => self.send(message),
            Err(_) => true,
        }
    }
}

/// host end of the telemetry queue
#[derive(Debug)]
pub struct TelemetryChannel {
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
}

impl Default for TelemetryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryChannel {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self, generation: u64) -> TelemetrySender {
        TelemetrySender {
            generation,
            tx: self.tx.clone(),
        }
    }

    /// take everything queued so far, keeping only entries from `current`
    /// in the order they were produced
    pub fn drain(&self, current: Option<u64>) -> Vec<LogEntry> {
        self.rx
            .try_iter()
            .filter(|envelope| Some(envelope.generation) == current)
            .map(|envelope| LogEntry {
                kind: envelope.message.kind,
                message: envelope.message.message,
                timestamp: envelope.received_at,
            })
            .collect()
    }
}
