//! sandbox runtime bridge: owns the execution context for one preview slot
//!
//! ```text
//! Idle ──change/refresh──▶ Assembling ──context created──▶ Running
//!   ▲                          │                              │
//!   └── not composable / ──────┘        change/refresh ◀──────┘
//!       construction failed
//! any ──unmount──▶ Destroyed
//! ```
//!
//! at most one context exists at a time: the previous one is dropped before
//! the next document is handed to the factory. each context is created with
//! a fresh generation number, and telemetry from any other generation is
//! discarded on drain

pub mod context;
pub mod telemetry;

use crate::compose::{self, PreviewOptions};
use crate::constants::SANDBOX_PERMISSIONS;
use crate::error::{ComposeError, SandboxError};
use crate::project::FileSet;
use telemetry::{LogEntry, TelemetryChannel, TelemetrySender};

/// capabilities granted to the isolated document
///
/// storage access and top-level navigation of the host are never granted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    permissions: Vec<String>,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            permissions: SANDBOX_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl SandboxPolicy {
    pub fn allows(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// value for an iframe `sandbox` attribute
    pub fn attribute(&self) -> String {
        self.permissions.join(" ")
    }
}

/// creates isolated execution contexts; dropping a context tears it down
pub trait ContextFactory {
    type Context;

    fn create(
        &mut self,
        document: &str,
        policy: &SandboxPolicy,
        telemetry: TelemetrySender,
    ) -> Result<Self::Context, SandboxError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Assembling,
    Running { generation: u64 },
    Destroyed,
}

/// result of a successful reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Running { generation: u64 },
    /// the file set has no html file; show an informational view instead
    NotComposable,
}

pub struct PreviewBridge<F: ContextFactory> {
    factory: F,
    policy: SandboxPolicy,
    options: PreviewOptions,
    state: PreviewState,
    generation: u64,
    context: Option<F::Context>,
    telemetry: TelemetryChannel,
}

impl<F: ContextFactory> PreviewBridge<F> {
    pub fn new(factory: F, options: PreviewOptions) -> Self {
        Self::with_policy(factory, options, SandboxPolicy::default())
    }

    pub fn with_policy(factory: F, options: PreviewOptions, policy: SandboxPolicy) -> Self {
        Self {
            factory,
            policy,
            options,
            state: PreviewState::Idle,
            generation: 0,
            context: None,
            telemetry: TelemetryChannel::new(),
        }
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn options(&self) -> PreviewOptions {
        self.options
    }

    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    /// the live context, if one is running
    pub fn context(&self) -> Option<&F::Context> {
        self.context.as_ref()
    }

    /// the file set changed
    pub fn update(&mut self, files: &FileSet) -> Result<PreviewOutcome, SandboxError> {
        self.reload(files)
    }

    /// debug mode or mobile emulation changed; reloads only on an actual change
    pub fn set_options(
        &mut self,
        files: &FileSet,
        options: PreviewOptions,
    ) -> Result<Option<PreviewOutcome>, SandboxError> {
        if self.state == PreviewState::Destroyed {
            return Err(SandboxError::Unmounted);
        }
        if options == self.options {
            return Ok(None);
        }
        self.options = options;
        self.reload(files).map(Some)
    }

    /// reload even without a content change, e.g. to recover a wedged context
    pub fn refresh(&mut self, files: &FileSet) -> Result<PreviewOutcome, SandboxError> {
        self.reload(files)
    }

    /// telemetry from the running context, in production order
    pub fn drain_telemetry(&mut self) -> Vec<LogEntry> {
        let current = match self.state {
            PreviewState::Running { generation } => Some(generation),
            _ => None,
        };
        self.telemetry.drain(current)
    }

    /// the host removed the preview; no further reloads are accepted
    pub fn unmount(&mut self) {
        self.context = None;
        self.state = PreviewState::Destroyed;
    }

    fn reload(&mut self, files: &FileSet) -> Result<PreviewOutcome, SandboxError> {
        if self.state == PreviewState::Destroyed {
            return Err(SandboxError::Unmounted);
        }

        self.state = PreviewState::Assembling;
        self.context = None;
        self.generation += 1;

        let document = match compose::compose(files, self.options) {
            Ok(document) => document,
            Err(ComposeError::NotComposable) => {
                self.state = PreviewState::Idle;
                return Ok(PreviewOutcome::NotComposable);
            }
        };

        let sender = self.telemetry.sender(self.generation);
        match self.factory.create(&document, &self.policy, sender) {
            Ok(context) => {
                self.context = Some(context);
                self.state = PreviewState::Running {
                    generation: self.generation,
                };
                Ok(PreviewOutcome::Running {
                    generation: self.generation,
                })
            }
            Err(e) => {
                self.state = PreviewState::Idle;
                Err(e)
            }
        }
    }
}
