use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use autoflow_core::{Effect, Msg};
use autoflow_logging::{flow_debug, flow_error};

use crate::backend::AutomationBackend;
use crate::poller::{now_ms, StatusPoller, DEFAULT_POLL_INTERVAL};
use crate::runner::EffectRunner;

/// Interval of the `Msg::Tick` clock that drives save debouncing and toast expiry.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

enum BridgeCommand {
    Run(Effect),
    LoadSettings,
    PickFiles,
    PickDirectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    /// `None` disables status polling.
    pub poll_interval: Option<Duration>,
    /// `None` disables the tick clock.
    pub tick_interval: Option<Duration>,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            poll_interval: Some(DEFAULT_POLL_INTERVAL),
            tick_interval: Some(DEFAULT_TICK_INTERVAL),
        }
    }
}

/// Owns a background thread with a tokio runtime that executes effects, polls
/// the backend and emits ticks. Results come back as messages through `try_recv`.
///
/// Commands run one at a time in submission order, so a later save always
/// lands after an earlier one.
pub struct BridgeHandle {
    cmd_tx: mpsc::Sender<BridgeCommand>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl BridgeHandle {
    pub fn new(backend: Arc<dyn AutomationBackend>) -> Self {
        Self::with_options(backend, BridgeOptions::default())
    }

    pub fn with_options(backend: Arc<dyn AutomationBackend>, options: BridgeOptions) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (msg_tx, msg_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    flow_error!("Failed to start bridge runtime: {}", err);
                    return;
                }
            };
            let runner = EffectRunner::new(backend.clone());

            if let Some(interval) = options.poll_interval {
                let poll_tx = msg_tx.clone();
                let poller = StatusPoller::with_interval(backend, interval);
                runtime.spawn(poller.run(move |msg| poll_tx.send(msg).is_ok()));
            }
            if let Some(interval) = options.tick_interval {
                runtime.spawn(run_ticks(interval, msg_tx.clone()));
            }

            while let Ok(command) = cmd_rx.recv() {
                if let Some(msg) = runtime.block_on(handle_command(&runner, command)) {
                    let _ = msg_tx.send(msg);
                }
            }
        });

        Self { cmd_tx, msg_rx }
    }

    pub fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self.cmd_tx.send(BridgeCommand::Run(effect));
        }
    }

    pub fn load_settings(&self) {
        let _ = self.cmd_tx.send(BridgeCommand::LoadSettings);
    }

    pub fn pick_files(&self) {
        let _ = self.cmd_tx.send(BridgeCommand::PickFiles);
    }

    pub fn pick_directory(&self) {
        let _ = self.cmd_tx.send(BridgeCommand::PickDirectory);
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.msg_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.msg_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(runner: &EffectRunner, command: BridgeCommand) -> Option<Msg> {
    match command {
        BridgeCommand::Run(effect) => runner.execute(effect).await,
        BridgeCommand::LoadSettings => Some(runner.load_settings().await),
        BridgeCommand::PickFiles => Some(runner.pick_files().await),
        BridgeCommand::PickDirectory => Some(runner.pick_directory().await),
    }
}

async fn run_ticks(interval: Duration, msg_tx: mpsc::Sender<Msg>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        if msg_tx.send(Msg::Tick { now_ms: now_ms() }).is_err() {
            flow_debug!("Tick receiver dropped; stopping clock");
            return;
        }
    }
}
