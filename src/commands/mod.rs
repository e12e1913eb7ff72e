//! JSON command language served by the default handler.
//!
//! A command is `{"cmd": <name>, "params": {...}}`; the handler answers with
//! the command's result serialized as JSON.

pub mod echo;
pub mod fibonacci;
pub mod hash;
#[cfg(feature = "image-processing")]
pub mod image_processing;
pub mod prime;
pub mod sort;

use std::sync::{Arc, Once};

use eyre::WrapErr;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::common::config::AppCfg;
use crate::common::error::{BridgeError, BridgeResult};
use crate::common::log::LogStore;
use crate::executor::domain::CommandHandler;

use echo::EchoInput;
use fibonacci::FibonacciInput;
use hash::HashDataInput;
#[cfg(feature = "image-processing")]
use image_processing::ImageProcessingInput;
use prime::FindPrimesInput;
use sort::SortNumbersInput;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params", rename_all = "snake_case")]
pub enum Command {
    /// Liveness check, answers `"pong"`.
    Ping,
    Echo(EchoInput),
    /// Drain the collected native log lines.
    Logs,
    Fibonacci(FibonacciInput),
    HashData(HashDataInput),
    SortNumbers(SortNumbersInput),
    FindPrimes(FindPrimesInput),
    #[cfg(feature = "image-processing")]
    ProcessImage(ImageProcessingInput),
}

impl Command {
    pub fn parse(raw: &[u8]) -> eyre::Result<Self> {
        serde_json::from_slice(raw).wrap_err_with(|| {
            format!(
                "failed to extract Command from raw command string: {}",
                String::from_utf8_lossy(raw)
            )
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Echo(_) => "echo",
            Command::Logs => "logs",
            Command::Fibonacci(_) => "fibonacci",
            Command::HashData(_) => "hash_data",
            Command::SortNumbers(_) => "sort_numbers",
            Command::FindPrimes(_) => "find_primes",
            #[cfg(feature = "image-processing")]
            Command::ProcessImage(_) => "process_image",
        }
    }
}

pub async fn run(cmd: &Command, logs: &LogStore) -> eyre::Result<String> {
    match cmd {
        Command::Ping => to_json(&"pong"),
        Command::Echo(input) => to_json(&echo::echo(input).await?),
        Command::Logs => to_json(&logs.drain()),
        Command::Fibonacci(input) => to_json(&fibonacci::fibonacci(input).await?),
        Command::HashData(input) => to_json(&hash::hash_data(input).await?),
        Command::SortNumbers(input) => to_json(&sort::sort_numbers(input).await?),
        Command::FindPrimes(input) => to_json(&prime::find_primes(input).await?),
        #[cfg(feature = "image-processing")]
        Command::ProcessImage(input) => to_json(&image_processing::process_image(input).await?),
    }
}

fn to_json(value: &impl Serialize) -> eyre::Result<String> {
    serde_json::to_string(value).wrap_err("failed to serialize command execution result")
}

/// Handler parsing JSON commands and driving them on a tokio runtime.
pub struct JsonCommandHandler {
    cfg: AppCfg,
    logs: Arc<LogStore>,
    runtime: OnceCell<Runtime>,
}

impl JsonCommandHandler {
    pub fn new(cfg: AppCfg, logs: Arc<LogStore>) -> Self {
        Self {
            cfg,
            logs,
            runtime: OnceCell::new(),
        }
    }

    pub fn logs(&self) -> &Arc<LogStore> {
        &self.logs
    }

    /// Built on first use so a failing start surfaces as a command error.
    fn runtime(&self) -> BridgeResult<&Runtime> {
        self.runtime.get_or_try_init(|| {
            init_rayon(self.cfg.worker_threads);
            Builder::new_multi_thread()
                .worker_threads(self.cfg.worker_threads)
                .thread_name("rnrs-worker")
                .enable_all()
                .build()
                .map_err(BridgeError::from)
        })
    }
}

impl CommandHandler for JsonCommandHandler {
    fn handle(&self, command: &[u8]) -> eyre::Result<String> {
        let cmd = Command::parse(command)?;
        let runtime = self.runtime()?;
        debug!(cmd = cmd.name(), "executing command");
        runtime.block_on(run(&cmd, &self.logs))
    }

    fn label(&self, command: &[u8]) -> String {
        Command::parse(command)
            .map(|cmd| cmd.name().to_string())
            .unwrap_or_else(|_| "Unknown".to_string())
    }
}

/// Size the global rayon pool once per process.
fn init_rayon(threads: usize) {
    static SETUP_RAYON: Once = Once::new();
    SETUP_RAYON.call_once(|| {
        if let Err(err) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            debug!("rayon pool already configured: {err}");
        }
    });
}
