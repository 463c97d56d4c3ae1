//! Background execution of a single utility function

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{error, info};

use crate::hub::console::Console;
use crate::hub::function::{Args, UtilityFunction};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("a function is already running")]
    Busy,
    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs at most one function at a time on a worker thread
#[derive(Debug, Clone, Default)]
pub struct Runner {
    running: Arc<AtomicBool>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start `function` on a worker thread. The console receives the
    /// function's output, the result lines, then a `Finished` event.
    pub fn spawn(
        &self,
        function: UtilityFunction,
        args: Args,
        console: Console,
    ) -> Result<JoinHandle<()>, RunnerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunnerError::Busy);
        }

        info!(function = %function.name(), "starting execution");
        let running = Arc::clone(&self.running);
        let spawned = thread::Builder::new()
            .name(format!("hub-{}", function.name()))
            .spawn(move || {
                let success = execute(&function, &args, &console);
                running.store(false, Ordering::Release);
                console.finished(success);
            });

        spawned.map_err(|e| {
            self.running.store(false, Ordering::Release);
            RunnerError::Spawn(e)
        })
    }
}

/// Call `function` and print its result. Returns false on error or panic.
pub fn execute(function: &UtilityFunction, args: &Args, console: &Console) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| function.call(args, console))) {
        Ok(Ok(result)) => {
            if let Some(value) = result {
                console.println(format!("\nResult: {value}"));
            }
            console.println("\nExecution completed.");
            info!(function = %function.name(), "execution completed");
            true
        }
        Ok(Err(e)) => {
            error!(function = %function.name(), error = %e, "execution failed");
            console.println(format!("\nError during execution: {e:#}"));
            false
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(function = %function.name(), panic = %message, "execution panicked");
            console.println(format!("\nError during execution: {message}"));
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "function panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::console::{ConsoleEvent, drain_text};
    use crate::types::{FunctionSpec, Value};
    use anyhow::bail;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_execute_prints_result() {
        let function = UtilityFunction::new(FunctionSpec::new("answer", ""), |_, console| {
            console.println("thinking");
            Ok(Some(Value::Int(42)))
        });
        let (console, rx) = Console::new();
        assert!(execute(&function, &Args::new(), &console));
        assert_eq!(drain_text(&rx), "thinking\n\nResult: 42\n\nExecution completed.\n");
    }

    #[test]
    fn test_execute_without_result() {
        let function = UtilityFunction::new(FunctionSpec::new("quiet", ""), |_, _| Ok(None));
        let (console, rx) = Console::new();
        assert!(execute(&function, &Args::new(), &console));
        assert_eq!(drain_text(&rx), "\nExecution completed.\n");
    }

    #[test]
    fn test_execute_reports_error() {
        let function = UtilityFunction::new(FunctionSpec::new("broken", ""), |_, _| bail!("disk on fire"));
        let (console, rx) = Console::new();
        assert!(!execute(&function, &Args::new(), &console));
        assert_eq!(drain_text(&rx), "\nError during execution: disk on fire\n");
    }

    #[test]
    fn test_execute_catches_panic() {
        let function = UtilityFunction::new(FunctionSpec::new("boom", ""), |_, _| panic!("kaboom"));
        let (console, rx) = Console::new();
        assert!(!execute(&function, &Args::new(), &console));
        assert_eq!(drain_text(&rx), "\nError during execution: kaboom\n");
    }

    #[test]
    fn test_spawn_sends_finished_and_resets() {
        let runner = Runner::new();
        let function = UtilityFunction::new(FunctionSpec::new("ok", ""), |_, _| Ok(None));
        let (console, rx) = Console::new();
        let handle = runner.spawn(function, Args::new(), console).unwrap();
        handle.join().unwrap();
        assert!(!runner.is_running());
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.last(), Some(&ConsoleEvent::Finished { success: true }));
    }

    #[test]
    fn test_second_spawn_while_running_is_rejected() {
        let runner = Runner::new();
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate_rx = std::sync::Mutex::new(gate_rx);
        let function = UtilityFunction::new(FunctionSpec::new("slow", ""), move |_, _| {
            let _ = gate_rx
                .lock()
                .map(|rx| rx.recv_timeout(Duration::from_secs(5)));
            Ok(None)
        });
        let (console, _rx) = Console::new();
        let handle = runner.spawn(function.clone(), Args::new(), console.clone()).unwrap();
        assert!(runner.is_running());
        assert!(matches!(
            runner.spawn(function, Args::new(), console),
            Err(RunnerError::Busy)
        ));
        gate_tx.send(()).unwrap();
        handle.join().unwrap();
        assert!(!runner.is_running());
    }
}
