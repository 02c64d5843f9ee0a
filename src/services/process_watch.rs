//! Liveness check for the external launcher process.

use anyhow::{bail, Result};
use std::ffi::OsString;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

/// Default executable name of the launcher
pub const DEFAULT_PROCESS_NAME: &str = "eve-online.exe";

/// Something that can tell whether the launcher is currently running.
///
/// An `Err` means the process table could not be queried; callers treat
/// that as "not running".
pub trait ProcessProbe {
    fn is_running(&mut self) -> Result<bool>;
}

/// Probe backed by the operating system's process table.
pub struct SystemProbe {
    system: System,
    process_name: OsString,
}

impl SystemProbe {
    pub fn new(process_name: impl Into<OsString>) -> Self {
        Self {
            system: System::new(),
            process_name: process_name.into(),
        }
    }
}

impl ProcessProbe for SystemProbe {
    fn is_running(&mut self) -> Result<bool> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            bail!("process enumeration is not supported on this platform");
        }

        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        Ok(self
            .system
            .processes()
            .values()
            .any(|process| process.name() == self.process_name.as_os_str()))
    }
}

/// Collapse a probe result into the advisory liveness flag.
pub fn liveness<P: ProcessProbe + ?Sized>(probe: &mut P) -> bool {
    match probe.is_running() {
        Ok(running) => running,
        Err(e) => {
            tracing::debug!("Liveness check failed, assuming not running: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenProbe;

    impl ProcessProbe for BrokenProbe {
        fn is_running(&mut self) -> Result<bool> {
            bail!("no process table")
        }
    }

    #[test]
    fn test_enumeration_failure_reads_as_not_running() {
        assert!(!liveness(&mut BrokenProbe));
    }

    #[test]
    fn test_unknown_process_is_not_running() {
        let mut probe = SystemProbe::new("definitely-not-a-real-process-name.exe");
        assert!(!liveness(&mut probe));
    }
}
