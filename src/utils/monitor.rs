use std::sync::Mutex;
use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Wall time (and, with the `cli` feature, resident memory) per ranking phase.
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

pub struct PhaseMonitor {
    enabled: bool,
    started: Instant,
    last_mark: Mutex<Instant>,
    phases: Mutex<Vec<PhaseStats>>,
    #[cfg(feature = "cli")]
    system: Mutex<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
}

impl PhaseMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            started: now,
            last_mark: Mutex::new(now),
            phases: Mutex::new(Vec::new()),
            #[cfg(feature = "cli")]
            system: Mutex::new(System::new()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 記錄從上一個標記到現在的階段耗時
    pub fn mark(&self, phase: &str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let elapsed = match self.last_mark.lock() {
            Ok(mut last) => {
                let elapsed = now.duration_since(*last);
                *last = now;
                elapsed
            }
            Err(_) => return,
        };

        let stats = PhaseStats {
            phase: phase.to_string(),
            elapsed,
            memory_mb: self.memory_mb(),
        };

        match stats.memory_mb {
            Some(memory) => tracing::info!(
                phase = %stats.phase,
                elapsed = ?stats.elapsed,
                memory_mb = memory,
                "📊 phase finished"
            ),
            None => tracing::info!(phase = %stats.phase, elapsed = ?stats.elapsed, "📊 phase finished"),
        }

        if let Ok(mut phases) = self.phases.lock() {
            phases.push(stats);
        }
    }

    pub fn phases(&self) -> Vec<PhaseStats> {
        self.phases
            .lock()
            .map(|phases| phases.clone())
            .unwrap_or_default()
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.phases().iter().filter_map(|p| p.memory_mb).max();
        tracing::info!(
            total = ?self.started.elapsed(),
            peak_memory_mb = ?peak,
            "📊 ranking run finished"
        );
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&self) -> Option<u64> {
        None
    }
}

impl Default for PhaseMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
