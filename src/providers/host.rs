use std::time::Duration;

use parking_lot::Mutex;
use sysinfo::System;

use super::HostStats;
use crate::errors::{ExporterError, Result};

/// Host statistics backed by `sysinfo`.
///
/// CPU and memory each keep their own `System` so a CPU read never waits on
/// a memory refresh.
pub struct SysinfoHostStats {
    cpu: Mutex<System>,
    memory: Mutex<System>,
}

impl SysinfoHostStats {
    pub fn new() -> Self {
        let mut cpu = System::new();
        // Prime the baseline for the first zero-window read
        cpu.refresh_cpu_all();
        Self {
            cpu: Mutex::new(cpu),
            memory: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoHostStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HostStats for SysinfoHostStats {
    fn cpu_percent(&self, window: Duration) -> Result<f64> {
        let mut system = self.cpu.lock();
        if !window.is_zero() {
            system.refresh_cpu_all();
            std::thread::sleep(window);
        }
        system.refresh_cpu_all();

        if system.cpus().is_empty() {
            return Err(ExporterError::sample_provider("no CPU information available"));
        }
        to_percent(system.global_cpu_usage() as f64, "cpu")
    }

    fn memory_used_percent(&self) -> Result<f64> {
        let mut system = self.memory.lock();
        system.refresh_memory();

        let total = system.total_memory();
        if total == 0 {
            return Err(ExporterError::sample_provider(
                "total memory reported as zero",
            ));
        }
        to_percent(system.used_memory() as f64 / total as f64 * 100.0, "memory")
    }
}

fn to_percent(value: f64, what: &str) -> Result<f64> {
    if value.is_nan() {
        return Err(ExporterError::sample_provider(format!(
            "{} usage is not a number",
            what
        )));
    }
    Ok(value.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_percent_clamps() {
        assert_eq!(to_percent(-3.0, "cpu").unwrap(), 0.0);
        assert_eq!(to_percent(101.5, "cpu").unwrap(), 100.0);
        assert_eq!(to_percent(42.0, "cpu").unwrap(), 42.0);
        assert!(to_percent(f64::NAN, "cpu").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_memory_percent_in_range() {
        let stats = SysinfoHostStats::new();
        let pct = stats.memory_used_percent().unwrap();
        assert!((0.0..=100.0).contains(&pct), "memory usage {} out of range", pct);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_zero_window_cpu_in_range() {
        let stats = SysinfoHostStats::new();
        for _ in 0..3 {
            let pct = stats.cpu_percent(Duration::ZERO).unwrap();
            assert!((0.0..=100.0).contains(&pct), "cpu usage {} out of range", pct);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_windowed_cpu_in_range() {
        let stats = SysinfoHostStats::new();
        let pct = stats.cpu_percent(Duration::from_millis(250)).unwrap();
        assert!((0.0..=100.0).contains(&pct), "cpu usage {} out of range", pct);
    }
}
