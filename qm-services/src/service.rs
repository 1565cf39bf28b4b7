//! Mount/teardown lifecycle shared by screen controllers.
//!
//! A controller is built in `Created`, mounted with `init`, and unmounted
//! with `shutdown`. A stopped controller may be mounted again; mounting one
//! that is already running is an error.

use qm_core::error::QmResult;

/// Where a controller is in its mount cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Built, never mounted.
    Created,
    /// Mounted and accepting actions.
    Running,
    /// Unmounted. Local state has been discarded.
    Stopped,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A controller with a mount cycle.
pub trait Service: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    fn state(&self) -> ServiceState;

    /// Mount. Fails if already running.
    fn init(&mut self) -> QmResult<()>;

    /// Unmount and drop local state.
    fn shutdown(&mut self) -> QmResult<()>;

    /// True while mounted.
    fn is_healthy(&self) -> bool {
        self.state() == ServiceState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        state: ServiceState,
        mounts: u32,
    }

    impl Service for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn state(&self) -> ServiceState {
            self.state
        }

        fn init(&mut self) -> QmResult<()> {
            self.mounts += 1;
            self.state = ServiceState::Running;
            Ok(())
        }

        fn shutdown(&mut self) -> QmResult<()> {
            self.state = ServiceState::Stopped;
            Ok(())
        }
    }

    #[test]
    fn test_mount_cycle() {
        let mut svc = Counter { state: ServiceState::Created, mounts: 0 };
        assert!(!svc.is_healthy());

        svc.init().unwrap();
        assert!(svc.is_healthy());
        svc.shutdown().unwrap();
        assert_eq!(svc.state().to_string(), "stopped");

        svc.init().unwrap();
        assert!(svc.is_healthy());
        assert_eq!(svc.mounts, 2);
    }
}
