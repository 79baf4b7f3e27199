use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionLifecycle {
    #[default]
    Uninitialized,
    Loading,
    Active,
    /// Terminal
    Disposed,
}

impl fmt::Display for SessionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionLifecycle::Uninitialized => "uninitialized",
            SessionLifecycle::Loading => "loading",
            SessionLifecycle::Active => "active",
            SessionLifecycle::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot move session from {from} to {to}")]
    InvalidTransition {
        from: SessionLifecycle,
        to: SessionLifecycle,
    },
}

impl SessionLifecycle {
    pub fn begin_loading(&mut self) -> Result<(), LifecycleError> {
        self.transition(SessionLifecycle::Uninitialized, SessionLifecycle::Loading)
    }

    pub fn activate(&mut self) -> Result<(), LifecycleError> {
        self.transition(SessionLifecycle::Loading, SessionLifecycle::Active)
    }

    /// Moves to `Disposed`; true only for the call that actually disposed.
    pub fn dispose(&mut self) -> bool {
        if *self == SessionLifecycle::Disposed {
            return false;
        }
        *self = SessionLifecycle::Disposed;
        true
    }

    pub fn is_active(self) -> bool {
        self == SessionLifecycle::Active
    }

    pub fn is_disposed(self) -> bool {
        self == SessionLifecycle::Disposed
    }

    fn transition(&mut self, from: SessionLifecycle, to: SessionLifecycle) -> Result<(), LifecycleError> {
        if *self != from {
            return Err(LifecycleError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut lifecycle = SessionLifecycle::default();
        lifecycle.begin_loading().unwrap();
        lifecycle.activate().unwrap();
        assert!(lifecycle.is_active());
        assert!(lifecycle.dispose());
        assert!(lifecycle.is_disposed());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut lifecycle = SessionLifecycle::default();
        lifecycle.begin_loading().unwrap();
        assert_eq!(
            lifecycle.begin_loading(),
            Err(LifecycleError::InvalidTransition {
                from: SessionLifecycle::Loading,
                to: SessionLifecycle::Loading,
            })
        );
    }

    #[test]
    fn test_disposed_is_terminal() {
        let mut lifecycle = SessionLifecycle::Active;
        assert!(lifecycle.dispose());
        assert!(!lifecycle.dispose());
        assert!(lifecycle.begin_loading().is_err());
        assert!(lifecycle.activate().is_err());
        assert!(lifecycle.is_disposed());
    }

    #[test]
    fn test_cannot_activate_without_loading() {
        let mut lifecycle = SessionLifecycle::default();
        assert!(lifecycle.activate().is_err());
    }
}
