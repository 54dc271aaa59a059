//! Setup signals
//!
//! Synchronization emits a notification before and after a role's
//! permissions are applied to its group. Observers subscribe to a
//! [`SignalHub`]; the dispatch is synchronous and in-process.

use crate::definition::RoleDefinition;

/// Observer of role setup notifications.
///
/// Both hooks default to no-ops so observers implement only what they
/// care about.
pub trait SetupObserver {
    /// Called before a role's permissions are synchronized.
    fn pre_setup(&self, role: &RoleDefinition, clear: bool) {
        let _ = (role, clear);
    }

    /// Called after a role's permissions were synchronized.
    fn post_setup(&self, role: &RoleDefinition) {
        let _ = role;
    }
}

/// Dispatches setup notifications to subscribed observers, in
/// subscription order.
///
/// # Examples
///
/// ```
/// use grouprole_roles::{RoleDefinition, SetupObserver, SignalHub};
///
/// struct Logging;
///
/// impl SetupObserver for Logging {
///     fn post_setup(&self, role: &RoleDefinition) {
///         println!("synchronized {}", role.name());
///     }
/// }
///
/// let mut hub = SignalHub::new();
/// hub.subscribe(Logging);
/// ```
#[derive(Default)]
pub struct SignalHub {
    observers: Vec<Box<dyn SetupObserver>>,
}

impl SignalHub {
    /// Create a hub with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an observer.
    pub fn subscribe(&mut self, observer: impl SetupObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Notify observers that a role setup is starting.
    pub fn emit_pre_setup(&self, role: &RoleDefinition, clear: bool) {
        for observer in &self.observers {
            observer.pre_setup(role, clear);
        }
    }

    /// Notify observers that a role setup completed.
    pub fn emit_post_setup(&self, role: &RoleDefinition) {
        for observer in &self.observers {
            observer.post_setup(role);
        }
    }
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}
