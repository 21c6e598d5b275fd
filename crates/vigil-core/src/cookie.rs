//! Non-owning cookie handles.
//!
//! A producer may attach a piece of its own context (typically the
//! connection an analyzer is working on) to an event. The queue does not own
//! that context: the producer guarantees it outlives the event's dispatch,
//! and the event only holds a [`Weak`] reference to it. Debug builds assert
//! the contract when the event is dispatched.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Borrowed reference to caller-owned context attached to an event.
#[derive(Clone)]
pub struct Cookie(Weak<dyn Any + Send + Sync>);

impl Cookie {
    /// Borrow `owner` as a cookie. The caller keeps ownership.
    #[must_use]
    pub fn borrow_from<T: Any + Send + Sync>(owner: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(owner);
        Self(weak)
    }

    /// Whether the referenced object is still alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Temporarily upgrade to the referenced object, if it is alive and of type `T`.
    #[must_use]
    pub fn upgrade<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.upgrade()?.downcast::<T>().ok()
    }
}

impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_does_not_own() {
        let owner = Arc::new(String::from("conn"));
        let cookie = Cookie::borrow_from(&owner);

        assert_eq!(Arc::strong_count(&owner), 1);
        assert!(cookie.is_alive());
        assert_eq!(cookie.upgrade::<String>().as_deref().map(String::as_str), Some("conn"));

        drop(owner);
        assert!(!cookie.is_alive());
        assert!(cookie.upgrade::<String>().is_none());
    }

    #[test]
    fn test_cookie_wrong_type() {
        let owner = Arc::new(42_u32);
        let cookie = Cookie::borrow_from(&owner);
        assert!(cookie.upgrade::<String>().is_none());
        assert_eq!(cookie.upgrade::<u32>().map(|v| *v), Some(42));
    }

    #[test]
    fn test_cookie_from_caller_struct() {
        struct Session {
            port: u16,
        }

        let owner = Arc::new(Session { port: 79 });
        let cookie = Cookie::borrow_from(&owner);
        let copy = cookie.clone();

        assert_eq!(copy.upgrade::<Session>().map(|s| s.port), Some(79));
        assert_eq!(Arc::weak_count(&owner), 2);

        drop(owner);
        assert!(!cookie.is_alive());
        assert!(!copy.is_alive());
    }
}
