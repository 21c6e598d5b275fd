//! Argument values carried by events.
//!
//! Each argument is independently reference-counted ([`ValPtr`]). An event
//! record owns its argument sequence ([`Args`]) until it is dispatched or
//! discarded, at which point every reference it holds is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Shared handle to a single argument value.
pub type ValPtr = Arc<Val>;

/// Ordered argument sequence of one event invocation.
pub type Args = Vec<ValPtr>;

/// A script-level value passed to event handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Val {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned counter.
    Count(u64),
    /// Floating point number.
    Double(f64),
    /// Absolute time in seconds since the epoch.
    Time(f64),
    /// Text.
    String(String),
    /// IP address.
    Addr(IpAddr),
    /// Transport-layer port.
    Port(u16),
    /// Ordered sequence of values.
    Vector(Vec<Val>),
    /// Named fields, in declaration order.
    Record(Vec<(String, Val)>),
}

impl Val {
    /// Wrap this value in a shared handle.
    #[must_use]
    pub fn into_ptr(self) -> ValPtr {
        Arc::new(self)
    }

    /// Name of the value's type, as used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Count(_) => "count",
            Self::Double(_) => "double",
            Self::Time(_) => "time",
            Self::String(_) => "string",
            Self::Addr(_) => "addr",
            Self::Port(_) => "port",
            Self::Vector(_) => "vector",
            Self::Record(_) => "record",
        }
    }

    /// Borrow the value as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a count, if it is one.
    #[must_use]
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(c) => Some(*c),
            _ => None,
        }
    }

    /// Look up a record field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Val> {
        match self {
            Self::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Self::Int(i) => write!(f, "{i}"),
            Self::Count(c) => write!(f, "{c}"),
            Self::Double(d) | Self::Time(d) => write!(f, "{d:.6}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Addr(a) => write!(f, "{a}"),
            Self::Port(p) => write!(f, "{p}/tcp"),
            Self::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
            Self::Record(fields) => {
                write!(f, "[")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                write!(f, "]")
            },
        }
    }
}

/// Render an argument sequence as `a, b, c`.
#[must_use]
pub fn describe_args(args: &[ValPtr]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<bool> for Val {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Val {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Val {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<f64> for Val {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Val {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Val {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<IpAddr> for Val {
    fn from(value: IpAddr) -> Self {
        Self::Addr(value)
    }
}

/// Build an [`Args`] sequence from values convertible into [`Val`].
///
/// ```rust
/// use vigil_core::{Val, args};
///
/// let a = args![true, "alice", 5_u64];
/// assert_eq!(a.len(), 3);
/// assert_eq!(*a[1], Val::String("alice".into()));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::ValPtr>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$(::std::sync::Arc::new($crate::Val::from($value))),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_display_scalars() {
        assert_eq!(Val::Bool(true).to_string(), "T");
        assert_eq!(Val::Bool(false).to_string(), "F");
        assert_eq!(Val::Count(5).to_string(), "5");
        assert_eq!(Val::Port(79).to_string(), "79/tcp");
        assert_eq!(
            Val::Addr(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))).to_string(),
            "10.0.0.1"
        );
    }

    #[test]
    fn test_display_record() {
        let rec = Val::Record(vec![
            ("user".to_string(), Val::from("alice")),
            ("full".to_string(), Val::Bool(false)),
        ]);
        assert_eq!(rec.to_string(), "[user=alice, full=F]");
        assert_eq!(rec.field("user").and_then(Val::as_str), Some("alice"));
        assert!(rec.field("missing").is_none());
    }

    #[test]
    fn test_args_macro() {
        let empty = args![];
        assert!(empty.is_empty());

        let a = args![5_u64, "x"];
        assert_eq!(describe_args(&a), "5, x");
        assert_eq!(a[0].as_count(), Some(5));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Val::Count(5)).unwrap();
        assert_eq!(json, r#"{"type":"count","value":5}"#);

        let parsed: Val = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Val::Count(5));
    }
}
