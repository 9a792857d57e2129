//! Route keys: the (method, path) pair identifying a registration slot.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// HTTP methods a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    /// All routable methods, in declaration order.
    pub const ALL: [Method; 6] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
    ];

    /// The canonical upper-case token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }

    /// Map a transport-level method. Methods outside the routable set
    /// (HEAD, TRACE, extensions) yield `None` and can never match a route.
    pub fn from_http(method: &axum::http::Method) -> Option<Self> {
        method.as_str().parse().ok()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a method token outside the routable set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for Method {
    type Err = UnsupportedMethod;

    /// Case-sensitive: only the canonical upper-case tokens parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "OPTIONS" => Ok(Method::Options),
            other => Err(UnsupportedMethod(other.to_string())),
        }
    }
}

/// Composite route key. Two keys are equal iff method and path are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_tokens_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn method_parse_is_case_sensitive() {
        assert!("get".parse::<Method>().is_err());
        assert!("HEAD".parse::<Method>().is_err());
    }

    #[test]
    fn method_from_http() {
        assert_eq!(Method::from_http(&axum::http::Method::PATCH), Some(Method::Patch));
        assert_eq!(Method::from_http(&axum::http::Method::HEAD), None);
    }

    #[test]
    fn keys_with_separator_in_path_stay_distinct() {
        // A colon in the path must not collide with the method boundary.
        let a = RouteKey::new(Method::Get, "/a:b");
        let b = RouteKey::new(Method::Get, "/a");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "GET /a:b");
    }
}
