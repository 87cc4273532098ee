//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 methods a browser client of the content API can send.
//! Any other token (`TRACE`, `CONNECT`, custom verbs) is kept verbatim in
//! [`Method::Other`] and still goes through identity and routing, where it
//! misses the route table.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An HTTP request method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    /// Any method outside the list above, as sent on the wire.
    Other(String),
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Delete   => "DELETE",
            Self::Get      => "GET",
            Self::Head     => "HEAD",
            Self::Options  => "OPTIONS",
            Self::Patch    => "PATCH",
            Self::Post     => "POST",
            Self::Put      => "PUT",
            Self::Other(m) => m,
        }
    }
}

/// Case-sensitive per RFC 9110 §9.1: `"get"` is an `Other` method, not `Get`.
impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DELETE"  => Self::Delete,
            "GET"     => Self::Get,
            "HEAD"    => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH"   => Self::Patch,
            "POST"    => Self::Post,
            "PUT"     => Self::Put,
            other     => Self::Other(other.to_owned()),
        })
    }
}

impl From<&http::Method> for Method {
    fn from(m: &http::Method) -> Self {
        match *m {
            http::Method::DELETE  => Self::Delete,
            http::Method::GET     => Self::Get,
            http::Method::HEAD    => Self::Head,
            http::Method::OPTIONS => Self::Options,
            http::Method::PATCH   => Self::Patch,
            http::Method::POST    => Self::Post,
            http::Method::PUT     => Self::Put,
            _                     => Self::Other(m.as_str().to_owned()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!("POST".parse::<Method>(), Ok(Method::Post));
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn method_names_are_case_sensitive() {
        assert_eq!("get".parse::<Method>(), Ok(Method::Other("get".into())));
    }

    #[test]
    fn keeps_methods_outside_the_set() {
        let trace = Method::from(&http::Method::TRACE);
        assert_eq!(trace, Method::Other("TRACE".into()));
        assert_eq!(trace.to_string(), "TRACE");

        let custom = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from(&custom), Method::Other("PURGE".into()));
        assert_eq!(Method::from(&http::Method::PUT), Method::Put);
    }
}
