//! HTTP basic authentication.

use base64::{engine::general_purpose::STANDARD, Engine};

/// `WWW-Authenticate` challenge sent with every 401.
pub const CHALLENGE: &str = "Basic realm=\"Authorization Required\"";

/// The single editor account allowed in.
#[derive(Debug, Clone)]
pub struct Credentials {
    user: String,
    pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Checks an `Authorization` header value against these credentials.
    pub fn accepts(&self, header: Option<&str>) -> bool {
        let Some((user, pass)) = header.and_then(parse_basic) else {
            return false;
        };
        constant_time_eq(user.as_bytes(), self.user.as_bytes())
            & constant_time_eq(pass.as_bytes(), self.pass.as_bytes())
    }
}

/// Decodes `Basic <base64(user:pass)>` into its two parts.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::Credentials;
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn header(pair: &str) -> String {
        format!("Basic {}", STANDARD.encode(pair))
    }

    #[test]
    fn accepts_matching_pair_only() {
        let creds = Credentials::new("user", "pa:ss");
        assert!(creds.accepts(Some(&header("user:pa:ss"))));
        assert!(!creds.accepts(Some(&header("user:pass"))));
        assert!(!creds.accepts(Some(&header("other:pa:ss"))));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        let creds = Credentials::new("user", "pass");
        assert!(!creds.accepts(None));
        assert!(!creds.accepts(Some("Bearer abc")));
        assert!(!creds.accepts(Some("Basic !!!not-base64")));
        assert!(!creds.accepts(Some(&format!("Basic {}", STANDARD.encode("nocolon")))));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let creds = Credentials::new("user", "pass");
        let value = format!("basic {}", STANDARD.encode("user:pass"));
        assert!(creds.accepts(Some(&value)));
    }
}
