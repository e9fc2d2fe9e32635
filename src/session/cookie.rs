//! Session cookie helpers.

/// Finds `name` in a `Cookie` request header value.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Builds a `Set-Cookie` value for a session token.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age_secs.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds a `Set-Cookie` value that removes the cookie.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie() {
        let header = "theme=dark; swifttasks-access-token=abc123; other=1";
        assert_eq!(read_cookie(header, "swifttasks-access-token"), Some("abc123"));
        assert_eq!(read_cookie(header, "missing"), None);
        assert_eq!(read_cookie("swifttasks-access-token=", "swifttasks-access-token"), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("sid", "v", 3600, true);
        assert!(cookie.starts_with("sid=v;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.ends_with("; Secure"));

        assert!(!session_cookie("sid", "v", 60, false).contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_cookie("sid", false).contains("Max-Age=0"));
    }
}
