use serde::Deserialize;

use crate::SecretString;

/// Invitation parameters carried on the registration URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteParams {
    pub code: String,
    pub email: String,
}

#[derive(Deserialize)]
struct RawInviteQuery {
    invite: Option<String>,
    email: Option<String>,
}

impl InviteParams {
    /// Parses `?invite=...&email=...`. Both must be present and non-empty,
    /// otherwise the request is an ordinary registration.
    pub fn from_query(query: &str) -> Option<Self> {
        let raw: RawInviteQuery =
            serde_urlencoded::from_str(query.trim_start_matches('?')).ok()?;

        let code = raw.invite.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty())?;
        let email = raw.email.map(|e| e.trim().to_owned()).filter(|e| !e.is_empty())?;

        Some(Self { code, email })
    }
}

/// Session tokens delivered in the URL fragment of an emailed link.
#[derive(Debug, Clone, Default)]
pub struct TokenFragment {
    pub access_token: Option<SecretString>,
    pub refresh_token: Option<SecretString>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

#[derive(Deserialize)]
struct RawFragment {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    token_type: Option<String>,
}

impl TokenFragment {
    /// Parses `#access_token=...&refresh_token=...`. Unparseable input yields
    /// an empty fragment.
    pub fn parse(fragment: &str) -> Self {
        let Ok(raw) = serde_urlencoded::from_str::<RawFragment>(fragment.trim_start_matches('#'))
        else {
            return Self::default();
        };

        let secret = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::new)
        };

        Self {
            access_token: secret(raw.access_token),
            refresh_token: secret(raw.refresh_token),
            expires_in: raw.expires_in.and_then(|v| v.parse().ok()),
            token_type: raw.token_type,
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_params_need_code_and_email() {
        assert_eq!(
            InviteParams::from_query("?invite=ABC123&email=a%40x.com"),
            Some(InviteParams {
                code: "ABC123".to_owned(),
                email: "a@x.com".to_owned(),
            })
        );
        assert_eq!(InviteParams::from_query("invite=ABC123"), None);
        assert_eq!(InviteParams::from_query("email=a%40x.com"), None);
        assert_eq!(InviteParams::from_query("invite=&email=a%40x.com"), None);
        assert_eq!(InviteParams::from_query(""), None);
    }

    #[test]
    fn test_token_fragment() {
        let fragment = TokenFragment::parse(
            "#access_token=acc&refresh_token=ref&expires_in=3600&token_type=bearer",
        );
        assert_eq!(
            fragment.access_token.as_ref().map(SecretString::expose_secret),
            Some("acc")
        );
        assert_eq!(
            fragment.refresh_token.as_ref().map(SecretString::expose_secret),
            Some("ref")
        );
        assert_eq!(fragment.expires_in, Some(3600));
        assert_eq!(fragment.token_type.as_deref(), Some("bearer"));
    }

    #[test]
    fn test_token_fragment_missing_refresh() {
        let fragment = TokenFragment::parse("access_token=acc&refresh_token=");
        assert!(fragment.has_access_token());
        assert!(fragment.refresh_token.is_none());
    }
}
