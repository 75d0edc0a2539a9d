//! CorpPass and SingPass authorization-flow helpers.
//!
//! Both flows only accept callback URLs from a fixed registry and build
//! login URLs against the government staging identity providers.

/// Message code for an unregistered `callback_url`.
pub const UNREGISTERED_CALLBACK_CODE: i32 = 850_301;
/// CorpPass publishes its message codes as strings.
pub const UNREGISTERED_CALLBACK_CODE_STR: &str = "850301";
pub const UNREGISTERED_CALLBACK_MESSAGE: &str = "Arguments Error";
pub const UNREGISTERED_CALLBACK_DETAIL: &str = "The callback_url specified is not registered";

// ---------------------------------------------------------------------------
// CorpPass
// ---------------------------------------------------------------------------

pub const CORPPASS_CALLBACKS: [&str; 4] = [
    "http://localhost:3000/callback",
    "https://abcpayroll.com/callback",
    "http://po.ec/vefocuf",
    "https://demo.example.com/callback",
];

pub const CORPPASS_DEFAULT_SCOPE: &str = "EmpIncomeSub";
pub const CORPPASS_DEFAULT_CALLBACK: &str = "https://demo.example.com/callback";
pub const CORPPASS_DEFAULT_STATE: &str = "1234";

/// Lifetime advertised for CorpPass access tokens.
pub const CORPPASS_TOKEN_EXPIRES_IN: i64 = 3600;

const CORPPASS_LOGIN_BASE: &str =
    "https://stg-saml.corppass.gov.sg/FIM/sps/CorpIDPFed/saml20/logininitial";

pub fn is_corppass_callback(url: &str) -> bool {
    CORPPASS_CALLBACKS.contains(&url)
}

/// Requested scope, or the default, with `,TaxAgent` appended for agents.
pub fn corppass_scope(scope: Option<&str>, tax_agent: bool) -> String {
    let mut scope = scope
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(CORPPASS_DEFAULT_SCOPE)
        .to_string();
    if tax_agent {
        scope.push_str(",TaxAgent");
    }
    scope
}

pub fn corppass_auth_url(scope: &str, callback_url: &str, state: &str) -> String {
    format!(
        "{CORPPASS_LOGIN_BASE}?RequestBinding=HTTPArtifact&ResponseBinding=HTTPArtifact\
         &PartnerId=https%3A%2F%2Fstg-home.corppass.gov.sg%2Fconsent%2Firas-cp\
         &Target=https://stg-home.corppass.gov.sg/consent/oauth2/authorize\
         ?realm=/consent/iras-cp&response_type=code&appName=IRASDemo\
         &state={state}&client_id=iras&scope={scope}&redirect_uri={callback_url}"
    )
}

pub fn corppass_access_token(id: i64) -> String {
    format!("corppass_access_token_{id}_demo_12345")
}

pub fn corppass_refresh_token(id: i64) -> String {
    format!("corppass_refresh_token_{id}_demo_67890")
}

// ---------------------------------------------------------------------------
// SingPass
// ---------------------------------------------------------------------------

pub const SINGPASS_CALLBACKS: [&str; 5] = [
    "http://www.iras.gov.sg/callback",
    "https://www.iras.gov.sg/callback",
    "http://localhost:8090/callback",
    "https://localhost:8090/callback",
    "http://dirtor.mv/ma",
];

pub const SINGPASS_DEFAULT_SCOPE: &str = "GSTReturnsSub+GSTTransListSub";
pub const SINGPASS_DEFAULT_CALLBACK: &str = "http://www.iras.gov.sg/callback";

/// Client id stored on auth records created by this gateway.
pub const SINGPASS_RECORD_CLIENT_ID: &str = "singpass-client";

pub const SINGPASS_TOKEN_TYPE: &str = "Bearer";
pub const SINGPASS_TOKEN_EXPIRES_IN: i32 = 3600;

pub const SINGPASS_STATUS_PENDING: &str = "pending";
pub const SINGPASS_STATUS_COMPLETED: &str = "completed";
pub const SINGPASS_TOKEN_STATUS_ACTIVE: &str = "active";

const SINGPASS_LOGIN_BASE: &str =
    "https://stg-saml.singpass.gov.sg/FIM/sps/SingpassIDPFed/saml20/logininitial";
const SINGPASS_URL_CLIENT_ID: &str = "a1234b5c-1234-abcd-efgh-a1234b5cdef";

pub fn is_singpass_callback(url: &str) -> bool {
    SINGPASS_CALLBACKS.contains(&url)
}

pub fn singpass_auth_url(scope: &str, callback_url: &str, state: &str) -> String {
    format!(
        "{SINGPASS_LOGIN_BASE}?client_id={SINGPASS_URL_CLIENT_ID}\
         &scope={scope}&redirect_uri={callback_url}&state={state}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corppass_registry() {
        assert!(is_corppass_callback("https://abcpayroll.com/callback"));
        assert!(!is_corppass_callback("https://evil.example.com/callback"));
        assert!(!is_corppass_callback("http://www.iras.gov.sg/callback"));
    }

    #[test]
    fn corppass_scope_defaults_and_tax_agent() {
        assert_eq!(corppass_scope(None, false), "EmpIncomeSub");
        assert_eq!(corppass_scope(Some(""), true), "EmpIncomeSub,TaxAgent");
        assert_eq!(corppass_scope(Some("Custom"), false), "Custom");
    }

    #[test]
    fn corppass_url_carries_parameters() {
        let url = corppass_auth_url("EmpIncomeSub", CORPPASS_DEFAULT_CALLBACK, "1234");
        assert!(url.starts_with(CORPPASS_LOGIN_BASE));
        assert!(url.contains("&state=1234&client_id=iras&scope=EmpIncomeSub"));
        assert!(url.ends_with("&redirect_uri=https://demo.example.com/callback"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn corppass_tokens_embed_id() {
        assert_eq!(corppass_access_token(7), "corppass_access_token_7_demo_12345");
        assert_eq!(corppass_refresh_token(7), "corppass_refresh_token_7_demo_67890");
    }

    #[test]
    fn singpass_registry_and_url() {
        assert!(is_singpass_callback("http://localhost:8090/callback"));
        assert!(!is_singpass_callback("http://localhost:3000/callback"));

        let url = singpass_auth_url(SINGPASS_DEFAULT_SCOPE, SINGPASS_DEFAULT_CALLBACK, "abc");
        assert_eq!(
            url,
            "https://stg-saml.singpass.gov.sg/FIM/sps/SingpassIDPFed/saml20/logininitial\
             ?client_id=a1234b5c-1234-abcd-efgh-a1234b5cdef\
             &scope=GSTReturnsSub+GSTTransListSub\
             &redirect_uri=http://www.iras.gov.sg/callback&state=abc"
        );
    }
}
