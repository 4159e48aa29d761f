//! Transactional email for the intake pipeline
//!
//! Two categories of outbound mail flow through this crate: the internal
//! lead alert (business-critical, always sent) and the prospect
//! confirmation (best-effort, sent for a subset of form types). The PDF
//! pipeline reuses the same transport to deliver application documents to
//! the advisor of record and the leads inbox.
//!
//! Transport is the Resend HTTP API. No retries are implemented anywhere:
//! a failed send is reported to the caller, never re-attempted.

pub mod resend;
pub mod templates;
pub mod types;

pub use resend::ResendMailer;
pub use types::{Attachment, DispatchError, OutboundEmail, SendReceipt};

/// Dispatcher configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Resend API key (`re_...`)
    pub api_key: String,

    /// Default "from" address for all outbound mail
    pub from_address: String,

    /// Internal inbox that receives lead alerts and PDF copies
    pub leads_inbox: String,
}

impl DispatchConfig {
    /// Load from environment variables; the API key is a hard requirement
    /// and its absence fails startup.
    pub fn from_env() -> Result<Self, DispatchError> {
        let api_key = std::env::var("RESEND_API_KEY")
            .map_err(|_| DispatchError::MissingCredential("RESEND_API_KEY"))?;

        Ok(Self {
            api_key,
            from_address: std::env::var("FROM_ADDRESS").unwrap_or_else(|_| {
                "Hartwell Financial <notifications@hartwellfinancial.com>".to_string()
            }),
            leads_inbox: std::env::var("LEADS_INBOX")
                .unwrap_or_else(|_| "leads@hartwellfinancial.com".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails_fast() {
        std::env::remove_var("RESEND_API_KEY");
        assert!(matches!(
            DispatchConfig::from_env(),
            Err(DispatchError::MissingCredential("RESEND_API_KEY"))
        ));
    }
}
