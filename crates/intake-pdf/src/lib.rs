//! Life insurance application PDF generation
//!
//! Renders a stored multi-step application into a paginated, styled PDF
//! suitable for email attachment: navy header band on every page, one
//! section per application step, label/value rows that wrap and page-break,
//! and a footer stamped once the final page count is known.
//!
//! Sensitive-field handling: bank account and routing numbers are always
//! masked; the applicant SSN is rendered fully formatted in the identity
//! section because this document goes to the advisor of record, not to a
//! public summary view. Masking helpers for summary surfaces live in
//! [`format`].

pub mod application;
pub mod format;
pub mod layout;
pub mod render;

pub use application::{ApplicationForm, Beneficiary, ExistingPolicy, LifeInsuranceApplication};
pub use layout::{PageComposer, PdfError};
pub use render::{render_application, render_application_base64};
