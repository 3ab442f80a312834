//! HTTP API module for the withholding engine.
//!
//! Serves the calculator form, a JSON calculation endpoint, and the list of
//! loaded tax years.

mod form;
mod handlers;
mod page;
mod request;
mod response;
mod state;

pub use form::{WithholdingForm, parse_amount};
pub use handlers::create_router;
pub use page::{FormPage, escape_html, render_form_page};
pub use request::WithholdingRequest;
pub use response::{ApiError, ApiErrorResponse, TaxYearsResponse, error_status};
pub use state::AppState;
