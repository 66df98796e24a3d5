//! Rendering core for remote search results.
//!
//! A search response is attacker-influenceable data: any indexed document
//! can seed a field with markup or a `javascript:` URL. This crate is the
//! boundary that turns such a response into something safe to display:
//!
//! - [`result`]: the typed result model. Field values are classified at the
//!   deserialization boundary into wrapped search data (`raw`/`snippet`
//!   envelope) or opaque metadata, so nothing downstream inspects shape ad
//!   hoc.
//! - [`escape`]: HTML escaping and the escaped projection of a result.
//!   Service-supplied snippets are trusted verbatim (they carry highlight
//!   markup); raw values are always escaped.
//! - [`sanitize`]: URL sanitization against a scheme allow-list, resolved
//!   against an explicit base.
//! - [`present`]: the composition — [`present::ResultPresenter`] extracts
//!   title/url/thumbnail, sanitizes links, and emits a
//!   [`present::DisplayResult`] plus a click-through hook.
//!
//! Everything here is synchronous and stateless between calls; a render is
//! a pure transformation of its inputs.

pub mod escape;
pub mod present;
pub mod result;
pub mod sanitize;

pub use escape::{escaped_field, extract_field, html_escape, project, FieldVariant};
pub use present::{
    ClickNotifier, ClickThrough, DisplayField, DisplayResult, ResultPresenter,
    ResultPresenterBuilder, TitleSlot,
};
pub use result::{FieldValue, FieldWrapper, RawValue, Scalar, SearchResult, Snippet};
pub use sanitize::{sanitize_url, sanitize_url_with, DEFAULT_ALLOWED_SCHEMES};
