//! Result View composition: projection + sanitization + click-through.
//!
//! [`ResultPresenter`] is configured once (field mapping, base URL, scheme
//! allow-list, click notifier) and validated eagerly — a blank field name
//! or an unparseable base URL is a caller mistake and surfaces at setup
//! time, never mid-render. Each [`ResultPresenter::present`] call is then a
//! pure transformation of one [`SearchResult`] into a [`DisplayResult`].

use std::fmt;
use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use sightline_common::{Result, SightlineError};

use crate::escape::{escape_wrapper, extract_field, project, FieldVariant};
use crate::result::SearchResult;
use crate::sanitize::{sanitize_url_with, DEFAULT_ALLOWED_SCHEMES};

/// Click-through notification payload, handed to the caller's notifier when
/// a rendered link is activated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickThrough {
    /// Fresh id per activation, for analytics dedup downstream.
    pub event_id: Uuid,
    /// Raw value of the configured id field, when one was configured and
    /// present on the result.
    pub document_id: Option<String>,
    /// The sanitized URL the activation navigates to.
    pub url: String,
    /// Opaque analytics tags configured on the presenter.
    pub tags: Vec<String>,
}

/// Caller-supplied click-through notifier.
pub type ClickNotifier = Arc<dyn Fn(ClickThrough) + Send + Sync>;

/// How the title slot renders. Three states, not two booleans: a title must
/// never silently become a link when URL sanitization failed.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleSlot {
    /// No title field, or its value was not a wrapper: no slot at all.
    Hidden,
    /// Title present but no usable URL: non-interactive text.
    Plain(String),
    /// Title and sanitized URL both present: a navigable link.
    Linked { html: String, href: String },
}

/// One generic key/value row of the detail list.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
}

struct LinkActivation {
    notifier: ClickNotifier,
    document_id: Option<String>,
    url: String,
    tags: Vec<String>,
}

impl LinkActivation {
    fn fire(&self) {
        (self.notifier)(ClickThrough {
            event_id: Uuid::new_v4(),
            document_id: self.document_id.clone(),
            url: self.url.clone(),
            tags: self.tags.clone(),
        });
    }
}

/// Display-ready projection of one search result.
pub struct DisplayResult {
    /// The title slot in its three-state form.
    pub title: TitleSlot,
    /// Sanitized link target, when the url field survived sanitization.
    pub url: Option<String>,
    /// Sanitized thumbnail source, when present.
    pub thumbnail: Option<String>,
    /// Remaining wrapped fields as (name, display-safe value) rows, in
    /// field order, minus the designated title/url/thumbnail fields and
    /// minus rows with nothing to show.
    pub fields: Vec<DisplayField>,
    activation: Option<LinkActivation>,
}

impl DisplayResult {
    /// Report one user activation of the rendered link.
    ///
    /// Fires the configured notifier exactly once per call, and only when
    /// the title rendered as [`TitleSlot::Linked`] with tracking enabled.
    /// Returns whether a notification fired. Repeated rapid activations are
    /// not deduplicated here; that is the caller's concern.
    pub fn activate_link(&self) -> bool {
        match &self.activation {
            Some(activation) => {
                activation.fire();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for DisplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayResult")
            .field("title", &self.title)
            .field("url", &self.url)
            .field("thumbnail", &self.thumbnail)
            .field("fields", &self.fields)
            .field("tracked", &self.activation.is_some())
            .finish()
    }
}

/// Builder hides the validation wiring; [`ResultPresenterBuilder::build`]
/// rejects misconfiguration before any result is rendered.
pub struct ResultPresenterBuilder {
    base_url: String,
    title_field: Option<String>,
    url_field: Option<String>,
    thumbnail_field: Option<String>,
    id_field: Option<String>,
    allowed_schemes: Option<Vec<String>>,
    notifier: Option<ClickNotifier>,
    track_clicks: bool,
    click_tags: Vec<String>,
}

impl ResultPresenterBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            title_field: None,
            url_field: None,
            thumbnail_field: None,
            id_field: None,
            allowed_schemes: None,
            notifier: None,
            track_clicks: true,
            click_tags: Vec::new(),
        }
    }

    pub fn title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = Some(field.into());
        self
    }

    pub fn url_field(mut self, field: impl Into<String>) -> Self {
        self.url_field = Some(field.into());
        self
    }

    pub fn thumbnail_field(mut self, field: impl Into<String>) -> Self {
        self.thumbnail_field = Some(field.into());
        self
    }

    /// Field whose raw value becomes the `document_id` on click-through
    /// events.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    /// Replace the default `{http, https}` scheme allow-list.
    pub fn allowed_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_schemes = Some(schemes.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_click(mut self, notifier: ClickNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Disable click-through notification without removing the notifier.
    pub fn track_clicks(mut self, track: bool) -> Self {
        self.track_clicks = track;
        self
    }

    /// Opaque analytics tags copied into every click-through event.
    pub fn click_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.click_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<ResultPresenter> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            SightlineError::Config(format!("invalid base url {:?}: {e}", self.base_url))
        })?;

        for (label, field) in [
            ("title_field", &self.title_field),
            ("url_field", &self.url_field),
            ("thumbnail_field", &self.thumbnail_field),
            ("id_field", &self.id_field),
        ] {
            if let Some(name) = field {
                if name.trim().is_empty() {
                    return Err(SightlineError::Config(format!("{label} must not be blank")));
                }
            }
        }

        let allowed_schemes = match self.allowed_schemes {
            Some(schemes) => {
                if schemes.is_empty() {
                    return Err(SightlineError::Config(
                        "scheme allow-list override must not be empty".into(),
                    ));
                }
                schemes
                    .into_iter()
                    .map(|s| s.to_ascii_lowercase())
                    .collect()
            }
            None => DEFAULT_ALLOWED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(ResultPresenter {
            base_url,
            title_field: self.title_field,
            url_field: self.url_field,
            thumbnail_field: self.thumbnail_field,
            id_field: self.id_field,
            allowed_schemes,
            notifier: self.notifier,
            track_clicks: self.track_clicks,
            click_tags: self.click_tags,
        })
    }
}

/// Renders [`SearchResult`]s into [`DisplayResult`]s.
///
/// Stateless between calls; concurrent `present` calls never interfere.
pub struct ResultPresenter {
    base_url: Url,
    title_field: Option<String>,
    url_field: Option<String>,
    thumbnail_field: Option<String>,
    id_field: Option<String>,
    allowed_schemes: Vec<String>,
    notifier: Option<ClickNotifier>,
    track_clicks: bool,
    click_tags: Vec<String>,
}

impl std::fmt::Debug for ResultPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPresenter")
            .field("base_url", &self.base_url)
            .field("title_field", &self.title_field)
            .field("url_field", &self.url_field)
            .field("thumbnail_field", &self.thumbnail_field)
            .field("id_field", &self.id_field)
            .field("allowed_schemes", &self.allowed_schemes)
            .field("notifier", &self.notifier.as_ref().map(|_| "<closure>"))
            .field("track_clicks", &self.track_clicks)
            .field("click_tags", &self.click_tags)
            .finish()
    }
}

impl ResultPresenter {
    pub fn builder(base_url: impl Into<String>) -> ResultPresenterBuilder {
        ResultPresenterBuilder::new(base_url)
    }

    fn sanitize_field(&self, result: &SearchResult, field: Option<&str>) -> Option<String> {
        let candidate = extract_field(result, field?, FieldVariant::Raw)?;
        sanitize_url_with(&candidate, &self.base_url, &self.allowed_schemes)
    }

    /// Render one result.
    pub fn present(&self, result: &SearchResult) -> DisplayResult {
        let url = self.sanitize_field(result, self.url_field.as_deref());
        let thumbnail = self.sanitize_field(result, self.thumbnail_field.as_deref());

        let title_html = self
            .title_field
            .as_deref()
            .and_then(|field| result.get(field))
            .and_then(|value| value.as_wrapper())
            .map(escape_wrapper)
            .filter(|html| !html.is_empty());

        let title = match (title_html, url.as_ref()) {
            (Some(html), Some(href)) => TitleSlot::Linked {
                html,
                href: href.clone(),
            },
            (Some(html), None) => TitleSlot::Plain(html),
            (None, _) => TitleSlot::Hidden,
        };

        let designated: Vec<&str> = [
            self.title_field.as_deref(),
            self.url_field.as_deref(),
            self.thumbnail_field.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        let fields = project(result)
            .into_iter()
            .filter(|(name, value)| {
                !value.is_empty() && !designated.contains(&name.as_str())
            })
            .map(|(name, value)| DisplayField { name, value })
            .collect();

        let activation = match (&title, &self.notifier) {
            (TitleSlot::Linked { href, .. }, Some(notifier)) if self.track_clicks => {
                Some(LinkActivation {
                    notifier: Arc::clone(notifier),
                    document_id: self
                        .id_field
                        .as_deref()
                        .and_then(|field| extract_field(result, field, FieldVariant::Raw)),
                    url: href.clone(),
                    tags: self.click_tags.clone(),
                })
            }
            _ => None,
        };

        DisplayResult {
            title,
            url,
            thumbnail,
            fields,
            activation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn presenter() -> ResultPresenter {
        ResultPresenter::builder("https://x/")
            .title_field("title")
            .url_field("url")
            .thumbnail_field("thumb")
            .build()
            .expect("valid presenter")
    }

    fn result(value: serde_json::Value) -> SearchResult {
        SearchResult::from_value(value)
    }

    #[test]
    fn title_and_url_render_as_link() {
        let display = presenter().present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "https://y/z"}
        })));
        assert_eq!(
            display.title,
            TitleSlot::Linked {
                html: "hello".into(),
                href: "https://y/z".into()
            }
        );
    }

    #[test]
    fn title_without_url_renders_plain() {
        let display = presenter().present(&result(json!({
            "title": {"raw": "hello"}
        })));
        assert_eq!(display.title, TitleSlot::Plain("hello".into()));
        assert_eq!(display.url, None);
    }

    #[test]
    fn rejected_url_degrades_title_to_plain() {
        // The three-state contract: a failed sanitization must not leave a
        // clickable title behind.
        let display = presenter().present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "javascript:alert(1)"}
        })));
        assert_eq!(display.title, TitleSlot::Plain("hello".into()));
        assert_eq!(display.url, None);
    }

    #[test]
    fn missing_title_hides_the_slot() {
        let display = presenter().present(&result(json!({
            "url": {"raw": "https://y/z"}
        })));
        assert_eq!(display.title, TitleSlot::Hidden);
        assert_eq!(display.url.as_deref(), Some("https://y/z"));
    }

    #[test]
    fn non_wrapper_title_hides_the_slot() {
        let display = presenter().present(&result(json!({
            "title": "bare metadata string"
        })));
        assert_eq!(display.title, TitleSlot::Hidden);
    }

    #[test]
    fn designated_fields_stay_out_of_the_detail_list() {
        let display = presenter().present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "https://y/z"},
            "thumb": {"raw": "https://y/t.png"},
            "likes": {"raw": 3},
            "_meta": "opaque"
        })));
        let names: Vec<&str> = display.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["likes"]);
        assert_eq!(display.thumbnail.as_deref(), Some("https://y/t.png"));
    }

    #[test]
    fn empty_projection_rows_are_dropped() {
        let display = presenter().present(&result(json!({
            "ghost": {"raw": null},
            "body": {"raw": "text"}
        })));
        let names: Vec<&str> = display.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["body"]);
    }

    #[test]
    fn blank_field_name_is_a_setup_fault() {
        let err = ResultPresenter::builder("https://x/")
            .title_field("   ")
            .build()
            .expect_err("blank field name");
        assert!(matches!(err, SightlineError::Config(_)));
    }

    #[test]
    fn bad_base_url_is_a_setup_fault() {
        let err = ResultPresenter::builder("not a url")
            .build()
            .expect_err("bad base");
        assert!(matches!(err, SightlineError::Config(_)));
    }

    #[test]
    fn empty_scheme_override_is_a_setup_fault() {
        let err = ResultPresenter::builder("https://x/")
            .allowed_schemes(Vec::<String>::new())
            .build()
            .expect_err("empty allow-list");
        assert!(matches!(err, SightlineError::Config(_)));
    }

    #[test]
    fn click_through_fires_once_per_activation_with_payload() {
        let events: Arc<Mutex<Vec<ClickThrough>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let presenter = ResultPresenter::builder("https://x/")
            .title_field("title")
            .url_field("url")
            .id_field("id")
            .click_tags(["demo"])
            .on_click(Arc::new(move |event| {
                sink.lock().expect("event sink").push(event);
            }))
            .build()
            .expect("valid presenter");

        let display = presenter.present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "/docs"},
            "id": {"raw": "doc-1"}
        })));

        assert!(display.activate_link());
        let got = events.lock().expect("event sink");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].url, "https://x/docs");
        assert_eq!(got[0].document_id.as_deref(), Some("doc-1"));
        assert_eq!(got[0].tags, vec!["demo".to_string()]);
    }

    #[test]
    fn plain_title_never_notifies() {
        let events: Arc<Mutex<Vec<ClickThrough>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let presenter = ResultPresenter::builder("https://x/")
            .title_field("title")
            .url_field("url")
            .on_click(Arc::new(move |event| {
                sink.lock().expect("event sink").push(event);
            }))
            .build()
            .expect("valid presenter");

        let display = presenter.present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "javascript:alert(1)"}
        })));

        assert!(!display.activate_link());
        assert!(events.lock().expect("event sink").is_empty());
    }

    #[test]
    fn tracking_can_be_disabled_without_removing_the_notifier() {
        let events: Arc<Mutex<Vec<ClickThrough>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let presenter = ResultPresenter::builder("https://x/")
            .title_field("title")
            .url_field("url")
            .track_clicks(false)
            .on_click(Arc::new(move |event| {
                sink.lock().expect("event sink").push(event);
            }))
            .build()
            .expect("valid presenter");

        let display = presenter.present(&result(json!({
            "title": {"raw": "hello"},
            "url": {"raw": "https://y/z"}
        })));

        // Still a link, just untracked.
        assert!(matches!(display.title, TitleSlot::Linked { .. }));
        assert!(!display.activate_link());
        assert!(events.lock().expect("event sink").is_empty());
    }

    #[test]
    fn scheme_override_threads_through_presentation() {
        let presenter = ResultPresenter::builder("https://x/")
            .title_field("title")
            .url_field("url")
            .allowed_schemes(["ftp"])
            .build()
            .expect("valid presenter");

        let display = presenter.present(&result(json!({
            "title": {"raw": "archive"},
            "url": {"raw": "ftp://files.example.com/a"}
        })));
        assert_eq!(display.url.as_deref(), Some("ftp://files.example.com/a"));

        // https is off the list once overridden.
        let display = presenter.present(&result(json!({
            "title": {"raw": "archive"},
            "url": {"raw": "https://y/z"}
        })));
        assert_eq!(display.url, None);
    }
}
