//! Editor tab adapter between an intercepting runtime and the cookie core.
//!
//! The runtime shows one tab per open request. Each tab holds the captured
//! message and the operator's override text, and shares a single
//! [`OverrideStore`] with every other tab so the last payload used for a host
//! is recalled the next time a request to that host is shown.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{AppConfig, RememberPolicy, config};
use crate::cookie::{CookieMerger, MergeError, Outcome, parse_overrides};
use crate::http::{RequestInfo, build_message, host};
use crate::store::OverrideStore;

pub struct EditorTab {
    store: Arc<OverrideStore>,
    merger: CookieMerger,
    remember: RememberPolicy,
    caption: String,
    current_message: Option<Vec<u8>>,
    text: String,
}

impl EditorTab {
    /// Creates a tab using the process-wide config.
    pub fn new(store: Arc<OverrideStore>) -> Self {
        Self::with_config(store, config())
    }

    pub fn with_config(store: Arc<OverrideStore>, cfg: &AppConfig) -> Self {
        Self {
            store,
            merger: CookieMerger::new(cfg.empty_cookie_header),
            remember: cfg.remember,
            caption: cfg.tab_caption.clone(),
            current_message: None,
            text: String::new(),
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Cookies are only edited on requests.
    pub fn is_enabled(&self, is_request: bool) -> bool {
        is_request
    }

    /// Shows a new message in the tab.
    ///
    /// When the request's host already has a remembered payload, it replaces
    /// the tab text. Otherwise the text is left as it was.
    pub fn set_message(&mut self, content: Option<&[u8]>) {
        self.current_message = content.map(<[u8]>::to_vec);
        let Some(content) = content else {
            return;
        };

        let info = RequestInfo::analyze(content);
        let Some(host) = host(&info.headers) else {
            return;
        };

        if let Some(payload) = self.store.get(&host) {
            debug!(%host, "recalled cookie overrides");
            self.text = payload;
        }
    }

    pub fn message(&self) -> Option<&[u8]> {
        self.current_message.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.current_message.is_some()
    }

    pub fn selected_data(&self) -> Option<&[u8]> {
        None
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Applies the tab text to the current message.
    ///
    /// Returns `None` when no message is shown. The payload is checked before
    /// the `Cookie` header is looked up, so an invalid payload is reported even
    /// for requests without cookies. On [`Outcome::Applied`] the current message
    /// is replaced by the rewritten one.
    pub fn apply(&mut self) -> Option<Outcome> {
        let content = self.current_message.as_deref()?;

        let overrides = match parse_overrides(&self.text) {
            Ok(overrides) => overrides,
            Err(err) => {
                warn!("{}", MergeError::from(err));
                return Some(Outcome::InvalidOverridePayload);
            }
        };

        let info = RequestInfo::analyze(content);
        let host = host(&info.headers);
        if host.is_none() {
            debug!("request has no host, overrides will not be remembered");
        }

        if self.remember == RememberPolicy::OnValidPayload {
            self.remember_for(host.as_deref());
        }

        let new_headers = match self.merger.rewrite(&info.headers, &overrides) {
            Ok(new_headers) => new_headers,
            Err(err) => {
                debug!("{err}");
                return Some(err.outcome());
            }
        };

        if self.remember == RememberPolicy::OnSuccess {
            self.remember_for(host.as_deref());
        }

        let message = build_message(&new_headers, info.body(content));
        self.current_message = Some(message);
        info!(host = host.as_deref().unwrap_or("-"), "Cookies updated");
        Some(Outcome::Applied)
    }

    fn remember_for(&self, host: Option<&str>) {
        if let Some(host) = host {
            self.store.put(host, &self.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmptyCookieHeader;

    const REQUEST: &[u8] =
        b"POST /cart HTTP/1.1\r\nHost: shop.test\r\nCookie: session=old; theme=dark\r\nContent-Length: 3\r\n\r\nq=1";
    const PAYLOAD: &str = r#"[{"name":"session","value":"new"}]"#;

    fn tab_with(store: &Arc<OverrideStore>, remember: RememberPolicy) -> EditorTab {
        let cfg = AppConfig {
            remember,
            ..AppConfig::default()
        };
        EditorTab::with_config(Arc::clone(store), &cfg)
    }

    #[test]
    fn test_metadata() {
        let tab = EditorTab::with_config(Arc::new(OverrideStore::new()), &AppConfig::default());
        assert_eq!(tab.caption(), "Cookies");
        assert!(tab.is_enabled(true));
        assert!(!tab.is_enabled(false));
        assert!(!tab.is_modified());
        assert!(tab.selected_data().is_none());
    }

    #[test]
    fn test_apply_without_message() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnValidPayload);
        tab.set_text(PAYLOAD);
        assert_eq!(tab.apply(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_rewrites_message_and_remembers() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnValidPayload);
        tab.set_message(Some(REQUEST));
        tab.set_text(PAYLOAD);

        assert_eq!(tab.apply(), Some(Outcome::Applied));
        assert_eq!(
            tab.message().unwrap(),
            &b"POST /cart HTTP/1.1\r\nHost: shop.test\r\nCookie: session=new; theme=dark\r\nContent-Length: 3\r\n\r\nq=1"[..]
        );
        assert!(tab.is_modified());
        assert_eq!(store.get("shop.test").as_deref(), Some(PAYLOAD));
    }

    #[test]
    fn test_recall_on_next_request_to_same_host() {
        let store = Arc::new(OverrideStore::new());
        let mut first = tab_with(&store, RememberPolicy::OnValidPayload);
        first.set_message(Some(REQUEST));
        first.set_text(PAYLOAD);
        first.apply();

        let mut second = tab_with(&store, RememberPolicy::OnValidPayload);
        second.set_message(Some(b"GET / HTTP/1.1\r\nHost: shop.test\r\n\r\n"));
        assert_eq!(second.text(), PAYLOAD);

        let mut other = tab_with(&store, RememberPolicy::OnValidPayload);
        other.set_message(Some(b"GET / HTTP/1.1\r\nHost: other.test\r\n\r\n"));
        assert_eq!(other.text(), "");
    }

    #[test]
    fn test_invalid_payload_changes_nothing() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnValidPayload);
        tab.set_message(Some(REQUEST));
        tab.set_text("not json");

        assert_eq!(tab.apply(), Some(Outcome::InvalidOverridePayload));
        assert_eq!(tab.message(), Some(REQUEST));
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_cookie_header_remembers_on_valid_payload() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnValidPayload);
        let request: &[u8] = b"GET / HTTP/1.1\r\nHost: shop.test\r\n\r\n";
        tab.set_message(Some(request));
        tab.set_text(PAYLOAD);

        assert_eq!(tab.apply(), Some(Outcome::NoCookieHeader));
        assert_eq!(tab.message(), Some(request));
        assert_eq!(store.get("shop.test").as_deref(), Some(PAYLOAD));
    }

    #[test]
    fn test_no_cookie_header_forgets_on_success_policy() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnSuccess);
        tab.set_message(Some(b"GET / HTTP/1.1\r\nHost: shop.test\r\n\r\n"));
        tab.set_text(PAYLOAD);

        assert_eq!(tab.apply(), Some(Outcome::NoCookieHeader));
        assert!(store.is_empty());

        tab.set_message(Some(REQUEST));
        assert_eq!(tab.apply(), Some(Outcome::Applied));
        assert_eq!(store.get("shop.test").as_deref(), Some(PAYLOAD));
    }

    #[test]
    fn test_missing_host_still_rewrites() {
        let store = Arc::new(OverrideStore::new());
        let mut tab = tab_with(&store, RememberPolicy::OnValidPayload);
        tab.set_message(Some(b"GET / HTTP/1.1\r\nCookie: session=old\r\n\r\n"));
        tab.set_text(PAYLOAD);

        assert_eq!(tab.apply(), Some(Outcome::Applied));
        assert_eq!(
            tab.message().unwrap(),
            &b"GET / HTTP/1.1\r\nCookie: session=new\r\n\r\n"[..]
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_omit_policy_drops_empty_header() {
        let cfg = AppConfig {
            empty_cookie_header: EmptyCookieHeader::Omit,
            ..AppConfig::default()
        };
        let mut tab = EditorTab::with_config(Arc::new(OverrideStore::new()), &cfg);
        tab.set_message(Some(b"GET / HTTP/1.1\r\nHost: a\r\nCookie: junk\r\n\r\n"));
        tab.set_text("[]");

        assert_eq!(tab.apply(), Some(Outcome::Applied));
        assert_eq!(tab.message().unwrap(), &b"GET / HTTP/1.1\r\nHost: a\r\n\r\n"[..]);
    }

    #[test]
    fn test_clear_and_empty_message() {
        let mut tab = EditorTab::with_config(Arc::new(OverrideStore::new()), &AppConfig::default());
        tab.set_text(PAYLOAD);
        tab.clear();
        assert_eq!(tab.text(), "");

        tab.set_message(None);
        assert!(!tab.is_modified());
        assert_eq!(tab.apply(), None);
    }
}
