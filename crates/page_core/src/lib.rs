//! Controller for the directory site's interactive page behavior: search,
//! contact form validation, navigation dropdowns, browse grids, the mobile
//! menu, and corner notices.
//!
//! The controller owns no page structure. It resolves element handles from
//! an injected [`dom::Document`] during one startup pass, talks to the
//! directory service through a [`DirectoryApi`] implementation, and routes
//! outward side effects (full-page navigation, blocking alerts) through the
//! [`Navigator`] and [`UserPrompt`] seams so hosts and tests can supply
//! their own surfaces.

use std::collections::HashMap;
use std::sync::Arc;

use directory_client::DirectoryApi;
use dom::{Document, NodeId};
use shared::domain::{CityListing, StateListing};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

pub mod events;
pub mod format;
pub mod notify;

use events::{Key, PageEvent};
use notify::NoticeKind;

/// Element identifiers the rendered page is expected to provide. Any of
/// them may be absent; the matching behaviors then degrade to no-ops.
pub const SEARCH_INPUT_ID: &str = "searchInput";
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const NAV_STATE_LINKS_ID: &str = "navStateLinks";
pub const NAV_CITY_LINKS_ID: &str = "navCityLinks";
pub const NAV_MENU_ID: &str = "navMenu";
pub const MOBILE_MENU_OVERLAY_ID: &str = "mobileMenuOverlay";
pub const MOBILE_MENU_TOGGLE_CLASS: &str = "mobile-menu-toggle";

const ACTIVE_CLASS: &str = "active";
const MENU_OPEN_CLASS: &str = "menu-open";
const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! We'll get back to you soon.";

/// Full-page navigation sink.
pub trait Navigator: Send + Sync {
    fn assign(&self, url: &str);
}

/// Null object for hosts constructed without a navigation surface.
pub struct MissingNavigator;

impl Navigator for MissingNavigator {
    fn assign(&self, url: &str) {
        warn!(%url, "navigation requested but no navigator is installed");
    }
}

/// Blocking alert dialog.
pub trait UserPrompt: Send + Sync {
    fn alert(&self, message: &str);
}

/// Null object for hosts constructed without a prompt surface.
pub struct MissingUserPrompt;

impl UserPrompt for MissingUserPrompt {
    fn alert(&self, message: &str) {
        warn!(%message, "alert requested but no prompt surface is installed");
    }
}

/// Contact form rejection reasons; the display strings are the alert texts
/// shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFormError {
    #[error("Please fill in all required fields.")]
    MissingRequiredFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// Validates the extracted contact form fields. `name`, `email`, and
/// `message` must be present and non-empty; `email` must additionally look
/// like an address.
pub fn validate_contact_form(
    fields: &HashMap<String, String>,
) -> Result<(), ContactFormError> {
    let filled = |key: &str| fields.get(key).is_some_and(|value| !value.is_empty());
    if !(filled("name") && filled("email") && filled("message")) {
        return Err(ContactFormError::MissingRequiredFields);
    }
    let email = fields.get("email").map(String::as_str).unwrap_or_default();
    if !is_valid_email(email) {
        return Err(ContactFormError::InvalidEmail);
    }
    Ok(())
}

/// Accepts `local@domain` where neither side is empty, nothing contains
/// whitespace or a second `@`, and the domain carries an interior dot.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Observable controller activity, published for hosts and tests.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    NavigationLoaded { states: usize, cities: usize },
    SearchRequested { url: String },
    ContactRejected { reason: String },
    ContactAccepted,
    MenuToggled { open: bool },
    NoticeShown { notice_id: String, kind: NoticeKind },
    NoticeDismissed { notice_id: String },
}

/// Element handles resolved once during the startup pass.
#[derive(Default)]
struct PageHandles {
    search_input: Option<NodeId>,
    contact_form: Option<NodeId>,
    nav_state_links: Option<NodeId>,
    nav_city_links: Option<NodeId>,
    nav_menu: Option<NodeId>,
    menu_toggle: Option<NodeId>,
    menu_overlay: Option<NodeId>,
}

pub struct PageController {
    document: Arc<Document>,
    api: Arc<dyn DirectoryApi>,
    navigator: Arc<dyn Navigator>,
    prompt: Arc<dyn UserPrompt>,
    site_base: Url,
    inner: Mutex<PageHandles>,
    events: broadcast::Sender<ControllerEvent>,
}

impl PageController {
    pub fn new(
        document: Arc<Document>,
        api: Arc<dyn DirectoryApi>,
        site_base: Url,
    ) -> Arc<Self> {
        Self::new_with_dependencies(
            document,
            api,
            site_base,
            Arc::new(MissingNavigator),
            Arc::new(MissingUserPrompt),
        )
    }

    pub fn new_with_dependencies(
        document: Arc<Document>,
        api: Arc<dyn DirectoryApi>,
        site_base: Url,
        navigator: Arc<dyn Navigator>,
        prompt: Arc<dyn UserPrompt>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            document,
            api,
            navigator,
            prompt,
            site_base,
            inner: Mutex::new(PageHandles::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// One-time startup pass: resolve the page contract's element handles,
    /// install the notice stylesheet, and load the navigation dropdowns.
    pub async fn initialize(&self) {
        {
            let mut handles = self.inner.lock().await;
            handles.search_input = self.document.element_by_id(SEARCH_INPUT_ID).await;
            handles.contact_form = self.document.element_by_id(CONTACT_FORM_ID).await;
            handles.nav_state_links = self.document.element_by_id(NAV_STATE_LINKS_ID).await;
            handles.nav_city_links = self.document.element_by_id(NAV_CITY_LINKS_ID).await;
            handles.nav_menu = self.document.element_by_id(NAV_MENU_ID).await;
            handles.menu_toggle = self.document.first_by_class(MOBILE_MENU_TOGGLE_CLASS).await;
            handles.menu_overlay = self.document.element_by_id(MOBILE_MENU_OVERLAY_ID).await;
        }
        self.document
            .install_style(notify::NOTIFICATION_STYLE_ID, notify::NOTIFICATION_KEYFRAMES)
            .await;
        self.load_navigation().await;
        info!("page: controller initialized");
    }

    /// Routes one page event to its named handler.
    pub async fn dispatch(&self, event: PageEvent) {
        match event {
            PageEvent::Loaded => self.initialize().await,
            PageEvent::KeyPress { target, key } => self.on_search_keypress(target, key).await,
            PageEvent::KeyDown { key } => self.on_escape_keydown(key).await,
            PageEvent::Click { target } => {
                self.on_anchor_click(target).await;
                self.on_document_click(target).await;
            }
            PageEvent::Submit { form } => self.on_form_submit(form).await,
        }
    }

    async fn on_search_keypress(&self, target: NodeId, key: Key) {
        if key != Key::Enter {
            return;
        }
        let search_input = self.inner.lock().await.search_input;
        if search_input == Some(target) {
            self.perform_search().await;
        }
    }

    /// Sends the browser to the search results page for the current input
    /// value. Blank input is a no-op.
    pub async fn perform_search(&self) {
        let Some(input) = self.inner.lock().await.search_input else {
            return;
        };
        let query = self.document.value(input).await.trim().to_lowercase();
        if query.is_empty() {
            return;
        }
        let mut url = match self.site_base.join("/search") {
            Ok(url) => url,
            Err(err) => {
                error!("search: failed to build results url: {err}");
                return;
            }
        };
        url.query_pairs_mut().append_pair("q", &query);
        info!(%query, "search: navigating to results");
        self.navigator.assign(url.as_str());
        let _ = self
            .events
            .send(ControllerEvent::SearchRequested { url: url.into() });
    }

    async fn on_form_submit(&self, form: NodeId) {
        let contact_form = self.inner.lock().await.contact_form;
        if contact_form == Some(form) {
            self.submit_contact_form(form).await;
        }
    }

    /// Client-only contact flow: validate, alert the outcome, and reset the
    /// form on acceptance. Nothing is transmitted anywhere.
    async fn submit_contact_form(&self, form: NodeId) {
        let fields = self.document.form_data(form).await;
        match validate_contact_form(&fields) {
            Err(err) => {
                self.prompt.alert(&err.to_string());
                let _ = self.events.send(ControllerEvent::ContactRejected {
                    reason: err.to_string(),
                });
            }
            Ok(()) => {
                self.prompt.alert(CONTACT_SUCCESS_MESSAGE);
                self.document.reset_form(form).await;
                let _ = self.events.send(ControllerEvent::ContactAccepted);
            }
        }
    }

    /// Loads both navigation dropdowns. The two requests run concurrently
    /// and fail independently: one endpoint going down still leaves the
    /// other dropdown populated.
    pub async fn load_navigation(&self) {
        let (states, cities) = tokio::join!(self.api.top_states(), self.api.top_cities());

        let (state_links, city_links) = {
            let handles = self.inner.lock().await;
            (handles.nav_state_links, handles.nav_city_links)
        };

        let mut state_count = 0;
        match states {
            Ok(states) => {
                if let Some(container) = state_links {
                    let links = states
                        .iter()
                        .map(|state| (format!("/states/{}", state.slug), state.name.clone()))
                        .collect::<Vec<_>>();
                    self.append_links(container, &links).await;
                    state_count = states.len();
                    info!(count = state_count, "nav: state links populated");
                }
            }
            Err(err) => error!("nav: failed to load top states: {err}"),
        }

        let mut city_count = 0;
        match cities {
            Ok(cities) => {
                if let Some(container) = city_links {
                    let links = cities
                        .iter()
                        .map(|city| {
                            (
                                format!("/cities/{}", city.slug),
                                format!("{}, {}", city.name, city.state),
                            )
                        })
                        .collect::<Vec<_>>();
                    self.append_links(container, &links).await;
                    city_count = cities.len();
                    info!(count = city_count, "nav: city links populated");
                }
            }
            Err(err) => error!("nav: failed to load top cities: {err}"),
        }

        let _ = self.events.send(ControllerEvent::NavigationLoaded {
            states: state_count,
            cities: city_count,
        });
    }

    async fn append_links(&self, container: NodeId, links: &[(String, String)]) {
        for (href, label) in links {
            let link = self.document.create_element("a").await;
            self.document.set_attribute(link, "href", href).await;
            self.document.set_text(link, label).await;
            self.document.append_child(container, link).await;
        }
    }

    /// Replaces the container's content with one card per state.
    pub async fn populate_states_grid(&self, container_id: &str, states: &[StateListing]) {
        let Some(container) = self.document.element_by_id(container_id).await else {
            return;
        };
        let mut cards = Vec::with_capacity(states.len());
        for state in states {
            cards.push(self.build_state_card(state).await);
        }
        self.document.replace_children(container, cards).await;
        info!(count = states.len(), container = %container_id, "grid: state cards rendered");
    }

    async fn build_state_card(&self, state: &StateListing) -> NodeId {
        let doc = &self.document;
        let card = doc.create_element("a").await;
        doc.add_class(card, "state-card").await;
        doc.set_attribute(card, "href", &format!("/states/{}", state.slug))
            .await;

        let heading = doc.create_element("h3").await;
        doc.set_text(heading, &state.name).await;
        doc.append_child(card, heading).await;

        let description = doc.create_element("p").await;
        doc.set_text(
            description,
            &format!(
                "Find {} businesses across {} cities in {}",
                state.business_count, state.city_count, state.name
            ),
        )
        .await;
        doc.append_child(card, description).await;

        let stats = doc.create_element("div").await;
        doc.add_class(stats, "state-stats").await;
        let businesses = doc.create_element("span").await;
        doc.set_text(businesses, &format!("{} Businesses", state.business_count))
            .await;
        doc.append_child(stats, businesses).await;
        let cities = doc.create_element("span").await;
        doc.set_text(cities, &format!("{} Cities", state.city_count))
            .await;
        doc.append_child(stats, cities).await;
        doc.append_child(card, stats).await;

        card
    }

    /// Replaces the container's content with one card per city.
    pub async fn populate_cities_grid(&self, container_id: &str, cities: &[CityListing]) {
        let Some(container) = self.document.element_by_id(container_id).await else {
            return;
        };
        let mut cards = Vec::with_capacity(cities.len());
        for city in cities {
            let doc = &self.document;
            let card = doc.create_element("a").await;
            doc.add_class(card, "city-card").await;
            doc.set_attribute(card, "href", &format!("/cities/{}", city.slug))
                .await;
            let heading = doc.create_element("h3").await;
            doc.set_text(heading, &city.name).await;
            doc.append_child(card, heading).await;
            let count = doc.create_element("p").await;
            doc.set_text(count, &format!("{} businesses", city.business_count))
                .await;
            doc.append_child(card, count).await;
            cards.push(card);
        }
        self.document.replace_children(container, cards).await;
        info!(count = cities.len(), container = %container_id, "grid: city cards rendered");
    }

    /// Slug of the state page currently shown, if the location is one.
    pub async fn current_state_slug(&self) -> Option<String> {
        path_segment_after(&self.document.location_path().await, "/states/")
    }

    /// Slug of the city page currently shown, if the location is one.
    pub async fn current_city_slug(&self) -> Option<String> {
        path_segment_after(&self.document.location_path().await, "/cities/")
    }

    /// Flips the mobile menu between open and closed. Menu state lives
    /// entirely in class membership on the menu, toggle, overlay, and body.
    pub async fn toggle_mobile_menu(&self) {
        let (menu, toggle, overlay) = self.menu_elements().await;
        let (Some(menu), Some(toggle)) = (menu, toggle) else {
            return;
        };
        let open = self.document.toggle_class(menu, ACTIVE_CLASS).await;
        self.document.toggle_class(toggle, ACTIVE_CLASS).await;
        if let Some(overlay) = overlay {
            self.document.toggle_class(overlay, ACTIVE_CLASS).await;
        }
        self.document
            .toggle_class(self.document.body(), MENU_OPEN_CLASS)
            .await;
        let _ = self.events.send(ControllerEvent::MenuToggled { open });
    }

    async fn menu_elements(&self) -> (Option<NodeId>, Option<NodeId>, Option<NodeId>) {
        let handles = self.inner.lock().await;
        (handles.nav_menu, handles.menu_toggle, handles.menu_overlay)
    }

    async fn close_mobile_menu(&self) {
        let (menu, toggle, overlay) = self.menu_elements().await;
        let (Some(menu), Some(toggle)) = (menu, toggle) else {
            return;
        };
        let was_open = self.document.has_class(menu, ACTIVE_CLASS).await;
        self.document.remove_class(menu, ACTIVE_CLASS).await;
        self.document.remove_class(toggle, ACTIVE_CLASS).await;
        if let Some(overlay) = overlay {
            self.document.remove_class(overlay, ACTIVE_CLASS).await;
        }
        self.document
            .remove_class(self.document.body(), MENU_OPEN_CLASS)
            .await;
        if was_open {
            let _ = self.events.send(ControllerEvent::MenuToggled { open: false });
        }
    }

    /// Closes the menu when the click landed outside the menu, its toggle,
    /// and the overlay.
    async fn on_document_click(&self, target: NodeId) {
        let (menu, toggle, overlay) = self.menu_elements().await;
        let (Some(menu), Some(toggle)) = (menu, toggle) else {
            return;
        };
        let mut inside = self.document.contains(menu, target).await
            || self.document.contains(toggle, target).await;
        if let Some(overlay) = overlay {
            inside = inside || self.document.contains(overlay, target).await;
        }
        if !inside {
            self.close_mobile_menu().await;
        }
    }

    async fn on_escape_keydown(&self, key: Key) {
        if key != Key::Escape {
            return;
        }
        let menu = self.inner.lock().await.nav_menu;
        let Some(menu) = menu else {
            return;
        };
        if self.document.has_class(menu, ACTIVE_CLASS).await {
            self.close_mobile_menu().await;
        }
    }

    /// Same-page anchors (`href="#section"`) scroll their target into view
    /// instead of navigating.
    async fn on_anchor_click(&self, target: NodeId) {
        if self.document.tag(target).await != "a" {
            return;
        }
        let Some(href) = self.document.attribute(target, "href").await else {
            return;
        };
        let Some(anchor_id) = href.strip_prefix('#') else {
            return;
        };
        if anchor_id.is_empty() {
            return;
        }
        if let Some(section) = self.document.element_by_id(anchor_id).await {
            self.document.scroll_into_view(section).await;
        }
    }

    /// Shows a floating error notice that auto-dismisses after
    /// [`notify::NOTICE_DISMISS_DELAY`]. Returns the notice element id.
    pub async fn show_error(self: &Arc<Self>, message: &str) -> String {
        self.show_notice(NoticeKind::Error, message).await
    }

    /// Success counterpart of [`PageController::show_error`].
    pub async fn show_success(self: &Arc<Self>, message: &str) -> String {
        self.show_notice(NoticeKind::Success, message).await
    }

    async fn show_notice(self: &Arc<Self>, kind: NoticeKind, message: &str) -> String {
        let notice_id = format!("notice-{}", Uuid::new_v4());
        let doc = &self.document;
        let notice = doc.create_element("div").await;
        doc.set_id(notice, &notice_id).await;
        doc.add_class(notice, "notification").await;
        doc.add_class(notice, kind.class()).await;
        doc.set_attribute(notice, "style", &notify::inline_style(kind))
            .await;
        doc.set_text(notice, message).await;
        doc.append_child(doc.body(), notice).await;
        let _ = self.events.send(ControllerEvent::NoticeShown {
            notice_id: notice_id.clone(),
            kind,
        });

        let controller = Arc::clone(self);
        let dismissed_id = notice_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(notify::NOTICE_DISMISS_DELAY).await;
            controller.document.remove(notice).await;
            let _ = controller.events.send(ControllerEvent::NoticeDismissed {
                notice_id: dismissed_id,
            });
        });

        notice_id
    }

    /// Swaps a button's label for a loading placeholder and disables it,
    /// returning the original label for [`PageController::end_button_loading`].
    pub async fn begin_button_loading(&self, button: NodeId) -> String {
        let original = self.document.text(button).await;
        self.document.set_text(button, "Loading...").await;
        self.document
            .set_attribute(button, "disabled", "disabled")
            .await;
        original
    }

    pub async fn end_button_loading(&self, button: NodeId, label: &str) {
        self.document.set_text(button, label).await;
        self.document.remove_attribute(button, "disabled").await;
    }
}

fn path_segment_after(path: &str, prefix: &str) -> Option<String> {
    let (_, rest) = path.split_once(prefix)?;
    rest.split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
