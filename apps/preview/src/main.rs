//! Headless preview of the directory site's page behavior: builds the page
//! contract in memory, runs the controller's startup pass against a live
//! directory API, and prints what a visitor's page would show.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use directory_client::{load_cities, load_states, HttpDirectoryApi};
use dom::{Document, NodeId};
use page_core::{
    events::{Key, PageEvent},
    ControllerEvent, Navigator, PageController, UserPrompt,
};
use tracing::info;
use url::Url;

mod config;

#[derive(Parser, Debug)]
struct Args {
    /// Directory API base URL; falls back to site.toml / environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Simulated location path for the previewed page.
    #[arg(long, default_value = "/")]
    path: String,
    /// Search query to submit after startup.
    #[arg(long)]
    search: Option<String>,
    /// Also render the browse-all-states grid.
    #[arg(long)]
    browse: bool,
}

struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn assign(&self, url: &str) {
        info!(%url, "navigate");
    }
}

struct TracingPrompt;

impl UserPrompt for TracingPrompt {
    fn alert(&self, message: &str) {
        info!(%message, "alert");
    }
}

struct PreviewPage {
    search_input: NodeId,
    states_grid: NodeId,
    cities_grid: NodeId,
    nav_state_links: NodeId,
    nav_city_links: NodeId,
}

/// Builds the element structure the rendered site provides.
async fn build_page(doc: &Document) -> PreviewPage {
    let body = doc.body();

    let search_input = doc.create_element("input").await;
    doc.set_id(search_input, page_core::SEARCH_INPUT_ID).await;
    doc.append_child(body, search_input).await;

    let nav_state_links = doc.create_element("div").await;
    doc.set_id(nav_state_links, page_core::NAV_STATE_LINKS_ID).await;
    doc.append_child(body, nav_state_links).await;

    let nav_city_links = doc.create_element("div").await;
    doc.set_id(nav_city_links, page_core::NAV_CITY_LINKS_ID).await;
    doc.append_child(body, nav_city_links).await;

    let menu = doc.create_element("nav").await;
    doc.set_id(menu, page_core::NAV_MENU_ID).await;
    doc.append_child(body, menu).await;

    let toggle = doc.create_element("button").await;
    doc.add_class(toggle, page_core::MOBILE_MENU_TOGGLE_CLASS).await;
    doc.append_child(body, toggle).await;

    let overlay = doc.create_element("div").await;
    doc.set_id(overlay, page_core::MOBILE_MENU_OVERLAY_ID).await;
    doc.append_child(body, overlay).await;

    let states_grid = doc.create_element("div").await;
    doc.set_id(states_grid, "statesGrid").await;
    doc.append_child(body, states_grid).await;

    let cities_grid = doc.create_element("div").await;
    doc.set_id(cities_grid, "citiesGrid").await;
    doc.append_child(body, cities_grid).await;

    PreviewPage {
        search_input,
        states_grid,
        cities_grid,
        nav_state_links,
        nav_city_links,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let mut settings = config::load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }

    let site_base = Url::parse(&settings.site_base_url)?;
    let document = Arc::new(Document::new());
    document.set_location_path(&args.path).await;
    let page = build_page(&document).await;

    let api = Arc::new(HttpDirectoryApi::new(settings.api_base_url));
    let controller = PageController::new_with_dependencies(
        Arc::clone(&document),
        Arc::clone(&api) as Arc<dyn directory_client::DirectoryApi>,
        site_base,
        Arc::new(TracingNavigator),
        Arc::new(TracingPrompt),
    );
    let mut events = controller.subscribe_events();

    controller.dispatch(PageEvent::Loaded).await;

    while let Ok(event) = events.try_recv() {
        if let ControllerEvent::NavigationLoaded { states, cities } = event {
            println!("Navigation loaded: {states} state links, {cities} city links");
        }
    }
    println!(
        "Dropdown containers: {} state links, {} city links",
        document.child_count(page.nav_state_links).await,
        document.child_count(page.nav_city_links).await,
    );

    if let Some(slug) = controller.current_state_slug().await {
        println!("Viewing state page: {slug}");
        let cities = load_cities(api.as_ref(), &slug).await;
        controller.populate_cities_grid("citiesGrid", &cities).await;
        println!(
            "Cities grid: {} cards",
            document.child_count(page.cities_grid).await
        );
    }
    if let Some(slug) = controller.current_city_slug().await {
        println!("Viewing city page: {slug}");
    }

    if args.browse {
        let states = load_states(api.as_ref()).await;
        controller.populate_states_grid("statesGrid", &states).await;
        println!(
            "States grid: {} cards",
            document.child_count(page.states_grid).await
        );
    }

    if let Some(query) = args.search {
        document.set_value(page.search_input, &query).await;
        controller
            .dispatch(PageEvent::KeyPress {
                target: page.search_input,
                key: Key::Enter,
            })
            .await;
    }

    Ok(())
}
