use serde::{Deserialize, Serialize};

/// One state row from the directory listing endpoints.
///
/// `slug` is the URL-safe identifier the site uses for `/states/{slug}`
/// pages; it is produced by the directory service, not derived locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateListing {
    pub name: String,
    pub slug: String,
    pub business_count: u64,
    #[serde(default)]
    pub city_count: u64,
}

/// One city row from the directory listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityListing {
    pub name: String,
    pub slug: String,
    /// Display name of the parent state.
    #[serde(default)]
    pub state: String,
    pub business_count: u64,
}
