use std::{collections::HashMap, fs};

#[derive(Debug)]
pub struct Settings {
    pub api_base_url: String,
    pub site_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            site_base_url: "http://127.0.0.1:5000".into(),
        }
    }
}

/// Defaults, overlaid by `site.toml`, overlaid by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("site.toml") {
        apply_file_config(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SITE_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("SITE_BASE_URL") {
        settings.site_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__SITE_BASE_URL") {
        settings.site_base_url = v;
    }

    settings
}

fn apply_file_config(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("site_base_url") {
            settings.site_base_url = v.clone();
        }
    }
}
