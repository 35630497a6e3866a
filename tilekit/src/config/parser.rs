//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::error::ConfigError;
use super::file::{ConfigFile, TileSetEntry};
use crate::provider::{Provider, TilingScheme};
use crate::tileset::{BoundingBox, TileSetSpec, ZoomRange};

const PROVIDER_PREFIX: &str = "provider.";
const TILESET_PREFIX: &str = "tileset.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigError> {
    let mut config = ConfigFile::default();

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("concurrency") {
            let n: usize = parse_value("download", "concurrency", v)?;
            if n == 0 {
                return Err(ConfigError::invalid(
                    "download",
                    "concurrency",
                    v,
                    "must be at least 1",
                ));
            }
            config.download = config.download.with_concurrency(n);
        }
        if let Some(v) = section.get("timeout") {
            let secs: u64 = parse_value("download", "timeout", v)?;
            config.download = config.download.with_timeout_secs(secs);
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.download = config.download.with_user_agent(v);
            }
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output_dir = expand_tilde(v);
            }
        }
    }

    for (name, section) in ini.iter() {
        let Some(name) = name else { continue };

        if let Some(provider_name) = name.strip_prefix(PROVIDER_PREFIX) {
            config
                .providers
                .push(parse_provider(name, provider_name, section)?);
        } else if let Some(tileset_name) = name.strip_prefix(TILESET_PREFIX) {
            let entry = parse_tileset(name, tileset_name, section)?;
            config.tilesets.insert(tileset_name.to_string(), entry);
        }
    }

    Ok(config)
}

fn parse_provider(section_name: &str, name: &str, section: &Properties) -> Result<Provider, ConfigError> {
    let url = required(section_name, section, "url")?;
    let mut provider = Provider::new(name, url);

    if let Some(v) = section.get("scheme") {
        let scheme = TilingScheme::parse(v)
            .ok_or_else(|| ConfigError::invalid(section_name, "scheme", v, "must be xyz or tms"))?;
        provider = provider.with_scheme(scheme);
    }
    if let Some(v) = section.get("attribution") {
        provider = provider.with_attribution(v.trim());
    }
    if let Some(v) = section.get("balancers") {
        provider = provider.with_balancers(
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        );
    }
    if provider.url_template().contains("{balancer}") && provider.balancers().is_empty() {
        return Err(ConfigError::MissingKey {
            section: section_name.to_string(),
            key: "balancers".to_string(),
        });
    }

    Ok(provider)
}

fn parse_tileset(
    section_name: &str,
    name: &str,
    section: &Properties,
) -> Result<TileSetEntry, ConfigError> {
    let provider = required(section_name, section, "provider")?.trim().to_string();

    let north: f64 = parse_required(section_name, section, "north")?;
    let south: f64 = parse_required(section_name, section, "south")?;
    let east: f64 = parse_required(section_name, section, "east")?;
    let west: f64 = parse_required(section_name, section, "west")?;
    let bounds = BoundingBox::new(north, south, east, west)?;

    let zoom_min: u8 = match section.get("zoom_min") {
        Some(v) => parse_value(section_name, "zoom_min", v)?,
        None => 0,
    };
    let zoom_max: u8 = parse_required(section_name, section, "zoom_max")?;
    let zooms = ZoomRange::new(zoom_min, zoom_max)?;

    let mut spec = TileSetSpec::new(name, bounds, zooms);
    if let Some(v) = section.get("folder").map(str::trim).filter(|v| !v.is_empty()) {
        spec = spec.with_folder(v);
    }
    if let Some(v) = section.get("version").map(str::trim).filter(|v| !v.is_empty()) {
        spec = spec.with_version(v);
    }
    if let Some(v) = section.get("description") {
        spec = spec.with_description(v.trim());
    }

    Ok(TileSetEntry { provider, spec })
}

fn required<'a>(
    section_name: &str,
    section: &'a Properties,
    key: &str,
) -> Result<&'a str, ConfigError> {
    section.get(key).ok_or_else(|| ConfigError::MissingKey {
        section: section_name.to_string(),
        key: key.to_string(),
    })
}

fn parse_required<T: FromStr>(
    section_name: &str,
    section: &Properties,
    key: &str,
) -> Result<T, ConfigError> {
    let v = required(section_name, section, key)?;
    parse_value(section_name, key, v)
}

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::invalid(
            section,
            key,
            value,
            format!("expected {}", std::any::type_name::<T>()),
        )
    })
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
