//! Provider types

use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use crate::tile::Tile;

/// Errors that can occur while talking to a tile provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The request never produced a status (DNS, connect, timeout, body read).
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ProviderError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Row-indexing convention used by a provider's URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TilingScheme {
    /// Slippy / Google / XYZ: row 0 at the north edge.
    #[default]
    Xyz,
    /// Tile Map Service: row 0 at the south edge.
    Tms,
}

impl TilingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TilingScheme::Xyz => "xyz",
            TilingScheme::Tms => "tms",
        }
    }

    /// Parses a config value. Accepts `xyz`, `slippy`, `google` and `tms`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "xyz" | "slippy" | "google" => Some(TilingScheme::Xyz),
            "tms" => Some(TilingScheme::Tms),
            _ => None,
        }
    }
}

/// A remote tile source.
///
/// The URL template understands `{zoom}` (alias `{z}`), `{x}`, `{y}`,
/// `{quadkey}` and `{balancer}`. `{y}` is expanded in the provider's own
/// row convention, so TMS providers receive the mirrored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    name: String,
    scheme: TilingScheme,
    url_template: String,
    attribution: String,
    balancers: Vec<String>,
}

impl Provider {
    /// Creates an XYZ provider with no attribution and no balancer hosts.
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scheme: TilingScheme::Xyz,
            url_template: url_template.into(),
            attribution: String::new(),
            balancers: Vec::new(),
        }
    }

    pub fn with_scheme(mut self, scheme: TilingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    /// Sets the hosts substituted for `{balancer}`, one picked per request.
    pub fn with_balancers<I, S>(mut self, balancers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.balancers = balancers.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scheme(&self) -> TilingScheme {
        self.scheme
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn balancers(&self) -> &[String] {
        &self.balancers
    }

    /// Row index of `tile` in this provider's convention.
    pub fn row_for(&self, tile: &Tile) -> u32 {
        match self.scheme {
            TilingScheme::Xyz => tile.y,
            TilingScheme::Tms => tile.tms_y(),
        }
    }

    /// Builds the request URL for a tile.
    ///
    /// The balancer host (if any) is drawn from `rng`, which keeps URL
    /// generation deterministic under a seeded generator.
    pub fn gen_url<R: Rng + ?Sized>(&self, tile: &Tile, rng: &mut R) -> String {
        let zoom = tile.zoom.to_string();
        let mut url = self
            .url_template
            .replace("{zoom}", &zoom)
            .replace("{z}", &zoom)
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &self.row_for(tile).to_string());

        if url.contains("{quadkey}") {
            url = url.replace("{quadkey}", &tile.quadkey());
        }

        if let Some(host) = self.balancers.choose(rng) {
            url = url.replace("{balancer}", host);
        }

        url
    }
}
