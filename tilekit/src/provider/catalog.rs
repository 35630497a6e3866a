//! Built-in and user-defined provider registry.

use std::collections::BTreeMap;

use super::types::{Provider, TilingScheme};

/// Providers addressable by name.
///
/// Names are matched case-insensitively. User-defined providers from the
/// config file replace built-ins of the same name.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: BTreeMap<String, Provider>,
}

impl ProviderCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in public providers.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            Provider::new("osm", "https://{balancer}.tile.openstreetmap.org/{zoom}/{x}/{y}.png")
                .with_balancers(["a", "b", "c"])
                .with_attribution("© OpenStreetMap contributors"),
        );
        catalog.insert(
            Provider::new(
                "opentopomap",
                "https://{balancer}.tile.opentopomap.org/{zoom}/{x}/{y}.png",
            )
            .with_balancers(["a", "b", "c"])
            .with_attribution(
                "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)",
            ),
        );
        catalog.insert(
            Provider::new(
                "esri-world-imagery",
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{zoom}/{y}/{x}",
            )
            .with_attribution("Tiles © Esri"),
        );
        catalog.insert(
            Provider::new(
                "bing-aerial",
                "https://ecn.t{balancer}.tiles.virtualearth.net/tiles/a{quadkey}.jpeg?g=1",
            )
            .with_balancers(["0", "1", "2", "3"])
            .with_attribution("© Microsoft"),
        );
        catalog.insert(
            Provider::new(
                "carto-light",
                "https://{balancer}.basemaps.cartocdn.com/light_all/{zoom}/{x}/{y}.png",
            )
            .with_balancers(["a", "b", "c", "d"])
            .with_attribution("© OpenStreetMap contributors © CARTO")
            .with_scheme(TilingScheme::Xyz),
        );

        catalog
    }

    /// Adds or replaces a provider.
    pub fn insert(&mut self, provider: Provider) {
        self.providers
            .insert(provider.name().to_lowercase(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(&name.to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
