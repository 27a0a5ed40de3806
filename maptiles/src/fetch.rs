//! Single-tile download honouring the source's usage policy.
//!
//! The fetcher is a convenience for tools and tests; map widgets normally do
//! their own downloading and caching and only consume the registry metadata.

use thiserror::Error;
use tracing::{debug, warn};

use crate::http::{HttpClient, HttpError};
use crate::policy::DEFAULT_USER_AGENT;
use crate::source::{SourceError, TileSource};
use crate::tile::TileIndex;

/// Errors from [`TileFetcher::fetch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The server's policy requires a meaningful user agent.
    #[error("{source_name} requires a meaningful user agent (got '{user_agent}')")]
    UserAgentRejected {
        source_name: String,
        user_agent: String,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Downloads individual tiles.
pub struct TileFetcher<C: HttpClient> {
    http_client: C,
    user_agent: String,
}

impl<C: HttpClient> TileFetcher<C> {
    /// Creates a fetcher that identifies itself with the default user agent.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Downloads `tile` from `source`.
    ///
    /// Fails before any request is made if the tile is outside the source's
    /// range or the policy rejects the configured user agent.
    pub fn fetch(&self, source: &TileSource, tile: &TileIndex) -> Result<Vec<u8>, FetchError> {
        let url = source.checked_tile_url(tile)?;

        let policy = source.policy();
        if !policy.accepts_user_agent(&self.user_agent) {
            warn!(
                source = source.name(),
                user_agent = %self.user_agent,
                "User agent rejected by tile source policy"
            );
            return Err(FetchError::UserAgentRejected {
                source_name: source.name().to_string(),
                user_agent: self.user_agent.clone(),
            });
        }
        let user_agent = policy.normalize_user_agent(&self.user_agent);

        debug!(source = source.name(), %tile, %url, "Fetching tile");
        let bytes = self.http_client.get(&url, &user_agent)?;
        debug!(source = source.name(), %tile, bytes = bytes.len(), "Fetched tile");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::MockHttpClient;

    fn sample_png_response() -> Vec<u8> {
        // PNG signature
        vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
    }

    #[test]
    fn test_fetch_success() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Ok(sample_png_response())))
            .with_user_agent("meshmap/2.0");
        let tile = TileIndex::new(5, 10, 12).unwrap();

        let bytes = fetcher.fetch(&catalog::esri_imagery(), &tile).unwrap();
        assert_eq!(bytes, sample_png_response());
        assert_eq!(
            fetcher.http_client.requests(),
            vec![(
                "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/5/12/10.jpg"
                    .to_string(),
                "meshmap/2.0".to_string()
            )]
        );
    }

    #[test]
    fn test_default_user_agent_rejected_by_strict_policy() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Ok(sample_png_response())));
        let tile = TileIndex::new(1, 0, 0).unwrap();

        let result = fetcher.fetch(&catalog::mapnik(), &tile);
        assert!(matches!(result, Err(FetchError::UserAgentRejected { .. })));
        assert!(fetcher.http_client.requests().is_empty());
    }

    #[test]
    fn test_default_user_agent_allowed_by_permissive_policy() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Ok(sample_png_response())));
        let tile = TileIndex::new(1, 0, 0).unwrap();

        assert!(fetcher.fetch(&catalog::open_topo(), &tile).is_ok());
        assert_eq!(fetcher.http_client.requests()[0].1, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_user_agent_normalized() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Ok(sample_png_response())))
            .with_user_agent("  meshmap\t2.0 ");
        let tile = TileIndex::new(1, 1, 0).unwrap();

        fetcher.fetch(&catalog::mapnik(), &tile).unwrap();
        assert_eq!(fetcher.http_client.requests()[0].1, "meshmap_2.0");
    }

    #[test]
    fn test_unsupported_zoom_makes_no_request() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Ok(sample_png_response())))
            .with_user_agent("meshmap/2.0");
        let tile = TileIndex::new(18, 0, 0).unwrap();

        let result = fetcher.fetch(&catalog::open_topo(), &tile);
        assert!(matches!(
            result,
            Err(FetchError::Source(SourceError::UnsupportedZoom { zoom: 18, .. }))
        ));
        assert!(fetcher.http_client.requests().is_empty());
    }

    #[test]
    fn test_http_error_propagates() {
        let fetcher = TileFetcher::new(MockHttpClient::new(Err(HttpError::Status {
            status: 503,
            url: "x".to_string(),
        })))
        .with_user_agent("meshmap/2.0");
        let tile = TileIndex::new(3, 1, 1).unwrap();

        let result = fetcher.fetch(&catalog::usgs_topo(), &tile);
        assert!(matches!(
            result,
            Err(FetchError::Http(HttpError::Status { status: 503, .. }))
        ));
    }
}
