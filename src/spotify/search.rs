use crate::{Res, types::SearchResponse};

use super::SpotifyClient;

impl SpotifyClient {
    /// Resolves a free-text query to the URI of the best matching track.
    ///
    /// Only the single top result is requested and the service's own ranking
    /// is trusted. The query is sent as given, without normalization.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(uri))` - the first track of the result set
    /// - `Ok(None)` - the search returned no tracks; this is not an error
    pub async fn search_track(&self, query: &str) -> Res<Option<String>> {
        let res: SearchResponse = self
            .get(&["search"], &[("q", query), ("type", "track"), ("limit", "1")])
            .await?;

        Ok(res.tracks.items.into_iter().next().map(|track| track.uri))
    }
}
