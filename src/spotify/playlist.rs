use crate::{
    Res,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest, Page,
        Playlist, SimplifiedPlaylist,
    },
};

use super::SpotifyClient;

/// Page size used when scanning the user's playlists.
pub const PLAYLIST_PAGE_SIZE: u64 = 50;

/// Maximum number of items the add-items endpoint accepts per call.
pub const ADD_TRACKS_LIMIT: usize = 100;

impl SpotifyClient {
    /// Retrieves one page of the current user's playlists.
    pub async fn user_playlists(&self, limit: u64, offset: u64) -> Res<Page<SimplifiedPlaylist>> {
        self.get(
            &["me", "playlists"],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    /// Looks up one of the current user's playlists by name.
    ///
    /// Names are compared after lowercasing both sides; there is no trimming
    /// and no partial match. Pages of [`PLAYLIST_PAGE_SIZE`] are fetched in
    /// order and the scan stops at the first match, so with several playlists
    /// of the same name the one listed first by the service wins.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(playlist))` - first playlist whose name matches
    /// - `Ok(None)` - all pages were scanned without a match
    pub async fn find_playlist_by_name(&self, name: &str) -> Res<Option<SimplifiedPlaylist>> {
        let target = name.to_lowercase();
        let mut offset = 0;

        loop {
            let page = self.user_playlists(PLAYLIST_PAGE_SIZE, offset).await?;
            let has_next = page.next.is_some() && !page.items.is_empty();

            if let Some(found) = page
                .items
                .into_iter()
                .find(|playlist| playlist.name.to_lowercase() == target)
            {
                return Ok(Some(found));
            }

            if !has_next {
                return Ok(None);
            }

            offset += PLAYLIST_PAGE_SIZE;
        }
    }

    /// Creates an empty playlist owned by `user_id`.
    pub async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Res<Playlist> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            public,
            collaborative: false,
            description: String::new(),
        };

        self.post(&["users", user_id, "playlists"], &body).await
    }

    /// Appends tracks to a playlist, keeping their order.
    ///
    /// Up to [`ADD_TRACKS_LIMIT`] URIs go out in a single call; longer lists
    /// are sent in consecutive chunks. Tracks already in the playlist are
    /// added again.
    ///
    /// # Returns
    ///
    /// The snapshot id reported for the last chunk.
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<String> {
        let mut snapshot_id = String::new();

        for chunk in uris.chunks(ADD_TRACKS_LIMIT) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };
            let res: AddTrackToPlaylistResponse = self
                .post(&["playlists", playlist_id, "tracks"], &body)
                .await?;
            snapshot_id = res.snapshot_id;
        }

        Ok(snapshot_id)
    }
}

/// Public URL of a playlist, falling back to the canonical web player URL
/// when the service omitted `external_urls`.
pub fn playlist_url(id: &str, external: Option<&str>) -> String {
    match external {
        Some(url) => url.to_string(),
        None => format!("https://open.spotify.com/playlist/{id}"),
    }
}
