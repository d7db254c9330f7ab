use crate::{
    Res,
    error::Error,
    spotify::{SpotifyClient, playlist::playlist_url},
    types::{PlaylistOutcome, PlaylistRequest, PlaylistStatus, TrackMatch},
};

/// Which endpoint a request came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistMode {
    /// Always create a new playlist.
    Create,
    /// Append to a playlist of the same name if the user has one.
    CreateOrUpdate,
}

/// Turns a [`PlaylistRequest`] into a populated playlist.
///
/// Per request the flow is strictly sequential:
///
/// ```text
/// current user -> resolve songs -> (no tracks: fail)
///              -> [CreateOrUpdate: look up by name] -> create or reuse -> add tracks
/// ```
///
/// Nothing is mutated before at least one song resolved. If adding the tracks
/// fails after a playlist was created, the playlist stays behind empty and the
/// error is returned as is.
pub struct PlaylistManager {
    client: SpotifyClient,
}

impl PlaylistManager {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }

    pub async fn build(
        &self,
        request: &PlaylistRequest,
        mode: PlaylistMode,
    ) -> Res<PlaylistOutcome> {
        let user = self.client.current_user().await?;
        tracing::info!(
            user = %user.id,
            playlist = %request.playlist_name,
            "handling playlist request"
        );

        let matches = self.resolve_tracks(&request.songs).await?;
        let uris = resolved_uris(&matches);
        if uris.is_empty() {
            tracing::info!(songs = request.songs.len(), "no song resolved to a track");
            return Err(Error::NoTracksResolved);
        }

        match mode {
            PlaylistMode::Create => self.create(&user.id, &request.playlist_name, &uris).await,
            PlaylistMode::CreateOrUpdate => {
                self.create_or_update(&user.id, &request.playlist_name, &uris).await
            }
        }
    }

    /// Resolves every song query, one search call at a time, in input order.
    ///
    /// Duplicates and empty queries are searched like any other entry.
    pub async fn resolve_tracks(&self, songs: &[String]) -> Res<Vec<TrackMatch>> {
        let mut matches = Vec::with_capacity(songs.len());

        for song in songs {
            let uri = self.client.search_track(song).await?;
            match &uri {
                Some(uri) => tracing::debug!(query = %song, %uri, "resolved song"),
                None => tracing::info!(query = %song, "no track found, skipping"),
            }
            matches.push(TrackMatch {
                query: song.clone(),
                uri,
            });
        }

        Ok(matches)
    }

    /// Creates a new public playlist and appends `uris` to it.
    pub async fn create(&self, user_id: &str, name: &str, uris: &[String]) -> Res<PlaylistOutcome> {
        let playlist = self.client.create_playlist(user_id, name, true).await?;
        tracing::info!(playlist_id = %playlist.id, "created playlist");

        self.client.add_tracks(&playlist.id, uris).await?;
        tracing::info!(playlist_id = %playlist.id, tracks = uris.len(), "added tracks");

        Ok(PlaylistOutcome {
            playlist_url: playlist_url(&playlist.id, playlist.external_urls.spotify.as_deref()),
            playlist_id: playlist.id,
            status: PlaylistStatus::Created,
            tracks_added: uris.len(),
        })
    }

    /// Appends `uris` to the user's playlist called `name`, creating it first
    /// when no playlist of that name exists.
    pub async fn create_or_update(
        &self,
        user_id: &str,
        name: &str,
        uris: &[String],
    ) -> Res<PlaylistOutcome> {
        let Some(existing) = self.client.find_playlist_by_name(name).await? else {
            tracing::info!(playlist = %name, "no existing playlist with that name");
            return self.create(user_id, name, uris).await;
        };

        tracing::info!(playlist_id = %existing.id, "found existing playlist");
        self.client.add_tracks(&existing.id, uris).await?;
        tracing::info!(playlist_id = %existing.id, tracks = uris.len(), "added tracks");

        Ok(PlaylistOutcome {
            playlist_url: playlist_url(&existing.id, existing.external_urls.spotify.as_deref()),
            playlist_id: existing.id,
            status: PlaylistStatus::Updated,
            tracks_added: uris.len(),
        })
    }
}

/// URIs of the resolved matches in input order; unmatched queries are dropped.
pub fn resolved_uris(matches: &[TrackMatch]) -> Vec<String> {
    matches.iter().filter_map(|m| m.uri.clone()).collect()
}
