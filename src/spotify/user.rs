use crate::{Res, types::User};

use super::SpotifyClient;

impl SpotifyClient {
    /// Returns the profile of the user the access token was issued for.
    pub async fn current_user(&self) -> Res<User> {
        self.get(&["me"], &[] as &[(&str, &str)]).await
    }
}
