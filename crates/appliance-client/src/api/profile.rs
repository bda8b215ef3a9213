//! The signed-in user's own profile.

use appliance_core::{Profile, ProfileUpdate};

use super::ApiClient;
use crate::cache::{QueryKey, Resource, Tag};
use crate::error::ClientResult;

impl ApiClient {
    /// `GET /profile`
    pub async fn get_profile(&self) -> ClientResult<Profile> {
        self.read(QueryKey::new("/profile"), |_| vec![Tag::whole(Resource::Profile)])
            .await
    }

    /// `PUT /profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        let call = self.http().put("/profile", update);
        self.mutate("update profile", call, vec![Tag::whole(Resource::Profile)])
            .await
    }
}
