//! Signed-in user model for the mocked session flow.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Partial profile update from the edit-profile flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
}

impl User {
    /// Overlays `patch`; the user id is not patchable.
    pub fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(username) = patch.username.as_ref() {
            self.username = username.clone();
        }
        if let Some(email) = patch.email.as_ref() {
            self.email = email.clone();
        }
        if let Some(profile_image) = patch.profile_image.as_ref() {
            self.profile_image = Some(profile_image.clone());
        }
    }
}
