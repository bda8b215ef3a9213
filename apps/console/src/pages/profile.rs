//! Profile page: the signed-in user's own record.
//!
//! The form is seeded from `GET /profile`. Which optional fields apply
//! depends on the shape the backend returned (client or employee).

use appliance_core::validation::validate_profile_update;
use appliance_core::{Profile, ProfileUpdate};
use tracing::info;

use super::{check_form, Context, FieldMap, QueryState};
use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct ProfilePage {
    ctx: Context,
    pub profile: QueryState<Profile>,
    pub form: ProfileUpdate,
    pub errors: FieldMap,
}

impl ProfilePage {
    pub fn new(ctx: Context) -> Self {
        ProfilePage {
            ctx,
            profile: QueryState::Idle,
            form: ProfileUpdate::default(),
            errors: FieldMap::new(),
        }
    }

    /// Loads the profile and resets the form to it.
    pub async fn load(&mut self) -> &QueryState<Profile> {
        self.profile = QueryState::Loading;
        match self.ctx.api.get_profile().await {
            Ok(profile) => {
                self.form = ProfileUpdate::from(&profile);
                self.errors.clear();
                self.profile = QueryState::Ready(profile);
            }
            Err(e) => self.profile = QueryState::Failed(AppError::from(e)),
        }
        &self.profile
    }

    /// Drops unsaved edits.
    pub fn reset(&mut self) {
        if let Some(profile) = self.profile.data() {
            self.form = ProfileUpdate::from(profile);
        }
        self.errors.clear();
    }

    pub async fn submit(&mut self) -> AppResult<Profile> {
        let role = match self.profile.data() {
            Some(profile) => profile.role(),
            None => self.ctx.session()?.role,
        };
        // blank password means "keep the current one"
        if self.form.password.as_deref().is_some_and(|p| p.is_empty()) {
            self.form.password = None;
        }
        check_form(validate_profile_update(&self.form, role), &mut self.errors)?;

        match self.ctx.api.update_profile(&self.form).await {
            Ok(profile) => {
                info!(user_id = profile.id, "Profile updated");
                self.ctx.notify.success("Profile updated successfully!");
                self.form = ProfileUpdate::from(&profile);
                self.profile = QueryState::Ready(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                let err = AppError::from(e);
                self.errors.clone_from(&err.field_errors);
                Err(self.ctx.report(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::context;

    fn client_profile() -> Profile {
        Profile {
            id: 7,
            email: "ann@shop.com".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            phone: Some("+380501234567".into()),
            address: Some("12 Green Street".into()),
            card: None,
            position: None,
        }
    }

    #[tokio::test]
    async fn test_invalid_edit_stays_local_and_reset_restores() {
        let mut page = ProfilePage::new(context("http://127.0.0.1:9/api"));
        page.profile = QueryState::Ready(client_profile());
        page.reset();
        assert_eq!(page.form.first_name, "Ann");

        page.form.email = "nope".into();
        page.form.password = Some(String::new());
        let err = page.submit().await.unwrap_err();
        assert!(err.is_validation());
        assert!(page.errors.contains_key("email"));
        assert_eq!(page.form.password, None);

        page.reset();
        assert_eq!(page.form.email, "ann@shop.com");
        assert!(page.errors.is_empty());
    }
}
