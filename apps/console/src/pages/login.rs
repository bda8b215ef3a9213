//! Login page.

use appliance_core::validation::validate_login;
use appliance_core::LoginRequest;
use tracing::info;

use super::{check_form, Context, FieldMap};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::router::Navigation;

#[derive(Debug)]
pub struct LoginPage {
    ctx: Context,
    pub form: LoginRequest,
    pub errors: FieldMap,
}

impl LoginPage {
    pub fn new(ctx: Context) -> Self {
        LoginPage {
            ctx,
            form: LoginRequest {
                email: String::new(),
                password: String::new(),
            },
            errors: FieldMap::new(),
        }
    }

    /// Validates, signs in and opens the preserved path (or the dashboard).
    pub async fn submit(&mut self) -> AppResult<Navigation> {
        check_form(validate_login(&self.form), &mut self.errors)?;

        let response = match self.ctx.api.login(&self.form).await {
            Ok(response) => response,
            Err(e) => {
                let mut err = AppError::from(e);
                if err.code == ErrorCode::Unauthorized {
                    err.message = "Login failed. Please check your credentials.".to_string();
                }
                self.errors = err.field_errors.clone();
                return Err(self.ctx.report(err));
            }
        };

        let session = self.ctx.auth.set_credentials(&response)?;
        self.form.password.clear();
        self.ctx.notify.success("Successfully logged in!");
        info!(email = %session.email, "Logged in");

        let target = self.ctx.navigator.take_login_target();
        Ok(self.ctx.navigator.navigate(&target, Some(session.role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::context;

    #[tokio::test]
    async fn test_invalid_form_stays_local() {
        let ctx = context("http://127.0.0.1:9/api");
        let mut page = LoginPage::new(ctx.clone());
        page.form.email = "not-an-email".into();
        page.form.password = "short".into();

        let err = page.submit().await.unwrap_err();
        assert!(err.is_validation());
        assert!(page.errors.contains_key("email"));
        assert!(page.errors.contains_key("password"));
        assert!(ctx.notify.is_empty());
    }
}
