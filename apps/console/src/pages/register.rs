//! Client and employee self-registration.

use appliance_core::validation::{validate_client_registration, validate_employee_registration};
use appliance_core::{ClientRegistration, EmployeeRegistration};
use tracing::info;

use super::{check_form, Context, FieldMap};
use crate::error::{AppError, AppResult};
use crate::router::Navigation;

/// Which registration form is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationForm {
    Client(ClientRegistration),
    Employee(EmployeeRegistration),
}

#[derive(Debug)]
pub struct RegisterPage {
    ctx: Context,
    pub form: RegistrationForm,
    pub errors: FieldMap,
}

impl RegisterPage {
    pub fn client(ctx: Context) -> Self {
        RegisterPage {
            ctx,
            form: RegistrationForm::Client(ClientRegistration::default()),
            errors: FieldMap::new(),
        }
    }

    pub fn employee(ctx: Context) -> Self {
        RegisterPage {
            ctx,
            form: RegistrationForm::Employee(EmployeeRegistration::default()),
            errors: FieldMap::new(),
        }
    }

    /// Validates and registers, then sends the user to `/login`.
    pub async fn submit(&mut self) -> AppResult<Navigation> {
        let result = match &self.form {
            RegistrationForm::Client(form) => {
                check_form(validate_client_registration(form), &mut self.errors)?;
                self.ctx.api.register_client(form).await.map(|c| c.email)
            }
            RegistrationForm::Employee(form) => {
                check_form(validate_employee_registration(form), &mut self.errors)?;
                self.ctx.api.register_employee(form).await.map(|e| e.email)
            }
        };

        match result {
            Ok(email) => {
                info!(%email, "Registered");
                self.ctx.notify.success("Successfully registered!");
                Ok(self.ctx.navigator.navigate("/login", None))
            }
            Err(e) => {
                let err = AppError::from(e);
                self.errors = err.field_errors.clone();
                Err(self.ctx.report(err))
            }
        }
    }
}
