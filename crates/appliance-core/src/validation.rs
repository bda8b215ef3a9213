//! # Validation Module
//!
//! Form schemas for every dialog of the console.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field validators (this module)                               │
//! │  ├── validate_email, validate_password, validate_phone, ...            │
//! │  └── One ValidationError per failing field                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form schemas (this module)                                   │
//! │  ├── validate_login, validate_appliance, validate_order, ...           │
//! │  └── FieldErrors map shown under each input                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend (Bean Validation)                                    │
//! │  └── 400 with validationErrors map, merged into the same FieldErrors   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use appliance_core::validation::{validate_email, validate_password};
//!
//! assert!(validate_email("email", "ann@example.com").is_ok());
//! assert!(validate_password("password", "Secret1!").is_ok());
//! assert!(validate_password("password", "secret").is_err());
//! ```

use crate::error::{CoreResult, FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::{
    ApplianceRequest, ClientRegistration, ClientRequest, EmployeeRegistration, EmployeeRequest,
    LoginRequest, ManufacturerRequest, OrderRequest, ProfileUpdate, UserRole,
};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Special characters a password must draw at least one from.
pub const PASSWORD_SPECIALS: &str = "@#$%^&+=!";

/// Characters manufacturer fields may not contain.
pub const MANUFACTURER_FORBIDDEN: &str = "<>\"'%;()&+";

/// Lowest accepted appliance price: $0.01.
pub const MIN_PRICE: Money = Money::from_cents(1);

/// Highest accepted appliance price: $999,999.99.
pub const MAX_PRICE: Money = Money::from_cents(99_999_999);

// =============================================================================
// Building Blocks
// =============================================================================

fn required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

fn length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn format(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Required text with a length window.
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let value = required(field, value)?;
    length(field, value, min, max)
}

// =============================================================================
// People
// =============================================================================

/// Validates a first or last name.
///
/// ## Rules
/// - Required, 2–50 characters
/// - Starts with a letter
/// - Letters, optionally joined by one of `' , . -` or a space; a
///   separator must be followed by a letter or a space
///
/// ## Example
/// ```rust
/// use appliance_core::validation::validate_person_name;
///
/// assert!(validate_person_name("firstName", "Mary-Jane").is_ok());
/// assert!(validate_person_name("lastName", "O'Neil").is_ok());
/// assert!(validate_person_name("lastName", "Smith2").is_err());
/// assert!(validate_person_name("lastName", "Ann--Lee").is_err());
/// ```
pub fn validate_person_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = required(field, value)?;
    length(field, value, 2, 50)?;

    let reason = "must contain only letters, spaces, hyphens, and apostrophes";
    let chars: Vec<char> = value.chars().collect();
    if !chars[0].is_ascii_alphabetic() {
        return Err(format(field, reason));
    }

    let is_separator = |c: char| matches!(c, '\'' | ',' | '.' | ' ' | '-');
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_alphabetic() {
            i += 1;
        } else if is_separator(c) {
            match chars.get(i + 1) {
                Some(next) if next.is_ascii_alphabetic() || *next == ' ' => i += 2,
                _ => return Err(format(field, reason)),
            }
        } else {
            return Err(format(field, reason));
        }
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Required, at most 255 characters
/// - `local@domain.tld` where local is `[A-Za-z0-9._%+-]+`, domain is
///   `[A-Za-z0-9.-]+` and the top-level part is at least two letters
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let value = required(field, value)?;
    length(field, value, 1, 255)?;

    let invalid = || format(field, "email format is invalid");
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if local_ok && host_ok && tld_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Validates a password being set.
///
/// ## Rules
/// - 8–128 characters, no whitespace
/// - At least one digit, one lowercase letter, one uppercase letter and
///   one of `@#$%^&+=!`
pub fn validate_password(field: &str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    length(field, value, 8, 128)?;

    let complex = value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
        && !value.chars().any(char::is_whitespace);

    if complex {
        Ok(())
    } else {
        Err(format(
            field,
            "must contain a digit, a lowercase letter, an uppercase letter, a special character, and no whitespace",
        ))
    }
}

/// Validates an optional password: blank means "leave unchanged".
pub fn validate_optional_password(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if !v.is_empty() => validate_password(field, v),
        _ => Ok(()),
    }
}

/// Validates a phone number: 10–20 characters of digits, spaces, `-`, `+`, `(`, `)`.
pub fn validate_phone(field: &str, value: &str) -> ValidationResult<()> {
    let value = required(field, value)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || " -+()".contains(c))
    {
        return Err(format(
            field,
            "must contain only digits, spaces, hyphens, plus signs, and parentheses",
        ));
    }
    length(field, value, 10, 20)
}

/// Validates a postal address: 5–255 characters.
pub fn validate_address(field: &str, value: &str) -> ValidationResult<()> {
    validate_text(field, value, 5, 255)
}

/// Validates an optional card number: 16 digits or `dddd-dddd-dddd-dddd`.
pub fn validate_card(field: &str, value: Option<&str>) -> ValidationResult<()> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };

    let plain = value.len() == 16 && value.chars().all(|c| c.is_ascii_digit());
    let grouped = value.len() == 19
        && value.split('-').count() == 4
        && value
            .split('-')
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_digit()));

    if plain || grouped {
        Ok(())
    } else {
        Err(format(
            field,
            "must be 16 digits or formatted as XXXX-XXXX-XXXX-XXXX",
        ))
    }
}

/// Validates an employee position: 2–100 characters.
pub fn validate_position(field: &str, value: &str) -> ValidationResult<()> {
    validate_text(field, value, 2, 100)
}

// =============================================================================
// Catalog
// =============================================================================

/// Manufacturer text field: length window plus a ban on markup-ish characters.
pub fn validate_manufacturer_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> ValidationResult<()> {
    let value = required(field, value)?;
    length(field, value, min, max)?;
    if value.chars().any(|c| MANUFACTURER_FORBIDDEN.contains(c)) {
        return Err(format(field, "contains invalid characters"));
    }
    Ok(())
}

/// Optional free text with a maximum length.
pub fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) => length(field, v, 0, max),
        None => Ok(()),
    }
}

/// Appliance power in watts: 0–100000 when given.
pub fn validate_power(field: &str, value: Option<i32>) -> ValidationResult<()> {
    match value {
        Some(p) if !(0..=100_000).contains(&p) => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100_000,
        }),
        _ => Ok(()),
    }
}

/// Appliance price: $0.01–$999999.99.
pub fn validate_price(field: &str, value: Money) -> ValidationResult<()> {
    if value < MIN_PRICE || value > MAX_PRICE {
        return Err(ValidationError::AmountOutOfRange {
            field: field.to_string(),
            min: MIN_PRICE,
            max: MAX_PRICE,
        });
    }
    Ok(())
}

// =============================================================================
// Orders
// =============================================================================

/// Line quantity: 1–999.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Row amount, when sent, must be at least $0.01.
pub fn validate_row_amount(field: &str, amount: Option<Money>) -> ValidationResult<()> {
    match amount {
        Some(a) if a < MIN_PRICE => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Form Schemas
// =============================================================================

/// Login form: valid email, password of at least 8 characters.
pub fn validate_login(form: &LoginRequest) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(validate_email("email", &form.email));
    if form.password.is_empty() {
        errors.push(ValidationError::Required {
            field: "password".into(),
        });
    } else if form.password.chars().count() < 8 {
        errors.push(ValidationError::TooShort {
            field: "password".into(),
            min: 8,
        });
    }
    errors.into_result()
}

fn check_names(errors: &mut FieldErrors, first: &str, last: &str) {
    errors.check(validate_person_name("firstName", first));
    errors.check(validate_person_name("lastName", last));
}

pub fn validate_client_registration(form: &ClientRegistration) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    check_names(&mut errors, &form.first_name, &form.last_name);
    errors.check(validate_email("email", &form.email));
    errors.check(validate_password("password", &form.password));
    errors.check(validate_phone("phone", &form.phone));
    errors.check(validate_address("address", &form.address));
    errors.check(validate_card("card", form.card.as_deref()));
    errors.into_result()
}

pub fn validate_employee_registration(form: &EmployeeRegistration) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    check_names(&mut errors, &form.first_name, &form.last_name);
    errors.check(validate_email("email", &form.email));
    errors.check(validate_password("password", &form.password));
    errors.check(validate_position("position", &form.position));
    errors.into_result()
}

/// Client dialog. A blank password keeps the current one.
pub fn validate_client_request(form: &ClientRequest) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    check_names(&mut errors, &form.first_name, &form.last_name);
    errors.check(validate_email("email", &form.email));
    errors.check(validate_optional_password("password", form.password.as_deref()));
    errors.check(validate_phone("phone", &form.phone));
    errors.check(validate_address("address", &form.address));
    errors.check(validate_card("card", form.card.as_deref()));
    errors.into_result()
}

/// Employee dialog. A password is required when creating.
pub fn validate_employee_request(form: &EmployeeRequest, creating: bool) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    check_names(&mut errors, &form.first_name, &form.last_name);
    errors.check(validate_email("email", &form.email));
    if creating {
        errors.check(validate_password(
            "password",
            form.password.as_deref().unwrap_or(""),
        ));
    } else {
        errors.check(validate_optional_password("password", form.password.as_deref()));
    }
    errors.check(validate_position("position", &form.position));
    errors.into_result()
}

pub fn validate_manufacturer(form: &ManufacturerRequest) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(validate_manufacturer_text("name", &form.name, 2, 100));
    errors.check(validate_manufacturer_text("address", &form.address, 5, 255));
    errors.check(validate_manufacturer_text("country", &form.country, 2, 100));
    errors.into_result()
}

pub fn validate_appliance(form: &ApplianceRequest) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(validate_text("name", &form.name, 2, 100));
    errors.check(validate_text("model", &form.model, 1, 100));
    if form.manufacturer_id <= 0 {
        errors.push(ValidationError::Required {
            field: "manufacturerId".into(),
        });
    }
    errors.check(validate_optional_text(
        "characteristic",
        form.characteristic.as_deref(),
        500,
    ));
    errors.check(validate_optional_text(
        "description",
        form.description.as_deref(),
        1000,
    ));
    errors.check(validate_power("power", form.power));
    errors.check(validate_price("price", form.price));
    errors.into_result()
}

/// Order request: a client and at least one valid row.
pub fn validate_order(form: &OrderRequest) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    if form.client_id <= 0 {
        errors.push(ValidationError::Required {
            field: "clientId".into(),
        });
    }
    if form.order_rows.is_empty() {
        errors.push(ValidationError::Required {
            field: "orderRows".into(),
        });
    }
    for (i, row) in form.order_rows.iter().enumerate() {
        errors.check(validate_quantity(&format!("orderRows[{}].quantity", i), row.quantity));
        errors.check(validate_row_amount(&format!("orderRows[{}].amount", i), row.amount));
    }
    errors.into_result()
}

/// Profile form; which optional fields apply depends on the role.
pub fn validate_profile_update(form: &ProfileUpdate, role: UserRole) -> CoreResult<()> {
    let mut errors = FieldErrors::new();
    check_names(&mut errors, &form.first_name, &form.last_name);
    errors.check(validate_email("email", &form.email));
    errors.check(validate_optional_password("password", form.password.as_deref()));

    match role {
        UserRole::Client => {
            if let Some(phone) = form.phone.as_deref().filter(|p| !p.trim().is_empty()) {
                errors.check(validate_phone("phone", phone));
            }
            if let Some(address) = form.address.as_deref().filter(|a| !a.trim().is_empty()) {
                errors.check(validate_address("address", address));
            }
            errors.check(validate_card("card", form.card.as_deref()));
        }
        UserRole::Employee => {
            if let Some(position) = form.position.as_deref().filter(|p| !p.trim().is_empty()) {
                errors.check(validate_position("position", position));
            }
        }
    }
    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{Category, OrderRowRequest, PowerType};

    #[test]
    fn test_person_name() {
        assert!(validate_person_name("firstName", "Ann").is_ok());
        assert!(validate_person_name("firstName", "Jr. Smith").is_ok());
        assert!(validate_person_name("firstName", "A").is_err());
        assert!(validate_person_name("firstName", "-Ann").is_err());
        assert!(validate_person_name("firstName", "Ann-").is_err());
        assert!(validate_person_name("firstName", "").is_err());
        assert!(validate_person_name("firstName", &"a".repeat(51)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("email", "john.doe+shop@mail.example.org").is_ok());
        assert!(validate_email("email", "john@localhost").is_err());
        assert!(validate_email("email", "john@example.c").is_err());
        assert!(validate_email("email", "jo hn@example.com").is_err());
        assert!(validate_email("email", "@example.com").is_err());
    }

    #[test]
    fn test_password_complexity() {
        assert!(validate_password("password", "Passw0rd!").is_ok());
        assert!(validate_password("password", "Passw0rd").is_err());
        assert!(validate_password("password", "passw0rd!").is_err());
        assert!(validate_password("password", "Pass w0rd!").is_err());
        assert!(validate_password("password", "P0!a").is_err());
        assert!(validate_optional_password("password", Some("")).is_ok());
        assert!(validate_optional_password("password", None).is_ok());
    }

    #[test]
    fn test_phone_and_card() {
        assert!(validate_phone("phone", "+38 (050) 123-45-67").is_ok());
        assert!(validate_phone("phone", "12345").is_err());
        assert!(validate_phone("phone", "050-CALL-NOW").is_err());

        assert!(validate_card("card", Some("1234567812345678")).is_ok());
        assert!(validate_card("card", Some("1234-5678-1234-5678")).is_ok());
        assert!(validate_card("card", Some("1234 5678 1234 5678")).is_err());
        assert!(validate_card("card", Some("")).is_ok());
        assert!(validate_card("card", None).is_ok());
    }

    #[test]
    fn test_manufacturer_rejects_markup() {
        let form = ManufacturerRequest {
            name: "<b>Acme</b>".into(),
            address: "1 Main Street".into(),
            country: "USA".into(),
        };
        match validate_manufacturer(&form) {
            Err(CoreError::InvalidForm(errors)) => {
                assert!(errors.get("name").is_some());
                assert!(errors.get("country").is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_appliance_schema() {
        let mut form = ApplianceRequest {
            name: "Fridge".into(),
            category: Category::Big,
            model: "F1".into(),
            manufacturer_id: 1,
            power_type: PowerType::Ac220,
            characteristic: None,
            description: None,
            power: Some(300),
            price: Money::from_cents(49_999),
        };
        assert!(validate_appliance(&form).is_ok());

        form.price = Money::zero();
        form.power = Some(200_000);
        match validate_appliance(&form) {
            Err(CoreError::InvalidForm(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.get("price").is_some());
                assert!(errors.get("power").is_some());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_order_schema() {
        let form = OrderRequest {
            client_id: 3,
            order_rows: vec![OrderRowRequest {
                appliance_id: 1,
                quantity: 0,
                amount: Some(Money::zero()),
            }],
        };
        match validate_order(&form) {
            Err(CoreError::InvalidForm(errors)) => {
                assert!(errors.get("orderRows[0].quantity").is_some());
                assert!(errors.get("orderRows[0].amount").is_some());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_login_schema() {
        let form = LoginRequest {
            email: "ann@example.com".into(),
            password: "short".into(),
        };
        assert!(validate_login(&form).is_err());
        let form = LoginRequest {
            email: "ann@example.com".into(),
            password: "longenough".into(),
        };
        assert!(validate_login(&form).is_ok());
    }

    #[test]
    fn test_employee_password_required_on_create() {
        let form = EmployeeRequest {
            email: "bob@example.com".into(),
            password: None,
            first_name: "Bob".into(),
            last_name: "Stone".into(),
            position: "Manager".into(),
        };
        assert!(validate_employee_request(&form, true).is_err());
        assert!(validate_employee_request(&form, false).is_ok());
    }

    #[test]
    fn test_profile_checks_role_fields() {
        let form = ProfileUpdate {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@example.com".into(),
            phone: Some("123".into()),
            ..Default::default()
        };
        assert!(validate_profile_update(&form, UserRole::Client).is_err());
        assert!(validate_profile_update(&form, UserRole::Employee).is_ok());
    }
}
