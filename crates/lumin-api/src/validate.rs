use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use lumin_types::api::{FormErrors, RegisterForm, ShowcaseForm};

pub type FieldErrors = BTreeMap<String, String>;

pub const COMPANY_EMAIL_DOMAIN: &str = "@paycorp.local";

/// Minimum body length, counted in whitespace-delimited words.
const MIN_BODY_WORDS: usize = 5;

pub fn is_company_email(email: &str) -> bool {
    email.ends_with(COMPANY_EMAIL_DOMAIN)
}

pub fn register_form(form: &RegisterForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.username.trim().is_empty() {
        errors.insert("username".into(), "Username is required.".into());
    }
    if !is_company_email(&form.email) {
        errors.insert("email".into(), "Email must be @paycorp.local domain".into());
    }
    if form.password.is_empty() {
        errors.insert("password".into(), "Password is required.".into());
    } else if form.password != form.confirm_password {
        errors.insert("confirm_password".into(), "Passwords do not match".into());
    }

    errors
}

pub fn showcase_form(form: &ShowcaseForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.title.trim().is_empty() {
        errors.insert("title".into(), "Title is required.".into());
    }

    let body = form.body_md.trim();
    if body.is_empty() {
        errors.insert("body_md".into(), "Body is required.".into());
    } else if body.split_whitespace().count() < MIN_BODY_WORDS {
        errors.insert(
            "body_md".into(),
            format!("Body must be at least {MIN_BODY_WORDS} words long."),
        );
    }

    errors
}

/// Validation failures are not protocol errors: the form re-renders with
/// field messages and the submitted values, under an HTTP success status.
pub fn form_rejection(errors: FieldErrors, values: serde_json::Value) -> Response {
    (StatusCode::OK, Json(FormErrors { errors, values })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showcase(title: &str, body: &str) -> ShowcaseForm {
        ShowcaseForm {
            title: title.into(),
            body_md: body.into(),
            link: None,
            screenshot_url: None,
        }
    }

    #[test]
    fn short_body_is_rejected_by_word_count() {
        let errors = showcase_form(&showcase("My Demo", "Too Short"));
        assert_eq!(
            errors.get("body_md").map(String::as_str),
            Some("Body must be at least 5 words long.")
        );
    }

    #[test]
    fn five_word_body_passes() {
        let errors = showcase_form(&showcase("My Demo", "one two three four five"));
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_body_gets_the_required_message_not_the_length_one() {
        let errors = showcase_form(&showcase("My Demo", "   "));
        assert_eq!(errors.get("body_md").map(String::as_str), Some("Body is required."));
    }

    #[test]
    fn blank_title_is_rejected() {
        let errors = showcase_form(&showcase("  ", "one two three four five"));
        assert_eq!(errors.get("title").map(String::as_str), Some("Title is required."));
    }

    #[test]
    fn register_requires_matching_passwords() {
        let form = RegisterForm {
            username: "dev".into(),
            email: "dev@paycorp.local".into(),
            password: "hunter22".into(),
            confirm_password: "hunter23".into(),
        };
        let errors = register_form(&form);
        assert_eq!(
            errors.get("confirm_password").map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn register_password_match_is_byte_exact() {
        let form = RegisterForm {
            username: "dev".into(),
            email: "dev@paycorp.local".into(),
            password: "Hunter22".into(),
            confirm_password: "hunter22".into(),
        };
        assert!(register_form(&form).contains_key("confirm_password"));
    }

    #[test]
    fn register_rejects_foreign_email_domains() {
        let form = RegisterForm {
            username: "dev".into(),
            email: "dev@gmail.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
        };
        let errors = register_form(&form);
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Email must be @paycorp.local domain")
        );
    }

    #[test]
    fn company_email_check_is_a_suffix_match() {
        assert!(is_company_email("a.person@paycorp.local"));
        assert!(!is_company_email("a.person@paycorp.local.evil.example"));
        assert!(!is_company_email("paycorp.local"));
    }
}
