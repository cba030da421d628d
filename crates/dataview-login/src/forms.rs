//! The login plugin's forms.

use dataview_model::Translator;

use crate::form::{ElementKind, Form, Rule};

pub const LOGIN_FORM_ID: &str = "login_form";
pub const RESET_PASSWORD_FORM_ID: &str = "resetpasswordform";
pub const SET_NEW_PASSWORD_FORM_ID: &str = "setnewpasswordform";

/// "<field> required", with the field name translated.
fn required(translator: &dyn Translator, field_key: &str) -> Rule {
    let field = translator.translate(field_key);
    Rule::required(translator.translate_with("General_Required", &[field.as_str()]))
}

/// Username and password sign-in.
pub fn login_form(translator: &dyn Translator) -> Form {
    let mut form = Form::new(LOGIN_FORM_ID);
    form.add_element(ElementKind::Text, "form_login")
        .add_rule(required(translator, "General_Username"));
    form.add_element(ElementKind::Password, "form_password")
        .add_rule(required(translator, "General_Password"));
    form.add_element(ElementKind::Checkbox, "form_rememberme");
    form.add_element(ElementKind::Hidden, "form_nonce");
    form.add_element(ElementKind::Submit, "submit");
    form
}

/// Request a password reset link for a login.
pub fn reset_password_form(translator: &dyn Translator) -> Form {
    let mut form = Form::new(RESET_PASSWORD_FORM_ID);
    form.add_element(ElementKind::Text, "form_login")
        .add_rule(required(translator, "General_Username"));
    form.add_element(ElementKind::Hidden, "form_nonce");
    form.add_element(ElementKind::Submit, "submit");
    form
}

/// Choose a new password after following a reset link.
pub fn set_new_password_form(translator: &dyn Translator) -> Form {
    let mut form = Form::new(SET_NEW_PASSWORD_FORM_ID);
    form.add_element(ElementKind::Password, "form_password")
        .add_rule(required(translator, "General_Password"));
    form.add_element(ElementKind::Password, "form_password_bis")
        .add_rule(required(translator, "Login_PasswordRepeat"))
        .add_rule(Rule::equal_to(
            "form_password",
            translator.translate("Login_PasswordsDoNotMatch"),
        ));
    form.add_element(ElementKind::Checkbox, "form_rememberme");
    form.add_element(ElementKind::Hidden, "form_nonce");
    form.add_element(ElementKind::Submit, "submit");
    form
}
