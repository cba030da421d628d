//! Login plugin pieces: form declarations and validation, form nonces, and
//! the login screen's form-switching state machine.

pub mod error;
pub mod form;
pub mod forms;
pub mod nonce;
pub mod screen;

pub use error::{NonceError, TransportError};
pub use form::{Element, ElementKind, FieldError, Form, FormData, Rule, ValidationReport};
pub use forms::{
    LOGIN_FORM_ID, RESET_PASSWORD_FORM_ID, SET_NEW_PASSWORD_FORM_ID, login_form,
    reset_password_form, set_new_password_form,
};
pub use nonce::NonceStore;
pub use screen::{
    FormInputs, HTTP_ERROR_HTML, LoginForm, LoginScreen, ResetOutcome, ResetTransport, Transition,
};
