//! Login screen state machine.
//!
//! The screen shows one of three forms. Clicking "lost your password?" or
//! "cancel" switches forms with a fade-out, content swap and fade-in, then
//! focuses the login input (or the password input when a login is already
//! filled in). Submitting the reset form posts it once and swaps the message
//! area with the response.
//!
//! Every transition returns a description of the DOM effects to play, so a
//! front end only has to animate what it is told.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::form::FormData;

pub const MESSAGE_CONTAINER: &str = "#message_container";
pub const ALTERNATE_RESET_NAV: &str = "#alternate_reset_nav";
/// Body shown when the reset request fails in transport.
pub const HTTP_ERROR_HTML: &str = r#"<div id="login_error"><strong>HTTP Error</strong></div>"#;
/// Class the server puts on error messages.
const ERROR_CLASS: &str = "message_error";

/// `class` attribute values, quoted or bare.
static CLASS_ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[\s<]class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("Invalid class attribute regex")
});

/// Whether any element in `html` carries the `message_error` class.
fn has_error_class(html: &str) -> bool {
    CLASS_ATTRIBUTE_REGEX.captures_iter(html).any(|captures| {
        (1..=3)
            .filter_map(|group| captures.get(group))
            .any(|value| value.as_str().split_whitespace().any(|class| class == ERROR_CLASS))
    })
}

pub const SWITCH_FADE_MS: u64 = 500;
pub const RESET_FADE_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LoginForm {
    #[serde(rename = "login_form")]
    Login,
    #[serde(rename = "begin_reset_form")]
    BeginReset,
    #[serde(rename = "reset_form")]
    Reset,
}

impl LoginForm {
    pub const ALL: [LoginForm; 3] = [Self::Login, Self::BeginReset, Self::Reset];

    /// DOM id of the form.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Login => "login_form",
            Self::BeginReset => "begin_reset_form",
            Self::Reset => "reset_form",
        }
    }

    pub fn selector(&self) -> String {
        format!("#{}", self.id())
    }

    pub fn login_input(&self) -> String {
        format!("#{}_login", self.id())
    }

    pub fn password_input(&self) -> String {
        format!("#{}_password", self.id())
    }

    pub fn nav(&self) -> String {
        format!("#{}_nav", self.id())
    }

    fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::BeginReset => 1,
            Self::Reset => 2,
        }
    }
}

/// Values typed into one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub login: String,
    pub password: String,
}

/// DOM effects of switching forms, in play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: LoginForm,
    pub to: LoginForm,
    pub fade_out: Vec<String>,
    pub message: String,
    pub hide: Vec<String>,
    pub show: Vec<String>,
    pub fade_in: Vec<String>,
    pub focus: String,
    pub fade_ms: u64,
}

/// DOM effects after the reset request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub success: bool,
    pub fade_out: Vec<String>,
    pub show: Vec<String>,
    /// Response body placed in the message container.
    pub message: String,
    pub fade_ms: u64,
}

/// Sends the begin-reset form to the server.
pub trait ResetTransport {
    /// POST `data` to `url` and return the HTML body.
    fn post(&self, url: &str, data: &FormData) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct LoginScreen {
    current: LoginForm,
    inputs: [FormInputs; 3],
    nav_visible: [bool; 3],
    alternate_reset_nav_visible: bool,
    message_html: String,
    lost_password_instructions: String,
}

impl LoginScreen {
    /// Screen showing the login form, with `lost_password_instructions`
    /// displayed when switching to the reset form.
    pub fn new(lost_password_instructions: impl Into<String>) -> Self {
        Self {
            current: LoginForm::Login,
            inputs: Default::default(),
            nav_visible: LoginForm::ALL.map(|form| form == LoginForm::Login),
            alternate_reset_nav_visible: false,
            message_html: String::new(),
            lost_password_instructions: lost_password_instructions.into(),
        }
    }

    pub fn current(&self) -> LoginForm {
        self.current
    }

    /// Input focused when the page loads.
    pub fn initial_focus(&self) -> String {
        LoginForm::Login.login_input()
    }

    pub fn inputs(&self, form: LoginForm) -> &FormInputs {
        &self.inputs[form.index()]
    }

    pub fn set_login(&mut self, form: LoginForm, login: impl Into<String>) {
        self.inputs_mut(form).login = login.into();
    }

    pub fn set_password(&mut self, form: LoginForm, password: impl Into<String>) {
        self.inputs_mut(form).password = password.into();
    }

    pub fn message_html(&self) -> &str {
        &self.message_html
    }

    pub fn is_nav_visible(&self, form: LoginForm) -> bool {
        self.nav_visible[form.index()]
    }

    pub fn is_alternate_reset_nav_visible(&self) -> bool {
        self.alternate_reset_nav_visible
    }

    fn inputs_mut(&mut self, form: LoginForm) -> &mut FormInputs {
        &mut self.inputs[form.index()]
    }

    /// Replace `from` with `to`, showing `message`.
    pub fn switch_form(&mut self, from: LoginForm, to: LoginForm, message: &str) -> Transition {
        let from_login = self.inputs(from).login.clone();
        let target = self.inputs_mut(to);
        if target.login.is_empty() {
            target.login = from_login;
        }
        let focus = if target.login.is_empty() {
            to.login_input()
        } else {
            to.password_input()
        };

        self.message_html = message.to_string();
        self.nav_visible[from.index()] = false;
        self.nav_visible[to.index()] = true;
        self.current = to;
        debug!(from = from.id(), to = to.id(), %focus, "switched login form");

        Transition {
            from,
            to,
            fade_out: vec![from.selector(), MESSAGE_CONTAINER.to_string()],
            message: message.to_string(),
            hide: vec![from.nav()],
            show: vec![to.nav()],
            fade_in: vec![to.selector(), MESSAGE_CONTAINER.to_string()],
            focus,
            fade_ms: SWITCH_FADE_MS,
        }
    }

    /// "Lost your password?" clicked.
    pub fn lost_password(&mut self) -> Transition {
        let instructions = self.lost_password_instructions.clone();
        self.switch_form(LoginForm::Login, LoginForm::BeginReset, &instructions)
    }

    /// "Cancel" clicked on the reset form or the alternate nav.
    pub fn cancel(&mut self) -> Transition {
        self.alternate_reset_nav_visible = false;
        let mut transition = self.switch_form(LoginForm::Reset, LoginForm::Login, "");
        transition.hide.insert(0, ALTERNATE_RESET_NAV.to_string());
        transition
    }

    /// Values posted by the begin-reset form.
    pub fn begin_reset_form_data(&self) -> FormData {
        FormData::new().with("form_login", self.inputs(LoginForm::BeginReset).login.as_str())
    }

    /// Post the reset request once and apply the response.
    ///
    /// A transport failure shows [`HTTP_ERROR_HTML`]. Any response without an
    /// element of class `message_error` counts as success and hides the
    /// begin-reset form, so a transport failure also reads as success.
    pub fn submit_reset(&mut self, transport: &dyn ResetTransport, data: &FormData) -> ResetOutcome {
        let body = match transport.post("index.php", data) {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "password reset request failed");
                HTTP_ERROR_HTML.to_string()
            }
        };
        let success = !has_error_class(&body);

        let mut fade_out = vec![MESSAGE_CONTAINER.to_string()];
        let mut show = Vec::new();
        if success {
            fade_out.push(LoginForm::BeginReset.selector());
            fade_out.push(LoginForm::BeginReset.nav());
            show.push(ALTERNATE_RESET_NAV.to_string());
            self.nav_visible[LoginForm::BeginReset.index()] = false;
            self.alternate_reset_nav_visible = true;
        }
        self.message_html = body.clone();
        debug!(success, "password reset request completed");

        ResetOutcome {
            success,
            fade_out,
            show,
            message: body,
            fade_ms: RESET_FADE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_class_matches_whole_class_tokens() {
        assert!(has_error_class(r#"<div class="message_error">x</div>"#));
        assert!(has_error_class(r#"<div id="m" class='alert message_error big'>x</div>"#));
        assert!(has_error_class("<p CLASS=message_error>x</p>"));

        assert!(!has_error_class("<p>Check message_error in the logs.</p>"));
        assert!(!has_error_class(r#"<div id="message_error">x</div>"#));
        assert!(!has_error_class(r#"<div class="message_error_hint">x</div>"#));
        assert!(!has_error_class(r#"<div data-class="message_error">x</div>"#));
        assert!(!has_error_class(HTTP_ERROR_HTML));
    }

    #[test]
    fn starts_on_login_form() {
        let screen = LoginScreen::new("instructions");
        assert_eq!(screen.current(), LoginForm::Login);
        assert_eq!(screen.initial_focus(), "#login_form_login");
        assert!(screen.is_nav_visible(LoginForm::Login));
        assert!(!screen.is_nav_visible(LoginForm::BeginReset));
        assert!(!screen.is_alternate_reset_nav_visible());
    }

    #[test]
    fn switching_copies_login_and_focuses_password() {
        let mut screen = LoginScreen::new("instructions");
        screen.set_login(LoginForm::Login, "admin");
        let transition = screen.lost_password();
        assert_eq!(screen.inputs(LoginForm::BeginReset).login, "admin");
        assert_eq!(transition.focus, "#begin_reset_form_password");
        assert_eq!(screen.message_html(), "instructions");
    }

    #[test]
    fn existing_target_login_is_kept() {
        let mut screen = LoginScreen::new("");
        screen.set_login(LoginForm::Login, "admin");
        screen.set_login(LoginForm::BeginReset, "other");
        screen.lost_password();
        assert_eq!(screen.inputs(LoginForm::BeginReset).login, "other");
    }

    #[test]
    fn empty_login_focuses_login_input() {
        let mut screen = LoginScreen::new("");
        let transition = screen.lost_password();
        assert_eq!(transition.focus, "#begin_reset_form_login");
    }

    #[test]
    fn cancel_returns_to_login_and_hides_alternate_nav() {
        let mut screen = LoginScreen::new("");
        screen.lost_password();
        let transition = screen.cancel();
        assert_eq!(transition.from, LoginForm::Reset);
        assert_eq!(transition.hide, vec!["#alternate_reset_nav", "#reset_form_nav"]);
        assert_eq!(transition.message, "");
        assert_eq!(screen.current(), LoginForm::Login);
        assert!(screen.is_nav_visible(LoginForm::Login));
        assert!(!screen.is_alternate_reset_nav_visible());
    }
}
