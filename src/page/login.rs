use super::{input_value, landing, set_input, submit, FormOutcome, Page};
use crate::dom::{button, input, Element, Node};
use crate::messages::Action;
use crate::routes::users as paths;
use crate::transport::{ApiRequest, Transport};
use crate::validate;

pub const USERNAME : &str = "username";
pub const PASSWORD : &str = "password";
pub const LOGIN : &str = "login";
pub const LOGIN_OUTPUT : &str = "login-output";

pub struct LoginPage<T> {
    transport : T,
    doc :       Node,
}

impl<T : Transport> LoginPage<T> {
    pub fn new(transport : T) -> Self {
        let doc = Element::new("main")
            .with_id("login-page")
            .child(input(USERNAME, ""))
            .child(input(PASSWORD, "").attr("type", "password"))
            .child(button(LOGIN, "Log in"))
            .child(Element::new("p").with_id(LOGIN_OUTPUT))
            .into();

        Self { transport, doc }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn output(&self) -> String {
        self.doc
            .find(LOGIN_OUTPUT)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    pub fn fill(&mut self, username : &str, password : &str) {
        set_input(&mut self.doc, USERNAME, username);
        set_input(&mut self.doc, PASSWORD, password);
    }

    /// Posts the form. On success the session cookie is in the transport.
    pub async fn press_login(&mut self) -> FormOutcome {
        let username = input_value(&self.doc, USERNAME);
        let password = input_value(&self.doc, PASSWORD);

        if let Err(text) = validate::credentials(&username, &password) {
            self.doc.set_text(LOGIN_OUTPUT, text);
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(paths::LOGIN)
            .field("username", username)
            .field("password", password);

        set_input(&mut self.doc, PASSWORD, "");

        let reply = submit(&self.transport, req, Action::Login).await;
        let (outcome, text) = landing(reply, Action::Login);
        self.doc.set_text(LOGIN_OUTPUT, text);

        outcome
    }

    pub async fn login(&mut self, username : &str, password : &str) -> FormOutcome {
        self.fill(username, password);
        self.press_login().await
    }
}

impl<T> Page for LoginPage<T> {
    fn title(&self) -> &'static str {
        "Log in"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}
