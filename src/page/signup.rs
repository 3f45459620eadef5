use super::{input_value, landing, set_input, submit, FormOutcome, Page};
use crate::dom::{button, input, Element, Node};
use crate::messages::Action;
use crate::routes::users as paths;
use crate::transport::{ApiRequest, Transport};
use crate::validate;

pub const USERNAME : &str = "username";
pub const PASSWORD : &str = "password";
pub const SUBMIT : &str = "submit";
pub const ERROR_TEXT : &str = "error-text";

pub struct SignupPage<T> {
    transport : T,
    doc :       Node,
    notice :    String,
}

impl<T : Transport> SignupPage<T> {
    pub fn new(transport : T) -> Self {
        let doc = Element::new("main")
            .with_id("signup-page")
            .child(input(USERNAME, ""))
            .child(input(PASSWORD, "").attr("type", "password"))
            .child(button(SUBMIT, "Sign up"))
            .child(Element::new("p").with_id(ERROR_TEXT))
            .into();

        Self {
            transport,
            doc,
            notice : String::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn error_text(&self) -> String {
        self.doc
            .find(ERROR_TEXT)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    /// What the server said about the account it created, empty until then.
    pub fn notice(&self) -> &str {
        &self.notice
    }

    pub fn fill(&mut self, username : &str, password : &str) {
        set_input(&mut self.doc, USERNAME, username);
        set_input(&mut self.doc, PASSWORD, password);
    }

    pub async fn press_submit(&mut self) -> FormOutcome {
        let username = input_value(&self.doc, USERNAME);
        let password = input_value(&self.doc, PASSWORD);

        if let Err(text) = validate::credentials(&username, &password) {
            self.doc.set_text(ERROR_TEXT, text);
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(paths::NEW)
            .field("username", username)
            .field("password", password);

        set_input(&mut self.doc, PASSWORD, "");

        let reply = submit(&self.transport, req, Action::Signup).await;
        let (outcome, text) = landing(reply, Action::Signup);

        if outcome.is_redirect() {
            self.doc.set_text(ERROR_TEXT, "");
            self.notice = text;
        } else {
            self.doc.set_text(ERROR_TEXT, text);
        }

        outcome
    }

    pub async fn signup(&mut self, username : &str, password : &str) -> FormOutcome {
        self.fill(username, password);
        self.press_submit().await
    }
}

impl<T> Page for SignupPage<T> {
    fn title(&self) -> &'static str {
        "Sign up"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}
