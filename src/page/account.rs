//! The signed-in user's own settings: name, password, and closing the
//! account. Every form here is answered with a redirect and a flash notice.

use super::{input_value, landing, set_input, submit, Confirm, FormOutcome, Page};
use crate::dom::{button, input, Element, Node};
use crate::messages::Action;
use crate::routes::users as paths;
use crate::transport::{ApiRequest, Transport};
use crate::validate;

pub const ACCOUNT_OUTPUT : &str = "account-output";
pub const NEW_USERNAME : &str = "new-username";
pub const UPDATE_USERNAME : &str = "update-username";
pub const CURRENT_PASSWORD : &str = "current-password";
pub const NEW_PASSWORD : &str = "new-password";
pub const UPDATE_PASSWORD : &str = "update-password";
pub const CONFIRM_PASSWORD : &str = "confirm-password";
pub const DISABLE_ACCOUNT : &str = "disable-account";
pub const DELETE_ACCOUNT : &str = "delete-account";
pub const LOGOUT : &str = "logout";

const PASSWORD_INPUTS : [&str; 3] = [CURRENT_PASSWORD, NEW_PASSWORD, CONFIRM_PASSWORD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Disable,
    Delete,
}

pub struct AccountPage<T> {
    transport : T,
    doc :       Node,
}

fn password(id : &str) -> Element {
    input(id, "").attr("type", "password")
}

fn skeleton() -> Node {
    Element::new("main")
        .with_id("account-page")
        .child(Element::new("p").with_id(ACCOUNT_OUTPUT))
        .child(
            Element::new("section")
                .child(input(NEW_USERNAME, ""))
                .child(button(UPDATE_USERNAME, "Update username")),
        )
        .child(
            Element::new("section")
                .child(password(CURRENT_PASSWORD))
                .child(password(NEW_PASSWORD))
                .child(button(UPDATE_PASSWORD, "Change password")),
        )
        .child(
            Element::new("section")
                .child(password(CONFIRM_PASSWORD))
                .child(button(DISABLE_ACCOUNT, "Disable account"))
                .child(button(DELETE_ACCOUNT, "Delete account")),
        )
        .child(button(LOGOUT, "Log out"))
        .into()
}

impl<T : Transport> AccountPage<T> {
    pub fn new(transport : T) -> Self {
        Self {
            transport,
            doc : skeleton(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn output(&self) -> String {
        self.doc
            .find(ACCOUNT_OUTPUT)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    fn show(&mut self, text : impl Into<String>) {
        self.doc.set_text(ACCOUNT_OUTPUT, text);
    }

    async fn post(&mut self, req : ApiRequest, action : Action) -> FormOutcome {
        for id in PASSWORD_INPUTS {
            set_input(&mut self.doc, id, "");
        }

        let reply = submit(&self.transport, req, action).await;
        let (outcome, text) = landing(reply, action);
        self.show(text);

        outcome
    }

    pub async fn press_update_username(&mut self) -> FormOutcome {
        let name = input_value(&self.doc, NEW_USERNAME);

        if let Err(text) = validate::username(&name) {
            self.show(text);
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(paths::USERNAME).field("username", name);
        self.post(req, Action::RenameSelf).await
    }

    pub async fn rename(&mut self, name : &str) -> FormOutcome {
        set_input(&mut self.doc, NEW_USERNAME, name);
        self.press_update_username().await
    }

    /// A successful change ends the session, the server wants a fresh login.
    pub async fn press_update_password(&mut self) -> FormOutcome {
        let current = input_value(&self.doc, CURRENT_PASSWORD);
        let new = input_value(&self.doc, NEW_PASSWORD);

        if let Err(text) = validate::password_change(&current, &new) {
            self.show(text);
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(paths::PASSWORD)
            .field("current_pw", current)
            .field("new_pw", new);
        self.post(req, Action::ChangePassword).await
    }

    pub async fn change_password(&mut self, current : &str, new : &str) -> FormOutcome {
        set_input(&mut self.doc, CURRENT_PASSWORD, current);
        set_input(&mut self.doc, NEW_PASSWORD, new);
        self.press_update_password().await
    }

    async fn close(
        &mut self,
        closing : Closing,
        confirm : &(impl Confirm + ?Sized),
    ) -> FormOutcome {
        let password = input_value(&self.doc, CONFIRM_PASSWORD);

        if let Err(text) = validate::current_password(&password) {
            self.show(text);
            return FormOutcome::Rejected;
        }

        let (question, path, action) = match closing {
            Closing::Disable => (
                "Disable your account?",
                paths::DISABLE_CURRENT,
                Action::DisableAccount,
            ),
            Closing::Delete => (
                "Delete your account? This cannot be undone.",
                paths::DELETE_CURRENT,
                Action::DeleteAccount,
            ),
        };

        if !confirm.confirm(question) {
            set_input(&mut self.doc, CONFIRM_PASSWORD, "");
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(path).field("password", password);
        self.post(req, action).await
    }

    pub async fn press_disable(&mut self, confirm : &(impl Confirm + ?Sized)) -> FormOutcome {
        self.close(Closing::Disable, confirm).await
    }

    pub async fn press_delete(&mut self, confirm : &(impl Confirm + ?Sized)) -> FormOutcome {
        self.close(Closing::Delete, confirm).await
    }

    pub async fn disable(
        &mut self,
        password : &str,
        confirm : &(impl Confirm + ?Sized),
    ) -> FormOutcome {
        set_input(&mut self.doc, CONFIRM_PASSWORD, password);
        self.press_disable(confirm).await
    }

    pub async fn delete(
        &mut self,
        password : &str,
        confirm : &(impl Confirm + ?Sized),
    ) -> FormOutcome {
        set_input(&mut self.doc, CONFIRM_PASSWORD, password);
        self.press_delete(confirm).await
    }

    pub async fn logout(&mut self) -> FormOutcome {
        self.post(ApiRequest::get(paths::LOGOUT), Action::Logout).await
    }
}

impl<T> Page for AccountPage<T> {
    fn title(&self) -> &'static str {
        "Manage Account"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}
