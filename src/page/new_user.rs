use super::{input_value, landing, set_input, submit, FormOutcome, Page};
use crate::dom::{button, checkbox, input, Element, Node};
use crate::messages::Action;
use crate::routes::users as paths;
use crate::transport::{ApiRequest, Transport};
use crate::validate;

pub const USERNAME : &str = "username";
pub const PASSWORD : &str = "password";
pub const MANAGE_LINKS : &str = "manage-links";
pub const MANAGE_USERS : &str = "manage-users";
pub const CREATE : &str = "create";
pub const NEW_USER_OUTPUT : &str = "new-user-output";

/// Account creation by someone allowed to manage users. Unlike signup the
/// new account gets its permissions up front and the page stays put.
pub struct NewUserPage<T> {
    transport : T,
    doc :       Node,
}

impl<T : Transport> NewUserPage<T> {
    pub fn new(transport : T) -> Self {
        let doc = Element::new("main")
            .with_id("new-user-page")
            .child(input(USERNAME, ""))
            .child(input(PASSWORD, "").attr("type", "password"))
            .child(checkbox(MANAGE_LINKS, false))
            .child(checkbox(MANAGE_USERS, false))
            .child(button(CREATE, "Create"))
            .child(Element::new("p").with_id(NEW_USER_OUTPUT))
            .into();

        Self { transport, doc }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn output(&self) -> String {
        self.doc
            .find(NEW_USER_OUTPUT)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    fn checked(&self, id : &str) -> bool {
        self.doc.find(id).map_or(false, Element::is_checked)
    }

    pub fn fill(
        &mut self,
        username : &str,
        password : &str,
        manage_links : bool,
        manage_users : bool,
    ) {
        set_input(&mut self.doc, USERNAME, username);
        set_input(&mut self.doc, PASSWORD, password);

        for (id, on) in [(MANAGE_LINKS, manage_links), (MANAGE_USERS, manage_users)] {
            if let Some(el) = self.doc.find_mut(id) {
                el.set_flag("checked", on);
            }
        }
    }

    pub async fn press_create(&mut self) -> FormOutcome {
        let username = input_value(&self.doc, USERNAME);
        let password = input_value(&self.doc, PASSWORD);

        if let Err(text) = validate::credentials(&username, &password) {
            self.doc.set_text(NEW_USER_OUTPUT, text);
            return FormOutcome::Rejected;
        }

        let req = ApiRequest::form(paths::NEW)
            .field("username", username)
            .field("password", password)
            .field("manage_links", self.checked(MANAGE_LINKS))
            .field("manage_users", self.checked(MANAGE_USERS));

        set_input(&mut self.doc, PASSWORD, "");

        let reply = submit(&self.transport, req, Action::CreateUser).await;
        let (outcome, text) = landing(reply, Action::CreateUser);
        self.doc.set_text(NEW_USER_OUTPUT, text);

        if outcome.is_redirect() {
            set_input(&mut self.doc, USERNAME, "");
        }

        outcome
    }

    pub async fn create(
        &mut self,
        username : &str,
        password : &str,
        manage_links : bool,
        manage_users : bool,
    ) -> FormOutcome {
        self.fill(username, password, manage_links, manage_users);
        self.press_create().await
    }
}

impl<T> Page for NewUserPage<T> {
    fn title(&self) -> &'static str {
        "New User"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::transport::testing::Scripted;

    #[tokio::test]
    async fn flags_travel_with_the_form() {
        let mut page = NewUserPage::new(
            Scripted::new().flash("/new_user", "success", "Account created: carol"),
        );

        assert_eq!(
            page.create("carol", "pw", true, false).await,
            FormOutcome::Redirect("/new_user".into())
        );
        assert_eq!(page.output(), "Account created: carol");
        assert_eq!(
            page.transport().sent()[0].encoded().unwrap(),
            "username=carol&password=pw&manage_links=true&manage_users=false"
        );
        assert_eq!(page.document().find(USERNAME).unwrap().value(), "");
    }

    #[tokio::test]
    async fn taken_name_keeps_the_form() {
        let mut page = NewUserPage::new(
            Scripted::new().flash("/new_user", "error", "Username already taken"),
        );

        assert_matches!(page.create("root", "pw", false, true).await, FormOutcome::Rejected);
        assert_eq!(page.output(), "Username already taken");
        assert_eq!(page.document().find(USERNAME).unwrap().value(), "root");
        assert!(page.document().find(MANAGE_USERS).unwrap().is_checked());
    }

    #[tokio::test]
    async fn without_permission() {
        let mut page = NewUserPage::new(Scripted::new().reply(403, ""));

        assert_matches!(page.create("carol", "pw", false, false).await, FormOutcome::Rejected);
        assert_eq!(page.output(), "Not allowed to manage users.");
    }

    #[tokio::test]
    async fn blank_password_is_caught_locally() {
        let mut page = NewUserPage::new(Scripted::new());

        assert_matches!(page.create("carol", "", false, false).await, FormOutcome::Rejected);
        assert_eq!(page.output(), "Your password cannot be blank.");
        assert!(page.transport().sent().is_empty());
    }
}
