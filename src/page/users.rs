use std::collections::BTreeMap;

use super::{fetch_list, submit, Confirm, Page, MANAGE_OUTPUT, MANAGE_TABLE};
use crate::dom::{Element, Node};
use crate::edit::{Click, EditToggle, RowEditState};
use crate::messages::Action;
use crate::models::{RowKey, UserRecord};
use crate::routes::users as paths;
use crate::table::{self, disable_label, yes_no};
use crate::transport::{ApiRequest, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageLinks,
    ManageUsers,
}

impl Permission {
    fn suffix(self) -> &'static str {
        match self {
            Permission::ManageLinks => "permission-links",
            Permission::ManageUsers => "permission-users",
        }
    }
}

const UNKNOWN_PERMISSIONS : &str =
    "That user's current permissions are unknown; give both flags.";

pub struct UsersPage<T> {
    transport : T,
    doc :       Node,
    rows :      BTreeMap<RowKey, EditToggle>,
}

fn skeleton() -> Node {
    Element::new("main")
        .with_id("users-page")
        .child(
            Element::new("section")
                .child(Element::new("p").with_id(MANAGE_OUTPUT))
                .child(Element::new("div").with_id(MANAGE_TABLE)),
        )
        .into()
}

impl<T : Transport> UsersPage<T> {
    pub fn new(transport : T) -> Self {
        Self {
            transport,
            doc : skeleton(),
            rows : BTreeMap::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn row(&self, id : i64) -> Option<&EditToggle> {
        self.rows.get(&RowKey::Id(id))
    }

    pub fn manage_output(&self) -> String {
        self.doc
            .find(MANAGE_OUTPUT)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    /// Checkbox state as currently shown, `None` without such a row.
    pub fn permission(&self, id : i64, which : Permission) -> Option<bool> {
        self.doc
            .find(&RowKey::Id(id).dom_id(which.suffix()))
            .map(Element::is_checked)
    }

    pub async fn load(&mut self) {
        self.refresh().await
    }

    pub async fn refresh(&mut self) {
        self.rows.clear();

        let listed = fetch_list::<_, UserRecord>(
            &self.transport,
            paths::ALL,
            Action::ListUsers,
        )
        .await;

        let fragment = match listed {
            Ok(mut users) => {
                users.sort_by_key(|user| user.id);

                for user in &users {
                    let key = RowKey::Id(user.id);
                    self.rows.insert(
                        key.clone(),
                        EditToggle::new(key, "name", &user.username),
                    );
                }

                table::users(&users)
            },
            Err(text) => Node::text(text),
        };

        self.doc.set_children(MANAGE_TABLE, vec![fragment]);
    }

    pub async fn delete(
        &mut self,
        id : i64,
        confirm : &(impl Confirm + ?Sized),
    ) -> bool {
        let key = RowKey::Id(id);
        let name = self
            .rows
            .get(&key)
            .map(|t| t.value().to_string())
            .unwrap_or_else(|| id.to_string());

        if !confirm.confirm(&format!("Delete the user \"{}\"?", name)) {
            return false;
        }

        let req = ApiRequest::form(paths::DELETE).field("id", id);
        let reply = submit(&self.transport, req, Action::DeleteUser).await;
        self.doc.set_text(MANAGE_OUTPUT, reply.message);

        if reply.ok {
            self.doc.remove(&key.row_id());
            self.rows.remove(&key);
        }

        reply.ok
    }

    /// Disables or re-enables an account and relabels its row.
    pub async fn set_disabled(&mut self, id : i64, disabled : bool) -> bool {
        let (path, action) = if disabled {
            (paths::DISABLE, Action::DisableUser)
        } else {
            (paths::ENABLE, Action::EnableUser)
        };

        let req = ApiRequest::form(path).field("id", id);
        let reply = submit(&self.transport, req, action).await;
        self.doc.set_text(MANAGE_OUTPUT, reply.message);

        if reply.ok {
            let key = RowKey::Id(id);
            self.doc.set_text(&key.dom_id("disabled"), yes_no(disabled));
            self.doc
                .set_text(&key.dom_id("disable"), disable_label(disabled));
        }

        reply.ok
    }

    /// The `${id}-disable` button, its label decides the direction.
    pub async fn press_disable(&mut self, id : i64) -> bool {
        let label = self
            .doc
            .find(&RowKey::Id(id).dom_id("disable"))
            .map(Element::text_content);

        match label.as_deref() {
            Some("Disable") => self.set_disabled(id, true).await,
            Some("Enable") => self.set_disabled(id, false).await,
            other => {
                tracing::error!(id, label = ?other, "button is not named correctly");
                false
            },
        }
    }

    /// One checkbox click. The box flips right away and flips back when the
    /// server refuses.
    pub async fn click_permission(&mut self, id : i64, which : Permission) -> bool {
        let current = (
            self.permission(id, Permission::ManageLinks),
            self.permission(id, Permission::ManageUsers),
        );

        let (links, users) = match current {
            (Some(links), Some(users)) => (links, users),
            _ => {
                tracing::warn!(id, "no permission checkboxes for user");
                return false;
            },
        };

        let wanted = match which {
            Permission::ManageLinks => (!links, users),
            Permission::ManageUsers => (links, !users),
        };

        self.apply_permissions(id, wanted).await
    }

    /// Sets both flags at once; `None` keeps what the row shows. Without a
    /// row to read from, both flags must be given and nothing is sent
    /// otherwise.
    pub async fn set_permissions(
        &mut self,
        id : i64,
        manage_links : Option<bool>,
        manage_users : Option<bool>,
    ) -> bool {
        let links = manage_links.or_else(|| self.permission(id, Permission::ManageLinks));
        let users = manage_users.or_else(|| self.permission(id, Permission::ManageUsers));

        match (links, users) {
            (Some(links), Some(users)) => self.apply_permissions(id, (links, users)).await,
            _ => {
                tracing::warn!(id, "unset permission with no row to read it from");
                self.doc.set_text(MANAGE_OUTPUT, UNKNOWN_PERMISSIONS);
                false
            },
        }
    }

    async fn apply_permissions(&mut self, id : i64, wanted : (bool, bool)) -> bool {
        let before = (
            self.permission(id, Permission::ManageLinks),
            self.permission(id, Permission::ManageUsers),
        );

        self.check(id, Permission::ManageLinks, Some(wanted.0));
        self.check(id, Permission::ManageUsers, Some(wanted.1));

        let req = ApiRequest::form(paths::PERMISSIONS)
            .field("user_id", id)
            .field("manage_links", wanted.0)
            .field("manage_users", wanted.1);

        let reply = submit(&self.transport, req, Action::UpdatePermissions).await;
        self.doc.set_text(MANAGE_OUTPUT, reply.message);

        if !reply.ok {
            self.check(id, Permission::ManageLinks, before.0);
            self.check(id, Permission::ManageUsers, before.1);
        }

        reply.ok
    }

    fn check(&mut self, id : i64, which : Permission, checked : Option<bool>) {
        let id = RowKey::Id(id).dom_id(which.suffix());

        if let (Some(el), Some(checked)) = (self.doc.find_mut(&id), checked) {
            el.set_flag("checked", checked);
        }
    }

    /// The row's Edit/Save button for the username.
    pub async fn press_update(&mut self, id : i64) -> Option<Click> {
        let key = RowKey::Id(id);
        let toggle = match self.rows.get_mut(&key) {
            Some(toggle) => toggle,
            None => {
                tracing::warn!(id, "no such user row");
                return None;
            },
        };

        let click = toggle.press(&self.doc)?;
        toggle.render(&mut self.doc);

        if let Click::Save(name) = &click {
            let req = ApiRequest::form(paths::USERNAME)
                .field("user_id", id)
                .field("new_name", name.as_str());

            let reply =
                submit(&self.transport, req, Action::UpdateUsername).await;
            self.doc.set_text(MANAGE_OUTPUT, reply.message);

            toggle.finish(reply.ok);
            toggle.render(&mut self.doc);
        }

        Some(click)
    }

    pub fn type_name(&mut self, id : i64, name : &str) -> bool {
        match self.rows.get_mut(&RowKey::Id(id)) {
            Some(toggle) => {
                if !toggle.type_text(name) {
                    return false;
                }
                toggle.render(&mut self.doc);
                true
            },
            None => false,
        }
    }

    pub async fn rename(&mut self, id : i64, name : &str) -> bool {
        let editing = self
            .row(id)
            .map_or(false, |t| t.state() == RowEditState::Editing);

        if !editing && self.press_update(id).await != Some(Click::Began) {
            return false;
        }

        if !self.type_name(id, name) {
            return false;
        }

        self.press_update(id).await;

        self.row(id)
            .map_or(false, |t| t.state() == RowEditState::Display)
    }
}

impl<T> Page for UsersPage<T> {
    fn title(&self) -> &'static str {
        "Manage Users"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}
