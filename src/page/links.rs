use std::collections::BTreeMap;

use clap::ValueEnum;

use super::{
    fetch_list, input_value, set_input, submit, Confirm, Page, MANAGE_OUTPUT,
    MANAGE_TABLE,
};
use crate::dom::{button, input, Element, Node};
use crate::edit::{Click, EditToggle, RowEditState};
use crate::messages::Action;
use crate::models::{LinkRecord, RowKey};
use crate::routes::{self, Layout, LinkRoutes};
use crate::table::{self, Keying};
use crate::transport::{ApiRequest, Transport};
use crate::validate;

pub const SHORTEN : &str = "shorten";
pub const SHORT : &str = "short";
pub const LONG : &str = "long";
pub const NEW_OUTPUT : &str = "new-output";

/// How the table catches up after a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeleteStrategy {
    /// Drop the one deleted row from the document.
    RemoveRow,
    /// Fetch and render the whole collection again.
    Refetch,
}

pub struct LinksPage<T> {
    transport : T,
    routes :    LinkRoutes,
    keying :    Keying,
    editable :  bool,
    strategy :  DeleteStrategy,
    doc :       Node,
    rows :      BTreeMap<RowKey, EditToggle>,
}

fn skeleton() -> Node {
    Element::new("main")
        .with_id("links-page")
        .child(
            Element::new("section")
                .child(input(SHORT, ""))
                .child(input(LONG, ""))
                .child(button(SHORTEN, "Shorten"))
                .child(Element::new("p").with_id(NEW_OUTPUT)),
        )
        .child(
            Element::new("section")
                .child(Element::new("p").with_id(MANAGE_OUTPUT))
                .child(Element::new("div").with_id(MANAGE_TABLE)),
        )
        .into()
}

impl<T : Transport> LinksPage<T> {
    pub fn new(transport : T, layout : Layout) -> Self {
        Self {
            transport,
            routes : layout.links(),
            keying : Keying::ById,
            editable : true,
            strategy : DeleteStrategy::RemoveRow,
            doc : skeleton(),
            rows : BTreeMap::new(),
        }
    }

    pub fn keyed_by(mut self, keying : Keying) -> Self {
        self.keying = keying;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn delete_strategy(mut self, strategy : DeleteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn keying(&self) -> Keying {
        self.keying
    }

    pub fn row(&self, key : &RowKey) -> Option<&EditToggle> {
        self.rows.get(key)
    }

    pub fn keys(&self) -> Vec<RowKey> {
        self.rows.keys().cloned().collect()
    }

    pub fn manage_output(&self) -> String {
        self.text_of(MANAGE_OUTPUT)
    }

    pub fn new_output(&self) -> String {
        self.text_of(NEW_OUTPUT)
    }

    fn text_of(&self, id : &str) -> String {
        self.doc
            .find(id)
            .map(Element::text_content)
            .unwrap_or_default()
    }

    /// Initial fetch-and-render.
    pub async fn load(&mut self) {
        self.refresh().await
    }

    /// Replaces the table with a fresh render of the server's collection.
    pub async fn refresh(&mut self) {
        self.rows.clear();

        let listed = fetch_list::<_, LinkRecord>(
            &self.transport,
            self.routes.list,
            Action::ListShortcuts,
        )
        .await;

        let fragment = match listed {
            Ok(mut links) => {
                links.sort_by_key(|link| link.id);

                if self.editable {
                    for link in &links {
                        let key = self.keying.key(link);
                        self.rows.insert(
                            key.clone(),
                            EditToggle::new(key, "long", &link.long),
                        );
                    }
                }

                table::links(&links, self.keying, self.editable)
            },
            Err(text) => Node::text(text),
        };

        self.doc.set_children(MANAGE_TABLE, vec![fragment]);
    }

    /// Types into the create form.
    pub fn fill(&mut self, short : &str, long : &str) {
        set_input(&mut self.doc, SHORT, short);
        set_input(&mut self.doc, LONG, long);
    }

    /// The `shorten` button: creates a link from the form and redraws.
    pub async fn press_shorten(&mut self) -> bool {
        let short = input_value(&self.doc, SHORT);
        let long = input_value(&self.doc, LONG);

        if let Err(text) = validate::shortcut(&short, &long) {
            self.doc.set_text(NEW_OUTPUT, text);
            return false;
        }

        let req = ApiRequest::form(self.routes.create)
            .field("short", short)
            .field("long", long);

        let reply = submit(&self.transport, req, Action::CreateShortcut).await;
        self.doc.set_text(NEW_OUTPUT, reply.message);

        if reply.ok {
            self.refresh().await;
        }

        reply.ok
    }

    pub async fn create(&mut self, short : &str, long : &str) -> bool {
        self.fill(short, long);
        self.press_shorten().await
    }

    pub async fn delete(
        &mut self,
        key : &RowKey,
        confirm : &(impl Confirm + ?Sized),
    ) -> bool {
        if !confirm.confirm(&format!("Delete the link \"{}\"?", key)) {
            return false;
        }

        let (field, value) = routes::key_field(key);
        let req = ApiRequest::form(self.routes.delete).field(field, value);

        let reply = submit(&self.transport, req, Action::DeleteShortcut).await;
        self.doc.set_text(MANAGE_OUTPUT, reply.message);

        if reply.ok {
            match self.strategy {
                DeleteStrategy::RemoveRow => {
                    self.doc.remove(&key.row_id());
                    self.rows.remove(key);
                },
                DeleteStrategy::Refetch => self.refresh().await,
            }
        }

        reply.ok
    }

    /// The row's Edit/Save button. Saving sends the update and patches the
    /// row in place, the table is not refetched.
    pub async fn press_update(&mut self, key : &RowKey) -> Option<Click> {
        let toggle = match self.rows.get_mut(key) {
            Some(toggle) => toggle,
            None => {
                tracing::warn!(%key, "no editable row");
                return None;
            },
        };

        let click = toggle.press(&self.doc)?;
        toggle.render(&mut self.doc);

        if let Click::Save(long) = &click {
            let (field, value) = routes::key_field(key);
            let req = ApiRequest::form(self.routes.update)
                .field(field, value)
                .field("long", long.as_str());

            let reply =
                submit(&self.transport, req, Action::UpdateShortcut).await;
            self.doc.set_text(MANAGE_OUTPUT, reply.message);

            toggle.finish(reply.ok);
            toggle.render(&mut self.doc);
        }

        Some(click)
    }

    pub fn type_long(&mut self, key : &RowKey, long : &str) -> bool {
        match self.rows.get_mut(key) {
            Some(toggle) => {
                if !toggle.type_text(long) {
                    return false;
                }
                toggle.render(&mut self.doc);
                true
            },
            None => false,
        }
    }

    /// Edit, type, Save. True once the row shows the new value.
    pub async fn update(&mut self, key : &RowKey, long : &str) -> bool {
        let editing = self
            .rows
            .get(key)
            .map_or(false, |t| t.state() == RowEditState::Editing);

        if !editing && self.press_update(key).await != Some(Click::Began) {
            return false;
        }

        if !self.type_long(key, long) {
            return false;
        }

        self.press_update(key).await;

        self.rows
            .get(key)
            .map_or(false, |t| t.state() == RowEditState::Display)
    }
}

impl<T> Page for LinksPage<T> {
    fn title(&self) -> &'static str {
        "Manage Links"
    }

    fn document(&self) -> &Node {
        &self.doc
    }
}
