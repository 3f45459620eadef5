//! Renders entity collections into detached table fragments.

use crate::dom::{button, checkbox, span, Element, Node};
use crate::models::{LinkRecord, RowKey, UserRecord};

pub const LINK_COLUMNS : [&str; 3] = ["Short", "Long", "Actions"];
pub const LINK_COLUMNS_READ_ONLY : [&str; 2] = ["Short", "Long"];
pub const USER_COLUMNS : [&str; 5] =
    ["Username", "Manage Links", "Manage Users", "Disabled", "Actions"];

pub const NO_LINKS : &str = "No shortcuts added";
pub const NO_USERS : &str = "No users added";

/// Which field of a link keys its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keying {
    ById,
    ByShort,
}

impl Keying {
    pub fn key(self, link : &LinkRecord) -> RowKey {
        match self {
            Keying::ById => RowKey::Id(link.id),
            Keying::ByShort => RowKey::Short(link.short.clone()),
        }
    }
}

fn header(columns : &[&str]) -> Element {
    columns.iter().fold(Element::new("tr"), |row, name| {
        row.child(Element::new("th").text(*name))
    })
}

/// `links` must already be sorted by id.
pub fn links(links : &[LinkRecord], keying : Keying, editable : bool) -> Node {
    if links.is_empty() {
        return Node::text(NO_LINKS);
    }

    let columns : &[&str] = if editable {
        &LINK_COLUMNS
    } else {
        &LINK_COLUMNS_READ_ONLY
    };

    let mut table = Element::new("table").child(header(columns));

    for link in links {
        let key = keying.key(link);

        let mut long = Element::new("td")
            .child(span(key.dom_id("long"), link.long.as_str()));

        let mut row = Element::new("tr")
            .with_id(key.row_id())
            .child(Element::new("td").text(link.short.as_str()));

        if editable {
            long = long.child(button(key.dom_id("update"), "Edit"));
            row = row
                .child(long)
                .child(
                    Element::new("td")
                        .child(button(key.dom_id("delete"), "Delete")),
                );
        } else {
            row = row.child(long);
        }

        table = table.child(row);
    }

    table.into()
}

pub fn disable_label(disabled : bool) -> &'static str {
    if disabled {
        "Enable"
    } else {
        "Disable"
    }
}

pub fn yes_no(b : bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

/// `users` must already be sorted by id.
pub fn users(users : &[UserRecord]) -> Node {
    if users.is_empty() {
        return Node::text(NO_USERS);
    }

    let mut table = Element::new("table").child(header(&USER_COLUMNS));

    for user in users {
        let key = RowKey::Id(user.id);

        let row = Element::new("tr")
            .with_id(key.row_id())
            .child(
                Element::new("td")
                    .child(span(key.dom_id("name"), user.username.as_str()))
                    .child(button(key.dom_id("update"), "Edit")),
            )
            .child(Element::new("td").child(checkbox(
                key.dom_id("permission-links"),
                user.manage_links,
            )))
            .child(Element::new("td").child(checkbox(
                key.dom_id("permission-users"),
                user.manage_users,
            )))
            .child(
                Element::new("td")
                    .with_id(key.dom_id("disabled"))
                    .text(yes_no(user.disabled)),
            )
            .child(
                Element::new("td")
                    .child(button(
                        key.dom_id("disable"),
                        disable_label(user.disabled),
                    ))
                    .child(button(key.dom_id("delete"), "Delete")),
            );

        table = table.child(row);
    }

    table.into()
}
