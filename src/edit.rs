//! Inline Edit/Save toggle owned by a single table row.

use crate::dom::{input, span, Node};
use crate::models::RowKey;

pub const EDIT : &str = "Edit";
pub const SAVE : &str = "Save";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEditState {
    Display,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    /// Display turned into Editing.
    Began,
    /// The caller sends this value and reports back through `finish`.
    Save(String),
    /// A save for this row is still in flight.
    Busy,
}

#[derive(Debug, Clone)]
pub struct EditToggle {
    key :     RowKey,
    field :   &'static str,
    state :   RowEditState,
    shown :   String,
    draft :   String,
    pending : bool,
}

impl EditToggle {
    /// `field` is the element id suffix of the edited value, `long` or
    /// `name`.
    pub fn new(key : RowKey, field : &'static str, value : &str) -> Self {
        Self {
            key,
            field,
            state : RowEditState::Display,
            shown : value.to_string(),
            draft : String::new(),
            pending : false,
        }
    }

    pub fn key(&self) -> &RowKey {
        &self.key
    }

    pub fn state(&self) -> RowEditState {
        self.state
    }

    pub fn value(&self) -> &str {
        &self.shown
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            RowEditState::Display => EDIT,
            RowEditState::Editing => SAVE,
        }
    }

    pub fn field_id(&self) -> String {
        self.key.dom_id(self.field)
    }

    pub fn button_id(&self) -> String {
        self.key.dom_id("update")
    }

    /// Replaces the input's contents. Ignored unless editing and idle.
    pub fn type_text(&mut self, text : &str) -> bool {
        if self.state != RowEditState::Editing || self.pending {
            return false;
        }

        self.draft = text.to_string();
        true
    }

    pub fn click(&mut self) -> Click {
        if self.pending {
            return Click::Busy;
        }

        match self.state {
            RowEditState::Display => {
                self.draft = self.shown.clone();
                self.state = RowEditState::Editing;
                Click::Began
            },
            RowEditState::Editing => {
                self.pending = true;
                Click::Save(self.draft.clone())
            },
        }
    }

    /// Clicks the row's button as rendered in `doc`. A label that doesn't
    /// match the current state is logged and the click dropped.
    pub fn press(&mut self, doc : &Node) -> Option<Click> {
        let button_id = self.button_id();
        let label = doc.find(&button_id).map(|b| b.text_content());

        if label.as_deref() == Some(self.label()) {
            return Some(self.click());
        }

        tracing::error!(
            button = %button_id,
            label = ?label,
            "button is not named correctly"
        );
        None
    }

    /// Settles the pending save. A failed save stays in Editing with the
    /// typed text kept for a retry.
    pub fn finish(&mut self, saved : bool) {
        self.pending = false;

        if saved {
            self.shown = self.draft.clone();
            self.state = RowEditState::Display;
        }
    }

    /// Projects the current state onto the row's elements.
    pub fn render(&self, doc : &mut Node) {
        let field_id = self.field_id();

        let node = match self.state {
            RowEditState::Display => span(field_id.clone(), self.shown.as_str()),
            RowEditState::Editing => input(field_id.clone(), self.draft.as_str()),
        };
        doc.replace(&field_id, node.into());

        if let Some(button) = doc.find_mut(&self.button_id()) {
            button.set_text(self.label());
            button.set_flag("disabled", self.pending);
        }
    }
}
