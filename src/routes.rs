use clap::ValueEnum;

use crate::models::RowKey;
use crate::transport::Value;

/// The two generations of link endpoints the server has exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// `/api/shorten/`, `/api/all/`, ...
    Legacy,
    /// `/api/links/...`
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRoutes {
    pub create : &'static str,
    pub list :   &'static str,
    pub delete : &'static str,
    pub update : &'static str,
}

impl Layout {
    /// Legacy link endpoints only take the numeric `id`.
    pub fn accepts_short_keys(self) -> bool {
        self == Layout::Current
    }

    pub fn links(self) -> LinkRoutes {
        match self {
            Layout::Legacy => LinkRoutes {
                create : "/api/shorten/",
                list :   "/api/all/",
                delete : "/api/delete/",
                update : "/api/update/",
            },
            Layout::Current => LinkRoutes {
                create : "/api/links/",
                list :   "/api/links/all/",
                delete : "/api/links/delete/",
                update : "/api/links/update/",
            },
        }
    }
}

pub mod users {
    pub const NEW : &str = "/api/users/new/";
    pub const ALL : &str = "/api/users/all/";
    pub const DELETE : &str = "/api/users/delete/";
    pub const DISABLE : &str = "/api/users/disable/";
    pub const ENABLE : &str = "/api/users/enable/";
    pub const PERMISSIONS : &str = "/api/users/update/permissions";
    pub const USERNAME : &str = "/api/users/update/username";
    pub const PASSWORD : &str = "/api/users/update/password";
    pub const LOGIN : &str = "/api/users/login/";
    pub const LOGOUT : &str = "/api/users/logout/";
    pub const DELETE_CURRENT : &str = "/api/users/delete_current/";
    pub const DISABLE_CURRENT : &str = "/api/users/disable_current/";
}

/// Form field naming a link row in delete and update requests.
pub fn key_field(key : &RowKey) -> (&'static str, Value) {
    match key {
        RowKey::Id(id) => ("id", Value::Int(*id)),
        RowKey::Short(short) => ("short", Value::Str(short.clone())),
    }
}
