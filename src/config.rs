use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::models::RowKey;
use crate::page::DeleteStrategy;
use crate::routes::Layout;
use crate::table::Keying;
use crate::transport::HttpTransport;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyBy {
    Id,
    Short,
}

impl From<KeyBy> for Keying {
    fn from(k : KeyBy) -> Keying {
        match k {
            KeyBy::Id => Keying::ById,
            KeyBy::Short => Keying::ByShort,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linkr-admin")]
#[command(about = "Manage the links and users of a Linkr server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the server, plain http only
    #[arg(long, env = "LINKR_URL", default_value = "http://127.0.0.1:8000", global = true)]
    pub url : String,

    /// Session cookie as `name=value`
    #[arg(long, env = "LINKR_SESSION", global = true)]
    pub session : Option<String>,

    #[arg(long, value_enum, default_value = "current", global = true)]
    pub layout : Layout,

    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format : OutputFormat,

    /// Don't ask before deleting
    #[arg(long, short = 'y', global = true)]
    pub yes : bool,

    #[command(subcommand)]
    pub command : Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Links {
        #[arg(long, value_enum, default_value = "id")]
        key_by : KeyBy,

        #[arg(long, value_enum, default_value = "remove-row")]
        delete_strategy : DeleteStrategy,

        #[command(subcommand)]
        command : LinksCommand,
    },

    Users {
        #[command(subcommand)]
        command : UsersCommand,
    },

    /// Account settings of whoever the session belongs to
    Account {
        #[command(subcommand)]
        command : AccountCommand,
    },

    /// Create the first account, printing the session it was given
    Signup { username : String, password : String },

    /// Log in, printing the session to reuse as `LINKR_SESSION`
    Login { username : String, password : String },

    Logout,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    List {
        #[arg(long)]
        read_only : bool,
    },
    Create { short : String, long : String },
    Delete { key : String },
    Update { key : String, long : String },
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    List,
    Create {
        username : String,
        password : String,

        #[arg(long)]
        manage_links : bool,

        #[arg(long)]
        manage_users : bool,
    },
    Delete { id : i64 },
    Disable { id : i64 },
    Enable { id : i64 },
    Rename { id : i64, name : String },
    Permissions {
        id : i64,

        #[arg(long, action = ArgAction::Set)]
        manage_links : Option<bool>,

        #[arg(long, action = ArgAction::Set)]
        manage_users : Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    Rename { name : String },
    Password { current : String, new : String },
    /// Disable your own account, asks for its password
    Disable { password : String },
    /// Delete your own account, asks for its password
    Delete { password : String },
}

impl Cli {
    /// Cross-argument rules clap can't express on its own.
    pub fn check(&self) -> std::result::Result<(), clap::Error> {
        if let Command::Links {
            key_by : KeyBy::Short,
            ..
        } = self.command
        {
            if !self.layout.accepts_short_keys() {
                return Err(Cli::command().error(
                    ErrorKind::ArgumentConflict,
                    "--key-by short needs --layout current, legacy endpoints only take ids",
                ));
            }
        }

        Ok(())
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        let transport = HttpTransport::new(&self.url)?;

        match &self.session {
            Some(session) => transport.with_session(session),
            None => Ok(transport),
        }
    }
}

/// Reads a row key typed on the command line for the given keying.
pub fn parse_key(key_by : KeyBy, raw : &str) -> std::result::Result<RowKey, String> {
    match key_by {
        KeyBy::Short => Ok(RowKey::Short(raw.to_string())),
        KeyBy::Id => raw
            .parse()
            .map(RowKey::Id)
            .map_err(|_| format!("'{}' is not a link id", raw)),
    }
}
