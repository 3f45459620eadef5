//! User-facing sentences for every API action and response status.

use std::borrow::Cow;

use http::StatusCode;

const INTERNAL : &str = "Internal server error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateShortcut,
    DeleteShortcut,
    UpdateShortcut,
    ListShortcuts,
    DeleteUser,
    DisableUser,
    EnableUser,
    ListUsers,
    UpdatePermissions,
    UpdateUsername,
    Signup,
    CreateUser,
    Login,
    Logout,
    RenameSelf,
    ChangePassword,
    DeleteAccount,
    DisableAccount,
}

/// Returns the single message shown for `action` answered with `status`.
pub fn message(action : Action, status : StatusCode) -> Cow<'static, str> {
    use Action::*;

    let code = status.as_u16();

    let fixed = match (action, code) {
        (CreateShortcut, 200) => "Shortcut created!",
        (CreateShortcut, 409) => "That short is already in use.",
        (CreateShortcut, _) => INTERNAL,

        (DeleteShortcut, 200) => "Shortcut deleted!",
        (DeleteShortcut, 404) => "That link does not exist.",
        (DeleteShortcut, 500) => INTERNAL,

        (UpdateShortcut, 200) => "Shortcut updated!",
        (UpdateShortcut, 404) => "That link does not exist; refresh.",
        (UpdateShortcut, _) => INTERNAL,

        (DeleteUser, 200) => "User deleted!",
        (DeleteUser, 404) => "That user does not exist.",
        (DeleteUser, 405) => "You cannot delete yourself here.",
        (DeleteUser, 500) => INTERNAL,

        (DisableUser, 200) => "User disabled!",
        (DisableUser, 404) => "That user does not exist.",
        (DisableUser, 405) => "You cannot disable yourself here.",
        (DisableUser, 500) => INTERNAL,

        (EnableUser, 200) => "User enabled!",
        (EnableUser, 404) => "That user does not exist.",
        (EnableUser, 405) => "You cannot enable yourself here.",
        (EnableUser, 500) => INTERNAL,

        (UpdatePermissions, 200) => "Permissions updated!",
        (UpdatePermissions, 401) => "Not logged in.",
        (UpdatePermissions, 403) => "Not allowed to manage users.",
        (UpdatePermissions, 404) => "That user does not exist.",
        (UpdatePermissions, 405) => {
            "Cannot edit the primary user's permissions."
        },
        (UpdatePermissions, 500) => INTERNAL,

        (UpdateUsername, 200) => "Username updated.",
        (UpdateUsername, 404) => "That user does not exist; refresh.",
        (UpdateUsername, 409) => "That username is taken.",
        (UpdateUsername, 500) => INTERNAL,
        (UpdateUsername, _) => {
            return Cow::Owned(format!("There was an error (code {}).", code))
        },

        (Signup, 200) => "Account created!",
        (Signup, 409) => "That username is taken.",
        (Signup, 500) => INTERNAL,

        (ListShortcuts, 500) | (ListUsers, 500) => INTERNAL,

        (CreateUser, 200) => "Account created!",
        (CreateUser, 401) => "Not logged in.",
        (CreateUser, 403) => "Not allowed to manage users.",
        (CreateUser, 409) => "That username is taken.",

        (Login, 200) => "Logged in.",
        (Logout, 200) => "Logged out.",
        (RenameSelf, 200) => "Username updated.",
        (RenameSelf, 409) => "That username is taken.",
        (ChangePassword, 200) => "Password changed!",
        (DeleteAccount, 200) => "Account deleted.",
        (DisableAccount, 200) => "Account disabled.",

        (RenameSelf | ChangePassword | DeleteAccount | DisableAccount, 401) => {
            "Not logged in."
        },
        (CreateUser | Login | RenameSelf | ChangePassword | DeleteAccount
            | DisableAccount, 500) => INTERNAL,

        _ => {
            return Cow::Owned(format!(
                "An error has occurred (code {}).",
                code
            ))
        },
    };

    Cow::Borrowed(fixed)
}

/// Text for a request that never produced a usable response.
pub fn invalid_data(err : impl std::fmt::Display) -> String {
    format!("Invalid data received. ({})", err)
}
