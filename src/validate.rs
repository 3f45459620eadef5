//! Checks run before a form is sent. The server makes the same checks, these
//! only save a round trip.

const RESERVED_SHORTS : [&str; 9] = [
    "",
    "api",
    "login",
    "resource",
    "new_user",
    "setup",
    "manage_links",
    "manage_users",
    "manage_account",
];

pub fn shortcut(short : &str, long : &str) -> Result<(), &'static str> {
    if RESERVED_SHORTS.contains(&short) {
        return Err("That short is reserved by this website.");
    }

    if !short.chars().all(char::is_alphanumeric) {
        return Err("Shorts can only contain alphanumeric characters.");
    }

    long_url(long)
}

pub fn long_url(long : &str) -> Result<(), &'static str> {
    if long.starts_with("http://") || long.starts_with("https://") {
        Ok(())
    } else {
        Err("That long does not begin with https:// or http://.")
    }
}

pub fn credentials(username : &str, password : &str) -> Result<(), &'static str> {
    self::username(username)?;

    if password.is_empty() {
        return Err("Your password cannot be blank.");
    }

    Ok(())
}

pub fn username(username : &str) -> Result<(), &'static str> {
    if username.is_empty() {
        Err("Your username cannot be blank.")
    } else {
        Ok(())
    }
}

pub fn password_change(current : &str, new : &str) -> Result<(), &'static str> {
    if current.is_empty() {
        return Err("Enter your current password.");
    }

    if new.is_empty() {
        return Err("Your password cannot be blank.");
    }

    if new == current {
        return Err("New password cannot be current password.");
    }

    Ok(())
}

/// Deleting or disabling your own account asks for the password again.
pub fn current_password(password : &str) -> Result<(), &'static str> {
    if password.is_empty() {
        Err("Enter your current password to continue.")
    } else {
        Ok(())
    }
}
