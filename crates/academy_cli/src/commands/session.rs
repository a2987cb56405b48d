//! Sign-in commands.

use super::CommandResult;
use academy_core::RecordStore;

/// Signs a user in.
pub fn login(store: &mut RecordStore, username: &str) -> CommandResult {
    if !store.login(username) {
        return Err("user name must not be blank".into());
    }
    println!("✓ Signed in as {}", username.trim());
    Ok(())
}

/// Signs the current user out.
pub fn logout(store: &mut RecordStore) {
    store.logout();
    println!("✓ Signed out");
}

/// Prints the signed-in user.
pub fn whoami(store: &RecordStore) {
    match store.current_user() {
        Some(user) => println!("{user}"),
        None => println!("Not signed in"),
    }
}
