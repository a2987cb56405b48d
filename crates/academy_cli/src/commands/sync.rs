//! Backup sync commands.

use super::{confirm, CommandResult};
use academy_core::RecordStore;
use academy_sync_engine::{GistService, PushOutcome, SyncClient, SyncConfig};
use tracing::info;

fn client(api_base: &str) -> CommandResult<SyncClient<GistService>> {
    let config = SyncConfig::new(api_base);
    let service = GistService::new(config.clone())?;
    Ok(SyncClient::new(service, &config))
}

fn runtime() -> CommandResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Sets or removes the access token.
pub fn set_token(store: &mut RecordStore, token: &str, remote_id: Option<String>) {
    if store.set_credential(token, remote_id) {
        println!("✓ Token saved");
    } else {
        println!("✓ Token removed");
    }
}

/// Removes the access token and remote id.
pub fn forget(store: &mut RecordStore) {
    store.clear_credential();
    println!("✓ Sync credential removed");
}

/// Prints the sync configuration without revealing the token.
pub fn status(store: &RecordStore) {
    match store.credential() {
        None => println!("Not configured: set a token with `academy sync token <TOKEN>`"),
        Some(credential) => {
            println!("Token:     configured");
            match credential.remote_id() {
                Some(remote_id) => println!("Backup id: {remote_id}"),
                None => println!("Backup id: none yet (the first push creates one)"),
            }
        }
    }
}

/// Uploads the dataset.
pub fn push(store: &mut RecordStore, api_base: &str) -> CommandResult {
    let client = client(api_base)?;
    let records = store.snapshot().record_count();
    info!(api_base, records, "starting push");

    let outcome = runtime()?.block_on(client.push(store))?;
    match outcome {
        PushOutcome::Created { remote_id } => {
            println!("✓ Backup created ({records} records)");
            println!("  Backup id: {remote_id}");
        }
        PushOutcome::Updated { remote_id } => {
            println!("✓ Backup {remote_id} updated ({records} records)");
        }
    }
    Ok(())
}

/// Replaces the local dataset with the remote backup after confirmation.
pub fn pull(store: &mut RecordStore, api_base: &str, yes: bool) -> CommandResult {
    let prompt = "This overwrites ALL local data with the remote backup. Proceed?";
    if !confirm(prompt, yes)? {
        println!("Cancelled");
        return Ok(());
    }

    let client = client(api_base)?;
    let records = runtime()?.block_on(client.pull(store))?;
    println!("✓ Restored {records} records from the backup");
    Ok(())
}
