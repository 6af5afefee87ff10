//! In-memory storage of issued credentials and their revocation status lists.
use crate::errors::AckHTTPError;
use ack_vc::{get_status_list_position, StatusList, W3CCredential};
use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// A credential as issued, before its id, status entry and proof are added.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCredential {
    /// 1-based global index, which also selects the status list bit.
    pub id: u64,
    pub credential_type: String,
    pub base_credential: W3CCredential,
    pub issued_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl StoredCredential {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[derive(Debug)]
struct StatusListRecord {
    status_list: StatusList,
    credentials: HashMap<u64, StoredCredential>,
}

impl StatusListRecord {
    fn new() -> Self {
        Self {
            status_list: StatusList::default(),
            credentials: HashMap::new(),
        }
    }
}

/// Stores credentials grouped by the status list that holds their revocation bit.
///
/// Each list sits behind its own mutex, so revoking a credential (setting
/// `revoked_at` and the list bit) is one atomic step per list.
#[derive(Debug, Default)]
pub struct CredentialStore {
    next_id: AtomicU64,
    lists: RwLock<HashMap<u64, Arc<Mutex<StatusListRecord>>>>,
}

fn poisoned<T>(_: T) -> AckHTTPError {
    AckHTTPError::InternalError("Credential store lock poisoned".to_string())
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_for(&self, list_id: u64) -> Result<Option<Arc<Mutex<StatusListRecord>>>, AckHTTPError> {
        Ok(self.lists.read().map_err(poisoned)?.get(&list_id).cloned())
    }

    fn list_or_create(&self, list_id: u64) -> Result<Arc<Mutex<StatusListRecord>>, AckHTTPError> {
        if let Some(list) = self.list_for(list_id)? {
            return Ok(list);
        }
        let mut lists = self.lists.write().map_err(poisoned)?;
        Ok(lists
            .entry(list_id)
            .or_insert_with(|| Arc::new(Mutex::new(StatusListRecord::new())))
            .clone())
    }

    /// Stores a new credential, creating its status list if needed.
    pub fn create(
        &self,
        credential_type: &str,
        base_credential: W3CCredential,
    ) -> Result<StoredCredential, AckHTTPError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let position = get_status_list_position(id as i64)?;
        let stored = StoredCredential {
            id,
            credential_type: credential_type.to_string(),
            base_credential,
            issued_at: Utc::now(),
            revoked_at: None,
        };
        let list = self.list_or_create(position.id)?;
        list.lock()
            .map_err(poisoned)?
            .credentials
            .insert(id, stored.clone());
        info!("Stored {credential_type} {id} in status list {}", position.id);
        Ok(stored)
    }

    pub fn get(&self, id: u64) -> Result<Option<StoredCredential>, AckHTTPError> {
        let Ok(position) = get_status_list_position(id as i64) else {
            return Ok(None);
        };
        let Some(list) = self.list_for(position.id)? else {
            return Ok(None);
        };
        let record = list.lock().map_err(poisoned)?;
        Ok(record.credentials.get(&id).cloned())
    }

    /// Marks a credential revoked and sets its status list bit.
    ///
    /// Revoking twice keeps the first `revoked_at`.
    pub fn revoke(&self, id: u64) -> Result<StoredCredential, AckHTTPError> {
        let not_found = || AckHTTPError::not_found("Credential not found");
        let position = get_status_list_position(id as i64).map_err(|_| not_found())?;
        let list = self.list_for(position.id)?.ok_or_else(not_found)?;
        let mut record = list.lock().map_err(poisoned)?;
        let StatusListRecord {
            status_list,
            credentials,
        } = &mut *record;
        let stored = credentials.get_mut(&id).ok_or_else(not_found)?;
        if stored.revoked_at.is_none() {
            stored.revoked_at = Some(Utc::now());
        }
        status_list.set(position.index)?;
        info!("Revoked credential {id}");
        Ok(stored.clone())
    }

    /// Returns the encoded revocation bits of a list, if it exists.
    pub fn encoded_status_list(&self, list_id: u64) -> Result<Option<String>, AckHTTPError> {
        let Some(list) = self.list_for(list_id)? else {
            return Ok(None);
        };
        let record = list.lock().map_err(poisoned)?;
        Ok(Some(record.status_list.encode()?))
    }
}
