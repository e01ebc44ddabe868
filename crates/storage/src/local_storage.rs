use std::collections::VecDeque;

use gloo_storage::Storage;
use ::log::warn;

use liftlog_domain as domain;
use liftlog_web_app::log;

use crate::rest::{self, BackendConfig};

const KEY_SESSION: &str = "gym_tracker_user";
const KEY_BACKEND: &str = "backend";
const KEY_LOG: &str = "log";
const MAX_LOG_ENTRIES: usize = 100;

#[derive(Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    /// Returns the persisted session. An unreadable session record is removed.
    pub fn read_session(&self) -> Result<domain::User, domain::StorageError> {
        let user = match gloo_storage::LocalStorage::get::<rest::User>(KEY_SESSION) {
            Ok(user) => user,
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => {
                return Err(domain::StorageError::NoSession);
            }
            Err(err) => {
                warn!("removing invalid session record: {err}");
                self.delete_session();
                return Err(domain::StorageError::NoSession);
            }
        };
        domain::User::try_from(user).map_err(|err| {
            warn!("removing invalid session record: {err}");
            self.delete_session();
            domain::StorageError::NoSession
        })
    }

    pub fn write_session(&self, user: &domain::User) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::set(KEY_SESSION, rest::User::from(user))
            .map_err(|err| domain::StorageError::Other(Box::new(err)))
    }

    pub fn delete_session(&self) {
        gloo_storage::LocalStorage::delete(KEY_SESSION);
    }

    /// Backend configuration stored in the browser, falling back to the configuration embedded
    /// at build time.
    #[must_use]
    pub fn read_backend_config(&self) -> Option<BackendConfig> {
        match gloo_storage::LocalStorage::get::<BackendConfig>(KEY_BACKEND) {
            Ok(config) => Some(config),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => BackendConfig::from_env(),
            Err(err) => {
                warn!("ignoring invalid backend configuration: {err}");
                BackendConfig::from_env()
            }
        }
    }

    pub fn write_backend_config(&self, config: &BackendConfig) -> Result<(), domain::StorageError> {
        gloo_storage::LocalStorage::set(KEY_BACKEND, config)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_LOG_ENTRIES);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
