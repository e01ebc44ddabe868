use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

#[allow(clippy::missing_errors_doc)]
pub trait Service {
    fn get_log_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn add_log_entry(&self, entry: Entry) -> Result<(), Error>;
}

/// Storage of log entries, latest entry first.
#[allow(clippy::missing_errors_doc)]
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

impl Entry {
    fn new(level: Level, message: String) -> Self {
        Self {
            time: Utc::now().format("%b %d %H:%M:%S").to_string(),
            level,
            message,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

static LOGGER: Logger = Logger;

/// Installs the logger, which writes to the browser console and to `repository`.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Arc<Mutex<dyn Repository>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        match record.level() {
            Level::Error => gloo_console::error!(message.clone()),
            Level::Warn => gloo_console::warn!(message.clone()),
            Level::Info => gloo_console::info!(message.clone()),
            Level::Debug | Level::Trace => gloo_console::debug!(message.clone()),
        }

        let Ok(log) = LOG.lock() else {
            return;
        };
        if let Some(repository) = log.as_ref() {
            if let Ok(repository) = repository.lock() {
                let _ = repository.write_entry(Entry::new(record.level(), message));
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Level::Error, "Error")]
    #[case(Level::Warn, "Warn")]
    #[case(Level::Debug, "Debug")]
    fn test_entry_serialization(#[case] level: Level, #[case] expected: &str) {
        let entry = Entry {
            time: "Jun 01 09:15:00".to_string(),
            level,
            message: "failed to read routines".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["level"], expected);
        assert_eq!(serde_json::from_value::<Entry>(json).unwrap(), entry);
    }

    #[test]
    fn test_entry_time_format() {
        let entry = Entry::new(Level::Info, String::new());

        assert_eq!(entry.time.len(), "Jun 01 09:15:00".len());
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use pretty_assertions::assert_eq;
        use wasm_bindgen_test::wasm_bindgen_test;

        use super::*;

        #[derive(Default)]
        struct Entries(Mutex<VecDeque<Entry>>);

        impl Repository for Entries {
            fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
                Ok(self
                    .0
                    .lock()
                    .map_err(|err| Error::Unknown(err.to_string()))?
                    .clone())
            }

            fn write_entry(&self, entry: Entry) -> Result<(), Error> {
                self.0
                    .lock()
                    .map_err(|err| Error::Unknown(err.to_string()))?
                    .push_front(entry);
                Ok(())
            }
        }

        #[wasm_bindgen_test]
        fn test_logger() {
            let entries = Arc::new(Mutex::new(Entries::default()));
            init(entries.clone()).unwrap();

            log::debug!("renewing session");
            log::trace!("ignored");
            log::error!("failed to save workout");

            let entries = entries.lock().unwrap().read_entries().unwrap();

            assert_eq!(
                entries
                    .iter()
                    .map(|e| (e.level, e.message.as_str()))
                    .collect::<Vec<_>>(),
                vec![
                    (Level::Error, "failed to save workout"),
                    (Level::Debug, "renewing session")
                ]
            );
        }
    }
}
