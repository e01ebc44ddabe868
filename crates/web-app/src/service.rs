use std::collections::VecDeque;

use crate::log;

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }

    fn add_log_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        self.repository.write_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ::log::Level;
    use pretty_assertions::assert_eq;

    use crate::log::{Entry, Error, Repository, Service as _};

    use super::*;

    struct FakeRepository {
        entries: Mutex<VecDeque<Entry>>,
        fail: bool,
    }

    impl Repository for FakeRepository {
        fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
            if self.fail {
                return Err(Error::Unknown("unavailable".to_string()));
            }
            Ok(self.entries.lock().unwrap().clone())
        }

        fn write_entry(&self, entry: Entry) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Unknown("unavailable".to_string()));
            }
            self.entries.lock().unwrap().push_front(entry);
            Ok(())
        }
    }

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Jun 01 09:15:00".to_string(),
            level: Level::Warn,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_log_entries() {
        let service = Service::new(FakeRepository {
            entries: Mutex::new(VecDeque::new()),
            fail: false,
        });

        service.add_log_entry(entry("first")).unwrap();
        service.add_log_entry(entry("second")).unwrap();

        assert_eq!(
            service.get_log_entries().unwrap(),
            VecDeque::from([entry("second"), entry("first")])
        );
    }

    #[test]
    fn test_log_entries_error() {
        let service = Service::new(FakeRepository {
            entries: Mutex::new(VecDeque::new()),
            fail: true,
        });

        assert_eq!(
            service.add_log_entry(entry("first")),
            Err(Error::Unknown("unavailable".to_string()))
        );
        assert_eq!(
            service.get_log_entries(),
            Err(Error::Unknown("unavailable".to_string()))
        );
    }
}
