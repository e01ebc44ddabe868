use chrono::{DateTime, Utc};
use log::{log, Level};

use crate::{
    CreateError, DeleteError, Password, ReadError, Routine, RoutineID, RoutineRepository,
    RoutineRequest, RoutineService, SessionRepository, SessionService, StorageError, UpdateError,
    User, UserRepository, Username, Workout, WorkoutDuration, WorkoutID, WorkoutRepository,
    WorkoutRequest, WorkoutService,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        if let Err(ref err) = result {
            let level = match err {
                $error::Storage(storage) => storage_error_level(storage),
                _ => Level::Error,
            };
            log!(level, "failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

/// Missing connections and sessions are expected while offline or signed out.
fn storage_error_level(err: &StorageError) -> Level {
    match err {
        StorageError::NoConnection | StorageError::NoSession => Level::Debug,
        StorageError::Other(_) => Level::Error,
    }
}

impl<R: SessionRepository + UserRepository> SessionService for Service<R> {
    async fn sign_up(&self, username: Username, password: Password) -> Result<User, CreateError> {
        log_on_error!(
            self.repository.create_user(username, password),
            CreateError,
            "create",
            "user"
        )
    }

    async fn sign_in(&self, username: Username, password: Password) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.request_session(&username, &password),
            ReadError,
            "request",
            "session"
        )
    }

    async fn get_session(&self) -> Result<User, ReadError> {
        log_on_error!(
            self.repository.initialize_session(),
            ReadError,
            "get",
            "session"
        )
    }

    async fn sign_out(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_session(),
            DeleteError,
            "delete",
            "session"
        )
    }
}

impl<R: RoutineRepository> RoutineService for Service<R> {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn get_routine(&self, id: RoutineID) -> Result<Routine, ReadError> {
        log_on_error!(
            self.repository.read_routine(id),
            ReadError,
            "get",
            "routine"
        )
    }

    async fn create_routine(&self, request: RoutineRequest) -> Result<Routine, CreateError> {
        log_on_error!(
            self.repository.create_routine(request),
            CreateError,
            "create",
            "routine"
        )
    }

    async fn replace_routine(
        &self,
        id: RoutineID,
        request: RoutineRequest,
    ) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.replace_routine(id, request),
            UpdateError,
            "replace",
            "routine"
        )
    }

    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
        log_on_error!(
            self.repository.delete_routine(id),
            DeleteError,
            "delete",
            "routine"
        )
    }
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )
    }

    async fn create_workout(
        &self,
        request: WorkoutRequest,
        date: DateTime<Utc>,
        duration: Option<WorkoutDuration>,
    ) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository
                .create_workout(request, date, duration.map(|d| d.to_string())),
            CreateError,
            "create",
            "workout"
        )
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }
}
