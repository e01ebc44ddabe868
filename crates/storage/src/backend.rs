//! Backend
//!
//! The hosted backend is the only data source. The session record in the local storage
//! identifies the user and is required for all data access.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use uuid::Uuid;

use liftlog_domain as domain;

use crate::local_storage::LocalStorage;
use crate::rest::{
    self, BackendConfig, GlooNetSendRequest, NewExercise, NewExerciseSet, NewWorkout,
    NewWorkoutExercise, NewWorkoutSet, REST, SendRequest, Table,
};

#[derive(Clone)]
pub struct Backend<S: SendRequest> {
    pub rest: REST<S>,
}

impl Backend<GlooNetSendRequest> {
    #[must_use]
    pub const fn new(config: BackendConfig) -> Self {
        Self {
            rest: REST::new(config),
        }
    }
}

impl<S: SendRequest> Backend<S> {
    fn session(&self) -> Result<domain::User, domain::StorageError> {
        LocalStorage.read_session()
    }

    async fn establish_session(&self, user: rest::User) -> Result<domain::User, domain::ReadError> {
        let user =
            domain::User::try_from(user).map_err(|err| domain::ReadError::Other(Box::new(err)))?;
        self.rest.set_user_session(*user.id).await?;
        LocalStorage.write_session(&user)?;
        Ok(user)
    }

    /// Inserts the exercises of a routine together with their template sets.
    async fn create_exercises(
        &self,
        routine_id: Uuid,
        request: &domain::RoutineRequest,
    ) -> Result<Vec<domain::Exercise>, domain::CreateError> {
        let exercises = self
            .rest
            .create_exercises(
                &request
                    .indexed_exercises()
                    .map(|(order_index, exercise)| NewExercise {
                        routine_id,
                        name: exercise.name.to_string(),
                        technique: exercise.technique.clone(),
                        expected_reps: exercise.expected_reps.clone(),
                        order_index,
                    })
                    .collect::<Vec<_>>(),
            )
            .await?;

        let sets = exercises
            .iter()
            .filter_map(|row| {
                let exercise = request
                    .exercises()
                    .get(usize::try_from(row.order_index).ok()?)?;
                Some(
                    exercise
                        .sets()
                        .iter()
                        .map(|set| NewExerciseSet::new(row.id, set))
                        .collect::<Vec<_>>(),
                )
            })
            .flatten()
            .collect::<Vec<_>>();
        let sets = self.rest.create_exercise_sets(&sets).await?;

        exercises
            .into_iter()
            .map(|mut exercise| {
                exercise.exercise_sets = sets
                    .iter()
                    .filter(|s| s.exercise_id == exercise.id)
                    .cloned()
                    .collect();
                domain::Exercise::try_from(exercise)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| domain::CreateError::Other(Box::new(err)))
    }
}

impl<S: SendRequest> domain::UserRepository for Backend<S> {
    async fn create_user(
        &self,
        username: domain::Username,
        password: domain::Password,
    ) -> Result<domain::User, domain::CreateError> {
        let user = self.rest.create_user(&username, &password).await?;
        self.establish_session(user).await.map_err(|err| match err {
            domain::ReadError::Storage(storage) => domain::CreateError::Storage(storage),
            err => domain::CreateError::Other(Box::new(err)),
        })
    }
}

impl<S: SendRequest> domain::SessionRepository for Backend<S> {
    async fn request_session(
        &self,
        username: &domain::Username,
        password: &domain::Password,
    ) -> Result<domain::User, domain::ReadError> {
        let user = self
            .rest
            .read_user(username, password)
            .await?
            .ok_or(domain::ReadError::NotFound)?;
        self.establish_session(user).await
    }

    async fn initialize_session(&self) -> Result<domain::User, domain::ReadError> {
        let user = self.session()?;
        if let Err(err) = self.rest.set_user_session(*user.id).await {
            debug!("failed to renew backend session: {err}");
        }
        Ok(user)
    }

    async fn delete_session(&self) -> Result<(), domain::DeleteError> {
        LocalStorage.delete_session();
        Ok(())
    }
}

impl<S: SendRequest> domain::RoutineRepository for Backend<S> {
    async fn read_routines(&self) -> Result<Vec<domain::Routine>, domain::ReadError> {
        self.session()?;
        Ok(self
            .rest
            .read_routines(None)
            .await?
            .into_iter()
            .filter_map(|routine| {
                let id = routine.id;
                domain::Routine::try_from(routine)
                    .inspect_err(|err| warn!("skipping invalid routine {id}: {err}"))
                    .ok()
            })
            .collect())
    }

    async fn read_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::Routine, domain::ReadError> {
        self.session()?;
        let routine = self
            .rest
            .read_routines(Some(*id))
            .await?
            .into_iter()
            .next()
            .ok_or(domain::ReadError::NotFound)?;
        domain::Routine::try_from(routine).map_err(|err| domain::ReadError::Other(Box::new(err)))
    }

    async fn create_routine(
        &self,
        request: domain::RoutineRequest,
    ) -> Result<domain::Routine, domain::CreateError> {
        self.session()?;
        let routine = self.rest.create_routine(request.name()).await?;
        let exercises = self.create_exercises(routine.id, &request).await?;
        let mut routine = domain::Routine::try_from(routine)
            .map_err(|err| domain::CreateError::Other(Box::new(err)))?;
        routine.exercises = exercises;
        Ok(routine)
    }

    async fn replace_routine(
        &self,
        id: domain::RoutineID,
        request: domain::RoutineRequest,
    ) -> Result<domain::Routine, domain::UpdateError> {
        self.session()?;
        let routine = self.rest.rename_routine(*id, request.name()).await?;
        self.rest.delete(Table::Exercises, "routine_id", *id).await?;
        let exercises = self.create_exercises(*id, &request).await?;
        let mut routine = domain::Routine::try_from(routine)
            .map_err(|err| domain::UpdateError::Other(Box::new(err)))?;
        routine.exercises = exercises;
        Ok(routine)
    }

    async fn delete_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineID, domain::DeleteError> {
        self.session()?;
        self.rest.delete(Table::Routines, "id", *id).await?;
        Ok(id)
    }
}

impl<S: SendRequest> domain::WorkoutRepository for Backend<S> {
    async fn read_workouts(&self) -> Result<Vec<domain::Workout>, domain::ReadError> {
        self.session()?;
        Ok(self
            .rest
            .read_workouts()
            .await?
            .into_iter()
            .filter_map(|workout| {
                let id = workout.id;
                domain::Workout::try_from(workout)
                    .inspect_err(|err| warn!("skipping invalid workout {id}: {err}"))
                    .ok()
            })
            .collect())
    }

    /// The returned workout contains the stored rows only. The routine name and the exercise
    /// display data are available on the next read.
    async fn create_workout(
        &self,
        request: domain::WorkoutRequest,
        date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<domain::Workout, domain::CreateError> {
        self.session()?;
        let mut workout = self
            .rest
            .create_workout(&NewWorkout {
                routine_id: *request.routine_id(),
                date,
                notes,
            })
            .await?;

        let mut exercises = self
            .rest
            .create_workout_exercises(
                &request
                    .exercises()
                    .iter()
                    .map(|e| NewWorkoutExercise {
                        workout_id: workout.id,
                        exercise_id: *e.exercise_id,
                        notes: e.notes.clone(),
                    })
                    .collect::<Vec<_>>(),
            )
            .await?;

        let sets = exercises
            .iter()
            .filter_map(|row| {
                let exercise = request
                    .exercises()
                    .iter()
                    .find(|e| *e.exercise_id == row.exercise_id)?;
                Some(exercise.sets.iter().map(|set| NewWorkoutSet::new(row.id, set)))
            })
            .flatten()
            .collect::<Vec<_>>();
        let sets = self.rest.create_workout_sets(&sets).await?;

        for exercise in &mut exercises {
            exercise.workout_sets = sets
                .iter()
                .filter(|s| s.workout_exercise_id == exercise.id)
                .cloned()
                .collect();
        }
        workout.workout_exercises = exercises;

        domain::Workout::try_from(workout).map_err(|err| domain::CreateError::Other(Box::new(err)))
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.session()?;
        self.rest.delete(Table::Workouts, "id", *id).await?;
        Ok(id)
    }
}
