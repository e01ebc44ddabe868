use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, ExerciseInfo, Name, ReadError, Reps, RoutineID,
    SetNumber, UserID, Weight, WorkoutDuration, WorkoutSession, WorkoutSessionError,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutService {
    async fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(
        &self,
        request: WorkoutRequest,
        date: DateTime<Utc>,
        duration: Option<WorkoutDuration>,
    ) -> Result<Workout, CreateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;

    async fn get_workout(&self, id: WorkoutID) -> Result<Workout, ReadError> {
        self.get_workouts()
            .await?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or(ReadError::NotFound)
    }

    /// Stores the recorded sets of a session. Nothing is sent when the session contains no
    /// recorded set.
    async fn save_workout(
        &self,
        session: &WorkoutSession,
        now: DateTime<Utc>,
    ) -> Result<Workout, SaveWorkoutError> {
        let request = session.to_request()?;
        let duration = WorkoutDuration::from_seconds(session.elapsed(now));
        Ok(self.create_workout(request, now, Some(duration)).await?)
    }
}

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    async fn create_workout(
        &self,
        request: WorkoutRequest,
        date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Workout, CreateError>;
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
}

#[derive(thiserror::Error, Debug)]
pub enum SaveWorkoutError {
    #[error(transparent)]
    Session(#[from] WorkoutSessionError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

/// Executed instance of a routine.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub user_id: UserID,
    pub routine_id: RoutineID,
    /// `None` if the routine is not available anymore.
    pub routine_name: Option<Name>,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    #[must_use]
    pub fn duration(&self) -> Option<WorkoutDuration> {
        self.notes.as_deref().and_then(|n| n.parse().ok())
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseID,
    pub workout_id: WorkoutID,
    pub exercise_id: ExerciseID,
    pub notes: Option<String>,
    /// `None` if the exercise is not available anymore.
    pub exercise: Option<ExerciseInfo>,
    pub sets: Vec<WorkoutSet>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutExerciseID(Uuid);

impl From<Uuid> for WorkoutExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Recorded outcome of a single set.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: WorkoutSetID,
    pub workout_exercise_id: WorkoutExerciseID,
    pub set_number: SetNumber,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSetID(Uuid);

impl From<Uuid> for WorkoutSetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Validated content of a workout to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRequest {
    routine_id: RoutineID,
    exercises: Vec<WorkoutExerciseRequest>,
}

impl WorkoutRequest {
    pub fn new(
        routine_id: RoutineID,
        exercises: Vec<WorkoutExerciseRequest>,
    ) -> Result<Self, WorkoutRequestError> {
        if exercises.is_empty() {
            return Err(WorkoutRequestError::NoExercises);
        }

        for exercise in &exercises {
            if exercise.sets.is_empty() {
                return Err(WorkoutRequestError::NoSets(exercise.exercise_id));
            }
            for (index, set) in exercise.sets.iter().enumerate() {
                if set.set_number != SetNumber::from_index(index) {
                    return Err(WorkoutRequestError::NonContiguousSetNumbers(
                        exercise.exercise_id,
                    ));
                }
                if set.weight.is_none() && set.reps.is_none() {
                    return Err(WorkoutRequestError::EmptySet(
                        exercise.exercise_id,
                        set.set_number,
                    ));
                }
            }
        }

        Ok(Self {
            routine_id,
            exercises,
        })
    }

    #[must_use]
    pub fn routine_id(&self) -> RoutineID {
        self.routine_id
    }

    #[must_use]
    pub fn exercises(&self) -> &[WorkoutExerciseRequest] {
        &self.exercises
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExerciseRequest {
    pub exercise_id: ExerciseID,
    pub notes: Option<String>,
    pub sets: Vec<WorkoutSetRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutSetRequest {
    pub set_number: SetNumber,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutRequestError {
    #[error("Workout must contain at least one exercise")]
    NoExercises,
    #[error("Exercise {0:?} must contain at least one set")]
    NoSets(ExerciseID),
    #[error("Set numbers of exercise {0:?} must be contiguous starting at 1")]
    NonContiguousSetNumbers(ExerciseID),
    #[error("Set {1} of exercise {0:?} must have a weight or reps")]
    EmptySet(ExerciseID, SetNumber),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn set(number: u32, weight: Option<f32>, reps: Option<u32>) -> WorkoutSetRequest {
        WorkoutSetRequest {
            set_number: SetNumber::new(number).unwrap(),
            weight: weight.map(|w| Weight::new(w).unwrap()),
            reps: reps.map(|r| Reps::new(r).unwrap()),
        }
    }

    fn exercise(id: u128, sets: Vec<WorkoutSetRequest>) -> WorkoutExerciseRequest {
        WorkoutExerciseRequest {
            exercise_id: id.into(),
            notes: None,
            sets,
        }
    }

    #[rstest]
    #[case(vec![], Err(WorkoutRequestError::NoExercises))]
    #[case(vec![exercise(1, vec![])], Err(WorkoutRequestError::NoSets(1.into())))]
    #[case(
        vec![exercise(1, vec![set(1, Some(50.0), None), set(3, None, Some(8))])],
        Err(WorkoutRequestError::NonContiguousSetNumbers(1.into()))
    )]
    #[case(
        vec![exercise(1, vec![set(1, None, None)])],
        Err(WorkoutRequestError::EmptySet(1.into(), SetNumber::FIRST))
    )]
    #[case(
        vec![
            exercise(1, vec![set(1, Some(50.0), Some(10)), set(2, None, Some(8))]),
            exercise(2, vec![set(1, Some(20.0), None)]),
        ],
        Ok(())
    )]
    fn test_workout_request_new(
        #[case] exercises: Vec<WorkoutExerciseRequest>,
        #[case] expected: Result<(), WorkoutRequestError>,
    ) {
        assert_eq!(
            WorkoutRequest::new(7.into(), exercises).map(|r| r.routine_id()),
            expected.map(|()| RoutineID::from(7))
        );
    }

    #[test]
    fn test_workout_duration_and_num_sets() {
        let workout = Workout {
            id: 1.into(),
            user_id: 2.into(),
            routine_id: 3.into(),
            routine_name: Some(Name::new("Push Day").unwrap()),
            date: Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap(),
            notes: Some("Duration: 45m 30s".to_string()),
            exercises: vec![WorkoutExercise {
                id: 4.into(),
                workout_id: 1.into(),
                exercise_id: 5.into(),
                notes: None,
                exercise: None,
                sets: vec![
                    WorkoutSet {
                        id: 6.into(),
                        workout_exercise_id: 4.into(),
                        set_number: SetNumber::FIRST,
                        weight: Some(Weight::new(60.0).unwrap()),
                        reps: Some(Reps::new(10).unwrap()),
                    },
                    WorkoutSet {
                        id: 7.into(),
                        workout_exercise_id: 4.into(),
                        set_number: SetNumber::new(2).unwrap(),
                        weight: None,
                        reps: Some(Reps::new(9).unwrap()),
                    },
                ],
            }],
        };

        assert_eq!(workout.duration(), Some(WorkoutDuration::from_seconds(2730)));
        assert_eq!(workout.num_sets(), 2);

        let workout = Workout {
            notes: Some("Great session".to_string()),
            ..workout
        };

        assert_eq!(workout.duration(), None);

        let workout = Workout {
            notes: Some("Duration: 999999999999999999m 0s".to_string()),
            ..workout
        };

        assert_eq!(workout.duration(), None);
    }

    #[test]
    fn test_workout_id_nil() {
        assert!(WorkoutID::nil().is_nil());
        assert_eq!(WorkoutID::nil(), WorkoutID::default());
    }
}
