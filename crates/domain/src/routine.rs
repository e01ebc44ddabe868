use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, Exercise, ExerciseID, Name, ReadError, Reps, RoutineForm,
    RoutineFormError, SetNumber, UpdateError, UserID, Weight,
};

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn get_routine(&self, id: RoutineID) -> Result<Routine, ReadError>;
    async fn create_routine(&self, request: RoutineRequest) -> Result<Routine, CreateError>;
    async fn replace_routine(
        &self,
        id: RoutineID,
        request: RoutineRequest,
    ) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;

    /// Validates the form and creates a new routine, or replaces the routine `id` when editing.
    async fn save_routine(
        &self,
        id: Option<RoutineID>,
        form: &RoutineForm,
    ) -> Result<Routine, SaveRoutineError> {
        let request = form.to_request()?;
        match id {
            None => Ok(self.create_routine(request).await?),
            Some(id) => Ok(self.replace_routine(id, request).await?),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    async fn read_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn read_routine(&self, id: RoutineID) -> Result<Routine, ReadError>;
    async fn create_routine(&self, request: RoutineRequest) -> Result<Routine, CreateError>;
    async fn replace_routine(
        &self,
        id: RoutineID,
        request: RoutineRequest,
    ) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
}

#[derive(thiserror::Error, Debug)]
pub enum SaveRoutineError {
    #[error(transparent)]
    Form(#[from] RoutineFormError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: RoutineID,
    pub user_id: UserID,
    pub name: Name,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
}

impl Routine {
    /// Exercises in execution order.
    pub fn ordered_exercises(&self) -> impl Iterator<Item = &Exercise> {
        let mut exercises = self.exercises.iter().collect::<Vec<_>>();
        exercises.sort_by_key(|e| e.order_index);
        exercises.into_iter()
    }

    #[must_use]
    pub fn exercise(&self, id: ExerciseID) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn num_exercises(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(Exercise::num_sets).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(Uuid);

impl RoutineID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Validated content of a routine to be stored.
///
/// A request always contains at least one exercise. The order index of an exercise is its
/// position in the request and set numbers are contiguous starting at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineRequest {
    name: Name,
    exercises: Vec<ExerciseRequest>,
}

impl RoutineRequest {
    pub fn new(name: Name, exercises: Vec<ExerciseRequest>) -> Result<Self, RoutineFormError> {
        if exercises.is_empty() {
            return Err(RoutineFormError::NoExercises);
        }

        Ok(Self { name, exercises })
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseRequest] {
        &self.exercises
    }

    /// Exercises paired with their order index.
    pub fn indexed_exercises(&self) -> impl Iterator<Item = (u32, &ExerciseRequest)> {
        self.exercises
            .iter()
            .enumerate()
            .map(|(i, e)| (u32::try_from(i).unwrap_or(u32::MAX), e))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRequest {
    pub name: Name,
    pub technique: Option<String>,
    pub expected_reps: Option<String>,
    sets: Vec<ExerciseSetRequest>,
}

impl ExerciseRequest {
    #[must_use]
    pub fn new(
        name: Name,
        technique: Option<String>,
        expected_reps: Option<String>,
        sets: Vec<(Option<Weight>, Option<Reps>)>,
    ) -> Self {
        Self {
            name,
            technique,
            expected_reps,
            sets: sets
                .into_iter()
                .enumerate()
                .map(|(index, (weight, reps))| ExerciseSetRequest {
                    set_number: SetNumber::from_index(index),
                    weight,
                    reps,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn sets(&self) -> &[ExerciseSetRequest] {
        &self.sets
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseSetRequest {
    pub set_number: SetNumber,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use crate::ExerciseSet;

    use super::*;

    static ROUTINE: std::sync::LazyLock<Routine> = std::sync::LazyLock::new(|| Routine {
        id: 1.into(),
        user_id: 2.into(),
        name: Name::new("Push Day").unwrap(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
        exercises: vec![
            Exercise {
                id: 11.into(),
                routine_id: 1.into(),
                name: Name::new("Dips").unwrap(),
                technique: None,
                expected_reps: None,
                order_index: 1,
                sets: vec![],
            },
            Exercise {
                id: 10.into(),
                routine_id: 1.into(),
                name: Name::new("Bench Press").unwrap(),
                technique: Some("Paused".to_string()),
                expected_reps: Some("6-8".to_string()),
                order_index: 0,
                sets: vec![
                    ExerciseSet {
                        id: 20.into(),
                        exercise_id: 10.into(),
                        set_number: SetNumber::new(1).unwrap(),
                        weight: Some(Weight::new(80.0).unwrap()),
                        reps: Some(Reps::new(8).unwrap()),
                    },
                    ExerciseSet {
                        id: 21.into(),
                        exercise_id: 10.into(),
                        set_number: SetNumber::new(2).unwrap(),
                        weight: Some(Weight::new(80.0).unwrap()),
                        reps: None,
                    },
                ],
            },
        ],
    });

    #[test]
    fn test_routine_ordered_exercises() {
        assert_eq!(
            ROUTINE
                .ordered_exercises()
                .map(|e| e.id)
                .collect::<Vec<_>>(),
            vec![ExerciseID::from(10), ExerciseID::from(11)]
        );
    }

    #[test]
    fn test_routine_exercise() {
        assert_eq!(
            ROUTINE.exercise(11.into()).map(|e| e.name.to_string()),
            Some("Dips".to_string())
        );
        assert_eq!(ROUTINE.exercise(12.into()), None);
    }

    #[test]
    fn test_routine_counts() {
        assert_eq!(ROUTINE.num_exercises(), 2);
        assert_eq!(ROUTINE.num_sets(), 2);
    }

    #[test]
    fn test_routine_id_nil() {
        assert!(RoutineID::nil().is_nil());
        assert_eq!(RoutineID::nil(), RoutineID::default());
    }

    #[test]
    fn test_routine_request_requires_exercise() {
        assert_eq!(
            RoutineRequest::new(Name::new("A").unwrap(), vec![]),
            Err(RoutineFormError::NoExercises)
        );
    }

    #[test]
    fn test_routine_request_indexed_exercises() {
        let request = RoutineRequest::new(
            Name::new("Legs").unwrap(),
            vec![
                ExerciseRequest::new(Name::new("Squat").unwrap(), None, None, vec![]),
                ExerciseRequest::new(Name::new("Lunge").unwrap(), None, None, vec![]),
            ],
        )
        .unwrap();

        assert_eq!(
            request
                .indexed_exercises()
                .map(|(i, e)| (i, e.name.to_string()))
                .collect::<Vec<_>>(),
            vec![(0, "Squat".to_string()), (1, "Lunge".to_string())]
        );
    }

    #[test]
    fn test_exercise_request_numbers_sets() {
        let request = ExerciseRequest::new(
            Name::new("Squat").unwrap(),
            None,
            Some("5".to_string()),
            vec![
                (Some(Weight::new(100.0).unwrap()), Some(Reps::new(5).unwrap())),
                (None, Some(Reps::new(5).unwrap())),
            ],
        );

        assert_eq!(
            request.sets(),
            &[
                ExerciseSetRequest {
                    set_number: SetNumber::new(1).unwrap(),
                    weight: Some(Weight::new(100.0).unwrap()),
                    reps: Some(Reps::new(5).unwrap()),
                },
                ExerciseSetRequest {
                    set_number: SetNumber::new(2).unwrap(),
                    weight: None,
                    reps: Some(Reps::new(5).unwrap()),
                },
            ]
        );
    }
}
