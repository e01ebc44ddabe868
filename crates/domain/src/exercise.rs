use derive_more::Deref;
use uuid::Uuid;

use crate::{Name, Reps, RoutineID, SetNumber, Weight};

/// Movement within a routine, together with its template sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub routine_id: RoutineID,
    pub name: Name,
    pub technique: Option<String>,
    pub expected_reps: Option<String>,
    pub order_index: u32,
    pub sets: Vec<ExerciseSet>,
}

impl Exercise {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Planned target of a single set.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSet {
    pub id: ExerciseSetID,
    pub exercise_id: ExerciseID,
    pub set_number: SetNumber,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseSetID(Uuid);

impl ExerciseSetID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseSetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseSetID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Display data of an exercise referenced by a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseInfo {
    pub name: Name,
    pub technique: Option<String>,
    pub expected_reps: Option<String>,
}

impl From<&Exercise> for ExerciseInfo {
    fn from(value: &Exercise) -> Self {
        Self {
            name: value.name.clone(),
            technique: value.technique.clone(),
            expected_reps: value.expected_reps.clone(),
        }
    }
}
