use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{
    ExerciseID, ExerciseInfo, Name, Routine, RoutineID, SetField, SetInput, SetInputError,
    SetNumber, WorkoutExerciseRequest, WorkoutRequest, WorkoutRequestError, WorkoutSetRequest,
    elapsed_seconds, optional_text, set::numbered,
};

/// State of a workout in progress.
///
/// Exercises keep the order of the routine. The set number of a set is its one-based position
/// within its exercise, so removing a set renumbers all following sets.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    routine_id: RoutineID,
    routine_name: Name,
    started_at: DateTime<Utc>,
    exercises: IndexMap<ExerciseID, SessionExercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionExercise {
    pub info: ExerciseInfo,
    pub notes: String,
    sets: Vec<SetInput>,
}

impl SessionExercise {
    pub fn sets(&self) -> impl Iterator<Item = (SetNumber, &SetInput)> {
        numbered(&self.sets)
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }
}

impl WorkoutSession {
    /// Starts a session prefilled with the template sets of the routine.
    #[must_use]
    pub fn new(routine: &Routine, started_at: DateTime<Utc>) -> Self {
        let exercises = routine
            .ordered_exercises()
            .map(|exercise| {
                let mut sets = exercise.sets.iter().collect::<Vec<_>>();
                sets.sort_by_key(|s| s.set_number);
                (
                    exercise.id,
                    SessionExercise {
                        info: ExerciseInfo::from(exercise),
                        notes: String::new(),
                        sets: sets
                            .into_iter()
                            .map(|s| SetInput::new(s.weight, s.reps))
                            .collect(),
                    },
                )
            })
            .collect();
        Self {
            routine_id: routine.id,
            routine_name: routine.name.clone(),
            started_at,
            exercises,
        }
    }

    #[must_use]
    pub fn routine_id(&self) -> RoutineID {
        self.routine_id
    }

    #[must_use]
    pub fn routine_name(&self) -> &Name {
        &self.routine_name
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn exercises(&self) -> impl Iterator<Item = (ExerciseID, &SessionExercise)> {
        self.exercises.iter().map(|(id, e)| (*id, e))
    }

    #[must_use]
    pub fn exercise(&self, exercise_id: ExerciseID) -> Option<&SessionExercise> {
        self.exercises.get(&exercise_id)
    }

    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        elapsed_seconds(self.started_at, now)
    }

    pub fn add_set(&mut self, exercise_id: ExerciseID) -> Result<SetNumber, WorkoutSessionError> {
        let exercise = self.exercise_mut(exercise_id)?;
        exercise.sets.push(SetInput::default());
        Ok(SetNumber::from_index(exercise.sets.len() - 1))
    }

    pub fn remove_set(
        &mut self,
        exercise_id: ExerciseID,
        set_number: SetNumber,
    ) -> Result<(), WorkoutSessionError> {
        let exercise = self.exercise_mut(exercise_id)?;
        if set_number.index() >= exercise.sets.len() {
            return Err(WorkoutSessionError::UnknownSet(exercise_id, set_number));
        }
        exercise.sets.remove(set_number.index());
        Ok(())
    }

    pub fn update_set(
        &mut self,
        exercise_id: ExerciseID,
        set_number: SetNumber,
        field: SetField,
        value: &str,
    ) -> Result<(), WorkoutSessionError> {
        self.exercise_mut(exercise_id)?
            .sets
            .get_mut(set_number.index())
            .ok_or(WorkoutSessionError::UnknownSet(exercise_id, set_number))?
            .set(field, value);
        Ok(())
    }

    pub fn set_notes(
        &mut self,
        exercise_id: ExerciseID,
        notes: &str,
    ) -> Result<(), WorkoutSessionError> {
        notes.clone_into(&mut self.exercise_mut(exercise_id)?.notes);
        Ok(())
    }

    /// Builds the request for storing the session.
    ///
    /// Blank sets are left out and the remaining sets are renumbered. Exercises without any
    /// remaining set are left out.
    pub fn to_request(&self) -> Result<WorkoutRequest, WorkoutSessionError> {
        let mut exercises = vec![];

        for (exercise_id, exercise) in &self.exercises {
            let mut sets = vec![];
            for (set_number, set) in exercise.sets() {
                if set.is_blank() {
                    continue;
                }
                let (weight, reps) = set.parse().map_err(|error| WorkoutSessionError::InvalidSet {
                    exercise_id: *exercise_id,
                    set_number,
                    error,
                })?;
                sets.push(WorkoutSetRequest {
                    set_number: SetNumber::from_index(sets.len()),
                    weight,
                    reps,
                });
            }
            if !sets.is_empty() {
                exercises.push(WorkoutExerciseRequest {
                    exercise_id: *exercise_id,
                    notes: optional_text(&exercise.notes),
                    sets,
                });
            }
        }

        if exercises.is_empty() {
            return Err(WorkoutSessionError::NothingToSave);
        }

        Ok(WorkoutRequest::new(self.routine_id, exercises)?)
    }

    fn exercise_mut(
        &mut self,
        exercise_id: ExerciseID,
    ) -> Result<&mut SessionExercise, WorkoutSessionError> {
        self.exercises
            .get_mut(&exercise_id)
            .ok_or(WorkoutSessionError::UnknownExercise(exercise_id))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WorkoutSessionError {
    #[error("Unknown exercise {0:?}")]
    UnknownExercise(ExerciseID),
    #[error("Unknown set {1} of exercise {0:?}")]
    UnknownSet(ExerciseID, SetNumber),
    #[error("Workout contains no recorded sets")]
    NothingToSave,
    #[error("Invalid set {set_number}: {error}")]
    InvalidSet {
        exercise_id: ExerciseID,
        set_number: SetNumber,
        error: SetInputError,
    },
    #[error(transparent)]
    Request(#[from] WorkoutRequestError),
}
