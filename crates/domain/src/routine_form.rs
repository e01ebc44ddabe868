//! Editing state of the create/edit routine screen.

use crate::{
    ExerciseRequest, Name, NameError, Routine, RoutineRequest, SetField, SetInput, SetInputError,
    SetNumber, optional_text, set::numbered,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineForm {
    pub name: String,
    exercises: Vec<ExerciseDraft>,
    pub new_exercise: ExerciseDraft,
}

impl Default for RoutineForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutineForm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            exercises: vec![],
            new_exercise: ExerciseDraft::new(),
        }
    }

    /// Prefills the form for editing an existing routine.
    #[must_use]
    pub fn from_routine(routine: &Routine) -> Self {
        Self {
            name: routine.name.to_string(),
            exercises: routine
                .ordered_exercises()
                .map(|exercise| {
                    let mut sets = exercise.sets.iter().collect::<Vec<_>>();
                    sets.sort_by_key(|s| s.set_number);
                    ExerciseDraft {
                        name: exercise.name.to_string(),
                        technique: exercise.technique.clone().unwrap_or_default(),
                        expected_reps: exercise.expected_reps.clone().unwrap_or_default(),
                        sets: sets
                            .into_iter()
                            .map(|s| SetInput::new(s.weight, s.reps))
                            .collect(),
                    }
                })
                .collect(),
            new_exercise: ExerciseDraft::new(),
        }
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseDraft] {
        &self.exercises
    }

    /// Moves the new exercise draft into the exercise list and starts a fresh draft.
    pub fn add_exercise(&mut self) -> Result<(), RoutineFormError> {
        if self.new_exercise.name.trim().is_empty() {
            return Err(RoutineFormError::EmptyExerciseName);
        }
        let draft = std::mem::replace(&mut self.new_exercise, ExerciseDraft::new());
        self.exercises.push(draft);
        Ok(())
    }

    pub fn remove_exercise(&mut self, index: usize) -> Option<ExerciseDraft> {
        if index < self.exercises.len() {
            Some(self.exercises.remove(index))
        } else {
            None
        }
    }

    /// Validates the form before anything is sent to the backend.
    pub fn to_request(&self) -> Result<RoutineRequest, RoutineFormError> {
        let name = Name::new(&self.name).map_err(|err| match err {
            NameError::Empty => RoutineFormError::EmptyName,
            err @ NameError::TooLong(_) => RoutineFormError::InvalidName(err),
        })?;

        if self.exercises.is_empty() {
            return Err(RoutineFormError::NoExercises);
        }

        let exercises = self
            .exercises
            .iter()
            .enumerate()
            .map(|(index, draft)| draft.to_request(index))
            .collect::<Result<Vec<_>, _>>()?;

        RoutineRequest::new(name, exercises)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub name: String,
    pub technique: String,
    pub expected_reps: String,
    sets: Vec<SetInput>,
}

impl Default for ExerciseDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ExerciseDraft {
    /// A new draft starts with one empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            technique: String::new(),
            expected_reps: String::new(),
            sets: vec![SetInput::default()],
        }
    }

    pub fn sets(&self) -> impl Iterator<Item = (SetNumber, &SetInput)> {
        numbered(&self.sets)
    }

    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    pub fn add_set(&mut self) -> SetNumber {
        self.sets.push(SetInput::default());
        SetNumber::from_index(self.sets.len() - 1)
    }

    /// The last remaining set cannot be removed.
    pub fn remove_set(&mut self, set_number: SetNumber) -> bool {
        if self.sets.len() <= 1 || set_number.index() >= self.sets.len() {
            return false;
        }
        self.sets.remove(set_number.index());
        true
    }

    pub fn update_set(&mut self, set_number: SetNumber, field: SetField, value: &str) -> bool {
        match self.sets.get_mut(set_number.index()) {
            Some(set) => {
                set.set(field, value);
                true
            }
            None => false,
        }
    }

    fn to_request(&self, index: usize) -> Result<ExerciseRequest, RoutineFormError> {
        let name = Name::new(&self.name).map_err(|err| RoutineFormError::InvalidExercise {
            exercise: index,
            reason: err.to_string(),
        })?;
        let sets = numbered(&self.sets)
            .map(|(set_number, set)| {
                set.parse().map_err(|err| RoutineFormError::InvalidSet {
                    exercise: index,
                    set_number,
                    error: err,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExerciseRequest::new(
            name,
            optional_text(&self.technique),
            optional_text(&self.expected_reps),
            sets,
        ))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RoutineFormError {
    #[error("Routine name must not be empty")]
    EmptyName,
    #[error(transparent)]
    InvalidName(NameError),
    #[error("Routine must contain at least one exercise")]
    NoExercises,
    #[error("Exercise name must not be empty")]
    EmptyExerciseName,
    #[error("Exercise {} is invalid: {reason}", .exercise + 1)]
    InvalidExercise { exercise: usize, reason: String },
    #[error("Set {set_number} of exercise {} is invalid: {error}", .exercise + 1)]
    InvalidSet {
        exercise: usize,
        set_number: SetNumber,
        error: SetInputError,
    },
}
