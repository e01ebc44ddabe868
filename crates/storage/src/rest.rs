//! REST
//!
//! Client for the table API of the hosted backend. All reads and writes are plain PostgREST
//! requests. Writes request the affected rows to be returned.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use strum::AsRefStr;
use uuid::Uuid;

use liftlog_domain as domain;

const ROUTINE_COLUMNS: &str = "*,exercises(*,exercise_sets(*))";
const WORKOUT_COLUMNS: &str =
    "*,routine:routines(*),workout_exercises(*,exercise:exercises(*),workout_sets(*))";
const UNIQUE_VIOLATION: &str = "23505";

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

/// Location and public key of the hosted backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
}

impl BackendConfig {
    /// Configuration embedded at build time.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Some(Self {
            url: option_env!("LIFTLOG_BACKEND_URL")?.to_string(),
            api_key: option_env!("LIFTLOG_BACKEND_KEY")?.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.url.trim_end_matches('/'))
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Users,
    Routines,
    Exercises,
    ExerciseSets,
    Workouts,
    WorkoutExercises,
    WorkoutSets,
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub config: BackendConfig,
    pub sender: S,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub const fn new(config: BackendConfig) -> Self {
        Self {
            config,
            sender: GlooNetSendRequest,
        }
    }
}

impl<S: SendRequest> REST<S> {
    pub async fn create_user(
        &self,
        username: &domain::Username,
        password: &domain::Password,
    ) -> Result<User, FetchError> {
        self.insert::<_, User>(
            Table::Users,
            &[NewUser {
                username: username.to_string(),
                password_hash: password_hash(password),
            }],
        )
        .await?
        .into_iter()
        .next()
        .ok_or(FetchError::EmptyResponse)
    }

    pub async fn read_user(
        &self,
        username: &domain::Username,
        password: &domain::Password,
    ) -> Result<Option<User>, FetchError> {
        Ok(self
            .select::<User>(
                Table::Users,
                &[
                    ("select", "id,username".to_string()),
                    ("username", format!("eq.{username}")),
                    ("password_hash", format!("eq.{}", password_hash(password))),
                ],
            )
            .await?
            .into_iter()
            .next())
    }

    /// Associates subsequent requests with the given user.
    pub async fn set_user_session(&self, user_id: Uuid) -> Result<(), FetchError> {
        let request = self
            .builder(Request::post(&self.config.endpoint("rpc/set_user_session")))
            .json(&json!({ "user_uuid": user_id }))
            .map_err(|err| FetchError::Serialization(err.to_string()))?;
        self.fetch_no_content(request).await
    }

    pub async fn read_routines(&self, id: Option<Uuid>) -> Result<Vec<Routine>, FetchError> {
        let mut query = vec![
            ("select", ROUTINE_COLUMNS.to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(id) = id {
            query.push(("id", format!("eq.{id}")));
        }
        self.select(Table::Routines, &query).await
    }

    pub async fn create_routine(&self, name: &domain::Name) -> Result<Routine, FetchError> {
        self.insert::<_, Routine>(Table::Routines, &[json!({ "name": name.to_string() })])
            .await?
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResponse)
    }

    pub async fn rename_routine(
        &self,
        id: Uuid,
        name: &domain::Name,
    ) -> Result<Routine, FetchError> {
        self.update::<_, Routine>(Table::Routines, id, &json!({ "name": name.to_string() }))
            .await?
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResponse)
    }

    pub async fn create_exercises(
        &self,
        exercises: &[NewExercise],
    ) -> Result<Vec<Exercise>, FetchError> {
        self.insert(Table::Exercises, exercises).await
    }

    pub async fn create_exercise_sets(
        &self,
        sets: &[NewExerciseSet],
    ) -> Result<Vec<ExerciseSet>, FetchError> {
        self.insert(Table::ExerciseSets, sets).await
    }

    pub async fn read_workouts(&self) -> Result<Vec<Workout>, FetchError> {
        self.select(
            Table::Workouts,
            &[
                ("select", WORKOUT_COLUMNS.to_string()),
                ("order", "date.desc".to_string()),
            ],
        )
        .await
    }

    pub async fn create_workout(&self, workout: &NewWorkout) -> Result<Workout, FetchError> {
        self.insert::<_, Workout>(Table::Workouts, std::slice::from_ref(workout))
            .await?
            .into_iter()
            .next()
            .ok_or(FetchError::EmptyResponse)
    }

    pub async fn create_workout_exercises(
        &self,
        exercises: &[NewWorkoutExercise],
    ) -> Result<Vec<WorkoutExercise>, FetchError> {
        self.insert(Table::WorkoutExercises, exercises).await
    }

    pub async fn create_workout_sets(
        &self,
        sets: &[NewWorkoutSet],
    ) -> Result<Vec<WorkoutSet>, FetchError> {
        self.insert(Table::WorkoutSets, sets).await
    }

    /// Deletes all rows of `table` whose `column` equals `value`.
    pub async fn delete(&self, table: Table, column: &str, value: Uuid) -> Result<(), FetchError> {
        let request = self
            .builder(Request::delete(&self.config.endpoint(table.as_ref())))
            .query([(column, format!("eq.{value}"))])
            .build()
            .map_err(|err| FetchError::Serialization(err.to_string()))?;
        self.fetch_no_content(request).await
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, FetchError> {
        let request = self
            .builder(Request::get(&self.config.endpoint(table.as_ref())))
            .query(query.iter().map(|(k, v)| (*k, v.as_str())))
            .build()
            .map_err(|err| FetchError::Serialization(err.to_string()))?;
        self.fetch(request).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: Table,
        rows: &[B],
    ) -> Result<Vec<T>, FetchError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let request = self
            .builder(Request::post(&self.config.endpoint(table.as_ref())))
            .header("Prefer", "return=representation")
            .json(rows)
            .map_err(|err| FetchError::Serialization(err.to_string()))?;
        self.fetch(request).await
    }

    async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        table: Table,
        id: Uuid,
        body: &B,
    ) -> Result<Vec<T>, FetchError> {
        let request = self
            .builder(Request::patch(&self.config.endpoint(table.as_ref())))
            .query([("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body)
            .map_err(|err| FetchError::Serialization(err.to_string()))?;
        self.fetch(request).await
    }

    fn builder(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, FetchError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Deserialization(err.to_string()))
    }

    async fn fetch_no_content(&self, request: Request) -> Result<(), FetchError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let Ok(response) = self.sender.send_request(request).await else {
            return Err(FetchError::NoConnection);
        };
        if response.ok() {
            return Ok(response);
        }
        let details = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorDetails>(&text).ok())
            .unwrap_or_default();
        Err(FetchError::from_status(
            response.status(),
            &response.status_text(),
            &details,
        ))
    }
}

fn password_hash(password: &domain::Password) -> String {
    STANDARD.encode(password.expose())
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("no connection")]
    NoConnection,
    #[error("conflict")]
    Conflict,
    #[error("empty response")]
    EmptyResponse,
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("deserialization failed: {0}")]
    Deserialization(String),
    #[error("{0} {1}")]
    Status(u16, String),
}

impl FetchError {
    fn from_status(status: u16, status_text: &str, details: &ErrorDetails) -> Self {
        if status == 409 || details.code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Self::Conflict;
        }
        Self::Status(
            status,
            details
                .message
                .clone()
                .unwrap_or_else(|| status_text.to_string()),
        )
    }
}

impl From<FetchError> for domain::StorageError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::NoConnection => domain::StorageError::NoConnection,
            _ => domain::StorageError::Other(Box::new(value)),
        }
    }
}

impl From<FetchError> for domain::ReadError {
    fn from(value: FetchError) -> Self {
        domain::ReadError::Storage(value.into())
    }
}

impl From<FetchError> for domain::CreateError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Conflict => domain::CreateError::Conflict,
            _ => domain::CreateError::Storage(value.into()),
        }
    }
}

impl From<FetchError> for domain::UpdateError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Conflict => domain::UpdateError::Conflict,
            _ => domain::UpdateError::Storage(value.into()),
        }
    }
}

impl From<FetchError> for domain::DeleteError {
    fn from(value: FetchError) -> Self {
        domain::DeleteError::Storage(value.into())
    }
}

/// Error body returned by the backend.
#[derive(Deserialize, Debug, Default)]
struct ErrorDetails {
    code: Option<String>,
    message: Option<String>,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidUsername(#[from] domain::UsernameError),
    #[error(transparent)]
    InvalidSetNumber(#[from] domain::SetNumberError),
    #[error(transparent)]
    InvalidWeight(#[from] domain::WeightError),
    #[error(transparent)]
    InvalidReps(#[from] domain::RepsError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl From<domain::User> for User {
    fn from(value: domain::User) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::User> for User {
    fn from(value: &domain::User) -> Self {
        Self {
            id: *value.id,
            username: value.username.to_string(),
        }
    }
}

impl TryFrom<User> for domain::User {
    type Error = domain::UsernameError;

    fn try_from(value: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            username: domain::Username::new(&value.username)?,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
struct NewUser {
    username: String,
    password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl TryFrom<Routine> for domain::Routine {
    type Error = ConversionError;

    fn try_from(value: Routine) -> Result<Self, Self::Error> {
        let mut exercises = value
            .exercises
            .into_iter()
            .map(domain::Exercise::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        exercises.sort_by_key(|e| e.order_index);
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            name: domain::Name::new(&value.name)?,
            created_at: value.created_at,
            exercises,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub name: String,
    pub technique: Option<String>,
    pub expected_reps: Option<String>,
    pub order_index: u32,
    #[serde(default)]
    pub exercise_sets: Vec<ExerciseSet>,
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = ConversionError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        let mut sets = value
            .exercise_sets
            .into_iter()
            .map(domain::ExerciseSet::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sets.sort_by_key(|s| s.set_number);
        Ok(Self {
            id: value.id.into(),
            routine_id: value.routine_id.into(),
            name: domain::Name::new(&value.name)?,
            technique: value.technique,
            expected_reps: value.expected_reps,
            order_index: value.order_index,
            sets,
        })
    }
}

impl TryFrom<Exercise> for domain::ExerciseInfo {
    type Error = ConversionError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            name: domain::Name::new(&value.name)?,
            technique: value.technique,
            expected_reps: value.expected_reps,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub routine_id: Uuid,
    pub name: String,
    pub technique: Option<String>,
    pub expected_reps: Option<String>,
    pub order_index: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
}

impl TryFrom<ExerciseSet> for domain::ExerciseSet {
    type Error = ConversionError;

    fn try_from(value: ExerciseSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise_id: value.exercise_id.into(),
            set_number: domain::SetNumber::new(value.set_number)?,
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: value.reps.map(domain::Reps::new).transpose()?,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewExerciseSet {
    pub exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
}

impl NewExerciseSet {
    #[must_use]
    pub fn new(exercise_id: Uuid, set: &domain::ExerciseSetRequest) -> Self {
        Self {
            exercise_id,
            set_number: set.set_number.into(),
            weight: set.weight.map(f32::from),
            reps: set.reps.map(u32::from),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub routine_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    #[serde(default)]
    pub routine: Option<Routine>,
    #[serde(default)]
    pub workout_exercises: Vec<WorkoutExercise>,
}

impl TryFrom<Workout> for domain::Workout {
    type Error = ConversionError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            routine_id: value.routine_id.into(),
            routine_name: value
                .routine
                .map(|r| domain::Name::new(&r.name))
                .transpose()?,
            date: value.date,
            notes: value.notes,
            exercises: value
                .workout_exercises
                .into_iter()
                .map(domain::WorkoutExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub routine_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub notes: Option<String>,
    #[serde(default)]
    pub exercise: Option<Exercise>,
    #[serde(default)]
    pub workout_sets: Vec<WorkoutSet>,
}

impl TryFrom<WorkoutExercise> for domain::WorkoutExercise {
    type Error = ConversionError;

    fn try_from(value: WorkoutExercise) -> Result<Self, Self::Error> {
        let mut sets = value
            .workout_sets
            .into_iter()
            .map(domain::WorkoutSet::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sets.sort_by_key(|s| s.set_number);
        Ok(Self {
            id: value.id.into(),
            workout_id: value.workout_id.into(),
            exercise_id: value.exercise_id.into(),
            notes: value.notes,
            exercise: value
                .exercise
                .map(domain::ExerciseInfo::try_from)
                .transpose()?,
            sets,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewWorkoutExercise {
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub workout_exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
}

impl TryFrom<WorkoutSet> for domain::WorkoutSet {
    type Error = ConversionError;

    fn try_from(value: WorkoutSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            workout_exercise_id: value.workout_exercise_id.into(),
            set_number: domain::SetNumber::new(value.set_number)?,
            weight: value.weight.map(domain::Weight::new).transpose()?,
            reps: value.reps.map(domain::Reps::new).transpose()?,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewWorkoutSet {
    pub workout_exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
}

impl NewWorkoutSet {
    #[must_use]
    pub fn new(workout_exercise_id: Uuid, set: &domain::WorkoutSetRequest) -> Self {
        Self {
            workout_exercise_id,
            set_number: set.set_number.into(),
            weight: set.weight.map(f32::from),
            reps: set.reps.map(u32::from),
        }
    }
}
