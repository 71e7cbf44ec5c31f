use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use tracing::info;

use crate::{
    domain::{
        error::RepositoryError,
        models::registration::{NewRegistration, Registration, TIMESTAMP_FORMAT},
        repositories::registration_repository::RegistrationRepository,
        services::clock::{Clock, SystemClock},
    },
    infrastructure::entities::inscriptions,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS inscriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom_complet TEXT NOT NULL,
    numero_membre TEXT NOT NULL UNIQUE,
    frais_compris INTEGER NOT NULL,
    date_inscription TEXT DEFAULT (datetime('now'))
);
";

/// Local relational fallback used when no spreadsheet is configured
#[derive(Clone)]
pub struct SqliteRegistrationRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SqliteRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    pub fn with_clock(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn connect(database_url: &str, sqlx_logging: bool) -> Result<Self, RepositoryError> {
        let mut opt = ConnectOptions::new(database_url.to_string());
        // every connection to an in-memory database sees its own data
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(sqlx_logging);

        let db = Database::connect(opt).await.map_err(backend_error)?;
        info!("Connected to SQLite at {}", database_url);
        Ok(Self::new(db))
    }
}

fn backend_error(err: DbErr) -> RepositoryError {
    RepositoryError::Backend(err.to_string())
}

impl From<inscriptions::Model> for Registration {
    fn from(model: inscriptions::Model) -> Self {
        Registration::new(
            model.nom_complet,
            model.numero_membre,
            model.frais_compris != 0,
            model.date_inscription.unwrap_or_default(),
        )
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn init(&self) -> Result<(), RepositoryError> {
        self.db
            .execute_unprepared(SCHEMA)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        inscriptions::Entity::find()
            .count(&self.db)
            .await
            .map_err(backend_error)
    }

    async fn insert(&self, registration: &NewRegistration) -> Result<(), RepositoryError> {
        let registered_at = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let model = inscriptions::ActiveModel {
            id: NotSet,
            nom_complet: Set(registration.full_name().to_string()),
            numero_membre: Set(registration.member_number().to_string()),
            frais_compris: Set(i32::from(registration.fee_acknowledged())),
            date_inscription: Set(Some(registered_at)),
        };

        match inscriptions::Entity::insert(model).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(RepositoryError::DuplicateMember),
                _ => Err(backend_error(err)),
            },
        }
    }

    async fn list(&self) -> Result<Vec<Registration>, RepositoryError> {
        let models = inscriptions::Entity::find()
            .order_by_desc(inscriptions::Column::DateInscription)
            .order_by_desc(inscriptions::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend_error)?;

        Ok(models.into_iter().map(Registration::from).collect())
    }

    async fn delete(&self, member_number: &str) -> Result<u64, RepositoryError> {
        let result = inscriptions::Entity::delete_many()
            .filter(inscriptions::Column::NumeroMembre.eq(member_number.trim()))
            .exec(&self.db)
            .await
            .map_err(backend_error)?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::*;
    use sea_orm::{ConnectionTrait, Statement};

    use super::*;
    use crate::domain::services::clock::SteppingClock;

    #[fixture]
    async fn repository() -> SqliteRegistrationRepository {
        let connected = SqliteRegistrationRepository::connect("sqlite::memory:", false)
            .await
            .unwrap();
        let clock = SteppingClock::starting_at(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        let repository = SqliteRegistrationRepository::with_clock(connected.db, Arc::new(clock));
        repository.init().await.unwrap();
        repository
    }

    async fn members(repository: &SqliteRegistrationRepository) -> Vec<String> {
        let mut members: Vec<String> = repository
            .list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.member_number().to_string())
            .collect();
        members.sort();
        members
    }

    #[rstest]
    #[tokio::test]
    async fn test_init_is_idempotent(#[future] repository: SqliteRegistrationRepository) {
        let repository = repository.await;
        repository
            .insert(&NewRegistration::new("Jane Doe", "JD-42", true))
            .await
            .unwrap();

        repository.init().await.unwrap();

        assert_eq!(1, repository.count().await.unwrap());
        let row = repository
            .db
            .query_one(Statement::from_string(
                repository.db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE name = 'inscriptions'".to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(1, row.try_get::<i64>("", "n").unwrap());
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_round_trip(#[future] repository: SqliteRegistrationRepository) {
        let repository = repository.await;
        repository
            .insert(&NewRegistration::new("Jane Doe", "JD-42", true))
            .await
            .unwrap();

        let registrations = repository.list().await.unwrap();
        assert_eq!(1, registrations.len());
        assert_eq!("Jane Doe", registrations[0].full_name());
        assert_eq!("JD-42", registrations[0].member_number());
        assert!(registrations[0].fee_acknowledged());
        assert_eq!("2026-03-01 09:00:00", registrations[0].registered_at());
    }

    #[rstest]
    #[tokio::test]
    async fn test_duplicate_member_is_rejected(#[future] repository: SqliteRegistrationRepository) {
        let repository = repository.await;
        repository
            .insert(&NewRegistration::new("Jane Doe", "JD-42", true))
            .await
            .unwrap();

        let second = repository
            .insert(&NewRegistration::new("John Doe", " JD-42 ", true))
            .await;

        assert!(matches!(second, Err(RepositoryError::DuplicateMember)));
        assert_eq!(1, repository.count().await.unwrap());
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_removes_only_matching_member(
        #[future] repository: SqliteRegistrationRepository,
    ) {
        let repository = repository.await;
        for member in ["A1", "B2", "C3"] {
            repository
                .insert(&NewRegistration::new("Participant", member, true))
                .await
                .unwrap();
        }

        assert_eq!(1, repository.delete(" B2 ").await.unwrap());
        assert_eq!(vec!["A1", "C3"], members(&repository).await);
        assert_eq!(2, repository.count().await.unwrap());

        assert_eq!(0, repository.delete("ZZ9").await.unwrap());
        assert_eq!(vec!["A1", "C3"], members(&repository).await);
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_is_newest_first(#[future] repository: SqliteRegistrationRepository) {
        let repository = repository.await;
        for member in ["FIRST", "SECOND", "THIRD"] {
            repository
                .insert(&NewRegistration::new("Participant", member, false))
                .await
                .unwrap();
        }

        let registrations = repository.list().await.unwrap();
        let order: Vec<&str> = registrations.iter().map(|r| r.member_number()).collect();
        assert_eq!(vec!["THIRD", "SECOND", "FIRST"], order);
        assert!(
            registrations
                .windows(2)
                .all(|pair| pair[0].registered_at_parsed() > pair[1].registered_at_parsed())
        );
    }
}
