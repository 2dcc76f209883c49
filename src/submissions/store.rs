use std::collections::HashMap;

use chrono::Utc;
use diesel::{
    SqliteConnection,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use thiserror::Error;
use tokio::task::spawn_blocking;
use uuid::Uuid;

use crate::{
    schema::{submission_members, submissions},
    state::DbPool,
    submissions::{
        MemberDetails, MemberRow, NewSubmission, Submission, SubmissionRow,
    },
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's uniqueness constraint on the leader email fired.
    #[error("a submission already exists for this leader email")]
    Conflict,
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("could not check out a database connection: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to run migrations: {0}")]
    Migration(String),
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::Conflict
            }
            e => StoreError::Database(e),
        }
    }
}

/// Access to the submission tables. Cheap to clone; every operation checks a
/// connection out of the pool on a blocking thread.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError>
            + Send
            + 'static,
    {
        let pool = self.pool.clone();
        spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await?
    }

    /// Stores the submission and its members in one transaction, so either
    /// all rows are written or none are.
    #[tracing::instrument(skip_all, fields(leader_email = %submission.leader.email))]
    pub async fn insert(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, StoreError> {
        self.run(move |conn| {
            let id = Uuid::now_v7().to_string();
            let created_at = Utc::now().naive_utc();

            conn.transaction::<_, StoreError, _>(|conn| {
                let leader = &submission.leader;
                let n = diesel::insert_into(submissions::table)
                    .values((
                        submissions::id.eq(&id),
                        submissions::team_name.eq(&submission.team_name),
                        submissions::leader_name.eq(&leader.name),
                        submissions::leader_email.eq(&leader.email),
                        submissions::leader_urn.eq(leader.urn.as_deref()),
                        submissions::leader_phone.eq(leader.phone.as_deref()),
                        submissions::leader_batch.eq(leader.batch.as_deref()),
                        submissions::leader_year.eq(leader.year.as_deref()),
                        submissions::leader_github.eq(leader.github.as_deref()),
                        submissions::leader_linkedin
                            .eq(leader.linkedin.as_deref()),
                        submissions::team_size.eq(submission.team_size),
                        submissions::college.eq(&submission.college),
                        submissions::created_at.eq(created_at),
                    ))
                    .execute(conn)?;
                debug_assert_eq!(n, 1);

                for (seq, member) in submission.members.iter().enumerate() {
                    diesel::insert_into(submission_members::table)
                        .values((
                            submission_members::id
                                .eq(Uuid::now_v7().to_string()),
                            submission_members::submission_id.eq(&id),
                            submission_members::seq.eq(seq as i64 + 1),
                            submission_members::name.eq(&member.name),
                            submission_members::email.eq(&member.email),
                            submission_members::urn.eq(member.urn.as_deref()),
                            submission_members::phone
                                .eq(member.phone.as_deref()),
                            submission_members::batch
                                .eq(member.batch.as_deref()),
                            submission_members::year.eq(member.year.as_deref()),
                            submission_members::github
                                .eq(member.github.as_deref()),
                            submission_members::linkedin
                                .eq(member.linkedin.as_deref()),
                        ))
                        .execute(conn)?;
                }

                Ok(())
            })?;

            tracing::info!(submission_id = %id, "stored submission");

            Ok(Submission {
                id,
                team_name: submission.team_name,
                leader: submission.leader,
                members: submission.members,
                team_size: submission.team_size,
                college: submission.college,
                created_at,
            })
        })
        .await
    }

    /// All submissions, newest first, each with its members in order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        self.run(|conn| {
            let rows = submissions::table
                .order((submissions::created_at.desc(), submissions::id.desc()))
                .load::<SubmissionRow>(conn)?;

            let mut members: HashMap<String, Vec<MemberDetails>> =
                HashMap::new();
            for member in submission_members::table
                .order((submission_members::submission_id, submission_members::seq))
                .load::<MemberRow>(conn)?
            {
                members
                    .entry(member.submission_id.clone())
                    .or_default()
                    .push(member.into());
            }

            Ok(rows
                .into_iter()
                .map(|row| {
                    let team = members.remove(&row.id).unwrap_or_default();
                    row.into_submission(team)
                })
                .collect())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn exists_for_leader(
        &self,
        leader_email: &str,
    ) -> Result<bool, StoreError> {
        let leader_email = leader_email.trim().to_string();
        self.run(move |conn| {
            Ok(diesel::select(diesel::dsl::exists(
                submissions::table
                    .filter(submissions::leader_email.eq(&leader_email)),
            ))
            .get_result::<bool>(conn)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::{Store, StoreError};
    use crate::{
        schema::{submission_members, submissions},
        state::open_pool,
        submissions::{MemberDetails, NewSubmission},
    };

    fn person(name: &str) -> MemberDetails {
        MemberDetails {
            name: name.to_string(),
            email: format!("{}@adypu.edu.in", name.to_lowercase()),
            urn: Some(format!("E25B-{name}")),
            batch: Some("2025-2029".to_string()),
            ..Default::default()
        }
    }

    fn team(team_name: &str, leader: &str) -> NewSubmission {
        NewSubmission {
            team_name: team_name.to_string(),
            leader: person(leader),
            members: vec![person("Grace"), person("Alan")],
            team_size: 3,
            college: "NST-Pune".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_list_newest_first() {
        let pool = open_pool(":memory:").unwrap();
        let store = Store::new(pool);

        let first = store.insert(team("First", "Ada")).await.unwrap();
        let second = store.insert(team("Second", "Barbara")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![second, first]);
        assert_eq!(listed[1].members[0].name, "Grace");
        assert_eq!(listed[1].members[1].name, "Alan");
    }

    #[tokio::test]
    async fn duplicate_leader_is_a_conflict_and_writes_nothing() {
        let pool = open_pool(":memory:").unwrap();
        let store = Store::new(pool.clone());

        store.insert(team("First", "Ada")).await.unwrap();
        let mut again = team("Other name", "Ada");
        again.leader.email = "ADA@adypu.edu.in".to_string();
        assert!(matches!(
            store.insert(again).await,
            Err(StoreError::Conflict)
        ));

        let mut conn = pool.get().unwrap();
        let teams = submissions::table
            .count()
            .get_result::<i64>(&mut *conn)
            .unwrap();
        let members = submission_members::table
            .count()
            .get_result::<i64>(&mut *conn)
            .unwrap();
        assert_eq!((teams, members), (1, 2));
    }

    #[tokio::test]
    async fn exists_for_leader() {
        let store = Store::new(open_pool(":memory:").unwrap());
        assert!(!store.exists_for_leader("ada@adypu.edu.in").await.unwrap());
        store.insert(team("First", "Ada")).await.unwrap();
        assert!(store.exists_for_leader("ada@adypu.edu.in").await.unwrap());
        assert!(store.exists_for_leader("Ada@ADYPU.edu.in").await.unwrap());
    }
}
