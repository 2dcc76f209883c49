//! Team submissions: the records, their storage and the JSON endpoint.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::rules::{MemberField, Person};

pub mod api;
pub mod store;

/// The details collected for one person. The leader and the members share
/// this shape; which optional fields are filled depends on the rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub name: String,
    pub email: String,
    pub urn: Option<String>,
    pub phone: Option<String>,
    pub batch: Option<String>,
    pub year: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl MemberDetails {
    pub fn field(&self, field: MemberField) -> Option<&str> {
        match field {
            MemberField::Name => Some(self.name.as_str()),
            MemberField::Email => Some(self.email.as_str()),
            MemberField::Urn => self.urn.as_deref(),
            MemberField::Phone => self.phone.as_deref(),
            MemberField::Batch => self.batch.as_deref(),
            MemberField::Year => self.year.as_deref(),
            MemberField::Github => self.github.as_deref(),
            MemberField::Linkedin => self.linkedin.as_deref(),
        }
    }
}

/// A validated submission which has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub team_name: String,
    pub leader: MemberDetails,
    pub members: Vec<MemberDetails>,
    /// Head-count including the leader.
    pub team_size: i64,
    pub college: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub team_name: String,
    pub leader: MemberDetails,
    pub members: Vec<MemberDetails>,
    pub team_size: i64,
    pub college: String,
    pub created_at: NaiveDateTime,
}

impl Submission {
    /// The leader's and members' details under their flat field names
    /// (`leader_email`, `member2_phone`, ...).
    pub fn person_fields(&self) -> Vec<(String, Option<&str>)> {
        std::iter::once((Person::Leader, &self.leader))
            .chain(
                self.members
                    .iter()
                    .enumerate()
                    .map(|(i, member)| (Person::Member(i + 1), member)),
            )
            .flat_map(|(person, details)| {
                MemberField::ALL
                    .into_iter()
                    .map(move |field| (person.key(field), details.field(field)))
            })
            .collect()
    }
}

/// Submissions are serialised flat, with the same field names the endpoint
/// accepts, plus `id` and `created_at`.
impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("team_name", &self.team_name)?;
        for (key, value) in self.person_fields() {
            map.serialize_entry(&key, &value)?;
        }
        map.serialize_entry("team_size", &self.team_size)?;
        map.serialize_entry("college", &self.college)?;
        map.serialize_entry("created_at", &self.created_at)?;
        map.end()
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct SubmissionRow {
    pub id: String,
    pub team_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub leader_urn: Option<String>,
    pub leader_phone: Option<String>,
    pub leader_batch: Option<String>,
    pub leader_year: Option<String>,
    pub leader_github: Option<String>,
    pub leader_linkedin: Option<String>,
    pub team_size: i64,
    pub college: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone)]
pub struct MemberRow {
    pub id: String,
    pub submission_id: String,
    pub seq: i64,
    pub name: String,
    pub email: String,
    pub urn: Option<String>,
    pub phone: Option<String>,
    pub batch: Option<String>,
    pub year: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl SubmissionRow {
    pub fn into_submission(self, members: Vec<MemberDetails>) -> Submission {
        Submission {
            id: self.id,
            team_name: self.team_name,
            leader: MemberDetails {
                name: self.leader_name,
                email: self.leader_email,
                urn: self.leader_urn,
                phone: self.leader_phone,
                batch: self.leader_batch,
                year: self.leader_year,
                github: self.leader_github,
                linkedin: self.leader_linkedin,
            },
            members,
            team_size: self.team_size,
            college: self.college,
            created_at: self.created_at,
        }
    }
}

impl From<MemberRow> for MemberDetails {
    fn from(row: MemberRow) -> Self {
        MemberDetails {
            name: row.name,
            email: row.email,
            urn: row.urn,
            phone: row.phone,
            batch: row.batch,
            year: row.year,
            github: row.github,
            linkedin: row.linkedin,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn serialises_flat() {
        let submission = Submission {
            id: "abc".to_string(),
            team_name: "404_Not_Found".to_string(),
            leader: MemberDetails {
                name: "Ada".to_string(),
                email: "ada@adypu.edu.in".to_string(),
                batch: Some("2025-2029".to_string()),
                ..Default::default()
            },
            members: vec![MemberDetails {
                name: "Grace".to_string(),
                email: "grace@adypu.edu.in".to_string(),
                github: Some("https://github.com/grace".to_string()),
                ..Default::default()
            }],
            team_size: 2,
            college: "NST-Pune".to_string(),
            created_at: NaiveDate::from_ymd_opt(2026, 2, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["leader_email"], "ada@adypu.edu.in");
        assert_eq!(json["leader_batch"], "2025-2029");
        assert!(json["leader_linkedin"].is_null());
        assert_eq!(json["member1_github"], "https://github.com/grace");
        assert_eq!(json["team_size"], 2);
        assert_eq!(json["created_at"], "2026-02-01T10:00:00");
        assert!(json.get("member2_name").is_none());
    }
}
