//! The declared rule set for a registration drive.
//!
//! Every variant of the registration form (fixed team size, same batch,
//! rules checklist, ...) is one [`RuleSet`] value. The same rule set validates
//! input from the browser form and from the JSON endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    form_state::FormState,
    submissions::{MemberDetails, NewSubmission},
    validation::{is_valid_email, is_valid_profile_url},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberField {
    Name,
    Email,
    Urn,
    Phone,
    Batch,
    Year,
    Github,
    Linkedin,
}

impl MemberField {
    pub const ALL: [MemberField; 8] = [
        MemberField::Name,
        MemberField::Email,
        MemberField::Urn,
        MemberField::Phone,
        MemberField::Batch,
        MemberField::Year,
        MemberField::Github,
        MemberField::Linkedin,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MemberField::Name => "name",
            MemberField::Email => "email",
            MemberField::Urn => "urn",
            MemberField::Phone => "phone",
            MemberField::Batch => "batch",
            MemberField::Year => "year",
            MemberField::Github => "github",
            MemberField::Linkedin => "linkedin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemberField::Name => "Full name",
            MemberField::Email => "Email address",
            MemberField::Urn => "URN",
            MemberField::Phone => "Phone number",
            MemberField::Batch => "Batch",
            MemberField::Year => "Year",
            MemberField::Github => "GitHub profile",
            MemberField::Linkedin => "LinkedIn profile",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Whose details a group of fields describes. Members are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Person {
    Leader,
    Member(usize),
}

impl Person {
    pub fn prefix(self) -> String {
        match self {
            Person::Leader => "leader".to_string(),
            Person::Member(n) => format!("member{n}"),
        }
    }

    pub fn key(self, field: MemberField) -> String {
        format!("{}_{}", self.prefix(), field.key())
    }

    pub fn title(self) -> String {
        match self {
            Person::Leader => "Team Leader".to_string(),
            Person::Member(n) => format!("Member {n}"),
        }
    }

    /// Splits a flat key such as `member2_phone` into its person and field.
    pub fn parse_key(key: &str) -> Option<(Person, MemberField)> {
        let (prefix, field) = key.split_once('_')?;
        let field = MemberField::from_key(field)?;
        if prefix == "leader" {
            return Some((Person::Leader, field));
        }
        let n = prefix.strip_prefix("member")?.parse::<usize>().ok()?;
        (n > 0).then_some((Person::Member(n), field))
    }
}

/// One statement of the rules checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleItem {
    pub id: String,
    pub label: String,
}

impl RuleItem {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    /// The form field carrying this rule's acknowledgement.
    pub fn field_name(&self) -> String {
        format!("rule_{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Teams of exactly three from the same batch, with a rules checklist.
    #[default]
    Ideathon,
    /// Teams of three to five, no batch restriction.
    Open,
}

impl Preset {
    pub fn rule_set(self) -> RuleSet {
        match self {
            Preset::Ideathon => RuleSet::ideathon(),
            Preset::Open => RuleSet::open(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub event_name: String,
    /// Smallest allowed team, leader included.
    pub min_team_size: usize,
    /// Largest allowed team, leader included.
    pub max_team_size: usize,
    pub same_batch: bool,
    pub batch_options: Vec<String>,
    pub default_batch: Option<String>,
    pub year_options: Vec<String>,
    /// Fields collected for every person, in display order.
    pub member_fields: Vec<MemberField>,
    /// Fields that must be non-empty. Name and email are always required.
    pub required_fields: Vec<MemberField>,
    pub checklist: Vec<RuleItem>,
    pub default_college: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::ideathon()
    }
}

impl RuleSet {
    pub fn ideathon() -> Self {
        Self {
            event_name: "IDEATHON 2026".to_string(),
            min_team_size: 3,
            max_team_size: 3,
            same_batch: true,
            batch_options: vec!["2024-2028".to_string(), "2025-2029".to_string()],
            default_batch: Some("2025-2029".to_string()),
            year_options: vec![],
            member_fields: vec![
                MemberField::Name,
                MemberField::Email,
                MemberField::Urn,
                MemberField::Phone,
                MemberField::Batch,
                MemberField::Github,
                MemberField::Linkedin,
            ],
            required_fields: vec![
                MemberField::Name,
                MemberField::Email,
                MemberField::Urn,
                MemberField::Phone,
                MemberField::Batch,
                MemberField::Github,
            ],
            checklist: vec![
                RuleItem::new(
                    "originality",
                    "I confirm that our project will be an original work created during the hackathon.",
                ),
                RuleItem::new(
                    "team_size",
                    "I confirm that our team consists of exactly 3 members as per the requirements.",
                ),
                RuleItem::new(
                    "conduct",
                    "I agree to maintain professional conduct and follow the code of conduct.",
                ),
                RuleItem::new(
                    "deadlines",
                    "I understand that all submissions must be made before the stipulated deadlines.",
                ),
                RuleItem::new(
                    "data_privacy",
                    "I agree to the collection and use of my team's data for event management purposes.",
                ),
            ],
            default_college: "NST-Pune".to_string(),
        }
    }

    pub fn open() -> Self {
        let fields = vec![
            MemberField::Name,
            MemberField::Email,
            MemberField::Urn,
            MemberField::Year,
            MemberField::Batch,
        ];
        Self {
            event_name: "IDEATHON 2026".to_string(),
            min_team_size: 3,
            max_team_size: 5,
            same_batch: false,
            batch_options: ["Neumann", "Hopper", "Ramanujan", "Turing"]
                .map(String::from)
                .to_vec(),
            default_batch: None,
            year_options: vec!["1".to_string(), "2".to_string()],
            member_fields: fields.clone(),
            required_fields: fields,
            checklist: vec![],
            default_college: "ADYPU".to_string(),
        }
    }

    /// Number of member slots (leader excluded) the form offers.
    pub fn member_slots(&self) -> usize {
        self.max_team_size.saturating_sub(1)
    }

    /// Member slots that must always be filled in.
    pub fn mandatory_slots(&self) -> usize {
        self.min_team_size.saturating_sub(1).min(self.member_slots())
    }

    pub fn is_required(&self, field: MemberField) -> bool {
        matches!(field, MemberField::Name | MemberField::Email)
            || self.required_fields.contains(&field)
    }

    /// Fields collected for every person, in display order: `member_fields`,
    /// preceded by any required field it leaves out.
    pub fn collected_fields(&self) -> impl Iterator<Item = MemberField> + '_ {
        MemberField::ALL
            .into_iter()
            .filter(|field| {
                self.is_required(*field) && !self.member_fields.contains(field)
            })
            .chain(self.member_fields.iter().copied())
    }

    /// The people the input describes: the leader, every mandatory member
    /// slot, and any optional slot with at least one non-empty field.
    pub fn people(&self, state: &FormState) -> Vec<Person> {
        let mut people = vec![Person::Leader];
        for n in 1..=self.member_slots() {
            let person = Person::Member(n);
            let present = n <= self.mandatory_slots()
                || self
                    .collected_fields()
                    .any(|field| state.is_filled(&person.key(field)));
            if present {
                people.push(person);
            }
        }
        people
    }

    pub fn acknowledged(&self, state: &FormState) -> bool {
        self.checklist
            .iter()
            .all(|rule| state.is_checked(&rule.field_name()))
    }

    pub fn check_acknowledged(
        &self,
        state: &FormState,
    ) -> Result<(), ValidationError> {
        match self.acknowledged(state) {
            true => Ok(()),
            false => Err(ValidationError::RulesNotAcknowledged),
        }
    }

    /// Validates the input and builds the submission it describes.
    ///
    /// Checks run in a fixed order: required fields, batch consistency, team
    /// size, then field formats. The first failing check is reported.
    pub fn validate(
        &self,
        state: &FormState,
    ) -> Result<NewSubmission, ValidationError> {
        let people = self.people(state);

        let mut missing = Vec::new();
        if !state.is_filled("team_name") {
            missing.push("team_name".to_string());
        }
        for person in &people {
            for field in self.collected_fields() {
                let key = person.key(field);
                if self.is_required(field) && !state.is_filled(&key) {
                    missing.push(key);
                }
            }
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let leader = self.read_person(state, Person::Leader);
        let members: Vec<MemberDetails> = people[1..]
            .iter()
            .map(|person| self.read_person(state, *person))
            .collect();

        let batch = |details: &MemberDetails| {
            details.batch.as_deref().map(str::trim).map(str::to_string)
        };
        if self.same_batch
            && members.iter().any(|m| batch(m) != batch(&leader))
        {
            return Err(ValidationError::BatchMismatch);
        }

        let team_size = members.len() + 1;
        let size_error = ValidationError::TeamSize {
            min: self.min_team_size,
            max: self.max_team_size,
        };
        let overflow = state.iter().any(|(key, value)| {
            matches!(
                Person::parse_key(key),
                Some((Person::Member(n), _)) if n > self.member_slots()
            ) && !value.trim().is_empty()
        });
        // a fixed-size team must declare its size
        let declared = match state.value("team_size") {
            Some(declared) => Some(
                declared
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| size_error.clone())?,
            ),
            None if self.min_team_size == self.max_team_size => {
                return Err(size_error);
            }
            None => None,
        };
        if overflow
            || declared.is_some_and(|declared| declared != team_size)
            || !(self.min_team_size..=self.max_team_size).contains(&team_size)
        {
            return Err(size_error);
        }

        for (person, details) in people.iter().zip(
            std::iter::once(&leader).chain(members.iter()),
        ) {
            self.check_formats(*person, details)?;
        }

        Ok(NewSubmission {
            team_name: state.value("team_name").unwrap_or_default(),
            leader,
            members,
            team_size: team_size as i64,
            college: state
                .value("college")
                .unwrap_or_else(|| self.default_college.clone()),
        })
    }

    fn read_person(&self, state: &FormState, person: Person) -> MemberDetails {
        let read = |field: MemberField| {
            self.collected_fields()
                .any(|f| f == field)
                .then(|| state.value(&person.key(field)))
                .flatten()
        };
        MemberDetails {
            name: read(MemberField::Name).unwrap_or_default(),
            email: read(MemberField::Email).unwrap_or_default(),
            urn: read(MemberField::Urn),
            phone: read(MemberField::Phone),
            batch: read(MemberField::Batch),
            year: read(MemberField::Year),
            github: read(MemberField::Github),
            linkedin: read(MemberField::Linkedin),
        }
    }

    fn check_formats(
        &self,
        person: Person,
        details: &MemberDetails,
    ) -> Result<(), ValidationError> {
        let invalid = |field: MemberField, reason: String| {
            ValidationError::InvalidField {
                field: person.key(field),
                reason,
            }
        };

        is_valid_email(&details.email)
            .map_err(|e| invalid(MemberField::Email, e))?;
        for (field, link) in [
            (MemberField::Github, &details.github),
            (MemberField::Linkedin, &details.linkedin),
        ] {
            if let Some(link) = link {
                is_valid_profile_url(link).map_err(|e| invalid(field, e))?;
            }
        }
        for (field, value, options) in [
            (MemberField::Batch, &details.batch, &self.batch_options),
            (MemberField::Year, &details.year, &self.year_options),
        ] {
            match value {
                Some(value)
                    if !options.is_empty()
                        && !options.iter().any(|option| option == value.trim()) =>
                {
                    return Err(invalid(field, "not one of the options".to_string()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields(Vec<String>),
    #[error("All team members must be from the same batch.")]
    BatchMismatch,
    #[error("{}", team_size_message(*.min, *.max))]
    TeamSize { min: usize, max: usize },
    #[error("{} is not valid ({reason})", field_label(.field))]
    InvalidField { field: String, reason: String },
    #[error("You must read and acknowledge all rules.")]
    RulesNotAcknowledged,
}

impl ValidationError {
    /// The message shown inline on the registration form, which names the
    /// missing fields rather than just reporting that some are missing.
    pub fn detail(&self) -> String {
        match self {
            ValidationError::MissingFields(fields) => format!(
                "Please fill in all required fields: {}.",
                fields
                    .iter()
                    .map(|field| field_label(field))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            other => other.to_string(),
        }
    }
}

fn team_size_message(min: usize, max: usize) -> String {
    if min == max {
        format!("Team size must be exactly {min} members")
    } else {
        format!("Total members (including leader) must be between {min} and {max}.")
    }
}

/// A human-readable name for a flat field key, e.g. `member2_phone` becomes
/// "Member 2 phone number".
pub fn field_label(key: &str) -> String {
    match key {
        "team_name" => "Team name".to_string(),
        "team_size" => "Team size".to_string(),
        "college" => "College".to_string(),
        _ => match Person::parse_key(key) {
            Some((person, field)) => {
                let label = field.label();
                let label = match field {
                    MemberField::Urn
                    | MemberField::Github
                    | MemberField::Linkedin => label.to_string(),
                    _ => label.to_lowercase(),
                };
                format!("{} {label}", person.title())
            }
            None => key.to_string(),
        },
    }
}
