use hypertext::prelude::*;

use crate::{
    auth::Session,
    form_state::FormState,
    rules::{MemberField, Person, RuleSet},
    widgets::alert::{ErrorAlert, SuccessAlert},
};

/// Step one: every rule must be ticked before the details form is offered.
pub struct Checklist<'r> {
    pub rules: &'r RuleSet,
    pub state: &'r FormState,
    pub error: Option<String>,
}

impl<'r> Renderable for Checklist<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            div class="container py-5" style="max-width: 48rem;" {
                h1 class="h3 mb-2" { "Rules and regulations" }
                p class="text-muted" {
                    "Please read and acknowledge each of the following before registering your team."
                }
                @if let Some(error) = &self.error {
                    ErrorAlert msg=(error.as_str());
                }
                form method="get" action="/register" data-checklist="true" {
                    input type="hidden" name="step" value="rules";
                    @for rule in &self.rules.checklist {
                        @let name = rule.field_name();
                        div class="form-check mb-3" {
                            input class="form-check-input"
                                  type="checkbox"
                                  id=(name)
                                  name=(name)
                                  checked[self.state.is_checked(&name)];
                            label class="form-check-label" for=(name) {
                                (rule.label)
                            }
                        }
                    }
                    button type="submit" class="btn btn-primary" {
                        "Continue"
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

/// Step two: team, leader and member details.
pub struct RegistrationForm<'r> {
    pub rules: &'r RuleSet,
    pub state: &'r FormState,
    pub session: &'r Session,
    pub error: Option<String>,
}

impl<'r> Renderable for RegistrationForm<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let mut locked = vec![MemberField::Email];
        if self.session.name().is_some() {
            locked.push(MemberField::Name);
        }
        let summary = if self.rules.min_team_size == self.rules.max_team_size {
            format!(
                "Your team must have exactly {} members, including you as the leader.",
                self.rules.min_team_size
            )
        } else {
            format!(
                "Your team must have between {} and {} members, including you as the leader.",
                self.rules.min_team_size, self.rules.max_team_size
            )
        };

        let fixed_size = (self.rules.min_team_size == self.rules.max_team_size)
            .then(|| self.rules.min_team_size.to_string());

        maud! {
            div class="container py-5" style="max-width: 56rem;" {
                h1 class="h3 mb-2" { (format!("Register for {}", self.rules.event_name)) }
                p class="text-muted" { (summary) }
                @if self.rules.same_batch {
                    p class="text-muted" { "All members must be from the same batch." }
                }
                @if let Some(error) = &self.error {
                    ErrorAlert msg=(error.as_str());
                }
                form method="post" action="/register" data-submit-once="true" {
                    @for rule in &self.rules.checklist {
                        @if self.state.is_checked(&rule.field_name()) {
                            input type="hidden" name=(rule.field_name()) value="on";
                        }
                    }
                    @if let Some(size) = &fixed_size {
                        input type="hidden" name="team_size" value=(size);
                    }
                    div class="mb-4" {
                        label for="team_name" class="form-label fw-bold" { "Team name" }
                        input type="text"
                              class="form-control"
                              id="team_name"
                              name="team_name"
                              value=(self.state.get("team_name"))
                              required;
                    }
                    MemberSection
                        rules=(self.rules)
                        state=(self.state)
                        person=(Person::Leader)
                        optional=(false)
                        locked=(&locked);
                    @for n in 1..=self.rules.member_slots() {
                        MemberSection
                            rules=(self.rules)
                            state=(self.state)
                            person=(Person::Member(n))
                            optional=(n > self.rules.mandatory_slots())
                            locked=(&[]);
                    }
                    button type="submit" class="btn btn-primary btn-lg" {
                        "Submit registration"
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

pub struct MemberSection<'r> {
    pub rules: &'r RuleSet,
    pub state: &'r FormState,
    pub person: Person,
    pub optional: bool,
    /// Fields filled in from the session, which cannot be edited.
    pub locked: &'r [MemberField],
}

impl<'r> Renderable for MemberSection<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            fieldset class="card mb-4" {
                div class="card-header" {
                    legend class="h5 mb-0" {
                        (self.person.title())
                        @if self.optional {
                            span class="text-muted fw-normal" { " (optional)" }
                        }
                    }
                }
                div class="card-body row g-3" {
                    @for field in self.rules.collected_fields() {
                        FieldInput
                            rules=(self.rules)
                            state=(self.state)
                            person=(self.person)
                            field=(field)
                            optional=(self.optional)
                            locked=(self.locked.contains(&field));
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

pub struct FieldInput<'r> {
    pub rules: &'r RuleSet,
    pub state: &'r FormState,
    pub person: Person,
    pub field: MemberField,
    /// Part of a member slot that may be left empty.
    pub optional: bool,
    pub locked: bool,
}

impl<'r> FieldInput<'r> {
    fn options(&self) -> &'r [String] {
        match self.field {
            MemberField::Batch => &self.rules.batch_options,
            MemberField::Year => &self.rules.year_options,
            _ => &[],
        }
    }

    fn input_type(&self) -> &'static str {
        match self.field {
            MemberField::Email => "email",
            MemberField::Phone => "tel",
            MemberField::Github | MemberField::Linkedin => "url",
            _ => "text",
        }
    }
}

impl<'r> Renderable for FieldInput<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let key = self.person.key(self.field);
        let mut value = self.state.get(&key).to_string();
        // an optional slot with a preselected batch would count as filled in
        if value.is_empty() && self.field == MemberField::Batch && !self.optional {
            value = self.rules.default_batch.clone().unwrap_or_default();
        }
        let required = !self.optional && self.rules.is_required(self.field);
        let options = self.options();

        maud! {
            div class="col-md-6" {
                label for=(key) class="form-label" { (self.field.label()) }
                @if options.is_empty() {
                    input type=(self.input_type())
                          class="form-control"
                          id=(key)
                          name=(key)
                          value=(value)
                          required[required]
                          readonly[self.locked];
                } @else {
                    select class="form-select" id=(key) name=(key) required[required] {
                        option value="" selected[value.is_empty()] { "Select..." }
                        @for choice in options {
                            option value=(choice) selected[*choice == value] {
                                (choice)
                            }
                        }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}

pub struct Completed<'r> {
    pub team_name: &'r str,
    pub event_name: &'r str,
}

impl<'r> Renderable for Completed<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            div class="container py-5" style="max-width: 48rem;" {
                SuccessAlert
                    title="Registration Complete"
                    msg=(format!(
                        "Team {} is registered for {}. See you there!",
                        self.team_name, self.event_name
                    ));
            }
        }
        .render_to(buffer);
    }
}

pub struct AlreadyRegistered<'r> {
    pub event_name: &'r str,
}

impl<'r> Renderable for AlreadyRegistered<'r> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            div class="container py-5" style="max-width: 48rem;" {
                SuccessAlert
                    title="Already registered"
                    msg=(format!(
                        "You have already registered your team for {}!",
                        self.event_name
                    ));
            }
        }
        .render_to(buffer);
    }
}
