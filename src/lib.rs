use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod form_state;
pub mod landing;
pub mod registration;
pub mod rules;
pub mod schema;
pub mod state;
pub mod submissions;
pub mod template;
pub mod util_resp;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod test;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
