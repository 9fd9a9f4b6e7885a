//! Clients and their pets.
//!
//! These records belong to the store; the scheduling engine only reads them
//! to check that an appointment points at a real pet owned by the given
//! client, and to resolve free-text pet names for the conversational agent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
  pub client_id:  Uuid,
  pub name:       String,
  pub email:      String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
  pub pet_id:     Uuid,
  pub client_id:  Uuid,
  pub name:       String,
  pub species:    String,
  pub breed:      Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
}

/// Input for registering a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
  pub name:    String,
  pub email:   String,
  pub phone:   Option<String>,
  pub address: Option<String>,
}

/// Input for registering a pet under an existing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPet {
  pub client_id:  Uuid,
  pub name:       String,
  pub species:    String,
  pub breed:      Option<String>,
  pub birth_date: Option<NaiveDate>,
}
