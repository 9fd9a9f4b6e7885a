//! Agent flow tests with a scripted model and the in-memory store.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;
use vetsched_core::{
  BusinessHours, STORE_FAILURE_MESSAGE, Scheduler,
  appointment::AppointmentKind,
  memory::MemoryStore,
  patient::{NewClient, NewPet},
  store::ClinicStore,
};

use crate::{
  AgentError, AppointmentAgent, ClinicClock, Result,
  model::{ChatMessage, ChatModel, ModelReply, Role, ToolDefinition},
};

// ─── Scripted model ──────────────────────────────────────────────────────────

/// Replays canned replies and records every conversation it was shown.
#[derive(Default)]
struct ScriptedModel {
  replies: Mutex<VecDeque<ModelReply>>,
  seen:    Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
  fn new(replies: impl IntoIterator<Item = ModelReply>) -> Self {
    Self {
      replies: Mutex::new(replies.into_iter().collect()),
      seen:    Mutex::default(),
    }
  }

  fn calls(&self) -> Vec<Vec<ChatMessage>> { self.seen.lock().unwrap().clone() }
}

impl ChatModel for ScriptedModel {
  async fn chat<'a>(
    &'a self,
    messages: &'a [ChatMessage],
    tools: &'a [ToolDefinition],
  ) -> Result<ModelReply> {
    assert_eq!(tools.len(), 2);
    self.seen.lock().unwrap().push(messages.to_vec());
    self
      .replies
      .lock()
      .unwrap()
      .pop_front()
      .ok_or_else(|| AgentError::Model {
        status: 500,
        body:   "script exhausted".into(),
      })
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

// 2024-05-13 is a Monday.
fn monday_morning() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2024, 5, 13)
    .unwrap()
    .and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
}

async fn add_pet(store: &MemoryStore, owner: &str, name: &str) {
  let client = store
    .add_client(NewClient {
      name:    owner.into(),
      email:   format!("{}@example.com", owner.to_lowercase()),
      phone:   None,
      address: None,
    })
    .await
    .unwrap();
  store
    .add_pet(NewPet {
      client_id:  client.client_id,
      name:       name.into(),
      species:    "dog".into(),
      breed:      None,
      birth_date: None,
    })
    .await
    .unwrap();
}

async fn agent(
  replies: impl IntoIterator<Item = ModelReply>,
) -> (Arc<MemoryStore>, AppointmentAgent<MemoryStore, ScriptedModel>) {
  let store = Arc::new(MemoryStore::new());
  add_pet(&store, "Ana", "Rex").await;
  let scheduler = Scheduler::new(store.clone(), BusinessHours::default());
  let agent = AppointmentAgent::new(
    ScriptedModel::new(replies),
    scheduler,
    ClinicClock::utc(),
  );
  (store, agent)
}

fn schedule(pet: &str, when: &str, kind: &str) -> ModelReply {
  ModelReply::tool_call(
    "scheduleAppointment",
    json!({ "petName": pet, "dateTime": when, "type": kind }),
  )
}

/// The text the tool produced, as the model saw it on the second call.
fn tool_output(agent: &AppointmentAgent<MemoryStore, ScriptedModel>) -> String {
  let calls = agent.model().calls();
  assert_eq!(calls.len(), 2, "expected exactly two model calls");
  let last = calls[1].last().unwrap();
  assert_eq!(last.role, Role::Tool);
  last.content.clone()
}

// ─── Flow ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn plain_answer_skips_tools() {
  let (_, agent) = agent([ModelReply::text("Hello! How can I help?")]).await;
  let answer = agent.respond_at("hi", monday_morning()).await.unwrap();
  assert_eq!(answer, "Hello! How can I help?");
  assert_eq!(agent.model().calls().len(), 1);
}

#[tokio::test]
async fn prompt_carries_the_current_clinic_time() {
  let (_, agent) = agent([ModelReply::text("ok")]).await;
  agent
    .respond_at("  book Rex tomorrow at 3pm ", monday_morning())
    .await
    .unwrap();
  let first = &agent.model().calls()[0];
  assert_eq!(first.len(), 1);
  assert_eq!(first[0].role, Role::User);
  assert_eq!(
    first[0].content,
    "The current date and time is 2024-05-13T10:00:00. book Rex tomorrow at 3pm"
  );
}

#[tokio::test]
async fn booking_through_the_agent() {
  let (store, agent) = agent([
    schedule("Rex", "2024-05-14T15:00:00", "consultation"),
    ModelReply::text("Rex is booked for Tuesday at 15:00."),
  ])
  .await;

  let answer = agent
    .respond_at("book Rex tomorrow at 3pm", monday_morning())
    .await
    .unwrap();
  assert_eq!(answer, "Rex is booked for Tuesday at 15:00.");
  assert_eq!(
    tool_output(&agent),
    "Appointment booked: consultation for Rex on 2024-05-14 at 15:00."
  );

  let booked = store.list_appointments().await.unwrap();
  assert_eq!(booked.len(), 1);
  assert_eq!(booked[0].kind, AppointmentKind::Consultation);
  assert_eq!(booked[0].slot_hour(), 15);
}

#[tokio::test]
async fn history_echoes_the_tool_request() {
  let (_, agent) = agent([
    schedule("Rex", "2024-05-14T15:00", "exam"),
    ModelReply::text("done"),
  ])
  .await;
  agent.respond_at("book", monday_morning()).await.unwrap();

  let second = &agent.model().calls()[1];
  assert_eq!(second.len(), 3);
  assert_eq!(second[1].role, Role::Assistant);
  assert_eq!(second[1].tool_calls[0].name, "scheduleAppointment");
}

#[tokio::test]
async fn closed_day_is_relayed_verbatim() {
  let (store, agent) = agent([
    schedule("Rex", "2024-05-12T10:00:00", "consultation"),
    ModelReply::text("Sorry, we are closed on Sundays."),
  ])
  .await;
  agent.respond_at("book Rex on Sunday", monday_morning()).await.unwrap();

  assert_eq!(
    tool_output(&agent),
    "Cannot schedule on Sunday: the clinic is closed on this day."
  );
  assert!(store.list_appointments().await.unwrap().is_empty());
}

#[tokio::test]
async fn outside_hours_is_relayed_verbatim() {
  let (_, agent) = agent([
    schedule("Rex", "2024-05-14T19:00:00", "vaccination"),
    ModelReply::text("too late"),
  ])
  .await;
  agent.respond_at("book", monday_morning()).await.unwrap();
  assert!(tool_output(&agent).starts_with("Cannot schedule at 19:00"));
}

#[tokio::test]
async fn unknown_pet_is_reported() {
  let (_, agent) = agent([
    schedule("Max", "2024-05-14T15:00:00", "consultation"),
    ModelReply::text("I could not find Max."),
  ])
  .await;
  agent.respond_at("book Max", monday_morning()).await.unwrap();
  assert_eq!(tool_output(&agent), "No pet named 'Max' was found.");
}

#[tokio::test]
async fn ambiguous_pet_is_not_guessed() {
  let (store, agent) = agent([
    schedule("rex", "2024-05-14T15:00:00", "consultation"),
    ModelReply::text("Which Rex?"),
  ])
  .await;
  add_pet(&store, "Bruno", "Rex").await;

  agent.respond_at("book rex", monday_morning()).await.unwrap();
  assert!(tool_output(&agent).starts_with("2 pets are named 'rex'."));
  assert!(store.list_appointments().await.unwrap().is_empty());
}

#[tokio::test]
async fn slot_listing_through_the_agent() {
  let (_, agent) = agent([
    ModelReply::tool_call("listAvailableSlots", json!({ "date": "2024-05-14" })),
    ModelReply::text("Every hour is free."),
  ])
  .await;
  agent.respond_at("what is free tomorrow?", monday_morning()).await.unwrap();
  assert_eq!(
    tool_output(&agent),
    "Available times on 2024-05-14: 9:00, 10:00, 11:00, 12:00, 13:00, 14:00, \
     15:00, 16:00, 17:00."
  );
}

#[tokio::test]
async fn string_encoded_arguments_are_accepted() {
  let (_, agent) = agent([
    ModelReply::tool_call(
      "listAvailableSlots",
      json!("{\"date\": \"2024-05-14T00:00:00Z\"}"),
    ),
    ModelReply::text("ok"),
  ])
  .await;
  agent.respond_at("free slots?", monday_morning()).await.unwrap();
  assert!(tool_output(&agent).starts_with("Available times on 2024-05-14:"));
}

#[tokio::test]
async fn bad_arguments_become_text() {
  let (_, agent) = agent([
    ModelReply::tool_call("scheduleAppointment", json!({ "petName": "Rex" })),
    ModelReply::text("ok"),
  ])
  .await;
  let answer = agent.respond_at("book", monday_morning()).await.unwrap();
  assert_eq!(answer, "ok");
  assert!(tool_output(&agent).starts_with("Invalid arguments for scheduleAppointment"));
}

#[tokio::test]
async fn unknown_kind_lists_the_choices() {
  let (_, agent) = agent([
    schedule("Rex", "2024-05-14T15:00:00", "grooming"),
    ModelReply::text("ok"),
  ])
  .await;
  agent.respond_at("book", monday_morning()).await.unwrap();
  assert_eq!(
    tool_output(&agent),
    "Unknown appointment type 'grooming'. Use one of: consultation, \
     vaccination, surgery, exam."
  );
}

#[tokio::test]
async fn unreadable_date_becomes_text() {
  let (_, agent) = agent([
    schedule("Rex", "tomorrow afternoon", "consultation"),
    ModelReply::text("ok"),
  ])
  .await;
  agent.respond_at("book", monday_morning()).await.unwrap();
  assert!(tool_output(&agent).contains("'tomorrow afternoon'"));
}

#[tokio::test]
async fn unknown_tool_becomes_text() {
  let (_, agent) = agent([
    ModelReply::tool_call("deleteEverything", json!({})),
    ModelReply::text("I can't do that."),
  ])
  .await;
  let answer = agent.respond_at("delete", monday_morning()).await.unwrap();
  assert_eq!(answer, "I can't do that.");
  assert_eq!(tool_output(&agent), "Unknown tool 'deleteEverything'.");
}

#[tokio::test]
async fn store_failure_becomes_generic_text() {
  let (store, agent) = agent([
    schedule("Rex", "2024-05-14T15:00:00", "consultation"),
    ModelReply::text("Something went wrong."),
  ])
  .await;
  store.set_fail_writes(true);

  agent.respond_at("book", monday_morning()).await.unwrap();
  assert_eq!(tool_output(&agent), STORE_FAILURE_MESSAGE);
}

#[tokio::test]
async fn at_most_one_tool_runs() {
  let mut both = schedule("Rex", "2024-05-14T15:00:00", "consultation");
  both
    .tool_calls
    .extend(schedule("Rex", "2024-05-14T16:00:00", "consultation").tool_calls);
  let (store, agent) = agent([
    both,
    // A second tool request in the final reply is not executed.
    schedule("Rex", "2024-05-14T17:00:00", "consultation"),
  ])
  .await;

  let answer = agent.respond_at("book twice", monday_morning()).await.unwrap();
  assert_eq!(answer, "");
  assert_eq!(agent.model().calls().len(), 2);
  let booked = store.list_appointments().await.unwrap();
  assert_eq!(booked.len(), 1);
  assert_eq!(booked[0].slot_hour(), 15);
}

#[tokio::test]
async fn model_failure_is_an_error() {
  let (_, agent) = agent([]).await;
  let err = agent.respond_at("hi", monday_morning()).await.unwrap_err();
  assert!(matches!(err, AgentError::Model { status: 500, .. }));
}
