//! Demo clients and pets for a fresh store (`--seed`).

use chrono::NaiveDate;
use vetsched_core::{
  patient::{NewClient, NewPet},
  store::ClinicStore,
};

struct DemoPet {
  owner:   &'static str,
  email:   &'static str,
  phone:   &'static str,
  address: &'static str,
  name:    &'static str,
  species: &'static str,
  breed:   &'static str,
  born:    (i32, u32, u32),
}

const DEMO: &[DemoPet] = &[
  DemoPet {
    owner:   "João Silva",
    email:   "joao.silva@example.com",
    phone:   "11999991111",
    address: "Rua das Flores, 123",
    name:    "Rex",
    species: "Dog",
    breed:   "Golden Retriever",
    born:    (2021, 6, 15),
  },
  DemoPet {
    owner:   "Maria Oliveira",
    email:   "maria.oliveira@example.com",
    phone:   "21988882222",
    address: "Avenida Central, 456",
    name:    "Mimi",
    species: "Cat",
    breed:   "Siamese",
    born:    (2022, 2, 10),
  },
  DemoPet {
    owner:   "Carlos Pereira",
    email:   "carlos.pereira@example.com",
    phone:   "31977773333",
    address: "Praça da Matriz, 789",
    name:    "Pingo",
    species: "Dog",
    breed:   "Poodle",
    born:    (2020, 9, 20),
  },
  DemoPet {
    owner:   "Ana Costa",
    email:   "ana.costa@example.com",
    phone:   "41966664444",
    address: "Travessa dos Peixes, 10",
    name:    "Frajola",
    species: "Cat",
    breed:   "Mixed breed",
    born:    (2022, 12, 1),
  },
  DemoPet {
    owner:   "Lucas Souza",
    email:   "lucas.souza@example.com",
    phone:   "51955555555",
    address: "Alameda dos Pássaros, 20",
    name:    "Bolinha",
    species: "Hamster",
    breed:   "Syrian",
    born:    (2023, 3, 5),
  },
];

/// Insert one client and one pet per demo entry. Does nothing and returns
/// `false` when the store already has clients.
pub async fn seed_demo_data<S: ClinicStore>(store: &S) -> Result<bool, S::Error> {
  if !store.list_clients().await?.is_empty() {
    tracing::info!("store already has clients; skipping demo seed");
    return Ok(false);
  }

  for demo in DEMO {
    let client = store
      .add_client(NewClient {
        name:    demo.owner.to_owned(),
        email:   demo.email.to_owned(),
        phone:   Some(demo.phone.to_owned()),
        address: Some(demo.address.to_owned()),
      })
      .await?;
    let (y, m, d) = demo.born;
    store
      .add_pet(NewPet {
        client_id:  client.client_id,
        name:       demo.name.to_owned(),
        species:    demo.species.to_owned(),
        breed:      Some(demo.breed.to_owned()),
        birth_date: NaiveDate::from_ymd_opt(y, m, d),
      })
      .await?;
  }

  tracing::info!(clients = DEMO.len(), "demo data seeded");
  Ok(true)
}

#[cfg(test)]
mod tests {
  use vetsched_core::memory::MemoryStore;

  use super::*;

  #[tokio::test]
  async fn seeds_once() {
    let store = MemoryStore::new();
    assert!(seed_demo_data(&store).await.unwrap());
    assert!(!seed_demo_data(&store).await.unwrap());

    assert_eq!(store.list_clients().await.unwrap().len(), 5);
    let rex = store.find_pets_by_name("rex").await.unwrap();
    assert_eq!(rex.len(), 1);
    assert_eq!(rex[0].birth_date, NaiveDate::from_ymd_opt(2021, 6, 15));
  }
}
