//! Insert-or-update of a single incoming country.

use tracing::debug;

use crate::{
  Error, Result,
  country::{Country, NewCountry},
  store::CountryStore,
};

/// Merge `incoming` into `store` and return the persisted record.
///
/// An existing record with the same natural key keeps its id and has every
/// other field replaced; otherwise a fresh id is allocated and the record is
/// inserted. Exactly one write is issued either way.
pub async fn reconcile<S>(store: &S, incoming: NewCountry) -> Result<Country>
where
  S: CountryStore,
{
  let existing = store
    .find_by_name(&incoming.name)
    .await
    .map_err(Error::internal)?;

  match existing {
    Some(existing) => {
      let country = Country::from_new(existing.id, incoming);
      store
        .update_country(country.clone())
        .await
        .map_err(Error::internal)?;
      debug!(id = country.id, name = %country.name, "updated country");
      Ok(country)
    }
    None => {
      let id = store.next_id().await.map_err(Error::internal)?;
      let country = Country::from_new(id, incoming);
      store
        .insert_country(country.clone())
        .await
        .map_err(Error::internal)?;
      debug!(id, name = %country.name, "inserted country");
      Ok(country)
    }
  }
}
