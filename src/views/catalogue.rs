//! Public catalogue and costume detail

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::models::{Costume, CostumeId};
use crate::services::catalogue::{distinct_cities, filter, FilterCriteria};

use super::ViewStatus;

/// Catalogue screen: the fetched list, its cities and the active filters
#[derive(Debug, Default)]
pub struct CatalogueView {
    costumes: Vec<Costume>,
    cities: Vec<String>,
    pub criteria: FilterCriteria,
    pub status: ViewStatus,
}

impl CatalogueView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalogue and re-derive the city list
    pub async fn reload(&mut self, api: &ApiClient) -> ClientResult<()> {
        self.status.begin();
        let result = api.list_costumes().await;
        let costumes = self.status.finish(result, "Network error")?;

        self.cities = distinct_cities(&costumes);
        self.costumes = costumes;
        tracing::debug!(
            costumes = self.costumes.len(),
            cities = self.cities.len(),
            "Catalogue reloaded"
        );
        Ok(())
    }

    /// Last successfully fetched list, unfiltered
    pub fn costumes(&self) -> &[Costume] {
        &self.costumes
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Costumes passing the current criteria
    pub fn visible(&self) -> Vec<Costume> {
        filter(&self.costumes, &self.criteria)
    }
}

/// Detail screen for one costume
#[derive(Debug, Default)]
pub struct CostumeDetailView {
    costume: Option<Costume>,
    pub status: ViewStatus,
}

impl CostumeDetailView {
    /// Open with a costume already known from the list
    pub fn with_costume(costume: Costume) -> Self {
        Self {
            costume: Some(costume),
            status: ViewStatus::default(),
        }
    }

    pub async fn reload(&mut self, api: &ApiClient, id: CostumeId) -> ClientResult<&Costume> {
        self.status.begin();
        let result = api.get_costume(id).await;
        let costume = self.status.finish(result, "Failed to load costume")?;
        let costume: &Costume = self.costume.insert(costume);
        Ok(costume)
    }

    pub fn costume(&self) -> Option<&Costume> {
        self.costume.as_ref()
    }
}
