use anyhow::Result;
use tracing::{debug, info, warn};

use super::{entities::ProjectTotals, store::KeyValueStore};

/// Key the whole project mapping is stored under.
pub const PROJECTS_KEY: &str = "projects";

/// Owns the project totals and the active project pointer. Every mutation overwrites the stored
/// mapping as a whole.
pub struct ProjectRegistry<S> {
    store: S,
    totals: ProjectTotals,
    active: Option<String>,
}

impl<S: KeyValueStore> ProjectRegistry<S> {
    /// Restores the registry from `store`. Missing or unreadable data results in an empty
    /// registry; only failures of the store itself are returned.
    pub async fn load(store: S) -> Result<Self> {
        let totals = match store.get(PROJECTS_KEY).await? {
            None => {
                info!("No saved projects, starting with an empty registry");
                ProjectTotals::default()
            }
            Some(raw) => match serde_json::from_str::<ProjectTotals>(&raw) {
                Ok(totals) => {
                    info!("Loaded {} projects", totals.len());
                    totals
                }
                Err(e) => {
                    warn!("Saved projects are corrupted, starting from scratch: {e}");
                    ProjectTotals::default()
                }
            },
        };

        Ok(Self {
            store,
            totals,
            active: None,
        })
    }

    /// Creates `name` with no time spent. Existing names are left untouched.
    pub async fn add_project(&mut self, name: &str) -> Result<()> {
        if !self.totals.insert_new(name) {
            debug!("Project {name:?} already exists");
            return Ok(());
        }
        info!("Added project {name:?}");
        self.persist().await
    }

    /// The name isn't checked against known projects. Time accrued for an unknown project is
    /// dropped.
    pub fn select_active(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.totals.contains(&name) {
            warn!("Selected unknown project {name:?}, time won't be recorded");
        }
        debug!("Active project is now {name:?}");
        self.active = Some(name);
    }

    /// Picks the first project when nothing is selected yet.
    pub fn select_default(&mut self) {
        if self.active.is_some() {
            return;
        }
        if let Some(first) = self.totals.first_name() {
            let first = first.to_owned();
            self.select_active(first);
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Adds `minutes` to the active project. Without an active project, or with one that isn't
    /// registered, nothing changes.
    pub async fn add_elapsed(&mut self, minutes: f64) -> Result<()> {
        if !minutes.is_finite() || minutes < 0. {
            warn!("Refusing to add {minutes} minutes");
            return Ok(());
        }
        let Some(active) = self.active.as_deref() else {
            return Ok(());
        };
        let Some(total) = self.totals.get_mut(active) else {
            debug!("Active project {active:?} isn't registered, dropping {minutes} minutes");
            return Ok(());
        };
        *total += minutes;
        self.persist().await
    }

    pub fn snapshot(&self) -> ProjectTotals {
        self.totals.clone()
    }

    pub fn totals(&self) -> &ProjectTotals {
        &self.totals
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.totals)?;
        self.store.set(PROJECTS_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        projects::store::{FileStore, MemoryStore},
        utils::logging::TEST_LOGGING,
    };

    use super::{ProjectRegistry, PROJECTS_KEY};

    #[tokio::test]
    async fn test_add_select_accrue_scenario() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryStore::default());
        let mut registry = ProjectRegistry::load(store.clone()).await?;
        assert!(registry.snapshot().is_empty());

        registry.add_project("Alpha").await?;
        assert_eq!(registry.snapshot().get("Alpha"), Some(0.));

        registry.select_active("Alpha");
        registry.add_elapsed(1.).await?;
        registry.add_elapsed(1.).await?;
        assert_eq!(registry.snapshot().get("Alpha"), Some(2.));

        let writes = store.writes();
        registry.add_project("Alpha").await?;
        assert_eq!(registry.snapshot().len(), 1);
        assert_eq!(registry.snapshot().get("Alpha"), Some(2.));
        assert_eq!(store.writes(), writes);
        assert_eq!(store.value(PROJECTS_KEY).as_deref(), Some(r#"{"Alpha":2.0}"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_elapsed_without_active_project() -> Result<()> {
        let store = Arc::new(MemoryStore::default());
        let mut registry = ProjectRegistry::load(store.clone()).await?;
        registry.add_project("Alpha").await?;
        let before = registry.snapshot();
        let writes = store.writes();

        registry.add_elapsed(3.).await?;

        assert_eq!(registry.snapshot(), before);
        assert_eq!(store.writes(), writes);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_active_project_is_a_no_op() -> Result<()> {
        let store = Arc::new(MemoryStore::default());
        let mut registry = ProjectRegistry::load(store.clone()).await?;
        registry.add_project("Alpha").await?;

        registry.select_active("Ghost");
        assert_eq!(registry.active(), Some("Ghost"));
        registry.add_elapsed(5.).await?;

        assert_eq!(registry.snapshot().get("Alpha"), Some(0.));
        assert!(!registry.snapshot().contains("Ghost"));
        assert_eq!(store.writes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_totals_never_decrease() -> Result<()> {
        let mut registry = ProjectRegistry::load(MemoryStore::default()).await?;
        registry.add_project("Alpha").await?;
        registry.select_active("Alpha");

        let mut previous = 0.;
        for minutes in [0.5, -2., 0., f64::NAN, 1. / 60., f64::INFINITY, 3.] {
            registry.add_elapsed(minutes).await?;
            let current = registry.snapshot().get("Alpha").unwrap();
            assert!(current >= previous);
            previous = current;
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_name_is_accepted() -> Result<()> {
        let mut registry = ProjectRegistry::load(MemoryStore::default()).await?;
        registry.add_project("").await?;
        assert!(registry.snapshot().contains(""));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_data_loads_empty() -> Result<()> {
        for raw in ["not json", r#"{"Alpha": "two"}"#, r#"{"Alpha": -4}"#, "[1, 2]"] {
            let registry = ProjectRegistry::load(MemoryStore::with_value(PROJECTS_KEY, raw)).await?;
            assert!(registry.snapshot().is_empty(), "{raw} should be discarded");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_select_default_picks_first_project() -> Result<()> {
        let store = MemoryStore::with_value(PROJECTS_KEY, r#"{"Beta": 1, "Alpha": 2}"#);
        let mut registry = ProjectRegistry::load(store).await?;
        registry.select_default();
        assert_eq!(registry.active(), Some("Beta"));

        registry.select_active("Alpha");
        registry.select_default();
        assert_eq!(registry.active(), Some("Alpha"));

        let mut empty = ProjectRegistry::load(MemoryStore::default()).await?;
        empty.select_default();
        assert_eq!(empty.active(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_survives_restart_on_disk() -> Result<()> {
        let dir = tempdir()?;
        {
            let mut registry = ProjectRegistry::load(FileStore::new(dir.path().into())?).await?;
            registry.add_project("Writing").await?;
            registry.add_project("Code").await?;
            registry.select_active("Code");
            registry.add_elapsed(0.5).await?;
        }

        let registry = ProjectRegistry::load(FileStore::new(dir.path().into())?).await?;
        let totals = registry.snapshot();
        assert_eq!(totals.names().collect::<Vec<_>>(), vec!["Writing", "Code"]);
        assert_eq!(totals.get("Code"), Some(0.5));
        assert_eq!(registry.active(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_utf8_on_disk_loads_empty() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("projects.json"), b"{\"Alpha\xfe\": 3.0}")?;

        let mut registry = ProjectRegistry::load(FileStore::new(dir.path().into())?).await?;
        assert!(registry.snapshot().is_empty());

        registry.add_project("Alpha").await?;
        assert_eq!(
            std::fs::read_to_string(dir.path().join("projects.json"))?,
            r#"{"Alpha":0.0}"#
        );
        Ok(())
    }
}
