//! Publish and pull batches. Every item is attempted independently; one
//! failure never aborts its siblings, and the summary reports per-item
//! outcomes plus counts.

use anyhow::{Context, Result};

use crate::matcher;
use crate::model::{LocalResource, ProjectId, VariationId};
use crate::remote::{PublishOptions, PublishReceipt, PullReceipt};

use super::BrowseSession;

#[derive(Clone, Debug)]
pub struct PublishItem {
    pub name: String,
    pub path: Option<String>,
    pub version_tag: Option<String>,
}

#[derive(Debug)]
pub enum PublishOutcome {
    Published(PublishReceipt),
    /// The head variation already carries this content hash; nothing to do.
    Unchanged,
    /// No indexed resource matched; re-scan the project and retry.
    NotFound,
    Failed(String),
}

#[derive(Debug)]
pub struct PublishRecord {
    pub name: String,
    pub outcome: PublishOutcome,
}

#[derive(Debug)]
pub struct PublishSummary {
    pub records: Vec<PublishRecord>,
}

impl PublishSummary {
    pub fn published(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PublishOutcome::Published(_)))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PublishOutcome::Unchanged))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PublishOutcome::NotFound))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PublishOutcome::Failed(_)))
            .count()
    }
}

#[derive(Debug)]
pub enum PullOutcome {
    Pulled(PullReceipt),
    Failed(String),
}

#[derive(Debug)]
pub struct PullRecord {
    pub variation_id: VariationId,
    pub outcome: PullOutcome,
}

#[derive(Debug)]
pub struct PullSummary {
    pub records: Vec<PullRecord>,
}

impl PullSummary {
    pub fn pulled(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PullOutcome::Pulled(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.pulled()
    }
}

impl BrowseSession {
    /// List a project's indexed resources, optionally re-scanning first.
    pub fn project_resources(
        &self,
        project: &ProjectId,
        scan_path: Option<&str>,
    ) -> Result<Vec<LocalResource>> {
        if let Some(path) = scan_path {
            self.backend
                .scan_project_resources(project, path)
                .context("scan project resources")?;
        }
        self.backend
            .get_project_resources(project)
            .context("list project resources")
    }

    /// Publish local files into the catalog. The project is re-scanned
    /// first so matching runs against what is on disk right now.
    pub fn publish_items(
        &mut self,
        project: &ProjectId,
        project_path: &str,
        items: &[PublishItem],
    ) -> Result<PublishSummary> {
        let workspace = self.workspace_id()?;

        self.backend
            .scan_project_resources(project, project_path)
            .context("scan project resources")?;
        let resources = self
            .backend
            .get_project_resources(project)
            .context("list project resources")?;

        let mut records = Vec::with_capacity(items.len());
        let mut published_any = false;
        for item in items {
            let Some(resource) =
                matcher::find_resource(&item.name, item.path.as_deref(), &resources)
            else {
                records.push(PublishRecord {
                    name: item.name.clone(),
                    outcome: PublishOutcome::NotFound,
                });
                continue;
            };

            if item.version_tag.is_none()
                && self.head_hash_for(&item.name) == Some(resource.content_hash.as_str())
            {
                records.push(PublishRecord {
                    name: item.name.clone(),
                    outcome: PublishOutcome::Unchanged,
                });
                continue;
            }

            let opts = PublishOptions {
                version_tag: item.version_tag.clone(),
                overwrite_variation_id: None,
            };
            match self.backend.publish_resource(&resource.id, &workspace, &opts) {
                Ok(receipt) => {
                    published_any = true;
                    records.push(PublishRecord {
                        name: item.name.clone(),
                        outcome: PublishOutcome::Published(receipt),
                    });
                }
                Err(err) => records.push(PublishRecord {
                    name: item.name.clone(),
                    outcome: PublishOutcome::Failed(format!("{err:#}")),
                }),
            }
        }

        if published_any {
            self.reconcile_catalogs(&workspace);
        }
        Ok(PublishSummary { records })
    }

    fn head_hash_for(&self, name: &str) -> Option<&str> {
        self.catalogs
            .iter()
            .find(|entry| entry.catalog.name == name)
            .and_then(|entry| entry.head_variation())
            .map(|v| v.content_hash.as_str())
    }

    pub fn pull_variations(
        &mut self,
        variation_ids: &[VariationId],
        project: &ProjectId,
        project_path: &str,
        overwrite: bool,
    ) -> Result<PullSummary> {
        let mut records = Vec::with_capacity(variation_ids.len());
        for id in variation_ids {
            match self
                .backend
                .pull_variation(id, project, project_path, overwrite)
            {
                Ok(receipt) => records.push(PullRecord {
                    variation_id: id.clone(),
                    outcome: PullOutcome::Pulled(receipt),
                }),
                Err(err) => records.push(PullRecord {
                    variation_id: id.clone(),
                    outcome: PullOutcome::Failed(format!("{err:#}")),
                }),
            }
        }
        Ok(PullSummary { records })
    }

    /// Pull every selected variation; the selection is cleared only when
    /// the whole batch succeeds.
    pub fn pull_selected(
        &mut self,
        project: &ProjectId,
        project_path: &str,
        overwrite: bool,
    ) -> Result<PullSummary> {
        let mut ids = self.selection.selected_variation_ids();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        let summary = self.pull_variations(&ids, project, project_path, overwrite)?;
        if !summary.records.is_empty() && summary.failed() == 0 {
            self.selection.clear_all();
        }
        Ok(summary)
    }
}
