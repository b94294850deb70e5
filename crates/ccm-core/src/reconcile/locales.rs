//! Locale reconciliation
//!
//! Desired locales are matched to remote locales by code. Existing locales
//! are updated only when merging the desired attributes changes them;
//! missing ones are created. Remote locales that are neither desired nor the
//! default are deactivated rather than deleted, so content in them survives.

use std::collections::HashMap;

use serde_json::Value;

use ccm_client::{Client, LocaleBody, RemoteLocale};
use ccm_meta::Locale;

use super::outcome::{Outcome, RollbackReport};
use crate::Result;
use crate::merge::deep_merge_value;

/// Result of a locale reconciliation run
#[derive(Debug)]
pub struct LocaleReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deactivated: Vec<String>,
    pub outcome: Outcome,
}

impl LocaleReport {
    fn new() -> Self {
        Self {
            created: Vec::new(),
            updated: Vec::new(),
            unchanged: Vec::new(),
            deactivated: Vec::new(),
            outcome: Outcome::Applied,
        }
    }

    fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
            ..Self::new()
        }
    }

    /// Number of locales written to
    pub fn changed(&self) -> usize {
        self.created.len() + self.updated.len() + self.deactivated.len()
    }
}

/// Bring the remote locales in line with `desired`.
///
/// An empty `desired` list leaves the remote locales untouched. Failures
/// never propagate: the run is rolled back and reported through
/// [`LocaleReport::outcome`].
pub async fn reconcile_locales(client: &Client, desired: &[Locale]) -> LocaleReport {
    if desired.is_empty() {
        tracing::info!("No locales to migrate, skipping");
        return LocaleReport::skipped();
    }

    let mut run = LocaleRun::new(client);
    let mut report = LocaleReport::new();

    if let Err(error) = run.apply(desired, &mut report).await {
        tracing::warn!(%error, "Locale migration failed, rolling back");
        let rollback = run.rollback().await;
        report.outcome = Outcome::failed(error, rollback);
    }

    report
}

/// Mutable state of one run, kept for rollback
struct LocaleRun<'a> {
    client: &'a Client,
    /// Remote locales as fetched at run start
    baseline: Vec<RemoteLocale>,
    /// Latest known version by locale id
    versions: HashMap<String, u64>,
    /// Codes of pre-existing locales written to
    touched: Vec<String>,
    /// (code, id) of locales created by this run
    created: Vec<(String, String)>,
}

impl<'a> LocaleRun<'a> {
    fn new(client: &'a Client) -> Self {
        Self {
            client,
            baseline: Vec::new(),
            versions: HashMap::new(),
            touched: Vec::new(),
            created: Vec::new(),
        }
    }

    async fn apply(&mut self, desired: &[Locale], report: &mut LocaleReport) -> Result<()> {
        self.baseline = self.client.locales().await?;
        self.versions = self
            .baseline
            .iter()
            .map(|l| (l.id().to_string(), l.version()))
            .collect();

        let existing = self.baseline.clone();

        for locale in desired {
            match existing.iter().find(|l| l.code() == locale.code) {
                Some(remote) => {
                    let merged = merge_locale(&remote.body, locale)?;
                    if merged == remote.body {
                        tracing::debug!(locale = %locale.code, "Locale has not changed, skipping update");
                        report.unchanged.push(locale.code.clone());
                        continue;
                    }

                    self.update(remote, &merged.writable()).await?;
                    tracing::info!(locale = %locale.code, "Updated locale");
                    report.updated.push(locale.code.clone());
                }
                None => {
                    let created = self.client.create_locale(locale).await?;
                    tracing::info!(locale = %locale.code, id = %created.id(), "Created locale");
                    self.versions
                        .insert(created.id().to_string(), created.version());
                    self.created
                        .push((locale.code.clone(), created.id().to_string()));
                    report.created.push(locale.code.clone());
                }
            }
        }

        for remote in &existing {
            let wanted = desired.iter().any(|l| l.code == remote.code());
            if wanted || remote.body.default {
                continue;
            }

            self.update(remote, &remote.body.deactivated()).await?;
            tracing::info!(locale = %remote.code(), "Deactivated locale");
            report.deactivated.push(remote.code().to_string());
        }

        Ok(())
    }

    async fn update(&mut self, remote: &RemoteLocale, body: &LocaleBody) -> Result<()> {
        let version = self.version_of(remote);
        let updated = self.client.update_locale(remote.id(), version, body).await?;

        self.versions
            .insert(remote.id().to_string(), updated.version());
        if !self.touched.iter().any(|code| code == remote.code()) {
            self.touched.push(remote.code().to_string());
        }
        Ok(())
    }

    fn version_of(&self, remote: &RemoteLocale) -> u64 {
        self.versions
            .get(remote.id())
            .copied()
            .unwrap_or(remote.version())
    }

    /// Restore touched locales and delete created ones, best effort
    async fn rollback(&self) -> RollbackReport {
        let mut report = RollbackReport::default();

        for code in &self.touched {
            let Some(original) = self.baseline.iter().find(|l| l.code() == code) else {
                continue;
            };

            let version = self.version_of(original);
            match self
                .client
                .update_locale(original.id(), version, &original.body.writable())
                .await
            {
                Ok(_) => {
                    tracing::info!(locale = %code, "Rolled back locale");
                    report.restored.push(code.clone());
                }
                Err(e) => report.record_failure(format!("restore locale '{}'", code), &e),
            }
        }

        for (code, id) in &self.created {
            match self.client.delete_locale(id).await {
                Ok(()) => {
                    tracing::info!(locale = %code, "Deleted new locale as part of rollback");
                    report.deleted.push(code.clone());
                }
                Err(e) => report.record_failure(format!("delete locale '{}'", code), &e),
            }
        }

        report
    }
}

/// Desired attributes deep-merged onto a copy of the remote body
fn merge_locale(remote: &LocaleBody, desired: &Locale) -> Result<LocaleBody> {
    let mut merged: Value = serde_json::to_value(remote)?;
    deep_merge_value(&mut merged, &serde_json::to_value(desired)?);
    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote_body() -> LocaleBody {
        serde_json::from_value(json!({
            "code": "en-US",
            "name": "English (United States)",
            "default": true,
            "fallbackCode": null,
            "internal_code": "en-US",
            "contentDeliveryApi": true,
            "contentManagementApi": true,
            "optional": false
        }))
        .unwrap()
    }

    #[test]
    fn merge_with_code_only_is_unchanged() {
        let merged = merge_locale(&remote_body(), &Locale::new("en-US")).unwrap();
        assert_eq!(merged, remote_body());
    }

    #[test]
    fn merge_applies_desired_attributes() {
        let desired = Locale::new("en-US").named("English");
        let merged = merge_locale(&remote_body(), &desired).unwrap();

        assert_eq!(merged.name, "English");
        assert!(merged.default);
        assert_eq!(merged.extra.get("internal_code"), Some(&json!("en-US")));
    }
}
