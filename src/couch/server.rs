use crate::periods::config::StoreConfig;
use crate::periods::encode::PeriodRecord;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Blocking client for a CouchDB-compatible document store.
///
/// The period pipeline never touches this; only the command drivers batch
/// finished records through it.
pub struct CouchServer {
    base: String,
    client: Client,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub stored: usize,
    pub rejected: Vec<String>,
}

/// CouchDB database-name rule: a lowercase letter first, then
/// `[a-z0-9_$()+/-]`.
pub fn is_valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() {
        return false;
    }
    chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || "_$()+/-".contains(ch))
}

fn bulk_docs_payload(
    records: &[PeriodRecord],
    revs: &BTreeMap<String, String>,
) -> Result<Vec<Value>> {
    let mut docs = Vec::with_capacity(records.len());
    for record in records {
        let mut doc = serde_json::to_value(record).context("failed to serialize period record")?;
        if let Some(rev) = revs.get(&record.key)
            && let Some(obj) = doc.as_object_mut()
        {
            obj.insert("_rev".to_string(), Value::from(rev.as_str()));
        }
        docs.push(doc);
    }
    Ok(docs)
}

impl CouchServer {
    pub fn connect(cfg: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base: cfg.url.trim_end_matches('/').to_string(),
            client,
            username: cfg.username.clone(),
            password: cfg.password.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<reqwest::blocking::Response> {
        self.authed(builder)
            .send()
            .with_context(|| format!("document store unreachable at {}", self.base))
    }

    /// Server banner; confirms the store speaks the expected protocol.
    pub fn ping(&self) -> Result<String> {
        let response = self.send(self.client.get(self.url("")))?;
        if !response.status().is_success() {
            anyhow::bail!("store root returned status {}", response.status());
        }
        let body: Value = response.json().context("invalid store banner JSON")?;
        Ok(body
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }

    pub fn exists(&self, database: &str) -> Result<bool> {
        let response = self.send(self.client.head(self.url(database)))?;
        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            code => anyhow::bail!("unexpected status {code} probing database {database}"),
        }
    }

    pub fn create(&self, database: &str) -> Result<()> {
        let response = self.send(self.client.put(self.url(database)))?;
        let code = response.status().as_u16();
        // 412 means the database already exists, which is fine.
        if response.status().is_success() || code == 412 {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        anyhow::bail!("failed to create database {database}: status {code}: {}", body.trim())
    }

    /// Number of documents currently in the database, for read-back checks.
    pub fn doc_count(&self, database: &str) -> Result<u64> {
        let response = self.send(self.client.get(self.url(database)))?;
        if !response.status().is_success() {
            anyhow::bail!(
                "failed to read database {database}: status {}",
                response.status()
            );
        }
        let body: Value = response.json().context("invalid database metadata JSON")?;
        body.get("doc_count")
            .and_then(Value::as_u64)
            .context("database metadata missing doc_count")
    }

    /// Current revisions for the given records' keys, where the documents
    /// already exist.
    fn current_revs(
        &self,
        database: &str,
        records: &[PeriodRecord],
    ) -> Result<BTreeMap<String, String>> {
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        let response = self.send(
            self.client
                .post(self.url(&format!("{database}/_all_docs")))
                .json(&serde_json::json!({ "keys": keys })),
        )?;
        if !response.status().is_success() {
            anyhow::bail!(
                "failed to look up existing documents in {database}: status {}",
                response.status()
            );
        }

        let body: Value = response.json().context("invalid _all_docs JSON")?;
        let rows = body
            .get("rows")
            .and_then(Value::as_array)
            .context("_all_docs response missing rows")?;

        let mut revs = BTreeMap::new();
        for row in rows {
            let Some(id) = row.get("id").and_then(Value::as_str) else {
                continue;
            };
            if let Some(rev) = row
                .get("value")
                .and_then(|v| v.get("rev"))
                .and_then(Value::as_str)
            {
                revs.insert(id.to_string(), rev.to_string());
            }
        }
        Ok(revs)
    }

    /// Upsert a batch of records keyed by their canonical key. Existing
    /// documents are overwritten at their current revision; per-document
    /// rejections are reported, not fatal.
    pub fn bulk_upsert(&self, database: &str, records: &[PeriodRecord]) -> Result<BulkOutcome> {
        if records.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let revs = self.current_revs(database, records)?;
        let docs = bulk_docs_payload(records, &revs)?;

        let response = self.send(
            self.client
                .post(self.url(&format!("{database}/_bulk_docs")))
                .json(&serde_json::json!({ "docs": docs })),
        )?;
        if !response.status().is_success() {
            anyhow::bail!(
                "bulk write to {database} failed: status {}",
                response.status()
            );
        }

        let results: Vec<Value> = response.json().context("invalid _bulk_docs JSON")?;
        let mut outcome = BulkOutcome::default();
        for entry in &results {
            let id = entry.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
            match entry.get("error").and_then(Value::as_str) {
                None => outcome.stored += 1,
                Some(error) => {
                    let reason = entry.get("reason").and_then(Value::as_str).unwrap_or("");
                    outcome.rejected.push(format!("{id}: {error} {reason}").trim().to_string());
                }
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{bulk_docs_payload, is_valid_database_name};
    use crate::periods::encode::PeriodRecord;
    use std::collections::BTreeMap;

    fn record(key: &str) -> PeriodRecord {
        PeriodRecord {
            key: key.to_string(),
            timestamp: "2014-01-10T11:20:00+01:00".to_string(),
            duration: 3600,
            category: Vec::new(),
        }
    }

    #[test]
    fn database_name_rule_matches_couchdb() {
        assert!(is_valid_database_name("pf-periods"));
        assert!(is_valid_database_name("a1_$()+/-"));
        assert!(!is_valid_database_name(""));
        assert!(!is_valid_database_name("1periods"));
        assert!(!is_valid_database_name("Periods"));
        assert!(!is_valid_database_name("pf periods"));
    }

    #[test]
    fn payload_attaches_known_revs_only() {
        let records = vec![record("2014-01-10T10:20:00Z"), record("2014-01-11T10:20:00Z")];
        let mut revs = BTreeMap::new();
        revs.insert("2014-01-10T10:20:00Z".to_string(), "3-abc".to_string());

        let docs = bulk_docs_payload(&records, &revs).expect("payload");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["_id"], "2014-01-10T10:20:00Z");
        assert_eq!(docs[0]["_rev"], "3-abc");
        assert!(docs[1].get("_rev").is_none());
        assert_eq!(docs[0]["duration"], 3600);
        assert_eq!(docs[0]["category"], serde_json::json!([]));
    }
}
