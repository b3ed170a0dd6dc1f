use super::Database;
use anyhow::{bail, Result};
use serde_json::Value;

impl Database {
    pub async fn get_swap(&self, id: &str) -> Result<Option<Value>> {
        tracing::trace!(swap_id = %id, "Fetching swap document");
        let data: Option<String> = sqlx::query_scalar("SELECT data FROM swaps WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        data.map(|d| serde_json::from_str(&d))
            .transpose()
            .map_err(Into::into)
    }

    /// Insert or replace a swap document.
    pub async fn put_swap(&self, id: &str, doc: &Value) -> Result<()> {
        tracing::debug!(swap_id = %id, "Storing swap document");
        sqlx::query(
            "INSERT INTO swaps (id, data) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(id)
        .bind(doc.to_string())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Set `sustainabilityImpact` on a stored swap, leaving other fields as they are.
    pub async fn set_sustainability_impact(&self, id: &str, impact: Option<&str>) -> Result<()> {
        tracing::debug!(
            swap_id = %id,
            has_impact = impact.is_some(),
            "Updating sustainability impact"
        );
        let impact_json = serde_json::to_string(&impact)?;
        let result = sqlx::query(
            "UPDATE swaps SET data = json_set(data, '$.sustainabilityImpact', json(?)) WHERE id = ?",
        )
        .bind(impact_json)
        .bind(id)
        .execute(self.pool())
        .await?;
        if result.rows_affected() == 0 {
            bail!("no swap document to update: swaps/{id}");
        }
        Ok(())
    }
}
