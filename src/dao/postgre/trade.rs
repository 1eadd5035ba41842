use sqlx::{types::Json, Error};

use crate::{
    model::{Table, Trade},
    types,
};

impl Table<Trade> {
    pub async fn get_all(&self) -> Result<Vec<Trade>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM trade
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_one(&self, id: i32) -> Result<Option<Trade>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM trade WHERE id = $1
            "#,
        )
        .bind(id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }

    /// The body goes in as one JSON record; `jsonb_populate_record` coerces
    /// each field to the column type, so the datastore decides what it
    /// accepts.
    pub async fn insert(&self, data: &types::Trade) -> Result<Trade, Error> {
        sqlx::query_as(
            r#"
            INSERT INTO trade (
                data,
                ativo,
                direcao,
                percentual,
                alvo,
                createdat,
                updatedat
            )
            SELECT
                r.data,
                r.ativo,
                r.direcao,
                r.percentual,
                r.alvo,
                NOW(),
                NOW()
            FROM jsonb_populate_record(NULL::trade, $1) AS r
            RETURNING *
            "#,
        )
        .bind(Json(data))
        .fetch_one(&self.pool)
        .await
    }

    /// Replaces every mutable column. `NOW()` is the statement start time,
    /// so `updatedat` moves forward on each call.
    pub async fn update(
        &self,
        id: i32,
        data: &types::Trade,
    ) -> Result<Option<Trade>, Error> {
        sqlx::query_as(
            r#"
            UPDATE trade
            SET
                data = r.data,
                ativo = r.ativo,
                direcao = r.direcao,
                percentual = r.percentual,
                alvo = r.alvo,
                updatedat = NOW()
            FROM jsonb_populate_record(NULL::trade, $1) AS r
            WHERE trade.id = $2
            RETURNING trade.*
            "#,
        )
        .bind(Json(data))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i32) -> Result<Option<Trade>, Error> {
        sqlx::query_as(
            r#"
            DELETE FROM trade WHERE id = $1 RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
