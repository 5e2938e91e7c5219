use rand::{distributions::Alphanumeric, Rng};
use sqlx::{Row, SqliteConnection};

use crate::{
    pipeline_objects::{MessageAttributes, QueueMessage},
    traits::QueueError,
};

fn random_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(27).map(char::from).collect()
}

/// Inserts a message, immediately visible, and returns its id.
pub async fn send(
    body: &str,
    attributes: &str,
    now_ms: i64,
    conn: &mut SqliteConnection,
) -> Result<String, QueueError> {
    let message_id = random_token();
    sqlx::query(
        r#"INSERT INTO queue_messages (message_id, body, attributes, enqueued_at, visible_at)
           VALUES ($1, $2, $3, $4, $4)"#,
    )
    .bind(&message_id)
    .bind(body)
    .bind(attributes)
    .bind(now_ms)
    .execute(conn)
    .await
    .map_err(|e| QueueError::SendError(e.to_string()))?;
    Ok(message_id)
}

/// Claims up to `max_messages` visible messages: each gets a fresh receipt handle and becomes
/// invisible until `now + visibility_timeout_ms`. Must run inside a transaction so concurrent
/// consumers never claim the same delivery.
pub async fn receive(
    max_messages: u32,
    visibility_timeout_ms: i64,
    now_ms: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<QueueMessage>, QueueError> {
    let rows = sqlx::query(
        r#"SELECT message_id, body, attributes FROM queue_messages
           WHERE visible_at <= $1 ORDER BY enqueued_at LIMIT $2"#,
    )
    .bind(now_ms)
    .bind(i64::from(max_messages))
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| QueueError::ReceiveError(e.to_string()))?;

    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let message_id: String = row.get("message_id");
        let body: String = row.get("body");
        let attributes: String = row.get("attributes");
        let attributes: MessageAttributes =
            serde_json::from_str(&attributes).map_err(|e| QueueError::ReceiveError(e.to_string()))?;
        let receipt_handle = random_token();
        sqlx::query(
            r#"UPDATE queue_messages
               SET receipt_handle = $1, visible_at = $2, delivery_count = delivery_count + 1
               WHERE message_id = $3"#,
        )
        .bind(&receipt_handle)
        .bind(now_ms + visibility_timeout_ms)
        .bind(&message_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| QueueError::ReceiveError(e.to_string()))?;
        messages.push(QueueMessage { message_id, receipt_handle, body, attributes });
    }
    Ok(messages)
}

/// Removes a message by its receipt handle. A handle is single-use and tied to one delivery:
/// once the message is redelivered, the older handle no longer matches anything.
pub async fn delete(receipt_handle: &str, conn: &mut SqliteConnection) -> Result<(), QueueError> {
    let result = sqlx::query(r#"DELETE FROM queue_messages WHERE receipt_handle = $1"#)
        .bind(receipt_handle)
        .execute(conn)
        .await
        .map_err(|e| QueueError::DeleteError(e.to_string()))?;
    if result.rows_affected() == 0 {
        return Err(QueueError::DeleteError("unknown or superseded receipt handle".to_string()));
    }
    Ok(())
}
