//! Runs against the database named by `DATABASE_URL`:
//!
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use std::str::FromStr;

use actix_web::{http::StatusCode, test, web, App};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use trades::{
    configuration::{get_configuration, AppState, State},
    dao::PoolOption,
    provider::DatabasePool,
    server,
};

const SCHEMA: &str = include_str!("sql/trade.sql");
const TIMESTAMP_SCHEMA: &str = include_str!("sql/trade_timestamp.sql");

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();
static TIMESTAMP_SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

async fn state() -> AppState<State> {
    let config = get_configuration().expect("DATABASE_URL must be set");
    let database = DatabasePool::new(&config).expect("database pool");

    SCHEMA_READY
        .get_or_init(|| async {
            sqlx::query(SCHEMA)
                .execute(database.get_pool())
                .await
                .expect("schema");
        })
        .await;

    AppState::new(State::new(config, database))
}

/// Same service, but `trade` resolves to a table whose date columns are all
/// `TIMESTAMP WITHOUT TIME ZONE`.
async fn timestamp_state() -> AppState<State> {
    let config = get_configuration().expect("DATABASE_URL must be set");
    let options = DatabasePool::connect_options(&config)
        .expect("database url")
        .options([("search_path", "trades_ts")]);
    let database = DatabasePool::from_pool(
        PoolOption::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(options),
    );

    TIMESTAMP_SCHEMA_READY
        .get_or_init(|| async {
            sqlx::raw_sql(TIMESTAMP_SCHEMA)
                .execute(database.get_pool())
                .await
                .expect("schema");
        })
        .await;

    AppState::new(State::new(config, database))
}

macro_rules! call {
    ($app:expr, $req:expr $(,)?) => {{
        let res = test::call_service($app, $req.to_request()).await;
        let status: StatusCode = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

fn decimal(value: &Value) -> BigDecimal {
    BigDecimal::from_str(value.as_str().expect("decimal string")).unwrap()
}

macro_rules! app {
    () => {
        app!(state())
    };
    ($state:expr) => {{
        let state = $state.await;
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(server::routes),
        )
        .await
    }};
}

fn btc() -> Value {
    json!({
        "data": "2024-01-01",
        "ativo": "BTC",
        "direcao": "buy",
        "percentual": 5,
        "alvo": 60000
    })
}

#[actix_web::test]
#[ignore]
async fn test_create_then_get() {
    let app = app!();

    let (status, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(btc()),
    );

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_i64());
    assert_eq!(created["data"], "2024-01-01");
    assert_eq!(created["ativo"], "BTC");
    assert_eq!(created["direcao"], "buy");
    assert_eq!(decimal(&created["percentual"]), BigDecimal::from(5));
    assert_eq!(decimal(&created["alvo"]), BigDecimal::from(60000));
    assert!(created["createdat"].is_string());
    assert_eq!(created["createdat"], created["updatedat"]);

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = call!(
        &app,
        test::TestRequest::get().uri(&format!("/trades/{}", id)),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) =
        call!(&app, test::TestRequest::get().uri("/trades"));

    assert_eq!(status, StatusCode::OK);
    assert!(all
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["id"] == created["id"]));
}

#[actix_web::test]
#[ignore]
async fn test_update_refreshes_updatedat() {
    let app = app!();

    let (_, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(btc()),
    );
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = call!(
        &app,
        test::TestRequest::put().uri(&format!("/trades/{}", id)).set_json(
            json!({
                "data": "2024-02-01",
                "ativo": "ETH",
                "direcao": "sell",
                "percentual": 2.5,
                "alvo": "3000"
            }),
        ),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdat"], created["createdat"]);
    assert_eq!(updated["ativo"], "ETH");
    assert_eq!(updated["direcao"], "sell");
    assert_eq!(
        decimal(&updated["percentual"]),
        BigDecimal::from_str("2.5").unwrap()
    );

    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["updatedat"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updatedat"].clone()).unwrap();
    assert!(after > before);
}

#[actix_web::test]
#[ignore]
async fn test_update_replaces_every_field() {
    let app = app!();

    let (_, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(btc()),
    );
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/trades/{}", id))
            .set_json(json!({ "ativo": "SOL" })),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["ativo"], "SOL");
    assert!(updated["data"].is_null());
    assert!(updated["percentual"].is_null());
}

#[actix_web::test]
#[ignore]
async fn test_delete_then_get_is_404() {
    let app = app!();

    let (_, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(btc()),
    );
    let uri = format!("/trades/{}", created["id"].as_i64().unwrap());

    let (status, body) =
        call!(&app, test::TestRequest::delete().uri(&uri));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Trade deleted successfully" }));

    let (status, body) = call!(&app, test::TestRequest::get().uri(&uri));

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Trade not found" }));

    let (status, _) = call!(&app, test::TestRequest::delete().uri(&uri));

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[ignore]
async fn test_unknown_id_is_404() {
    let app = app!();
    let uri = "/trades/2147483647";

    let (status, body) = call!(&app, test::TestRequest::get().uri(uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Trade not found" }));

    let (status, _) = call!(
        &app,
        test::TestRequest::put().uri(uri).set_json(btc()),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call!(&app, test::TestRequest::delete().uri(uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[ignore]
async fn test_health_ok() {
    let app = app!();

    let (status, body) =
        call!(&app, test::TestRequest::get().uri("/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
#[ignore]
async fn test_iso_datetime_is_accepted_for_a_date_column() {
    let app = app!();

    let (status, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(json!({
            "data": "2024-01-01T10:00:00.000Z",
            "ativo": "BTC",
            "percentual": "5.25"
        })),
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"], "2024-01-01");
    assert_eq!(
        decimal(&created["percentual"]),
        BigDecimal::from_str("5.25").unwrap()
    );
}

#[actix_web::test]
#[ignore]
async fn test_value_the_column_rejects_is_500() {
    let app = app!();

    let (status, body) = call!(
        &app,
        test::TestRequest::post()
            .uri("/trades")
            .set_json(json!({ "percentual": "five" })),
    );

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[actix_web::test]
#[ignore]
async fn test_empty_body_writes_nulls() {
    let app = app!();

    let (status, created) =
        call!(&app, test::TestRequest::post().uri("/trades"));

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_i64());
    for field in ["data", "ativo", "direcao", "percentual", "alvo"] {
        assert!(created[field].is_null(), "{}", field);
    }
    assert!(created["createdat"].is_string());

    let (_, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(btc()),
    );
    let (status, updated) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/trades/{}", created["id"].as_i64().unwrap())),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    for field in ["data", "ativo", "direcao", "percentual", "alvo"] {
        assert!(updated[field].is_null(), "{}", field);
    }
}

#[actix_web::test]
#[ignore]
async fn test_timestamp_columns_are_read() {
    let app = app!(timestamp_state());

    let (status, created) = call!(
        &app,
        test::TestRequest::post().uri("/trades").set_json(json!({
            "data": "2024-01-01T10:00:00.000Z",
            "ativo": "BTC"
        })),
    );

    assert_eq!(status, StatusCode::CREATED);
    assert!(created["data"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01T10:00:00"));
    assert!(created["createdat"].is_string());

    let (status, fetched) = call!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/trades/{}", created["id"].as_i64().unwrap())),
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, all) =
        call!(&app, test::TestRequest::get().uri("/trades"));

    assert_eq!(status, StatusCode::OK);
    assert!(all
        .as_array()
        .unwrap()
        .iter()
        .any(|item| item["id"] == created["id"]));
}
