use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use facturador::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const DEFAULT_API_KEY: &str = "facturador_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = facturador::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    facturador::api::router(state).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn put_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn seed_cliente(app: &Router, nombre: &str, ruc_dni: &str) -> i64 {
    let response = post_json(
        app,
        "/api/clientes",
        json!({"nombre": nombre, "ruc_dni": ruc_dni, "direccion": "Av. Siempre Viva 123"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn seed_producto(app: &Router, nombre: &str, precio: &str) -> i64 {
    let response = post_json(
        app,
        "/api/productos",
        json!({"nombre": nombre, "precio_unitario": precio}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn approx(value: &Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-6
}

#[tokio::test]
async fn test_emitir_factura_con_igv() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Comercial Andina SAC", "20100100100").await;
    let prod_a = seed_producto(&app, "Servicio de instalación", "10.00").await;
    let prod_b = seed_producto(&app, "Cable UTP", "5.00").await;

    let response = post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Factura",
            "cliente_id": cliente_id,
            "aplicar_igv": true,
            "items": [
                {"producto_id": prod_a.to_string(), "cantidad": "2"},
                {"producto_id": prod_b.to_string(), "cantidad": "1"}
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["numero_documento"], "F-1");
    assert_eq!(data["tipo"], "Factura");
    assert!(approx(&data["subtotal"], 25.0));
    assert!(approx(&data["impuestos"], 4.5));
    assert!(approx(&data["total"], 29.5));
    assert_eq!(data["anulado"], false);
    assert_eq!(data["cliente"]["nombre"], "Comercial Andina SAC");
    assert_eq!(data["emitido_por"], "admin");
    assert_eq!(data["lineas"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_emitir_sin_igv() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Juan Pérez", "44556677").await;
    let producto = seed_producto(&app, "Mantenimiento", "100.00").await;

    let response = post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Boleta",
            "cliente_id": cliente_id,
            "aplicar_igv": false,
            "items": [{"producto_id": producto.to_string(), "cantidad": "3"}]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["data"]["numero_documento"], "B-1");
    assert!(approx(&json["data"]["subtotal"], 300.0));
    assert!(approx(&json["data"]["impuestos"], 0.0));
    assert!(approx(&json["data"]["total"], 300.0));
}

#[tokio::test]
async fn test_numeracion_correlativa_por_tipo() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Cliente Frecuente", "10203040").await;
    let producto = seed_producto(&app, "Consultoría", "50.00").await;

    let emitir = |tipo: &str| {
        json!({
            "tipo": tipo,
            "cliente_id": cliente_id,
            "aplicar_igv": false,
            "items": [{"producto_id": producto.to_string(), "cantidad": "1"}]
        })
    };

    let r1 = body_json(post_json(&app, "/api/documentos", emitir("Factura")).await).await;
    let r2 = body_json(post_json(&app, "/api/documentos", emitir("Factura")).await).await;
    let r3 = body_json(post_json(&app, "/api/documentos", emitir("Boleta")).await).await;

    assert_eq!(r1["data"]["numero_documento"], "F-1");
    assert_eq!(r2["data"]["numero_documento"], "F-2");
    assert_eq!(r3["data"]["numero_documento"], "B-1");
}

#[tokio::test]
async fn test_lineas_invalidas_se_omiten() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Cliente Uno", "11111111").await;
    let producto = seed_producto(&app, "Tornillos", "2.50").await;

    let response = post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Boleta",
            "cliente_id": cliente_id,
            "aplicar_igv": false,
            "items": [
                {"producto_id": "abc", "cantidad": "2"},
                {"producto_id": producto.to_string(), "cantidad": "0"},
                {"producto_id": producto.to_string(), "cantidad": "1.5"},
                {"producto_id": "99999", "cantidad": "1"},
                {"producto_id": producto.to_string(), "cantidad": "4"}
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    // Only the last line survives
    assert_eq!(json["data"]["lineas"].as_array().unwrap().len(), 1);
    assert!(approx(&json["data"]["subtotal"], 10.0));
}

#[tokio::test]
async fn test_documento_sin_lineas_validas_se_rechaza() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Cliente Dos", "22222222").await;

    let response = post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Factura",
            "cliente_id": cliente_id,
            "aplicar_igv": true,
            "items": [
                {"producto_id": "abc", "cantidad": "2"},
                {"producto_id": "1", "cantidad": "-3"}
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted
    let listado = body_json(get(&app, "/api/documentos").await).await;
    assert_eq!(listado["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_emitir_con_cliente_inexistente() {
    let app = spawn_app().await;

    seed_producto(&app, "Algo", "1.00").await;

    let response = post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Factura",
            "cliente_id": 777,
            "aplicar_igv": false,
            "items": [{"producto_id": "1", "cantidad": "1"}]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_precio_es_instantanea_de_emision() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Cliente Tres", "33333333").await;
    let producto = seed_producto(&app, "Licencia anual", "80.00").await;

    let emitido = body_json(
        post_json(
            &app,
            "/api/documentos",
            json!({
                "tipo": "Factura",
                "cliente_id": cliente_id,
                "aplicar_igv": false,
                "items": [{"producto_id": producto.to_string(), "cantidad": "1"}]
            }),
        )
        .await,
    )
    .await;
    let doc_id = emitido["data"]["id"].as_i64().unwrap();

    // A later catalog price change must not rewrite history
    let response = put_json(
        &app,
        &format!("/api/productos/{producto}"),
        json!({"nombre": "Licencia anual", "precio_unitario": "120.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detalle = body_json(get(&app, &format!("/api/documentos/{doc_id}")).await).await;
    assert!(approx(
        &detalle["data"]["lineas"][0]["precio_unitario"],
        80.0
    ));
    assert!(approx(&detalle["data"]["subtotal"], 80.0));
}

#[tokio::test]
async fn test_anulacion_es_terminal() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Cliente Cuatro", "44444444").await;
    let producto = seed_producto(&app, "Flete", "30.00").await;

    let emitido = body_json(
        post_json(
            &app,
            "/api/documentos",
            json!({
                "tipo": "Boleta",
                "cliente_id": cliente_id,
                "aplicar_igv": false,
                "items": [{"producto_id": producto.to_string(), "cantidad": "1"}]
            }),
        )
        .await,
    )
    .await;
    let doc_id = emitido["data"]["id"].as_i64().unwrap();

    // Empty motivo is rejected
    let response = post_json(
        &app,
        &format!("/api/documentos/{doc_id}/anular"),
        json!({"motivo": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        &format!("/api/documentos/{doc_id}/anular"),
        json!({"motivo": "Error de digitación"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let anulado = body_json(response).await;
    assert_eq!(anulado["data"]["anulado"], true);
    assert_eq!(anulado["data"]["motivo_anulacion"], "Error de digitación");
    let fecha_anulacion = anulado["data"]["fecha_anulacion"].clone();
    assert!(fecha_anulacion.is_string());

    // A second attempt conflicts and preserves the original record
    let response = post_json(
        &app,
        &format!("/api/documentos/{doc_id}/anular"),
        json!({"motivo": "Otro motivo"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let detalle = body_json(get(&app, &format!("/api/documentos/{doc_id}")).await).await;
    assert_eq!(detalle["data"]["motivo_anulacion"], "Error de digitación");
    assert_eq!(detalle["data"]["fecha_anulacion"], fecha_anulacion);
}

#[tokio::test]
async fn test_anular_documento_inexistente() {
    let app = spawn_app().await;

    let response = post_json(&app, "/api/documentos/999/anular", json!({"motivo": "x"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_producto_precio_invalido_se_rechaza() {
    let app = spawn_app().await;

    let response = post_json(
        &app,
        "/api/productos",
        json!({"nombre": "Pernos", "precio_unitario": "abc"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app,
        "/api/productos",
        json!({"nombre": "Pernos", "precio_unitario": "-5.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicados_en_catalogos() {
    let app = spawn_app().await;

    seed_cliente(&app, "Original", "55555555").await;
    let response = post_json(
        &app,
        "/api/clientes",
        json!({"nombre": "Otro Nombre", "ruc_dni": "55555555"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    seed_producto(&app, "Martillo", "15.00").await;
    let response = post_json(
        &app,
        "/api/productos",
        json!({"nombre": "Martillo", "precio_unitario": "20.00"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listado_resuelve_cliente_eliminado() {
    let app = spawn_app().await;

    let cliente_id = seed_cliente(&app, "Efímero SAC", "66666666").await;
    let producto = seed_producto(&app, "Varios", "9.90").await;

    post_json(
        &app,
        "/api/documentos",
        json!({
            "tipo": "Factura",
            "cliente_id": cliente_id,
            "aplicar_igv": false,
            "items": [{"producto_id": producto.to_string(), "cantidad": "1"}]
        }),
    )
    .await;

    // Unguarded delete leaves the documento referencing a missing cliente
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/clientes/{cliente_id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listado = body_json(get(&app, "/api/documentos").await).await;
    let filas = listado["data"].as_array().unwrap();
    assert_eq!(filas.len(), 1);
    assert_eq!(filas[0]["cliente_nombre"], "N/A");
}

#[tokio::test]
async fn test_busqueda_de_clientes() {
    let app = spawn_app().await;

    seed_cliente(&app, "Ferretería El Clavo", "20555666777").await;
    seed_cliente(&app, "Bodega Rosita", "10888999000").await;

    let json = body_json(get(&app, "/api/clientes?q=clavo").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["nombre"], "Ferretería El Clavo");

    let json = body_json(get(&app, "/api/clientes?q=10888").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(get(&app, "/api/clientes").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
