//! HTTP handler functions for the Vitibrasil API.

use actix_web::{HttpResponse, web};
use vitibrasil_report_models::{ReportCategory, ReportRequest};
use vitibrasil_server_models::{
    ApiError, ApiHealth, ApiReport, ApiWelcome, SubTabYearPath, YearPath,
};

use crate::{AppState, FALLBACK_HEADER};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/v1/`
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().json(ApiWelcome {
        message: "Vitibrasil API: grape, wine and derivatives statistics from Embrapa".to_string(),
    })
}

/// `GET /api/v1/producao/{ano}`
pub async fn production(state: web::Data<AppState>, path: web::Path<YearPath>) -> HttpResponse {
    report(&state, ReportCategory::Production, None, &path.ano).await
}

/// `GET /api/v1/processamento/{sub_aba}/{ano}`
pub async fn processing(
    state: web::Data<AppState>,
    path: web::Path<SubTabYearPath>,
) -> HttpResponse {
    report(
        &state,
        ReportCategory::Processing,
        Some(&path.sub_aba),
        &path.ano,
    )
    .await
}

/// `GET /api/v1/comercializacao/{ano}`
pub async fn commercialization(
    state: web::Data<AppState>,
    path: web::Path<YearPath>,
) -> HttpResponse {
    report(&state, ReportCategory::Commercialization, None, &path.ano).await
}

/// `GET /api/v1/importacao/{sub_aba}/{ano}`
pub async fn import(state: web::Data<AppState>, path: web::Path<SubTabYearPath>) -> HttpResponse {
    report(&state, ReportCategory::Import, Some(&path.sub_aba), &path.ano).await
}

/// `GET /api/v1/exportacao/{sub_aba}/{ano}`
pub async fn export(state: web::Data<AppState>, path: web::Path<SubTabYearPath>) -> HttpResponse {
    report(&state, ReportCategory::Export, Some(&path.sub_aba), &path.ano).await
}

/// Validates the path, fetches the live report and falls back to the
/// snapshot according to the configured policy.
async fn report(
    state: &AppState,
    category: ReportCategory,
    sub_category: Option<&str>,
    year: &str,
) -> HttpResponse {
    let request = match ReportRequest::from_path(category, sub_category, year) {
        Ok(request) => request,
        Err(e) => {
            log::debug!("Rejected {category} request: {e}");
            return HttpResponse::UnprocessableEntity().json(ApiError {
                error: e.to_string(),
            });
        }
    };

    match state.client.fetch_report(&request).await {
        Ok(report) => HttpResponse::Ok().json(ApiReport { data: report }),
        Err(e) if state.policy.falls_back_on(&e) => {
            log::warn!("[{request}] serving fallback snapshot: {e}");
            HttpResponse::Ok()
                .insert_header((FALLBACK_HEADER, "true"))
                .json(ApiReport {
                    data: state.fallback.report(&request),
                })
        }
        Err(e) => {
            log::error!("[{request}] failed: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::dev::ServerHandle;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpServer, test};
    use vitibrasil_fallback::FallbackStore;
    use vitibrasil_source::VitibrasilClient;

    use super::*;
    use crate::{FallbackPolicy, configure};

    const UNREACHABLE: &str = "http://127.0.0.1:9/index.php";

    const PRODUCTION_PAGE: &str = r#"
        <html><body>
        <table class="tb_base tb_dados">
            <thead><tr><th>Produto</th><th>Quantidade (L.)</th></tr></thead>
            <tbody>
                <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">169.762.429</td></tr>
                <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">139.320.884</td></tr>
                <tr><td class="tb_subitem">Branco</td><td class="tb_subitem">27.910.299</td></tr>
            </tbody>
            <tfoot><tr><td>Total</td><td>457.792.870</td></tr></tfoot>
        </table>
        </body></html>
    "#;

    const TRADE_PAGE: &str = r#"
        <html><body>
        <table class="tb_base tb_dados">
            <thead><tr><th>Países</th><th>Quantidade (Kg)</th><th>Valor (US$)</th></tr></thead>
            <tbody>
                <tr><td>Alemanha</td><td>52.272</td><td>-</td></tr>
                <tr><td>Chile</td><td>3.000</td><td>4.000</td></tr>
            </tbody>
        </table>
        </body></html>
    "#;

    const MALFORMED_PRODUCTION_PAGE: &str = r#"
        <table class="tb_base tb_dados">
            <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">1</td></tr>
            <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">n/d</td></tr>
        </table>
    "#;

    fn snapshot() -> FallbackStore {
        FallbackStore::from_value(serde_json::json!({
            "producao": {
                "2022": [
                    {"tipo_produto": "Vinho De Mesa", "produto": "Tinto", "quantidade_litros": 10}
                ]
            },
            "exportacao": {
                "suco_de_uva": {
                    "2024": [
                        {"pais": "Japão", "quantidade_kg": 7, "valor_dolar": 70}
                    ]
                }
            }
        }))
    }

    fn state(base_url: &str, policy: FallbackPolicy) -> AppState {
        AppState {
            client: VitibrasilClient::new(base_url, Duration::from_secs(2)).unwrap(),
            fallback: snapshot(),
            policy,
        }
    }

    /// Serves `body` with `status` for every portal request on a loopback
    /// port and returns the portal URL.
    fn start_portal(status: StatusCode, body: &'static str) -> (String, ServerHandle) {
        let server = HttpServer::new(move || {
            App::new().route(
                "/index.php",
                web::get().to(move || async move {
                    HttpResponse::build(status)
                        .content_type("text/html; charset=utf-8")
                        .body(body)
                }),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (format!("http://{addr}/index.php"), handle)
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        let status = resp.status();
        let fallback = resp
            .headers()
            .get(FALLBACK_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let body = test::read_body_json(resp).await;
        (status, fallback, body)
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, _, body) = get(state(UNREACHABLE, FallbackPolicy::default()), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn root_returns_welcome_message() {
        let (status, _, body) = get(state(UNREACHABLE, FallbackPolicy::default()), "/api/v1/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Vitibrasil"));
    }

    #[actix_web::test]
    async fn invalid_parameters_are_unprocessable() {
        for uri in [
            "/api/v1/producao/1969",
            "/api/v1/producao/2024",
            "/api/v1/producao/dois-mil",
            "/api/v1/comercializacao/2030",
            "/api/v1/processamento/tintas/2020",
            "/api/v1/importacao/viniferas/2020",
            "/api/v1/exportacao/uvas_passas/2020",
            "/api/v1/exportacao/espumantes/2025",
        ] {
            let (status, fallback, body) =
                get(state(UNREACHABLE, FallbackPolicy::default()), uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert_eq!(fallback, None, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[actix_web::test]
    async fn unreachable_portal_serves_snapshot() {
        let (status, fallback, body) = get(
            state(UNREACHABLE, FallbackPolicy::default()),
            "/api/v1/producao/2022",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(
            body,
            serde_json::json!({"data": [
                {"tipo_produto": "Vinho De Mesa", "produto": "Tinto", "quantidade_litros": 10}
            ]})
        );

        let (status, fallback, body) = get(
            state(UNREACHABLE, FallbackPolicy::UpstreamOnly),
            "/api/v1/exportacao/suco_de_uva/2024",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(body["data"][0]["pais"], "Japão");
    }

    #[actix_web::test]
    async fn snapshot_without_key_serves_empty_list() {
        let (status, fallback, body) = get(
            state(UNREACHABLE, FallbackPolicy::default()),
            "/api/v1/processamento/viniferas/1990",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(body, serde_json::json!({"data": []}));
    }

    #[actix_web::test]
    async fn live_production_report() {
        let (portal, handle) = start_portal(StatusCode::OK, PRODUCTION_PAGE);

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::default()),
            "/api/v1/producao/2022",
        )
        .await;
        handle.stop(false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback, None);
        assert_eq!(
            body,
            serde_json::json!({"data": [
                {"tipo_produto": "Vinho De Mesa", "produto": "Tinto", "quantidade_litros": 139_320_884},
                {"tipo_produto": "Vinho De Mesa", "produto": "Branco", "quantidade_litros": 27_910_299},
            ]})
        );
    }

    #[actix_web::test]
    async fn live_trade_report() {
        let (portal, handle) = start_portal(StatusCode::OK, TRADE_PAGE);

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::default()),
            "/api/v1/importacao/vinhos_de_mesa/2024",
        )
        .await;
        handle.stop(false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback, None);
        assert_eq!(
            body,
            serde_json::json!({"data": [
                {"pais": "Alemanha", "quantidade_kg": 52_272, "valor_dolar": 0},
                {"pais": "Chile", "quantidade_kg": 3_000, "valor_dolar": 4_000},
            ]})
        );
    }

    #[actix_web::test]
    async fn page_without_table_is_an_empty_report() {
        let (portal, handle) = start_portal(StatusCode::OK, "<html><body></body></html>");

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::default()),
            "/api/v1/comercializacao/2022",
        )
        .await;
        handle.stop(false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback, None);
        assert_eq!(body, serde_json::json!({"data": []}));
    }

    #[actix_web::test]
    async fn portal_error_status_serves_snapshot() {
        let (portal, handle) = start_portal(StatusCode::SERVICE_UNAVAILABLE, "indisponível");

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::UpstreamOnly),
            "/api/v1/producao/2022",
        )
        .await;
        handle.stop(false).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(body["data"][0]["produto"], "Tinto");
    }

    #[actix_web::test]
    async fn extraction_error_follows_policy() {
        let (portal, handle) = start_portal(StatusCode::OK, MALFORMED_PRODUCTION_PAGE);

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::AnyFailure),
            "/api/v1/producao/2022",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(body["data"][0]["quantidade_litros"], 10);

        let (status, fallback, body) = get(
            state(&portal, FallbackPolicy::UpstreamOnly),
            "/api/v1/producao/2022",
        )
        .await;
        handle.stop(false).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fallback, None);
        assert!(body["error"].as_str().unwrap().contains("n/d"));
    }
}
