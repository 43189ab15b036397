use actix_web::{web, Scope};

use crate::error::AppError;
use crate::handlers;
use crate::handlers::auth::{login, logout, verify_session};
use crate::handlers::membership_handlers::{create_customer_membership, list_customer_memberships};
use crate::handlers::resource_handlers::{create_record, delete_record, get_record, list_records, update_record};
use crate::middleware::SessionAuthentication;
use crate::models::document::Document;
use crate::models::{Admin, ClassGroup, Customer, Manager, Modality, Plan};
use crate::services::auth::TokenService;

/// Malformed or mistyped JSON bodies become validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("Rejected JSON body on {}: {}", req.path(), err);
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

/// The five collection routes every document resource exposes.
fn resource_scope<T: Document>(path: &str) -> Scope {
    web::scope(path)
        .route("", web::post().to(create_record::<T>))
        .route("", web::get().to(list_records::<T>))
        .route("/{id}", web::get().to(get_record::<T>))
        .route("/{id}", web::patch().to(update_record::<T>))
        .route("/{id}", web::delete().to(delete_record::<T>))
}

/// Mounts `/health` and the `/v1` API. Every `/v1` request passes through the
/// session middleware; handlers consult the authorization policy themselves.
pub fn configure_routes(cfg: &mut web::ServiceConfig, tokens: TokenService) {
    cfg.app_data(json_config());

    cfg.route("/health", web::get().to(handlers::health::health_check));

    cfg.service(
        web::scope("/v1")
            .wrap(SessionAuthentication::new(tokens))
            .service(
                web::scope("/auth")
                    .route("", web::get().to(verify_session))
                    .route("/login", web::post().to(login))
                    .route("/logout", web::delete().to(logout)),
            )
            .service(resource_scope::<Admin>("/admins"))
            .service(resource_scope::<Manager>("/managers"))
            .service(
                resource_scope::<Customer>("/customers")
                    .route("/{id}/memberships", web::get().to(list_customer_memberships))
                    .route("/{id}/memberships", web::post().to(create_customer_membership)),
            )
            .service(resource_scope::<Modality>("/modalities"))
            .service(resource_scope::<Plan>("/plans"))
            .service(resource_scope::<ClassGroup>("/classGroups")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::SeedAdmin;
    use crate::config::AppSettings;
    use crate::db::{DocumentStore, MemoryDocumentStore};
    use crate::models::auth_jwt_claims::Claims;
    use crate::models::{AppState, Role};
    use crate::services::auth::jwt::JWT_ISSUER;
    use crate::services::auth::ACCESS_TOKEN_COOKIE;
    use crate::services::bootstrap::seed_admin;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    const SECRET: &str = "route-test-secret";
    const ADMIN_EMAIL: &str = "admin@gym.example";
    const ADMIN_PASSWORD: &str = "admin-pass";

    async fn test_state() -> AppState {
        let vars: HashMap<&str, &str> = HashMap::from([("JWT_SECRET", SECRET)]);
        let settings = AppSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let tokens = TokenService::new(SECRET, 24).unwrap();

        let seed = SeedAdmin {
            name: "Root".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        };
        seed_admin(store.clone(), Some(&seed)).await.unwrap();

        AppState::new(settings, store, tokens)
    }

    macro_rules! init_app {
        ($state:expr) => {{
            let state: AppState = $state;
            let tokens = state.tokens.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state))
                    .configure(move |cfg| configure_routes(cfg, tokens))
                    .default_service(web::route().to(handlers::not_found)),
            )
            .await
        }};
    }

    macro_rules! login_as {
        ($app:expr, $email:expr, $password:expr) => {{
            let req = test::TestRequest::post()
                .uri("/v1/auth/login")
                .set_json(json!({"email": $email, "password": $password}))
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let cookie = resp
                .response()
                .cookies()
                .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
                .map(|c| c.into_owned())
                .expect("login sets the session cookie");
            let body: Value = test::read_body_json(resp).await;
            (cookie, body)
        }};
    }

    #[actix_web::test]
    async fn test_login_then_verify_session_returns_same_identity() {
        let app = init_app!(test_state().await);
        let (cookie, login_body) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);
        assert_eq!(login_body["userRole"], "admin");
        assert_eq!(cookie.http_only(), Some(true));

        let req = test::TestRequest::get().uri("/v1/auth").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let session: Value = test::read_body_json(resp).await;
        assert_eq!(session, login_body);
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let app = init_app!(test_state().await);
        let req = test::TestRequest::post()
            .uri("/v1/auth/login")
            .set_json(json!({"email": ADMIN_EMAIL, "password": "not-it"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.response().cookies().next().is_none());
    }

    #[actix_web::test]
    async fn test_missing_expired_or_tampered_cookie_is_unauthorized() {
        let app = init_app!(test_state().await);

        let anonymous = test::TestRequest::get().uri("/v1/modalities").to_request();
        assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::UNAUTHORIZED);

        let anonymous_delete = test::TestRequest::delete()
            .uri(&format!("/v1/plans/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, anonymous_delete).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "authentication_error");

        let now = chrono::Utc::now().timestamp();
        let expired_claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            role: Role::Admin,
            exp: (now - 600) as usize,
            iat: (now - 3600) as usize,
            iss: JWT_ISSUER.to_string(),
        };
        let expired = encode(
            &Header::default(),
            &expired_claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let req = test::TestRequest::get()
            .uri("/v1/modalities")
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, expired))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);
        // Flip the first signature character
        let token = cookie.value();
        let signature_start = token.rfind('.').unwrap() + 1;
        let flipped = if token[signature_start..].starts_with('A') { "B" } else { "A" };
        let tampered = format!(
            "{}{}{}",
            &token[..signature_start],
            flipped,
            &token[signature_start + 1..]
        );
        let req = test::TestRequest::get()
            .uri("/v1/modalities")
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, tampered))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "authentication_error");
    }

    #[actix_web::test]
    async fn test_records_with_unknown_modality_are_not_created() {
        let app = init_app!(test_state().await);
        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);

        let req = test::TestRequest::post()
            .uri("/v1/plans")
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "Monthly",
                "active": true,
                "modality": uuid::Uuid::new_v4(),
                "numberLessonsWeek": 2,
                "monthDuration": 1,
                "monthPrice": 100
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/v1/plans").cookie(cookie.clone()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"plans": []}));

        let req = test::TestRequest::post()
            .uri("/v1/classGroups")
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "Morning spin",
                "modality": uuid::Uuid::new_v4(),
                "weekdays": ["Mon", "Wed"],
                "startTime": "07:00:00",
                "capacity": 10,
                "active": true
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Modality not found");

        let req = test::TestRequest::get().uri("/v1/classGroups").cookie(cookie).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"classGroups": []}));
    }

    #[actix_web::test]
    async fn test_modality_lifecycle_and_double_delete() {
        let app = init_app!(test_state().await);
        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);

        let mut ids = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/v1/modalities")
                .cookie(cookie.clone())
                .set_json(json!({"name": "Yoga", "active": true}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["modality"]["name"], "Yoga");
            ids.push(body["modality"]["_id"].as_str().unwrap().to_string());
        }
        assert_ne!(ids[0], ids[1]);

        let req = test::TestRequest::patch()
            .uri(&format!("/v1/modalities/{}", ids[0]))
            .cookie(cookie.clone())
            .set_json(json!({"active": false}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["modality"]["active"], false);
        assert_eq!(body["modality"]["name"], "Yoga");

        let delete = |id: &str| {
            test::TestRequest::delete()
                .uri(&format!("/v1/modalities/{}", id))
                .cookie(cookie.clone())
                .to_request()
        };
        let first = test::call_service(&app, delete(&ids[0])).await;
        assert_eq!(first.status(), StatusCode::OK);
        let body: Value = test::read_body_json(first).await;
        assert_eq!(body["deleted"], ids[0].as_str());

        let second = test::call_service(&app, delete(&ids[0])).await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);

        let malformed_id = test::call_service(&app, delete("not-a-uuid")).await;
        assert_eq!(malformed_id.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_customer_registration_is_public_but_admin_routes_are_not() {
        let app = init_app!(test_state().await);

        let req = test::TestRequest::post()
            .uri("/v1/customers")
            .set_json(json!({"name": "Dana", "email": "dana@gym.example", "password": "dana-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["customer"].get("password").is_none());
        let customer_id = body["customer"]["_id"].as_str().unwrap().to_string();

        let (cookie, login_body) = login_as!(app, "Dana@Gym.Example", "dana-pass");
        assert_eq!(login_body["userRole"], "customer");
        assert_eq!(login_body["userId"], customer_id.as_str());

        // Customers may read modalities but not manage them
        let req = test::TestRequest::get().uri("/v1/modalities").cookie(cookie.clone()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/v1/modalities")
            .cookie(cookie.clone())
            .set_json(json!({"name": "Spinning", "active": true}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get().uri("/v1/admins").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "authorization_error");
    }

    #[actix_web::test]
    async fn test_customer_memberships() {
        let app = init_app!(test_state().await);
        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);

        let post = |uri: &str, body: Value| {
            test::TestRequest::post()
                .uri(uri)
                .cookie(cookie.clone())
                .set_json(body)
                .to_request()
        };

        let modality: Value =
            test::call_and_read_body_json(&app, post("/v1/modalities", json!({"name": "Swim", "active": true}))).await;
        let plan: Value = test::call_and_read_body_json(
            &app,
            post(
                "/v1/plans",
                json!({
                    "name": "Swim 2x",
                    "active": true,
                    "modality": modality["modality"]["_id"],
                    "numberLessonsWeek": 2,
                    "monthDuration": 1,
                    "monthPrice": 80
                }),
            ),
        )
        .await;
        let customer: Value = test::call_and_read_body_json(
            &app,
            post(
                "/v1/customers",
                json!({"name": "Eli", "email": "eli@gym.example", "password": "eli-pass"}),
            ),
        )
        .await;
        let customer_id = customer["customer"]["_id"].as_str().unwrap();
        let memberships_uri = format!("/v1/customers/{}/memberships", customer_id);

        let resp = test::call_service(
            &app,
            post(
                &memberships_uri,
                json!({"plan": plan["plan"]["_id"], "startDate": "2024-05-01"}),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["membership"]["customer"], customer_id);
        assert_eq!(created["membership"]["active"], true);

        let resp = test::call_service(
            &app,
            post(
                &memberships_uri,
                json!({"plan": uuid::Uuid::new_v4(), "startDate": "2024-06-01"}),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Plan not found");

        let req = test::TestRequest::get().uri(&memberships_uri).cookie(cookie.clone()).to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["memberships"].as_array().unwrap().len(), 1);

        let unknown_customer = format!("/v1/customers/{}/memberships", uuid::Uuid::new_v4());
        let req = test::TestRequest::get().uri(&unknown_customer).cookie(cookie).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let app = init_app!(test_state().await);
        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);

        let req = test::TestRequest::post()
            .uri("/v1/modalities")
            .cookie(cookie.clone())
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "validation_error");

        let req = test::TestRequest::post()
            .uri("/v1/modalities")
            .cookie(cookie.clone())
            .set_json(json!({"name": 42, "active": true}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/v1/modalities")
            .cookie(cookie.clone())
            .set_json(json!({"name": "Yoga"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "validation_error");

        let req = test::TestRequest::get().uri("/v1/modalities").cookie(cookie).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"modalities": []}));
    }

    #[actix_web::test]
    async fn test_logout_sends_removal_cookie() {
        let app = init_app!(test_state().await);
        let (cookie, _) = login_as!(app, ADMIN_EMAIL, ADMIN_PASSWORD);

        let req = test::TestRequest::delete().uri("/v1/auth/logout").cookie(cookie).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let removal = resp
            .response()
            .cookies()
            .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
            .expect("logout sends a removal cookie");
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }

    #[actix_web::test]
    async fn test_unknown_route_and_health() {
        let app = init_app!(test_state().await);

        let req = test::TestRequest::get().uri("/v1/equipment").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_type"], "not_found");

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
