use super::*;

// =============================================================
// Endpoint construction
// =============================================================

#[test]
fn rest_url_targets_the_bookmarks_table() {
    assert_eq!(rest_url("https://svc.example"), "https://svc.example/rest/v1/bookmarks");
}

#[test]
fn list_url_filters_by_owner_and_orders_newest_first() {
    assert_eq!(
        list_url("https://svc.example", "user-1"),
        "https://svc.example/rest/v1/bookmarks?owner=eq.user-1&order=created_at.desc"
    );
}

#[test]
fn delete_url_filters_by_id() {
    assert_eq!(
        delete_url("https://svc.example", "bm-9"),
        "https://svc.example/rest/v1/bookmarks?id=eq.bm-9"
    );
}

#[test]
fn authorize_url_carries_provider_and_redirect() {
    assert_eq!(
        authorize_url("https://svc.example", "http://localhost:3000/auth/callback"),
        "https://svc.example/auth/v1/authorize?provider=google&redirect_to=http://localhost:3000/auth/callback"
    );
}

#[test]
fn socket_url_shifts_https_to_wss() {
    assert_eq!(
        socket_url("https://svc.example", "anon", "tok"),
        "wss://svc.example/realtime/v1/websocket?apikey=anon&token=tok"
    );
}

#[test]
fn socket_url_shifts_http_to_ws() {
    assert_eq!(
        socket_url("http://localhost:54321", "anon", "tok"),
        "ws://localhost:54321/realtime/v1/websocket?apikey=anon&token=tok"
    );
}

// =============================================================
// Failure messages
// =============================================================

#[test]
fn failure_messages_carry_the_status() {
    assert_eq!(fetch_failed_message(500), "bookmark fetch failed: 500");
    assert_eq!(delete_failed_message(403), "bookmark delete failed: 403");
}

#[test]
fn service_error_message_prefers_the_json_message_field() {
    assert_eq!(
        service_error_message(r#"{"message": "duplicate key value", "code": "23505"}"#, 409),
        "duplicate key value"
    );
}

#[test]
fn service_error_message_falls_back_to_the_raw_body() {
    assert_eq!(service_error_message("gateway timeout", 504), "gateway timeout");
}

#[test]
fn service_error_message_empty_body_uses_the_status() {
    assert_eq!(service_error_message("", 500), "bookmark insert failed: 500");
}

// =============================================================
// Service construction
// =============================================================

#[test]
fn new_service_has_no_session() {
    let service = HttpService::new(ClientConfig {
        url: "https://svc.example".to_owned(),
        anon_key: "anon".to_owned(),
    });
    assert!(service.session.borrow().is_none());
    assert_eq!(service.config.url, "https://svc.example");
}

#[test]
fn sign_in_url_uses_the_configured_service() {
    let service = HttpService::new(ClientConfig {
        url: "https://svc.example".to_owned(),
        anon_key: "anon".to_owned(),
    });
    assert_eq!(
        service.sign_in_url("http://localhost:3000/auth/callback"),
        "https://svc.example/auth/v1/authorize?provider=google&redirect_to=http://localhost:3000/auth/callback"
    );
}

// =============================================================
// Session notification pruning
// =============================================================

#[test]
fn cancelled_session_subscribers_are_pruned_on_emit() {
    let service = HttpService::new(ClientConfig {
        url: "https://svc.example".to_owned(),
        anon_key: "anon".to_owned(),
    });

    let seen = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&seen);
    let sub = service.on_session_change(Rc::new(move |_| *sink.borrow_mut() += 1));

    service.emit_session(None);
    assert_eq!(*seen.borrow(), 1);

    sub.unsubscribe();
    service.emit_session(None);
    assert_eq!(*seen.borrow(), 1);
    assert!(service.session_subs.borrow().is_empty());
}
