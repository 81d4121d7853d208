use axum::Router;

/// Serves the router on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn_test_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|error| panic!("failed to bind test listener: {error}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|error| panic!("failed to read test listener address: {error}"));

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{address}")
}
