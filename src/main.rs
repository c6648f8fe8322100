//src/main.rs

use std::net::Ipv4Addr;

use axum::http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use painel_api::{app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve subir.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config)?;

    // CORS para o front em dev
    let origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let app = app(app_state).layer(cors);

    // A porta configurada pode estar ocupada em dev; tenta as seguintes.
    let mut listener = None;
    for porta in config.port..config.port + 10 {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, porta)).await {
            Ok(l) => {
                if porta != config.port {
                    tracing::warn!("⚠️ Porta {} indisponível. Usando {}.", config.port, porta);
                }
                listener = Some(l);
                break;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::warn!("⚠️ Porta {} em uso. Tentando {}...", porta, porta + 1);
            }
            Err(e) => return Err(e.into()),
        }
    }
    let listener =
        listener.ok_or_else(|| anyhow::anyhow!("Não foi possível encontrar uma porta livre"))?;

    tracing::info!("🚀 Backend escutando em http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
