use chrono::Utc;
use clap::{App, Arg};
use habitat::config::DashboardConfig;
use habitat::dashboard::HabitatDashboard;
use habitat::refresh::RefreshOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Mutex};
use tokio::time;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let matches = App::new("habitat-server")
        .version("0.1.0")
        .about("Space habitat dashboard core server")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Listen port")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("interval")
                .short("i")
                .long("interval")
                .value_name("SECONDS")
                .help("Telemetry refresh interval in seconds")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed the telemetry simulator for reproducible runs")
                .takes_value(true),
        )
        .get_matches();

    let mut config = match matches.value_of("config") {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(port) = matches.value_of("port") {
        config.port = port.parse()?;
    }
    if let Some(interval) = matches.value_of("interval") {
        config.refresh_interval_secs = interval.parse()?;
    }
    if let Some(seed) = matches.value_of("seed") {
        config.seed = Some(seed.parse()?);
    }

    println!("🚀 Space Habitat Dashboard Core");
    println!("===============================");

    let dashboard = Arc::new(Mutex::new(HabitatDashboard::from_config(&config, Utc::now())?));
    {
        let mut dashboard_guard = dashboard.lock().await;
        dashboard_guard.start(Utc::now());
    }

    // Create broadcast channel for state updates
    let (state_tx, _) = broadcast::channel(config.broadcast_buffer);

    // Start TCP server
    let tcp_dashboard = Arc::clone(&dashboard);
    let tcp_state_tx = state_tx.clone();
    let listen_address = config.listen_address();
    let tcp_server = tokio::spawn(async move {
        if let Err(e) = start_tcp_server(&listen_address, tcp_dashboard, tcp_state_tx).await {
            error!("TCP server error: {}", e);
        }
    });

    // Refresh trigger; the dashboard itself ignores ticks inside the interval
    let mut interval = time::interval(Duration::from_secs(config.refresh_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }

        let broadcast_line = {
            let mut dashboard_guard = dashboard.lock().await;
            let now = Utc::now();
            match dashboard_guard.update(now) {
                RefreshOutcome::Refreshed { .. } => Some(dashboard_guard.broadcast_line(now)),
                RefreshOutcome::Skipped => None,
            }
        };

        match broadcast_line {
            Some(Ok(line)) => {
                // No subscribers is not an error worth more than a debug line
                if state_tx.send(line).is_err() {
                    tracing::debug!("No clients subscribed to state updates");
                }
                info!("📡 Telemetry refreshed");
            }
            Some(Err(e)) => {
                error!("❌ Failed to serialize state: {}", e);
            }
            None => {}
        }
    }

    {
        let mut dashboard_guard = dashboard.lock().await;
        dashboard_guard.stop();
    }

    tcp_server.abort();
    println!("🛑 Habitat dashboard stopped");

    Ok(())
}

async fn start_tcp_server(
    listen_address: &str,
    dashboard: Arc<Mutex<HabitatDashboard>>,
    state_tx: broadcast::Sender<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(listen_address).await?;
    info!("🌐 TCP server listening on {}", listen_address);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("🔗 New client connected: {}", addr);
                let client_dashboard = Arc::clone(&dashboard);
                let client_state_rx = state_tx.subscribe();

                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, client_dashboard, client_state_rx).await {
                        warn!("Client {} error: {}", addr, e);
                    }
                    info!("🔌 Client {} disconnected", addr);
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(
    stream: TcpStream,
    dashboard: Arc<Mutex<HabitatDashboard>>,
    mut state_rx: broadcast::Receiver<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, writer) = stream.into_split();
    let mut buf_reader = BufReader::new(reader);

    // Wrap writer in Arc<Mutex<>> for sharing
    let writer = Arc::new(Mutex::new(writer));

    // Spawn state streaming task
    let state_writer = Arc::clone(&writer);
    let state_task = tokio::spawn(async move {
        loop {
            match state_rx.recv().await {
                Ok(line) => {
                    let mut writer_guard = state_writer.lock().await;
                    if let Err(e) = writer_guard.write_all(line.as_bytes()).await {
                        warn!("Failed to send state update: {}", e);
                        break;
                    }
                    if let Err(e) = writer_guard.write_all(b"\n").await {
                        warn!("Failed to send state update newline: {}", e);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Client lagged behind, skipped {} state updates", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Process requests from client
    let mut line = String::new();
    loop {
        line.clear();
        match buf_reader.read_line(&mut line).await {
            Ok(0) => break, // Client disconnected
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let reply = {
                    let mut dashboard_guard = dashboard.lock().await;
                    dashboard_guard.handle_line(trimmed, Utc::now())
                };

                match reply {
                    Ok(reply) => {
                        let mut writer_guard = writer.lock().await;
                        writer_guard.write_all(reply.as_bytes()).await?;
                        writer_guard.write_all(b"\n").await?;
                        info!("📤 Sent response ({} bytes)", reply.len());
                    }
                    Err(e) => {
                        error!("Failed to build response: {}", e);
                    }
                }
            }
            Err(e) => {
                error!("Error reading from client: {}", e);
                break;
            }
        }
    }

    state_task.abort();
    Ok(())
}
