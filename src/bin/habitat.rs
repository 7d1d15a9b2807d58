use clap::{App, Arg, ArgMatches, SubCommand};
use colored::*;
use habitat::notifications::{Notification, Severity};
use habitat::protocol::{Request, RequestKind, Response, ResponsePayload, ResponseStatus, BROADCAST_ID};
use habitat::StateReport;
use std::process::Command;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const REQUEST_TIMEOUT_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("habitat")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🚀 Space Habitat Management - operator console for the dashboard core")
        .arg(
            Arg::with_name("host")
                .short("h")
                .long("host")
                .value_name("HOST")
                .help("Dashboard server host address")
                .takes_value(true)
                .default_value(DEFAULT_HOST)
                .global(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Dashboard server port")
                .takes_value(true)
                .default_value(DEFAULT_PORT)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["json", "table", "compact"])
                .default_value("table")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable verbose output")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("ping")
                .about("🏓 Test connection to the dashboard server")
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("📊 Show habitat overview")
                .long_about("Retrieves resources, crew, environment and power readings from the current session")
        )
        .subcommand(
            SubCommand::with_name("say")
                .about("🎤 Send a voice command")
                .arg(
                    Arg::with_name("text")
                        .help("Command text, e.g. \"show resources\"")
                        .required(true)
                        .multiple(true)
                )
        )
        .subcommand(
            SubCommand::with_name("notifications")
                .about("🔔 List recent notifications")
                .arg(
                    Arg::with_name("limit")
                        .short("l")
                        .long("limit")
                        .value_name("N")
                        .help("Number of notifications to show (max 50)")
                        .takes_value(true)
                        .default_value("10")
                        .validator(|v| match v.parse::<usize>() {
                            Ok(n) if n <= 50 => Ok(()),
                            _ => Err("Limit must be between 0 and 50".into()),
                        })
                )
                .arg(
                    Arg::with_name("mark-read")
                        .long("mark-read")
                        .help("Mark every notification read afterwards")
                )
        )
        .subcommand(
            SubCommand::with_name("panel")
                .about("🧭 Select the active dashboard panel")
                .arg(
                    Arg::with_name("name")
                        .help("Panel name")
                        .required(true)
                        .possible_values(&[
                            "dashboard", "3d-view", "crew", "resources",
                            "environmental", "power", "maintenance", "quantum",
                        ])
                )
        )
        .subcommand(
            SubCommand::with_name("theme")
                .about("🌙 Toggle between dark and light theme")
        )
        .subcommand(
            SubCommand::with_name("emergency")
                .about("🚨 Toggle emergency mode")
                .arg(
                    Arg::with_name("confirm")
                        .long("confirm")
                        .help("Confirm the emergency toggle")
                        .required(true)
                )
        )
        .subcommand(
            SubCommand::with_name("refresh")
                .about("🔄 Regenerate telemetry immediately")
        )
        .subcommand(
            SubCommand::with_name("monitor")
                .about("📈 Monitor live state updates")
                .long_about("Prints every state broadcast the server sends after a telemetry refresh")
        )
        .subcommand(
            SubCommand::with_name("server")
                .about("🚀 Start the dashboard server")
                .arg(
                    Arg::with_name("background")
                        .short("b")
                        .long("background")
                        .help("Run server in background")
                )
        )
        .get_matches();

    let host = matches.value_of("host").unwrap_or(DEFAULT_HOST);
    let port = matches.value_of("port").unwrap_or(DEFAULT_PORT).parse::<u16>()?;
    let format = matches.value_of("format").unwrap_or("table");
    let verbose = matches.is_present("verbose");

    if verbose {
        println!("{}", "🚀 Habitat - Space Habitat Management".bright_blue().bold());
        println!("{} {}:{}", "Connecting to".dimmed(), host, port);
    }

    match matches.subcommand() {
        ("ping", _) => {
            let response = send_request(host, port, RequestKind::Ping).await?;
            match format {
                "json" => print_json(&response)?,
                "compact" => println!("{}", "PONG".bright_green()),
                _ if response.is_success() => {
                    println!("{} {}", "✅".green(), "Dashboard server is responsive".bright_green());
                }
                _ => println!("{} {}", "❌".red(), "Ping failed".bright_red()),
            }
        }
        ("status", _) => {
            let response = send_request(host, port, RequestKind::GetState).await?;
            print_status(&response, format)?;
        }
        ("say", Some(sub_matches)) => {
            let text = sub_matches
                .values_of("text")
                .map(|words| words.collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            let response = send_request(host, port, RequestKind::Interpret { text }).await?;
            match format {
                "json" => print_json(&response)?,
                _ => match &response.payload {
                    Some(ResponsePayload::Interpretation(i)) => {
                        println!("{} {}", "🤖".bright_blue(), i.response.bright_white());
                        if verbose {
                            println!("{} {:?}", "Matched rule:".dimmed(), i.rule);
                        }
                    }
                    _ => print_result("Voice Command", &response),
                },
            }
        }
        ("notifications", Some(sub_matches)) => {
            handle_notifications(sub_matches, host, port, format).await?;
        }
        ("panel", Some(sub_matches)) => {
            let panel = sub_matches.value_of("name").unwrap_or("dashboard").replace('-', " ");
            let response = send_request(host, port, RequestKind::SelectPanel { panel }).await?;
            output_result("Panel", &response, format)?;
        }
        ("theme", _) => {
            let response = send_request(host, port, RequestKind::ToggleTheme).await?;
            output_result("Theme", &response, format)?;
        }
        ("emergency", Some(sub_matches)) => {
            if sub_matches.is_present("confirm") {
                let response = send_request(host, port, RequestKind::ToggleEmergency).await?;
                output_result("Emergency", &response, format)?;
            } else {
                println!("{}", "Emergency toggle requires --confirm flag".yellow());
            }
        }
        ("refresh", _) => {
            let response = send_request(host, port, RequestKind::ForceRefresh).await?;
            output_result("Refresh", &response, format)?;
        }
        ("monitor", _) => {
            monitor_state(host, port, format).await?;
        }
        ("server", Some(sub_matches)) => {
            handle_server(sub_matches, port)?;
        }
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            println!("{}", "Quick start:".bright_green());
            println!("  {} Start the dashboard server", "habitat server".bright_cyan());
            println!("  {} Habitat overview", "habitat status".bright_cyan());
            println!("  {} Voice command", "habitat say show resources".bright_cyan());
        }
    }

    Ok(())
}

async fn handle_notifications(
    matches: &ArgMatches<'_>,
    host: &str,
    port: u16,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = matches.value_of("limit").unwrap_or("10").parse::<usize>()?;
    let response = send_request(host, port, RequestKind::GetNotifications { limit }).await?;

    match (format, &response.payload) {
        ("json", _) => print_json(&response)?,
        (_, Some(ResponsePayload::Notifications(notifications))) if notifications.is_empty() => {
            println!("{}", "No new notifications".dimmed());
        }
        (_, Some(ResponsePayload::Notifications(notifications))) => {
            for notification in notifications {
                print_notification(notification, format);
            }
        }
        _ => print_result("Notifications", &response),
    }

    if matches.is_present("mark-read") {
        let response = send_request(host, port, RequestKind::MarkAllRead).await?;
        output_result("Mark Read", &response, format)?;
    }
    Ok(())
}

fn handle_server(matches: &ArgMatches<'_>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let background = matches.is_present("background");

    println!("{}", "🚀 Starting habitat dashboard server...".bright_green().bold());

    let port_arg = port.to_string();
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--bin", "habitat-server", "--", "--port", port_arg.as_str()]);

    if background {
        cmd.spawn()?;
        println!("{} Server started in background on port {}", "✅".green(), port);
    } else {
        println!("{} Server starting on port {} (Press Ctrl+C to stop)", "🌐".bright_blue(), port);
        cmd.status()?;
    }

    Ok(())
}

async fn send_request(host: &str, port: u16, kind: RequestKind) -> Result<Response, Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", host, port);
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("{} Failed to connect to dashboard server at {}", "❌".red(), addr.bright_white());

            if e.kind() == std::io::ErrorKind::ConnectionRefused {
                eprintln!("{} Server is not running. Start it with:", "💡".yellow());
                eprintln!("   {}", "habitat server".bright_cyan());
                eprintln!("   or");
                eprintln!("   {}", "cargo run --bin habitat-server".bright_cyan());
            } else {
                eprintln!("{} Network error: {}", "🔌".yellow(), e.to_string().bright_red());
            }

            return Err(e.into());
        }
    };

    let request = Request { id: next_request_id(), kind };
    let request_json = serde_json::to_string(&request)?;

    match tokio::time::timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS), exchange(stream, &request_json, request.id)).await {
        Ok(result) => result,
        Err(_) => {
            eprintln!("{} Request timed out after {} seconds", "⏰".yellow(), REQUEST_TIMEOUT_SECS);
            Err("Request timeout".into())
        }
    }
}

async fn exchange(stream: TcpStream, request_json: &str, id: u32) -> Result<Response, Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    writer.write_all(request_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;

    // State broadcasts may arrive before our reply; skip them
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        let response: Response = serde_json::from_str(&line)?;
        if response.id == id {
            return Ok(response);
        }
        if response.id != BROADCAST_ID {
            eprintln!("{} Ignoring response for unknown request {}", "⚠️".yellow(), response.id);
        }
    }
    Err("Server closed connection".into())
}

async fn monitor_state(host: &str, port: u16, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "📡 Monitoring habitat state (Press Ctrl+C to stop)...".bright_blue().bold());

    let stream = TcpStream::connect((host, port)).await?;
    let mut lines = BufReader::new(stream).lines();

    if format == "table" {
        println!("{}", "┌──────────┬─────────┬─────────┬─────────┬─────────┬─────────┬───────────┐".bright_white());
        println!("{}", "│ Time     │ Oxygen  │ Water   │ Temp    │ Battery │ Crew HP │ Emergency │".bright_white());
        println!("{}", "├──────────┼─────────┼─────────┼─────────┼─────────┼─────────┼───────────┤".bright_white());
    }

    while let Some(line) = lines.next_line().await? {
        if format == "json" {
            println!("{}", line);
            continue;
        }

        let Ok(response) = serde_json::from_str::<Response>(&line) else {
            continue;
        };
        let Some(ResponsePayload::State(report)) = response.payload else {
            continue;
        };

        let session = &report.session;
        let time_str = response.timestamp.format("%H:%M:%S").to_string();
        let health = report.overview.average_crew_health.unwrap_or(0.0);

        match format {
            "compact" => {
                let status = if session.emergency_mode { "EMERGENCY".red() } else { "OK".green() };
                println!(
                    "[{}] {} | O2 {:.1}% | H2O {:.1}% | {:.1}°C",
                    time_str, status, session.resources.oxygen, session.resources.water, session.environment.temperature
                );
            }
            _ => {
                let oxygen_str = level_colored(session.resources.oxygen, 90.0, 80.0);
                let water_str = level_colored(session.resources.water, 85.0, 75.0);
                let emergency_str = if session.emergency_mode { "   ACTIVE".bright_red() } else { "   NORMAL".bright_green() };
                println!(
                    "│ {:<8} │ {} │ {} │ {:>5.1}°C │ {:>6.1}% │ {:>6.1}% │ {} │",
                    time_str,
                    oxygen_str,
                    water_str,
                    session.environment.temperature,
                    session.power.main_battery,
                    health,
                    emergency_str
                );
            }
        }
    }

    Ok(())
}

fn level_colored(value: f64, good: f64, fair: f64) -> ColoredString {
    let text = format!("{:>6.1}%", value);
    if value > good {
        text.green()
    } else if value > fair {
        text.yellow()
    } else {
        text.red()
    }
}

fn next_request_id() -> u32 {
    rand::random::<u32>().max(1)
}

fn print_json(response: &Response) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

fn output_result(action: &str, response: &Response, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => print_json(response)?,
        "compact" => println!("{}", if response.is_success() { "OK".bright_green() } else { "FAIL".bright_red() }),
        _ => print_result(action, response),
    }
    Ok(())
}

fn print_result(action: &str, response: &Response) {
    let message = response.message.as_deref().unwrap_or("");
    match response.status {
        ResponseStatus::Success => {
            println!("{} {} {}", "✅".green(), action.bright_white(), message.bright_cyan());
        }
        ResponseStatus::NotFound => {
            println!("{} {} not found: {}", "❓".blue(), action.bright_white(), message.bright_red());
        }
        ResponseStatus::InvalidRequest => {
            println!("{} {} rejected: {}", "❌".red(), action.bright_white(), message.bright_red());
        }
        ResponseStatus::Error => {
            println!("{} {} failed: {}", "⚠️".yellow(), action.bright_white(), message.bright_red());
        }
    }
}

fn print_notification(notification: &Notification, format: &str) {
    let severity = match notification.severity {
        Severity::Info => notification.severity.as_str().bright_green(),
        Severity::Warning => notification.severity.as_str().yellow(),
        Severity::Critical => notification.severity.as_str().bright_red().bold(),
    };
    let marker = if notification.read { " " } else { "•" };
    let time = notification.time.format("%Y-%m-%d %H:%M:%S");

    match format {
        "compact" => println!("{} [{}] {}", marker, severity, notification.message),
        _ => println!("{} {} {:<8} {}", marker, time.to_string().dimmed(), severity, notification.message),
    }
}

fn print_status(response: &Response, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "json" {
        return print_json(response);
    }

    let Some(ResponsePayload::State(report)) = &response.payload else {
        print_result("Status", response);
        return Ok(());
    };
    let StateReport { session, overview } = report.as_ref();

    if format == "compact" {
        println!(
            "{} | {} | crew {}/{} | unread {}",
            session.system_status, session.selected_panel, overview.crew_on_duty, overview.crew_total,
            overview.unread_notifications
        );
        return Ok(());
    }

    println!("{} {}", "📊".bright_blue(), "Habitat Status".bright_blue().bold());
    println!("{}", "═══════════════════════════".bright_blue());
    println!("{} {}", "System:".bright_white(), session.system_status.to_string().bright_green());
    println!("{} {}", "Panel:".bright_white(), session.selected_panel);
    println!("{} {}", "Theme:".bright_white(), session.theme.as_str());
    println!(
        "{} {}",
        "Emergency:".bright_white(),
        if session.emergency_mode { "ACTIVE".bright_red().bold() } else { "normal".green() }
    );
    println!("{} {}", "Last refresh:".bright_white(), session.last_refresh_time.format("%Y-%m-%d %H:%M:%S"));

    println!("\n{}", "Resources".bright_blue().bold());
    for (name, value) in session.resources.entries() {
        println!("  {:<8} {}", name, level_colored(value, 90.0, 80.0));
    }

    println!("\n{}", "Environment".bright_blue().bold());
    let env = &session.environment;
    println!("  Temperature {:.1}°C   Pressure {:.1} kPa   Humidity {:.1}%", env.temperature, env.pressure, env.humidity);
    println!("  CO₂ {:.1} ppm   Radiation {:.3} μSv/h   Sound {:.1} dB", env.co2_level, env.radiation, env.sound_level);

    println!("\n{}", "Power".bright_blue().bold());
    let power = &session.power;
    println!("  Solar {:.1}%   Battery {:.1}%   Consumption {:.1}%", power.solar_array, power.main_battery, power.power_consumption);

    println!("\n{}", "Crew".bright_blue().bold());
    let health = overview
        .average_crew_health
        .map_or_else(|| "n/a".to_string(), |h| format!("{:.1}%", h));
    println!("  On duty {}/{}   Average health {}", overview.crew_on_duty, overview.crew_total, health);

    println!(
        "\n{} {} open maintenance tasks, {} unread notifications",
        "🔧".yellow(),
        overview.open_maintenance_tasks,
        overview.unread_notifications
    );

    Ok(())
}
